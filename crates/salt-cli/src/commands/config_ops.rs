use salt_core::scheme::SchemeRegistry;
use salt_core::settings;

use super::read_input;
use crate::CliError;

/// Install custom scheme and settings files before any command runs.
pub fn load_custom(schemes: Option<&str>, settings_file: Option<&str>) -> Result<(), CliError> {
    if let Some(path) = settings_file {
        settings::init_custom(read_input(path)?)?;
    }
    if let Some(path) = schemes {
        SchemeRegistry::init_custom(read_input(path)?)?;
    }
    Ok(())
}

pub fn schemes_export() -> &'static str {
    salt_core::scheme::default_toml()
}

pub fn schemes_validate(file: &str) -> Result<String, CliError> {
    let registry = SchemeRegistry::from_toml(&read_input(file)?)?;
    let ids: Vec<&str> = registry.iter().map(|s| s.id()).collect();
    Ok(format!("OK: {} schemes ({})", ids.len(), ids.join(", ")))
}

pub fn settings_export() -> &'static str {
    settings::default_toml()
}

pub fn settings_validate(file: &str) -> Result<String, CliError> {
    let s = settings::parse_settings_toml(&read_input(file)?)?;
    Ok(format!(
        "OK: failure_marker={:?}, preference_order=[{}], search_limit={}, context_limit={}",
        s.transliteration.failure_marker,
        s.negotiation.preference_order.join(", "),
        s.client.search_limit,
        s.client.context_limit,
    ))
}
