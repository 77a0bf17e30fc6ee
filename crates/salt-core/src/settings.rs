//! Global settings loaded from TOML, following the same OnceLock pattern as the scheme registry.
//!
//! - `init_custom(toml_content)` sets a custom TOML before first `settings()` call
//! - `settings()` returns `&'static Settings` (lazy-init singleton)
//! - Default values are embedded via `include_str!("default_settings.toml")`

use std::sync::OnceLock;

use serde::Deserialize;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

/// Set custom TOML before first `settings()` call.
pub fn init_custom(toml_content: String) -> Result<(), SettingsError> {
    parse_settings_toml(&toml_content)?;
    CUSTOM_TOML
        .set(toml_content)
        .map_err(|_| SettingsError::AlreadyInitialized)
}

/// Get or initialize the global settings singleton.
///
/// A custom TOML that stopped validating after `init_custom` cannot happen
/// (it is validated there), so the embedded defaults are the only fallback.
pub fn settings() -> &'static Settings {
    static INSTANCE: OnceLock<Settings> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        CUSTOM_TOML
            .get()
            .and_then(|s| parse_settings_toml(s).ok())
            .unwrap_or_else(builtin)
    })
}

/// Returns the embedded default settings TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

fn builtin() -> Settings {
    match parse_settings_toml(DEFAULT_SETTINGS_TOML) {
        Ok(s) => s,
        // build.rs and the tests below keep the embedded file valid
        Err(e) => unreachable!("embedded settings TOML is invalid: {e}"),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("settings already initialized")]
    AlreadyInitialized,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub transliteration: TransliterationSettings,
    pub negotiation: NegotiationSettings,
    pub article: ArticleSettings,
    pub client: ClientSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransliterationSettings {
    pub failure_marker: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NegotiationSettings {
    pub preference_order: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArticleSettings {
    pub preferred_mimetype: String,
    #[serde(default)]
    pub transliterate_tags: Vec<String>,
    pub script_attribute: String,
    pub allowed_tags: Vec<String>,
    #[serde(default)]
    pub allowed_attributes: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientSettings {
    pub default_query_scheme: String,
    pub default_article_scheme: String,
    pub context_limit: usize,
    pub search_limit: usize,
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings = toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    Ok(s)
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    macro_rules! check_non_empty {
        ($section:ident . $field:ident) => {
            if s.$section.$field.is_empty() {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must not be empty".to_string(),
                });
            }
        };
    }
    macro_rules! check_positive_usize {
        ($section:ident . $field:ident) => {
            if s.$section.$field == 0 {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must be positive".to_string(),
                });
            }
        };
    }

    check_non_empty!(transliteration.failure_marker);
    check_non_empty!(negotiation.preference_order);
    check_non_empty!(article.preferred_mimetype);
    check_non_empty!(article.script_attribute);
    check_non_empty!(article.allowed_tags);
    check_non_empty!(client.default_query_scheme);
    check_non_empty!(client.default_article_scheme);
    check_positive_usize!(client.context_limit);
    check_positive_usize!(client.search_limit);

    if let Some(blank) = s
        .negotiation
        .preference_order
        .iter()
        .position(|id| id.trim().is_empty())
    {
        return Err(SettingsError::InvalidValue {
            field: format!("negotiation.preference_order[{blank}]"),
            reason: "scheme id must not be blank".to_string(),
        });
    }

    Ok(())
}
