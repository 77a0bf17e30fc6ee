use salt_client::ClientError;
use salt_core::scheme::{SchemeConfigError, UnknownSchemeError};
use salt_core::settings::SettingsError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Scheme(#[from] UnknownSchemeError),
    #[error("scheme config: {0}")]
    SchemeConfig(#[from] SchemeConfigError),
    #[error("settings: {0}")]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no scheme accepted by the service is reachable from {0}")]
    NoCommonScheme(String),
}
