use salt_core::scheme::UnknownSchemeError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown service: {0}")]
    UnknownService(String),
    #[error(transparent)]
    Scheme(#[from] UnknownSchemeError),
    #[error("no article format available")]
    NoArticle,
}
