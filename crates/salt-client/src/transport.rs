use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::ClientError;

/// A GET request: a URL plus query parameters, encoded by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Endpoint {
    pub url: String,
    pub params: Vec<(String, String)>,
}

impl Endpoint {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            params: Vec::new(),
        }
    }

    /// `path` resolved against a service base URL.
    pub fn join(base: &str, path: &str) -> Self {
        let base = base.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Self::new(format!("{base}/{path}"))
    }

    pub fn param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.params.push((key.to_string(), value.into()));
        self
    }

    pub fn get_param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)?;
        for (i, (k, v)) in self.params.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{sep}{k}={v}")?;
        }
        Ok(())
    }
}

/// Fetches endpoint bodies as text.
pub trait Transport: Send + Sync {
    fn get(&self, endpoint: &Endpoint) -> Result<String, ClientError>;
}

/// Fetch `endpoint` and decode its body as JSON.
pub fn get_json<T: DeserializeOwned>(
    transport: &dyn Transport,
    endpoint: &Endpoint,
) -> Result<T, ClientError> {
    let body = transport.get(endpoint)?;
    Ok(serde_json::from_str(&body)?)
}

/// Blocking HTTP transport.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpTransport;

impl Transport for HttpTransport {
    fn get(&self, endpoint: &Endpoint) -> Result<String, ClientError> {
        debug!(%endpoint, "GET");
        let mut request = ureq::get(endpoint.url.as_str());
        for (k, v) in &endpoint.params {
            request = request.query(k, v);
        }
        request
            .call()
            .map_err(|e| ClientError::Http(format!("{endpoint}: {e}")))?
            .into_body()
            .read_to_string()
            .map_err(|e| ClientError::Http(format!("{endpoint}: {e}")))
    }
}
