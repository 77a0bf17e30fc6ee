mod query;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use salt_core::scheme::SchemeRegistry;
use salt_core::translit::Transliterator;

use super::error::ClientError;
use super::session::ClientSession;
use super::transport::{Endpoint, Transport};

pub(super) const SERVICE_LIST: &str = r#"[
    {"id": "mw", "url": "https://dict.example/mw/"},
    {"id": "ap", "url": "https://dict.example/ap/", "supported_langs_query": ["x-slp1", "x-hk"]}
]"#;

/// Canned responses keyed by the full request URL; unknown URLs fail.
#[derive(Default)]
pub(super) struct FakeTransport {
    routes: HashMap<String, Result<String, String>>,
    log: Arc<Mutex<Vec<String>>>,
}

impl FakeTransport {
    pub(super) fn new() -> Self {
        Self::default()
    }

    pub(super) fn route(mut self, url: &str, body: &str) -> Self {
        self.routes.insert(url.to_string(), Ok(body.to_string()));
        self
    }

    pub(super) fn fail(mut self, url: &str, error: &str) -> Self {
        self.routes.insert(url.to_string(), Err(error.to_string()));
        self
    }

    /// Requests made so far, shared with the transport once boxed.
    pub(super) fn log(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.log)
    }
}

impl Transport for FakeTransport {
    fn get(&self, endpoint: &Endpoint) -> Result<String, ClientError> {
        let url = endpoint.to_string();
        self.log.lock().unwrap().push(url.clone());
        match self.routes.get(&url) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(e)) => Err(ClientError::Http(e.clone())),
            None => Err(ClientError::Http(format!("{url}: 404"))),
        }
    }
}

/// The standard probes: `mw` takes ISO, `ap` takes SLP1 and HK.
pub(super) fn with_probes(transport: FakeTransport) -> FakeTransport {
    transport
        .route(
            "https://dict.example/mw/v1",
            r#"{"name": "Monier-Williams", "short_name": "MW",
                "supported_t13ns_query": ["iso"]}"#,
        )
        .route(
            "https://dict.example/ap/v1",
            r#"{"name": "Apte", "short_name": "AP", "css": "b { color: red }",
                "supported_query_schemes": ["x-slp1", "x-hk"]}"#,
        )
}

pub(super) fn session(transport: FakeTransport) -> ClientSession<'static> {
    let translit = Transliterator::new(SchemeRegistry::global());
    let mut session = ClientSession::new(translit, Box::new(transport));
    session.load_services(SERVICE_LIST).unwrap();
    session
}
