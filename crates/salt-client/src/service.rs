//! Remote dictionary services and their availability.
//!
//! Each request to a service takes a [`RequestTicket`]. Starting a request
//! marks the service busy; only the response to the most recent ticket may
//! move it to online or offline; older responses are dropped.

use serde::Serialize;
use tracing::debug;

use salt_core::lang_tag::LanguageTag;

use crate::transport::Endpoint;
use crate::types::{default_query_schemes, ProbeResponse, ServiceEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    #[default]
    Unknown,
    Busy,
    Online,
    Offline,
}

impl ServiceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceStatus::Unknown => "unknown",
            ServiceStatus::Busy => "busy",
            ServiceStatus::Online => "online",
            ServiceStatus::Offline => "offline",
        }
    }
}

/// Identifies one in-flight request to one service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    pub service_id: String,
    generation: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceDescriptor {
    pub id: String,
    /// Base URL; endpoints are resolved against it.
    pub url: String,
    pub status: ServiceStatus,
    pub selected: bool,
    pub name: String,
    pub short_name: String,
    pub main_page_url: String,
    pub css: Option<String>,
    /// Language tags (or bare scheme ids) accepted for queries, in order.
    pub supported_query_schemes: Vec<LanguageTag>,
    #[serde(skip)]
    generation: u64,
}

impl From<ServiceEntry> for ServiceDescriptor {
    fn from(e: ServiceEntry) -> Self {
        Self {
            id: e.id,
            url: e.url,
            status: ServiceStatus::Unknown,
            selected: false,
            name: e.name,
            short_name: e.short_name,
            main_page_url: e.main_page_url,
            css: Some(e.css).filter(|c| !c.is_empty()),
            supported_query_schemes: e.supported_query_schemes,
            generation: 0,
        }
    }
}

impl ServiceDescriptor {
    pub fn new(id: &str, url: &str) -> Self {
        Self {
            id: id.to_string(),
            url: url.to_string(),
            status: ServiceStatus::Unknown,
            selected: false,
            name: String::new(),
            short_name: String::new(),
            main_page_url: String::new(),
            css: None,
            supported_query_schemes: default_query_schemes(),
            generation: 0,
        }
    }

    pub fn endpoint(&self, path: &str) -> Endpoint {
        Endpoint::join(&self.url, path)
    }

    pub fn probe_endpoint(&self) -> Endpoint {
        self.endpoint("v1")
    }

    pub fn is_online(&self) -> bool {
        self.status == ServiceStatus::Online
    }

    /// Start a request: the service is busy until the ticket is finished.
    /// Any ticket issued earlier becomes stale.
    pub fn begin_request(&mut self) -> RequestTicket {
        self.generation += 1;
        self.status = ServiceStatus::Busy;
        debug!(service = %self.id, generation = self.generation, "request started");
        RequestTicket {
            service_id: self.id.clone(),
            generation: self.generation,
        }
    }

    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        ticket.service_id == self.id && ticket.generation == self.generation
    }

    /// Settle the request `ticket` started. Returns `false`, changing
    /// nothing, when the ticket is stale or already finished.
    pub fn finish_request(&mut self, ticket: &RequestTicket, ok: bool) -> bool {
        if !self.is_current(ticket) || self.status != ServiceStatus::Busy {
            debug!(service = %self.id, generation = ticket.generation, "stale response dropped");
            return false;
        }
        self.status = if ok {
            ServiceStatus::Online
        } else {
            ServiceStatus::Offline
        };
        debug!(service = %self.id, status = self.status.as_str(), "request finished");
        true
    }

    /// Settle a capability probe, merging what the service reports.
    pub fn finish_probe(
        &mut self,
        ticket: &RequestTicket,
        response: Option<ProbeResponse>,
    ) -> bool {
        let ok = response.is_some();
        if !self.finish_request(ticket, ok) {
            return false;
        }
        if let Some(response) = response {
            self.merge_probe(response);
        }
        true
    }

    /// Copy reported fields over the current ones; absent fields are kept.
    pub fn merge_probe(&mut self, p: ProbeResponse) {
        if let Some(name) = p.name {
            self.name = name;
        }
        if let Some(short_name) = p.short_name {
            self.short_name = short_name;
        }
        if let Some(url) = p.main_page_url {
            self.main_page_url = url;
        }
        if let Some(css) = p.css.filter(|c| !c.is_empty()) {
            self.css = Some(css);
        }
        if let Some(schemes) = p.supported_query_schemes {
            self.supported_query_schemes = schemes;
        }
    }
}

/// Parse a JSON service list.
pub fn parse_service_list(json: &str) -> Result<Vec<ServiceDescriptor>, serde_json::Error> {
    let entries: Vec<ServiceEntry> = serde_json::from_str(json)?;
    Ok(entries.into_iter().map(ServiceDescriptor::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_list_fills_defaults() {
        let list = parse_service_list(
            r#"[{"id": "mw", "url": "https://a.org/mw/"},
                {"id": "ap", "url": "https://a.org/ap/", "supported_query_schemes": ["x-slp1"]}]"#,
        )
        .unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].status, ServiceStatus::Unknown);
        assert!(!list[0].selected);
        assert_eq!(list[0].supported_query_schemes[0].as_str(), "x-iso");
        assert_eq!(list[1].supported_query_schemes[0].as_str(), "x-slp1");
        assert_eq!(list[1].probe_endpoint().url, "https://a.org/ap/v1");
    }

    #[test]
    fn status_lifecycle() {
        let mut s = ServiceDescriptor::new("mw", "https://a.org/mw/");
        let t = s.begin_request();
        assert_eq!(s.status, ServiceStatus::Busy);
        assert!(s.finish_request(&t, true));
        assert_eq!(s.status, ServiceStatus::Online);
        // a finished ticket cannot move the status again
        assert!(!s.finish_request(&t, false));
        assert_eq!(s.status, ServiceStatus::Online);
    }

    #[test]
    fn stale_ticket_is_inert() {
        let mut s = ServiceDescriptor::new("mw", "u");
        let old = s.begin_request();
        let new = s.begin_request();
        assert!(!s.finish_probe(&old, None));
        assert_eq!(s.status, ServiceStatus::Busy);
        assert!(s.finish_request(&new, false));
        assert_eq!(s.status, ServiceStatus::Offline);
    }

    #[test]
    fn ticket_of_other_service() {
        let mut a = ServiceDescriptor::new("a", "u");
        let mut b = ServiceDescriptor::new("b", "u");
        let ta = a.begin_request();
        b.begin_request();
        assert!(!b.finish_request(&ta, true));
    }

    #[test]
    fn probe_merge_is_idempotent() {
        let mut s = ServiceDescriptor::new("mw", "u");
        let probe: ProbeResponse = serde_json::from_str(
            r#"{"name": "Monier-Williams", "short_name": "MW", "css": "b {}",
                "supported_t13ns_query": ["iso"]}"#,
        )
        .unwrap();
        for _ in 0..2 {
            let t = s.begin_request();
            assert!(s.finish_probe(&t, Some(probe.clone())));
        }
        assert_eq!(s.status, ServiceStatus::Online);
        assert_eq!(s.name, "Monier-Williams");
        assert_eq!(s.short_name, "MW");
        assert_eq!(s.css.as_deref(), Some("b {}"));
        assert_eq!(s.supported_query_schemes, vec![LanguageTag::parse("iso")]);
    }

    #[test]
    fn probe_keeps_unreported_fields() {
        let mut s = ServiceDescriptor::new("mw", "u");
        s.name = "Old".into();
        s.merge_probe(ProbeResponse::default());
        assert_eq!(s.name, "Old");
        assert_eq!(s.supported_query_schemes[0].as_str(), "x-iso");
    }
}
