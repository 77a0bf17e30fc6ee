//! Turning a user query into per-service headword requests.

use serde::Serialize;
use tracing::{debug, warn};

use salt_core::lang_tag::{normalize_scheme, SchemeId};
use salt_core::negotiate::{negotiate, Negotiated};
use salt_core::scheme::SchemeRegistry;
use salt_core::translit::Transliterator;

use crate::error::ClientError;
use crate::service::ServiceDescriptor;
use crate::transport::Endpoint;
use crate::types::Headword;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Match headwords.
    #[default]
    Headword,
    /// Match article text.
    Fulltext,
}

impl SearchMode {
    /// Query parameter carrying the search text.
    pub fn param(self) -> &'static str {
        match self {
            SearchMode::Headword => "q",
            SearchMode::Fulltext => "fulltext",
        }
    }
}

/// Why no request was sent to a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Suppressed {
    /// The query is empty (possibly after transliteration).
    EmptyQuery,
    /// The service accepts none of the preferred schemes.
    NoCommonScheme,
    /// The service is not online.
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PlannedSearch {
    Send {
        service_id: String,
        endpoint: Endpoint,
        query: Negotiated,
    },
    Suppressed {
        service_id: String,
        reason: Suppressed,
    },
}

impl PlannedSearch {
    pub fn service_id(&self) -> &str {
        match self {
            PlannedSearch::Send { service_id, .. }
            | PlannedSearch::Suppressed { service_id, .. } => service_id,
        }
    }
}

/// Result of a search, attributed to the service that produced it.
#[derive(Debug)]
pub enum SearchOutcome {
    Found {
        service_id: String,
        headwords: Vec<Headword>,
    },
    Failed {
        service_id: String,
        error: ClientError,
    },
    Suppressed {
        service_id: String,
        reason: Suppressed,
    },
}

impl SearchOutcome {
    pub fn service_id(&self) -> &str {
        match self {
            SearchOutcome::Found { service_id, .. }
            | SearchOutcome::Failed { service_id, .. }
            | SearchOutcome::Suppressed { service_id, .. } => service_id,
        }
    }
}

/// Everything a search needs besides the services.
#[derive(Debug, Clone, Copy)]
pub struct SearchQuery<'a> {
    pub text: &'a str,
    /// User's query scheme: a tag or a bare id.
    pub scheme: &'a str,
    pub mode: SearchMode,
    pub limit: usize,
}

/// Plan one request per selected service, in service order.
pub fn plan_search<P: AsRef<str>>(
    translit: &Transliterator<'_>,
    services: &[ServiceDescriptor],
    query: &SearchQuery<'_>,
    preference: &[P],
) -> Vec<PlannedSearch> {
    services
        .iter()
        .filter(|s| s.selected)
        .map(|service| plan_one(translit, service, query, preference))
        .collect()
}

fn plan_one<P: AsRef<str>>(
    translit: &Transliterator<'_>,
    service: &ServiceDescriptor,
    query: &SearchQuery<'_>,
    preference: &[P],
) -> PlannedSearch {
    let suppressed = |reason| {
        warn!(service = %service.id, ?reason, "search suppressed");
        PlannedSearch::Suppressed {
            service_id: service.id.clone(),
            reason,
        }
    };
    if !service.is_online() {
        return suppressed(Suppressed::Unavailable);
    }
    let Some(negotiated) = negotiate(
        translit,
        query.text.trim(),
        query.scheme,
        &service.supported_query_schemes,
        preference,
    ) else {
        return suppressed(Suppressed::NoCommonScheme);
    };
    if negotiated.text.trim().is_empty() {
        return suppressed(Suppressed::EmptyQuery);
    }
    let endpoint = service
        .endpoint("v1/headwords")
        .param(query.mode.param(), negotiated.text.as_str())
        .param("lang", declared_spelling(translit.registry(), service, &negotiated.scheme))
        .param("limit", query.limit.to_string());
    debug!(service = %service.id, %endpoint, "search planned");
    PlannedSearch::Send {
        service_id: service.id.clone(),
        endpoint,
        query: negotiated,
    }
}

/// The scheme value as `service` declared it, so `x-vh` is sent back as
/// `vh` rather than the canonical `velthuis`.
fn declared_spelling<'s>(
    registry: &SchemeRegistry,
    service: &'s ServiceDescriptor,
    scheme: &'s SchemeId,
) -> &'s str {
    service
        .supported_query_schemes
        .iter()
        .find(|tag| normalize_scheme(registry, tag.as_str()) == *scheme)
        .and_then(|tag| {
            tag.private_use()
                .or_else(|| (!tag.as_str().contains('-')).then_some(tag.as_str()))
        })
        .unwrap_or(scheme.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use salt_core::lang_tag::LanguageTag;
    use salt_core::scheme::SchemeRegistry;

    const PREFERENCE: &[&str] = &["deva", "iso", "slp1", "hk"];

    fn online(id: &str, schemes: &[&str]) -> ServiceDescriptor {
        let mut s = ServiceDescriptor::new(id, &format!("https://a.org/{id}/"));
        s.selected = true;
        s.status = crate::service::ServiceStatus::Online;
        s.supported_query_schemes = schemes.iter().map(|t| LanguageTag::parse(t)).collect();
        s
    }

    fn query(text: &str) -> SearchQuery<'_> {
        SearchQuery {
            text,
            scheme: "x-iso",
            mode: SearchMode::Headword,
            limit: 100,
        }
    }

    #[test]
    fn plans_per_service_with_negotiated_scheme() {
        let reg = SchemeRegistry::builtin();
        let t = Transliterator::new(&reg);
        let services = [online("mw", &["x-iso"]), online("ap", &["x-slp1", "x-hk"])];
        let plan = plan_search(&t, &services, &query("rāma"), PREFERENCE);
        assert_eq!(plan.len(), 2);

        let PlannedSearch::Send { endpoint, .. } = &plan[0] else {
            panic!("expected a request: {plan:?}");
        };
        assert_eq!(endpoint.url, "https://a.org/mw/v1/headwords");
        assert_eq!(endpoint.get_param("q"), Some("rāma"));
        assert_eq!(endpoint.get_param("lang"), Some("iso"));
        assert_eq!(endpoint.get_param("limit"), Some("100"));

        let PlannedSearch::Send { endpoint, query, .. } = &plan[1] else {
            panic!("expected a request: {plan:?}");
        };
        assert_eq!(endpoint.get_param("q"), Some("rAma"));
        assert_eq!(endpoint.get_param("lang"), Some("slp1"));
        assert!(query.transliterated);
    }

    #[test]
    fn lang_uses_the_declared_spelling() {
        let reg = SchemeRegistry::builtin();
        let t = Transliterator::new(&reg);
        let q = SearchQuery {
            scheme: "x-hk",
            ..query("kRSNa")
        };
        let services = [online("v", &["x-vh"]), online("s", &["SLP1"])];
        let plan = plan_search(&t, &services, &q, &["velthuis", "slp1"]);

        let PlannedSearch::Send { endpoint, query, .. } = &plan[0] else {
            panic!("expected a request: {plan:?}");
        };
        assert_eq!(endpoint.get_param("q"), Some("k.r.s.na"));
        assert_eq!(endpoint.get_param("lang"), Some("vh"));
        assert_eq!(query.scheme, "velthuis");

        let PlannedSearch::Send { endpoint, .. } = &plan[1] else {
            panic!("expected a request: {plan:?}");
        };
        assert_eq!(endpoint.get_param("lang"), Some("SLP1"));
    }

    #[test]
    fn fulltext_mode_uses_its_parameter() {
        let reg = SchemeRegistry::builtin();
        let t = Transliterator::new(&reg);
        let q = SearchQuery {
            mode: SearchMode::Fulltext,
            ..query("agni")
        };
        let plan = plan_search(&t, &[online("mw", &["x-iso"])], &q, PREFERENCE);
        let PlannedSearch::Send { endpoint, .. } = &plan[0] else {
            panic!("expected a request");
        };
        assert_eq!(endpoint.get_param("fulltext"), Some("agni"));
        assert_eq!(endpoint.get_param("q"), None);
    }

    #[test]
    fn unselected_services_are_skipped() {
        let reg = SchemeRegistry::builtin();
        let t = Transliterator::new(&reg);
        let mut off = online("mw", &["x-iso"]);
        off.selected = false;
        assert!(plan_search(&t, &[off], &query("rāma"), PREFERENCE).is_empty());
    }

    #[test]
    fn suppressed_outcomes() {
        let reg = SchemeRegistry::builtin();
        let t = Transliterator::new(&reg);
        let mut offline = online("off", &["x-iso"]);
        offline.status = crate::service::ServiceStatus::Offline;
        let services = [online("mw", &["x-wx"]), offline];

        let plan = plan_search(&t, &services, &query("rāma"), PREFERENCE);
        assert_eq!(
            plan,
            [
                PlannedSearch::Suppressed {
                    service_id: "mw".into(),
                    reason: Suppressed::NoCommonScheme
                },
                PlannedSearch::Suppressed {
                    service_id: "off".into(),
                    reason: Suppressed::Unavailable
                },
            ]
        );

        let plan = plan_search(&t, &[online("mw", &["x-iso"])], &query("  "), PREFERENCE);
        assert_eq!(plan[0].service_id(), "mw");
        assert!(matches!(
            plan[0],
            PlannedSearch::Suppressed {
                reason: Suppressed::EmptyQuery,
                ..
            }
        ));
    }
}
