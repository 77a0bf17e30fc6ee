//! Client for remote multi-script dictionary services.
//!
//! `ClientSession` keeps the list of services and their availability, the
//! user's query and display schemes, and the open article. Queries are
//! negotiated per service into a scheme it accepts; articles are sanitized
//! and their headword text shown in the user's scheme. I/O goes through a
//! [`Transport`], so hosts may supply their own.

mod article;
mod error;
mod markup;
mod search;
mod service;
mod session;
mod transport;
mod types;

#[cfg(test)]
mod tests;

pub use article::{
    canonical_url, preferred_format, related_endpoints, render_article, Article, RenderedArticle,
};
pub use error::ClientError;
pub use markup::{decode_entities, Allowlist, Element, Fragment, Node};
pub use search::{plan_search, PlannedSearch, SearchMode, SearchOutcome, SearchQuery, Suppressed};
pub use service::{parse_service_list, RequestTicket, ServiceDescriptor, ServiceStatus};
pub use session::{ClientSession, UserPrefs};
pub use transport::{get_json, Endpoint, HttpTransport, Transport};
pub use types::{ArticleFormat, Headword, ProbeResponse, ServiceEntry, DEFAULT_QUERY_SCHEMES};
