use salt_client::{
    ClientError, Headword, RenderedArticle, SearchMode, SearchOutcome, ServiceDescriptor,
    ServiceStatus, Suppressed,
};
use salt_core::catalogue::CatalogueEntry;
use salt_core::negotiate::Negotiated;
use salt_core::scheme::UnknownSchemeError;
use salt_core::translit::Rendered;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum SaltError {
    #[error("IO error: {msg}")]
    Io { msg: String },
    #[error("invalid data: {msg}")]
    InvalidData { msg: String },
    #[error("unknown scheme: {msg}")]
    UnknownScheme { msg: String },
    #[error("network error: {msg}")]
    Network { msg: String },
}

impl From<UnknownSchemeError> for SaltError {
    fn from(e: UnknownSchemeError) -> Self {
        SaltError::UnknownScheme { msg: e.0 }
    }
}

impl From<ClientError> for SaltError {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::Http(msg) => SaltError::Network { msg },
            ClientError::Scheme(e) => e.into(),
            other => SaltError::InvalidData {
                msg: other.to_string(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Converted text, or the failure marker when a scheme was unknown.
#[derive(Clone, uniffi::Record)]
pub struct SaltRendered {
    pub text: String,
    pub failed: bool,
}

impl From<Rendered> for SaltRendered {
    fn from(r: Rendered) -> Self {
        let failed = r.is_failure();
        Self {
            text: r.into_text(),
            failed,
        }
    }
}

#[derive(Clone, uniffi::Record)]
pub struct SaltNegotiated {
    pub text: String,
    pub scheme: String,
    pub transliterated: bool,
}

impl From<Negotiated> for SaltNegotiated {
    fn from(n: Negotiated) -> Self {
        Self {
            text: n.text,
            scheme: n.scheme.into(),
            transliterated: n.transliterated,
        }
    }
}

#[derive(Clone, uniffi::Record)]
pub struct SaltSchemeInfo {
    pub tag: String,
    pub scheme: String,
    pub label: String,
    pub name: String,
}

impl From<CatalogueEntry> for SaltSchemeInfo {
    fn from(e: CatalogueEntry) -> Self {
        Self {
            tag: e.tag.into(),
            scheme: e.scheme.into(),
            label: e.label,
            name: e.name,
        }
    }
}

#[derive(Clone, uniffi::Record)]
pub struct SaltServiceInfo {
    pub id: String,
    pub url: String,
    pub status: SaltServiceStatus,
    pub selected: bool,
    pub name: String,
    pub short_name: String,
    pub main_page_url: String,
    pub css: Option<String>,
    pub supported_query_schemes: Vec<String>,
}

impl From<&ServiceDescriptor> for SaltServiceInfo {
    fn from(s: &ServiceDescriptor) -> Self {
        Self {
            id: s.id.clone(),
            url: s.url.clone(),
            status: s.status.into(),
            selected: s.selected,
            name: s.name.clone(),
            short_name: s.short_name.clone(),
            main_page_url: s.main_page_url.clone(),
            css: s.css.clone(),
            supported_query_schemes: s
                .supported_query_schemes
                .iter()
                .map(|t| t.as_str().to_string())
                .collect(),
        }
    }
}

#[derive(Clone, uniffi::Record)]
pub struct SaltHeadword {
    pub text: String,
    pub normalized_text: String,
    pub lang: Option<String>,
    pub articles_url: String,
    pub headwords_url: String,
}

impl From<Headword> for SaltHeadword {
    fn from(h: Headword) -> Self {
        Self {
            text: h.text,
            normalized_text: h.normalized_text,
            lang: h.lang,
            articles_url: h.articles_url,
            headwords_url: h.headwords_url,
        }
    }
}

impl From<SaltHeadword> for Headword {
    fn from(h: SaltHeadword) -> Self {
        Self {
            text: h.text,
            normalized_text: h.normalized_text,
            lang: h.lang,
            articles_url: h.articles_url,
            headwords_url: h.headwords_url,
            dictionary_id: None,
        }
    }
}

/// An article rendered for display.
#[derive(Clone, uniffi::Record)]
pub struct SaltArticle {
    pub service_id: String,
    pub canonical_url: Option<String>,
    pub html: String,
    /// Scheme the headword text is shown in.
    pub scheme: String,
    pub failed: bool,
}

impl SaltArticle {
    pub(super) fn new(
        service_id: &str,
        canonical_url: Option<&str>,
        rendered: RenderedArticle,
    ) -> Self {
        Self {
            service_id: service_id.to_string(),
            canonical_url: canonical_url.map(str::to_string),
            html: rendered.html,
            scheme: rendered.scheme.into(),
            failed: rendered.failure.is_some(),
        }
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, uniffi::Enum)]
pub enum SaltServiceStatus {
    Unknown,
    Busy,
    Online,
    Offline,
}

impl From<ServiceStatus> for SaltServiceStatus {
    fn from(s: ServiceStatus) -> Self {
        match s {
            ServiceStatus::Unknown => SaltServiceStatus::Unknown,
            ServiceStatus::Busy => SaltServiceStatus::Busy,
            ServiceStatus::Online => SaltServiceStatus::Online,
            ServiceStatus::Offline => SaltServiceStatus::Offline,
        }
    }
}

#[derive(Clone, Copy, uniffi::Enum)]
pub enum SaltSearchMode {
    Headword,
    Fulltext,
}

impl From<SaltSearchMode> for SearchMode {
    fn from(m: SaltSearchMode) -> Self {
        match m {
            SaltSearchMode::Headword => SearchMode::Headword,
            SaltSearchMode::Fulltext => SearchMode::Fulltext,
        }
    }
}

#[derive(uniffi::Enum)]
pub enum SaltSearchOutcome {
    Found {
        service_id: String,
        headwords: Vec<SaltHeadword>,
    },
    Failed {
        service_id: String,
        msg: String,
    },
    /// No request was sent; `reason` is `empty_query`,
    /// `no_common_scheme` or `unavailable`.
    Suppressed { service_id: String, reason: String },
}

fn suppressed_name(reason: Suppressed) -> &'static str {
    match reason {
        Suppressed::EmptyQuery => "empty_query",
        Suppressed::NoCommonScheme => "no_common_scheme",
        Suppressed::Unavailable => "unavailable",
    }
}

impl From<SearchOutcome> for SaltSearchOutcome {
    fn from(o: SearchOutcome) -> Self {
        match o {
            SearchOutcome::Found {
                service_id,
                headwords,
            } => SaltSearchOutcome::Found {
                service_id,
                headwords: headwords.into_iter().map(Into::into).collect(),
            },
            SearchOutcome::Failed { service_id, error } => SaltSearchOutcome::Failed {
                service_id,
                msg: error.to_string(),
            },
            SearchOutcome::Suppressed { service_id, reason } => SaltSearchOutcome::Suppressed {
                service_id,
                reason: suppressed_name(reason).to_string(),
            },
        }
    }
}
