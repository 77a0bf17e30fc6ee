//! JSON contracts of the dictionary service API.
//!
//! Services disagree on key names and on whether a scheme list is a
//! string or an array; both are normalized here, at the serde boundary.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use salt_core::lang_tag::LanguageTag;

/// Query schemes assumed for a service that has not said otherwise.
pub const DEFAULT_QUERY_SCHEMES: &[&str] = &["x-iso"];

pub(crate) fn default_query_schemes() -> Vec<LanguageTag> {
    DEFAULT_QUERY_SCHEMES
        .iter()
        .map(|s| LanguageTag::parse(s))
        .collect()
}

/// One entry of the service list.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceEntry {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub short_name: String,
    #[serde(default)]
    pub main_page_url: String,
    #[serde(default)]
    pub css: String,
    #[serde(
        default = "default_query_schemes",
        alias = "supported_langs_query",
        alias = "supported_t13ns_query",
        deserialize_with = "one_or_many"
    )]
    pub supported_query_schemes: Vec<LanguageTag>,
}

/// Response of a service's `v1` capability endpoint.
///
/// Non-string values of the string fields are ignored rather than rejected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProbeResponse {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub short_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub main_page_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub css: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub css_url: Option<String>,
    #[serde(
        default,
        alias = "supported_langs_query",
        alias = "supported_t13ns_query",
        deserialize_with = "optional_one_or_many"
    )]
    pub supported_query_schemes: Option<Vec<LanguageTag>>,
}

/// A search result or context entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headword {
    pub text: String,
    /// Lowercased plain form, used when the headword is adopted as a query.
    #[serde(default)]
    pub normalized_text: String,
    /// Scheme of `text`, as a tag (`sa-x-iso`) or a bare id (`iso`).
    #[serde(default, alias = "t13n", alias = "scheme")]
    pub lang: Option<String>,
    #[serde(default, alias = "article_url")]
    pub articles_url: String,
    #[serde(default, alias = "url")]
    pub headwords_url: String,
    #[serde(default)]
    pub dictionary_id: Option<String>,
}

impl Headword {
    /// The text to put in a query box.
    pub fn query_text(&self) -> &str {
        if self.normalized_text.is_empty() {
            &self.text
        } else {
            &self.normalized_text
        }
    }
}

/// One available rendition of an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleFormat {
    pub mimetype: String,
    #[serde(default)]
    pub embeddable: bool,
    #[serde(default)]
    pub canonical: bool,
    #[serde(default, alias = "t13n", alias = "scheme")]
    pub lang: Option<String>,
    #[serde(default)]
    pub urls: Vec<String>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl From<OneOrMany> for Vec<LanguageTag> {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::One(s) => vec![LanguageTag::parse(&s)],
            OneOrMany::Many(v) => v.iter().map(|s| LanguageTag::parse(s)).collect(),
        }
    }
}

fn one_or_many<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<LanguageTag>, D::Error> {
    OneOrMany::deserialize(de).map(Into::into)
}

fn optional_one_or_many<'de, D: Deserializer<'de>>(
    de: D,
) -> Result<Option<Vec<LanguageTag>>, D::Error> {
    Option::<OneOrMany>::deserialize(de).map(|v| v.map(Into::into))
}

fn lenient_string<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(v: &[LanguageTag]) -> Vec<&str> {
        v.iter().map(LanguageTag::as_str).collect()
    }

    #[test]
    fn service_entry_defaults() {
        let e: ServiceEntry =
            serde_json::from_str(r#"{"id": "mw", "url": "https://example.org/mw/"}"#).unwrap();
        assert_eq!(e.name, "");
        assert_eq!(tags(&e.supported_query_schemes), ["x-iso"]);
    }

    #[test]
    fn service_entry_legacy_key_and_single_string() {
        let e: ServiceEntry = serde_json::from_str(
            r#"{"id": "mw", "url": "u", "supported_langs_query": "x-slp1"}"#,
        )
        .unwrap();
        assert_eq!(tags(&e.supported_query_schemes), ["x-slp1"]);
    }

    #[test]
    fn probe_accepts_all_scheme_keys() {
        for key in [
            "supported_query_schemes",
            "supported_langs_query",
            "supported_t13ns_query",
        ] {
            let json = format!(r#"{{"{key}": ["iso", "x-hk"]}}"#);
            let p: ProbeResponse = serde_json::from_str(&json).unwrap();
            assert_eq!(tags(&p.supported_query_schemes.unwrap()), ["iso", "x-hk"]);
        }
    }

    #[test]
    fn probe_ignores_non_string_values() {
        let p: ProbeResponse = serde_json::from_str(
            r#"{"name": "Monier-Williams", "short_name": 3, "css": null, "extra": {"a": 1}}"#,
        )
        .unwrap();
        assert_eq!(p.name.as_deref(), Some("Monier-Williams"));
        assert_eq!(p.short_name, None);
        assert_eq!(p.css, None);
        assert_eq!(p.supported_query_schemes, None);
    }

    #[test]
    fn headword_server_spelling() {
        let h: Headword = serde_json::from_str(
            r#"{"url": "headwords/7", "text": "Rāma", "normalized_text": "rāma",
                "article_url": "articles/3", "t13n": "iso"}"#,
        )
        .unwrap();
        assert_eq!(h.headwords_url, "headwords/7");
        assert_eq!(h.articles_url, "articles/3");
        assert_eq!(h.lang.as_deref(), Some("iso"));
        assert_eq!(h.query_text(), "rāma");
    }

    #[test]
    fn headword_query_text_falls_back() {
        let h: Headword = serde_json::from_str(r#"{"text": "राम"}"#).unwrap();
        assert_eq!(h.query_text(), "राम");
    }

    #[test]
    fn article_formats() {
        let formats: Vec<ArticleFormat> = serde_json::from_str(
            r#"[
                {"mimetype": "text/x-html-literal", "t13n": "iso", "embeddable": true,
                 "text": "<div>x</div>"},
                {"mimetype": "text/html", "t13n": "iso", "canonical": true,
                 "urls": ["https://example.org/search?article_id=3"]}
            ]"#,
        )
        .unwrap();
        assert!(formats[0].embeddable && !formats[0].canonical);
        assert!(formats[1].canonical && formats[1].text.is_none());
        assert_eq!(formats[1].urls.len(), 1);
    }
}
