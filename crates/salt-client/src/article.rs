//! Article formats and display rendering.

use serde::Serialize;
use tracing::warn;

use salt_core::document::{transliterate_tree_where, DocumentNode};
use salt_core::lang_tag::{normalize_scheme, SchemeId};
use salt_core::scheme::UnknownSchemeError;
use salt_core::settings::ArticleSettings;
use salt_core::translit::Transliterator;

use crate::markup::{Allowlist, Fragment, Node};
use crate::transport::Endpoint;
use crate::types::ArticleFormat;

/// The format to display: the first embeddable one of `mimetype`,
/// otherwise the first listed.
pub fn preferred_format<'a>(
    formats: &'a [ArticleFormat],
    mimetype: &str,
) -> Option<&'a ArticleFormat> {
    formats
        .iter()
        .find(|f| f.embeddable && f.mimetype == mimetype)
        .or_else(|| formats.first())
}

/// First URL of the first canonical format.
pub fn canonical_url(formats: &[ArticleFormat]) -> Option<&str> {
    formats
        .iter()
        .find(|f| f.canonical)
        .and_then(|f| f.urls.first())
        .map(String::as_str)
}

/// An opened article and the endpoints around it.
#[derive(Debug, Clone, Serialize)]
pub struct Article {
    pub service_id: String,
    /// Service-relative path of the article, e.g. `articles/3`.
    pub articles_url: String,
    pub formats: Vec<ArticleFormat>,
    /// Headwords of this article.
    pub headwords: Endpoint,
    /// Headwords around the one the article was opened from.
    pub context: Option<Endpoint>,
}

impl Article {
    pub fn preferred(&self, mimetype: &str) -> Option<&ArticleFormat> {
        preferred_format(&self.formats, mimetype)
    }

    pub fn canonical_url(&self) -> Option<&str> {
        canonical_url(&self.formats)
    }
}

/// Endpoints for the headwords of `articles_url` and the context of
/// `headwords_url`, on a service at `base`.
pub fn related_endpoints(
    base: &str,
    articles_url: &str,
    headwords_url: &str,
    context_limit: usize,
) -> (Endpoint, Option<Endpoint>) {
    let articles_url = articles_url.trim_end_matches('/');
    let headwords = Endpoint::join(base, &format!("{articles_url}/headwords"));
    let context = Some(headwords_url.trim_end_matches('/'))
        .filter(|u| !u.is_empty())
        .map(|u| {
            Endpoint::join(base, &format!("{u}/context")).param("limit", context_limit.to_string())
        });
    (headwords, context)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedArticle {
    pub html: String,
    /// Scheme the selected text is now in.
    pub scheme: SchemeId,
    /// Text leaves rewritten.
    pub converted: usize,
    #[serde(skip)]
    pub failure: Option<UnknownSchemeError>,
}

/// Sanitize `html` and, when `article_scheme` and `user_scheme` differ,
/// transliterate the text inside the configured elements, marking each
/// with the script attribute. Unknown schemes replace that text with
/// the failure marker.
pub fn render_article(
    translit: &Transliterator<'_>,
    html: &str,
    article_scheme: &str,
    user_scheme: &str,
    settings: &ArticleSettings,
) -> RenderedArticle {
    let allow = Allowlist::new(&settings.allowed_tags, &settings.allowed_attributes);
    let mut fragment = Fragment::parse(html, &allow);

    let from = normalize_scheme(translit.registry(), article_scheme);
    let to = normalize_scheme(translit.registry(), user_scheme);
    if from.is_undefined() || to.is_undefined() || from == to {
        return RenderedArticle {
            html: fragment.to_html(),
            scheme: from,
            converted: 0,
            failure: None,
        };
    }

    let everything = settings.transliterate_tags.is_empty();
    let selected = |node: &Node| match node {
        Node::Element(e) => {
            everything
                || settings
                    .transliterate_tags
                    .iter()
                    .any(|t| t.eq_ignore_ascii_case(&e.name))
        }
        Node::Text(_) => everything,
    };
    let mut converted = 0;
    let mut failure = None;
    for child in &mut fragment.children {
        let result = transliterate_tree_where(translit, child, from.as_str(), to.as_str(), |node| {
            if !selected(&*node) {
                return false;
            }
            if let Node::Element(e) = node {
                e.set_attr(&settings.script_attribute, to.as_str());
            }
            true
        });
        match result {
            Ok(n) => converted += n,
            Err(error) => {
                warn!(%from, %to, "article transliteration failed: {error}");
                mark_failed(child, &selected, translit.failure_marker());
                failure = Some(error);
            }
        }
    }
    RenderedArticle {
        html: fragment.to_html(),
        scheme: if failure.is_some() { from } else { to },
        converted,
        failure,
    }
}

fn mark_failed(node: &mut Node, selected: &dyn Fn(&Node) -> bool, marker: &str) {
    if selected(node) {
        let mut first = true;
        replace_text(node, &mut |text| {
            *text = if first { marker.to_string() } else { String::new() };
            first = false;
        });
        return;
    }
    for child in node.children_mut() {
        mark_failed(child, selected, marker);
    }
}

fn replace_text(node: &mut Node, f: &mut dyn FnMut(&mut String)) {
    if let Some(text) = node.text_mut() {
        f(text);
        return;
    }
    for child in node.children_mut() {
        replace_text(child, f);
    }
}
