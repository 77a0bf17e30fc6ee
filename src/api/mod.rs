//! UniFFI export layer: host bindings for transliteration and the
//! dictionary client.

mod client;
mod types;

pub use client::SaltClient;
pub use types::{
    SaltArticle, SaltError, SaltHeadword, SaltNegotiated, SaltRendered, SaltSchemeInfo,
    SaltSearchMode, SaltSearchOutcome, SaltServiceInfo, SaltServiceStatus,
};

use std::path::Path;

use salt_core::catalogue;
use salt_core::lang_tag::{self, LanguageTag};
use salt_core::scheme::SchemeRegistry;
use salt_core::settings::settings;
use salt_core::translit::Transliterator;

fn transliterator() -> Transliterator<'static> {
    Transliterator::new(SchemeRegistry::global())
}

fn read_config(path: &str) -> Result<String, SaltError> {
    std::fs::read_to_string(path).map_err(|e| SaltError::Io {
        msg: format!("{path}: {e}"),
    })
}

// ---------------------------------------------------------------------------
// Top-level functions
// ---------------------------------------------------------------------------

#[uniffi::export]
fn engine_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[uniffi::export]
fn transliterate(text: String, from: String, to: String) -> Result<String, SaltError> {
    Ok(transliterator().transliterate(&text, &from, &to)?)
}

/// Display form of `text`: unknown schemes yield the failure marker.
#[uniffi::export]
fn render(text: String, from: String, to: String) -> SaltRendered {
    transliterator().render(&text, &from, &to).into()
}

#[uniffi::export]
fn scheme_of(tag: String) -> String {
    lang_tag::scheme_of(SchemeRegistry::global(), &LanguageTag::parse(&tag)).into()
}

#[uniffi::export]
fn need_transliteration(a: String, b: String) -> bool {
    lang_tag::need_transliteration(
        SchemeRegistry::global(),
        &LanguageTag::parse(&a),
        &LanguageTag::parse(&b),
    )
}

#[uniffi::export]
fn negotiate(text: String, user_scheme: String, remote: Vec<String>) -> Option<SaltNegotiated> {
    salt_core::negotiate::negotiate_with_defaults(&transliterator(), &text, &user_scheme, &remote)
        .map(Into::into)
}

/// Sanitize an HTML fragment and show its headword text in `to`.
#[uniffi::export]
fn transliterate_html(html: String, from: String, to: String) -> SaltRendered {
    let rendered =
        salt_client::render_article(&transliterator(), &html, &from, &to, &settings().article);
    SaltRendered {
        failed: rendered.failure.is_some(),
        text: rendered.html,
    }
}

#[uniffi::export]
fn scheme_catalogue() -> Vec<SaltSchemeInfo> {
    catalogue::catalogue(SchemeRegistry::global())
        .into_iter()
        .map(Into::into)
        .collect()
}

/// Short label of the scheme `tag` denotes, or `und`.
#[uniffi::export]
fn scheme_describe(tag: String) -> String {
    catalogue::describe(SchemeRegistry::global(), &tag).to_string()
}

#[uniffi::export]
fn schemes_load_config(path: String) -> Result<(), SaltError> {
    SchemeRegistry::init_custom(read_config(&path)?)
        .map_err(|e| SaltError::InvalidData { msg: e.to_string() })
}

#[uniffi::export]
fn schemes_default_config() -> String {
    salt_core::scheme::default_toml().to_string()
}

#[uniffi::export]
fn settings_load_config(path: String) -> Result<(), SaltError> {
    salt_core::settings::init_custom(read_config(&path)?)
        .map_err(|e| SaltError::InvalidData { msg: e.to_string() })
}

#[uniffi::export]
fn settings_default_config() -> String {
    salt_core::settings::default_toml().to_string()
}

#[uniffi::export]
fn trace_init(log_dir: String) {
    crate::trace_init::init_tracing(Path::new(&log_dir));
}
