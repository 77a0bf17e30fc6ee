//! String transliteration between registered schemes.
//!
//! Text is tokenized greedily against the source scheme's graphemes
//! (longest match first) and each grapheme is replaced by the target
//! grapheme at the same table position, adding or dropping viramas and
//! inherent vowels between Brahmic and Roman schemes.

mod convert;
mod trie;

#[cfg(test)]
mod tests;

pub(crate) use convert::convert;
pub use trie::{GraphemeTrie, TrieLookupResult};

use tracing::{debug_span, warn};

use crate::lang_tag::{normalize_scheme, SchemeId};
use crate::scheme::{Scheme, SchemeRegistry, UnknownSchemeError};
use crate::settings::settings;

/// Outcome of a user-facing transliteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Converted(String),
    /// Source and target are the same scheme, or either is undefined.
    Unchanged(String),
    /// A scheme could not be resolved; `marker` stands in for the text.
    Failed {
        marker: String,
        error: UnknownSchemeError,
    },
}

impl Rendered {
    /// Text to display: the conversion, the original, or the failure marker.
    pub fn text(&self) -> &str {
        match self {
            Rendered::Converted(s) | Rendered::Unchanged(s) => s,
            Rendered::Failed { marker, .. } => marker,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Rendered::Converted(s) | Rendered::Unchanged(s) => s,
            Rendered::Failed { marker, .. } => marker,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Rendered::Failed { .. })
    }
}

/// Converts text between the schemes of one registry.
#[derive(Debug, Clone)]
pub struct Transliterator<'r> {
    registry: &'r SchemeRegistry,
    failure_marker: String,
}

impl<'r> Transliterator<'r> {
    /// A transliterator using the configured failure marker.
    pub fn new(registry: &'r SchemeRegistry) -> Self {
        Self {
            registry,
            failure_marker: settings().transliteration.failure_marker.clone(),
        }
    }

    pub fn with_failure_marker(mut self, marker: impl Into<String>) -> Self {
        self.failure_marker = marker.into();
        self
    }

    pub fn registry(&self) -> &'r SchemeRegistry {
        self.registry
    }

    pub fn failure_marker(&self) -> &str {
        &self.failure_marker
    }

    /// Resolve both explicit ids; `None` when they name the same scheme.
    pub(crate) fn resolve_pair(
        &self,
        from: &str,
        to: &str,
    ) -> Result<Option<(&'r Scheme, &'r Scheme)>, UnknownSchemeError> {
        let from = self.registry.resolve(from)?;
        let to = self.registry.resolve(to)?;
        if from.id() == to.id() {
            Ok(None)
        } else {
            Ok(Some((from, to)))
        }
    }

    /// Convert `text` between two explicit scheme ids (or aliases).
    ///
    /// Identical schemes return the input unchanged, without case folding.
    pub fn transliterate(
        &self,
        text: &str,
        from: &str,
        to: &str,
    ) -> Result<String, UnknownSchemeError> {
        let _span = debug_span!("transliterate", from, to).entered();
        Ok(match self.resolve_pair(from, to)? {
            Some((from, to)) => convert(text, from, to),
            None => text.to_string(),
        })
    }

    /// Convert `text` for display, where `from` and `to` are language tags
    /// or bare scheme ids. Never fails: an undefined scheme leaves the text
    /// as is and an unknown one yields the failure marker.
    pub fn render(&self, text: &str, from: &str, to: &str) -> Rendered {
        let from = normalize_scheme(self.registry, from);
        let to = normalize_scheme(self.registry, to);
        self.render_schemes(text, &from, &to)
    }

    pub fn render_schemes(&self, text: &str, from: &SchemeId, to: &SchemeId) -> Rendered {
        if from.is_undefined() || to.is_undefined() || from == to {
            return Rendered::Unchanged(text.to_string());
        }
        match self.transliterate(text, from.as_str(), to.as_str()) {
            Ok(converted) => Rendered::Converted(converted),
            Err(error) => {
                warn!(%from, %to, "transliteration failed: {error}");
                Rendered::Failed {
                    marker: self.failure_marker.clone(),
                    error,
                }
            }
        }
    }
}

/// Convert `text` between two explicit scheme ids of `registry`.
pub fn transliterate(
    registry: &SchemeRegistry,
    text: &str,
    from: &str,
    to: &str,
) -> Result<String, UnknownSchemeError> {
    Transliterator::new(registry).transliterate(text, from, to)
}
