//! Language tags and the schemes they denote.
//!
//! A tag like `sa-x-iso` carries its encoding in the private-use subtag
//! following `x`. Tags without one may still name a Brahmic script
//! (`sa-Deva`); anything else resolves to the undefined scheme `und`.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::scheme::SchemeRegistry;
use crate::unicode::contains_devanagari;

/// Scheme id for "no transliteration possible".
pub const UNDEFINED: &str = "und";

/// Subtag introducing the private-use section.
const PRIVATE_USE: &str = "x";

/// Normalized (lowercase) scheme id, possibly [`UNDEFINED`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct SchemeId(String);

impl SchemeId {
    pub fn new(id: &str) -> Self {
        let id = id.trim();
        if id.is_empty() {
            Self::undefined()
        } else {
            Self(id.to_ascii_lowercase())
        }
    }

    pub fn undefined() -> Self {
        Self(UNDEFINED.to_string())
    }

    pub fn is_undefined(&self) -> bool {
        self.0 == UNDEFINED
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SchemeId {
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}

impl From<SchemeId> for String {
    fn from(id: SchemeId) -> Self {
        id.0
    }
}

impl fmt::Display for SchemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SchemeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for SchemeId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for SchemeId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A hyphen-delimited BCP-47-style tag, kept as written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct LanguageTag(String);

impl LanguageTag {
    pub fn parse(s: &str) -> Self {
        Self(s.trim().to_string())
    }

    /// Tag for `language` text written in `scheme`, e.g. `sa-x-iso`.
    pub fn with_scheme(language: &str, scheme: &SchemeId) -> Self {
        if language.is_empty() {
            Self(format!("{PRIVATE_USE}-{scheme}"))
        } else {
            Self(format!("{language}-{PRIVATE_USE}-{scheme}"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Non-empty subtags in order.
    pub fn subtags(&self) -> impl Iterator<Item = &str> {
        self.0.split('-').filter(|s| !s.is_empty())
    }

    /// The subtag immediately following the private-use marker.
    pub fn private_use(&self) -> Option<&str> {
        let mut subtags = self.subtags();
        subtags.find(|s| s.eq_ignore_ascii_case(PRIVATE_USE))?;
        subtags.next()
    }

    /// The primary language subtag, if the tag does not start with `x`.
    pub fn language(&self) -> Option<&str> {
        self.subtags()
            .next()
            .filter(|s| !s.eq_ignore_ascii_case(PRIVATE_USE))
    }
}

impl FromStr for LanguageTag {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<String> for LanguageTag {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<&str> for LanguageTag {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<LanguageTag> for String {
    fn from(tag: LanguageTag) -> Self {
        tag.0
    }
}

impl AsRef<str> for LanguageTag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The scheme `tag` denotes. Total: unresolvable tags yield [`UNDEFINED`].
///
/// 1. The subtag after `x`, alias-resolved when registered.
/// 2. Else the first subtag naming a Brahmic script (`Deva`, `deva`).
/// 3. Else `und`.
pub fn scheme_of(registry: &SchemeRegistry, tag: &LanguageTag) -> SchemeId {
    if let Some(value) = tag.private_use() {
        return SchemeId::new(&registry.canonical_id(value));
    }
    tag.subtags()
        .find_map(|subtag| registry.brahmic_script(subtag))
        .map(|scheme| SchemeId::new(scheme.id()))
        .unwrap_or_else(SchemeId::undefined)
}

/// Whether text tagged `a` must be transliterated to display as `b`.
pub fn need_transliteration(
    registry: &SchemeRegistry,
    a: &LanguageTag,
    b: &LanguageTag,
) -> bool {
    scheme_of(registry, a) != scheme_of(registry, b)
}

/// Accept either a bare scheme id (`slp1`, `vh`) or a language tag.
///
/// A bare value that is not registered and cannot be a primary language
/// subtag (`klingon`, `hk2`) is kept as an explicit id, so converting
/// with it fails instead of being skipped as undefined.
pub fn normalize_scheme(registry: &SchemeRegistry, raw: &str) -> SchemeId {
    let raw = raw.trim();
    if registry.contains(raw) {
        SchemeId::new(&registry.canonical_id(raw))
    } else if is_bare_scheme_id(raw) {
        SchemeId::new(raw)
    } else {
        scheme_of(registry, &LanguageTag::parse(raw))
    }
}

/// Hyphen-free and not shaped like a language subtag (two or three letters).
fn is_bare_scheme_id(raw: &str) -> bool {
    let language_like =
        (2..=3).contains(&raw.len()) && raw.chars().all(|c| c.is_ascii_alphabetic());
    !raw.is_empty() && !raw.contains('-') && !language_like
}

/// Like [`normalize_scheme`], but when the tag is missing or undefined,
/// Devanagari text is assumed to be in the first Brahmic scheme.
pub fn infer_scheme(registry: &SchemeRegistry, raw: Option<&str>, text: &str) -> SchemeId {
    let id = raw
        .map(|r| normalize_scheme(registry, r))
        .unwrap_or_else(SchemeId::undefined);
    if !id.is_undefined() || !contains_devanagari(text) {
        return id;
    }
    registry
        .iter()
        .find(|s| s.is_brahmic())
        .map(|s| SchemeId::new(s.id()))
        .unwrap_or(id)
}
