use std::collections::BTreeMap;

use serde::Deserialize;

use super::SchemeKind;

#[derive(Deserialize)]
struct SchemeFile {
    #[serde(default)]
    scheme: Vec<SchemeDef>,
}

/// A scheme as written in TOML, before validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemeDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    pub kind: SchemeKind,
    #[serde(default)]
    pub script: Option<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub fold_case: bool,
    pub vowels: Vec<String>,
    #[serde(default)]
    pub vowel_marks: Vec<String>,
    pub other_marks: Vec<String>,
    #[serde(default)]
    pub virama: String,
    pub consonants: Vec<String>,
    pub symbols: Vec<String>,
    /// Canonical grapheme -> extra spellings accepted on input.
    #[serde(default)]
    pub alternates: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, thiserror::Error)]
pub enum SchemeConfigError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("no [[scheme]] entries")]
    Empty,
    #[error("scheme id must not be empty")]
    EmptyId,
    #[error("duplicate scheme id or alias: {0}")]
    DuplicateId(String),
    #[error("{scheme}: {group} has {found} entries, expected {expected}")]
    Misaligned {
        scheme: String,
        group: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("{0}: brahmic scheme needs a virama")]
    MissingVirama(String),
    #[error("{0}: roman schemes derive vowel marks and virama")]
    RomanMarks(String),
    #[error("{0}: first vowel (the inherent vowel) must not be empty")]
    MissingInherentVowel(String),
    #[error("{scheme}: grapheme {grapheme:?} appears more than once")]
    DuplicateGrapheme { scheme: String, grapheme: String },
    #[error("{scheme}: alternate given for unknown grapheme {grapheme:?}")]
    UnknownAlternate { scheme: String, grapheme: String },
    #[error("no {0} scheme defined")]
    MissingKind(SchemeKind),
    #[error("scheme registry already initialized")]
    AlreadyInitialized,
}

/// Parse TOML text into scheme definitions, in file order.
///
/// Only the syntax is checked here; alphabet validation happens when the
/// definitions are registered.
pub fn parse_schemes_toml(toml_str: &str) -> Result<Vec<SchemeDef>, SchemeConfigError> {
    let file: SchemeFile =
        toml::from_str(toml_str).map_err(|e| SchemeConfigError::Parse(e.to_string()))?;
    if file.scheme.is_empty() {
        return Err(SchemeConfigError::Empty);
    }
    Ok(file.scheme)
}
