//! Transliteration schemes and the registry that holds them.
//!
//! A scheme is a positional alphabet table: entry `i` of a group denotes
//! the same phoneme in every registered scheme, which is what makes
//! conversion between any two schemes a table lookup.

mod config;
mod registry;

pub use config::{parse_schemes_toml, SchemeConfigError, SchemeDef};
pub use registry::{default_toml, SchemeRegistry};

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

use crate::translit::{GraphemeTrie, TrieLookupResult};

/// An explicit scheme id that is not registered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown scheme: {0}")]
pub struct UnknownSchemeError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemeKind {
    /// Consonants carry an inherent vowel unless a virama follows.
    Brahmic,
    /// Every vowel is written explicitly.
    Roman,
}

impl fmt::Display for SchemeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemeKind::Brahmic => f.write_str("brahmic"),
            SchemeKind::Roman => f.write_str("roman"),
        }
    }
}

/// Alphabet group of a grapheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    Vowel,
    VowelMark,
    OtherMark,
    Virama,
    Consonant,
    Symbol,
}

impl Group {
    pub fn name(self) -> &'static str {
        match self {
            Group::Vowel => "vowels",
            Group::VowelMark => "vowel_marks",
            Group::OtherMark => "other_marks",
            Group::Virama => "virama",
            Group::Consonant => "consonants",
            Group::Symbol => "symbols",
        }
    }
}

/// Position of a grapheme in the shared phoneme order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot {
    pub group: Group,
    pub index: usize,
}

impl Slot {
    pub const fn new(group: Group, index: usize) -> Self {
        Self { group, index }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    vowels: Vec<String>,
    vowel_marks: Vec<String>,
    other_marks: Vec<String>,
    virama: String,
    consonants: Vec<String>,
    symbols: Vec<String>,
}

impl Alphabet {
    pub fn vowels(&self) -> &[String] {
        &self.vowels
    }

    /// Dependent vowel signs, aligned with `vowels[1..]`.
    pub fn vowel_marks(&self) -> &[String] {
        &self.vowel_marks
    }

    pub fn other_marks(&self) -> &[String] {
        &self.other_marks
    }

    pub fn virama(&self) -> &str {
        &self.virama
    }

    pub fn consonants(&self) -> &[String] {
        &self.consonants
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// The grapheme at `slot`, or `""` when the scheme cannot write it.
    pub fn grapheme(&self, slot: Slot) -> &str {
        let group = match slot.group {
            Group::Virama => return &self.virama,
            Group::Vowel => &self.vowels,
            Group::VowelMark => &self.vowel_marks,
            Group::OtherMark => &self.other_marks,
            Group::Consonant => &self.consonants,
            Group::Symbol => &self.symbols,
        };
        group.get(slot.index).map(String::as_str).unwrap_or("")
    }

    /// Group sizes, used to check that schemes stay positionally aligned.
    pub(crate) fn shape(&self) -> [(Group, usize); 5] {
        [
            (Group::Vowel, self.vowels.len()),
            (Group::VowelMark, self.vowel_marks.len()),
            (Group::OtherMark, self.other_marks.len()),
            (Group::Consonant, self.consonants.len()),
            (Group::Symbol, self.symbols.len()),
        ]
    }

    /// Every `(slot, grapheme)` pair the scheme can write.
    fn entries(&self) -> impl Iterator<Item = (Slot, &str)> {
        let groups: [(Group, &[String]); 5] = [
            (Group::Vowel, &self.vowels),
            (Group::VowelMark, &self.vowel_marks),
            (Group::OtherMark, &self.other_marks),
            (Group::Consonant, &self.consonants),
            (Group::Symbol, &self.symbols),
        ];
        groups
            .into_iter()
            .flat_map(|(group, items)| {
                items
                    .iter()
                    .enumerate()
                    .map(move |(index, g)| (Slot::new(group, index), g.as_str()))
            })
            .chain(std::iter::once((Slot::new(Group::Virama, 0), self.virama.as_str())))
            .filter(|(_, g)| !g.is_empty())
    }
}

/// One registered writing-system encoding. Immutable once built.
#[derive(Debug)]
pub struct Scheme {
    id: String,
    name: String,
    label: String,
    kind: SchemeKind,
    script: Option<String>,
    aliases: Vec<String>,
    fold_case: bool,
    alphabet: Alphabet,
    tokens: GraphemeTrie<Slot>,
}

impl Scheme {
    /// Validate a definition and build its tokenizer.
    pub fn from_def(def: SchemeDef) -> Result<Self, SchemeConfigError> {
        let id = def.id.trim().to_ascii_lowercase();
        if id.is_empty() {
            return Err(SchemeConfigError::EmptyId);
        }

        let alphabet = match def.kind {
            SchemeKind::Brahmic => {
                if def.virama.is_empty() {
                    return Err(SchemeConfigError::MissingVirama(id));
                }
                let expected = def.vowels.len().saturating_sub(1);
                if def.vowel_marks.len() != expected {
                    return Err(SchemeConfigError::Misaligned {
                        scheme: id,
                        group: Group::VowelMark.name(),
                        expected,
                        found: def.vowel_marks.len(),
                    });
                }
                Alphabet {
                    vowels: def.vowels,
                    vowel_marks: def.vowel_marks,
                    other_marks: def.other_marks,
                    virama: def.virama,
                    consonants: def.consonants,
                    symbols: def.symbols,
                }
            }
            SchemeKind::Roman => {
                if !def.vowel_marks.is_empty() || !def.virama.is_empty() {
                    return Err(SchemeConfigError::RomanMarks(id));
                }
                Alphabet {
                    vowel_marks: def.vowels.iter().skip(1).cloned().collect(),
                    vowels: def.vowels,
                    other_marks: def.other_marks,
                    virama: String::new(),
                    consonants: def.consonants,
                    symbols: def.symbols,
                }
            }
        };

        if alphabet.vowels.first().map_or(true, |a| a.is_empty()) {
            return Err(SchemeConfigError::MissingInherentVowel(id));
        }

        let mut spellings: BTreeMap<&str, Slot> = BTreeMap::new();
        for (slot, grapheme) in alphabet.entries() {
            // Roman vowel marks duplicate the vowels; only vowels are tokens.
            if def.kind == SchemeKind::Roman && slot.group == Group::VowelMark {
                continue;
            }
            if spellings.insert(grapheme, slot).is_some() {
                return Err(SchemeConfigError::DuplicateGrapheme {
                    scheme: id,
                    grapheme: grapheme.to_string(),
                });
            }
        }
        let canonical = spellings.clone();
        for (grapheme, alternates) in &def.alternates {
            let Some(&slot) = canonical.get(grapheme.as_str()) else {
                return Err(SchemeConfigError::UnknownAlternate {
                    scheme: id,
                    grapheme: grapheme.clone(),
                });
            };
            for spelling in alternates.iter().filter(|s| !s.is_empty()) {
                if spellings.insert(spelling, slot).is_some() {
                    return Err(SchemeConfigError::DuplicateGrapheme {
                        scheme: id,
                        grapheme: spelling.clone(),
                    });
                }
            }
        }
        let tokens = GraphemeTrie::build(&spellings);

        Ok(Self {
            label: def.label.unwrap_or_else(|| id.clone()),
            aliases: def
                .aliases
                .iter()
                .map(|a| a.trim().to_ascii_lowercase())
                .filter(|a| !a.is_empty())
                .collect(),
            id,
            name: def.name,
            kind: def.kind,
            script: def.script,
            fold_case: def.fold_case,
            alphabet,
            tokens,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Short label for scheme menus.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> SchemeKind {
        self.kind
    }

    pub fn is_brahmic(&self) -> bool {
        self.kind == SchemeKind::Brahmic
    }

    /// ISO 15924 script code, e.g. `Deva`.
    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Whether input in this scheme is lowercased before tokenizing.
    pub fn fold_case(&self) -> bool {
        self.fold_case
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Classify `grapheme` against this scheme's tokens.
    pub fn lookup(&self, grapheme: &str) -> TrieLookupResult<Slot> {
        self.tokens.lookup(grapheme)
    }

    pub(crate) fn tokens(&self) -> &GraphemeTrie<Slot> {
        &self.tokens
    }

    /// Whether `name` names this scheme as a script subtag (id, alias or script code).
    pub(crate) fn matches_script_subtag(&self, name: &str) -> bool {
        self.id.eq_ignore_ascii_case(name)
            || self.script.as_deref().is_some_and(|s| s.eq_ignore_ascii_case(name))
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    }
}
