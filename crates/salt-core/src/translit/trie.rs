use std::collections::BTreeMap;
use std::fmt;

use lexime_trie::{DoubleArray, TrieSearch};

#[derive(Debug, PartialEq)]
pub enum TrieLookupResult<V> {
    None,
    Prefix,
    Exact(V),
    ExactAndPrefix(V),
}

/// Double-array trie over grapheme strings.
///
/// Keys are whole UTF-8 strings, so every match ends on a char boundary
/// and a prefix scan never splits a character.
pub struct GraphemeTrie<V> {
    da: DoubleArray<u8>,
    values: Vec<V>,
}

impl<V> fmt::Debug for GraphemeTrie<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphemeTrie")
            .field("len", &self.values.len())
            .finish()
    }
}

impl<V: Copy> GraphemeTrie<V> {
    /// Build from a key-sorted map. Empty keys are skipped.
    pub fn build(entries: &BTreeMap<&str, V>) -> Self {
        // BTreeMap<&str, _> iterates in byte order, as DoubleArray::build needs
        let (keys, values): (Vec<&[u8]>, Vec<V>) = entries
            .iter()
            .filter(|(k, _)| !k.is_empty())
            .map(|(k, v)| (k.as_bytes(), *v))
            .unzip();
        let da = DoubleArray::<u8>::build(&keys);
        Self { da, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn lookup(&self, key: &str) -> TrieLookupResult<V> {
        let pr = self.da.probe(key.as_bytes());
        match (pr.value, pr.has_children) {
            (None, false) => TrieLookupResult::None,
            (None, true) => TrieLookupResult::Prefix,
            (Some(id), false) => TrieLookupResult::Exact(self.values[id as usize]),
            (Some(id), true) => TrieLookupResult::ExactAndPrefix(self.values[id as usize]),
        }
    }

    /// Every key that is a prefix of `input`, shortest first, as `(byte_len, value)`.
    pub fn prefixes<'a>(&'a self, input: &'a str) -> impl Iterator<Item = (usize, V)> + 'a {
        self.da
            .common_prefix_search(input.as_bytes())
            .map(move |m| (m.len, self.values[m.value_id as usize]))
    }

    /// The longest key that is a prefix of `input`.
    pub fn longest_match(&self, input: &str) -> Option<(usize, V)> {
        self.prefixes(input).last()
    }
}
