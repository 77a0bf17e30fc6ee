//! Character-level helpers for romanized and Devanagari text.

use std::borrow::Cow;

/// Check the Devanagari block (U+0900..U+097F) and the Vedic extensions
/// block (U+A8E0..U+A8FF).
pub fn is_devanagari(c: char) -> bool {
    ('\u{0900}'..='\u{097F}').contains(&c) || ('\u{A8E0}'..='\u{A8FF}').contains(&c)
}

/// Nonspacing marks that attach to the preceding base: nukta, Vedic
/// accents and the generic combining diacritics.
pub fn is_combining_mark(c: char) -> bool {
    matches!(
        c,
        '\u{0300}'..='\u{036F}'
            | '\u{0951}'..='\u{0954}'
            | '\u{093C}'
            | '\u{1AB0}'..='\u{1AFF}'
            | '\u{1CD0}'..='\u{1CFF}'
            | '\u{1DC0}'..='\u{1DFF}'
            | '\u{20D0}'..='\u{20FF}'
            | '\u{A8E0}'..='\u{A8F1}'
            | '\u{FE20}'..='\u{FE2F}'
    )
}

/// Lowercase `s`, borrowing when nothing changes.
///
/// Diacritic-bearing capitals (`Ā`, `Ṛ`, `Ś`) fold to their lowercase
/// forms; combining marks are left in place.
pub fn fold_case(s: &str) -> Cow<'_, str> {
    if s.chars().any(char::is_uppercase) {
        Cow::Owned(s.to_lowercase())
    } else {
        Cow::Borrowed(s)
    }
}

/// Whether `s` contains any Devanagari character.
pub fn contains_devanagari(s: &str) -> bool {
    s.chars().any(is_devanagari)
}
