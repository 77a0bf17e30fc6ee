use proptest::prelude::*;

use super::*;

const CONSONANTS: &[&str] = &[
    "k", "kh", "g", "gh", "c", "j", "ṭ", "ḍ", "ṇ", "t", "th", "d", "dh", "n", "p", "b", "bh",
    "m", "y", "r", "l", "v", "ś", "ṣ", "s", "h",
];
const VOWELS: &[&str] = &["a", "ā", "i", "ī", "u", "ū", "e", "ai", "o", "au"];
const MARKS: &[&str] = &["ṁ", "ḥ"];

/// Words of syllables spelled canonically in ISO 15919, some closed by
/// anusvāra or visarga.
fn iso_word() -> impl Strategy<Value = String> {
    let syllable = (
        prop::option::of(prop::sample::select(CONSONANTS)),
        prop::sample::select(VOWELS),
        prop::option::of(prop::sample::select(MARKS)),
    );
    prop::collection::vec(syllable, 1..6).prop_map(|syllables| {
        let mut word = String::new();
        for (i, (c, v, mark)) in syllables.into_iter().enumerate() {
            let initial = c.is_none() && i == 0;
            match c {
                Some(c) => word.push_str(c),
                // a bare vowel only starts a word
                None if i > 0 => word.push('k'),
                None => {}
            }
            word.push_str(v);
            // a word-initial "oṁ" is the om sign itself
            if let Some(mark) = mark.filter(|_| !initial) {
                word.push_str(mark);
            }
        }
        word
    })
}

fn builtin_id() -> impl Strategy<Value = &'static str> {
    prop::sample::select(&["deva", "iso", "iast", "slp1", "hk", "velthuis", "wx", "itrans"][..])
}

proptest! {
    #[test]
    fn identity_returns_input(text in ".{0,24}", id in builtin_id()) {
        let reg = SchemeRegistry::builtin();
        prop_assert_eq!(transliterate(&reg, &text, id, id).unwrap(), text);
    }

    #[test]
    fn iso_devanagari_round_trip(word in iso_word()) {
        let reg = SchemeRegistry::builtin();
        let deva = transliterate(&reg, &word, "iso", "deva").unwrap();
        prop_assert!(!deva.is_ascii());
        prop_assert_eq!(transliterate(&reg, &deva, "deva", "iso").unwrap(), word);
    }

    #[test]
    fn roman_schemes_agree_through_devanagari(word in iso_word(), to in builtin_id()) {
        let reg = SchemeRegistry::builtin();
        let direct = transliterate(&reg, &word, "iso", to).unwrap();
        let deva = transliterate(&reg, &word, "iso", "deva").unwrap();
        prop_assert_eq!(transliterate(&reg, &deva, "deva", to).unwrap(), direct);
    }
}

#[test]
fn anusvara_after_o_round_trips() {
    let reg = SchemeRegistry::builtin();
    let deva = transliterate(&reg, "soṁ", "iso", "deva").unwrap();
    assert_eq!(deva, "सों");
    assert_eq!(transliterate(&reg, &deva, "deva", "iso").unwrap(), "soṁ");
    assert_eq!(transliterate(&reg, "soM", "slp1", "deva").unwrap(), "सों");
}

#[test]
fn identity_does_not_fold_case() {
    let reg = SchemeRegistry::builtin();
    assert_eq!(transliterate(&reg, "Rāma", "iast", "iast").unwrap(), "Rāma");
    assert_eq!(transliterate(&reg, "Rāma", "iast", "iso").unwrap(), "rāma");
    assert_eq!(transliterate(&reg, "RAma", "hk", "hk").unwrap(), "RAma");
}

#[test]
fn aliases_name_the_same_scheme() {
    let reg = SchemeRegistry::builtin();
    assert_eq!(transliterate(&reg, "k.r.s.na", "vh", "velthuis").unwrap(), "k.r.s.na");
    assert_eq!(transliterate(&reg, "k.r.s.na", "VH", "iast").unwrap(), "kṛṣṇa");
}

#[test]
fn unknown_scheme_is_an_error() {
    let reg = SchemeRegistry::builtin();
    let err = transliterate(&reg, "rāma", "iso", "klingon").unwrap_err();
    assert_eq!(err, UnknownSchemeError("klingon".into()));
    let err = transliterate(&reg, "rāma", "klingon", "klingon").unwrap_err();
    assert_eq!(err.0, "klingon");
}

#[test]
fn render_accepts_tags_and_ids() {
    let reg = SchemeRegistry::builtin();
    let t = Transliterator::new(&reg);
    assert_eq!(
        t.render("rāma", "sa-x-iso", "sa-Deva"),
        Rendered::Converted("राम".into())
    );
    assert_eq!(t.render("rāma", "iso", "x-slp1").text(), "rAma");
}

#[test]
fn render_leaves_undefined_and_identical_schemes_alone() {
    let reg = SchemeRegistry::builtin();
    let t = Transliterator::new(&reg);
    assert_eq!(t.render("rāma", "en", "deva"), Rendered::Unchanged("rāma".into()));
    assert_eq!(t.render("rāma", "iso", "und"), Rendered::Unchanged("rāma".into()));
    assert_eq!(t.render("Rāma", "sa-x-iso", "iso"), Rendered::Unchanged("Rāma".into()));
}

#[test]
fn render_marks_unknown_schemes() {
    let reg = SchemeRegistry::builtin();
    let t = Transliterator::new(&reg).with_failure_marker("??");
    let rendered = t.render("rāma", "sa-x-iso", "sa-x-klingon");
    assert!(rendered.is_failure());
    assert_eq!(rendered.text(), "??");
    assert_eq!(
        rendered,
        Rendered::Failed {
            marker: "??".into(),
            error: UnknownSchemeError("klingon".into()),
        }
    );
}

#[test]
fn render_marks_unknown_bare_ids() {
    let reg = SchemeRegistry::builtin();
    let t = Transliterator::new(&reg).with_failure_marker("[?]");
    let rendered = t.render("rAma", "slp1", "klingon");
    assert_eq!(
        rendered,
        Rendered::Failed {
            marker: "[?]".into(),
            error: UnknownSchemeError("klingon".into()),
        }
    );
    assert!(t.render("rAma", "hk2", "iso").is_failure());
    assert_eq!(t.render("rAma", "slp1", "en"), Rendered::Unchanged("rAma".into()));
}

#[test]
fn default_failure_marker_comes_from_settings() {
    let reg = SchemeRegistry::builtin();
    let t = Transliterator::new(&reg);
    assert_eq!(t.failure_marker(), crate::settings::settings().transliteration.failure_marker);
    assert_eq!(t.render("x", "x-iso", "x-nope").into_text(), t.failure_marker());
}
