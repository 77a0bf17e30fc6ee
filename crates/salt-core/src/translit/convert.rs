use crate::scheme::{Group, Scheme, Slot};
use crate::unicode::{fold_case, is_combining_mark};

/// One step of greedy tokenization.
#[derive(Debug, PartialEq)]
enum Token<'a> {
    /// A grapheme of the source scheme.
    Mapped { text: &'a str, slot: Slot },
    /// A character the source scheme does not know; passed through.
    Raw(&'a str),
}

/// Longest-match-first tokenizer over a scheme's graphemes.
struct Tokens<'a> {
    rest: &'a str,
    scheme: &'a Scheme,
}

impl<'a> Tokens<'a> {
    fn new(input: &'a str, scheme: &'a Scheme) -> Self {
        Self {
            rest: input,
            scheme,
        }
    }

    /// Next token, taking the longest grapheme `accept` allows and
    /// falling back to shorter ones.
    fn next_where(&mut self, accept: impl Fn(&str, Slot) -> bool) -> Option<Token<'a>> {
        let first = self.rest.chars().next()?;
        let rest = self.rest;
        let best = self
            .scheme
            .tokens()
            .prefixes(rest)
            .filter(|&(len, slot)| accept(&rest[..len], slot))
            .last();
        let token = match best {
            Some((len, slot)) => {
                let (text, rest) = rest.split_at(len);
                self.rest = rest;
                Token::Mapped { text, slot }
            }
            None => {
                let (text, rest) = rest.split_at(first.len_utf8());
                self.rest = rest;
                Token::Raw(text)
            }
        };
        Some(token)
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        self.next_where(|_, _| true)
    }
}

/// Whether a symbol grapheme starts with a vowel of its scheme, as `oṁ`
/// does. After a consonant such a symbol is a vowel sign plus a mark.
fn opens_with_vowel(scheme: &Scheme, text: &str, slot: Slot) -> bool {
    slot.group == Group::Symbol
        && scheme
            .tokens()
            .prefixes(text)
            .any(|(len, s)| len < text.len() && s.group == Group::Vowel)
}

/// The target grapheme for `slot`; when the target cannot write the
/// phoneme, the source grapheme passes through unchanged.
fn target<'a>(to: &'a Scheme, slot: Slot, source: &'a str) -> &'a str {
    let g = to.alphabet().grapheme(slot);
    if g.is_empty() && slot.group != Group::Virama {
        source
    } else {
        g
    }
}

/// Convert `text` from one scheme to another. Both schemes are assumed distinct.
pub(crate) fn convert(text: &str, from: &Scheme, to: &Scheme) -> String {
    let input = if from.fold_case() {
        fold_case(text)
    } else {
        text.into()
    };
    if from.is_brahmic() {
        from_brahmic(&input, from, to)
    } else {
        from_roman(&input, from, to)
    }
}

/// Roman source: vowels are explicit. A Brahmic target needs vowel signs
/// after consonants and a virama between consonants and at word end.
fn from_roman(input: &str, from: &Scheme, to: &Scheme) -> String {
    let to_brahmic = to.is_brahmic();
    let virama = to.alphabet().virama();
    let mut out = String::with_capacity(input.len() * 2);
    let mut had_consonant = false;

    let mut tokens = Tokens::new(input, from);
    while let Some(token) =
        tokens.next_where(|text, slot| !(had_consonant && opens_with_vowel(from, text, slot)))
    {
        match token {
            Token::Mapped { text, slot } if !to_brahmic => {
                out.push_str(target(to, slot, text));
                had_consonant = slot.group == Group::Consonant;
            }
            Token::Mapped { text, slot } => match slot.group {
                Group::Vowel if had_consonant => {
                    // the inherent vowel is implied and written as nothing
                    if slot.index > 0 {
                        let mark = Slot::new(Group::VowelMark, slot.index - 1);
                        out.push_str(target(to, mark, text));
                    }
                    had_consonant = false;
                }
                _ => {
                    if had_consonant {
                        out.push_str(virama);
                    }
                    out.push_str(target(to, slot, text));
                    had_consonant = slot.group == Group::Consonant;
                }
            },
            Token::Raw(raw) => {
                if had_consonant {
                    out.push_str(virama);
                    had_consonant = false;
                }
                out.push_str(raw);
            }
        }
    }
    if had_consonant {
        out.push_str(virama);
    }
    out
}

/// Brahmic source: a consonant not followed by a vowel sign or virama
/// carries the inherent vowel, which a Roman target must spell out.
fn from_brahmic(input: &str, from: &Scheme, to: &Scheme) -> String {
    let to_roman = !to.is_brahmic();
    let inherent = to.alphabet().grapheme(Slot::new(Group::Vowel, 0));
    let mut out = String::with_capacity(input.len());
    let mut had_consonant = false;

    for token in Tokens::new(input, from) {
        match token {
            Token::Mapped { text, slot } => match slot.group {
                Group::VowelMark | Group::Virama => {
                    out.push_str(target(to, slot, text));
                    had_consonant = false;
                }
                _ => {
                    if had_consonant {
                        out.push_str(inherent);
                    }
                    out.push_str(target(to, slot, text));
                    had_consonant = to_roman && slot.group == Group::Consonant;
                }
            },
            // a nukta or accent stays on its consonant; the vowel follows
            Token::Raw(raw) if had_consonant && raw.chars().all(is_combining_mark) => {
                out.push_str(raw);
            }
            Token::Raw(raw) => {
                if had_consonant {
                    out.push_str(inherent);
                    had_consonant = false;
                }
                out.push_str(raw);
            }
        }
    }
    if had_consonant {
        out.push_str(inherent);
    }
    out
}
