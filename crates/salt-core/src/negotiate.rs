//! Choosing the scheme a query is sent in.
//!
//! A remote service declares the schemes it accepts. The user's own scheme
//! is used when accepted; otherwise the first accepted scheme in the
//! preference order, with the query transliterated into it. When nothing
//! matches the query must not be sent.

use serde::Serialize;
use tracing::{debug, warn};

use crate::lang_tag::{normalize_scheme, SchemeId};
use crate::settings::settings;
use crate::translit::Transliterator;

/// A query ready to send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Negotiated {
    pub text: String,
    pub scheme: SchemeId,
    /// Whether `text` differs in scheme from the user's input.
    pub transliterated: bool,
}

/// Pick a scheme the remote accepts and convert `text` into it.
///
/// `user_scheme`, `remote` and `preference` entries may be bare scheme
/// ids or language tags. Returns `None` when the remote accepts no
/// scheme from `preference`, or the user's scheme is undefined and not
/// accepted as is.
pub fn negotiate<S, P>(
    translit: &Transliterator<'_>,
    text: &str,
    user_scheme: &str,
    remote: &[S],
    preference: &[P],
) -> Option<Negotiated>
where
    S: AsRef<str>,
    P: AsRef<str>,
{
    let registry = translit.registry();
    let user = normalize_scheme(registry, user_scheme);
    let accepted: Vec<SchemeId> = remote
        .iter()
        .map(|s| normalize_scheme(registry, s.as_ref()))
        .filter(|id| !id.is_undefined())
        .collect();

    if !user.is_undefined() && accepted.contains(&user) {
        return Some(Negotiated {
            text: text.to_string(),
            scheme: user,
            transliterated: false,
        });
    }
    if user.is_undefined() {
        warn!(user_scheme, "cannot transliterate from an undefined scheme");
        return None;
    }

    for candidate in preference.iter().map(|p| normalize_scheme(registry, p.as_ref())) {
        if !accepted.contains(&candidate) {
            continue;
        }
        match translit.transliterate(text, user.as_str(), candidate.as_str()) {
            Ok(converted) => {
                debug!(from = %user, to = %candidate, "query scheme fallback");
                return Some(Negotiated {
                    text: converted,
                    scheme: candidate,
                    transliterated: true,
                });
            }
            Err(e) => warn!(to = %candidate, "skipping scheme: {e}"),
        }
    }
    warn!(from = %user, ?accepted, "no mutually supported query scheme");
    None
}

/// [`negotiate`] with the configured preference order.
pub fn negotiate_with_defaults<S: AsRef<str>>(
    translit: &Transliterator<'_>,
    text: &str,
    user_scheme: &str,
    remote: &[S],
) -> Option<Negotiated> {
    negotiate(
        translit,
        text,
        user_scheme,
        remote,
        &settings().negotiation.preference_order,
    )
}
