use std::fmt::Write;

use salt_client::render_article;
use salt_core::catalogue::catalogue;
use salt_core::lang_tag::{self, LanguageTag};
use salt_core::negotiate::negotiate;
use salt_core::scheme::{Group, SchemeRegistry};
use salt_core::settings::settings;
use salt_core::translit::{TrieLookupResult, Transliterator};

use super::read_input;
use crate::CliError;

fn transliterator() -> Transliterator<'static> {
    Transliterator::new(SchemeRegistry::global())
}

pub fn translit(text: &str, from: &str, to: &str) -> Result<String, CliError> {
    Ok(transliterator().transliterate(text, from, to)?)
}

/// Like [`translit`], but unknown schemes yield the failure marker.
pub fn render(text: &str, from: &str, to: &str) -> String {
    transliterator().render(text, from, to).into_text()
}

pub fn scheme_of(tag: &str) -> String {
    lang_tag::scheme_of(SchemeRegistry::global(), &LanguageTag::parse(tag)).to_string()
}

pub fn need(a: &str, b: &str) -> String {
    let needed = lang_tag::need_transliteration(
        SchemeRegistry::global(),
        &LanguageTag::parse(a),
        &LanguageTag::parse(b),
    );
    let answer = if needed { "yes" } else { "no" };
    answer.to_string()
}

pub fn negotiate_cmd(
    text: &str,
    user_scheme: &str,
    accepted: &[String],
    preference: Option<&[String]>,
    json: bool,
) -> Result<String, CliError> {
    let preference = preference.unwrap_or(&settings().negotiation.preference_order);
    let negotiated = negotiate(&transliterator(), text, user_scheme, accepted, preference)
        .ok_or_else(|| CliError::NoCommonScheme(user_scheme.to_string()))?;
    if json {
        return Ok(serde_json::to_string_pretty(&negotiated)?);
    }
    Ok(format!("{}\t{}", negotiated.scheme, negotiated.text))
}

/// Sanitize an HTML fragment and transliterate its configured elements.
pub fn html(input: &str, from: &str, to: &str) -> Result<String, CliError> {
    let html = read_input(input)?;
    let rendered = render_article(&transliterator(), &html, from, to, &settings().article);
    if let Some(e) = rendered.failure {
        eprintln!("warning: {e}");
    }
    Ok(rendered.html)
}

/// How `grapheme` tokenizes in `scheme`.
pub fn lookup(scheme: &str, grapheme: &str) -> Result<String, CliError> {
    let scheme = SchemeRegistry::global().resolve(scheme)?;
    let slot = |s: salt_core::scheme::Slot| match s.group {
        Group::Virama => s.group.name().to_string(),
        _ => format!("{}[{}]", s.group.name(), s.index),
    };
    Ok(match scheme.lookup(grapheme) {
        TrieLookupResult::None => "none".to_string(),
        TrieLookupResult::Prefix => "prefix".to_string(),
        TrieLookupResult::Exact(s) => format!("exact {}", slot(s)),
        TrieLookupResult::ExactAndPrefix(s) => format!("exact+prefix {}", slot(s)),
    })
}

pub fn schemes(json: bool) -> Result<String, CliError> {
    let entries = catalogue(SchemeRegistry::global());
    if json {
        return Ok(serde_json::to_string_pretty(&entries)?);
    }
    let mut out = String::new();
    for e in &entries {
        let _ = writeln!(
            out,
            "{:<10} {:<10} {:<6} {}",
            e.tag.as_str(),
            e.scheme.as_str(),
            e.label,
            e.name
        );
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn translit_and_render() {
        assert_eq!(translit("rAma", "slp1", "deva").unwrap(), "राम");
        assert!(matches!(
            translit("rAma", "slp1", "klingon"),
            Err(CliError::Scheme(_))
        ));
        assert_eq!(render("rAma", "slp1", "klingon"), "[?]");
    }

    #[test]
    fn tag_commands() {
        assert_eq!(scheme_of("sa-x-vh"), "velthuis");
        assert_eq!(scheme_of("en"), "und");
        assert_eq!(need("sa-x-iso", "x-slp1"), "yes");
        assert_eq!(need("sa-Deva", "x-deva"), "no");
    }

    #[test]
    fn negotiate_output() {
        let accepted = vec!["x-slp1".to_string(), "x-hk".to_string()];
        let out = negotiate_cmd("rāma", "x-iso", &accepted, None, false).unwrap();
        assert_eq!(out, "slp1\trAma");

        let out = negotiate_cmd("rāma", "x-iso", &accepted, None, true).unwrap();
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["transliterated"], true);

        let none = negotiate_cmd("rāma", "x-iso", &["x-wx".to_string()], Some(&[]), false);
        assert!(matches!(none, Err(CliError::NoCommonScheme(_))));
    }

    #[test]
    fn html_from_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "<p><b>rāma</b><script>x</script></p>").unwrap();
        let out = html(f.path().to_str().unwrap(), "iso", "x-deva").unwrap();
        assert_eq!(out, r#"<p><b data-script="deva">राम</b></p>"#);

        assert!(matches!(
            html("/nonexistent/article.html", "iso", "deva"),
            Err(CliError::Io { .. })
        ));
    }

    #[test]
    fn lookup_reports_slots() {
        assert_eq!(lookup("hk", "k").unwrap(), "exact+prefix consonants[0]");
        assert_eq!(lookup("slp1", "A").unwrap(), "exact vowels[1]");
        assert_eq!(lookup("slp1", "#").unwrap(), "none");
        assert!(lookup("klingon", "k").is_err());
    }

    #[test]
    fn scheme_listing() {
        let text = schemes(false).unwrap();
        assert_eq!(text.lines().count(), SchemeRegistry::global().len());
        assert!(text.lines().any(|l| l.contains("Harvard-Kyoto")));
        let v: serde_json::Value = serde_json::from_str(&schemes(true).unwrap()).unwrap();
        assert_eq!(v[0]["tag"], "x-deva");
    }
}
