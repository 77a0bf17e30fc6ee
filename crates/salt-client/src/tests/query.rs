use salt_core::translit::Rendered;

use super::*;
use crate::search::{SearchMode, SearchOutcome, Suppressed};
use crate::types::Headword;

const MW_SEARCH: &str = "https://dict.example/mw/v1/headwords?q=rāma&lang=iso&limit=100";
const AP_SEARCH: &str = "https://dict.example/ap/v1/headwords?q=rAma&lang=slp1&limit=100";

fn online_session(transport: FakeTransport) -> ClientSession<'static> {
    let mut s = session(with_probes(transport));
    s.select_service("mw", true).unwrap();
    s.select_service("ap", true).unwrap();
    s
}

#[test]
fn default_schemes_come_from_settings() {
    let s = session(FakeTransport::new());
    assert_eq!(s.query_scheme(), "iso");
    assert_eq!(s.article_scheme(), "iso");
}

#[test]
fn switching_scheme_converts_pending_query() {
    let mut s = session(FakeTransport::new());
    s.set_query("kr\u{325}ṣṇa");
    assert_eq!(s.switch_query_scheme("x-hk"), Rendered::Converted("kRSNa".into()));
    assert_eq!(s.query(), "kRSNa");
    assert_eq!(s.query_scheme(), "hk");
    assert_eq!(s.switch_query_scheme("x-deva").text(), "कृष्ण");
}

#[test]
fn switching_to_unknown_scheme_keeps_query() {
    let mut s = session(FakeTransport::new());
    s.set_query("rāma");
    assert!(s.switch_query_scheme("x-klingon").is_failure());
    assert_eq!(s.query(), "rāma");
    assert_eq!(s.query_scheme(), "iso");
}

#[test]
fn preview_in_devanagari() {
    let mut s = session(FakeTransport::new());
    s.set_query("dharma");
    assert_eq!(s.query_preview(), Rendered::Converted("धर्म".into()));
}

#[test]
fn adopting_headword_converts_into_query_scheme() {
    let mut s = session(FakeTransport::new());
    s.switch_query_scheme("x-slp1");
    let hw = Headword {
        text: "Rāma".into(),
        normalized_text: "rāma".into(),
        lang: Some("iso".into()),
        articles_url: "articles/3".into(),
        headwords_url: "headwords/7".into(),
        dictionary_id: Some("mw".into()),
    };
    assert_eq!(s.adopt_headword(&hw).text(), "rAma");
    assert_eq!(s.query(), "rAma");
}

#[test]
fn adopting_untagged_devanagari_headword() {
    let mut s = session(FakeTransport::new());
    let hw: Headword = serde_json::from_str(r#"{"text": "राम"}"#).unwrap();
    assert_eq!(s.adopt_headword(&hw), Rendered::Converted("rāma".into()));
}

#[test]
fn search_is_negotiated_per_service() {
    let transport = FakeTransport::new()
        .route(MW_SEARCH, r#"[{"text": "rāma", "t13n": "iso", "article_url": "articles/1"}]"#)
        .route(AP_SEARCH, "[]");
    let log = transport.log();
    let mut s = online_session(transport);
    s.set_query("rāma");

    let outcomes = s.search(SearchMode::Headword);
    let ids: Vec<&str> = outcomes.iter().map(SearchOutcome::service_id).collect();
    assert_eq!(ids, ["mw", "ap"]);
    match &outcomes[0] {
        SearchOutcome::Found { headwords, .. } => {
            assert_eq!(headwords.len(), 1);
            assert_eq!(headwords[0].articles_url, "articles/1");
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(matches!(&outcomes[1], SearchOutcome::Found { headwords, .. } if headwords.is_empty()));

    let log = log.lock().unwrap();
    assert!(log.iter().any(|u| u == MW_SEARCH));
    assert!(log.iter().any(|u| u == AP_SEARCH));
}

#[test]
fn failing_service_does_not_hide_others() {
    let transport = FakeTransport::new()
        .route(MW_SEARCH, "[]")
        .fail(AP_SEARCH, "connection reset");
    let mut s = online_session(transport);
    s.set_query("rāma");
    let outcomes = s.search(SearchMode::Headword);
    assert!(matches!(outcomes[0], SearchOutcome::Found { .. }));
    assert!(matches!(outcomes[1], SearchOutcome::Failed { .. }));
}

#[test]
fn empty_query_sends_nothing() {
    let transport = FakeTransport::new();
    let log = transport.log();
    let mut s = online_session(transport);
    let probes = log.lock().unwrap().len();
    s.set_query("   ");
    let outcomes = s.search(SearchMode::Fulltext);
    assert!(outcomes.iter().all(|o| matches!(
        o,
        SearchOutcome::Suppressed {
            reason: Suppressed::EmptyQuery,
            ..
        }
    )));
    assert_eq!(log.lock().unwrap().len(), probes);
}
