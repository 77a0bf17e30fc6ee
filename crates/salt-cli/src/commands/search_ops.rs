use std::fmt::Write;

use serde_json::json;

use salt_client::{
    ClientSession, Endpoint, HttpTransport, SearchMode, SearchOutcome, Suppressed, Transport,
};
use salt_core::scheme::SchemeRegistry;
use salt_core::translit::Transliterator;

use super::read_input;
use crate::CliError;

/// Where the service list comes from and which services to use.
pub struct ServiceArgs<'a> {
    /// URL or file path of the JSON service list.
    pub services: &'a str,
    pub select: &'a [String],
}

/// A session over `transport` with the listed services loaded and the
/// chosen ones selected (and probed).
pub fn open_session(
    transport: Box<dyn Transport>,
    args: &ServiceArgs<'_>,
) -> Result<ClientSession<'static>, CliError> {
    let translit = Transliterator::new(SchemeRegistry::global());
    let mut session = ClientSession::new(translit, transport);
    if args.services.starts_with("http://") || args.services.starts_with("https://") {
        session.fetch_services(&Endpoint::new(args.services))?;
    } else {
        session.load_services(&read_input(args.services)?)?;
    }
    for id in args.select {
        let status = session.select_service(id, true)?;
        eprintln!("{id}: {}", status.as_str());
    }
    Ok(session)
}

pub fn search(
    args: &ServiceArgs<'_>,
    query: &str,
    scheme: &str,
    fulltext: bool,
    json: bool,
) -> Result<String, CliError> {
    let session = open_session(Box::new(HttpTransport), args)?;
    search_in(session, query, scheme, fulltext, json)
}

pub fn search_in(
    mut session: ClientSession<'_>,
    query: &str,
    scheme: &str,
    fulltext: bool,
    json: bool,
) -> Result<String, CliError> {
    session.set_query(query);
    let mut prefs = session.prefs().clone();
    prefs.query_scheme = scheme.to_string();
    let session = session.with_prefs(prefs);

    let mode = if fulltext {
        SearchMode::Fulltext
    } else {
        SearchMode::Headword
    };
    let outcomes = session.search(mode);
    if json {
        let values: Vec<_> = outcomes.iter().map(outcome_json).collect();
        return Ok(serde_json::to_string_pretty(&values)?);
    }

    let mut out = String::new();
    for outcome in &outcomes {
        match outcome {
            SearchOutcome::Found {
                service_id,
                headwords,
            } => {
                let _ = writeln!(out, "{service_id}: {} headword(s)", headwords.len());
                for h in headwords {
                    let _ = writeln!(out, "  {}\t{}", h.text, h.articles_url);
                }
            }
            SearchOutcome::Failed { service_id, error } => {
                let _ = writeln!(out, "{service_id}: error: {error}");
            }
            SearchOutcome::Suppressed { service_id, reason } => {
                let _ = writeln!(out, "{service_id}: not sent ({})", suppressed_reason(*reason));
            }
        }
    }
    Ok(out)
}

fn suppressed_reason(reason: Suppressed) -> &'static str {
    match reason {
        Suppressed::EmptyQuery => "empty query",
        Suppressed::NoCommonScheme => "no common scheme",
        Suppressed::Unavailable => "service unavailable",
    }
}

fn outcome_json(outcome: &SearchOutcome) -> serde_json::Value {
    match outcome {
        SearchOutcome::Found {
            service_id,
            headwords,
        } => json!({ "service": service_id, "headwords": headwords }),
        SearchOutcome::Failed { service_id, error } => {
            json!({ "service": service_id, "error": error.to_string() })
        }
        SearchOutcome::Suppressed { service_id, reason } => {
            json!({ "service": service_id, "suppressed": reason })
        }
    }
}

/// Fetch an article and render it in `scheme`.
pub fn article(
    args: &ServiceArgs<'_>,
    service_id: &str,
    articles_url: &str,
    headwords_url: &str,
    scheme: &str,
) -> Result<String, CliError> {
    let session = open_session(Box::new(HttpTransport), args)?;
    article_in(session, service_id, articles_url, headwords_url, scheme)
}

pub fn article_in(
    mut session: ClientSession<'_>,
    service_id: &str,
    articles_url: &str,
    headwords_url: &str,
    scheme: &str,
) -> Result<String, CliError> {
    session.set_article_scheme(scheme);
    let article = session.open_article(service_id, articles_url, headwords_url)?;
    if let Some(url) = article.canonical_url() {
        eprintln!("canonical: {url}");
    }
    let rendered = session.render_article()?;
    if let Some(e) = &rendered.failure {
        eprintln!("warning: {e}");
    }
    Ok(rendered.html)
}
