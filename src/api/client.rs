use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use salt_client::{
    Article, ClientError, ClientSession, Endpoint, HttpTransport, Transport, UserPrefs,
};
use salt_core::scheme::SchemeRegistry;
use salt_core::translit::Transliterator;

use super::types::{
    SaltArticle, SaltError, SaltHeadword, SaltRendered, SaltSearchMode, SaltSearchOutcome,
    SaltServiceInfo, SaltServiceStatus,
};

/// A dictionary client session shared with the host.
#[derive(uniffi::Object)]
pub struct SaltClient {
    session: Mutex<ClientSession<'static>>,
}

impl SaltClient {
    pub(crate) fn with_transport(transport: Box<dyn Transport>) -> Arc<Self> {
        let translit = Transliterator::new(SchemeRegistry::global());
        Arc::new(Self {
            session: Mutex::new(ClientSession::new(translit, transport)),
        })
    }

    fn session(&self) -> MutexGuard<'_, ClientSession<'static>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn related_headwords(
        &self,
        pick: fn(&Article) -> Option<Endpoint>,
    ) -> Result<Vec<SaltHeadword>, SaltError> {
        let session = self.session();
        let endpoint = session
            .article()
            .and_then(pick)
            .ok_or(ClientError::NoArticle)?;
        Ok(session
            .fetch_headwords(&endpoint)?
            .into_iter()
            .map(Into::into)
            .collect())
    }
}

#[uniffi::export]
impl SaltClient {
    #[uniffi::constructor]
    fn new() -> Arc<Self> {
        Self::with_transport(Box::new(HttpTransport))
    }

    // -- preferences --------------------------------------------------------

    /// The user's choices as JSON, for the host to persist.
    fn prefs_json(&self) -> Result<String, SaltError> {
        serde_json::to_string(self.session().prefs())
            .map_err(|e| SaltError::InvalidData { msg: e.to_string() })
    }

    /// Restore choices saved by `prefs_json`. Services loaded afterwards
    /// come back with their saved selection.
    fn restore_prefs(&self, json: String) -> Result<(), SaltError> {
        let prefs: UserPrefs = serde_json::from_str(&json)
            .map_err(|e| SaltError::InvalidData { msg: e.to_string() })?;
        self.session().set_prefs(prefs);
        Ok(())
    }

    // -- services -----------------------------------------------------------

    fn load_services(&self, json: String) -> Result<u32, SaltError> {
        let n = self.session().load_services(&json)?;
        Ok(n as u32)
    }

    fn fetch_services(&self, url: String) -> Result<u32, SaltError> {
        let n = self.session().fetch_services(&Endpoint::new(url))?;
        Ok(n as u32)
    }

    fn services(&self) -> Vec<SaltServiceInfo> {
        self.session().services().iter().map(Into::into).collect()
    }

    fn select_service(&self, id: String, selected: bool) -> Result<SaltServiceStatus, SaltError> {
        Ok(self.session().select_service(&id, selected)?.into())
    }

    fn probe(&self, id: String) -> Result<SaltServiceStatus, SaltError> {
        Ok(self.session().probe(&id)?.into())
    }

    // -- query --------------------------------------------------------------

    fn query(&self) -> String {
        self.session().query().to_string()
    }

    fn set_query(&self, text: String) {
        self.session().set_query(&text);
    }

    fn query_scheme(&self) -> String {
        self.session().query_scheme().into()
    }

    /// Switch the query scheme, converting the pending query.
    fn switch_query_scheme(&self, tag: String) -> SaltRendered {
        self.session().switch_query_scheme(&tag).into()
    }

    fn query_preview(&self) -> SaltRendered {
        self.session().query_preview().into()
    }

    fn adopt_headword(&self, headword: SaltHeadword) -> SaltRendered {
        self.session().adopt_headword(&headword.into()).into()
    }

    fn search(&self, mode: SaltSearchMode) -> Vec<SaltSearchOutcome> {
        self.session()
            .search(mode.into())
            .into_iter()
            .map(Into::into)
            .collect()
    }

    // -- articles -----------------------------------------------------------

    fn article_scheme(&self) -> String {
        self.session().article_scheme().into()
    }

    fn set_article_scheme(&self, tag: String) {
        self.session().set_article_scheme(&tag);
    }

    fn open_article(
        &self,
        service_id: String,
        articles_url: String,
        headwords_url: String,
    ) -> Result<SaltArticle, SaltError> {
        let mut session = self.session();
        let canonical = session
            .open_article(&service_id, &articles_url, &headwords_url)?
            .canonical_url()
            .map(str::to_string);
        let rendered = session.render_article()?;
        Ok(SaltArticle::new(&service_id, canonical.as_deref(), rendered))
    }

    /// Render the open article again, e.g. after the article scheme changed.
    fn render_article(&self) -> Result<SaltArticle, SaltError> {
        let session = self.session();
        let article = session.article().ok_or(ClientError::NoArticle)?;
        let rendered = session.render_article()?;
        Ok(SaltArticle::new(
            &article.service_id,
            article.canonical_url(),
            rendered,
        ))
    }

    fn close_article(&self) {
        self.session().clear_article();
    }

    /// Headwords of the open article.
    fn article_headwords(&self) -> Result<Vec<SaltHeadword>, SaltError> {
        self.related_headwords(|a| Some(a.headwords.clone()))
    }

    /// Headwords around the one the open article was reached from.
    fn article_context(&self) -> Result<Vec<SaltHeadword>, SaltError> {
        self.related_headwords(|a| a.context.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    struct Canned(HashMap<&'static str, &'static str>);

    impl Transport for Canned {
        fn get(&self, endpoint: &Endpoint) -> Result<String, ClientError> {
            let url = endpoint.to_string();
            self.0
                .get(url.as_str())
                .map(|b| b.to_string())
                .ok_or_else(|| ClientError::Http(format!("{url}: 404")))
        }
    }

    fn client() -> Arc<SaltClient> {
        let routes = HashMap::from([
            (
                "https://d.example/hk/v1",
                r#"{"name": "HK dictionary", "supported_t13ns_query": ["hk"]}"#,
            ),
            (
                "https://d.example/hk/v1/headwords?q=kRSNa&lang=hk&limit=100",
                r#"[{"text": "kRSNa", "t13n": "hk", "articles_url": "articles/1",
                     "headwords_url": "headwords/1"}]"#,
            ),
            (
                "https://d.example/hk/articles/1/formats",
                r#"[{"mimetype": "text/x-html-literal", "embeddable": true, "t13n": "hk",
                     "text": "<p><b>kRSNa</b> black</p>"},
                    {"mimetype": "text/html", "canonical": true,
                     "urls": ["https://d.example/hk/a/1"]}]"#,
            ),
            (
                "https://d.example/hk/headwords/1/context?limit=10",
                r#"[{"text": "kRSNa"}, {"text": "kRta"}]"#,
            ),
        ]);
        SaltClient::with_transport(Box::new(Canned(routes)))
    }

    #[test]
    fn search_and_open_article() {
        let c = client();
        c.load_services(r#"[{"id": "hk", "url": "https://d.example/hk/"}]"#.into())
            .unwrap();
        assert_eq!(
            c.select_service("hk".into(), true).unwrap(),
            SaltServiceStatus::Online
        );
        assert_eq!(c.services()[0].name, "HK dictionary");

        c.set_query("kṛṣṇa".into());
        let prefs = c.prefs_json().unwrap();
        c.restore_prefs(prefs.replace("x-iso", "x-iast")).unwrap();
        assert_eq!(c.query_scheme(), "iast");

        let outcomes = c.search(SaltSearchMode::Headword);
        let SaltSearchOutcome::Found { headwords, .. } = &outcomes[0] else {
            panic!("expected headwords");
        };
        assert_eq!(headwords[0].text, "kRSNa");

        c.set_article_scheme("x-iast".into());
        let article = c
            .open_article("hk".into(), "articles/1".into(), "headwords/1".into())
            .unwrap();
        assert_eq!(article.html, r#"<p><b data-script="iast">kṛṣṇa</b> black</p>"#);
        assert_eq!(article.canonical_url.as_deref(), Some("https://d.example/hk/a/1"));

        let context = c.article_context().unwrap();
        assert_eq!(context.len(), 2);

        c.close_article();
        assert!(matches!(
            c.render_article(),
            Err(SaltError::InvalidData { .. })
        ));
    }

    #[test]
    fn unreachable_service_is_offline() {
        let c = client();
        c.load_services(r#"[{"id": "x", "url": "https://d.example/x/"}]"#.into())
            .unwrap();
        assert_eq!(
            c.select_service("x".into(), true).unwrap(),
            SaltServiceStatus::Offline
        );
        assert!(matches!(
            c.probe("nope".into()),
            Err(SaltError::InvalidData { .. })
        ));
    }
}
