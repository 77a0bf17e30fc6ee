use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use salt_core::lang_tag::{infer_scheme, normalize_scheme, SchemeId};
use salt_core::settings::settings;
use salt_core::translit::{Rendered, Transliterator};

use crate::article::{related_endpoints, render_article, Article, RenderedArticle};
use crate::error::ClientError;
use crate::search::{plan_search, PlannedSearch, SearchMode, SearchOutcome, SearchQuery};
use crate::service::{parse_service_list, ServiceDescriptor, ServiceStatus};
use crate::transport::{get_json, Endpoint, Transport};
use crate::types::{ArticleFormat, Headword, ProbeResponse};

/// What the user has chosen; serializable so a host can persist it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPrefs {
    #[serde(default)]
    pub query: String,
    /// Tag or bare id of the scheme the query is typed in.
    #[serde(alias = "query_lang")]
    pub query_scheme: String,
    /// Tag or bare id of the scheme articles are displayed in.
    #[serde(alias = "article_lang")]
    pub article_scheme: String,
    #[serde(default, alias = "selected_apis")]
    pub selected_services: Vec<String>,
}

impl Default for UserPrefs {
    fn default() -> Self {
        let client = &settings().client;
        Self {
            query: String::new(),
            query_scheme: format!("x-{}", client.default_query_scheme),
            article_scheme: format!("x-{}", client.default_article_scheme),
            selected_services: Vec::new(),
        }
    }
}

/// State of one dictionary client: known services, the user's query and
/// schemes, and the open article.
pub struct ClientSession<'r> {
    translit: Transliterator<'r>,
    transport: Box<dyn Transport>,
    services: Vec<ServiceDescriptor>,
    prefs: UserPrefs,
    article: Option<Article>,
}

impl<'r> ClientSession<'r> {
    pub fn new(translit: Transliterator<'r>, transport: Box<dyn Transport>) -> Self {
        Self {
            translit,
            transport,
            services: Vec::new(),
            prefs: UserPrefs::default(),
            article: None,
        }
    }

    pub fn with_prefs(mut self, prefs: UserPrefs) -> Self {
        self.prefs = prefs;
        self
    }

    pub fn prefs(&self) -> &UserPrefs {
        &self.prefs
    }

    /// Replace the preferences; loaded services keep their selection.
    pub fn set_prefs(&mut self, prefs: UserPrefs) {
        self.prefs = prefs;
    }

    pub fn transliterator(&self) -> &Transliterator<'r> {
        &self.translit
    }

    // -----------------------------------------------------------------
    // Services
    // -----------------------------------------------------------------

    /// Replace the known services with a parsed JSON list. Services the
    /// user had selected come back selected (but unprobed).
    pub fn load_services(&mut self, json: &str) -> Result<usize, ClientError> {
        let mut services = parse_service_list(json)?;
        for s in &mut services {
            s.selected = self.prefs.selected_services.contains(&s.id);
        }
        self.services = services;
        Ok(self.services.len())
    }

    pub fn fetch_services(&mut self, endpoint: &Endpoint) -> Result<usize, ClientError> {
        let body = self.transport.get(endpoint)?;
        self.load_services(&body)
    }

    pub fn services(&self) -> &[ServiceDescriptor] {
        &self.services
    }

    pub fn service(&self, id: &str) -> Result<&ServiceDescriptor, ClientError> {
        self.services
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| ClientError::UnknownService(id.to_string()))
    }

    fn service_mut(&mut self, id: &str) -> Result<&mut ServiceDescriptor, ClientError> {
        self.services
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| ClientError::UnknownService(id.to_string()))
    }

    /// Select or deselect a service. Selecting probes it.
    pub fn select_service(
        &mut self,
        id: &str,
        selected: bool,
    ) -> Result<ServiceStatus, ClientError> {
        let service = self.service_mut(id)?;
        service.selected = selected;
        let status = service.status;
        self.prefs.selected_services.retain(|s| s != id);
        if !selected {
            return Ok(status);
        }
        self.prefs.selected_services.push(id.to_string());
        self.probe(id)
    }

    /// Ask a service for its capabilities. A failed probe marks the
    /// service offline; it is not an error.
    pub fn probe(&mut self, id: &str) -> Result<ServiceStatus, ClientError> {
        let service = self.service_mut(id)?;
        let ticket = service.begin_request();
        let endpoint = service.probe_endpoint();

        let response = match get_json::<ProbeResponse>(self.transport.as_ref(), &endpoint) {
            Ok(mut response) => {
                if response.css.as_deref().map_or(true, str::is_empty) {
                    response.css = self.fetch_css(response.css_url.as_deref());
                }
                Some(response)
            }
            Err(e) => {
                warn!(service = id, "probe failed: {e}");
                None
            }
        };

        let service = self.service_mut(id)?;
        service.finish_probe(&ticket, response);
        Ok(service.status)
    }

    fn fetch_css(&self, url: Option<&str>) -> Option<String> {
        let url = url.filter(|u| !u.is_empty())?;
        match self.transport.get(&Endpoint::new(url)) {
            Ok(css) => Some(css),
            Err(e) => {
                warn!(url, "stylesheet fetch failed: {e}");
                None
            }
        }
    }

    // -----------------------------------------------------------------
    // Query
    // -----------------------------------------------------------------

    pub fn query(&self) -> &str {
        &self.prefs.query
    }

    pub fn set_query(&mut self, text: &str) {
        self.prefs.query = text.to_string();
    }

    pub fn query_scheme(&self) -> SchemeId {
        normalize_scheme(self.translit.registry(), &self.prefs.query_scheme)
    }

    /// Switch the query scheme, converting the pending query into it.
    /// On failure the query and its scheme are left as they were.
    pub fn switch_query_scheme(&mut self, tag: &str) -> Rendered {
        let rendered = self
            .translit
            .render(&self.prefs.query, &self.prefs.query_scheme, tag);
        if !rendered.is_failure() {
            self.prefs.query = rendered.text().to_string();
            self.prefs.query_scheme = tag.to_string();
        }
        rendered
    }

    /// The query as it reads in the first Brahmic scheme.
    pub fn query_preview(&self) -> Rendered {
        let registry = self.translit.registry();
        let Some(brahmic) = registry.iter().find(|s| s.is_brahmic()) else {
            return Rendered::Unchanged(self.prefs.query.clone());
        };
        self.translit.render_schemes(
            &self.prefs.query,
            &self.query_scheme(),
            &SchemeId::new(brahmic.id()),
        )
    }

    /// Make `headword` the query, converted into the query scheme.
    pub fn adopt_headword(&mut self, headword: &Headword) -> Rendered {
        let text = headword.query_text();
        let from = infer_scheme(self.translit.registry(), headword.lang.as_deref(), text);
        let rendered = self.translit.render_schemes(text, &from, &self.query_scheme());
        if !rendered.is_failure() {
            self.prefs.query = rendered.text().to_string();
        }
        rendered
    }

    pub fn article_scheme(&self) -> SchemeId {
        normalize_scheme(self.translit.registry(), &self.prefs.article_scheme)
    }

    pub fn set_article_scheme(&mut self, tag: &str) {
        self.prefs.article_scheme = tag.to_string();
    }

    // -----------------------------------------------------------------
    // Search
    // -----------------------------------------------------------------

    pub fn plan_search(&self, mode: SearchMode) -> Vec<PlannedSearch> {
        let query = SearchQuery {
            text: &self.prefs.query,
            scheme: &self.prefs.query_scheme,
            mode,
            limit: settings().client.search_limit,
        };
        plan_search(
            &self.translit,
            &self.services,
            &query,
            &settings().negotiation.preference_order,
        )
    }

    /// Run the planned requests. Outcomes are in service order, one per
    /// selected service.
    pub fn search(&self, mode: SearchMode) -> Vec<SearchOutcome> {
        self.plan_search(mode)
            .into_iter()
            .map(|planned| match planned {
                PlannedSearch::Send {
                    service_id,
                    endpoint,
                    ..
                } => match get_json::<Vec<Headword>>(self.transport.as_ref(), &endpoint) {
                    Ok(headwords) => {
                        debug!(service = %service_id, found = headwords.len(), "search done");
                        SearchOutcome::Found {
                            service_id,
                            headwords,
                        }
                    }
                    Err(error) => {
                        warn!(service = %service_id, "search failed: {error}");
                        SearchOutcome::Failed { service_id, error }
                    }
                },
                PlannedSearch::Suppressed { service_id, reason } => {
                    SearchOutcome::Suppressed { service_id, reason }
                }
            })
            .collect()
    }

    // -----------------------------------------------------------------
    // Articles
    // -----------------------------------------------------------------

    /// Fetch the formats of an article. The service is busy meanwhile and
    /// ends online or offline depending on the response.
    pub fn open_article(
        &mut self,
        service_id: &str,
        articles_url: &str,
        headwords_url: &str,
    ) -> Result<&Article, ClientError> {
        self.article = None;
        let service = self.service_mut(service_id)?;
        let ticket = service.begin_request();
        let formats_endpoint = service.endpoint(&format!(
            "{}/formats",
            articles_url.trim_end_matches('/')
        ));
        let (headwords, context) = related_endpoints(
            &service.url,
            articles_url,
            headwords_url,
            settings().client.context_limit,
        );

        let formats = get_json::<Vec<ArticleFormat>>(self.transport.as_ref(), &formats_endpoint);
        self.service_mut(service_id)?
            .finish_request(&ticket, formats.is_ok());
        let formats = formats?;
        if formats.is_empty() {
            return Err(ClientError::NoArticle);
        }

        Ok(&*self.article.insert(Article {
            service_id: service_id.to_string(),
            articles_url: articles_url.to_string(),
            formats,
            headwords,
            context,
        }))
    }

    pub fn article(&self) -> Option<&Article> {
        self.article.as_ref()
    }

    pub fn clear_article(&mut self) {
        self.article = None;
    }

    /// The open article's preferred format, rendered for the user's
    /// article scheme.
    pub fn render_article(&self) -> Result<RenderedArticle, ClientError> {
        let article_settings = &settings().article;
        let format = self
            .article
            .as_ref()
            .and_then(|a| a.preferred(&article_settings.preferred_mimetype))
            .ok_or(ClientError::NoArticle)?;
        let html = format.text.as_deref().ok_or(ClientError::NoArticle)?;
        let from = infer_scheme(self.translit.registry(), format.lang.as_deref(), html);
        Ok(render_article(
            &self.translit,
            html,
            from.as_str(),
            &self.prefs.article_scheme,
            article_settings,
        ))
    }

    pub fn fetch_headwords(&self, endpoint: &Endpoint) -> Result<Vec<Headword>, ClientError> {
        get_json(self.transport.as_ref(), endpoint)
    }
}
