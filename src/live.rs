//! Live client for the remote content API.
//!
//! The API speaks a Strapi-style query dialect:
//!
//! ```text
//! /articles?filters[status][$eq]=published&populate=*&sort[0]=publishedDate:desc
//! ```
//!
//! Responses are either a bare JSON array or an envelope of the form
//! `{ "data": [...], "meta": {...} }`; both are accepted.

use crate::data::{
    Application, Article, ArticleQuery, NewsletterSubscription, Researcher, ResearcherQuery, Tag,
    TeamMember,
};
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;

/// Errors from the live content API.
#[derive(Debug, Error)]
pub enum LiveError {
    #[error("request to `{0}` failed: {1}")]
    Http(String, #[source] reqwest::Error),

    #[error("request to `{url}` returned status {status}")]
    Status { url: String, status: u16 },

    #[error("unexpected response from `{0}`: {1}")]
    Decode(String, #[source] serde_json::Error),

    #[error("article `{0}` not found")]
    NotFound(String),

    #[error("no API base URL configured, cannot fetch `{0}` live")]
    NotConfigured(&'static str),
}

/// The operations the runtime accessor can delegate to.
#[async_trait]
pub trait ContentApi: Send + Sync {
    async fn get_articles(&self, query: &ArticleQuery) -> Result<Vec<Article>, LiveError>;
    async fn get_article_by_slug(&self, slug: &str) -> Result<Article, LiveError>;
    async fn get_team_members(&self) -> Result<Vec<TeamMember>, LiveError>;
    async fn get_researchers(&self, query: &ResearcherQuery) -> Result<Vec<Researcher>, LiveError>;
    async fn get_tags(&self) -> Result<Vec<Tag>, LiveError>;
    async fn subscribe_newsletter(&self, subscription: &NewsletterSubscription) -> Result<Value, LiveError>;
    async fn submit_application(&self, application: &Application) -> Result<Value, LiveError>;
}

/// Strip a `{ "data": ... }` envelope if present.
pub fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Request body wrapper expected by the API for writes.
#[derive(Serialize)]
struct Envelope<'a, P> {
    data: &'a P,
}

/// `filters[field][$eq]=value`
fn eq(field: &str, value: &str) -> String {
    format!("filters[{field}][$eq]={}", urlencoding::encode(value))
}

fn articles_path(query: &ArticleQuery) -> String {
    let mut params = vec![eq("status", "published")];
    if query.featured {
        params.push(eq("featured", "true"));
    }
    if let Some(category) = query.category {
        params.push(eq("category", category.as_str()));
    }
    params.push("populate=*".into());
    params.push("sort[0]=publishedDate:desc".into());
    if let Some(limit) = query.limit() {
        params.push(format!("pagination[limit]={limit}"));
    }
    format!("/articles?{}", params.join("&"))
}

fn article_by_slug_path(slug: &str) -> String {
    format!(
        "/articles?{}&{}&populate=*",
        eq("slug", slug),
        eq("status", "published")
    )
}

fn researchers_path(query: &ResearcherQuery) -> String {
    let mut params = Vec::new();
    if let Some(status) = query.status {
        params.push(eq("status", status.as_str()));
    }
    if let Some(program) = query.program() {
        params.push(eq("program", program));
    }
    params.push("populate=*".into());
    if let Some(limit) = query.limit() {
        params.push(format!("pagination[limit]={limit}"));
    }
    format!("/researchers?{}", params.join("&"))
}

const TEAM_MEMBERS_PATH: &str = "/team-members?filters[isActive][$eq]=true&populate=*&sort[0]=order:asc";
const TAGS_PATH: &str = "/tags";
const NEWSLETTER_PATH: &str = "/newsletter-subscriptions";
const APPLICATIONS_PATH: &str = "/applications";

/// HTTP client for the remote content API.
#[derive(Debug, Clone)]
pub struct RemoteApi {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteApi {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path` (relative to the base URL, query included) as raw JSON.
    pub async fn fetch_value(&self, path: &str) -> Result<Value, LiveError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| LiveError::Http(url.clone(), err))?;
        Self::read_json(url, response).await
    }

    async fn fetch_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, LiveError> {
        let value = unwrap_envelope(self.fetch_value(path).await?);
        if value.is_null() {
            return Ok(Vec::new());
        }
        serde_json::from_value(value).map_err(|err| LiveError::Decode(path.to_owned(), err))
    }

    async fn post<P: Serialize + Sync>(&self, path: &str, payload: &P) -> Result<Value, LiveError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&Envelope { data: payload })
            .send()
            .await
            .map_err(|err| LiveError::Http(url.clone(), err))?;
        Self::read_json(url, response).await
    }

    async fn read_json(url: String, response: reqwest::Response) -> Result<Value, LiveError> {
        let status = response.status();
        if !status.is_success() {
            return Err(LiveError::Status {
                url,
                status: status.as_u16(),
            });
        }
        let body = response
            .bytes()
            .await
            .map_err(|err| LiveError::Http(url.clone(), err))?;
        serde_json::from_slice(&body).map_err(|err| LiveError::Decode(url, err))
    }
}

#[async_trait]
impl ContentApi for RemoteApi {
    async fn get_articles(&self, query: &ArticleQuery) -> Result<Vec<Article>, LiveError> {
        self.fetch_list(&articles_path(query)).await
    }

    async fn get_article_by_slug(&self, slug: &str) -> Result<Article, LiveError> {
        self.fetch_list::<Article>(&article_by_slug_path(slug))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| LiveError::NotFound(slug.to_owned()))
    }

    async fn get_team_members(&self) -> Result<Vec<TeamMember>, LiveError> {
        self.fetch_list(TEAM_MEMBERS_PATH).await
    }

    async fn get_researchers(&self, query: &ResearcherQuery) -> Result<Vec<Researcher>, LiveError> {
        self.fetch_list(&researchers_path(query)).await
    }

    async fn get_tags(&self) -> Result<Vec<Tag>, LiveError> {
        self.fetch_list(TAGS_PATH).await
    }

    async fn subscribe_newsletter(&self, subscription: &NewsletterSubscription) -> Result<Value, LiveError> {
        self.post(NEWSLETTER_PATH, subscription).await
    }

    async fn submit_application(&self, application: &Application) -> Result<Value, LiveError> {
        self.post(APPLICATIONS_PATH, application).await
    }
}

/// Stand-in used when no API base URL is configured.
///
/// Snapshot reads work as usual; anything that would reach the live API
/// fails with [`LiveError::NotConfigured`].
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineApi;

#[async_trait]
impl ContentApi for OfflineApi {
    async fn get_articles(&self, _query: &ArticleQuery) -> Result<Vec<Article>, LiveError> {
        Err(LiveError::NotConfigured("articles"))
    }

    async fn get_article_by_slug(&self, _slug: &str) -> Result<Article, LiveError> {
        Err(LiveError::NotConfigured("article"))
    }

    async fn get_team_members(&self) -> Result<Vec<TeamMember>, LiveError> {
        Err(LiveError::NotConfigured("team members"))
    }

    async fn get_researchers(&self, _query: &ResearcherQuery) -> Result<Vec<Researcher>, LiveError> {
        Err(LiveError::NotConfigured("researchers"))
    }

    async fn get_tags(&self) -> Result<Vec<Tag>, LiveError> {
        Err(LiveError::NotConfigured("tags"))
    }

    async fn subscribe_newsletter(&self, _subscription: &NewsletterSubscription) -> Result<Value, LiveError> {
        Err(LiveError::NotConfigured("newsletter subscription"))
    }

    async fn submit_application(&self, _application: &Application) -> Result<Value, LiveError> {
        Err(LiveError::NotConfigured("application"))
    }
}
