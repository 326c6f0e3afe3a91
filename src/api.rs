use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::ApiConfig;
use crate::models::{EventDetail, EventPage};
use crate::slug::parse_event_slug;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("http error: {0}")]
    Http(String),
    #[error("api returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("parse error: {0}")]
    Parse(String),
    #[error("no event id in slug {0:?}")]
    BadSlug(String),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status, .. } if *status == StatusCode::NOT_FOUND)
    }
}

/// Client for the backend event API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    bearer: Option<String>,
    client: Client,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|err| ApiError::Http(err.to_string()))?;
        Ok(Self {
            base_url: config.base_url.clone(),
            bearer: None,
            client,
        })
    }

    /// Attaches an admin token to every request.
    pub fn with_bearer(mut self, token: Option<String>) -> Self {
        self.bearer = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn event_url(&self, id: &str) -> Result<Url, ApiError> {
        self.endpoint(&format!("events/{id}"))
    }

    pub fn events_url(&self, city: Option<&str>, page: usize) -> Result<Url, ApiError> {
        let mut url = self.endpoint("events")?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(city) = city.map(str::trim).filter(|c| !c.is_empty()) {
                query.append_pair("city", city);
            }
            query.append_pair("page", &page.max(1).to_string());
        }
        Ok(url)
    }

    #[instrument(skip(self))]
    pub async fn event_detail(&self, id: &str) -> Result<EventDetail, ApiError> {
        let url = self.event_url(id)?;
        self.get_json(url).await
    }

    pub async fn event_by_slug(&self, slug: &str) -> Result<EventDetail, ApiError> {
        let id = parse_event_slug(slug).ok_or_else(|| ApiError::BadSlug(slug.to_string()))?;
        self.event_detail(&id).await
    }

    #[instrument(skip(self))]
    pub async fn events(&self, city: Option<&str>, page: usize) -> Result<EventPage, ApiError> {
        let url = self.events_url(city, page)?;
        self.get_json(url).await
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| ApiError::Http(err.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let mut request = self.client.get(url.clone());
        if let Some(token) = &self.bearer {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|err| ApiError::Http(err.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| ApiError::Http(err.to_string()))?;
        debug!(%url, %status, bytes = body.len(), "api response");

        if !status.is_success() {
            return Err(ApiError::Status { status, body });
        }

        parse_body(&body)
    }
}

pub fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|err| ApiError::Parse(err.to_string()))
}
