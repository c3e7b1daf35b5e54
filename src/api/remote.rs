//! REST client for the sports backend
//!
//! Lists are served as `GET {base}/{path}?page=N&limit=L[&filters]` returning
//! `{ data, page, totalPages }`; details as `GET {base}/{path}/{id}`.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::models::{ListFilter, Page, Resource};

use super::{ApiError, ListSource};

/// Sports API client
#[derive(Debug, Clone)]
pub struct SportsClient {
    client: Client,
    base_url: String,
}

impl SportsClient {
    /// Create a new client for the API rooted at `base_url`
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build the list URL for a page of `R`
    fn list_url<R: Resource>(&self, filter: &R::Filter, page: u32, limit: u32) -> String {
        let mut url = format!("{}/{}?page={page}&limit={limit}", self.base_url, R::PATH);
        for (key, value) in filter.query_pairs() {
            url.push('&');
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(&value));
        }
        url
    }

    /// Build the detail URL for one `R`
    fn detail_url<R: Resource>(&self, id: &str) -> String {
        format!("{}/{}/{}", self.base_url, R::PATH, urlencoding::encode(id))
    }
}

impl<R: Resource> ListSource<R> for SportsClient {
    async fn fetch_page(
        &self,
        filter: &R::Filter,
        page: u32,
        limit: u32,
    ) -> Result<Page<R>, ApiError> {
        let url = self.list_url::<R>(filter, page, limit);
        tracing::debug!("GET {url}");

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn fetch_by_id(&self, id: &str) -> Result<R, ApiError> {
        let url = self.detail_url::<R>(id);
        tracing::debug!("GET {url}");

        let response = self.client.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound {
                resource: R::NAME,
                id: id.to_string(),
            });
        }
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Parse(e.to_string()))
    }
}

/// Error body shape used by the backend (`{ "message": "..." }`)
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Convert a non-success response into an [`ApiError::Status`]
async fn status_error(response: reqwest::Response) -> ApiError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.message)
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_default();

    ApiError::Status {
        status: status.as_u16(),
        message,
    }
}
