//! API clients for the sports backend and the authentication service

pub mod auth;
pub mod demo;
pub mod remote;

use thiserror::Error;

use crate::config::{Config, SourceKind};
use crate::models::{Match, Page, Player, Resource};

/// Failure talking to a list or detail endpoint
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Connection failure, timeout or similar transport problem
    #[error("network error: {0}")]
    Network(String),

    /// Server answered with a non-success status
    #[error("server returned {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body or reason phrase
        message: String,
    },

    /// Response body could not be decoded
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// The requested record does not exist
    #[error("{resource} {id} not found")]
    NotFound {
        /// Resource name ("match", "player")
        resource: &'static str,
        /// Requested identifier
        id: String,
    },
}

impl ApiError {
    /// Whether this is a missing-record error (dead link rather than a network blip)
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether retrying the same request may succeed
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) | Self::Parse(_) => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::NotFound { .. } => false,
        }
    }

    /// Message suitable for an inline error banner
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => "Network error. Please check your connection.".to_string(),
            Self::Status { message, .. } if !message.is_empty() => message.clone(),
            Self::Status { .. } | Self::Parse(_) => "An unexpected error occurred.".to_string(),
            Self::NotFound { resource, .. } => {
                let mut name = resource.to_string();
                if let Some(first) = name.get_mut(0..1) {
                    first.make_ascii_uppercase();
                }
                format!("{name} not found")
            }
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Parse(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Status {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or_default().to_string(),
            }
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// A paged source of records of type `R`
#[allow(async_fn_in_trait)]
pub trait ListSource<R: Resource> {
    /// Fetch one page (1-based) of the list partitioned by `filter`
    async fn fetch_page(&self, filter: &R::Filter, page: u32, limit: u32)
    -> Result<Page<R>, ApiError>;

    /// Fetch a single record by id
    async fn fetch_by_id(&self, id: &str) -> Result<R, ApiError>;
}

/// The configured list source: the real API or the bundled demo dataset
pub enum SportsSource {
    /// REST backend (server-side filtering and pagination)
    Remote(remote::SportsClient),
    /// In-memory dataset (client-side filtering and pagination)
    Demo(demo::DemoSource),
}

impl SportsSource {
    /// Build the source selected by the config
    pub fn from_config(config: &Config) -> Self {
        match config.source {
            SourceKind::Remote => Self::Remote(remote::SportsClient::new(
                &config.api_base_url,
                config.request_timeout(),
            )),
            SourceKind::Demo => Self::Demo(demo::DemoSource::with_latency(config.demo_latency())),
        }
    }

    /// Which kind of source this is
    pub const fn kind(&self) -> SourceKind {
        match self {
            Self::Remote(_) => SourceKind::Remote,
            Self::Demo(_) => SourceKind::Demo,
        }
    }
}

impl ListSource<Match> for SportsSource {
    async fn fetch_page(
        &self,
        filter: &<Match as Resource>::Filter,
        page: u32,
        limit: u32,
    ) -> Result<Page<Match>, ApiError> {
        match self {
            Self::Remote(c) => ListSource::<Match>::fetch_page(c, filter, page, limit).await,
            Self::Demo(c) => ListSource::<Match>::fetch_page(c, filter, page, limit).await,
        }
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Match, ApiError> {
        match self {
            Self::Remote(c) => ListSource::<Match>::fetch_by_id(c, id).await,
            Self::Demo(c) => ListSource::<Match>::fetch_by_id(c, id).await,
        }
    }
}

impl ListSource<Player> for SportsSource {
    async fn fetch_page(
        &self,
        filter: &<Player as Resource>::Filter,
        page: u32,
        limit: u32,
    ) -> Result<Page<Player>, ApiError> {
        match self {
            Self::Remote(c) => ListSource::<Player>::fetch_page(c, filter, page, limit).await,
            Self::Demo(c) => ListSource::<Player>::fetch_page(c, filter, page, limit).await,
        }
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Player, ApiError> {
        match self {
            Self::Remote(c) => ListSource::<Player>::fetch_by_id(c, id).await,
            Self::Demo(c) => ListSource::<Player>::fetch_by_id(c, id).await,
        }
    }
}

impl<R: Resource, S: ListSource<R>> ListSource<R> for &S {
    async fn fetch_page(
        &self,
        filter: &R::Filter,
        page: u32,
        limit: u32,
    ) -> Result<Page<R>, ApiError> {
        ListSource::<R>::fetch_page(*self, filter, page, limit).await
    }

    async fn fetch_by_id(&self, id: &str) -> Result<R, ApiError> {
        ListSource::<R>::fetch_by_id(*self, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let not_found = ApiError::NotFound {
            resource: "match",
            id: "99".to_string(),
        };
        assert!(not_found.is_not_found());
        assert!(!not_found.is_transient());
        assert_eq!(not_found.user_message(), "Match not found");
        assert_eq!(not_found.to_string(), "match 99 not found");

        let network = ApiError::Network("timed out".to_string());
        assert!(network.is_transient());
        assert_eq!(
            network.user_message(),
            "Network error. Please check your connection."
        );

        let client_error = ApiError::Status {
            status: 400,
            message: String::new(),
        };
        assert!(!client_error.is_transient());
        assert!(
            ApiError::Status {
                status: 503,
                message: "Service Unavailable".to_string()
            }
            .is_transient()
        );
    }
}
