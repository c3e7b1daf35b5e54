//! Authentication against the DummyJSON demo backend
//!
//! Test credentials: `emilys` / `emilyspass`.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{AuthSession, RegisterProfile, User};

/// Default authentication backend
pub const DEFAULT_AUTH_URL: &str = "https://dummyjson.com";

/// Token lifetime requested on login and refresh
const TOKEN_TTL_MINS: u32 = 30;

/// Authentication failure, with user-facing display strings
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Wrong username or password
    #[error("Invalid username or password")]
    InvalidCredentials,
    /// The backend refused the request
    #[error("{0}")]
    Rejected(String),
    /// The backend could not be reached
    #[error("Network error. Please check your connection. ({0})")]
    Network(String),
}

/// Fresh token pair from a refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    /// New access token
    pub token: String,
    /// New refresh token
    pub refresh_token: Option<String>,
}

/// DummyJSON authentication client
#[derive(Debug, Clone)]
pub struct AuthClient {
    client: Client,
    base_url: String,
}

impl AuthClient {
    /// Create a client for the backend at `base_url`
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

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Log in with username and password
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthSession, AuthError> {
        let request = LoginRequest {
            username,
            password,
            expires_in_mins: TOKEN_TTL_MINS,
        };

        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(&request)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        if response.status() == StatusCode::BAD_REQUEST {
            return Err(AuthError::InvalidCredentials);
        }
        if !response.status().is_success() {
            return Err(rejection(response, "Login failed. Please try again.").await);
        }

        let body: DummyUser = response
            .json()
            .await
            .map_err(|_| AuthError::Rejected("Login failed. Please try again.".to_string()))?;

        let refresh_token = body.refresh_token.clone();
        let (user, token) = body.into_user();
        tracing::info!("Logged in as {}", user.username);

        Ok(AuthSession {
            user,
            token,
            refresh_token,
        })
    }

    /// Register a new account
    ///
    /// The demo backend only simulates user creation, so the session token is
    /// generated locally.
    pub async fn register(&self, profile: &RegisterProfile) -> Result<AuthSession, AuthError> {
        let (first_name, last_name) = profile.split_name();
        let request = AddUserRequest {
            first_name: &first_name,
            last_name: &last_name,
            username: &profile.username,
            email: &profile.email,
            password: &profile.password,
        };

        let response = self
            .client
            .post(self.url("/users/add"))
            .json(&request)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(rejection(response, "Registration failed. Please try again.").await);
        }

        let body: DummyUser = response.json().await.map_err(|_| {
            AuthError::Rejected("Registration failed. Please try again.".to_string())
        })?;

        let (user, _) = body.into_user();
        let token = format!("mock-token-{}", Uuid::new_v4());

        Ok(AuthSession {
            user,
            token,
            refresh_token: None,
        })
    }

    /// Check a token; `None` if it is invalid or the backend is unreachable
    pub async fn verify_token(&self, token: &str) -> Option<User> {
        match self.profile(token).await {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::debug!("Token verification failed: {e}");
                None
            }
        }
    }

    /// Fetch the profile of the token's owner
    pub async fn profile(&self, token: &str) -> Result<User, AuthError> {
        let response = self
            .client
            .get(self.url("/auth/me"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(rejection(response, "Failed to fetch profile").await);
        }

        let body: DummyUser = response
            .json()
            .await
            .map_err(|_| AuthError::Rejected("Failed to fetch profile".to_string()))?;

        Ok(body.into_user().0)
    }

    /// Exchange a refresh token for a new token pair
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let request = RefreshRequest {
            refresh_token,
            expires_in_mins: TOKEN_TTL_MINS,
        };

        let response = self
            .client
            .post(self.url("/auth/refresh"))
            .json(&request)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(rejection(response, "Failed to refresh token").await);
        }

        let body: RefreshResponse = response
            .json()
            .await
            .map_err(|_| AuthError::Rejected("Failed to refresh token".to_string()))?;

        let token = body
            .access_token
            .or(body.token)
            .ok_or_else(|| AuthError::Rejected("Failed to refresh token".to_string()))?;

        Ok(TokenPair {
            token,
            refresh_token: body.refresh_token,
        })
    }

    /// Log out (the backend keeps no server-side session)
    pub async fn logout(&self) -> Result<(), AuthError> {
        Ok(())
    }
}

/// Turn an error response into [`AuthError::Rejected`], preferring the server message
async fn rejection(response: reqwest::Response, fallback: &str) -> AuthError {
    let message = response
        .json::<MessageBody>()
        .await
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| fallback.to_string());
    AuthError::Rejected(message)
}

// ==================== API Types ====================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
    expires_in_mins: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AddUserRequest<'a> {
    first_name: &'a str,
    last_name: &'a str,
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
    expires_in_mins: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    access_token: Option<String>,
    token: Option<String>,
    refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DummyUser {
    id: Option<u64>,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    username: Option<String>,
    access_token: Option<String>,
    token: Option<String>,
    refresh_token: Option<String>,
    image: Option<String>,
}

impl DummyUser {
    /// Map the backend user onto [`User`], returning it with its token
    fn into_user(self) -> (User, String) {
        let name = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or_default(),
            self.last_name.as_deref().unwrap_or_default()
        )
        .trim()
        .to_string();

        let username = self
            .username
            .clone()
            .filter(|u| !u.is_empty())
            .or_else(|| {
                self.email
                    .as_deref()
                    .and_then(|e| e.split('@').next())
                    .filter(|local| !local.is_empty())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| "user".to_string());

        let email = self
            .email
            .clone()
            .unwrap_or_else(|| format!("{username}@primeplay.com"));

        let token = self
            .access_token
            .or(self.token)
            .unwrap_or_else(|| format!("token-{}", chrono::Utc::now().timestamp_millis()));

        let user = User {
            id: self.id.map_or_else(|| "0".to_string(), |id| id.to_string()),
            name,
            email,
            username,
            image: self.image,
            first_name: self.first_name,
            last_name: self.last_name,
        };

        (user, token)
    }
}
