//! Authenticated user and session

use serde::{Deserialize, Serialize};

/// A signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Backend user id
    pub id: String,
    /// Display name ("First Last")
    pub name: String,
    /// Email address
    pub email: String,
    /// Login name
    pub username: String,
    /// Avatar URL
    pub image: Option<String>,
    /// Given name
    pub first_name: Option<String>,
    /// Family name
    pub last_name: Option<String>,
}

/// Result of a login or registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    /// The signed-in user
    pub user: User,
    /// Bearer token for authenticated requests
    pub token: String,
    /// Refresh token, when the backend issues one
    pub refresh_token: Option<String>,
}

/// Sign-up form data
#[derive(Debug, Clone)]
pub struct RegisterProfile {
    /// Full name
    pub name: String,
    /// Email address
    pub email: String,
    /// Desired login name
    pub username: String,
    /// Password
    pub password: String,
}

impl RegisterProfile {
    /// Split the full name into (first, last)
    pub fn split_name(&self) -> (String, String) {
        let mut parts = self.name.split_whitespace();
        let first = parts.next().unwrap_or(self.name.as_str()).to_string();
        let last = parts.collect::<Vec<_>>().join(" ");
        (first, last)
    }
}
