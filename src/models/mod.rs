//! Data models for PrimePlay

mod page;
mod player;
mod sports_match;
mod user;

pub use page::Page;
pub use player::{Player, PlayerFilter, PlayerStats, RecentMatch};
pub use sports_match::{Match, MatchFilter, MatchStatus};
pub use user::{AuthSession, RegisterProfile, User};

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Debug;

/// A value with a stable identifier, as served by a list endpoint
pub trait Record {
    /// Stable unique identifier
    fn id(&self) -> &str;
}

/// A list filter (the partition key for a paginated list)
pub trait ListFilter: Clone + PartialEq + Debug + Default + Send + Sync + 'static {
    /// Query parameters sent to the remote source (already unencoded)
    fn query_pairs(&self) -> Vec<(&'static str, String)>;

    /// Short human-readable description, for logs and CLI headers
    fn describe(&self) -> String;
}

/// A record type that is served by its own paginated resource
pub trait Resource:
    Record + Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Filter key type for lists of this resource
    type Filter: ListFilter;

    /// Singular name used in logs and errors ("match", "player")
    const NAME: &'static str;

    /// URL path segment of the list endpoint ("matches", "players")
    const PATH: &'static str;
}

/// Normalize a selector value: blank or "all" means no restriction
pub(crate) fn selector(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
        .map(str::to_lowercase)
}
