//! Player model

use serde::{Deserialize, Serialize};

use super::{ListFilter, Record, Resource, selector};

/// Career statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    /// Appearances
    pub appearances: u32,
    /// Goals scored
    pub goals: u32,
    /// Assists
    pub assists: u32,
    /// Yellow cards
    pub yellow_cards: u32,
    /// Red cards
    pub red_cards: u32,
}

/// A recent appearance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentMatch {
    /// Match identifier
    pub id: String,
    /// Opposing team
    pub opponent: String,
    /// Date (YYYY-MM-DD)
    pub date: String,
    /// Result, e.g. "W 2-1"
    pub result: String,
    /// Individual performance, e.g. "1 Goal"
    pub performance: String,
}

/// A player profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Unique identifier
    pub id: String,
    /// Full name
    pub name: String,
    /// Position (Forward, Midfielder, Defender, Goalkeeper)
    pub position: String,
    /// Current team
    pub team: String,
    /// Portrait URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Rating out of 10
    pub rating: f32,
    /// Age in years
    pub age: u32,
    /// Nationality
    pub nationality: String,
    /// Shirt number
    pub jersey_number: u32,
    /// Short biography
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Career statistics
    #[serde(default)]
    pub stats: PlayerStats,
    /// Honours
    #[serde(default)]
    pub achievements: Vec<String>,
    /// Latest appearances
    #[serde(default)]
    pub recent_matches: Vec<RecentMatch>,
}

impl Record for Player {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Resource for Player {
    type Filter = PlayerFilter;

    const NAME: &'static str = "player";
    const PATH: &'static str = "players";
}

/// Filter key for player lists
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PlayerFilter {
    /// Free-text search over name, team and position
    pub search: String,
    /// Lowercased position; `None` means any
    pub position: Option<String>,
    /// Lowercased team; `None` means any
    pub team: Option<String>,
}

impl PlayerFilter {
    /// Build a filter, normalizing "all"/blank selectors
    pub fn new(search: &str, position: Option<&str>, team: Option<&str>) -> Self {
        Self {
            search: search.trim().to_string(),
            position: selector(position),
            team: selector(team),
        }
    }

    /// Whether a player belongs to this partition
    pub fn matches(&self, player: &Player) -> bool {
        let query = self.search.to_lowercase();
        let searched = query.is_empty()
            || [&player.name, &player.team, &player.position]
                .iter()
                .any(|field| field.to_lowercase().contains(&query));

        searched
            && self
                .position
                .as_deref()
                .is_none_or(|p| player.position.eq_ignore_ascii_case(p))
            && self
                .team
                .as_deref()
                .is_none_or(|t| player.team.eq_ignore_ascii_case(t))
    }
}

impl ListFilter for PlayerFilter {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if !self.search.is_empty() {
            pairs.push(("search", self.search.clone()));
        }
        if let Some(position) = &self.position {
            pairs.push(("position", position.clone()));
        }
        if let Some(team) = &self.team {
            pairs.push(("team", team.clone()));
        }
        pairs
    }

    fn describe(&self) -> String {
        let mut parts = Vec::new();
        if !self.search.is_empty() {
            parts.push(format!("\"{}\"", self.search));
        }
        if let Some(position) = &self.position {
            parts.push(position.clone());
        }
        if let Some(team) = &self.team {
            parts.push(team.clone());
        }
        if parts.is_empty() {
            "all players".to_string()
        } else {
            parts.join(", ")
        }
    }
}
