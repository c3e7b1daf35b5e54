//! Match model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{ListFilter, Record, Resource, selector};

/// Lifecycle status of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    /// In progress
    Live,
    /// Finished
    Completed,
    /// Not started yet
    Upcoming,
}

impl MatchStatus {
    /// Get status as string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Completed => "completed",
            Self::Upcoming => "upcoming",
        }
    }

    /// Get the label shown next to a match
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Live => "LIVE",
            Self::Completed => "FT",
            Self::Upcoming => "SOON",
        }
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A match between two teams (or two players, for individual sports)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    /// Unique identifier
    pub id: String,
    /// Sport name (e.g. "Football")
    pub sport: String,
    /// Home side
    pub home_team: String,
    /// Away side
    pub away_team: String,
    /// Home score, absent before kickoff
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_score: Option<u32>,
    /// Away score, absent before kickoff
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub away_score: Option<u32>,
    /// Current status
    pub status: MatchStatus,
    /// Kickoff date (YYYY-MM-DD)
    pub date: String,
    /// Kickoff time (HH:MM)
    pub time: String,
    /// Cover image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Match {
    /// Short title, e.g. "Barcelona vs Real Madrid"
    pub fn title(&self) -> String {
        format!("{} vs {}", self.home_team, self.away_team)
    }

    /// Score line ("3 - 2"), if the match has started
    pub fn score_line(&self) -> Option<String> {
        match (self.home_score, self.away_score) {
            (Some(home), Some(away)) => Some(format!("{home} - {away}")),
            _ => None,
        }
    }

    /// Kickoff as a naive local date-time, if date and time parse
    pub fn kickoff(&self) -> Option<NaiveDateTime> {
        let raw = format!("{} {}", self.date.trim(), self.time.trim());
        NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M")
            .or_else(|_| NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S"))
            .ok()
    }
}

impl Record for Match {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Resource for Match {
    type Filter = MatchFilter;

    const NAME: &'static str = "match";
    const PATH: &'static str = "matches";
}

/// Filter key for match lists: the selected sport
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct MatchFilter {
    /// Lowercased sport name; `None` means every sport
    pub sport: Option<String>,
}

impl MatchFilter {
    /// Every sport
    pub const fn all() -> Self {
        Self { sport: None }
    }

    /// A single sport ("all" and blank select every sport)
    pub fn sport(name: &str) -> Self {
        Self {
            sport: selector(Some(name)),
        }
    }

    /// Whether a match belongs to this partition
    pub fn matches(&self, record: &Match) -> bool {
        self.sport
            .as_deref()
            .is_none_or(|sport| record.sport.eq_ignore_ascii_case(sport))
    }
}

impl ListFilter for MatchFilter {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        self.sport
            .iter()
            .map(|sport| ("sport", sport.clone()))
            .collect()
    }

    fn describe(&self) -> String {
        self.sport.clone().unwrap_or_else(|| "all sports".to_string())
    }
}
