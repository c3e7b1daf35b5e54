//! Client-side filter/sort projection over loaded lists
//!
//! Projections borrow from the list and never reorder it. [`ProjectionCache`]
//! keeps the last result keyed by the list revision so repeated renders of an
//! unchanged list skip the work.

use chrono::NaiveDateTime;
use std::cmp::Ordering;

use crate::models::{Match, MatchStatus, Player, Record};

/// Status selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StatusFilter {
    /// Everything
    #[default]
    All,
    /// Live matches only
    Live,
    /// Matches that have not started
    Upcoming,
    /// Finished matches
    Completed,
}

impl StatusFilter {
    /// Parse a selector name ("all", "live", "upcoming", "completed")
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Some(Self::All),
            "live" => Some(Self::Live),
            "upcoming" => Some(Self::Upcoming),
            "completed" | "finished" => Some(Self::Completed),
            _ => None,
        }
    }

    /// Whether a record with `status` passes. Records without status only pass `All`.
    pub fn accepts(self, status: Option<MatchStatus>) -> bool {
        match self {
            Self::All => true,
            Self::Live => status == Some(MatchStatus::Live),
            Self::Upcoming => status == Some(MatchStatus::Upcoming),
            Self::Completed => status == Some(MatchStatus::Completed),
        }
    }
}

/// Sort order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortKey {
    /// Server order
    #[default]
    None,
    /// Latest kickoff first
    Recent,
    /// Earliest kickoff first
    Upcoming,
    /// Most popular first
    Popular,
}

impl SortKey {
    /// Parse a sort name ("none", "recent", "upcoming", "popular")
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "" | "none" => Some(Self::None),
            "recent" => Some(Self::Recent),
            "upcoming" => Some(Self::Upcoming),
            "popular" => Some(Self::Popular),
            _ => None,
        }
    }
}

/// Fields the projection reads from a record
pub trait Projectable: Record {
    /// Lifecycle status, if the record has one
    fn status(&self) -> Option<MatchStatus> {
        None
    }

    /// Fields matched by free-text search
    fn search_fields(&self) -> Vec<&str>;

    /// Kickoff used by the date sorts
    fn kickoff(&self) -> Option<NaiveDateTime> {
        None
    }

    /// Score used by the popularity sort
    fn popularity(&self) -> Option<f64> {
        None
    }

    /// Grouping used for related records
    fn category(&self) -> &str;
}

impl Projectable for Match {
    fn status(&self) -> Option<MatchStatus> {
        Some(self.status)
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.home_team.as_str(),
            self.away_team.as_str(),
            self.sport.as_str(),
        ]
    }

    fn kickoff(&self) -> Option<NaiveDateTime> {
        Match::kickoff(self)
    }

    fn category(&self) -> &str {
        &self.sport
    }
}

impl Projectable for Player {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.team.as_str(), self.position.as_str()]
    }

    fn popularity(&self) -> Option<f64> {
        Some(f64::from(self.rating))
    }

    fn category(&self) -> &str {
        &self.team
    }
}

/// What to show of a list
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ProjectionQuery {
    /// Status selector
    pub status: StatusFilter,
    /// Case-insensitive substring; blank matches everything
    pub search: String,
    /// Sort order
    pub sort: SortKey,
}

impl ProjectionQuery {
    fn admits<R: Projectable>(&self, needle: &str, record: &R) -> bool {
        self.status.accepts(record.status())
            && (needle.is_empty()
                || record
                    .search_fields()
                    .iter()
                    .any(|field| field.to_lowercase().contains(needle)))
    }
}

/// Indices into `items` selected and ordered by `query`
fn project_indices<R: Projectable>(items: &[R], query: &ProjectionQuery) -> Vec<usize> {
    let needle = query.search.trim().to_lowercase();
    let mut selected: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, record)| query.admits(&needle, *record))
        .map(|(i, _)| i)
        .collect();

    match query.sort {
        SortKey::None => {}
        SortKey::Recent => {
            selected.sort_by(|&a, &b| {
                missing_last(items[a].kickoff(), items[b].kickoff(), |x, y| y.cmp(x))
            });
        }
        SortKey::Upcoming => {
            selected.sort_by(|&a, &b| {
                missing_last(items[a].kickoff(), items[b].kickoff(), |x, y| x.cmp(y))
            });
        }
        SortKey::Popular => {
            selected.sort_by(|&a, &b| {
                missing_last(items[a].popularity(), items[b].popularity(), |x, y| {
                    y.total_cmp(x)
                })
            });
        }
    }

    selected
}

/// Compare present keys with `cmp`, putting absent keys after present ones
fn missing_last<K>(a: Option<K>, b: Option<K>, cmp: impl Fn(&K, &K) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp(&a, &b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Filter and sort `items` without touching them
pub fn project<'a, R: Projectable>(items: &'a [R], query: &ProjectionQuery) -> Vec<&'a R> {
    project_indices(items, query)
        .into_iter()
        .map(|i| &items[i])
        .collect()
}

/// Up to `limit` records sharing `current`'s category, excluding `current`
pub fn related<'a, R: Projectable>(items: &'a [R], current: &R, limit: usize) -> Vec<&'a R> {
    items
        .iter()
        .filter(|r| {
            r.id() != current.id() && r.category().eq_ignore_ascii_case(current.category())
        })
        .take(limit)
        .collect()
}

/// Memoizes the last projection of a list
#[derive(Debug, Default)]
pub struct ProjectionCache {
    key: Option<(u64, ProjectionQuery)>,
    indices: Vec<usize>,
}

impl ProjectionCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Project `items` (at list revision `revision`), reusing the last result when possible
    pub fn project<'a, R: Projectable>(
        &mut self,
        revision: u64,
        items: &'a [R],
        query: &ProjectionQuery,
    ) -> Vec<&'a R> {
        let hit = self
            .key
            .as_ref()
            .is_some_and(|(rev, q)| *rev == revision && q == query);

        if !hit {
            self.indices = project_indices(items, query);
            self.key = Some((revision, query.clone()));
        }

        self.indices.iter().filter_map(|&i| items.get(i)).collect()
    }

    /// Whether the next call with these arguments would reuse the cached result
    pub fn is_cached(&self, revision: u64, query: &ProjectionQuery) -> bool {
        self.key
            .as_ref()
            .is_some_and(|(rev, q)| *rev == revision && q == query)
    }
}
