//! Scripted list source for synchronizer tests

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::api::{ApiError, ListSource};
use crate::models::{Match, MatchFilter, MatchStatus, Page};

/// In-memory match source that yields before answering and logs every call
pub struct ScriptedSource {
    items: Vec<Match>,
    yields: usize,
    failing: AtomicBool,
    requests: Mutex<Vec<(MatchFilter, u32)>>,
    lookups: Mutex<Vec<String>>,
}

impl ScriptedSource {
    /// Serve `items`, yielding `yields` times per call
    pub fn new(items: Vec<Match>, yields: usize) -> Self {
        Self {
            items,
            yields,
            failing: AtomicBool::new(false),
            requests: Mutex::new(Vec::new()),
            lookups: Mutex::new(Vec::new()),
        }
    }

    /// Make every following call fail with a network error
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// `(filter, page)` of every list request so far
    pub fn requests(&self) -> Vec<(MatchFilter, u32)> {
        self.requests.lock().unwrap().clone()
    }

    /// Ids of every detail request so far
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }

    async fn pause(&self) {
        for _ in 0..self.yields {
            tokio::task::yield_now().await;
        }
    }
}

impl ListSource<Match> for ScriptedSource {
    async fn fetch_page(
        &self,
        filter: &MatchFilter,
        page: u32,
        limit: u32,
    ) -> Result<Page<Match>, ApiError> {
        self.requests.lock().unwrap().push((filter.clone(), page));
        self.pause().await;

        if self.failing.load(Ordering::SeqCst) {
            return Err(ApiError::Network("connection refused".to_string()));
        }

        let selected = self
            .items
            .iter()
            .filter(|m| filter.matches(m))
            .cloned()
            .collect();
        Ok(Page::slice(selected, page, limit))
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Match, ApiError> {
        self.lookups.lock().unwrap().push(id.to_string());
        self.pause().await;

        if self.failing.load(Ordering::SeqCst) {
            return Err(ApiError::Network("connection refused".to_string()));
        }

        self.items
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound {
                resource: "match",
                id: id.to_string(),
            })
    }
}

/// A match fixture with the given id and sport
pub fn fixture(id: &str, sport: &str) -> Match {
    Match {
        id: id.to_string(),
        sport: sport.to_string(),
        home_team: format!("Home {id}"),
        away_team: format!("Away {id}"),
        home_score: None,
        away_score: None,
        status: MatchStatus::Upcoming,
        date: "2025-06-01".to_string(),
        time: "18:00".to_string(),
        image: None,
    }
}

/// `count` football fixtures with ids "1"..="count"
pub fn football(count: usize) -> Vec<Match> {
    (1..=count)
        .map(|i| fixture(&i.to_string(), "Football"))
        .collect()
}
