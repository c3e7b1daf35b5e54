//! Single-record loader for detail views

use std::marker::PhantomData;
use tokio::sync::Mutex;

use crate::api::{ApiError, ListSource};
use crate::models::Resource;

/// State of a detail view
#[derive(Debug, Clone)]
pub struct DetailState<R> {
    /// Loaded record
    pub record: Option<R>,
    /// Whether a fetch is in flight
    pub loading: bool,
    /// Last failure; [`ApiError::NotFound`] for a dead link
    pub error: Option<ApiError>,
    /// Bumped on every new request
    pub generation: u64,
}

impl<R> Default for DetailState<R> {
    fn default() -> Self {
        Self {
            record: None,
            loading: false,
            error: None,
            generation: 0,
        }
    }
}

/// Result of [`DetailLoader::fetch`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailOutcome {
    /// Record stored
    Loaded,
    /// A newer request superseded this one
    Stale,
    /// Fetch failed; check [`ApiError::is_not_found`]
    Failed(ApiError),
}

/// Loads one record by id, newest request wins
pub struct DetailLoader<R: Resource, S> {
    source: S,
    state: Mutex<DetailState<R>>,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource, S: ListSource<R>> DetailLoader<R, S> {
    /// Create an empty loader
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: Mutex::new(DetailState::default()),
            _resource: PhantomData,
        }
    }

    /// Copy of the current state
    pub async fn snapshot(&self) -> DetailState<R> {
        self.state.lock().await.clone()
    }

    /// Drop the current record and any in-flight response
    pub async fn clear(&self) {
        let mut state = self.state.lock().await;
        let generation = state.generation + 1;
        *state = DetailState {
            generation,
            ..DetailState::default()
        };
    }

    /// Fetch the record `id`, replacing whatever was shown
    pub async fn fetch(&self, id: &str) -> DetailOutcome {
        let generation = {
            let mut state = self.state.lock().await;
            state.generation += 1;
            state.record = None;
            state.error = None;
            state.loading = true;
            state.generation
        };

        let result = self.source.fetch_by_id(id).await;

        let mut state = self.state.lock().await;
        if state.generation != generation {
            tracing::debug!("Dropped stale {} {id}", R::NAME);
            return DetailOutcome::Stale;
        }

        state.loading = false;
        match result {
            Ok(record) => {
                state.record = Some(record);
                DetailOutcome::Loaded
            }
            Err(err) => {
                if err.is_not_found() {
                    tracing::info!("{} {id} not found", R::NAME);
                } else {
                    tracing::warn!("Failed to fetch {} {id}: {err}", R::NAME);
                }
                state.error = Some(err.clone());
                DetailOutcome::Failed(err)
            }
        }
    }
}
