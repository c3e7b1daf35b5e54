//! Paginated list synchronization
//!
//! [`ListSynchronizer`] drives a [`ListState`] against a [`ListSource`]. State
//! lives behind a `tokio::sync::Mutex` that is only held for the synchronous
//! transitions in [`state`]; the lock is released before the source is
//! awaited, so concurrent calls interleave only at the I/O boundary.

pub mod detail;
pub mod state;

#[cfg(test)]
pub(crate) mod mock;

pub use detail::{DetailLoader, DetailOutcome, DetailState};
pub use state::{
    Cursor, FetchKind, ListState, ListStatus, PageRequest, SkipReason, SyncOutcome,
};

use std::marker::PhantomData;
use tokio::sync::{Mutex, MutexGuard};

use crate::api::ListSource;
use crate::models::{ListFilter, Resource};

/// Keeps one filtered, paginated list in sync with its source
pub struct ListSynchronizer<R: Resource, S> {
    source: S,
    page_size: u32,
    state: Mutex<ListState<R>>,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource, S: ListSource<R>> ListSynchronizer<R, S> {
    /// Create an idle synchronizer for the default filter
    pub fn new(source: S, page_size: u32) -> Self {
        Self::with_filter(source, page_size, R::Filter::default())
    }

    /// Create an idle synchronizer for `filter`
    pub fn with_filter(source: S, page_size: u32, filter: R::Filter) -> Self {
        Self {
            source,
            page_size: page_size.max(1),
            state: Mutex::new(ListState::new(filter)),
            _resource: PhantomData,
        }
    }

    /// The underlying source
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Lock the state for reading
    pub async fn state(&self) -> MutexGuard<'_, ListState<R>> {
        self.state.lock().await
    }

    /// Copy of the current state
    pub async fn snapshot(&self) -> ListState<R> {
        self.state.lock().await.clone()
    }

    /// Load page 1 for `filter`, replacing the list
    ///
    /// A different filter resets the list first. Does nothing while another
    /// fetch is in flight.
    pub async fn fetch_first_page(&self, filter: &R::Filter, refresh: bool) -> SyncOutcome {
        let request = {
            let mut state = self.state.lock().await;
            match state.begin_first_page(filter, refresh) {
                Ok(request) => request,
                Err(reason) => return SyncOutcome::Skipped(reason),
            }
        };
        self.execute(request).await
    }

    /// Reload page 1 of the active filter
    ///
    /// The filter is read under the same lock that issues the request, so a
    /// concurrent filter change is never undone.
    pub async fn refresh(&self) -> SyncOutcome {
        let request = {
            let mut state = self.state.lock().await;
            match state.begin_refresh() {
                Ok(request) => request,
                Err(reason) => return SyncOutcome::Skipped(reason),
            }
        };
        self.execute(request).await
    }

    /// Append the next page if `filter` is active, the list is idle and more pages exist
    pub async fn load_next_page(&self, filter: &R::Filter) -> SyncOutcome {
        let request = {
            let mut state = self.state.lock().await;
            match state.begin_next_page(filter) {
                Ok(request) => request,
                Err(reason) => return SyncOutcome::Skipped(reason),
            }
        };
        self.execute(request).await
    }

    /// Switch to `filter` and load its first page
    pub async fn change_filter(&self, filter: &R::Filter) -> SyncOutcome {
        let request = {
            let mut state = self.state.lock().await;
            if state.change_filter(filter).is_none() {
                return SyncOutcome::Skipped(SkipReason::UnchangedFilter);
            }
            tracing::debug!("{} list filter changed to {}", R::NAME, filter.describe());
            match state.begin_first_page(filter, false) {
                Ok(request) => request,
                Err(reason) => return SyncOutcome::Skipped(reason),
            }
        };
        self.execute(request).await
    }

    /// Perform `request` and apply its result
    async fn execute(&self, request: PageRequest<R::Filter>) -> SyncOutcome {
        tracing::debug!(
            "Fetching {} page {} ({})",
            R::PATH,
            request.page,
            request.filter.describe()
        );

        let result = self
            .source
            .fetch_page(&request.filter, request.page, self.page_size)
            .await;

        let outcome = self.state.lock().await.complete(&request, result);

        match &outcome {
            SyncOutcome::Stale => {
                tracing::debug!("Dropped stale {} page {}", R::PATH, request.page);
            }
            SyncOutcome::Failed(err) => {
                tracing::warn!("Failed to fetch {} page {}: {err}", R::PATH, request.page);
            }
            _ => {}
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::mock::{ScriptedSource, fixture, football};
    use super::*;
    use crate::api::demo::DemoSource;
    use crate::models::{Match, MatchFilter, Player, PlayerFilter};

    fn synchronizer(items: Vec<Match>, yields: usize) -> ListSynchronizer<Match, ScriptedSource> {
        ListSynchronizer::new(ScriptedSource::new(items, yields), 2)
    }

    #[tokio::test]
    async fn test_concurrent_first_page_issues_one_request() {
        let sync = synchronizer(football(3), 2);
        let all = MatchFilter::all();

        let (a, b) = tokio::join!(
            sync.fetch_first_page(&all, false),
            sync.fetch_first_page(&all, false)
        );

        assert_eq!(sync.source().requests().len(), 1);
        let outcomes = [a, b];
        assert!(outcomes.contains(&SyncOutcome::Replaced { count: 2 }));
        assert!(outcomes.contains(&SyncOutcome::Skipped(SkipReason::InFlight)));
    }

    #[tokio::test]
    async fn test_filter_change_resets_even_when_fetch_fails() {
        let sync = synchronizer(football(3), 0);
        let all = MatchFilter::all();
        sync.fetch_first_page(&all, false).await;
        assert_eq!(sync.state().await.items().len(), 2);

        sync.source().set_failing(true);
        let outcome = sync.change_filter(&MatchFilter::sport("tennis")).await;
        assert!(matches!(outcome, SyncOutcome::Failed(_)));

        let state = sync.snapshot().await;
        assert!(state.items().is_empty());
        assert_eq!(state.cursor(), Cursor::default());
        assert_eq!(state.status(), ListStatus::Error);
        assert_eq!(state.filter(), &MatchFilter::sport("tennis"));
    }

    #[tokio::test]
    async fn test_change_to_same_filter_is_skipped() {
        let sync = synchronizer(football(1), 0);
        assert_eq!(
            sync.change_filter(&MatchFilter::all()).await,
            SyncOutcome::Skipped(SkipReason::UnchangedFilter)
        );
        assert!(sync.source().requests().is_empty());
    }

    #[tokio::test]
    async fn test_no_request_without_more_pages() {
        let sync = synchronizer(football(2), 0);
        let all = MatchFilter::all();

        sync.fetch_first_page(&all, false).await;
        assert!(!sync.state().await.has_more());

        assert_eq!(
            sync.load_next_page(&all).await,
            SyncOutcome::Skipped(SkipReason::NoMorePages)
        );
        assert_eq!(sync.source().requests().len(), 1);
    }

    #[tokio::test]
    async fn test_next_page_needs_matching_filter() {
        let sync = synchronizer(football(5), 0);
        sync.fetch_first_page(&MatchFilter::all(), false).await;

        assert_eq!(
            sync.load_next_page(&MatchFilter::sport("football")).await,
            SyncOutcome::Skipped(SkipReason::FilterMismatch)
        );
    }

    #[tokio::test]
    async fn test_pages_append_in_order() {
        let sync = synchronizer(football(6), 0);
        let all = MatchFilter::all();

        sync.fetch_first_page(&all, false).await;
        assert_eq!(
            sync.load_next_page(&all).await,
            SyncOutcome::Appended { count: 2 }
        );
        sync.load_next_page(&all).await;

        let state = sync.snapshot().await;
        let ids: Vec<_> = state.items().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3", "4", "5", "6"]);
        assert_eq!(state.cursor(), Cursor { page: 3, total_pages: 3 });
        assert!(!state.has_more());

        let pages: Vec<_> = sync.source().requests().iter().map(|(_, p)| *p).collect();
        assert_eq!(pages, [1, 2, 3]);
    }

    #[tokio::test]
    async fn test_next_page_response_dropped_after_filter_change() {
        let mut items = football(4);
        items.push(fixture("t1", "Tennis"));
        let sync = synchronizer(items, 3);
        let all = MatchFilter::all();
        let tennis = MatchFilter::sport("tennis");

        sync.fetch_first_page(&all, false).await;

        let (next, changed) = tokio::join!(sync.load_next_page(&all), async {
            tokio::task::yield_now().await;
            sync.change_filter(&tennis).await
        });

        assert_eq!(next, SyncOutcome::Stale);
        assert_eq!(changed, SyncOutcome::Replaced { count: 1 });

        let state = sync.snapshot().await;
        let ids: Vec<_> = state.items().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["t1"]);
        assert_eq!(state.filter(), &tennis);
    }

    #[tokio::test]
    async fn test_refresh_never_undoes_a_concurrent_filter_change() {
        let mut items = football(3);
        items.push(fixture("t1", "Tennis"));
        let sync = synchronizer(items, 2);
        let tennis = MatchFilter::sport("tennis");

        sync.fetch_first_page(&MatchFilter::all(), false).await;

        // Both calls queue on the lock; the refresh is granted it first.
        let guard = sync.state().await;
        let (refreshed, changed, ()) = tokio::join!(
            sync.refresh(),
            sync.change_filter(&tennis),
            async move {
                tokio::task::yield_now().await;
                drop(guard);
            }
        );

        assert_eq!(refreshed, SyncOutcome::Stale);
        assert_eq!(changed, SyncOutcome::Replaced { count: 1 });

        let state = sync.snapshot().await;
        assert_eq!(state.filter(), &tennis);
        let ids: Vec<_> = state.items().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["t1"]);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_items() {
        let sync = synchronizer(football(3), 0);
        let all = MatchFilter::all();
        sync.fetch_first_page(&all, false).await;

        sync.source().set_failing(true);
        let outcome = sync.refresh().await;
        assert!(matches!(outcome, SyncOutcome::Failed(_)));

        let state = sync.snapshot().await;
        assert_eq!(state.status(), ListStatus::Error);
        assert_eq!(state.items().len(), 2);
        assert!(state.error().is_some_and(|e| e.is_transient()));

        // manual retry recovers
        sync.source().set_failing(false);
        assert!(matches!(
            sync.refresh().await,
            SyncOutcome::Replaced { count: 2 }
        ));
        assert!(sync.state().await.error().is_none());
    }

    #[tokio::test]
    async fn test_two_page_demo_list_end_to_end() {
        let source = DemoSource::new();
        let team = "Liverpool";
        let filter = PlayerFilter::new("", None, Some(team));
        let expected = source
            .players()
            .iter()
            .filter(|p| p.team == team)
            .count();
        assert_eq!(expected, 3);

        let sync: ListSynchronizer<Player, _> = ListSynchronizer::new(&source, 2);
        sync.fetch_first_page(&filter, false).await;
        assert!(sync.state().await.has_more());

        assert_eq!(
            sync.load_next_page(&filter).await,
            SyncOutcome::Appended { count: 1 }
        );

        let state = sync.snapshot().await;
        assert_eq!(state.items().len(), expected);
        assert!(!state.has_more());
        assert_eq!(
            sync.load_next_page(&filter).await,
            SyncOutcome::Skipped(SkipReason::NoMorePages)
        );
    }
}
