//! Pure list state machine
//!
//! Every transition is synchronous. The async driver in [`super`] asks the
//! state for a [`PageRequest`], performs the I/O without holding any lock, and
//! hands the result back to [`ListState::complete`], which drops it if the
//! list has moved on in the meantime.

use crate::api::ApiError;
use crate::models::{Page, Resource};

/// Page bookkeeping for a filtered list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    /// Last successfully fetched page (0 = nothing fetched yet)
    pub page: u32,
    /// Page count reported by the server
    pub total_pages: u32,
}

impl Cursor {
    /// Whether another page can be requested
    pub const fn has_more(&self) -> bool {
        self.page < self.total_pages
    }
}

/// What the list is currently doing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListStatus {
    /// Nothing in flight
    #[default]
    Idle,
    /// First page in flight, list was empty or reset
    Loading,
    /// First page in flight on user request, current items stay visible
    Refreshing,
    /// Next page in flight
    LoadingMore,
    /// Last first-page fetch failed
    Error,
}

impl ListStatus {
    /// Whether a fetch is in flight
    pub const fn is_fetching(self) -> bool {
        matches!(self, Self::Loading | Self::Refreshing | Self::LoadingMore)
    }
}

/// Kind of page fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// Page 1, replacing the list
    FirstPage {
        /// Pull-to-refresh rather than an initial load
        refresh: bool,
    },
    /// `cursor.page + 1`, appending to the list
    NextPage,
}

/// A fetch the driver should perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest<F> {
    /// Filter the request was issued for
    pub filter: F,
    /// 1-based page number
    pub page: u32,
    /// First or next page
    pub kind: FetchKind,
    /// Filter generation at issue time
    pub generation: u64,
}

/// Why a fetch was not issued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// A first-page fetch is already running
    InFlight,
    /// Some fetch is running or the list is in the error state
    Busy,
    /// The cursor is at the last page
    NoMorePages,
    /// The caller's filter is not the active one
    FilterMismatch,
    /// `change_filter` was called with the active filter
    UnchangedFilter,
}

/// Result of a synchronizer operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// No request was issued
    Skipped(SkipReason),
    /// First page stored, list replaced
    Replaced {
        /// Number of items now in the list
        count: usize,
    },
    /// Next page appended
    Appended {
        /// Number of items added
        count: usize,
    },
    /// The response arrived after the list moved on and was dropped
    Stale,
    /// The fetch failed; see the list's `error`
    Failed(ApiError),
}

impl SyncOutcome {
    /// Whether a request actually went out
    pub const fn issued_request(&self) -> bool {
        !matches!(self, Self::Skipped(_))
    }
}

/// Pagination state of one list
#[derive(Debug, Clone)]
pub struct ListState<R: Resource> {
    items: Vec<R>,
    cursor: Cursor,
    status: ListStatus,
    error: Option<ApiError>,
    filter: R::Filter,
    generation: u64,
    revision: u64,
}

impl<R: Resource> Default for ListState<R> {
    fn default() -> Self {
        Self::new(R::Filter::default())
    }
}

impl<R: Resource> ListState<R> {
    /// Empty, idle state for `filter`
    pub const fn new(filter: R::Filter) -> Self {
        Self {
            items: Vec::new(),
            cursor: Cursor {
                page: 0,
                total_pages: 0,
            },
            status: ListStatus::Idle,
            error: None,
            filter,
            generation: 0,
            revision: 0,
        }
    }

    /// Records in server order
    pub fn items(&self) -> &[R] {
        &self.items
    }

    /// Page bookkeeping
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Current status
    pub const fn status(&self) -> ListStatus {
        self.status
    }

    /// Last failure, cleared by the next fetch attempt
    pub const fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    /// Active filter
    pub const fn filter(&self) -> &R::Filter {
        &self.filter
    }

    /// Bumped on every filter reset
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Bumped on every change to `items`
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether another page can be requested
    pub const fn has_more(&self) -> bool {
        self.cursor.has_more()
    }

    /// Switch to `filter`, discarding items and any in-flight response
    pub fn reset(&mut self, filter: R::Filter) {
        self.items.clear();
        self.cursor = Cursor::default();
        self.status = ListStatus::Idle;
        self.error = None;
        self.filter = filter;
        self.generation += 1;
        self.revision += 1;
    }

    /// Start a first-page fetch, resetting first if `filter` is new
    pub fn begin_first_page(
        &mut self,
        filter: &R::Filter,
        refresh: bool,
    ) -> Result<PageRequest<R::Filter>, SkipReason> {
        if *filter != self.filter {
            self.reset(filter.clone());
        } else if self.status.is_fetching() {
            return Err(SkipReason::InFlight);
        }

        self.status = if refresh {
            ListStatus::Refreshing
        } else {
            ListStatus::Loading
        };
        self.error = None;

        Ok(PageRequest {
            filter: self.filter.clone(),
            page: 1,
            kind: FetchKind::FirstPage { refresh },
            generation: self.generation,
        })
    }

    /// Start a pull-to-refresh of the active filter
    pub fn begin_refresh(&mut self) -> Result<PageRequest<R::Filter>, SkipReason> {
        let filter = self.filter.clone();
        self.begin_first_page(&filter, true)
    }

    /// Start a next-page fetch
    pub fn begin_next_page(
        &mut self,
        filter: &R::Filter,
    ) -> Result<PageRequest<R::Filter>, SkipReason> {
        if *filter != self.filter {
            return Err(SkipReason::FilterMismatch);
        }
        if self.status != ListStatus::Idle {
            return Err(SkipReason::Busy);
        }
        if !self.cursor.has_more() {
            return Err(SkipReason::NoMorePages);
        }

        self.status = ListStatus::LoadingMore;
        self.error = None;

        Ok(PageRequest {
            filter: self.filter.clone(),
            page: self.cursor.page + 1,
            kind: FetchKind::NextPage,
            generation: self.generation,
        })
    }

    /// Switch filters; `None` if `filter` is already active
    pub fn change_filter(&mut self, filter: &R::Filter) -> Option<()> {
        if *filter == self.filter {
            return None;
        }
        self.reset(filter.clone());
        Some(())
    }

    /// Apply the result of `request`
    pub fn complete(
        &mut self,
        request: &PageRequest<R::Filter>,
        result: Result<Page<R>, ApiError>,
    ) -> SyncOutcome {
        if request.generation != self.generation || request.filter != self.filter {
            return SyncOutcome::Stale;
        }

        match (request.kind, result) {
            (FetchKind::FirstPage { .. }, Ok(page)) => {
                self.items = page.data;
                self.cursor = Cursor {
                    page: request.page,
                    total_pages: page.total_pages,
                };
                self.status = ListStatus::Idle;
                self.revision += 1;
                SyncOutcome::Replaced {
                    count: self.items.len(),
                }
            }
            (FetchKind::FirstPage { .. }, Err(err)) => {
                self.status = ListStatus::Error;
                self.error = Some(err.clone());
                SyncOutcome::Failed(err)
            }
            (FetchKind::NextPage, Ok(page)) => {
                let count = page.data.len();
                self.items.extend(page.data);
                self.cursor = Cursor {
                    page: request.page,
                    total_pages: page.total_pages,
                };
                self.status = ListStatus::Idle;
                self.revision += 1;
                SyncOutcome::Appended { count }
            }
            (FetchKind::NextPage, Err(err)) => {
                self.status = ListStatus::Idle;
                self.error = Some(err.clone());
                SyncOutcome::Failed(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Match, MatchFilter, MatchStatus};

    fn fixture(id: &str) -> Match {
        Match {
            id: id.to_string(),
            sport: "football".to_string(),
            home_team: "Home".to_string(),
            away_team: "Away".to_string(),
            home_score: None,
            away_score: None,
            status: MatchStatus::Upcoming,
            date: "2025-01-01".to_string(),
            time: "20:00".to_string(),
            image: None,
        }
    }

    fn page(ids: &[&str], page: u32, total_pages: u32) -> Page<Match> {
        Page {
            data: ids.iter().map(|id| fixture(id)).collect(),
            page,
            total_pages,
        }
    }

    #[test]
    fn test_first_page_replaces_items() {
        let mut state = ListState::<Match>::default();
        let all = MatchFilter::all();

        let req = state.begin_first_page(&all, false).unwrap();
        assert_eq!(req.page, 1);
        assert_eq!(state.status(), ListStatus::Loading);

        let outcome = state.complete(&req, Ok(page(&["1", "2"], 1, 3)));
        assert_eq!(outcome, SyncOutcome::Replaced { count: 2 });
        assert_eq!(state.cursor(), Cursor { page: 1, total_pages: 3 });
        assert!(state.has_more());
        assert_eq!(state.status(), ListStatus::Idle);
        assert_eq!(state.revision(), 1);
    }

    #[test]
    fn test_second_first_page_is_skipped_while_in_flight() {
        let mut state = ListState::<Match>::default();
        let all = MatchFilter::all();

        state.begin_first_page(&all, false).unwrap();
        assert_eq!(
            state.begin_first_page(&all, true),
            Err(SkipReason::InFlight)
        );
        assert_eq!(state.begin_next_page(&all), Err(SkipReason::Busy));
    }

    #[test]
    fn test_refresh_keeps_active_filter() {
        let mut state = ListState::<Match>::new(MatchFilter::sport("tennis"));
        let req = state.begin_first_page(&MatchFilter::sport("tennis"), false).unwrap();
        state.complete(&req, Ok(page(&["1"], 1, 1)));
        let generation = state.generation();

        let req = state.begin_refresh().unwrap();
        assert_eq!(req.filter, MatchFilter::sport("tennis"));
        assert_eq!(req.kind, FetchKind::FirstPage { refresh: true });
        assert_eq!(req.generation, generation);
        assert_eq!(state.status(), ListStatus::Refreshing);
        assert_eq!(state.items().len(), 1);

        assert_eq!(state.begin_refresh(), Err(SkipReason::InFlight));
    }

    #[test]
    fn test_next_page_requires_more_pages() {
        let mut state = ListState::<Match>::default();
        let all = MatchFilter::all();

        let req = state.begin_first_page(&all, false).unwrap();
        state.complete(&req, Ok(page(&["1"], 1, 1)));

        assert_eq!(state.begin_next_page(&all), Err(SkipReason::NoMorePages));
        assert_eq!(state.status(), ListStatus::Idle);
    }

    #[test]
    fn test_next_page_error_returns_to_idle() {
        let mut state = ListState::<Match>::default();
        let all = MatchFilter::all();

        let req = state.begin_first_page(&all, false).unwrap();
        state.complete(&req, Ok(page(&["1"], 1, 2)));

        let req = state.begin_next_page(&all).unwrap();
        assert_eq!(req.page, 2);
        let err = ApiError::Network("reset".to_string());
        assert_eq!(
            state.complete(&req, Err(err.clone())),
            SyncOutcome::Failed(err.clone())
        );
        assert_eq!(state.status(), ListStatus::Idle);
        assert_eq!(state.error(), Some(&err));
        assert_eq!(state.items().len(), 1);

        // retry is allowed and clears the error
        let req = state.begin_next_page(&all).unwrap();
        assert_eq!(state.error(), None);
        assert_eq!(req.page, 2);
    }

    #[test]
    fn test_filter_change_resets_and_drops_stale() {
        let mut state = ListState::<Match>::default();
        let all = MatchFilter::all();
        let football = MatchFilter::sport("football");

        let req = state.begin_first_page(&all, false).unwrap();
        state.complete(&req, Ok(page(&["1", "2"], 1, 2)));
        let next = state.begin_next_page(&all).unwrap();

        assert_eq!(state.change_filter(&football), Some(()));
        assert!(state.items().is_empty());
        assert_eq!(state.cursor(), Cursor::default());
        assert_eq!(state.status(), ListStatus::Idle);
        assert_eq!(state.change_filter(&football), None);

        let revision = state.revision();
        assert_eq!(
            state.complete(&next, Ok(page(&["3"], 2, 2))),
            SyncOutcome::Stale
        );
        assert!(state.items().is_empty());
        assert_eq!(state.revision(), revision);
    }

    #[test]
    fn test_error_state_allows_retry() {
        let mut state = ListState::<Match>::default();
        let all = MatchFilter::all();

        let req = state.begin_first_page(&all, false).unwrap();
        state.complete(&req, Ok(page(&["1"], 1, 1)));

        let req = state.begin_first_page(&all, true).unwrap();
        assert_eq!(state.status(), ListStatus::Refreshing);
        state.complete(&req, Err(ApiError::Network("down".to_string())));
        assert_eq!(state.status(), ListStatus::Error);
        assert_eq!(state.items().len(), 1);
        assert_eq!(state.begin_next_page(&all), Err(SkipReason::Busy));

        let req = state.begin_first_page(&all, false).unwrap();
        assert_eq!(state.error(), None);
        assert_eq!(
            state.complete(&req, Ok(page(&["1", "2"], 1, 1))),
            SyncOutcome::Replaced { count: 2 }
        );
    }
}
