//! # PrimePlay ⚽
//!
//! Data layer and command-line client for browsing sports matches and players.
//!
//! ## Overview
//!
//! PrimePlay keeps filtered, paginated lists of matches and players in sync
//! with a backend, projects them client-side (status, search, sort), keeps a
//! persisted set of favorites and signs users in against a demo auth service.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        CLI (main)                           │
//! │    Composition root: builds sources, stores and sessions    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!          ┌───────────────────┼───────────────────┐
//!          ▼                   ▼                   ▼
//! ┌─────────────────┐ ┌─────────────────┐ ┌─────────────────┐
//! │      Sync       │ │   Projection    │ │    Favorites    │
//! │                 │ │                 │ │                 │
//! │ • ListState     │ │ • Status filter │ │ • Toggle        │
//! │ • Pagination    │ │ • Search / sort │ │ • Persister     │
//! │ • Stale drop    │ │ • Memoization   │ │ • Fail-open     │
//! └─────────────────┘ └─────────────────┘ └─────────────────┘
//!          │                   │                   │
//!          └───────────────────┴───────────────────┘
//!                              │
//!          ┌───────────────────┼───────────────────┐
//!          ▼                   ▼                   ▼
//! ┌─────────────────┐ ┌─────────────────┐ ┌─────────────────┐
//! │       API       │ │      Auth       │ │     Storage     │
//! │                 │ │                 │ │                 │
//! │ • REST source   │ │ • DummyJSON     │ │ • SQLite kv     │
//! │ • Demo source   │ │ • Session vault │ │ • Config (TOML) │
//! └─────────────────┘ └─────────────────┘ └─────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`api`] — List sources (REST, demo) and the authentication client
//! - [`auth`] — Encrypted storage of the login session
//! - [`config`] — Configuration management
//! - [`db`] — `SQLite` key-value database
//! - [`favorites`] — Favorite toggling with background persistence
//! - [`models`] — Data models (Match, Player, User, Page)
//! - [`projection`] — Client-side filter/sort over loaded lists
//! - [`store`] — Async key-value store abstraction
//! - [`sync`] — Paginated list synchronizer and detail loader
//!
//! ## Example
//!
//! ```no_run
//! use primeplay::api::demo::DemoSource;
//! use primeplay::models::{Match, MatchFilter};
//! use primeplay::sync::ListSynchronizer;
//!
//! # async fn run() {
//! let source = DemoSource::new();
//! let matches: ListSynchronizer<Match, _> = ListSynchronizer::new(&source, 10);
//! matches.fetch_first_page(&MatchFilter::sport("football"), false).await;
//! matches.load_next_page(&MatchFilter::sport("football")).await;
//! println!("{} matches", matches.state().await.items().len());
//! # }
//! ```

#![doc(html_root_url = "https://docs.rs/primeplay/0.1.0")]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::unused_async)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::trivially_copy_pass_by_ref)]
#![allow(clippy::use_self)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cast_possible_truncation)]

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod favorites;
pub mod models;
pub mod paths;
pub mod projection;
pub mod store;
pub mod sync;

// Re-export main types for convenience
pub use api::{ApiError, ListSource, SportsSource};
pub use config::{Config, SourceKind};
pub use db::Database;
pub use favorites::{FavoriteSet, FavoritesCoordinator, Toggled};
pub use models::{Match, MatchFilter, MatchStatus, Page, Player, PlayerFilter, User};
pub use projection::{ProjectionCache, ProjectionQuery, SortKey, StatusFilter};
pub use sync::{ListState, ListStatus, ListSynchronizer, SyncOutcome};

/// ASCII logo for the application
pub const LOGO: &str = r"
    ____       _                ____  __
   / __ \_____(_)___ ___  ___  / __ \/ /___ ___  __
  / /_/ / ___/ / __ `__ \/ _ \/ /_/ / / __ `/ / / /
 / ____/ /  / / / / / / /  __/ ____/ / /_/ / /_/ /
/_/   /_/  /_/_/ /_/ /_/\___/_/   /_/\__,_/\__, /
                                          /____/
";

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
