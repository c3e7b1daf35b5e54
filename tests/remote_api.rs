//! REST source against a local server speaking the paged list contract

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, Uri};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use primeplay::api::demo::{demo_matches, demo_players};
use primeplay::api::remote::SportsClient;
use primeplay::models::{Match, MatchFilter, Page, Player, PlayerFilter};
use primeplay::sync::{DetailLoader, DetailOutcome, ListStatus, SkipReason};
use primeplay::{
    ApiError, Config, ListSource, ListSynchronizer, SourceKind, SportsSource, SyncOutcome,
};

#[derive(Clone, Default)]
struct Server {
    queries: Arc<Mutex<Vec<String>>>,
}

impl Server {
    fn record(&self, uri: &Uri) {
        self.queries
            .lock()
            .unwrap()
            .push(uri.query().unwrap_or_default().to_string());
    }

    fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[derive(Deserialize)]
struct ListQuery {
    page: u32,
    limit: u32,
    sport: Option<String>,
    search: Option<String>,
    position: Option<String>,
    team: Option<String>,
}

async fn list_matches(
    State(server): State<Server>,
    uri: Uri,
    Query(q): Query<ListQuery>,
) -> Json<Page<Match>> {
    server.record(&uri);
    let filter = MatchFilter::sport(q.sport.as_deref().unwrap_or("all"));
    let selected = demo_matches()
        .into_iter()
        .filter(|m| filter.matches(m))
        .collect();
    Json(Page::slice(selected, q.page, q.limit))
}

async fn list_players(
    State(server): State<Server>,
    uri: Uri,
    Query(q): Query<ListQuery>,
) -> Json<Page<Player>> {
    server.record(&uri);
    let filter = PlayerFilter::new(
        q.search.as_deref().unwrap_or_default(),
        q.position.as_deref(),
        q.team.as_deref(),
    );
    let selected = demo_players()
        .into_iter()
        .filter(|p| filter.matches(p))
        .collect();
    Json(Page::slice(selected, q.page, q.limit))
}

async fn match_detail(
    Path(id): Path<String>,
) -> Result<Json<Match>, (StatusCode, Json<serde_json::Value>)> {
    demo_matches()
        .into_iter()
        .find(|m| m.id == id)
        .map(Json)
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": "Match not found" })),
            )
        })
}

async fn maintenance() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({ "message": "Down for maintenance" })),
    )
}

async fn spawn_server() -> (SocketAddr, Server) {
    let server = Server::default();
    let app = Router::new()
        .route("/api/matches", get(list_matches))
        .route("/api/matches/{id}", get(match_detail))
        .route("/api/players", get(list_players))
        .route("/down/matches", get(maintenance))
        .with_state(server.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, server)
}

fn client(addr: SocketAddr, root: &str) -> SportsClient {
    SportsClient::new(&format!("http://{addr}/{root}"), Duration::from_secs(5))
}

#[tokio::test]
async fn test_pages_through_filtered_list() {
    let (addr, server) = spawn_server().await;
    let client = client(addr, "api");
    let football = MatchFilter::sport("Football");

    let sync: ListSynchronizer<Match, _> = ListSynchronizer::new(&client, 3);
    assert!(matches!(
        sync.fetch_first_page(&football, false).await,
        SyncOutcome::Replaced { count: 3 }
    ));
    assert!(sync.state().await.has_more());

    assert_eq!(
        sync.load_next_page(&football).await,
        SyncOutcome::Appended { count: 1 }
    );
    assert_eq!(
        sync.load_next_page(&football).await,
        SyncOutcome::Skipped(SkipReason::NoMorePages)
    );

    let expected: Vec<String> = demo_matches()
        .into_iter()
        .filter(|m| football.matches(m))
        .map(|m| m.id)
        .collect();
    let state = sync.snapshot().await;
    let loaded: Vec<String> = state.items().iter().map(|m| m.id.clone()).collect();
    assert_eq!(loaded, expected);

    assert_eq!(
        server.queries(),
        [
            "page=1&limit=3&sport=football",
            "page=2&limit=3&sport=football"
        ]
    );
}

#[tokio::test]
async fn test_player_filters_are_sent_encoded() {
    let (addr, server) = spawn_server().await;
    let client = client(addr, "api");
    let filter = PlayerFilter::new("van dijk", Some("Defender"), None);

    let sync: ListSynchronizer<Player, _> = ListSynchronizer::new(&client, 10);
    sync.fetch_first_page(&filter, false).await;

    let state = sync.snapshot().await;
    assert_eq!(state.items().len(), 1);
    assert_eq!(state.items()[0].name, "Virgil van Dijk");
    assert_eq!(
        server.queries(),
        ["page=1&limit=10&search=van%20dijk&position=defender"]
    );
}

#[tokio::test]
async fn test_missing_detail_is_not_found() {
    let (addr, _) = spawn_server().await;
    let client = client(addr, "api");

    let found = ListSource::<Match>::fetch_by_id(&client, "2").await.unwrap();
    assert_eq!(found.id, "2");

    let loader: DetailLoader<Match, _> = DetailLoader::new(&client);
    let DetailOutcome::Failed(err) = loader.fetch("999").await else {
        panic!("expected not found");
    };
    assert_eq!(
        err,
        ApiError::NotFound {
            resource: "match",
            id: "999".to_string()
        }
    );
}

#[tokio::test]
async fn test_server_error_sets_error_state() {
    let (addr, _) = spawn_server().await;
    let client = client(addr, "down");

    let sync: ListSynchronizer<Match, _> = ListSynchronizer::new(&client, 10);
    let outcome = sync.fetch_first_page(&MatchFilter::all(), false).await;

    let expected = ApiError::Status {
        status: 503,
        message: "Down for maintenance".to_string(),
    };
    assert_eq!(outcome, SyncOutcome::Failed(expected.clone()));

    let state = sync.snapshot().await;
    assert_eq!(state.status(), ListStatus::Error);
    assert_eq!(state.error(), Some(&expected));
    assert!(expected.is_transient());
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = ListSource::<Match>::fetch_page(&client(addr, "api"), &MatchFilter::all(), 1, 10)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
    assert_eq!(
        err.user_message(),
        "Network error. Please check your connection."
    );
}

#[tokio::test]
async fn test_source_from_config() {
    let (addr, _) = spawn_server().await;
    let config = Config {
        source: SourceKind::Remote,
        api_base_url: format!("http://{addr}/api"),
        ..Config::default()
    };

    let source = SportsSource::from_config(&config);
    assert_eq!(source.kind(), SourceKind::Remote);

    let page = ListSource::<Player>::fetch_page(&source, &PlayerFilter::default(), 1, 4)
        .await
        .unwrap();
    assert_eq!(page.data.len(), 4);
    assert_eq!(page.total_pages, 3);
}
