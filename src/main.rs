//! PrimePlay - sports matches and players from the terminal
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use std::io::Write;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use primeplay::api::auth::AuthClient;
use primeplay::auth::SessionVault;
use primeplay::models::{ListFilter, RegisterProfile, Resource};
use primeplay::projection::{project, related};
use primeplay::store::SqliteStore;
use primeplay::sync::{DetailLoader, DetailOutcome};
use primeplay::{
    Config, FavoritesCoordinator, ListSource, ListState, ListSynchronizer, Match, MatchFilter,
    Player, PlayerFilter, ProjectionQuery, SortKey, SourceKind, SportsSource, StatusFilter,
    SyncOutcome, Toggled,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (RUST_LOG=debug for verbose output)
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let (command, demo) = parse_args()?;

    let mut config = Config::load()?;
    if demo {
        config.source = SourceKind::Demo;
    }
    tracing::debug!("Using {} source", config.source.as_str());

    match command {
        Command::Matches(options) => matches_cli(&config, &options).await,
        Command::Match { id } => match_cli(&config, &id).await,
        Command::Players(options) => players_cli(&config, &options).await,
        Command::Player { id } => player_cli(&config, &id).await,
        Command::Favorites { clear } => favorites_cli(&config, clear).await,
        Command::Favorite { id } => favorite_cli(&config, &id).await,
        Command::Login { username } => login_cli(&config, username).await,
        Command::Register => register_cli(&config).await,
        Command::Logout => logout_cli(&config).await,
        Command::Whoami => whoami_cli(&config).await,
        Command::Config { init } => config_cli(&config, init),
        Command::Help => {
            print_help();
            Ok(())
        }
        Command::Version => {
            print_version();
            Ok(())
        }
    }
}

/// CLI commands
enum Command {
    Matches(ListOptions),
    Match { id: String },
    Players(ListOptions),
    Player { id: String },
    Favorites { clear: bool },
    Favorite { id: String },
    Login { username: Option<String> },
    Register,
    Logout,
    Whoami,
    Config { init: bool },
    Help,
    Version,
}

/// Options shared by the list commands
#[derive(Default)]
struct ListOptions {
    sport: Option<String>,
    search: String,
    position: Option<String>,
    team: Option<String>,
    status: StatusFilter,
    sort: SortKey,
    pages: u32,
}

impl ListOptions {
    fn parse(args: &[String]) -> Result<Self> {
        let mut options = Self {
            pages: 1,
            ..Self::default()
        };

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "-s" | "--sport" => options.sport = Some(next_value(&mut iter, arg)?),
                "-q" | "--search" => options.search = next_value(&mut iter, arg)?,
                "-p" | "--position" => options.position = Some(next_value(&mut iter, arg)?),
                "-t" | "--team" => options.team = Some(next_value(&mut iter, arg)?),
                "--status" => {
                    let value = next_value(&mut iter, arg)?;
                    options.status = StatusFilter::parse(&value).ok_or_else(|| {
                        anyhow::anyhow!("Unknown status: {value} (all, live, upcoming, completed)")
                    })?;
                }
                "--sort" => {
                    let value = next_value(&mut iter, arg)?;
                    options.sort = SortKey::parse(&value).ok_or_else(|| {
                        anyhow::anyhow!("Unknown sort: {value} (none, recent, upcoming, popular)")
                    })?;
                }
                "-n" | "--pages" => {
                    let value = next_value(&mut iter, arg)?;
                    options.pages = value
                        .parse::<u32>()
                        .with_context(|| format!("Invalid page count: {value}"))?
                        .max(1);
                }
                other => {
                    return Err(anyhow::anyhow!(
                        "Unknown option: {other}\nRun 'primeplay --help' for usage"
                    ));
                }
            }
        }

        Ok(options)
    }

    fn query(&self) -> ProjectionQuery {
        ProjectionQuery {
            status: self.status,
            search: self.search.clone(),
            sort: self.sort,
        }
    }
}

fn next_value(iter: &mut std::slice::Iter<'_, String>, flag: &str) -> Result<String> {
    iter.next()
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Missing value for {flag}"))
}

fn parse_args() -> Result<(Command, bool)> {
    let mut args: Vec<String> = std::env::args().skip(1).collect();

    let demo = args.iter().any(|a| a == "--demo");
    args.retain(|a| a != "--demo");

    let Some(first) = args.first() else {
        return Ok((Command::Help, demo));
    };

    let command = match first.as_str() {
        "-h" | "--help" | "help" => Command::Help,
        "-v" | "--version" | "version" => Command::Version,

        "matches" => Command::Matches(ListOptions::parse(&args[1..])?),
        "players" => Command::Players(ListOptions::parse(&args[1..])?),

        "match" => Command::Match {
            id: args
                .get(1)
                .ok_or_else(|| anyhow::anyhow!("Missing match id"))?
                .clone(),
        },
        "player" => Command::Player {
            id: args
                .get(1)
                .ok_or_else(|| anyhow::anyhow!("Missing player id"))?
                .clone(),
        },

        "favorites" | "favs" => Command::Favorites {
            clear: args.get(1).is_some_and(|a| a == "clear"),
        },
        "favorite" | "fav" => Command::Favorite {
            id: args
                .get(1)
                .ok_or_else(|| anyhow::anyhow!("Missing match id"))?
                .clone(),
        },

        "login" => Command::Login {
            username: args.get(1).cloned(),
        },
        "register" => Command::Register,
        "logout" => Command::Logout,
        "whoami" => Command::Whoami,
        "config" => Command::Config {
            init: args.get(1).is_some_and(|a| a == "init"),
        },

        other => {
            return Err(anyhow::anyhow!(
                "Unknown command: {other}\nRun 'primeplay --help' for usage"
            ));
        }
    };

    Ok((command, demo))
}

fn print_help() {
    let config_path = Config::default_path()
        .map_or_else(|_| "Unknown".to_string(), |p| p.display().to_string());

    println!(
        r#"{}
⚽ PrimePlay - sports matches and players from the terminal

USAGE:
    primeplay [--demo] <COMMAND>

COMMANDS:
    matches [OPTIONS]                  List matches
      Options:
        -s, --sport <sport>            Only one sport (default: all)
        -q, --search <text>            Search teams and sport
            --status <status>          all, live, upcoming, completed
            --sort <key>               none, recent, upcoming, popular
        -n, --pages <n>                Pages to load (default: 1)
      Examples:
        primeplay matches --sport football --status live
        primeplay matches --sort recent --pages 3

    match <id>                         Show a match and related matches

    players [OPTIONS]                  List players
      Options:
        -q, --search <text>            Search name, team and position
        -p, --position <position>      Only one position
        -t, --team <team>              Only one team
            --sort popular             Highest rated first
        -n, --pages <n>                Pages to load (default: 1)

    player <id>                        Show a player profile

    favorites [clear]                  List (or clear) favorite matches
    favorite <match-id>                Add or remove a favorite match

    login [username]                   Sign in
    register                           Create an account
    logout                             Sign out
    whoami                             Show the signed-in user

    config [init]                      Show (or write out) the active settings

OPTIONS:
    --demo                             Use the bundled demo dataset
    -h, --help                         Show this help message
    -v, --version                      Show version information

CONFIG:
    {}
"#,
        primeplay::LOGO,
        config_path
    );
}

fn print_version() {
    println!("primeplay {}", primeplay::VERSION);
}

// ==================== Lists ====================

/// Load the first page and up to `pages - 1` more
async fn load_pages<R: Resource, S: ListSource<R>>(
    sync: &ListSynchronizer<R, S>,
    filter: &R::Filter,
    pages: u32,
) -> Result<ListState<R>> {
    if let SyncOutcome::Failed(err) = sync.fetch_first_page(filter, false).await {
        anyhow::bail!("{}", err.user_message());
    }

    for _ in 1..pages {
        match sync.load_next_page(filter).await {
            SyncOutcome::Appended { .. } => {}
            SyncOutcome::Failed(err) => {
                eprintln!("⚠ {}", err.user_message());
                break;
            }
            _ => break,
        }
    }

    Ok(sync.snapshot().await)
}

fn print_footer<R: Resource>(state: &ListState<R>, shown: usize) {
    let cursor = state.cursor();
    println!(
        "\nShowing {} of {} loaded · page {}/{}",
        shown,
        state.items().len(),
        cursor.page,
        cursor.total_pages
    );
    if state.has_more() {
        println!("More available: --pages {}", cursor.page + 1);
    }
}

fn print_match(record: &Match, favorite: bool) {
    let marker = if favorite { "★" } else { " " };
    let score = record.score_line().unwrap_or_else(|| "-".to_string());
    println!(
        "{marker} {:>4}  {:<4}  {:<10}  {:<42} {:>7}  {} {}",
        record.id,
        record.status.label(),
        record.sport,
        record.title(),
        score,
        record.date,
        record.time
    );
}

fn print_player(record: &Player) {
    println!(
        "  {:>4}  #{:<3} {:<22} {:<12} {:<18} ★ {:.1}",
        record.id, record.jersey_number, record.name, record.position, record.team, record.rating
    );
}

async fn matches_cli(config: &Config, options: &ListOptions) -> Result<()> {
    let source = SportsSource::from_config(config);
    let filter = MatchFilter::sport(options.sport.as_deref().unwrap_or("all"));

    let sync: ListSynchronizer<Match, _> = ListSynchronizer::new(&source, config.page_size);
    let state = load_pages(&sync, &filter, options.pages).await?;
    let favorites = open_favorites(config).await?;

    println!("⚽ Matches · {}", filter.describe());
    println!("{}", "─".repeat(90));

    let shown = project(state.items(), &options.query());
    if shown.is_empty() {
        println!("No matches found.");
    }
    for record in &shown {
        print_match(record, favorites.contains(&record.id));
    }

    print_footer(&state, shown.len());
    favorites.shutdown();
    Ok(())
}

async fn players_cli(config: &Config, options: &ListOptions) -> Result<()> {
    let source = SportsSource::from_config(config);
    let filter = PlayerFilter::new(
        &options.search,
        options.position.as_deref(),
        options.team.as_deref(),
    );

    let sync: ListSynchronizer<Player, _> = ListSynchronizer::new(&source, config.page_size);
    let state = load_pages(&sync, &filter, options.pages).await?;

    println!("👤 Players · {}", filter.describe());
    println!("{}", "─".repeat(80));

    // the filter already went to the source; only status and sort apply locally
    let query = ProjectionQuery {
        search: String::new(),
        ..options.query()
    };
    let shown = project(state.items(), &query);
    if shown.is_empty() {
        println!("No players found.");
    }
    for record in &shown {
        print_player(record);
    }

    print_footer(&state, shown.len());
    Ok(())
}

// ==================== Details ====================

/// Fetch one record through a [`DetailLoader`]
async fn load_detail<R: Resource, S: ListSource<R>>(source: S, id: &str) -> Result<R> {
    let loader: DetailLoader<R, S> = DetailLoader::new(source);
    if let DetailOutcome::Failed(err) = loader.fetch(id).await {
        anyhow::bail!("{}", err.user_message());
    }
    loader
        .snapshot()
        .await
        .record
        .ok_or_else(|| anyhow::anyhow!("{} {id} not found", R::NAME))
}

async fn match_cli(config: &Config, id: &str) -> Result<()> {
    let source = SportsSource::from_config(config);
    let record: Match = load_detail(&source, id).await?;
    let favorites = open_favorites(config).await?;

    println!(
        "\n{} {}{}",
        record.status.label(),
        record.title(),
        if favorites.contains(&record.id) { "  ★" } else { "" }
    );
    println!("{}", "─".repeat(60));
    println!("Sport:   {}", record.sport);
    println!("Kickoff: {} {}", record.date, record.time);
    if let Some(score) = record.score_line() {
        println!("Score:   {score}");
    }
    favorites.shutdown();

    let sync: ListSynchronizer<Match, _> = ListSynchronizer::new(&source, config.page_size);
    sync.fetch_first_page(&MatchFilter::sport(&record.sport), false)
        .await;
    let state = sync.state().await;
    let others = related(state.items(), &record, 5);
    if !others.is_empty() {
        println!("\nRelated {} matches:", record.sport);
        for other in others {
            print_match(other, false);
        }
    }

    Ok(())
}

async fn player_cli(config: &Config, id: &str) -> Result<()> {
    let source = SportsSource::from_config(config);
    let record: Player = load_detail(&source, id).await?;

    println!("\n#{} {}", record.jersey_number, record.name);
    println!("{}", "─".repeat(60));
    println!("Team:        {}", record.team);
    println!("Position:    {}", record.position);
    println!("Age:         {}", record.age);
    println!("Nationality: {}", record.nationality);
    println!("Rating:      {:.1}", record.rating);

    let stats = record.stats;
    println!(
        "\nApps {} · Goals {} · Assists {} · Yellow {} · Red {}",
        stats.appearances, stats.goals, stats.assists, stats.yellow_cards, stats.red_cards
    );

    if let Some(bio) = &record.bio {
        println!("\n{}", textwrap::fill(bio, 72));
    }

    if !record.achievements.is_empty() {
        println!("\nAchievements:");
        for achievement in &record.achievements {
            println!("  🏆 {achievement}");
        }
    }

    if !record.recent_matches.is_empty() {
        println!("\nRecent matches:");
        for m in &record.recent_matches {
            println!(
                "  {}  vs {:<20} {:<8} {}",
                m.date, m.opponent, m.result, m.performance
            );
        }
    }

    let sync: ListSynchronizer<Player, _> = ListSynchronizer::new(&source, config.page_size);
    sync.fetch_first_page(&PlayerFilter::new("", None, Some(&record.team)), false)
        .await;
    let state = sync.state().await;
    let teammates = related(state.items(), &record, 5);
    if !teammates.is_empty() {
        println!("\nTeammates:");
        for teammate in teammates {
            print_player(teammate);
        }
    }

    Ok(())
}

// ==================== Favorites ====================

async fn open_favorites(config: &Config) -> Result<FavoritesCoordinator<Match>> {
    let store = SqliteStore::open().context("Failed to open favorites database")?;
    Ok(FavoritesCoordinator::load(store, &config.favorites_key).await)
}

/// Wait for pending writes and report any that failed
async fn finish_favorites(favorites: &mut FavoritesCoordinator<Match>) {
    favorites.flush().await;
    for failure in favorites.poll_failures() {
        eprintln!("⚠ Could not save favorites: {}", failure.error);
    }
    favorites.shutdown();
}

async fn favorites_cli(config: &Config, clear: bool) -> Result<()> {
    let mut favorites = open_favorites(config).await?;

    if clear {
        favorites.clear_all();
        finish_favorites(&mut favorites).await;
        println!("✓ Favorites cleared");
        return Ok(());
    }

    if favorites.set().is_empty() {
        println!("No favorites yet.");
        println!("\nAdd one with:");
        println!("  primeplay favorite <match-id>");
    } else {
        println!("★ Favorites\n");
        for record in favorites.set().items() {
            print_match(record, true);
        }
    }

    favorites.shutdown();
    Ok(())
}

async fn favorite_cli(config: &Config, id: &str) -> Result<()> {
    let mut favorites = open_favorites(config).await?;

    let existing = favorites.set().items().iter().find(|m| m.id == id).cloned();
    let record = match existing {
        Some(record) => record,
        None => {
            let source = SportsSource::from_config(config);
            ListSource::<Match>::fetch_by_id(&source, id)
                .await
                .map_err(|e| anyhow::anyhow!("{}", e.user_message()))?
        }
    };

    let title = record.title();
    match favorites.toggle(record) {
        Toggled::Added => println!("★ Added {title} to favorites"),
        Toggled::Removed => println!("☆ Removed {title} from favorites"),
    }

    finish_favorites(&mut favorites).await;
    Ok(())
}

// ==================== Account ====================

fn prompt(label: &str) -> Result<String> {
    print!("{label} ");
    std::io::stdout().flush()?;
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn auth_client(config: &Config) -> AuthClient {
    AuthClient::new(&config.auth_base_url, config.request_timeout())
}

async fn login_cli(config: &Config, username: Option<String>) -> Result<()> {
    let username = match username {
        Some(username) => username,
        None => prompt("Username:")?,
    };
    let password = prompt("Password:")?;
    if username.is_empty() || password.is_empty() {
        anyhow::bail!("Please enter both username and password");
    }

    let session = auth_client(config).login(&username, &password).await?;
    SessionVault::open()?.store(&session)?;

    println!("\n✓ Logged in as {} (@{})", session.user.name, session.user.username);
    Ok(())
}

async fn register_cli(config: &Config) -> Result<()> {
    let profile = RegisterProfile {
        name: prompt("Full name:")?,
        email: prompt("Email:")?,
        username: prompt("Username:")?,
        password: prompt("Password:")?,
    };
    if profile.name.is_empty()
        || profile.email.is_empty()
        || profile.username.is_empty()
        || profile.password.is_empty()
    {
        anyhow::bail!("Please fill in all fields");
    }

    let session = auth_client(config).register(&profile).await?;
    SessionVault::open()?.store(&session)?;

    println!("\n✓ Account created for @{}", session.user.username);
    Ok(())
}

async fn logout_cli(config: &Config) -> Result<()> {
    let vault = SessionVault::open()?;
    auth_client(config).logout().await?;

    if vault.clear()? {
        println!("✓ Logged out");
    } else {
        println!("Not logged in.");
    }
    Ok(())
}

async fn whoami_cli(config: &Config) -> Result<()> {
    let vault = SessionVault::open()?;
    let Some(mut session) = vault.load()? else {
        println!("Not logged in. Run: primeplay login");
        return Ok(());
    };

    let client = auth_client(config);
    let mut verified = client.verify_token(&session.token).await;

    if verified.is_none()
        && let Some(refresh) = session.refresh_token.clone()
    {
        match client.refresh_token(&refresh).await {
            Ok(pair) => {
                session.token = pair.token;
                if pair.refresh_token.is_some() {
                    session.refresh_token = pair.refresh_token;
                }
                verified = client.verify_token(&session.token).await;
            }
            Err(e) => tracing::warn!("Token refresh failed: {e}"),
        }
    }

    let note = match verified {
        Some(user) => {
            session.user = user;
            vault.store(&session)?;
            ""
        }
        None => " (session could not be verified)",
    };

    let user = &session.user;
    println!("{} (@{}){note}", user.name, user.username);
    println!("  Email: {}", user.email);
    println!("  Id:    {}", user.id);
    Ok(())
}

// ==================== Config ====================

fn config_cli(config: &Config, init: bool) -> Result<()> {
    let path = Config::default_path()?;

    if init {
        config.save_to(&path)?;
        println!("✓ Wrote {}", path.display());
        return Ok(());
    }

    let state = if path.exists() { "" } else { " (not created, defaults)" };
    println!("# {}{state}\n", path.display());
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
