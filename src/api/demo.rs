//! Bundled demo dataset
//!
//! Serves matches and players from memory with the same paging contract as
//! the REST backend. Filtering happens here, client-side.

use std::time::Duration;

use crate::models::{
    Match, MatchFilter, MatchStatus, Page, Player, PlayerFilter, PlayerStats, RecentMatch,
};

use super::{ApiError, ListSource};

/// In-memory list source
#[derive(Debug, Clone)]
pub struct DemoSource {
    matches: Vec<Match>,
    players: Vec<Player>,
    latency: Duration,
}

impl Default for DemoSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoSource {
    /// Demo source with no simulated latency
    pub fn new() -> Self {
        Self::with_latency(Duration::ZERO)
    }

    /// Demo source that sleeps `latency` before every response
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            matches: demo_matches(),
            players: demo_players(),
            latency,
        }
    }

    /// All bundled matches
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    /// All bundled players
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl ListSource<Match> for DemoSource {
    async fn fetch_page(
        &self,
        filter: &MatchFilter,
        page: u32,
        limit: u32,
    ) -> Result<Page<Match>, ApiError> {
        self.simulate_latency().await;

        let filtered: Vec<Match> = self
            .matches
            .iter()
            .filter(|m| filter.matches(m))
            .cloned()
            .collect();

        Ok(Page::slice(filtered, page, limit))
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Match, ApiError> {
        self.simulate_latency().await;

        self.matches
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound {
                resource: "match",
                id: id.to_string(),
            })
    }
}

impl ListSource<Player> for DemoSource {
    async fn fetch_page(
        &self,
        filter: &PlayerFilter,
        page: u32,
        limit: u32,
    ) -> Result<Page<Player>, ApiError> {
        self.simulate_latency().await;

        let filtered: Vec<Player> = self
            .players
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();

        Ok(Page::slice(filtered, page, limit))
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Player, ApiError> {
        self.simulate_latency().await;

        self.players
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound {
                resource: "player",
                id: id.to_string(),
            })
    }
}

fn fixture(
    id: &str,
    sport: &str,
    (home_team, away_team): (&str, &str),
    score: Option<(u32, u32)>,
    status: MatchStatus,
    (date, time): (&str, &str),
    image: &str,
) -> Match {
    Match {
        id: id.to_string(),
        sport: sport.to_string(),
        home_team: home_team.to_string(),
        away_team: away_team.to_string(),
        home_score: score.map(|(h, _)| h),
        away_score: score.map(|(_, a)| a),
        status,
        date: date.to_string(),
        time: time.to_string(),
        image: Some(format!("https://images.unsplash.com/{image}?w=800")),
    }
}

/// Bundled matches, grouped by sport
pub fn demo_matches() -> Vec<Match> {
    use MatchStatus::{Completed, Live, Upcoming};

    vec![
        fixture(
            "1",
            "Football",
            ("Manchester United", "Liverpool"),
            Some((2, 1)),
            Live,
            ("2025-11-22", "15:00"),
            "photo-1574629810360-7efbbe195018",
        ),
        fixture(
            "2",
            "Football",
            ("Barcelona", "Real Madrid"),
            Some((3, 2)),
            Completed,
            ("2025-11-21", "20:00"),
            "photo-1522778119026-d647f0596c20",
        ),
        fixture(
            "3",
            "Football",
            ("Chelsea", "Arsenal"),
            None,
            Upcoming,
            ("2025-11-23", "17:30"),
            "photo-1431324155629-1a6deb1dec8d",
        ),
        fixture(
            "4",
            "Football",
            ("Bayern Munich", "Borussia Dortmund"),
            Some((1, 1)),
            Live,
            ("2025-11-22", "18:30"),
            "photo-1579952363873-27f3bade9f55",
        ),
        fixture(
            "5",
            "Basketball",
            ("LA Lakers", "Golden State Warriors"),
            Some((112, 108)),
            Completed,
            ("2025-11-21", "22:00"),
            "photo-1546519638-68e109498ffc",
        ),
        fixture(
            "6",
            "Basketball",
            ("Boston Celtics", "Miami Heat"),
            Some((95, 92)),
            Live,
            ("2025-11-22", "19:00"),
            "photo-1519861531473-9200262188bf",
        ),
        fixture(
            "7",
            "Basketball",
            ("Chicago Bulls", "Brooklyn Nets"),
            None,
            Upcoming,
            ("2025-11-23", "20:00"),
            "photo-1608245449230-4ac19066d2d0",
        ),
        fixture(
            "8",
            "Cricket",
            ("India", "Australia"),
            Some((287, 245)),
            Completed,
            ("2025-11-20", "09:30"),
            "photo-1540747913346-19e32dc3e97e",
        ),
        fixture(
            "9",
            "Cricket",
            ("England", "Pakistan"),
            Some((156, 142)),
            Live,
            ("2025-11-22", "14:00"),
            "photo-1531415074968-036ba1b575da",
        ),
        fixture(
            "10",
            "Cricket",
            ("South Africa", "New Zealand"),
            None,
            Upcoming,
            ("2025-11-24", "10:00"),
            "photo-1624526267942-ab0ff8a3e972",
        ),
        fixture(
            "11",
            "Tennis",
            ("Rafael Nadal", "Novak Djokovic"),
            Some((2, 1)),
            Live,
            ("2025-11-22", "16:00"),
            "photo-1622279457486-62dcc4a431d6",
        ),
        fixture(
            "12",
            "Tennis",
            ("Roger Federer", "Andy Murray"),
            Some((3, 1)),
            Completed,
            ("2025-11-21", "13:00"),
            "photo-1554068865-24cecd4e34b8",
        ),
        fixture(
            "13",
            "Tennis",
            ("Serena Williams", "Naomi Osaka"),
            None,
            Upcoming,
            ("2025-11-23", "15:00"),
            "photo-1595435742656-5272d0e3dce5",
        ),
        fixture(
            "14",
            "Baseball",
            ("New York Yankees", "Boston Red Sox"),
            Some((5, 3)),
            Completed,
            ("2025-11-21", "19:00"),
            "photo-1566577739112-5180d4bf9390",
        ),
        fixture(
            "15",
            "Baseball",
            ("LA Dodgers", "San Francisco Giants"),
            Some((2, 2)),
            Live,
            ("2025-11-22", "21:00"),
            "photo-1511149672551-52ed2c9f1e5e",
        ),
        fixture(
            "16",
            "Rugby",
            ("All Blacks", "Springboks"),
            Some((21, 18)),
            Completed,
            ("2025-11-20", "14:00"),
            "photo-1486286701208-1d58e9338013",
        ),
        fixture(
            "17",
            "Rugby",
            ("England", "Ireland"),
            Some((14, 10)),
            Live,
            ("2025-11-22", "15:30"),
            "photo-1513021514518-eb7e8fc0f448",
        ),
        fixture(
            "18",
            "Hockey",
            ("Toronto Maple Leafs", "Montreal Canadiens"),
            Some((4, 2)),
            Completed,
            ("2025-11-21", "19:00"),
            "photo-1515703407324-5f753afd8be8",
        ),
        fixture(
            "19",
            "Hockey",
            ("Boston Bruins", "New York Rangers"),
            Some((3, 3)),
            Live,
            ("2025-11-22", "20:00"),
            "photo-1529699211952-734e80c4d42b",
        ),
        fixture(
            "20",
            "Volleyball",
            ("Brazil", "Italy"),
            Some((3, 2)),
            Completed,
            ("2025-11-21", "17:00"),
            "photo-1612872087720-bb876e2e67d1",
        ),
        fixture(
            "21",
            "Volleyball",
            ("Poland", "Japan"),
            None,
            Upcoming,
            ("2025-11-23", "16:00"),
            "photo-1612534847738-b4a5f44cd83c",
        ),
    ]
}

struct Profile<'a> {
    id: &'a str,
    name: &'a str,
    position: &'a str,
    team: &'a str,
    image: &'a str,
    rating: f32,
    age: u32,
    nationality: &'a str,
    jersey_number: u32,
    bio: &'a str,
    stats: [u32; 5],
    achievements: &'a [&'a str],
    /// (match id, opponent, date, result, performance)
    recent_matches: &'a [(&'a str, &'a str, &'a str, &'a str, &'a str)],
}

impl Profile<'_> {
    fn into_player(self) -> Player {
        let [appearances, goals, assists, yellow_cards, red_cards] = self.stats;
        Player {
            id: self.id.to_string(),
            name: self.name.to_string(),
            position: self.position.to_string(),
            team: self.team.to_string(),
            image: Some(format!("https://images.unsplash.com/{}?w=400", self.image)),
            rating: self.rating,
            age: self.age,
            nationality: self.nationality.to_string(),
            jersey_number: self.jersey_number,
            bio: Some(self.bio.to_string()),
            stats: PlayerStats {
                appearances,
                goals,
                assists,
                yellow_cards,
                red_cards,
            },
            achievements: self.achievements.iter().map(ToString::to_string).collect(),
            recent_matches: self
                .recent_matches
                .iter()
                .map(|&(id, opponent, date, result, performance)| RecentMatch {
                    id: id.to_string(),
                    opponent: opponent.to_string(),
                    date: date.to_string(),
                    result: result.to_string(),
                    performance: performance.to_string(),
                })
                .collect(),
        }
    }
}

/// Bundled player profiles
pub fn demo_players() -> Vec<Player> {
    [
        Profile {
            id: "1",
            name: "Cristiano Ronaldo",
            position: "Forward",
            team: "Al Nassr",
            image: "photo-1579952363873-27f3bade9f55",
            rating: 9.2,
            age: 38,
            nationality: "Portugal",
            jersey_number: 7,
            bio: "One of the greatest footballers of all time with numerous records \
                  and achievements.",
            stats: [850, 701, 221, 120, 11],
            achievements: &["5x Ballon d'Or", "5x UEFA Champions League", "Euro 2016 Winner"],
            recent_matches: &[
                ("1", "Al Hilal", "2025-11-20", "W 2-1", "1 Goal"),
                ("2", "Al Ittihad", "2025-11-17", "D 1-1", "1 Assist"),
            ],
        },
        Profile {
            id: "2",
            name: "Lionel Messi",
            position: "Forward",
            team: "Inter Miami",
            image: "photo-1574629810360-7efbbe195018",
            rating: 9.5,
            age: 36,
            nationality: "Argentina",
            jersey_number: 10,
            bio: "Record 8-time Ballon d'Or winner and World Cup champion with Argentina.",
            stats: [900, 815, 361, 95, 3],
            achievements: &["8x Ballon d'Or", "4x UEFA Champions League", "World Cup 2022 Winner"],
            recent_matches: &[
                ("3", "Orlando City", "2025-11-19", "W 3-0", "2 Goals, 1 Assist"),
                ("4", "Atlanta United", "2025-11-15", "W 2-1", "1 Goal"),
            ],
        },
        Profile {
            id: "3",
            name: "Kylian Mbappé",
            position: "Forward",
            team: "Real Madrid",
            image: "photo-1522778119026-d647f0596c20",
            rating: 9.0,
            age: 25,
            nationality: "France",
            jersey_number: 9,
            bio: "Young superstar and World Cup winner known for incredible speed and finishing.",
            stats: [350, 280, 125, 30, 2],
            achievements: &["World Cup 2018 Winner", "Ligue 1 Top Scorer x5", "Golden Boot 2022"],
            recent_matches: &[
                ("5", "Barcelona", "2025-11-21", "W 3-2", "1 Goal"),
                ("6", "Atletico Madrid", "2025-11-18", "W 2-0", "1 Goal, 1 Assist"),
            ],
        },
        Profile {
            id: "4",
            name: "Erling Haaland",
            position: "Forward",
            team: "Manchester City",
            image: "photo-1431324155629-1a6deb1dec8d",
            rating: 8.9,
            age: 24,
            nationality: "Norway",
            jersey_number: 9,
            bio: "Prolific goal scorer breaking records with exceptional finishing \
                  and physical presence.",
            stats: [280, 250, 45, 15, 0],
            achievements: &[
                "Premier League Golden Boot",
                "Champions League Top Scorer",
                "Treble Winner 2023",
            ],
            recent_matches: &[],
        },
        Profile {
            id: "5",
            name: "Kevin De Bruyne",
            position: "Midfielder",
            team: "Manchester City",
            image: "photo-1579952363873-27f3bade9f55",
            rating: 8.8,
            age: 32,
            nationality: "Belgium",
            jersey_number: 17,
            bio: "World-class midfielder known for exceptional passing, vision, and creativity.",
            stats: [450, 95, 180, 45, 2],
            achievements: &["2x Premier League Player of the Season", "Treble Winner 2023"],
            recent_matches: &[],
        },
        Profile {
            id: "6",
            name: "Virgil van Dijk",
            position: "Defender",
            team: "Liverpool",
            image: "photo-1574629810360-7efbbe195018",
            rating: 8.7,
            age: 32,
            nationality: "Netherlands",
            jersey_number: 4,
            bio: "Elite defender known for his leadership, aerial ability, and composure.",
            stats: [400, 25, 15, 35, 1],
            achievements: &[
                "Champions League Winner 2019",
                "Premier League Winner",
                "PFA Player of the Year",
            ],
            recent_matches: &[],
        },
        Profile {
            id: "7",
            name: "Alisson Becker",
            position: "Goalkeeper",
            team: "Liverpool",
            image: "photo-1522778119026-d647f0596c20",
            rating: 8.6,
            age: 31,
            nationality: "Brazil",
            jersey_number: 1,
            bio: "World-class goalkeeper known for excellent shot-stopping and distribution.",
            stats: [350, 0, 2, 8, 0],
            achievements: &[
                "Champions League Winner 2019",
                "Golden Glove x2",
                "Copa America Winner",
            ],
            recent_matches: &[],
        },
        Profile {
            id: "8",
            name: "Luka Modrić",
            position: "Midfielder",
            team: "Real Madrid",
            image: "photo-1431324155629-1a6deb1dec8d",
            rating: 8.5,
            age: 38,
            nationality: "Croatia",
            jersey_number: 10,
            bio: "Legendary midfielder and 2018 Ballon d'Or winner known for his technical skills.",
            stats: [650, 75, 140, 110, 3],
            achievements: &[
                "Ballon d'Or 2018",
                "5x Champions League Winner",
                "World Cup Runner-up 2018",
            ],
            recent_matches: &[],
        },
        Profile {
            id: "9",
            name: "Mohamed Salah",
            position: "Forward",
            team: "Liverpool",
            image: "photo-1579952363873-27f3bade9f55",
            rating: 8.8,
            age: 31,
            nationality: "Egypt",
            jersey_number: 11,
            bio: "Explosive winger and prolific scorer, one of the Premier League's best.",
            stats: [500, 230, 110, 25, 0],
            achievements: &[
                "Premier League Golden Boot x3",
                "Champions League Winner 2019",
                "PFA Player of the Year",
            ],
            recent_matches: &[],
        },
        Profile {
            id: "10",
            name: "Robert Lewandowski",
            position: "Forward",
            team: "Barcelona",
            image: "photo-1574629810360-7efbbe195018",
            rating: 8.7,
            age: 35,
            nationality: "Poland",
            jersey_number: 9,
            bio: "Prolific striker and goal-scoring machine with incredible consistency.",
            stats: [700, 600, 150, 40, 1],
            achievements: &[
                "2x FIFA Best Player",
                "Champions League Winner 2020",
                "Bundesliga Top Scorer x7",
            ],
            recent_matches: &[],
        },
    ]
    .into_iter()
    .map(Profile::into_player)
    .collect()
}
