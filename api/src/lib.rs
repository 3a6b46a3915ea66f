pub mod client;
pub mod collector;
pub mod conference;
pub mod legacy;
pub mod nhle;
pub mod results;
pub mod schedule;
pub mod standings;
pub mod statsapi;
pub mod status;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Domain types, independent of any upstream wire format
// ---------------------------------------------------------------------------

/// Three-way game state used by every schedule consumer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    #[default]
    Scheduled,
    Live,
    /// Finished, postponed, or anything else that will not be played now.
    Final,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub game_id: String,
    pub status: GameStatus,
    pub status_text: String, // raw upstream label, passed through untouched
    pub period: Option<u8>,
    pub clock: Option<String>,
    pub start_time_utc: String,
    pub home_team: TeamSnapshot,
    pub away_team: TeamSnapshot,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSnapshot {
    pub team_id: Option<i64>,
    pub code: String, // "TOR"
    pub name: String, // "Maple Leafs"
    pub city: String, // "Toronto"
    pub wins: Option<u32>,
    pub losses: Option<u32>,
    pub ot_losses: Option<u32>,
    pub score: Option<u32>,
    pub record_text: String, // "10-4-2", empty when wins or losses are unknown
}

/// Per-game clock data fetched separately from the schedule.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameDetail {
    pub period: Option<u8>,
    pub clock: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Loss,
}

impl Outcome {
    pub fn opposite(self) -> Self {
        match self {
            Outcome::Win => Outcome::Loss,
            Outcome::Loss => Outcome::Win,
        }
    }

    pub fn sign(self) -> char {
        match self {
            Outcome::Win => '+',
            Outcome::Loss => '-',
        }
    }
}

/// One team's side of one finished, decided game.
#[derive(Debug, Clone, PartialEq)]
pub struct GameResultEvent {
    pub game_id: String,
    pub team_id: String,
    pub team_code: String,
    pub team_name: String,
    pub is_home: bool,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingsRow {
    pub team_id: String,
    pub team_code: String,
    pub team_name: String,
    pub conference: String,
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub win_pct: f64,
    pub home_wins: u32,
    pub home_losses: u32,
    pub road_wins: u32,
    pub road_losses: u32,
    pub streak: String,      // "+3", "-1", or "" before the first game
    pub streak_home: String,
    pub streak_away: String,
    pub league_rank: u32,
    pub conference_rank: Option<u32>, // None when the conference is unknown
}

// ---------------------------------------------------------------------------
// Pipeline outputs: the wire contract toward the presentation layer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize)]
pub struct StandingsReport {
    pub ok: bool,
    pub rows: Vec<StandingsRow>,
    pub warnings: Vec<String>,
}

impl StandingsReport {
    /// Report for a source that could not be read at all.
    pub fn unavailable(warnings: Vec<String>) -> Self {
        Self { ok: false, rows: Vec::new(), warnings }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleReport {
    pub ok: bool,
    pub live: Vec<GameSnapshot>,
    pub today_upcoming: Vec<GameSnapshot>,
    pub tomorrow_upcoming: Vec<GameSnapshot>,
    pub warnings: Vec<String>,
    pub generated_at: String,
}
