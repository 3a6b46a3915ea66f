//! Wire types for the legacy scoreboard feed (schema B: integer `gameStatus`,
//! flat team objects, clock carried inline).
use serde::Deserialize;

#[derive(Debug, Deserialize, Default, Clone)]
pub struct LegacyScoreboardResponse {
    pub scoreboard: Option<LegacyScoreboard>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LegacyScoreboard {
    pub game_date: Option<String>,
    pub games: Option<Vec<LegacyGame>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LegacyGame {
    pub game_id: Option<String>,
    pub game_status: Option<i64>,           // 1 scheduled, 2 live, 3 final
    pub game_status_text: Option<String>,   // "7:00 pm ET", "Q3 5:12", "Final"
    pub period: Option<u8>,
    pub game_clock: Option<String>,
    #[serde(rename = "gameTimeUTC")]
    pub game_time_utc: Option<String>,
    pub home_team: Option<LegacyTeam>,
    pub away_team: Option<LegacyTeam>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LegacyTeam {
    pub team_id: Option<i64>,
    pub team_name: Option<String>,
    pub full_name: Option<String>,
    pub name: Option<String>,
    pub team_city: Option<String>,
    pub team_tricode: Option<String>,
    pub wins: Option<u32>,
    pub losses: Option<u32>,
    pub ot_losses: Option<u32>,
    pub score: Option<u32>,
}
