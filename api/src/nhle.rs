//! Wire types for the NHL web API (schema A: textual `gameState`, localized names).
//! Endpoints: https://api-web.nhle.com/v1/schedule/{date}
//!            https://api-web.nhle.com/v1/gamecenter/{id}/boxscore
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    /// The endpoint returns a full week starting at the requested date.
    pub game_week: Option<Vec<GameDay>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct GameDay {
    pub date: Option<String>, // "2026-10-16"
    pub games: Option<Vec<NhleGame>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NhleGame {
    pub id: Option<i64>,
    pub game_state: Option<String>, // "FUT", "LIVE", "OFF", ...
    #[serde(rename = "startTimeUTC")]
    pub start_time_utc: Option<String>,
    pub home_team: Option<NhleTeam>,
    pub away_team: Option<NhleTeam>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NhleTeam {
    pub id: Option<i64>,
    pub abbrev: Option<String>,
    pub common_name: Option<LocalizedText>,
    /// Older seasons send a plain string here, newer ones a localized object.
    pub name: Option<LocalizedText>,
    pub team_name: Option<LocalizedText>,
    pub place_name: Option<LocalizedText>,
    pub place_name_with_preposition: Option<LocalizedText>,
    pub city: Option<String>,
    pub score: Option<u32>,
    pub record: Option<NhleRecord>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum LocalizedText {
    Plain(String),
    Localized { default: Option<String> },
}

impl LocalizedText {
    /// The display text, or `None` when it is missing or blank.
    pub fn text(&self) -> Option<&str> {
        let raw = match self {
            LocalizedText::Plain(s) => Some(s.as_str()),
            LocalizedText::Localized { default } => default.as_deref(),
        };
        raw.map(str::trim).filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct NhleRecord {
    pub wins: Option<u32>,
    pub losses: Option<u32>,
    pub ot: Option<u32>,
}

// ---------------------------------------------------------------------------
// Boxscore  (only the clock fields are read)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BoxscoreResponse {
    pub period_descriptor: Option<PeriodDescriptor>,
    pub clock: Option<NhleClock>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct PeriodDescriptor {
    pub number: Option<u8>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NhleClock {
    pub time_remaining: Option<String>, // "12:34"
    pub display_value: Option<String>,
}
