//! Wire types for the NHL stats API, the source of season results.
//! Endpoints: https://statsapi.web.nhl.com/api/v1/teams
//!            https://statsapi.web.nhl.com/api/v1/schedule?startDate=..&endDate=..
//!            https://statsapi.web.nhl.com/api/v1/game/{gamePk}/feed/live
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct TeamsResponse {
    pub teams: Option<Vec<StatsTeam>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StatsTeam {
    pub id: Option<i64>,
    pub abbreviation: Option<String>,
    pub team_name: Option<String>, // "Bruins"
    pub name: Option<String>,      // "Boston Bruins"
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SeasonSchedule {
    pub dates: Option<Vec<ScheduleDate>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScheduleDate {
    pub date: Option<String>,
    pub games: Option<Vec<StatsGame>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StatsGame {
    pub game_pk: Option<i64>,
    pub teams: Option<StatsMatchup>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct StatsMatchup {
    pub away: Option<StatsSide>,
    pub home: Option<StatsSide>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct StatsSide {
    pub team: Option<StatsTeam>,
}

// ---------------------------------------------------------------------------
// Live feed  (linescore and team skater stats only)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LiveFeed {
    pub live_data: Option<LiveData>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct LiveData {
    pub linescore: Option<Linescore>,
    pub boxscore: Option<Boxscore>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Linescore {
    pub periods: Option<Vec<LinescorePeriod>>,
    pub teams: Option<HomeAway<GoalCount>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct LinescorePeriod {
    pub num: Option<u8>,
    pub home: Option<GoalCount>,
    pub away: Option<GoalCount>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct GoalCount {
    pub goals: Option<u32>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct HomeAway<T> {
    pub home: Option<T>,
    pub away: Option<T>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Boxscore {
    pub teams: Option<HomeAway<BoxscoreTeam>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BoxscoreTeam {
    pub team_stats: Option<TeamStats>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TeamStats {
    pub team_skater_stats: Option<SkaterStats>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SkaterStats {
    pub goals: Option<u32>,
    pub shots: Option<u32>,
    pub power_play_goals: Option<f64>, // sent as 1.0
    pub power_play_opportunities: Option<f64>,
    pub pim: Option<u32>,
    pub hits: Option<u32>,
    pub blocked: Option<u32>,
    pub takeaways: Option<u32>,
    pub giveaways: Option<u32>,
}
