use crate::statsapi::{LinescorePeriod, LiveFeed, SkaterStats, StatsGame, StatsTeam, TeamsResponse};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use std::io;

pub const SEASON_TYPE: &str = "Regular";

/// A regular season, identified the stats API way (`"20242025"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Season {
    pub id: String,
    pub start: NaiveDate,
}

impl Season {
    /// `"20242025"` opens on 2024-10-01. `None` unless the id is two
    /// consecutive four-digit years.
    pub fn from_id(id: &str) -> Option<Self> {
        let id = id.trim();
        if id.len() != 8 || !id.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let first: i32 = id[..4].parse().ok()?;
        let second: i32 = id[4..].parse().ok()?;
        if second != first + 1 {
            return None;
        }
        Some(Self {
            id: id.to_owned(),
            start: NaiveDate::from_ymd_opt(first, 10, 1)?,
        })
    }

    /// The results file the standings command looks for first.
    pub fn file_name(&self) -> String {
        format!("nhl_periods_{}.csv", self.id)
    }
}

// ---------------------------------------------------------------------------
// Team directory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamInfo {
    pub abbreviation: String,
    pub name: String,
    pub full_name: String,
}

#[derive(Debug, Clone, Default)]
pub struct TeamMap {
    by_id: HashMap<i64, TeamInfo>,
}

impl From<TeamsResponse> for TeamMap {
    fn from(raw: TeamsResponse) -> Self {
        let by_id = raw
            .teams
            .unwrap_or_default()
            .into_iter()
            .filter_map(|t| {
                let id = t.id?;
                let name = t.team_name.unwrap_or_default();
                let abbreviation = match t.abbreviation.filter(|a| !a.trim().is_empty()) {
                    Some(a) => a,
                    None => name.chars().take(3).collect::<String>().to_uppercase(),
                };
                Some((id, TeamInfo { abbreviation, name, full_name: t.name.unwrap_or_default() }))
            })
            .collect();
        Self { by_id }
    }
}

impl TeamMap {
    pub fn get(&self, id: i64) -> Option<&TeamInfo> {
        self.by_id.get(&id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Result lines
// ---------------------------------------------------------------------------

/// One team's line for one game, in the column layout standings reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct ResultLine {
    pub game_id: String,
    pub game_date: String,
    pub matchup: String, // "AWAY @ HOME"
    pub team_id: Option<i64>,
    pub team_abbreviation: String,
    pub team_name: String,
    pub p1: u32,
    pub p2: u32,
    pub p3: u32,
    pub ot: u32,
    pub goals: u32,
    pub pts: u32,
    pub shots: u32,
    pub power_play_goals: u32,
    pub power_play_opportunities: u32,
    pub pim: u32,
    pub hits: u32,
    pub blocked: u32,
    pub takeaways: u32,
    pub giveaways: u32,
    pub season: String,
    pub season_type: String,
}

/// Everything a collection run produced, plus what went wrong on the way.
#[derive(Debug, Clone, Default)]
pub struct CollectedResults {
    pub lines: Vec<ResultLine>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Away,
    Home,
}

impl Side {
    fn of<'a, T>(self, home: &'a Option<T>, away: &'a Option<T>) -> Option<&'a T> {
        match self {
            Side::Home => home.as_ref(),
            Side::Away => away.as_ref(),
        }
    }
}

struct TeamIdentity {
    id: Option<i64>,
    abbreviation: String,
    name: String,
}

fn identify(team: Option<&StatsTeam>, teams: &TeamMap) -> TeamIdentity {
    let id = team.and_then(|t| t.id);
    let known = id.and_then(|id| teams.get(id));
    let pick = |candidates: [Option<&str>; 3]| {
        candidates
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
            .unwrap_or_default()
            .to_owned()
    };

    TeamIdentity {
        id,
        abbreviation: pick([
            known.map(|k| k.abbreviation.as_str()),
            team.and_then(|t| t.abbreviation.as_deref()),
            None,
        ]),
        name: pick([
            known.map(|k| k.name.as_str()),
            team.and_then(|t| t.team_name.as_deref()),
            team.and_then(|t| t.name.as_deref()),
        ]),
    }
}

fn period_goals(periods: &[LinescorePeriod], side: Side, num: u8) -> u32 {
    periods
        .iter()
        .find(|p| p.num == Some(num))
        .and_then(|p| side.of(&p.home, &p.away))
        .and_then(|g| g.goals)
        .unwrap_or(0)
}

fn whole(v: Option<f64>) -> u32 {
    v.map(|v| v.max(0.0).round() as u32).unwrap_or(0)
}

/// The away and home lines for one game, in that order.
pub fn game_lines(
    game_date: &str,
    game: &StatsGame,
    feed: &LiveFeed,
    teams: &TeamMap,
    season: &Season,
) -> Vec<ResultLine> {
    let matchup = game.teams.clone().unwrap_or_default();
    let away = identify(matchup.away.as_ref().and_then(|s| s.team.as_ref()), teams);
    let home = identify(matchup.home.as_ref().and_then(|s| s.team.as_ref()), teams);
    let matchup_text = format!("{} @ {}", away.abbreviation, home.abbreviation);

    let live = feed.live_data.as_ref();
    let linescore = live.and_then(|l| l.linescore.as_ref());
    let periods: &[LinescorePeriod] = linescore.and_then(|l| l.periods.as_deref()).unwrap_or_default();
    let box_teams = live
        .and_then(|l| l.boxscore.as_ref())
        .and_then(|b| b.teams.as_ref());

    [(Side::Away, away), (Side::Home, home)]
        .into_iter()
        .map(|(side, team)| {
            let stats: SkaterStats = box_teams
                .and_then(|t| side.of(&t.home, &t.away))
                .and_then(|t| t.team_stats.as_ref())
                .and_then(|s| s.team_skater_stats.clone())
                .unwrap_or_default();
            let total = linescore
                .and_then(|l| l.teams.as_ref())
                .and_then(|t| side.of(&t.home, &t.away))
                .and_then(|g| g.goals)
                .or(stats.goals)
                .unwrap_or(0);

            let p1 = period_goals(periods, side, 1);
            let p2 = period_goals(periods, side, 2);
            let p3 = period_goals(periods, side, 3);
            let goals = stats.goals.unwrap_or(total);

            ResultLine {
                game_id: game.game_pk.map(|pk| pk.to_string()).unwrap_or_default(),
                game_date: game_date.to_owned(),
                matchup: matchup_text.clone(),
                team_id: team.id,
                team_abbreviation: team.abbreviation,
                team_name: team.name,
                p1,
                p2,
                p3,
                ot: total.saturating_sub(p1 + p2 + p3),
                goals,
                pts: goals,
                shots: stats.shots.unwrap_or(0),
                power_play_goals: whole(stats.power_play_goals),
                power_play_opportunities: whole(stats.power_play_opportunities),
                pim: stats.pim.unwrap_or(0),
                hits: stats.hits.unwrap_or(0),
                blocked: stats.blocked.unwrap_or(0),
                takeaways: stats.takeaways.unwrap_or(0),
                giveaways: stats.giveaways.unwrap_or(0),
                season: season.id.clone(),
                season_type: SEASON_TYPE.to_owned(),
            }
        })
        .collect()
}

/// Date, then game id, then team code.
pub fn sort_lines(lines: &mut [ResultLine]) {
    lines.sort_by(|a, b| {
        a.game_date
            .cmp(&b.game_date)
            .then_with(|| a.game_id.cmp(&b.game_id))
            .then_with(|| a.team_abbreviation.cmp(&b.team_abbreviation))
    });
}

/// Write lines as CSV with a header row.
pub fn write_csv<W: io::Write>(wtr: W, lines: &[ResultLine]) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(wtr);
    for line in lines {
        writer.serialize(line)?;
    }
    writer.flush()?;
    Ok(())
}
