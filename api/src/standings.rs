use crate::conference::ConferenceTable;
use crate::results::{ColumnMap, ResultRow, SideInference, extract_events, parse_json_rows, read_csv_rows};
use crate::{GameResultEvent, Outcome, StandingsReport, StandingsRow};
use log::{debug, warn};
use std::collections::HashMap;
use std::fmt;
use std::io::Read;

/// Everything a standings run needs besides the rows themselves.
#[derive(Debug, Default)]
pub struct StandingsOptions {
    pub columns: ColumnMap,
    pub conferences: ConferenceTable,
    pub sides: SideInference,
}

impl StandingsOptions {
    pub fn nhl() -> Self {
        Self { conferences: ConferenceTable::nhl(), ..Default::default() }
    }
}

// ---------------------------------------------------------------------------
// Accumulator
// ---------------------------------------------------------------------------

/// Running record for one team during a single standings run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamRecord {
    pub team_id: String,
    pub team_code: String,
    pub team_name: String,
    pub conference: String,
    pub wins: u32,
    pub losses: u32,
    pub home_wins: u32,
    pub home_losses: u32,
    pub road_wins: u32,
    pub road_losses: u32,
    /// Processing order, which is chronological only if the input was.
    pub results: Vec<Outcome>,
    pub home_results: Vec<Outcome>,
    pub road_results: Vec<Outcome>,
}

impl TeamRecord {
    fn new(event: &GameResultEvent, conferences: &ConferenceTable) -> Self {
        Self {
            team_id: event.team_id.clone(),
            team_code: event.team_code.clone(),
            team_name: event.team_name.clone(),
            conference: conferences.label_for(&event.team_code).to_owned(),
            ..Default::default()
        }
    }

    pub fn record(&mut self, is_home: bool, outcome: Outcome) {
        match (outcome, is_home) {
            (Outcome::Win, true) => {
                self.wins += 1;
                self.home_wins += 1;
            }
            (Outcome::Win, false) => {
                self.wins += 1;
                self.road_wins += 1;
            }
            (Outcome::Loss, true) => {
                self.losses += 1;
                self.home_losses += 1;
            }
            (Outcome::Loss, false) => {
                self.losses += 1;
                self.road_losses += 1;
            }
        }

        self.results.push(outcome);
        if is_home {
            self.home_results.push(outcome);
        } else {
            self.road_results.push(outcome);
        }
    }

    pub fn games_played(&self) -> u32 {
        self.wins + self.losses
    }

    pub fn win_pct(&self) -> f64 {
        match self.games_played() {
            0 => 0.0,
            gp => f64::from(self.wins) / f64::from(gp),
        }
    }

    fn to_row(&self) -> StandingsRow {
        StandingsRow {
            team_id: self.team_id.clone(),
            team_code: self.team_code.clone(),
            team_name: self.team_name.clone(),
            conference: self.conference.clone(),
            games_played: self.games_played(),
            wins: self.wins,
            losses: self.losses,
            win_pct: self.win_pct(),
            home_wins: self.home_wins,
            home_losses: self.home_losses,
            road_wins: self.road_wins,
            road_losses: self.road_losses,
            streak: streak(&self.results),
            streak_home: streak(&self.home_results),
            streak_away: streak(&self.road_results),
            league_rank: 0,
            conference_rank: None,
        }
    }
}

/// Signed length of the trailing run: `"+3"`, `"-1"`, or `""` when empty.
pub fn streak(results: &[Outcome]) -> String {
    let Some(&last) = results.last() else {
        return String::new();
    };
    let count = results.iter().rev().take_while(|r| **r == last).count();
    format!("{}{count}", last.sign())
}

/// Team records keyed by team id, kept in first-seen order.
#[derive(Debug, Default)]
pub struct StandingsTable {
    records: Vec<TeamRecord>,
    index: HashMap<String, usize>,
}

impl StandingsTable {
    pub fn apply(&mut self, event: &GameResultEvent, conferences: &ConferenceTable) {
        let idx = match self.index.get(&event.team_id) {
            Some(&idx) => idx,
            None => {
                self.records.push(TeamRecord::new(event, conferences));
                self.index.insert(event.team_id.clone(), self.records.len() - 1);
                self.records.len() - 1
            }
        };
        self.records[idx].record(event.is_home, event.outcome);
    }

    pub fn get(&self, team_id: &str) -> Option<&TeamRecord> {
        self.index.get(team_id).map(|&idx| &self.records[idx])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted rows: win% desc, wins desc, team name asc; ranks filled in.
    pub fn into_rows(self) -> Vec<StandingsRow> {
        let mut rows: Vec<StandingsRow> = self.records.iter().map(TeamRecord::to_row).collect();
        rows.sort_by(|a, b| {
            b.win_pct
                .total_cmp(&a.win_pct)
                .then_with(|| b.wins.cmp(&a.wins))
                .then_with(|| a.team_name.cmp(&b.team_name))
        });

        let mut conference_counts: HashMap<String, u32> = HashMap::new();
        for (i, row) in rows.iter_mut().enumerate() {
            row.league_rank = i as u32 + 1;
            if !row.conference.is_empty() {
                let count = conference_counts.entry(row.conference.clone()).or_default();
                *count += 1;
                row.conference_rank = Some(*count);
            }
        }
        rows
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Group rows by game id in first-appearance order. Rows without an id are dropped.
pub fn group_by_game(rows: Vec<ResultRow>) -> Vec<Vec<ResultRow>> {
    let mut groups: Vec<Vec<ResultRow>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for row in rows {
        if row.game_id.is_empty() {
            continue;
        }
        match index.get(&row.game_id) {
            Some(&idx) => groups[idx].push(row),
            None => {
                index.insert(row.game_id.clone(), groups.len());
                groups.push(vec![row]);
            }
        }
    }
    groups
}

/// Fold raw rows into the sorted standings table.
pub fn compute_standings(rows: Vec<ResultRow>, options: &StandingsOptions) -> Vec<StandingsRow> {
    let mut table = StandingsTable::default();
    let mut skipped = 0usize;

    for group in group_by_game(rows) {
        let [first, second] = group.as_slice() else {
            skipped += 1;
            continue;
        };
        let events = extract_events(first, second, &options.sides);
        if events.is_empty() {
            skipped += 1;
        }
        for event in &events {
            table.apply(event, &options.conferences);
        }
    }

    debug!("standings: {} teams, {skipped} games excluded", table.len());
    table.into_rows()
}

/// Standings from a CSV source. Any read or parse failure yields an empty
/// table and a single warning rather than a partial ranking.
pub fn standings_from_csv<R: Read>(rdr: R, options: &StandingsOptions) -> StandingsReport {
    report(read_csv_rows(rdr, &options.columns), options)
}

/// Standings from a JSON array of row objects, same failure policy as CSV.
pub fn standings_from_json(raw: &str, options: &StandingsOptions) -> StandingsReport {
    report(parse_json_rows(raw, &options.columns), options)
}

fn report<E: fmt::Display>(rows: Result<Vec<ResultRow>, E>, options: &StandingsOptions) -> StandingsReport {
    match rows {
        Ok(rows) => {
            let rows = compute_standings(rows, options);
            StandingsReport { ok: !rows.is_empty(), rows, warnings: Vec::new() }
        }
        Err(e) => {
            let warning = format!("Failed to process standings source: {e}");
            warn!("{warning}");
            StandingsReport::unavailable(vec![warning])
        }
    }
}
