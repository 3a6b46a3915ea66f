use crate::{GameResultEvent, Outcome};
use log::debug;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::io::Read;

// ---------------------------------------------------------------------------
// Raw rows
// ---------------------------------------------------------------------------

/// Column names of one per-game, per-team results layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMap {
    pub game_id: String,
    pub team_id: String,
    pub team_code: String,
    pub team_name: String,
    pub matchup: String,
    /// Score columns in preference order; the first one present in a row wins.
    pub score: Vec<String>,
}

impl Default for ColumnMap {
    /// Hockey period files carry `GOALS`; the legacy basketball file only `PTS`.
    fn default() -> Self {
        Self {
            game_id: "GAME_ID".into(),
            team_id: "TEAM_ID".into(),
            team_code: "TEAM_ABBREVIATION".into(),
            team_name: "TEAM_NAME".into(),
            matchup: "MATCHUP".into(),
            score: vec!["GOALS".into(), "PTS".into()],
        }
    }
}

/// One team's line for one game, values trimmed, missing values empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultRow {
    pub game_id: String,
    pub team_id: String,
    pub team_code: String,
    pub team_name: String,
    pub matchup: String, // "BOS @ TOR"
    pub score: String,
}

impl ResultRow {
    pub fn from_record(record: &HashMap<String, String>, columns: &ColumnMap) -> Self {
        let get = |key: &str| {
            record
                .get(key)
                .map(|v| v.trim().to_owned())
                .unwrap_or_default()
        };
        let score = columns
            .score
            .iter()
            .find_map(|key| record.get(key))
            .map(|v| v.trim().to_owned())
            .unwrap_or_default();

        Self {
            game_id: get(&columns.game_id),
            team_id: get(&columns.team_id),
            team_code: get(&columns.team_code),
            team_name: get(&columns.team_name),
            matchup: get(&columns.matchup),
            score,
        }
    }
}

/// Read rows from CSV with a header line.
///
/// Ragged rows do not fail the read: a row shorter than the header is skipped,
/// which leaves its game one-sided so only that game drops out, and extra
/// trailing fields are ignored. Unreadable input (I/O, invalid UTF-8) is
/// still an error.
pub fn read_csv_rows<R: Read>(rdr: R, columns: &ColumnMap) -> Result<Vec<ResultRow>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(rdr);
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_owned())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.len() < headers.len() {
            debug!(
                "line {}: {} of {} fields, row skipped",
                record.position().map(|p| p.line()).unwrap_or_default(),
                record.len(),
                headers.len()
            );
            continue;
        }
        let fields: HashMap<String, String> = headers
            .iter()
            .cloned()
            .zip(record.iter().map(str::to_owned))
            .collect();
        rows.push(ResultRow::from_record(&fields, columns));
    }
    Ok(rows)
}

/// Parse rows from a JSON array of objects. String and number values are
/// accepted; `null` parses as no rows.
pub fn parse_json_rows(raw: &str, columns: &ColumnMap) -> Result<Vec<ResultRow>, serde_json::Error> {
    let objects: Option<Vec<serde_json::Map<String, Value>>> = serde_json::from_str(raw)?;
    Ok(objects
        .unwrap_or_default()
        .iter()
        .map(|obj| {
            let fields: HashMap<String, String> = obj
                .iter()
                .filter_map(|(k, v)| value_text(v).map(|text| (k.clone(), text)))
                .collect();
            ResultRow::from_record(&fields, columns)
        })
        .collect())
}

fn value_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Home / away inference
// ---------------------------------------------------------------------------

/// Home and away team codes for one row pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sides {
    pub home: String,
    pub away: String,
}

/// One way of telling home from away. Returns `None` when it does not apply.
pub trait SideStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn infer(&self, matchup: &str, first: &ResultRow, second: &ResultRow) -> Option<Sides>;
}

/// `"BOS @ TOR"`: away code before the separator token, home code after it.
#[derive(Debug, Clone)]
pub struct SeparatorStrategy {
    pub token: String,
}

impl Default for SeparatorStrategy {
    fn default() -> Self {
        Self { token: "@".into() }
    }
}

impl SideStrategy for SeparatorStrategy {
    fn name(&self) -> &'static str {
        "separator"
    }

    fn infer(&self, matchup: &str, _: &ResultRow, _: &ResultRow) -> Option<Sides> {
        let tokens: Vec<&str> = matchup.split_whitespace().collect();
        let pos = tokens.iter().position(|t| *t == self.token)?;
        if pos == 0 || pos + 1 == tokens.len() {
            return None;
        }
        Some(Sides {
            home: tokens[tokens.len() - 1].to_owned(),
            away: tokens[0].to_owned(),
        })
    }
}

/// `"TOR vs. BOS"`: home code first, away code last.
#[derive(Debug, Clone, Default)]
pub struct TokenEndsStrategy;

impl SideStrategy for TokenEndsStrategy {
    fn name(&self) -> &'static str {
        "token-ends"
    }

    fn infer(&self, matchup: &str, _: &ResultRow, _: &ResultRow) -> Option<Sides> {
        let tokens: Vec<&str> = matchup.split_whitespace().collect();
        if tokens.len() < 3 {
            return None;
        }
        Some(Sides {
            home: tokens[0].to_owned(),
            away: tokens[tokens.len() - 1].to_owned(),
        })
    }
}

/// First row is home, second is away. A guess; it mislabels games whose rows
/// arrive in the other order.
#[derive(Debug, Clone, Default)]
pub struct RowOrderStrategy;

impl SideStrategy for RowOrderStrategy {
    fn name(&self) -> &'static str {
        "row-order"
    }

    fn infer(&self, _: &str, first: &ResultRow, second: &ResultRow) -> Option<Sides> {
        Some(Sides {
            home: first.team_code.clone(),
            away: second.team_code.clone(),
        })
    }
}

/// Ordered list of [`SideStrategy`]s; the first match wins.
pub struct SideInference {
    strategies: Vec<Box<dyn SideStrategy>>,
}

impl Default for SideInference {
    fn default() -> Self {
        Self::new(vec![
            Box::new(SeparatorStrategy::default()) as Box<dyn SideStrategy>,
            Box::new(TokenEndsStrategy),
            Box::new(RowOrderStrategy),
        ])
    }
}

impl fmt::Debug for SideInference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.strategies.iter().map(|s| s.name()))
            .finish()
    }
}

impl SideInference {
    pub fn new(strategies: Vec<Box<dyn SideStrategy>>) -> Self {
        Self { strategies }
    }

    /// Insert a strategy ahead of position `index` (clamped to the list length).
    pub fn insert(&mut self, index: usize, strategy: Box<dyn SideStrategy>) {
        let index = index.min(self.strategies.len());
        self.strategies.insert(index, strategy);
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Falls back to row order when no strategy matches.
    pub fn infer(&self, first: &ResultRow, second: &ResultRow) -> Sides {
        let matchup = if first.matchup.is_empty() { &second.matchup } else { &first.matchup };
        for strategy in &self.strategies {
            if let Some(sides) = strategy.infer(matchup, first, second) {
                if strategy.name() == RowOrderStrategy.name() {
                    debug!("game {}: home/away taken from row order", first.game_id);
                }
                return sides;
            }
        }
        debug!("game {}: no side strategy matched, using row order", first.game_id);
        Sides {
            home: first.team_code.clone(),
            away: second.team_code.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Blank totals count as zero; anything else must parse as an integer.
fn parse_total(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(0);
    }
    raw.parse().ok()
}

/// Turn the two rows of one game into result events.
///
/// Returns nothing for ties and unparsable totals. A side whose row lacks a
/// team id or code is skipped; the other side is still emitted.
pub fn extract_events(
    first: &ResultRow,
    second: &ResultRow,
    inference: &SideInference,
) -> Vec<GameResultEvent> {
    let sides = inference.infer(first, second);
    let home_row = [first, second]
        .into_iter()
        .find(|r| r.team_code == sides.home)
        .unwrap_or(first);
    let away_row = [first, second]
        .into_iter()
        .find(|r| r.team_code == sides.away)
        .unwrap_or(second);

    let (Some(home_total), Some(away_total)) =
        (parse_total(&home_row.score), parse_total(&away_row.score))
    else {
        debug!("game {}: unparsable score, skipped", first.game_id);
        return Vec::new();
    };

    let home_outcome = match home_total.cmp(&away_total) {
        Ordering::Greater => Outcome::Win,
        Ordering::Less => Outcome::Loss,
        Ordering::Equal => return Vec::new(),
    };

    [
        (home_row, true, home_outcome),
        (away_row, false, home_outcome.opposite()),
    ]
    .into_iter()
    .filter(|(row, _, _)| !row.team_id.is_empty() && !row.team_code.is_empty())
    .map(|(row, is_home, outcome)| GameResultEvent {
        game_id: row.game_id.clone(),
        team_id: row.team_id.clone(),
        team_code: row.team_code.clone(),
        team_name: row.team_name.clone(),
        is_home,
        outcome,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(code: &str, score: &str, matchup: &str) -> ResultRow {
        ResultRow {
            game_id: "2024020001".into(),
            team_id: format!("id-{code}"),
            team_code: code.into(),
            team_name: format!("{code} name"),
            matchup: matchup.into(),
            score: score.into(),
        }
    }

    fn sides(home: &str, away: &str) -> Sides {
        Sides { home: home.into(), away: away.into() }
    }

    #[test]
    fn separator_reads_away_at_home() {
        let a = row("BOS", "2", "BOS @ TOR");
        let b = row("TOR", "3", "BOS @ TOR");
        assert_eq!(SideInference::default().infer(&a, &b), sides("TOR", "BOS"));
    }

    #[test]
    fn separator_needs_codes_on_both_sides() {
        let a = row("BOS", "2", "@ TOR");
        let strategy = SeparatorStrategy::default();
        assert_eq!(strategy.infer("@ TOR", &a, &a), None);
        assert_eq!(strategy.infer("BOS @", &a, &a), None);
    }

    #[test]
    fn token_ends_reads_home_vs_away() {
        let a = row("BOS", "2", "TOR vs. BOS");
        let b = row("TOR", "3", "");
        assert_eq!(SideInference::default().infer(&a, &b), sides("TOR", "BOS"));
    }

    #[test]
    fn descriptor_falls_back_to_second_row() {
        let a = row("BOS", "2", "");
        let b = row("TOR", "3", "BOS @ TOR");
        assert_eq!(SideInference::default().infer(&a, &b), sides("TOR", "BOS"));
    }

    #[test]
    fn short_descriptor_uses_row_order() {
        let a = row("BOS", "2", "BOS-TOR");
        let b = row("TOR", "3", "BOS-TOR");
        assert_eq!(SideInference::default().infer(&a, &b), sides("BOS", "TOR"));
    }

    #[test]
    fn empty_strategy_list_still_assigns_row_order() {
        let a = row("BOS", "2", "BOS @ TOR");
        let b = row("TOR", "3", "BOS @ TOR");
        assert_eq!(SideInference::new(Vec::new()).infer(&a, &b), sides("BOS", "TOR"));
    }

    #[test]
    fn inserted_strategy_runs_before_existing_ones() {
        struct AlwaysHomeFirst;
        impl SideStrategy for AlwaysHomeFirst {
            fn name(&self) -> &'static str {
                "fixed"
            }
            fn infer(&self, _: &str, _: &ResultRow, _: &ResultRow) -> Option<Sides> {
                Some(Sides { home: "XXX".into(), away: "YYY".into() })
            }
        }

        let mut inference = SideInference::default();
        inference.insert(0, Box::new(AlwaysHomeFirst));
        assert_eq!(inference.names(), vec!["fixed", "separator", "token-ends", "row-order"]);

        let a = row("BOS", "2", "BOS @ TOR");
        let b = row("TOR", "3", "BOS @ TOR");
        assert_eq!(inference.infer(&a, &b), sides("XXX", "YYY"));
    }

    #[test]
    fn emits_home_then_away_with_opposite_outcomes() {
        let away = row("BOS", "2", "BOS @ TOR");
        let home = row("TOR", "3", "BOS @ TOR");
        let events = extract_events(&away, &home, &SideInference::default());

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].team_code, "TOR");
        assert!(events[0].is_home);
        assert_eq!(events[0].outcome, Outcome::Win);
        assert_eq!(events[1].team_code, "BOS");
        assert!(!events[1].is_home);
        assert_eq!(events[1].outcome, Outcome::Loss);
        assert_eq!(events[0].game_id, events[1].game_id);
    }

    #[test]
    fn unmatched_codes_fall_back_to_row_order() {
        let a = row("TOR", "1", "NYR @ PHI");
        let b = row("BOS", "4", "NYR @ PHI");
        let events = extract_events(&a, &b, &SideInference::default());
        assert_eq!(events.len(), 2);
        assert_eq!((events[0].team_code.as_str(), events[0].is_home), ("TOR", true));
        assert_eq!(events[0].outcome, Outcome::Loss);
        assert_eq!(events[1].outcome, Outcome::Win);
    }

    #[test]
    fn tied_scores_emit_nothing() {
        let a = row("BOS", "3", "BOS @ TOR");
        let b = row("TOR", "3", "BOS @ TOR");
        assert!(extract_events(&a, &b, &SideInference::default()).is_empty());
    }

    #[test]
    fn unparsable_score_emits_nothing() {
        let a = row("BOS", "N/A", "BOS @ TOR");
        let b = row("TOR", "3", "BOS @ TOR");
        assert!(extract_events(&a, &b, &SideInference::default()).is_empty());
        let c = row("TOR", "3.0", "BOS @ TOR");
        assert!(extract_events(&a, &c, &SideInference::default()).is_empty());
    }

    #[test]
    fn blank_score_counts_as_zero() {
        let a = row("BOS", "", "BOS @ TOR");
        let b = row("TOR", " 2 ", "BOS @ TOR");
        let events = extract_events(&a, &b, &SideInference::default());
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].team_code, "TOR");
        assert_eq!(events[0].outcome, Outcome::Win);
    }

    #[test]
    fn side_without_identity_is_dropped_alone() {
        let mut away = row("BOS", "5", "BOS @ TOR");
        away.team_id.clear();
        let home = row("TOR", "1", "BOS @ TOR");
        let events = extract_events(&away, &home, &SideInference::default());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].team_code, "TOR");
        assert_eq!(events[0].outcome, Outcome::Loss);
    }

    #[test]
    fn reads_csv_rows_with_bom_and_goals_column() {
        let csv_data = "\u{feff}GAME_ID,TEAM_ID,TEAM_ABBREVIATION,TEAM_NAME,MATCHUP,PTS,GOALS
2024020001,10,TOR,Maple Leafs,BOS @ TOR,4,4
2024020001,6,BOS,Bruins,BOS @ TOR,1,1
";
        let rows = read_csv_rows(csv_data.as_bytes(), &ColumnMap::default()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].game_id, "2024020001");
        assert_eq!(rows[0].team_name, "Maple Leafs");
        assert_eq!(rows[1].score, "1");
    }

    #[test]
    fn legacy_csv_scores_from_pts() {
        let csv_data = "\
GAME_ID,TEAM_ID,TEAM_ABBREVIATION,TEAM_NAME,MATCHUP,PTS
0022500001,1610612738,BOS,Celtics,BOS vs. NYK,112
";
        let rows = read_csv_rows(csv_data.as_bytes(), &ColumnMap::default()).unwrap();
        assert_eq!(rows[0].score, "112");
        assert_eq!(rows[0].matchup, "BOS vs. NYK");
    }

    #[test]
    fn short_rows_are_skipped_and_long_rows_kept() {
        let csv_data = "\
GAME_ID,TEAM_ID,TEAM_ABBREVIATION,TEAM_NAME,MATCHUP,GOALS
1,10,TOR
1,6,BOS,Bruins,BOS @ TOR,2,extra
";
        let rows = read_csv_rows(csv_data.as_bytes(), &ColumnMap::default()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].team_code, "BOS");
        assert_eq!(rows[0].score, "2");
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        let mut csv_data = b"GAME_ID,TEAM_ID\n1,".to_vec();
        csv_data.extend_from_slice(&[0xff, 0xfe, b'\n']);
        assert!(read_csv_rows(csv_data.as_slice(), &ColumnMap::default()).is_err());
    }

    #[test]
    fn parses_json_rows_with_numbers() {
        let raw = r#"[
            {"GAME_ID": "1", "TEAM_ID": 10, "TEAM_ABBREVIATION": "TOR", "GOALS": 3, "MATCHUP": null},
            {"GAME_ID": "1", "TEAM_ID": 6, "TEAM_ABBREVIATION": "BOS", "GOALS": "2"}
        ]"#;
        let rows = parse_json_rows(raw, &ColumnMap::default()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].team_id, "10");
        assert_eq!(rows[0].score, "3");
        assert_eq!(rows[0].matchup, "");
        assert_eq!(rows[1].score, "2");
    }

    #[test]
    fn json_null_is_empty() {
        assert!(parse_json_rows("null", &ColumnMap::default()).unwrap().is_empty());
    }
}
