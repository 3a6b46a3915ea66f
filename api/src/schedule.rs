use crate::legacy::{LegacyGame, LegacyTeam};
use crate::nhle::{BoxscoreResponse, LocalizedText, NhleGame, NhleTeam};
use crate::status::{StatusKey, StatusTable};
use crate::{GameDetail, GameSnapshot, GameStatus, ScheduleReport, TeamSnapshot};
use chrono::{DateTime, SecondsFormat, Utc};
use log::{debug, warn};
use std::fmt;

// ---------------------------------------------------------------------------
// Upstream shapes
// ---------------------------------------------------------------------------

/// Field mapping from one upstream schedule shape into canonical values.
///
/// Every accessor has a default for absent data, so mapping never fails.
pub trait ScheduleRecord {
    fn game_id(&self) -> String;
    fn status_key(&self) -> Option<StatusKey>;
    fn status_text(&self) -> String;
    fn start_time_utc(&self) -> String;
    fn home_team(&self) -> TeamSnapshot;
    fn away_team(&self) -> TeamSnapshot;

    /// Clock data carried on the record itself.
    fn inline_detail(&self) -> GameDetail {
        GameDetail::default()
    }
}

/// One raw schedule record, tagged by the feed it came from.
#[derive(Debug, Clone)]
pub enum UpstreamGame {
    Nhle(NhleGame),
    Legacy(LegacyGame),
}

impl UpstreamGame {
    pub fn as_record(&self) -> &dyn ScheduleRecord {
        match self {
            UpstreamGame::Nhle(g) => g,
            UpstreamGame::Legacy(g) => g,
        }
    }

    pub fn game_id(&self) -> String {
        self.as_record().game_id()
    }
}

impl ScheduleRecord for NhleGame {
    fn game_id(&self) -> String {
        self.id.map(|id| id.to_string()).unwrap_or_default()
    }

    fn status_key(&self) -> Option<StatusKey> {
        self.game_state.as_deref().map(StatusKey::from)
    }

    fn status_text(&self) -> String {
        self.game_state.clone().unwrap_or_default()
    }

    fn start_time_utc(&self) -> String {
        self.start_time_utc.clone().unwrap_or_default()
    }

    fn home_team(&self) -> TeamSnapshot {
        self.home_team.as_ref().map(map_nhle_team).unwrap_or_default()
    }

    fn away_team(&self) -> TeamSnapshot {
        self.away_team.as_ref().map(map_nhle_team).unwrap_or_default()
    }
}

impl ScheduleRecord for LegacyGame {
    fn game_id(&self) -> String {
        self.game_id.clone().unwrap_or_default()
    }

    fn status_key(&self) -> Option<StatusKey> {
        self.game_status.map(StatusKey::from)
    }

    fn status_text(&self) -> String {
        self.game_status_text
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_owned()
    }

    fn start_time_utc(&self) -> String {
        self.game_time_utc.clone().unwrap_or_default()
    }

    fn home_team(&self) -> TeamSnapshot {
        self.home_team.as_ref().map(map_legacy_team).unwrap_or_default()
    }

    fn away_team(&self) -> TeamSnapshot {
        self.away_team.as_ref().map(map_legacy_team).unwrap_or_default()
    }

    fn inline_detail(&self) -> GameDetail {
        GameDetail {
            // period 0 means the game has not started
            period: self.period.filter(|p| *p > 0),
            clock: non_blank(self.game_clock.as_deref()).map(str::to_owned),
        }
    }
}

fn map_nhle_team(t: &NhleTeam) -> TeamSnapshot {
    let record = t.record.clone().unwrap_or_default();
    TeamSnapshot {
        team_id: t.id,
        code: first_present([t.abbrev.as_deref()]),
        name: first_present([
            t.common_name.as_ref().and_then(LocalizedText::text),
            t.name.as_ref().and_then(LocalizedText::text),
            t.team_name.as_ref().and_then(LocalizedText::text),
            t.abbrev.as_deref(),
        ]),
        city: first_present([
            t.place_name_with_preposition.as_ref().and_then(LocalizedText::text),
            t.place_name.as_ref().and_then(LocalizedText::text),
            t.city.as_deref(),
        ]),
        wins: record.wins,
        losses: record.losses,
        ot_losses: record.ot,
        score: t.score,
        record_text: record_text(record.wins, record.losses, record.ot),
    }
}

fn map_legacy_team(t: &LegacyTeam) -> TeamSnapshot {
    TeamSnapshot {
        team_id: t.team_id,
        code: first_present([t.team_tricode.as_deref()]),
        name: first_present([
            t.team_name.as_deref(),
            t.full_name.as_deref(),
            t.name.as_deref(),
            t.team_tricode.as_deref(),
        ]),
        city: first_present([t.team_city.as_deref()]),
        wins: t.wins,
        losses: t.losses,
        ot_losses: t.ot_losses,
        score: t.score,
        record_text: record_text(t.wins, t.losses, t.ot_losses),
    }
}

impl From<BoxscoreResponse> for GameDetail {
    fn from(raw: BoxscoreResponse) -> Self {
        let clock = raw.clock.and_then(|c| {
            non_blank(c.time_remaining.as_deref())
                .or(non_blank(c.display_value.as_deref()))
                .map(str::to_owned)
        });
        GameDetail {
            period: raw.period_descriptor.and_then(|p| p.number),
            clock,
        }
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

fn first_present<'a, const N: usize>(candidates: [Option<&'a str>; N]) -> String {
    candidates
        .into_iter()
        .find_map(non_blank)
        .unwrap_or_default()
        .to_owned()
}

/// "W-L" or "W-L-OT"; empty unless both wins and losses are known.
pub fn record_text(wins: Option<u32>, losses: Option<u32>, ot: Option<u32>) -> String {
    match (wins, losses, ot) {
        (Some(w), Some(l), Some(ot)) => format!("{w}-{l}-{ot}"),
        (Some(w), Some(l), None) => format!("{w}-{l}"),
        _ => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

/// Best-effort per-game detail: an optional result plus the warning to
/// surface when the fetch failed.
#[derive(Debug, Clone, Default)]
pub struct Enrichment {
    pub detail: Option<GameDetail>,
    pub warning: Option<String>,
}

impl Enrichment {
    pub fn from_result<E: fmt::Display>(game_id: &str, result: Result<GameDetail, E>) -> Self {
        match result {
            Ok(detail) => Self { detail: Some(detail), warning: None },
            Err(e) => Self {
                detail: None,
                warning: Some(format!("Failed to fetch clock for game {game_id}: {e}")),
            },
        }
    }
}

/// Map one upstream record into a [`GameSnapshot`].
///
/// Detail values win over clock data carried inline on the record.
pub fn normalize(
    record: &dyn ScheduleRecord,
    statuses: &StatusTable,
    detail: Option<&GameDetail>,
) -> GameSnapshot {
    let inline = record.inline_detail();
    let (period, clock) = match detail {
        Some(d) => (d.period.or(inline.period), d.clock.clone().or(inline.clock)),
        None => (inline.period, inline.clock),
    };

    GameSnapshot {
        game_id: record.game_id(),
        status: statuses.resolve(record.status_key().as_ref()),
        status_text: record.status_text(),
        period,
        clock,
        start_time_utc: record.start_time_utc(),
        home_team: record.home_team(),
        away_team: record.away_team(),
    }
}

// ---------------------------------------------------------------------------
// Aggregator
// ---------------------------------------------------------------------------

/// Normalized games for one date plus what went wrong collecting them.
#[derive(Debug, Clone)]
pub struct ScheduleDay {
    pub games: Vec<GameSnapshot>,
    /// False when any fetch for this date failed, schedule or per-game detail.
    pub ok: bool,
    pub warnings: Vec<String>,
}

impl ScheduleDay {
    /// Normalize `games` in input order. `enrichments[i]` belongs to
    /// `games[i]`; a missing entry means no detail was fetched.
    pub fn assemble(
        games: &[UpstreamGame],
        enrichments: Vec<Enrichment>,
        statuses: &StatusTable,
    ) -> Self {
        let mut enrichments = enrichments.into_iter();
        let mut warnings = Vec::new();
        let snapshots = games
            .iter()
            .map(|game| {
                let enrichment = enrichments.next().unwrap_or_default();
                if let Some(w) = enrichment.warning {
                    warn!("{w}");
                    warnings.push(w);
                }
                normalize(game.as_record(), statuses, enrichment.detail.as_ref())
            })
            .collect();

        let ok = warnings.is_empty();
        Self { games: snapshots, ok, warnings }
    }

    pub fn failed(warning: String) -> Self {
        warn!("{warning}");
        Self { games: Vec::new(), ok: false, warnings: vec![warning] }
    }
}

/// Partition today's and tomorrow's games into the published buckets.
///
/// Final games are dropped from every bucket, as are games already live
/// tomorrow.
pub fn build_report(
    today: ScheduleDay,
    tomorrow: ScheduleDay,
    generated_at: DateTime<Utc>,
) -> ScheduleReport {
    let ok = today.ok && tomorrow.ok;

    let mut live = Vec::new();
    let mut today_upcoming = Vec::new();
    for game in today.games {
        match game.status {
            GameStatus::Live => live.push(game),
            GameStatus::Scheduled => today_upcoming.push(game),
            GameStatus::Final => {}
        }
    }

    let tomorrow_upcoming: Vec<GameSnapshot> = tomorrow
        .games
        .into_iter()
        .filter(|g| g.status == GameStatus::Scheduled)
        .collect();

    let mut warnings = today.warnings;
    warnings.extend(tomorrow.warnings);

    debug!(
        "schedule report: {} live, {} today, {} tomorrow, {} warnings",
        live.len(),
        today_upcoming.len(),
        tomorrow_upcoming.len(),
        warnings.len()
    );

    ScheduleReport {
        ok,
        live,
        today_upcoming,
        tomorrow_upcoming,
        warnings,
        generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::legacy::LegacyScoreboardResponse;
    use crate::nhle::ScheduleResponse;
    use chrono::TimeZone;

    const NHLE_DAY: &str = r#"{
        "gameWeek": [{
            "date": "2026-10-16",
            "games": [{
                "id": 2026020101,
                "gameState": "LIVE",
                "startTimeUTC": "2026-10-16T23:00:00Z",
                "homeTeam": {
                    "id": 10,
                    "abbrev": "TOR",
                    "commonName": {"default": "Maple Leafs"},
                    "placeName": {"default": "Toronto"},
                    "score": 2,
                    "record": {"wins": 3, "losses": 1, "ot": 1}
                },
                "awayTeam": {
                    "id": 6,
                    "abbrev": "BOS",
                    "name": "Bruins",
                    "city": "Boston",
                    "score": 1
                }
            }, {
                "id": 2026020102,
                "gameState": "FUT",
                "homeTeam": {"abbrev": "SEA"},
                "awayTeam": {"abbrev": "VAN", "teamName": {"default": "  "}}
            }]
        }]
    }"#;

    const LEGACY_DAY: &str = r#"{
        "scoreboard": {
            "gameDate": "2026-10-16",
            "games": [{
                "gameId": "0022600101",
                "gameStatus": 2,
                "gameStatusText": "Q3 5:12 ",
                "period": 3,
                "gameClock": "PT05M12.00S",
                "gameTimeUTC": "2026-10-16T23:30:00Z",
                "homeTeam": {
                    "teamId": 1610612738,
                    "teamName": "Celtics",
                    "teamCity": "Boston",
                    "teamTricode": "BOS",
                    "wins": 2,
                    "losses": 0,
                    "score": 77
                },
                "awayTeam": {
                    "teamId": 1610612752,
                    "teamTricode": "NYK",
                    "wins": 1,
                    "score": 70
                }
            }]
        }
    }"#;

    fn nhle_games() -> Vec<NhleGame> {
        let raw: ScheduleResponse = serde_json::from_str(NHLE_DAY).expect("fixture should parse");
        raw.game_week
            .unwrap_or_default()
            .into_iter()
            .flat_map(|d| d.games.unwrap_or_default())
            .collect()
    }

    fn legacy_games() -> Vec<LegacyGame> {
        let raw: LegacyScoreboardResponse =
            serde_json::from_str(LEGACY_DAY).expect("fixture should parse");
        raw.scoreboard.and_then(|s| s.games).unwrap_or_default()
    }

    fn snapshot(game_id: &str, status: GameStatus) -> GameSnapshot {
        GameSnapshot { game_id: game_id.into(), status, ..Default::default() }
    }

    fn day(games: Vec<GameSnapshot>) -> ScheduleDay {
        ScheduleDay { games, ok: true, warnings: Vec::new() }
    }

    #[test]
    fn normalizes_nhle_game() {
        let games = nhle_games();
        let game = normalize(&games[0], &StatusTable::default(), None);

        assert_eq!(game.game_id, "2026020101");
        assert_eq!(game.status, GameStatus::Live);
        assert_eq!(game.status_text, "LIVE");
        assert_eq!(game.start_time_utc, "2026-10-16T23:00:00Z");
        assert_eq!(game.period, None);
        assert_eq!(game.clock, None);

        assert_eq!(game.home_team.team_id, Some(10));
        assert_eq!(game.home_team.code, "TOR");
        assert_eq!(game.home_team.name, "Maple Leafs");
        assert_eq!(game.home_team.city, "Toronto");
        assert_eq!(game.home_team.score, Some(2));
        assert_eq!(game.home_team.record_text, "3-1-1");

        assert_eq!(game.away_team.name, "Bruins");
        assert_eq!(game.away_team.city, "Boston");
        assert_eq!(game.away_team.record_text, "");
    }

    #[test]
    fn team_name_falls_back_to_code() {
        let games = nhle_games();
        let game = normalize(&games[1], &StatusTable::default(), None);
        assert_eq!(game.status, GameStatus::Scheduled);
        assert_eq!(game.home_team.name, "SEA");
        // blank localized name does not win over the code
        assert_eq!(game.away_team.name, "VAN");
        assert_eq!(game.away_team.city, "");
        assert_eq!(game.start_time_utc, "");
    }

    #[test]
    fn normalizes_legacy_game_with_inline_clock() {
        let games = legacy_games();
        let game = normalize(&games[0], &StatusTable::default(), None);

        assert_eq!(game.game_id, "0022600101");
        assert_eq!(game.status, GameStatus::Live);
        assert_eq!(game.status_text, "Q3 5:12");
        assert_eq!(game.period, Some(3));
        assert_eq!(game.clock.as_deref(), Some("PT05M12.00S"));
        assert_eq!(game.home_team.name, "Celtics");
        assert_eq!(game.home_team.record_text, "2-0");
        assert_eq!(game.away_team.name, "NYK");
        assert_eq!(game.away_team.wins, Some(1));
        assert_eq!(game.away_team.losses, None);
    }

    #[test]
    fn missing_record_components_never_render_placeholders() {
        assert_eq!(record_text(Some(4), None, Some(1)), "");
        assert_eq!(record_text(None, Some(2), None), "");
        assert_eq!(record_text(None, None, None), "");
        assert_eq!(record_text(Some(4), Some(2), None), "4-2");
        assert_eq!(record_text(Some(0), Some(0), Some(0)), "0-0-0");
    }

    #[test]
    fn detail_overrides_inline_clock() {
        let games = legacy_games();
        let detail = GameDetail { period: Some(4), clock: None };
        let game = normalize(&games[0], &StatusTable::default(), Some(&detail));
        assert_eq!(game.period, Some(4));
        assert_eq!(game.clock.as_deref(), Some("PT05M12.00S"));
    }

    #[test]
    fn boxscore_clock_prefers_time_remaining() {
        let raw: BoxscoreResponse = serde_json::from_str(
            r#"{"periodDescriptor": {"number": 2}, "clock": {"timeRemaining": "08:14", "displayValue": "8:14"}}"#,
        )
        .expect("boxscore should parse");
        let detail = GameDetail::from(raw);
        assert_eq!(detail.period, Some(2));
        assert_eq!(detail.clock.as_deref(), Some("08:14"));

        let raw: BoxscoreResponse =
            serde_json::from_str(r#"{"clock": {"timeRemaining": "", "displayValue": "INT"}}"#)
                .expect("boxscore should parse");
        assert_eq!(GameDetail::from(raw).clock.as_deref(), Some("INT"));
    }

    #[test]
    fn failed_enrichment_degrades_to_warning() {
        let games: Vec<UpstreamGame> = nhle_games().into_iter().map(UpstreamGame::Nhle).collect();
        let enrichments = vec![
            Enrichment::from_result::<String>("2026020101", Err("timed out".into())),
            Enrichment::from_result::<String>(
                "2026020102",
                Ok(GameDetail { period: Some(1), clock: Some("20:00".into()) }),
            ),
        ];
        let day = ScheduleDay::assemble(&games, enrichments, &StatusTable::default());

        assert!(!day.ok);
        assert_eq!(day.games.len(), 2);
        assert_eq!(day.games[0].period, None);
        assert_eq!(day.games[1].clock.as_deref(), Some("20:00"));
        assert_eq!(day.warnings.len(), 1);
        assert!(day.warnings[0].contains("2026020101"));
    }

    #[test]
    fn assemble_without_enrichment_keeps_input_order() {
        let games: Vec<UpstreamGame> = nhle_games().into_iter().map(UpstreamGame::Nhle).collect();
        let day = ScheduleDay::assemble(&games, Vec::new(), &StatusTable::default());
        let ids: Vec<&str> = day.games.iter().map(|g| g.game_id.as_str()).collect();
        assert_eq!(ids, vec!["2026020101", "2026020102"]);
        assert!(day.warnings.is_empty());
        assert!(day.ok);
    }

    #[test]
    fn report_buckets_by_day_and_status() {
        let today = day(vec![
            snapshot("1", GameStatus::Live),
            snapshot("2", GameStatus::Scheduled),
            snapshot("3", GameStatus::Final),
            snapshot("4", GameStatus::Scheduled),
        ]);
        let tomorrow = day(vec![
            snapshot("5", GameStatus::Scheduled),
            snapshot("6", GameStatus::Live),
            snapshot("7", GameStatus::Final),
        ]);
        let at = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();
        let report = build_report(today, tomorrow, at);

        let ids = |games: &[GameSnapshot]| games.iter().map(|g| g.game_id.clone()).collect::<Vec<_>>();
        assert!(report.ok);
        assert_eq!(ids(&report.live), vec!["1"]);
        assert_eq!(ids(&report.today_upcoming), vec!["2", "4"]);
        assert_eq!(ids(&report.tomorrow_upcoming), vec!["5"]);
        assert_eq!(report.generated_at, "2026-10-16T12:00:00Z");
    }

    #[test]
    fn final_games_never_surface() {
        let statuses = [GameStatus::Scheduled, GameStatus::Live, GameStatus::Final];
        let games: Vec<GameSnapshot> = (0..12)
            .map(|i| snapshot(&i.to_string(), statuses[i % 3]))
            .collect();
        let report = build_report(day(games.clone()), day(games), Utc::now());

        for bucket in [&report.live, &report.today_upcoming, &report.tomorrow_upcoming] {
            assert!(bucket.iter().all(|g| g.status != GameStatus::Final));
        }
        assert_eq!(report.live.len(), 4);
        assert_eq!(report.today_upcoming.len(), 4);
        assert_eq!(report.tomorrow_upcoming.len(), 4);
    }

    #[test]
    fn failed_day_marks_report_not_ok() {
        let today = day(vec![snapshot("1", GameStatus::Scheduled)]);
        let tomorrow = ScheduleDay::failed("Failed to fetch schedule for 2026-10-17: 503".into());
        let report = build_report(today, tomorrow, Utc::now());

        assert!(!report.ok);
        assert_eq!(report.today_upcoming.len(), 1);
        assert_eq!(report.warnings, vec!["Failed to fetch schedule for 2026-10-17: 503"]);
    }

    #[test]
    fn failed_clock_fetch_marks_report_not_ok() {
        let games: Vec<UpstreamGame> = nhle_games().into_iter().map(UpstreamGame::Nhle).collect();
        let enrichments = vec![Enrichment::from_result::<String>("2026020101", Err("HTTP 500".into()))];
        let today = ScheduleDay::assemble(&games, enrichments, &StatusTable::default());
        let report = build_report(today, day(Vec::new()), Utc::now());

        assert!(!report.ok);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].starts_with("Failed to fetch clock for game 2026020101"));
        assert_eq!(report.live.len() + report.today_upcoming.len(), 2);
    }

    #[test]
    fn report_serializes_with_public_field_names() {
        let report = build_report(
            day(vec![snapshot("1", GameStatus::Live)]),
            day(Vec::new()),
            Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap(),
        );
        let value = serde_json::to_value(&report).expect("report should serialize");
        for key in ["ok", "live", "todayUpcoming", "tomorrowUpcoming", "warnings", "generatedAt"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["live"][0]["status"], "live");
        assert_eq!(value["live"][0]["homeTeam"]["recordText"], "");
    }
}
