use crate::collector::{CollectedResults, Season, TeamMap, game_lines, sort_lines};
use crate::legacy::LegacyScoreboardResponse;
use crate::nhle::{BoxscoreResponse, NhleGame, ScheduleResponse};
use crate::schedule::{Enrichment, ScheduleDay, UpstreamGame};
use crate::statsapi::{LiveFeed, ScheduleDate, SeasonSchedule, StatsGame, TeamsResponse};
use crate::status::StatusTable;
use crate::GameDetail;
use chrono::NaiveDate;
use futures_util::future::join_all;
use futures_util::stream::{self, StreamExt};
use log::{debug, warn};
use reqwest::Client;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

const NHLE_WEB_V1: &str = "https://api-web.nhle.com/v1";
const NHL_STATS_V1: &str = "https://statsapi.web.nhl.com/api/v1";

/// Live feeds in flight at once during a season collection.
const FEED_CONCURRENCY: usize = 8;

/// Which upstream shape the schedule is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleFeed {
    /// `{base}/schedule/{date}` on the NHL web API.
    Nhle,
    /// A legacy scoreboard; `{date}` in the template is replaced by `YYYY-MM-DD`.
    Legacy { url_template: String },
}

/// Client for the NHL web API (schedule, boxscore), the legacy scoreboard and
/// the stats API (season results).
#[derive(Debug, Clone)]
pub struct NhlApi {
    client: Client,
    timeout: Duration,
    base_url: String,
    stats_url: String,
}

impl Default for NhlApi {
    fn default() -> Self {
        Self {
            client: Client::builder()
                .user_agent("rinkboard/0.1 (schedule and standings)")
                .build()
                .unwrap_or_default(),
            timeout: Duration::from_secs(10),
            base_url: NHLE_WEB_V1.to_owned(),
            stats_url: NHL_STATS_V1.to_owned(),
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    NotFound(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl NhlApi {
    /// Point the NHL web API calls somewhere else (a mirror, or a test server).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            ..Self::default()
        }
    }

    pub fn with_stats_url(mut self, stats_url: impl Into<String>) -> Self {
        self.stats_url = stats_url.into().trim_end_matches('/').to_owned();
        self
    }

    /// Fetch the raw schedule records for one date.
    pub async fn fetch_schedule(
        &self,
        feed: &ScheduleFeed,
        date: NaiveDate,
    ) -> ApiResult<Vec<UpstreamGame>> {
        match feed {
            ScheduleFeed::Nhle => {
                let url = format!("{}/schedule/{date}", self.base_url);
                let raw: ScheduleResponse = self.get(&url).await?;
                Ok(select_game_day(raw, date)
                    .into_iter()
                    .map(UpstreamGame::Nhle)
                    .collect())
            }
            ScheduleFeed::Legacy { url_template } => {
                let url = url_template.replace("{date}", &date.to_string());
                let raw: LegacyScoreboardResponse = self.get(&url).await?;
                let scoreboard = raw
                    .scoreboard
                    .ok_or_else(|| ApiError::NotFound(format!("no scoreboard in {url}")))?;
                if let Some(game_date) = scoreboard.game_date.as_deref()
                    && game_date != date.to_string()
                {
                    debug!("legacy scoreboard is for {game_date}, not {date}");
                    return Ok(Vec::new());
                }
                Ok(scoreboard
                    .games
                    .unwrap_or_default()
                    .into_iter()
                    .map(UpstreamGame::Legacy)
                    .collect())
            }
        }
    }

    /// Fetch period and clock for one game from its boxscore.
    pub async fn fetch_game_detail(&self, game_id: &str) -> ApiResult<GameDetail> {
        let url = format!("{}/gamecenter/{game_id}/boxscore", self.base_url);
        let raw: BoxscoreResponse = self.get(&url).await?;
        Ok(GameDetail::from(raw))
    }

    /// Fetch and normalize one date. Never fails: a schedule error yields a
    /// failed day, a detail error a per-game warning.
    pub async fn fetch_day(
        &self,
        feed: &ScheduleFeed,
        date: NaiveDate,
        statuses: &StatusTable,
        enrich: bool,
    ) -> ScheduleDay {
        let games = match self.fetch_schedule(feed, date).await {
            Ok(games) => games,
            Err(e) => return ScheduleDay::failed(format!("Failed to fetch schedule for {date}: {e}")),
        };
        debug!("{} games on {date}", games.len());

        let enrichments = if enrich {
            self.fetch_enrichments(&games).await
        } else {
            Vec::new()
        };
        ScheduleDay::assemble(&games, enrichments, statuses)
    }

    /// Boxscore lookups run concurrently; results come back in `games` order.
    /// Legacy records carry their clock inline and are not looked up.
    async fn fetch_enrichments(&self, games: &[UpstreamGame]) -> Vec<Enrichment> {
        let lookups = games.iter().map(|game| async move {
            let game_id = game.game_id();
            if !matches!(game, UpstreamGame::Nhle(_)) || game_id.is_empty() {
                return Enrichment::default();
            }
            let result = self.fetch_game_detail(&game_id).await;
            Enrichment::from_result(&game_id, result)
        });
        join_all(lookups).await
    }

    pub async fn fetch_team_map(&self) -> ApiResult<TeamMap> {
        let url = format!("{}/teams", self.stats_url);
        let raw: TeamsResponse = self.get(&url).await?;
        Ok(TeamMap::from(raw))
    }

    pub async fn fetch_season_schedule(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ApiResult<Vec<ScheduleDate>> {
        let url = format!("{}/schedule?startDate={start}&endDate={end}", self.stats_url);
        let raw: SeasonSchedule = self.get(&url).await?;
        Ok(raw.dates.unwrap_or_default())
    }

    pub async fn fetch_live_feed(&self, game_pk: i64) -> ApiResult<LiveFeed> {
        let url = format!("{}/game/{game_pk}/feed/live", self.stats_url);
        self.get(&url).await
    }

    /// Per-team result lines for every game from the season opener to `end`.
    ///
    /// Only the schedule fetch is fatal. A missing team list or a failed live
    /// feed becomes a warning; that game is left out.
    pub async fn collect_results(&self, season: &Season, end: NaiveDate) -> ApiResult<CollectedResults> {
        let mut warnings = Vec::new();
        let teams = match self.fetch_team_map().await {
            Ok(teams) => teams,
            Err(e) => {
                let warning = format!("Failed to fetch team list: {e}");
                warn!("{warning}");
                warnings.push(warning);
                TeamMap::default()
            }
        };

        let games: Vec<(String, StatsGame)> = self
            .fetch_season_schedule(season.start, end)
            .await?
            .into_iter()
            .flat_map(|day| {
                let date = day.date.unwrap_or_default();
                day.games
                    .unwrap_or_default()
                    .into_iter()
                    .map(move |game| (date.clone(), game))
            })
            .collect();
        debug!("{} games scheduled between {} and {end}", games.len(), season.start);

        let feeds: Vec<Option<ApiResult<LiveFeed>>> = stream::iter(&games)
            .map(|(_, game)| async move {
                match game.game_pk {
                    Some(pk) => Some(self.fetch_live_feed(pk).await),
                    None => None,
                }
            })
            .buffered(FEED_CONCURRENCY)
            .collect()
            .await;

        let mut lines = Vec::with_capacity(games.len() * 2);
        for ((date, game), feed) in games.iter().zip(feeds) {
            match feed {
                Some(Ok(feed)) => lines.extend(game_lines(date, game, &feed, &teams, season)),
                Some(Err(e)) => {
                    let warning = format!(
                        "Failed to fetch live feed for game {}: {e}",
                        game.game_pk.unwrap_or_default()
                    );
                    warn!("{warning}");
                    warnings.push(warning);
                }
                None => debug!("game on {date} has no gamePk, skipped"),
            }
        }
        sort_lines(&mut lines);

        Ok(CollectedResults { lines, warnings })
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        match response.error_for_status() {
            Ok(res) => res
                .json::<T>()
                .await
                .map_err(|e| ApiError::Parsing(e, url.to_owned())),
            Err(e) => Err(ApiError::Api(e, url.to_owned())),
        }
    }
}

/// The schedule endpoint answers with a whole week; keep the requested day.
/// Entries without a date are kept, since there is nothing to filter on.
fn select_game_day(raw: ScheduleResponse, date: NaiveDate) -> Vec<NhleGame> {
    let wanted = date.to_string();
    raw.game_week
        .unwrap_or_default()
        .into_iter()
        .filter(|day| day.date.as_deref().is_none_or(|d| d == wanted))
        .flat_map(|day| day.games.unwrap_or_default())
        .collect()
}
