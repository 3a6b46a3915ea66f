use crate::state::app_settings::AppSettings;
use chrono::{Days, NaiveDate, Utc};
use log::debug;
use rink_api::ScheduleReport;
use rink_api::client::{ApiResult, NhlApi, ScheduleFeed};
use rink_api::collector::{CollectedResults, Season};
use rink_api::schedule::build_report;
use rink_api::status::StatusTable;

/// Fetches today's and tomorrow's schedules and folds them into one report.
pub struct NetworkWorker {
    client: NhlApi,
    feed: ScheduleFeed,
    statuses: StatusTable,
    enrich: bool,
}

impl NetworkWorker {
    pub fn new(settings: &AppSettings) -> Self {
        Self {
            client: NhlApi::with_base_url(settings.api_base.clone())
                .with_stats_url(settings.stats_base.clone()),
            feed: settings.feed(),
            statuses: StatusTable::default(),
            enrich: settings.enrich,
        }
    }

    /// "Today" is the UTC calendar date.
    pub async fn load_games(&self) -> ScheduleReport {
        let today = Utc::now().date_naive();
        self.load_games_for(today).await
    }

    /// Both days are fetched concurrently; neither failure aborts the other.
    pub async fn load_games_for(&self, today: NaiveDate) -> ScheduleReport {
        let tomorrow = today.checked_add_days(Days::new(1)).unwrap_or(today);
        debug!("loading schedule for {today} and {tomorrow}");

        let (today, tomorrow) = tokio::join!(
            self.client.fetch_day(&self.feed, today, &self.statuses, self.enrich),
            self.client.fetch_day(&self.feed, tomorrow, &self.statuses, self.enrich),
        );
        build_report(today, tomorrow, Utc::now())
    }

    /// Season results from opening day through today (UTC).
    pub async fn load_results(&self, season: &Season) -> ApiResult<CollectedResults> {
        self.load_results_until(season, Utc::now().date_naive()).await
    }

    pub async fn load_results_until(&self, season: &Season, end: NaiveDate) -> ApiResult<CollectedResults> {
        debug!("collecting {} results through {end}", season.id);
        self.client.collect_results(season, end).await
    }
}
