use log::LevelFilter;
use rink_api::client::ScheduleFeed;
use std::path::PathBuf;

const DEFAULT_API_BASE: &str = "https://api-web.nhle.com/v1";
const DEFAULT_STATS_BASE: &str = "https://statsapi.web.nhl.com/api/v1";
const DEFAULT_SEASON: &str = "20242025";

/// Standings files tried in order under the data dir when no explicit path is set.
pub const STANDINGS_CANDIDATES: [&str; 2] = ["nhl_periods_20242025.csv", "nba_quarters_202526.csv"];

#[derive(Debug, Clone, PartialEq)]
pub struct AppSettings {
    pub data_dir: PathBuf,
    pub standings_path: Option<PathBuf>,
    pub conferences_path: Option<PathBuf>,
    pub api_base: String,
    pub legacy_url: Option<String>,
    pub enrich: bool,
    pub stats_base: String,
    pub season: String,
    pub log_level: Option<LevelFilter>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            standings_path: None,
            conferences_path: None,
            api_base: DEFAULT_API_BASE.to_owned(),
            legacy_url: None,
            enrich: true,
            stats_base: DEFAULT_STATS_BASE.to_owned(),
            season: DEFAULT_SEASON.to_owned(),
            log_level: None,
        }
    }
}

impl AppSettings {
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        Self {
            data_dir: get("RINKBOARD_DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            standings_path: get("RINKBOARD_STANDINGS_CSV").map(PathBuf::from),
            conferences_path: get("RINKBOARD_CONFERENCES").map(PathBuf::from),
            api_base: get("RINKBOARD_API_BASE").unwrap_or(defaults.api_base),
            legacy_url: get("RINKBOARD_LEGACY_URL"),
            enrich: get("RINKBOARD_ENRICH")
                .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off"))
                .unwrap_or(true),
            stats_base: get("RINKBOARD_STATS_BASE").unwrap_or(defaults.stats_base),
            season: get("RINKBOARD_SEASON").unwrap_or(defaults.season),
            log_level: get("RINKBOARD_LOG").and_then(|v| v.parse().ok()),
        }
    }

    pub fn feed(&self) -> ScheduleFeed {
        match &self.legacy_url {
            Some(url_template) => ScheduleFeed::Legacy { url_template: url_template.clone() },
            None => ScheduleFeed::Nhle,
        }
    }

    pub fn standings_candidates(&self) -> Vec<PathBuf> {
        STANDINGS_CANDIDATES.iter().map(|name| self.data_dir.join(name)).collect()
    }

    pub fn games_cache_path(&self) -> PathBuf {
        self.data_dir.join("games_cache.json")
    }
}
