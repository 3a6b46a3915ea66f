use crate::state::app_settings::AppSettings;
use log::{debug, warn};
use rink_api::StandingsReport;
use rink_api::conference::ConferenceTable;
use rink_api::standings::{StandingsOptions, standings_from_csv, standings_from_json};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub struct StandingsSource {
    pub path: PathBuf,
    pub warnings: Vec<String>,
}

/// Pick the standings file: the explicit path if configured, else the first
/// candidate that exists. Falling back past the first candidate is reported.
pub fn select_standings_source(settings: &AppSettings) -> Result<StandingsSource, String> {
    if let Some(path) = &settings.standings_path {
        return if path.is_file() {
            Ok(StandingsSource { path: path.clone(), warnings: Vec::new() })
        } else {
            Err(format!("Standings source {} not found", path.display()))
        };
    }

    let candidates = settings.standings_candidates();
    let Some(index) = candidates.iter().position(|p| p.is_file()) else {
        return Err(format!("No standings source found in {}", settings.data_dir.display()));
    };

    let path = candidates[index].clone();
    let mut warnings = Vec::new();
    if index > 0 {
        warnings.push(format!(
            "Primary standings source {} not found; using {}",
            candidates[0].display(),
            path.display()
        ));
    }
    Ok(StandingsSource { path, warnings })
}

/// Conference lookup from the configured JSON file, or the built-in NHL table.
pub fn load_conferences(settings: &AppSettings) -> (ConferenceTable, Vec<String>) {
    let Some(path) = &settings.conferences_path else {
        return (ConferenceTable::nhl(), Vec::new());
    };

    let loaded = fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|raw| ConferenceTable::from_json(&raw).map_err(|e| e.to_string()));
    match loaded {
        Ok(table) => {
            debug!("loaded {} conference entries from {}", table.len(), path.display());
            (table, Vec::new())
        }
        Err(e) => {
            let warning = format!(
                "Failed to load conferences from {}: {e}; using built-in table",
                path.display()
            );
            warn!("{warning}");
            (ConferenceTable::nhl(), vec![warning])
        }
    }
}

/// Read one standings file, dispatching on extension (`.json` or CSV).
pub fn read_standings(path: &Path, options: &StandingsOptions) -> StandingsReport {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let report = if is_json {
        fs::read_to_string(path).map(|raw| standings_from_json(&raw, options))
    } else {
        File::open(path).map(|file| standings_from_csv(BufReader::new(file), options))
    };

    report.unwrap_or_else(|e| {
        let warning = format!("Failed to read standings source {}: {e}", path.display());
        warn!("{warning}");
        StandingsReport::unavailable(vec![warning])
    })
}

/// Full standings run from settings. Never fails; problems land in `warnings`.
pub fn load_standings(settings: &AppSettings) -> StandingsReport {
    let (conferences, mut warnings) = load_conferences(settings);

    let source = match select_standings_source(settings) {
        Ok(source) => source,
        Err(warning) => {
            warn!("{warning}");
            warnings.push(warning);
            return StandingsReport::unavailable(warnings);
        }
    };
    for w in &source.warnings {
        warn!("{w}");
    }
    warnings.extend(source.warnings);

    debug!("computing standings from {}", source.path.display());
    let options = StandingsOptions { conferences, ..Default::default() };
    let mut report = read_standings(&source.path, &options);
    warnings.append(&mut report.warnings);
    report.warnings = warnings;
    report
}
