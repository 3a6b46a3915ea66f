mod state;

use crate::state::app_settings::AppSettings;
use crate::state::network::NetworkWorker;
use crate::state::sources::load_standings;
use anyhow::Context;
use log::{LevelFilter, error, info, warn};
use rink_api::collector::{Season, write_csv};
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Games { out: Option<PathBuf> },
    Standings { out: Option<PathBuf> },
    Results { out: Option<PathBuf> },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let Some(command) = handle_cli_args() else {
        return Ok(());
    };

    better_panic::install();

    let settings = AppSettings::load();
    init_logger(settings.log_level);

    let result = match command {
        Command::Games { out } => run_games(&settings, out).await,
        Command::Standings { out } => run_standings(&settings, out),
        Command::Results { out } => run_results(&settings, out).await,
    };
    if let Err(e) = &result {
        error!("{e:#}");
    }
    result
}

/// `RINKBOARD_LOG` wins over `RUST_LOG`; default is `warn`.
fn init_logger(level: Option<LevelFilter>) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.init();
}

async fn run_games(settings: &AppSettings, out: Option<PathBuf>) -> anyhow::Result<()> {
    let report = NetworkWorker::new(settings).load_games().await;
    let out = out.unwrap_or_else(|| settings.games_cache_path());
    write_json(&report, Some(out.as_path()))?;

    eprintln!(
        "games: {} live, {} today, {} tomorrow, {} warnings -> {}",
        report.live.len(),
        report.today_upcoming.len(),
        report.tomorrow_upcoming.len(),
        report.warnings.len(),
        out.display()
    );
    Ok(())
}

fn run_standings(settings: &AppSettings, out: Option<PathBuf>) -> anyhow::Result<()> {
    let report = load_standings(settings);
    write_json(&report, out.as_deref())?;

    eprintln!("standings: {} teams, {} warnings", report.rows.len(), report.warnings.len());
    Ok(())
}

async fn run_results(settings: &AppSettings, out: Option<PathBuf>) -> anyhow::Result<()> {
    let season = Season::from_id(&settings.season)
        .with_context(|| format!("invalid season {:?}, expected e.g. 20242025", settings.season))?;
    let results = NetworkWorker::new(settings)
        .load_results(&season)
        .await
        .with_context(|| format!("failed to collect {} results", season.id))?;

    let out = out.unwrap_or_else(|| settings.data_dir.join(season.file_name()));
    if results.lines.is_empty() {
        warn!("no results for {}, {} left untouched", season.id, out.display());
    } else {
        if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let file = fs::File::create(&out).with_context(|| format!("failed to create {}", out.display()))?;
        write_csv(file, &results.lines).with_context(|| format!("failed to write {}", out.display()))?;
        info!("wrote {}", out.display());
    }

    eprintln!(
        "results: {} lines, {} warnings -> {}",
        results.lines.len(),
        results.warnings.len(),
        out.display()
    );
    Ok(())
}

/// Pretty JSON to `out`, or stdout when no path is given.
fn write_json<T: Serialize>(value: &T, out: Option<&Path>) -> anyhow::Result<()> {
    let body = serde_json::to_string_pretty(value).context("failed to serialize report")?;
    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            fs::write(path, body + "\n")
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("wrote {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{body}").context("failed to write to stdout")?;
        }
    }
    Ok(())
}

fn handle_cli_args() -> Option<Command> {
    match parse_args(std::env::args().skip(1)) {
        Ok(Some(command)) => Some(command),
        Ok(None) => None,
        Err(message) => {
            eprintln!("{message}\n\n{}", usage_text());
            std::process::exit(2);
        }
    }
}

/// `Ok(None)` means the request was answered here (help, version).
fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Option<Command>, String> {
    let mut args = args.into_iter();
    let Some(arg) = args.next() else {
        return Err("Missing command".to_owned());
    };

    let name = match arg.as_str() {
        "-h" | "--help" => {
            println!("{}", usage_text());
            return Ok(None);
        }
        "-V" | "--version" => {
            println!("rinkboard {}", env!("CARGO_PKG_VERSION"));
            return Ok(None);
        }
        name @ ("games" | "standings" | "results") => name.to_owned(),
        _ => return Err(format!("Unknown argument: {arg}")),
    };

    let mut out = None;
    while let Some(flag) = args.next() {
        match flag.as_str() {
            "-o" | "--out" => match args.next() {
                Some(path) => out = Some(PathBuf::from(path)),
                None => return Err(format!("{flag} needs a path")),
            },
            _ => return Err(format!("Unknown argument: {flag}")),
        }
    }

    Ok(Some(match name.as_str() {
        "games" => Command::Games { out },
        "standings" => Command::Standings { out },
        _ => Command::Results { out },
    }))
}

fn usage_text() -> &'static str {
    "rinkboard - NHL schedule snapshots and standings

Usage:
  rinkboard games [--out PATH]       Write today's and tomorrow's games (default data/games_cache.json)
  rinkboard standings [--out PATH]   Write the standings table (default stdout)
  rinkboard results [--out PATH]     Collect season results as CSV (default data/nhl_periods_<season>.csv)
  rinkboard --help
  rinkboard --version

Environment:
  RINKBOARD_DATA_DIR        Data directory (default data)
  RINKBOARD_STANDINGS_CSV   Standings source file, .csv or .json
  RINKBOARD_CONFERENCES     JSON map of team code to East/West
  RINKBOARD_API_BASE        NHL web API base (default https://api-web.nhle.com/v1)
  RINKBOARD_LEGACY_URL      Legacy scoreboard URL template, {date} is replaced
  RINKBOARD_ENRICH          Set to 0 to skip per-game clock lookups
  RINKBOARD_STATS_BASE      NHL stats API base (default https://statsapi.web.nhl.com/api/v1)
  RINKBOARD_SEASON          Season collected by `results` (default 20242025)
  RINKBOARD_LOG             Log level (falls back to RUST_LOG, default warn)"
}
