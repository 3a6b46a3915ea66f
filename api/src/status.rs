use crate::GameStatus;
use std::collections::HashMap;

/// States reported by the api-web.nhle.com schedule (`gameState`).
const NHLE_STATES: [(&str, GameStatus); 11] = [
    ("FUT", GameStatus::Scheduled),
    ("PRE", GameStatus::Scheduled),
    ("PREGAME", GameStatus::Scheduled),
    ("WARMUP", GameStatus::Scheduled),
    ("LIVE", GameStatus::Live),
    ("CRIT", GameStatus::Live),
    ("INPROGRESS", GameStatus::Live),
    ("FINAL", GameStatus::Final),
    ("OFF", GameStatus::Final),
    ("POSTPONED", GameStatus::Final),
    ("TBD", GameStatus::Final),
];

/// Codes reported by the legacy scoreboard (`gameStatus`).
const LEGACY_CODES: [(i64, GameStatus); 3] = [
    (1, GameStatus::Scheduled),
    (2, GameStatus::Live),
    (3, GameStatus::Final),
];

/// An upstream status value. Text keys are stored trimmed and upper-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StatusKey {
    Text(String),
    Code(i64),
}

impl From<&str> for StatusKey {
    fn from(s: &str) -> Self {
        StatusKey::Text(s.trim().to_ascii_uppercase())
    }
}

impl From<i64> for StatusKey {
    fn from(code: i64) -> Self {
        StatusKey::Code(code)
    }
}

/// Lookup from upstream status vocabularies to [`GameStatus`].
///
/// The default table knows both the NHL web API and the legacy scoreboard.
/// Another feed only needs its vocabulary inserted here; mapping code asks the
/// table and never matches on raw values itself.
#[derive(Debug, Clone)]
pub struct StatusTable {
    entries: HashMap<StatusKey, GameStatus>,
}

impl Default for StatusTable {
    fn default() -> Self {
        let mut table = Self::empty();
        for (state, status) in NHLE_STATES {
            table.insert(state, status);
        }
        for (code, status) in LEGACY_CODES {
            table.insert(code, status);
        }
        table
    }
}

impl StatusTable {
    pub fn empty() -> Self {
        Self { entries: HashMap::new() }
    }

    pub fn insert(&mut self, key: impl Into<StatusKey>, status: GameStatus) -> &mut Self {
        self.entries.insert(key.into(), status);
        self
    }

    /// Unknown or missing values resolve to `Scheduled`.
    pub fn resolve(&self, key: Option<&StatusKey>) -> GameStatus {
        key.and_then(|k| self.entries.get(k))
            .copied()
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
