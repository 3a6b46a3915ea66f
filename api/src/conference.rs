use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Conference {
    East,
    West,
}

impl Conference {
    pub fn label(&self) -> &'static str {
        match self {
            Conference::East => "East",
            Conference::West => "West",
        }
    }
}

const NHL_CONFERENCES: [(&str, Conference); 32] = [
    ("BOS", Conference::East),
    ("BUF", Conference::East),
    ("DET", Conference::East),
    ("FLA", Conference::East),
    ("MTL", Conference::East),
    ("OTT", Conference::East),
    ("TBL", Conference::East),
    ("TOR", Conference::East),
    ("CAR", Conference::East),
    ("CBJ", Conference::East),
    ("NJD", Conference::East),
    ("NYI", Conference::East),
    ("NYR", Conference::East),
    ("PHI", Conference::East),
    ("PIT", Conference::East),
    ("WSH", Conference::East),
    ("ARI", Conference::West),
    ("CGY", Conference::West),
    ("CHI", Conference::West),
    ("COL", Conference::West),
    ("DAL", Conference::West),
    ("EDM", Conference::West),
    ("LAK", Conference::West),
    ("MIN", Conference::West),
    ("NSH", Conference::West),
    ("SJS", Conference::West),
    ("SEA", Conference::West),
    ("STL", Conference::West),
    ("VAN", Conference::West),
    ("VGK", Conference::West),
    ("WPG", Conference::West),
    ("ANA", Conference::West),
];

/// Team code → conference lookup handed to the standings aggregator.
///
/// The default is the NHL alignment; another league or season is a different
/// table (see [`ConferenceTable::from_json`]), not different aggregation code.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConferenceTable {
    by_code: HashMap<String, Conference>,
}

impl ConferenceTable {
    pub fn nhl() -> Self {
        NHL_CONFERENCES
            .iter()
            .map(|(code, conf)| ((*code).to_owned(), *conf))
            .collect()
    }

    /// Parse a JSON object such as `{"BOS": "East", "SEA": "West"}`.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let by_code: HashMap<String, Conference> = serde_json::from_str(raw)?;
        Ok(by_code.into_iter().collect())
    }

    pub fn get(&self, code: &str) -> Option<Conference> {
        self.by_code.get(&code.trim().to_ascii_uppercase()).copied()
    }

    /// Conference label for a team code, empty when unknown.
    pub fn label_for(&self, code: &str) -> &'static str {
        self.get(code).map(|c| c.label()).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

impl FromIterator<(String, Conference)> for ConferenceTable {
    fn from_iter<I: IntoIterator<Item = (String, Conference)>>(iter: I) -> Self {
        Self {
            by_code: iter
                .into_iter()
                .map(|(code, conf)| (code.trim().to_ascii_uppercase(), conf))
                .collect(),
        }
    }
}
