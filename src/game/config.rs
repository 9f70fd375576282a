use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::rack::Rack;
use super::row::tile_letter;
use super::scoring::ScoreTable;

/// Errors from loading game configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// The config is not valid JSON for a [`GameConfig`].
    #[error("invalid game config: {0}")]
    Json(#[from] serde_json::Error),

    /// A table key is not a single uppercase letter.
    #[error("invalid letter {0:?} in game config")]
    InvalidLetter(char),

    /// The language code is not one of the built-in tables.
    #[error("unknown language {0:?} (expected en or fr)")]
    UnknownLanguage(String),
}

/// Letter, point value and number of tiles in the bag.
type LetterSpec = (char, u32, u32);

#[rustfmt::skip]
const ENGLISH: [LetterSpec; 26] = [
    ('A', 1, 9), ('B', 3, 2), ('C', 3, 2), ('D', 2, 4), ('E', 1, 12), ('F', 4, 2),
    ('G', 2, 3), ('H', 4, 2), ('I', 1, 9), ('J', 8, 1), ('K', 5, 1), ('L', 1, 4),
    ('M', 3, 2), ('N', 1, 6), ('O', 1, 8), ('P', 3, 2), ('Q', 10, 1), ('R', 1, 6),
    ('S', 1, 4), ('T', 1, 6), ('U', 1, 4), ('V', 4, 2), ('W', 4, 2), ('X', 8, 1),
    ('Y', 4, 2), ('Z', 10, 1),
];

#[rustfmt::skip]
const FRENCH: [LetterSpec; 26] = [
    ('A', 1, 9), ('B', 3, 2), ('C', 3, 2), ('D', 2, 3), ('E', 1, 15), ('F', 4, 2),
    ('G', 2, 2), ('H', 4, 2), ('I', 1, 8), ('J', 8, 1), ('K', 10, 1), ('L', 1, 5),
    ('M', 2, 3), ('N', 1, 6), ('O', 1, 6), ('P', 3, 2), ('Q', 8, 1), ('R', 1, 6),
    ('S', 1, 6), ('T', 1, 6), ('U', 1, 6), ('V', 4, 2), ('W', 10, 1), ('X', 10, 1),
    ('Y', 10, 1), ('Z', 10, 1),
];

/// Built-in letter tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Language {
    /// English tournament distribution.
    English,
    /// French tournament distribution.
    French,
}

impl Language {
    fn specs(self) -> &'static [LetterSpec] {
        match self {
            Language::English => &ENGLISH,
            Language::French => &FRENCH,
        }
    }

    /// Two-letter code.
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::French => "fr",
        }
    }

    /// Point value of every letter.
    pub fn point_values(self) -> ScoreTable {
        self.specs().iter().map(|&(ch, points, _)| (ch, points)).collect()
    }

    /// Full tile distribution, two blanks included.
    pub fn tile_bag(self) -> TileBag {
        TileBag {
            counts: self.specs().iter().map(|&(ch, _, count)| (ch, count)).collect(),
            blanks: 2,
        }
    }

    /// The built-in tables as a [`GameConfig`] without a lexicon path.
    pub fn config(self) -> GameConfig {
        let bag = self.tile_bag();
        GameConfig {
            points: self.point_values(),
            tile_bag: bag.counts,
            blanks: bag.blanks,
            lexicon: None,
        }
    }
}

impl FromStr for Language {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Language::English),
            "fr" | "french" => Ok(Language::French),
            _ => Err(ConfigError::UnknownLanguage(s.to_owned())),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Number of tiles of each letter in a full bag.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TileBag {
    counts: HashMap<char, u32>,
    blanks: u32,
}

impl TileBag {
    /// Tiles showing `letter` in a full bag.
    pub fn count(&self, letter: char) -> u32 {
        self.counts.get(&letter).copied().unwrap_or(0)
    }

    /// Number of blank tiles.
    pub fn blanks(&self) -> u32 {
        self.blanks
    }

    /// Total number of tiles, blanks included.
    pub fn total(&self) -> u32 {
        self.counts.values().sum::<u32>() + self.blanks
    }

    /// True if a full bag holds enough of every letter on `rack`.
    pub fn permits(&self, rack: &Rack) -> bool {
        rack.distinct()
            .all(|letter| rack.count(letter) as u64 <= u64::from(self.count(letter)))
    }
}

/// Per-language game configuration, as stored in JSON:
///
/// ```json
/// { "points": {"A": 1, "B": 3}, "tile_bag": {"A": 9, "B": 2}, "blanks": 2, "lexicon": "en.txt" }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Point value per letter.
    pub points: ScoreTable,
    /// Tile count per letter.
    #[serde(default)]
    pub tile_bag: HashMap<char, u32>,
    /// Number of blank tiles.
    #[serde(default)]
    pub blanks: u32,
    /// Word list the graph is built from.
    #[serde(default)]
    pub lexicon: Option<PathBuf>,
}

impl GameConfig {
    /// Parses and validates a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_json(&json)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let letters = self
            .points
            .iter()
            .map(|(ch, _)| ch)
            .chain(self.tile_bag.keys().copied());
        for ch in letters {
            if tile_letter(ch) != Some(ch) {
                return Err(ConfigError::InvalidLetter(ch));
            }
        }
        Ok(())
    }

    /// The tile distribution.
    pub fn tile_bag(&self) -> TileBag {
        TileBag {
            counts: self.tile_bag.clone(),
            blanks: self.blanks,
        }
    }
}
