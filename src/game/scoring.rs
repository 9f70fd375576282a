use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A word could not be scored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    /// A letter of the word has no point value. This is a configuration error:
    /// the table must cover every letter the lexicon can produce.
    #[error("no point value for letter {letter:?} (needed by {word:?})")]
    MissingScoreEntry {
        /// The letter without a point value.
        letter: char,
        /// The first word that needed it.
        word: String,
    },
}

/// Point value of each letter.
///
/// ```
/// use lexdawg::game::ScoreTable;
///
/// let table: ScoreTable = [('H', 4), ('E', 1), ('S', 1)].into_iter().collect();
/// assert_eq!(table.score("HES"), Ok(6));
/// assert!(table.score("HEX").is_err());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreTable {
    points: HashMap<char, u32>,
}

impl ScoreTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the point value of `letter`.
    pub fn insert(&mut self, letter: char, points: u32) {
        self.points.insert(letter, points);
    }

    /// Point value of `letter`, if configured.
    pub fn points(&self, letter: char) -> Option<u32> {
        self.points.get(&letter).copied()
    }

    /// Sum of the point values of the letters of `word`.
    pub fn score(&self, word: &str) -> Result<u32, ScoreError> {
        word.chars().try_fold(0, |total, letter| {
            self.points(letter)
                .map(|points| total + points)
                .ok_or_else(|| ScoreError::MissingScoreEntry {
                    letter,
                    word: word.to_owned(),
                })
        })
    }

    /// Distinct letters of `word` without a point value, in order of first use.
    ///
    /// ```
    /// use lexdawg::game::ScoreTable;
    ///
    /// let table: ScoreTable = [('H', 4)].into_iter().collect();
    /// assert_eq!(table.missing_letters("HQXQ"), ['Q', 'X']);
    /// ```
    pub fn missing_letters(&self, word: &str) -> Vec<char> {
        let mut missing = Vec::new();
        for letter in word.chars() {
            if self.points(letter).is_none() && !missing.contains(&letter) {
                missing.push(letter);
            }
        }
        missing
    }

    /// Number of letters with a value.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if no letter has a value.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterates over `(letter, points)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (char, u32)> + '_ {
        self.points.iter().map(|(&letter, &points)| (letter, points))
    }
}

impl FromIterator<(char, u32)> for ScoreTable {
    fn from_iter<I: IntoIterator<Item = (char, u32)>>(iter: I) -> Self {
        ScoreTable {
            points: iter.into_iter().collect(),
        }
    }
}
