//! Enumerates the words a rack can form through one anchor square.
//!
//! The search walks the lexicon graph and the row together. `extend_right`
//! follows fixed letters and places rack tiles on empty squares moving right;
//! `left_part` first grows a prefix of rack tiles that will sit left of the
//! anchor. Every call owns its rack copy, so sibling branches never see each
//! other's tiles and nothing has to be undone when backtracking.

use hashbrown::HashMap;
use log::{debug, warn};

use crate::dawg::{Dawg, NodeRef};

use super::rack::Rack;
use super::row::Square;
use super::scoring::{ScoreError, ScoreTable};

/// Longest prefix tried left of the anchor unless configured otherwise.
pub const DEFAULT_LEFT_LIMIT: usize = 5;

/// The words found by [`MoveGenerator::generate`], each with its score.
#[derive(Clone, Debug, Default)]
pub struct Plays {
    words: HashMap<String, u32>,
    errors: Vec<ScoreError>,
}

impl Plays {
    /// Score of `word`, if it was found.
    pub fn get(&self, word: &str) -> Option<u32> {
        self.words.get(word).copied()
    }

    /// True if `word` was found.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains_key(word)
    }

    /// Number of distinct words found.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// True if nothing playable was found.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Iterates over `(word, score)` in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.words.iter().map(|(word, &score)| (word.as_str(), score))
    }

    /// All plays, best score first; ties in alphabetical order.
    pub fn ranked(&self) -> Vec<(&str, u32)> {
        let mut ranked: Vec<_> = self.iter().collect();
        ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        ranked
    }

    /// Configuration problems hit while scoring, one per missing letter.
    ///
    /// Words that needed those letters are left out of the plays.
    pub fn errors(&self) -> &[ScoreError] {
        &self.errors
    }
}

/// Generates plays through an anchor square.
///
/// ```
/// use lexdawg::dawg::build_dawg;
/// use lexdawg::game::{Language, MoveGenerator, Rack, Row};
///
/// let dawg = build_dawg(["HE", "HES", "HET", "HOST"]).unwrap();
/// let scores = Language::English.point_values();
/// let row: Row = "H...".parse().unwrap();
/// let rack: Rack = "ESTO".parse().unwrap();
///
/// let plays = MoveGenerator::new(&dawg, &scores).generate(row.square(0), &rack);
/// assert_eq!(
///     plays.ranked(),
///     vec![("HOST", 7), ("HES", 6), ("HET", 6), ("HE", 5)]
/// );
/// ```
#[derive(Clone, Copy, Debug)]
pub struct MoveGenerator<'a> {
    dawg: &'a Dawg<char>,
    scores: &'a ScoreTable,
    left_limit: usize,
}

impl<'a> MoveGenerator<'a> {
    /// Creates a generator over `dawg`, scoring with `scores`.
    pub fn new(dawg: &'a Dawg<char>, scores: &'a ScoreTable) -> Self {
        MoveGenerator {
            dawg,
            scores,
            left_limit: DEFAULT_LEFT_LIMIT,
        }
    }

    /// Sets how many rack tiles may be prepended left of the anchor, on top of
    /// the tile placed immediately next to it.
    pub fn with_left_limit(mut self, left_limit: usize) -> Self {
        self.left_limit = left_limit;
        self
    }

    /// The configured left extension limit.
    pub fn left_limit(&self) -> usize {
        self.left_limit
    }

    /// Enumerates every word playable through `anchor` with tiles from `rack`.
    ///
    /// Words starting on the anchor are found first; then each rack letter is
    /// tried on a new square immediately left of the anchor, with up to
    /// [`left_limit`](Self::left_limit) more tiles before it.
    pub fn generate(&self, anchor: Square<'_>, rack: &Rack) -> Plays {
        let root = self.dawg.root();
        let mut search = Search {
            scores: self.scores,
            plays: Plays::default(),
        };

        search.extend_right(root, Some(anchor), rack, "");
        for letter in rack.distinct() {
            let Some(rest) = rack.without(letter) else {
                continue;
            };
            let lead_in = anchor.with_tile_before(letter);
            search.left_part(root, lead_in.square(0), &rest, "", self.left_limit);
        }

        debug!(
            "anchor {} rack {}: {} plays, {} scoring errors",
            anchor.index(),
            rack,
            search.plays.len(),
            search.plays.errors.len()
        );
        search.plays
    }
}

struct Search<'a> {
    scores: &'a ScoreTable,
    plays: Plays,
}

impl Search<'_> {
    fn extend_right(
        &mut self,
        node: NodeRef<'_, char>,
        square: Option<Square<'_>>,
        rack: &Rack,
        word: &str,
    ) {
        if let Some((square, letter)) = square.and_then(|sq| sq.letter().map(|ch| (sq, ch))) {
            // A fixed tile either continues the word or ends this branch.
            if let Some(next) = node.get(letter) {
                self.extend_right(next, square.right(), rack, &format!("{word}{letter}"));
            }
            return;
        }

        if node.is_word() {
            self.record(word);
        }
        // Past the end of the row nothing more can be placed.
        let Some(square) = square else {
            return;
        };
        for letter in rack.distinct() {
            let (Some(next), Some(rest)) = (node.get(letter), rack.without(letter)) else {
                continue;
            };
            self.extend_right(next, square.right(), &rest, &format!("{word}{letter}"));
        }
    }

    fn left_part(
        &mut self,
        node: NodeRef<'_, char>,
        anchor: Square<'_>,
        rack: &Rack,
        word: &str,
        limit: usize,
    ) {
        self.extend_right(node, Some(anchor), rack, word);
        if limit == 0 {
            return;
        }
        for letter in rack.distinct() {
            let (Some(next), Some(rest)) = (node.get(letter), rack.without(letter)) else {
                continue;
            };
            self.left_part(next, anchor, &rest, &format!("{word}{letter}"), limit - 1);
        }
    }

    fn record(&mut self, word: &str) {
        match self.scores.score(word) {
            Ok(score) => {
                self.plays.words.insert(word.to_owned(), score);
            }
            Err(_) => {
                for letter in self.scores.missing_letters(word) {
                    let reported = self.plays.errors.iter().any(
                        |e| matches!(e, ScoreError::MissingScoreEntry { letter: l, .. } if *l == letter),
                    );
                    if reported {
                        continue;
                    }
                    let err = ScoreError::MissingScoreEntry {
                        letter,
                        word: word.to_owned(),
                    };
                    warn!("{err}");
                    self.plays.errors.push(err);
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dawg::build_dawg;
    use crate::game::{Language, Row};

    fn english() -> ScoreTable {
        Language::English.point_values()
    }

    fn words(plays: &Plays) -> Vec<&str> {
        let mut words: Vec<_> = plays.iter().map(|(w, _)| w).collect();
        words.sort_unstable();
        words
    }

    #[test]
    fn words_starting_on_the_anchor() {
        let dawg = build_dawg(["HE", "HES", "HET", "THE"]).unwrap();
        let scores = english();
        let row: Row = "H.....".parse().unwrap();
        let rack: Rack = "ESTO".parse().unwrap();
        let plays = MoveGenerator::new(&dawg, &scores).generate(row.square(0), &rack);
        assert_eq!(words(&plays), ["HE", "HES", "HET", "THE"]);
        assert_eq!(plays.get("HE"), Some(5));
        assert!(plays.errors().is_empty());
    }

    #[test]
    fn fixed_letters_right_of_the_anchor_are_used() {
        let dawg = build_dawg(["CAT", "CATS", "COT"]).unwrap();
        let scores = english();
        let row: Row = ".AT..".parse().unwrap();
        let rack: Rack = "CS".parse().unwrap();
        let plays = MoveGenerator::new(&dawg, &scores).generate(row.square(0), &rack);
        assert_eq!(words(&plays), ["CAT", "CATS"]);
        assert_eq!(plays.get("CATS"), Some(6));
    }

    #[test]
    fn word_must_not_end_against_a_fixed_tile() {
        let dawg = build_dawg(["HE", "HEX"]).unwrap();
        let scores = english();
        let row: Row = "H.X".parse().unwrap();
        let rack: Rack = "E".parse().unwrap();
        let plays = MoveGenerator::new(&dawg, &scores).generate(row.square(0), &rack);
        assert_eq!(words(&plays), ["HEX"]);
    }

    #[test]
    fn word_may_end_at_the_row_edge() {
        let dawg = build_dawg(["HE"]).unwrap();
        let scores = english();
        let row: Row = "H.".parse().unwrap();
        let rack: Rack = "E".parse().unwrap();
        let plays = MoveGenerator::new(&dawg, &scores).generate(row.square(0), &rack);
        assert_eq!(words(&plays), ["HE"]);
    }

    #[test]
    fn prefixes_left_of_the_anchor() {
        let dawg = build_dawg(["ASH", "HA", "RASH", "SH"]).unwrap();
        let scores = english();
        let row: Row = "H..".parse().unwrap();
        let rack: Rack = "ARS".parse().unwrap();
        let plays = MoveGenerator::new(&dawg, &scores).generate(row.square(0), &rack);
        assert_eq!(words(&plays), ["ASH", "HA", "RASH", "SH"]);
    }

    #[test]
    fn left_limit_bounds_the_prefix() {
        let dawg = build_dawg(["ASH", "RASH", "SH"]).unwrap();
        let scores = english();
        let row: Row = "H".parse().unwrap();
        let rack: Rack = "ARS".parse().unwrap();

        let plays = MoveGenerator::new(&dawg, &scores)
            .with_left_limit(0)
            .generate(row.square(0), &rack);
        assert_eq!(words(&plays), ["SH"]);

        let plays = MoveGenerator::new(&dawg, &scores)
            .with_left_limit(1)
            .generate(row.square(0), &rack);
        assert_eq!(words(&plays), ["ASH", "SH"]);
    }

    #[test]
    fn duplicate_rack_letters_are_each_usable() {
        let dawg = build_dawg(["EEF", "FE", "FEE", "FEEE"]).unwrap();
        let scores = english();
        let row: Row = "F....".parse().unwrap();
        let rack: Rack = "EE".parse().unwrap();
        let plays = MoveGenerator::new(&dawg, &scores).generate(row.square(0), &rack);
        // FEEE would need a third E.
        assert_eq!(words(&plays), ["EEF", "FE", "FEE"]);
    }

    #[test]
    fn missing_score_entries_are_reported_once() {
        let dawg = build_dawg(["HE", "HEX", "HEXA"]).unwrap();
        let scores: ScoreTable = [('H', 4), ('E', 1), ('A', 1)].into_iter().collect();
        let row: Row = "H....".parse().unwrap();
        let rack: Rack = "EXA".parse().unwrap();
        let plays = MoveGenerator::new(&dawg, &scores).generate(row.square(0), &rack);
        assert_eq!(words(&plays), ["HE"]);
        assert_eq!(plays.errors().len(), 1);
        assert!(matches!(
            plays.errors()[0],
            ScoreError::MissingScoreEntry { letter: 'X', .. }
        ));
    }

    #[test]
    fn each_missing_letter_of_a_word_is_reported() {
        let dawg = build_dawg(["HQX"]).unwrap();
        let scores: ScoreTable = [('H', 4)].into_iter().collect();
        let row: Row = "H..".parse().unwrap();
        let rack: Rack = "QX".parse().unwrap();
        let plays = MoveGenerator::new(&dawg, &scores).generate(row.square(0), &rack);
        assert!(plays.is_empty());
        let letters: Vec<char> = plays
            .errors()
            .iter()
            .map(|ScoreError::MissingScoreEntry { letter, .. }| *letter)
            .collect();
        assert_eq!(letters, ['Q', 'X']);
    }

    #[test]
    fn ranked_breaks_ties_alphabetically() {
        let dawg = build_dawg(["AB", "BA", "BAA"]).unwrap();
        let scores = english();
        let row: Row = "B..".parse().unwrap();
        let rack: Rack = "AA".parse().unwrap();
        let plays = MoveGenerator::new(&dawg, &scores).generate(row.square(0), &rack);
        assert_eq!(plays.ranked(), vec![("BAA", 5), ("AB", 4), ("BA", 4)]);
    }
}
