use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;

use super::row::{tile_letter, ParseError};

/// The multiset of tiles a player can place.
///
/// Order is irrelevant and duplicates are kept. The move generator never
/// mutates a rack; [`without`](Rack::without) hands each branch its own copy.
///
/// ```
/// use lexdawg::game::Rack;
///
/// let rack: Rack = "ESTE".parse().unwrap();
/// let rest = rack.without('E').unwrap();
/// assert_eq!(rest.count('E'), 1);
/// assert_eq!(rack.count('E'), 2);
/// assert!(rest.without('Z').is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Rack {
    tiles: SmallVec<[char; 8]>,
}

impl Rack {
    /// An empty rack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// True if no tiles are left.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Iterates over all tiles, duplicates included.
    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.tiles.iter().copied()
    }

    /// Iterates over each distinct letter once, in first-occurrence order.
    pub fn distinct(&self) -> impl Iterator<Item = char> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .filter(|&(i, ch)| !self.tiles[..i].contains(ch))
            .map(|(_, &ch)| ch)
    }

    /// How many tiles show `letter`.
    pub fn count(&self, letter: char) -> usize {
        self.tiles.iter().filter(|&&ch| ch == letter).count()
    }

    /// Returns a copy with one `letter` tile removed, or None if there is none.
    pub fn without(&self, letter: char) -> Option<Rack> {
        let pos = self.tiles.iter().position(|&ch| ch == letter)?;
        let mut rest = self.clone();
        rest.tiles.remove(pos);
        Some(rest)
    }

    /// Adds a tile.
    pub fn push(&mut self, letter: char) {
        self.tiles.push(letter);
    }
}

impl FromIterator<char> for Rack {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        Rack {
            tiles: iter.into_iter().collect(),
        }
    }
}

// Multiset equality: tile order does not matter.
impl PartialEq for Rack {
    fn eq(&self, rhs: &Self) -> bool {
        let mut a = self.tiles.clone();
        let mut b = rhs.tiles.clone();
        a.sort_unstable();
        b.sort_unstable();
        a == b
    }
}

impl Eq for Rack {}

impl FromStr for Rack {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .filter(|ch| !ch.is_whitespace())
            .map(|ch| tile_letter(ch).ok_or(ParseError::InvalidTile { ch }))
            .collect()
    }
}

impl fmt::Display for Rack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.tiles.iter().try_for_each(|ch| write!(f, "{ch}"))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_uppercases_and_skips_spaces() {
        let rack: Rack = "e s t o".parse().unwrap();
        assert_eq!(rack.to_string(), "ESTO");
        assert_eq!(rack.len(), 4);
    }

    #[test]
    fn parse_rejects_non_letters() {
        assert_eq!(
            "AB?".parse::<Rack>(),
            Err(ParseError::InvalidTile { ch: '?' })
        );
    }

    #[test]
    fn without_removes_one_occurrence() {
        let rack: Rack = "AABA".parse().unwrap();
        let rest = rack.without('A').unwrap();
        assert_eq!(rest.count('A'), 2);
        assert_eq!(rest.len(), 3);
        assert_eq!(rack.len(), 4);
    }

    #[test]
    fn without_missing_letter() {
        assert_eq!(Rack::new().without('A'), None);
    }

    #[test]
    fn distinct_letters_keep_first_occurrence_order() {
        let rack: Rack = "TATTE".parse().unwrap();
        assert_eq!(rack.distinct().collect::<String>(), "TAE");
        assert_eq!(rack.iter().count(), 5);
    }

    #[test]
    fn equality_ignores_order() {
        let a: Rack = "EST".parse().unwrap();
        let b: Rack = "TSE".parse().unwrap();
        let c: Rack = "TSS".parse().unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
