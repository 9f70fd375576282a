use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors from parsing rows and racks in text notation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A row character that is neither a letter nor an empty-square marker.
    #[error("invalid square {ch:?} at position {index}")]
    InvalidSquare {
        /// Position in the row.
        index: usize,
        /// The offending character.
        ch: char,
    },
    /// A rack character that is not a letter.
    #[error("invalid tile {ch:?}")]
    InvalidTile {
        /// The offending character.
        ch: char,
    },
}

/// Normalizes a tile letter to its single-character uppercase form.
pub(crate) fn tile_letter(ch: char) -> Option<char> {
    if !ch.is_alphabetic() {
        return None;
    }
    let mut upper = ch.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(letter), None) => Some(letter),
        _ => None,
    }
}

/// One line of board squares, each empty or holding a fixed letter.
///
/// Text notation uses one character per square: a letter for a fixed tile and
/// `.`, `_` or a space for an empty square.
///
/// ```
/// use lexdawg::game::Row;
///
/// let row: Row = "..CAT..".parse().unwrap();
/// let c = row.square(2);
/// assert_eq!(c.letter(), Some('C'));
/// assert_eq!(c.left().unwrap().letter(), None);
/// assert_eq!(c.right().unwrap().letter(), Some('A'));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Row {
    squares: Vec<Option<char>>,
}

impl Row {
    /// A row of `len` empty squares.
    pub fn empty(len: usize) -> Self {
        Row {
            squares: vec![None; len],
        }
    }

    /// Number of squares.
    pub fn len(&self) -> usize {
        self.squares.len()
    }

    /// True if the row has no squares at all.
    pub fn is_empty(&self) -> bool {
        self.squares.is_empty()
    }

    /// Returns the square at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn square(&self, index: usize) -> Square<'_> {
        assert!(index < self.len(), "square {index} out of bounds");
        Square { row: self, index }
    }

    /// Returns the square at `index`, or None past either end.
    pub fn get(&self, index: usize) -> Option<Square<'_>> {
        (index < self.len()).then_some(Square { row: self, index })
    }

    /// Iterates over the squares from left to right.
    pub fn squares(&self) -> impl Iterator<Item = Square<'_>> {
        (0..self.len()).map(move |index| Square { row: self, index })
    }

    /// Places a fixed tile on the square at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn place(&mut self, index: usize, letter: char) {
        assert!(index < self.len(), "square {index} out of bounds");
        self.squares[index] = Some(letter);
    }

    /// Empties the square at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn clear(&mut self, index: usize) {
        assert!(index < self.len(), "square {index} out of bounds");
        self.squares[index] = None;
    }
}

impl FromStr for Row {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let squares = s
            .chars()
            .enumerate()
            .map(|(index, ch)| match ch {
                '.' | '_' | ' ' => Ok(None),
                _ => tile_letter(ch)
                    .map(Some)
                    .ok_or(ParseError::InvalidSquare { index, ch }),
            })
            .collect::<Result<_, _>>()?;
        Ok(Row { squares })
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.squares
            .iter()
            .try_for_each(|sq| write!(f, "{}", sq.unwrap_or('.')))
    }
}

/// A square of a [`Row`], with access to its neighbours.
///
/// Neighbours are derived from the position in the row, so links are always
/// mutually consistent and never wrap around.
#[derive(Clone, Copy)]
pub struct Square<'r> {
    row: &'r Row,
    index: usize,
}

impl<'r> Square<'r> {
    /// Position of this square in its row.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The fixed letter on this square, if any.
    pub fn letter(&self) -> Option<char> {
        self.row.squares[self.index]
    }

    /// True if no tile is on this square.
    pub fn is_empty(&self) -> bool {
        self.letter().is_none()
    }

    /// The square to the left, or None at the start of the row.
    pub fn left(&self) -> Option<Square<'r>> {
        self.index.checked_sub(1).and_then(|i| self.row.get(i))
    }

    /// The square to the right, or None at the end of the row.
    pub fn right(&self) -> Option<Square<'r>> {
        self.row.get(self.index + 1)
    }

    /// Builds the row that starts with a new square holding `letter`, followed
    /// by this square and everything to its right.
    ///
    /// The move generator uses this to try a rack tile immediately left of an
    /// anchor.
    pub fn with_tile_before(&self, letter: char) -> Row {
        let mut squares = Vec::with_capacity(self.row.len() - self.index + 1);
        squares.push(Some(letter));
        squares.extend_from_slice(&self.row.squares[self.index..]);
        Row { squares }
    }
}

impl PartialEq for Square<'_> {
    fn eq(&self, rhs: &Self) -> bool {
        std::ptr::eq(self.row, rhs.row) && self.index == rhs.index
    }
}

impl Eq for Square<'_> {}

impl fmt::Debug for Square<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Square")
            .field("index", &self.index)
            .field("letter", &self.letter())
            .finish()
    }
}
