use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ChessError, ChessResult};

/// Width and height of the board.
pub const BOARD_SIZE: i32 = 8;

/// A square on the board, guaranteed to be in range.
///
/// `file` is the x coordinate (a..h = 0..7), `rank` the y coordinate
/// (1..8 = 0..7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawSquare")]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    /// Build a square from board coordinates, or `None` if off the board.
    pub fn new(file: i32, rank: i32) -> Option<Self> {
        if (0..BOARD_SIZE).contains(&file) && (0..BOARD_SIZE).contains(&rank) {
            Some(Self {
                file: file as u8,
                rank: rank as u8,
            })
        } else {
            None
        }
    }

    /// The x coordinate, 0..=7.
    pub fn file(self) -> i32 {
        i32::from(self.file)
    }

    /// The y coordinate, 0..=7.
    pub fn rank(self) -> i32 {
        i32::from(self.rank)
    }

    /// The square displaced by `(dx, dy)`, if still on the board.
    pub fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        Self::new(self.file() + dx, self.rank() + dy)
    }

    /// The up to eight squares surrounding this one.
    pub fn neighbors(self) -> impl Iterator<Item = Square> {
        (-1..=1)
            .flat_map(|dy| (-1..=1).map(move |dx| (dx, dy)))
            .filter(|&(dx, dy)| dx != 0 || dy != 0)
            .filter_map(move |(dx, dy)| self.offset(dx, dy))
    }

    /// Every square on the board, rank by rank.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..BOARD_SIZE).flat_map(|rank| (0..BOARD_SIZE).filter_map(move |file| Square::new(file, rank)))
    }

    /// Parse algebraic notation such as `e4` (case-insensitive).
    pub fn parse(text: &str) -> ChessResult<Self> {
        let trimmed = text.trim();
        let chars: Vec<char> = trimmed.chars().collect();
        if chars.len() != 2 {
            return Err(ChessError::InvalidSquare(trimmed.to_string()));
        }
        let letter = chars[0].to_ascii_lowercase();
        if !letter.is_ascii_alphabetic() || !chars[1].is_ascii_digit() {
            return Err(ChessError::InvalidSquare(trimmed.to_string()));
        }
        let file = letter as i32 - 'a' as i32;
        let rank = chars[1] as i32 - '1' as i32;
        Self::new(file, rank).ok_or_else(|| ChessError::OutOfBounds(trimmed.to_string()))
    }
}

/// Unchecked coordinates as they appear in serialized data.
#[derive(Deserialize)]
struct RawSquare {
    file: i32,
    rank: i32,
}

impl TryFrom<RawSquare> for Square {
    type Error = ChessError;

    fn try_from(raw: RawSquare) -> Result<Self, Self::Error> {
        Self::new(raw.file, raw.rank)
            .ok_or_else(|| ChessError::OutOfBounds(format!("({}, {})", raw.file, raw.rank)))
    }
}

impl FromStr for Square {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file) as char, self.rank + 1)
    }
}
