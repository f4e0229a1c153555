use std::fmt;

use serde::{Deserialize, Serialize};

use crate::square::Square;

/// The six chess piece types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    /// Advances one rank, or two from its starting square; captures diagonally.
    Pawn,
    /// Jumps in an L shape.
    Knight,
    /// Slides diagonally.
    Bishop,
    /// Slides along ranks and files.
    Rook,
    /// Slides like a bishop or a rook.
    Queen,
    /// Steps one square; its capture ends the match.
    King,
}

impl PieceKind {
    /// The lowercase letter used in console input and board printouts.
    pub fn letter(self) -> char {
        match self {
            Self::Pawn => 'p',
            Self::Knight => 'n',
            Self::Bishop => 'b',
            Self::Rook => 'r',
            Self::Queen => 'q',
            Self::King => 'k',
        }
    }

    /// Look up a piece type by its single-letter name.
    pub fn from_letter(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "p" => Some(Self::Pawn),
            "n" => Some(Self::Knight),
            "b" => Some(Self::Bishop),
            "r" => Some(Self::Rook),
            "q" => Some(Self::Queen),
            "k" => Some(Self::King),
            _ => None,
        }
    }

    /// Whether a pawn may become this piece.
    pub fn is_promotion_target(self) -> bool {
        matches!(self, Self::Knight | Self::Bishop | Self::Rook | Self::Queen)
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pawn => "pawn",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Rook => "rook",
            Self::Queen => "queen",
            Self::King => "king",
        };
        f.write_str(name)
    }
}

/// One of the two sides. Player one starts on ranks 1 and 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    /// Moves first, toward rank 8.
    One,
    /// Moves second, toward rank 1.
    Two,
}

impl Player {
    /// Zero-based index, 0 for player one.
    pub fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }

    /// The other side.
    pub fn opponent(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }

    /// Rank direction pawns advance in.
    pub fn forward(self) -> i32 {
        match self {
            Self::One => 1,
            Self::Two => -1,
        }
    }

    /// The rank holding this player's king and rooks at the start.
    pub fn back_rank(self) -> i32 {
        match self {
            Self::One => 0,
            Self::Two => 7,
        }
    }

    /// The rank on which this player's pawns promote.
    pub fn promotion_rank(self) -> i32 {
        self.opponent().back_rank()
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One => f.write_str("Player 1"),
            Self::Two => f.write_str("Player 2"),
        }
    }
}

/// Sentinel for a piece that has never moved.
pub const NEVER_MOVED: i32 = -1;

/// A piece on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    /// What the piece is.
    pub kind: PieceKind,
    /// Who owns it.
    pub owner: Player,
    /// Where it stands now.
    pub square: Square,
    /// Where it stood before its last move.
    pub previous_square: Square,
    /// Match turn of its last move, or [`NEVER_MOVED`].
    pub last_moved_turn: i32,
}

impl Piece {
    /// A piece that has not moved yet.
    pub fn new(kind: PieceKind, owner: Player, square: Square) -> Self {
        Self {
            kind,
            owner,
            square,
            previous_square: square,
            last_moved_turn: NEVER_MOVED,
        }
    }

    /// Whether the piece has moved at least once this match.
    pub fn has_moved(&self) -> bool {
        self.last_moved_turn != NEVER_MOVED
    }

    /// Board printout glyph: uppercase for player one.
    pub fn glyph(&self) -> char {
        match self.owner {
            Player::One => self.kind.letter().to_ascii_uppercase(),
            Player::Two => self.kind.letter(),
        }
    }

    /// Whether the last move of this piece was a two-rank advance.
    pub fn just_double_stepped(&self) -> bool {
        self.kind == PieceKind::Pawn && (self.square.rank() - self.previous_square.rank()).abs() == 2
    }

    /// Move the piece, remembering where it came from.
    pub(crate) fn occupy(&mut self, destination: Square, turn: i32) {
        self.previous_square = self.square;
        self.square = destination;
        self.last_moved_turn = turn;
    }
}
