//! Chess rules engine for Twinforge.
//!
//! Validates and applies moves for all six piece types, including
//! castling, en passant, and promotion, and sequences turns for a
//! two-player match. The engine has no rendering dependency; the board
//! can print itself as plain text for consoles and logs.

/// The 8x8 board and its direct coordinate lookup.
pub mod board;
/// Console move commands.
pub mod command;
/// Error types for malformed input.
pub mod error;
/// Match state machine and move history.
pub mod game;
/// Piece types, players, and per-piece move history.
pub mod piece;
/// Move legality, validation, and application.
pub mod rules;
/// Board coordinates and algebraic notation.
pub mod square;

/// Re-export of [`board::Board`].
pub use board::Board;
/// Re-export of [`command::MoveCommand`].
pub use command::MoveCommand;
/// Re-exports of [`error::ChessError`] and [`error::ChessResult`].
pub use error::{ChessError, ChessResult};
/// Re-exports of [`game::ChessMatch`], [`game::MatchState`], and [`game::MoveRecord`].
pub use game::{ChessMatch, MatchState, MoveRecord};
/// Re-exports of [`piece::Piece`], [`piece::PieceKind`], and [`piece::Player`].
pub use piece::{Piece, PieceKind, Player};
/// Re-exports of the rules engine entry points.
pub use rules::{IllegalMove, MoveResult, RulesConfig, attempt_move, is_knight_jump};
/// Re-export of [`square::Square`].
pub use square::Square;
