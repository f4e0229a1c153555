//! Error types for the chess engine.
//!
//! Only malformed input is an error. Illegal moves are ordinary results,
//! see [`crate::rules::IllegalMove`].

/// Errors raised while parsing console input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChessError {
    /// A square was not written as exactly one file letter and one rank digit.
    #[error("invalid square '{0}': must be two characters, a file letter and a rank digit")]
    InvalidSquare(String),

    /// A square's file or rank fell outside the board.
    #[error("square '{0}' is out of bounds: files range from a to h, ranks from 1 to 8")]
    OutOfBounds(String),

    /// A required command argument was not supplied.
    #[error("missing '{0}' square in move command")]
    MissingArgument(&'static str),

    /// A command contained a token that could not be interpreted.
    #[error("unexpected token '{0}' in move command")]
    UnexpectedToken(String),
}

/// Convenience result type for chess operations.
pub type ChessResult<T> = Result<T, ChessError>;
