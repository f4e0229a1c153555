use std::fmt;
use std::str::FromStr;

use crate::error::{ChessError, ChessResult};
use crate::square::Square;

/// A move typed at the console: a from/to pair plus an optional
/// promotion letter.
///
/// Accepts `e7 e8 q` as well as `from=e7 to=e8 promoteTo=q`, optionally
/// prefixed with `ChessMove`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveCommand {
    /// Source square.
    pub from: Square,
    /// Destination square.
    pub to: Square,
    /// Raw promotion letter, checked by the rules engine.
    pub promotion: Option<String>,
}

impl MoveCommand {
    /// Build a command from already-parsed squares.
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    /// Attach a promotion letter such as `q`.
    pub fn with_promotion(mut self, letter: impl Into<String>) -> Self {
        self.promotion = Some(letter.into());
        self
    }

    /// Parse a console line.
    pub fn parse(line: &str) -> ChessResult<Self> {
        let mut from = None;
        let mut to = None;
        let mut promotion = None;
        let mut positional = 0;

        for token in line.split_whitespace() {
            if token.eq_ignore_ascii_case("chessmove") {
                continue;
            }
            if let Some((key, value)) = token.split_once('=') {
                match key.to_ascii_lowercase().as_str() {
                    "from" => from = Some(Square::parse(value)?),
                    "to" => to = Some(Square::parse(value)?),
                    "promoteto" | "promote" => promotion = Some(value.to_string()),
                    _ => return Err(ChessError::UnexpectedToken(token.to_string())),
                }
                continue;
            }
            match positional {
                0 => from = Some(Square::parse(token)?),
                1 => to = Some(Square::parse(token)?),
                2 => promotion = Some(token.to_string()),
                _ => return Err(ChessError::UnexpectedToken(token.to_string())),
            }
            positional += 1;
        }

        Ok(Self {
            from: from.ok_or(ChessError::MissingArgument("from"))?,
            to: to.ok_or(ChessError::MissingArgument("to"))?,
            promotion,
        })
    }
}

impl FromStr for MoveCommand {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for MoveCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.from, self.to)?;
        if let Some(p) = &self.promotion {
            write!(f, " {p}")?;
        }
        Ok(())
    }
}
