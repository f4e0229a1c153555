use std::fmt;

use tracing::info;

use crate::board::Board;
use crate::command::MoveCommand;
use crate::error::ChessResult;
use crate::piece::{PieceKind, Player};
use crate::rules::{self, IllegalMove, MoveResult, RulesConfig};
use crate::square::Square;

/// Where a match stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchState {
    /// Player one to move.
    Player1Turn,
    /// Player two to move.
    Player2Turn,
    /// Player one captured the enemy king.
    Player1Wins,
    /// Player two captured the enemy king.
    Player2Wins,
}

impl MatchState {
    /// The player to move, or `None` once the match is over.
    pub fn current_player(self) -> Option<Player> {
        match self {
            Self::Player1Turn => Some(Player::One),
            Self::Player2Turn => Some(Player::Two),
            Self::Player1Wins | Self::Player2Wins => None,
        }
    }

    /// The winning player once the match has concluded.
    pub fn winner(self) -> Option<Player> {
        match self {
            Self::Player1Wins => Some(Player::One),
            Self::Player2Wins => Some(Player::Two),
            Self::Player1Turn | Self::Player2Turn => None,
        }
    }

    /// Whether a king has been captured.
    pub fn is_over(self) -> bool {
        self.winner().is_some()
    }

    fn turn_of(player: Player) -> Self {
        match player {
            Player::One => Self::Player1Turn,
            Player::Two => Self::Player2Turn,
        }
    }

    fn won_by(player: Player) -> Self {
        match player {
            Player::One => Self::Player1Wins,
            Player::Two => Self::Player2Wins,
        }
    }
}

impl fmt::Display for MatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.current_player(), self.winner()) {
            (Some(p), _) => write!(f, "{p} to move"),
            (_, Some(p)) => write!(f, "{p} wins"),
            _ => Ok(()),
        }
    }
}

/// A move that was applied during the match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    /// Match turn the move was made on.
    pub turn: i32,
    /// Who moved.
    pub player: Player,
    /// Type of the moving piece before any promotion.
    pub kind: PieceKind,
    /// Source square.
    pub from: Square,
    /// Destination square.
    pub to: Square,
    /// Flags reported for the move.
    pub result: MoveResult,
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {} {} {}-{}", self.turn, self.player, self.kind, self.from, self.to)?;
        if self.result.is_castle {
            f.write_str(" (castle)")?;
        }
        if self.result.is_en_passant {
            f.write_str(" (en passant)")?;
        } else if self.result.is_capture {
            f.write_str(" (capture)")?;
        }
        if let Some(kind) = self.result.promotion {
            write!(f, " (promotes to {kind})")?;
        }
        Ok(())
    }
}

/// A two-player match: board, turn sequencing, and history.
///
/// The turn number starts at 1 and increases each time player two
/// completes a move. Capturing a king ends the match immediately.
#[derive(Debug, Clone)]
pub struct ChessMatch {
    board: Board,
    state: MatchState,
    turn: i32,
    config: RulesConfig,
    history: Vec<MoveRecord>,
}

impl Default for ChessMatch {
    fn default() -> Self {
        Self::new(RulesConfig::default())
    }
}

impl ChessMatch {
    /// Start a match from the standard position.
    pub fn new(config: RulesConfig) -> Self {
        Self::with_board(Board::standard(), config)
    }

    /// Start a match from a custom position with player one to move.
    pub fn with_board(board: Board, config: RulesConfig) -> Self {
        Self {
            board,
            state: MatchState::Player1Turn,
            turn: 1,
            config,
            history: Vec::new(),
        }
    }

    /// The current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Whose turn it is, or who won.
    pub fn state(&self) -> MatchState {
        self.state
    }

    /// The current turn number, starting at 1.
    pub fn turn_number(&self) -> i32 {
        self.turn
    }

    /// The rules in force for this match.
    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    /// Switch rule settings mid-match, as the console cheats do.
    pub fn config_mut(&mut self) -> &mut RulesConfig {
        &mut self.config
    }

    /// Moves applied so far, oldest first.
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    /// Attempt a move for whoever is to move.
    pub fn attempt_move(&mut self, from: Square, to: Square, promotion: Option<PieceKind>) -> MoveResult {
        let Some(player) = self.state.current_player() else {
            return MoveResult::rejected(IllegalMove::MatchConcluded);
        };
        let kind = self.board.piece_at(from).map(|p| p.kind);

        let result = rules::attempt_move(&mut self.board, from, to, player, promotion, self.turn, &self.config);
        if !result.valid {
            return result;
        }

        if let Some(kind) = kind {
            self.history.push(MoveRecord {
                turn: self.turn,
                player,
                kind,
                from,
                to,
                result: result.clone(),
            });
        }

        if result.is_king_captured {
            self.state = MatchState::won_by(player);
            info!(winner = %player, turn = self.turn, "king captured, match over");
        } else {
            self.switch_turns(player);
        }
        result
    }

    /// Play a parsed console command.
    ///
    /// An unrecognized promotion letter is an illegal move, not malformed input.
    pub fn play(&mut self, command: &MoveCommand) -> MoveResult {
        let promotion = match command.promotion.as_deref() {
            None => None,
            Some(letter) => match PieceKind::from_letter(letter) {
                Some(kind) => Some(kind),
                // A finished match reports that first.
                None if self.state.is_over() => None,
                None => return MoveResult::rejected(IllegalMove::InvalidPromotion(letter.to_string())),
            },
        };
        self.attempt_move(command.from, command.to, promotion)
    }

    /// Parse and play a console line.
    pub fn play_str(&mut self, line: &str) -> ChessResult<MoveResult> {
        let command = MoveCommand::parse(line)?;
        Ok(self.play(&command))
    }

    fn switch_turns(&mut self, mover: Player) {
        if mover == Player::Two {
            self.turn += 1;
        }
        self.state = MatchState::turn_of(mover.opponent());
    }
}
