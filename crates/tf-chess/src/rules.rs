//! Move legality and application.
//!
//! Every move is fully validated into a [`MovePlan`] before the board is
//! touched, so a rejected move never leaves partial state behind.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::Board;
use crate::piece::{PieceKind, Player};
use crate::square::Square;

/// Rule switches for a match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Require the square a pawn skips over on its two-rank advance to be
    /// empty. Off by default, matching the classic console game.
    pub require_clear_double_step: bool,
    /// Let any owned piece jump to any square not held by a friendly piece.
    pub allow_teleport: bool,
}

impl RulesConfig {
    /// Require the skipped square of a pawn's double step to be empty.
    pub fn with_clear_double_step(mut self, required: bool) -> Self {
        self.require_clear_double_step = required;
        self
    }

    /// Enable or disable the teleport cheat.
    pub fn with_teleport(mut self, allowed: bool) -> Self {
        self.allow_teleport = allowed;
        self
    }
}

/// Why a move was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IllegalMove {
    /// The match has already been won.
    #[error("the match is already over")]
    MatchConcluded,

    /// The source square is empty.
    #[error("no piece found on {0}")]
    NoPiece(Square),

    /// The source piece belongs to the other player.
    #[error("the piece on {square} belongs to {owner}")]
    NotYourPiece {
        /// The square that was selected.
        square: Square,
        /// Who actually owns the piece there.
        owner: Player,
    },

    /// The destination holds one of the mover's own pieces.
    #[error("{0} is occupied by one of your own pieces")]
    FriendlyCollision(Square),

    /// The piece type cannot make this displacement.
    #[error("a {kind} cannot move from {from} to {to}")]
    InvalidPattern {
        /// The type of the moving piece.
        kind: PieceKind,
        /// Source square.
        from: Square,
        /// Destination square.
        to: Square,
    },

    /// A sliding move or castle crosses an occupied square.
    #[error("the path from {from} to {to} is blocked")]
    PathBlocked {
        /// Source square.
        from: Square,
        /// Destination square.
        to: Square,
    },

    /// The king would stand next to the enemy king.
    #[error("kings may not stand next to each other at {0}")]
    KingsAdjacent(Square),

    /// Castling with a king that has already moved.
    #[error("cannot castle: the king has already moved")]
    KingHasMoved,

    /// Castling toward a corner with no unmoved rook.
    #[error("cannot castle: no unmoved rook on {0}")]
    NoCastlingRook(Square),

    /// A pawn tried to advance two ranks after its first move.
    #[error("a pawn may only advance two squares on its first move")]
    DoubleStepUsed,

    /// A pawn tried to move straight into an occupied square.
    #[error("pawns cannot capture straight ahead; {0} is occupied")]
    PawnBlocked(Square),

    /// A pawn moved diagonally without capturing.
    #[error("pawns move diagonally only to capture, and {0} is empty")]
    NothingToCapture(Square),

    /// A pawn reached the far rank without naming its promotion.
    #[error("a pawn reaching {0} must promote: choose q, n, b or r")]
    PromotionRequired(Square),

    /// The promotion choice was not a queen, knight, bishop, or rook.
    #[error("cannot promote to '{0}': choose q, n, b or r")]
    InvalidPromotion(String),
}

/// Outcome of a move attempt.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MoveResult {
    /// Whether the move was legal and applied.
    pub valid: bool,
    /// An enemy piece was removed.
    pub is_capture: bool,
    /// The removed piece was the enemy king.
    pub is_king_captured: bool,
    /// The type a pawn was promoted to.
    pub promotion: Option<PieceKind>,
    /// The move was a castle.
    pub is_castle: bool,
    /// The capture was en passant.
    pub is_en_passant: bool,
    /// Why the move was rejected, when `valid` is false.
    pub rejection: Option<IllegalMove>,
}

impl MoveResult {
    /// A rejected move.
    pub fn rejected(reason: IllegalMove) -> Self {
        Self {
            rejection: Some(reason),
            ..Self::default()
        }
    }

    /// Human-readable rejection reason.
    pub fn reason(&self) -> Option<String> {
        self.rejection.as_ref().map(ToString::to_string)
    }

    /// Whether a pawn was promoted by this move.
    pub fn is_promotion(&self) -> bool {
        self.promotion.is_some()
    }
}

/// A fully validated move, ready to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MovePlan {
    from: Square,
    to: Square,
    /// Square of the captured piece and its type. Differs from `to` for en passant.
    captured: Option<(Square, PieceKind)>,
    /// Rook relocation for a castle.
    rook: Option<(Square, Square)>,
    promotion: Option<PieceKind>,
    en_passant: bool,
}

impl MovePlan {
    fn simple(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            captured: None,
            rook: None,
            promotion: None,
            en_passant: false,
        }
    }
}

/// Validate and, if legal, apply a move.
///
/// `turn` is the match turn number recorded on the moved pieces.
/// Whether the match is still running is the caller's concern.
pub fn attempt_move(
    board: &mut Board,
    from: Square,
    to: Square,
    player: Player,
    promotion: Option<PieceKind>,
    turn: i32,
    config: &RulesConfig,
) -> MoveResult {
    match validate(board, from, to, player, promotion, config) {
        Ok(plan) => apply(board, &plan, turn),
        Err(reason) => {
            debug!(%from, %to, %player, %reason, "move rejected");
            MoveResult::rejected(reason)
        }
    }
}

/// Check a move without touching the board.
pub(crate) fn validate(
    board: &Board,
    from: Square,
    to: Square,
    player: Player,
    promotion: Option<PieceKind>,
    config: &RulesConfig,
) -> Result<MovePlan, IllegalMove> {
    let piece = board.piece_at(from).ok_or(IllegalMove::NoPiece(from))?;
    if piece.owner != player {
        return Err(IllegalMove::NotYourPiece {
            square: from,
            owner: piece.owner,
        });
    }

    let target = board.piece_at(to);
    if target.is_some_and(|t| t.owner == player) {
        return Err(IllegalMove::FriendlyCollision(to));
    }

    let mut plan = MovePlan::simple(from, to);
    plan.captured = target.map(|t| (to, t.kind));

    if config.allow_teleport {
        return Ok(plan);
    }

    let dx = to.file() - from.file();
    let dy = to.rank() - from.rank();
    let invalid = IllegalMove::InvalidPattern {
        kind: piece.kind,
        from,
        to,
    };

    match piece.kind {
        PieceKind::Knight => {
            if !is_knight_jump(dx, dy) {
                return Err(invalid);
            }
        }
        PieceKind::Bishop => {
            if dx.abs() != dy.abs() {
                return Err(invalid);
            }
            require_clear_path(board, from, to)?;
        }
        PieceKind::Rook => {
            if (dx == 0) == (dy == 0) {
                return Err(invalid);
            }
            require_clear_path(board, from, to)?;
        }
        PieceKind::Queen => {
            let diagonal = dx.abs() == dy.abs();
            let straight = (dx == 0) != (dy == 0);
            if !diagonal && !straight {
                return Err(invalid);
            }
            require_clear_path(board, from, to)?;
        }
        PieceKind::King => {
            if dx.abs() == 2 && dy == 0 {
                plan.rook = Some(validate_castle(board, from, to, player)?);
            } else if dx.abs() <= 1 && dy.abs() <= 1 {
                let enemy_king_adjacent = to.neighbors().any(|sq| {
                    board
                        .piece_at(sq)
                        .is_some_and(|p| p.kind == PieceKind::King && p.owner != player)
                });
                if enemy_king_adjacent {
                    return Err(IllegalMove::KingsAdjacent(to));
                }
            } else {
                return Err(invalid);
            }
        }
        PieceKind::Pawn => {
            validate_pawn(board, &mut plan, player, dx, dy, config, invalid)?;
            if to.rank() == player.promotion_rank() {
                plan.promotion = Some(match promotion {
                    Some(kind) if kind.is_promotion_target() => kind,
                    Some(kind) => return Err(IllegalMove::InvalidPromotion(kind.letter().to_string())),
                    None => return Err(IllegalMove::PromotionRequired(to)),
                });
            }
        }
    }

    Ok(plan)
}

/// A knight moves three squares in taxicab distance, at most two on either axis.
pub fn is_knight_jump(dx: i32, dy: i32) -> bool {
    dx.abs() <= 2 && dy.abs() <= 2 && dx.abs() + dy.abs() == 3
}

fn require_clear_path(board: &Board, from: Square, to: Square) -> Result<(), IllegalMove> {
    if board.is_path_clear(from, to) {
        Ok(())
    } else {
        Err(IllegalMove::PathBlocked { from, to })
    }
}

fn validate_castle(
    board: &Board,
    from: Square,
    to: Square,
    player: Player,
) -> Result<(Square, Square), IllegalMove> {
    let king = board.piece_at(from).ok_or(IllegalMove::NoPiece(from))?;
    if king.has_moved() {
        return Err(IllegalMove::KingHasMoved);
    }

    let kingside = to.file() > from.file();
    let corner_file = if kingside { 7 } else { 0 };
    let corner = Square::new(corner_file, from.rank()).ok_or(IllegalMove::InvalidPattern {
        kind: PieceKind::King,
        from,
        to,
    })?;
    let rook_ready = board
        .piece_at(corner)
        .is_some_and(|r| r.kind == PieceKind::Rook && r.owner == player && !r.has_moved());
    if !rook_ready {
        return Err(IllegalMove::NoCastlingRook(corner));
    }
    require_clear_path(board, from, corner)?;

    let rook_dx = if kingside { -1 } else { 1 };
    let rook_to = to.offset(rook_dx, 0).ok_or(IllegalMove::NoCastlingRook(corner))?;
    Ok((corner, rook_to))
}

fn validate_pawn(
    board: &Board,
    plan: &mut MovePlan,
    player: Player,
    dx: i32,
    dy: i32,
    config: &RulesConfig,
    invalid: IllegalMove,
) -> Result<(), IllegalMove> {
    let (from, to) = (plan.from, plan.to);
    let forward = player.forward();
    let pawn_moved = board.piece_at(from).is_some_and(|p| p.has_moved());

    if dx == 0 && dy == forward {
        if !board.is_empty(to) {
            return Err(IllegalMove::PawnBlocked(to));
        }
        return Ok(());
    }

    if dx == 0 && dy == 2 * forward {
        if pawn_moved {
            return Err(IllegalMove::DoubleStepUsed);
        }
        if !board.is_empty(to) {
            return Err(IllegalMove::PawnBlocked(to));
        }
        if config.require_clear_double_step && !board.is_path_clear(from, to) {
            return Err(IllegalMove::PathBlocked { from, to });
        }
        return Ok(());
    }

    if dx.abs() == 1 && dy == forward {
        if plan.captured.is_some() {
            return Ok(());
        }
        // En passant: the enemy pawn beside us just made its double step.
        let passed = Square::new(to.file(), from.rank()).ok_or(IllegalMove::NothingToCapture(to))?;
        let victim = board.piece_at(passed).filter(|p| {
            p.owner != player && p.just_double_stepped() && board.last_moved() == Some(passed)
        });
        return match victim {
            Some(v) => {
                plan.captured = Some((passed, v.kind));
                plan.en_passant = true;
                Ok(())
            }
            None => Err(IllegalMove::NothingToCapture(to)),
        };
    }

    Err(invalid)
}

/// Apply a validated plan.
pub(crate) fn apply(board: &mut Board, plan: &MovePlan, turn: i32) -> MoveResult {
    if let Some((square, _)) = plan.captured {
        board.remove(square);
    }
    board.relocate(plan.from, plan.to, turn);
    if let Some((rook_from, rook_to)) = plan.rook {
        board.relocate(rook_from, rook_to, turn);
    }
    if let Some(kind) = plan.promotion {
        board.set_kind(plan.to, kind);
    }

    let is_king_captured = plan
        .captured
        .is_some_and(|(_, kind)| kind == PieceKind::King);
    debug!(
        from = %plan.from,
        to = %plan.to,
        capture = plan.captured.is_some(),
        castle = plan.rook.is_some(),
        "move applied"
    );

    MoveResult {
        valid: true,
        is_capture: plan.captured.is_some(),
        is_king_captured,
        promotion: plan.promotion,
        is_castle: plan.rook.is_some(),
        is_en_passant: plan.en_passant,
        rejection: None,
    }
}
