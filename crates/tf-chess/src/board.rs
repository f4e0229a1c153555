use crate::piece::{Piece, PieceKind, Player};
use crate::square::{BOARD_SIZE, Square};

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// An 8x8 board indexed directly by coordinate.
///
/// Each square holds at most one piece. The board also remembers which
/// square received the most recent move, which en passant depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
    last_moved: Option<Square>,
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Board {
    /// A board with no pieces.
    pub fn empty() -> Self {
        Self {
            squares: Default::default(),
            last_moved: None,
        }
    }

    /// The standard starting position.
    pub fn standard() -> Self {
        let mut board = Self::empty();
        for player in [Player::One, Player::Two] {
            let back = player.back_rank();
            let pawns = back + player.forward();
            for (file, kind) in (0..BOARD_SIZE).zip(BACK_RANK) {
                if let Some(sq) = Square::new(file, back) {
                    board.place(kind, player, sq);
                }
                if let Some(sq) = Square::new(file, pawns) {
                    board.place(PieceKind::Pawn, player, sq);
                }
            }
        }
        board
    }

    /// Put a fresh, unmoved piece on a square, returning whatever stood there.
    pub fn place(&mut self, kind: PieceKind, owner: Player, square: Square) -> Option<Piece> {
        self.slot_mut(square).replace(Piece::new(kind, owner, square))
    }

    /// The piece standing on `square`, if any.
    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.slot(square).as_ref()
    }

    /// Whether no piece stands on `square`.
    pub fn is_empty(&self, square: Square) -> bool {
        self.slot(square).is_none()
    }

    /// The square the most recently moved piece landed on.
    pub fn last_moved(&self) -> Option<Square> {
        self.last_moved
    }

    /// All pieces, rank by rank from a1.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        Square::all().filter_map(|sq| self.piece_at(sq))
    }

    /// Number of pieces still on the board.
    pub fn piece_count(&self) -> usize {
        self.pieces().count()
    }

    /// Number of pieces a player still has.
    pub fn count_for(&self, owner: Player) -> usize {
        self.pieces().filter(|p| p.owner == owner).count()
    }

    /// The player's king, if it has not been captured.
    pub fn king(&self, owner: Player) -> Option<&Piece> {
        self.pieces()
            .find(|p| p.owner == owner && p.kind == PieceKind::King)
    }

    /// Whether every square strictly between `from` and `to` is empty.
    ///
    /// Only meaningful for squares on a shared rank, file, or diagonal;
    /// returns `false` otherwise.
    pub fn is_path_clear(&self, from: Square, to: Square) -> bool {
        let dx = to.file() - from.file();
        let dy = to.rank() - from.rank();
        if !(dx == 0 || dy == 0 || dx.abs() == dy.abs()) {
            return false;
        }
        let steps = dx.abs().max(dy.abs());
        let (sx, sy) = (dx.signum(), dy.signum());
        (1..steps)
            .filter_map(|i| from.offset(sx * i, sy * i))
            .all(|sq| self.is_empty(sq))
    }

    /// Render the board as the dev console prints it.
    pub fn render(&self) -> String {
        let mut lines = vec!["  ABCDEFGH".to_string(), " +--------+".to_string()];
        for rank in (0..BOARD_SIZE).rev() {
            let mut line = format!("{}|", rank + 1);
            for file in 0..BOARD_SIZE {
                let glyph = Square::new(file, rank)
                    .and_then(|sq| self.piece_at(sq))
                    .map_or('.', Piece::glyph);
                line.push(glyph);
            }
            line.push_str(&format!("|{}", rank + 1));
            lines.push(line);
        }
        lines.push(" +--------+".to_string());
        lines.push("  ABCDEFGH".to_string());
        lines.join("\n")
    }

    // -----------------------------------------------------------------------
    // Mutation, driven by the rules engine
    // -----------------------------------------------------------------------

    pub(crate) fn remove(&mut self, square: Square) -> Option<Piece> {
        self.slot_mut(square).take()
    }

    /// Move the piece on `from` to the empty square `to`.
    pub(crate) fn relocate(&mut self, from: Square, to: Square, turn: i32) {
        if let Some(mut piece) = self.remove(from) {
            piece.occupy(to, turn);
            *self.slot_mut(to) = Some(piece);
            self.last_moved = Some(to);
        }
    }

    pub(crate) fn set_kind(&mut self, square: Square, kind: PieceKind) {
        if let Some(piece) = self.slot_mut(square) {
            piece.kind = kind;
        }
    }

    fn slot(&self, square: Square) -> &Option<Piece> {
        &self.squares[square.file() as usize][square.rank() as usize]
    }

    fn slot_mut(&mut self, square: Square) -> &mut Option<Piece> {
        &mut self.squares[square.file() as usize][square.rank() as usize]
    }
}
