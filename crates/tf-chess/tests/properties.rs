//! Property tests for the rules engine.

use proptest::prelude::*;
use tf_chess::{Board, PieceKind, Player, RulesConfig, Square, attempt_move, is_knight_jump};

fn square() -> impl Strategy<Value = Square> {
    (0..8i32, 0..8i32).prop_map(|(f, r)| Square::new(f, r).expect("in range"))
}

fn player() -> impl Strategy<Value = Player> {
    prop_oneof![Just(Player::One), Just(Player::Two)]
}

fn promotion() -> impl Strategy<Value = Option<PieceKind>> {
    prop_oneof![
        Just(None),
        Just(Some(PieceKind::Queen)),
        Just(Some(PieceKind::Knight)),
        Just(Some(PieceKind::King)),
    ]
}

/// A position reached by playing a few random legal moves from the start.
fn played_board() -> impl Strategy<Value = Board> {
    prop::collection::vec((square(), square()), 0..40).prop_map(|moves| {
        let mut board = Board::standard();
        let config = RulesConfig::default();
        let mut mover = Player::One;
        let mut turn = 1;
        for (from, to) in moves {
            let result = attempt_move(&mut board, from, to, mover, Some(PieceKind::Queen), turn, &config);
            if result.valid {
                if mover == Player::Two {
                    turn += 1;
                }
                mover = mover.opponent();
            }
        }
        board
    })
}

proptest! {
    #[test]
    fn rejected_moves_never_mutate(
        mut board in played_board(),
        from in square(),
        to in square(),
        mover in player(),
        promo in promotion(),
    ) {
        let before = board.clone();
        let result = attempt_move(&mut board, from, to, mover, promo, 9, &RulesConfig::default());
        if !result.valid {
            prop_assert_eq!(board, before);
            prop_assert!(result.rejection.is_some());
        }
    }

    #[test]
    fn non_capturing_moves_keep_piece_count(
        mut board in played_board(),
        from in square(),
        to in square(),
        mover in player(),
    ) {
        let count = board.piece_count();
        let result = attempt_move(&mut board, from, to, mover, Some(PieceKind::Queen), 9, &RulesConfig::default());
        if result.valid && !result.is_capture {
            prop_assert_eq!(board.piece_count(), count);
        }
        if result.is_capture {
            prop_assert_eq!(board.piece_count(), count - 1);
        }
    }

    #[test]
    fn lone_knight_moves_iff_l_shape(from in square(), to in square()) {
        prop_assume!(from != to);
        let mut board = Board::empty();
        board.place(PieceKind::Knight, Player::One, from);
        let result = attempt_move(&mut board, from, to, Player::One, None, 1, &RulesConfig::default());
        let dx = to.file() - from.file();
        let dy = to.rank() - from.rank();
        prop_assert_eq!(result.valid, is_knight_jump(dx, dy));
        prop_assert_eq!(result.valid, dx.abs() + dy.abs() == 3 && dx.abs() <= 2 && dy.abs() <= 2);
    }
}
