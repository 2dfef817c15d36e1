//! Whole-position scoring through the three entry points.

mod common;

use std::sync::Arc;

use halfkp_core::{Color, FenError, Piece, PieceList, PieceListError, Position, STARTING_FEN};
use halfkp_eval::weights::{HIDDEN, NET_FILE_SIZE};
use halfkp_eval::{Evaluator, PlyChain, PlyState, WeightStore};

use common::{evaluator, mirrored_net, position, random_net};

/// Swap colors and rotate the board: the same game seen from the other side.
fn color_swapped(pos: &Position) -> Position {
    let pieces = PieceList::from_pairs(
        pos.pieces
            .iter()
            .map(|(piece, sq)| (Piece::new(piece.kind(), !piece.color()), sq.rotate())),
    )
    .unwrap();
    Position::new(!pos.side_to_move, pieces)
}

#[test]
fn fen_and_piece_list_agree() {
    let eval = evaluator();
    for fen in [
        STARTING_FEN,
        "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3",
        "8/8/4k3/8/8/4K3/4P3/8 b - - 0 60",
    ] {
        assert_eq!(eval.evaluate_fen(fen).unwrap(), eval.evaluate(&position(fen)), "{fen}");
    }
}

#[test]
fn raw_codes_match_fen() {
    let eval = evaluator();
    // White king e1, black king e8, white pawn e2, black queen d8.
    let pieces = [1, 7, 6, 8, 0];
    let squares = [4, 60, 12, 59];
    let score = eval.evaluate_codes(Color::White, &pieces, &squares).unwrap();
    assert_eq!(score, eval.evaluate_fen("3qk3/8/8/8/8/8/4P3/4K3 w - - 0 1").unwrap());
}

#[test]
fn raw_codes_reject_kings_out_of_place() {
    let eval = evaluator();
    let err = eval.evaluate_codes(Color::White, &[6, 1, 7], &[12, 4, 60]).unwrap_err();
    assert_eq!(err, PieceListError::MissingKing { color: Color::White });
}

#[test]
fn malformed_fen_is_an_error() {
    let eval = evaluator();
    assert!(matches!(eval.evaluate_fen(""), Err(FenError::Empty)));
    assert!(eval.evaluate_fen("rnbqkbnr/pppppppp/8/8 w - - 0 1").is_err());
    assert!(eval.evaluate_fen("8/8/8/8/8/8/8/4K3 w - - 0 1").is_err());
}

#[test]
fn color_swap_gives_same_score() {
    let eval = evaluator();
    for fen in [
        STARTING_FEN,
        "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3",
        "r3k2r/pppq1ppp/2n2n2/2bpp1B1/2BPP1b1/2N2N2/PPPQ1PPP/R3K2R b KQkq - 0 1",
        "6k1/5ppp/8/8/8/8/1Q6/K7 w - - 0 1",
    ] {
        let pos = position(fen);
        assert_eq!(eval.evaluate(&pos), eval.evaluate(&color_swapped(&pos)), "{fen}");
    }
}

#[test]
fn start_position_is_balanced_on_a_mirrored_net() {
    let store = WeightStore::from_bytes(mirrored_net(7)).unwrap();
    let eval = Evaluator::new(Arc::new(store));
    let mut pos = position(STARTING_FEN);
    let white = eval.evaluate(&pos);
    pos.side_to_move = Color::Black;
    assert_eq!(white, eval.evaluate(&pos));
}

#[test]
fn extreme_output_bias_wraps() {
    let mut bytes = random_net(1);
    let out_bias = NET_FILE_SIZE - HIDDEN - 4;
    bytes[out_bias..out_bias + 4].copy_from_slice(&i32::MAX.to_le_bytes());
    bytes[NET_FILE_SIZE - HIDDEN..].fill(100);
    let eval = Evaluator::new(Arc::new(WeightStore::from_bytes(bytes).unwrap()));

    let pos = position(STARTING_FEN);
    let score = eval.evaluate_fen(STARTING_FEN).unwrap();
    let mut ply = PlyState::new();
    assert_eq!(eval.evaluate_incremental(&pos, PlyChain::new(&mut ply)), score);

    // Positive output weights push the sum past i32::MAX unless every
    // hidden unit is clipped to zero.
    assert!(score < 0 || score == i32::MAX / 16, "score {score}");
}

#[test]
fn clones_share_weights() {
    let eval = evaluator();
    let other = eval.clone();
    assert!(Arc::ptr_eq(eval.store(), other.store()));
    assert_eq!(eval.evaluate_fen(STARTING_FEN).unwrap(), other.evaluate_fen(STARTING_FEN).unwrap());
}

/// Sanity check against a trained network, when one is available.
#[test]
fn trained_net_scores_start_position_near_zero() {
    let Some(path) = std::env::var_os("HALFKP_EVAL_FILE") else {
        return;
    };
    let eval = Evaluator::load(&path).unwrap();
    let score = eval.evaluate_fen(STARTING_FEN).unwrap();
    assert!(score.abs() < 150, "start position scored {score}");

    let up_a_queen = eval
        .evaluate_fen("rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
        .unwrap();
    assert!(up_a_queen > score + 300, "queen odds scored {up_a_queen}");
}
