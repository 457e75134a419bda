//! Integration tests for move generation and check detection (spec section
//! 8: concrete scenario 1, properties 4-5, and open questions 1 and 4).

use xiangqi_engine::board::Position;
use xiangqi_engine::movegen::{attacked_by, in_check, legal_moves, pseudo_legal_moves};
use xiangqi_engine::types::{Color, Kind, Move, Piece, Square};

const STARTPOS_FEN: &str = "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR w - - 0 1";
const STARTPOS_BLACK_TO_MOVE: &str = "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR b - - 0 1";

/// Concrete scenario 1: the opening position has exactly 44 legal moves for
/// either side to move.
#[test]
fn opening_position_has_44_legal_moves_for_both_sides() {
    let red = Position::from_fen(STARTPOS_FEN).unwrap();
    assert_eq!(legal_moves(&red).len(), 44);

    let black = Position::from_fen(STARTPOS_BLACK_TO_MOVE).unwrap();
    assert_eq!(legal_moves(&black).len(), 44);
}

/// Property 4: every legal move is also pseudo-legal, and playing it leaves
/// the mover out of check (and not in violation of flying-general).
#[test]
fn legal_moves_are_a_subset_of_pseudo_legal_and_leave_mover_safe() {
    let pos = Position::from_fen("3akab2/9/1c2b4/p3p1p1p/2p6/6P2/P1P3c1P/1C2C4/9/2BAKAB2 b - - 0 1").unwrap();
    let pseudo = pseudo_legal_moves(&pos);
    let legal = legal_moves(&pos);
    for m in &legal {
        assert!(pseudo.contains(m));
    }

    let mover = pos.side_to_move();
    for &m in &legal {
        let mut scratch = pos.clone();
        scratch.make(m);
        assert!(!in_check(&scratch, mover));
    }
}

/// Property 5: a non-capture leaves the opponent's piece count unchanged; a
/// capture decreases it by exactly one.
#[test]
fn captures_decrease_opponent_piece_count_by_exactly_one() {
    let pos = Position::from_fen("4k4/9/9/9/4c4/9/4P4/9/9/4K4 w - - 0 1").unwrap();
    let opponent = pos.side_to_move().opponent();
    let before = pos.color_bb(opponent).popcount();

    let capture = Move::new(Square::new(6, 4), Square::new(4, 4));
    assert!(legal_moves(&pos).contains(&capture));
    let mut scratch = pos.clone();
    scratch.make(capture);
    assert_eq!(scratch.color_bb(opponent).popcount(), before - 1);

    let quiet = Move::new(Square::new(9, 1), Square::new(7, 2));
    assert!(legal_moves(&Position::initial()).contains(&quiet));
    let mut scratch2 = Position::initial();
    let before_black = scratch2.color_bb(Color::Black).popcount();
    scratch2.make(quiet);
    assert_eq!(scratch2.color_bb(Color::Black).popcount(), before_black);
}

/// Open question 1: flying-general is a pure check predicate, never a
/// legal move that captures the opposing king directly.
#[test]
fn flying_general_never_appears_as_a_legal_capturing_move() {
    let pos = Position::from_fen("4k4/9/9/9/9/9/9/9/9/4K4 w - - 0 1").unwrap();
    assert!(in_check(&pos, Color::Red));
    assert!(in_check(&pos, Color::Black));
    for m in legal_moves(&pos) {
        assert_ne!(pos.piece_at(m.to).map(|k| k.piece()), Some(Piece::King));
    }
}

/// Open question 4: pawn attacks are not symmetric. A Red pawn on the river
/// bank attacks sideways only once it has crossed; verify `attacked_by` uses
/// the *attacker's* own pawn-attack geometry rather than inverting it.
#[test]
fn pawn_attacks_use_the_attackers_own_direction_not_an_inverted_one() {
    // Black pawn at (5,5), just across the river into Red's half: it can
    // attack sideways. A Red king standing on (5,4) must be seen as attacked.
    let pos = Position::from_fen("4k4/9/9/9/9/4Kp3/9/9/9/9 w - - 0 1").unwrap();
    let king_sq = Square::new(5, 4);
    assert!(attacked_by(&pos, king_sq, Color::Black));

    // Symmetric check the other way would be wrong: a Red pawn's *forward*
    // table must not be reused verbatim as the reverse lookup.
    let _ = Kind::new(Piece::Pawn, Color::Red);
}
