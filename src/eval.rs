//! Tapered material + piece-square evaluator with mobility, king safety,
//! and pattern bonuses (spec section 4.5).
//!
//! Piece-square tables, material values, and the pattern/dynamic bonus
//! constants are carried over from the reference evaluator this crate's
//! opening book and search were distilled from, re-expressed from Red's
//! point of view as spec section 4.5 requires.

use crate::attack_tables::{cannon_attacks, rook_attacks, ATTACKS};
use crate::board::Position;
use crate::movegen::attacked_by;
use crate::types::{Color, Kind, Piece, Square, NUM_SQUARES};

pub const MATE: i32 = 10_000;

pub fn material(piece: Piece) -> i32 {
    match piece {
        Piece::King => 0,
        Piece::Guard | Piece::Elephant | Piece::Pawn => 100,
        Piece::Horse => 450,
        Piece::Cannon => 500,
        Piece::Rook => 900,
    }
}

type Table = [[i32; 9]; 10];

const KING_PST: Table = [
    [0, 0, 0, 8, 8, 8, 0, 0, 0],
    [0, 0, 0, 8, 8, 8, 0, 0, 0],
    [0, 0, 0, 6, 6, 6, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 6, 6, 6, 0, 0, 0],
    [0, 0, 0, 8, 8, 8, 0, 0, 0],
    [0, 0, 0, 8, 8, 8, 0, 0, 0],
];

const GUARD_PST: Table = [
    [0, 0, 0, 20, 0, 20, 0, 0, 0],
    [0, 0, 0, 0, 23, 0, 0, 0, 0],
    [0, 0, 0, 20, 0, 20, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 20, 0, 20, 0, 0, 0],
    [0, 0, 0, 0, 23, 0, 0, 0, 0],
    [0, 0, 0, 20, 0, 20, 0, 0, 0],
];

const ELEPHANT_PST: Table = [
    [0, 0, 20, 0, 0, 0, 20, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 23, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 20, 0, 0, 0, 20, 0, 0],
    [0, 0, 20, 0, 0, 0, 20, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 23, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 20, 0, 0, 0, 20, 0, 0],
];

const HORSE_PST: Table = [
    [90, 90, 90, 96, 90, 96, 90, 90, 90],
    [90, 96, 103, 97, 94, 97, 103, 96, 90],
    [92, 98, 99, 103, 99, 103, 99, 98, 92],
    [93, 108, 100, 107, 100, 107, 100, 108, 93],
    [90, 100, 99, 103, 104, 103, 99, 100, 90],
    [90, 98, 101, 102, 103, 102, 101, 98, 90],
    [92, 94, 98, 95, 98, 95, 98, 94, 92],
    [93, 92, 94, 95, 92, 95, 94, 92, 93],
    [85, 90, 92, 93, 78, 93, 92, 90, 85],
    [88, 85, 90, 88, 90, 88, 90, 85, 88],
];

const ROOK_PST: Table = [
    [206, 208, 207, 213, 214, 213, 207, 208, 206],
    [206, 212, 209, 216, 233, 216, 209, 212, 206],
    [206, 208, 207, 214, 216, 214, 207, 208, 206],
    [206, 213, 213, 216, 216, 216, 213, 213, 206],
    [208, 211, 211, 214, 215, 214, 211, 211, 208],
    [208, 212, 212, 214, 215, 214, 212, 212, 208],
    [204, 209, 204, 212, 214, 212, 204, 209, 204],
    [198, 208, 204, 212, 212, 212, 204, 208, 198],
    [200, 208, 206, 212, 200, 212, 206, 208, 200],
    [194, 206, 204, 212, 200, 212, 204, 206, 194],
];

const CANNON_PST: Table = [
    [100, 100, 96, 91, 90, 91, 96, 100, 100],
    [98, 98, 96, 92, 89, 92, 96, 98, 98],
    [97, 97, 96, 91, 92, 91, 96, 97, 97],
    [96, 99, 99, 98, 100, 98, 99, 99, 96],
    [96, 96, 96, 96, 100, 96, 96, 96, 96],
    [95, 96, 99, 96, 100, 96, 99, 96, 95],
    [96, 96, 96, 96, 96, 96, 96, 96, 96],
    [97, 96, 100, 99, 101, 99, 100, 96, 97],
    [96, 97, 98, 98, 98, 98, 98, 97, 96],
    [96, 96, 97, 99, 99, 99, 97, 96, 96],
];

const PAWN_PST_MG: Table = [
    [9, 9, 9, 11, 13, 11, 9, 9, 9],
    [19, 24, 34, 42, 44, 42, 34, 24, 19],
    [19, 24, 32, 37, 37, 37, 32, 24, 19],
    [19, 23, 27, 29, 30, 29, 27, 23, 19],
    [14, 18, 20, 27, 29, 27, 20, 18, 14],
    [7, 0, 13, 0, 16, 0, 13, 0, 7],
    [7, 0, 7, 0, 15, 0, 7, 0, 7],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
];

/// Differs from the midgame pawn table: pawns gain most of their value as
/// the board empties and safety in numbers thins out (spec section 4.5).
const PAWN_PST_EG: Table = [
    [20, 20, 20, 25, 30, 25, 20, 20, 20],
    [40, 50, 60, 70, 75, 70, 60, 50, 40],
    [40, 50, 60, 65, 70, 65, 60, 50, 40],
    [40, 50, 55, 60, 60, 60, 55, 50, 40],
    [30, 40, 45, 50, 50, 50, 45, 40, 30],
    [15, 20, 25, 30, 30, 30, 25, 20, 15],
    [10, 15, 20, 20, 20, 20, 20, 15, 10],
    [5, 5, 5, 5, 5, 5, 5, 5, 5],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
];

fn pst_mg(piece: Piece) -> &'static Table {
    match piece {
        Piece::King => &KING_PST,
        Piece::Guard => &GUARD_PST,
        Piece::Elephant => &ELEPHANT_PST,
        Piece::Horse => &HORSE_PST,
        Piece::Rook => &ROOK_PST,
        Piece::Cannon => &CANNON_PST,
        Piece::Pawn => &PAWN_PST_MG,
    }
}

/// The endgame table equals the midgame table for every piece but the pawn.
fn pst_eg(piece: Piece) -> &'static Table {
    match piece {
        Piece::Pawn => &PAWN_PST_EG,
        other => pst_mg(other),
    }
}

/// Full non-pawn, non-king material for both sides combined; the phase
/// weight is this position's share of it (spec section 4.5).
const OPENING_MATERIAL: i32 = 2 * (2 * 900 + 2 * 450 + 2 * 500 + 2 * 100 + 2 * 100);

const MOBILITY_WEIGHT_ROOK: i32 = 1;
const MOBILITY_WEIGHT_HORSE: i32 = 3;
const MOBILITY_WEIGHT_CANNON: i32 = 1;

const KING_SAFETY_PENALTY: i32 = 15;

const BOTTOM_CANNON_BONUS: i32 = 80;
const PALACE_HEART_HORSE_BONUS: i32 = 70;
const CONNECTED_HORSES_BONUS: i32 = 30;
const ROOK_ON_RIB_FILE_BONUS: i32 = 20;
const ATTACK_PER_MISSING_DEFENDER: i32 = 15;

/// Evaluates `pos` from Red's perspective: positive favors Red. Negamax
/// search negates this for Black to move (spec section 4.5).
pub fn evaluate(pos: &Position) -> i32 {
    let phase_weight = phase_weight(pos);

    let mut score = 0i32;
    for color in [Color::Red, Color::Black] {
        let sign = if color == Color::Red { 1 } else { -1 };
        for piece in [
            Piece::King,
            Piece::Guard,
            Piece::Elephant,
            Piece::Horse,
            Piece::Rook,
            Piece::Cannon,
            Piece::Pawn,
        ] {
            let kind = Kind::new(piece, color);
            for sq in pos.piece_bb(kind).iter() {
                score += sign * material(piece);
                score += sign * tapered_pst(piece, color, sq, phase_weight);
            }
        }
        score += sign * mobility_score(pos, color);
    }

    score += king_safety_score(pos);
    score += pattern_and_dynamic_score(pos);
    score
}

fn phase_weight(pos: &Position) -> f64 {
    let mut total = 0i32;
    for color in [Color::Red, Color::Black] {
        for piece in [Piece::Rook, Piece::Horse, Piece::Cannon, Piece::Guard, Piece::Elephant] {
            total += pos.piece_bb(Kind::new(piece, color)).popcount() as i32 * material(piece);
        }
    }
    (total as f64 / OPENING_MATERIAL as f64).min(1.0)
}

fn tapered_pst(piece: Piece, color: Color, sq: Square, phase_weight: f64) -> i32 {
    let (r, f) = match color {
        Color::Red => (9 - sq.rank() as usize, 8 - sq.file() as usize),
        Color::Black => (sq.rank() as usize, sq.file() as usize),
    };
    let mg = pst_mg(piece)[r][f] as f64;
    let eg = pst_eg(piece)[r][f] as f64;
    (mg * phase_weight + eg * (1.0 - phase_weight)).round() as i32
}

fn mobility_score(pos: &Position, color: Color) -> i32 {
    let own = pos.color_bb(color);
    let occ = pos.occupancy();
    let mut score = 0;

    for sq in pos.piece_bb(Kind::new(Piece::Rook, color)).iter() {
        score += (rook_attacks(sq, occ) & !own).popcount() as i32 * MOBILITY_WEIGHT_ROOK;
    }
    for sq in pos.piece_bb(Kind::new(Piece::Cannon, color)).iter() {
        score += (cannon_attacks(sq, occ) & !own).popcount() as i32 * MOBILITY_WEIGHT_CANNON;
    }
    for sq in pos.piece_bb(Kind::new(Piece::Horse, color)).iter() {
        let count = ATTACKS.horse[sq.index()]
            .iter()
            .flatten()
            .filter(|&&(to, leg)| !occ.has(leg) && !own.has(to))
            .count();
        score += count as i32 * MOBILITY_WEIGHT_HORSE;
    }
    score
}

/// For every palace square a color's opponent attacks, that color loses
/// `KING_SAFETY_PENALTY` (spec section 4.5).
fn king_safety_score(pos: &Position) -> i32 {
    let mut score = 0;
    for color in [Color::Red, Color::Black] {
        let attacker = color.opponent();
        let sign = if color == Color::Red { -1 } else { 1 };
        for idx in 0..NUM_SQUARES {
            let sq = Square(idx as u8);
            if sq.in_palace(color) && attacked_by(pos, sq, attacker) {
                score += sign * KING_SAFETY_PENALTY;
            }
        }
    }
    score
}

fn pattern_and_dynamic_score(pos: &Position) -> i32 {
    let mut score = 0;

    for color in [Color::Red, Color::Black] {
        let sign = if color == Color::Red { 1 } else { -1 };

        let back_rank = if color == Color::Red { 0 } else { 9 };
        for sq in pos.piece_bb(Kind::new(Piece::Cannon, color)).iter() {
            if sq.rank() == back_rank {
                score += sign * BOTTOM_CANNON_BONUS;
            }
        }

        let heart_rank = if color == Color::Red { 1 } else { 8 };
        for sq in pos.piece_bb(Kind::new(Piece::Horse, color)).iter() {
            if sq.rank() == heart_rank && sq.file() == 4 {
                score += sign * PALACE_HEART_HORSE_BONUS;
            }
        }

        for sq in pos.piece_bb(Kind::new(Piece::Rook, color)).iter() {
            let past_river = if color == Color::Red {
                sq.rank() < 5
            } else {
                sq.rank() > 4
            };
            if past_river && (sq.file() == 3 || sq.file() == 5) {
                score += sign * ROOK_ON_RIB_FILE_BONUS;
            }
        }

        let horses: Vec<Square> = pos.piece_bb(Kind::new(Piece::Horse, color)).iter().collect();
        for i in 0..horses.len() {
            for j in (i + 1)..horses.len() {
                let (r1, c1) = (horses[i].rank() as i32, horses[i].file() as i32);
                let (r2, c2) = (horses[j].rank() as i32, horses[j].file() as i32);
                if ((r1 - r2) * (c1 - c2)).abs() == 2 {
                    score += sign * CONNECTED_HORSES_BONUS;
                }
            }
        }
    }

    for color in [Color::Red, Color::Black] {
        let sign = if color == Color::Red { 1 } else { -1 };
        let defender = color.opponent();
        let missing_defenders = (2 - pos.piece_bb(Kind::new(Piece::Guard, defender)).popcount() as i32)
            + (2 - pos.piece_bb(Kind::new(Piece::Elephant, defender)).popcount() as i32);
        let attackers = pos.attacking_piece_count(color) as i32;
        score += sign * attackers * missing_defenders * ATTACK_PER_MISSING_DEFENDER;
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_position_is_dead_even() {
        let pos = Position::initial();
        assert_eq!(evaluate(&pos), 0);
    }

    #[test]
    fn red_up_a_cannon_scores_positive() {
        let pos = Position::from_fen("4k4/9/9/9/9/9/9/4C4/9/4K4 w - - 0 1").unwrap();
        assert!(evaluate(&pos) > 0);
    }

    #[test]
    fn cannon_on_its_own_back_rank_scores_the_bottom_cannon_bonus() {
        let with_bonus = Position::from_fen("4k4/9/9/9/9/9/9/9/9/3CK4 w - - 0 1").unwrap();
        let moved_up = Position::from_fen("4k4/9/9/9/9/9/9/3C5/9/4K4 w - - 0 1").unwrap();
        assert!(evaluate(&with_bonus) > evaluate(&moved_up));
    }

    #[test]
    fn horse_on_palace_heart_square_scores_the_pattern_bonus() {
        let on_heart = Position::from_fen("4k4/9/9/9/9/9/9/9/4N4/4K4 w - - 0 1").unwrap();
        let elsewhere = Position::from_fen("4k4/9/9/9/9/9/9/9/1N7/4K4 w - - 0 1").unwrap();
        assert!(evaluate(&on_heart) > evaluate(&elsewhere));
    }
}
