//! Precomputed per-square attack bitmaps and ray tables (spec section 4.2).
//!
//! Built once at process startup from fixed geometric rules; never mutated
//! afterward, mirroring the teacher's Zobrist-table construction style
//! (`std::sync::LazyLock` / `once_cell::sync::Lazy` globals).

use crate::bitboard::Bitboard;
use crate::types::{Color, Square, NUM_SQUARES};
use once_cell::sync::Lazy;

/// The four cardinal ray directions. `increasing` records whether square
/// index grows as you move away from the origin along that ray - needed to
/// pick the nearest blocker with a single `lsb`/`msb` scan.
#[derive(Clone, Copy)]
struct Dir {
    drank: i32,
    dfile: i32,
    increasing: bool,
}

const NORTH: Dir = Dir { drank: -1, dfile: 0, increasing: false };
const EAST: Dir = Dir { drank: 0, dfile: 1, increasing: true };
const SOUTH: Dir = Dir { drank: 1, dfile: 0, increasing: true };
const WEST: Dir = Dir { drank: 0, dfile: -1, increasing: false };
const DIRS: [Dir; 4] = [NORTH, EAST, SOUTH, WEST];

const HORSE_OFFSETS: [((i32, i32), (i32, i32)); 8] = [
    ((-2, -1), (-1, 0)),
    ((-2, 1), (-1, 0)),
    ((-1, -2), (0, -1)),
    ((-1, 2), (0, 1)),
    ((1, -2), (0, -1)),
    ((1, 2), (0, 1)),
    ((2, -1), (1, 0)),
    ((2, 1), (1, 0)),
];

const ELEPHANT_OFFSETS: [((i32, i32), (i32, i32)); 4] = [
    ((-2, -2), (-1, -1)),
    ((-2, 2), (-1, 1)),
    ((2, -2), (1, -1)),
    ((2, 2), (1, 1)),
];

pub struct AttackTables {
    pub king: [Bitboard; NUM_SQUARES],
    pub guard: [Bitboard; NUM_SQUARES],
    /// (destination, eye-square-that-must-be-empty), up to 4 per square.
    pub elephant: [[Option<(Square, Square)>; 4]; NUM_SQUARES],
    /// (destination, leg-square-that-must-be-empty), up to 8 per square.
    pub horse: [[Option<(Square, Square)>; 8]; NUM_SQUARES],
    /// `pawn[color][sq]`: forward move targets for a pawn of `color` on `sq`.
    pub pawn: [[Bitboard; NUM_SQUARES]; 2],
    /// `pawn_attackers[color][sq]`: squares a `color` pawn would need to
    /// stand on to attack `sq` - the reverse lookup used by `attacked_by`
    /// (spec section 9, open question 4: pawn attacks are not symmetric,
    /// so the forward-move table cannot be reused as-is for this check).
    pub pawn_attackers: [[Bitboard; NUM_SQUARES]; 2],
    /// `ray[dir][sq]`, dir indices match `DIRS` (N, E, S, W).
    pub ray: [[Bitboard; NUM_SQUARES]; 4],
}

impl AttackTables {
    fn build() -> Self {
        let mut king = [Bitboard::EMPTY; NUM_SQUARES];
        let mut guard = [Bitboard::EMPTY; NUM_SQUARES];
        let mut elephant = [[None; 4]; NUM_SQUARES];
        let mut horse = [[None; 8]; NUM_SQUARES];
        let mut pawn = [[Bitboard::EMPTY; NUM_SQUARES]; 2];
        let mut pawn_attackers = [[Bitboard::EMPTY; NUM_SQUARES]; 2];
        let mut ray = [[Bitboard::EMPTY; NUM_SQUARES]; 4];

        for idx in 0..NUM_SQUARES {
            let sq = Square(idx as u8);
            let r = sq.rank() as i32;
            let f = sq.file() as i32;

            // King: orthogonal one step, masked to either palace.
            let mut k = Bitboard::EMPTY;
            for (dr, df) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
                if let Some(to) = step(r, f, dr, df) {
                    if in_either_palace(to) {
                        k.set(to);
                    }
                }
            }
            king[idx] = k;

            // Guard: diagonal one step, masked to either palace.
            let mut g = Bitboard::EMPTY;
            for (dr, df) in [(-1, -1), (-1, 1), (1, -1), (1, 1)] {
                if let Some(to) = step(r, f, dr, df) {
                    if in_either_palace(to) {
                        g.set(to);
                    }
                }
            }
            guard[idx] = g;

            // Elephant: up to 4 "field" jumps with an eye square.
            let mut e_slot = 0;
            for ((dr, df), (er, ef)) in ELEPHANT_OFFSETS {
                if let (Some(to), Some(eye)) = (step(r, f, dr, df), step(r, f, er, ef)) {
                    elephant[idx][e_slot] = Some((to, eye));
                    e_slot += 1;
                }
            }

            // Horse: up to 8 "日" jumps with a leg square.
            let mut h_slot = 0;
            for ((dr, df), (lr, lf)) in HORSE_OFFSETS {
                if let (Some(to), Some(leg)) = (step(r, f, dr, df), step(r, f, lr, lf)) {
                    horse[idx][h_slot] = Some((to, leg));
                    h_slot += 1;
                }
            }

            // Pawn: one step forward always; sideways once across the river.
            // Red advances toward rank 0, Black toward rank 9.
            pawn[Color::Red.index()][idx] = pawn_targets(sq, -1);
            pawn[Color::Black.index()][idx] = pawn_targets(sq, 1);
            pawn_attackers[Color::Red.index()][idx] = pawn_targets(sq, 1);
            pawn_attackers[Color::Black.index()][idx] = pawn_targets(sq, -1);

            // Rays in the four cardinal directions.
            for (d, dir) in DIRS.iter().enumerate() {
                let mut bb = Bitboard::EMPTY;
                let mut cr = r + dir.drank;
                let mut cf = f + dir.dfile;
                while Square::on_board(cr, cf) {
                    bb.set(Square::new(cr as u8, cf as u8));
                    cr += dir.drank;
                    cf += dir.dfile;
                }
                ray[d][idx] = bb;
            }
        }

        AttackTables {
            king,
            guard,
            elephant,
            horse,
            pawn,
            pawn_attackers,
            ray,
        }
    }
}

fn step(r: i32, f: i32, dr: i32, df: i32) -> Option<Square> {
    let (nr, nf) = (r + dr, f + df);
    if Square::on_board(nr, nf) {
        Some(Square::new(nr as u8, nf as u8))
    } else {
        None
    }
}

fn in_either_palace(sq: Square) -> bool {
    sq.in_palace(Color::Red) || sq.in_palace(Color::Black)
}

fn pawn_targets(sq: Square, forward_drank: i32) -> Bitboard {
    let color = if forward_drank < 0 { Color::Red } else { Color::Black };
    let r = sq.rank() as i32;
    let f = sq.file() as i32;
    let mut bb = Bitboard::EMPTY;
    if let Some(to) = step(r, f, forward_drank, 0) {
        bb.set(to);
    }
    if !sq.in_own_half(color) {
        if let Some(to) = step(r, f, 0, -1) {
            bb.set(to);
        }
        if let Some(to) = step(r, f, 0, 1) {
            bb.set(to);
        }
    }
    bb
}

pub static ATTACKS: Lazy<AttackTables> = Lazy::new(AttackTables::build);

/// Direction index constants, matching `AttackTables::ray`'s layout.
pub const DIR_NORTH: usize = 0;
pub const DIR_EAST: usize = 1;
pub const DIR_SOUTH: usize = 2;
pub const DIR_WEST: usize = 3;

#[inline]
fn dir_increasing(d: usize) -> bool {
    DIRS[d].increasing
}

fn below(idx: usize) -> Bitboard {
    if idx == 0 {
        Bitboard::EMPTY
    } else {
        Bitboard((1u128 << idx) - 1)
    }
}

fn above(idx: usize) -> Bitboard {
    Bitboard::ALL & !below(idx + 1)
}

/// Nearest blocker to the ray's origin among `blockers`, given the ray
/// direction's index-order.
fn nearest(blockers: Bitboard, d: usize) -> Option<Square> {
    if dir_increasing(d) {
        blockers.lsb()
    } else {
        blockers.msb()
    }
}

/// Rook attacks from `sq` given board occupancy `occ` (spec section 4.2).
pub fn rook_attacks(sq: Square, occ: Bitboard) -> Bitboard {
    let mut result = Bitboard::EMPTY;
    for d in 0..4 {
        let ray = ATTACKS.ray[d][sq.index()];
        let blockers = ray & occ;
        if blockers.is_empty() {
            result |= ray;
            continue;
        }
        let block = nearest(blockers, d).expect("blockers nonempty");
        let up_to_and_including = if dir_increasing(d) {
            below(block.index() + 1)
        } else {
            above(if block.index() == 0 { 0 } else { block.index() - 1 })
        };
        result |= ray & up_to_and_including;
    }
    result
}

/// Cannon attacks (moves + the single jump-capture target) from `sq` given
/// occupancy `occ` (spec section 4.2).
pub fn cannon_attacks(sq: Square, occ: Bitboard) -> Bitboard {
    let mut result = Bitboard::EMPTY;
    for d in 0..4 {
        let ray = ATTACKS.ray[d][sq.index()];
        let blockers = ray & occ;
        let Some(screen) = nearest(blockers, d) else {
            // No piece anywhere on the ray: the whole ray is empty, so it's
            // all quiet moves, no capture possible.
            result |= ray;
            continue;
        };
        let nearer = if dir_increasing(d) {
            below(screen.index())
        } else {
            above(screen.index())
        };
        result |= ray & nearer;

        let beyond = if dir_increasing(d) {
            above(screen.index())
        } else {
            below(screen.index())
        };
        let beyond_blockers = ray & beyond & occ;
        if let Some(target) = nearest(beyond_blockers, d) {
            result.set(target);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Square;

    #[test]
    fn king_stays_inside_palace() {
        // Red king home square (9,4): all targets must be within Red's palace.
        let sq = Square::new(9, 4);
        for to in ATTACKS.king[sq.index()].iter() {
            assert!(to.in_palace(Color::Red));
        }
    }

    #[test]
    fn rook_attacks_stop_at_first_blocker_each_direction() {
        let sq = Square::new(5, 4);
        let mut occ = Bitboard::EMPTY;
        occ.set(Square::new(5, 6)); // two squares east
        let attacks = rook_attacks(sq, occ);
        assert!(attacks.has(Square::new(5, 5)));
        assert!(attacks.has(Square::new(5, 6)));
        assert!(!attacks.has(Square::new(5, 7)));
    }

    #[test]
    fn cannon_needs_exactly_one_screen_to_capture() {
        let sq = Square::new(5, 4);
        let mut occ = Bitboard::EMPTY;
        occ.set(Square::new(5, 6)); // screen
        occ.set(Square::new(5, 8)); // capture target beyond screen
        let attacks = cannon_attacks(sq, occ);
        assert!(attacks.has(Square::new(5, 5))); // quiet move before screen
        assert!(!attacks.has(Square::new(5, 6))); // cannot land on screen
        assert!(!attacks.has(Square::new(5, 7))); // between screen and target
        assert!(attacks.has(Square::new(5, 8))); // capture target
    }

    #[test]
    fn cannon_with_no_blockers_has_no_capture() {
        let sq = Square::new(5, 4);
        let occ = Bitboard::EMPTY;
        let attacks = cannon_attacks(sq, occ);
        assert_eq!(attacks, ATTACKS.ray[DIR_EAST][sq.index()] | ATTACKS.ray[DIR_WEST][sq.index()]
            | ATTACKS.ray[DIR_NORTH][sq.index()] | ATTACKS.ray[DIR_SOUTH][sq.index()]);
    }
}
