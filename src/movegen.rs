//! Pseudo-legal and legal move generation, check detection, and the
//! flying-general predicate (spec sections 4.3 and 4.4).

use crate::attack_tables::{cannon_attacks, rook_attacks, ATTACKS};
use crate::bitboard::Bitboard;
use crate::board::Position;
use crate::types::{Color, Kind, Move, Piece, Square, PIECE_KINDS};

/// All moves obeying piece-movement geometry, ignoring self-check (spec
/// section 4.3). Does not filter out moves that leave the mover in check.
pub fn pseudo_legal_moves(pos: &Position) -> Vec<Move> {
    let side = pos.side_to_move();
    let own = pos.color_bb(side);
    let occ = pos.occupancy();
    let mut moves = Vec::with_capacity(40);

    for &piece in PIECE_KINDS.iter() {
        let kind = Kind::new(piece, side);
        for from in pos.piece_bb(kind).iter() {
            match piece {
                Piece::King => push_targets(&mut moves, from, ATTACKS.king[from.index()], own),
                Piece::Guard => push_targets(&mut moves, from, ATTACKS.guard[from.index()], own),
                Piece::Elephant => {
                    for slot in ATTACKS.elephant[from.index()].iter().flatten() {
                        let (to, eye) = *slot;
                        if to.in_own_half(side) && !occ.has(eye) && !own.has(to) {
                            moves.push(Move::new(from, to));
                        }
                    }
                }
                Piece::Horse => {
                    for slot in ATTACKS.horse[from.index()].iter().flatten() {
                        let (to, leg) = *slot;
                        if !occ.has(leg) && !own.has(to) {
                            moves.push(Move::new(from, to));
                        }
                    }
                }
                Piece::Pawn => {
                    push_targets(&mut moves, from, ATTACKS.pawn[side.index()][from.index()], own)
                }
                Piece::Rook => push_targets(&mut moves, from, rook_attacks(from, occ), own),
                Piece::Cannon => push_targets(&mut moves, from, cannon_attacks(from, occ), own),
            }
        }
    }
    moves
}

fn push_targets(moves: &mut Vec<Move>, from: Square, targets: Bitboard, own: Bitboard) {
    for to in (targets & !own).iter() {
        moves.push(Move::new(from, to));
    }
}

/// Filters `pseudo_legal_moves` by make/check/unmake (spec section 4.4):
/// a move is legal iff playing it does not leave the mover in check. The
/// filter works on a local clone so callers may pass a shared reference.
pub fn legal_moves(pos: &Position) -> Vec<Move> {
    let mover = pos.side_to_move();
    let mut scratch = pos.clone();
    pseudo_legal_moves(pos)
        .into_iter()
        .filter(|&m| {
            let undo = scratch.make(m);
            let ok = !in_check(&scratch, mover);
            scratch.unmake(m, undo);
            ok
        })
        .collect()
}

/// Legal moves whose destination square is occupied by the opponent, used
/// as the quiescence search's move set (spec section 4.6.4).
pub fn legal_captures(pos: &Position) -> Vec<Move> {
    legal_moves(pos)
        .into_iter()
        .filter(|m| pos.piece_at(m.to).is_some())
        .collect()
}

/// True if `sq` is attacked by any piece of `attacker` color, given the
/// current occupancy (spec section 4.4). Pawn attacks are checked via the
/// reverse `pawn_attackers` table since they are not symmetric with a
/// pawn's own movement table (spec section 9, open question 4).
pub fn attacked_by(pos: &Position, sq: Square, attacker: Color) -> bool {
    let occ = pos.occupancy();

    let pawns = pos.piece_bb(Kind::new(Piece::Pawn, attacker));
    if !(ATTACKS.pawn_attackers[attacker.index()][sq.index()] & pawns).is_empty() {
        return true;
    }

    let king = pos.piece_bb(Kind::new(Piece::King, attacker));
    if !(ATTACKS.king[sq.index()] & king).is_empty() {
        return true;
    }

    for from in pos.piece_bb(Kind::new(Piece::Horse, attacker)).iter() {
        for slot in ATTACKS.horse[from.index()].iter().flatten() {
            let (to, leg) = *slot;
            if to == sq && !occ.has(leg) {
                return true;
            }
        }
    }

    for from in pos.piece_bb(Kind::new(Piece::Elephant, attacker)).iter() {
        for slot in ATTACKS.elephant[from.index()].iter().flatten() {
            let (to, eye) = *slot;
            if to == sq && to.in_own_half(attacker) && !occ.has(eye) {
                return true;
            }
        }
    }

    let rooks = pos.piece_bb(Kind::new(Piece::Rook, attacker));
    if !(rook_attacks(sq, occ) & rooks).is_empty() {
        return true;
    }

    let cannons = pos.piece_bb(Kind::new(Piece::Cannon, attacker));
    if !(cannon_attacks(sq, occ) & cannons).is_empty() {
        return true;
    }

    false
}

/// True if `color`'s king is in check: either directly attacked, or the
/// two kings face each other along an empty file (flying general, spec
/// section 9 open question 1 - a pure predicate, never a generated move).
pub fn in_check(pos: &Position, color: Color) -> bool {
    let Some(king_sq) = pos.king_square(color) else {
        return false;
    };
    attacked_by(pos, king_sq, color.opponent()) || flying_general(pos, color)
}

/// Counts leaf nodes reachable from `pos` in exactly `depth` plies of legal
/// moves. A development/validation tool, not part of the search itself -
/// exposed through `src/bin/perft.rs` (spec section 1's "dev CLI" carve-out;
/// grounded in the teacher's `src/perft.rs`).
pub fn perft(pos: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = legal_moves(pos);
    let mut nodes = 0;
    for m in moves {
        let undo = pos.make(m);
        nodes += perft(pos, depth - 1);
        pos.unmake(m, undo);
    }
    nodes
}

/// Prints a per-root-move node-count breakdown for `depth` (teacher's
/// `perft_divide`), returning the total.
pub fn perft_divide(pos: &mut Position, depth: u32) -> u64 {
    let mut moves = legal_moves(pos);
    moves.sort_by_key(|m| (m.from.index(), m.to.index()));
    let mut total = 0u64;
    for m in moves {
        let undo = pos.make(m);
        let nodes = if depth == 0 { 1 } else { perft(pos, depth - 1) };
        pos.unmake(m, undo);
        println!("{}{}: {}", m.from, m.to, nodes);
        total += nodes;
    }
    total
}

fn flying_general(pos: &Position, color: Color) -> bool {
    let Some(mine) = pos.king_square(color) else {
        return false;
    };
    let Some(theirs) = pos.king_square(color.opponent()) else {
        return false;
    };
    if mine.file() != theirs.file() {
        return false;
    }
    let (lo, hi) = if mine.rank() < theirs.rank() {
        (mine.rank(), theirs.rank())
    } else {
        (theirs.rank(), mine.rank())
    };
    let occ = pos.occupancy();
    ((lo + 1)..hi).all(|r| !occ.has(Square::new(r, mine.file())))
}
