//! Zobrist hashing for Xiangqi positions.
//!
//! Provides incrementally-updatable 64-bit position hashes for repetition
//! detection and the transposition table, per spec section 4.1.

use once_cell::sync::Lazy;
use rand::prelude::*;

use crate::types::{Kind, Square, NUM_KINDS, NUM_SQUARES};

pub struct ZobristKeys {
    /// `piece_keys[kind][square]`
    piece_keys: [[u64; NUM_SQUARES]; NUM_KINDS],
    pub side_key: u64,
}

impl ZobristKeys {
    fn new() -> Self {
        // Fixed seed: repeated runs and cross-process book building must
        // yield identical keys (spec section 4.1).
        let mut rng = StdRng::seed_from_u64(0x5849_5152_4900_1234_u64);
        let mut piece_keys = [[0u64; NUM_SQUARES]; NUM_KINDS];
        for kind in piece_keys.iter_mut() {
            for key in kind.iter_mut() {
                *key = rng.gen();
            }
        }
        let side_key = rng.gen();
        ZobristKeys {
            piece_keys,
            side_key,
        }
    }

    #[inline]
    pub fn key(&self, kind: Kind, sq: Square) -> u64 {
        self.piece_keys[kind.index()][sq.index()]
    }
}

/// Process-wide, read-only Zobrist constants. Built once from a fixed seed.
pub static ZOBRIST: Lazy<ZobristKeys> = Lazy::new(ZobristKeys::new);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Color, Piece};

    #[test]
    fn keys_are_deterministic_across_instances() {
        let a = ZobristKeys::new();
        let b = ZobristKeys::new();
        let k = Kind::new(Piece::Horse, Color::Black);
        let sq = Square::new(3, 4);
        assert_eq!(a.key(k, sq), b.key(k, sq));
        assert_eq!(a.side_key, b.side_key);
    }

    #[test]
    fn distinct_kinds_and_squares_get_distinct_keys() {
        let k1 = Kind::new(Piece::Rook, Color::Red);
        let k2 = Kind::new(Piece::Rook, Color::Black);
        let sq = Square::new(0, 0);
        assert_ne!(ZOBRIST.key(k1, sq), ZOBRIST.key(k2, sq));
        let sq2 = Square::new(0, 1);
        assert_ne!(ZOBRIST.key(k1, sq), ZOBRIST.key(k1, sq2));
    }
}
