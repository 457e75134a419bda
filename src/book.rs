//! Persistent opening book: a read-only Zobrist-key -> candidate-move
//! lookup, loaded once at engine construction (spec section 4.7, section 6).
//!
//! Construction is modeled on the teacher's Zobrist-table loading style
//! (fixed-seed `StdRng` for reproducible-under-seed randomness), but the
//! book itself - JSON on disk, malformed entries skipped individually - has
//! no analogue in the teacher repo (chess, unlike Xiangqi here, has no
//! book concept in this codebase); it is grounded directly in spec section
//! 6's external-interface description.

use std::collections::HashMap;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;

use crate::error::BookError;
use crate::types::{Move, Square};

pub struct OpeningBook {
    pub(crate) moves: HashMap<u64, Vec<Move>>,
    rng: StdRng,
}

impl OpeningBook {
    /// An empty book: used when no book path is configured, or when loading
    /// fails (spec section 7: "log once, continue without book").
    pub fn empty() -> Self {
        OpeningBook {
            moves: HashMap::new(),
            rng: StdRng::seed_from_u64(0xB00C_0000_u64),
        }
    }

    /// Loads a book from `path`. The whole load fails only on file-I/O
    /// error or a non-object JSON root; any individual key/value pair that
    /// cannot be parsed is skipped without failing the rest of the load
    /// (spec section 6, section 7: "book entry skipped").
    pub fn load(path: &Path) -> Result<OpeningBook, BookError> {
        let text = std::fs::read_to_string(path)?;
        let root: Value = serde_json::from_str(&text)?;
        let obj = root.as_object().ok_or(BookError::NotAnObject)?;

        let mut moves = HashMap::with_capacity(obj.len());
        for (key, value) in obj {
            let Ok(hash) = key.parse::<u64>() else {
                continue;
            };
            let Some(parsed) = parse_move_list(value) else {
                continue;
            };
            if !parsed.is_empty() {
                moves.insert(hash, parsed);
            }
        }

        Ok(OpeningBook {
            moves,
            rng: StdRng::seed_from_u64(0xB00C_0000_u64),
        })
    }

    /// Returns a uniformly random legal book move for `hash`, if any book
    /// entry intersects `legal`. A dedicated, seeded RNG is used so play
    /// stays reproducible under a fixed seed (spec section 4.7).
    pub fn pick(&mut self, hash: u64, legal: &[Move]) -> Option<Move> {
        let candidates = self.moves.get(&hash)?;
        let intersection: Vec<Move> = candidates.iter().copied().filter(|m| legal.contains(m)).collect();
        if intersection.is_empty() {
            return None;
        }
        let idx = self.rng.gen_range(0..intersection.len());
        Some(intersection[idx])
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

/// Parses `[[from_rank, from_file], [to_rank, to_file]], ...]`. Returns
/// `None` only if `value` itself isn't an array; individual malformed moves
/// within it are simply dropped, matching "malformed entries cause the
/// entry (not the whole file) to be skipped."
fn parse_move_list(value: &Value) -> Option<Vec<Move>> {
    let arr = value.as_array()?;
    Some(arr.iter().filter_map(parse_move).collect())
}

fn parse_move(value: &Value) -> Option<Move> {
    let pair = value.as_array()?;
    if pair.len() != 2 {
        return None;
    }
    let from = parse_square(&pair[0])?;
    let to = parse_square(&pair[1])?;
    Some(Move::new(from, to))
}

fn parse_square(value: &Value) -> Option<Square> {
    let pair = value.as_array()?;
    if pair.len() != 2 {
        return None;
    }
    let rank = pair[0].as_u64()?;
    let file = pair[1].as_u64()?;
    if rank >= 10 || file >= 9 {
        return None;
    }
    Some(Square::new(rank as u8, file as u8))
}
