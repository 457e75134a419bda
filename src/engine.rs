//! Search driver: selects a book move first, otherwise runs depth- or
//! time-bounded iterative deepening (spec section 2 "Controller", section
//! 4.6.1, section 4.7).

use std::path::Path;
use std::time::Duration;

use crate::board::Position;
use crate::book::OpeningBook;
use crate::ordering::HistoryTable;
use crate::search::{search_for_time, search_to_depth};
use crate::transposition_table::TranspositionTable;
use crate::types::Move;

/// Tunable engine parameters, modeled on the teacher's `SearchOptions`:
/// sane defaults, overridable by the embedding caller.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Transposition table size in megabytes.
    pub tt_size_mb: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig { tt_size_mb: 64 }
    }
}

/// The engine's owned mutable state: transposition table, history-heuristic
/// table, and the immutable opening book loaded at construction (spec
/// section 3 "Lifecycle", section 5 "Shared resources").
pub struct Engine {
    config: EngineConfig,
    tt: TranspositionTable,
    history: HistoryTable,
    book: OpeningBook,
}

impl Engine {
    /// Builds an engine with default configuration and no opening book.
    pub fn new() -> Self {
        Engine::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Engine {
            tt: TranspositionTable::new(config.tt_size_mb),
            history: HistoryTable::new(),
            book: OpeningBook::empty(),
            config,
        }
    }

    /// Builds an engine and attempts to load an opening book from `path`.
    /// A load failure is logged once and the engine continues without a
    /// book (spec section 7: "Book load failure -> log once, continue
    /// without book").
    pub fn with_book(config: EngineConfig, path: &Path) -> Self {
        let book = match OpeningBook::load(path) {
            Ok(book) => book,
            Err(_err) => {
                #[cfg(feature = "logging")]
                log::warn!("failed to load opening book from {path:?}: {_err}");
                OpeningBook::empty()
            }
        };
        Engine {
            tt: TranspositionTable::new(config.tt_size_mb),
            history: HistoryTable::new(),
            book,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Clears transient search state: TT, history-heuristic table (spec
    /// section 4.6.1: "clear transient state ... before iterative
    /// deepening"). The book is immutable and untouched.
    fn reset_transient_state(&mut self) {
        self.tt = TranspositionTable::new(self.config.tt_size_mb);
        self.history.clear();
    }

    /// Book lookup first; if no book move applies, falls through to search
    /// (spec section 2 "Data flow", section 4.7).
    fn book_move(&mut self, pos: &Position) -> Option<Move> {
        let legal = pos.legal_moves();
        self.book.pick(pos.zobrist(), &legal)
    }

    /// Fixed-depth iterative deepening, returning the deepest completed
    /// `(score, move)` (spec section 4.6.1).
    pub fn search_by_depth(&mut self, position: &Position, depth: u32) -> (i32, Option<Move>) {
        if let Some(mv) = self.book_move(position) {
            return (side_to_move_score(position), Some(mv));
        }
        self.reset_transient_state();
        #[cfg(feature = "logging")]
        log::debug!("search_by_depth: depth={depth}");
        search_to_depth(position, depth, &mut self.tt, &mut self.history)
    }

    /// Time-bounded iterative deepening: iterates depth 1..63 until
    /// `seconds` elapses, returning the last fully-completed iteration's
    /// root move (spec section 4.6.1, section 4.6.2).
    pub fn search_by_time(&mut self, position: &Position, seconds: f64) -> (i32, Option<Move>) {
        if let Some(mv) = self.book_move(position) {
            return (side_to_move_score(position), Some(mv));
        }
        self.reset_transient_state();
        let budget = Duration::from_secs_f64(seconds.max(0.0));
        #[cfg(feature = "logging")]
        log::debug!("search_by_time: budget={budget:?}");
        search_for_time(position, budget, &mut self.tt, &mut self.history)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}

/// `evaluate` is always from Red's perspective; negate for Black to match
/// `search_by_depth`/`search_by_time`'s side-to-move-signed return value
/// (spec section 4.5).
fn side_to_move_score(pos: &Position) -> i32 {
    let score = crate::eval::evaluate(pos);
    if pos.side_to_move() == crate::types::Color::Red {
        score
    } else {
        -score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_by_depth_returns_a_legal_move_from_the_opening_position() {
        let mut engine = Engine::new();
        let pos = Position::initial();
        let (_, mv) = engine.search_by_depth(&pos, 2);
        let mv = mv.expect("search should find a move");
        assert!(pos.legal_moves().contains(&mv));
    }

    #[test]
    fn search_by_time_returns_a_legal_move_given_a_small_budget() {
        let mut engine = Engine::new();
        let pos = Position::initial();
        let (_, mv) = engine.search_by_time(&pos, 0.05);
        let mv = mv.expect("search should find a move within the time budget");
        assert!(pos.legal_moves().contains(&mv));
    }

    #[test]
    fn book_hit_is_returned_regardless_of_search() {
        use crate::types::Square;

        let mut engine = Engine::new();
        let pos = Position::initial();
        let expected = Move::new(Square::new(9, 1), Square::new(7, 2));
        engine.book.moves.insert(pos.zobrist(), vec![expected]);

        let (_, mv) = engine.search_by_time(&pos, 0.01);
        assert_eq!(mv, Some(expected));
    }
}
