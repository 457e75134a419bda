//! Negamax search with alpha-beta pruning, a transposition table,
//! quiescence search, null-move pruning, and late-move reductions
//! (spec section 4.6).

use std::time::{Duration, Instant};

use crate::board::Position;
use crate::eval::{evaluate, MATE};
use crate::movegen::{in_check, legal_captures, legal_moves};
use crate::ordering::{is_quiet, order_moves, HistoryTable};
use crate::transposition_table::{BoundType, TranspositionTable};
use crate::types::Move;

/// Node counter checked every `NODE_CHECK_INTERVAL` nodes to test the time
/// budget, so the cancellation check itself stays cheap (spec section 4.6.2).
pub const NODE_CHECK_INTERVAL: u64 = 2048;

/// Raised internally when the time budget is exhausted mid-search. Never
/// surfaced to callers: the last completed iteration's move is kept instead
/// (spec section 4.6.2, section 7).
struct SearchCancelled;

pub struct SearchContext<'a> {
    pub tt: &'a mut TranspositionTable,
    pub history: &'a mut HistoryTable,
    pub nodes: u64,
    deadline: Option<Instant>,
}

impl<'a> SearchContext<'a> {
    pub fn new(tt: &'a mut TranspositionTable, history: &'a mut HistoryTable, deadline: Option<Instant>) -> Self {
        SearchContext {
            tt,
            history,
            nodes: 0,
            deadline,
        }
    }

    fn check_time(&mut self) -> Result<(), SearchCancelled> {
        self.nodes += 1;
        if self.nodes % NODE_CHECK_INTERVAL != 0 {
            return Ok(());
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(SearchCancelled);
            }
        }
        Ok(())
    }
}

/// Negamax alpha-beta search to `depth` plies, returning a score from the
/// side-to-move's perspective. `ply` is distance from the search root, used
/// for mate-distance scoring (spec section 4.6.3).
fn negamax(
    pos: &mut Position,
    depth: u32,
    mut alpha: i32,
    beta: i32,
    ply: u32,
    allow_null: bool,
    ctx: &mut SearchContext,
) -> Result<i32, SearchCancelled> {
    ctx.check_time()?;

    if ply > 0 && pos.is_repetition() {
        return Ok(0);
    }

    let original_alpha = alpha;
    let hash = pos.zobrist();
    let mut tt_move = None;
    if let Some(entry) = ctx.tt.probe(hash) {
        tt_move = entry.best_move;
        if entry.depth >= depth {
            match entry.bound_type {
                BoundType::Exact => return Ok(entry.score),
                BoundType::LowerBound if entry.score >= beta => return Ok(entry.score),
                BoundType::UpperBound if entry.score <= alpha => return Ok(entry.score),
                _ => {}
            }
        }
    }

    if depth == 0 {
        return quiescence(pos, alpha, beta, ctx);
    }

    let side = pos.side_to_move();
    let in_check_now = in_check(pos, side);

    if allow_null
        && !in_check_now
        && depth >= 3
        && pos.attacking_piece_count(side) > 1
        && ply > 0
    {
        let reduction = 3 + depth / 6;
        pos.make_null();
        let score = if depth > reduction {
            -negamax(pos, depth - 1 - reduction, -beta, -beta + 1, ply + 1, false, ctx)?
        } else {
            -negamax(pos, 0, -beta, -beta + 1, ply + 1, false, ctx)?
        };
        pos.unmake_null();
        if score >= beta {
            ctx.tt.store(hash, depth, beta, BoundType::LowerBound, None);
            return Ok(beta);
        }
    }

    let mut moves = legal_moves(pos);
    if moves.is_empty() {
        return Ok(if in_check_now { -(MATE - ply as i32) } else { 0 });
    }
    order_moves(pos, &mut moves, tt_move, ctx.history);

    let mut best_score = -MATE - 1;
    let mut best_move = None;

    for (i, &m) in moves.iter().enumerate() {
        let quiet = is_quiet(pos, m);
        let undo = pos.make(m);

        // LMR reduces depth only, keeping the same (-beta, -alpha) window for
        // both the reduced and the re-search pass (spec section 9, open
        // question 5: the source never introduces a zero-window verification
        // step, so this crate doesn't add one either).
        let reduction = if depth >= 3 && i > 4 && quiet && !in_check_now { 1 } else { 0 };
        let mut score = -negamax(pos, depth - 1 - reduction, -beta, -alpha, ply + 1, true, ctx)?;
        if reduction > 0 && score > alpha {
            score = -negamax(pos, depth - 1, -beta, -alpha, ply + 1, true, ctx)?;
        }

        pos.unmake(m, undo);

        if score > best_score {
            best_score = score;
            best_move = Some(m);
        }
        if best_score > alpha {
            alpha = best_score;
        }
        if alpha >= beta {
            if quiet {
                let piece = pos.piece_at(m.from).map(|k| k.piece());
                if let Some(piece) = piece {
                    ctx.history.record(piece, m, depth);
                }
            }
            break;
        }
    }

    let bound = if best_score <= original_alpha {
        BoundType::UpperBound
    } else if best_score >= beta {
        BoundType::LowerBound
    } else {
        BoundType::Exact
    };
    ctx.tt.store(hash, depth, best_score, bound, best_move);

    Ok(best_score)
}

/// Captures-only search from a quiet leaf, stabilizing the static
/// evaluation against hanging pieces (spec section 4.6.4).
fn quiescence(pos: &mut Position, mut alpha: i32, beta: i32, ctx: &mut SearchContext) -> Result<i32, SearchCancelled> {
    ctx.check_time()?;

    let side = pos.side_to_move();
    let stand_pat = if side == crate::types::Color::Red {
        evaluate(pos)
    } else {
        -evaluate(pos)
    };
    if stand_pat >= beta {
        return Ok(stand_pat);
    }
    if stand_pat > alpha {
        alpha = stand_pat;
    }

    let mut captures = legal_captures(pos);
    order_moves(pos, &mut captures, None, ctx.history);

    let mut best_score = stand_pat;
    for m in captures {
        let undo = pos.make(m);
        let score = -quiescence(pos, -beta, -alpha, ctx)?;
        pos.unmake(m, undo);

        if score > best_score {
            best_score = score;
        }
        if best_score > alpha {
            alpha = best_score;
        }
        if alpha >= beta {
            break;
        }
    }

    Ok(best_score)
}

fn root_score(pos: &Position) -> i32 {
    if pos.side_to_move() == crate::types::Color::Red {
        evaluate(pos)
    } else {
        -evaluate(pos)
    }
}

/// Iterative deepening to a fixed depth, returning the side-to-move-signed
/// score and best move found (spec section 4.6.1).
pub fn search_to_depth(
    pos: &Position,
    max_depth: u32,
    tt: &mut TranspositionTable,
    history: &mut HistoryTable,
) -> (i32, Option<Move>) {
    iterative_deepening(pos, max_depth, None, tt, history)
}

/// Iterative deepening until `budget` elapses, returning the best move
/// found by the last fully-completed iteration (spec section 4.6.1,
/// section 4.6.2).
pub fn search_for_time(
    pos: &Position,
    budget: Duration,
    tt: &mut TranspositionTable,
    history: &mut HistoryTable,
) -> (i32, Option<Move>) {
    iterative_deepening(pos, u32::MAX, Some(Instant::now() + budget), tt, history)
}

fn iterative_deepening(
    pos: &Position,
    max_depth: u32,
    deadline: Option<Instant>,
    tt: &mut TranspositionTable,
    history: &mut HistoryTable,
) -> (i32, Option<Move>) {
    let mut best = (root_score(pos), None::<Move>);
    let mut scratch = pos.clone();

    let mut depth = 1;
    while depth <= max_depth {
        tt.new_generation();
        #[cfg(feature = "logging")]
        log::trace!("iterative deepening: starting depth {depth}, tt generation {}", tt.generation);
        let mut ctx = SearchContext::new(tt, history, deadline);
        match negamax(&mut scratch, depth, -MATE - 1, MATE + 1, 0, true, &mut ctx) {
            Ok(score) => {
                let mv = ctx.tt.probe(scratch.zobrist()).and_then(|e| e.best_move);
                best = (score, mv);
            }
            Err(SearchCancelled) => {
                #[cfg(feature = "logging")]
                log::debug!("search cancelled mid-depth {depth}; keeping depth {} result", depth - 1);
                break;
            }
        }
        if depth >= MATE as u32 {
            break;
        }
        depth += 1;
    }

    best
}
