//! Development-only perft/divide CLI, grounded in the teacher's
//! `src/bin/perft_divide.rs`. Not a playing front-end: out of scope per
//! spec section 1 covers GUIs/consoles for *playing*, not developer
//! tooling used while building the move generator.

use std::time::Instant;

use xiangqi_engine::board::Position;
use xiangqi_engine::movegen::perft_divide;

fn main() {
    let mut args = std::env::args().skip(1);
    let fen = args
        .next()
        .unwrap_or_else(|| "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR w - - 0 1".to_string());
    let depth: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(3);

    let mut pos = Position::from_fen(&fen).unwrap_or_else(|e| {
        eprintln!("invalid FEN '{fen}': {e}");
        std::process::exit(1);
    });

    println!("perft divide, depth {depth}, fen: {fen}");
    let start = Instant::now();
    let total = perft_divide(&mut pos, depth);
    let elapsed = start.elapsed();
    println!("total: {total} in {elapsed:?}");
}
