//! Position representation: bitboards, mailbox, incremental Zobrist hash,
//! make/unmake, and FEN I/O (spec section 3, section 4.1).

use crate::bitboard::Bitboard;
use crate::error::FenError;
use crate::types::{Color, Kind, Move, Piece, Square, Undo, NUM_KINDS, NUM_SQUARES};
use crate::zobrist::ZOBRIST;

/// A Xiangqi position: per-(piece,color) bitboards, per-color occupancy,
/// a redundant mailbox, side to move, running Zobrist hash, and the hash
/// history used for repetition detection.
#[derive(Clone, Debug)]
pub struct Position {
    piece_bb: [Bitboard; NUM_KINDS],
    color_bb: [Bitboard; 2],
    mailbox: [Option<Kind>; NUM_SQUARES],
    side_to_move: Color,
    zobrist: u64,
    history: Vec<u64>,
}

impl Position {
    pub fn piece_bb(&self, kind: Kind) -> Bitboard {
        self.piece_bb[kind.index()]
    }

    pub fn color_bb(&self, color: Color) -> Bitboard {
        self.color_bb[color.index()]
    }

    pub fn occupancy(&self) -> Bitboard {
        self.color_bb[0] | self.color_bb[1]
    }

    pub fn piece_at(&self, sq: Square) -> Option<Kind> {
        self.mailbox[sq.index()]
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn zobrist(&self) -> u64 {
        self.zobrist
    }

    pub fn history(&self) -> &[u64] {
        &self.history
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.piece_bb(Kind::new(Piece::King, color)).lsb()
    }

    /// Recomputes the Zobrist hash from scratch. Used to check the
    /// incremental hash (spec section 8, property 2) and to build the
    /// initial/FEN hash.
    pub fn recompute_hash(&self) -> u64 {
        let mut h = 0u64;
        for idx in 0..NUM_SQUARES {
            if let Some(kind) = self.mailbox[idx] {
                h ^= ZOBRIST.key(kind, Square(idx as u8));
            }
        }
        if self.side_to_move == Color::Black {
            h ^= ZOBRIST.side_key;
        }
        h
    }

    fn empty() -> Position {
        Position {
            piece_bb: [Bitboard::EMPTY; NUM_KINDS],
            color_bb: [Bitboard::EMPTY; 2],
            mailbox: [None; NUM_SQUARES],
            side_to_move: Color::Red,
            zobrist: 0,
            history: Vec::new(),
        }
    }

    fn place(&mut self, kind: Kind, sq: Square) {
        self.piece_bb[kind.index()].set(sq);
        self.color_bb[kind.color().index()].set(sq);
        self.mailbox[sq.index()] = Some(kind);
    }

    fn finish_setup(&mut self) {
        self.zobrist = self.recompute_hash();
        self.history.clear();
        self.history.push(self.zobrist);
    }

    /// The standard Xiangqi starting position.
    pub fn initial() -> Position {
        Position::from_fen(
            "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR w - - 0 1",
        )
        .expect("initial FEN is well-formed")
    }

    /// Parses a standard Xiangqi FEN (spec section 6). The last four
    /// fields (side-to-move plus three ignored fields) are required to be
    /// present but only the side-to-move token is consulted.
    pub fn from_fen(fen: &str) -> Result<Position, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 2 {
            return Err(FenError::MissingField);
        }
        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 10 {
            return Err(FenError::WrongRankCount(ranks.len()));
        }

        let mut pos = Position::empty();
        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let mut file = 0u8;
            for c in rank_str.chars() {
                if let Some(d) = c.to_digit(10) {
                    file += d as u8;
                    continue;
                }
                if file >= 9 {
                    return Err(FenError::WrongRankCount(rank_idx));
                }
                let color = if c.is_ascii_uppercase() {
                    Color::Red
                } else {
                    Color::Black
                };
                let piece = match c.to_ascii_lowercase() {
                    'k' => Piece::King,
                    'a' => Piece::Guard,
                    'b' | 'e' => Piece::Elephant,
                    'n' | 'h' => Piece::Horse,
                    'r' => Piece::Rook,
                    'c' => Piece::Cannon,
                    'p' => Piece::Pawn,
                    other => return Err(FenError::UnknownPiece(other)),
                };
                pos.place(Kind::new(piece, color), Square::new(rank_idx as u8, file));
                file += 1;
            }
        }

        pos.side_to_move = match parts[1] {
            "w" | "r" => Color::Red,
            "b" => Color::Black,
            other => return Err(FenError::BadSideToMove(other.to_string())),
        };

        pos.finish_setup();
        Ok(pos)
    }

    /// Serializes back to FEN, inverse of `from_fen`.
    pub fn to_fen(&self) -> String {
        let mut ranks = Vec::with_capacity(10);
        for rank in 0..10u8 {
            let mut s = String::new();
            let mut empties = 0u8;
            for file in 0..9u8 {
                let sq = Square::new(rank, file);
                match self.mailbox[sq.index()] {
                    None => empties += 1,
                    Some(kind) => {
                        if empties > 0 {
                            s.push_str(&empties.to_string());
                            empties = 0;
                        }
                        s.push(kind_to_char(kind));
                    }
                }
            }
            if empties > 0 {
                s.push_str(&empties.to_string());
            }
            ranks.push(s);
        }
        let side = if self.side_to_move == Color::Red { "w" } else { "b" };
        format!("{} {} - - 0 1", ranks.join("/"), side)
    }

    /// Applies `m`, updating bitboards, mailbox, hash, side to move, and
    /// history. Returns the undo token needed by `unmake`. Assumes `m` is
    /// at least pseudo-legal; the caller is responsible for legality
    /// (spec section 7).
    pub fn make(&mut self, m: Move) -> Undo {
        let moving = self.mailbox[m.from.index()].expect("make: no piece on from-square");
        let captured = self.mailbox[m.to.index()];

        self.zobrist ^= ZOBRIST.key(moving, m.from) ^ ZOBRIST.key(moving, m.to);
        if let Some(cap) = captured {
            self.zobrist ^= ZOBRIST.key(cap, m.to);
            self.piece_bb[cap.index()].clear(m.to);
            self.color_bb[cap.color().index()].clear(m.to);
        }

        self.piece_bb[moving.index()].clear(m.from);
        self.piece_bb[moving.index()].set(m.to);
        self.color_bb[moving.color().index()].clear(m.from);
        self.color_bb[moving.color().index()].set(m.to);

        self.mailbox[m.from.index()] = None;
        self.mailbox[m.to.index()] = Some(moving);

        self.zobrist ^= ZOBRIST.side_key;
        self.side_to_move = self.side_to_move.opponent();
        self.history.push(self.zobrist);

        Undo { captured }
    }

    /// Reverses `make`, restoring the position to byte-for-byte the state
    /// before the move (spec section 8, property 1).
    pub fn unmake(&mut self, m: Move, undo: Undo) {
        self.history.pop();
        self.side_to_move = self.side_to_move.opponent();
        self.zobrist ^= ZOBRIST.side_key;

        let moving = self.mailbox[m.to.index()].expect("unmake: no piece on to-square");
        self.zobrist ^= ZOBRIST.key(moving, m.from) ^ ZOBRIST.key(moving, m.to);

        self.piece_bb[moving.index()].clear(m.to);
        self.piece_bb[moving.index()].set(m.from);
        self.color_bb[moving.color().index()].clear(m.to);
        self.color_bb[moving.color().index()].set(m.from);
        self.mailbox[m.from.index()] = Some(moving);

        if let Some(cap) = undo.captured {
            self.zobrist ^= ZOBRIST.key(cap, m.to);
            self.piece_bb[cap.index()].set(m.to);
            self.color_bb[cap.color().index()].set(m.to);
            self.mailbox[m.to.index()] = Some(cap);
        } else {
            self.mailbox[m.to.index()] = None;
        }
    }

    /// Toggles side to move without moving a piece, for null-move pruning
    /// (spec section 4.6.3). Not recorded in `history`: it never reaches a
    /// position actually played.
    pub fn make_null(&mut self) {
        self.zobrist ^= ZOBRIST.side_key;
        self.side_to_move = self.side_to_move.opponent();
    }

    pub fn unmake_null(&mut self) {
        self.zobrist ^= ZOBRIST.side_key;
        self.side_to_move = self.side_to_move.opponent();
    }

    /// True if the current hash has already appeared more than once in
    /// `history` (spec section 4.6.3, section 9 open question 2).
    pub fn is_repetition(&self) -> bool {
        self.history.iter().filter(|&&h| h == self.zobrist).count() > 1
    }

    /// Count of rook+horse+cannon pieces for `color`, used to gate
    /// null-move pruning (spec section 4.6.3).
    pub fn attacking_piece_count(&self, color: Color) -> u32 {
        [Piece::Rook, Piece::Horse, Piece::Cannon]
            .iter()
            .map(|&p| self.piece_bb(Kind::new(p, color)).popcount())
            .sum()
    }

    /// Legal moves for the side to move (spec section 6 external interface).
    pub fn legal_moves(&self) -> Vec<Move> {
        crate::movegen::legal_moves(self)
    }
}

fn kind_to_char(kind: Kind) -> char {
    let c = match kind.piece() {
        Piece::King => 'k',
        Piece::Guard => 'a',
        Piece::Elephant => 'b',
        Piece::Horse => 'n',
        Piece::Rook => 'r',
        Piece::Cannon => 'c',
        Piece::Pawn => 'p',
    };
    if kind.color() == Color::Red {
        c.to_ascii_uppercase()
    } else {
        c
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movegen::legal_moves;

    #[test]
    fn initial_position_has_expected_invariants() {
        let pos = Position::initial();
        assert_eq!(pos.side_to_move(), Color::Red);
        assert_eq!(pos.recompute_hash(), pos.zobrist());
        assert_eq!(pos.color_bb(Color::Red).popcount(), 16);
        assert_eq!(pos.color_bb(Color::Black).popcount(), 16);
        assert!((pos.color_bb(Color::Red) & pos.color_bb(Color::Black)).is_empty());
    }

    #[test]
    fn fen_roundtrip() {
        let pos = Position::initial();
        let fen = pos.to_fen();
        let pos2 = Position::from_fen(&fen).unwrap();
        assert_eq!(pos.zobrist(), pos2.zobrist());
        assert_eq!(fen, pos2.to_fen());
    }

    #[test]
    fn make_unmake_roundtrip_restores_hash_and_history() {
        let mut pos = Position::initial();
        let before_hash = pos.zobrist();
        let before_history = pos.history().to_vec();
        let mv = legal_moves(&pos)[0];
        let undo = pos.make(mv);
        assert_ne!(pos.zobrist(), before_hash);
        pos.unmake(mv, undo);
        assert_eq!(pos.zobrist(), before_hash);
        assert_eq!(pos.history(), before_history.as_slice());
        assert_eq!(pos.recompute_hash(), pos.zobrist());
    }

    #[test]
    fn malformed_fen_is_surfaced_not_panicking() {
        assert!(Position::from_fen("bad").is_err());
        assert!(matches!(
            Position::from_fen("9/9/9/9/9/9/9/9/9/9 x - - 0 1"),
            Err(FenError::BadSideToMove(_))
        ));
    }
}
