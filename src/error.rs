//! Error types for the fallible boundaries named in spec section 7.

use std::fmt;

/// Malformed FEN input (spec section 7: "Surface to caller").
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FenError {
    MissingField,
    WrongRankCount(usize),
    UnknownPiece(char),
    BadSideToMove(String),
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::MissingField => write!(f, "FEN is missing a required field"),
            FenError::WrongRankCount(n) => write!(f, "FEN has {n} ranks, expected 10"),
            FenError::UnknownPiece(c) => write!(f, "unrecognized FEN piece character '{c}'"),
            FenError::BadSideToMove(s) => write!(f, "unrecognized side-to-move token '{s}'"),
        }
    }
}

impl std::error::Error for FenError {}

/// Opening-book load failure (spec section 7: "Log once, continue without
/// book"). Never propagated past `Engine::new` - see `engine.rs`.
#[derive(Debug)]
pub enum BookError {
    Io(std::io::Error),
    Json(serde_json::Error),
    /// The JSON parsed but its root was not an object (spec section 6: "one
    /// object at the root").
    NotAnObject,
}

impl fmt::Display for BookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookError::Io(e) => write!(f, "could not read opening book file: {e}"),
            BookError::Json(e) => write!(f, "opening book file is not valid JSON: {e}"),
            BookError::NotAnObject => write!(f, "opening book root is not a JSON object"),
        }
    }
}

impl std::error::Error for BookError {}

impl From<std::io::Error> for BookError {
    fn from(e: std::io::Error) -> Self {
        BookError::Io(e)
    }
}

impl From<serde_json::Error> for BookError {
    fn from(e: serde_json::Error) -> Self {
        BookError::Json(e)
    }
}
