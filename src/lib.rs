//! A chess rule engine. The [`ChessMatch`] orchestrator validates and
//! executes moves, answers king-safety questions through a speculative
//! execute/observe/revert protocol and detects check and checkmate by
//! exhaustive search over the legal replies.
//!
//! The crate is a plain in-process library: no I/O, no threads, and a
//! match is an owned value, so any number of games can run side by side.

pub mod chess_match;

pub use chess_match::{
    Board, ChessField, ChessMatch, Color, MatchSetup, MoveError, Piece, PieceId, PieceKind,
    Placement, ReachableSquares, SetupError, Square,
};
