pub mod board;
pub mod error;
pub mod match_state;
pub mod model;
mod movement;
pub mod setup;
pub mod test_utils;

pub use board::{Board, ReachableSquares, Square};
pub use error::MoveError;
pub use match_state::ChessMatch;
pub use model::{ChessField, Color, Piece, PieceId, PieceKind};
pub use setup::{MatchSetup, Placement, SetupError};
