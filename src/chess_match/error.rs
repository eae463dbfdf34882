use super::model::ChessField;
use thiserror::Error;

/// Move rejections surfaced by the match orchestrator. All of them leave
/// the match state untouched; picking another move is entirely up to the
/// caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    /// The source square is empty.
    #[error("there is no piece on {0}")]
    NoPieceAtSource(ChessField),

    /// The piece on the source square belongs to the player not on turn.
    #[error("the piece on {0} is not yours")]
    WrongColorPiece(ChessField),

    /// The chosen piece cannot reach any square at all.
    #[error("there is no possible move for the piece on {0}")]
    NoLegalMoves(ChessField),

    /// The target square is not in the piece's reachable set.
    #[error("the piece on {from} cannot move to {to}")]
    IllegalTarget { from: ChessField, to: ChessField },

    /// The move would leave the mover's own king attacked.
    #[error("you cannot put yourself in check")]
    SelfCheckViolation,
}
