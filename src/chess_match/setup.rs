use super::model::{ChessField, Color, PieceKind};
use lazy_static::lazy_static;
use thiserror::Error;

/// One entry of the initial placement: which piece goes where.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub color: Color,
    pub kind: PieceKind,
    pub square: ChessField,
}

/// The initial roster of a match, supplied as configuration instead of
/// being hard-coded. A setup is only accepted by
/// [`ChessMatch::new`](super::ChessMatch::new) if no square is assigned
/// twice and each color has exactly one king.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSetup {
    placements: Vec<Placement>,
}

impl MatchSetup {
    pub fn empty() -> Self {
        Self {
            placements: Vec::new(),
        }
    }

    pub fn new(placements: Vec<Placement>) -> Self {
        Self { placements }
    }

    /// Builder-style placement from an algebraic square literal. Panics on
    /// a malformed square, like [`ChessField::from_algebraic`].
    pub fn with(mut self, color: Color, kind: PieceKind, square: &str) -> Self {
        self.placements.push(Placement {
            color,
            kind,
            square: ChessField::from_algebraic(square),
        });
        self
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// The regular chess starting position, all 32 pieces.
    pub fn standard() -> Self {
        STANDARD_SETUP.clone()
    }
}

/// Faults in a caller-supplied setup, reported before any match state
/// exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("square {0} is assigned to more than one piece")]
    SquareOccupied(ChessField),

    #[error("the setup has no {0} king")]
    MissingKing(Color),

    #[error("the setup has more than one {0} king")]
    DuplicateKing(Color),
}

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

lazy_static! {
    static ref STANDARD_SETUP: MatchSetup = {
        let mut placements = Vec::with_capacity(32);
        for (col, &kind) in BACK_RANK.iter().enumerate() {
            let col = col as u8;
            placements.push(Placement {
                color: Color::White,
                kind,
                square: ChessField::new(0, col),
            });
            placements.push(Placement {
                color: Color::White,
                kind: PieceKind::Pawn,
                square: ChessField::new(1, col),
            });
            placements.push(Placement {
                color: Color::Black,
                kind,
                square: ChessField::new(7, col),
            });
            placements.push(Placement {
                color: Color::Black,
                kind: PieceKind::Pawn,
                square: ChessField::new(6, col),
            });
        }
        MatchSetup::new(placements)
    };
}
