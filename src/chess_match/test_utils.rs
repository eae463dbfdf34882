use super::board::{Board, ReachableSquares};
use super::match_state::ChessMatch;
use super::model::{ChessField, Color, Piece, PieceId, PieceKind};
use super::setup::MatchSetup;

/// Maps a FEN-style piece letter to color and kind; uppercase is white.
#[cfg(test)]
fn parse_symbol(symbol: &str) -> (Color, PieceKind) {
    let color = if symbol.chars().all(|c| c.is_ascii_uppercase()) {
        Color::White
    } else {
        Color::Black
    };
    let kind = match symbol.to_ascii_lowercase().as_str() {
        "p" => PieceKind::Pawn,
        "n" => PieceKind::Knight,
        "b" => PieceKind::Bishop,
        "r" => PieceKind::Rook,
        "q" => PieceKind::Queen,
        "k" => PieceKind::King,
        other => panic!("unknown piece symbol: {}", other),
    };
    (color, kind)
}

/// Builds a match from ("K", "e1")-style placements. White is on turn.
#[cfg(test)]
pub fn match_from(placements: &[(&str, &str)]) -> ChessMatch {
    let mut setup = MatchSetup::empty();
    for &(symbol, square) in placements {
        let (color, kind) = parse_symbol(symbol);
        setup = setup.with(color, kind, square);
    }
    ChessMatch::new(&setup).expect("test setup must be valid")
}

/// Builds a bare board from the same placement notation, for movement
/// tests that do not need a full match.
#[cfg(test)]
pub fn board_from(placements: &[(&str, &str)]) -> Board {
    let mut board = Board::new();
    for (index, &(symbol, square)) in placements.iter().enumerate() {
        let (color, kind) = parse_symbol(symbol);
        board.place(
            ChessField::from_algebraic(square),
            Piece::new(PieceId(index as u8), color, kind),
        );
    }
    board
}

#[cfg(test)]
pub fn assert_reachable(reachable: &ReachableSquares, mut expected: Vec<&str>) {
    let mut actual: Vec<String> = reachable.iter().map(|f| f.as_algebraic()).collect();
    actual.sort();
    expected.sort();

    assert_eq!(actual, expected);
}
