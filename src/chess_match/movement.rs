use super::board::{Board, ReachableSquares};
use super::model::{ChessField, Color, Piece, PieceKind};

const ROOK_DIRECTIONS: [(isize, isize); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];
const BISHOP_DIRECTIONS: [(isize, isize); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
const QUEEN_DIRECTIONS: [(isize, isize); 8] =
    [(-1, -1), (-1, 1), (1, -1), (1, 1), (0, -1), (0, 1), (-1, 0), (1, 0)];
const KING_STEPS: [(isize, isize); 8] =
    [(-1, -1), (-1, 0), (-1, 1), (0, -1), (0, 1), (1, -1), (1, 0), (1, 1)];
const KNIGHT_STEPS: [(isize, isize); 8] =
    [(-2, -1), (-1, -2), (1, -2), (2, -1), (2, 1), (1, 2), (-1, 2), (-2, 1)];

impl Piece {
    /// Squares this piece can reach from `from` on the given board,
    /// honoring its movement geometry and blocking/capture rules. The
    /// board is a read-only view; whether a reached square would expose
    /// the own king is for the match orchestrator to decide.
    pub fn reachable_squares(&self, from: ChessField, board: &Board) -> ReachableSquares {
        match self.kind {
            PieceKind::Pawn => pawn_squares(self, from, board),
            PieceKind::Knight => step_squares(self.color, from, board, &KNIGHT_STEPS),
            PieceKind::Bishop => sliding_squares(self.color, from, board, &BISHOP_DIRECTIONS),
            PieceKind::Rook => sliding_squares(self.color, from, board, &ROOK_DIRECTIONS),
            PieceKind::Queen => sliding_squares(self.color, from, board, &QUEEN_DIRECTIONS),
            PieceKind::King => step_squares(self.color, from, board, &KING_STEPS),
        }
    }
}

/// Sliding pieces (bishop, rook, queen): walk each direction until the edge,
/// an own piece (blocked) or an opposing piece (capturable, then blocked).
fn sliding_squares(
    color: Color,
    from: ChessField,
    board: &Board,
    directions: &[(isize, isize)],
) -> ReachableSquares {
    let mut reachable = ReachableSquares::none();

    for &(dx, dy) in directions {
        let mut row = from.row as isize;
        let mut col = from.col as isize;

        loop {
            row += dx;
            col += dy;

            if !(0..8).contains(&row) || !(0..8).contains(&col) {
                break;
            }

            let field = ChessField::new(row as u8, col as u8);
            match board.piece_at(field) {
                None => reachable.mark(field),
                Some(other) => {
                    if other.color != color {
                        reachable.mark(field);
                    }
                    break;
                }
            }
        }
    }

    reachable
}

/// Single-step pieces (king, knight).
fn step_squares(
    color: Color,
    from: ChessField,
    board: &Board,
    steps: &[(isize, isize)],
) -> ReachableSquares {
    let mut reachable = ReachableSquares::none();

    for &(dx, dy) in steps {
        let row = from.row as isize + dx;
        let col = from.col as isize + dy;

        if !(0..8).contains(&row) || !(0..8).contains(&col) {
            continue;
        }

        let field = ChessField::new(row as u8, col as u8);
        match board.piece_at(field) {
            None => reachable.mark(field),
            Some(other) if other.color != color => reachable.mark(field),
            Some(_) => {}
        }
    }

    reachable
}

/// Pawns advance one square, two from their initial square (move counter
/// still zero) and capture diagonally. En passant and promotion are not
/// modeled.
fn pawn_squares(piece: &Piece, from: ChessField, board: &Board) -> ReachableSquares {
    let mut reachable = ReachableSquares::none();
    let forward: isize = match piece.color {
        Color::White => 1,
        Color::Black => -1,
    };

    let one_row = from.row as isize + forward;
    if !(0..8).contains(&one_row) {
        return reachable;
    }

    let one_forward = ChessField::new(one_row as u8, from.col);
    if !board.is_occupied(one_forward) {
        reachable.mark(one_forward);

        let two_row = from.row as isize + 2 * forward;
        if piece.move_count == 0 && (0..8).contains(&two_row) {
            let two_forward = ChessField::new(two_row as u8, from.col);
            if !board.is_occupied(two_forward) {
                reachable.mark(two_forward);
            }
        }
    }

    for dcol in [-1isize, 1] {
        let col = from.col as isize + dcol;
        if !(0..8).contains(&col) {
            continue;
        }
        let field = ChessField::new(one_row as u8, col as u8);
        if let Some(other) = board.piece_at(field) {
            if other.color != piece.color {
                reachable.mark(field);
            }
        }
    }

    reachable
}
