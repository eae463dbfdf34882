use super::model::{ChessField, Color, Piece, PieceKind};

/// One cell of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Square {
    Occupied(Piece),
    Empty,
}

/// Fixed 8x8 store mapping a coordinate to at most one piece. The live
/// roster of a match is exactly the set of pieces placed here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: [[Square; 8]; 8],
}

impl Board {
    pub fn new() -> Self {
        Self {
            squares: [[Square::Empty; 8]; 8],
        }
    }

    pub fn piece_at(&self, field: ChessField) -> Option<&Piece> {
        match &self.squares[field.row as usize][field.col as usize] {
            Square::Occupied(piece) => Some(piece),
            Square::Empty => None,
        }
    }

    pub fn is_occupied(&self, field: ChessField) -> bool {
        matches!(
            self.squares[field.row as usize][field.col as usize],
            Square::Occupied(_)
        )
    }

    /// Places a piece on an empty square.
    pub fn place(&mut self, field: ChessField, piece: Piece) {
        debug_assert!(!self.is_occupied(field), "place on occupied {}", field);
        self.squares[field.row as usize][field.col as usize] = Square::Occupied(piece);
    }

    pub fn remove(&mut self, field: ChessField) -> Option<Piece> {
        match std::mem::replace(
            &mut self.squares[field.row as usize][field.col as usize],
            Square::Empty,
        ) {
            Square::Occupied(piece) => Some(piece),
            Square::Empty => None,
        }
    }

    /// Iterates over all pieces on the board along with their coordinates,
    /// in row-major order.
    pub fn pieces_with_coordinates<'a>(&'a self) -> impl Iterator<Item = (ChessField, &'a Piece)> {
        (0..8u8)
            .flat_map(|row| (0..8u8).map(move |col| ChessField::new(row, col)))
            .filter_map(move |field| self.piece_at(field).map(|piece| (field, piece)))
    }

    pub fn pieces_of_color<'a>(&'a self, color: Color) -> impl Iterator<Item = (ChessField, &'a Piece)> {
        self.pieces_with_coordinates()
            .filter(move |(_, piece)| piece.color == color)
    }

    pub fn find_king(&self, color: Color) -> Option<ChessField> {
        self.pieces_of_color(color)
            .find(|(_, piece)| piece.kind == PieceKind::King)
            .map(|(field, _)| field)
    }

    pub fn render_to_string(&self) -> String {
        let mut board_representation = String::new();
        board_representation.push_str("    a   b   c   d   e   f   g   h  \n");
        board_representation.push_str("  ┌───┬───┬───┬───┬───┬───┬───┬───┐\n");

        for row in (0..8).rev() {
            board_representation.push_str(&format!("{} │", row + 1));
            for col in 0..8 {
                let symbol = match &self.squares[row][col] {
                    Square::Empty => ' ',
                    Square::Occupied(piece) => piece.to_char(),
                };
                board_representation.push_str(&format!(" {} │", symbol));
            }
            board_representation.push_str(&format!(" {}\n", row + 1));

            if row > 0 {
                board_representation.push_str("  ├───┼───┼───┼───┼───┼───┼───┼───┤\n");
            }
        }

        board_representation.push_str("  └───┴───┴───┴───┴───┴───┴───┴───┘\n");
        board_representation.push_str("    a   b   c   d   e   f   g   h  \n");

        board_representation
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Board-shaped boolean matrix as produced by the per-piece movement rules.
/// A marked square is one the piece can reach under its own geometry and
/// blocking rules; king exposure is deliberately not part of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReachableSquares([[bool; 8]; 8]);

impl ReachableSquares {
    pub fn none() -> Self {
        Self([[false; 8]; 8])
    }

    pub fn mark(&mut self, field: ChessField) {
        self.0[field.row as usize][field.col as usize] = true;
    }

    pub fn contains(&self, field: ChessField) -> bool {
        self.0[field.row as usize][field.col as usize]
    }

    /// True when no square at all is marked.
    pub fn is_empty(&self) -> bool {
        self.0.iter().flatten().all(|marked| !marked)
    }

    /// Iterates over the marked squares in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = ChessField> + '_ {
        (0..8u8)
            .flat_map(|row| (0..8u8).map(move |col| ChessField::new(row, col)))
            .filter(move |field| self.contains(*field))
    }

    pub fn as_matrix(&self) -> &[[bool; 8]; 8] {
        &self.0
    }
}
