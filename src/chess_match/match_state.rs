use super::board::{Board, ReachableSquares};
use super::error::MoveError;
use super::model::{ChessField, Color, Piece, PieceId, PieceKind};
use super::setup::{MatchSetup, SetupError};
use tracing::debug;

/// The match-state orchestrator. Owns the board (the live roster) and the
/// captured ledger, validates and executes moves, and keeps the turn
/// counter, active color and check/checkmate flags in sync.
///
/// King-safety questions are answered speculatively: execute the candidate
/// move, interrogate the derived board state, then exactly reverse it. The
/// protocol is strictly sequential; `&mut self` on the speculative entry
/// points guarantees no other reader observes an intermediate board.
///
/// Once the checkmate flag is set the match is terminal. The orchestrator
/// does not itself refuse further `perform_move` calls; callers are
/// expected to consult [`is_checkmate`](Self::is_checkmate) first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChessMatch {
    board: Board,
    captured: Vec<Piece>,
    turn: u32,
    active_color: Color,
    check: bool,
    checkmate: bool,
}

impl ChessMatch {
    /// Starts a match from a caller-supplied placement.
    pub fn new(setup: &MatchSetup) -> Result<Self, SetupError> {
        let mut board = Board::new();
        let mut kings = [0u8; 2];

        for (index, placement) in setup.placements().iter().enumerate() {
            if board.is_occupied(placement.square) {
                return Err(SetupError::SquareOccupied(placement.square));
            }
            if placement.kind == PieceKind::King {
                kings[color_index(placement.color)] += 1;
            }
            board.place(
                placement.square,
                Piece::new(PieceId(index as u8), placement.color, placement.kind),
            );
        }

        for color in [Color::White, Color::Black] {
            match kings[color_index(color)] {
                0 => return Err(SetupError::MissingKing(color)),
                1 => {}
                _ => return Err(SetupError::DuplicateKing(color)),
            }
        }

        Ok(Self {
            board,
            captured: Vec::new(),
            turn: 1,
            active_color: Color::White,
            check: false,
            checkmate: false,
        })
    }

    /// Starts a match from the regular chess starting position.
    pub fn standard() -> Self {
        Self::new(&MatchSetup::standard()).expect("the standard placement is a valid setup")
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn active_color(&self) -> Color {
        self.active_color
    }

    /// True if the player now on turn is in check (set when the previous
    /// move delivered check).
    pub fn is_check(&self) -> bool {
        self.check
    }

    pub fn is_checkmate(&self) -> bool {
        self.checkmate
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Pieces captured so far, in capture order.
    pub fn captured_pieces(&self) -> &[Piece] {
        &self.captured
    }

    /// Snapshot of the board: kind and color per cell, or `None` for empty.
    pub fn pieces(&self) -> [[Option<(Color, PieceKind)>; 8]; 8] {
        let mut grid = [[None; 8]; 8];
        for (field, piece) in self.board.pieces_with_coordinates() {
            grid[field.row as usize][field.col as usize] = Some((piece.color, piece.kind));
        }
        grid
    }

    /// Validates the source and returns the raw reachable-squares matrix of
    /// the piece on it. The matrix is deliberately not filtered for
    /// self-check exposure; it is a shallow legality hint for move
    /// highlighting, while [`perform_move`](Self::perform_move) arbitrates
    /// king safety.
    pub fn possible_moves(&self, source: ChessField) -> Result<ReachableSquares, MoveError> {
        self.validate_source(source)
    }

    /// Validates and performs a move for the player on turn. On success the
    /// captured piece, if any, is returned and has been transferred to the
    /// ledger. On failure the match state is exactly as before the call.
    pub fn perform_move(
        &mut self,
        source: ChessField,
        target: ChessField,
    ) -> Result<Option<Piece>, MoveError> {
        let reachable = self.validate_source(source)?;
        self.validate_target(&reachable, source, target)?;

        let captured = self.execute_move(source, target);

        if self.is_in_check(self.active_color) {
            self.revert_move(source, target, captured);
            debug!(%source, %target, "move rejected: would expose the own king");
            return Err(MoveError::SelfCheckViolation);
        }

        let opponent = self.active_color.opposite();
        self.check = self.is_in_check(opponent);
        debug!(%source, %target, check = self.check, "move committed");

        if self.check && self.is_checkmated(opponent) {
            // Terminal state: the turn is not advanced so the result stays
            // attributable to the mover.
            self.checkmate = true;
            debug!(winner = %self.active_color, turn = self.turn, "checkmate");
        } else {
            self.next_turn();
        }

        Ok(captured)
    }

    /// True if `color`'s king stands on a square some live opposing piece
    /// can reach.
    ///
    /// Panics if `color` has no king on the board; that is a corrupted
    /// setup or a bookkeeping bug, not a game state.
    pub fn is_in_check(&self, color: Color) -> bool {
        let king_square = self.king_square(color);
        self.board
            .pieces_of_color(color.opposite())
            .any(|(field, piece)| piece.reachable_squares(field, &self.board).contains(king_square))
    }

    /// Exhaustive checkmate test: `color` is checkmated iff it is in check
    /// and no reachable move of any of its pieces leaves the king safe.
    /// Every candidate is tried speculatively and reverted, so the match
    /// state is unchanged when this returns.
    pub fn is_checkmated(&mut self, color: Color) -> bool {
        if !self.is_in_check(color) {
            return false;
        }

        let candidates: Vec<(ChessField, ReachableSquares)> = self
            .board
            .pieces_of_color(color)
            .map(|(field, piece)| (field, piece.reachable_squares(field, &self.board)))
            .collect();

        for (source, reachable) in candidates {
            for target in reachable.iter() {
                let captured = self.execute_move(source, target);
                let still_in_check = self.is_in_check(color);
                self.revert_move(source, target, captured);
                if !still_in_check {
                    return false;
                }
            }
        }

        true
    }

    fn validate_source(&self, source: ChessField) -> Result<ReachableSquares, MoveError> {
        let piece = match self.board.piece_at(source) {
            Some(piece) => piece,
            None => return Err(MoveError::NoPieceAtSource(source)),
        };
        if piece.color != self.active_color {
            return Err(MoveError::WrongColorPiece(source));
        }
        let reachable = piece.reachable_squares(source, &self.board);
        if reachable.is_empty() {
            return Err(MoveError::NoLegalMoves(source));
        }
        Ok(reachable)
    }

    fn validate_target(
        &self,
        reachable: &ReachableSquares,
        source: ChessField,
        target: ChessField,
    ) -> Result<(), MoveError> {
        if reachable.contains(target) {
            Ok(())
        } else {
            Err(MoveError::IllegalTarget {
                from: source,
                to: target,
            })
        }
    }

    /// Executes a validated move: lifts the mover, bumps its move counter,
    /// transfers any occupant of the target to the ledger and places the
    /// mover. Exactly inverted by [`Self::revert_move`].
    fn execute_move(&mut self, source: ChessField, target: ChessField) -> Option<Piece> {
        let mut mover = self
            .board
            .remove(source)
            .unwrap_or_else(|| panic!("execute_move: no piece on {}", source));
        mover.move_count += 1;

        let captured = self.board.remove(target);
        if let Some(captured_piece) = captured {
            self.captured.push(captured_piece);
        }
        self.board.place(target, mover);
        captured
    }

    /// Exact inverse of [`Self::execute_move`]. Execute/revert pairs nest
    /// strictly LIFO, so the captured piece to restore is always the most
    /// recent ledger entry.
    fn revert_move(&mut self, source: ChessField, target: ChessField, captured: Option<Piece>) {
        let mut mover = self
            .board
            .remove(target)
            .unwrap_or_else(|| panic!("revert_move: no piece on {}", target));
        mover.move_count -= 1;
        self.board.place(source, mover);

        if let Some(captured_piece) = captured {
            let restored = self
                .captured
                .pop()
                .unwrap_or_else(|| panic!("revert_move: ledger is empty"));
            debug_assert_eq!(restored.id, captured_piece.id);
            self.board.place(target, restored);
        }
    }

    fn king_square(&self, color: Color) -> ChessField {
        self.board
            .find_king(color)
            .unwrap_or_else(|| panic!("there is no {} king on the board", color))
    }

    fn next_turn(&mut self) {
        self.turn += 1;
        self.active_color = self.active_color.opposite();
    }
}

fn color_index(color: Color) -> usize {
    match color {
        Color::White => 0,
        Color::Black => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_utils::{assert_reachable, match_from};
    use super::*;

    fn field(square: &str) -> ChessField {
        ChessField::from_algebraic(square)
    }

    #[test]
    fn test_new_match_state() {
        let game = ChessMatch::standard();
        assert_eq!(game.turn(), 1);
        assert_eq!(game.active_color(), Color::White);
        assert!(!game.is_check());
        assert!(!game.is_checkmate());
        assert!(game.captured_pieces().is_empty());
        assert_eq!(game.board().pieces_with_coordinates().count(), 32);
    }

    #[test]
    fn test_setup_validation() {
        let no_white_king = MatchSetup::empty().with(Color::Black, PieceKind::King, "e8");
        assert_eq!(
            ChessMatch::new(&no_white_king),
            Err(SetupError::MissingKing(Color::White))
        );

        let twice_occupied = MatchSetup::empty()
            .with(Color::White, PieceKind::King, "e1")
            .with(Color::Black, PieceKind::King, "e8")
            .with(Color::White, PieceKind::Rook, "a1")
            .with(Color::Black, PieceKind::Knight, "a1");
        assert_eq!(
            ChessMatch::new(&twice_occupied),
            Err(SetupError::SquareOccupied(field("a1")))
        );

        let two_black_kings = MatchSetup::empty()
            .with(Color::White, PieceKind::King, "e1")
            .with(Color::Black, PieceKind::King, "e8")
            .with(Color::Black, PieceKind::King, "d8");
        assert_eq!(
            ChessMatch::new(&two_black_kings),
            Err(SetupError::DuplicateKing(Color::Black))
        );
    }

    #[test]
    fn test_turn_alternation() {
        let mut game = ChessMatch::standard();
        let moves = [("e2", "e4"), ("e7", "e5"), ("g1", "f3"), ("b8", "c6")];
        for (n, (from, to)) in moves.iter().enumerate() {
            let expected = if n % 2 == 0 { Color::White } else { Color::Black };
            assert_eq!(game.active_color(), expected);
            assert_eq!(game.turn(), 1 + n as u32);
            game.perform_move(field(from), field(to)).unwrap();
        }
        assert_eq!(game.turn(), 5);
        assert_eq!(game.active_color(), Color::White);
    }

    #[test]
    fn test_validate_source_errors() {
        let mut game = ChessMatch::standard();
        assert_eq!(
            game.perform_move(field("e4"), field("e5")),
            Err(MoveError::NoPieceAtSource(field("e4")))
        );
        assert_eq!(
            game.perform_move(field("e7"), field("e5")),
            Err(MoveError::WrongColorPiece(field("e7")))
        );
        // A rook boxed in by its own pieces has no possible move at all
        assert_eq!(
            game.perform_move(field("a1"), field("a3")),
            Err(MoveError::NoLegalMoves(field("a1")))
        );
    }

    #[test]
    fn test_validate_target_error() {
        let mut game = ChessMatch::standard();
        let before = game.clone();
        assert_eq!(
            game.perform_move(field("e2"), field("e5")),
            Err(MoveError::IllegalTarget {
                from: field("e2"),
                to: field("e5"),
            })
        );
        assert_eq!(game, before);
    }

    #[test]
    fn test_wrong_color_leaves_state_unchanged() {
        let mut game = ChessMatch::standard();
        let before = game.clone();
        assert_eq!(
            game.perform_move(field("d7"), field("d5")),
            Err(MoveError::WrongColorPiece(field("d7")))
        );
        assert_eq!(game, before);
    }

    #[test]
    fn test_capture_moves_piece_to_ledger() {
        let mut game = match_from(&[
            ("K", "e1"),
            ("R", "a1"),
            ("k", "e8"),
            ("n", "a5"),
        ]);
        let captured = game.perform_move(field("a1"), field("a5")).unwrap();

        let captured = captured.expect("capture must return the victim");
        assert_eq!(captured.kind, PieceKind::Knight);
        assert_eq!(captured.color, Color::Black);
        assert_eq!(game.captured_pieces(), &[captured]);
        assert!(!game.board().is_occupied(field("a1")));
        assert_eq!(
            game.board().piece_at(field("a5")).map(|p| p.kind),
            Some(PieceKind::Rook)
        );

        // Moving to an empty square captures nothing
        let captured = game.perform_move(field("e8"), field("d8")).unwrap();
        assert_eq!(captured, None);
        assert_eq!(game.captured_pieces().len(), 1);
    }

    #[test]
    fn test_move_counter_increments() {
        let mut game = ChessMatch::standard();
        game.perform_move(field("e2"), field("e4")).unwrap();
        assert_eq!(game.board().piece_at(field("e4")).unwrap().move_count, 1);

        // The moved pawn lost its double step
        game.perform_move(field("e7"), field("e5")).unwrap();
        let reachable = game.possible_moves(field("e4"));
        assert_eq!(
            reachable,
            Err(MoveError::NoLegalMoves(field("e4")))
        );
    }

    #[test]
    fn test_self_check_rejection_restores_state() {
        // The white rook on d2 is pinned against its king by the black queen
        let mut game = match_from(&[
            ("K", "d1"),
            ("R", "d2"),
            ("k", "h8"),
            ("q", "d7"),
        ]);
        let before = game.clone();

        assert_eq!(
            game.perform_move(field("d2"), field("a2")),
            Err(MoveError::SelfCheckViolation)
        );
        // Board, ledger, counters, turn and flags are bit-identical
        assert_eq!(game, before);

        // Along the pin the rook may still move, including the capture
        assert!(game.perform_move(field("d2"), field("d7")).unwrap().is_some());
    }

    #[test]
    fn test_self_check_rejection_with_capture_restores_ledger() {
        // Capturing the knight pulls the pinned rook off the d-file and
        // exposes the white king to the queen
        let mut game = match_from(&[
            ("K", "d1"),
            ("R", "d2"),
            ("k", "h8"),
            ("n", "a2"),
            ("q", "d7"),
        ]);
        let before = game.clone();

        assert_eq!(
            game.perform_move(field("d2"), field("a2")),
            Err(MoveError::SelfCheckViolation)
        );
        assert_eq!(game, before);
        assert!(game.captured_pieces().is_empty());
        assert_eq!(
            game.board().piece_at(field("a2")).map(|p| p.kind),
            Some(PieceKind::Knight)
        );
    }

    #[test]
    fn test_check_flag() {
        let mut game = match_from(&[
            ("K", "e1"),
            ("R", "a4"),
            ("k", "e8"),
            ("p", "a7"),
        ]);
        game.perform_move(field("a4"), field("e4")).unwrap();
        assert!(game.is_check());
        assert!(!game.is_checkmate());
        assert_eq!(game.active_color(), Color::Black);
        assert_eq!(game.turn(), 2);

        // A reply that ignores the check is a self-check violation
        assert_eq!(
            game.perform_move(field("a7"), field("a6")),
            Err(MoveError::SelfCheckViolation)
        );

        // Stepping the king aside resolves the check
        game.perform_move(field("e8"), field("d7")).unwrap();
        assert!(!game.is_check());
        assert_eq!(game.active_color(), Color::White);
    }

    #[test]
    fn test_checkmate_requires_check() {
        let mut game = ChessMatch::standard();
        assert!(!game.is_checkmated(Color::White));
        assert!(!game.is_checkmated(Color::Black));

        game.perform_move(field("e2"), field("e4")).unwrap();
        assert!(!game.is_checkmated(Color::Black));
    }

    #[test]
    fn test_check_is_not_checkmate_with_escape() {
        // The undefended rook checks from e7; the king simply takes it
        let mut game = match_from(&[
            ("K", "e1"),
            ("R", "e4"),
            ("k", "e8"),
            ("r", "h8"),
        ]);
        game.perform_move(field("e4"), field("e7")).unwrap();
        assert!(game.is_check());
        assert!(!game.is_checkmate());

        let captured = game.perform_move(field("e8"), field("e7")).unwrap();
        assert_eq!(captured.map(|p| p.kind), Some(PieceKind::Rook));
        assert!(!game.is_check());
    }

    #[test]
    fn test_back_rank_mate() {
        // Black king boxed in by its own pawns; the rook lift delivers mate
        let mut game = match_from(&[
            ("K", "e1"),
            ("R", "a1"),
            ("k", "g8"),
            ("p", "f7"),
            ("p", "g7"),
            ("p", "h7"),
        ]);
        game.perform_move(field("a1"), field("a8")).unwrap();

        assert!(game.is_check());
        assert!(game.is_checkmate());
        // Terminal: the turn is frozen and the result attributable to white
        assert_eq!(game.active_color(), Color::White);
        assert_eq!(game.turn(), 1);

        // The opponent cannot reply; the ordinary turn guard rejects it
        assert_eq!(
            game.perform_move(field("f7"), field("f6")),
            Err(MoveError::WrongColorPiece(field("f7")))
        );
    }

    #[test]
    fn test_roster_ledger_partition() {
        let mut game = ChessMatch::standard();
        let all_ids = |game: &ChessMatch| {
            let mut ids: Vec<u8> = game
                .board()
                .pieces_with_coordinates()
                .map(|(_, p)| p.id.0)
                .chain(game.captured_pieces().iter().map(|p| p.id.0))
                .collect();
            ids.sort_unstable();
            ids
        };
        let expected: Vec<u8> = (0..32).collect();
        assert_eq!(all_ids(&game), expected);

        // Two captures later the partition still covers every piece exactly once
        game.perform_move(field("e2"), field("e4")).unwrap();
        game.perform_move(field("d7"), field("d5")).unwrap();
        game.perform_move(field("e4"), field("d5")).unwrap();
        game.perform_move(field("d8"), field("d5")).unwrap();
        assert_eq!(game.captured_pieces().len(), 2);
        assert_eq!(all_ids(&game), expected);
    }

    #[test]
    fn test_possible_moves_does_not_filter_self_check() {
        // The pinned rook still reports its full geometric range
        let game = match_from(&[
            ("K", "d1"),
            ("R", "d2"),
            ("k", "h8"),
            ("q", "d7"),
        ]);
        let reachable = game.possible_moves(field("d2")).unwrap();
        assert_reachable(
            &reachable,
            vec![
                "d3", "d4", "d5", "d6", "d7", "a2", "b2", "c2", "e2", "f2", "g2", "h2",
            ],
        );
    }

    #[test]
    fn test_possible_moves_errors_match_perform_move() {
        let game = ChessMatch::standard();
        assert_eq!(
            game.possible_moves(field("e4")),
            Err(MoveError::NoPieceAtSource(field("e4")))
        );
        assert_eq!(
            game.possible_moves(field("e7")),
            Err(MoveError::WrongColorPiece(field("e7")))
        );
        assert_eq!(
            game.possible_moves(field("a1")),
            Err(MoveError::NoLegalMoves(field("a1")))
        );
    }

    #[test]
    fn test_pieces_snapshot() {
        let game = ChessMatch::standard();
        let grid = game.pieces();
        assert_eq!(grid[0][4], Some((Color::White, PieceKind::King)));
        assert_eq!(grid[7][3], Some((Color::Black, PieceKind::Queen)));
        assert_eq!(grid[1][0], Some((Color::White, PieceKind::Pawn)));
        assert_eq!(grid[4][4], None);
    }

    #[test]
    #[should_panic(expected = "no black king")]
    fn test_missing_king_is_fatal() {
        // Corrupt a match by force to prove the invariant violation aborts
        let mut game = match_from(&[("K", "e1"), ("k", "e8")]);
        let _ = game.board.remove(field("e8"));
        game.is_in_check(Color::Black);
    }
}
