use log::debug;
use serde::Serialize;

use crate::board::Board;
use crate::error::{ForcedJump, MoveError};
use crate::moves::{Move, MoveKind};
use crate::types::{PieceColor, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    Empty,
    SingleMoveMade,
    JumpMoveMade,
}

impl From<MoveKind> for TurnPhase {
    fn from(kind: MoveKind) -> Self {
        match kind {
            MoveKind::Single => Self::SingleMoveMade,
            MoveKind::Jump => Self::JumpMoveMade,
        }
    }
}

/// One player's turn, played on private board copies.
///
/// Every accepted move pushes a new board version; captured squares are only
/// recorded here and disappear from the board when the session commits the
/// turn.
#[derive(Debug, Clone)]
pub struct Turn {
    color: PieceColor,
    initial: Board,
    versions: Vec<Board>,
    captured: Vec<Position>,
    history: Vec<Move>,
    phase: TurnPhase,
}

impl Turn {
    pub fn new(color: PieceColor, board: Board) -> Self {
        Self {
            color,
            initial: board,
            versions: Vec::new(),
            captured: Vec::new(),
            history: Vec::new(),
            phase: TurnPhase::Empty,
        }
    }

    pub fn color(&self) -> PieceColor {
        self.color
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// The board every query must use while the turn is in progress.
    pub fn current_board(&self) -> &Board {
        self.versions.last().unwrap_or(&self.initial)
    }

    pub fn initial_board(&self) -> &Board {
        &self.initial
    }

    /// Squares jumped this turn, in order.
    pub fn captured(&self) -> &[Position] {
        &self.captured
    }

    /// Moves applied this turn, oldest first.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn last_move(&self) -> Option<&Move> {
        self.history.last()
    }

    fn last_was_jump(&self) -> bool {
        self.last_move().is_some_and(Move::is_jump_kind)
    }

    /// Checks `mv` against the turn's rules without applying it.
    pub fn check(&self, mv: &Move) -> Result<MoveKind, MoveError> {
        let mv = mv.with_color(self.color);
        for pos in [mv.start, mv.end] {
            if !pos.is_on_board() {
                return Err(MoveError::OutOfBounds(pos));
            }
        }
        if self.phase == TurnPhase::SingleMoveMade {
            return Err(MoveError::TurnComplete);
        }

        let board = self.current_board();
        let piece = board
            .piece_at(mv.start)
            .ok_or(MoveError::EmptyStart(mv.start))?;
        if piece.color() != self.color {
            return Err(MoveError::NotOwnPiece(mv.start));
        }
        if !piece.is_king() && !mv.is_forward() {
            return Err(MoveError::IllegalMoveDirection);
        }

        if mv.is_single_step() {
            if self.last_was_jump() || board.has_jump(self.color, None) {
                return Err(MoveError::ForcedJumpViolation(ForcedJump::MustJump));
            }
            if board.piece_at(mv.end).is_some() {
                return Err(MoveError::DestinationOccupied(mv.end));
            }
            Ok(MoveKind::Single)
        } else if mv.is_jump(board) && !self.captured.contains(&mv.jumped_position()) {
            if let Some(last) = self.last_move().filter(|last| last.is_jump_kind()) {
                if mv.start != last.end {
                    return Err(MoveError::ForcedJumpViolation(ForcedJump::SamePiece));
                }
            }
            Ok(MoveKind::Jump)
        } else {
            Err(MoveError::InvalidMoveShape)
        }
    }

    /// Validates `mv` and applies it on success. The move's color is
    /// overwritten with the turn's color.
    pub fn validate(&mut self, mv: Move) -> Result<MoveKind, MoveError> {
        let kind = self.check(&mv)?;
        self.apply(mv.with_color(self.color), kind);
        Ok(kind)
    }

    fn apply(&mut self, mv: Move, kind: MoveKind) {
        let mut next = self.current_board().deep_copy();
        next.relocate(mv.start, mv.end);

        if kind == MoveKind::Jump {
            self.captured.push(mv.jumped_position());
        }
        if mv.ends_on_promotion_row() {
            next.promote_at(mv.end);
        }

        let mv = mv.with_kind(kind);
        debug!("applied {mv}");
        self.phase = kind.into();
        self.history.push(mv);
        self.versions.push(next);
    }

    /// Retracts the most recent move of this turn and returns the reversed
    /// move. The previous board version is restored as it was, including the
    /// rank of a piece promoted by the retracted move.
    pub fn back_up_move(&mut self) -> Result<Move, MoveError> {
        let last = self.history.pop().ok_or(MoveError::NothingToBackUp)?;
        self.versions.pop();
        if last.is_jump_kind() {
            self.captured.pop();
        }
        self.phase = self
            .history
            .last()
            .and_then(|mv| mv.kind)
            .map_or(TurnPhase::Empty, TurnPhase::from);

        let reversed = last.reversed();
        debug!("backed up with {reversed}");
        Ok(reversed)
    }

    /// Jumps the piece on `from` may still make this turn. Squares already
    /// jumped cannot be jumped again.
    pub fn available_jumps(&self, from: Position) -> Vec<Move> {
        self.current_board()
            .legal_jumps(self.color, Some(from))
            .into_iter()
            .filter(|mv| !self.captured.contains(&mv.jumped_position()))
            .collect()
    }

    /// Square the turn must keep jumping from, if a chain is unfinished.
    pub fn pending_jump_from(&self) -> Option<Position> {
        if self.phase != TurnPhase::JumpMoveMade {
            return None;
        }
        let end = self.last_move()?.end;
        (!self.available_jumps(end).is_empty()).then_some(end)
    }

    /// True once the turn can be submitted.
    pub fn is_complete(&self) -> bool {
        match self.phase {
            TurnPhase::Empty => false,
            TurnPhase::SingleMoveMade => true,
            TurnPhase::JumpMoveMade => self.pending_jump_from().is_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Piece;

    fn pos(row: i8, col: i8) -> Position {
        Position::new(row, col)
    }

    fn mv(from: (i8, i8), to: (i8, i8)) -> Move {
        Move::new(pos(from.0, from.1), pos(to.0, to.1), PieceColor::Red)
    }

    fn red() -> Piece {
        Piece::single(PieceColor::Red)
    }

    fn white() -> Piece {
        Piece::single(PieceColor::White)
    }

    fn turn_on(color: PieceColor, pieces: &[((i8, i8), Piece)]) -> Turn {
        let board =
            Board::with_pieces(pieces.iter().map(|&((r, c), piece)| (pos(r, c), piece))).unwrap();
        Turn::new(color, board)
    }

    #[test]
    fn single_step_moves_piece_on_working_copy_only() {
        let mut turn = turn_on(PieceColor::Red, &[((2, 3), red()), ((5, 4), white())]);

        assert_eq!(turn.validate(mv((2, 3), (3, 4))), Ok(MoveKind::Single));

        assert_eq!(turn.phase(), TurnPhase::SingleMoveMade);
        assert_eq!(turn.current_board().piece_at(pos(3, 4)), Some(red()));
        assert_eq!(turn.initial_board().piece_at(pos(2, 3)), Some(red()));
        assert!(turn.is_complete());
    }

    #[test]
    fn backward_single_is_wrong_direction() {
        let mut turn = turn_on(PieceColor::Red, &[((2, 3), red())]);

        assert_eq!(
            turn.validate(mv((2, 3), (1, 2))),
            Err(MoveError::IllegalMoveDirection)
        );
        assert_eq!(turn.phase(), TurnPhase::Empty);
    }

    #[test]
    fn single_step_rejected_while_any_jump_exists() {
        let mut turn = turn_on(
            PieceColor::Red,
            &[((2, 3), red()), ((3, 4), white()), ((2, 7), red())],
        );

        let err = turn.validate(mv((2, 7), (3, 6))).unwrap_err();
        assert_eq!(err, MoveError::ForcedJumpViolation(ForcedJump::MustJump));
        assert!(turn.history().is_empty());
    }

    #[test]
    fn jump_records_capture_but_leaves_piece_on_board() {
        let mut turn = turn_on(PieceColor::Red, &[((2, 3), red()), ((3, 4), white())]);

        assert_eq!(turn.validate(mv((2, 3), (4, 5))), Ok(MoveKind::Jump));

        assert_eq!(turn.captured(), &[pos(3, 4)]);
        assert_eq!(turn.current_board().piece_at(pos(3, 4)), Some(white()));
        assert_eq!(turn.phase(), TurnPhase::JumpMoveMade);
        assert!(turn.is_complete());
    }

    #[test]
    fn chain_must_continue_with_same_piece() {
        let mut turn = turn_on(
            PieceColor::Red,
            &[
                ((2, 3), red()),
                ((3, 4), white()),
                ((5, 6), white()),
                ((2, 1), red()),
                ((3, 2), white()),
            ],
        );

        turn.validate(mv((2, 3), (4, 5))).unwrap();
        assert_eq!(turn.pending_jump_from(), Some(pos(4, 5)));
        assert!(!turn.is_complete());

        assert_eq!(
            turn.validate(mv((2, 1), (4, 3))),
            Err(MoveError::ForcedJumpViolation(ForcedJump::SamePiece))
        );
        assert_eq!(
            turn.validate(mv((2, 1), (3, 0))),
            Err(MoveError::ForcedJumpViolation(ForcedJump::MustJump))
        );

        assert_eq!(turn.validate(mv((4, 5), (6, 7))), Ok(MoveKind::Jump));
        assert_eq!(turn.captured(), &[pos(3, 4), pos(5, 6)]);
        assert!(turn.is_complete());
    }

    #[test]
    fn move_after_single_step_is_rejected() {
        let mut turn = turn_on(PieceColor::Red, &[((2, 3), red()), ((2, 5), red())]);
        turn.validate(mv((2, 3), (3, 4))).unwrap();

        assert_eq!(
            turn.validate(mv((2, 5), (3, 6))),
            Err(MoveError::TurnComplete)
        );
    }

    #[test]
    fn invalid_shapes_and_bad_starts_are_rejected() {
        let mut turn = turn_on(PieceColor::Red, &[((2, 3), red()), ((5, 4), white())]);

        assert_eq!(
            turn.validate(mv((2, 3), (5, 6))),
            Err(MoveError::InvalidMoveShape)
        );
        assert_eq!(
            turn.validate(mv((2, 3), (4, 5))),
            Err(MoveError::InvalidMoveShape)
        );
        assert_eq!(
            turn.validate(mv((3, 4), (4, 5))),
            Err(MoveError::EmptyStart(pos(3, 4)))
        );
        assert_eq!(
            turn.validate(mv((5, 4), (6, 5))),
            Err(MoveError::NotOwnPiece(pos(5, 4)))
        );
        assert_eq!(
            turn.validate(mv((2, 3), (3, 8))),
            Err(MoveError::OutOfBounds(pos(3, 8)))
        );
    }

    #[test]
    fn single_step_onto_occupied_square_is_rejected() {
        let mut turn = turn_on(PieceColor::Red, &[((2, 3), red()), ((3, 4), red())]);

        assert_eq!(
            turn.validate(mv((2, 3), (3, 4))),
            Err(MoveError::DestinationOccupied(pos(3, 4)))
        );
    }

    #[test]
    fn white_reaching_row_zero_is_crowned_before_commit() {
        let mut turn = turn_on(PieceColor::White, &[((1, 2), white()), ((6, 1), red())]);
        let step = Move::new(pos(1, 2), pos(0, 1), PieceColor::White);

        turn.validate(step).unwrap();

        let crowned = turn.current_board().piece_at(pos(0, 1)).unwrap();
        assert!(crowned.is_king());
        assert!(!turn.initial_board().piece_at(pos(1, 2)).unwrap().is_king());
    }

    #[test]
    fn back_up_restores_previous_version_and_empties_turn() {
        let mut turn = turn_on(PieceColor::White, &[((1, 2), white()), ((6, 1), red())]);
        turn.validate(Move::new(pos(1, 2), pos(0, 1), PieceColor::White))
            .unwrap();

        let reversed = turn.back_up_move().unwrap();

        assert_eq!(reversed.start, pos(0, 1));
        assert_eq!(reversed.end, pos(1, 2));
        assert_eq!(turn.phase(), TurnPhase::Empty);
        assert_eq!(turn.current_board(), turn.initial_board());
        assert!(!turn.current_board().piece_at(pos(1, 2)).unwrap().is_king());
        assert_eq!(turn.back_up_move(), Err(MoveError::NothingToBackUp));
    }

    #[test]
    fn back_up_within_chain_drops_only_the_last_capture() {
        let mut turn = turn_on(
            PieceColor::Red,
            &[((2, 3), red()), ((3, 4), white()), ((5, 6), white())],
        );
        turn.validate(mv((2, 3), (4, 5))).unwrap();
        turn.validate(mv((4, 5), (6, 7))).unwrap();

        turn.back_up_move().unwrap();

        assert_eq!(turn.captured(), &[pos(3, 4)]);
        assert_eq!(turn.phase(), TurnPhase::JumpMoveMade);
        assert_eq!(turn.pending_jump_from(), Some(pos(4, 5)));
    }

    #[test]
    fn king_cannot_rejump_a_captured_piece() {
        let mut turn = turn_on(
            PieceColor::Red,
            &[((2, 3), Piece::king(PieceColor::Red)), ((3, 4), white())],
        );
        turn.validate(mv((2, 3), (4, 5))).unwrap();

        assert_eq!(turn.pending_jump_from(), None);
        assert_eq!(
            turn.validate(mv((4, 5), (2, 3))),
            Err(MoveError::InvalidMoveShape)
        );
    }
}
