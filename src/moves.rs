use std::fmt;

use serde::Serialize;

use crate::board::Board;
use crate::types::{PieceColor, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveKind {
    Single,
    Jump,
}

/// A proposed relocation from `start` to `end` for the side `color`.
///
/// `kind` is filled in by the generator or once the move has been applied;
/// a move parsed from a request carries `None` until then.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Move {
    pub start: Position,
    pub end: Position,
    pub color: PieceColor,
    pub kind: Option<MoveKind>,
}

impl Move {
    pub fn new(start: Position, end: Position, color: PieceColor) -> Self {
        Self {
            start,
            end,
            color,
            kind: None,
        }
    }

    pub fn with_kind(mut self, kind: MoveKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_color(mut self, color: PieceColor) -> Self {
        self.color = color;
        self
    }

    pub fn is_jump_kind(&self) -> bool {
        self.kind == Some(MoveKind::Jump)
    }

    fn delta(&self) -> (i8, i8) {
        (self.end.row - self.start.row, self.end.col - self.start.col)
    }

    pub fn is_single_step(&self) -> bool {
        let (dr, dc) = self.delta();
        dr.abs() == 1 && dc.abs() == 1
    }

    /// Geometry plus occupancy: two diagonal squares, empty landing square,
    /// mover's own piece (if any) on `start` and an opposing piece in between.
    pub fn is_jump(&self, board: &Board) -> bool {
        let (dr, dc) = self.delta();
        if dr.abs() != 2 || dc.abs() != 2 || !self.is_on_board() {
            return false;
        }
        if let Some(piece) = board.piece_at(self.start) {
            if piece.color() != self.color {
                return false;
            }
        }
        if board.piece_at(self.end).is_some() {
            return false;
        }
        match board.piece_at(self.jumped_position()) {
            Some(jumped) => jumped.color() == self.color.opponent(),
            None => false,
        }
    }

    /// The square diagonally between `start` and `end` of a jump.
    pub fn jumped_position(&self) -> Position {
        let (dr, dc) = self.delta();
        self.start.offset(dr.signum(), dc.signum())
    }

    pub fn is_forward(&self) -> bool {
        let (dr, _) = self.delta();
        dr.signum() == self.color.forward()
    }

    pub fn is_on_board(&self) -> bool {
        self.start.is_on_board() && self.end.is_on_board()
    }

    pub fn ends_on_promotion_row(&self) -> bool {
        self.end.row == self.color.promotion_row()
    }

    /// The retraction of this move. Captures are not part of a move and are
    /// not reversed here.
    pub fn reversed(&self) -> Self {
        Self {
            start: self.end,
            end: self.start,
            ..*self
        }
    }

    /// Maps a move made on a board shown from the other side back to
    /// engine coordinates.
    pub fn flipped(&self) -> Self {
        Self {
            start: self.start.rotated(),
            end: self.end.rotated(),
            ..*self
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = if self.is_jump_kind() { "x" } else { "-" };
        write!(f, "{} {}{}{}", self.color, self.start, sep, self.end)
    }
}
