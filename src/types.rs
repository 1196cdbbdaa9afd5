use std::fmt;

use serde::{Deserialize, Serialize};

pub const BOARD_SIZE: i8 = 8;

/// A board coordinate.
///
/// Signed so that generated candidate targets may fall off the board;
/// callers filter them with [`Position::is_on_board`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: i8,
    pub col: i8,
}

impl Position {
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    pub fn is_on_board(self) -> bool {
        (0..BOARD_SIZE).contains(&self.row) && (0..BOARD_SIZE).contains(&self.col)
    }

    /// Offsets this position, ignoring board boundaries.
    pub fn offset(self, d_row: i8, d_col: i8) -> Self {
        Self::new(self.row + d_row, self.col + d_col)
    }

    /// Position as seen from the opposite side of the board.
    pub fn rotated(self) -> Self {
        Self::new(BOARD_SIZE - 1 - self.row, BOARD_SIZE - 1 - self.col)
    }

    /// Playable squares are the dark ones, where `row + col` is odd.
    pub fn is_dark(self) -> bool {
        (self.row + self.col).rem_euclid(2) == 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceColor {
    Red,
    White,
}

impl PieceColor {
    pub fn opponent(self) -> Self {
        match self {
            Self::Red => Self::White,
            Self::White => Self::Red,
        }
    }

    /// Row delta of a forward step. Red starts on the low rows.
    pub fn forward(self) -> i8 {
        match self {
            Self::Red => 1,
            Self::White => -1,
        }
    }

    /// The far row where a single piece of this color is crowned.
    pub fn promotion_row(self) -> i8 {
        match self {
            Self::Red => BOARD_SIZE - 1,
            Self::White => 0,
        }
    }
}

impl fmt::Display for PieceColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Red => f.write_str("red"),
            Self::White => f.write_str("white"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceRank {
    Single,
    King,
}

/// A checker. Rank only ever moves from `Single` to `King`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    color: PieceColor,
    rank: PieceRank,
}

impl Piece {
    pub const fn single(color: PieceColor) -> Self {
        Self {
            color,
            rank: PieceRank::Single,
        }
    }

    pub const fn king(color: PieceColor) -> Self {
        Self {
            color,
            rank: PieceRank::King,
        }
    }

    pub fn color(&self) -> PieceColor {
        self.color
    }

    pub fn rank(&self) -> PieceRank {
        self.rank
    }

    pub fn is_king(&self) -> bool {
        self.rank == PieceRank::King
    }

    pub fn promote(&mut self) {
        self.rank = PieceRank::King;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SquareShade {
    Light,
    Dark,
}

/// One cell of the grid. Only dark squares ever hold a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Square {
    pub shade: SquareShade,
    pub piece: Option<Piece>,
}

impl Square {
    pub fn is_playable(&self) -> bool {
        self.shade == SquareShade::Dark
    }

    pub fn is_empty(&self) -> bool {
        self.piece.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_direction_and_promotion_rows_are_opposed() {
        assert_eq!(PieceColor::Red.forward(), 1);
        assert_eq!(PieceColor::White.forward(), -1);
        assert_eq!(PieceColor::Red.promotion_row(), 7);
        assert_eq!(PieceColor::White.promotion_row(), 0);
        assert_eq!(PieceColor::Red.opponent(), PieceColor::White);
    }

    #[test]
    fn dark_squares_have_odd_coordinate_sum() {
        assert!(Position::new(0, 1).is_dark());
        assert!(Position::new(2, 3).is_dark());
        assert!(!Position::new(0, 0).is_dark());
        assert!(!Position::new(7, 7).is_dark());
    }

    #[test]
    fn rotation_maps_corners_and_preserves_shade() {
        let pos = Position::new(2, 3);
        assert_eq!(pos.rotated(), Position::new(5, 4));
        assert_eq!(pos.rotated().rotated(), pos);
        assert_eq!(pos.rotated().is_dark(), pos.is_dark());
    }

    #[test]
    fn promotion_is_one_way() {
        let mut piece = Piece::single(PieceColor::White);
        assert!(!piece.is_king());
        piece.promote();
        piece.promote();
        assert_eq!(piece.rank(), PieceRank::King);
        assert_eq!(piece.color(), PieceColor::White);
    }

    #[test]
    fn off_board_positions_are_detected() {
        assert!(Position::new(7, 0).is_on_board());
        assert!(!Position::new(8, 0).is_on_board());
        assert!(!Position::new(0, -1).is_on_board());
    }
}
