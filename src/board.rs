use once_cell::sync::Lazy;

use crate::error::BoardError;
use crate::moves::{Move, MoveKind};
use crate::types::{BOARD_SIZE, Piece, PieceColor, Position, Square, SquareShade};

const BOARD_DIM: usize = BOARD_SIZE as usize;
const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const RED_HOME_ROWS: std::ops::RangeInclusive<i8> = 0..=2;
const WHITE_HOME_ROWS: std::ops::RangeInclusive<i8> = 5..=7;

static STARTING_BOARD: Lazy<Board> = Lazy::new(Board::standard_layout);

/// Checkers board: an 8x8 grid of squares plus running piece counts.
///
/// The board is a plain generator and store. It does not enforce turn rules;
/// forced-capture precedence lives in [`Turn`](crate::turn::Turn).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: [[Square; BOARD_DIM]; BOARD_DIM],
    red_count: u8,
    white_count: u8,
}

impl Board {
    /// Creates the opening position: Red on rows 0-2, White on rows 5-7.
    pub fn new() -> Self {
        STARTING_BOARD.clone()
    }

    /// A board with the checkered pattern and no pieces.
    pub fn empty() -> Self {
        let mut squares = [[Square {
            shade: SquareShade::Light,
            piece: None,
        }; BOARD_DIM]; BOARD_DIM];

        for (row, cells) in squares.iter_mut().enumerate() {
            for (col, square) in cells.iter_mut().enumerate() {
                if Position::new(row as i8, col as i8).is_dark() {
                    square.shade = SquareShade::Dark;
                }
            }
        }

        Self {
            squares,
            red_count: 0,
            white_count: 0,
        }
    }

    /// Builds a board holding exactly the given pieces.
    pub fn with_pieces(
        pieces: impl IntoIterator<Item = (Position, Piece)>,
    ) -> Result<Self, BoardError> {
        let mut board = Self::empty();
        for (pos, piece) in pieces {
            board.place_piece(pos, piece)?;
        }
        Ok(board)
    }

    fn standard_layout() -> Self {
        let mut board = Self::empty();
        for pos in all_positions().filter(|pos| pos.is_dark()) {
            let color = if RED_HOME_ROWS.contains(&pos.row) {
                PieceColor::Red
            } else if WHITE_HOME_ROWS.contains(&pos.row) {
                PieceColor::White
            } else {
                continue;
            };
            board.put(pos, Some(Piece::single(color)));
        }
        board
    }

    fn square(&self, pos: Position) -> Option<&Square> {
        if !pos.is_on_board() {
            return None;
        }
        Some(&self.squares[pos.row as usize][pos.col as usize])
    }

    fn square_mut(&mut self, pos: Position) -> Option<&mut Square> {
        if !pos.is_on_board() {
            return None;
        }
        Some(&mut self.squares[pos.row as usize][pos.col as usize])
    }

    /// Returns the square at `pos`, or `None` off the board.
    pub fn square_at(&self, pos: Position) -> Option<Square> {
        self.square(pos).copied()
    }

    pub fn piece_at(&self, pos: Position) -> Option<Piece> {
        self.square(pos).and_then(|square| square.piece)
    }

    /// Puts `piece` on `pos`, replacing any occupant. No rule checks.
    pub fn place_piece(&mut self, pos: Position, piece: Piece) -> Result<(), BoardError> {
        match self.square(pos) {
            None => Err(BoardError::OutOfBounds(pos)),
            Some(square) if !square.is_playable() => Err(BoardError::Unplayable(pos)),
            Some(_) => {
                self.put(pos, Some(piece));
                Ok(())
            }
        }
    }

    /// Clears `pos` and returns what was there. No rule checks.
    pub fn remove_piece(&mut self, pos: Position) -> Option<Piece> {
        let removed = self.piece_at(pos)?;
        self.put(pos, None);
        Some(removed)
    }

    fn put(&mut self, pos: Position, piece: Option<Piece>) {
        let Some(square) = self.square_mut(pos) else {
            return;
        };
        let previous = std::mem::replace(&mut square.piece, piece);
        if let Some(old) = previous {
            *self.counter_mut(old.color()) -= 1;
        }
        if let Some(new) = piece {
            *self.counter_mut(new.color()) += 1;
        }
    }

    fn counter_mut(&mut self, color: PieceColor) -> &mut u8 {
        match color {
            PieceColor::Red => &mut self.red_count,
            PieceColor::White => &mut self.white_count,
        }
    }

    /// Relocates the piece on `from` to `to`. Counts are unchanged.
    pub(crate) fn relocate(&mut self, from: Position, to: Position) -> Option<Piece> {
        let piece = self.piece_at(from)?;
        if !self.square(to)?.is_playable() {
            return None;
        }
        self.put(from, None);
        self.put(to, Some(piece));
        Some(piece)
    }

    pub(crate) fn promote_at(&mut self, pos: Position) {
        if let Some(piece) = self.square_mut(pos).and_then(|square| square.piece.as_mut()) {
            piece.promote();
        }
    }

    /// Iterates every square in row-major order.
    pub fn squares(&self) -> impl Iterator<Item = (Position, Square)> + '_ {
        all_positions().filter_map(move |pos| self.square_at(pos).map(|square| (pos, square)))
    }

    /// Iterates the occupied squares holding pieces of `color`.
    pub fn pieces_of(&self, color: PieceColor) -> impl Iterator<Item = (Position, Piece)> + '_ {
        self.squares()
            .filter_map(|(pos, square)| square.piece.map(|piece| (pos, piece)))
            .filter(move |(_, piece)| piece.color() == color)
    }

    /// The four diagonal targets at distance one (single) or two (jump),
    /// unfiltered by boundaries or occupancy.
    pub fn candidate_moves(&self, pos: Position, color: PieceColor, jump: bool) -> [Move; 4] {
        let (distance, kind) = if jump {
            (2, MoveKind::Jump)
        } else {
            (1, MoveKind::Single)
        };
        DIAGONALS.map(|(dr, dc)| {
            Move::new(pos, pos.offset(dr * distance, dc * distance), color).with_kind(kind)
        })
    }

    fn single_moves_from(&self, pos: Position, piece: Piece) -> impl Iterator<Item = Move> + '_ {
        self.candidate_moves(pos, piece.color(), false)
            .into_iter()
            .filter(move |mv| {
                mv.is_on_board()
                    && self.piece_at(mv.end).is_none()
                    && (piece.is_king() || mv.is_forward())
            })
    }

    fn jump_moves_from(&self, pos: Position, piece: Piece) -> impl Iterator<Item = Move> + '_ {
        self.candidate_moves(pos, piece.color(), true)
            .into_iter()
            .filter(move |mv| mv.is_jump(self) && (piece.is_king() || mv.is_forward()))
    }

    /// Every legal single step and jump for `color`, piece by piece in
    /// row-major order, singles before jumps for each piece.
    pub fn legal_moves(&self, color: PieceColor) -> Vec<Move> {
        let mut moves = Vec::new();
        for (pos, piece) in self.pieces_of(color) {
            moves.extend(self.single_moves_from(pos, piece));
            moves.extend(self.jump_moves_from(pos, piece));
        }
        moves
    }

    /// Legal jumps for `color`, optionally restricted to the piece on `from`.
    pub fn legal_jumps(&self, color: PieceColor, from: Option<Position>) -> Vec<Move> {
        match from {
            Some(pos) => match self.piece_at(pos) {
                Some(piece) if piece.color() == color => self.jump_moves_from(pos, piece).collect(),
                _ => Vec::new(),
            },
            None => self
                .pieces_of(color)
                .flat_map(|(pos, piece)| self.jump_moves_from(pos, piece))
                .collect(),
        }
    }

    /// Whether `color` has a jump anywhere, or from `from` when given.
    pub fn has_jump(&self, color: PieceColor, from: Option<Position>) -> bool {
        match from {
            Some(pos) => match self.piece_at(pos) {
                Some(piece) if piece.color() == color => {
                    self.jump_moves_from(pos, piece).next().is_some()
                }
                _ => false,
            },
            None => self
                .pieces_of(color)
                .any(|(pos, piece)| self.jump_moves_from(pos, piece).next().is_some()),
        }
    }

    /// Removes the captured pieces recorded over a turn.
    pub fn apply_captures(&mut self, positions: &[Position]) {
        for &pos in positions {
            self.remove_piece(pos);
        }
    }

    /// Independent value copy with counts recomputed from its own squares.
    pub fn deep_copy(&self) -> Self {
        let mut copy = Self {
            squares: self.squares,
            red_count: 0,
            white_count: 0,
        };
        for (_, square) in self.squares() {
            if let Some(piece) = square.piece {
                *copy.counter_mut(piece.color()) += 1;
            }
        }
        copy
    }

    pub fn red_count(&self) -> u8 {
        self.red_count
    }

    pub fn white_count(&self) -> u8 {
        self.white_count
    }

    pub fn count_of(&self, color: PieceColor) -> u8 {
        match color {
            PieceColor::Red => self.red_count,
            PieceColor::White => self.white_count,
        }
    }

    /// Returns `(red_count, white_count)`.
    pub fn count(&self) -> (u8, u8) {
        (self.red_count, self.white_count)
    }

    /// Converts board to `[u8; 64]` where 0=empty, 1=red, 2=white,
    /// 3=red king, 4=white king.
    pub fn to_array(&self) -> [u8; BOARD_DIM * BOARD_DIM] {
        let mut cells = [0u8; BOARD_DIM * BOARD_DIM];
        for (cell, (_, square)) in cells.iter_mut().zip(self.squares()) {
            *cell = match square.piece {
                None => 0,
                Some(piece) => match (piece.color(), piece.is_king()) {
                    (PieceColor::Red, false) => 1,
                    (PieceColor::White, false) => 2,
                    (PieceColor::Red, true) => 3,
                    (PieceColor::White, true) => 4,
                },
            };
        }
        cells
    }

    /// CRC32 of the cell encoding; changes whenever any square changes.
    pub fn fingerprint(&self) -> u32 {
        crc32fast::hash(&self.to_array())
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

fn all_positions() -> impl Iterator<Item = Position> {
    (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Position::new(row, col)))
}
