//! Read-only snapshots for rendering and polling.

use serde::Serialize;

use crate::board::Board;
use crate::game::{EndReason, GameSession};
use crate::moves::Move;
use crate::turn::TurnPhase;
use crate::types::{BOARD_SIZE, Piece, PieceColor, Position, SquareShade};

/// Answer to "is it my move yet?".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TurnCheck {
    pub is_my_turn: bool,
    pub game_over: bool,
    /// Fingerprint of the committed board.
    pub board_revision: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SquareView {
    /// Engine coordinates of this square, whatever the orientation.
    pub position: Position,
    pub shade: SquareShade,
    pub piece: Option<Piece>,
}

/// The board as one player sees it: their own pieces at the bottom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardView {
    pub viewer: PieceColor,
    /// Display rows, top row first.
    pub rows: Vec<Vec<SquareView>>,
}

impl BoardView {
    /// Red's home rows are at the top of the engine board, so Red gets the
    /// board turned 180 degrees.
    pub fn for_color(board: &Board, viewer: PieceColor) -> Self {
        let mut squares: Vec<SquareView> = board
            .squares()
            .map(|(position, square)| SquareView {
                position,
                shade: square.shade,
                piece: square.piece,
            })
            .collect();
        // Reversing row-major order is the same as rotating every square.
        if viewer == PieceColor::Red {
            squares.reverse();
        }
        let rows = squares
            .chunks(BOARD_SIZE as usize)
            .map(<[SquareView]>::to_vec)
            .collect();
        Self { viewer, rows }
    }

    /// Maps a move picked on this view back to engine coordinates.
    pub fn to_engine(&self, mv: Move) -> Move {
        match self.viewer {
            PieceColor::Red => mv.flipped(),
            PieceColor::White => mv,
        }
    }

    pub fn square(&self, row: usize, col: usize) -> Option<&SquareView> {
        self.rows.get(row)?.get(col)
    }
}

/// Everything a client needs to draw a session and its status line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameStateView {
    /// Row-major cell codes of the working board; see [`Board::to_array`].
    pub cells: Vec<u8>,
    pub active_color: PieceColor,
    pub active_player: String,
    pub red_count: u8,
    pub white_count: u8,
    pub over: bool,
    pub resigned: bool,
    pub winner: Option<String>,
    pub loser: Option<String>,
    pub end_reason: Option<EndReason>,
    pub phase: TurnPhase,
    pub pending_jump: Option<Position>,
    pub last_moves: Vec<Move>,
    pub board_revision: u32,
}

impl GameStateView {
    pub fn from_session(session: &GameSession) -> Self {
        let working = session.current_board();
        Self {
            cells: working.to_array().to_vec(),
            active_color: session.active_color(),
            active_player: session.active_player().name().to_string(),
            red_count: session.board().red_count(),
            white_count: session.board().white_count(),
            over: session.is_over(),
            resigned: session.is_resigned(),
            winner: session.winner().map(|p| p.name().to_string()),
            loser: session.loser().map(|p| p.name().to_string()),
            end_reason: session.outcome().map(|outcome| outcome.reason),
            phase: session.turn().phase(),
            pending_jump: session.turn().pending_jump_from(),
            last_moves: session.last_moves().to_vec(),
            board_revision: session.board().fingerprint(),
        }
    }
}
