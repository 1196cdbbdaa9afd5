use wasm_bindgen::prelude::*;

pub mod ai;
pub mod board;
pub mod center;
pub mod config;
pub mod error;
pub mod game;
pub mod moves;
pub mod turn;
pub mod types;
pub mod view;
pub mod wasm;

pub use board::Board;
pub use center::{GameCenter, SharedSession};
pub use config::EngineConfig;
pub use error::{BoardError, GameError, MoveError, RejectionReason};
pub use game::{EndReason, GameSession, Outcome, Player, PlayerKind, SessionId, TurnHandoff};
pub use moves::{Move, MoveKind};
pub use turn::{Turn, TurnPhase};
pub use types::{Piece, PieceColor, PieceRank, Position, Square, SquareShade};

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}
