use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::game::SessionId;
use crate::types::Position;

/// Short, stable vocabulary for why a request was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    WrongDirection,
    MustJump,
    MustContinueSamePiece,
    InvalidShape,
    OutOfBounds,
    NotYourPiece,
    TurnOver,
    NotActivePlayer,
    GameOver,
    CannotResign,
    NotFound,
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::WrongDirection => "wrong direction",
            Self::MustJump => "must make jump",
            Self::MustContinueSamePiece => "must continue with same piece",
            Self::InvalidShape => "invalid shape",
            Self::OutOfBounds => "out of bounds",
            Self::NotYourPiece => "not your piece",
            Self::TurnOver => "turn over",
            Self::NotActivePlayer => "not active player",
            Self::GameOver => "game over",
            Self::CannotResign => "cannot resign",
            Self::NotFound => "not found",
        };
        f.write_str(text)
    }
}

/// Which forced-capture rule a move broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForcedJump {
    /// A single step while a jump is available or after a jump this turn.
    MustJump,
    /// A continuation jump started from a different square.
    SamePiece,
}

impl fmt::Display for ForcedJump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MustJump => f.write_str("Invalid move: must make jump move"),
            Self::SamePiece => f.write_str("Invalid move: must jump with same Piece"),
        }
    }
}

/// Rejection of a single move submitted to a [`Turn`](crate::turn::Turn).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("Invalid move: {0} is off the board")]
    OutOfBounds(Position),
    #[error("Invalid move: no piece at {0}")]
    EmptyStart(Position),
    #[error("Invalid move: the piece at {0} is not yours")]
    NotOwnPiece(Position),
    #[error("Invalid move: Incorrect move direction")]
    IllegalMoveDirection,
    #[error("{0}")]
    ForcedJumpViolation(ForcedJump),
    #[error("Invalid move: Can only move one space")]
    InvalidMoveShape,
    #[error("Invalid move: {0} is occupied")]
    DestinationOccupied(Position),
    #[error("Invalid move: the turn is complete, submit it")]
    TurnComplete,
    #[error("nothing to back up")]
    NothingToBackUp,
}

impl MoveError {
    pub fn reason(&self) -> RejectionReason {
        match self {
            Self::OutOfBounds(_) => RejectionReason::OutOfBounds,
            Self::EmptyStart(_) | Self::NotOwnPiece(_) => RejectionReason::NotYourPiece,
            Self::IllegalMoveDirection => RejectionReason::WrongDirection,
            Self::ForcedJumpViolation(ForcedJump::MustJump) => RejectionReason::MustJump,
            Self::ForcedJumpViolation(ForcedJump::SamePiece) => {
                RejectionReason::MustContinueSamePiece
            }
            Self::InvalidMoveShape | Self::DestinationOccupied(_) => RejectionReason::InvalidShape,
            Self::TurnComplete | Self::NothingToBackUp => RejectionReason::TurnOver,
        }
    }
}

/// Session and registry level failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error(transparent)]
    Move(#[from] MoveError),
    #[error("{0} is not the active player")]
    NotActivePlayer(String),
    #[error("{0} is not playing in this game")]
    UnknownPlayer(String),
    #[error("the game is already over")]
    SessionAlreadyOver,
    #[error("cannot resign in the middle of a turn")]
    InvalidResignState,
    #[error("no move has been made this turn")]
    NoMoveMade,
    #[error("Invalid move: must continue jumping from {0}")]
    JumpPending(Position),
    #[error("{0} is already in a game")]
    PlayerAlreadyInGame(String),
    #[error("no game found for {0}")]
    PlayerNotInGame(String),
    #[error("session {0} not found")]
    SessionNotFound(SessionId),
    #[error("it is not the automated player's turn")]
    NotAutomatedTurn,
}

impl GameError {
    pub fn reason(&self) -> RejectionReason {
        match self {
            Self::Move(err) => err.reason(),
            Self::NotActivePlayer(_) | Self::UnknownPlayer(_) | Self::NotAutomatedTurn => {
                RejectionReason::NotActivePlayer
            }
            Self::SessionAlreadyOver => RejectionReason::GameOver,
            Self::InvalidResignState => RejectionReason::CannotResign,
            Self::NoMoveMade => RejectionReason::TurnOver,
            Self::JumpPending(_) => RejectionReason::MustJump,
            Self::PlayerAlreadyInGame(_) => RejectionReason::NotActivePlayer,
            Self::PlayerNotInGame(_) | Self::SessionNotFound(_) => RejectionReason::NotFound,
        }
    }
}

/// Direct board mutation outside the grid or onto a light square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("{0} is off the board")]
    OutOfBounds(Position),
    #[error("{0} is a light square")]
    Unplayable(Position),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forced_jump_messages_match_rejection_text() {
        let must = MoveError::ForcedJumpViolation(ForcedJump::MustJump);
        let same = MoveError::ForcedJumpViolation(ForcedJump::SamePiece);

        assert_eq!(must.to_string(), "Invalid move: must make jump move");
        assert_eq!(same.to_string(), "Invalid move: must jump with same Piece");
        assert_eq!(must.reason(), RejectionReason::MustJump);
        assert_eq!(same.reason(), RejectionReason::MustContinueSamePiece);
    }

    #[test]
    fn game_error_wraps_move_error_transparently() {
        let err: GameError = MoveError::IllegalMoveDirection.into();

        assert_eq!(err.to_string(), "Invalid move: Incorrect move direction");
        assert_eq!(err.reason(), RejectionReason::WrongDirection);
    }

    #[test]
    fn reasons_render_as_short_phrases() {
        assert_eq!(RejectionReason::InvalidShape.to_string(), "invalid shape");
        assert_eq!(
            GameError::InvalidResignState.reason().to_string(),
            "cannot resign"
        );
    }
}
