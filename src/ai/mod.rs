//! Automated opponent: move choice plus the pacing that surfaces it.
//!
//! The decision procedure is minimal and deterministic: take the
//! first capture if there is one, otherwise the first legal move, and keep
//! jumping with the same piece while the chain continues.

pub mod pacing;

use std::fmt;
use std::sync::Arc;

use log::debug;
use serde::Serialize;

use crate::board::Board;
use crate::config::EngineConfig;
use crate::error::GameError;
use crate::game::{GameSession, TurnHandoff};
use crate::moves::Move;
use crate::types::PieceColor;

pub use pacing::{CancelToken, Pacing, PacingOutcome};

pub trait MoveSelector: Send + Sync {
    /// Picks the opening move of a turn for `color`.
    fn select_move(&self, board: &Board, color: PieceColor) -> Option<Move>;

    /// Picks the next jump of an unfinished chain. Every entry in `jumps`
    /// starts on the square the previous jump landed on.
    fn select_continuation(&self, board: &Board, jumps: &[Move]) -> Option<Move> {
        let _ = board;
        jumps.first().copied()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FirstLegalMoveSelector;

impl MoveSelector for FirstLegalMoveSelector {
    fn select_move(&self, board: &Board, color: PieceColor) -> Option<Move> {
        let legal = board.legal_moves(color);
        legal
            .iter()
            .find(|mv| mv.is_jump_kind())
            .or_else(|| legal.first())
            .copied()
    }
}

/// What the automated side did during one activation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AutomatedTurn {
    pub moves: Vec<Move>,
    /// `None` when there was nothing to play and the turn was left open.
    pub handoff: Option<TurnHandoff>,
}

#[derive(Clone)]
pub struct AutomatedOpponent {
    selector: Arc<dyn MoveSelector>,
    config: EngineConfig,
}

impl AutomatedOpponent {
    pub fn new(selector: Arc<dyn MoveSelector>, config: EngineConfig) -> Self {
        Self { selector, config }
    }

    pub fn with_default_selector(config: EngineConfig) -> Self {
        Self::new(Arc::new(FirstLegalMoveSelector), config)
    }

    /// Pacing for the position the session is in now, tied to the session's
    /// cancel token.
    pub fn pacing_for(&self, session: &GameSession) -> Pacing {
        let candidates = session
            .current_board()
            .legal_moves(session.active_color())
            .len();
        Pacing::start(self.config.pacing_for(candidates), session.cancel_token())
    }

    /// Plays a whole turn for the active side through the session's turn
    /// and submits it.
    pub fn play_turn(&self, session: &mut GameSession) -> Result<AutomatedTurn, GameError> {
        let name = session.active_player().name().to_string();
        let color = session.active_color();

        let Some(first) = self.selector.select_move(session.current_board(), color) else {
            debug!("{name} has no move to make");
            return Ok(AutomatedTurn {
                moves: Vec::new(),
                handoff: None,
            });
        };

        debug!("{name} chose {first}");
        session.validate_move(&name, first)?;
        let mut moves = vec![first];

        while let Some(from) = session.turn().pending_jump_from() {
            let jumps = session.turn().available_jumps(from);
            let next = self
                .selector
                .select_continuation(session.current_board(), &jumps)
                .filter(|mv| mv.start == from);
            let Some(next) = next else {
                break;
            };
            debug!("{name} continues with {next}");
            session.validate_move(&name, next)?;
            moves.push(next);
        }

        let handoff = session.finalize_turn()?;
        Ok(AutomatedTurn {
            moves,
            handoff: Some(handoff),
        })
    }
}

impl fmt::Debug for AutomatedOpponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutomatedOpponent")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
