use std::fmt;

use log::{debug, info};
use serde::Serialize;

use crate::ai::{AutomatedOpponent, AutomatedTurn, CancelToken, Pacing};
use crate::board::Board;
use crate::error::GameError;
use crate::moves::{Move, MoveKind};
use crate::turn::{Turn, TurnPhase};
use crate::types::PieceColor;
use crate::view::TurnCheck;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Who sits behind a color.
#[derive(Debug, Clone)]
pub enum PlayerKind {
    Human,
    Automated(AutomatedOpponent),
}

#[derive(Debug, Clone)]
pub struct Player {
    name: String,
    kind: PlayerKind,
}

impl Player {
    pub fn human(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: PlayerKind::Human,
        }
    }

    pub fn automated(name: impl Into<String>, opponent: AutomatedOpponent) -> Self {
        Self {
            name: name.into(),
            kind: PlayerKind::Automated(opponent),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &PlayerKind {
        &self.kind
    }

    pub fn is_automated(&self) -> bool {
        matches!(self.kind, PlayerKind::Automated(_))
    }

    pub fn automation(&self) -> Option<&AutomatedOpponent> {
        match &self.kind {
            PlayerKind::Automated(opponent) => Some(opponent),
            PlayerKind::Human => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// The loser has no pieces left.
    Captures,
    /// The loser had pieces but no legal move on their turn.
    NoMoves,
    Resignation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub winner: PieceColor,
    pub loser: PieceColor,
    pub reason: EndReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Over(Outcome),
}

/// Result of submitting a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TurnHandoff {
    pub next_mover: PieceColor,
    /// The automated side should be triggered now.
    pub awaiting_automated: bool,
    pub game_over: bool,
}

/// A game between two players: authoritative board, the active turn and the
/// end-of-game bookkeeping.
///
/// Not internally synchronized; callers serialize access per session.
#[derive(Debug)]
pub struct GameSession {
    id: SessionId,
    red: Player,
    white: Player,
    board: Board,
    turn: Turn,
    status: GameStatus,
    cancel: CancelToken,
    red_acknowledged: bool,
    white_acknowledged: bool,
}

impl GameSession {
    /// Starts from the opening position with Red to move.
    pub fn new(id: SessionId, red: Player, white: Player) -> Self {
        Self::with_board(id, red, white, Board::new(), PieceColor::Red)
    }

    /// Starts from an arbitrary position with `first` to move.
    pub fn with_board(
        id: SessionId,
        red: Player,
        white: Player,
        board: Board,
        first: PieceColor,
    ) -> Self {
        info!(
            "session {id} created: {} (red) vs {} (white)",
            red.name(),
            white.name()
        );
        let turn = Turn::new(first, board.clone());
        Self {
            id,
            red,
            white,
            board,
            turn,
            status: GameStatus::Ongoing,
            cancel: CancelToken::new(),
            red_acknowledged: false,
            white_acknowledged: false,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn red_player(&self) -> &Player {
        &self.red
    }

    pub fn white_player(&self) -> &Player {
        &self.white
    }

    pub fn player(&self, color: PieceColor) -> &Player {
        match color {
            PieceColor::Red => &self.red,
            PieceColor::White => &self.white,
        }
    }

    pub fn color_of(&self, name: &str) -> Option<PieceColor> {
        if self.red.name() == name {
            Some(PieceColor::Red)
        } else if self.white.name() == name {
            Some(PieceColor::White)
        } else {
            None
        }
    }

    pub fn contains_player(&self, name: &str) -> bool {
        self.color_of(name).is_some()
    }

    /// The committed board. While a turn is in progress renders should use
    /// [`GameSession::current_board`].
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_board(&self) -> &Board {
        self.turn.current_board()
    }

    pub fn turn(&self) -> &Turn {
        &self.turn
    }

    /// Moves made so far in the active turn.
    pub fn last_moves(&self) -> &[Move] {
        self.turn.history()
    }

    pub fn active_color(&self) -> PieceColor {
        self.turn.color()
    }

    pub fn active_player(&self) -> &Player {
        self.player(self.active_color())
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.status {
            GameStatus::Over(outcome) => Some(outcome),
            GameStatus::Ongoing => None,
        }
    }

    pub fn is_over(&self) -> bool {
        matches!(self.status, GameStatus::Over(_))
    }

    pub fn is_resigned(&self) -> bool {
        self.outcome()
            .is_some_and(|outcome| outcome.reason == EndReason::Resignation)
    }

    pub fn winner(&self) -> Option<&Player> {
        self.outcome().map(|outcome| self.player(outcome.winner))
    }

    pub fn loser(&self) -> Option<&Player> {
        self.outcome().map(|outcome| self.player(outcome.loser))
    }

    /// Token cancelled when the game ends; pacing delays hang off it.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    fn ensure_live(&self) -> Result<(), GameError> {
        if self.is_over() {
            return Err(GameError::SessionAlreadyOver);
        }
        Ok(())
    }

    fn ensure_active(&self, name: &str) -> Result<(), GameError> {
        self.ensure_live()?;
        match self.color_of(name) {
            None => Err(GameError::UnknownPlayer(name.to_string())),
            Some(color) if color != self.active_color() => {
                Err(GameError::NotActivePlayer(name.to_string()))
            }
            Some(_) => Ok(()),
        }
    }

    /// Validates and applies `mv` for the active player `name`.
    pub fn validate_move(&mut self, name: &str, mv: Move) -> Result<MoveKind, GameError> {
        self.ensure_active(name)?;
        let kind = self.turn.validate(mv)?;
        Ok(kind)
    }

    /// Retracts the last step of the active player's turn.
    pub fn back_up_move(&mut self, name: &str) -> Result<Move, GameError> {
        self.ensure_active(name)?;
        let reversed = self.turn.back_up_move()?;
        Ok(reversed)
    }

    /// [`GameSession::finalize_turn`] on behalf of `name`.
    pub fn finalize_turn_for(&mut self, name: &str) -> Result<TurnHandoff, GameError> {
        self.ensure_active(name)?;
        self.finalize_turn()
    }

    /// Commits the working board, removes this turn's captures, rotates to
    /// the other color and checks for the end of the game.
    pub fn finalize_turn(&mut self) -> Result<TurnHandoff, GameError> {
        self.ensure_live()?;
        if self.turn.phase() == TurnPhase::Empty {
            return Err(GameError::NoMoveMade);
        }
        if let Some(from) = self.turn.pending_jump_from() {
            return Err(GameError::JumpPending(from));
        }

        let mover = self.turn.color();
        let mut board = self.turn.current_board().clone();
        board.apply_captures(self.turn.captured());
        debug!(
            "session {} committed {} capture(s) for {mover}",
            self.id,
            self.turn.captured().len()
        );

        let next = mover.opponent();
        self.turn = Turn::new(next, board.clone());
        self.board = board;

        if let Some(outcome) = self.detect_end(mover) {
            self.finish(outcome);
        }

        Ok(TurnHandoff {
            next_mover: next,
            awaiting_automated: !self.is_over() && self.player(next).is_automated(),
            game_over: self.is_over(),
        })
    }

    fn detect_end(&self, mover: PieceColor) -> Option<Outcome> {
        let next = mover.opponent();
        for color in [PieceColor::Red, PieceColor::White] {
            if self.board.count_of(color) == 0 {
                return Some(Outcome {
                    winner: color.opponent(),
                    loser: color,
                    reason: EndReason::Captures,
                });
            }
        }
        if self.board.legal_moves(next).is_empty() {
            return Some(Outcome {
                winner: mover,
                loser: next,
                reason: EndReason::NoMoves,
            });
        }
        None
    }

    fn finish(&mut self, outcome: Outcome) {
        info!(
            "session {} over: {} ({}) beat {} ({}) by {:?}",
            self.id,
            self.player(outcome.winner).name(),
            outcome.winner,
            self.player(outcome.loser).name(),
            outcome.loser,
            outcome.reason
        );
        self.status = GameStatus::Over(outcome);
        self.cancel.cancel();
    }

    /// Concedes the game for `name`. Not allowed halfway through one's own
    /// turn.
    pub fn resign(&mut self, name: &str) -> Result<Outcome, GameError> {
        self.ensure_live()?;
        let color = self
            .color_of(name)
            .ok_or_else(|| GameError::UnknownPlayer(name.to_string()))?;
        if color == self.active_color() && self.turn.phase() != TurnPhase::Empty {
            return Err(GameError::InvalidResignState);
        }

        let outcome = Outcome {
            winner: color.opponent(),
            loser: color,
            reason: EndReason::Resignation,
        };
        self.finish(outcome);
        Ok(outcome)
    }

    /// Whether it is `name`'s move, plus a revision stamp of the committed
    /// board for polling clients.
    pub fn check_turn(&self, name: &str) -> Result<TurnCheck, GameError> {
        let color = self
            .color_of(name)
            .ok_or_else(|| GameError::UnknownPlayer(name.to_string()))?;
        Ok(TurnCheck {
            is_my_turn: !self.is_over() && color == self.active_color(),
            game_over: self.is_over(),
            board_revision: self.board.fingerprint(),
        })
    }

    /// Records that `name` has seen the final position. Returns true once
    /// every human player has; automated players never need to.
    pub fn acknowledge_end(&mut self, name: &str) -> Result<bool, GameError> {
        if !self.is_over() {
            return Ok(false);
        }
        match self.color_of(name) {
            Some(PieceColor::Red) => self.red_acknowledged = true,
            Some(PieceColor::White) => self.white_acknowledged = true,
            None => return Err(GameError::UnknownPlayer(name.to_string())),
        }
        Ok((self.red_acknowledged || self.red.is_automated())
            && (self.white_acknowledged || self.white.is_automated()))
    }

    /// The automated player to move, if the side to move is automated and
    /// the game is still on.
    pub fn automated_to_move(&self) -> Option<&AutomatedOpponent> {
        if self.is_over() {
            return None;
        }
        self.active_player().automation()
    }

    /// Pacing to wait out before [`GameSession::play_automated_turn`].
    pub fn automated_pacing(&self) -> Result<Pacing, GameError> {
        self.ensure_live()?;
        let opponent = self.automated_to_move().ok_or(GameError::NotAutomatedTurn)?;
        Ok(opponent.pacing_for(self))
    }

    /// Lets the automated side to move play and submit its turn.
    pub fn play_automated_turn(&mut self) -> Result<AutomatedTurn, GameError> {
        self.ensure_live()?;
        let opponent = self
            .automated_to_move()
            .cloned()
            .ok_or(GameError::NotAutomatedTurn)?;
        opponent.play_turn(self)
    }
}
