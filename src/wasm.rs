//! Browser bindings: one game of a human (Red) against the automated
//! opponent (White).
//!
//! ```javascript
//! const game = new WasmCheckers("alice", { pacing_per_candidate_ms: 300 });
//! game.validateMove(2, 1, 3, 0);
//! const handoff = game.submitTurn();
//! if (handoff.awaiting_automated) {
//!     setTimeout(() => game.automatedTurn(), game.pacingMs());
//! }
//! ```
//!
//! Coordinates are engine coordinates. [`BoardView`] squares carry them, so
//! clients never have to undo the rotation themselves.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::ai::{AutomatedOpponent, Pacing};
use crate::config::EngineConfig;
use crate::error::{GameError, RejectionReason};
use crate::game::{GameSession, Player, SessionId};
use crate::moves::Move;
use crate::types::{PieceColor, Position};
use crate::view::{BoardView, GameStateView};

/// Reply to a request that either goes through or is rejected.
#[derive(Debug, Clone, Serialize)]
struct MessageView<T: Serialize> {
    ok: bool,
    reason: Option<RejectionReason>,
    message: String,
    data: Option<T>,
}

impl<T: Serialize> MessageView<T> {
    fn from_result(result: Result<T, GameError>) -> Self {
        match result {
            Ok(data) => Self {
                ok: true,
                reason: None,
                message: String::new(),
                data: Some(data),
            },
            Err(err) => Self {
                ok: false,
                reason: Some(err.reason()),
                message: err.to_string(),
                data: None,
            },
        }
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    Ok(serde_wasm_bindgen::to_value(value)?)
}

fn reply<T: Serialize>(result: Result<T, GameError>) -> Result<JsValue, JsValue> {
    to_js(&MessageView::from_result(result))
}

#[wasm_bindgen]
pub struct WasmCheckers {
    session: GameSession,
    human: String,
    pacing: Option<Pacing>,
}

#[wasm_bindgen]
impl WasmCheckers {
    /// `config` may be `undefined` or a partial [`EngineConfig`] object.
    #[wasm_bindgen(constructor)]
    pub fn new(name: &str, config: JsValue) -> Result<WasmCheckers, JsValue> {
        let config: EngineConfig = if config.is_undefined() || config.is_null() {
            EngineConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        let automated = Player::automated(
            config.automated_name(1),
            AutomatedOpponent::with_default_selector(config),
        );
        Ok(Self {
            session: GameSession::new(SessionId(1), Player::human(name), automated),
            human: name.to_string(),
            pacing: None,
        })
    }

    #[wasm_bindgen(js_name = validateMove)]
    pub fn validate_move(
        &mut self,
        from_row: i8,
        from_col: i8,
        to_row: i8,
        to_col: i8,
    ) -> Result<JsValue, JsValue> {
        let mv = Move::new(
            Position::new(from_row, from_col),
            Position::new(to_row, to_col),
            PieceColor::Red,
        );
        reply(self.session.validate_move(&self.human, mv))
    }

    #[wasm_bindgen(js_name = backupMove)]
    pub fn backup_move(&mut self) -> Result<JsValue, JsValue> {
        reply(self.session.back_up_move(&self.human))
    }

    /// Submits the human's turn and starts the automated side's pacing when
    /// it is up next.
    #[wasm_bindgen(js_name = submitTurn)]
    pub fn submit_turn(&mut self) -> Result<JsValue, JsValue> {
        let result = self.session.finalize_turn_for(&self.human);
        if result.as_ref().is_ok_and(|handoff| handoff.awaiting_automated) {
            self.pacing = self.session.automated_pacing().ok();
        }
        reply(result)
    }

    /// Milliseconds left before the automated move should be shown.
    #[wasm_bindgen(js_name = pacingMs)]
    pub fn pacing_ms(&self) -> f64 {
        self.pacing
            .as_ref()
            .map_or(0.0, |pacing| pacing.remaining().as_millis() as f64)
    }

    #[wasm_bindgen(js_name = automatedTurn)]
    pub fn automated_turn(&mut self) -> Result<JsValue, JsValue> {
        self.pacing = None;
        reply(self.session.play_automated_turn())
    }

    pub fn resign(&mut self) -> Result<JsValue, JsValue> {
        let result = self.session.resign(&self.human);
        self.pacing = None;
        reply(result)
    }

    pub fn state(&self) -> Result<JsValue, JsValue> {
        to_js(&GameStateView::from_session(&self.session))
    }

    /// The working board as `color` ("red" or "white") sees it.
    #[wasm_bindgen(js_name = boardFor)]
    pub fn board_for(&self, color: &str) -> Result<JsValue, JsValue> {
        let viewer = match color {
            "red" => PieceColor::Red,
            "white" => PieceColor::White,
            other => return Err(JsValue::from_str(&format!("unknown color: {other}"))),
        };
        to_js(&BoardView::for_color(self.session.current_board(), viewer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_carries_reason_and_message() {
        let view = MessageView::<()>::from_result(Err(GameError::InvalidResignState));

        assert!(!view.ok);
        assert_eq!(view.reason, Some(RejectionReason::CannotResign));
        assert_eq!(view.message, "cannot resign in the middle of a turn");
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["reason"], "cannot_resign");
    }

    #[test]
    fn success_has_no_reason() {
        let view = MessageView::from_result(Ok(3u8));

        assert!(view.ok);
        assert_eq!(view.reason, None);
        assert_eq!(view.data, Some(3));
    }
}
