#![cfg(target_arch = "wasm32")]

use checkers::wasm::WasmCheckers;
use js_sys::Reflect;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

fn field(value: &JsValue, key: &str) -> JsValue {
    Reflect::get(value, &JsValue::from_str(key)).unwrap()
}

fn instant_config() -> JsValue {
    let config = js_sys::Object::new();
    Reflect::set(
        &config,
        &JsValue::from_str("pacing_per_candidate_ms"),
        &JsValue::from_f64(0.0),
    )
    .unwrap();
    config.into()
}

#[wasm_bindgen_test]
fn loader_health_check() {
    assert!(checkers::wasm_ready());
}

#[wasm_bindgen_test]
fn human_move_then_automated_reply() {
    let mut game = WasmCheckers::new("alice", instant_config()).unwrap();

    let accepted = game.validate_move(2, 1, 3, 0).unwrap();
    assert_eq!(field(&accepted, "ok"), JsValue::TRUE);

    let submitted = game.submit_turn().unwrap();
    let handoff = field(&submitted, "data");
    assert_eq!(field(&handoff, "awaiting_automated"), JsValue::TRUE);
    assert_eq!(game.pacing_ms(), 0.0);

    let played = game.automated_turn().unwrap();
    assert_eq!(field(&played, "ok"), JsValue::TRUE);

    let state = game.state().unwrap();
    assert_eq!(field(&state, "active_color"), JsValue::from_str("red"));
}

#[wasm_bindgen_test]
fn rejected_move_reports_reason() {
    let mut game = WasmCheckers::new("alice", JsValue::UNDEFINED).unwrap();

    let rejected = game.validate_move(2, 1, 1, 0).unwrap();

    assert_eq!(field(&rejected, "ok"), JsValue::FALSE);
    assert_eq!(
        field(&rejected, "reason"),
        JsValue::from_str("wrong_direction")
    );
}

#[wasm_bindgen_test]
fn board_for_rejects_unknown_color() {
    let game = WasmCheckers::new("alice", JsValue::NULL).unwrap();

    assert!(game.board_for("red").is_ok());
    assert!(game.board_for("blue").is_err());
}
