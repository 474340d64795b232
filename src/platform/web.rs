//! Browser bindings
//!
//! Thin wasm-bindgen wrapper around [`Game`]. The page owns the canvas,
//! pointer capture and the `requestAnimationFrame` loop; it feeds arena-space
//! coordinates in and reads a JSON frame description back out.

use wasm_bindgen::prelude::*;

use super::{ScorePayload, ScoreSink};
use crate::game::Game;
use crate::tuning::Tuning;

/// Calls a page-provided JS function with the JSON payload and ignores the result
struct JsSink {
    callback: js_sys::Function,
}

impl ScoreSink for JsSink {
    fn submit_score(&mut self, score: u64) {
        let body = JsValue::from_str(&ScorePayload { score }.to_json());
        if let Err(e) = self.callback.call1(&JsValue::NULL, &body) {
            log::warn!("Score submission failed: {:?}", e);
        }
    }
}

#[wasm_bindgen]
pub struct WebGame {
    game: Game,
    last_time: Option<f64>,
}

#[wasm_bindgen]
impl WebGame {
    /// `tuning_json` may be empty for defaults; `submit` receives `{"score": n}`
    #[wasm_bindgen(constructor)]
    pub fn new(tuning_json: &str, submit: js_sys::Function) -> WebGame {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        let tuning = if tuning_json.trim().is_empty() {
            Tuning::default()
        } else {
            Tuning::from_json(tuning_json).unwrap_or_else(|e| {
                log::warn!("Invalid tuning, using defaults: {}", e);
                Tuning::default()
            })
        };

        let seed = js_sys::Date::now() as u64;
        log::info!("Starting pig-sling with seed {}", seed);

        WebGame {
            game: Game::new(seed, tuning, Box::new(JsSink { callback: submit })),
            last_time: None,
        }
    }

    pub fn drag_start(&mut self, x: f32, y: f32) {
        self.game.drag_start(x, y);
    }

    pub fn drag_move(&mut self, x: f32, y: f32) {
        self.game.drag_move(x, y);
    }

    pub fn drag_end(&mut self, x: f32, y: f32) {
        self.game.drag_end(x, y);
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.game.on_resize(width, height);
    }

    pub fn set_autoplay(&mut self, enabled: bool) {
        self.game.set_autoplay(enabled);
    }

    /// Advance to animation-frame time `now_ms` and return the frame as JSON
    pub fn frame(&mut self, now_ms: f64) -> String {
        if now_ms.is_finite() {
            let elapsed = self.last_time.map(|t| now_ms - t).unwrap_or(0.0);
            self.last_time = Some(now_ms);
            self.game.advance(elapsed);
        }

        self.game.view().to_json().unwrap_or_else(|e| {
            log::error!("Frame serialization failed: {}", e);
            String::from("{}")
        })
    }
}
