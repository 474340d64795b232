//! Platform abstraction layer
//!
//! Handles the pieces that differ between the browser and native builds:
//! - Converting elapsed real time into fixed frame ticks
//! - Fire-and-forget score submission

#[cfg(target_arch = "wasm32")]
pub mod web;

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

use crate::consts::{FRAME_MS, MAX_SUBSTEPS};

/// Accumulates elapsed milliseconds and hands out whole frame ticks
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator_ms: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ticks to run for `elapsed_ms` of real time (capped)
    pub fn advance(&mut self, elapsed_ms: f64) -> u32 {
        let frame = FRAME_MS as f64;
        if !elapsed_ms.is_finite() {
            log::warn!("Ignoring non-finite frame time {}", elapsed_ms);
            return 0;
        }
        // Clamp huge gaps (tab in background, debugger pause)
        self.accumulator_ms += elapsed_ms.clamp(0.0, frame * MAX_SUBSTEPS as f64);

        let mut ticks = 0;
        while self.accumulator_ms >= frame && ticks < MAX_SUBSTEPS {
            self.accumulator_ms -= frame;
            ticks += 1;
        }
        ticks
    }
}

/// Body of a score submission request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScorePayload {
    pub score: u64,
}

impl ScorePayload {
    pub fn to_json(&self) -> String {
        // A struct with one integer field always serializes
        serde_json::to_string(self).unwrap_or_else(|_| format!("{{\"score\":{}}}", self.score))
    }
}

/// Receives the final score once per round.
///
/// Implementations must not block the frame loop and must swallow their own
/// failures.
pub trait ScoreSink {
    fn submit_score(&mut self, score: u64);
}

/// Logs submissions; used by the native runner
#[derive(Debug, Default)]
pub struct LogSink;

impl ScoreSink for LogSink {
    fn submit_score(&mut self, score: u64) {
        log::info!("Score submitted: {}", ScorePayload { score }.to_json());
    }
}

/// Shared handle, so the owner can still read the sink after giving it to the driver
impl<S: ScoreSink> ScoreSink for Rc<RefCell<S>> {
    fn submit_score(&mut self, score: u64) {
        self.borrow_mut().submit_score(score);
    }
}

/// Forwards every submission to both sinks
#[derive(Debug, Default)]
pub struct Tee<A, B>(pub A, pub B);

impl<A: ScoreSink, B: ScoreSink> ScoreSink for Tee<A, B> {
    fn submit_score(&mut self, score: u64) {
        self.0.submit_score(score);
        self.1.submit_score(score);
    }
}
