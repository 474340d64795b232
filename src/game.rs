//! Frame driver
//!
//! Owns the game state, stages input between frames and forwards round
//! results to the score sink. Platform code talks to this type only.

use glam::Vec2;

use crate::platform::{FrameClock, ScoreSink};
use crate::sim::{GameEvent, GameState, PointerEvent, TickInput, tick};
use crate::tuning::Tuning;
use crate::view::FrameView;

/// Game instance holding all state
pub struct Game {
    state: GameState,
    input: TickInput,
    clock: FrameClock,
    sink: Box<dyn ScoreSink>,
}

impl Game {
    pub fn new(seed: u64, tuning: Tuning, sink: Box<dyn ScoreSink>) -> Self {
        let mut state = GameState::new(seed, tuning);
        state.drain_events();
        Self {
            state,
            input: TickInput::default(),
            clock: FrameClock::new(),
            sink,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn set_autoplay(&mut self, enabled: bool) {
        self.input.autoplay = enabled;
    }

    pub fn drag_start(&mut self, x: f32, y: f32) {
        self.input.pointer.push(PointerEvent::DragStart(Vec2::new(x, y)));
    }

    pub fn drag_move(&mut self, x: f32, y: f32) {
        self.input.pointer.push(PointerEvent::DragMove(Vec2::new(x, y)));
    }

    pub fn drag_end(&mut self, x: f32, y: f32) {
        self.input.pointer.push(PointerEvent::DragEnd(Vec2::new(x, y)));
    }

    pub fn on_resize(&mut self, width: f32, height: f32) {
        self.input.resize = Some(Vec2::new(width, height));
    }

    /// Run as many frames as `elapsed_ms` of real time covers
    pub fn advance(&mut self, elapsed_ms: f64) -> u32 {
        let ticks = self.clock.advance(elapsed_ms);
        for _ in 0..ticks {
            self.step();
        }
        ticks
    }

    /// Run exactly one frame with the staged input
    pub fn step(&mut self) -> Vec<GameEvent> {
        tick(&mut self.state, &self.input);

        // Clear one-shot inputs after processing
        self.input.pointer.clear();
        self.input.resize = None;

        let events = self.state.drain_events();
        for event in &events {
            if let GameEvent::GameOver { score } = event {
                self.sink.submit_score(*score);
            }
        }
        events
    }

    pub fn view(&self) -> FrameView {
        FrameView::from_state(&self.state)
    }
}
