//! Pig Sling - A slingshot arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (placement, motion, projectile, round state)
//! - `tuning`: Data-driven game balance
//! - `game`: Frame driver that owns state, staged input and the score sink
//! - `view`: Per-frame draw descriptors for an external renderer
//! - `platform`: Frame clock and score submission boundary

pub mod game;
pub mod highscores;
pub mod platform;
pub mod sim;
pub mod tuning;
pub mod view;

pub use game::Game;
pub use highscores::HighScores;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed frame tick in milliseconds
    pub const FRAME_MS: u32 = 30;
    /// Maximum ticks per `advance` call to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 400.0;

    /// Launch anchor as a fraction of the arena (120, 300 at 800x400)
    pub const ANCHOR_X_FRAC: f32 = 0.15;
    pub const ANCHOR_Y_FRAC: f32 = 0.75;

    /// Placement rectangle edges as fractions of the arena
    /// (450..680 x 200..385 at 800x400)
    pub const PLACEMENT_LEFT_FRAC: f32 = 0.5625;
    pub const PLACEMENT_TOP_FRAC: f32 = 0.5;
    pub const PLACEMENT_RIGHT_MARGIN_FRAC: f32 = 0.15;
    pub const PLACEMENT_BOTTOM_MARGIN_FRAC: f32 = 0.0375;

    /// Projectile box edge
    pub const PROJECTILE_SIZE: f32 = 35.0;

    /// Size factor clamp for targets
    pub const SIZE_FACTOR_MIN: f32 = 0.8;
    pub const SIZE_FACTOR_MAX: f32 = 1.5;

    /// Starting slots for targets, as arena fractions
    pub const STARTING_SLOTS: [(f32, f32); 6] = [
        (0.625, 0.625),
        (0.75, 0.75),
        (0.875, 0.5),
        (0.6875, 0.5),
        (0.8125, 0.625),
        (0.625, 0.75),
    ];
}

/// Clamp a point into an axis-aligned range, tolerating an inverted range
#[inline]
pub fn clamp_vec(v: Vec2, min: Vec2, max: Vec2) -> Vec2 {
    Vec2::new(v.x.max(min.x).min(max.x.max(min.x)), v.y.max(min.y).min(max.y.max(min.y)))
}

/// Uniform random unit vector
#[inline]
pub fn random_unit<R: rand::Rng>(rng: &mut R) -> Vec2 {
    let angle = rng.random::<f32>() * std::f32::consts::TAU;
    Vec2::new(angle.cos(), angle.sin())
}
