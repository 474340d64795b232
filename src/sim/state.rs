//! Game state and core simulation types
//!
//! Everything the frame tick mutates lives in [`GameState`].

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::rect::Rect;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Launches allowed
    Playing,
    /// Round ended, counting down to the next round
    GameOver,
}

/// A target ("pig")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Scale relative to the base size, clamped to [0.8, 1.5]
    pub size_factor: f32,
    pub alive: bool,
    /// Tick of the last placement or hit
    pub last_moved_tick: u64,
    /// Frames since the last nudge attempt
    pub idle_ticks: u32,
    /// Wander velocity (px/tick)
    pub vel: Vec2,
    /// Frames until the wander velocity is re-randomized
    pub redirect_ticks: u32,
}

impl Target {
    pub fn new(id: u32, pos: Vec2, size_factor: f32, base_size: f32) -> Self {
        let size_factor = size_factor.clamp(SIZE_FACTOR_MIN, SIZE_FACTOR_MAX);
        let edge = (base_size * size_factor).floor();
        Self {
            id,
            pos,
            size: Vec2::splat(edge),
            size_factor,
            alive: true,
            last_moved_tick: 0,
            idle_ticks: 0,
            vel: Vec2::ZERO,
            redirect_ticks: 0,
        }
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Bounds if the target were at `pos`
    #[inline]
    pub fn bounds_at(&self, pos: Vec2) -> Rect {
        Rect::from_pos_size(pos, self.size)
    }

    /// Points awarded for hitting this target
    pub fn hit_score(&self, per_hit: f32) -> u64 {
        (per_hit * self.size_factor).floor().max(0.0) as u64
    }
}

/// The player's projectile ("bird")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub active: bool,
}

impl Projectile {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            size: Vec2::splat(PROJECTILE_SIZE),
            active: true,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// Drag state of the slingshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sling {
    pub dragging: bool,
    /// Current (clamped) drag point
    pub pull: Vec2,
}

/// Notable things that happened during a tick, drained by the driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RoundStarted { round: u32 },
    Launched { shot: u32, vel: Vec2 },
    TargetHit { target_id: u32, points: u64 },
    /// Emitted once per round on entering GameOver
    GameOver { score: u64 },
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub arena: Arena,
    /// Rounds started so far (1-based once the first round begins)
    pub round: u32,
    pub score: u64,
    pub shots_fired: u32,
    pub phase: GamePhase,
    /// Frames left in GameOver
    pub game_over_ticks: u32,
    /// Submit-once latch for the current round
    pub score_submitted: bool,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Targets (stable order, sorted by id)
    pub targets: Vec<Target>,
    pub projectile: Option<Projectile>,
    pub sling: Sling,
    /// Events produced since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game on the default 800x400 arena
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self::with_arena(seed, tuning, Arena::default())
    }

    pub fn with_arena(seed: u64, tuning: Tuning, arena: Arena) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning: tuning.sanitized(),
            arena,
            round: 0,
            score: 0,
            shots_fired: 0,
            phase: GamePhase::Playing,
            game_over_ticks: 0,
            score_submitted: false,
            time_ticks: 0,
            targets: Vec::new(),
            projectile: None,
            sling: Sling::default(),
            events: Vec::new(),
            next_id: 1,
        };

        state.start_round();
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Reset round counters and lay out a fresh level
    pub fn start_round(&mut self) {
        self.round += 1;
        self.score = 0;
        self.shots_fired = 0;
        self.phase = GamePhase::Playing;
        self.game_over_ticks = 0;
        self.score_submitted = false;
        self.projectile = None;
        self.sling = Sling::default();
        self.sling.pull = self.arena.anchor;

        super::level::generate_level(self);

        log::info!(
            "Round {} started with {} targets",
            self.round,
            self.targets.len()
        );
        self.events.push(GameEvent::RoundStarted { round: self.round });
    }

    pub fn alive_targets(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter().filter(|t| t.alive)
    }

    pub fn shots_remaining(&self) -> u32 {
        self.tuning.max_shots.saturating_sub(self.shots_fired)
    }

    /// Whether a new drag may begin
    pub fn can_launch(&self) -> bool {
        self.phase == GamePhase::Playing
            && self.projectile.is_none()
            && self.shots_fired < self.tuning.max_shots
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ensure targets are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.targets.sort_by_key(|t| t.id);
    }
}
