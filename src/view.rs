//! Per-frame draw descriptors
//!
//! The renderer only ever sees these plain values, never the game state.

use glam::Vec2;
use serde::Serialize;

use crate::sim::{GamePhase, GameState};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetView {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub alive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectileView {
    pub pos: Vec2,
    pub size: Vec2,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlingView {
    pub anchor: Vec2,
    pub dragging: bool,
    pub pull: Vec2,
    /// A loaded projectile is waiting at the anchor
    pub ready: bool,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameView {
    pub width: f32,
    pub height: f32,
    pub targets: Vec<TargetView>,
    pub projectile: Option<ProjectileView>,
    pub sling: SlingView,
    pub score: u64,
    pub shots_remaining: u32,
    pub phase: GamePhase,
}

impl FrameView {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            width: state.arena.width,
            height: state.arena.height,
            targets: state
                .targets
                .iter()
                .map(|t| TargetView {
                    id: t.id,
                    pos: t.pos,
                    size: t.size,
                    alive: t.alive,
                })
                .collect(),
            projectile: state.projectile.as_ref().map(|p| ProjectileView {
                pos: p.pos,
                size: p.size,
                active: p.active,
            }),
            sling: SlingView {
                anchor: state.arena.anchor,
                dragging: state.sling.dragging,
                pull: state.sling.pull,
                ready: state.can_launch(),
            },
            score: state.score,
            shots_remaining: state.shots_remaining(),
            phase: state.phase,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
