//! Arena bounds, launch anchor and the target placement rectangle

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::*;

/// Playing field geometry. Recomputed only on resize.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
    /// Point projectiles are released from
    pub anchor: Vec2,
    /// Region reserved for target boxes
    pub placement: Rect,
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(ARENA_WIDTH, ARENA_HEIGHT)
    }
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        let width = width.max(1.0);
        let height = height.max(1.0);

        let left = width * PLACEMENT_LEFT_FRAC;
        let top = height * PLACEMENT_TOP_FRAC;
        let right = width - width * PLACEMENT_RIGHT_MARGIN_FRAC;
        let bottom = height - height * PLACEMENT_BOTTOM_MARGIN_FRAC;

        Self {
            width,
            height,
            anchor: Vec2::new(width * ANCHOR_X_FRAC, height * ANCHOR_Y_FRAC),
            placement: Rect::new(left, top, (right - left).max(0.0), (bottom - top).max(0.0)),
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Clamp a point into the arena
    pub fn clamp_point(&self, p: Vec2) -> Vec2 {
        let p = if p.is_finite() { p } else { self.anchor };
        p.clamp(Vec2::ZERO, Vec2::new(self.width, self.height))
    }

    /// Allowed top-left range for a target box of `size`
    pub fn placement_range(&self, size: Vec2) -> (Vec2, Vec2) {
        self.placement.origin_range(size)
    }
}
