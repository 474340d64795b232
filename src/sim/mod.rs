//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed frame tick only (timers count ticks, never wall-clock time)
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod arena;
pub mod collision;
pub mod level;
pub mod motion;
pub mod placement;
pub mod rect;
pub mod state;
pub mod tick;

pub use arena::Arena;
pub use collision::{first_overlap, overlapping_pairs, projectile_hit};
pub use placement::{
    LayoutReport, Placement, place_grid, place_random, relocate, relocate_or_resolve, resolve_initial_layout,
};
pub use rect::{Rect, overlaps};
pub use state::{GameEvent, GamePhase, GameState, Projectile, Sling, Target};
pub use tick::{PointerEvent, TickInput, launch, resize, tick};
