//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation by one frame. Input is staged
//! into a [`TickInput`] between frames and applied here, so all mutation of
//! targets, projectile and round state happens in one place.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::collision::{projectile_hit, projectile_out_of_bounds};
use super::motion::update_targets;
use super::placement::{relocate_or_resolve, resolve_initial_layout};
use super::state::{GameEvent, GamePhase, GameState, Projectile};
use crate::tuning::HitPolicy;

/// Pointer events in arena coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    DragStart(Vec2),
    DragMove(Vec2),
    DragEnd(Vec2),
}

/// Input staged for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer events in arrival order
    pub pointer: Vec<PointerEvent>,
    /// New arena size (width, height)
    pub resize: Option<Vec2>,
    /// Demo mode - the game aims and fires by itself
    pub autoplay: bool,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.time_ticks += 1;

    if let Some(size) = input.resize {
        resize(state, size.x, size.y);
    }

    for event in &input.pointer {
        apply_pointer(state, *event);
    }
    if input.autoplay {
        autoplay(state);
    }

    let now = state.time_ticks;
    let area = state.arena.placement;

    update_projectile(state);
    update_targets(&mut state.targets, &area, &state.tuning, now, &mut state.rng);

    match state.phase {
        GamePhase::Playing => {
            let all_down = state.alive_targets().next().is_none();
            let out_of_shots =
                state.shots_fired >= state.tuning.max_shots && state.projectile.is_none();
            if all_down || out_of_shots {
                enter_game_over(state);
            }
        }
        GamePhase::GameOver => {
            state.game_over_ticks = state.game_over_ticks.saturating_sub(1);
            if state.game_over_ticks == 0 {
                state.start_round();
            }
        }
    }

    // Ensure deterministic ordering
    state.normalize_order();
}

fn enter_game_over(state: &mut GameState) {
    state.phase = GamePhase::GameOver;
    state.game_over_ticks = state.tuning.game_over_ticks.max(1);
    state.sling.dragging = false;

    if !state.score_submitted {
        state.score_submitted = true;
        state.events.push(GameEvent::GameOver { score: state.score });
    }

    log::info!(
        "Round {} over: score {} with {} shots",
        state.round,
        state.score,
        state.shots_fired
    );
}

/// Recompute arena geometry and push targets back into the new placement rect
pub fn resize(state: &mut GameState, width: f32, height: f32) {
    state.arena = Arena::new(width, height);
    state.sling.pull = state.arena.anchor;
    let report = resolve_initial_layout(
        &mut state.targets,
        &state.arena.placement,
        &state.tuning,
        state.time_ticks,
        &mut state.rng,
    );
    log::info!(
        "Arena resized to {}x{} ({} targets adjusted)",
        state.arena.width,
        state.arena.height,
        report.grid_cells + report.relocated
    );
}

/// Clamp a drag point to the arena and limit the pull length
fn sling_point(state: &GameState, p: Vec2) -> Vec2 {
    let anchor = state.arena.anchor;
    let p = state.arena.clamp_point(p);
    anchor - (anchor - p).clamp_length_max(state.tuning.max_pull)
}

fn apply_pointer(state: &mut GameState, event: PointerEvent) {
    match event {
        PointerEvent::DragStart(p) => {
            if state.can_launch() {
                state.sling.dragging = true;
                state.sling.pull = sling_point(state, p);
            }
        }
        PointerEvent::DragMove(p) => {
            if state.sling.dragging {
                state.sling.pull = sling_point(state, p);
            }
        }
        PointerEvent::DragEnd(p) => {
            if state.sling.dragging {
                state.sling.dragging = false;
                let release = sling_point(state, p);
                state.sling.pull = state.arena.anchor;
                launch(state, release);
            }
        }
    }
}

/// Fire a projectile toward the mirror of `release` around the anchor.
///
/// No-op once the shot budget is spent or while a projectile is in flight.
pub fn launch(state: &mut GameState, release: Vec2) -> bool {
    if state.phase != GamePhase::Playing
        || state.projectile.is_some()
        || state.shots_fired >= state.tuning.max_shots
    {
        return false;
    }

    let anchor = state.arena.anchor;
    let vel = (anchor - release) * state.tuning.launch_power;
    state.projectile = Some(Projectile::new(anchor, vel));
    state.shots_fired += 1;

    log::debug!("Shot {} launched with velocity {:?}", state.shots_fired, vel);
    state.events.push(GameEvent::Launched {
        shot: state.shots_fired,
        vel,
    });
    true
}

/// Gravity, integration, bounds and hit test for the live projectile
fn update_projectile(state: &mut GameState) {
    let Some(projectile) = state.projectile.as_mut() else {
        return;
    };

    if projectile.active {
        projectile.vel.y += state.tuning.gravity;
        projectile.pos += projectile.vel;

        if projectile_out_of_bounds(
            projectile,
            state.arena.width,
            state.arena.height,
            state.tuning.ceiling,
        ) {
            projectile.active = false;
        }

        // The final position of this frame is still tested, even out of bounds
        if let Some(index) = projectile_hit(projectile, &state.targets) {
            projectile.active = false;
            register_hit(state, index);
        }
    }

    if state.projectile.as_ref().is_some_and(|p| !p.active) {
        state.projectile = None;
    }
}

fn register_hit(state: &mut GameState, index: usize) {
    let points = state.targets[index].hit_score(state.tuning.score_per_hit);
    state.score += points;
    let target_id = state.targets[index].id;

    match state.tuning.hit_policy {
        HitPolicy::Relocate => {
            let area = state.arena.placement;
            relocate_or_resolve(
                &mut state.targets,
                index,
                &area,
                &state.tuning,
                state.time_ticks,
                &mut state.rng,
            );
        }
        HitPolicy::Kill => {
            state.targets[index].alive = false;
        }
    }

    log::debug!("Target {} hit for {} points (score {})", target_id, points, state.score);
    state.events.push(GameEvent::TargetHit { target_id, points });
}

/// Release point that sends the projectile centre to `aim` after `n` frames.
///
/// Inverts the Euler flight path: after `n` frames the offset is
/// `vel * n + gravity * n * (n + 1) / 2` on the vertical axis.
fn release_for(state: &GameState, aim: Vec2, n: f32) -> Vec2 {
    let anchor = state.arena.anchor;
    let start_center = anchor + Vec2::splat(crate::consts::PROJECTILE_SIZE * 0.5);
    let delta = aim - start_center;
    let gravity = state.tuning.gravity;
    let vel = Vec2::new(delta.x / n, (delta.y - gravity * n * (n + 1.0) / 2.0) / n);
    anchor - vel / state.tuning.launch_power.max(f32::EPSILON)
}

/// Demo mode: pick an alive target and fire at it
fn autoplay(state: &mut GameState) {
    if !state.can_launch() || state.sling.dragging {
        return;
    }

    let alive: Vec<usize> = state
        .targets
        .iter()
        .enumerate()
        .filter(|(_, t)| t.alive)
        .map(|(i, _)| i)
        .collect();
    if alive.is_empty() {
        return;
    }

    let pick = alive[state.rng.random_range(0..alive.len())];
    let jitter = Vec2::new(
        state.rng.random_range(-3.0..=3.0),
        state.rng.random_range(-3.0..=3.0),
    );
    let aim = state.targets[pick].bounds().center() + jitter;

    // Shortest flight whose pull fits inside the sling
    let anchor = state.arena.anchor;
    let max_pull = state.tuning.max_pull;
    let arena = state.arena;
    let view: &GameState = state;
    let release = (15..=120)
        .map(|n| release_for(view, aim, n as f32))
        .find(|r| (anchor - *r).length() <= max_pull && arena.clamp_point(*r) == *r);

    let Some(release) = release else {
        log::debug!("Autoplay: target {} out of reach", state.targets[pick].id);
        return;
    };

    apply_pointer(state, PointerEvent::DragStart(anchor));
    apply_pointer(state, PointerEvent::DragEnd(release));
}
