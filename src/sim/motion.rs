//! Target motion policies
//!
//! Runs once per frame for every alive target. Any move that would leave two
//! alive targets overlapping is reverted or separated before the frame ends.

use glam::Vec2;
use rand::Rng;

use super::collision::{first_overlap, separation_dir};
use super::placement::relocate_or_resolve;
use super::rect::Rect;
use super::state::Target;
use crate::tuning::{MotionPolicy, Tuning};
use crate::{clamp_vec, random_unit};

/// Advance every alive target by one frame under the configured policy
pub fn update_targets<R: Rng>(
    targets: &mut [Target],
    area: &Rect,
    tuning: &Tuning,
    now: u64,
    rng: &mut R,
) {
    for i in 0..targets.len() {
        if !targets[i].alive {
            continue;
        }
        match tuning.motion {
            MotionPolicy::Idle => idle_step(targets, i, area, tuning, now, rng),
            MotionPolicy::Wander => wander_step(targets, i, area, tuning, rng),
        }
    }
}

/// Idle policy: timeout relocation plus an occasional small nudge
pub fn idle_step<R: Rng>(
    targets: &mut [Target],
    index: usize,
    area: &Rect,
    tuning: &Tuning,
    now: u64,
    rng: &mut R,
) {
    if now.saturating_sub(targets[index].last_moved_tick) > tuning.idle_timeout_ticks {
        log::debug!("Target {} idle for too long", targets[index].id);
        relocate_or_resolve(targets, index, area, tuning, now, rng);
    }

    targets[index].idle_ticks += 1;
    if targets[index].idle_ticks <= tuning.nudge_interval || !rng.random_bool(tuning.nudge_chance) {
        return;
    }

    let size = targets[index].size;
    let (min, max) = area.origin_range(size);
    let old = targets[index].pos;
    let offset = Vec2::new(
        (rng.random::<f32>() - 0.5) * tuning.nudge_x,
        (rng.random::<f32>() - 0.5) * tuning.nudge_y,
    );
    let candidate = clamp_vec(old + offset, min, max);

    let target = &mut targets[index];
    target.idle_ticks = 0;
    if first_overlap(targets, index, &Rect::from_pos_size(candidate, size)).is_none() {
        targets[index].pos = candidate;
    }
}

fn randomize_velocity<R: Rng>(target: &mut Target, tuning: &Tuning, rng: &mut R) {
    let speed = tuning.wander_speed * rng.random_range(0.5..=1.0);
    target.vel = random_unit(rng) * speed;
    target.redirect_ticks = tuning.wander_redirect_ticks;
}

/// Wander policy: bounded random walk with wall bounce and contact separation
pub fn wander_step<R: Rng>(
    targets: &mut [Target],
    index: usize,
    area: &Rect,
    tuning: &Tuning,
    rng: &mut R,
) {
    if targets[index].redirect_ticks == 0 {
        randomize_velocity(&mut targets[index], tuning, rng);
    }

    let size = targets[index].size;
    let (min, max) = area.origin_range(size);
    let target = &mut targets[index];
    target.redirect_ticks = target.redirect_ticks.saturating_sub(1);

    let prev = target.pos;
    let mut pos = prev + target.vel;
    let mut vel = target.vel;

    // Wall bounce
    if pos.x < min.x || pos.x > max.x {
        vel.x = -vel.x * tuning.wall_damping;
    }
    if pos.y < min.y || pos.y > max.y {
        vel.y = -vel.y * tuning.wall_damping;
    }
    pos = clamp_vec(pos, min, max);
    target.vel = vel;

    let Some(other) = first_overlap(targets, index, &Rect::from_pos_size(pos, size)) else {
        targets[index].pos = pos;
        return;
    };

    // Contact: back off, then push away from the other target's centre
    let other_bounds = targets[other].bounds();
    let dir = separation_dir(&Rect::from_pos_size(prev, size), &other_bounds)
        .unwrap_or_else(|| random_unit(rng));
    let pushed = clamp_vec(prev + dir * tuning.separation_margin, min, max);

    let target = &mut targets[index];
    target.vel = dir * tuning.separation_speed;
    target.pos = prev;
    if first_overlap(targets, index, &Rect::from_pos_size(pushed, size)).is_none() {
        targets[index].pos = pushed;
    }
}
