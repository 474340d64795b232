//! Level setup: spawn targets and resolve their starting layout

use glam::Vec2;
use rand::Rng;

use super::placement::resolve_initial_layout;
use super::state::{GameState, Target};
use crate::consts::STARTING_SLOTS;

/// Replace the target list with a fresh set for a new round
pub fn generate_level(state: &mut GameState) {
    let count = state.tuning.target_count;
    let base_size = state.tuning.target_base_size;
    let distribution = state.tuning.size_distribution;
    let arena = state.arena;

    state.targets.clear();
    for i in 0..count {
        let factor = distribution.factor(i, count, &mut state.rng);
        let pos = match STARTING_SLOTS.get(i) {
            Some(&(fx, fy)) => Vec2::new(arena.width * fx, arena.height * fy),
            // Past the fixed slots, start anywhere in the placement rectangle
            None => {
                let area = arena.placement;
                area.pos + Vec2::new(state.rng.random::<f32>(), state.rng.random::<f32>()) * area.size
            }
        };

        let id = state.next_entity_id();
        let mut target = Target::new(id, pos, factor, base_size);
        target.last_moved_tick = state.time_ticks;
        state.targets.push(target);
    }

    let report = resolve_initial_layout(
        &mut state.targets,
        &arena.placement,
        &state.tuning,
        state.time_ticks,
        &mut state.rng,
    );
    log::debug!("Level layout for round {}: {:?}", state.round, report);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::overlapping_pairs;
    use crate::tuning::{SizeDistribution, Tuning};

    #[test]
    fn test_level_targets_in_placement_rect() {
        let state = GameState::new(123, Tuning::default());
        let area = state.arena.placement;
        for t in &state.targets {
            let (min, max) = area.origin_range(t.size);
            assert!(t.pos.x >= min.x && t.pos.x <= max.x, "x out of range: {:?}", t.pos);
            assert!(t.pos.y >= min.y && t.pos.y <= max.y, "y out of range: {:?}", t.pos);
        }
        assert!(overlapping_pairs(&state.targets).is_empty());
    }

    #[test]
    fn test_level_sizes_follow_distribution() {
        let state = GameState::new(1, Tuning::default());
        let factors: Vec<f32> = state.targets.iter().map(|t| t.size_factor).collect();
        assert!((factors[0] - 0.8).abs() < 1e-6);
        assert!((factors[5] - 1.5).abs() < 1e-6);
        assert!(factors.windows(2).all(|w| w[0] < w[1]));

        let fixed = Tuning {
            size_distribution: SizeDistribution::Fixed { factor: 1.0 },
            ..Default::default()
        };
        let state = GameState::new(1, fixed);
        assert!(state.targets.iter().all(|t| t.size == Vec2::splat(40.0)));
    }

    #[test]
    fn test_extra_targets_beyond_slots() {
        let tuning = Tuning {
            target_count: 9,
            size_distribution: SizeDistribution::Fixed { factor: 0.8 },
            ..Default::default()
        };
        let state = GameState::new(77, tuning);
        assert_eq!(state.targets.len(), 9);
        let ids: Vec<u32> = state.targets.iter().map(|t| t.id).collect();
        assert_eq!(ids, (1..=9).collect::<Vec<_>>());
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = GameState::new(31337, Tuning::default());
        let b = GameState::new(31337, Tuning::default());
        for (ta, tb) in a.targets.iter().zip(&b.targets) {
            assert_eq!(ta.pos, tb.pos);
        }
    }
}
