//! Target placement engine
//!
//! Finds positions for targets inside the placement rectangle such that no
//! two alive targets overlap. Every routine here runs inside the frame tick,
//! so each one has a hard upper bound on the work it does:
//! - random sampling gives up after a fixed attempt budget
//! - the grid search visits each cell once
//! - if both fail the target is dropped at a random spot, and callers that
//!   need the invariant re-run the batch layout

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::collides_with_others;
use super::rect::Rect;
use super::state::Target;
use crate::clamp_vec;
use crate::tuning::Tuning;

/// Which tier of the placement engine produced a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placement {
    /// Uniform random sample
    Random,
    /// Deterministic grid search
    Grid,
    /// Nothing fit; random position accepted, overlap possible
    Fallback,
}

/// Summary of a batch layout pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutReport {
    /// Targets that needed the partition grid
    pub grid_cells: usize,
    /// Targets still colliding after the first pass that were relocated
    pub relocated: usize,
    /// Every alive target was moved back to its own partition cell
    pub repacked: bool,
    /// Targets left overlapping something at the end
    pub accepted_overlaps: usize,
}

fn sample_in<R: Rng>(min: Vec2, max: Vec2, rng: &mut R) -> Vec2 {
    Vec2::new(
        min.x + rng.random::<f32>() * (max.x - min.x),
        min.y + rng.random::<f32>() * (max.y - min.y),
    )
}

/// Try up to `max_attempts` uniform positions for `targets[index]`.
///
/// On success the target moves and its interaction timer resets. On failure
/// the target is left where it was.
pub fn place_random<R: Rng>(
    targets: &mut [Target],
    index: usize,
    area: &Rect,
    max_attempts: u32,
    now: u64,
    rng: &mut R,
) -> bool {
    let size = targets[index].size;
    let (min, max) = area.origin_range(size);

    for _ in 0..max_attempts {
        let candidate = sample_in(min, max, rng);
        if !collides_with_others(targets, index, &Rect::from_pos_size(candidate, size)) {
            let target = &mut targets[index];
            target.pos = candidate;
            target.last_moved_tick = now;
            return true;
        }
    }

    false
}

/// Scan grid cells left-to-right, top-to-bottom for a free spot.
///
/// Returns `false` when every cell is blocked; the target is then dropped at
/// a random position in range and may overlap something.
pub fn place_grid<R: Rng>(
    targets: &mut [Target],
    index: usize,
    area: &Rect,
    cell: f32,
    now: u64,
    rng: &mut R,
) -> bool {
    let size = targets[index].size;
    let (min, max) = area.origin_range(size);
    let cell = cell.max(1.0);
    let span = max - min;
    let cols = (span.x / cell).floor() as u32 + 1;
    let rows = (span.y / cell).floor() as u32 + 1;

    for r in 0..rows {
        for c in 0..cols {
            let candidate = min + Vec2::new(c as f32 * cell, r as f32 * cell);
            if !collides_with_others(targets, index, &Rect::from_pos_size(candidate, size)) {
                let target = &mut targets[index];
                target.pos = candidate;
                target.last_moved_tick = now;
                return true;
            }
        }
    }

    let target = &mut targets[index];
    target.pos = sample_in(min, max, rng);
    target.last_moved_tick = now;
    log::warn!(
        "No free cell for target {} in {}x{} grid, accepting overlap at {:?}",
        target.id,
        cols,
        rows,
        target.pos
    );
    false
}

/// Move `targets[index]` to a new non-overlapping position if one can be found
pub fn relocate<R: Rng>(
    targets: &mut [Target],
    index: usize,
    area: &Rect,
    tuning: &Tuning,
    now: u64,
    rng: &mut R,
) -> Placement {
    let placement = if place_random(targets, index, area, tuning.placement_attempts, now, rng) {
        Placement::Random
    } else if place_grid(targets, index, area, tuning.grid_cell, now, rng) {
        Placement::Grid
    } else {
        Placement::Fallback
    };

    log::debug!(
        "Target {} relocated to {:?} ({:?})",
        targets[index].id,
        targets[index].pos,
        placement
    );
    placement
}

/// [`relocate`], re-running the batch layout when only the fallback tier
/// could place the target so the frame still ends with no overlap
pub fn relocate_or_resolve<R: Rng>(
    targets: &mut [Target],
    index: usize,
    area: &Rect,
    tuning: &Tuning,
    now: u64,
    rng: &mut R,
) -> Placement {
    let placement = relocate(targets, index, area, tuning, now, rng);
    if placement == Placement::Fallback {
        let report = resolve_initial_layout(targets, area, tuning, now, rng);
        log::debug!("Relocation fell back, layout re-resolved: {:?}", report);
    }
    placement
}

/// Centred top-left position of partition cell `index`
fn partition_pos(area: &Rect, cols: usize, cell: Vec2, index: usize, size: Vec2) -> Vec2 {
    let (row, col) = (index / cols, index % cols);
    let center = area.pos + Vec2::new((col as f32 + 0.5) * cell.x, (row as f32 + 0.5) * cell.y);
    let (min, max) = area.origin_range(size);
    clamp_vec(center - size * 0.5, min, max)
}

fn is_colliding(targets: &[Target], index: usize) -> bool {
    targets[index].alive && collides_with_others(targets, index, &targets[index].bounds())
}

fn count_colliding(targets: &[Target]) -> usize {
    (0..targets.len()).filter(|&i| is_colliding(targets, i)).count()
}

/// Push overlapping targets apart at level start or after a resize.
///
/// First pass: each alive target, in order, is clamped into range and nudged
/// by random offsets until it is clear or the attempt budget runs out; a
/// target still colliding takes its index cell of an even partition of the
/// placement rectangle. Second pass, once every target has its first-pass
/// spot: targets that still collide are relocated. If overlaps survive and
/// every target fits inside a partition cell with a pixel to spare, all
/// alive targets move to their own cells, which are disjoint.
pub fn resolve_initial_layout<R: Rng>(
    targets: &mut [Target],
    area: &Rect,
    tuning: &Tuning,
    now: u64,
    rng: &mut R,
) -> LayoutReport {
    let mut report = LayoutReport::default();

    let cols = tuning.layout_columns.max(1) as usize;
    let rows = targets.len().div_ceil(cols).max(1);
    let cell = Vec2::new(area.size.x / cols as f32, area.size.y / rows as f32);
    let offset_span = Vec2::new(tuning.layout_offset_x, tuning.layout_offset_y);

    for i in 0..targets.len() {
        if !targets[i].alive {
            continue;
        }

        let size = targets[i].size;
        let (min, max) = area.origin_range(size);
        let mut pos = clamp_vec(targets[i].pos, min, max);
        let mut colliding = collides_with_others(targets, i, &Rect::from_pos_size(pos, size));

        let mut attempts = 0;
        while colliding && attempts < tuning.placement_attempts {
            let offset = Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5) * offset_span;
            pos = clamp_vec(pos + offset, min, max);
            colliding = collides_with_others(targets, i, &Rect::from_pos_size(pos, size));
            attempts += 1;
        }

        if colliding {
            report.grid_cells += 1;
            pos = partition_pos(area, cols, cell, i, size);
        }

        targets[i].pos = pos;
        targets[i].last_moved_tick = now;
    }

    for i in 0..targets.len() {
        if is_colliding(targets, i) {
            relocate(targets, i, area, tuning, now, rng);
            report.relocated += 1;
        }
    }

    let mut remaining = count_colliding(targets);
    let fits_cells = targets
        .iter()
        .filter(|t| t.alive)
        .all(|t| t.size.x + 1.0 <= cell.x && t.size.y + 1.0 <= cell.y);

    if remaining > 0 && fits_cells {
        for i in 0..targets.len() {
            if targets[i].alive {
                targets[i].pos = partition_pos(area, cols, cell, i, targets[i].size);
                targets[i].last_moved_tick = now;
            }
        }
        report.repacked = true;
        remaining = 0;
    }

    if remaining > 0 {
        log::warn!("{} targets left overlapping after layout", remaining);
    }
    report.accepted_overlaps = remaining;

    if report != LayoutReport::default() {
        log::info!(
            "Layout resolved: {} grid cells, {} relocated, repacked {}, {} accepted overlaps",
            report.grid_cells,
            report.relocated,
            report.repacked,
            report.accepted_overlaps
        );
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::overlapping_pairs;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn area() -> Rect {
        Rect::new(450.0, 200.0, 230.0, 185.0)
    }

    fn stacked(count: usize, factor: f32, pos: Vec2) -> Vec<Target> {
        (0..count)
            .map(|i| Target::new(i as u32 + 1, pos, factor, 40.0))
            .collect()
    }

    fn in_range(t: &Target, area: &Rect) -> bool {
        let (min, max) = area.origin_range(t.size);
        t.pos.x >= min.x - 1e-3 && t.pos.x <= max.x + 1e-3 && t.pos.y >= min.y - 1e-3 && t.pos.y <= max.y + 1e-3
    }

    #[test]
    fn test_place_random_finds_free_spot() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut targets = stacked(2, 1.0, Vec2::new(500.0, 250.0));
        assert!(place_random(&mut targets, 1, &area(), 100, 42, &mut rng));
        assert!(overlapping_pairs(&targets).is_empty());
        assert!(in_range(&targets[1], &area()));
        assert_eq!(targets[1].last_moved_tick, 42);
        // The other target never moves
        assert_eq!(targets[0].pos, Vec2::new(500.0, 250.0));
    }

    #[test]
    fn test_place_random_failure_leaves_target() {
        let mut rng = Pcg32::seed_from_u64(2);
        // Area exactly one target wide and tall, already occupied
        let tight = Rect::new(0.0, 0.0, 40.0, 40.0);
        let mut targets = stacked(2, 1.0, Vec2::ZERO);
        targets[1].pos = Vec2::new(300.0, 300.0);
        assert!(!place_random(&mut targets, 1, &tight, 50, 9, &mut rng));
        assert_eq!(targets[1].pos, Vec2::new(300.0, 300.0));
        assert_eq!(targets[1].last_moved_tick, 0);
    }

    #[test]
    fn test_place_random_zero_budget() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut targets = stacked(1, 1.0, Vec2::ZERO);
        assert!(!place_random(&mut targets, 0, &area(), 0, 1, &mut rng));
    }

    #[test]
    fn test_place_grid_takes_first_free_cell() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut targets = stacked(2, 1.0, Vec2::new(450.0, 200.0));
        assert!(place_grid(&mut targets, 1, &area(), 60.0, 5, &mut rng));
        // First cell (450, 200) is taken, next one to the right is free
        assert_eq!(targets[1].pos, Vec2::new(510.0, 200.0));
        assert_eq!(targets[1].last_moved_tick, 5);
    }

    #[test]
    fn test_place_grid_fallback_when_full() {
        let mut rng = Pcg32::seed_from_u64(5);
        let tight = Rect::new(0.0, 0.0, 40.0, 40.0);
        let mut targets = stacked(2, 1.0, Vec2::ZERO);
        assert!(!place_grid(&mut targets, 1, &tight, 60.0, 8, &mut rng));
        // Fallback still lands in range and resets the timer
        assert!(in_range(&targets[1], &tight));
        assert_eq!(targets[1].last_moved_tick, 8);
    }

    #[test]
    fn test_relocate_reports_tier() {
        let mut rng = Pcg32::seed_from_u64(6);
        let tuning = Tuning::default();
        let mut targets = stacked(2, 1.0, Vec2::new(500.0, 250.0));
        assert_eq!(relocate(&mut targets, 1, &area(), &tuning, 0, &mut rng), Placement::Random);

        let no_random = Tuning {
            placement_attempts: 0,
            ..Default::default()
        };
        let mut targets = stacked(2, 1.0, Vec2::new(450.0, 200.0));
        assert_eq!(relocate(&mut targets, 1, &area(), &no_random, 0, &mut rng), Placement::Grid);

        let tight = Rect::new(0.0, 0.0, 40.0, 40.0);
        let mut targets = stacked(2, 1.0, Vec2::ZERO);
        assert_eq!(relocate(&mut targets, 1, &tight, &tuning, 0, &mut rng), Placement::Fallback);
    }

    #[test]
    fn test_relocate_or_resolve_clears_fallback_overlap() {
        let mut rng = Pcg32::seed_from_u64(10);
        // No random samples and a single grid cell, which is taken
        let tuning = Tuning {
            placement_attempts: 0,
            grid_cell: 1000.0,
            ..Default::default()
        };
        for _ in 0..20 {
            let mut targets = stacked(2, 1.0, Vec2::new(450.0, 200.0));
            targets[1].pos = Vec2::new(600.0, 300.0);
            let placement = relocate_or_resolve(&mut targets, 1, &area(), &tuning, 3, &mut rng);
            assert_eq!(placement, Placement::Fallback);
            assert!(overlapping_pairs(&targets).is_empty());
            assert!(targets.iter().all(|t| in_range(t, &area())));
        }
    }

    #[test]
    fn test_initial_layout_repacks_when_relocation_fails() {
        let mut rng = Pcg32::seed_from_u64(11);
        let tuning = Tuning {
            placement_attempts: 0,
            grid_cell: 1000.0,
            ..Default::default()
        };
        // Everything stacked at the only grid cell; partition cells are 76x92
        let mut targets = stacked(6, 1.2, Vec2::new(450.0, 200.0));
        let report = resolve_initial_layout(&mut targets, &area(), &tuning, 0, &mut rng);
        assert_eq!(report.accepted_overlaps, 0);
        assert!(overlapping_pairs(&targets).is_empty());
        assert!(targets.iter().all(|t| in_range(t, &area())));
    }

    #[test]
    fn test_initial_layout_reports_overlap_when_cells_too_small() {
        let mut rng = Pcg32::seed_from_u64(12);
        let tuning = Tuning {
            placement_attempts: 0,
            grid_cell: 1000.0,
            ..Default::default()
        };
        // Two 60px targets in a 70px square: three 23px columns are too narrow
        let narrow = Rect::new(0.0, 0.0, 70.0, 70.0);
        let mut targets = stacked(2, 1.5, Vec2::ZERO);
        let report = resolve_initial_layout(&mut targets, &narrow, &tuning, 0, &mut rng);
        assert!(!report.repacked);
        assert_eq!(report.accepted_overlaps, overlapping_pairs(&targets).len() * 2);
        assert!(report.accepted_overlaps > 0);
    }

    #[test]
    fn test_initial_layout_separates_stacked_targets() {
        let mut rng = Pcg32::seed_from_u64(7);
        let tuning = Tuning::default();
        let mut targets = stacked(6, 1.0, Vec2::new(500.0, 250.0));
        let report = resolve_initial_layout(&mut targets, &area(), &tuning, 0, &mut rng);
        assert_eq!(report.accepted_overlaps, 0);
        assert!(overlapping_pairs(&targets).is_empty());
        assert!(targets.iter().all(|t| in_range(t, &area())));
    }

    #[test]
    fn test_initial_layout_grid_fallback_in_cramped_area() {
        let mut rng = Pcg32::seed_from_u64(8);
        // No random nudging at all: every collision goes straight to the grid
        let tuning = Tuning {
            placement_attempts: 0,
            ..Default::default()
        };
        // 3x2 cells of 50x50 fit six 40x40 targets exactly once each
        let cramped = Rect::new(100.0, 100.0, 150.0, 100.0);
        // All six stacked in the bottom-right corner of the range
        let mut targets = stacked(6, 1.0, Vec2::new(210.0, 160.0));
        let report = resolve_initial_layout(&mut targets, &cramped, &tuning, 0, &mut rng);

        // The first five collide and take their partition cells; the last is
        // then alone in the corner
        assert_eq!(report.grid_cells, 5);
        assert_eq!(report.relocated, 0);
        assert_eq!(report.accepted_overlaps, 0);
        assert!(overlapping_pairs(&targets).is_empty());
        assert_eq!(targets[0].pos, Vec2::new(105.0, 105.0));
        assert_eq!(targets[1].pos, Vec2::new(155.0, 105.0));
        assert_eq!(targets[4].pos, Vec2::new(155.0, 155.0));
        assert_eq!(targets[5].pos, Vec2::new(210.0, 160.0));
    }

    #[test]
    fn test_initial_layout_skips_dead_targets() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut targets = stacked(2, 1.0, Vec2::new(500.0, 250.0));
        targets[1].alive = false;
        let report = resolve_initial_layout(&mut targets, &area(), &Tuning::default(), 0, &mut rng);
        assert_eq!(report, LayoutReport::default());
        assert_eq!(targets[1].pos, Vec2::new(500.0, 250.0));
    }

    proptest! {
        #[test]
        fn prop_layout_has_no_overlap_unless_reported(
            seed in any::<u64>(),
            count in 1usize..12,
            factor in 0.8f32..1.5,
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut targets = stacked(count, factor, Vec2::new(520.0, 260.0));
            let report = resolve_initial_layout(&mut targets, &area(), &Tuning::default(), 0, &mut rng);
            if report.accepted_overlaps == 0 {
                prop_assert!(overlapping_pairs(&targets).is_empty());
            }
            prop_assert!(targets.iter().all(|t| in_range(t, &area())));
        }

        #[test]
        fn prop_place_random_result_is_clear(seed in any::<u64>(), budget in 0u32..200) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut targets = stacked(4, 1.2, Vec2::new(450.0, 200.0));
            targets[1].pos = Vec2::new(600.0, 300.0);
            targets[2].pos = Vec2::new(520.0, 320.0);
            let before = targets[3].pos;
            if place_random(&mut targets, 3, &area(), budget, 1, &mut rng) {
                let rect = targets[3].bounds();
                prop_assert!(!collides_with_others(&targets, 3, &rect));
                prop_assert!(in_range(&targets[3], &area()));
            } else {
                prop_assert_eq!(targets[3].pos, before);
            }
        }
    }
}
