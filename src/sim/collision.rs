//! Overlap queries between targets and projectile hit detection

use glam::Vec2;

use super::rect::Rect;
use super::state::{Projectile, Target};

/// Index of the first alive target (other than `skip`) whose box overlaps `rect`
pub fn first_overlap(targets: &[Target], skip: usize, rect: &Rect) -> Option<usize> {
    targets
        .iter()
        .enumerate()
        .find(|(i, t)| *i != skip && t.alive && t.bounds().overlaps(rect))
        .map(|(i, _)| i)
}

/// Whether `rect` would overlap any alive target other than `skip`
#[inline]
pub fn collides_with_others(targets: &[Target], skip: usize, rect: &Rect) -> bool {
    first_overlap(targets, skip, rect).is_some()
}

/// Index of the first alive target containing the projectile's centre
pub fn projectile_hit(projectile: &Projectile, targets: &[Target]) -> Option<usize> {
    let center = projectile.center();
    targets
        .iter()
        .position(|t| t.alive && t.bounds().contains_point(center))
}

/// Whether a projectile has left the arena
pub fn projectile_out_of_bounds(projectile: &Projectile, width: f32, height: f32, ceiling: bool) -> bool {
    let pos = projectile.pos;
    pos.y > height - projectile.size.y || pos.x > width || pos.x < 0.0 || (ceiling && pos.y < 0.0)
}

/// Pairs of alive targets whose boxes overlap
pub fn overlapping_pairs(targets: &[Target]) -> Vec<(u32, u32)> {
    let mut pairs = Vec::new();
    for (i, a) in targets.iter().enumerate() {
        if !a.alive {
            continue;
        }
        for b in targets.iter().skip(i + 1) {
            if b.alive && a.bounds().overlaps(&b.bounds()) {
                pairs.push((a.id, b.id));
            }
        }
    }
    pairs
}

/// Unit vector pointing from `other`'s centre to `target`'s centre, if distinct
pub fn separation_dir(target: &Rect, other: &Rect) -> Option<Vec2> {
    (target.center() - other.center()).try_normalize()
}
