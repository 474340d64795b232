//! Data-driven game balance
//!
//! Every gameplay number and policy knob lives here so variants can be
//! expressed as JSON instead of code.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// What a successful hit does to the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitPolicy {
    /// Target is moved to a fresh position and stays scorable
    #[default]
    Relocate,
    /// Target leaves play for the rest of the round
    Kill,
}

/// Per-frame motion of alive targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionPolicy {
    /// Idle-timeout relocation plus occasional small nudges
    #[default]
    Idle,
    /// Continuous bounded random walk with bounce
    Wander,
}

/// How size factors are assigned at level start
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SizeDistribution {
    /// Evenly spaced from min to max across the target list
    #[default]
    EvenlySpaced,
    /// Independent uniform draw in [min, max]
    Uniform,
    /// Every target gets the same factor
    Fixed { factor: f32 },
}

impl SizeDistribution {
    /// Size factor for target `index` of `count`
    pub fn factor<R: rand::Rng>(&self, index: usize, count: usize, rng: &mut R) -> f32 {
        use crate::consts::{SIZE_FACTOR_MAX, SIZE_FACTOR_MIN};

        match *self {
            SizeDistribution::EvenlySpaced => {
                if count <= 1 {
                    SIZE_FACTOR_MIN
                } else {
                    let t = index as f32 / (count - 1) as f32;
                    SIZE_FACTOR_MIN + t * (SIZE_FACTOR_MAX - SIZE_FACTOR_MIN)
                }
            }
            SizeDistribution::Uniform => rng.random_range(SIZE_FACTOR_MIN..=SIZE_FACTOR_MAX),
            SizeDistribution::Fixed { factor } => factor,
        }
    }
}

/// Gameplay tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Round ===
    /// Launches per round
    pub max_shots: u32,
    /// Frames spent in GameOver before the next round
    pub game_over_ticks: u32,
    /// Points per hit before size scaling
    pub score_per_hit: f32,
    pub hit_policy: HitPolicy,

    // === Projectile ===
    /// Downward acceleration (px/tick²)
    pub gravity: f32,
    /// Launch velocity per pixel of pull
    pub launch_power: f32,
    /// Longest allowed pull from the anchor (px)
    pub max_pull: f32,
    /// Deactivate projectiles that leave through the top edge
    pub ceiling: bool,

    // === Targets ===
    pub target_count: usize,
    /// Target edge length at size factor 1.0
    pub target_base_size: f32,
    pub size_distribution: SizeDistribution,

    // === Placement ===
    /// Random samples before falling back to the grid search
    pub placement_attempts: u32,
    /// Cell pitch for the grid search (px)
    pub grid_cell: f32,
    /// Columns for the initial-layout grid partition
    pub layout_columns: u32,
    /// Random offset span for initial-layout nudges (px)
    pub layout_offset_x: f32,
    pub layout_offset_y: f32,

    // === Motion ===
    pub motion: MotionPolicy,
    /// Ticks without interaction before a forced relocation (Idle)
    pub idle_timeout_ticks: u64,
    /// Frames between nudge opportunities (Idle)
    pub nudge_interval: u32,
    /// Per-frame nudge probability once the interval elapsed (Idle)
    pub nudge_chance: f64,
    /// Nudge offset span (px)
    pub nudge_x: f32,
    pub nudge_y: f32,
    /// Base wander speed (px/tick)
    pub wander_speed: f32,
    /// Frames between velocity re-randomization (Wander)
    pub wander_redirect_ticks: u32,
    /// Velocity multiplier on wall bounce (Wander)
    pub wall_damping: f32,
    /// Speed after a target-target contact (Wander)
    pub separation_speed: f32,
    /// Push distance after a target-target contact (Wander)
    pub separation_margin: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_shots: 10,
            game_over_ticks: 90,
            score_per_hit: 50.0,
            hit_policy: HitPolicy::Relocate,

            gravity: 0.35,
            launch_power: 0.25,
            max_pull: 150.0,
            ceiling: false,

            target_count: 6,
            target_base_size: 40.0,
            size_distribution: SizeDistribution::EvenlySpaced,

            placement_attempts: 100,
            grid_cell: 60.0,
            layout_columns: 3,
            layout_offset_x: 100.0,
            layout_offset_y: 80.0,

            motion: MotionPolicy::Idle,
            // 30 seconds at 30 ms per frame
            idle_timeout_ticks: 1000,
            nudge_interval: 60,
            nudge_chance: 0.05,
            nudge_x: 20.0,
            nudge_y: 10.0,
            wander_speed: 1.5,
            wander_redirect_ticks: 90,
            wall_damping: 0.8,
            separation_speed: 1.5,
            separation_margin: 2.0,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load tuning from a file, falling back to defaults on any failure
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning.sanitized()
                }
                Err(e) => {
                    log::warn!("Invalid tuning in {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Clamp values that would otherwise stall or break the simulation
    pub fn sanitized(mut self) -> Self {
        self.grid_cell = self.grid_cell.max(1.0);
        self.layout_columns = self.layout_columns.max(1);
        self.target_base_size = self.target_base_size.max(1.0);
        self.max_pull = self.max_pull.max(0.0);
        self.nudge_chance = self.nudge_chance.clamp(0.0, 1.0);
        self.wall_damping = self.wall_damping.clamp(0.0, 1.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning = Tuning::from_json(r#"{ "max_shots": 3, "hit_policy": "kill" }"#).unwrap();
        assert_eq!(tuning.max_shots, 3);
        assert_eq!(tuning.hit_policy, HitPolicy::Kill);
        assert_eq!(tuning.gravity, Tuning::default().gravity);
    }

    #[test]
    fn test_size_distribution_json() {
        let tuning =
            Tuning::from_json(r#"{ "size_distribution": { "kind": "fixed", "factor": 1.2 } }"#)
                .unwrap();
        assert_eq!(tuning.size_distribution, SizeDistribution::Fixed { factor: 1.2 });
    }

    #[test]
    fn test_json_roundtrip_preserves_policies() {
        let tuning = Tuning {
            motion: MotionPolicy::Wander,
            size_distribution: SizeDistribution::Uniform,
            ..Default::default()
        };
        let parsed = Tuning::from_json(&tuning.to_json().unwrap()).unwrap();
        assert_eq!(parsed, tuning);
    }

    #[test]
    fn test_evenly_spaced_factors() {
        let mut rng = Pcg32::seed_from_u64(1);
        let dist = SizeDistribution::EvenlySpaced;
        assert!((dist.factor(0, 6, &mut rng) - 0.8).abs() < 1e-6);
        assert!((dist.factor(5, 6, &mut rng) - 1.5).abs() < 1e-6);
        assert!((dist.factor(0, 1, &mut rng) - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_uniform_factors_in_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        for i in 0..100 {
            let f = SizeDistribution::Uniform.factor(i, 100, &mut rng);
            assert!((0.8..=1.5).contains(&f));
        }
    }

    #[test]
    fn test_sanitized_fixes_degenerate_values() {
        let tuning = Tuning {
            grid_cell: 0.0,
            layout_columns: 0,
            nudge_chance: 4.0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(tuning.grid_cell, 1.0);
        assert_eq!(tuning.layout_columns, 1);
        assert_eq!(tuning.nudge_chance, 1.0);
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let tuning = Tuning::load(Path::new("/nonexistent/pig-sling-tuning.json"));
        assert_eq!(tuning, Tuning::default());
    }
}
