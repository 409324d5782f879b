//! Data-driven game balance
//!
//! Every gameplay constant lives here so a host page can override balance
//! with a JSON blob instead of a rebuild. Defaults are the shipped tuning.
//! All quantities are per-frame: the simulation runs one tick per display
//! refresh, there is no dt.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Gameplay tuning values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Downward acceleration per frame
    pub gravity: f32,
    /// Gravity while the lift key is held during ascent ("floaty" jumps)
    pub lift_gravity: f32,
    /// Vertical launch velocity on jump (negative = up)
    pub jump_force: f32,
    /// Horizontal run speed per frame
    pub run_speed: f32,
    /// World scroll speed applied to all passive entities
    pub scroll_speed: f32,
    /// Y coordinate of the ground line (feet level)
    pub ground_y: f32,
    /// Character box extents
    pub player_size: Vec2,
    /// Character starting x position
    pub player_start_x: f32,
    /// Obstacle box extents
    pub obstacle_size: Vec2,
    /// Star box extents
    pub star_size: Vec2,
    /// Star height band above ground: [min, max] offset of the star top
    pub star_band: [f32; 2],
    /// Probability a spawn is a star rather than an obstacle
    pub star_chance: f32,
    /// Bonus points awarded per collected star
    pub star_points: u32,
    /// Base frame gap between spawns before jitter
    pub base_spawn_interval: u32,
    /// Lower bound on the redrawn spawn interval
    pub min_spawn_interval: u32,
    /// Jitter added to the base interval, drawn uniformly from [0, jitter)
    pub spawn_jitter: u32,
    /// Displayed distance = score / this
    pub distance_divisor: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.5,
            lift_gravity: 0.2,
            jump_force: -12.0,
            run_speed: 5.0,
            scroll_speed: 3.0,
            ground_y: 650.0,
            player_size: Vec2::new(40.0, 60.0),
            player_start_x: 100.0,
            obstacle_size: Vec2::new(30.0, 40.0),
            star_size: Vec2::new(20.0, 20.0),
            star_band: [50.0, 200.0],
            star_chance: 0.2,
            star_points: 100,
            base_spawn_interval: 120,
            min_spawn_interval: 60,
            spawn_jitter: 60,
            distance_divisor: 10,
        }
    }
}

/// A tuning field failed validation at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTuning(pub &'static str);

impl std::fmt::Display for InvalidTuning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid tuning: {}", self.0)
    }
}

impl std::error::Error for InvalidTuning {}

impl Tuning {
    /// Parse a JSON override blob; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reject inconsistent values before the session starts
    pub fn validate(&self) -> Result<(), InvalidTuning> {
        if self.gravity <= 0.0 || self.lift_gravity <= 0.0 {
            return Err(InvalidTuning("gravity must be positive"));
        }
        if self.lift_gravity > self.gravity {
            return Err(InvalidTuning("lift_gravity must not exceed gravity"));
        }
        if self.jump_force >= 0.0 {
            return Err(InvalidTuning("jump_force must be negative (upward)"));
        }
        if self.ground_y <= 0.0 {
            return Err(InvalidTuning("ground_y must be positive"));
        }
        if self.player_size.min_element() <= 0.0
            || self.obstacle_size.min_element() <= 0.0
            || self.star_size.min_element() <= 0.0
        {
            return Err(InvalidTuning("entity sizes must be positive"));
        }
        if self.star_band[0] >= self.star_band[1] {
            return Err(InvalidTuning("star_band must be an ascending range"));
        }
        if !(0.0..=1.0).contains(&self.star_chance) {
            return Err(InvalidTuning("star_chance must be in [0, 1]"));
        }
        if self.min_spawn_interval == 0 || self.base_spawn_interval == 0 {
            return Err(InvalidTuning("spawn intervals must be nonzero"));
        }
        if self.spawn_jitter == 0 {
            return Err(InvalidTuning("spawn_jitter must be nonzero"));
        }
        if self.distance_divisor == 0 {
            return Err(InvalidTuning("distance_divisor must be nonzero"));
        }
        Ok(())
    }
}
