//! Game state and core simulation types
//!
//! Everything that defines a run lives here. Snapshots serialize for
//! debugging; the RNG and the transient event queue are rebuilt instead.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Run ended on an obstacle hit; only reset leaves this phase
    GameOver,
}

/// Horizontal movement intent, set by key edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveDir {
    Left,
    Halt,
    Right,
}

impl MoveDir {
    #[inline]
    pub fn as_sign(self) -> f32 {
        match self {
            MoveDir::Left => -1.0,
            MoveDir::Halt => 0.0,
            MoveDir::Right => 1.0,
        }
    }
}

/// Which gravity constant applies this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GravityMode {
    Normal,
    /// Lift held during ascent: floaty up, normal-speed down
    Reduced,
}

/// Drawing surface dimensions, validated once at startup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

/// Non-positive viewport dimensions are a configuration error
#[derive(Debug, Clone, PartialEq)]
pub struct BadViewport {
    pub width: f32,
    pub height: f32,
}

impl std::fmt::Display for BadViewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "viewport dimensions must be positive, got {}x{}",
            self.width, self.height
        )
    }
}

impl std::error::Error for BadViewport {}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Result<Self, BadViewport> {
        if width <= 0.0 || height <= 0.0 {
            return Err(BadViewport { width, height });
        }
        Ok(Self { width, height })
    }
}

/// The player character
///
/// `pos.y` is the feet line (bottom edge), matching the ground-relative
/// convention; the collision box converts via `Aabb::bottom_anchored`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    /// Off the ground, mid-jump or falling
    pub airborne: bool,
    /// Lift key currently held (reduced-gravity eligibility)
    pub holding_lift: bool,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(tuning.player_start_x, tuning.ground_y),
            vel: Vec2::ZERO,
            size: tuning.player_size,
            airborne: false,
            holding_lift: false,
        }
    }

    /// Launch upward, only from the ground. No double jump, no buffering.
    pub fn jump(&mut self, tuning: &Tuning) {
        if !self.airborne {
            self.vel.y = tuning.jump_force;
            self.airborne = true;
        }
    }

    /// Apply a horizontal key edge; the latest edge fully determines vx
    pub fn set_move_dir(&mut self, dir: MoveDir, tuning: &Tuning) {
        self.vel.x = dir.as_sign() * tuning.run_speed;
    }

    pub fn set_holding_lift(&mut self, held: bool) {
        self.holding_lift = held;
    }

    /// Reduced gravity applies only while ascending with lift held
    pub fn gravity_mode(&self) -> GravityMode {
        if self.holding_lift && self.vel.y < 0.0 {
            GravityMode::Reduced
        } else {
            GravityMode::Normal
        }
    }

    /// Integrate one frame of character physics
    pub fn update(&mut self, viewport: &Viewport, tuning: &Tuning) {
        let max_x = (viewport.width - self.size.x).max(0.0);
        self.pos.x = (self.pos.x + self.vel.x).clamp(0.0, max_x);

        let gravity = match self.gravity_mode() {
            GravityMode::Reduced => tuning.lift_gravity,
            GravityMode::Normal => tuning.gravity,
        };
        self.vel.y += gravity;
        self.pos.y += self.vel.y;

        if self.pos.y > tuning.ground_y {
            self.pos.y = tuning.ground_y;
            self.vel.y = 0.0;
            self.airborne = false;
        }
    }

    /// Reposition to the start state, grounded with zero velocity
    pub fn reset(&mut self, tuning: &Tuning) {
        self.pos = Vec2::new(tuning.player_start_x, tuning.ground_y);
        self.vel = Vec2::ZERO;
        self.airborne = false;
        self.holding_lift = false;
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::bottom_anchored(self.pos, self.size)
    }
}

/// A scrolling ground hazard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: f32,
    pub size: Vec2,
}

impl Obstacle {
    pub fn new(x: f32, tuning: &Tuning) -> Self {
        Self {
            x,
            size: tuning.obstacle_size,
        }
    }

    pub fn advance(&mut self, scroll_speed: f32) {
        self.x -= scroll_speed;
    }

    /// Fully left of the viewport, ready to prune
    pub fn off_screen(&self) -> bool {
        self.x + self.size.x <= 0.0
    }

    pub fn aabb(&self, ground_y: f32) -> Aabb {
        Aabb::bottom_anchored(Vec2::new(self.x, ground_y), self.size)
    }
}

/// A collectible bonus star
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Star {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Monotonic false -> true; a collected star scrolls but no longer
    /// collides or renders
    pub collected: bool,
}

impl Star {
    /// Place a star at the right edge; `band_t` in [0, 1) picks the height
    /// within the configured band above ground
    pub fn new(x: f32, band_t: f32, tuning: &Tuning) -> Self {
        let [band_min, band_max] = tuning.star_band;
        let y = tuning.ground_y - band_min - band_t * (band_max - band_min);
        Self {
            pos: Vec2::new(x, y),
            size: tuning.star_size,
            collected: false,
        }
    }

    pub fn advance(&mut self, scroll_speed: f32) {
        self.pos.x -= scroll_speed;
    }

    pub fn off_screen(&self) -> bool {
        self.pos.x + self.size.x <= 0.0
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// Collection is a one-shot side effect of the collision query: the
    /// first overlapping call returns true and marks the star; every call
    /// after that reports no collision.
    pub fn try_collect(&mut self, player_box: &Aabb) -> bool {
        if self.collected {
            return false;
        }
        if self.aabb().intersects(player_box) {
            self.collected = true;
            return true;
        }
        false
    }
}

/// Side effects for the host to perform after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A star was collected this frame
    StarCollected { points: u32 },
    /// The run ended; pause the music
    GameOver,
    /// A fresh run started; resume the music unless muted
    Restarted,
    /// The mute flag flipped
    MuteToggled { muted: bool },
}

fn restored_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Complete session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: GamePhase,
    pub player: Player,
    /// Spawn order; removal is retain-based, order carries no meaning
    pub obstacles: Vec<Obstacle>,
    pub stars: Vec<Star>,
    pub scroll_speed: f32,
    /// Frame-count distance proxy, +1 per running frame
    pub score: u64,
    /// Star bonus, separate from the distance score
    pub bonus_points: u32,
    pub spawn_timer: u32,
    pub spawn_interval: u32,
    pub muted: bool,
    pub viewport: Viewport,
    pub tuning: Tuning,
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    #[serde(skip, default = "restored_rng")]
    pub(crate) rng: Pcg32,
}

impl GameState {
    pub fn new(seed: u64, viewport: Viewport, tuning: Tuning) -> Self {
        Self {
            seed,
            phase: GamePhase::Running,
            player: Player::new(&tuning),
            obstacles: Vec::new(),
            stars: Vec::new(),
            scroll_speed: tuning.scroll_speed,
            score: 0,
            bonus_points: 0,
            spawn_timer: 0,
            spawn_interval: tuning.base_spawn_interval,
            muted: false,
            viewport,
            tuning,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Displayed distance unit
    pub fn distance(&self) -> u64 {
        self.score / self.tuning.distance_divisor
    }

    pub fn running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Hand the frame's events to the host, clearing the queue
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
