//! Axis-aligned box geometry and overlap tests
//!
//! Everything that moves is a box. The character and obstacles are anchored
//! at their bottom edge (ground-relative y), stars at their top-left corner;
//! both conventions convert into a single min-corner + extents form here so
//! the overlap test is written exactly once.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A box in min-corner + extents form
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Top-left corner (y grows downward, screen convention)
    pub min: Vec2,
    /// Width and height, both positive
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    /// Build a box from a bottom-left anchor (position is the feet line)
    pub fn bottom_anchored(bottom_left: Vec2, size: Vec2) -> Self {
        Self {
            min: Vec2::new(bottom_left.x, bottom_left.y - size.y),
            size,
        }
    }

    /// Bottom-right corner
    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Edge-inclusive overlap test: boxes that merely touch still collide
    pub fn intersects(&self, other: &Aabb) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x <= b_max.x
            && other.min.x <= a_max.x
            && self.min.y <= b_max.y
            && other.min.y <= a_max.y
    }
}
