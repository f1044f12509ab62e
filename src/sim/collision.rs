//! Collision detection and boundary response
//!
//! Everything in the arena collides through axis-aligned footprints. Overlap is
//! closed-interval: rectangles that merely touch along an edge do intersect.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Square of side `2 * half` centered on `center`
    pub fn centered(center: Vec2, half: f32) -> Self {
        Self::new(center.x - half, center.y - half, half * 2.0, half * 2.0)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Closed-interval overlap test (shared edges count)
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.right()
            && other.x <= self.right()
            && self.y <= other.bottom()
            && other.y <= self.bottom()
    }

    /// Point-in-rect test for pointer hits (half-open, like pixel grids)
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }
}

/// Result of moving along one axis inside `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisStep {
    pub pos: f32,
    pub vel: f32,
    /// True if the step touched or crossed a bound and the velocity flipped
    pub bounced: bool,
}

/// Advance `pos` by `vel`, reflecting off the bounds of `[min, max]`
///
/// A step that would leave the range is clamped onto the bound it hit and the
/// velocity is pointed back inside, so a body never tunnels past an edge.
pub fn step_reflect(pos: f32, vel: f32, min: f32, max: f32) -> AxisStep {
    let next = pos + vel;
    if next < min {
        AxisStep {
            pos: min,
            vel: vel.abs(),
            bounced: true,
        }
    } else if next > max {
        AxisStep {
            pos: max,
            vel: -vel.abs(),
            bounced: true,
        }
    } else {
        AxisStep {
            pos: next,
            vel,
            bounced: false,
        }
    }
}
