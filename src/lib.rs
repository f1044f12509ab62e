//! Cosmic Collector - a single-screen arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, session state machine)
//! - `renderer`: Draw command list and GPU-ready tessellation
//! - `audio`: Sound effect triggers driven by simulation events
//! - `ui`: Button layout and hit-testing for the gated phases
//! - `config`: Tuning knobs and revision policy flags
//! - `tuning`: Compiled-in level catalog and riddle pool

pub mod audio;
pub mod config;
pub mod renderer;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use config::{ConfigError, GameConfig, IntroStyle};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (one tick per rendered frame)
    pub const TICK_RATE: u32 = 60;
    /// Duration of one tick in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Player craft defaults
    pub const PLAYER_RADIUS: f32 = 25.0;
    pub const PLAYER_SPEED: f32 = 5.0; // pixels per tick

    /// Session rules
    pub const CRASH_LIMIT: u32 = 5;
    pub const POINTS_PER_PICKUP: u32 = 10;
    pub const HINT_THRESHOLD: u32 = 3;
    /// One stochastic hazard spawn per this many Playing ticks (on average)
    pub const SPAWN_CHANCE: u32 = 120;

    /// Rock hazard: size range and max drift per axis (pixels per tick)
    pub const ROCK_SIZE_MIN: u32 = 30;
    pub const ROCK_SIZE_MAX: u32 = 50;
    pub const ROCK_MAX_DRIFT: f32 = 1.5;

    /// Vortex hazard: size range, fall speed range, spin per tick (degrees)
    pub const VORTEX_SIZE_MIN: u32 = 40;
    pub const VORTEX_SIZE_MAX: u32 = 60;
    pub const VORTEX_MIN_FALL: f32 = 1.0;
    pub const VORTEX_MAX_FALL: f32 = 3.0;
    pub const VORTEX_SPIN: f32 = 5.0;

    /// Pickup placement
    pub const PICKUP_SIZE: f32 = 20.0;
    pub const PICKUP_MARGIN: f32 = 50.0;
    pub const PICKUP_MIN_PLAYER_DISTANCE: f32 = 50.0;

    /// Level intro
    pub const INTRO_FLY_SPEED: f32 = 10.0;

    /// Final scoreboard fly-by
    pub const FINALE_SPEED: f32 = 4.0;
    pub const FINALE_EXIT_MARGIN: f32 = 200.0;
    pub const FINALE_HOLD_TICKS: u32 = 120;
    pub const FINALE_TRAIL_FADE: u8 = 10;

    /// Background starfield size
    pub const STARFIELD_COUNT: usize = 100;
}

/// Point on a five-pointed star outline, alternating outer and inner vertices
///
/// Index 0 points straight up; the inner radius is half the outer one.
#[inline]
pub fn star_vertex(center: Vec2, size: f32, index: usize) -> Vec2 {
    let outer = index % 2 == 0;
    let angle = (index as f32 * 36.0 - 90.0).to_radians();
    let r = if outer { size } else { size / 2.0 };
    center + Vec2::new(r * angle.cos(), r * angle.sin())
}

/// Unit vector for an angle in degrees (screen space, y down)
#[inline]
pub fn heading(degrees: f32) -> Vec2 {
    let rad = degrees.to_radians();
    Vec2::new(rad.cos(), rad.sin())
}
