//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame, no wall-clock reads
//! - Seeded RNG only
//! - Stable iteration order (creation order)
//! - No rendering or platform dependencies

pub mod challenge;
pub mod collision;
pub mod state;
pub mod tick;

pub use challenge::{ChallengeBank, answers_match, normalize_answer};
pub use collision::Rect;
pub use state::{
    Finale, GameEvent, GamePhase, GameState, GateState, Hazard, HazardKind, Pickup, Player,
    TrailPoint,
};
pub use tick::{HeldKeys, KeyPress, TickInput, generate_level, retry, retry_previous_level, tick};
