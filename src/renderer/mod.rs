//! Rendering module
//!
//! The simulation is turned into an ordered list of draw commands each tick;
//! non-text commands tessellate into GPU-ready triangles. Text is left to the
//! host's font system.

pub mod commands;
pub mod shapes;
pub mod vertex;

pub use commands::{DrawCommand, TextSize, build_frame};
pub use shapes::tessellate;
pub use vertex::{Color, Vertex, colors};
