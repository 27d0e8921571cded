//! Fable Engine — a branching visual-novel presentation engine.
//!
//! Drives dialogue scenes with character art, conditional choices, and a
//! story variable store over a fixed logical resolution, leaving windowing,
//! font rendering, and image decoding to host-supplied collaborators.

pub mod core;
pub mod schema;
