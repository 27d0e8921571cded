pub mod assets;
pub mod engine;
pub mod eval;
pub mod graph;
pub mod input;
pub mod layout;
pub mod render;
pub mod variables;
pub mod viewport;
