//! Rendering: DOT emission plus the external layout engine that turns DOT
//! into an image.

pub mod dot;
pub mod engine;

pub use dot::to_dot;
pub use engine::{Engine, Graphviz, OutputFormat, RenderError};
