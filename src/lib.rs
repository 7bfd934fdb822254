//! Architecture diagram generator.
//!
//! Builds a code-embedded deployment topology, hands it to Graphviz as DOT,
//! and keeps the generated artifacts (timestamped image, `latest` copy,
//! README cache-buster) in step.

pub mod artifact;
pub mod cache_buster;
pub mod inspect;
pub mod pipeline;
pub mod render;
pub mod topology;

pub type Result<T> = anyhow::Result<T>;
