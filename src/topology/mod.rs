//! Topology layer: the in-memory picture of an architecture.
//!
//! This module is intentionally separate from rendering and post-processing.
//! It owns:
//! - Node / Edge / Cluster types and the icon categories
//! - Diagram builder + validation
//! - Built-in presets (the topologies we actually draw)

pub mod category;
pub mod diagram;
pub mod presets;

pub use category::Category;
pub use diagram::{
    Cluster, ClusterId, Diagram, DiagramBuilder, Direction, Edge, EdgeStyle, LineStyle, Node,
    NodeId,
};
pub use presets::Preset;
