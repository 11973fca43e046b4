//! Nib scene model — the vector document tree that exporters consume.
//!
//! `SceneGraph` stores nodes in a stable directed graph; `SceneNode` carries
//! the transform and style vocabulary (paint, stroke, shadow, opacity) shared
//! by every downstream crate. Geometry types come from `kurbo`.

pub mod id;
pub mod model;

pub use id::NodeId;
pub use model::*;

// Re-export the geometry and graph-index types so downstream crates don't
// need direct kurbo/petgraph dependencies for ordinary use.
pub use kurbo::{Affine, Point, Rect};
pub use petgraph::graph::NodeIndex;
