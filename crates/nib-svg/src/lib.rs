//! Nib SVG export — scene subtree → self-contained `<svg>` document.
//!
//! [`Group::build`] wraps a subtree of a `nib-scene` graph, validating it up
//! front; the group then serializes lazily and caches everything it derives
//! (view box, markup, stable id). Collaborators — image paths, degradation
//! warnings — plug in through [`ExportContext`].

pub mod context;
pub mod emitter;
pub mod error;
mod fmt;
pub mod group;

pub use context::{
    ExportContext, ExportOptions, ImageResolver, LogSink, PlaceholderResolver, WarningSink,
};
pub use emitter::{placement_transform, svg_transform};
pub use error::{ExportError, Result};
pub use group::Group;
