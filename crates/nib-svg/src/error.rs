//! Errors surfaced while preparing a scene subtree for export.

use nib_scene::NodeId;

/// Anything that makes a subtree unexportable.
///
/// Degradations (unsupported paint features, singular gradient transforms)
/// are not errors; they are reported through
/// [`WarningSink`](crate::context::WarningSink) and the export still
/// produces a document.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExportError {
    /// A node in the subtree has a non-finite transform or bounds.
    #[error("invalid child geometry: `{node}` has a non-finite transform or bounds")]
    InvalidGeometry { node: NodeId },

    /// A group node has no children, so there is nothing to aggregate.
    #[error("group `{node}` has no children to export")]
    EmptyGroup { node: NodeId },

    /// The index handed to [`Group::build`](crate::group::Group::build)
    /// points at a shape, not a group.
    #[error("node `{node}` is not a group")]
    NotAGroup { node: NodeId },
}

pub type Result<T> = std::result::Result<T, ExportError>;
