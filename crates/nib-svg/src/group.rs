//! Group: an exportable view over a scene subtree.
//!
//! [`Group::build`] walks the subtree once, validates geometry, folds group
//! opacity into each leaf, and rejects anything it could not serialize
//! faithfully. The built tree then answers [`view_box`](Group::view_box),
//! [`svg_string`](Group::svg_string) and [`stable_id`](Group::stable_id),
//! each computed at most once and cached for the group's lifetime.

use std::cell::OnceCell;
use std::hash::Hasher;

use kurbo::{Affine, Rect};
use nib_scene::{NodeIndex, NodeKind, SceneGraph, SceneNode, ShapeGeometry};
use rustc_hash::FxHasher;

use crate::context::ExportContext;
use crate::emitter;
use crate::error::{ExportError, Result};

/// A scene subtree prepared for export.
///
/// Borrows the scene, so the graph cannot change underneath a built group
/// and every cached value stays in step with what it was computed from.
/// Caches use [`OnceCell`], which keeps the type `!Sync`.
#[derive(Debug)]
pub struct Group<'a> {
    node: &'a SceneNode,
    children: Vec<Child<'a>>,
    view_box: OnceCell<Rect>,
    svg: OnceCell<String>,
    id: OnceCell<String>,
}

#[derive(Debug)]
pub(crate) enum Child<'a> {
    Group(Group<'a>),
    Shape(ShapeChild<'a>),
}

/// Leaf shape with its effective opacity folded down from every enclosing
/// group, the exported root included.
#[derive(Debug)]
pub(crate) struct ShapeChild<'a> {
    pub node: &'a SceneNode,
    pub geometry: &'a ShapeGeometry,
    pub opacity: f64,
}

impl Child<'_> {
    fn bounds_in_parent(&self) -> Rect {
        match self {
            Child::Group(group) => group.bounds_in_parent(),
            Child::Shape(shape) => {
                shape.node.transform.transform_rect_bbox(shape.geometry.local_bounds)
            }
        }
    }
}

impl<'a> Group<'a> {
    /// Prepare the subtree rooted at `node` for export.
    ///
    /// Fails fast: a group with no children, or any node with non-finite
    /// transform or bounds, is rejected here instead of surfacing as broken
    /// markup later.
    pub fn build(scene: &'a SceneGraph, node: NodeIndex) -> Result<Self> {
        Self::build_inner(scene, node, 1.0)
    }

    fn build_inner(scene: &'a SceneGraph, node: NodeIndex, inherited_opacity: f64) -> Result<Self> {
        let owner = &scene.graph[node];
        if !matches!(owner.kind, NodeKind::Group) {
            return Err(ExportError::NotAGroup { node: owner.id });
        }
        ensure_finite_transform(owner)?;

        let opacity = inherited_opacity * owner.style.opacity;
        let mut children = Vec::new();
        for child_index in scene.children(node) {
            let child = &scene.graph[child_index];
            match &child.kind {
                NodeKind::Group => {
                    children.push(Child::Group(Self::build_inner(scene, child_index, opacity)?));
                }
                NodeKind::Shape(geometry) => {
                    ensure_finite_transform(child)?;
                    ensure_finite_bounds(child, geometry.local_bounds)?;
                    children.push(Child::Shape(ShapeChild {
                        node: child,
                        geometry,
                        opacity: opacity * child.style.opacity,
                    }));
                }
            }
        }
        if children.is_empty() {
            return Err(ExportError::EmptyGroup { node: owner.id });
        }

        Ok(Self {
            node: owner,
            children,
            view_box: OnceCell::new(),
            svg: OnceCell::new(),
            id: OnceCell::new(),
        })
    }

    /// The node this group was built from.
    pub fn node(&self) -> &SceneNode {
        self.node
    }

    pub(crate) fn children(&self) -> &[Child<'a>] {
        &self.children
    }

    /// Minimal box covering every child's bounds, in this group's local
    /// space. Computed on first use.
    pub fn view_box(&self) -> Rect {
        *self.view_box.get_or_init(|| {
            self.children
                .iter()
                .map(Child::bounds_in_parent)
                .reduce(|a, b| a.union(b))
                .unwrap_or(Rect::ZERO)
        })
    }

    /// This group's bounds in its parent's space: the view box pushed
    /// through the group's own transform.
    pub fn bounds_in_parent(&self) -> Rect {
        self.node.transform.transform_rect_bbox(self.view_box())
    }

    /// Translation from view-box coordinates back to this group's local
    /// space.
    pub fn view_box_transform(&self) -> Affine {
        let view_box = self.view_box();
        Affine::translate((view_box.x0, view_box.y0))
    }

    /// The complete `<svg>` document for this subtree. Serialized on first
    /// call; later calls return the same cached string, and collaborator
    /// warnings fire only during that first serialization.
    pub fn svg_string(&self, ctx: &ExportContext) -> &str {
        self.svg.get_or_init(|| emitter::emit_document(self, ctx))
    }

    /// Content-derived identifier: a base-36 hash of the serialized
    /// document. Groups that serialize identically get the same id, within
    /// a process or across runs.
    pub fn stable_id(&self, ctx: &ExportContext) -> &str {
        self.id.get_or_init(|| {
            let mut hasher = FxHasher::default();
            hasher.write(self.svg_string(ctx).as_bytes());
            encode_base36(hasher.finish())
        })
    }
}

fn ensure_finite_transform(node: &SceneNode) -> Result<()> {
    if node.transform.as_coeffs().iter().all(|c| c.is_finite()) {
        Ok(())
    } else {
        Err(ExportError::InvalidGeometry { node: node.id })
    }
}

fn ensure_finite_bounds(node: &SceneNode, bounds: Rect) -> Result<()> {
    let finite = [bounds.x0, bounds.y0, bounds.x1, bounds.y1].iter().all(|v| v.is_finite());
    if finite {
        Ok(())
    } else {
        Err(ExportError::InvalidGeometry { node: node.id })
    }
}

/// Lowercase base-36 digits of `value`.
fn encode_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::with_capacity(13);
    while value > 0 {
        digits.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.iter().rev().map(|&d| d as char).collect()
}
