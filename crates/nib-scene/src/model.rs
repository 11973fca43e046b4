//! Scene-graph data model for vector documents.
//!
//! Nodes form a tree: groups contain children, shapes carry path geometry.
//! Every node owns a local → parent affine transform (`kurbo::Affine`) and a
//! style (paint, stroke, shadow, opacity). Child order is paint order — later
//! siblings draw on top. The model is what exporters read; how a scene gets
//! built (editor, importer, deserializer) is up to the caller.

use crate::id::NodeId;
use kurbo::{Affine, Point, Rect};
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;
use std::collections::HashMap;

// ─── Colors ──────────────────────────────────────────────────────────────

/// RGBA color, four u8 channels. Alpha 255 is fully opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Parse a single hex digit.
fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

const HEX_CHARS: &[u8; 16] = b"0123456789ABCDEF";

fn push_hex(out: &mut String, byte: u8) {
    out.push(HEX_CHARS[(byte >> 4) as usize] as char);
    out.push(HEX_CHARS[(byte & 0xF) as usize] as char);
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a hex color string: `#RGB`, `#RRGGBB`, `#RRGGBBAA`.
    /// The leading `#` is optional.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();

        match bytes.len() {
            3 => {
                let r = hex_val(bytes[0])?;
                let g = hex_val(bytes[1])?;
                let b = hex_val(bytes[2])?;
                Some(Self::rgb(r * 17, g * 17, b * 17))
            }
            6 => {
                let r = hex_val(bytes[0])? << 4 | hex_val(bytes[1])?;
                let g = hex_val(bytes[2])? << 4 | hex_val(bytes[3])?;
                let b = hex_val(bytes[4])? << 4 | hex_val(bytes[5])?;
                Some(Self::rgb(r, g, b))
            }
            8 => {
                let r = hex_val(bytes[0])? << 4 | hex_val(bytes[1])?;
                let g = hex_val(bytes[2])? << 4 | hex_val(bytes[3])?;
                let b = hex_val(bytes[4])? << 4 | hex_val(bytes[5])?;
                let a = hex_val(bytes[6])? << 4 | hex_val(bytes[7])?;
                Some(Self::rgba(r, g, b, a))
            }
            _ => None,
        }
    }

    /// Emit as the shortest valid hex string: `#RRGGBB`, or `#RRGGBBAA`
    /// when alpha is not 255.
    pub fn to_hex(&self) -> String {
        let mut out = String::with_capacity(9);
        out.push('#');
        push_hex(&mut out, self.r);
        push_hex(&mut out, self.g);
        push_hex(&mut out, self.b);
        if self.a != 255 {
            push_hex(&mut out, self.a);
        }
        out
    }

    /// RGB channels as `#RRGGBB`, alpha ignored. SVG keeps alpha in
    /// separate `*-opacity` attributes, never baked into the hex.
    pub fn hex_rgb(&self) -> String {
        let mut out = String::with_capacity(7);
        out.push('#');
        push_hex(&mut out, self.r);
        push_hex(&mut out, self.g);
        push_hex(&mut out, self.b);
        out
    }
}

// Colors travel as hex strings so documents read naturally.
impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s).ok_or_else(|| D::Error::custom(format!("invalid hex color `{s}`")))
    }
}

// ─── Paint ───────────────────────────────────────────────────────────────

/// A gradient stop. `offset` runs 0.0 (start) to 1.0 (end).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub offset: f64,
    pub color: Color,
}

/// Linear gradient along a segment in the shape's local space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearGradient {
    pub start: Point,
    pub end: Point,
    pub stops: Vec<GradientStop>,
}

fn identity() -> Affine {
    Affine::IDENTITY
}

/// Radial gradient: a focal circle at `start` growing to the outer circle
/// at `end`. `transform` maps gradient-local space into shape space; export
/// inverts it to recover the local coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadialGradient {
    pub start: Point,
    pub end: Point,
    pub start_radius: f64,
    pub end_radius: f64,
    #[serde(default = "identity")]
    pub transform: Affine,
    pub stops: Vec<GradientStop>,
}

/// Bitmap fill. Only the natural pixel dimensions matter to exporters; the
/// pixels themselves live wherever `source` (or a path resolver) points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageFill {
    pub natural_width: f64,
    pub natural_height: f64,
    #[serde(default)]
    pub source: Option<String>,
}

/// Fill paint. Exhaustive — a new paint kind is a compile-time decision
/// everywhere paint is matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Paint {
    Solid(Color),
    Linear(LinearGradient),
    Radial(RadialGradient),
    Image(ImageFill),
}

// ─── Stroke ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeCap {
    #[default]
    Butt,
    Round,
    Square,
}

impl StrokeCap {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrokeCap::Butt => "butt",
            StrokeCap::Round => "round",
            StrokeCap::Square => "square",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

impl StrokeJoin {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrokeJoin::Miter => "miter",
            StrokeJoin::Round => "round",
            StrokeJoin::Bevel => "bevel",
        }
    }
}

fn default_miter_limit() -> f64 {
    4.0
}

/// Stroke properties. `dash_array` is usually empty or two entries, so it
/// lives inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
    #[serde(default)]
    pub dash_array: SmallVec<[f64; 4]>,
    #[serde(default)]
    pub dash_offset: f64,
    #[serde(default)]
    pub cap: StrokeCap,
    #[serde(default)]
    pub join: StrokeJoin,
    #[serde(default = "default_miter_limit")]
    pub miter_limit: f64,
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 1.0,
            dash_array: SmallVec::new(),
            dash_offset: 0.0,
            cap: StrokeCap::Butt,
            join: StrokeJoin::Miter,
            miter_limit: default_miter_limit(),
        }
    }
}

// ─── Shadow ──────────────────────────────────────────────────────────────

fn default_true() -> bool {
    true
}

/// Drop shadow. `visible` toggles the effect without losing its settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub offset_x: f64,
    pub offset_y: f64,
    pub blur: f64,
    pub color: Color,
    #[serde(default = "default_true")]
    pub visible: bool,
}

// ─── Styling ─────────────────────────────────────────────────────────────

/// Visual properties of a node. The `*_enabled` flags let a paint keep its
/// settings while toggled off, so re-enabling restores it unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeStyle {
    pub fill: Option<Paint>,
    pub fill_enabled: bool,
    pub stroke: Option<Stroke>,
    pub stroke_enabled: bool,
    pub shadow: Option<Shadow>,
    /// Node opacity 0..1. Multiplies down the tree: a leaf's effective
    /// opacity is the product over itself and its ancestors.
    pub opacity: f64,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            fill: None,
            fill_enabled: true,
            stroke: None,
            stroke_enabled: true,
            shadow: None,
            opacity: 1.0,
        }
    }
}

// ─── Scene Graph Nodes ───────────────────────────────────────────────────

/// Path geometry of a leaf shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeGeometry {
    /// SVG path data. Coordinates are relative to the `local_bounds`
    /// origin — placement adds the origin back via the node transform.
    pub path_data: String,

    /// Where the geometry sits in the node's local space.
    pub local_bounds: Rect,
}

/// The node kinds in the scene tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Container — contains children, draws nothing itself.
    Group,

    /// Leaf shape with path geometry.
    Shape(ShapeGeometry),
}

/// A single node in the scene graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    /// The node's id (e.g. `@hero_card`).
    pub id: NodeId,

    /// What kind of element this is.
    pub kind: NodeKind,

    /// Local → parent affine transform.
    #[serde(default = "identity")]
    pub transform: Affine,

    /// Paint, stroke, shadow, opacity.
    #[serde(default)]
    pub style: NodeStyle,
}

impl SceneNode {
    pub fn new(id: NodeId, kind: NodeKind) -> Self {
        Self {
            id,
            kind,
            transform: Affine::IDENTITY,
            style: NodeStyle::default(),
        }
    }

    /// Shorthand for a group node.
    pub fn group(id: NodeId) -> Self {
        Self::new(id, NodeKind::Group)
    }

    /// Shorthand for a leaf shape.
    pub fn shape(id: NodeId, path_data: impl Into<String>, local_bounds: Rect) -> Self {
        Self::new(
            id,
            NodeKind::Shape(ShapeGeometry {
                path_data: path_data.into(),
                local_bounds,
            }),
        )
    }

    /// The shape geometry, if this node is a leaf.
    pub fn shape_geometry(&self) -> Option<&ShapeGeometry> {
        match &self.kind {
            NodeKind::Shape(geometry) => Some(geometry),
            NodeKind::Group => None,
        }
    }
}

// ─── Scene Graph ─────────────────────────────────────────────────────────

/// A scene document — a tree of `SceneNode` values.
///
/// Edges go from parent → child. The root is an ordinary group named
/// `root`, so any node (including the root) can head an export.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    /// The underlying directed graph.
    pub graph: StableDiGraph<SceneNode, ()>,

    /// The root node index.
    pub root: NodeIndex,

    /// Index from NodeId → NodeIndex for fast lookup.
    pub id_index: HashMap<NodeId, NodeIndex>,
}

impl SceneGraph {
    /// Create a new empty scene with a root group.
    #[must_use]
    pub fn new() -> Self {
        let mut graph = StableDiGraph::new();
        let root_node = SceneNode::group(NodeId::intern("root"));
        let root = graph.add_node(root_node);

        let mut id_index = HashMap::new();
        id_index.insert(NodeId::intern("root"), root);

        Self {
            graph,
            root,
            id_index,
        }
    }

    /// Add a node as the last child of `parent`. Returns the new node's index.
    pub fn add_node(&mut self, parent: NodeIndex, node: SceneNode) -> NodeIndex {
        let id = node.id;
        let idx = self.graph.add_node(node);
        self.graph.add_edge(parent, idx, ());
        self.id_index.insert(id, idx);
        idx
    }

    /// Look up a node by its `@id`.
    pub fn get_by_id(&self, id: NodeId) -> Option<&SceneNode> {
        self.id_index.get(&id).map(|idx| &self.graph[*idx])
    }

    /// Get the index for a NodeId.
    pub fn index_of(&self, id: NodeId) -> Option<NodeIndex> {
        self.id_index.get(&id).copied()
    }

    /// Get the parent index of a node.
    pub fn parent(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .neighbors_directed(idx, petgraph::Direction::Incoming)
            .next()
    }

    /// Get children of a node in document (insertion) order.
    ///
    /// Sorts by `NodeIndex` so the result is deterministic regardless of
    /// how `petgraph` iterates its adjacency list. Insertion order is paint
    /// order: later children draw on top.
    pub fn children(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut children: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, petgraph::Direction::Outgoing)
            .collect();
        children.sort();
        children
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn scene_graph_basics() {
        let mut sg = SceneGraph::new();
        let shape = SceneNode::shape(
            NodeId::intern("box1"),
            "M0 0 L100 0 L100 50 L0 50 Z",
            Rect::new(0.0, 0.0, 100.0, 50.0),
        );
        let idx = sg.add_node(sg.root, shape);

        assert!(sg.get_by_id(NodeId::intern("box1")).is_some());
        assert_eq!(sg.children(sg.root), vec![idx]);
        assert_eq!(sg.parent(idx), Some(sg.root));
    }

    #[test]
    fn children_keep_insertion_order() {
        let mut sg = SceneGraph::new();
        let a = sg.add_node(sg.root, SceneNode::group(NodeId::intern("a")));
        let b = sg.add_node(sg.root, SceneNode::group(NodeId::intern("b")));
        let c = sg.add_node(sg.root, SceneNode::group(NodeId::intern("c")));

        assert_eq!(sg.children(sg.root), vec![a, b, c]);
    }

    #[test]
    fn color_hex_roundtrip() {
        let c = Color::from_hex("#6C5CE7").unwrap();
        assert_eq!(c, Color::rgb(0x6C, 0x5C, 0xE7));
        assert_eq!(c.to_hex(), "#6C5CE7");

        let c2 = Color::from_hex("#FF000080").unwrap();
        assert_eq!(c2.a, 0x80);
        assert_eq!(c2.to_hex(), "#FF000080");
        assert_eq!(c2.hex_rgb(), "#FF0000");
    }

    #[test]
    fn color_short_hex_expands() {
        assert_eq!(Color::from_hex("fff"), Some(Color::WHITE));
        assert_eq!(Color::from_hex("#000"), Some(Color::BLACK));
    }

    #[test]
    fn color_rejects_garbage() {
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::from_hex("zzzzzz"), None);
    }

    #[test]
    fn color_json_is_hex_string() {
        let c = Color::rgb(0xE7, 0x4C, 0x3C);
        assert_eq!(serde_json::to_string(&c).unwrap(), "\"#E74C3C\"");

        let back: Color = serde_json::from_str("\"#E74C3C\"").unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn node_deserializes_with_defaults() {
        let json = r#"{
            "id": "dot",
            "kind": {
                "Shape": {
                    "path_data": "M0 0 L4 0 L4 4 L0 4 Z",
                    "local_bounds": { "x0": 0.0, "y0": 0.0, "x1": 4.0, "y1": 4.0 }
                }
            }
        }"#;
        let node: SceneNode = serde_json::from_str(json).unwrap();

        assert_eq!(node.transform, Affine::IDENTITY);
        assert_eq!(node.style.opacity, 1.0);
        assert!(node.style.fill_enabled);
        assert!(node.style.stroke_enabled);
        assert!(node.shape_geometry().is_some());
    }

    #[test]
    fn stroke_defaults() {
        let s = Stroke::default();
        assert_eq!(s.width, 1.0);
        assert_eq!(s.cap, StrokeCap::Butt);
        assert_eq!(s.join, StrokeJoin::Miter);
        assert_eq!(s.miter_limit, 4.0);
        assert!(s.dash_array.is_empty());
    }

    #[test]
    fn stroke_json_fills_in_defaults() {
        let s: Stroke = serde_json::from_str(r##"{ "color": "#222222", "width": 2.0 }"##).unwrap();
        assert_eq!(s.miter_limit, 4.0);
        assert_eq!(s.cap, StrokeCap::Butt);
        assert!(s.dash_array.is_empty());
    }
}
