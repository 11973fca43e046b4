//! Integration tests: JSON scene fixtures → built groups → SVG documents.
//!
//! Exercises the pipeline a host tool runs: deserialize a scene, build the
//! export group, serialize, and compare the markup.

use nib_scene::{NodeId, SceneGraph, SceneNode};
use nib_svg::{ExportContext, Group, PlaceholderResolver, WarningSink};
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use std::cell::Cell;

const BADGE_JSON: &str = include_str!("fixtures/badge.json");
const BADGE_SVG: &str = include_str!("fixtures/badge.svg");
const LAYERS_JSON: &str = include_str!("fixtures/layers.json");
const POSTER_JSON: &str = include_str!("fixtures/poster.json");

// ─── Helpers ─────────────────────────────────────────────────────────────

/// Flat parent/node listing, parents before children.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Entry {
    parent: String,
    node: SceneNode,
}

fn load_scene(json: &str) -> SceneGraph {
    let entries: Vec<Entry> = serde_json::from_str(json).expect("fixture parses");
    let mut scene = SceneGraph::new();
    for entry in entries {
        let parent = scene
            .index_of(NodeId::intern(&entry.parent))
            .expect("parent listed before child");
        scene.add_node(parent, entry.node);
    }
    scene
}

fn export(scene: &SceneGraph) -> String {
    let group = Group::build(scene, scene.root).expect("fixture scene builds");
    group.svg_string(&ExportContext::default()).to_string()
}

struct CountingSink(Cell<usize>);

impl WarningSink for CountingSink {
    fn warn(&self, _node: &SceneNode, _message: &str) {
        self.0.set(self.0.get() + 1);
    }
}

// ─── Documents ───────────────────────────────────────────────────────────

#[test]
fn badge_exports_expected_document() {
    let scene = load_scene(BADGE_JSON);
    assert_eq!(export(&scene), BADGE_SVG.trim_end());
}

#[test]
fn layered_scene_balances_nested_groups() {
    let scene = load_scene(LAYERS_JSON);
    let svg = export(&scene);

    assert!(svg.starts_with(r#"<svg viewBox="0 0 120 80">"#), "{svg}");
    assert!(svg.ends_with("</svg>"), "{svg}");
    assert_eq!(svg.matches("<g").count(), 2, "{svg}");
    assert_eq!(svg.matches("</g>").count(), 2, "{svg}");

    // Paint order follows child order: sky, back hill, mound.
    let sky = svg.find("#4DABF7").expect("sky fill present");
    let back = svg.find("#2B8A3E").expect("back hill fill present");
    let mound = svg.find("#66A80F").expect("mound fill present");
    assert!(sky < back && back < mound, "{svg}");
}

#[test]
fn poster_writes_defs_next_to_each_shape() {
    let scene = load_scene(POSTER_JSON);
    let images = PlaceholderResolver;
    let sink = CountingSink(Cell::new(0));
    let ctx = ExportContext::new(&images, &sink);
    let group = Group::build(&scene, scene.root).expect("fixture scene builds");
    let svg = group.svg_string(&ctx);

    assert!(svg.starts_with(r#"<svg viewBox="0 0 100 150">"#), "{svg}");
    assert_eq!(svg.matches("<defs>").count(), 2, "{svg}");
    assert!(
        svg.contains(
            r#"<linearGradient id="gradient" x1="0.000000" y1="0.000000" x2="0.000000" y2="150.000000">"#
        ),
        "{svg}"
    );
    assert!(svg.contains(r#"href="cover.jpg""#), "{svg}");
    assert!(
        svg.contains(r#"<filter id="shadow"><feDropShadow dx="0" dy="2" stdDeviation="6"/></filter>"#),
        "{svg}"
    );
    assert!(svg.contains(r##"fill="url(#image)""##), "{svg}");
    assert!(svg.contains(r##"filter="url(#shadow)""##), "{svg}");
    // One warning for the image fill, one for the shadow.
    assert_eq!(sink.0.get(), 2);
}

// ─── Identity ────────────────────────────────────────────────────────────

#[test]
fn reloaded_scene_keeps_stable_id() {
    let ctx = ExportContext::default();
    let scene_a = load_scene(LAYERS_JSON);
    let scene_b = load_scene(LAYERS_JSON);

    let a = Group::build(&scene_a, scene_a.root).expect("fixture scene builds");
    let b = Group::build(&scene_b, scene_b.root).expect("fixture scene builds");
    assert_eq!(a.stable_id(&ctx), b.stable_id(&ctx));
}

// ─── Serde ───────────────────────────────────────────────────────────────

#[test]
fn scene_json_round_trips_through_serde() {
    let entries: Vec<Entry> = serde_json::from_str(BADGE_JSON).expect("fixture parses");
    let json = serde_json::to_string(&entries).expect("serializes");
    let reparsed: Vec<Entry> = serde_json::from_str(&json).expect("re-parses");
    assert_eq!(entries, reparsed);
}
