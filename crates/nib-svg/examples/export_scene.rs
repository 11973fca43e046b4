//! Build a small scene in code and print its SVG document.
//!
//! Degraded features (the drop shadow here) log through the `log` facade;
//! run with `RUST_LOG=warn` to see them.

use kurbo::{Affine, Point, Rect};
use nib_scene::{
    Color, GradientStop, LinearGradient, NodeId, Paint, SceneGraph, SceneNode, Shadow, Stroke,
};
use nib_svg::{ExportContext, Group};

fn main() {
    env_logger::init();

    let scene = card_scene();
    let group = match Group::build(&scene, scene.root) {
        Ok(group) => group,
        Err(err) => {
            eprintln!("export failed: {err}");
            std::process::exit(1);
        }
    };

    let ctx = ExportContext::default();
    println!("{}", group.svg_string(&ctx));
    eprintln!("stable id: {}", group.stable_id(&ctx));
}

fn card_scene() -> SceneGraph {
    let mut scene = SceneGraph::new();

    let mut backdrop = SceneNode::shape(
        NodeId::intern("backdrop"),
        "M0 0 L320 0 L320 180 L0 180 Z",
        Rect::new(0.0, 0.0, 320.0, 180.0),
    );
    backdrop.style.fill = Some(Paint::Linear(LinearGradient {
        start: Point::new(0.0, 0.0),
        end: Point::new(0.0, 180.0),
        stops: vec![
            GradientStop { offset: 0.0, color: Color::rgb(54, 79, 199) },
            GradientStop { offset: 1.0, color: Color::rgb(116, 143, 252) },
        ],
    }));
    scene.add_node(scene.root, backdrop);

    let mut card = SceneNode::group(NodeId::with_prefix("card"));
    card.transform = Affine::translate((24.0, 24.0));
    let card_idx = scene.add_node(scene.root, card);

    let mut plate = SceneNode::shape(
        NodeId::intern("plate"),
        "M0 0 L272 0 L272 132 L0 132 Z",
        Rect::new(0.0, 0.0, 272.0, 132.0),
    );
    plate.style.fill = Some(Paint::Solid(Color::WHITE));
    plate.style.shadow = Some(Shadow {
        offset_x: 0.0,
        offset_y: 2.0,
        blur: 8.0,
        color: Color::rgba(0, 0, 0, 64),
        visible: true,
    });
    scene.add_node(card_idx, plate);

    let mut underline = SceneNode::shape(
        NodeId::intern("underline"),
        "M0 0 L96 0",
        Rect::new(24.0, 96.0, 120.0, 96.0),
    );
    underline.style.stroke = Some(Stroke {
        color: Color::rgb(230, 73, 128),
        width: 3.0,
        dash_array: vec![6.0, 3.0].into(),
        ..Stroke::default()
    });
    scene.add_node(card_idx, underline);

    scene
}
