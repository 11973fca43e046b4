//! Emitter: scene subtree → SVG markup.
//!
//! Produces a single-line, self-contained document. Everything a viewer
//! needs (gradients, patterns, filters) is declared inline in `<defs>`
//! blocks next to the shape that uses it.

use std::fmt::Write;

use kurbo::{Affine, Rect};
use nib_scene::{
    GradientStop, ImageFill, LinearGradient, Paint, RadialGradient, SceneNode, Shadow, StrokeCap,
    StrokeJoin,
};

use crate::context::{ExportContext, ExportOptions};
use crate::fmt::{escape_attr, fmt_fixed, fmt_num, round_to};
use crate::group::{Child, Group, ShapeChild};

/// Emit a built subtree as a complete `<svg>` document.
#[must_use]
pub(crate) fn emit_document(group: &Group, ctx: &ExportContext) -> String {
    let view_box = group.view_box();
    let precision = ctx.options.precision;
    let mut out = String::with_capacity(1024);

    // Zero-extent boxes still have to produce a valid viewBox.
    let _ = write!(
        out,
        r#"<svg viewBox="{} {} {} {}">"#,
        fmt_num(round_to(view_box.x0, precision)),
        fmt_num(round_to(view_box.y0, precision)),
        fmt_num(round_to(view_box.width().max(1.0), precision)),
        fmt_num(round_to(view_box.height().max(1.0), precision)),
    );
    emit_children(&mut out, group, ctx);
    out.push_str("</svg>");
    out
}

fn emit_children(out: &mut String, group: &Group, ctx: &ExportContext) {
    for child in group.children() {
        match child {
            Child::Group(nested) => {
                let transform = svg_transform(nested.node().transform, ctx.options);
                if transform.is_empty() {
                    out.push_str("<g>");
                } else {
                    let _ = write!(out, r#"<g transform="{transform}">"#);
                }
                emit_children(out, nested, ctx);
                out.push_str("</g>");
            }
            Child::Shape(shape) => emit_shape(out, shape, ctx),
        }
    }
}

fn emit_shape(out: &mut String, shape: &ShapeChild, ctx: &ExportContext) {
    let node = shape.node;
    let style = &node.style;
    let precision = ctx.options.precision;

    let mut fill_defs = String::new();
    let mut fill_attrs = String::new();

    // Effective opacity rides in fill-opacity, scaled by the color's own
    // alpha when the fill is a solid.
    let mut fill_opacity = shape.opacity;
    match (&style.fill, style.fill_enabled) {
        (Some(paint), true) => match paint {
            Paint::Solid(color) => {
                let _ = write!(fill_attrs, r#" fill="{}""#, color.hex_rgb());
                fill_opacity *= f64::from(color.a) / 255.0;
            }
            Paint::Linear(gradient) => {
                fill_attrs.push_str(r##" fill="url(#gradient)""##);
                emit_linear_gradient(&mut fill_defs, gradient, ctx.options);
            }
            Paint::Radial(gradient) => {
                fill_attrs.push_str(r##" fill="url(#gradient)""##);
                emit_radial_gradient(&mut fill_defs, node, gradient, ctx);
            }
            Paint::Image(image) => {
                ctx.warnings.warn(node, "image fill exported as a placeholder pattern");
                fill_attrs.push_str(r##" fill="url(#image)""##);
                emit_image_pattern(&mut fill_defs, node, image, ctx);
            }
        },
        _ => fill_attrs.push_str(r#" fill="none""#),
    }
    if fill_opacity != 1.0 {
        let _ = write!(fill_attrs, r#" fill-opacity="{}""#, fmt_fixed(fill_opacity, precision));
    }

    let mut stroke_attrs = String::new();
    let mut stroke_opacity = shape.opacity;
    match (&style.stroke, style.stroke_enabled) {
        (Some(stroke), true) => {
            let _ = write!(
                stroke_attrs,
                r#" stroke="{}" stroke-width="{}""#,
                stroke.color.hex_rgb(),
                fmt_num(stroke.width),
            );
            stroke_opacity *= f64::from(stroke.color.a) / 255.0;
            if stroke_opacity != 1.0 {
                let _ = write!(
                    stroke_attrs,
                    r#" stroke-opacity="{}""#,
                    fmt_fixed(stroke_opacity, precision),
                );
            }
            // A one-entry dash pattern means equal dash and gap. A zero gap
            // would render as a solid line, so the attribute is dropped.
            if let Some(&dash) = stroke.dash_array.first() {
                let gap = stroke.dash_array.get(1).copied().unwrap_or(dash);
                if gap != 0.0 {
                    let _ = write!(
                        stroke_attrs,
                        r#" stroke-dasharray="{} {}""#,
                        fmt_num(dash),
                        fmt_num(gap),
                    );
                }
                if stroke.dash_offset != 0.0 {
                    let _ = write!(
                        stroke_attrs,
                        r#" stroke-dashoffset="{}""#,
                        fmt_num(stroke.dash_offset),
                    );
                }
            }
            if stroke.join == StrokeJoin::Miter && stroke.miter_limit != 0.0 {
                let _ = write!(
                    stroke_attrs,
                    r#" stroke-miterlimit="{}""#,
                    fmt_num(stroke.miter_limit),
                );
            }
            if stroke.cap != StrokeCap::Butt {
                let _ = write!(stroke_attrs, r#" stroke-linecap="{}""#, stroke.cap.as_str());
            }
            if stroke.join != StrokeJoin::Miter {
                let _ = write!(stroke_attrs, r#" stroke-linejoin="{}""#, stroke.join.as_str());
            }
        }
        _ => {
            stroke_attrs.push_str(r#" stroke="none""#);
            if stroke_opacity != 1.0 {
                let _ = write!(
                    stroke_attrs,
                    r#" stroke-opacity="{}""#,
                    fmt_fixed(stroke_opacity, precision),
                );
            }
        }
    }

    let mut filter_attr = "";
    let mut filter_def = String::new();
    if let Some(shadow) = &style.shadow
        && shadow.visible
    {
        ctx.warnings.warn(node, "drop shadow exported as a flat feDropShadow filter");
        emit_shadow_filter(&mut filter_def, shadow);
        filter_attr = r##" filter="url(#shadow)""##;
    }

    // Filter def first, then whatever the fill needed.
    if !filter_def.is_empty() || !fill_defs.is_empty() {
        let _ = write!(out, "<defs>{filter_def}{fill_defs}</defs>");
    }

    let placement = placement_transform(node.transform, shape.geometry.local_bounds);
    let transform = svg_transform(placement, ctx.options);

    out.push_str("<path");
    if !transform.is_empty() {
        let _ = write!(out, r#" transform="{transform}""#);
    }
    let _ = write!(out, r#" d="{}""#, shape.geometry.path_data);
    out.push_str(&fill_attrs);
    out.push_str(&stroke_attrs);
    out.push_str(filter_attr);
    out.push_str("/>");
}

// ─── Defs ────────────────────────────────────────────────────────────────

fn emit_stops(out: &mut String, stops: &[GradientStop], options: ExportOptions) {
    for stop in stops {
        let _ = write!(
            out,
            r#"<stop offset="{}" stop-color="{}""#,
            fmt_fixed(stop.offset, options.gradient_precision),
            stop.color.hex_rgb(),
        );
        if stop.color.a != 255 {
            let _ = write!(
                out,
                r#" stop-opacity="{}""#,
                fmt_fixed(f64::from(stop.color.a) / 255.0, options.precision),
            );
        }
        out.push_str("/>");
    }
}

fn emit_linear_gradient(out: &mut String, gradient: &LinearGradient, options: ExportOptions) {
    let fine = options.gradient_precision;
    let _ = write!(
        out,
        r#"<linearGradient id="gradient" x1="{}" y1="{}" x2="{}" y2="{}">"#,
        fmt_fixed(gradient.start.x, fine),
        fmt_fixed(gradient.start.y, fine),
        fmt_fixed(gradient.end.x, fine),
        fmt_fixed(gradient.end.y, fine),
    );
    emit_stops(out, &gradient.stops, options);
    out.push_str("</linearGradient>");
}

fn emit_radial_gradient(
    out: &mut String,
    node: &SceneNode,
    gradient: &RadialGradient,
    ctx: &ExportContext,
) {
    let fine = ctx.options.gradient_precision;

    // Focal and center points are stored in gradient space. The inverse
    // maps them back to shape coordinates; gradientTransform then carries
    // the original mapping for the renderer.
    let inverse = if gradient.transform.determinant() != 0.0 {
        gradient.transform.inverse()
    } else {
        ctx.warnings.warn(
            node,
            "radial gradient transform is singular; writing coordinates untransformed",
        );
        Affine::IDENTITY
    };
    let focal = inverse * gradient.start;
    let center = inverse * gradient.end;

    out.push_str(r#"<radialGradient id="gradient""#);
    let coeffs = gradient.transform.as_coeffs().map(|c| round_to(c, fine));
    if coeffs != [1.0, 0.0, 0.0, 1.0, 0.0, 0.0] {
        let _ = write!(
            out,
            r#" gradientTransform="matrix({} {} {} {} {} {})""#,
            fmt_fixed(coeffs[0], fine),
            fmt_fixed(coeffs[1], fine),
            fmt_fixed(coeffs[2], fine),
            fmt_fixed(coeffs[3], fine),
            fmt_fixed(coeffs[4], fine),
            fmt_fixed(coeffs[5], fine),
        );
    }
    let _ = write!(
        out,
        r#" fx="{}" fy="{}" fr="{}" cx="{}" cy="{}" r="{}">"#,
        fmt_fixed(focal.x, fine),
        fmt_fixed(focal.y, fine),
        fmt_fixed(gradient.start_radius, fine),
        fmt_fixed(center.x, fine),
        fmt_fixed(center.y, fine),
        fmt_fixed(gradient.end_radius, fine),
    );
    emit_stops(out, &gradient.stops, ctx.options);
    out.push_str("</radialGradient>");
}

fn emit_image_pattern(
    out: &mut String,
    node: &SceneNode,
    image: &ImageFill,
    ctx: &ExportContext,
) {
    let precision = ctx.options.precision;
    let width = fmt_num(round_to(image.natural_width, precision));
    let height = fmt_num(round_to(image.natural_height, precision));
    let href = escape_attr(&ctx.images.image_path(node, image));
    let _ = write!(
        out,
        r#"<pattern id="image" patternUnits="userSpaceOnUse" width="{width}" height="{height}"><image href="{href}" x="0" y="0" width="{width}" height="{height}"/></pattern>"#,
    );
}

fn emit_shadow_filter(out: &mut String, shadow: &Shadow) {
    let _ = write!(
        out,
        r#"<filter id="shadow"><feDropShadow dx="{}" dy="{}" stdDeviation="{}"/></filter>"#,
        fmt_num(shadow.offset_x),
        fmt_num(shadow.offset_y),
        fmt_num(shadow.blur),
    );
}

// ─── Transforms ──────────────────────────────────────────────────────────

/// Minimal transform attribute value for an affine matrix: full
/// `matrix(...)` when the linear part is not identity, `translate(...)`
/// when only a translation remains, empty for identity.
#[must_use]
pub fn svg_transform(transform: Affine, options: ExportOptions) -> String {
    let [a, b, c, d, e, f] = transform.as_coeffs();
    if a != 1.0 || b != 0.0 || c != 0.0 || d != 1.0 {
        let fine = options.gradient_precision;
        format!(
            "matrix({}, {}, {}, {}, {}, {})",
            fmt_fixed(a, fine),
            fmt_fixed(b, fine),
            fmt_fixed(c, fine),
            fmt_fixed(d, fine),
            fmt_fixed(e, options.precision),
            fmt_fixed(f, options.precision),
        )
    } else if e != 0.0 || f != 0.0 {
        format!(
            "translate({}, {})",
            fmt_fixed(e, options.precision),
            fmt_fixed(f, options.precision),
        )
    } else {
        String::new()
    }
}

/// Transform that places a shape's path data in its parent space. Path
/// coordinates are relative to the `local_bounds` origin, so the origin
/// folds in on the right of the node transform. Pure; the node is never
/// modified.
#[must_use]
pub fn placement_transform(transform: Affine, local_bounds: Rect) -> Affine {
    transform * Affine::translate((local_bounds.x0, local_bounds.y0))
}
