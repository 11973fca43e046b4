//! Collaborators and knobs for an export run.
//!
//! The exporter never touches the filesystem or a logging backend directly.
//! Image locations come from an [`ImageResolver`], degradation notices go to
//! a [`WarningSink`], and numeric precision lives in [`ExportOptions`]. The
//! defaults are enough for tests and headless tools; host applications plug
//! in their own implementations.

use nib_scene::{ImageFill, SceneNode};

// ─── Image resolution ─────────────────────────────────────────────────────

/// Maps an image fill to the `href` written into the document.
pub trait ImageResolver {
    /// Path or URL for the image used by `fill` on `node`.
    fn image_path(&self, node: &SceneNode, fill: &ImageFill) -> String;
}

/// Default resolver: the fill's `source` hint verbatim, else `<id>.png`
/// derived from the node id.
pub struct PlaceholderResolver;

impl ImageResolver for PlaceholderResolver {
    fn image_path(&self, node: &SceneNode, fill: &ImageFill) -> String {
        match &fill.source {
            Some(source) => source.clone(),
            None => format!("{}.png", node.id.as_str()),
        }
    }
}

// ─── Warnings ─────────────────────────────────────────────────────────────

/// Receives notices about features the output can only approximate.
///
/// Sinks must not panic; the document that comes back is the same no matter
/// what a sink does with the message.
pub trait WarningSink {
    fn warn(&self, node: &SceneNode, message: &str);
}

/// Default sink: forwards every notice to the `log` facade at warn level.
pub struct LogSink;

impl WarningSink for LogSink {
    fn warn(&self, node: &SceneNode, message: &str) {
        log::warn!("{}: {message}", node.id);
    }
}

// ─── Options and context ──────────────────────────────────────────────────

/// Numeric precision of the generated markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Decimal places for view-box numbers, translations, stroke geometry,
    /// and opacity values (default: 2).
    pub precision: usize,
    /// Decimal places for gradient geometry and matrix linear terms
    /// (default: 6).
    pub gradient_precision: usize,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { precision: 2, gradient_precision: 6 }
    }
}

/// Everything an export run needs besides the scene itself.
pub struct ExportContext<'a> {
    pub images: &'a dyn ImageResolver,
    pub warnings: &'a dyn WarningSink,
    pub options: ExportOptions,
}

impl<'a> ExportContext<'a> {
    #[must_use]
    pub fn new(images: &'a dyn ImageResolver, warnings: &'a dyn WarningSink) -> Self {
        Self { images, warnings, options: ExportOptions::default() }
    }

    #[must_use]
    pub fn with_options(mut self, options: ExportOptions) -> Self {
        self.options = options;
        self
    }
}

static PLACEHOLDER: PlaceholderResolver = PlaceholderResolver;
static LOG_SINK: LogSink = LogSink;

impl Default for ExportContext<'static> {
    /// Placeholder images, warnings routed to `log`, default precision.
    fn default() -> Self {
        Self::new(&PLACEHOLDER, &LOG_SINK)
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use nib_scene::{NodeId, SceneNode};
    use pretty_assertions::assert_eq;

    #[test]
    fn placeholder_resolver_prefers_source_hint() {
        let resolver = PlaceholderResolver;
        let node = SceneNode::shape(NodeId::intern("hero"), "", kurbo::Rect::ZERO);

        let named = ImageFill {
            natural_width: 10.0,
            natural_height: 10.0,
            source: Some("assets/hero.jpg".to_string()),
        };
        assert_eq!(resolver.image_path(&node, &named), "assets/hero.jpg");

        let anonymous = ImageFill { natural_width: 10.0, natural_height: 10.0, source: None };
        assert_eq!(resolver.image_path(&node, &anonymous), "hero.png");
    }

    #[test]
    fn default_options_match_documented_precision() {
        let options = ExportOptions::default();
        assert_eq!(options.precision, 2);
        assert_eq!(options.gradient_precision, 6);
    }
}
