use crate::config::LayoutConfig;
use crate::interface::AnchorLocation;
use crate::nodes::document::DocumentRenderer;
use crate::perf::{DebugProfiler, NoOpProfiler, Profiler};
use crate::style::{self, ComputedStyle};
use crate::LayoutError;
use quire_idf::IRNode;
use quire_style::parsers::parse_inline_css;
use quire_style::stylesheet::{ElementStyle, Stylesheet};
use quire_traits::{Canvas, FixedPitchMetrics, FontMetrics, NoTypography, TagSink, Typography, VerticalMetrics};
use quire_types::AnchorId;
use std::collections::HashMap;
use std::sync::Arc;

/// What a finished render produced.
#[derive(Debug, Clone, Default)]
pub struct RenderSummary {
    pub page_count: usize,
    pub anchors: HashMap<AnchorId, AnchorLocation>,
}

pub struct LayoutEngine {
    config: LayoutConfig,
    stylesheet: Arc<Stylesheet>,
    metrics: Arc<dyn FontMetrics>,
    typography: Arc<dyn Typography>,
    pub profiler: Box<dyn Profiler>,
    default_style: Arc<ComputedStyle>,
}

impl LayoutEngine {
    pub fn new(stylesheet: Stylesheet, config: LayoutConfig) -> Self {
        // Simple strategy: use DebugProfiler if feature enabled, else NoOp
        let profiler: Box<dyn Profiler> = if cfg!(feature = "profiling") {
            Box::new(DebugProfiler::new())
        } else {
            Box::new(NoOpProfiler)
        };

        Self {
            config,
            stylesheet: Arc::new(stylesheet),
            metrics: Arc::new(FixedPitchMetrics::default()),
            typography: Arc::new(NoTypography),
            profiler,
            default_style: style::get_default_style(),
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn FontMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Installs the bidi capability. Without one, right-to-left text is laid out
    /// in logical order.
    pub fn with_typography(mut self, typography: Arc<dyn Typography>) -> Self {
        self.typography = typography;
        self
    }

    pub fn with_profiler(mut self, profiler: Box<dyn Profiler>) -> Self {
        self.profiler = profiler;
        self
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn stylesheet(&self) -> &Stylesheet {
        &self.stylesheet
    }

    pub fn metrics(&self) -> &dyn FontMetrics {
        self.metrics.as_ref()
    }

    pub fn typography(&self) -> &dyn Typography {
        self.typography.as_ref()
    }

    pub fn profiler(&self) -> &dyn Profiler {
        self.profiler.as_ref()
    }

    pub fn reset_stats(&self) {
        self.profiler.reset();
    }

    pub fn compute_style(
        &self,
        style_sets: &[Arc<ElementStyle>],
        style_override: Option<&ElementStyle>,
        parent_style: &Arc<ComputedStyle>,
    ) -> Arc<ComputedStyle> {
        style::compute_style(style_sets, style_override, parent_style)
    }

    pub fn get_default_style(&self) -> Arc<ComputedStyle> {
        self.default_style.clone()
    }

    /// Parses an inline `style="..."` declaration list.
    pub fn style_from_css(&self, css: &str) -> Result<ElementStyle, LayoutError> {
        let mut style = ElementStyle::default();
        parse_inline_css(css, &mut style)?;
        Ok(style)
    }

    // --- Font & Text Lookups ---

    /// Advance width of `text` including the style's character and word spacing.
    pub fn measure_text(&self, style: &ComputedStyle, text: &str) -> f32 {
        let glyphs = self.metrics.measure(&style.text.font, style.text.font_size, text);
        let chars = text.chars().count() as f32;
        let spaces = text.chars().filter(|c| *c == ' ').count() as f32;
        glyphs + chars * style.text.character_spacing + spaces * style.text.word_spacing
    }

    pub fn vertical_metrics(&self, style: &ComputedStyle) -> VerticalMetrics {
        self.metrics
            .vertical_metrics(&style.text.font, style.text.font_size)
    }

    /// Ascent above and descent below (negative) the baseline of a line box
    /// with the style's line height, half-leading included.
    pub fn line_extents(&self, style: &ComputedStyle) -> (f32, f32) {
        let m = self.vertical_metrics(style);
        let half_leading = (style.text.line_height - m.content_height()) / 2.0;
        (m.ascender + half_leading, m.descender - half_leading)
    }

    // --- Document entry points ---

    pub fn build(&self, root: &IRNode) -> Result<DocumentRenderer, LayoutError> {
        crate::perf::measure(self.profiler(), "LayoutEngine::build", || {
            crate::builder::TreeBuilder::new(self).build_document(root)
        })
    }

    /// Lays out and draws the document onto `canvas`, emitting structure tags to
    /// `tags` when present.
    pub fn render(
        &self,
        root: &IRNode,
        canvas: &mut dyn Canvas,
        tags: Option<&mut dyn TagSink>,
    ) -> Result<RenderSummary, LayoutError> {
        let document = self.build(root)?;
        let pages = document.layout_pages(self)?;
        log::debug!("Document laid out into {} pages", pages.len());
        document.draw_pages(self, &pages, canvas, tags)
    }
}
