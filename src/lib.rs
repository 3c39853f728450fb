//! Quire: a box-model layout engine for paginated documents.
//!
//! The engine takes an [`idf::IRNode`] tree, resolves styles, breaks the
//! content into pages and draws the result onto a [`traits::Canvas`], emitting
//! structure tags on the way.
//!
//! ```no_run
//! use quire::{EngineBuilder, idf::IRNode, traits::RecordingCanvas};
//!
//! let engine = EngineBuilder::new().with_bidi().build();
//! let mut canvas = RecordingCanvas::new();
//! let root = IRNode::Root(vec![IRNode::paragraph("Hello")]);
//! let summary = engine.render(&root, &mut canvas, None)?;
//! assert_eq!(summary.page_count, 1);
//! # Ok::<(), quire::QuireError>(())
//! ```

pub use quire_idf as idf;
pub use quire_layout as layout;
pub use quire_style as style;
pub use quire_traits as traits;
pub use quire_types as types;

pub use quire_layout::{LayoutConfig, LayoutEngine, LayoutError, RenderSummary, TtfFontMetrics};

use quire_style::font::{FontStyle, FontWeight};
use quire_style::stylesheet::Stylesheet;
use quire_traits::{FontError, FontMetrics, TagRecorder, Typography, UnicodeBidiTypography};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuireError {
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Font error: {0}")]
    Font(#[from] FontError),
}

/// Assembles a [`LayoutEngine`] from a stylesheet, configuration and the
/// optional font and typography capabilities.
#[derive(Default)]
pub struct EngineBuilder {
    stylesheet: Stylesheet,
    config: LayoutConfig,
    fonts: Option<TtfFontMetrics>,
    metrics: Option<Arc<dyn FontMetrics>>,
    typography: Option<Arc<dyn Typography>>,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stylesheet(mut self, stylesheet: Stylesheet) -> Self {
        self.stylesheet = stylesheet;
        self
    }

    pub fn with_config(mut self, config: LayoutConfig) -> Self {
        self.config = config;
        self
    }

    /// Registers a TrueType/OpenType font program. Families without a
    /// registered font are measured with fixed-pitch metrics.
    pub fn with_font(
        mut self,
        family: &str,
        weight: FontWeight,
        style: FontStyle,
        data: Vec<u8>,
    ) -> Result<Self, QuireError> {
        let fonts = self.fonts.get_or_insert_with(TtfFontMetrics::new);
        fonts.register(family, weight, style, Arc::new(data))?;
        log::debug!("Registered font family '{}'", family);
        Ok(self)
    }

    /// Replaces font measurement altogether. Fonts added with
    /// [`with_font`](Self::with_font) are ignored.
    pub fn with_metrics(mut self, metrics: Arc<dyn FontMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Enables the Unicode bidirectional algorithm for right-to-left text.
    pub fn with_bidi(self) -> Self {
        self.with_typography(Arc::new(UnicodeBidiTypography))
    }

    pub fn with_typography(mut self, typography: Arc<dyn Typography>) -> Self {
        self.typography = Some(typography);
        self
    }

    pub fn build(self) -> LayoutEngine {
        let mut engine = LayoutEngine::new(self.stylesheet, self.config);
        let metrics = self
            .metrics
            .or_else(|| self.fonts.map(|f| Arc::new(f) as Arc<dyn FontMetrics>));
        if let Some(metrics) = metrics {
            engine = engine.with_metrics(metrics);
        }
        if let Some(typography) = self.typography {
            engine = engine.with_typography(typography);
        }
        engine
    }
}

/// Renders `root` onto a recording canvas and collects its structure tags.
pub fn render_recorded(
    engine: &LayoutEngine,
    root: &idf::IRNode,
) -> Result<(traits::RecordingCanvas, TagRecorder, RenderSummary), QuireError> {
    let mut canvas = traits::RecordingCanvas::new();
    let mut tags = TagRecorder::new();
    let summary = engine.render(root, &mut canvas, Some(&mut tags))?;
    Ok((canvas, tags, summary))
}
