#![allow(dead_code)]

pub mod fixtures;

use quire::idf::IRNode;
use quire::style::dimension::{Margins, PageSize};
use quire::style::stylesheet::{PageLayout, Stylesheet};
use quire::traits::{DrawOp, RecordingCanvas, TagRecorder};
use quire::types::{Color, Rect};
use quire::{EngineBuilder, LayoutConfig, LayoutEngine, QuireError, RenderSummary};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn page(width: f32, height: f32) -> PageLayout {
    PageLayout {
        size: PageSize::Custom { width, height },
        margins: Some(Margins::default()),
        columns: None,
        column_gap: None,
    }
}

/// A stylesheet whose only page master is `width` x `height` with no margins.
pub fn stylesheet(width: f32, height: f32) -> Stylesheet {
    let mut stylesheet = Stylesheet::default();
    stylesheet.page_masters.insert("default".to_string(), page(width, height));
    stylesheet.default_page_master_name = Some("default".to_string());
    stylesheet
}

pub fn engine(width: f32, height: f32) -> LayoutEngine {
    init_logging();
    EngineBuilder::new().with_stylesheet(stylesheet(width, height)).build()
}

pub fn engine_with_config(width: f32, height: f32, config: LayoutConfig) -> LayoutEngine {
    init_logging();
    EngineBuilder::new()
        .with_stylesheet(stylesheet(width, height))
        .with_config(config)
        .build()
}

pub struct Rendered {
    pub canvas: RecordingCanvas,
    pub tags: TagRecorder,
    pub summary: RenderSummary,
}

impl Rendered {
    /// The first text run containing `needle`, with its page index.
    pub fn find_text(&self, needle: &str) -> Option<(usize, &quire::traits::TextRun)> {
        (0..self.canvas.page_count()).find_map(|page| {
            self.canvas
                .texts(page)
                .into_iter()
                .find(|run| run.text.contains(needle))
                .map(|run| (page, run))
        })
    }

    /// Background fills on a page (0-based index), in drawing order.
    pub fn fills(&self, page: usize) -> Vec<(Rect, Color)> {
        self.canvas
            .pages
            .get(page)
            .map(|p| {
                p.ops
                    .iter()
                    .filter_map(|op| match op {
                        DrawOp::FillRect { rect, color } => Some((*rect, *color)),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Fills of one color, in drawing order.
    pub fn fills_of(&self, page: usize, color: Color) -> Vec<Rect> {
        self.fills(page)
            .into_iter()
            .filter(|(_, c)| *c == color)
            .map(|(r, _)| r)
            .collect()
    }
}

pub fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-2
}

pub fn render(engine: &LayoutEngine, children: Vec<IRNode>) -> Result<Rendered, QuireError> {
    let (canvas, tags, summary) = quire::render_recorded(engine, &IRNode::Root(children))?;
    Ok(Rendered {
        canvas,
        tags,
        summary,
    })
}
