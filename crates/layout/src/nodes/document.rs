//! The document root: flows top-level content through pages.
//!
//! Each page offers one area per document column. Content that places
//! nothing on an empty area is retried once with forced placement before the
//! document fails with [`LayoutError::ElementTooLarge`].

use super::RenderNode;
use super::block::layout_flow;
use crate::engine::RenderSummary;
use crate::interface::{DrawContext, LayoutArea, LayoutContext, Renderer};
use crate::style::ComputedStyle;
use crate::{LayoutEngine, LayoutError};
use quire_style::stylesheet::PageLayout;
use quire_traits::{Canvas, TagAttributes, TagRole, TagSink};
use quire_types::{Rect, RendererId, Size};
use std::collections::HashMap;
use std::sync::Arc;

const DEFAULT_COLUMN_GAP: f32 = 12.0;

/// The content placed on one page.
#[derive(Debug, Clone)]
pub struct PageFragment {
    pub page_number: usize,
    pub size: Size,
    pub nodes: Vec<RenderNode>,
}

#[derive(Debug, Clone)]
pub struct DocumentRenderer {
    pub id: RendererId,
    pub style: Arc<ComputedStyle>,
    pub children: Vec<RenderNode>,
}

/// Page size and column areas of a page master.
pub fn page_areas(layout: &PageLayout) -> (Size, Vec<Rect>) {
    let (width, height) = layout.size.dimensions_pt();
    let margins = layout.margins.unwrap_or_default();
    let body = Rect::new(
        margins.left,
        margins.bottom,
        (width - margins.horizontal()).max(0.0),
        (height - margins.vertical()).max(0.0),
    );
    let count = layout.columns.unwrap_or(1).max(1) as usize;
    let gap = layout.column_gap.unwrap_or(DEFAULT_COLUMN_GAP);
    let column_width = ((body.width - gap * (count - 1) as f32) / count as f32).max(0.0);
    let columns = (0..count)
        .map(|i| Rect::new(body.left() + i as f32 * (column_width + gap), body.bottom(), column_width, body.height))
        .collect();
    (Size::new(width, height), columns)
}

impl DocumentRenderer {
    pub fn new(style: Arc<ComputedStyle>, children: Vec<RenderNode>) -> Self {
        Self {
            id: RendererId::next(),
            style,
            children,
        }
    }

    /// Flows the content of the segment before the next area break into `area`.
    fn fill_area(
        engine: &LayoutEngine,
        area: LayoutArea,
        segment: &[RenderNode],
    ) -> Result<(Vec<RenderNode>, Vec<RenderNode>), LayoutError> {
        if segment.is_empty() {
            return Ok((Vec::new(), Vec::new()));
        }
        let mut floats = Vec::new();
        let mut ctx = LayoutContext::new(engine, area, &mut floats);
        let flow = layout_flow(&mut ctx, area.bbox, segment)?;
        if !flow.placed.is_empty() {
            return Ok((flow.placed, flow.remaining));
        }

        let cause = flow.cause.unwrap_or_else(|| segment[0].id());
        if !engine.config().forced_placement_on_empty_page {
            return Err(LayoutError::ElementTooLarge {
                renderer: cause,
                page_number: area.page_number,
            });
        }
        log::warn!(
            "{} does not fit on empty page {}; forcing its placement",
            cause,
            area.page_number
        );
        let mut floats = Vec::new();
        let mut ctx = LayoutContext::new(engine, area, &mut floats);
        ctx.forced_placement = true;
        let flow = layout_flow(&mut ctx, area.bbox, segment)?;
        if flow.placed.is_empty() {
            return Err(LayoutError::ElementTooLarge {
                renderer: flow.cause.unwrap_or(cause),
                page_number: area.page_number,
            });
        }
        Ok((flow.placed, flow.remaining))
    }

    pub fn layout_pages(&self, engine: &LayoutEngine) -> Result<Vec<PageFragment>, LayoutError> {
        let stylesheet = engine.stylesheet();
        let mut master = stylesheet.default_page_layout().clone();
        let mut queue: Vec<RenderNode> = self.children.iter().map(RenderNode::next_renderer).collect();
        let mut pages = Vec::new();

        while !queue.is_empty() {
            let page_number = pages.len() + 1;
            let (size, columns) = page_areas(&master);
            let mut nodes = Vec::new();
            let mut next_master = None;

            for column in columns {
                if queue.is_empty() || next_master.is_some() {
                    break;
                }
                let end = queue.iter().position(RenderNode::is_area_break).unwrap_or(queue.len());
                let area = LayoutArea::new(page_number, column);
                let (placed, remaining) = Self::fill_area(engine, area, &queue[..end])?;
                nodes.extend(placed);

                let mut rest = remaining;
                if rest.is_empty() && end < queue.len() {
                    if let RenderNode::AreaBreak(brk) = &queue[end]
                        && let Some(name) = &brk.master_name
                    {
                        match stylesheet.page_masters.get(name) {
                            Some(layout) => next_master = Some(layout.clone()),
                            None => log::warn!("Unknown page master '{}'; keeping the current one", name),
                        }
                    }
                    rest.extend(queue.drain(end + 1..));
                } else {
                    rest.extend(queue.drain(end..));
                }
                queue = rest;
            }

            log::debug!("Page {} holds {} top-level fragments", page_number, nodes.len());
            pages.push(PageFragment {
                page_number,
                size,
                nodes,
            });
            if let Some(layout) = next_master.take() {
                master = layout;
            }
        }
        Ok(pages)
    }

    /// Draws laid-out pages onto `canvas`, emitting tags to `tags` when present.
    pub fn draw_pages(
        &self,
        engine: &LayoutEngine,
        pages: &[PageFragment],
        canvas: &mut dyn Canvas,
        mut tags: Option<&mut dyn TagSink>,
    ) -> Result<RenderSummary, LayoutError> {
        let mut anchors = HashMap::new();
        if let Some(sink) = tags.as_deref_mut() {
            sink.open(self.id, TagRole::Document, TagAttributes::default());
        }
        for page in pages {
            canvas.begin_page(page.page_number, page.size)?;
            let mut ctx = DrawContext {
                engine,
                canvas: &mut *canvas,
                tags: tags.as_deref_mut().map(|t| -> &mut dyn TagSink { t }),
                anchors: &mut anchors,
            };
            for node in &page.nodes {
                node.draw(&mut ctx)?;
            }
        }
        if let Some(sink) = tags.as_deref_mut() {
            sink.close(self.id);
        }
        Ok(RenderSummary {
            page_count: pages.len(),
            anchors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_style::dimension::{Margins, PageSize};

    #[test]
    fn page_columns_share_the_body_width() {
        let layout = PageLayout {
            size: PageSize::Custom {
                width: 420.0,
                height: 600.0,
            },
            margins: Some(Margins::all(10.0)),
            columns: Some(2),
            column_gap: Some(20.0),
        };
        let (size, columns) = page_areas(&layout);
        assert_eq!(size, Size::new(420.0, 600.0));
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0], Rect::new(10.0, 10.0, 190.0, 580.0));
        assert_eq!(columns[1].left(), 220.0);
    }
}
