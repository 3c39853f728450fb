use crate::interface::{DrawContext, LayoutArea, LayoutContext, LayoutResult, MinMaxWidth, Renderer};
use crate::style::ComputedStyle;
use crate::{LayoutEngine, LayoutError};
use quire_types::{Rect, RendererId};
use std::sync::Arc;

/// Ends the current document area. The document renderer consumes it; inside
/// any other flow it occupies no space.
#[derive(Debug, Clone)]
pub struct AreaBreakRenderer {
    pub id: RendererId,
    /// Page master for the pages that follow.
    pub master_name: Option<String>,
    pub style: Arc<ComputedStyle>,
}

impl AreaBreakRenderer {
    pub fn new(master_name: Option<String>, style: Arc<ComputedStyle>) -> Self {
        Self {
            id: RendererId::next(),
            master_name,
            style,
        }
    }
}

impl Renderer for AreaBreakRenderer {
    fn id(&self) -> RendererId {
        self.id
    }

    fn layout(&mut self, ctx: &mut LayoutContext) -> Result<LayoutResult<Self>, LayoutError> {
        let bbox = ctx.area.bbox;
        let top = Rect::from_top_left(bbox.left(), bbox.top(), bbox.width, 0.0);
        Ok(LayoutResult::full(LayoutArea::new(ctx.area.page_number, top)))
    }

    fn draw(&self, _ctx: &mut DrawContext) -> Result<(), LayoutError> {
        Ok(())
    }

    fn next_renderer(&self) -> Self {
        Self::new(self.master_name.clone(), self.style.clone())
    }

    fn min_max_width(&self, _engine: &LayoutEngine) -> Result<MinMaxWidth, LayoutError> {
        Ok(MinMaxWidth::default())
    }

    fn occupied_area(&self) -> Option<LayoutArea> {
        None
    }

    fn translate(&mut self, _dx: f32, _dy: f32) {}
}
