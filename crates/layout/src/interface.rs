use crate::algorithms::floats::FloatBox;
use crate::config::LayoutConfig;
use crate::{LayoutEngine, LayoutError};
use quire_traits::{Canvas, TagAttributes, TagRole, TagSink};
use quire_types::{AnchorId, Rect, RendererId};
use std::collections::HashMap;
use std::fmt::Debug;

// --- Areas and results ---

/// A placement region: a page number and a bounding box in page space (y-up).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutArea {
    pub page_number: usize,
    pub bbox: Rect,
}

impl LayoutArea {
    pub fn new(page_number: usize, bbox: Rect) -> Self {
        Self { page_number, bbox }
    }

    pub fn with_bbox(&self, bbox: Rect) -> Self {
        Self {
            page_number: self.page_number,
            bbox,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutStatus {
    /// Everything was placed.
    Full,
    /// Some content was placed; the rest is in `overflow`.
    Partial,
    /// Nothing could be placed in the offered area.
    Nothing,
}

/// Outcome of one `layout` call.
///
/// * `Full`: the renderer itself now carries the placed geometry; `split` and
///   `overflow` are `None`.
/// * `Partial`: `split` holds what was placed and `overflow` the remainder. The
///   original renderer is discarded by the caller.
/// * `Nothing`: no geometry was committed; the renderer may be laid out again in
///   another area. `cause_of_nothing` names the renderer that refused to fit.
#[derive(Debug, Clone)]
pub struct LayoutResult<R> {
    pub status: LayoutStatus,
    pub occupied_area: Option<LayoutArea>,
    pub split: Option<R>,
    pub overflow: Option<R>,
    pub cause_of_nothing: Option<RendererId>,
}

impl<R> LayoutResult<R> {
    pub fn full(occupied: LayoutArea) -> Self {
        Self {
            status: LayoutStatus::Full,
            occupied_area: Some(occupied),
            split: None,
            overflow: None,
            cause_of_nothing: None,
        }
    }

    pub fn partial(occupied: LayoutArea, split: R, overflow: R) -> Self {
        Self {
            status: LayoutStatus::Partial,
            occupied_area: Some(occupied),
            split: Some(split),
            overflow: Some(overflow),
            cause_of_nothing: None,
        }
    }

    pub fn nothing(cause: RendererId) -> Self {
        Self {
            status: LayoutStatus::Nothing,
            occupied_area: None,
            split: None,
            overflow: None,
            cause_of_nothing: Some(cause),
        }
    }

    pub fn is_full(&self) -> bool {
        self.status == LayoutStatus::Full
    }

    pub fn is_partial(&self) -> bool {
        self.status == LayoutStatus::Partial
    }

    pub fn is_nothing(&self) -> bool {
        self.status == LayoutStatus::Nothing
    }

    pub fn occupied_height(&self) -> f32 {
        self.occupied_area.map_or(0.0, |a| a.bbox.height)
    }

    pub fn map<S>(self, mut f: impl FnMut(R) -> S) -> LayoutResult<S> {
        LayoutResult {
            status: self.status,
            occupied_area: self.occupied_area,
            split: self.split.map(&mut f),
            overflow: self.overflow.map(&mut f),
            cause_of_nothing: self.cause_of_nothing,
        }
    }
}

/// Intrinsic widths of a renderer, including its own margins, borders and padding.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MinMaxWidth {
    pub min: f32,
    pub max: f32,
}

impl MinMaxWidth {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max: max.max(min) }
    }

    pub fn fixed(width: f32) -> Self {
        Self::new(width, width)
    }

    /// Widths of two boxes stacked vertically.
    pub fn stack(self, other: MinMaxWidth) -> Self {
        Self::new(self.min.max(other.min), self.max.max(other.max))
    }

    /// Widths of two boxes placed side by side.
    pub fn beside(self, other: MinMaxWidth) -> Self {
        Self::new(self.min + other.min, self.max + other.max)
    }

    pub fn plus(self, extra: f32) -> Self {
        Self::new(self.min + extra, self.max + extra)
    }
}

// --- Layout context ---

/// Inputs of one `layout` call. `floats` accumulates across the whole block
/// formatting context the renderer belongs to.
pub struct LayoutContext<'a> {
    pub engine: &'a LayoutEngine,
    pub area: LayoutArea,
    pub floats: &'a mut Vec<FloatBox>,
    /// Bottom margin of the previous sibling, already consumed above the area top.
    pub margin_before: f32,
    /// The parent has a fixed or maximum height; content cannot grow it.
    pub clipped_height: bool,
    /// Place content even if it does not fit instead of returning `Nothing`.
    pub forced_placement: bool,
    /// Nothing has been placed above this renderer in the current area.
    pub first_in_area: bool,
    /// Minimum outer height to stretch to (flex and grid stretch alignment).
    pub min_height: Option<f32>,
    /// A sizing pass whose result is thrown away; forced-placement
    /// diagnostics stay quiet.
    pub measuring: bool,
}

impl<'a> LayoutContext<'a> {
    pub fn new(engine: &'a LayoutEngine, area: LayoutArea, floats: &'a mut Vec<FloatBox>) -> Self {
        Self {
            engine,
            area,
            floats,
            margin_before: 0.0,
            clipped_height: false,
            forced_placement: false,
            first_in_area: true,
            min_height: None,
            measuring: false,
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        self.engine.config()
    }

    /// A context for a child sharing this context's floats.
    pub fn child(&mut self, area: LayoutArea) -> LayoutContext<'_> {
        LayoutContext {
            engine: self.engine,
            area,
            floats: &mut *self.floats,
            margin_before: 0.0,
            clipped_height: self.clipped_height,
            forced_placement: self.forced_placement,
            first_in_area: self.first_in_area,
            min_height: None,
            measuring: self.measuring,
        }
    }

    /// A context for a child that starts its own block formatting context.
    pub fn isolated<'b>(&self, area: LayoutArea, floats: &'b mut Vec<FloatBox>) -> LayoutContext<'b>
    where
        'a: 'b,
    {
        LayoutContext {
            engine: self.engine,
            area,
            floats,
            margin_before: 0.0,
            clipped_height: self.clipped_height,
            forced_placement: self.forced_placement,
            first_in_area: self.first_in_area,
            min_height: None,
            measuring: self.measuring,
        }
    }

    /// True if `needed` fits into `available` within the fit tolerance.
    pub fn fits(&self, needed: f32, available: f32) -> bool {
        needed <= available + self.config().float_epsilon
    }
}

// --- Draw context ---

/// Where an anchored element landed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorLocation {
    pub page_number: usize,
    pub y_pos: f32,
}

pub struct DrawContext<'a> {
    pub engine: &'a LayoutEngine,
    pub canvas: &'a mut dyn Canvas,
    pub tags: Option<&'a mut dyn TagSink>,
    pub anchors: &'a mut HashMap<AnchorId, AnchorLocation>,
}

impl<'a> DrawContext<'a> {
    pub fn is_tagging(&self) -> bool {
        self.tags.is_some()
    }

    /// Opens a structure tag and a marked-content sequence for `id`.
    pub fn open_tag(
        &mut self,
        id: RendererId,
        role: TagRole,
        attributes: TagAttributes,
    ) -> Result<(), LayoutError> {
        if let Some(tags) = self.tags.as_deref_mut() {
            tags.open(id, role, attributes);
            self.canvas.begin_marked(id)?;
        }
        Ok(())
    }

    pub fn close_tag(&mut self, id: RendererId) -> Result<(), LayoutError> {
        if let Some(tags) = self.tags.as_deref_mut() {
            self.canvas.end_marked()?;
            tags.close(id);
        }
        Ok(())
    }

    /// Records the first placement of an anchored element.
    pub fn register_anchor(&mut self, id: &AnchorId, page_number: usize, y_pos: f32) {
        self.anchors
            .entry(id.clone())
            .or_insert(AnchorLocation { page_number, y_pos });
    }
}

// --- Renderer capability ---

/// The capability every renderer variant provides.
pub trait Renderer: Clone + Debug {
    fn id(&self) -> RendererId;

    /// Lays the renderer out into `ctx.area`. Each call re-derives geometry from
    /// the renderer's content; earlier calls are not resumed.
    fn layout(&mut self, ctx: &mut LayoutContext) -> Result<LayoutResult<Self>, LayoutError>;

    fn draw(&self, ctx: &mut DrawContext) -> Result<(), LayoutError>;

    /// A fresh, unplaced renderer over the same content with a new identity.
    fn next_renderer(&self) -> Self;

    fn min_max_width(&self, engine: &LayoutEngine) -> Result<MinMaxWidth, LayoutError>;

    fn occupied_area(&self) -> Option<LayoutArea>;

    /// Moves already placed geometry, including all descendants.
    fn translate(&mut self, dx: f32, dy: f32);
}
