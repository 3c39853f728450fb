use super::frame::{BoxFrame, BoxGeometry, FrameOptions, outer_min_max};
use super::{RenderNode, block_attributes};
use crate::algorithms::floats::{clearance, floats_bottom_since, place_float, FloatBox};
use crate::interface::{
    DrawContext, LayoutArea, LayoutContext, LayoutResult, LayoutStatus, MinMaxWidth, Renderer,
};
use crate::painting::box_painter::paint_box;
use crate::style::ComputedStyle;
use crate::{LayoutEngine, LayoutError};
use quire_style::boxes::Clear;
use quire_style::list::ListStyleType;
use quire_traits::TagRole;
use quire_types::{AnchorId, Rect, RendererId};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlockKind {
    Div,
    /// A box generated around loose content; it has no tag of its own.
    Anonymous,
    List { numbering: ListStyleType },
}

#[derive(Debug, Clone)]
pub struct BlockRenderer {
    pub id: RendererId,
    pub kind: BlockKind,
    pub style: Arc<ComputedStyle>,
    pub anchor: Option<AnchorId>,
    pub children: Vec<RenderNode>,
    pub continuation: bool,
    /// Content height still to be produced, for boxes with a fixed height.
    pub fixed_height: Option<f32>,
    pub geometry: Option<BoxGeometry>,
}

impl BlockRenderer {
    pub fn new(kind: BlockKind, style: Arc<ComputedStyle>, children: Vec<RenderNode>) -> Self {
        let fixed_height = super::frame::style_fixed_height(&style);
        Self {
            id: RendererId::next(),
            kind,
            style,
            anchor: None,
            children,
            continuation: false,
            fixed_height,
            geometry: None,
        }
    }

    pub fn anonymous(style: Arc<ComputedStyle>, children: Vec<RenderNode>) -> Self {
        Self {
            fixed_height: None,
            ..Self::new(BlockKind::Anonymous, style, children)
        }
    }

    pub fn with_anchor(mut self, anchor: Option<AnchorId>) -> Self {
        self.anchor = anchor;
        self
    }
}

impl Renderer for BlockRenderer {
    fn id(&self) -> RendererId {
        self.id
    }

    fn layout(&mut self, ctx: &mut LayoutContext) -> Result<LayoutResult<Self>, LayoutError> {
        let page = ctx.area.page_number;
        let frame = BoxFrame::open(
            &self.style,
            ctx.area.bbox,
            FrameOptions {
                margin_before: ctx.margin_before,
                continuation: self.continuation,
                fixed_height: self.fixed_height,
                ..Default::default()
            },
        );
        if !frame.top_fits(ctx.config().float_epsilon) && !ctx.forced_placement {
            return Ok(LayoutResult::nothing(self.id));
        }

        let float_mark = ctx.floats.len();
        let outer_clipped = ctx.clipped_height;
        ctx.clipped_height = outer_clipped || frame.is_clipped();
        let outcome = layout_flow(ctx, frame.content_area(), &self.children);
        ctx.clipped_height = outer_clipped;
        let outcome = outcome?;

        if outcome.placed.is_empty() && !outcome.remaining.is_empty() {
            ctx.floats.truncate(float_mark);
            return Ok(LayoutResult::nothing(outcome.cause.unwrap_or(self.id)));
        }

        let complete = outcome.remaining.is_empty() && frame.fixed_height_remainder().is_none();
        if !complete && self.style.misc.keep_together && !ctx.first_in_area && !ctx.forced_placement {
            log::debug!("{} keeps together; moving it to the next area", self.id);
            ctx.floats.truncate(float_mark);
            return Ok(LayoutResult::nothing(self.id));
        }

        let geom = frame.close(page, outcome.used, complete, ctx.min_height);
        let occupied = LayoutArea::new(page, geom.margin_box);
        if complete {
            self.children = outcome.placed;
            self.geometry = Some(geom);
            return Ok(LayoutResult::full(occupied));
        }

        let mut split = self.clone();
        split.children = outcome.placed;
        split.geometry = Some(geom);

        let mut overflow = self.clone();
        overflow.children = outcome.remaining;
        overflow.continuation = true;
        overflow.geometry = None;
        // Content that ran past a fixed height continues with an automatic height.
        overflow.fixed_height = frame.fixed_height_remainder();
        Ok(LayoutResult::partial(occupied, split, overflow))
    }

    fn draw(&self, ctx: &mut DrawContext) -> Result<(), LayoutError> {
        let Some(geom) = self.geometry else {
            return Ok(());
        };
        if let Some(anchor) = &self.anchor {
            ctx.register_anchor(anchor, geom.page_number, geom.border_box.top());
        }
        let role = match self.kind {
            BlockKind::Div => Some(TagRole::Div),
            BlockKind::List { .. } => Some(TagRole::L),
            BlockKind::Anonymous => None,
        };
        if let Some(role) = role {
            let mut attributes = block_attributes(&self.style, &geom);
            if let BlockKind::List { numbering } = self.kind {
                attributes.list_numbering = Some(numbering.numbering_name());
            }
            ctx.open_tag(self.id, role, attributes)?;
        }
        paint_box(&mut *ctx.canvas, &self.style, &geom)?;
        for child in &self.children {
            child.draw(ctx)?;
        }
        if role.is_some() {
            ctx.close_tag(self.id)?;
        }
        Ok(())
    }

    fn next_renderer(&self) -> Self {
        let mut next = self.clone();
        next.id = RendererId::next();
        next.geometry = None;
        next
    }

    fn min_max_width(&self, engine: &LayoutEngine) -> Result<MinMaxWidth, LayoutError> {
        let mut content = MinMaxWidth::default();
        for child in &self.children {
            content = content.stack(child.min_max_width(engine)?);
        }
        Ok(outer_min_max(&self.style, content))
    }

    fn occupied_area(&self) -> Option<LayoutArea> {
        self.geometry
            .map(|g| LayoutArea::new(g.page_number, g.margin_box))
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        if let Some(g) = self.geometry.as_mut() {
            g.translate(dx, dy);
        }
        for child in &mut self.children {
            child.translate(dx, dy);
        }
    }
}

/// Result of flowing a list of children top-down through a content box.
#[derive(Debug, Default)]
pub(crate) struct FlowOutcome {
    pub placed: Vec<RenderNode>,
    /// Content left for the next area. Empty when everything was placed.
    pub remaining: Vec<RenderNode>,
    /// Content height used, floats included.
    pub used: f32,
    pub cause: Option<RendererId>,
}

struct Placed {
    node: RenderNode,
    bottom: f32,
    float_mark: usize,
    in_flow: bool,
}

enum FloatOutcome {
    Placed,
    Split(RenderNode),
    Deferred(Option<RendererId>),
}

/// Lays `children` out top-down inside `content`.
///
/// Adjacent vertical margins collapse, floats are placed first-fit and clearance
/// moves cleared children below matching floats. A child that cannot be placed
/// pulls back any directly preceding `keep_with_next` siblings.
pub(crate) fn layout_flow(
    ctx: &mut LayoutContext,
    content: Rect,
    children: &[RenderNode],
) -> Result<FlowOutcome, LayoutError> {
    let page = ctx.area.page_number;
    let flow_mark = ctx.floats.len();
    let mut placed: Vec<Placed> = Vec::new();
    let mut cursor = content.top();
    let mut margin_prev = 0.0;
    let mut remaining: Vec<RenderNode> = Vec::new();
    let mut cause = None;

    for (i, original) in children.iter().enumerate() {
        let mut child = original.clone();
        let any_in_flow = placed.iter().any(|p| p.in_flow);
        let first = ctx.first_in_area && !any_in_flow;
        let forced = (ctx.forced_placement && !any_in_flow) || original.style().misc.forced_placement;
        let float_mark = ctx.floats.len();

        if child.is_floating() {
            match place_floating(ctx, &mut child, content, cursor, first, forced)? {
                FloatOutcome::Placed => {
                    placed.push(Placed {
                        node: child,
                        bottom: cursor,
                        float_mark,
                        in_flow: false,
                    });
                    continue;
                }
                FloatOutcome::Split(overflow) => {
                    placed.push(Placed {
                        node: child,
                        bottom: cursor,
                        float_mark,
                        in_flow: false,
                    });
                    remaining.push(overflow);
                    remaining.extend(children[i + 1..].iter().cloned());
                    break;
                }
                FloatOutcome::Deferred(c) => {
                    cause = c;
                    remaining.extend(children[i..].iter().cloned());
                    break;
                }
            }
        }

        let clear = child.style().misc.clear;
        if clear != Clear::None {
            let cleared = clearance(ctx.floats, clear, cursor);
            if cleared < cursor {
                cursor = cleared;
                margin_prev = 0.0;
            }
        }

        let area = Rect::new(
            content.left(),
            content.bottom(),
            content.width,
            cursor - content.bottom(),
        );
        let result = {
            let mut cctx = ctx.child(LayoutArea::new(page, area));
            cctx.margin_before = margin_prev;
            cctx.first_in_area = first;
            cctx.forced_placement = forced;
            child.layout(&mut cctx)?
        };

        match result.status {
            LayoutStatus::Full => {
                let bottom = result
                    .occupied_area
                    .map_or(cursor, |a| a.bbox.bottom().min(cursor));
                margin_prev = child.margin_bottom();
                cursor = bottom;
                placed.push(Placed {
                    node: child,
                    bottom,
                    float_mark,
                    in_flow: true,
                });
            }
            LayoutStatus::Partial => {
                let (Some(split), Some(overflow)) = (result.split, result.overflow) else {
                    return Err(LayoutError::StructureViolation {
                        renderer: "block",
                        message: format!("{} returned a partial result without fragments", child.id()),
                    });
                };
                let bottom = result
                    .occupied_area
                    .map_or(cursor, |a| a.bbox.bottom().min(cursor));
                cursor = bottom;
                placed.push(Placed {
                    node: split,
                    bottom,
                    float_mark,
                    in_flow: true,
                });
                remaining.push(overflow);
                remaining.extend(children[i + 1..].iter().cloned());
                break;
            }
            LayoutStatus::Nothing => {
                cause = result.cause_of_nothing;
                remaining.extend(children[i..].iter().cloned());
                while placed
                    .last()
                    .is_some_and(|p| p.in_flow && p.node.keep_with_next())
                {
                    if let Some(last) = placed.pop() {
                        log::debug!("{} keeps with next; pulling it back", last.node.id());
                        ctx.floats.truncate(last.float_mark);
                        remaining.insert(0, original_of(children, &last.node));
                    }
                }
                break;
            }
        }
    }

    let mut used = content.top() - placed.last().map_or(content.top(), |p| p.bottom.min(content.top()));
    if let Some(float_bottom) = floats_bottom_since(ctx.floats, flow_mark) {
        used = used.max(content.top() - float_bottom);
    }
    Ok(FlowOutcome {
        placed: placed.into_iter().map(|p| p.node).collect(),
        remaining,
        used: used.max(0.0),
        cause,
    })
}

/// The unplaced child a pulled-back renderer was laid out from.
fn original_of(children: &[RenderNode], laid_out: &RenderNode) -> RenderNode {
    children
        .iter()
        .find(|c| c.id() == laid_out.id())
        .cloned()
        .unwrap_or_else(|| laid_out.clone())
}

/// Lays out a floated child at its shrink-to-fit width and places it first-fit.
fn place_floating(
    ctx: &mut LayoutContext,
    child: &mut RenderNode,
    content: Rect,
    cursor: f32,
    first: bool,
    forced: bool,
) -> Result<FloatOutcome, LayoutError> {
    let page = ctx.area.page_number;
    let side = child.style().misc.float;
    let mm = child.min_max_width(ctx.engine)?;
    let width = mm.max.min(content.width.max(mm.min));
    let height = cursor - content.bottom();

    let mut own_floats = Vec::new();
    let result = {
        let area = LayoutArea::new(page, Rect::new(content.left(), content.bottom(), width, height));
        let mut fctx = ctx.isolated(area, &mut own_floats);
        fctx.first_in_area = first;
        fctx.forced_placement = forced;
        child.layout(&mut fctx)?
    };

    let mut overflow = None;
    match result.status {
        LayoutStatus::Full => {}
        LayoutStatus::Partial if forced => {
            if let (Some(split), Some(rest)) = (result.split, result.overflow) {
                *child = split;
                overflow = Some(rest);
            }
        }
        _ => return Ok(FloatOutcome::Deferred(result.cause_of_nothing.or(Some(child.id())))),
    }

    let Some(occupied) = child.occupied_area().or(result.occupied_area) else {
        return Ok(FloatOutcome::Deferred(Some(child.id())));
    };
    let (w, h) = (occupied.bbox.width, occupied.bbox.height);
    let rect = match place_float(ctx.floats, &content, cursor, w, h, side) {
        Some(rect) => rect,
        None if forced => {
            if !ctx.measuring {
                log::warn!("Forced placement of float {} that does not fit its area", child.id());
            }
            let x = match side {
                quire_style::boxes::FloatSide::Right => content.right() - w,
                _ => content.left(),
            };
            Rect::from_top_left(x, cursor, w, h)
        }
        None => return Ok(FloatOutcome::Deferred(Some(child.id()))),
    };
    child.translate(rect.left() - occupied.bbox.left(), rect.top() - occupied.bbox.top());
    ctx.floats.push(FloatBox { rect, side });
    Ok(match overflow {
        Some(rest) => FloatOutcome::Split(rest),
        None => FloatOutcome::Placed,
    })
}
