//! Accessibility tag tree sink. Roles follow the PDF structure types.

use quire_types::{Color, Rect, RendererId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagRole {
    Document,
    Div,
    P,
    Span,
    Figure,
    Table,
    THead,
    TBody,
    TFoot,
    TR,
    TH,
    TD,
    L,
    LI,
    Lbl,
    LBody,
}

impl TagRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TagRole::Document => "Document",
            TagRole::Div => "Div",
            TagRole::P => "P",
            TagRole::Span => "Span",
            TagRole::Figure => "Figure",
            TagRole::Table => "Table",
            TagRole::THead => "THead",
            TagRole::TBody => "TBody",
            TagRole::TFoot => "TFoot",
            TagRole::TR => "TR",
            TagRole::TH => "TH",
            TagRole::TD => "TD",
            TagRole::L => "L",
            TagRole::LI => "LI",
            TagRole::Lbl => "Lbl",
            TagRole::LBody => "LBody",
        }
    }
}

/// Layout attributes attached to a tag. All fields are optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagAttributes {
    pub bbox: Option<Rect>,
    pub space_before: Option<f32>,
    pub space_after: Option<f32>,
    pub start_indent: Option<f32>,
    pub end_indent: Option<f32>,
    pub text_align: Option<&'static str>,
    pub background_color: Option<Color>,
    pub border_color: Option<Color>,
    pub border_thickness: Option<f32>,
    pub row_span: Option<usize>,
    pub col_span: Option<usize>,
    pub list_numbering: Option<&'static str>,
}

pub trait TagSink {
    fn open(&mut self, id: RendererId, role: TagRole, attributes: TagAttributes);
    fn close(&mut self, id: RendererId);
}

#[derive(Debug, Clone, PartialEq)]
pub enum TagEvent {
    Open { id: RendererId, role: TagRole, attributes: TagAttributes },
    Close(RendererId),
}

#[derive(Debug, Default)]
pub struct TagRecorder {
    pub events: Vec<TagEvent>,
}

impl TagRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Roles of all opened tags, in order.
    pub fn roles(&self) -> Vec<TagRole> {
        self.events
            .iter()
            .filter_map(|e| match e {
                TagEvent::Open { role, .. } => Some(*role),
                TagEvent::Close(_) => None,
            })
            .collect()
    }

    pub fn find(&self, role: TagRole) -> Vec<&TagAttributes> {
        self.events
            .iter()
            .filter_map(|e| match e {
                TagEvent::Open { role: r, attributes, .. } if *r == role => Some(attributes),
                _ => None,
            })
            .collect()
    }

    /// True when every open has a matching close in stack order.
    pub fn is_balanced(&self) -> bool {
        let mut stack = Vec::new();
        for e in &self.events {
            match e {
                TagEvent::Open { id, .. } => stack.push(*id),
                TagEvent::Close(id) => {
                    if stack.pop() != Some(*id) {
                        return false;
                    }
                }
            }
        }
        stack.is_empty()
    }
}

impl TagSink for TagRecorder {
    fn open(&mut self, id: RendererId, role: TagRole, attributes: TagAttributes) {
        self.events.push(TagEvent::Open { id, role, attributes });
    }

    fn close(&mut self, id: RendererId) {
        self.events.push(TagEvent::Close(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_tracks_nesting() {
        let mut rec = TagRecorder::new();
        let (a, b) = (RendererId::next(), RendererId::next());
        rec.open(a, TagRole::Table, TagAttributes::default());
        rec.open(b, TagRole::TR, TagAttributes::default());
        rec.close(b);
        rec.close(a);
        assert!(rec.is_balanced());
        assert_eq!(rec.roles(), vec![TagRole::Table, TagRole::TR]);
    }
}
