//! Document fixtures. Styles are written as JSON the way documents carry them.

use quire::idf::{IRNode, ImageSource, NodeMetadata, TableCell, TableNode, TableRow, TableSection};
use quire::style::stylesheet::ElementStyle;
use serde_json::Value;

pub fn style(json: Value) -> ElementStyle {
    serde_json::from_value(json).expect("valid element style")
}

fn meta(json: Value) -> NodeMetadata {
    NodeMetadata::with_style(style(json))
}

pub fn paragraph(text: &str) -> IRNode {
    IRNode::paragraph(text)
}

pub fn styled_paragraph(json: Value, text: &str) -> IRNode {
    IRNode::Paragraph {
        meta: meta(json),
        children: vec![quire::idf::InlineNode::Text(text.to_string())],
    }
}

pub fn with_id(mut node: IRNode, id: &str) -> IRNode {
    match &mut node {
        IRNode::Block { meta, .. }
        | IRNode::Paragraph { meta, .. }
        | IRNode::Image { meta, .. }
        | IRNode::FlexContainer { meta, .. }
        | IRNode::GridContainer { meta, .. }
        | IRNode::MultiColumn { meta, .. }
        | IRNode::List { meta, .. }
        | IRNode::ListItem { meta, .. } => meta.id = Some(id.to_string()),
        IRNode::Table(table) => table.meta.id = Some(id.to_string()),
        IRNode::Root(_) | IRNode::AreaBreak { .. } => {}
    }
    node
}

pub fn block(json: Value, children: Vec<IRNode>) -> IRNode {
    IRNode::Block {
        meta: meta(json),
        children,
    }
}

pub fn flex(json: Value, children: Vec<IRNode>) -> IRNode {
    IRNode::FlexContainer {
        meta: meta(json),
        children,
    }
}

pub fn grid(json: Value, children: Vec<IRNode>) -> IRNode {
    IRNode::GridContainer {
        meta: meta(json),
        children,
    }
}

pub fn multicol(json: Value, children: Vec<IRNode>) -> IRNode {
    IRNode::MultiColumn {
        meta: meta(json),
        children,
    }
}

pub fn list(json: Value, start: Option<usize>, items: &[&str]) -> IRNode {
    IRNode::List {
        meta: meta(json),
        start,
        children: items
            .iter()
            .map(|text| IRNode::ListItem {
                meta: NodeMetadata::default(),
                children: vec![paragraph(text)],
            })
            .collect(),
    }
}

pub fn image(json: Value, src: &str, width: f32, height: f32) -> IRNode {
    IRNode::Image {
        meta: meta(json),
        source: ImageSource::new(src, width, height),
    }
}

pub fn area_break(master: Option<&str>) -> IRNode {
    IRNode::AreaBreak {
        master_name: master.map(str::to_string),
    }
}

/// A table of text cells labelled `r{row}c{col}`, one style for every cell.
pub fn table(json: Value, cell_json: Value, header: Option<&[&str]>, rows: usize, cols: usize) -> IRNode {
    let cell_style = style(cell_json);
    let cell = |text: String| TableCell {
        meta: NodeMetadata::with_style(cell_style.clone()),
        ..TableCell::text(text)
    };
    let body = (0..rows)
        .map(|r| TableRow {
            cells: (0..cols).map(|c| cell(format!("r{}c{}", r, c))).collect(),
        })
        .collect();
    let header = header.map(|labels| TableSection {
        rows: vec![TableRow {
            cells: labels.iter().map(|l| cell(l.to_string())).collect(),
        }],
    });
    IRNode::Table(Box::new(TableNode {
        meta: meta(json),
        header,
        body: TableSection { rows: body },
        ..Default::default()
    }))
}
