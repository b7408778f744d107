//! Conversion of html5ever DOM trees into hast.
//!
//! Parsing is left entirely to html5ever; this module only maps the resulting
//! `RcDom` onto [`crate::hast::Node`].

use html5ever::tendril::TendrilSink;
use html5ever::{ParseOpts, parse_document};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::hast::{Element, Node};

/// Parse a complete HTML document into a hast root.
pub fn parse_html(html: &str) -> Node {
    let dom = parse_document(RcDom::default(), ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes());
    from_handle(&dom.document).unwrap_or_else(|| Node::root(Vec::new()))
}

/// Convert one rcdom node and its subtree. Processing instructions have no
/// hast counterpart and yield `None`.
pub fn from_handle(handle: &Handle) -> Option<Node> {
    match &handle.data {
        NodeData::Document => Some(Node::root(convert_children(handle))),
        NodeData::Doctype { .. } => Some(Node::Doctype),
        NodeData::Text { contents } => Some(Node::text(contents.borrow().to_string())),
        NodeData::Comment { contents } => Some(Node::comment(contents.to_string())),
        NodeData::Element { name, attrs, .. } => {
            let mut element = Element::new(name.local.to_string());
            for attr in attrs.borrow().iter() {
                element
                    .properties
                    .set(attr.name.local.to_string(), attr.value.to_string());
            }
            element.children = convert_children(handle);
            Some(element.into())
        }
        NodeData::ProcessingInstruction { .. } => None,
    }
}

fn convert_children(handle: &Handle) -> Vec<Node> {
    handle.children.borrow().iter().filter_map(from_handle).collect()
}
