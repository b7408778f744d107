//! Whitespace minification of the source tree.
//!
//! Applies the HTML rendering rules for insignificant whitespace before the
//! tree is transformed, so handlers never see indentation or formatting
//! newlines from the original markup:
//! - runs of whitespace inside text collapse to one space, or one line feed
//!   when the run contained a line break and `newlines` is set
//! - whitespace at the start and end of block-level elements is dropped
//! - whitespace directly after whitespace in the same inline flow is dropped
//! - text nodes left empty are removed
//!
//! Preformatted content (`pre`, `textarea`, `listing`, `plaintext`) is kept
//! verbatim.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::hast::Node;

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t\n\r\x0C]+").expect("valid regex pattern"));

const HTML_WHITESPACE: [char; 5] = [' ', '\t', '\n', '\r', '\x0C'];

const BLOCK_ELEMENTS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "body",
    "caption",
    "center",
    "col",
    "colgroup",
    "dd",
    "details",
    "dialog",
    "dir",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "frame",
    "frameset",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "head",
    "header",
    "hgroup",
    "hr",
    "html",
    "legend",
    "li",
    "link",
    "listing",
    "main",
    "menu",
    "meta",
    "nav",
    "noframes",
    "ol",
    "optgroup",
    "option",
    "p",
    "param",
    "plaintext",
    "pre",
    "script",
    "section",
    "source",
    "style",
    "summary",
    "table",
    "tbody",
    "td",
    "template",
    "tfoot",
    "th",
    "thead",
    "title",
    "tr",
    "track",
    "ul",
];

const PREFORMATTED_ELEMENTS: &[&str] = &["listing", "plaintext", "pre", "textarea"];

/// Inline elements rendered as content of their own, so whitespace around
/// them stays significant.
const EMBEDDED_ELEMENTS: &[&str] = &[
    "audio", "button", "canvas", "embed", "iframe", "img", "input", "math", "meter", "object", "picture",
    "progress", "select", "svg", "video", "wbr",
];

/// Options for [`minify`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MinifyOptions {
    /// Collapse whitespace runs containing a line break to `\n` instead of a space.
    pub newlines: bool,
}

/// Minify insignificant whitespace of `tree` in place.
pub fn minify(tree: &mut Node, options: &MinifyOptions) {
    if tree.tag_name().is_some_and(is_preformatted) {
        return;
    }
    match tree {
        Node::Text(text) => {
            let collapsed = collapse(&text.value, options.newlines);
            text.value = collapsed.trim_matches(HTML_WHITESPACE).to_string();
        }
        _ => {
            if let Some(children) = tree.children_mut() {
                flow(children, true, options);
                trim_trailing(children);
            }
        }
    }
    prune_empty_text(tree);
}

fn is_block(tag_name: &str) -> bool {
    BLOCK_ELEMENTS.contains(&tag_name)
}

fn is_preformatted(tag_name: &str) -> bool {
    PREFORMATTED_ELEMENTS.contains(&tag_name)
}

fn is_embedded(tag_name: &str) -> bool {
    EMBEDDED_ELEMENTS.contains(&tag_name)
}

fn collapse(value: &str, newlines: bool) -> String {
    WHITESPACE_RUN
        .replace_all(value, |caps: &Captures| {
            let run = &caps[0];
            if newlines && run.contains(['\n', '\r']) { "\n" } else { " " }
        })
        .into_owned()
}

/// Minify one inline flow. `at_break` is true at the start of a block or after
/// emitted whitespace. Returns the state after the last child.
fn flow(children: &mut [Node], mut at_break: bool, options: &MinifyOptions) -> bool {
    for index in 0..children.len() {
        let starts_block = children[index].tag_name().is_some_and(is_block);
        let line_break = children[index].tag_name() == Some("br");
        if starts_block || line_break {
            trim_trailing(&mut children[..index]);
        }

        match &mut children[index] {
            Node::Text(text) => {
                let mut value = collapse(&text.value, options.newlines);
                if at_break {
                    value = value.trim_start_matches(HTML_WHITESPACE).to_string();
                }
                if !value.is_empty() {
                    at_break = value.ends_with(HTML_WHITESPACE);
                }
                text.value = value;
            }
            Node::Element(element) if is_preformatted(&element.tag_name) => {
                at_break = starts_block;
            }
            Node::Element(_) if line_break => {
                at_break = true;
            }
            Node::Element(element) if is_embedded(&element.tag_name) => {
                flow(&mut element.children, false, options);
                at_break = false;
            }
            Node::Element(element) if starts_block => {
                flow(&mut element.children, true, options);
                trim_trailing(&mut element.children);
                at_break = true;
            }
            Node::Element(element) => {
                at_break = flow(&mut element.children, at_break, options);
            }
            Node::Root(_) | Node::Comment(_) | Node::Doctype => {}
        }
    }
    at_break
}

/// Strip trailing whitespace from the end of an inline flow. Returns true once
/// non-whitespace content ends the flow.
fn trim_trailing(nodes: &mut [Node]) -> bool {
    for node in nodes.iter_mut().rev() {
        match node {
            Node::Text(text) => {
                let len = text.value.trim_end_matches(HTML_WHITESPACE).len();
                text.value.truncate(len);
                if !text.value.is_empty() {
                    return true;
                }
            }
            Node::Element(element)
                if !is_block(&element.tag_name)
                    && !is_preformatted(&element.tag_name)
                    && !is_embedded(&element.tag_name)
                    && element.tag_name != "br" =>
            {
                if trim_trailing(&mut element.children) {
                    return true;
                }
            }
            Node::Comment(_) | Node::Doctype => {}
            Node::Element(_) | Node::Root(_) => return true,
        }
    }
    false
}

fn prune_empty_text(node: &mut Node) {
    if node.tag_name().is_some_and(is_preformatted) {
        return;
    }
    if let Some(children) = node.children_mut() {
        children.retain(|child| !matches!(child, Node::Text(text) if text.value.is_empty()));
        for child in children.iter_mut() {
            prune_empty_text(child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hast::Element;
    use pretty_assertions::assert_eq;

    const NEWLINES: MinifyOptions = MinifyOptions { newlines: true };

    fn texts(node: &Node) -> Vec<String> {
        let mut out = Vec::new();
        collect(node, &mut out);
        out
    }

    fn collect(node: &Node, out: &mut Vec<String>) {
        if let Node::Text(text) = node {
            out.push(text.value.clone());
        }
        for child in node.children() {
            collect(child, out);
        }
    }

    #[test]
    fn test_block_indentation_is_removed() {
        let mut tree = Node::element(
            "div",
            vec![
                Node::text("\n  "),
                Node::element("p", vec![Node::text(" a   b ")]),
                Node::text("\n  "),
                Node::element("p", vec![Node::text("c\n\n  d")]),
                Node::text("\n"),
            ],
        );
        minify(&mut tree, &NEWLINES);
        assert_eq!(tree.children().len(), 2);
        assert_eq!(texts(&tree), vec!["a b", "c\nd"]);
    }

    #[test]
    fn test_newlines_off_collapses_to_space() {
        let mut tree = Node::element("p", vec![Node::text("c\n\n  d")]);
        minify(&mut tree, &MinifyOptions::default());
        assert_eq!(texts(&tree), vec!["c d"]);
    }

    #[test]
    fn test_inline_flow_keeps_single_spaces() {
        let mut tree = Node::element(
            "p",
            vec![
                Node::text("a "),
                Node::element("em", vec![Node::text(" b")]),
                Node::text(" c "),
            ],
        );
        minify(&mut tree, &NEWLINES);
        assert_eq!(texts(&tree), vec!["a ", "b", " c"]);
    }

    #[test]
    fn test_whitespace_before_block_is_trimmed() {
        let mut tree = Node::element(
            "div",
            vec![
                Node::text("a "),
                Node::element("span", vec![Node::text(" ")]),
                Node::element("p", vec![Node::text("b")]),
            ],
        );
        minify(&mut tree, &NEWLINES);
        assert_eq!(texts(&tree), vec!["a", "b"]);
        assert_eq!(tree.children()[1].children().len(), 0);
    }

    #[test]
    fn test_preformatted_content_is_untouched() {
        let code = "fn main() {\n    run();\n}\n";
        let mut tree = Node::root(vec![
            Node::text("  "),
            Node::from(Element::new("pre").with_children(vec![Node::element("code", vec![Node::text(code)])])),
            Node::text("  "),
        ]);
        minify(&mut tree, &NEWLINES);
        assert_eq!(tree.children().len(), 1);
        assert_eq!(texts(&tree), vec![code]);
    }

    #[test]
    fn test_comments_do_not_break_flow() {
        let mut tree = Node::element(
            "p",
            vec![Node::text("a "), Node::comment("x"), Node::text(" b")],
        );
        minify(&mut tree, &NEWLINES);
        assert_eq!(texts(&tree), vec!["a ", "b"]);
    }

    fn image(src: &str) -> Node {
        Node::from(Element::new("img").with_attribute("src", src))
    }

    #[test]
    fn test_space_after_image_is_kept() {
        let mut tree = Node::element("p", vec![Node::text("See "), image("x.png"), Node::text(" here")]);
        minify(&mut tree, &NEWLINES);
        assert_eq!(texts(&tree), vec!["See ", " here"]);
        assert_eq!(tree.children().len(), 3);
    }

    #[test]
    fn test_space_between_images_is_kept() {
        let mut tree = Node::element("p", vec![image("a.png"), Node::text("  "), image("b.png")]);
        minify(&mut tree, &NEWLINES);
        assert_eq!(texts(&tree), vec![" "]);
        assert_eq!(tree.children().len(), 3);
    }

    #[test]
    fn test_space_before_trailing_image_is_kept() {
        let mut tree = Node::element("p", vec![Node::text("chart "), image("c.png"), Node::text("\n")]);
        minify(&mut tree, &NEWLINES);
        assert_eq!(texts(&tree), vec!["chart "]);
    }

    #[test]
    fn test_whitespace_around_line_break_is_dropped() {
        let mut tree = Node::element(
            "p",
            vec![Node::text("one "), Node::element("br", vec![]), Node::text("\n   two")],
        );
        minify(&mut tree, &NEWLINES);
        assert_eq!(texts(&tree), vec!["one", "two"]);
        assert_eq!(tree.children()[1].tag_name(), Some("br"));
    }

    #[test]
    fn test_lone_text_is_trimmed() {
        let mut tree = Node::text("  hello \n world ");
        minify(&mut tree, &MinifyOptions::default());
        assert_eq!(tree, Node::text("hello world"));
    }
}
