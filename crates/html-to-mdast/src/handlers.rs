//! Default handler table for common HTML elements.
//!
//! Block-level text (paragraphs, headings) is produced under `oneLine: true`
//! and preformatted code under `oneLine: false`, so line breaks survive only
//! where Markdown can represent them. Elements not covered here fall through to
//! default recursion and show up as unhandled.

use crate::context::{Context, ONE_LINE};
use crate::converter::{Children, HandlerTable};
use crate::error::{ConversionError, Result};
use crate::hast::Node;
use crate::mdast::{self, Handled};
use crate::selector::{KeyRule, Pattern};

const IGNORED: &[&str] = &["head", "script", "style", "template", "noscript"];

const TRANSPARENT: &[&str] = &[
    "html", "body", "div", "span", "section", "article", "main", "header", "footer", "nav", "aside",
];

const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// Types of mdast phrasing content.
const PHRASING: &[&str] = &[
    "break",
    "delete",
    "emphasis",
    "html",
    "image",
    "inlineCode",
    "link",
    "strong",
    "text",
];

/// Build the default table.
pub fn default_handlers() -> HandlerTable {
    let mut table = HandlerTable::new();
    table
        .add(anything(Pattern::tags(IGNORED.iter().copied())), ignore)
        .add(anything(Pattern::tags(TRANSPARENT.iter().copied())), transparent)
        .add(Pattern::tag("p").can_have("id").can_have_any_class(), paragraph)
        .add(
            Pattern::tags(HEADINGS.iter().copied()).can_have("id").can_have_any_class(),
            heading,
        )
        .add(Pattern::tag("pre").can_have_any_class(), code_block)
        .add(Pattern::tag("code").can_have_any_class(), inline_code)
        .add(Pattern::tags(["em", "i"]), wrap_in("emphasis"))
        .add(Pattern::tags(["strong", "b"]), wrap_in("strong"))
        .add(Pattern::tags(["del", "s"]), wrap_in("delete"))
        .add(Pattern::tag("blockquote").can_have("cite"), blockquote)
        .add(
            Pattern::tag("a")
                .has("href")
                .can_have("title")
                .can_have("target")
                .can_have("rel")
                .can_have_any_class(),
            link,
        )
        .add(
            Pattern::tag("img")
                .has("src")
                .can_have("alt")
                .can_have("title")
                .can_have("width")
                .can_have("height")
                .can_have_any_class(),
            image,
        )
        .add(Pattern::tag("ul").can_have_any_class(), list)
        .add(Pattern::tag("ol").can_have("start").can_have_any_class(), list)
        .add(Pattern::tag("li").can_have_any_class(), list_item)
        .add(Pattern::tag("br"), |_: &Node, _: &mut Children<'_>, _: &Context| {
            Ok(Some(mdast::Node::void("break").into()))
        })
        .add(Pattern::tag("hr"), |_: &Node, _: &mut Children<'_>, _: &Context| {
            Ok(Some(mdast::Node::void("thematicBreak").into()))
        });
    table
}

fn anything(pattern: Pattern) -> Pattern {
    pattern.can_have(KeyRule::any()).can_have_any_class()
}

fn one_line(value: bool) -> Context {
    Context::new().with(ONE_LINE, value)
}

fn attribute<'a>(node: &'a Node, name: &str) -> Option<&'a str> {
    node.properties().and_then(|props| props.get(name))
}

fn ignore(_: &Node, _: &mut Children<'_>, _: &Context) -> Result<Option<Handled>> {
    Ok(Some(Handled::nothing()))
}

fn transparent(node: &Node, children: &mut Children<'_>, _: &Context) -> Result<Option<Handled>> {
    children.transform(node).map(Some)
}

fn paragraph(node: &Node, children: &mut Children<'_>, _: &Context) -> Result<Option<Handled>> {
    let nodes = children.nodes_with(node, &one_line(true))?;
    if nodes.is_empty() {
        return Ok(Some(Handled::nothing()));
    }
    Ok(Some(mdast::Node::parent("paragraph", nodes).into()))
}

fn heading(node: &Node, children: &mut Children<'_>, _: &Context) -> Result<Option<Handled>> {
    let depth: u8 = node
        .tag_name()
        .and_then(|tag| tag.strip_prefix('h'))
        .and_then(|level| level.parse().ok())
        .ok_or_else(|| ConversionError::handler(format!("not a heading: {:?}", node.tag_name())))?;
    let nodes = children.nodes_with(node, &one_line(true))?;
    Ok(Some(mdast::Node::parent("heading", nodes).with_prop("depth", depth).into()))
}

/// `language-rust` / `lang-rust` class on the `pre` or its single `code` child.
fn code_language(node: &Node) -> Option<String> {
    let own = node.properties().into_iter();
    let nested = node
        .children()
        .iter()
        .filter(|child| child.tag_name() == Some("code"))
        .filter_map(Node::properties);
    own.chain(nested)
        .flat_map(|props| props.class_name().iter())
        .find_map(|class| {
            class
                .strip_prefix("language-")
                .or_else(|| class.strip_prefix("lang-"))
                .map(str::to_string)
        })
}

fn code_block(node: &Node, children: &mut Children<'_>, _: &Context) -> Result<Option<Handled>> {
    let nodes = children.nodes_with(node, &one_line(false))?;
    let mut value = mdast::Node::root(nodes).to_plain_string();
    if value.ends_with('\n') {
        value.pop();
    }
    let code = mdast::Node::literal("code", value).with_optional_prop("lang", code_language(node));
    Ok(Some(code.into()))
}

fn inline_code(node: &Node, children: &mut Children<'_>, _: &Context) -> Result<Option<Handled>> {
    let value = mdast::Node::root(children.nodes(node)?).to_plain_string();
    Ok(Some(mdast::Node::literal("inlineCode", value).into()))
}

fn wrap_in(kind: &'static str) -> impl Fn(&Node, &mut Children<'_>, &Context) -> Result<Option<Handled>> {
    move |node, children, _| Ok(Some(mdast::Node::parent(kind, children.nodes(node)?).into()))
}

fn blockquote(node: &Node, children: &mut Children<'_>, _: &Context) -> Result<Option<Handled>> {
    let nodes = children.nodes_with(node, &one_line(true))?;
    Ok(Some(mdast::Node::parent("blockquote", wrap_phrasing(nodes)).into()))
}

fn link(node: &Node, children: &mut Children<'_>, _: &Context) -> Result<Option<Handled>> {
    let url = attribute(node, "href").unwrap_or_default();
    let link = mdast::Node::parent("link", children.nodes(node)?)
        .with_prop("url", url)
        .with_optional_prop("title", attribute(node, "title"));
    Ok(Some(link.into()))
}

fn image(node: &Node, _: &mut Children<'_>, _: &Context) -> Result<Option<Handled>> {
    let url = attribute(node, "src").unwrap_or_default();
    let image = mdast::Node::void("image")
        .with_prop("url", url)
        .with_optional_prop("alt", attribute(node, "alt"))
        .with_optional_prop("title", attribute(node, "title"));
    Ok(Some(image.into()))
}

fn list(node: &Node, children: &mut Children<'_>, _: &Context) -> Result<Option<Handled>> {
    let ordered = node.tag_name() == Some("ol");
    let items = children.nodes(node)?;
    let mut list = mdast::Node::parent("list", items).with_prop("ordered", ordered);
    if ordered {
        let start = attribute(node, "start")
            .and_then(|start| start.trim().parse::<u64>().ok())
            .unwrap_or(1);
        list = list.with_prop("start", start);
    }
    Ok(Some(list.into()))
}

fn list_item(node: &Node, children: &mut Children<'_>, _: &Context) -> Result<Option<Handled>> {
    let nodes = children.nodes_with(node, &one_line(true))?;
    Ok(Some(mdast::Node::parent("listItem", wrap_phrasing(nodes)).into()))
}

/// Group runs of phrasing content into paragraphs, leaving block nodes as is.
fn wrap_phrasing(nodes: Vec<mdast::Node>) -> Vec<mdast::Node> {
    let mut out = Vec::with_capacity(nodes.len());
    let mut run = Vec::new();
    for node in nodes {
        if PHRASING.contains(&node.kind.as_str()) {
            run.push(node);
        } else {
            if !run.is_empty() {
                out.push(mdast::Node::parent("paragraph", std::mem::take(&mut run)));
            }
            out.push(node);
        }
    }
    if !run.is_empty() {
        out.push(mdast::Node::parent("paragraph", run));
    }
    out
}
