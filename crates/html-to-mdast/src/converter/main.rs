//! Recursive tree walker that turns hast nodes into mdast nodes.
//!
//! Each node is dispatched through the [`HandlerTable`]. A matching handler
//! receives a [`Children`] continuation which transforms a node's children
//! through the same table, optionally under an overridden [`Context`]. Nodes
//! without a handler (or whose handler declines) are replaced by their
//! transformed children, and element selectors of such nodes are collected as
//! "unhandled" diagnostics.
//!
//! Diagnostics are returned, not pushed into shared state: every call yields
//! its output together with the unhandled selectors of its subtree, and the
//! parent concatenates them in document order.

use log::{debug, trace};

use crate::context::Context;
use crate::converter::table::HandlerTable;
use crate::error::Result;
use crate::hast::Node;
use crate::mdast::{self, Handled};
use crate::minify::minify;
use crate::options::ConversionOptions;
use crate::text::{WrapFn, wrap_text};

/// Output of transforming one subtree.
#[derive(Debug, Clone, PartialEq)]
pub struct Transformed {
    /// Destination node(s) replacing the source node.
    pub output: Handled,
    /// Selectors of elements that fell through to default recursion, in
    /// document order. Not deduplicated.
    pub unhandled: Vec<String>,
}

/// Result of a full conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    /// The destination tree. A sequence at the top level is wrapped in `root`.
    pub tree: mdast::Node,
    /// Selectors of elements no handler accepted.
    pub unhandled: Vec<String>,
}

/// Walks a source tree with a fixed handler table and text wrapper.
pub struct Transformer<'a> {
    handlers: &'a HandlerTable,
    wrap: &'a WrapFn,
}

impl<'a> Transformer<'a> {
    /// A transformer using [`wrap_text`] for text nodes.
    pub fn new(handlers: &'a HandlerTable) -> Self {
        Self {
            handlers,
            wrap: &wrap_text,
        }
    }

    /// Replace the text wrapping function.
    #[must_use]
    pub fn with_wrap(mut self, wrap: &'a WrapFn) -> Self {
        self.wrap = wrap;
        self
    }

    /// Transform `node` and its subtree under `ctx`.
    pub fn transform(&self, node: &Node, ctx: &Context) -> Result<Transformed> {
        if let Some(rule) = self.handlers.find(node) {
            let mut children = Children::new(self, ctx);
            if let Some(output) = rule.handle(node, &mut children, ctx)? {
                return Ok(Transformed {
                    output,
                    unhandled: children.unhandled,
                });
            }
            trace!("handler declined {}", describe(node));
        }

        let mut unhandled: Vec<String> = node.selector().into_iter().collect();
        let mut children = Children::new(self, ctx);
        let output = children.transform(node)?;
        unhandled.append(&mut children.unhandled);
        Ok(Transformed { output, unhandled })
    }
}

fn describe(node: &Node) -> String {
    node.selector().unwrap_or_else(|| match node {
        Node::Root(_) => "root".to_string(),
        Node::Text(_) => "text".to_string(),
        Node::Comment(_) => "comment".to_string(),
        Node::Doctype => "doctype".to_string(),
        Node::Element(element) => element.tag_name.clone(),
    })
}

/// Continuation handed to handlers for transforming children.
///
/// Every call merges its overrides onto the context the handler was invoked
/// with; the overrides only apply to that call's subtree.
pub struct Children<'a> {
    transformer: &'a Transformer<'a>,
    ctx: &'a Context,
    unhandled: Vec<String>,
}

impl<'a> Children<'a> {
    const fn new(transformer: &'a Transformer<'a>, ctx: &'a Context) -> Self {
        Self {
            transformer,
            ctx,
            unhandled: Vec::new(),
        }
    }

    /// Transform the children of `node` under the inherited context.
    pub fn transform(&mut self, node: &Node) -> Result<Handled> {
        self.transform_with(node, &Context::new())
    }

    /// Transform the children of `node` with `overrides` merged over the
    /// inherited context.
    ///
    /// A text node yields a single wrapped `text` node. Any other node yields
    /// the flattened outputs of its children.
    pub fn transform_with(&mut self, node: &Node, overrides: &Context) -> Result<Handled> {
        let ctx = self.ctx.merge(overrides);
        if let Some(value) = node.value() {
            return Ok(Handled::Node(mdast::Node::text((self.transformer.wrap)(value, &ctx))));
        }

        let mut out = Vec::with_capacity(node.children().len());
        for child in node.children() {
            let Transformed { output, mut unhandled } = self.transformer.transform(child, &ctx)?;
            self.unhandled.append(&mut unhandled);
            output.append_to(&mut out);
        }
        Ok(Handled::Nodes(out))
    }

    /// [`Children::transform`] as a flat list.
    pub fn nodes(&mut self, node: &Node) -> Result<Vec<mdast::Node>> {
        self.transform(node).map(Handled::into_vec)
    }

    /// [`Children::transform_with`] as a flat list.
    pub fn nodes_with(&mut self, node: &Node, overrides: &Context) -> Result<Vec<mdast::Node>> {
        self.transform_with(node, overrides).map(Handled::into_vec)
    }

    /// The context the current handler was invoked with.
    pub const fn context(&self) -> &Context {
        self.ctx
    }

    /// Unhandled selectors collected so far by this continuation.
    pub fn unhandled(&self) -> &[String] {
        &self.unhandled
    }
}

/// Minify `tree` and transform it with `handlers`, starting from `settings`.
pub fn to_mdast(tree: &mut Node, handlers: &HandlerTable, settings: &Context) -> Result<Conversion> {
    to_mdast_with_options(tree, handlers, &ConversionOptions::with_settings(settings.clone()))
}

/// [`to_mdast`] with explicit whitespace handling.
pub fn to_mdast_with_options(
    tree: &mut Node,
    handlers: &HandlerTable,
    options: &ConversionOptions,
) -> Result<Conversion> {
    if let Some(minify_options) = options.whitespace_mode.minify_options() {
        minify(tree, &minify_options);
    }

    let Transformed { output, unhandled } = Transformer::new(handlers).transform(tree, &options.settings)?;
    for selector in &unhandled {
        debug!("no handler for `{selector}`");
    }
    trace!("converted tree with {} unhandled element(s)", unhandled.len());

    Ok(Conversion {
        tree: output.into_node(),
        unhandled,
    })
}

/// Parse `html` and convert it with `handlers`.
#[cfg(feature = "html")]
pub fn convert_html(html: &str, handlers: &HandlerTable, options: &ConversionOptions) -> Result<Conversion> {
    let mut tree = crate::dom::parse_html(html);
    to_mdast_with_options(&mut tree, handlers, options)
}
