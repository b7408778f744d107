//! Rule-driven conversion of HTML syntax trees (hast) into Markdown syntax
//! trees (mdast).
//!
//! A conversion walks the source tree and dispatches every node through an
//! ordered [`HandlerTable`]. The first rule whose [`Matcher`] accepts the node
//! produces its output; handlers transform their children through the same
//! table via the [`Children`] continuation, optionally overriding the inherited
//! [`Context`] for that subtree. Elements without a handler are replaced by
//! their children and reported as unhandled.
//!
//! ```ignore
//! use html_to_mdast_rs::{Context, HandlerTable, Pattern, mdast, to_mdast};
//!
//! let mut table = HandlerTable::new();
//! table.add(Pattern::tag("p").can_have_any_class(), |node, children, _ctx| {
//!     let nodes = children.nodes_with(node, &Context::new().with("oneLine", true))?;
//!     Ok(Some(mdast::Node::parent("paragraph", nodes).into()))
//! });
//!
//! let mut tree = html_to_mdast_rs::dom::parse_html("<p>Hello\nworld</p>");
//! let conversion = to_mdast(&mut tree, &table, &Context::new())?;
//! ```

pub mod context;
pub mod converter;
#[cfg(feature = "html")]
pub mod dom;
pub mod error;
pub mod handlers;
pub mod hast;
pub mod mdast;
pub mod minify;
pub mod options;
pub mod pipeline;
pub mod selector;
pub mod text;

pub use context::{Context, ONE_LINE};
#[cfg(feature = "html")]
pub use converter::convert_html;
pub use converter::{Children, Conversion, HandlerTable, Transformed, Transformer, to_mdast, to_mdast_with_options};
pub use error::{ConversionError, Result};
pub use handlers::default_handlers;
pub use mdast::Handled;
pub use minify::{MinifyOptions, minify};
pub use options::{ConversionOptions, WhitespaceMode};
pub use pipeline::{Bridge, Destination, Mutate, NoDestination, Transform, configure, configure_mutate};
pub use selector::{KeyRule, Matcher, Pattern, is_exhaustive, matches, selector};
pub use text::wrap_text;
