//! Conversion engine: handler dispatch and the recursive tree walker.

pub mod main;
pub mod table;

pub use main::{Children, Conversion, Transformed, Transformer, to_mdast, to_mdast_with_options};
#[cfg(feature = "html")]
pub use main::convert_html;
pub use table::{HandlerFn, HandlerTable, Rule};
