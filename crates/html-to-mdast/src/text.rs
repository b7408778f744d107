//! Text wrapping applied to every text node the transformer emits.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::context::Context;

static LINE_ENDING: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n|\r|\n").expect("valid regex pattern"));

/// Signature of a text wrapping function.
pub type WrapFn = dyn Fn(&str, &Context) -> String + Send + Sync;

/// Default wrapping: with `oneLine` set, every line ending becomes a space.
pub fn wrap_text(value: &str, ctx: &Context) -> String {
    if ctx.one_line() {
        collapse_line_endings(value).into_owned()
    } else {
        value.to_string()
    }
}

/// Replace each line ending with a single space.
pub fn collapse_line_endings(value: &str) -> Cow<'_, str> {
    LINE_ENDING.replace_all(value, " ")
}
