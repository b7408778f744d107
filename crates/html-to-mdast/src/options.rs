//! Configuration options for hast to mdast conversion.

use serde::{Deserialize, Serialize};

use crate::context::Context;
use crate::minify::MinifyOptions;

/// How whitespace in the source tree is treated before transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WhitespaceMode {
    /// Minify; whitespace runs containing a line break become `\n`.
    #[default]
    Normalized,
    /// Minify; every whitespace run becomes a single space.
    Collapsed,
    /// Leave the source tree untouched.
    Strict,
}

impl WhitespaceMode {
    /// Minification options for this mode, `None` when minification is off.
    pub const fn minify_options(self) -> Option<MinifyOptions> {
        match self {
            Self::Normalized => Some(MinifyOptions { newlines: true }),
            Self::Collapsed => Some(MinifyOptions { newlines: false }),
            Self::Strict => None,
        }
    }
}

/// Main conversion options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConversionOptions {
    /// Initial context handed to the root node.
    pub settings: Context,
    /// Whitespace handling applied to the source tree.
    pub whitespace_mode: WhitespaceMode,
}

impl ConversionOptions {
    /// Options with the given initial settings and default whitespace handling.
    pub fn with_settings(settings: Context) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }
}
