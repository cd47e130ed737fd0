//! Render options shared by the lexer and the dumper.

use serde::Deserialize;

/// Default number of spaces a tab expands to, and the width of one output indent level.
pub const DEFAULT_TAB_WIDTH: usize = 2;

/// Options applied identically by every pipeline stage.
///
/// The lexer uses `tab_width` to expand tabs and to compute verbatim padding,
/// the dumper uses it as the width of one indentation level in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Options {
    pub tab_width: usize,
}

impl Options {
    pub fn with_tab_width(tab_width: usize) -> Self {
        Self { tab_width }
    }

    /// Indentation string for the given nesting level.
    pub fn indent(&self, level: usize) -> String {
        " ".repeat(level * self.tab_width)
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            tab_width: DEFAULT_TAB_WIDTH,
        }
    }
}
