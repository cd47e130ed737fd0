//! Content filters
//!
//!     A filter receives the rendered verbatim body of a `:name` block, the attributes written
//!     after the filter name and the indentation of the filter line, and returns the final
//!     markup for the block.

use crate::ast::Attributes;

pub trait TextFilter: Send + Sync {
    fn apply(&self, text: &str, attributes: &Attributes, indent: &str) -> String;
}

impl<F> TextFilter for F
where
    F: Fn(&str, &Attributes, &str) -> String + Send + Sync,
{
    fn apply(&self, text: &str, attributes: &Attributes, indent: &str) -> String {
        self(text, attributes, indent)
    }
}

/// Filter that wraps the body between an opening and a closing line at the filter's
/// indentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrappingFilter {
    pub open: &'static str,
    pub close: &'static str,
}

impl WrappingFilter {
    pub const fn new(open: &'static str, close: &'static str) -> Self {
        Self { open, close }
    }
}

impl TextFilter for WrappingFilter {
    fn apply(&self, text: &str, _attributes: &Attributes, indent: &str) -> String {
        format!("{indent}{}\n{text}\n{indent}{}", self.open, self.close)
    }
}
