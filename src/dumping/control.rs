//! Control-structure classification
//!
//!     Code lines written in alternate syntax (`if ($a):`, `foreach ($xs as $x):`) are closed
//!     with their own keyword instead of a brace. The shapes are matched top to bottom
//!     against [CONTROL_PATTERNS]; the first match decides.

use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlStructure {
    If,
    Else,
    ElseIf,
    While,
    For,
    Foreach,
    Switch,
    Case,
}

pub const CONTROL_PATTERNS: &[(&str, ControlStructure)] = &[
    (r"^ *if[ (]+.*: *$", ControlStructure::If),
    (r"^ *else *: *$", ControlStructure::Else),
    (r"^ *else *if[ (]+.*: *$", ControlStructure::ElseIf),
    (r"^ *while *.*: *$", ControlStructure::While),
    (r"^ *for[ (]+.*: *$", ControlStructure::For),
    (r"^ *foreach[ (]+.*: *$", ControlStructure::Foreach),
    (r"^ *switch[ (]+.*: *$", ControlStructure::Switch),
    (r"^ *case *.* *: *$", ControlStructure::Case),
];

static COMPILED: Lazy<Vec<(Regex, ControlStructure)>> = Lazy::new(|| {
    CONTROL_PATTERNS
        .iter()
        .map(|(pattern, structure)| (Regex::new(pattern).unwrap(), *structure))
        .collect()
});

impl ControlStructure {
    pub fn classify(code: &str) -> Option<Self> {
        COMPILED
            .iter()
            .find(|(pattern, _)| pattern.is_match(code))
            .map(|(_, structure)| *structure)
    }

    /// Statement that closes the structure.
    pub fn closing_keyword(&self) -> &'static str {
        match self {
            ControlStructure::If | ControlStructure::Else | ControlStructure::ElseIf => "endif",
            ControlStructure::While => "endwhile",
            ControlStructure::For => "endfor",
            ControlStructure::Foreach => "endforeach",
            ControlStructure::Switch => "endswitch",
            ControlStructure::Case => "break",
        }
    }

    /// Whether this branch continues a preceding `if` chain.
    pub fn continues_conditional(&self) -> bool {
        matches!(self, ControlStructure::Else | ControlStructure::ElseIf)
    }
}
