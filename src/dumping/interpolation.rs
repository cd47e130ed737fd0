//! Placeholder interpolation
//!
//!     `#{expr}` inside text and attribute values becomes an output directive `<?= expr ?>`.
//!     A backslash right before the `#` escapes it: the backslash is dropped and the sequence
//!     is kept as literal text.
//!
//!     The text is split into segments by a small logos lexer, so every occurrence is handled
//!     in one left-to-right pass.

use super::attributes::decode_html;
use logos::Logos;

#[derive(Logos, Debug, PartialEq, Clone, Copy)]
enum Segment {
    #[regex(r"\\#\{[^}]*\}")]
    Escaped,

    #[regex(r"#\{[^}]*\}")]
    Interpolation,

    #[regex(r"[^#\\]+")]
    Literal,

    #[token("#")]
    Hash,

    #[token("\\")]
    Backslash,
}

/// Whether the text contains an (unescaped or escaped) `#{...}` sequence.
pub fn has_placeholder(text: &str) -> bool {
    let mut segments = Segment::lexer(text);
    while let Some(segment) = segments.next() {
        if matches!(segment, Ok(Segment::Interpolation | Segment::Escaped)) {
            return true;
        }
    }
    false
}

/// Replaces every `#{expr}` with `<?= expr ?>`.
///
/// With `decode` set the expression is HTML-decoded first, for values that were escaped on
/// their way into an attribute.
pub fn replace_holders(text: &str, decode: bool) -> String {
    let mut output = String::with_capacity(text.len());
    let mut segments = Segment::lexer(text);

    while let Some(segment) = segments.next() {
        let slice = segments.slice();
        match segment {
            Ok(Segment::Interpolation) => {
                let expression = &slice[2..slice.len() - 1];
                output.push_str("<?= ");
                if decode {
                    output.push_str(&decode_html(expression));
                } else {
                    output.push_str(expression);
                }
                output.push_str(" ?>");
            }
            Ok(Segment::Escaped) => output.push_str(&slice[1..]),
            _ => output.push_str(slice),
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn replaces_every_occurrence() {
        assert_eq!(
            replace_holders("Hi #{$first} #{$last}!", false),
            "Hi <?= $first ?> <?= $last ?>!"
        );
    }

    #[test]
    fn escaped_sequence_stays_literal() {
        assert_eq!(replace_holders(r"cost \#{$x}", false), "cost #{$x}");
    }

    #[test]
    fn lone_markers_are_untouched() {
        assert_eq!(replace_holders(r"#1 \ # {x}", false), r"#1 \ # {x}");
        assert_eq!(replace_holders("#{unterminated", false), "#{unterminated");
    }

    #[test]
    fn decodes_expressions_when_asked() {
        assert_eq!(
            replace_holders("#{$a &amp;&amp; $b}", true),
            "<?= $a && $b ?>"
        );
        assert_eq!(
            replace_holders("#{$a &amp;&amp; $b}", false),
            "<?= $a &amp;&amp; $b ?>"
        );
    }

    #[test]
    fn detects_placeholders() {
        assert!(has_placeholder("a #{b}"));
        assert!(has_placeholder(r"a \#{b}"));
        assert!(!has_placeholder("a # {b}"));
    }

    proptest! {
        #[test]
        fn text_without_markers_is_unchanged(text in "[^#\\\\]*") {
            prop_assert_eq!(replace_holders(&text, false), text);
        }
    }
}
