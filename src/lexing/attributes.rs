//! Attribute list decoding
//!
//!     An attribute list is the text between the parentheses that follow a tag, id or class:
//!
//!         a(href="/x" title='A, B' data-id=#{$id} disabled)
//!
//!     Quoted strings and `#{...}` interpolations may contain separators, so they are swapped
//!     for placeholders before the list is split into pairs and restored afterwards:
//!
//!         #{...}   -> {n}
//!         "..."    -> {<n>}
//!         '...'    -> {<<n>>}
//!
//!     Values are classified on their raw text: `true` is the boolean true, an empty value,
//!     `null` and `false` are the boolean false. A key without a separator is a boolean true.

use crate::ast::{AttrValue, Attributes};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static INTERPOLATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"#\{[^}]*\}").unwrap());
static DOUBLE_QUOTED: Lazy<Regex> = Lazy::new(|| Regex::new(r#""([^"]*)""#).unwrap());
static SINGLE_QUOTED: Lazy<Regex> = Lazy::new(|| Regex::new(r"'([^']*)'").unwrap());

static INTERPOLATION_HOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{(\d+)\}").unwrap());
static DOUBLE_HOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{<(\d+)>\}").unwrap());
static SINGLE_HOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{<<(\d+)>>\}").unwrap());
static WHOLE_DOUBLE_HOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\{<(\d+)>\}$").unwrap());
static WHOLE_SINGLE_HOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\{<<(\d+)>>\}$").unwrap());

static SEPARATOR_SPACING: Lazy<Regex> = Lazy::new(|| Regex::new(r" *([=:]) *").unwrap());
static PAIR_DELIMITER: Lazy<Regex> = Lazy::new(|| Regex::new(r" *(?:,| ) *").unwrap());

/// Byte offset of the parenthesis closing the one `text` starts with.
///
/// Parentheses inside single- or double-quoted runs are not counted. Only the first line is
/// searched; `None` means the list is unbalanced there.
pub fn closing_paren(text: &str) -> Option<usize> {
    let line = text.split('\n').next().unwrap_or_default();
    let mut depth = 0usize;
    let mut in_double = false;
    let mut in_single = false;

    for (index, c) in line.char_indices() {
        match c {
            '"' if !in_single => in_double = !in_double,
            '\'' if !in_double => in_single = !in_single,
            '(' if !in_double && !in_single => depth += 1,
            ')' if !in_double && !in_single => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(index);
                }
            }
            _ => {}
        }
    }
    None
}

/// Decodes the inner text of an attribute list into an ordered map.
pub fn parse_attribute_list(raw: &str) -> Attributes {
    let (substituted, placeholders) = Placeholders::default().substitute(raw);
    let normalized = SEPARATOR_SPACING.replace_all(substituted.trim(), "$1");

    let mut attributes = Attributes::new();
    for pair in PAIR_DELIMITER.split(&normalized) {
        if pair.is_empty() {
            continue;
        }
        let (key, value) = match separator_index(pair) {
            Some(at) => (
                placeholders.restore(&pair[..at]),
                placeholders.value(&pair[at + 1..]),
            ),
            None => (placeholders.restore(pair), AttrValue::Bool(true)),
        };
        let key = strip_quote_edges(key.trim_matches(' '));
        if !key.is_empty() {
            attributes.insert(key.to_string(), value);
        }
    }
    attributes
}

/// Position of the key/value separator: the first `=`, or failing that the first `:`.
/// A quote inside the key (past its first character) disqualifies the pair.
fn separator_index(pair: &str) -> Option<usize> {
    let at = pair.find('=').or_else(|| pair.find(':'))?;
    let quoted_key = pair[..at]
        .char_indices()
        .any(|(index, c)| index > 0 && matches!(c, '"' | '\''));
    (!quoted_key).then_some(at)
}

fn strip_quote_edges(text: &str) -> &str {
    let text = text.strip_prefix(['"', '\'']).unwrap_or(text);
    text.strip_suffix(['"', '\'']).unwrap_or(text)
}

#[derive(Debug, Default)]
struct Placeholders {
    interpolations: Vec<String>,
    doubles: Vec<String>,
    singles: Vec<String>,
}

impl Placeholders {
    fn substitute(mut self, raw: &str) -> (String, Self) {
        let text = INTERPOLATION
            .replace_all(raw, |caps: &Captures| {
                self.interpolations.push(caps[0].to_string());
                format!("{{{}}}", self.interpolations.len() - 1)
            })
            .into_owned();
        let text = DOUBLE_QUOTED
            .replace_all(&text, |caps: &Captures| {
                self.doubles.push(caps[1].to_string());
                format!("{{<{}>}}", self.doubles.len() - 1)
            })
            .into_owned();
        let text = SINGLE_QUOTED
            .replace_all(&text, |caps: &Captures| {
                self.singles.push(caps[1].to_string());
                format!("{{<<{}>>}}", self.singles.len() - 1)
            })
            .into_owned();
        (text, self)
    }

    /// Classifies a raw value and restores its placeholders.
    fn value(&self, raw: &str) -> AttrValue {
        let raw = raw.trim_matches(' ');
        match raw {
            "true" => AttrValue::Bool(true),
            "" | "null" | "false" => AttrValue::Bool(false),
            _ => {
                let restored = self.restore(strip_quote_edges(raw));
                if restored.is_empty() {
                    AttrValue::Bool(false)
                } else {
                    AttrValue::Text(restored)
                }
            }
        }
    }

    /// Puts the original text back. A placeholder spanning the whole input is unquoted,
    /// embedded ones keep their quotes.
    fn restore(&self, text: &str) -> String {
        let text = text.trim_matches(' ');
        let unquoted = if let Some(caps) = WHOLE_SINGLE_HOLDER.captures(text) {
            lookup(&self.singles, &caps[1]).unwrap_or(text).to_string()
        } else if let Some(caps) = WHOLE_DOUBLE_HOLDER.captures(text) {
            lookup(&self.doubles, &caps[1]).unwrap_or(text).to_string()
        } else {
            text.to_string()
        };

        let text = SINGLE_HOLDER.replace_all(&unquoted, |caps: &Captures| {
            match lookup(&self.singles, &caps[1]) {
                Some(value) => format!("'{value}'"),
                None => caps[0].to_string(),
            }
        });
        let text = DOUBLE_HOLDER.replace_all(&text, |caps: &Captures| {
            match lookup(&self.doubles, &caps[1]) {
                Some(value) => format!("\"{value}\""),
                None => caps[0].to_string(),
            }
        });
        INTERPOLATION_HOLDER
            .replace_all(&text, |caps: &Captures| {
                lookup(&self.interpolations, &caps[1])
                    .unwrap_or(&caps[0])
                    .to_string()
            })
            .into_owned()
    }
}

fn lookup<'a>(values: &'a [String], index: &str) -> Option<&'a str> {
    index
        .parse::<usize>()
        .ok()
        .and_then(|index| values.get(index))
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> AttrValue {
        AttrValue::Text(value.to_string())
    }

    #[test]
    fn quoted_values_keep_their_separators() {
        let attributes = parse_attribute_list(r#"type="text" title='Some, title' value="a b""#);

        assert_eq!(attributes.get("type"), Some(&text("text")));
        assert_eq!(attributes.get("title"), Some(&text("Some, title")));
        assert_eq!(attributes.get("value"), Some(&text("a b")));
    }

    #[test]
    fn keeps_encounter_order() {
        let attributes = parse_attribute_list("b=1, a=2 c=3");
        let keys: Vec<&str> = attributes.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn spaces_around_separators_are_ignored() {
        let attributes = parse_attribute_list(r#"href = "/x" , target : _blank"#);
        assert_eq!(attributes.get("href"), Some(&text("/x")));
        assert_eq!(attributes.get("target"), Some(&text("_blank")));
    }

    #[test]
    fn boolean_values() {
        let attributes =
            parse_attribute_list("checked disabled=true hidden=false data=null empty=''");

        assert_eq!(attributes.get("checked"), Some(&AttrValue::Bool(true)));
        assert_eq!(attributes.get("disabled"), Some(&AttrValue::Bool(true)));
        assert_eq!(attributes.get("hidden"), Some(&AttrValue::Bool(false)));
        assert_eq!(attributes.get("data"), Some(&AttrValue::Bool(false)));
        assert_eq!(attributes.get("empty"), Some(&AttrValue::Bool(false)));
    }

    #[test]
    fn interpolations_survive_intact() {
        let attributes = parse_attribute_list(r#"href=#{$url}, title="Hi #{$name, 'x'}""#);

        assert_eq!(attributes.get("href"), Some(&text("#{$url}")));
        assert_eq!(attributes.get("title"), Some(&text("Hi #{$name, 'x'}")));
    }

    #[test]
    fn embedded_quotes_are_restored_with_their_quotes() {
        let attributes = parse_attribute_list(r#"onclick=alert("hi")"#);
        assert_eq!(attributes.get("onclick"), Some(&text(r#"alert("hi")"#)));
    }

    #[test]
    fn nested_quotes_keep_inner_quotes() {
        let attributes = parse_attribute_list(r#"title='say "hi"'"#);
        assert_eq!(attributes.get("title"), Some(&text(r#"say "hi""#)));
    }

    #[test]
    fn colon_is_a_fallback_separator() {
        let attributes = parse_attribute_list("href:/x data-a=b:c");
        assert_eq!(attributes.get("href"), Some(&text("/x")));
        assert_eq!(attributes.get("data-a"), Some(&text("b:c")));
    }

    #[test]
    fn stray_quotes_are_stripped() {
        let attributes = parse_attribute_list("title='abc");
        assert_eq!(attributes.get("title"), Some(&text("abc")));
    }

    #[test]
    fn closing_paren_skips_quoted_parentheses() {
        assert_eq!(closing_paren("(a=')')"), Some(6));
        assert_eq!(closing_paren("(a=(b)) rest"), Some(6));
        assert_eq!(closing_paren(r#"(a="(" b)"#), Some(8));
        assert_eq!(closing_paren("(a=b"), None);
        assert_eq!(closing_paren("(a=b\n)"), None);
    }
}
