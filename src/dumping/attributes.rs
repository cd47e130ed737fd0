//! Attribute serialization and HTML escaping

use super::interpolation::{has_placeholder, replace_holders};
use crate::ast::{AttrValue, Attributes};

/// Escapes `&`, `<`, `>` and `"` for use inside markup and double-quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Reverses [escape_html], also decoding numeric single-quote entities.
pub fn decode_html(text: &str) -> String {
    const ENTITIES: &[(&str, char)] = &[
        ("&amp;", '&'),
        ("&lt;", '<'),
        ("&gt;", '>'),
        ("&quot;", '"'),
        ("&#039;", '\''),
        ("&#39;", '\''),
    ];

    let mut decoded = String::with_capacity(text.len());
    let mut rest = text;
    'scan: while let Some(at) = rest.find('&') {
        decoded.push_str(&rest[..at]);
        rest = &rest[at..];
        for (entity, c) in ENTITIES {
            if let Some(after) = rest.strip_prefix(entity) {
                decoded.push(*c);
                rest = after;
                continue 'scan;
            }
        }
        decoded.push('&');
        rest = &rest[1..];
    }
    decoded.push_str(rest);
    decoded
}

/// Serializes an attribute map into the text following a tag name, including the leading
/// space of each attribute. `false` values are omitted.
pub fn serialize_attributes(attributes: &Attributes) -> String {
    let mut html = String::new();
    for (key, value) in attributes {
        match value {
            AttrValue::Bool(false) => {}
            AttrValue::Bool(true) => {
                html.push(' ');
                if has_placeholder(key) {
                    html.push_str(&replace_holders(key, false));
                } else {
                    html.push_str(&format!("{key}=\"{key}\""));
                }
            }
            AttrValue::Text(value) => {
                let value = replace_holders(&escape_html(value), true);
                html.push_str(&format!(" {key}=\"{value}\""));
            }
            AttrValue::List(values) => {
                let joined = values.join(" ");
                if has_placeholder(&joined) {
                    // single-quoted: interpolations may emit double quotes
                    let escaped = escape_html(&joined.replace('\'', "\""));
                    let value = replace_holders(&escaped, true);
                    html.push_str(&format!(" {key}='{value}'"));
                } else {
                    html.push_str(&format!(" {key}=\"{}\"", escape_html(&joined)));
                }
            }
        }
    }
    html
}
