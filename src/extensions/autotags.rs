//! Autotags
//!
//!     Shorthand tag names of the form `name:variant` expand to a real tag plus attributes:
//!
//!         a:void          a(href="javascript:;")
//!         form:post       form(method="POST")
//!         link:css        link(rel="stylesheet" type="text/css")
//!         script:js       script(type="text/javascript")
//!         input:<type>    input(type="<type>")
//!
//!     The implied attributes are applied after the ones written in the template, so they win.

use super::visitor::{VisitError, Visitor};
use crate::ast::{AttrValue, NodeMut, Tag};
use tracing::trace;

const AUTOTAGS: &[(&str, &str, &[(&str, &str)])] = &[
    ("a:void", "a", &[("href", "javascript:;")]),
    ("form:post", "form", &[("method", "POST")]),
    (
        "link:css",
        "link",
        &[("rel", "stylesheet"), ("type", "text/css")],
    ),
    ("script:js", "script", &[("type", "text/javascript")]),
];

const INPUT_TYPES: &[&str] = &[
    "button",
    "checkbox",
    "file",
    "hidden",
    "image",
    "password",
    "radio",
    "reset",
    "submit",
    "text",
    "search",
    "tel",
    "url",
    "email",
    "datetime",
    "date",
    "month",
    "week",
    "time",
    "number",
    "range",
    "color",
    "datetime-local",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct AutotagsVisitor;

impl AutotagsVisitor {
    /// Rewrites the tag if its name is a known shorthand. Returns whether it was rewritten.
    pub fn expand(&self, tag: &mut Tag) -> bool {
        if let Some((_, name, attributes)) = AUTOTAGS.iter().find(|(alias, ..)| *alias == tag.name)
        {
            for (key, value) in *attributes {
                tag.set_attribute(*key, AttrValue::from(*value));
            }
            trace!(from = %tag.name, to = name, "autotag expanded");
            tag.name = name.to_string();
            return true;
        }

        let input_type = tag
            .name
            .strip_prefix("input:")
            .filter(|variant| INPUT_TYPES.contains(variant))
            .map(str::to_string);
        match input_type {
            Some(input_type) => {
                trace!(from = %tag.name, "autotag expanded");
                tag.set_attribute("type", AttrValue::Text(input_type));
                tag.name = "input".to_string();
                true
            }
            None => false,
        }
    }
}

impl Visitor for AutotagsVisitor {
    fn visit(&self, node: NodeMut<'_>) -> Result<(), VisitError> {
        match node {
            NodeMut::Tag(tag) => {
                self.expand(tag);
                Ok(())
            }
            other => Err(VisitError::UnsupportedNode {
                visitor: "autotags",
                found: other.kind(),
            }),
        }
    }
}
