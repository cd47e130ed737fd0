//! Node variants of the document tree

use super::attributes::{AttrValue, Attributes};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A node of the document tree. Every variant records the source line it was created on.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Block(Block),
    Tag(Tag),
    Text(Text),
    Code(Code),
    Comment(Comment),
    Doctype(Doctype),
    Filter(Filter),
}

/// Ordered sequence of sibling nodes. Insertion order is render order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Block {
    pub line: usize,
    pub children: Vec<Node>,
}

impl Block {
    pub fn new(line: usize) -> Self {
        Self {
            line,
            children: Vec::new(),
        }
    }

    pub fn push(&mut self, node: Node) {
        self.children.push(node);
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tag {
    pub line: usize,
    pub name: String,
    pub attributes: Attributes,
    pub text: Option<Text>,
    pub code: Option<Code>,
    pub children: Block,
}

impl Tag {
    /// Creates a tag whose attribute map is seeded with `id = false`, which keeps `id` in
    /// first position no matter where it is written.
    pub fn new(name: impl Into<String>, line: usize) -> Self {
        let mut attributes = Attributes::new();
        attributes.insert("id".to_string(), AttrValue::Bool(false));
        Self {
            line,
            name: name.into(),
            attributes,
            text: None,
            code: None,
            children: Block::new(line),
        }
    }

    /// Merges one attribute into the map.
    ///
    /// `class` accumulates string values in encounter order; every other key is overwritten
    /// in place.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: AttrValue) {
        let key = key.into();
        if key != "class" {
            self.attributes.insert(key, value);
            return;
        }

        let values = match value {
            AttrValue::Text(value) => vec![value],
            AttrValue::List(values) => values,
            AttrValue::Bool(_) => return,
        };
        match self.attributes.get_mut("class") {
            Some(AttrValue::List(existing)) => existing.extend(values),
            _ => {
                self.attributes.insert(key, AttrValue::List(values));
            }
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&AttrValue> {
        self.attributes.get(key)
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Text {
    pub line: usize,
    pub lines: Vec<String>,
}

impl Text {
    pub fn new(line: usize) -> Self {
        Self {
            line,
            lines: Vec::new(),
        }
    }

    /// Builds a text node from a value that may span several lines. An empty value yields
    /// no lines at all.
    pub fn from_value(value: &str, line: usize) -> Self {
        let lines = if value.is_empty() {
            Vec::new()
        } else {
            value.split('\n').map(str::to_string).collect()
        };
        Self { line, lines }
    }

    pub fn add_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Code {
    pub line: usize,
    pub expression: String,
    pub buffered: bool,
    /// The block holds raw code lines rather than nested template structure.
    pub verbatim: bool,
    pub block: Option<Block>,
}

impl Code {
    pub fn new(expression: impl Into<String>, buffered: bool, line: usize) -> Self {
        Self {
            line,
            expression: expression.into(),
            buffered,
            verbatim: false,
            block: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comment {
    pub line: usize,
    pub body: String,
    pub buffered: bool,
    pub block: Option<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Doctype {
    pub line: usize,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Filter {
    pub line: usize,
    pub name: String,
    pub attributes: Attributes,
    pub block: Box<Node>,
}

/// Identifier used to register visitors for one kind of node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Code,
    Comment,
    Doctype,
    Filter,
    Tag,
    Text,
}

impl NodeKind {
    pub const ALL: [NodeKind; 6] = [
        NodeKind::Code,
        NodeKind::Comment,
        NodeKind::Doctype,
        NodeKind::Filter,
        NodeKind::Tag,
        NodeKind::Text,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Code => "code",
            NodeKind::Comment => "comment",
            NodeKind::Doctype => "doctype",
            NodeKind::Filter => "filter",
            NodeKind::Tag => "tag",
            NodeKind::Text => "text",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Mutable view of a visitable node, handed to visitors right before rendering.
///
/// Inline code and text attached to a tag are visited through this view too, even though
/// they are not wrapped in a [Node].
#[derive(Debug)]
pub enum NodeMut<'a> {
    Code(&'a mut Code),
    Comment(&'a mut Comment),
    Doctype(&'a mut Doctype),
    Filter(&'a mut Filter),
    Tag(&'a mut Tag),
    Text(&'a mut Text),
}

impl NodeMut<'_> {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeMut::Code(_) => NodeKind::Code,
            NodeMut::Comment(_) => NodeKind::Comment,
            NodeMut::Doctype(_) => NodeKind::Doctype,
            NodeMut::Filter(_) => NodeKind::Filter,
            NodeMut::Tag(_) => NodeKind::Tag,
            NodeMut::Text(_) => NodeKind::Text,
        }
    }

    /// Shorter-lived copy of this view, so one node can be handed to several visitors.
    pub fn reborrow(&mut self) -> NodeMut<'_> {
        match self {
            NodeMut::Code(node) => NodeMut::Code(&mut **node),
            NodeMut::Comment(node) => NodeMut::Comment(&mut **node),
            NodeMut::Doctype(node) => NodeMut::Doctype(&mut **node),
            NodeMut::Filter(node) => NodeMut::Filter(&mut **node),
            NodeMut::Tag(node) => NodeMut::Tag(&mut **node),
            NodeMut::Text(node) => NodeMut::Text(&mut **node),
        }
    }
}
