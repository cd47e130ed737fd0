//! Dumper
//!
//! Renders the document tree to PHP-embedded markup.
//!
//! Structure:
//!     Rendering is a structural match over the node variants, one routine per kind. Every
//!     routine receives a [Context] carrying the nesting level, which sets the indentation of
//!     the output (`level * tab_width` spaces).
//!
//!     Before a node is rendered, the visitors registered for its kind run on it in
//!     registration order and may rewrite it. Filter nodes are rendered by the filter
//!     registered under their name.
//!
//! Control Structures
//!
//!     Code with a nested block is either a control structure in alternate syntax, closed by
//!     its own keyword, or any other statement, wrapped in braces:
//!
//!         - foreach ($items as $item):      <?php foreach ($items as $item): ?>
//!           p= $item                          <p><?= $item ?></p>
//!                                           <?php endforeach; ?>
//!
//!     An `if` or `else if` directly followed by an `else`/`else if` sibling leaves out its
//!     `endif`, so the whole chain is closed once by its last branch.
//!
//!     Code ending in a backslash holds raw PHP lines and is rendered as a `<?php ... ?>`
//!     region.

pub mod attributes;
pub mod control;
pub mod doctype;
pub mod interpolation;

pub use attributes::{decode_html, escape_html, serialize_attributes};
pub use control::ControlStructure;
pub use interpolation::replace_holders;

use crate::ast::{Block, Code, Comment, Doctype, Filter, Node, NodeKind, NodeMut, Tag, Text};
use crate::extensions::{filters::BUILTIN_FILTERS, TextFilter, VisitError, Visitor};
use crate::options::Options;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Tags rendered as `<name ... />` without body or closing tag.
pub const SELF_CLOSING_TAGS: &[&str] = &[
    "meta", "img", "link", "br", "hr", "input", "area", "base",
];

static CONDITIONAL_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[ *if").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DumpError {
    #[error("unknown doctype {0}")]
    UnknownDoctype(String),
    #[error("filter with alias \"{0}\" is not registered")]
    UnregisteredFilter(String),
    #[error(transparent)]
    Visitor(#[from] VisitError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("unsupported node type \"{0}\", use one of: code, comment, doctype, filter, tag, text")]
    UnknownNodeKind(String),
    #[error("filter with alias {0} is already registered")]
    DuplicateFilter(String),
}

/// Per-call rendering state, passed down by value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Context {
    pub level: usize,
    /// The next sibling continues the current `if` chain.
    pub else_follows: bool,
}

impl Context {
    fn nested(self) -> Self {
        Self {
            level: self.level + 1,
            else_follows: false,
        }
    }
}

pub struct Dumper {
    options: Options,
    visitors: HashMap<NodeKind, Vec<Box<dyn Visitor>>>,
    filters: IndexMap<String, Box<dyn TextFilter>>,
}

impl fmt::Debug for Dumper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let visitors: Vec<(NodeKind, usize)> = NodeKind::ALL
            .into_iter()
            .filter_map(|kind| self.visitors.get(&kind).map(|list| (kind, list.len())))
            .collect();
        f.debug_struct("Dumper")
            .field("options", &self.options)
            .field("visitors", &visitors)
            .field("filters", &self.filters.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Dumper {
    pub fn new(options: Options) -> Self {
        Self {
            options,
            visitors: HashMap::new(),
            filters: IndexMap::new(),
        }
    }

    pub fn options(&self) -> Options {
        self.options
    }

    /// Registers a visitor for the node kind named `kind` (`code`, `comment`, `doctype`,
    /// `filter`, `tag` or `text`).
    pub fn register_visitor(
        &mut self,
        kind: &str,
        visitor: impl Visitor + 'static,
    ) -> Result<(), RegistrationError> {
        let kind: NodeKind = kind.parse().map_err(RegistrationError::UnknownNodeKind)?;
        self.visitors
            .entry(kind)
            .or_default()
            .push(Box::new(visitor));
        Ok(())
    }

    pub fn register_filter(
        &mut self,
        alias: &str,
        filter: impl TextFilter + 'static,
    ) -> Result<(), RegistrationError> {
        if self.filters.contains_key(alias) {
            return Err(RegistrationError::DuplicateFilter(alias.to_string()));
        }
        self.filters.insert(alias.to_string(), Box::new(filter));
        Ok(())
    }

    /// Registers `style`, `php`, `javascript` and `cdata`.
    pub fn register_builtin_filters(&mut self) -> Result<(), RegistrationError> {
        for (alias, filter) in BUILTIN_FILTERS {
            self.register_filter(alias, *filter)?;
        }
        Ok(())
    }

    /// Renders a document. Visitors may rewrite the tree while it is rendered, so the tree
    /// is consumed.
    pub fn dump(&self, mut root: Block) -> Result<String, DumpError> {
        let html = self.dump_block(&mut root, Context::default())?;
        debug!(bytes = html.len(), "document dumped");
        Ok(html)
    }

    fn visit(&self, mut node: NodeMut<'_>) -> Result<(), DumpError> {
        if let Some(visitors) = self.visitors.get(&node.kind()) {
            for visitor in visitors {
                visitor.visit(node.reborrow())?;
            }
        }
        Ok(())
    }

    fn dump_node(&self, node: &mut Node, context: Context) -> Result<String, DumpError> {
        match node {
            Node::Block(block) => self.dump_block(block, context),
            Node::Tag(tag) => self.dump_tag(tag, context),
            Node::Text(text) => self.dump_text(text, context),
            Node::Code(code) => self.dump_code(code, context),
            Node::Comment(comment) => self.dump_comment(comment, context),
            Node::Doctype(doctype) => self.dump_doctype(doctype),
            Node::Filter(filter) => self.dump_filter(filter, context),
        }
    }

    /// Children in order, separated by newlines. Children that render to nothing leave no
    /// blank line behind.
    fn dump_block(&self, block: &mut Block, context: Context) -> Result<String, DumpError> {
        let mut rendered = Vec::with_capacity(block.children.len());
        for index in 0..block.children.len() {
            let else_follows = block
                .children
                .get(index + 1)
                .is_some_and(continues_conditional);
            let child = &mut block.children[index];
            let html = self.dump_node(
                child,
                Context {
                    level: context.level,
                    else_follows,
                },
            )?;
            if !html.is_empty() {
                rendered.push(html);
            }
        }
        Ok(rendered.join("\n"))
    }

    fn dump_doctype(&self, node: &mut Doctype) -> Result<String, DumpError> {
        self.visit(NodeMut::Doctype(&mut *node))?;
        doctype::declaration(&node.version)
            .map(str::to_string)
            .ok_or_else(|| DumpError::UnknownDoctype(node.version.trim().to_string()))
    }

    fn dump_tag(&self, tag: &mut Tag, context: Context) -> Result<String, DumpError> {
        self.visit(NodeMut::Tag(&mut *tag))?;

        let indent = self.options.indent(context.level);
        let attributes = serialize_attributes(&tag.attributes);
        if SELF_CLOSING_TAGS.contains(&tag.name.as_str()) {
            return Ok(format!("{indent}<{}{attributes} />", tag.name));
        }

        let mut html = format!("{indent}<{}{attributes}>", tag.name);
        let has_children = tag.has_children();
        let inner_indent = self.options.indent(context.level + 1);

        if let Some(code) = tag.code.as_mut() {
            if has_children {
                html.push('\n');
                html.push_str(&inner_indent);
            }
            html.push_str(&self.dump_code(code, Context::default())?);
        }
        if let Some(text) = tag.text.as_mut().filter(|text| !text.lines.is_empty()) {
            if has_children {
                html.push('\n');
                html.push_str(&inner_indent);
            }
            html.push_str(&self.dump_text(text, Context::default())?);
        }
        if has_children {
            html.push('\n');
            html.push_str(&self.dump_block(&mut tag.children, context.nested())?);
            html.push('\n');
            html.push_str(&indent);
        }

        html.push_str(&format!("</{}>", tag.name));
        Ok(html)
    }

    fn dump_text(&self, text: &mut Text, context: Context) -> Result<String, DumpError> {
        self.visit(NodeMut::Text(&mut *text))?;

        let indent = self.options.indent(context.level);
        let joined = text.lines.join(&format!("\n{indent}"));
        Ok(format!("{indent}{}", replace_holders(&joined, false)))
    }

    fn dump_comment(&self, comment: &mut Comment, context: Context) -> Result<String, DumpError> {
        self.visit(NodeMut::Comment(&mut *comment))?;

        if !comment.buffered {
            return Ok(String::new());
        }

        let indent = self.options.indent(context.level);
        let Some(block) = comment.block.as_mut() else {
            return Ok(format!("{indent}<!-- {} -->", comment.body));
        };

        let inner = self.dump_block(block, context.nested())?;
        if CONDITIONAL_COMMENT.is_match(&comment.body) {
            return Ok(format!(
                "{indent}<!--{}>\n{inner}\n{indent}<![endif]-->",
                comment.body
            ));
        }

        let mut html = format!("{indent}<!--\n");
        if !comment.body.is_empty() {
            html.push_str(&self.options.indent(context.level + 1));
            html.push_str(&comment.body);
            html.push('\n');
        }
        html.push_str(&inner);
        html.push('\n');
        html.push_str(&indent);
        html.push_str("-->");
        Ok(html)
    }

    fn dump_code(&self, code: &mut Code, context: Context) -> Result<String, DumpError> {
        self.visit(NodeMut::Code(&mut *code))?;

        let indent = self.options.indent(context.level);
        let expression = code.expression.trim_start_matches(' ');
        let open = if code.buffered { "<?=" } else { "<?php" };

        let Some(block) = code.block.as_mut() else {
            return Ok(format!("{indent}{open} {expression} ?>"));
        };

        let (begin, end) = if code.verbatim {
            let first_line = expression.strip_suffix('\\').unwrap_or(expression);
            (
                format!(
                    "<?php\n{}{}\n",
                    self.options.indent(context.level + 1),
                    first_line.trim_start_matches(' ')
                ),
                format!("\n{indent}?>"),
            )
        } else {
            match ControlStructure::classify(&code.expression) {
                Some(structure) => {
                    let keyword = structure.closing_keyword();
                    let end = if keyword == "endif" && context.else_follows {
                        String::new()
                    } else {
                        format!("\n{indent}<?php {keyword}; ?>")
                    };
                    (format!("<?php {} ?>\n", expression.trim_end_matches(' ')), end)
                }
                None => (
                    format!("{open} {expression} {{ ?>\n"),
                    format!("\n{indent}<?php }} ?>"),
                ),
            }
        };

        let inner = self.dump_block(block, context.nested())?;
        Ok(format!("{indent}{begin}{inner}{end}"))
    }

    fn dump_filter(&self, filter: &mut Filter, context: Context) -> Result<String, DumpError> {
        self.visit(NodeMut::Filter(&mut *filter))?;

        let Some(text_filter) = self.filters.get(&filter.name) else {
            return Err(DumpError::UnregisteredFilter(filter.name.clone()));
        };
        debug!(filter = %filter.name, line = filter.line, "applying filter");
        let text = self.dump_node(&mut filter.block, context.nested())?;
        Ok(text_filter.apply(
            &text,
            &filter.attributes,
            &self.options.indent(context.level),
        ))
    }
}

fn continues_conditional(node: &Node) -> bool {
    match node {
        Node::Code(code) => ControlStructure::classify(&code.expression)
            .is_some_and(|structure| structure.continues_conditional()),
        _ => false,
    }
}
