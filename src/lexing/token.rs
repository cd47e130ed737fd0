//! Token types produced by the lexer
//!
//!     Tokens are a tagged union: payloads only exist on the kinds that carry them, so a
//!     `pipe` has no value and only `code`/`comment` carry a buffered flag. [TokenKind] is the
//!     payload-free discriminant the parser dispatches on.

use crate::ast::Attributes;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Token {
    Tag {
        name: String,
    },
    Id {
        name: String,
    },
    Class {
        name: String,
    },
    /// Parenthesized attribute list: the raw inner text and its decoded pairs.
    Attributes {
        raw: String,
        attributes: Attributes,
    },
    Text {
        value: String,
    },
    Code {
        code: String,
        buffered: bool,
    },
    Comment {
        body: String,
        buffered: bool,
    },
    Doctype {
        version: String,
    },
    Filter {
        name: String,
    },
    Pipe,
    Indent,
    Outdent,
    Newline,
    Eos,
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Tag { .. } => TokenKind::Tag,
            Token::Id { .. } => TokenKind::Id,
            Token::Class { .. } => TokenKind::Class,
            Token::Attributes { .. } => TokenKind::Attributes,
            Token::Text { .. } => TokenKind::Text,
            Token::Code { .. } => TokenKind::Code,
            Token::Comment { .. } => TokenKind::Comment,
            Token::Doctype { .. } => TokenKind::Doctype,
            Token::Filter { .. } => TokenKind::Filter,
            Token::Pipe => TokenKind::Pipe,
            Token::Indent => TokenKind::Indent,
            Token::Outdent => TokenKind::Outdent,
            Token::Newline => TokenKind::Newline,
            Token::Eos => TokenKind::Eos,
        }
    }

    /// Whether the lines nested under this token are captured as literal text instead of
    /// being lexed as template structure.
    ///
    /// Filters, pipes, non-buffered comments and non-buffered code ending in a line
    /// continuation backslash open such a region.
    pub fn is_verbatim_wrapper(&self) -> bool {
        match self {
            Token::Filter { .. } | Token::Pipe => true,
            Token::Comment { buffered, .. } => !buffered,
            Token::Code { code, buffered } => !buffered && code.ends_with('\\'),
            _ => false,
        }
    }
}

/// A token together with the source line it was produced on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LexedToken {
    #[serde(flatten)]
    pub token: Token,
    pub line: usize,
}

impl LexedToken {
    pub fn new(token: Token, line: usize) -> Self {
        Self { token, line }
    }

    pub fn kind(&self) -> TokenKind {
        self.token.kind()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Tag,
    Id,
    Class,
    Attributes,
    Text,
    Code,
    Comment,
    Doctype,
    Filter,
    Pipe,
    Indent,
    Outdent,
    Newline,
    Eos,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Tag => "tag",
            TokenKind::Id => "id",
            TokenKind::Class => "class",
            TokenKind::Attributes => "attributes",
            TokenKind::Text => "text",
            TokenKind::Code => "code",
            TokenKind::Comment => "comment",
            TokenKind::Doctype => "doctype",
            TokenKind::Filter => "filter",
            TokenKind::Pipe => "pipe",
            TokenKind::Indent => "indent",
            TokenKind::Outdent => "outdent",
            TokenKind::Newline => "newline",
            TokenKind::Eos => "eos",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
