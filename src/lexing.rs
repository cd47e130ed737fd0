//! Lexer
//!
//! Turns template source into a stream of tokens consumed by the parser.
//!
//! Structure:
//!     The lexer walks the input once, front to back. At each position it runs an ordered table
//!     of scanners (see [scanners]) and the first one that matches produces the token. The
//!     order matters: the deferred queue and end of input are checked first, then the verbatim
//!     scanner, then the structural constructs, and plain text last.
//!
//! Indentation Handling
//!
//!     Leading spaces after a newline are compared against a stack of open widths (see
//!     [indentation]). A deeper line opens a level and yields `indent`, an equal line yields
//!     `newline` and a shallower line closes levels, yielding one `outdent` per closed level.
//!     Only the first `outdent` is returned right away; the others are queued as deferred
//!     tokens. A width that was never opened is malformed indentation.
//!
//!     Lines that are blank do not affect the stack.
//!
//! Verbatim Regions
//!
//!     Filters, pipes, non-buffered comments and non-buffered code ending in a backslash open a
//!     verbatim region. Until a line comes back to the indentation of the opening line, every
//!     line is returned as a text token instead of being tokenized, padded with the spaces it
//!     has beyond one level of nesting. A leading `|` on such a line is dropped.
//!
//! Lookahead
//!
//!     The parser reads through [TokenStream]: it can look ahead any number of tokens and push
//!     synthetic tokens back, which are returned before anything else is scanned.

pub mod attributes;
pub mod indentation;
pub mod scanners;
pub mod token;

pub use attributes::parse_attribute_list;
pub use indentation::IndentStack;
pub use token::{LexedToken, Token, TokenKind};

use crate::options::Options;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::VecDeque;
use thiserror::Error;
use tracing::{debug, trace};

static LINE_BREAKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n|\r").unwrap());

/// Characters stripped from both ends of the source before lexing.
const TRIMMED: &[char] = &[' ', '\t', '\n', '\r', '\0', '\x0B'];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("malformed indentation on line {line}")]
    MalformedIndentation { line: usize },
    #[error("unknown token on line {line}")]
    UnknownToken { line: usize },
}

impl LexError {
    pub fn line(&self) -> usize {
        match self {
            LexError::MalformedIndentation { line } | LexError::UnknownToken { line } => *line,
        }
    }
}

/// Token source with unbounded lookahead and push-back, as required by the parser.
pub trait TokenStream {
    /// Consumes and returns the next token.
    fn advance(&mut self) -> Result<LexedToken, LexError>;

    /// Returns the n-th upcoming token (1-based) without consuming it.
    fn predict(&mut self, n: usize) -> Result<&LexedToken, LexError>;

    /// Queues a token to be returned before any newly scanned one. Deferred tokens come back
    /// in the order they were deferred.
    fn defer(&mut self, token: LexedToken);

    /// Line number of the most recently scanned input.
    fn current_line(&self) -> usize;
}

/// State of an open verbatim region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Verbatim {
    /// Indentation of the line that opened the region.
    block_indent: usize,
    /// Padding applied to the current line.
    line_indent: usize,
    /// Still on the line that opened the region.
    same_line: bool,
}

impl Verbatim {
    fn opened_at(block_indent: usize) -> Self {
        Self {
            block_indent,
            line_indent: 0,
            same_line: true,
        }
    }
}

pub struct Lexer {
    options: Options,
    input: String,
    pos: usize,
    line: usize,
    indents: IndentStack,
    verbatim: Option<Verbatim>,
    last_kind: Option<TokenKind>,
    stash: VecDeque<LexedToken>,
    deferred: VecDeque<LexedToken>,
}

impl Lexer {
    /// Prepares a lexer for one source text.
    ///
    /// Line endings are normalized to `\n`, tabs are expanded to `tab_width` spaces and
    /// surrounding whitespace is trimmed.
    pub fn new(source: &str, options: Options) -> Self {
        let normalized = LINE_BREAKS.replace_all(source, "\n");
        let expanded = normalized.replace('\t', &" ".repeat(options.tab_width));
        let input = expanded.trim_matches(TRIMMED).to_string();
        debug!(
            bytes = input.len(),
            tab_width = options.tab_width,
            "lexer ready"
        );

        Self {
            options,
            input,
            pos: 0,
            line: 1,
            indents: IndentStack::new(),
            verbatim: None,
            last_kind: None,
            stash: VecDeque::new(),
            deferred: VecDeque::new(),
        }
    }

    pub fn options(&self) -> Options {
        self.options
    }

    /// Unconsumed input.
    fn rest(&self) -> &str {
        &self.input[self.pos..]
    }

    fn consume(&mut self, len: usize) {
        self.pos += len;
    }

    fn token(&self, token: Token) -> LexedToken {
        LexedToken::new(token, self.line)
    }

    /// Scans one token, bypassing the lookahead stash.
    fn next_token(&mut self) -> Result<LexedToken, LexError> {
        for (name, scan) in scanners::SCANNERS {
            if let Some(lexed) = scan(self)? {
                trace!(scanner = *name, kind = %lexed.kind(), line = lexed.line, "scanned");
                if lexed.token.is_verbatim_wrapper() {
                    self.verbatim = Some(Verbatim::opened_at(self.indents.current()));
                }
                self.last_kind = Some(lexed.kind());
                return Ok(lexed);
            }
        }
        Err(LexError::UnknownToken { line: self.line })
    }
}

impl TokenStream for Lexer {
    fn advance(&mut self) -> Result<LexedToken, LexError> {
        match self.stash.pop_front() {
            Some(lexed) => Ok(lexed),
            None => self.next_token(),
        }
    }

    fn predict(&mut self, n: usize) -> Result<&LexedToken, LexError> {
        let n = n.max(1);
        while self.stash.len() < n {
            let lexed = self.next_token()?;
            self.stash.push_back(lexed);
        }
        Ok(&self.stash[n - 1])
    }

    fn defer(&mut self, token: LexedToken) {
        self.deferred.push_back(token);
    }

    fn current_line(&self) -> usize {
        self.line
    }
}

/// Tokenizes a whole source text, up to and including the end-of-stream token.
pub fn tokenize(source: &str, options: Options) -> Result<Vec<LexedToken>, LexError> {
    let mut lexer = Lexer::new(source, options);
    let mut tokens = Vec::new();
    loop {
        let lexed = lexer.advance()?;
        let done = lexed.kind() == TokenKind::Eos;
        tokens.push(lexed);
        if done {
            return Ok(tokens);
        }
    }
}
