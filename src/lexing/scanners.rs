//! Scanner table
//!
//!     Each scanner inspects the unconsumed input and either produces a token, consuming the
//!     text it matched, or declines by returning `None`. [SCANNERS] lists them in priority
//!     order; the lexer runs them top to bottom and keeps the first token produced.
//!
//!     Scanners that need a regex anchor it at the start of the input, so a match is always a
//!     prefix of the remaining text.

use super::attributes::{closing_paren, parse_attribute_list};
use super::token::{LexedToken, Token, TokenKind};
use super::{LexError, Lexer};
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;

pub(super) type Scanner = fn(&mut Lexer) -> Result<Option<LexedToken>, LexError>;

pub(super) const SCANNERS: &[(&str, Scanner)] = &[
    ("deferred", scan_deferred),
    ("eos", scan_eos),
    ("verbatim", scan_verbatim),
    ("doctype", scan_doctype),
    ("tag", scan_tag),
    ("pipe", scan_pipe),
    ("html", scan_html),
    ("filter", scan_filter),
    ("code", scan_code),
    ("comment", scan_comment),
    ("id", scan_id),
    ("class", scan_class),
    ("attributes", scan_attributes),
    ("indentation", scan_indentation),
    ("text", scan_text),
];

static DOCTYPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:doctype|!!!) *([\w .\-]+)?").unwrap());
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\w[:\-\w]*").unwrap());
static HTML: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<[\w/][^\n]*").unwrap());
static FILTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^:(\w+)").unwrap());
static CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(!?=|-)([^\n]+)").unwrap());
static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^ */(!)?([^\n]+)?").unwrap());
static ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#([\w\-]+)").unwrap());
static CLASS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\.([\w\-]+)").unwrap());
static ATTRIBUTES: Lazy<Regex> = Lazy::new(|| Regex::new(r"^ *\([^\n]+\)").unwrap());
static INDENTATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\n( *)").unwrap());
static TEXT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\n]+").unwrap());
static ESCAPED_PAREN: Lazy<Regex> = Lazy::new(|| Regex::new(r" *\\\(").unwrap());

/// Token kinds after which the rest of the line may be inline text.
const TEXT_HOSTS: &[TokenKind] = &[
    TokenKind::Tag,
    TokenKind::Filter,
    TokenKind::Pipe,
    TokenKind::Attributes,
    TokenKind::Class,
    TokenKind::Id,
];

fn scan_deferred(lexer: &mut Lexer) -> Result<Option<LexedToken>, LexError> {
    Ok(lexer.deferred.pop_front())
}

/// End of input. Open indentation levels are closed one per call before `eos` is returned.
fn scan_eos(lexer: &mut Lexer) -> Result<Option<LexedToken>, LexError> {
    if !lexer.rest().is_empty() {
        return Ok(None);
    }
    if lexer.indents.pop().is_some() {
        return Ok(Some(lexer.token(Token::Outdent)));
    }
    Ok(Some(lexer.token(Token::Eos)))
}

/// One line of a verbatim region, returned as text.
fn scan_verbatim(lexer: &mut Lexer) -> Result<Option<LexedToken>, LexError> {
    let Some(verbatim) = lexer.verbatim else {
        return Ok(None);
    };
    let rest = lexer.rest();
    // a filter's attribute list still belongs to the opening line
    if verbatim.same_line
        && lexer.last_kind == Some(TokenKind::Filter)
        && ATTRIBUTES.is_match(rest)
    {
        return Ok(None);
    }
    let len = rest.find('\n').unwrap_or(rest.len());
    if len == 0 {
        return Ok(None);
    }

    let raw = &rest[..len];
    let content = if verbatim.same_line {
        raw.strip_prefix(' ').unwrap_or(raw)
    } else {
        strip_pipe(raw)
    };
    let value = format!("{}{}", " ".repeat(verbatim.line_indent), content);
    lexer.consume(len);
    Ok(Some(lexer.token(Token::Text { value })))
}

fn strip_pipe(line: &str) -> &str {
    match line.strip_prefix('|') {
        Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
        None => line,
    }
}

fn scan_doctype(lexer: &mut Lexer) -> Result<Option<LexedToken>, LexError> {
    let Some(caps) = DOCTYPE.captures(lexer.rest()) else {
        return Ok(None);
    };
    let len = caps[0].len();
    let version = caps
        .get(1)
        .map_or("", |version| version.as_str())
        .trim()
        .to_string();
    lexer.consume(len);
    Ok(Some(lexer.token(Token::Doctype { version })))
}

fn scan_tag(lexer: &mut Lexer) -> Result<Option<LexedToken>, LexError> {
    let Some(found) = TAG.find(lexer.rest()) else {
        return Ok(None);
    };
    let name = found.as_str().to_string();
    lexer.consume(name.len());
    Ok(Some(lexer.token(Token::Tag { name })))
}

fn scan_pipe(lexer: &mut Lexer) -> Result<Option<LexedToken>, LexError> {
    if !lexer.rest().starts_with('|') {
        return Ok(None);
    }
    lexer.consume(1);
    Ok(Some(lexer.token(Token::Pipe)))
}

/// A line of literal markup, such as `<br>` or `</div>`.
fn scan_html(lexer: &mut Lexer) -> Result<Option<LexedToken>, LexError> {
    let Some(found) = HTML.find(lexer.rest()) else {
        return Ok(None);
    };
    let value = found.as_str().to_string();
    lexer.consume(value.len());
    Ok(Some(lexer.token(Token::Text { value })))
}

fn scan_filter(lexer: &mut Lexer) -> Result<Option<LexedToken>, LexError> {
    let Some(caps) = FILTER.captures(lexer.rest()) else {
        return Ok(None);
    };
    let len = caps[0].len();
    let name = caps[1].to_string();
    lexer.consume(len);
    Ok(Some(lexer.token(Token::Filter { name })))
}

/// `= expr` and `!= expr` are buffered, `- statement` is not.
fn scan_code(lexer: &mut Lexer) -> Result<Option<LexedToken>, LexError> {
    let Some(caps) = CODE.captures(lexer.rest()) else {
        return Ok(None);
    };
    let len = caps[0].len();
    let buffered = caps[1].contains('=');
    let code = caps[2].to_string();
    lexer.consume(len);
    Ok(Some(lexer.token(Token::Code { code, buffered })))
}

/// `/! text` is emitted, `/ text` is dropped from the output.
fn scan_comment(lexer: &mut Lexer) -> Result<Option<LexedToken>, LexError> {
    let Some(caps) = COMMENT.captures(lexer.rest()) else {
        return Ok(None);
    };
    let len = caps[0].len();
    let buffered = caps.get(1).is_some();
    let body = caps
        .get(2)
        .map_or(String::new(), |body| body.as_str().to_string());
    lexer.consume(len);
    Ok(Some(lexer.token(Token::Comment { body, buffered })))
}

fn scan_id(lexer: &mut Lexer) -> Result<Option<LexedToken>, LexError> {
    let Some(caps) = ID.captures(lexer.rest()) else {
        return Ok(None);
    };
    let len = caps[0].len();
    let name = caps[1].to_string();
    lexer.consume(len);
    Ok(Some(lexer.token(Token::Id { name })))
}

fn scan_class(lexer: &mut Lexer) -> Result<Option<LexedToken>, LexError> {
    let Some(caps) = CLASS.captures(lexer.rest()) else {
        return Ok(None);
    };
    let len = caps[0].len();
    let name = caps[1].to_string();
    lexer.consume(len);
    Ok(Some(lexer.token(Token::Class { name })))
}

/// A parenthesized attribute list. Declines when the parentheses do not balance on the line,
/// leaving the text to the inline text scanner.
fn scan_attributes(lexer: &mut Lexer) -> Result<Option<LexedToken>, LexError> {
    let rest = lexer.rest();
    if !ATTRIBUTES.is_match(rest) {
        return Ok(None);
    }
    let leading = rest.len() - rest.trim_start_matches(' ').len();
    let list = &rest[leading..];
    let Some(close) = closing_paren(list) else {
        return Ok(None);
    };

    let raw = list[1..close].trim().to_string();
    let attributes = parse_attribute_list(&raw);
    lexer.consume(leading + close + 1);
    Ok(Some(lexer.token(Token::Attributes { raw, attributes })))
}

/// Line break plus the leading spaces of the next line.
fn scan_indentation(lexer: &mut Lexer) -> Result<Option<LexedToken>, LexError> {
    let Some(caps) = INDENTATION.captures(lexer.rest()) else {
        return Ok(None);
    };
    let len = caps[0].len();
    let indents = caps[1].len();
    lexer.consume(len);
    lexer.line += 1;

    let blank = lexer.rest().starts_with('\n');
    let tab_width = lexer.options.tab_width;

    if let Some(verbatim) = lexer.verbatim.as_mut() {
        if blank {
            return Ok(Some(lexer.token(Token::Indent)));
        }
        if indents > verbatim.block_indent {
            verbatim.line_indent = indents.saturating_sub(verbatim.block_indent + tab_width);
            verbatim.same_line = false;
            return Ok(Some(lexer.token(Token::Indent)));
        }
        lexer.verbatim = None;
    }

    if blank {
        return Ok(Some(lexer.token(Token::Newline)));
    }

    let token = match indents.cmp(&lexer.indents.current()) {
        Ordering::Equal => Token::Newline,
        Ordering::Greater => {
            lexer.indents.push(indents);
            Token::Indent
        }
        Ordering::Less => {
            let closed = lexer
                .indents
                .dedent_to(indents)
                .ok_or(LexError::MalformedIndentation { line: lexer.line })?;
            for _ in 1..closed {
                let outdent = lexer.token(Token::Outdent);
                lexer.deferred.push_back(outdent);
            }
            Token::Outdent
        }
    };
    Ok(Some(lexer.token(token)))
}

/// Rest of the line after a tag, filter, pipe, attribute list, class or id.
fn scan_text(lexer: &mut Lexer) -> Result<Option<LexedToken>, LexError> {
    if !lexer
        .last_kind
        .is_some_and(|kind| TEXT_HOSTS.contains(&kind))
    {
        return Ok(None);
    }
    let Some(found) = TEXT.find(lexer.rest()) else {
        return Ok(None);
    };
    let len = found.len();
    let value = ESCAPED_PAREN.replace_all(found.as_str(), "(").into_owned();
    lexer.consume(len);
    Ok(Some(lexer.token(Token::Text { value })))
}
