//! Parser
//!
//! Recursive-descent construction of the document tree from a [TokenStream].
//!
//! Structure:
//!     The parser owns no lexing logic. Every decision is taken on the kind of the next
//!     predicted token, and each construct has one routine:
//!
//!         document    := (newline | expression)* eos
//!         expression  := tag | doctype | filter | pipe | comment | text | code
//!         tag         := TAG (ID | CLASS | ATTRIBUTES)* (TEXT | CODE)? NEWLINE* TEXT? block?
//!         block       := INDENT (newline | expression)* (OUTDENT | EOS)
//!         text-block  := (TEXT | INDENT) (TEXT | INDENT)*
//!
//!     A bare `#id` or `.class` implies a `div`: the parser pushes a synthetic `div` tag token
//!     and the shorthand token back onto the stream and parses again.

use crate::ast::{AttrValue, Block, Code, Comment, Doctype, Filter, Node, Tag, Text};
use crate::lexing::{LexError, LexedToken, Lexer, Token, TokenKind, TokenStream};
use crate::options::Options;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error("expected {expected}, but got {found} on line {line}")]
    UnexpectedToken {
        expected: TokenKind,
        found: TokenKind,
        line: usize,
    },
    #[error("unexpected {found} token on line {line}")]
    UnknownToken { found: TokenKind, line: usize },
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            ParseError::Lex(error) => error.line(),
            ParseError::UnexpectedToken { line, .. } | ParseError::UnknownToken { line, .. } => {
                *line
            }
        }
    }
}

pub struct Parser<S = Lexer> {
    stream: S,
}

impl Parser<Lexer> {
    pub fn from_source(source: &str, options: Options) -> Self {
        Self::new(Lexer::new(source, options))
    }
}

impl<S: TokenStream> Parser<S> {
    pub fn new(stream: S) -> Self {
        Self { stream }
    }

    /// Parses the whole stream into the root block.
    pub fn parse(mut self) -> Result<Block, ParseError> {
        let mut root = Block::new(self.stream.current_line());
        while self.peek()? != TokenKind::Eos {
            if self.peek()? == TokenKind::Newline {
                self.stream.advance()?;
                continue;
            }
            if let Some(node) = self.parse_expression()? {
                root.push(node);
            }
        }
        debug!(nodes = root.children.len(), "document parsed");
        Ok(root)
    }

    fn peek(&mut self) -> Result<TokenKind, ParseError> {
        Ok(self.stream.predict(1)?.kind())
    }

    fn line(&self) -> usize {
        self.stream.current_line()
    }

    fn unexpected(&self, expected: TokenKind, found: &LexedToken) -> ParseError {
        ParseError::UnexpectedToken {
            expected,
            found: found.kind(),
            line: found.line,
        }
    }

    fn expect(&mut self, expected: TokenKind) -> Result<LexedToken, ParseError> {
        let lexed = self.stream.advance()?;
        if lexed.kind() != expected {
            return Err(self.unexpected(expected, &lexed));
        }
        Ok(lexed)
    }

    fn skip_newlines(&mut self) -> Result<(), ParseError> {
        while self.peek()? == TokenKind::Newline {
            self.stream.advance()?;
        }
        Ok(())
    }

    fn parse_expression(&mut self) -> Result<Option<Node>, ParseError> {
        let node = match self.peek()? {
            TokenKind::Tag => Node::Tag(self.parse_tag()?),
            TokenKind::Doctype => Node::Doctype(self.parse_doctype()?),
            TokenKind::Filter => Node::Filter(self.parse_filter()?),
            TokenKind::Pipe => Node::Text(self.parse_pipe()?),
            TokenKind::Comment => Node::Comment(self.parse_comment()?),
            TokenKind::Text => Node::Text(self.parse_text(false)?),
            TokenKind::Code => Node::Code(self.parse_code()?),
            TokenKind::Id | TokenKind::Class => {
                let shorthand = self.stream.advance()?;
                let div = LexedToken::new(
                    Token::Tag {
                        name: "div".to_string(),
                    },
                    shorthand.line,
                );
                self.stream.defer(div);
                self.stream.defer(shorthand);
                return self.parse_expression();
            }
            TokenKind::Outdent | TokenKind::Indent | TokenKind::Eos => {
                self.stream.advance()?;
                return Ok(None);
            }
            found @ (TokenKind::Attributes | TokenKind::Newline) => {
                return Err(ParseError::UnknownToken {
                    found,
                    line: self.line(),
                });
            }
        };
        Ok(Some(node))
    }

    fn parse_tag(&mut self) -> Result<Tag, ParseError> {
        let lexed = self.stream.advance()?;
        let Token::Tag { name } = lexed.token else {
            return Err(self.unexpected(TokenKind::Tag, &lexed));
        };
        let mut tag = Tag::new(name, lexed.line);

        loop {
            match self.peek()? {
                TokenKind::Id | TokenKind::Class | TokenKind::Attributes => {}
                _ => break,
            }
            match self.stream.advance()?.token {
                Token::Id { name } => tag.set_attribute("id", AttrValue::Text(name)),
                Token::Class { name } => tag.set_attribute("class", AttrValue::Text(name)),
                Token::Attributes { attributes, .. } => {
                    for (key, value) in attributes {
                        tag.set_attribute(key, value);
                    }
                }
                _ => {}
            }
        }

        match self.peek()? {
            TokenKind::Text => tag.text = Some(self.parse_text(true)?),
            TokenKind::Code => tag.code = Some(self.parse_code()?),
            _ => {}
        }

        self.skip_newlines()?;

        if self.peek()? == TokenKind::Text {
            let line = self.line();
            tag.text.get_or_insert_with(|| Text::new(line)).add_line("");
        }

        if self.peek()? == TokenKind::Indent {
            tag.children = self.parse_block()?;
        }

        Ok(tag)
    }

    fn parse_text(&mut self, trim: bool) -> Result<Text, ParseError> {
        let lexed = self.stream.advance()?;
        let Token::Text { value } = lexed.token else {
            return Err(self.unexpected(TokenKind::Text, &lexed));
        };
        let value = if trim {
            value.trim_start_matches(' ')
        } else {
            value.as_str()
        };
        Ok(Text::from_value(value, lexed.line))
    }

    fn parse_code(&mut self) -> Result<Code, ParseError> {
        let lexed = self.stream.advance()?;
        let wrapper = lexed.token.is_verbatim_wrapper();
        let Token::Code { code, buffered } = lexed.token else {
            return Err(self.unexpected(TokenKind::Code, &lexed));
        };
        let mut node = Code::new(code, buffered, lexed.line);

        self.skip_newlines()?;

        if wrapper {
            let mut block = Block::new(lexed.line);
            block.push(Node::Text(self.parse_text_block()?));
            node.block = Some(block);
            node.verbatim = true;
        } else if self.peek()? == TokenKind::Indent {
            node.block = Some(self.parse_block()?);
        }

        Ok(node)
    }

    fn parse_comment(&mut self) -> Result<Comment, ParseError> {
        let lexed = self.stream.advance()?;
        let Token::Comment { body, buffered } = lexed.token else {
            return Err(self.unexpected(TokenKind::Comment, &lexed));
        };
        let mut comment = Comment {
            line: lexed.line,
            body: body.trim_matches(' ').to_string(),
            buffered,
            block: None,
        };

        self.skip_newlines()?;

        if self.peek()? == TokenKind::Indent {
            comment.block = Some(if buffered {
                self.parse_block()?
            } else {
                let mut block = Block::new(lexed.line);
                block.push(Node::Text(self.parse_text_block()?));
                block
            });
        }

        Ok(comment)
    }

    fn parse_doctype(&mut self) -> Result<Doctype, ParseError> {
        let lexed = self.stream.advance()?;
        let Token::Doctype { version } = lexed.token else {
            return Err(self.unexpected(TokenKind::Doctype, &lexed));
        };
        Ok(Doctype {
            line: lexed.line,
            version,
        })
    }

    fn parse_filter(&mut self) -> Result<Filter, ParseError> {
        let lexed = self.stream.advance()?;
        let Token::Filter { name } = lexed.token else {
            return Err(self.unexpected(TokenKind::Filter, &lexed));
        };

        let attributes = if self.peek()? == TokenKind::Attributes {
            match self.stream.advance()?.token {
                Token::Attributes { attributes, .. } => attributes,
                _ => Default::default(),
            }
        } else {
            Default::default()
        };

        let text = self.parse_text_block()?;
        Ok(Filter {
            line: lexed.line,
            name,
            attributes,
            block: Box::new(Node::Text(text)),
        })
    }

    fn parse_pipe(&mut self) -> Result<Text, ParseError> {
        self.expect(TokenKind::Pipe)?;
        self.parse_text_block()
    }

    /// Nested block opened by an indent and closed by the matching outdent or end of stream.
    fn parse_block(&mut self) -> Result<Block, ParseError> {
        let indent = self.expect(TokenKind::Indent)?;
        let mut block = Block::new(indent.line);

        loop {
            match self.peek()? {
                TokenKind::Outdent | TokenKind::Eos => break,
                TokenKind::Newline => {
                    self.stream.advance()?;
                }
                _ => {
                    if let Some(node) = self.parse_expression()? {
                        block.push(node);
                    }
                }
            }
        }
        self.stream.advance()?;

        Ok(block)
    }

    /// Folds consecutive verbatim text lines into one text node.
    fn parse_text_block(&mut self) -> Result<Text, ParseError> {
        let mut text = Text::new(self.line());

        if self.peek()? == TokenKind::Text {
            if let Token::Text { value } = self.stream.advance()?.token {
                text.add_line(value);
            }
        } else {
            self.expect(TokenKind::Indent)?;
        }

        loop {
            match self.peek()? {
                TokenKind::Indent => {
                    self.stream.advance()?;
                }
                TokenKind::Text => {
                    if let Token::Text { value } = self.stream.advance()?.token {
                        text.add_line(value);
                    }
                }
                _ => break,
            }
        }

        Ok(text)
    }
}

/// Parses a source text into its document tree.
pub fn parse(source: &str, options: Options) -> Result<Block, ParseError> {
    Parser::from_source(source, options).parse()
}
