//! Top-level error type
//!
//!     Errors raised by the engine and the command line. Lexing failures are reported as
//!     [Error::Syntax], tagged with the name of the template they came from: the file path,
//!     or `input` for templates rendered from a string.

use crate::dumping::{DumpError, RegistrationError};
use crate::lexing::LexError;
use crate::parsing::ParseError;
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    MalformedIndentation,
    UnknownToken,
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SyntaxErrorKind::MalformedIndentation => "Malformed indentation",
            SyntaxErrorKind::UnknownToken => "Unknown token found",
        })
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("{kind}, Line {line} on {source_name}")]
    Syntax {
        kind: SyntaxErrorKind,
        line: usize,
        source_name: String,
    },
    #[error(transparent)]
    Parse(ParseError),
    #[error(transparent)]
    Dump(#[from] DumpError),
    #[error(transparent)]
    Registration(#[from] RegistrationError),
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("{} is not a file", .0.display())]
    NotAFile(PathBuf),
    #[error("cache directory is not configured or does not exist")]
    CacheUnavailable,
    #[error("cache directory {} is not writable", .0.display())]
    CacheNotWritable(PathBuf),
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Attaches the template name to lexing failures; other parse errors pass through.
    pub fn from_parse(error: ParseError, source_name: &str) -> Self {
        let (kind, line) = match &error {
            ParseError::Lex(LexError::MalformedIndentation { line }) => {
                (SyntaxErrorKind::MalformedIndentation, *line)
            }
            ParseError::Lex(LexError::UnknownToken { line })
            | ParseError::UnknownToken { line, .. } => (SyntaxErrorKind::UnknownToken, *line),
            ParseError::UnexpectedToken { .. } => return Error::Parse(error),
        };
        Error::Syntax {
            kind,
            line,
            source_name: source_name.to_string(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexing::TokenKind;

    #[test]
    fn lexing_failures_name_their_source() {
        let error = Error::from_parse(
            ParseError::Lex(LexError::MalformedIndentation { line: 3 }),
            "input",
        );
        assert_eq!(error.to_string(), "Malformed indentation, Line 3 on input");

        let error = Error::from_parse(
            ParseError::UnknownToken {
                found: TokenKind::Attributes,
                line: 7,
            },
            "views/index.slim",
        );
        assert_eq!(
            error.to_string(),
            "Unknown token found, Line 7 on views/index.slim"
        );
    }

    #[test]
    fn grammar_errors_pass_through() {
        let error = Error::from_parse(
            ParseError::UnexpectedToken {
                expected: TokenKind::Indent,
                found: TokenKind::Eos,
                line: 2,
            },
            "input",
        );
        assert_eq!(error.to_string(), "expected indent, but got eos on line 2");
    }
}
