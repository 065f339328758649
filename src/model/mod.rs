use thiserror::Error;

pub mod filter;
pub mod gomod;
pub mod result;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error reading manifest: {0}")]
    IO(#[from] std::io::Error),
    #[error("Unterminated quoted string at line {0}")]
    UnterminatedString(usize),
    #[error("Unexpected `)` at line {0}")]
    UnexpectedCloseParen(usize),
    #[error("Unterminated `{directive}` block opened at line {line}")]
    UnterminatedBlock { directive: String, line: usize },
    #[error("Malformed `{directive}` directive at line {line}: {reason}")]
    MalformedDirective {
        directive: String,
        line: usize,
        reason: String,
    },
}

impl ParseError {
    pub(crate) fn malformed(directive: &str, line: usize, reason: impl Into<String>) -> Self {
        ParseError::MalformedDirective {
            directive: directive.to_owned(),
            line,
            reason: reason.into(),
        }
    }
}
