//! Error types for the seed parser

use std::ops::Range;
use thiserror::Error;

/// Result type for seed parsing
pub type ParseResult<T> = Result<T, ParseError>;

/// Parse error with byte location inside the seed source
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unexpected token at {span:?}: expected {expected}, found {found}")]
    UnexpectedToken {
        span: Range<usize>,
        expected: String,
        found: String,
    },

    #[error("Unexpected end of seed: expected {expected}")]
    UnexpectedEof { expected: String },

    #[error("Invalid syntax at {span:?}: {message}")]
    InvalidSyntax { span: Range<usize>, message: String },

    #[error("Lexer error at {span:?}")]
    LexerError { span: Range<usize> },
}

impl ParseError {
    pub fn unexpected_token(
        span: Range<usize>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::UnexpectedToken {
            span,
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn unexpected_eof(expected: impl Into<String>) -> Self {
        Self::UnexpectedEof {
            expected: expected.into(),
        }
    }

    pub fn invalid_syntax(span: Range<usize>, message: impl Into<String>) -> Self {
        Self::InvalidSyntax {
            span,
            message: message.into(),
        }
    }

    pub fn lexer_error(span: Range<usize>) -> Self {
        Self::LexerError { span }
    }

    pub fn span(&self) -> Option<Range<usize>> {
        match self {
            ParseError::UnexpectedToken { span, .. }
            | ParseError::InvalidSyntax { span, .. }
            | ParseError::LexerError { span } => Some(span.clone()),
            ParseError::UnexpectedEof { .. } => None,
        }
    }
}

/// Pretty-print a seed error with source context using ariadne
#[cfg(feature = "pretty-errors")]
pub fn format_error(source: &str, name: &str, error: &ParseError) -> String {
    use ariadne::{Color, Config, Label, Report, ReportKind, Source};

    let span = error
        .span()
        .unwrap_or(source.len().saturating_sub(1)..source.len());

    let label = match error {
        ParseError::UnexpectedToken { expected, .. } | ParseError::UnexpectedEof { expected } => {
            format!("expected {}", expected)
        }
        ParseError::InvalidSyntax { message, .. } => message.clone(),
        ParseError::LexerError { .. } => "unrecognized input".to_string(),
    };

    let mut output = Vec::new();
    let written = Report::build(ReportKind::Error, name, span.start)
        .with_config(Config::default().with_color(false))
        .with_message(error.to_string())
        .with_label(
            Label::new((name, span))
                .with_color(Color::Red)
                .with_message(label),
        )
        .finish()
        .write((name, Source::from(source)), &mut output);

    match written {
        Ok(()) => String::from_utf8(output).unwrap_or_else(|_| error.to_string()),
        Err(_) => error.to_string(),
    }
}

#[cfg(all(test, feature = "pretty-errors"))]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_mentions_expectation() {
        let source = "<list><item></list>";
        let error = ParseError::unexpected_token(13..17, "closing tag </item>", "</list>");
        let rendered = format_error(source, "list.seed", &error);
        assert!(rendered.contains("expected closing tag </item>"));
    }
}
