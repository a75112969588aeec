use crate::error::{ParseError, ParseResult};
use logos::Logos;
use std::fmt;
use std::ops::Range;

/// Tokens between tags: text runs and tag openers
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
enum ContentToken {
    #[token("</")]
    CloseTagStart,

    #[token("<")]
    TagStart,

    #[regex(r"[^<]+")]
    Text,
}

/// Tokens inside a tag, up to `>` or `/>`
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
enum MarkupToken {
    #[token(">")]
    TagEnd,

    #[token("/>")]
    SelfClose,

    #[token("=")]
    Equals,

    // XML names in any script, including namespaced ones like xml:lang
    #[regex(r"[\p{L}_][\p{L}\p{N}_.:\-]*")]
    Name,

    #[regex(r#""[^"]*""#)]
    #[regex(r"'[^']*'")]
    Quoted,
}

/// Token types for seed markup
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'src> {
    TagStart,
    CloseTagStart,
    TagEnd,
    SelfClose,
    Equals,
    Name(&'src str),
    /// Attribute value without its quotes, entities still escaped
    Value(&'src str),
    /// Raw text run, entities still escaped
    Text(&'src str),
}

impl<'src> fmt::Display for Token<'src> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::TagStart => write!(f, "<"),
            Token::CloseTagStart => write!(f, "</"),
            Token::TagEnd => write!(f, ">"),
            Token::SelfClose => write!(f, "/>"),
            Token::Equals => write!(f, "="),
            Token::Name(name) => write!(f, "name '{}'", name),
            Token::Value(value) => write!(f, "value '{}'", value),
            Token::Text(text) => write!(f, "text '{}'", text.trim()),
        }
    }
}

/// Tokenize seed markup
///
/// The lexer switches between content mode and tag mode, so text may
/// freely contain characters like `=` or quotes.
pub fn tokenize(source: &str) -> ParseResult<Vec<(Token<'_>, Range<usize>)>> {
    let mut tokens = Vec::new();
    let mut content = ContentToken::lexer(source);

    loop {
        let Some(result) = content.next() else {
            return Ok(tokens);
        };
        let span = content.span();
        match result.map_err(|_| ParseError::lexer_error(span.clone()))? {
            ContentToken::Text => {
                tokens.push((Token::Text(content.slice()), span));
                continue;
            }
            ContentToken::TagStart => tokens.push((Token::TagStart, span)),
            ContentToken::CloseTagStart => tokens.push((Token::CloseTagStart, span)),
        }

        let mut markup = content.morph::<MarkupToken>();
        loop {
            // Input ending inside a tag is left for the parser to report
            let Some(result) = markup.next() else {
                return Ok(tokens);
            };
            let span = markup.span();
            let slice = markup.slice();
            match result.map_err(|_| ParseError::lexer_error(span.clone()))? {
                MarkupToken::TagEnd => {
                    tokens.push((Token::TagEnd, span));
                    break;
                }
                MarkupToken::SelfClose => {
                    tokens.push((Token::SelfClose, span));
                    break;
                }
                MarkupToken::Equals => tokens.push((Token::Equals, span)),
                MarkupToken::Name => tokens.push((Token::Name(slice), span)),
                MarkupToken::Quoted => {
                    tokens.push((Token::Value(&slice[1..slice.len() - 1]), span));
                }
            }
        }
        content = markup.morph();
    }
}
