use crate::ast::*;
use crate::error::{ParseError, ParseResult};
use crate::tokenizer::{tokenize, Token};
use std::ops::Range;

/// Pseudo-attribute carrying placeholder markers in seed markup
pub const MARKER_ATTRIBUTE: &str = "e4x";

/// Parse seed markup into a [`Seed`]
pub fn parse_seed(source: &str) -> ParseResult<Seed> {
    Parser::new(source)?.parse_seed()
}

/// Recursive descent parser for seed markup
pub struct Parser<'src> {
    tokens: Vec<(Token<'src>, Range<usize>)>,
    pos: usize,
    source_len: usize,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> ParseResult<Self> {
        Ok(Self {
            tokens: tokenize(source)?,
            pos: 0,
            source_len: source.len(),
        })
    }

    /// Parse a complete seed: a single root element
    pub fn parse_seed(&mut self) -> ParseResult<Seed> {
        self.skip_blank_text();
        let root = self.parse_element()?;
        self.skip_blank_text();

        if let Some((token, span)) = self.peek() {
            return Err(ParseError::invalid_syntax(
                span.clone(),
                format!("A seed has a single root element, found {} after it", token),
            ));
        }

        Ok(Seed { root })
    }

    /// Parse an element and its content
    fn parse_element(&mut self) -> ParseResult<SeedElement> {
        self.expect(Token::TagStart, "'<'")?;
        let start = self.current_span().start;
        let tag = self.expect_name("element name")?;
        let span = start..self.current_span().end;

        let mut attributes = Vec::new();
        let mut marker = None;
        loop {
            match self.peek() {
                Some((Token::Name(_), _)) => {
                    let name = self.expect_name("attribute name")?;
                    let name_span = self.current_span();
                    self.expect(Token::Equals, "'='")?;
                    let value = self.expect_value()?;
                    if name == MARKER_ATTRIBUTE {
                        marker = Some(Self::marker_node(&value, name_span)?);
                    } else {
                        attributes.push((name, value));
                    }
                }
                Some((Token::SelfClose, _)) => {
                    self.advance();
                    let children = marker.into_iter().collect();
                    return Ok(SeedElement {
                        tag,
                        attributes,
                        children,
                        span,
                    });
                }
                Some((Token::TagEnd, _)) => {
                    self.advance();
                    break;
                }
                Some((token, span)) => {
                    return Err(ParseError::unexpected_token(
                        span.clone(),
                        "attribute, '>' or '/>'",
                        token.to_string(),
                    ));
                }
                None => return Err(ParseError::unexpected_eof("'>' or '/>'")),
            }
        }

        let mut children = Vec::new();
        loop {
            match self.peek() {
                Some((Token::CloseTagStart, _)) => break,
                Some((Token::TagStart, _)) => {
                    children.push(SeedNode::Element(self.parse_element()?));
                }
                Some((Token::Text(text), _)) => {
                    let text = *text;
                    self.advance();
                    if !text.trim().is_empty() {
                        children.push(SeedNode::Text {
                            content: unescape(text),
                        });
                    }
                }
                Some((token, span)) => {
                    return Err(ParseError::unexpected_token(
                        span.clone(),
                        "content",
                        token.to_string(),
                    ));
                }
                None => return Err(ParseError::unexpected_eof(format!("</{}>", tag))),
            }
        }

        self.expect(Token::CloseTagStart, "'</'")?;
        let closing = self.expect_name("closing tag name")?;
        if closing != tag {
            return Err(ParseError::unexpected_token(
                self.current_span(),
                format!("closing tag </{}>", tag),
                format!("</{}>", closing),
            ));
        }
        self.expect(Token::TagEnd, "'>'")?;

        // The focus or hold slot goes after any literal content
        children.extend(marker);

        Ok(SeedElement {
            tag,
            attributes,
            children,
            span,
        })
    }

    fn marker_node(value: &str, span: Range<usize>) -> ParseResult<SeedNode> {
        match value {
            "here" => Ok(SeedNode::Here),
            "hold" => Ok(SeedNode::Hold),
            other => Err(ParseError::invalid_syntax(
                span,
                format!(
                    "Unknown {} marker '{}', expected 'here' or 'hold'",
                    MARKER_ATTRIBUTE, other
                ),
            )),
        }
    }

    fn skip_blank_text(&mut self) {
        while let Some((Token::Text(text), _)) = self.peek() {
            if !text.trim().is_empty() {
                break;
            }
            self.advance();
        }
    }

    // Token helpers

    fn peek(&self) -> Option<&(Token<'src>, Range<usize>)> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&(Token<'src>, Range<usize>)> {
        let token = self.tokens.get(self.pos);
        self.pos += 1;
        token
    }

    fn check(&self, token: &Token) -> bool {
        match self.peek() {
            Some((t, _)) => std::mem::discriminant(t) == std::mem::discriminant(token),
            None => false,
        }
    }

    fn expect(&mut self, token: Token, expected: &str) -> ParseResult<()> {
        if self.check(&token) {
            self.advance();
            return Ok(());
        }
        Err(self.unexpected(expected))
    }

    fn expect_name(&mut self, expected: &str) -> ParseResult<String> {
        match self.peek() {
            Some((Token::Name(name), _)) => {
                let name = name.to_string();
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    fn expect_value(&mut self) -> ParseResult<String> {
        match self.peek() {
            Some((Token::Value(value), _)) => {
                let value = unescape(value);
                self.advance();
                Ok(value)
            }
            _ => Err(self.unexpected("quoted attribute value")),
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match self.peek() {
            Some((token, span)) => {
                ParseError::unexpected_token(span.clone(), expected, token.to_string())
            }
            None => ParseError::unexpected_eof(expected),
        }
    }

    /// Span of the token just consumed
    fn current_span(&self) -> Range<usize> {
        self.tokens
            .get(self.pos.saturating_sub(1))
            .map(|(_, span)| span.clone())
            .unwrap_or(self.source_len..self.source_len)
    }
}

/// Resolve the predefined XML entities
fn unescape(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    raw.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_seed_with_here_and_hold() {
        let seed = parse_seed("<list><item e4x='here'/><item e4x='hold'/></list>").unwrap();
        assert_eq!(seed.root_tag(), "list");
        assert_eq!(seed.root.children.len(), 2);

        let SeedNode::Element(first) = &seed.root.children[0] else {
            panic!("Expected element");
        };
        assert_eq!(first.tag, "item");
        assert_eq!(first.children, vec![SeedNode::Here]);
        assert!(first.attributes.is_empty());

        assert_eq!(seed.markers(), MarkerCount { here: 1, hold: 1 });
        assert!(seed.is_well_formed());
    }

    #[test]
    fn test_attributes_and_text_are_kept() {
        let seed = parse_seed(
            r#"<speech type="dialog"><speaker>Narrator &amp; co</speaker><p e4x="here"/></speech>"#,
        )
        .unwrap();
        assert_eq!(seed.root.attribute("type"), Some("dialog"));

        let SeedNode::Element(speaker) = &seed.root.children[0] else {
            panic!("Expected speaker");
        };
        assert_eq!(
            speaker.children,
            vec![SeedNode::Text {
                content: "Narrator & co".to_string()
            }]
        );
        assert_eq!(seed.descendant_tags(), vec!["speaker", "p"]);
    }

    #[test]
    fn test_marker_on_element_with_content_goes_last() {
        let seed = parse_seed("<p e4x='here'>Intro: </p>").unwrap();
        assert_eq!(
            seed.root.children,
            vec![
                SeedNode::Text {
                    content: "Intro: ".to_string()
                },
                SeedNode::Here
            ]
        );
    }

    #[test]
    fn test_non_ascii_tags() {
        let seed = parse_seed("<réponse><élément e4x='here'/></réponse>").unwrap();
        assert_eq!(seed.root_tag(), "réponse");
        assert_eq!(seed.descendant_tags(), vec!["élément"]);
    }

    #[test]
    fn test_whitespace_between_elements_is_ignored() {
        let seed = parse_seed("\n  <blank>\n    <wrong e4x='here'/>\n  </blank>\n").unwrap();
        assert_eq!(seed.root.children.len(), 1);
    }

    #[test]
    fn test_mismatched_closing_tag() {
        let err = parse_seed("<list><item></list>").unwrap_err();
        match err {
            ParseError::UnexpectedToken { expected, found, .. } => {
                assert_eq!(expected, "closing tag </item>");
                assert_eq!(found, "</list>");
            }
            other => panic!("Unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_marker_value() {
        let err = parse_seed("<p e4x='there'/>").unwrap_err();
        assert!(matches!(err, ParseError::InvalidSyntax { .. }));
    }

    #[test]
    fn test_single_root_required() {
        let err = parse_seed("<p e4x='here'/><p/>").unwrap_err();
        assert!(matches!(err, ParseError::InvalidSyntax { .. }));
    }

    #[test]
    fn test_truncated_seed() {
        let err = parse_seed("<section><p").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof { .. }));
    }

    #[test]
    fn test_seed_without_focus_is_not_well_formed() {
        let seed = parse_seed("<list><item e4x='hold'/></list>").unwrap();
        assert!(!seed.is_well_formed());
    }
}
