//! Statement template scanner.

use crate::error::ParseError;
use crate::style::ParserStyle;

use super::{Span, Token, TokenKind};

/// Regions of the template in which parameter and attribute syntax is inert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    SingleQuote,
    DoubleQuote,
    Backtick,
    LineComment,
    BlockComment,
}

/// A single-pass scanner that splits a statement template into fragments,
/// parameters and attribute references.
pub struct Scanner<'a> {
    /// The raw template.
    input: &'a str,
    /// The active parameter prefix character.
    prefix: char,
    /// The current byte position.
    pos: usize,
    /// The byte position of the start of the current token.
    start: usize,
    /// Whether an invalid character after a prefix is an error.
    strict: bool,
}

const fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

const fn is_identifier_part(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Characters that can never appear in or directly after a parameter name.
const fn is_invalid_name_char(c: char) -> bool {
    !c.is_ascii() || (c.is_ascii_control() && !matches!(c, '\t' | '\n' | '\x0B' | '\x0C' | '\r'))
}

impl<'a> Scanner<'a> {
    /// Creates a scanner for `input` using the prefix of `style`.
    #[must_use]
    pub const fn new(input: &'a str, style: ParserStyle) -> Self {
        Self {
            input,
            prefix: style.prefix(),
            pos: 0,
            start: 0,
            strict: true,
        }
    }

    /// Creates a scanner that never fails. An invalid character after a
    /// prefix is left as literal text.
    #[must_use]
    pub const fn lenient(input: &'a str, style: ParserStyle) -> Self {
        let mut scanner = Self::new(input, style);
        scanner.strict = false;
        scanner
    }

    const fn invalid_name(&self, found: char) -> ParseError {
        ParseError::InvalidParameterName {
            position: self.start,
            found,
        }
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Returns the next character without advancing.
    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    /// Advances to the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Creates a span from start to current position.
    const fn make_span(&self) -> Span {
        Span::new(self.start, self.pos)
    }

    /// Creates a token with the current span.
    const fn make_token(&self, kind: TokenKind<'a>) -> Token<'a> {
        Token::new(kind, self.make_span())
    }

    /// Creates a fragment token covering everything since `start`.
    fn fragment(&self) -> Token<'a> {
        self.make_token(TokenKind::Fragment(&self.input[self.start..self.pos]))
    }

    const fn is_escapable(&self, c: char) -> bool {
        c == self.prefix || c == '<'
    }

    /// Returns the literal region opened at the current position, if any.
    fn region_start(&self) -> Option<Region> {
        match self.peek()? {
            '\'' => Some(Region::SingleQuote),
            '"' => Some(Region::DoubleQuote),
            '`' => Some(Region::Backtick),
            '-' if self.peek_next() == Some('-') => Some(Region::LineComment),
            '/' if self.peek_next() == Some('*') => Some(Region::BlockComment),
            _ => None,
        }
    }

    /// Returns true if `c` at the current position ends a plain fragment.
    fn starts_token(&self, c: char) -> bool {
        match c {
            '?' | '<' => true,
            '\\' => self.peek_next().is_some_and(|n| self.is_escapable(n)),
            c if c == self.prefix => true,
            _ => self.region_start().is_some(),
        }
    }

    /// Consumes a literal region. Unterminated regions run to end of input.
    fn scan_region(&mut self, region: Region) {
        match region {
            Region::SingleQuote | Region::DoubleQuote | Region::Backtick => {
                let Some(quote) = self.advance() else {
                    return;
                };
                while let Some(c) = self.advance() {
                    if c == '\\' && region != Region::Backtick && self.peek() == Some(quote) {
                        self.advance();
                    } else if c == quote {
                        break;
                    }
                }
            }
            Region::LineComment => {
                self.advance(); // -
                self.advance(); // -
                while self.peek().is_some_and(|c| c != '\n') {
                    self.advance();
                }
            }
            Region::BlockComment => {
                self.advance(); // /
                self.advance(); // *
                loop {
                    match self.advance() {
                        Some('*') if self.peek() == Some('/') => {
                            self.advance();
                            break;
                        }
                        None => break,
                        _ => {}
                    }
                }
            }
        }
    }

    /// Consumes plain SQL up to the next character that may start a token.
    fn scan_plain(&mut self) {
        self.advance();
        while let Some(c) = self.peek() {
            if self.starts_token(c) {
                break;
            }
            self.advance();
        }
    }

    /// Consumes a possibly dotted name. A dot only continues the name when
    /// another identifier character follows it.
    fn scan_name(&mut self) {
        while let Some(c) = self.peek() {
            let dotted = c == '.' && self.peek_next().is_some_and(is_identifier_part);
            if !is_identifier_part(c) && !dotted {
                break;
            }
            self.advance();
        }
    }

    /// Scans what follows a prefix character that was just consumed.
    fn scan_parameter(&mut self) -> Result<Token<'a>, ParseError> {
        match self.peek() {
            Some(c) if c == self.prefix => {
                self.advance();
                Ok(self.fragment())
            }
            Some(c) if is_identifier_start(c) => {
                let name_start = self.pos;
                self.scan_name();
                match self.peek() {
                    Some(c) if self.strict && is_invalid_name_char(c) => {
                        Err(self.invalid_name(c))
                    }
                    _ => {
                        let name = &self.input[name_start..self.pos];
                        Ok(self.make_token(TokenKind::NamedParameter(name)))
                    }
                }
            }
            Some(c) if self.strict && is_invalid_name_char(c) => Err(self.invalid_name(c)),
            _ => Ok(self.fragment()),
        }
    }

    /// Scans what follows a `<` that was just consumed. Anything other than
    /// `<name>` leaves the `<` as literal text.
    fn scan_attribute(&mut self) -> Token<'a> {
        let key_start = self.pos;
        if self.peek().is_some_and(is_identifier_start) {
            self.scan_name();
            if self.peek() == Some('>') {
                let key = &self.input[key_start..self.pos];
                self.advance();
                return self.make_token(TokenKind::AttributeRef(key));
            }
            self.pos = key_start;
        }
        self.fragment()
    }

    /// Scans the next token.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidParameterName`] when a parameter prefix, or
    /// the name after it, is followed by a non-ASCII or control character.
    /// Lenient scanners never fail.
    pub fn next_token(&mut self) -> Result<Token<'a>, ParseError> {
        self.start = self.pos;

        let Some(c) = self.peek() else {
            return Ok(self.make_token(TokenKind::Eof));
        };

        if let Some(region) = self.region_start() {
            self.scan_region(region);
            return Ok(self.fragment());
        }

        match c {
            '\\' if self.peek_next().is_some_and(|n| self.is_escapable(n)) => {
                self.advance(); // backslash
                let escaped = self.pos;
                self.advance();
                Ok(self.make_token(TokenKind::Fragment(&self.input[escaped..self.pos])))
            }
            '?' => {
                self.advance();
                Ok(self.make_token(TokenKind::PositionalParameter))
            }
            '<' => {
                self.advance();
                Ok(self.scan_attribute())
            }
            c if c == self.prefix => {
                self.advance();
                self.scan_parameter()
            }
            _ => {
                self.scan_plain();
                Ok(self.fragment())
            }
        }
    }

    /// Tokenizes the entire input. The last token is always [`TokenKind::Eof`].
    ///
    /// # Errors
    ///
    /// Returns the first [`ParseError`] met while scanning.
    pub fn tokenize(&mut self) -> Result<Vec<Token<'a>>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(input: &str) -> Vec<Token<'_>> {
        Scanner::new(input, ParserStyle::Colon)
            .tokenize()
            .unwrap_or_else(|e| panic!("Failed to scan: {input}\nError: {e}"))
    }

    fn token_kinds(input: &str) -> Vec<TokenKind<'_>> {
        tokenize(input).into_iter().map(|t| t.kind).collect()
    }

    fn hash_kinds(input: &str) -> Vec<TokenKind<'_>> {
        Scanner::new(input, ParserStyle::Hash)
            .tokenize()
            .unwrap_or_else(|e| panic!("Failed to scan: {input}\nError: {e}"))
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(token_kinds(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_plain_text_is_one_fragment() {
        assert_eq!(
            token_kinds("select * from v$session"),
            vec![
                TokenKind::Fragment("select * from v$session"),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_named_parameter() {
        assert_eq!(
            token_kinds("id = :id"),
            vec![
                TokenKind::Fragment("id = "),
                TokenKind::NamedParameter("id"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_dotted_parameter() {
        assert_eq!(
            token_kinds(":bean.property."),
            vec![
                TokenKind::NamedParameter("bean.property"),
                TokenKind::Fragment("."),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_double_colon_is_literal() {
        assert_eq!(
            token_kinds("1::int"),
            vec![
                TokenKind::Fragment("1"),
                TokenKind::Fragment("::"),
                TokenKind::Fragment("int"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_escaped_prefix() {
        assert_eq!(
            token_kinds("\\:literal"),
            vec![
                TokenKind::Fragment(":"),
                TokenKind::Fragment("literal"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_backslash_without_prefix_is_kept() {
        assert_eq!(
            token_kinds("a \\n b"),
            vec![TokenKind::Fragment("a \\n b"), TokenKind::Eof]
        );
    }

    #[test]
    fn test_lone_prefix_is_literal() {
        assert_eq!(
            token_kinds("a: b :"),
            vec![
                TokenKind::Fragment("a"),
                TokenKind::Fragment(":"),
                TokenKind::Fragment(" b "),
                TokenKind::Fragment(":"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_prefix_before_digit_is_literal() {
        assert_eq!(
            token_kinds("arr[1:2]"),
            vec![
                TokenKind::Fragment("arr[1"),
                TokenKind::Fragment(":"),
                TokenKind::Fragment("2]"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_quoted_regions() {
        assert_eq!(
            token_kinds("'a :b' \"c:d\" `v$e`"),
            vec![
                TokenKind::Fragment("'a :b'"),
                TokenKind::Fragment(" "),
                TokenKind::Fragment("\"c:d\""),
                TokenKind::Fragment(" "),
                TokenKind::Fragment("`v$e`"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_escaped_quote_stays_inside_literal() {
        assert_eq!(
            token_kinds("'it\\'s :x' :y"),
            vec![
                TokenKind::Fragment("'it\\'s :x'"),
                TokenKind::Fragment(" "),
                TokenKind::NamedParameter("y"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_doubled_quote_is_two_literals() {
        assert_eq!(
            token_kinds("'it''s'"),
            vec![
                TokenKind::Fragment("'it'"),
                TokenKind::Fragment("'s'"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unterminated_quote_runs_to_end() {
        assert_eq!(
            token_kinds("select * from `v$session"),
            vec![
                TokenKind::Fragment("select * from "),
                TokenKind::Fragment("`v$session"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            token_kinds("a -- :x 'q\n/* :y <z> */ :w"),
            vec![
                TokenKind::Fragment("a "),
                TokenKind::Fragment("-- :x 'q"),
                TokenKind::Fragment("\n"),
                TokenKind::Fragment("/* :y <z> */"),
                TokenKind::Fragment(" "),
                TokenKind::NamedParameter("w"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_single_dash_and_slash_are_plain() {
        assert_eq!(
            token_kinds("a - b / c"),
            vec![TokenKind::Fragment("a - b / c"), TokenKind::Eof]
        );
    }

    #[test]
    fn test_positional_parameter() {
        assert_eq!(
            token_kinds("a = ? and b = :b"),
            vec![
                TokenKind::Fragment("a = "),
                TokenKind::PositionalParameter,
                TokenKind::Fragment(" and b = "),
                TokenKind::NamedParameter("b"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_attribute_reference() {
        assert_eq!(
            token_kinds("select <column> from t"),
            vec![
                TokenKind::Fragment("select "),
                TokenKind::AttributeRef("column"),
                TokenKind::Fragment(" from t"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unclosed_angle_bracket_is_literal() {
        assert_eq!(
            token_kinds("a <b and c <= d"),
            vec![
                TokenKind::Fragment("a "),
                TokenKind::Fragment("<"),
                TokenKind::Fragment("b and c "),
                TokenKind::Fragment("<"),
                TokenKind::Fragment("= d"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_escaped_angle_bracket() {
        assert_eq!(
            token_kinds("\\<key>"),
            vec![
                TokenKind::Fragment("<"),
                TokenKind::Fragment("key>"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_hash_style() {
        assert_eq!(
            hash_kinds("a = #a and b::int = :b"),
            vec![
                TokenKind::Fragment("a = "),
                TokenKind::NamedParameter("a"),
                TokenKind::Fragment(" and b::int = :b"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_hash_in_identifier_with_colon_style() {
        assert_eq!(
            token_kinds("col# = :x"),
            vec![
                TokenKind::Fragment("col# = "),
                TokenKind::NamedParameter("x"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_invalid_parameter_name() {
        let err = Scanner::new("id = :\u{0087}\u{008e}", ParserStyle::Colon)
            .tokenize()
            .unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidParameterName {
                position: 5,
                found: '\u{0087}',
            }
        );
    }

    #[test]
    fn test_control_character_after_prefix() {
        let err = Scanner::new(":\u{0001}", ParserStyle::Colon)
            .tokenize()
            .unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidParameterName { position: 0, .. }
        ));
    }

    #[test]
    fn test_span_tracking() {
        let tokens = tokenize("id = :id");
        assert_eq!(tokens[0].span, Span::new(0, 5));
        assert_eq!(tokens[1].span, Span::new(5, 8));
        assert_eq!(tokens[2].span, Span::new(8, 8));
    }

    #[test]
    fn test_multibyte_text() {
        assert_eq!(
            token_kinds("'héllo' = :name, ïve"),
            vec![
                TokenKind::Fragment("'héllo'"),
                TokenKind::Fragment(" = "),
                TokenKind::NamedParameter("name"),
                TokenKind::Fragment(", ïve"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_invalid_character_ending_a_name() {
        let err = Scanner::new("x = :naïve", ParserStyle::Colon)
            .tokenize()
            .unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidParameterName {
                position: 4,
                found: 'ï',
            }
        );
    }

    #[test]
    fn test_lenient_scanner_keeps_invalid_text() {
        let kinds: Vec<TokenKind<'_>> =
            Scanner::lenient(":\u{0087} :boo\u{008e}", ParserStyle::Colon)
                .tokenize()
                .unwrap()
                .into_iter()
                .map(|t| t.kind)
                .collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Fragment(":"),
                TokenKind::Fragment("\u{0087} "),
                TokenKind::NamedParameter("boo"),
                TokenKind::Fragment("\u{008e}"),
                TokenKind::Eof,
            ]
        );
    }
}
