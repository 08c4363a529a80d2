//! Token types produced by the statement scanner.

use super::Span;

/// The classification of a scanned region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind<'a> {
    /// Text copied to the output as-is. Covers plain SQL, quoted literals,
    /// comments, `::` casts and escaped prefix characters.
    Fragment(&'a str),
    /// A named parameter, without its prefix character.
    NamedParameter(&'a str),
    /// A bare `?` placeholder.
    PositionalParameter,
    /// An attribute reference `<key>`, without the angle brackets.
    AttributeRef(&'a str),
    /// End of input.
    Eof,
}

/// A token with its location in the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// The kind of token.
    pub kind: TokenKind<'a>,
    /// The location in the template.
    pub span: Span,
}

impl<'a> Token<'a> {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind<'a>, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Returns true if this token becomes a bind placeholder.
    #[must_use]
    pub const fn is_parameter(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::NamedParameter(_) | TokenKind::PositionalParameter
        )
    }
}
