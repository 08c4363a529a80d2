//! Parsed statements and the scanning entry point.

use std::fmt;

use serde::Serialize;

use crate::binding::{Binding, SqlValue};
use crate::error::{BindError, ParseError};
use crate::lexer::{Scanner, TokenKind};
use crate::style::ParserStyle;

/// The name a bind slot is resolved by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum ParameterName {
    /// A named parameter such as `:id`.
    Named(String),
    /// A `?` placeholder, identified by its 0-based bind slot.
    Positional(usize),
}

impl ParameterName {
    /// Returns the name if this is a named parameter.
    #[must_use]
    pub fn as_named(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            Self::Positional(_) => None,
        }
    }
}

impl fmt::Display for ParameterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::Positional(index) => write!(f, "?{index}"),
        }
    }
}

/// SQL ready for a prepared-statement API, plus the parameter behind each `?`.
///
/// Every parameter occurrence is listed, in order, so repeated names appear
/// once per use.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ParsedStatement {
    sql: String,
    parameters: Vec<ParameterName>,
}

impl ParsedStatement {
    /// Returns the rewritten SQL.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Returns the parameters in bind order.
    #[must_use]
    pub fn parameters(&self) -> &[ParameterName] {
        &self.parameters
    }

    /// Returns the number of bind slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// Returns true if the statement has no bind slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Returns true if no named parameter occurs in the statement.
    #[must_use]
    pub fn is_positional_only(&self) -> bool {
        self.parameters
            .iter()
            .all(|p| matches!(p, ParameterName::Positional(_)))
    }

    /// Iterates over the named parameters, in bind order.
    pub fn named_parameters(&self) -> impl Iterator<Item = &str> {
        self.parameters.iter().filter_map(ParameterName::as_named)
    }

    /// Resolves `binding` into one value per bind slot.
    ///
    /// # Errors
    ///
    /// Returns a [`BindError`] for the first slot no argument fills.
    pub fn bind(&self, binding: &Binding) -> Result<Vec<SqlValue>, BindError> {
        binding.resolve(self)
    }
}

/// Scans a template into a [`ParsedStatement`].
///
/// Attribute references are copied through untouched; use
/// [`Rewriter`](crate::Rewriter) to substitute them.
///
/// A `?` inside a quoted literal or comment (e.g. `'?'`) stays in the output
/// SQL with no parameter behind it, so count [`ParsedStatement::len`] rather
/// than the `?` characters of [`ParsedStatement::sql`].
///
/// # Errors
///
/// Returns [`ParseError::InvalidParameterName`] when a prefix or a parameter
/// name is followed by a non-ASCII character or a control character.
///
/// # Example
///
/// ```rust
/// use oxide_rewrite::{ParameterName, ParserStyle, scan};
///
/// let parsed = scan("select * from users where id = :id", ParserStyle::Colon).unwrap();
/// assert_eq!(parsed.sql(), "select * from users where id = ?");
/// assert_eq!(parsed.parameters(), &[ParameterName::Named(String::from("id"))]);
/// ```
pub fn scan(sql: &str, style: ParserStyle) -> Result<ParsedStatement, ParseError> {
    let mut scanner = Scanner::new(sql, style);
    let mut out = String::with_capacity(sql.len());
    let mut parameters = Vec::new();

    loop {
        let token = scanner.next_token()?;
        match token.kind {
            TokenKind::Fragment(text) => out.push_str(text),
            TokenKind::AttributeRef(_) => out.push_str(token.span.slice(sql)),
            TokenKind::NamedParameter(name) => {
                out.push('?');
                parameters.push(ParameterName::Named(String::from(name)));
            }
            TokenKind::PositionalParameter => {
                out.push('?');
                parameters.push(ParameterName::Positional(parameters.len()));
            }
            TokenKind::Eof => break,
        }
    }

    Ok(ParsedStatement {
        sql: out,
        parameters,
    })
}

/// Turns a template into a [`ParsedStatement`]. This is the seam the
/// [`Rewriter`](crate::Rewriter) scans through.
pub trait StatementScanner: Send + Sync {
    /// Scans `sql`, which contains no attribute references left to resolve.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when the template cannot be scanned.
    fn scan(&self, sql: &str) -> Result<ParsedStatement, ParseError>;
}

impl StatementScanner for ParserStyle {
    fn scan(&self, sql: &str) -> Result<ParsedStatement, ParseError> {
        scan(sql, *self)
    }
}
