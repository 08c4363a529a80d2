//! Template attributes and their substitution.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt::Display;

use crate::error::RewriteError;
use crate::lexer::{Scanner, TokenKind};
use crate::style::ParserStyle;

/// Values substituted for `<key>` references before parameters are scanned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    values: HashMap<String, String>,
}

impl Attributes {
    /// Creates an empty attribute map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines `key`, storing the string form of `value`.
    pub fn define(&mut self, key: impl Into<String>, value: impl Display) -> &mut Self {
        self.values.insert(key.into(), value.to_string());
        self
    }

    /// Returns the value defined for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Returns the number of defined attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no attribute is defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Display> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attributes = Self::new();
        attributes.extend(iter);
        attributes
    }
}

impl<K: Into<String>, V: Display> Extend<(K, V)> for Attributes {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.define(key, value);
        }
    }
}

/// Replaces every `<key>` reference in `sql` with its attribute value.
///
/// References inside quoted literals and comments are left alone. All other
/// text is copied as written, so escapes meant for the parameter scanner
/// survive; only `\<` loses its backslash. Returns the input unchanged when
/// nothing was substituted.
///
/// # Errors
///
/// Returns [`RewriteError::UndefinedAttribute`] for a reference with no
/// value. Invalid parameter names are left for the statement scan to report.
pub fn substitute<'a>(
    sql: &'a str,
    style: ParserStyle,
    attributes: &Attributes,
) -> Result<Cow<'a, str>, RewriteError> {
    let mut scanner = Scanner::lenient(sql, style);
    let mut out: Option<String> = None;
    let mut copied = 0;

    loop {
        let token = scanner.next_token()?;
        let replacement = match token.kind {
            TokenKind::AttributeRef(key) => {
                attributes
                    .get(key)
                    .ok_or_else(|| RewriteError::UndefinedAttribute {
                        key: String::from(key),
                    })?
            }
            TokenKind::Fragment("<") if token.span.len() == 2 => "<",
            TokenKind::Eof => break,
            _ => continue,
        };
        let buf = out.get_or_insert_with(|| String::with_capacity(sql.len()));
        buf.push_str(&sql[copied..token.span.start]);
        buf.push_str(replacement);
        copied = token.span.end;
    }

    Ok(match out {
        Some(mut buf) => {
            buf.push_str(&sql[copied..]);
            Cow::Owned(buf)
        }
        None => Cow::Borrowed(sql),
    })
}
