//! Error types for statement scanning, rewriting and binding.

use thiserror::Error;

/// A failure to scan a statement template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A parameter prefix is followed by a character that cannot start a
    /// parameter name.
    #[error("invalid parameter name at position {position}: unexpected character {found:?}")]
    InvalidParameterName {
        /// Byte offset of the parameter prefix.
        position: usize,
        /// The character following the prefix.
        found: char,
    },
}

impl ParseError {
    /// Returns the byte offset the error refers to.
    #[must_use]
    pub const fn position(&self) -> usize {
        match self {
            Self::InvalidParameterName { position, .. } => *position,
        }
    }
}

/// A failure to rewrite a statement template into executable SQL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewriteError {
    /// An `<key>` reference has no entry in the attribute map.
    #[error("undefined attribute for token '<{key}>'")]
    UndefinedAttribute {
        /// The missing attribute key.
        key: String,
    },

    /// Scanning the substituted template failed.
    #[error("unable to parse statement for named parameter replacement: {0}")]
    Parse(#[from] ParseError),
}

/// A failure to resolve bound arguments against a parsed statement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// No named argument matches and no positional argument fills the slot.
    #[error(
        "no named parameter matches \"{name}\" and no positional param for place {position} (which is {} in the 'start at 1' scheme) has been set",
        .position + 1
    )]
    MissingNamed {
        /// The parameter name.
        name: String,
        /// The 0-based bind slot.
        position: usize,
    },

    /// No positional argument fills a `?` slot.
    #[error("no positional param for place {position} has been set")]
    MissingPositional {
        /// The 0-based bind slot.
        position: usize,
    },
}

/// Result type alias for rewrite operations.
pub type Result<T, E = RewriteError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::InvalidParameterName {
            position: 7,
            found: '\u{1}',
        };
        assert_eq!(
            err.to_string(),
            "invalid parameter name at position 7: unexpected character '\\u{1}'"
        );
        assert_eq!(err.position(), 7);
    }

    #[test]
    fn test_undefined_attribute_display() {
        let err = RewriteError::UndefinedAttribute {
            key: String::from("table"),
        };
        assert_eq!(err.to_string(), "undefined attribute for token '<table>'");
    }

    #[test]
    fn test_parse_error_converts_into_rewrite_error() {
        let parse = ParseError::InvalidParameterName {
            position: 0,
            found: '\u{87}',
        };
        let err: RewriteError = parse.clone().into();
        assert_eq!(err, RewriteError::Parse(parse));
    }

    #[test]
    fn test_missing_named_display() {
        let err = BindError::MissingNamed {
            name: String::from("id"),
            position: 0,
        };
        assert_eq!(
            err.to_string(),
            "no named parameter matches \"id\" and no positional param for place 0 (which is 1 in the 'start at 1' scheme) has been set"
        );
    }
}
