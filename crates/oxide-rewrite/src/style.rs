//! Named-parameter prefix styles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The character that introduces a named parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParserStyle {
    /// `:name` parameters. `::` is left alone for type casts.
    #[default]
    Colon,
    /// `#name` parameters.
    Hash,
}

impl ParserStyle {
    /// Returns the prefix character for this style.
    #[must_use]
    pub const fn prefix(self) -> char {
        match self {
            Self::Colon => ':',
            Self::Hash => '#',
        }
    }

    /// Returns the name of the style.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Colon => "colon",
            Self::Hash => "hash",
        }
    }
}

impl fmt::Display for ParserStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParserStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("colon") {
            Ok(Self::Colon)
        } else if s.eq_ignore_ascii_case("hash") {
            Ok(Self::Hash)
        } else {
            Err(format!("unknown parser style '{s}', expected 'colon' or 'hash'"))
        }
    }
}
