//! # oxide-rewrite
//!
//! Named-parameter statement rewriting for prepared-statement APIs.
//!
//! This crate provides:
//! - A single-pass scanner that finds `:name` (or `#name`) parameters while
//!   skipping quoted literals, backtick identifiers and comments
//! - Template attributes: `<key>` references substituted before scanning
//! - A shared, thread-safe [`Rewriter`] that caches parsed templates
//! - Resolution of named and positional arguments into bind order
//!
//! ## Rewriting
//!
//! ```rust
//! use oxide_rewrite::{Attributes, Binding, ParserStyle, Rewriter, SqlValue};
//!
//! let rewriter = Rewriter::new(ParserStyle::Colon);
//!
//! let parsed = rewriter
//!     .rewrite("select 1::int where a = :a and b = :b", &Attributes::new())
//!     .unwrap();
//! assert_eq!(parsed.sql(), "select 1::int where a = ? and b = ?");
//!
//! let values = parsed
//!     .bind(&Binding::new().add_named("b", 2_i64).add_named("a", "x"))
//!     .unwrap();
//! assert_eq!(values, vec![SqlValue::Text(String::from("x")), SqlValue::Int(2)]);
//! ```
//!
//! Text inside literals and comments is never rewritten:
//!
//! ```rust
//! use oxide_rewrite::{ParserStyle, scan};
//!
//! let parsed = scan("select ':nope' -- :nope\n, :yes", ParserStyle::Colon).unwrap();
//! assert_eq!(parsed.sql(), "select ':nope' -- :nope\n, ?");
//! assert_eq!(parsed.len(), 1);
//! ```

pub mod attributes;
pub mod binding;
pub mod error;
pub mod lexer;
pub mod rewriter;
pub mod statement;
pub mod style;

pub use attributes::{Attributes, substitute};
pub use binding::{Binding, SqlValue, ToSqlValue};
pub use error::{BindError, ParseError, RewriteError};
pub use lexer::{Scanner, Token, TokenKind};
pub use rewriter::{RewriteCache, Rewriter, RewriterConfig};
pub use statement::{ParameterName, ParsedStatement, StatementScanner, scan};
pub use style::ParserStyle;
