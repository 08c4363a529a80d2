//! Statement template lexer.
//!
//! Splits a template into SQL fragments, parameters and attribute
//! references, skipping over quoted literals and comments.

mod scanner;
mod span;
mod token;

pub use scanner::Scanner;
pub use span::Span;
pub use token::{Token, TokenKind};
