#![allow(dead_code)]

use oxide_rewrite::{
    Attributes, ParameterName, ParseError, ParsedStatement, ParserStyle, RewriteError, Rewriter,
    scan,
};

pub fn parse(sql: &str) -> ParsedStatement {
    scan(sql, ParserStyle::Colon).unwrap_or_else(|e| panic!("Failed to scan: {sql}\nError: {e:?}"))
}

pub fn parse_hash(sql: &str) -> ParsedStatement {
    scan(sql, ParserStyle::Hash).unwrap_or_else(|e| panic!("Failed to scan: {sql}\nError: {e:?}"))
}

pub fn parse_err(sql: &str) -> ParseError {
    scan(sql, ParserStyle::Colon).expect_err(&format!("Expected scan error for: {sql:?}"))
}

pub fn attributes(pairs: &[(&str, &str)]) -> Attributes {
    pairs.iter().copied().collect()
}

pub fn rewrite(sql: &str, pairs: &[(&str, &str)]) -> Result<ParsedStatement, RewriteError> {
    Rewriter::new(ParserStyle::Colon)
        .rewrite(sql, &attributes(pairs))
        .map(|parsed| (*parsed).clone())
}

pub fn named(names: &[&str]) -> Vec<ParameterName> {
    names
        .iter()
        .map(|name| ParameterName::Named(String::from(*name)))
        .collect()
}

/// Asserts the statement rewrites to `expected` with the given named
/// parameters.
pub fn assert_rewrites(sql: &str, expected: &str, names: &[&str]) {
    let parsed = parse(sql);
    assert_eq!(parsed.sql(), expected, "Rewritten SQL for {sql:?}");
    assert_eq!(parsed.parameters(), named(names).as_slice(), "Parameters for {sql:?}");
}

/// Asserts the statement is copied through untouched with no parameters.
pub fn assert_literal(sql: &str) {
    assert_rewrites(sql, sql, &[]);
}
