//! Attribute substitution, parameter scanning and the rewrite cache.

use std::sync::Arc;

use dashmap::DashMap;
use serde::Deserialize;
use tracing::{debug, trace};

use crate::attributes::{Attributes, substitute};
use crate::error::Result;
use crate::statement::{ParsedStatement, StatementScanner};
use crate::style::ParserStyle;

/// Rewriter settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RewriterConfig {
    /// Named-parameter prefix style.
    pub style: ParserStyle,
    /// Whether attribute-free templates are cached.
    pub cache: bool,
}

impl Default for RewriterConfig {
    fn default() -> Self {
        Self {
            style: ParserStyle::Colon,
            cache: true,
        }
    }
}

/// Parsed statements keyed by their raw template text.
///
/// Entries are never evicted. Concurrent inserts for the same template store
/// equal values, so the last write wins.
#[derive(Debug, Default)]
pub struct RewriteCache {
    entries: DashMap<String, Arc<ParsedStatement>>,
}

impl RewriteCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the statement cached for `sql`.
    #[must_use]
    pub fn get(&self, sql: &str) -> Option<Arc<ParsedStatement>> {
        self.entries.get(sql).map(|entry| Arc::clone(entry.value()))
    }

    /// Caches `statement` for `sql`.
    pub fn insert(&self, sql: impl Into<String>, statement: Arc<ParsedStatement>) {
        self.entries.insert(sql.into(), statement);
    }

    /// Returns the number of cached templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Rewrites statement templates into prepared-statement SQL.
///
/// One rewriter is meant to be shared by every thread preparing statements.
///
/// # Example
///
/// ```rust
/// use oxide_rewrite::{Attributes, ParameterName, ParserStyle, Rewriter};
///
/// let rewriter = Rewriter::new(ParserStyle::Colon);
/// let attributes: Attributes = [("table", "users")].into_iter().collect();
///
/// let parsed = rewriter
///     .rewrite("select * from <table> where id = :id", &attributes)
///     .unwrap();
/// assert_eq!(parsed.sql(), "select * from users where id = ?");
/// assert_eq!(parsed.parameters(), &[ParameterName::Named(String::from("id"))]);
/// ```
#[derive(Debug)]
pub struct Rewriter<S = ParserStyle> {
    style: ParserStyle,
    scanner: S,
    cache: Option<RewriteCache>,
}

impl Rewriter<ParserStyle> {
    /// Creates a caching rewriter for `style`.
    #[must_use]
    pub fn new(style: ParserStyle) -> Self {
        Self::with_scanner(style, style)
    }

    /// Creates a rewriter from `config`.
    #[must_use]
    pub fn from_config(config: &RewriterConfig) -> Self {
        let rewriter = Self::new(config.style);
        if config.cache {
            rewriter
        } else {
            rewriter.without_cache()
        }
    }
}

impl Default for Rewriter<ParserStyle> {
    fn default() -> Self {
        Self::new(ParserStyle::default())
    }
}

impl<S: StatementScanner> Rewriter<S> {
    /// Creates a caching rewriter that recognizes attribute references and
    /// escapes for `style` and scans parameters through `scanner`.
    #[must_use]
    pub fn with_scanner(style: ParserStyle, scanner: S) -> Self {
        Self {
            style,
            scanner,
            cache: Some(RewriteCache::new()),
        }
    }

    /// Disables caching; every call scans its template.
    #[must_use]
    pub fn without_cache(mut self) -> Self {
        self.cache = None;
        self
    }

    /// Returns the parser style.
    #[must_use]
    pub const fn style(&self) -> ParserStyle {
        self.style
    }

    /// Returns the cache, unless caching is disabled.
    #[must_use]
    pub const fn cache(&self) -> Option<&RewriteCache> {
        self.cache.as_ref()
    }

    /// Substitutes `attributes` into `sql` and scans the result.
    ///
    /// Calls with no attributes are cached by the raw template text; calls
    /// with attributes always substitute and scan.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::UndefinedAttribute`](crate::RewriteError::UndefinedAttribute)
    /// for a reference with no value and
    /// [`RewriteError::Parse`](crate::RewriteError::Parse) when scanning fails.
    pub fn rewrite(&self, sql: &str, attributes: &Attributes) -> Result<Arc<ParsedStatement>> {
        let cache = self.cache.as_ref().filter(|_| attributes.is_empty());

        if let Some(hit) = cache.and_then(|cache| cache.get(sql)) {
            trace!(sql = %sql, "Rewrite cache hit");
            return Ok(hit);
        }

        let substituted = substitute(sql, self.style, attributes)?;
        let parsed = Arc::new(self.scanner.scan(&substituted)?);

        if let Some(cache) = cache {
            debug!(
                sql = %sql,
                parameters = parsed.len(),
                "Caching rewritten statement"
            );
            cache.insert(sql, Arc::clone(&parsed));
        }

        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RewriteError;

    #[test]
    fn test_rewrite_caches_attribute_free_templates() {
        let rewriter = Rewriter::new(ParserStyle::Colon);
        let first = rewriter.rewrite("id = :id", &Attributes::new()).unwrap();
        let second = rewriter.rewrite("id = :id", &Attributes::new()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(rewriter.cache().map(RewriteCache::len), Some(1));
    }

    #[test]
    fn test_rewrite_with_attributes_is_not_cached() {
        let rewriter = Rewriter::new(ParserStyle::Colon);
        let attributes: Attributes = [("t", "users")].into_iter().collect();
        let parsed = rewriter.rewrite("select * from <t>", &attributes).unwrap();
        assert_eq!(parsed.sql(), "select * from users");
        assert_eq!(rewriter.cache().map(RewriteCache::len), Some(0));
    }

    #[test]
    fn test_errors_are_not_cached() {
        let rewriter = Rewriter::new(ParserStyle::Colon);
        let err = rewriter.rewrite("from <t>", &Attributes::new()).unwrap_err();
        assert_eq!(
            err,
            RewriteError::UndefinedAttribute {
                key: String::from("t"),
            }
        );
        assert!(rewriter.cache().is_some_and(RewriteCache::is_empty));
    }

    #[test]
    fn test_from_config() {
        let config = RewriterConfig {
            style: ParserStyle::Hash,
            cache: false,
        };
        let rewriter = Rewriter::from_config(&config);
        assert_eq!(rewriter.style(), ParserStyle::Hash);
        assert!(rewriter.cache().is_none());
        let parsed = rewriter.rewrite("id = #id", &Attributes::new()).unwrap();
        assert_eq!(parsed.sql(), "id = ?");
    }

    #[test]
    fn test_config_defaults() {
        let config: RewriterConfig = serde_json::from_str(r#"{"style":"hash"}"#).unwrap();
        assert_eq!(config.style, ParserStyle::Hash);
        assert!(config.cache);
        assert_eq!(
            serde_json::from_str::<RewriterConfig>("{}").unwrap(),
            RewriterConfig::default()
        );
    }
}
