//! Bound arguments and their resolution against parsed statements.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::BindError;
use crate::statement::{ParameterName, ParsedStatement};

/// A SQL value bound to a statement parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    /// NULL value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Binary blob value.
    Blob(Vec<u8>),
}

impl SqlValue {
    /// Returns the SQL representation for inline use (escaped).
    ///
    /// Meant for diagnostics; bind the value instead of splicing this into SQL.
    #[must_use]
    pub fn to_sql_inline(&self) -> String {
        match self {
            Self::Null => String::from("NULL"),
            Self::Bool(true) => String::from("TRUE"),
            Self::Bool(false) => String::from("FALSE"),
            Self::Int(n) => n.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) => format!("'{}'", s.replace('\'', "''")),
            Self::Blob(b) => {
                let hex: String = b.iter().map(|byte| format!("{byte:02X}")).collect();
                format!("X'{hex}'")
            }
        }
    }
}

/// Trait for types that can be converted to SQL values.
pub trait ToSqlValue {
    /// Converts the value to a `SqlValue`.
    fn to_sql_value(self) -> SqlValue;
}

impl ToSqlValue for SqlValue {
    fn to_sql_value(self) -> SqlValue {
        self
    }
}

impl ToSqlValue for bool {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Bool(self)
    }
}

impl ToSqlValue for i64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(self)
    }
}

impl ToSqlValue for i32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl ToSqlValue for u32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl ToSqlValue for f64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(self)
    }
}

impl ToSqlValue for String {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(self)
    }
}

impl ToSqlValue for &str {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(String::from(self))
    }
}

impl<T: ToSqlValue> ToSqlValue for Option<T> {
    fn to_sql_value(self) -> SqlValue {
        self.map_or(SqlValue::Null, ToSqlValue::to_sql_value)
    }
}

impl ToSqlValue for Vec<u8> {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Blob(self)
    }
}

/// Arguments supplied for a statement, by position and by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Binding {
    positional: Vec<SqlValue>,
    named: HashMap<String, SqlValue>,
}

impl Binding {
    /// Creates an empty binding.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a positional argument.
    #[must_use]
    pub fn add<T: ToSqlValue>(mut self, value: T) -> Self {
        self.positional.push(value.to_sql_value());
        self
    }

    /// Binds a named argument, replacing any earlier value for `name`.
    #[must_use]
    pub fn add_named<T: ToSqlValue>(mut self, name: impl Into<String>, value: T) -> Self {
        self.named.insert(name.into(), value.to_sql_value());
        self
    }

    /// Returns the positional argument for a 0-based slot.
    #[must_use]
    pub fn for_position(&self, position: usize) -> Option<&SqlValue> {
        self.positional.get(position)
    }

    /// Returns the argument bound to `name`.
    #[must_use]
    pub fn for_name(&self, name: &str) -> Option<&SqlValue> {
        self.named.get(name)
    }

    /// Returns true if no argument has been bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }

    /// Resolves one value per bind slot of `statement`, in order.
    ///
    /// A named slot uses the argument bound to its name, falling back to the
    /// positional argument at the same slot.
    ///
    /// # Errors
    ///
    /// Returns a [`BindError`] for the first slot no argument fills.
    pub fn resolve(&self, statement: &ParsedStatement) -> Result<Vec<SqlValue>, BindError> {
        statement
            .parameters()
            .iter()
            .enumerate()
            .map(|(position, parameter)| {
                let value = match parameter {
                    ParameterName::Named(name) => self
                        .for_name(name)
                        .or_else(|| self.for_position(position))
                        .ok_or_else(|| BindError::MissingNamed {
                            name: name.clone(),
                            position,
                        }),
                    ParameterName::Positional(_) => self
                        .for_position(position)
                        .ok_or(BindError::MissingPositional { position }),
                };
                value.cloned()
            })
            .collect()
    }
}
