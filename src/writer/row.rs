use std::collections::HashMap;

use rusqlite::types::{ToSqlOutput, Value, ValueRef};
use rusqlite::ToSql;

use crate::error::{Result, SeedError};
use crate::schema::TableSchema;

/// A single column value ready for binding
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl SqlValue {
    /// Encode a boolean for a flag column: `'t'` when set, NULL otherwise
    pub fn flag(set: bool) -> Self {
        if set {
            SqlValue::Text("t".to_string())
        } else {
            SqlValue::Null
        }
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            SqlValue::Null => ToSqlOutput::Owned(Value::Null),
            SqlValue::Integer(i) => ToSqlOutput::Owned(Value::Integer(*i)),
            SqlValue::Real(f) => ToSqlOutput::Owned(Value::Real(*f)),
            SqlValue::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
        })
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Integer(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Integer(v.into())
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Real(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<&String> for SqlValue {
    fn from(v: &String) -> Self {
        SqlValue::Text(v.clone())
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(SqlValue::Null)
    }
}

/// A row keyed by column name
#[derive(Debug, Default, Clone)]
pub struct Row {
    values: HashMap<&'static str, SqlValue>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, column: &'static str, value: impl Into<SqlValue>) -> Self {
        self.values.insert(column, value.into());
        self
    }

    /// Lay the row out in the schema's column order. Columns the row does not
    /// set are bound as NULL; a column the schema does not declare is an error.
    pub fn to_params(&self, schema: &TableSchema) -> Result<Vec<SqlValue>> {
        if let Some(unknown) = self
            .values
            .keys()
            .find(|name| schema.column_index(name).is_none())
        {
            return Err(SeedError::UnknownColumn {
                table: schema.name.to_string(),
                column: unknown.to_string(),
            });
        }

        Ok(schema
            .columns
            .iter()
            .map(|col| self.values.get(col.name).cloned().unwrap_or(SqlValue::Null))
            .collect())
    }
}
