use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use sqlx::any::AnyRow;
use sqlx::{Column, Row};

use crate::errors::IdentityError;

/// One result row as an ordered column-name to text mapping.
///
/// Column lookups ignore ASCII case, since PostgreSQL folds unquoted identifiers
/// to lower case while SQLite keeps them as declared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DbRow {
    columns: Vec<(String, Option<String>)>,
}

impl DbRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, column: impl Into<String>, value: Option<String>) {
        self.columns.push((column.into(), value));
    }

    /// Value of `column`; `None` when the column is missing or NULL
    pub fn get(&self, column: &str) -> Option<&str> {
        self.find(column).and_then(|(_, v)| v.as_deref())
    }

    pub fn contains(&self, column: &str) -> bool {
        self.find(column).is_some()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.columns.iter().map(|(c, v)| (c.as_str(), v.as_deref()))
    }

    /// Value of the first column, as returned by scalar queries
    pub fn first(&self) -> Option<&str> {
        self.columns.first().and_then(|(_, v)| v.as_deref())
    }

    /// Like [`DbRow::get`], but a column absent from the result set is an error
    pub(crate) fn required(&self, column: &str) -> Result<Option<&str>, IdentityError> {
        self.find(column)
            .map(|(_, v)| v.as_deref())
            .ok_or_else(|| IdentityError::Storage(format!("Column '{column}' missing from row")))
    }

    fn find(&self, column: &str) -> Option<&(String, Option<String>)> {
        self.columns
            .iter()
            .find(|(c, _)| c.eq_ignore_ascii_case(column))
    }

    pub(crate) fn from_any_row(row: &AnyRow) -> Result<Self, IdentityError> {
        let mut db_row = DbRow::new();
        for (index, column) in row.columns().iter().enumerate() {
            let value = decode_as_text(row, index).map_err(|e| {
                IdentityError::Storage(format!(
                    "Failed to read column '{}': {}",
                    column.name(),
                    e
                ))
            })?;
            db_row.push(column.name(), value);
        }
        Ok(db_row)
    }
}

// Drivers report integers, flags and reals with their own types; render all as text.
fn decode_as_text(row: &AnyRow, index: usize) -> Result<Option<String>, sqlx::Error> {
    if let Ok(v) = row.try_get::<Option<String>, _>(index) {
        return Ok(v);
    }
    if let Ok(v) = row.try_get::<Option<i64>, _>(index) {
        return Ok(v.map(|n| n.to_string()));
    }
    if let Ok(v) = row.try_get::<Option<i32>, _>(index) {
        return Ok(v.map(|n| n.to_string()));
    }
    if let Ok(v) = row.try_get::<Option<i16>, _>(index) {
        return Ok(v.map(|n| n.to_string()));
    }
    if let Ok(v) = row.try_get::<Option<bool>, _>(index) {
        return Ok(v.map(|b| if b { "1" } else { "0" }.to_string()));
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(index) {
        return Ok(v.map(|n| n.to_string()));
    }
    row.try_get::<Option<f32>, _>(index)
        .map(|v| v.map(|n| n.to_string()))
}

/// Deterministic mapping from a result row to a typed record.
pub trait FromDbRow: Sized {
    /// Columns the mapping reads, in select-list order
    const COLUMNS: &'static [&'static str];

    fn from_db_row(row: &DbRow) -> Result<Self, IdentityError>;

    /// Comma-separated select list built from [`FromDbRow::COLUMNS`]
    fn select_list() -> String {
        Self::COLUMNS.join(", ")
    }
}

/// Empty text is treated the same as NULL.
pub(crate) fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

/// Flags are stored as integers; only `"1"` means true.
pub(crate) fn parse_flag(value: Option<&str>) -> bool {
    value == Some("1")
}

pub(crate) fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parses RFC 3339, falling back to the `YYYY-MM-DD HH:MM:SS[.fff]` form older rows use.
pub(crate) fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, IdentityError> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| IdentityError::Storage(format!("Invalid timestamp '{value}': {e}")))
}
