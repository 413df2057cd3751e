//! Rectangular, column-aligned table of message fields

use crate::dates::DATE_FORMAT;
use crate::error::{IngestError, Result};
use crate::extract::{BODY, extract_record};
use crate::merge::MAILING_LIST;
use crate::types::{Message, Value};
use std::collections::HashMap;

/// Columns of equal length, one row per message
///
/// Columns keep the order in which they were first seen. Every column must
/// hold exactly [`Table::len`] values; [`Table::validate`] checks this.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Vec<Value>>,
    index: HashMap<String, usize>,
    rows: usize,
}

impl Table {
    /// A table with `rows` rows and no columns yet
    #[must_use]
    pub fn with_rows(rows: usize) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    /// Build a table from named columns and check that every column has `rows` values
    pub fn from_columns<I>(rows: usize, columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, Vec<Value>)>,
    {
        let mut table = Self::with_rows(rows);
        for (name, values) in columns {
            if let Some(&slot) = table.index.get(&name) {
                table.columns[slot] = values;
            } else {
                table.index.insert(name.clone(), table.names.len());
                table.names.push(name);
                table.columns.push(values);
            }
        }
        table.validate()?;
        Ok(table)
    }

    /// One-row table for a single message
    #[must_use]
    pub fn from_message(message: &Message, include_body: bool) -> Self {
        let mut table = Self::with_rows(1);
        for (key, value) in extract_record(message, include_body) {
            table.column_entry(&key, 0).push(Value::Text(value));
        }
        table
    }

    /// Number of rows
    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Number of columns
    #[must_use]
    pub fn width(&self) -> usize {
        self.names.len()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    #[must_use]
    pub fn contains_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.index.get(name).map(|&slot| self.columns[slot].as_slice())
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter().map(Vec::as_slice))
    }

    /// Cell at `row` in column `name`
    #[must_use]
    pub fn get(&self, row: usize, name: &str) -> Option<&Value> {
        self.column(name).and_then(|values| values.get(row))
    }

    /// All cells of one row, in column order
    #[must_use]
    pub fn row(&self, row: usize) -> Option<Vec<(&str, &Value)>> {
        if row >= self.rows {
            return None;
        }
        Some(
            self.names
                .iter()
                .zip(&self.columns)
                .map(|(name, values)| (name.as_str(), &values[row]))
                .collect(),
        )
    }

    /// Check that every column holds exactly `len()` values
    pub fn validate(&self) -> Result<()> {
        for (name, values) in self.names.iter().zip(&self.columns) {
            if values.len() != self.rows {
                return Err(IngestError::SchemaInconsistency {
                    column: name.clone(),
                    expected: self.rows,
                    found: values.len(),
                });
            }
        }
        Ok(())
    }

    /// Keep only the rows whose mask entry is `true`
    pub fn filter_rows(self, mask: &[bool]) -> Result<Self> {
        if mask.len() != self.rows {
            return Err(IngestError::MaskLength {
                expected: self.rows,
                found: mask.len(),
            });
        }

        let rows = mask.iter().filter(|keep| **keep).count();
        let columns = self
            .columns
            .into_iter()
            .map(|values| {
                values
                    .into_iter()
                    .zip(mask)
                    .filter_map(|(value, keep)| keep.then_some(value))
                    .collect()
            })
            .collect();

        let table = Self {
            names: self.names,
            columns,
            index: self.index,
            rows,
        };
        table.validate()?;
        Ok(table)
    }

    /// Rows as JSON objects, one per row, null cells included
    pub fn to_json_rows(&self) -> Result<serde_json::Value> {
        let mut rows = Vec::with_capacity(self.rows);
        for row in 0..self.rows {
            let mut object = serde_json::Map::with_capacity(self.names.len());
            for (name, values) in self.names.iter().zip(&self.columns) {
                object.insert(name.clone(), serde_json::to_value(&values[row])?);
            }
            rows.push(serde_json::Value::Object(object));
        }
        Ok(serde_json::Value::Array(rows))
    }

    /// Rebuild a message from one row
    ///
    /// Non-null cells become headers (dates in [`DATE_FORMAT`]), `body`
    /// becomes the payload and `mailing-list` is dropped. Header names come
    /// back lowercase.
    #[must_use]
    pub fn row_to_message(&self, row: usize) -> Option<Message> {
        let cells = self.row(row)?;
        let mut message = Message::new();
        for (name, value) in cells {
            let text = match value {
                Value::Null => continue,
                Value::Text(s) => s.clone(),
                Value::Date(dt) => dt.format(DATE_FORMAT).to_string(),
            };
            match name {
                BODY => message = message.with_body(text),
                MAILING_LIST => {}
                _ => message = message.with_header(name, text),
            }
        }
        Some(message)
    }

    /// Mutable access to an existing column
    pub(crate) fn column_mut(&mut self, name: &str) -> Option<&mut Vec<Value>> {
        let slot = *self.index.get(name)?;
        Some(&mut self.columns[slot])
    }

    /// Existing column, or a new one back-filled with `backfill` nulls
    pub(crate) fn column_entry(&mut self, name: &str, backfill: usize) -> &mut Vec<Value> {
        let slot = if let Some(&slot) = self.index.get(name) {
            slot
        } else {
            let slot = self.names.len();
            self.index.insert(name.to_string(), slot);
            self.names.push(name.to_string());
            self.columns.push(vec![Value::Null; backfill]);
            slot
        };
        &mut self.columns[slot]
    }

    pub(crate) fn columns_mut(&mut self) -> impl Iterator<Item = (&str, &mut Vec<Value>)> {
        self.names.iter().map(String::as_str).zip(self.columns.iter_mut())
    }

    pub(crate) fn into_columns(self) -> impl Iterator<Item = (String, Vec<Value>)> {
        self.names.into_iter().zip(self.columns)
    }

    pub(crate) const fn set_len(&mut self, rows: usize) {
        self.rows = rows;
    }
}
