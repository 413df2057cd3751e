//! Turn one mailing list into a table

use crate::config::IngestOptions;
use crate::dates::{coerce_dates, coerce_dates_keep_rows};
use crate::error::Result;
use crate::extract::{BODY, extract_record};
use crate::table::Table;
use crate::types::{Message, Value};
use std::collections::HashMap;
use tracing::debug;

/// Normalize messages into a table with one row per message
///
/// Columns are the union of every lowercased header seen across the whole
/// sequence. A column first seen at row `k` holds the null marker for rows
/// `0..k`, and any later row without that header is null as well. With
/// `include_body` a `body` column is filled from a second pass over the
/// messages.
pub fn normalize_list(messages: &[Message], include_body: bool) -> Result<Table> {
    let rows = messages.len();
    let mut columns: Vec<(String, Vec<Value>)> = Vec::new();
    let mut known: HashMap<String, usize> = HashMap::new();

    for (row, message) in messages.iter().enumerate() {
        for (key, value) in extract_record(message, false) {
            let slot = match known.get(&key) {
                Some(&slot) => slot,
                None => {
                    known.insert(key.clone(), columns.len());
                    columns.push((key, vec![Value::Null; rows]));
                    columns.len() - 1
                }
            };
            columns[slot].1[row] = Value::Text(value);
        }
    }

    if include_body {
        let body: Vec<Value> = messages
            .iter()
            .map(|m| Value::Text(m.body().to_string()))
            .collect();
        match known.get(BODY) {
            Some(&slot) => columns[slot].1 = body,
            None => columns.push((BODY.to_string(), body)),
        }
    }

    let table = Table::from_columns(rows, columns)?;
    debug!(rows, columns = table.width(), "Normalized list");
    Ok(table)
}

/// Normalize a list and coerce its `date` column
///
/// With `filter_undated` set, rows without a parseable date are dropped.
pub fn list_to_table(messages: &[Message], options: &IngestOptions) -> Result<Table> {
    let table = normalize_list(messages, options.include_body)?;
    if options.filter_undated {
        coerce_dates(table, options.date_failure)
    } else {
        coerce_dates_keep_rows(table, options.date_failure)
    }
}
