//! Combined archive table keyed by `message-id`

use crate::config::IngestOptions;
use crate::dates::{coerce_dates, coerce_dates_keep_rows};
use crate::error::{IngestError, Result};
use crate::merge::merge_lists;
use crate::table::Table;
use crate::types::{MailingList, Value};
use std::collections::HashMap;
use tracing::debug;

/// Column used as the archive key
pub const MESSAGE_ID: &str = "message-id";

/// Merged, date-coerced archive table with a `message-id` index
///
/// The key is not unique: the same id may appear on several rows, within
/// one list or across lists, and every such row is kept.
#[derive(Debug, Clone)]
pub struct ArchiveTable {
    table: Table,
    by_message_id: HashMap<String, Vec<usize>>,
    merged_rows: usize,
}

impl ArchiveTable {
    /// Merge lists, coerce dates and index rows by `message-id`
    pub fn from_lists(lists: &[MailingList], options: &IngestOptions) -> Result<Self> {
        let merged = merge_lists(lists, options.include_body)?;
        let merged_rows = merged.total_rows;

        let table = if options.filter_undated {
            coerce_dates(merged.table, options.date_failure)?
        } else {
            coerce_dates_keep_rows(merged.table, options.date_failure)?
        };

        Self::from_table(table, merged_rows)
    }

    fn from_table(table: Table, merged_rows: usize) -> Result<Self> {
        let mut by_message_id: HashMap<String, Vec<usize>> = HashMap::new();

        match table.column(MESSAGE_ID) {
            Some(ids) => {
                for (row, id) in ids.iter().enumerate() {
                    if let Value::Text(id) = id {
                        by_message_id.entry(id.clone()).or_default().push(row);
                    }
                }
            }
            None if table.is_empty() => {}
            None => return Err(IngestError::MissingColumn(MESSAGE_ID.to_string())),
        }

        debug!(
            rows = table.len(),
            merged_rows,
            ids = by_message_id.len(),
            "Built archive table"
        );

        Ok(Self {
            table,
            by_message_id,
            merged_rows,
        })
    }

    #[must_use]
    pub const fn table(&self) -> &Table {
        &self.table
    }

    #[must_use]
    pub fn into_table(self) -> Table {
        self.table
    }

    /// Rows in the final table
    #[must_use]
    pub const fn len(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Rows produced by the merge, before any date filtering
    #[must_use]
    pub const fn merged_rows(&self) -> usize {
        self.merged_rows
    }

    /// Every row carrying `id`, in table order
    #[must_use]
    pub fn rows_for_message_id(&self, id: &str) -> &[usize] {
        self.by_message_id.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Distinct message ids present in the table
    pub fn message_ids(&self) -> impl Iterator<Item = &str> {
        self.by_message_id.keys().map(String::as_str)
    }

    /// Ids that appear on more than one row
    pub fn duplicate_message_ids(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.by_message_id
            .iter()
            .filter(|(_, rows)| rows.len() > 1)
            .map(|(id, rows)| (id.as_str(), rows.as_slice()))
    }
}
