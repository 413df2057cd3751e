//! Fold several mailing lists into one table

use crate::error::Result;
use crate::normalize::normalize_list;
use crate::table::Table;
use crate::types::{MailingList, Value};
use std::collections::HashSet;
use std::iter;
use tracing::debug;

/// Column recording which list each row came from
pub const MAILING_LIST: &str = "mailing-list";

/// Result of merging lists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedArchive {
    /// Merged rows, lists concatenated in input order
    pub table: Table,

    /// Sum of all lists' message counts
    pub total_rows: usize,
}

/// Left-fold accumulator over per-list tables
///
/// After every fold step the table has one column per name seen so far plus
/// `mailing-list`, and every column is exactly as long as the rows folded in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveAccumulator {
    table: Table,
    lists: usize,
}

impl ArchiveAccumulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one list's table in under `name`
    ///
    /// New columns are back-filled with nulls for rows already folded,
    /// columns this list lacks are padded with nulls for its rows, and
    /// `mailing-list` is extended with `name`. A `mailing-list` header in
    /// the list's own table is ignored in favor of the provenance column.
    pub fn fold(mut self, name: &str, list_table: Table) -> Result<Self> {
        let before = self.table.len();
        let added = list_table.len();
        let total = before + added;

        let mut present = HashSet::new();
        for (column, values) in list_table.into_columns() {
            if column == MAILING_LIST {
                debug!(list = name, "Ignoring mailing-list header column");
                continue;
            }
            self.table.column_entry(&column, before).extend(values);
            present.insert(column);
        }

        for (column, values) in self.table.columns_mut() {
            if column != MAILING_LIST && !present.contains(column) {
                values.extend(iter::repeat_n(Value::Null, added));
            }
        }

        self.table
            .column_entry(MAILING_LIST, before)
            .extend(iter::repeat_n(Value::Text(name.to_string()), added));

        self.table.set_len(total);
        self.table.validate()?;
        self.lists += 1;

        debug!(
            list = name,
            rows = added,
            total,
            columns = self.table.width(),
            "Folded list into archive"
        );
        Ok(self)
    }

    /// Normalize a list and fold it in
    pub fn fold_list(self, list: &MailingList, include_body: bool) -> Result<Self> {
        let list_table = normalize_list(&list.messages, include_body)?;
        self.fold(&list.name, list_table)
    }

    /// Rows folded in so far
    #[must_use]
    pub const fn len(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Number of lists folded in so far
    #[must_use]
    pub const fn lists(&self) -> usize {
        self.lists
    }

    #[must_use]
    pub const fn table(&self) -> &Table {
        &self.table
    }

    #[must_use]
    pub fn finish(self) -> MergedArchive {
        MergedArchive {
            total_rows: self.table.len(),
            table: self.table,
        }
    }
}

/// Merge lists left to right into one table tagged with `mailing-list`
pub fn merge_lists(lists: &[MailingList], include_body: bool) -> Result<MergedArchive> {
    let accumulator = lists
        .iter()
        .try_fold(ArchiveAccumulator::new(), |acc, list| {
            acc.fold_list(list, include_body)
        })?;
    Ok(accumulator.finish())
}
