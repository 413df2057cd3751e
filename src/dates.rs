//! Date column coercion
//!
//! Coercion runs in two phases. A cheap syntactic filter keeps rows whose
//! `date` cell is text longer than ten characters. Those rows are then
//! parsed strictly against [`DATE_FORMAT`]; a failure there is reported
//! according to the [`DateFailurePolicy`].

use crate::config::DateFailurePolicy;
use crate::error::{IngestError, Result};
use crate::table::Table;
use crate::types::Value;
use chrono::{DateTime, FixedOffset};
use tracing::{debug, warn};

/// Column holding the `Date` header
pub const DATE: &str = "date";

/// `Mon, 01 Jan 2001 10:00:00 +0000`
pub const DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

/// [`DATE_FORMAT`] after the `<weekday>, ` prefix
const DATE_FORMAT_NO_WEEKDAY: &str = "%d %b %Y %H:%M:%S %z";

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

const MIN_DATE_CHARS: usize = 10;

/// Whether a cell passes the coarse filter
///
/// Cells that already hold a parsed date pass, so coercion can be repeated.
#[must_use]
pub fn passes_filter(value: &Value) -> bool {
    match value {
        Value::Text(raw) => raw.chars().count() > MIN_DATE_CHARS,
        Value::Date(_) => true,
        Value::Null => false,
    }
}

/// Row mask of the coarse filter; all `false` when there is no `date` column
#[must_use]
pub fn date_mask(table: &Table) -> Vec<bool> {
    table.column(DATE).map_or_else(
        || vec![false; table.len()],
        |values| values.iter().map(passes_filter).collect(),
    )
}

/// Strictly parse a `Date` header value
///
/// The weekday must be a valid abbreviation but is not checked against the
/// date, so `Tue, 01 Jan 2001 ...` parses as Monday the first.
pub fn parse_header_date(
    raw: &str,
) -> std::result::Result<DateTime<FixedOffset>, chrono::ParseError> {
    match raw.split_once(',') {
        Some((weekday, rest)) if WEEKDAYS.iter().any(|d| d.eq_ignore_ascii_case(weekday)) => {
            DateTime::parse_from_str(rest.trim_start(), DATE_FORMAT_NO_WEEKDAY)
        }
        // reports the chrono error for the full format
        _ => DateTime::parse_from_str(raw, DATE_FORMAT),
    }
}

/// Keep only rows with a parseable date and replace their text with timestamps
pub fn coerce_dates(mut table: Table, policy: DateFailurePolicy) -> Result<Table> {
    let mut mask = date_mask(&table);

    let undated = mask.iter().filter(|keep| !**keep).count();
    if undated > 0 {
        warn!(undated, "Dropping rows without a usable date");
    }

    if let Some(column) = table.column_mut(DATE) {
        let cells = column
            .iter_mut()
            .enumerate()
            .filter(|(row, _)| mask[*row]);
        for row in parse_cells(cells, policy)? {
            mask[row] = false;
        }
    }

    table.filter_rows(&mask)
}

/// Replace date text with timestamps where the filter passes, keeping every row
///
/// Rows that fail the filter keep their cell as is. Under
/// [`DateFailurePolicy::SkipRow`] a row that fails the parse keeps its raw text.
pub fn coerce_dates_keep_rows(mut table: Table, policy: DateFailurePolicy) -> Result<Table> {
    let mask = date_mask(&table);

    if let Some(column) = table.column_mut(DATE) {
        let cells = column
            .iter_mut()
            .enumerate()
            .filter(|(row, _)| mask[*row]);
        parse_cells(cells, policy)?;
    }

    Ok(table)
}

/// Parse text cells in place; returns the rows that failed under `SkipRow`
fn parse_cells<'a, I>(cells: I, policy: DateFailurePolicy) -> Result<Vec<usize>>
where
    I: Iterator<Item = (usize, &'a mut Value)>,
{
    let mut parsed = 0_usize;
    let mut failed = Vec::new();

    for (row, cell) in cells {
        let Value::Text(raw) = cell else {
            continue;
        };

        match parse_header_date(raw) {
            Ok(dt) => {
                *cell = Value::Date(dt);
                parsed += 1;
            }
            Err(source) => match policy {
                DateFailurePolicy::Abort => {
                    return Err(IngestError::DateParse {
                        row,
                        value: raw.clone(),
                        source,
                    });
                }
                DateFailurePolicy::SkipRow => {
                    warn!(row, value = %raw, error = %source, "Skipping unparseable date");
                    failed.push(row);
                }
            },
        }
    }

    debug!(parsed, failed = failed.len(), "Coerced date column");
    Ok(failed)
}
