// Enforce at crate level
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! Mailing-list archive normalization
//!
//! Turns mbox mailing lists, whose messages each carry their own set of
//! headers, into rectangular tables with aligned columns and parsed dates,
//! and merges several lists into one archive table.
//!
//! # Pipeline
//!
//! - [`extract_record`] flattens one message into lowercase fields
//! - [`normalize_list`] builds one table per list, padding absent headers
//!   with [`Value::Null`]
//! - [`coerce_dates`] filters and parses the `date` column
//! - [`merge_lists`] folds lists into one table tagged with `mailing-list`
//! - [`ArchiveTable`] combines the above and indexes rows by `message-id`
//!
//! The crate logs through `tracing` and never installs a subscriber.
//!
//! # Example
//!
//! ```rust
//! use mailing_archive::{MailingList, Message, merge_lists};
//!
//! let a = MailingList::new("A", vec![
//!     Message::new()
//!         .with_header("Message-ID", "<m1@example.org>")
//!         .with_header("Subject", "hello"),
//! ]);
//! let b = MailingList::new("B", vec![
//!     Message::new()
//!         .with_header("Message-ID", "<m2@example.org>")
//!         .with_header("From", "f2@example.org"),
//! ]);
//!
//! let merged = merge_lists(&[a, b], false).unwrap();
//! assert_eq!(merged.total_rows, 2);
//! assert!(merged.table.get(0, "from").unwrap().is_null());
//! ```

mod archive;
mod config;
mod dates;
mod error;
mod extract;
mod mbox;
mod merge;
mod normalize;
mod table;
mod types;

pub use archive::{ArchiveTable, MESSAGE_ID};
pub use config::{DateFailurePolicy, IngestOptions};
pub use dates::{
    DATE, DATE_FORMAT, coerce_dates, coerce_dates_keep_rows, date_mask, parse_header_date,
    passes_filter,
};
pub use error::{IngestError, Result};
pub use extract::{BODY, extract_record};
pub use mbox::{
    WriteReport, parse_mbox, read_mbox, write_archive, write_list, write_mbox, write_table,
};
pub use merge::{ArchiveAccumulator, MAILING_LIST, MergedArchive, merge_lists};
pub use normalize::{list_to_table, normalize_list};
pub use table::Table;
pub use types::*;
