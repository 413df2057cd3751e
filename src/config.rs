//! Ingestion options

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// What to do with a row whose date passes the length filter but not the parse
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DateFailurePolicy {
    /// Fail the whole call
    #[default]
    Abort,

    /// Log the row and leave it out (or leave its raw value when rows are kept)
    SkipRow,
}

/// Options for turning lists and archives into tables
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IngestOptions {
    /// Add a `body` column with each message payload
    pub include_body: bool,

    /// Handling of dates that fail the strict parse
    pub date_failure: DateFailurePolicy,

    /// Drop rows without a usable date instead of keeping them uncoerced
    pub filter_undated: bool,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            include_body: true,
            date_failure: DateFailurePolicy::Abort,
            filter_undated: true,
        }
    }
}

impl IngestOptions {
    /// Load options from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
