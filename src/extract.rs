//! Flatten one message into a record

use crate::types::{Message, Record};

/// Field holding the message payload
pub const BODY: &str = "body";

/// Extract a record from a message
///
/// Header names are lowercased, so `Subject` and `SUBJECT` land in the same
/// field and the later header wins. The payload is stored under `body`
/// only when `include_body` is set; an empty payload stays an empty string.
#[must_use]
pub fn extract_record(message: &Message, include_body: bool) -> Record {
    let mut record = Record::default();

    for (key, value) in message.headers() {
        record.insert(key.to_lowercase(), value.clone());
    }

    if include_body {
        record.insert(BODY.to_string(), message.body().to_string());
    }

    record
}
