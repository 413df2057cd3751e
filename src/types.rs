//! Core types for messages, mailing lists and table cells

use crate::dates::DATE_FORMAT;
use crate::error::{IngestError, Result};
use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use std::fmt;
use tracing::warn;

/// A single mail message: header pairs in file order plus a body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    headers: Vec<(String, String)>,
    body: String,
}

impl Message {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            headers: Vec::new(),
            body: String::new(),
        }
    }

    /// Parse raw RFC 5322 bytes into a message
    ///
    /// The body is decoded from its transfer encoding. When that fails the
    /// body is kept as the undecoded bytes after the header block.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let parsed = mailparse::parse_mail(raw)
            .map_err(|e| IngestError::MalformedMessage(e.to_string()))?;

        let headers = parsed
            .headers
            .iter()
            .map(|h| (h.get_key(), h.get_value()))
            .collect();

        let body = match parsed.get_body() {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "Body could not be decoded, keeping it undecoded");
                let (_, offset) = mailparse::parse_headers(raw)
                    .map_err(|e| IngestError::MalformedMessage(e.to_string()))?;
                String::from_utf8_lossy(&raw[offset..]).into_owned()
            }
        };

        Ok(Self { headers, body })
    }

    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Header pairs in the order they were stored, original casing kept
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Case-insensitive header lookup; the last occurrence wins
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .rev()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Best identifier for log lines: `Archived-At`, then `Message-ID`
    #[must_use]
    pub fn identity(&self) -> &str {
        self.header("archived-at")
            .or_else(|| self.header("message-id"))
            .unwrap_or("<unknown>")
    }

    /// Render the message back to RFC 5322 text with `\n` line endings
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = String::new();

        for (key, value) in &self.headers {
            if key.is_empty() || !key.bytes().all(|b| b.is_ascii_graphic() && b != b':') {
                return Err(IngestError::MalformedMessage(format!(
                    "invalid header name {key:?}"
                )));
            }
            if value.contains(['\r', '\n']) {
                return Err(IngestError::MalformedMessage(format!(
                    "line break in {key} header"
                )));
            }
            out.push_str(key);
            out.push_str(": ");
            out.push_str(value);
            out.push('\n');
        }

        out.push('\n');
        out.push_str(&self.body);

        Ok(out.into_bytes())
    }
}

/// A named mailing list and its messages in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MailingList {
    /// List identifier, e.g. `3GPP_TSG_SA_WG2`
    pub name: String,

    /// Messages in insertion order, not deduplicated
    pub messages: Vec<Message>,
}

impl MailingList {
    pub fn new(name: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            name: name.into(),
            messages,
        }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }
}

impl<'a> IntoIterator for &'a MailingList {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

/// One table cell
///
/// `Null` marks a column that does not apply to a row. It is distinct from
/// `Text(String::new())`, which is a field that was present but empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Text(String),
    Date(DateTime<FixedOffset>),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_date(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            Self::Date(dt) => Some(dt),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Human-readable cell text; lossy, since `Null` prints as `<null>` just like
/// a text cell holding `<null>`. Use [`Value::is_null`] to tell them apart.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "<null>"),
            Self::Text(s) => write!(f, "{s}"),
            Self::Date(dt) => write!(f, "{}", dt.format(DATE_FORMAT)),
        }
    }
}

/// Flat view of one message: lowercase field name to value
///
/// Fields keep the position they were first seen at; a later write to the
/// same field replaces the value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn insert(&mut self, key: String, value: String) {
        if let Some(slot) = self.fields.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.fields.push((key, value));
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl IntoIterator for Record {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}
