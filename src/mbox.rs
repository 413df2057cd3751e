//! Reading and writing mbox files
//!
//! Messages are separated by lines starting with `From `. Body lines that
//! would look like a separator are escaped with a leading `>` on write and
//! unescaped on read (mboxrd quoting).

use crate::error::Result;
use crate::table::Table;
use crate::types::{MailingList, Message};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use regex::bytes::Regex;
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

static SEPARATOR: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"(?m)^From [^\n]*(?:\n|\z)").unwrap());

static QUOTED_FROM: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"(?m)^>(>*From )").unwrap());

static FROM_LINE: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"(?m)^(>*From )").unwrap());

const UNKNOWN_SENDER: &str = "MAILER-DAEMON";

/// Outcome of writing one mbox file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReport {
    /// File that was written
    pub path: PathBuf,

    /// Messages appended
    pub written: usize,

    /// Messages that could not be rendered and were left out
    pub skipped: usize,
}

/// Split mbox data into messages
///
/// Anything before the first separator line is ignored.
pub fn parse_mbox(data: &[u8]) -> Result<Vec<Message>> {
    let separators: Vec<(usize, usize)> = SEPARATOR
        .find_iter(data)
        .map(|m| (m.start(), m.end()))
        .collect();

    if let Some(&(first, _)) = separators.first()
        && data[..first].iter().any(|b| !b.is_ascii_whitespace())
    {
        debug!(bytes = first, "Ignoring data before first separator");
    }

    let mut messages = Vec::with_capacity(separators.len());
    for (i, &(_, start)) in separators.iter().enumerate() {
        let end = separators.get(i + 1).map_or(data.len(), |&(next, _)| next);
        let chunk = trim_entry(&data[start..end]);
        let unquoted = QUOTED_FROM.replace_all(chunk, &b"${1}"[..]);
        messages.push(Message::parse(&unquoted)?);
    }

    Ok(messages)
}

/// Read every message of an mbox file, in file order
pub fn read_mbox(path: impl AsRef<Path>) -> Result<Vec<Message>> {
    let path = path.as_ref();
    let data = fs::read(path)?;
    let messages = parse_mbox(&data)?;
    debug!(path = %path.display(), messages = messages.len(), "Read mbox");
    Ok(messages)
}

impl MailingList {
    /// Load a list from an mbox file
    pub fn from_mbox(name: impl Into<String>, path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(name, read_mbox(path)?))
    }
}

/// Write messages to `path`, replacing any existing file
///
/// The file is held under an exclusive lock while messages are appended and
/// released after the final flush. A message that cannot be rendered is
/// logged and skipped; the rest of the batch is still written. I/O errors
/// abort the write.
pub fn write_mbox(messages: &[Message], path: impl AsRef<Path>) -> Result<WriteReport> {
    let path = path.as_ref();
    if path.is_file() {
        fs::remove_file(path)?;
    }

    let file = OpenOptions::new().write(true).create_new(true).open(path)?;
    FileExt::lock_exclusive(&file)?;
    let mut out = BufWriter::new(file);
    let mut report = WriteReport {
        path: path.to_path_buf(),
        written: 0,
        skipped: 0,
    };

    for message in messages {
        match render_entry(message) {
            Ok(entry) => {
                out.write_all(&entry)?;
                report.written += 1;
            }
            Err(e) => {
                warn!(id = message.identity(), error = %e, "Skipping message in mbox write");
                report.skipped += 1;
            }
        }
    }

    out.flush()?;
    FileExt::unlock(out.get_ref())?;
    Ok(report)
}

/// Write a list to `<dir>/<name>.mbox`
pub fn write_list(list: &MailingList, dir: impl AsRef<Path>) -> Result<WriteReport> {
    let path = dir.as_ref().join(format!("{}.mbox", list.name));
    let report = write_mbox(&list.messages, &path)?;
    info!(
        list = %list.name,
        path = %report.path.display(),
        written = report.written,
        skipped = report.skipped,
        "Saved mailing list"
    );
    Ok(report)
}

/// Write each list of an archive to its own file under `dir`
pub fn write_archive(lists: &[MailingList], dir: impl AsRef<Path>) -> Result<Vec<WriteReport>> {
    let dir = dir.as_ref();
    lists.iter().map(|list| write_list(list, dir)).collect()
}

/// Write one message per table row
pub fn write_table(table: &Table, path: impl AsRef<Path>) -> Result<WriteReport> {
    let messages: Vec<Message> = (0..table.len())
        .filter_map(|row| table.row_to_message(row))
        .collect();
    write_mbox(&messages, path)
}

fn render_entry(message: &Message) -> Result<Vec<u8>> {
    let raw = message.to_bytes()?;

    let mut entry = format!(
        "From {} {}\n",
        envelope_sender(message),
        envelope_date(message).format("%a %b %e %H:%M:%S %Y")
    )
    .into_bytes();
    entry.extend_from_slice(&FROM_LINE.replace_all(&raw, &b">${1}"[..]));
    if !entry.ends_with(b"\n") {
        entry.push(b'\n');
    }
    entry.push(b'\n');

    Ok(entry)
}

fn envelope_sender(message: &Message) -> String {
    message
        .header("from")
        .and_then(|from| mailparse::addrparse(from).ok())
        .and_then(|list| list.extract_single_info())
        .map(|info| info.addr)
        .filter(|addr| !addr.is_empty() && !addr.contains(char::is_whitespace))
        .unwrap_or_else(|| UNKNOWN_SENDER.to_string())
}

fn envelope_date(message: &Message) -> DateTime<Utc> {
    message
        .header("date")
        .and_then(|date| mailparse::dateparse(date).ok())
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
        .unwrap_or_else(Utc::now)
}

/// Drop the blank line that separates an entry from the next separator
fn trim_entry(chunk: &[u8]) -> &[u8] {
    if chunk.ends_with(b"\r\n\r\n") {
        &chunk[..chunk.len() - 2]
    } else if chunk.ends_with(b"\n\n") {
        &chunk[..chunk.len() - 1]
    } else {
        chunk
    }
}
