//! Reconstructed chat messages.
//!
//! A [`Message`] is one record produced by the reconstructor for a chat
//! export: either a properly attributed message (speaker and timestamp set)
//! or an excluded row carrying an [`ExceptionKind`] that explains why it
//! cannot take part in turn grouping.
//!
//! # Examples
//!
//! ```
//! use echolalia::{ExceptionKind, Message};
//! use chrono::{TimeZone, Utc};
//!
//! let ts = Utc.with_ymd_and_hms(2024, 1, 2, 15, 4, 5).unwrap();
//! let msg = Message::new("Alice", ts, "Hello there");
//! assert!(msg.is_usable());
//!
//! let orphan = Message::excluded("stray line", 1, ExceptionKind::ContextlessMessage);
//! assert!(!orphan.is_usable());
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Why a message row was excluded from grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExceptionKind {
    /// A continuation line seen before any header established who is talking.
    ContextlessMessage,
    /// Sanitization reduced the message to nothing.
    EmptyContent,
}

impl ExceptionKind {
    /// Returns all exception kinds.
    pub fn all() -> &'static [ExceptionKind] {
        &[ExceptionKind::ContextlessMessage, ExceptionKind::EmptyContent]
    }
}

impl fmt::Display for ExceptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExceptionKind::ContextlessMessage => write!(f, "Contextless message"),
            ExceptionKind::EmptyContent => write!(f, "No content to message"),
        }
    }
}

/// One reconstructed row of a chat export.
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | `timestamp` | `Option<DateTime<Utc>>` | Parsed header time, carried to continuations |
/// | `speaker` | `Option<String>` | Parsed header speaker, carried to continuations |
/// | `text` | `String` | Sanitized message text |
/// | `raw_line` | `String` | Source text this row was built from |
/// | `line_number` | `usize` | 1-based line the row starts on |
/// | `exception` | `Option<ExceptionKind>` | Why the row is excluded, if it is |
///
/// Every message either has an exception or has both speaker and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// When the message was sent, as written in the header.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,

    /// Who sent the message.
    #[serde(default)]
    pub speaker: Option<String>,

    /// Sanitized text content.
    pub text: String,

    /// The unmodified source text (multiple lines joined with `\n` when a
    /// message spans several lines).
    pub raw_line: String,

    /// 1-based line number the message starts on.
    #[serde(default)]
    pub line_number: usize,

    /// Set when the row must not take part in grouping.
    #[serde(default)]
    pub exception: Option<ExceptionKind>,
}

impl Message {
    /// Creates an attributed message whose raw line equals its text.
    pub fn new(speaker: impl Into<String>, timestamp: DateTime<Utc>, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            timestamp: Some(timestamp),
            speaker: Some(speaker.into()),
            raw_line: text.clone(),
            text,
            line_number: 0,
            exception: None,
        }
    }

    /// Creates an excluded row with no attribution.
    pub fn excluded(raw_line: impl Into<String>, line_number: usize, exception: ExceptionKind) -> Self {
        Self {
            timestamp: None,
            speaker: None,
            text: String::new(),
            raw_line: raw_line.into(),
            line_number,
            exception: Some(exception),
        }
    }

    /// Builder method to set the raw source text.
    #[must_use]
    pub fn with_raw_line(mut self, raw_line: impl Into<String>) -> Self {
        self.raw_line = raw_line.into();
        self
    }

    /// Builder method to set the source line number.
    #[must_use]
    pub fn with_line_number(mut self, line_number: usize) -> Self {
        self.line_number = line_number;
        self
    }

    /// Builder method to set the exception.
    #[must_use]
    pub fn with_exception(mut self, exception: ExceptionKind) -> Self {
        self.exception = Some(exception);
        self
    }

    /// Returns the speaker, if attributed.
    pub fn speaker(&self) -> Option<&str> {
        self.speaker.as_deref()
    }

    /// Returns the timestamp, if attributed.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    /// Returns the sanitized text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns `true` if the message can take part in turn grouping.
    pub fn is_usable(&self) -> bool {
        self.exception.is_none() && self.speaker.is_some() && self.timestamp.is_some()
    }

    /// Tags the message as [`ExceptionKind::EmptyContent`] when its text is blank.
    ///
    /// An empty message is reported as empty even if it was already tagged
    /// contextless.
    pub(crate) fn mark_if_empty(&mut self) {
        if self.text.trim().is_empty() {
            self.exception = Some(ExceptionKind::EmptyContent);
        }
    }
}
