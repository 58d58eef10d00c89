//! Shared parsing machinery for all export formats.
//!
//! Parsing a document is split in three steps:
//!
//! 1. A per-format classifier turns each [`RawLine`] into a
//!    [`ClassifiedLine`] tagged with a [`LineClass`].
//! 2. The [`Sanitizer`] cleans message text according to the format's rule
//!    table.
//! 3. The [`Reconstructor`] folds the classified lines into
//!    [`Message`](crate::Message) records, threading the current speaker and
//!    timestamp from line to line.

use std::borrow::Cow;

use chrono::{DateTime, Utc};

pub mod imessage;
pub mod reconstruct;
pub mod sanitize;
pub mod whatsapp;

pub use imessage::{IMessageClassifier, parse_imessage_timestamp};
pub use reconstruct::{ContinuationPolicy, Reconstructor};
pub use sanitize::Sanitizer;
pub use whatsapp::{
    DateFormat as WhatsAppDateFormat, WhatsAppClassifier, detect_whatsapp_format,
    parse_whatsapp_timestamp,
};

/// A single line of source text with its 1-based position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawLine<'a> {
    /// 1-based line number.
    pub number: usize,
    /// Line content without the line terminator.
    pub text: &'a str,
}

/// Splits a document into numbered lines.
///
/// Handles both `\n` and `\r\n` terminators.
pub fn raw_lines(content: &str) -> impl Iterator<Item = RawLine<'_>> {
    content.lines().enumerate().map(|(i, text)| RawLine {
        number: i + 1,
        text,
    })
}

/// What a classifier decided about one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass<'a> {
    /// The line starts a new message.
    Header {
        /// Who sent the message.
        speaker: &'a str,
        /// When it was sent.
        timestamp: DateTime<Utc>,
        /// Message text found on the header line (may be empty).
        text: &'a str,
    },
    /// The line continues whatever message came before it.
    Continuation(&'a str),
    /// The line looks like a header but cannot be attributed to anyone.
    ///
    /// It breaks the running context: lines after it are contextless until
    /// the next header.
    Unrecognized,
}

/// A classified line together with the source text it covers.
///
/// `raw` spans more than one source line when a header consumes a
/// following line (the iMessage speaker line).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine<'a> {
    /// 1-based line number the entry starts on.
    pub number: usize,
    /// Source text covered by this entry.
    pub raw: Cow<'a, str>,
    /// The classification result.
    pub class: LineClass<'a>,
}

impl<'a> ClassifiedLine<'a> {
    /// Classified entry covering exactly one raw line.
    pub fn single(line: RawLine<'a>, class: LineClass<'a>) -> Self {
        Self {
            number: line.number,
            raw: Cow::Borrowed(line.text),
            class,
        }
    }
}
