//! iMessage line classification.
//!
//! Targets the TXT output of `imessage-exporter`, where a message is a bare
//! timestamp line, a speaker line, then any number of body lines:
//!
//! ```text
//! Jan 02, 2024  3:04:05 PM
//! Alice
//! Hello there
//!
//! Jan 02, 2024  3:04:30 PM (Read by you after 1 minute)
//! Me
//! Hi!
//! ```
//!
//! The timestamp may be followed by read-receipt annotations, which are
//! ignored.

use std::borrow::Cow;

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;

use crate::error::EcholaliaError;

use super::{ClassifiedLine, LineClass, RawLine};

const TIMESTAMP_PATTERN: &str =
    r"([A-Za-z]{3}) (\d{1,2}), (\d{4})\s+(\d{1,2}:\d{2}:\d{2})\s?([AaPp][Mm])";

/// Parses the parts of an iMessage timestamp (`Jan 02, 2024  3:04:05 PM`).
pub fn parse_imessage_timestamp(
    month: &str,
    day: &str,
    year: &str,
    time: &str,
    meridiem: &str,
) -> Option<DateTime<Utc>> {
    let datetime_str = format!("{month} {day}, {year} {time} {meridiem}");
    NaiveDateTime::parse_from_str(&datetime_str, "%b %d, %Y %I:%M:%S %p")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Line classifier for imessage-exporter TXT files.
#[derive(Debug, Clone)]
pub struct IMessageClassifier {
    regex: Regex,
}

impl IMessageClassifier {
    /// Builds the classifier.
    pub fn new() -> Result<Self, EcholaliaError> {
        let regex = Regex::new(TIMESTAMP_PATTERN)
            .map_err(|e| EcholaliaError::invalid_format("iMessage", e.to_string()))?;
        Ok(Self { regex })
    }

    /// Returns the timestamp found on a line, if the line is a timestamp line.
    pub fn timestamp(&self, line: &str) -> Option<DateTime<Utc>> {
        let caps = self.regex.captures(line)?;
        parse_imessage_timestamp(
            caps.get(1).map_or("", |m| m.as_str()),
            caps.get(2).map_or("", |m| m.as_str()),
            caps.get(3).map_or("", |m| m.as_str()),
            caps.get(4).map_or("", |m| m.as_str()),
            caps.get(5).map_or("", |m| m.as_str()),
        )
    }

    /// Classifies every line of a document.
    ///
    /// A timestamp line takes the following line as its speaker. When that
    /// line is missing, blank, or itself a timestamp line, the header cannot
    /// be attributed and is reported as [`LineClass::Unrecognized`].
    pub fn classify_document<'a>(&self, content: &'a str) -> Vec<ClassifiedLine<'a>> {
        let mut lines = super::raw_lines(content).peekable();
        let mut classified = Vec::new();

        while let Some(line) = lines.next() {
            let Some(timestamp) = self.timestamp(line.text) else {
                classified.push(ClassifiedLine::single(line, LineClass::Continuation(line.text)));
                continue;
            };

            let speaker_line = lines
                .next_if(|next| !next.text.trim().is_empty() && self.timestamp(next.text).is_none());

            match speaker_line {
                Some(speaker) => classified.push(header(line, speaker, timestamp)),
                None => {
                    tracing::debug!(line = line.number, "timestamp line without a speaker");
                    classified.push(ClassifiedLine::single(line, LineClass::Unrecognized));
                }
            }
        }

        classified
    }
}

fn header<'a>(line: RawLine<'a>, speaker: RawLine<'a>, timestamp: DateTime<Utc>) -> ClassifiedLine<'a> {
    ClassifiedLine {
        number: line.number,
        raw: Cow::Owned(format!("{}\n{}", line.text, speaker.text)),
        class: LineClass::Header {
            speaker: speaker.text.trim(),
            timestamp,
            text: "",
        },
    }
}
