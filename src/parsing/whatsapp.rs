//! WhatsApp line classification.
//!
//! A WhatsApp header line carries the timestamp, the speaker and the start
//! of the message:
//!
//! ```text
//! [1/2/24, 3:04:05 PM] Alice: Hello there
//! ```
//!
//! Every line that does not match the header pattern continues the previous
//! message. The speaker is everything up to the first colon after the
//! bracket, so message text may itself contain colons.

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::EcholaliaError;

use super::{ClassifiedLine, LineClass, RawLine};

/// Header layouts seen in WhatsApp exports.
///
/// WhatsApp exports vary by locale and platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateFormat {
    /// US format: M/D/YY or M/D/YYYY with optional AM/PM
    /// Example: [1/15/24, 10:30:45 AM]
    US,
    /// EU format with dots in brackets: DD.MM.YY or DD.MM.YYYY
    /// Example: [15.01.24, 10:30:45]
    EuDotBracketed,
    /// EU format with dots, no brackets: DD.MM.YYYY
    /// Example: 26.10.2025, 20:40 - Sender: Message
    EuDotNoBracket,
    /// EU format with slashes, no brackets: DD/MM/YYYY
    /// Example: 15/01/2024, 10:30 -
    EuSlash,
    /// Bracketed EU with slashes
    /// Example: [15/01/2024, 10:30:45]
    EuSlashBracketed,
}

impl DateFormat {
    /// Returns the header regex for this layout.
    ///
    /// Groups: date, time, speaker, message. Left-to-right marks and a BOM
    /// are tolerated before the header; the space before AM/PM is often a
    /// narrow no-break space (U+202F).
    pub fn pattern(self) -> &'static str {
        match self {
            // [1/15/24, 10:30:45 AM] Sender: Message
            DateFormat::US => {
                r"^[\x{200E}\x{FEFF}]*\[(\d{1,2}/\d{1,2}/\d{2,4}),\s(\d{1,2}:\d{2}(?::\d{2})?(?:[\s\x{202F}]?[APap][Mm])?)\]\s([^:]+):\s?(.*)$"
            }
            // [15.01.24, 10:30:45] Sender: Message
            DateFormat::EuDotBracketed => {
                r"^[\x{200E}\x{FEFF}]*\[(\d{2}\.\d{2}\.\d{2,4}),\s(\d{2}:\d{2}(?::\d{2})?)\]\s([^:]+):\s?(.*)$"
            }
            // 26.10.2025, 20:40 - Sender: Message
            DateFormat::EuDotNoBracket => {
                r"^[\x{200E}\x{FEFF}]*(\d{2}\.\d{2}\.\d{2,4}),\s(\d{2}:\d{2}(?::\d{2})?)\s-\s([^:]+):\s?(.*)$"
            }
            // 15/01/2024, 10:30 - Sender: Message
            DateFormat::EuSlash => {
                r"^[\x{200E}\x{FEFF}]*(\d{2}/\d{2}/\d{2,4}),\s(\d{2}:\d{2}(?::\d{2})?)\s-\s([^:]+):\s?(.*)$"
            }
            // [15/01/2024, 10:30:45] Sender: Message
            DateFormat::EuSlashBracketed => {
                r"^[\x{200E}\x{FEFF}]*\[(\d{2}/\d{2}/\d{2,4}),\s(\d{2}:\d{2}(?::\d{2})?)\]\s([^:]+):\s?(.*)$"
            }
        }
    }

    /// Returns date parsing format strings for chrono.
    pub fn date_parse_formats(self) -> &'static [&'static str] {
        match self {
            DateFormat::US => &[
                "%m/%d/%y, %I:%M:%S %p",
                "%m/%d/%y, %I:%M %p",
                "%m/%d/%Y, %I:%M:%S %p",
                "%m/%d/%Y, %I:%M %p",
                "%m/%d/%y, %H:%M:%S",
                "%m/%d/%y, %H:%M",
                "%m/%d/%Y, %H:%M:%S",
                "%m/%d/%Y, %H:%M",
            ],
            DateFormat::EuDotBracketed | DateFormat::EuDotNoBracket => &[
                "%d.%m.%y, %H:%M:%S",
                "%d.%m.%y, %H:%M",
                "%d.%m.%Y, %H:%M:%S",
                "%d.%m.%Y, %H:%M",
            ],
            DateFormat::EuSlash | DateFormat::EuSlashBracketed => &[
                "%d/%m/%y, %H:%M:%S",
                "%d/%m/%y, %H:%M",
                "%d/%m/%Y, %H:%M:%S",
                "%d/%m/%Y, %H:%M",
            ],
        }
    }

    /// Returns all format variants, in detection priority order.
    ///
    /// `EuSlashBracketed` precedes `US`: a line both accept has zero-padded
    /// day and month and a 24-hour clock, which is the EU layout.
    pub fn all() -> &'static [DateFormat] {
        &[
            DateFormat::EuSlashBracketed,
            DateFormat::US,
            DateFormat::EuDotBracketed,
            DateFormat::EuDotNoBracket,
            DateFormat::EuSlash,
        ]
    }
}

/// Parse timestamp from date and time strings.
///
/// Any run of whitespace in the time (including U+202F before AM/PM) is
/// normalized to a single space first. Two-digit years are read as 20YY.
pub fn parse_whatsapp_timestamp(
    date_str: &str,
    time_str: &str,
    format: DateFormat,
) -> Option<DateTime<Utc>> {
    let time = time_str.split_whitespace().collect::<Vec<_>>().join(" ");
    let datetime_str = format!("{date_str}, {time}");

    for parse_format in format.date_parse_formats() {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&datetime_str, parse_format) {
            return Some(naive.and_utc());
        }
    }

    None
}

/// Auto-detect date format by analyzing sample lines.
///
/// A line counts for a layout only if it matches the header pattern and
/// its timestamp parses under that layout, so `[15/01/2024, ...]` scores
/// for the day-first layouts and not for US. Returns the layout with the
/// most such lines, or `None` if no line qualifies. Ties go to the earlier
/// entry of [`DateFormat::all`].
pub fn detect_whatsapp_format(lines: &[&str]) -> Option<DateFormat> {
    let detectors: Vec<(DateFormat, Regex)> = DateFormat::all()
        .iter()
        .filter_map(|&f| Regex::new(f.pattern()).ok().map(|re| (f, re)))
        .collect();

    let mut scores = vec![0usize; detectors.len()];

    for line in lines {
        for (i, (format, regex)) in detectors.iter().enumerate() {
            let parses = regex.captures(line).is_some_and(|caps| {
                let date_str = caps.get(1).map_or("", |m| m.as_str());
                let time_str = caps.get(2).map_or("", |m| m.as_str());
                parse_whatsapp_timestamp(date_str, time_str, *format).is_some()
            });
            if parses {
                scores[i] += 1;
            }
        }
    }

    // Find the winner (highest score)
    let max_score = *scores.iter().max()?;
    if max_score == 0 {
        return None;
    }

    let winner_idx = scores.iter().position(|&s| s == max_score)?;
    Some(detectors[winner_idx].0)
}

/// Line classifier for one WhatsApp header layout.
#[derive(Debug, Clone)]
pub struct WhatsAppClassifier {
    format: DateFormat,
    regex: Regex,
}

impl WhatsAppClassifier {
    /// Builds a classifier for a layout.
    pub fn new(format: DateFormat) -> Result<Self, EcholaliaError> {
        let regex = Regex::new(format.pattern())
            .map_err(|e| EcholaliaError::invalid_format("WhatsApp", e.to_string()))?;
        Ok(Self { format, regex })
    }

    /// Returns the layout this classifier matches.
    pub fn format(&self) -> DateFormat {
        self.format
    }

    /// Classifies one line.
    ///
    /// A header-shaped line whose timestamp does not parse is treated as
    /// continuation text, the same as any other non-matching line.
    pub fn classify<'a>(&self, line: RawLine<'a>) -> ClassifiedLine<'a> {
        let class = match self.regex.captures(line.text) {
            Some(caps) => {
                let date_str = caps.get(1).map_or("", |m| m.as_str());
                let time_str = caps.get(2).map_or("", |m| m.as_str());
                let speaker = caps.get(3).map_or("", |m| m.as_str().trim());
                let text = caps.get(4).map_or("", |m| m.as_str());

                match parse_whatsapp_timestamp(date_str, time_str, self.format) {
                    Some(timestamp) if !speaker.is_empty() => LineClass::Header {
                        speaker,
                        timestamp,
                        text,
                    },
                    _ => {
                        tracing::debug!(line = line.number, "header-shaped line without a usable timestamp");
                        LineClass::Continuation(line.text)
                    }
                }
            }
            None => LineClass::Continuation(line.text),
        };

        ClassifiedLine::single(line, class)
    }

    /// Classifies every line of a document.
    pub fn classify_document<'a>(&self, content: &'a str) -> Vec<ClassifiedLine<'a>> {
        super::raw_lines(content).map(|line| self.classify(line)).collect()
    }
}
