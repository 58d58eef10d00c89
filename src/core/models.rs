//! Core data models for grouped conversations.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::message::{ExceptionKind, Message};

/// A maximal run of consecutive messages from one speaker.
///
/// Serializes with exactly the columns `user`, `timestamp`, `message` and
/// `num_messages`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// Speaker of every message in the run
    #[serde(rename = "user")]
    pub speaker: String,

    /// Per-message timestamps, oldest first
    #[serde(rename = "timestamp")]
    pub timestamps: Vec<DateTime<Utc>>,

    /// Message texts joined with single spaces
    #[serde(rename = "message")]
    pub text: String,

    /// Number of messages in the run
    #[serde(rename = "num_messages")]
    pub message_count: usize,

    /// Time between the previous message and this turn's first message.
    /// `None` for the first turn of a conversation.
    #[serde(skip)]
    pub gap_before: Option<TimeDelta>,
}

impl Turn {
    /// Starts a turn from its first message.
    pub fn new(speaker: impl Into<String>, timestamp: DateTime<Utc>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            timestamps: vec![timestamp],
            text: text.into(),
            message_count: 1,
            gap_before: None,
        }
    }

    /// Appends the next message of the run.
    pub fn push(&mut self, timestamp: DateTime<Utc>, text: &str) {
        self.timestamps.push(timestamp);
        self.text.push(' ');
        self.text.push_str(text);
        self.message_count += 1;
    }

    /// Builder method to set the gap before the turn.
    #[must_use]
    pub fn with_gap_before(mut self, gap: TimeDelta) -> Self {
        self.gap_before = Some(gap);
        self
    }

    /// Timestamp of the first message.
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.timestamps.first().copied()
    }

    /// Timestamp of the last message.
    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.timestamps.last().copied()
    }

    /// Median delay between consecutive messages of the turn.
    ///
    /// Zero for a single-message turn. With an even number of intervals the
    /// two middle values are averaged.
    pub fn median_interval(&self) -> TimeDelta {
        let mut intervals: Vec<TimeDelta> = self
            .timestamps
            .windows(2)
            .map(|w| w[1] - w[0])
            .collect();

        if intervals.is_empty() {
            return TimeDelta::zero();
        }

        intervals.sort_unstable();
        let mid = intervals.len() / 2;
        if intervals.len() % 2 == 0 {
            (intervals[mid - 1] + intervals[mid]) / 2
        } else {
            intervals[mid]
        }
    }
}

/// An aligned input/output example.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingPair {
    /// Text of the turn that prompts the target speaker
    pub input: String,
    /// Text of the target speaker's reply
    pub output: String,
}

impl TrainingPair {
    /// Creates a pair.
    pub fn new(input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }
}

/// One row left out of grouping, kept for auditing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedRow {
    /// 1-based source line
    pub line_number: usize,
    /// Source text of the row
    pub raw_line: String,
    /// Why it was excluded
    pub reason: ExceptionKind,
}

/// How many rows of a document were used and which were excluded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseReport {
    /// Rows that took part in grouping
    pub used: usize,
    /// Rows that did not, with the reason
    pub excluded: Vec<ExcludedRow>,
}

impl ParseReport {
    /// Builds the report for a document's messages.
    pub fn from_messages(messages: &[Message]) -> Self {
        let mut report = Self::default();
        for msg in messages {
            match msg.exception {
                Some(reason) => report.excluded.push(ExcludedRow {
                    line_number: msg.line_number,
                    raw_line: msg.raw_line.clone(),
                    reason,
                }),
                None => report.used += 1,
            }
        }
        report
    }

    /// Total number of rows.
    pub fn total(&self) -> usize {
        self.used + self.excluded.len()
    }

    /// Number of rows excluded for `reason`.
    pub fn count(&self, reason: ExceptionKind) -> usize {
        self.excluded.iter().filter(|r| r.reason == reason).count()
    }
}
