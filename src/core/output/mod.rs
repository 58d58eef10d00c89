//! Output format writers.
//!
//! This module provides writers for the tabular products of a run (turns,
//! training pairs and excluded rows):
//! - [`write_csv`] / [`to_csv`] - CSV with semicolon delimiter - requires `csv-output` feature
//! - [`write_json`] / [`to_json`] - JSON array of rows - requires `json-output` feature
//! - [`write_jsonl`] / [`to_jsonl`] - JSON Lines (one JSON per line) - requires `json-output` feature
//!
//! # Choosing a Format
//!
//! | Format | Use Case |
//! |--------|----------|
//! | CSV | Spreadsheets, quick inspection |
//! | JSON | Structured data, APIs |
//! | JSONL | Training jobs, streaming consumers |
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(all(feature = "csv-output", feature = "json-output"))]
//! # fn main() -> echolalia::Result<()> {
//! use echolalia::core::output::{to_csv, write_jsonl};
//! use echolalia::core::TrainingPair;
//!
//! let pairs = vec![TrainingPair::new("How are you?", "Fine, thanks")];
//!
//! write_jsonl(&pairs, "pairs.jsonl")?;
//! let csv_string = to_csv(&pairs)?;
//! # Ok(())
//! # }
//! # #[cfg(not(all(feature = "csv-output", feature = "json-output")))]
//! # fn main() {}
//! ```

use serde::Serialize;

use crate::core::models::{ExcludedRow, TrainingPair, Turn};

#[cfg(feature = "csv-output")]
mod csv_writer;
#[cfg(feature = "json-output")]
mod json_writer;
#[cfg(feature = "json-output")]
mod jsonl_writer;

#[cfg(feature = "csv-output")]
pub use csv_writer::{to_csv, write_csv};
#[cfg(feature = "json-output")]
pub use json_writer::{to_json, write_json};
#[cfg(feature = "json-output")]
pub use jsonl_writer::{to_jsonl, write_jsonl};

/// Timestamp layout used in CSV cells.
pub const CSV_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A row type with a fixed column layout.
///
/// JSON writers use the `Serialize` impl directly; the CSV writer needs flat
/// string cells and uses [`Tabular::record`].
pub trait Tabular: Serialize {
    /// Column names, in order.
    const HEADER: &'static [&'static str];

    /// Cell values for one row, in [`HEADER`](Tabular::HEADER) order.
    fn record(&self) -> Vec<String>;
}

impl Tabular for Turn {
    const HEADER: &'static [&'static str] = &["user", "timestamp", "message", "num_messages"];

    /// The timestamp cell holds every message time of the turn, comma
    /// separated.
    fn record(&self) -> Vec<String> {
        let timestamps = self
            .timestamps
            .iter()
            .map(|ts| ts.format(CSV_TIMESTAMP_FORMAT).to_string())
            .collect::<Vec<_>>()
            .join(", ");

        vec![
            self.speaker.clone(),
            timestamps,
            self.text.clone(),
            self.message_count.to_string(),
        ]
    }
}

impl Tabular for TrainingPair {
    const HEADER: &'static [&'static str] = &["input", "output"];

    fn record(&self) -> Vec<String> {
        vec![self.input.clone(), self.output.clone()]
    }
}

impl Tabular for ExcludedRow {
    const HEADER: &'static [&'static str] = &["line_number", "raw_line", "reason"];

    fn record(&self) -> Vec<String> {
        vec![
            self.line_number.to_string(),
            self.raw_line.clone(),
            self.reason.to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExceptionKind;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_turn_record() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 2, 15, 4, 5).unwrap();
        let t1 = Utc.with_ymd_and_hms(2024, 1, 2, 15, 4, 10).unwrap();
        let mut turn = Turn::new("Alice", t0, "Hi");
        turn.push(t1, "there");

        assert_eq!(
            turn.record(),
            vec![
                "Alice".to_string(),
                "2024-01-02 15:04:05, 2024-01-02 15:04:10".to_string(),
                "Hi there".to_string(),
                "2".to_string(),
            ]
        );
        assert_eq!(Turn::HEADER.len(), turn.record().len());
    }

    #[test]
    fn test_excluded_row_record_uses_display() {
        let row = ExcludedRow {
            line_number: 4,
            raw_line: "orphan".into(),
            reason: ExceptionKind::ContextlessMessage,
        };
        assert_eq!(row.record()[2], "Contextless message");
    }
}
