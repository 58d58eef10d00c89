//! CSV output writer.

use std::fs::File;
use std::io::Write;

use super::Tabular;
use crate::error::EcholaliaError;

/// Writes rows to CSV with semicolon delimiter.
///
/// # Format
/// - Delimiter: `;`
/// - Header: [`Tabular::HEADER`] of the row type
/// - Encoding: UTF-8
pub fn write_csv<T: Tabular>(rows: &[T], output_path: &str) -> Result<(), EcholaliaError> {
    let file = File::create(output_path)?;
    write_rows(rows, file)
}

/// Converts rows to a CSV string.
///
/// Same format as [`write_csv`], but returns a String instead of writing
/// to a file.
pub fn to_csv<T: Tabular>(rows: &[T]) -> Result<String, EcholaliaError> {
    let mut buffer = Vec::new();
    write_rows(rows, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

fn write_rows<T: Tabular, W: Write>(rows: &[T], sink: W) -> Result<(), EcholaliaError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(sink);

    writer.write_record(T::HEADER)?;
    for row in rows {
        writer.write_record(row.record())?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{TrainingPair, Turn};
    use chrono::{TimeZone, Utc};
    use tempfile::NamedTempFile;

    #[test]
    fn test_write_csv_turns() {
        let ts = Utc.with_ymd_and_hms(2024, 6, 15, 12, 30, 0).unwrap();
        let turns = vec![Turn::new("Alice", ts, "Hello"), Turn::new("Bob", ts, "Hi there")];

        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_str().unwrap();
        write_csv(&turns, path).unwrap();

        let content = std::fs::read_to_string(path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("user;timestamp;message;num_messages"));
        assert_eq!(lines.next(), Some("Alice;2024-06-15 12:30:00;Hello;1"));
        assert_eq!(lines.next(), Some("Bob;2024-06-15 12:30:00;Hi there;1"));
    }

    #[test]
    fn test_to_csv_pairs_quotes_delimiter() {
        let pairs = vec![TrainingPair::new("a;b", "c")];
        let csv = to_csv(&pairs).unwrap();
        assert!(csv.starts_with("input;output\n"));
        assert!(csv.contains("\"a;b\";c"));
    }

    #[test]
    fn test_to_csv_empty_has_header() {
        let csv = to_csv::<TrainingPair>(&[]).unwrap();
        assert_eq!(csv, "input;output\n");
    }
}
