//! JSON Lines (JSONL) output writer.
//!
//! JSONL is the format training jobs usually ingest: one example per line,
//! readable without loading the whole file.

use std::fs::File;
use std::io::{BufWriter, Write};

use serde::Serialize;

use crate::error::EcholaliaError;

/// Writes rows to JSONL (JSON Lines) format.
///
/// Each line is a valid JSON object:
/// ```jsonl
/// {"input":"How are you?","output":"Fine"}
/// {"input":"Lunch?","output":"Sure"}
/// ```
pub fn write_jsonl<T: Serialize>(rows: &[T], output_path: &str) -> Result<(), EcholaliaError> {
    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);
    write_lines(rows, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Converts rows to a JSONL string.
pub fn to_jsonl<T: Serialize>(rows: &[T]) -> Result<String, EcholaliaError> {
    let mut buffer = Vec::new();
    write_lines(rows, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

fn write_lines<T: Serialize, W: Write>(rows: &[T], writer: &mut W) -> Result<(), EcholaliaError> {
    for row in rows {
        let line = serde_json::to_string(row)?;
        writeln!(writer, "{line}")?;
    }
    Ok(())
}
