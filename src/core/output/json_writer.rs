//! JSON output writer.

use std::fs::File;
use std::io::Write;

use serde::Serialize;

use crate::error::EcholaliaError;

/// Writes rows to a JSON file as a pretty-printed array.
///
/// # Format
/// ```json
/// [
///   {"input": "How are you?", "output": "Fine"},
///   {"input": "Lunch?", "output": "Sure"}
/// ]
/// ```
pub fn write_json<T: Serialize>(rows: &[T], output_path: &str) -> Result<(), EcholaliaError> {
    let json = to_json(rows)?;
    let mut file = File::create(output_path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

/// Converts rows to a JSON array string.
pub fn to_json<T: Serialize>(rows: &[T]) -> Result<String, EcholaliaError> {
    Ok(serde_json::to_string_pretty(rows)?)
}
