//! Output format selection.
//!
//! # Example
//!
//! ```rust
//! # #[cfg(all(feature = "csv-output", feature = "json-output"))]
//! # fn example() -> echolalia::Result<()> {
//! use echolalia::format::{OutputFormat, to_format_string};
//! use echolalia::core::TrainingPair;
//!
//! let pairs = vec![TrainingPair::new("Hi", "Hello")];
//!
//! let format = OutputFormat::from_path("pairs.jsonl")?;
//! assert_eq!(format, OutputFormat::Jsonl);
//! let jsonl = to_format_string(&pairs, format)?;
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};

use crate::core::output::Tabular;
use crate::error::EcholaliaError;

/// Output format for turns, pairs and exclusion reports.
///
/// - [`Csv`](OutputFormat::Csv) - Semicolon separated table (default)
/// - [`Json`](OutputFormat::Json) - Structured array
/// - [`Jsonl`](OutputFormat::Jsonl) - One JSON object per line, what training jobs read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum OutputFormat {
    /// CSV with semicolon delimiter
    #[default]
    Csv,

    /// JSON array of rows
    Json,

    /// JSON Lines - one JSON object per line
    Jsonl,
}

impl OutputFormat {
    /// Returns the file extension for this format (without dot).
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Jsonl => "jsonl",
        }
    }

    /// Returns all supported format names.
    pub fn all_names() -> &'static [&'static str] {
        &["csv", "json", "jsonl", "ndjson"]
    }

    /// Returns all available formats.
    pub fn all() -> &'static [OutputFormat] {
        &[OutputFormat::Csv, OutputFormat::Json, OutputFormat::Jsonl]
    }

    /// Returns `stem` with this format's extension, e.g. `turns.csv`.
    pub fn file_name(&self, stem: &str) -> String {
        format!("{stem}.{}", self.extension())
    }

    /// Detects format from a file path based on extension.
    ///
    /// # Example
    ///
    /// ```rust
    /// use echolalia::format::OutputFormat;
    ///
    /// let format = OutputFormat::from_path("pairs.ndjson").unwrap();
    /// assert_eq!(format, OutputFormat::Jsonl);
    /// ```
    pub fn from_path(path: &str) -> Result<Self, EcholaliaError> {
        let ext = path.rsplit('.').next().unwrap_or("").to_lowercase();

        match ext.as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "jsonl" | "ndjson" => Ok(OutputFormat::Jsonl),
            _ => Err(EcholaliaError::invalid_format(
                "output",
                format!("Unknown file extension: '.{ext}'. Expected one of: csv, json, jsonl"),
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Csv => write!(f, "CSV"),
            OutputFormat::Json => write!(f, "JSON"),
            OutputFormat::Jsonl => write!(f, "JSONL"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = EcholaliaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "jsonl" | "ndjson" => Ok(OutputFormat::Jsonl),
            _ => Err(EcholaliaError::invalid_format(
                "output",
                format!(
                    "Unknown format: '{s}'. Expected one of: {}",
                    OutputFormat::all_names().join(", ")
                ),
            )),
        }
    }
}

fn feature_disabled(format: OutputFormat) -> EcholaliaError {
    let feature = match format {
        OutputFormat::Csv => "csv-output",
        OutputFormat::Json | OutputFormat::Jsonl => "json-output",
    };
    EcholaliaError::invalid_format(
        "output",
        format!("Output format {format} requires the '{feature}' feature to be enabled"),
    )
}

/// Writes rows to a file in the specified format.
///
/// # Errors
///
/// Returns an error if:
/// - The required feature for the format is not enabled
/// - The file cannot be written
#[allow(unused_variables)]
pub fn write_to_format<T: Tabular>(
    rows: &[T],
    path: &str,
    format: OutputFormat,
) -> Result<(), EcholaliaError> {
    match format {
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => crate::core::output::write_csv(rows, path),
        #[cfg(feature = "json-output")]
        OutputFormat::Json => crate::core::output::write_json(rows, path),
        #[cfg(feature = "json-output")]
        OutputFormat::Jsonl => crate::core::output::write_jsonl(rows, path),
        #[allow(unreachable_patterns)]
        _ => Err(feature_disabled(format)),
    }
}

/// Converts rows to a string in the specified format.
#[allow(unused_variables)]
pub fn to_format_string<T: Tabular>(rows: &[T], format: OutputFormat) -> Result<String, EcholaliaError> {
    match format {
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => crate::core::output::to_csv(rows),
        #[cfg(feature = "json-output")]
        OutputFormat::Json => crate::core::output::to_json(rows),
        #[cfg(feature = "json-output")]
        OutputFormat::Jsonl => crate::core::output::to_jsonl(rows),
        #[allow(unreachable_patterns)]
        _ => Err(feature_disabled(format)),
    }
}
