//! Core processing logic for echolalia.
//!
//! This module contains:
//! - [`models`] - Turns, training pairs and parse reports
//! - [`grouper`] - Collapsing messages into speaker turns
//! - [`pairs`] - Aligning turns into input/output pairs
//! - [`output`] - Format writers (CSV, JSON, JSONL)
//!
//! # Quick Start
//!
//! ```rust
//! use echolalia::core::{align_pairs, group_turns};
//! use echolalia::parser::{Source, create_parser};
//!
//! let content = "[1/2/24, 3:04:05 PM] Alice: Hi Bob\n[1/2/24, 3:04:30 PM] Bob: Hi Alice";
//! let messages = create_parser(Source::WhatsApp).parse_str(content)?;
//! let turns = group_turns(&messages);
//! let pairs = align_pairs(&turns, "Bob").unwrap();
//! assert_eq!(pairs[0].output, "Hi Alice");
//! # Ok::<(), echolalia::EcholaliaError>(())
//! ```

pub mod grouper;
pub mod models;
pub mod output;
pub mod pairs;

pub use grouper::group_turns;
pub use models::{ExcludedRow, ParseReport, TrainingPair, Turn};
pub use pairs::align_pairs;

// Re-export Message from the crate root
pub use crate::Message;

// Conditionally re-export output writers
#[cfg(feature = "csv-output")]
pub use output::{to_csv, write_csv};
#[cfg(feature = "json-output")]
pub use output::{to_json, to_jsonl, write_json, write_jsonl};
