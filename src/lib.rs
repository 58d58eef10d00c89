//! # Echolalia
//!
//! A Rust library for turning exported chat logs into speaker turns and
//! conversational training pairs.
//!
//! ## Overview
//!
//! Echolalia reads the plain-text exports of:
//! - **WhatsApp** — "Export chat" TXT files, in US and European layouts
//! - **iMessage** — TXT files written by `imessage-exporter`
//!
//! Each line is classified as a message header or a continuation, cleaned of
//! system notices, attachments and links, and folded into [`Message`] rows.
//! Rows that cannot be attributed or that clean up to nothing are kept but
//! tagged with an [`ExceptionKind`]. The usable rows are grouped into
//! chronological same-speaker [`Turn`](core::Turn)s, which are then aligned
//! into input/output [`TrainingPair`](core::TrainingPair)s for a target
//! speaker.
//!
//! ## Quick Start
//!
//! ```rust
//! use echolalia::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let content = "\
//! [1/2/24, 3:04:05 PM] Alice: Hi
//! [1/2/24, 3:04:10 PM] Alice: there
//! [1/2/24, 3:05:00 PM] Bob: Hello Alice";
//!
//!     let messages = create_parser(Source::WhatsApp).parse_str(content)?;
//!     let turns = group_turns(&messages);
//!     assert_eq!(turns[0].text, "Hi there");
//!     assert_eq!(turns[0].message_count, 2);
//!
//!     let pairs = align_pairs(&turns, "Bob").expect("two-party chat");
//!     assert_eq!(pairs[0].output, "Hello Alice");
//!     Ok(())
//! }
//! ```
//!
//! ## Batches
//!
//! With the `manifest` feature, a YAML manifest lists many documents held in
//! a [`BlobStore`](store::BlobStore); [`pipeline::process_batch`] processes
//! them (in parallel with the `parallel` feature) and isolates failures per
//! document.
//!
//! ## Module Structure
//!
//! - [`parser`] — [`Parser`](parser::Parser) trait, [`Source`](parser::Source), [`create_parser`](parser::create_parser)
//! - [`parsers`] — [`WhatsAppParser`](parsers::WhatsAppParser), [`IMessageParser`](parsers::IMessageParser)
//! - [`parsing`] — line classifiers, sanitizer and message reconstructor
//! - [`config`] — parser, sanitizer and pipeline configuration
//! - [`core`] — turns, pairs, reports and output writers
//! - [`format`] — [`OutputFormat`](format::OutputFormat) selection
//! - [`store`] — blob store trait and implementations
//! - [`manifest`], [`pipeline`] — batch processing (feature `manifest`)
//! - [`cli`] — CLI types (feature `cli`)
//! - [`error`] — [`EcholaliaError`], [`Result`]
//! - [`prelude`] — Convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod format;
#[cfg(feature = "manifest")]
pub mod manifest;
pub mod message;
pub mod parser;
pub mod parsers;
pub mod parsing;
#[cfg(feature = "manifest")]
pub mod pipeline;
pub mod store;

// Re-export the main types at the crate root for convenience
pub use error::{EcholaliaError, Result};
pub use message::{ExceptionKind, Message};

/// Convenient re-exports for common usage.
///
/// ```rust
/// use echolalia::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{ExceptionKind, Message};

    pub use crate::error::{AlignmentError, BlobError, EcholaliaError, Result};

    pub use crate::parser::{Parser, Source, create_parser};
    pub use crate::parsers::{IMessageParser, WhatsAppParser};

    pub use crate::config::{
        IMessageConfig, PipelineConfig, SanitizeRule, SanitizerConfig, WhatsAppConfig,
    };

    pub use crate::core::{
        ExcludedRow, ParseReport, TrainingPair, Turn, align_pairs, group_turns,
    };

    pub use crate::format::{OutputFormat, to_format_string, write_to_format};

    pub use crate::store::{BlobStore, FsBlobStore, MemoryBlobStore, fetch_document};

    #[cfg(feature = "manifest")]
    pub use crate::manifest::{Manifest, SourceEntry};
    #[cfg(feature = "manifest")]
    pub use crate::pipeline::{BatchReport, DocumentOutput, process_batch, process_content};
}
