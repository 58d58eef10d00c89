//! Document and batch processing.
//!
//! One document goes through fetch → parse → group → align. A failure in
//! any step fails that document only; [`process_batch`] keeps going with
//! the rest and reports each outcome in manifest order.
//!
//! # Example
//!
//! ```rust
//! use echolalia::config::PipelineConfig;
//! use echolalia::manifest::{Manifest, SourceEntry};
//! use echolalia::parser::Source;
//! use echolalia::pipeline::process_batch;
//! use echolalia::store::MemoryBlobStore;
//!
//! let chat = "[1/2/24, 3:04:05 PM] Bob: Hi Alice\n[1/2/24, 3:04:30 PM] Alice: Hi Bob";
//! let store = MemoryBlobStore::new().with_object("echolalia", "data/_chat.txt", chat);
//! let manifest = Manifest::default()
//!     .with_source(SourceEntry::new(Source::WhatsApp, "_chat.txt", "Alice"))
//!     .with_source(SourceEntry::new(Source::WhatsApp, "missing.txt", "Alice"));
//!
//! let report = process_batch(&store, &manifest, &PipelineConfig::default());
//! assert_eq!(report.succeeded().count(), 1);
//! assert_eq!(report.failed().count(), 1);
//! assert_eq!(report.all_pairs()[0].output, "Hi Bob");
//! ```

use crate::Message;
use crate::config::PipelineConfig;
use crate::core::{ParseReport, TrainingPair, Turn, align_pairs, group_turns};
use crate::error::EcholaliaError;
use crate::manifest::{Manifest, SourceEntry};
use crate::parser::{Source, create_parser};
use crate::store::{BlobStore, fetch_document};

/// Everything produced for one document.
#[derive(Debug, Clone)]
pub struct DocumentOutput {
    /// Key (or path) the document was read from
    pub document: String,
    /// Export format
    pub source: Source,
    /// Target speaker
    pub target: String,
    /// Every reconstructed row, excluded ones included
    pub messages: Vec<Message>,
    /// Chronological speaker turns
    pub turns: Vec<Turn>,
    /// Aligned input/output pairs for the target
    pub pairs: Vec<TrainingPair>,
    /// Used/excluded row accounting
    pub report: ParseReport,
}

/// Parses, groups and aligns one document that is already in memory.
///
/// # Errors
///
/// [`EcholaliaError::MalformedDocumentStructure`] when no valid messages
/// remain after exclusion, or when the turns do not alternate between the
/// target and one other speaker.
pub fn process_content(
    source: Source,
    document: &str,
    content: &str,
    target: &str,
) -> Result<DocumentOutput, EcholaliaError> {
    let messages = create_parser(source).parse_str(content)?;
    let report = ParseReport::from_messages(&messages);

    if report.used == 0 {
        return Err(EcholaliaError::malformed(
            document,
            format!("no valid messages out of {} rows", report.total()),
        ));
    }

    let turns = group_turns(&messages);
    let pairs = align_pairs(&turns, target)
        .map_err(|e| EcholaliaError::malformed(document, e.to_string()))?;

    if pairs.is_empty() {
        tracing::warn!(document, target_speaker = target, "no training pairs produced");
    }

    tracing::info!(
        document,
        %source,
        used = report.used,
        excluded = report.excluded.len(),
        turns = turns.len(),
        pairs = pairs.len(),
        "processed document"
    );

    Ok(DocumentOutput {
        document: document.to_string(),
        source,
        target: target.to_string(),
        messages,
        turns,
        pairs,
        report,
    })
}

/// Fetches one manifest entry from the store and processes it.
///
/// # Errors
///
/// [`EcholaliaError::RetrievalFailure`] if the document cannot be fetched
/// (no partial parse is attempted), otherwise as [`process_content`].
pub fn process_document(
    store: &dyn BlobStore,
    bucket: &str,
    entry: &SourceEntry,
    config: &PipelineConfig,
) -> Result<DocumentOutput, EcholaliaError> {
    let fetched = fetch_document(store, bucket, &entry.logfile, config.max_attempts)?;
    process_content(entry.source, &fetched.key, &fetched.content, &entry.user)
}

/// Outcome of one manifest entry.
#[derive(Debug)]
pub struct DocumentResult {
    /// The manifest entry
    pub entry: SourceEntry,
    /// What happened to it
    pub outcome: Result<DocumentOutput, EcholaliaError>,
}

/// Outcomes of a batch, in manifest order.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// One result per manifest entry
    pub results: Vec<DocumentResult>,
}

impl BatchReport {
    /// Documents that were processed.
    pub fn succeeded(&self) -> impl Iterator<Item = &DocumentOutput> {
        self.results.iter().filter_map(|r| r.outcome.as_ref().ok())
    }

    /// Entries that failed, with their errors.
    pub fn failed(&self) -> impl Iterator<Item = (&SourceEntry, &EcholaliaError)> {
        self.results
            .iter()
            .filter_map(|r| r.outcome.as_ref().err().map(|e| (&r.entry, e)))
    }

    /// Pairs of every successful document, concatenated in manifest order.
    pub fn all_pairs(&self) -> Vec<TrainingPair> {
        self.succeeded().flat_map(|d| d.pairs.iter().cloned()).collect()
    }

    /// Returns `true` if every entry succeeded.
    pub fn is_complete(&self) -> bool {
        self.failed().next().is_none()
    }
}

/// Processes every manifest entry.
///
/// With the `parallel` feature and [`PipelineConfig::parallel`] set, the
/// documents are processed on the rayon thread pool. Results keep manifest
/// order either way.
pub fn process_batch(store: &dyn BlobStore, manifest: &Manifest, config: &PipelineConfig) -> BatchReport {
    let bucket = manifest.bucket_or(&config.bucket);

    let run = |entry: &SourceEntry| {
        let outcome = process_document(store, bucket, entry, config);
        if let Err(err) = &outcome {
            tracing::warn!(logfile = %entry.logfile, error = %err, "document failed");
        }
        DocumentResult {
            entry: entry.clone(),
            outcome,
        }
    };

    #[cfg(feature = "parallel")]
    let results: Vec<DocumentResult> = if config.parallel {
        use rayon::prelude::*;
        manifest.sources.par_iter().map(run).collect()
    } else {
        manifest.sources.iter().map(run).collect()
    };

    #[cfg(not(feature = "parallel"))]
    let results: Vec<DocumentResult> = manifest.sources.iter().map(run).collect();

    let report = BatchReport { results };
    tracing::info!(
        documents = report.results.len(),
        failed = report.failed().count(),
        pairs = report.all_pairs().len(),
        "batch finished"
    );
    report
}
