//! Batch manifests.
//!
//! A manifest lists the chat exports that make up one dataset:
//!
//! ```yaml
//! bucket: chat-logs
//! model_name: gpt2
//! sources:
//!   - type: WhatsApp
//!     logfile: data/_chat.txt
//!     user: Alice
//!   - type: iMessage
//!     logfile: imessage/+15555550123.txt
//!     user: Me
//! ```
//!
//! `logfile` is a search string matched against the keys of the bucket.
//! `user` is the target speaker whose replies become training outputs.
//! Keys the pipeline does not use (model name, training arguments) are
//! accepted and ignored.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EcholaliaError;
use crate::parser::Source;
use crate::store::{BlobStore, fetch_document};

/// One document of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceEntry {
    /// Export format
    #[serde(rename = "type")]
    pub source: Source,
    /// Search string identifying the document in the bucket
    pub logfile: String,
    /// Target speaker
    pub user: String,
}

impl SourceEntry {
    /// Creates an entry.
    pub fn new(source: Source, logfile: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            source,
            logfile: logfile.into(),
            user: user.into(),
        }
    }
}

/// A parsed batch manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Bucket override for every source (falls back to the pipeline default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
    /// Documents in processing order
    #[serde(default)]
    pub sources: Vec<SourceEntry>,
}

impl Manifest {
    /// Parses a manifest from YAML text.
    ///
    /// # Example
    ///
    /// ```rust
    /// use echolalia::manifest::Manifest;
    /// use echolalia::parser::Source;
    ///
    /// let manifest = Manifest::from_yaml_str(
    ///     "sources:\n  - {type: iMessage, logfile: alice.txt, user: Me}\n",
    /// )?;
    /// assert_eq!(manifest.sources[0].source, Source::IMessage);
    /// # Ok::<(), echolalia::EcholaliaError>(())
    /// ```
    pub fn from_yaml_str(yaml: &str) -> Result<Self, EcholaliaError> {
        serde_yaml::from_str(yaml).map_err(|e| EcholaliaError::manifest(e, None))
    }

    /// Reads a manifest from a local file.
    pub fn from_path(path: &Path) -> Result<Self, EcholaliaError> {
        let yaml = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&yaml).map_err(|e| EcholaliaError::manifest(e, Some(path.to_path_buf())))
    }

    /// Reads a manifest stored next to the chat logs.
    pub fn from_store(
        store: &dyn BlobStore,
        bucket: &str,
        key: &str,
        max_attempts: u32,
    ) -> Result<Self, EcholaliaError> {
        let document = fetch_document(store, bucket, key, max_attempts)?;
        Self::from_yaml_str(&document.content)
    }

    /// Returns the bucket to read from, given the pipeline default.
    pub fn bucket_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.bucket.as_deref().unwrap_or(default)
    }

    /// Builder method to add a source.
    #[must_use]
    pub fn with_source(mut self, entry: SourceEntry) -> Self {
        self.sources.push(entry);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryBlobStore;

    const MANIFEST: &str = "\
bucket: chat-logs
model_name: gpt2
training_args:
  num_train_epochs: 3
sources:
  - type: WhatsApp
    logfile: data/_chat.txt
    user: Alice
  - type: iMessage
    logfile: imessage/bob.txt
    user: Me
";

    #[test]
    fn test_parse_manifest_ignores_extra_keys() {
        let manifest = Manifest::from_yaml_str(MANIFEST).unwrap();
        assert_eq!(manifest.bucket.as_deref(), Some("chat-logs"));
        assert_eq!(
            manifest.sources,
            vec![
                SourceEntry::new(Source::WhatsApp, "data/_chat.txt", "Alice"),
                SourceEntry::new(Source::IMessage, "imessage/bob.txt", "Me"),
            ]
        );
    }

    #[test]
    fn test_unknown_source_type_rejected() {
        let err = Manifest::from_yaml_str("sources:\n  - {type: Signal, logfile: a, user: b}\n")
            .unwrap_err();
        assert!(matches!(err, EcholaliaError::Manifest { .. }));
    }

    #[test]
    fn test_bucket_fallback() {
        let manifest = Manifest::default();
        assert_eq!(manifest.bucket_or("echolalia"), "echolalia");
    }

    #[test]
    fn test_from_path_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.yaml");
        std::fs::write(&path, "sources: [").unwrap();
        let err = Manifest::from_path(&path).unwrap_err();
        assert!(err.to_string().contains("manifest.yaml"));
    }

    #[test]
    fn test_from_store() {
        let store = MemoryBlobStore::new().with_object("chat-logs", "manifests/train.yaml", MANIFEST);
        let manifest = Manifest::from_store(&store, "chat-logs", "train.yaml", 1).unwrap();
        assert_eq!(manifest.sources.len(), 2);
    }
}
