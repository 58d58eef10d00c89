//! Unified error types for echolalia.
//!
//! Two kinds of trouble show up while turning a chat export into turns:
//!
//! - **Per-line anomalies** (a line with no speaker context, a message that
//!   sanitizes to nothing). These are recorded on the message itself as an
//!   [`ExceptionKind`](crate::message::ExceptionKind) and never abort a
//!   document.
//! - **Per-document failures**, represented by [`EcholaliaError`]. A failed
//!   fetch or a document with no usable messages aborts that document only;
//!   sibling documents in a batch keep going.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for echolalia operations.
///
/// # Example
///
/// ```rust
/// use echolalia::error::Result;
/// use echolalia::Message;
///
/// fn my_function() -> Result<Vec<Message>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, EcholaliaError>;

/// The error type for all echolalia operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EcholaliaError {
    /// An I/O error occurred.
    ///
    /// This typically happens when:
    /// - The input file doesn't exist
    /// - Permission denied
    /// - Disk is full (when writing output)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The upstream document fetch failed.
    ///
    /// Fatal for the document: no partial parse is attempted.
    #[error("Failed to retrieve '{key}' from '{bucket}': {source}")]
    RetrievalFailure {
        /// Bucket-like identifier of the store
        bucket: String,
        /// Object key (or search string) that was requested
        key: String,
        /// The underlying store error
        #[source]
        source: BlobError,
    },

    /// Grouping or alignment invariants do not hold for a document.
    ///
    /// Raised when no valid messages remain after exclusion, or when the
    /// remaining turns cannot be aligned into input/output pairs.
    #[error("Malformed document structure in {document}: {reason}")]
    MalformedDocumentStructure {
        /// Identifier of the offending document (logfile key or path)
        document: String,
        /// Description of the violated invariant
        reason: String,
    },

    /// The content doesn't match the expected structure.
    #[error("Invalid {format} format: {message}")]
    InvalidFormat {
        /// The format that was expected
        format: &'static str,
        /// Description of what's wrong
        message: String,
    },

    /// A manifest named a source type that has no parser.
    #[error("Unknown source type: '{0}'. Expected one of: WhatsApp, iMessage")]
    UnknownSource(String),

    /// CSV writing error.
    #[cfg(feature = "csv-output")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[cfg(feature = "json-output")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Manifest could not be read as YAML.
    #[cfg(feature = "manifest")]
    #[error("Manifest error{}: {source}", path.as_ref().map(|p| format!(" (file: {})", p.display())).unwrap_or_default())]
    Manifest {
        /// The underlying YAML error
        #[source]
        source: serde_yaml::Error,
        /// The manifest path, if available
        path: Option<PathBuf>,
    },

    /// UTF-8 encoding error.
    #[error("UTF-8 encoding error in {context}: {source}")]
    Utf8 {
        /// Description of where the error occurred
        context: String,
        /// The underlying UTF-8 error
        #[source]
        source: std::string::FromUtf8Error,
    },
}

/// Errors reported by a [`BlobStore`](crate::store::BlobStore).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BlobError {
    /// No object matched the requested key.
    #[error("no object matching '{0}'")]
    NotFound(String),

    /// The store failed in a way that may succeed on retry.
    #[error("transient store failure: {0}")]
    Transient(String),

    /// The object exists but could not be read.
    #[error("{0}")]
    Io(#[from] io::Error),

    /// The object is not valid UTF-8 text.
    #[error("object is not UTF-8 text: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

impl BlobError {
    /// Returns `true` if retrying the operation may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, BlobError::Transient(_))
    }
}

/// Reasons a turn sequence cannot be aligned into training pairs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlignmentError {
    /// Two turns that should form an input/output pair have the wrong roles.
    #[error("turns {index} and {} do not alternate between '{input}' and target '{target}'", index + 1)]
    NotAlternating {
        /// Position of the pair's first turn in the trimmed sequence
        index: usize,
        /// Speaker found in the input slot
        input: String,
        /// The target speaker
        target: String,
    },
}

impl From<std::string::FromUtf8Error> for EcholaliaError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        EcholaliaError::Utf8 {
            context: "output conversion".to_string(),
            source: err,
        }
    }
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl EcholaliaError {
    /// Creates a retrieval failure for a document.
    pub fn retrieval(bucket: impl Into<String>, key: impl Into<String>, source: BlobError) -> Self {
        EcholaliaError::RetrievalFailure {
            bucket: bucket.into(),
            key: key.into(),
            source,
        }
    }

    /// Creates a malformed-structure error for a document.
    pub fn malformed(document: impl Into<String>, reason: impl Into<String>) -> Self {
        EcholaliaError::MalformedDocumentStructure {
            document: document.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid format error.
    pub fn invalid_format(format: &'static str, message: impl Into<String>) -> Self {
        EcholaliaError::InvalidFormat {
            format,
            message: message.into(),
        }
    }

    /// Creates a manifest error.
    #[cfg(feature = "manifest")]
    pub fn manifest(source: serde_yaml::Error, path: Option<PathBuf>) -> Self {
        EcholaliaError::Manifest { source, path }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, EcholaliaError::Io(_))
    }

    /// Returns `true` if the document could not be fetched.
    pub fn is_retrieval(&self) -> bool {
        matches!(self, EcholaliaError::RetrievalFailure { .. })
    }

    /// Returns `true` if the document parsed but violated structural invariants.
    pub fn is_malformed(&self) -> bool {
        matches!(self, EcholaliaError::MalformedDocumentStructure { .. })
    }

    /// Returns `true` if this is a format error.
    pub fn is_format_error(&self) -> bool {
        matches!(self, EcholaliaError::InvalidFormat { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn test_io_error_from() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: EcholaliaError = io_err.into();
        assert!(err.is_io());
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_retrieval_error_display_and_source() {
        let err = EcholaliaError::retrieval(
            "chat-logs",
            "data/_chat.txt",
            BlobError::NotFound("data/_chat.txt".into()),
        );
        assert!(err.is_retrieval());
        let display = err.to_string();
        assert!(display.contains("chat-logs"));
        assert!(display.contains("data/_chat.txt"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_malformed_error() {
        let err = EcholaliaError::malformed("data/_chat.txt", "no valid messages");
        assert!(err.is_malformed());
        assert!(!err.is_retrieval());
        assert_eq!(
            err.to_string(),
            "Malformed document structure in data/_chat.txt: no valid messages"
        );
    }

    #[test]
    fn test_invalid_format_error() {
        let err = EcholaliaError::invalid_format("output", "unknown extension");
        assert!(err.is_format_error());
        assert!(err.to_string().contains("Invalid output format"));
    }

    #[test]
    fn test_unknown_source_error() {
        let err = EcholaliaError::UnknownSource("Signal".into());
        assert!(err.to_string().contains("Signal"));
    }

    #[test]
    fn test_blob_error_transient() {
        assert!(BlobError::Transient("throttled".into()).is_transient());
        assert!(!BlobError::NotFound("x".into()).is_transient());
    }

    #[test]
    fn test_alignment_error_display() {
        let err = AlignmentError::NotAlternating {
            index: 2,
            input: "Carol".into(),
            target: "Bob".into(),
        };
        let display = err.to_string();
        assert!(display.contains("turns 2 and 3"));
        assert!(display.contains("Carol"));
    }

    #[test]
    fn test_utf8_error_from() {
        let bad = String::from_utf8(vec![0xff, 0xfe]).unwrap_err();
        let err: EcholaliaError = bad.into();
        assert!(err.to_string().contains("UTF-8"));
    }

    #[test]
    fn test_error_debug() {
        let err = EcholaliaError::malformed("doc", "bad");
        let debug = format!("{:?}", err);
        assert!(debug.contains("MalformedDocumentStructure"));
    }
}
