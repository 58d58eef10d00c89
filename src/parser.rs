//! Unified parser trait for chat exports.
//!
//! This module provides a single entry point for turning an export into
//! [`Message`] rows, whatever app produced it.
//!
//! # Example
//!
//! ```rust,no_run
//! use echolalia::parser::{Parser, Source, create_parser};
//! use std::path::Path;
//!
//! let parser = create_parser(Source::WhatsApp);
//! let messages = parser.parse(Path::new("_chat.txt"))?;
//! for msg in messages.iter().filter(|m| m.is_usable()) {
//!     println!("{:?}: {}", msg.speaker(), msg.text());
//! }
//! # Ok::<(), echolalia::EcholaliaError>(())
//! ```
//!
//! # Source Selection
//!
//! Use [`Source`] to select a parser at runtime, for example from a manifest
//! entry:
//!
//! ```rust
//! use echolalia::parser::{Source, create_parser};
//!
//! let source: Source = "iMessage".parse().unwrap();
//! let parser = create_parser(source);
//! assert_eq!(parser.name(), "iMessage");
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Message;
use crate::error::EcholaliaError;

/// Supported chat export sources.
///
/// Manifests spell these `WhatsApp` and `iMessage`; matching is
/// case-insensitive and accepts the short aliases `wa` and `imsg`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Source {
    /// WhatsApp "Export chat" TXT files
    #[serde(alias = "whatsapp", alias = "wa")]
    WhatsApp,

    /// TXT files produced by imessage-exporter
    #[serde(rename = "iMessage", alias = "imessage", alias = "imsg")]
    IMessage,
}

impl Source {
    /// Returns the default file extension for exports from this source.
    pub fn default_extension(&self) -> &'static str {
        match self {
            Source::WhatsApp | Source::IMessage => "txt",
        }
    }

    /// Returns all source names including aliases.
    pub fn all_names() -> &'static [&'static str] {
        &["whatsapp", "wa", "imessage", "imsg"]
    }

    /// Returns all available sources.
    pub fn all() -> &'static [Source] {
        &[Source::WhatsApp, Source::IMessage]
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::WhatsApp => write!(f, "WhatsApp"),
            Source::IMessage => write!(f, "iMessage"),
        }
    }
}

impl std::str::FromStr for Source {
    type Err = EcholaliaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "whatsapp" | "wa" => Ok(Source::WhatsApp),
            "imessage" | "imsg" => Ok(Source::IMessage),
            _ => Err(EcholaliaError::UnknownSource(s.to_string())),
        }
    }
}

/// Trait for parsing chat exports into message rows.
///
/// Implementations own their classifier and sanitizer configuration and
/// never fail on individual lines: anomalies are reported on the returned
/// [`Message`] rows through [`Message::exception`].
///
/// # Implementation Notes
///
/// Parsers must implement:
/// - [`name`](Parser::name) - Parser identifier
/// - [`source`](Parser::source) - Source this parser handles
/// - [`parse_str`](Parser::parse_str) - Parse from a string
///
/// [`parse`](Parser::parse) and [`parse_file`](Parser::parse_file) read the
/// file and delegate to `parse_str`.
pub trait Parser: Send + Sync {
    /// Returns the human-readable name of this parser.
    fn name(&self) -> &'static str;

    /// Returns the source this parser handles.
    fn source(&self) -> Source;

    /// Parses chat content from a string.
    ///
    /// Returns every reconstructed row in source order, excluded rows
    /// included.
    fn parse_str(&self, content: &str) -> Result<Vec<Message>, EcholaliaError>;

    /// Parses a chat export file.
    ///
    /// # Errors
    ///
    /// Returns [`EcholaliaError::Io`] if the file cannot be read.
    fn parse(&self, path: &Path) -> Result<Vec<Message>, EcholaliaError> {
        let content = std::fs::read_to_string(path)?;
        self.parse_str(&content)
    }

    /// Parses a chat export file (convenience method accepting &str path).
    fn parse_file(&self, path: &str) -> Result<Vec<Message>, EcholaliaError> {
        self.parse(Path::new(path))
    }
}

/// Creates a parser with default configuration for the specified source.
///
/// # Example
///
/// ```rust
/// use echolalia::parser::{Source, create_parser};
///
/// let parser = create_parser(Source::WhatsApp);
/// assert_eq!(parser.name(), "WhatsApp");
/// ```
pub fn create_parser(source: Source) -> Box<dyn Parser> {
    match source {
        Source::WhatsApp => Box::new(crate::parsers::WhatsAppParser::new()),
        Source::IMessage => Box::new(crate::parsers::IMessageParser::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_source_from_str() {
        assert_eq!(Source::from_str("WhatsApp").unwrap(), Source::WhatsApp);
        assert_eq!(Source::from_str("whatsapp").unwrap(), Source::WhatsApp);
        assert_eq!(Source::from_str("wa").unwrap(), Source::WhatsApp);
        assert_eq!(Source::from_str("iMessage").unwrap(), Source::IMessage);
        assert_eq!(Source::from_str("IMESSAGE").unwrap(), Source::IMessage);
        assert_eq!(Source::from_str("imsg").unwrap(), Source::IMessage);
    }

    #[test]
    fn test_source_from_str_error() {
        let err = Source::from_str("Signal").unwrap_err();
        assert!(matches!(err, EcholaliaError::UnknownSource(ref s) if s == "Signal"));
    }

    #[test]
    fn test_source_display_roundtrips() {
        for source in Source::all() {
            assert_eq!(Source::from_str(&source.to_string()).unwrap(), *source);
        }
        assert_eq!(Source::IMessage.to_string(), "iMessage");
    }

    #[test]
    fn test_source_serde_names() {
        let json = serde_json::to_string(&Source::IMessage).unwrap();
        assert_eq!(json, "\"iMessage\"");
        let parsed: Source = serde_json::from_str("\"wa\"").unwrap();
        assert_eq!(parsed, Source::WhatsApp);
    }

    #[test]
    fn test_source_default_extension() {
        assert_eq!(Source::WhatsApp.default_extension(), "txt");
        assert_eq!(Source::IMessage.default_extension(), "txt");
    }

    #[test]
    fn test_create_parser() {
        for source in Source::all() {
            let parser = create_parser(*source);
            assert_eq!(parser.source(), *source);
        }
    }
}
