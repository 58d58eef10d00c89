//! iMessage TXT export parser.
//!
//! Reads the per-conversation TXT files written by `imessage-exporter`.
//! Body lines of a message are joined with single spaces into one row.

use crate::Message;
use crate::config::IMessageConfig;
use crate::error::EcholaliaError;
use crate::parser::{Parser, Source};
use crate::parsing::{ContinuationPolicy, IMessageClassifier, Reconstructor, Sanitizer};

/// Parser for iMessage TXT exports.
///
/// # Example
///
/// ```rust
/// use echolalia::parsers::IMessageParser;
/// use echolalia::parser::Parser;
///
/// let parser = IMessageParser::new();
/// let messages = parser.parse_str("Jan 02, 2024  3:04:05 PM\nAlice\nHello\nthere")?;
/// assert_eq!(messages[0].text(), "Hello there");
/// # Ok::<(), echolalia::EcholaliaError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct IMessageParser {
    config: IMessageConfig,
}

impl IMessageParser {
    /// Creates a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: IMessageConfig::default(),
        }
    }

    /// Creates a parser with custom configuration.
    pub fn with_config(config: IMessageConfig) -> Self {
        Self { config }
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &IMessageConfig {
        &self.config
    }
}

impl Parser for IMessageParser {
    fn name(&self) -> &'static str {
        "iMessage"
    }

    fn source(&self) -> Source {
        Source::IMessage
    }

    fn parse_str(&self, content: &str) -> Result<Vec<Message>, EcholaliaError> {
        let classifier = IMessageClassifier::new()?;
        let sanitizer = Sanitizer::new(&self.config.sanitizer)?;

        let classified = classifier.classify_document(content);
        Ok(Reconstructor::new(&sanitizer, ContinuationPolicy::AppendToPrevious).reconstruct(classified))
    }
}
