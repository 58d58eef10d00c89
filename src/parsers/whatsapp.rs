//! `WhatsApp` TXT export parser.
//!
//! `WhatsApp` exports vary by locale. Unless a format is configured, this
//! parser auto-detects it by analyzing the first 20 lines of the file and
//! falls back to the US layout when nothing matches.
//!
//! Supported formats:
//! - US: `[1/15/24, 10:30:45 AM] Sender: Message`
//! - EU: `[15.01.24, 10:30:45] Sender: Message`
//! - EU slash: `15/01/2024, 10:30 - Sender: Message`
//! - EU dot: `15.01.2024, 10:30 - Sender: Message`
//! - EU slash bracketed: `[15/01/2024, 10:30:45] Sender: Message`
//!
//! Lines that do not start a message are emitted as their own rows with the
//! previous header's speaker and timestamp.

use crate::Message;
use crate::config::WhatsAppConfig;
use crate::error::EcholaliaError;
use crate::parser::{Parser, Source};
use crate::parsing::whatsapp::{DateFormat, WhatsAppClassifier, detect_whatsapp_format};
use crate::parsing::{ContinuationPolicy, Reconstructor, Sanitizer};

/// Parser for WhatsApp TXT exports.
///
/// # Example
///
/// ```rust
/// use echolalia::parsers::WhatsAppParser;
/// use echolalia::parser::Parser;
///
/// let parser = WhatsAppParser::new();
/// let messages = parser.parse_str("[1/2/24, 3:04:05 PM] Alice: Hello there")?;
/// assert_eq!(messages[0].speaker(), Some("Alice"));
/// # Ok::<(), echolalia::EcholaliaError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct WhatsAppParser {
    config: WhatsAppConfig,
}

impl WhatsAppParser {
    /// Creates a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: WhatsAppConfig::default(),
        }
    }

    /// Creates a parser with custom configuration.
    pub fn with_config(config: WhatsAppConfig) -> Self {
        Self { config }
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &WhatsAppConfig {
        &self.config
    }

    /// Picks the date format for a document.
    fn resolve_format(&self, lines: &[&str]) -> DateFormat {
        if let Some(format) = self.config.date_format {
            return format;
        }

        let sample = &lines[..lines.len().min(self.config.detection_sample)];
        detect_whatsapp_format(sample).unwrap_or_else(|| {
            tracing::debug!(
                sample = sample.len(),
                "no WhatsApp header format detected, assuming US"
            );
            DateFormat::US
        })
    }

    fn parse_content(&self, content: &str) -> Result<Vec<Message>, EcholaliaError> {
        let lines: Vec<&str> = content.lines().collect();
        if lines.is_empty() {
            return Ok(vec![]);
        }

        let format = self.resolve_format(&lines);
        let classifier = WhatsAppClassifier::new(format)?;
        let sanitizer = Sanitizer::new(&self.config.sanitizer)?;

        let classified = classifier.classify_document(content);
        let messages = Reconstructor::new(&sanitizer, ContinuationPolicy::NewRecord)
            .reconstruct(classified);

        Ok(messages)
    }
}

impl Parser for WhatsAppParser {
    fn name(&self) -> &'static str {
        "WhatsApp"
    }

    fn source(&self) -> Source {
        Source::WhatsApp
    }

    fn parse_str(&self, content: &str) -> Result<Vec<Message>, EcholaliaError> {
        self.parse_content(content)
    }
}
