//! Configuration types for parsers, sanitizers and batch runs.
//!
//! This module provides plain configuration structs for library usage,
//! without any CLI framework dependencies.
//!
//! - [`SanitizerConfig`] - the per-format table of system-notice rules
//! - [`WhatsAppConfig`] - WhatsApp TXT export settings
//! - [`IMessageConfig`] - iMessage (imessage-exporter TXT) settings
//! - [`PipelineConfig`] - retrieval and batch settings
//!
//! # Example
//!
//! ```rust
//! use echolalia::config::{SanitizeRule, SanitizerConfig, WhatsAppConfig};
//! use echolalia::parsers::WhatsAppParser;
//!
//! let sanitizer = SanitizerConfig::whatsapp()
//!     .with_rule(SanitizeRule::drop("\u{200e}sticker omitted"));
//!
//! let parser = WhatsAppParser::with_config(WhatsAppConfig::new().with_sanitizer(sanitizer));
//! ```

use serde::{Deserialize, Serialize};

use crate::parsing::whatsapp::DateFormat;

/// What a matching [`SanitizeRule`] does to a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SanitizeAction {
    /// Replace the whole message with an empty string.
    Drop,
    /// Remove only the matched marker, keeping the rest of the text.
    Strip,
}

/// A `{substring: action}` entry of a sanitizer table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizeRule {
    /// Literal substring to look for.
    pub pattern: String,
    /// What to do when the substring is present.
    pub action: SanitizeAction,
}

impl SanitizeRule {
    /// A rule that empties any message containing `pattern`.
    pub fn drop(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            action: SanitizeAction::Drop,
        }
    }

    /// A rule that removes `pattern` from the message.
    pub fn strip(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            action: SanitizeAction::Strip,
        }
    }
}

/// Rules applied by the sanitizer to every message of one export format.
///
/// Drop rules are checked first, then strip rules, then URL and filename
/// removal, then whitespace trimming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizerConfig {
    /// Substring table of system notices and markers.
    pub rules: Vec<SanitizeRule>,

    /// Remove URL tokens (default: true for WhatsApp)
    pub strip_urls: bool,

    /// Remove attachment filenames at the start of a message (default: true for iMessage)
    pub strip_filenames: bool,
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            strip_urls: true,
            strip_filenames: false,
        }
    }
}

impl SanitizerConfig {
    /// Creates an empty table that only strips URLs and whitespace.
    pub fn new() -> Self {
        Self::default()
    }

    /// The WhatsApp notice table.
    ///
    /// WhatsApp prefixes its own notices with a left-to-right mark (U+200E),
    /// which keeps these from matching ordinary user text.
    pub fn whatsapp() -> Self {
        Self {
            rules: vec![
                SanitizeRule::drop("\u{200e}<attached:"),
                SanitizeRule::drop("\u{200e}Voice call"),
                SanitizeRule::drop("\u{200e}Missed voice call"),
                SanitizeRule::drop("\u{200e}Video call"),
                SanitizeRule::drop("\u{200e}Missed video call"),
                SanitizeRule::drop("\u{200e}You deleted this message."),
                SanitizeRule::drop("\u{200e}This message was deleted."),
                SanitizeRule::drop("\u{200e}Tap to call back"),
                SanitizeRule::drop("\u{200e}Messages and calls are end-to-end encrypted"),
                SanitizeRule::strip("\u{200e}<This message was edited>"),
            ],
            strip_urls: true,
            strip_filenames: false,
        }
    }

    /// The iMessage table for imessage-exporter text output.
    pub fn imessage() -> Self {
        Self {
            rules: vec![SanitizeRule::drop(
                "This message responded to an earlier message.",
            )],
            strip_urls: false,
            strip_filenames: true,
        }
    }

    /// Appends a rule to the table.
    #[must_use]
    pub fn with_rule(mut self, rule: SanitizeRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Enables or disables URL removal.
    #[must_use]
    pub fn with_strip_urls(mut self, enabled: bool) -> Self {
        self.strip_urls = enabled;
        self
    }

    /// Enables or disables filename removal.
    #[must_use]
    pub fn with_strip_filenames(mut self, enabled: bool) -> Self {
        self.strip_filenames = enabled;
        self
    }
}

/// Configuration for WhatsApp export parsing.
///
/// WhatsApp exports are TXT files whose header layout depends on the phone's
/// locale. Unless a format is forced, the parser detects it from the first
/// `detection_sample` lines.
///
/// # Example
///
/// ```rust
/// use echolalia::config::WhatsAppConfig;
/// use echolalia::parsing::whatsapp::DateFormat;
///
/// let config = WhatsAppConfig::new().with_date_format(DateFormat::US);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhatsAppConfig {
    /// Force a header layout instead of detecting it (default: None)
    pub date_format: Option<DateFormat>,

    /// Number of leading lines used for format detection (default: 20)
    pub detection_sample: usize,

    /// Notice table and text cleanup
    pub sanitizer: SanitizerConfig,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            date_format: None,
            detection_sample: 20,
            sanitizer: SanitizerConfig::whatsapp(),
        }
    }
}

impl WhatsAppConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forces a header layout.
    #[must_use]
    pub fn with_date_format(mut self, format: DateFormat) -> Self {
        self.date_format = Some(format);
        self
    }

    /// Sets how many leading lines are sampled for format detection.
    #[must_use]
    pub fn with_detection_sample(mut self, lines: usize) -> Self {
        self.detection_sample = lines;
        self
    }

    /// Replaces the sanitizer table.
    #[must_use]
    pub fn with_sanitizer(mut self, sanitizer: SanitizerConfig) -> Self {
        self.sanitizer = sanitizer;
        self
    }
}

/// Configuration for iMessage export parsing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IMessageConfig {
    /// Notice table and text cleanup
    pub sanitizer: SanitizerConfig,
}

impl Default for IMessageConfig {
    fn default() -> Self {
        Self {
            sanitizer: SanitizerConfig::imessage(),
        }
    }
}

impl IMessageConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the sanitizer table.
    #[must_use]
    pub fn with_sanitizer(mut self, sanitizer: SanitizerConfig) -> Self {
        self.sanitizer = sanitizer;
        self
    }
}

/// Settings for fetching and processing documents.
///
/// # Example
///
/// ```rust
/// use echolalia::config::PipelineConfig;
///
/// let config = PipelineConfig::new()
///     .with_bucket("chat-logs")
///     .with_max_attempts(5);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Bucket-like identifier handed to the blob store (default: "echolalia")
    pub bucket: String,

    /// Read attempts per document on transient store failures (default: 3)
    pub max_attempts: u32,

    /// Parse batch documents on the rayon pool when available (default: true)
    pub parallel: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            bucket: "echolalia".to_string(),
            max_attempts: 3,
            parallel: true,
        }
    }
}

impl PipelineConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the bucket.
    #[must_use]
    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    /// Sets the number of read attempts. Values below 1 are treated as 1.
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Enables or disables parallel batch processing.
    #[must_use]
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whatsapp_config_default() {
        let config = WhatsAppConfig::default();
        assert!(config.date_format.is_none());
        assert_eq!(config.detection_sample, 20);
        assert!(config.sanitizer.strip_urls);
        assert!(!config.sanitizer.strip_filenames);
    }

    #[test]
    fn test_whatsapp_table_contains_edit_marker() {
        let table = SanitizerConfig::whatsapp();
        assert!(table
            .rules
            .iter()
            .any(|r| r.action == SanitizeAction::Strip && r.pattern.contains("edited")));
        assert!(table
            .rules
            .iter()
            .filter(|r| r.action == SanitizeAction::Drop)
            .all(|r| r.pattern.starts_with('\u{200e}')));
    }

    #[test]
    fn test_imessage_config_default() {
        let config = IMessageConfig::default();
        assert!(config.sanitizer.strip_filenames);
        assert!(!config.sanitizer.strip_urls);
        assert_eq!(config.sanitizer.rules.len(), 1);
    }

    #[test]
    fn test_sanitizer_builder() {
        let config = SanitizerConfig::new()
            .with_rule(SanitizeRule::drop("BEGIN"))
            .with_strip_urls(false)
            .with_strip_filenames(true);
        assert_eq!(config.rules, vec![SanitizeRule::drop("BEGIN")]);
        assert!(!config.strip_urls);
        assert!(config.strip_filenames);
    }

    #[test]
    fn test_pipeline_config_builder() {
        let config = PipelineConfig::new()
            .with_bucket("logs")
            .with_max_attempts(0)
            .with_parallel(false);
        assert_eq!(config.bucket, "logs");
        assert_eq!(config.max_attempts, 1);
        assert!(!config.parallel);
    }

    #[test]
    fn test_rule_serde() {
        let rule = SanitizeRule::strip("<edited>");
        let json = serde_json::to_string(&rule).unwrap();
        assert_eq!(json, r#"{"pattern":"<edited>","action":"strip"}"#);
    }
}
