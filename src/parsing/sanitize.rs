//! Message text cleanup.
//!
//! The sanitizer is a pure transform over one message string. It never
//! fails: text that matches no rule only loses its surrounding whitespace.
//! Applying it twice gives the same result as applying it once.

use regex::Regex;

use crate::config::{SanitizeAction, SanitizerConfig};
use crate::error::EcholaliaError;

/// URL-like tokens: everything up to the next whitespace.
const URL_PATTERN: &str = r"(?:https?://|www\.)\S+";

/// One or more attachment filenames at the start of a message.
const FILENAME_PREFIX_PATTERN: &str = r"^(?:\S+\.[A-Za-z][A-Za-z0-9]{0,4}\s+)+";

/// A message that is nothing but a filename.
const FILENAME_ONLY_PATTERN: &str = r"^\S+\.[A-Za-z][A-Za-z0-9]{0,4}$";

/// Compiled form of a [`SanitizerConfig`].
///
/// # Example
///
/// ```rust
/// use echolalia::config::SanitizerConfig;
/// use echolalia::parsing::Sanitizer;
///
/// let sanitizer = Sanitizer::new(&SanitizerConfig::whatsapp())?;
/// assert_eq!(sanitizer.sanitize("Check this http://example.com out"), "Check this  out");
/// assert_eq!(sanitizer.sanitize("\u{200e}<attached: photo.jpg>"), "");
/// # Ok::<(), echolalia::EcholaliaError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Sanitizer {
    drop_patterns: Vec<String>,
    strip_patterns: Vec<String>,
    url: Option<Regex>,
    filenames: Option<(Regex, Regex)>,
}

impl Sanitizer {
    /// Compiles a rule table.
    ///
    /// Empty patterns are ignored; they would otherwise match every message.
    pub fn new(config: &SanitizerConfig) -> Result<Self, EcholaliaError> {
        let mut drop_patterns = Vec::new();
        let mut strip_patterns = Vec::new();

        for rule in config.rules.iter().filter(|r| !r.pattern.is_empty()) {
            match rule.action {
                SanitizeAction::Drop => drop_patterns.push(rule.pattern.clone()),
                SanitizeAction::Strip => strip_patterns.push(rule.pattern.clone()),
            }
        }

        let url = if config.strip_urls {
            Some(compile(URL_PATTERN)?)
        } else {
            None
        };

        let filenames = if config.strip_filenames {
            Some((
                compile(FILENAME_PREFIX_PATTERN)?,
                compile(FILENAME_ONLY_PATTERN)?,
            ))
        } else {
            None
        };

        Ok(Self {
            drop_patterns,
            strip_patterns,
            url,
            filenames,
        })
    }

    /// Cleans one message.
    ///
    /// Rules are reapplied until the text stops changing, since removing
    /// one marker can reveal another (`"\u{200e}\u{200e}<This message was
    /// edited>Video call"` becomes a call notice once the edit marker goes).
    /// Every rule only deletes text, so this terminates.
    pub fn sanitize(&self, message: &str) -> String {
        let mut text = self.apply_rules(message);
        loop {
            let next = self.apply_rules(&text);
            if next == text {
                return text;
            }
            text = next;
        }
    }

    fn apply_rules(&self, message: &str) -> String {
        let trimmed = message.trim();

        if self.drop_patterns.iter().any(|p| trimmed.contains(p.as_str())) {
            return String::new();
        }

        let mut text = trimmed.to_string();

        for marker in &self.strip_patterns {
            if text.contains(marker.as_str()) {
                text = text.replace(marker.as_str(), "");
            }
        }

        if let Some(url) = &self.url {
            text = url.replace_all(&text, "").into_owned();
        }

        if let Some((prefix, only)) = &self.filenames {
            let rest = prefix.replace(text.trim(), "").into_owned();
            text = if only.is_match(rest.trim()) {
                String::new()
            } else {
                rest
            };
        }

        text.trim().to_string()
    }
}

fn compile(pattern: &str) -> Result<Regex, EcholaliaError> {
    Regex::new(pattern).map_err(|e| EcholaliaError::invalid_format("sanitizer", e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SanitizeRule;

    fn whatsapp() -> Sanitizer {
        Sanitizer::new(&SanitizerConfig::whatsapp()).unwrap()
    }

    fn imessage() -> Sanitizer {
        Sanitizer::new(&SanitizerConfig::imessage()).unwrap()
    }

    #[test]
    fn test_url_removed_inner_spacing_kept() {
        assert_eq!(whatsapp().sanitize("Check this http://example.com out"), "Check this  out");
        assert_eq!(whatsapp().sanitize("see https://a.b/c?d=e"), "see");
        assert_eq!(whatsapp().sanitize("www.example.com"), "");
    }

    #[test]
    fn test_attachment_dropped() {
        assert_eq!(whatsapp().sanitize("\u{200e}<attached: 00000012-PHOTO-2024.jpg>"), "");
    }

    #[test]
    fn test_call_notices_dropped() {
        let s = whatsapp();
        assert_eq!(s.sanitize("\u{200e}Voice call, \u{200e}12 min"), "");
        assert_eq!(s.sanitize("\u{200e}Missed voice call, \u{200e}Tap to call back"), "");
        assert_eq!(s.sanitize("\u{200e}Video call"), "");
        assert_eq!(s.sanitize("\u{200e}You deleted this message."), "");
        assert_eq!(
            s.sanitize("\u{200e}Messages and calls are end-to-end encrypted. No one outside of this chat can read them."),
            ""
        );
    }

    #[test]
    fn test_notice_without_mark_is_user_text() {
        assert_eq!(whatsapp().sanitize("Video call later?"), "Video call later?");
    }

    #[test]
    fn test_edit_marker_stripped_text_kept() {
        assert_eq!(
            whatsapp().sanitize("See you at 5 \u{200e}<This message was edited>"),
            "See you at 5"
        );
    }

    #[test]
    fn test_whitespace_trimmed() {
        assert_eq!(whatsapp().sanitize("   hi there \t"), "hi there");
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(whatsapp().sanitize("Hello there"), "Hello there");
    }

    #[test]
    fn test_filename_only_dropped() {
        assert_eq!(imessage().sanitize("IMG_4032.heic"), "");
        assert_eq!(
            imessage().sanitize("/Users/me/Library/Messages/Attachments/ab/IMG_4032.jpeg"),
            ""
        );
    }

    #[test]
    fn test_filename_prefix_stripped() {
        assert_eq!(imessage().sanitize("IMG_4032.heic look at this"), "look at this");
        assert_eq!(imessage().sanitize("a.jpg b.png"), "");
    }

    #[test]
    fn test_filename_rule_spares_numbers_and_sentences() {
        assert_eq!(imessage().sanitize("3.14"), "3.14");
        assert_eq!(imessage().sanitize("Sure thing."), "Sure thing.");
    }

    #[test]
    fn test_imessage_reply_notice_dropped() {
        assert_eq!(
            imessage().sanitize("This message responded to an earlier message. ok"),
            ""
        );
    }

    #[test]
    fn test_imessage_keeps_urls() {
        assert_eq!(imessage().sanitize("look https://x.y"), "look https://x.y");
    }

    #[test]
    fn test_idempotent_on_examples() {
        let samples = [
            "Check this http://example.com out",
            "  IMG_1.jpg  hello.txt there ",
            "See you \u{200e}<This message was edited>",
            "photo.jpg http://example.com",
            "",
        ];
        for s in [whatsapp(), imessage()] {
            for sample in samples {
                let once = s.sanitize(sample);
                assert_eq!(s.sanitize(&once), once, "not a fixed point: {sample:?}");
            }
        }
    }

    #[test]
    fn test_marker_removal_revealing_notice_drops_message() {
        let s = whatsapp();
        let text = "\u{200e}\u{200e}<This message was edited>Video call";
        assert_eq!(s.sanitize(text), "");
        assert_eq!(s.sanitize(&s.sanitize(text)), "");
    }

    #[test]
    fn test_url_removal_revealing_marker_strips_it() {
        let s = whatsapp();
        let text = "ok \u{200e}<This message washttp://x.y edited>";
        assert_eq!(s.sanitize(text), "ok");
    }

    #[test]
    fn test_empty_pattern_ignored() {
        let config = SanitizerConfig::new().with_rule(SanitizeRule::drop(""));
        let s = Sanitizer::new(&config).unwrap();
        assert_eq!(s.sanitize("keep me"), "keep me");
    }
}
