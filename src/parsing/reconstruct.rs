//! Message reconstruction.
//!
//! The reconstructor is a fold over classified lines. Its accumulator holds
//! the running `(speaker, timestamp)` context, the messages emitted so far
//! and, for formats that merge continuation lines, the message still being
//! assembled.
//!
//! # Rules
//!
//! - A header emits a new message and replaces the context.
//! - A continuation with context either emits a new record carrying the
//!   context ([`ContinuationPolicy::NewRecord`]) or is appended, space
//!   separated, to the open message ([`ContinuationPolicy::AppendToPrevious`]).
//! - A continuation without context emits a row tagged
//!   [`ExceptionKind::ContextlessMessage`].
//! - An unrecognized header emits a contextless row and clears the context.
//! - Any message whose sanitized text is empty is tagged
//!   [`ExceptionKind::EmptyContent`].
//! - Blank continuation lines carry nothing and emit nothing.
//!
//! Output order follows source line order.

use chrono::{DateTime, Utc};

use crate::message::{ExceptionKind, Message};

use super::{ClassifiedLine, LineClass, Sanitizer};

/// How a format treats lines that continue a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContinuationPolicy {
    /// Each continuation line becomes its own record with the carried
    /// speaker and timestamp.
    NewRecord,
    /// Continuation lines are appended to the open message.
    AppendToPrevious,
}

/// Folds classified lines into messages.
///
/// # Example
///
/// ```rust
/// use echolalia::config::SanitizerConfig;
/// use echolalia::parsing::whatsapp::{DateFormat, WhatsAppClassifier};
/// use echolalia::parsing::{ContinuationPolicy, Reconstructor, Sanitizer};
///
/// let classifier = WhatsAppClassifier::new(DateFormat::US)?;
/// let sanitizer = Sanitizer::new(&SanitizerConfig::whatsapp())?;
/// let reconstructor = Reconstructor::new(&sanitizer, ContinuationPolicy::NewRecord);
///
/// let lines = classifier.classify_document("[1/2/24, 3:04:05 PM] Alice: Hello there");
/// let messages = reconstructor.reconstruct(lines);
/// assert_eq!(messages[0].speaker(), Some("Alice"));
/// assert_eq!(messages[0].text(), "Hello there");
/// # Ok::<(), echolalia::EcholaliaError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Reconstructor<'s> {
    sanitizer: &'s Sanitizer,
    policy: ContinuationPolicy,
}

impl<'s> Reconstructor<'s> {
    /// Creates a reconstructor.
    pub fn new(sanitizer: &'s Sanitizer, policy: ContinuationPolicy) -> Self {
        Self { sanitizer, policy }
    }

    /// Returns the continuation policy.
    pub fn policy(&self) -> ContinuationPolicy {
        self.policy
    }

    /// Runs the fold over a document's classified lines.
    pub fn reconstruct<'a, I>(&self, lines: I) -> Vec<Message>
    where
        I: IntoIterator<Item = ClassifiedLine<'a>>,
    {
        let messages = lines
            .into_iter()
            .fold(Fold::default(), |acc, line| acc.step(self, line))
            .finish(self);

        let excluded = messages.iter().filter(|m| m.exception.is_some()).count();
        tracing::debug!(
            total = messages.len(),
            excluded,
            policy = ?self.policy,
            "reconstructed messages"
        );

        messages
    }
}

/// Speaker and timestamp established by the latest header.
#[derive(Debug, Clone, Default)]
struct Context {
    speaker: Option<String>,
    timestamp: Option<DateTime<Utc>>,
}

impl Context {
    fn get(&self) -> Option<(&str, DateTime<Utc>)> {
        match (&self.speaker, self.timestamp) {
            (Some(speaker), Some(timestamp)) => Some((speaker, timestamp)),
            _ => None,
        }
    }
}

/// A message whose text is still being collected.
#[derive(Debug)]
struct OpenMessage {
    message: Message,
    parts: Vec<String>,
}

#[derive(Debug, Default)]
struct Fold {
    context: Context,
    messages: Vec<Message>,
    open: Option<OpenMessage>,
}

impl Fold {
    fn step(mut self, r: &Reconstructor<'_>, line: ClassifiedLine<'_>) -> Self {
        match line.class {
            LineClass::Header {
                speaker,
                timestamp,
                text,
            } => {
                self.close(r);
                self.context = Context {
                    speaker: Some(speaker.to_string()),
                    timestamp: Some(timestamp),
                };

                let message = Message {
                    timestamp: Some(timestamp),
                    speaker: Some(speaker.to_string()),
                    text: String::new(),
                    raw_line: line.raw.into_owned(),
                    line_number: line.number,
                    exception: None,
                };

                match r.policy {
                    ContinuationPolicy::NewRecord => self.emit(r, message, text),
                    ContinuationPolicy::AppendToPrevious => {
                        let parts = if text.trim().is_empty() {
                            Vec::new()
                        } else {
                            vec![text.trim().to_string()]
                        };
                        self.open = Some(OpenMessage { message, parts });
                    }
                }
            }
            LineClass::Continuation(text) if text.trim().is_empty() => {}
            LineClass::Continuation(text) => {
                if let Some(open) = self.open.as_mut() {
                    open.parts.push(text.trim().to_string());
                    open.message.raw_line.push('\n');
                    open.message.raw_line.push_str(&line.raw);
                } else if let Some((speaker, timestamp)) = self.context.get() {
                    let message = Message::new(speaker, timestamp, String::new())
                        .with_raw_line(line.raw.into_owned())
                        .with_line_number(line.number);
                    self.emit(r, message, text);
                } else {
                    let message = Message::excluded(
                        line.raw.into_owned(),
                        line.number,
                        ExceptionKind::ContextlessMessage,
                    );
                    self.emit(r, message, text);
                }
            }
            LineClass::Unrecognized => {
                self.close(r);
                self.context = Context::default();
                let message = Message::excluded(
                    line.raw.as_ref(),
                    line.number,
                    ExceptionKind::ContextlessMessage,
                );
                self.emit(r, message, &line.raw);
            }
        }

        self
    }

    /// Sanitizes `text` into `message` and appends it.
    fn emit(&mut self, r: &Reconstructor<'_>, mut message: Message, text: &str) {
        message.text = r.sanitizer.sanitize(text);
        message.mark_if_empty();
        self.messages.push(message);
    }

    /// Finalizes the open message, if any.
    fn close(&mut self, r: &Reconstructor<'_>) {
        if let Some(OpenMessage { message, parts }) = self.open.take() {
            let joined = parts.join(" ");
            self.emit(r, message, &joined);
        }
    }

    fn finish(mut self, r: &Reconstructor<'_>) -> Vec<Message> {
        self.close(r);
        self.messages
    }
}
