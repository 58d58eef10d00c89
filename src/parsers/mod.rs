//! Chat export parsers for the supported apps.
//!
//! Each parser implements the [`Parser`](crate::parser::Parser) trait.
//!
//! # Available Parsers
//!
//! - [`WhatsAppParser`] - Parses WhatsApp TXT exports
//! - [`IMessageParser`] - Parses imessage-exporter TXT files
//!
//! # Example
//!
//! ```rust
//! use echolalia::parser::{Source, create_parser};
//!
//! let parser = create_parser(Source::IMessage);
//! // let messages = parser.parse_file("Alice.txt")?;
//! ```

mod imessage;
mod whatsapp;

pub use imessage::IMessageParser;
pub use whatsapp::WhatsAppParser;
