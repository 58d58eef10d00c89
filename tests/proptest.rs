//! Property-based tests for echolalia.
//!
//! These tests generate random inputs to find edge cases.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use proptest::prelude::*;

use echolalia::config::SanitizerConfig;
use echolalia::parsing::Sanitizer;
use echolalia::prelude::*;

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 2, 15, 0, 0).unwrap()
}

/// Generate a random Message using fast strategies (no regex!)
fn arb_message(speakers: Vec<&'static str>) -> impl Strategy<Value = Message> {
    (
        prop::sample::select(speakers),
        // Small offsets so that equal timestamps are common
        0i64..30,
        prop::sample::select(vec!["Hello", "Hi there!", "How are you?", "Привет мир", "🎉 emoji", "ok"]),
        prop::option::weighted(
            0.2,
            prop::sample::select(vec![ExceptionKind::ContextlessMessage, ExceptionKind::EmptyContent]),
        ),
    )
        .prop_map(|(speaker, offset, text, exception)| {
            let message = Message::new(speaker, base() + TimeDelta::seconds(offset), text);
            match exception {
                Some(kind) => message.with_exception(kind),
                None => message,
            }
        })
}

fn arb_messages(speakers: Vec<&'static str>, max_len: usize) -> impl Strategy<Value = Vec<Message>> {
    prop::collection::vec(arb_message(speakers), 0..max_len)
}

/// Message fragments mixing user text with markers the sanitizers act on.
fn arb_fragment() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "Hello".to_string(),
        "  spaced  out  ".to_string(),
        "http://example.com".to_string(),
        "www.example.org/path".to_string(),
        "IMG_4032.heic".to_string(),
        "notes.txt".to_string(),
        "3.14".to_string(),
        "\u{200e}<This message was edited>".to_string(),
        "\u{200e}<attached: a.jpg>".to_string(),
        "Video call later?".to_string(),
        "\u{200e}".to_string(),
        "Video call".to_string(),
        "<This message was".to_string(),
        "\t".to_string(),
        String::new(),
    ])
}

/// Fragments glued together, with or without a separating space.
fn arb_message_text() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(arb_fragment(), 0..6),
        prop::sample::select(vec!["", " "]),
    )
        .prop_map(|(fragments, separator)| fragments.join(separator))
}

/// A line of a WhatsApp export: a header, a continuation, a notice or noise.
fn arb_whatsapp_line() -> impl Strategy<Value = String> {
    (
        prop::sample::select(vec!["Alice", "Bob"]),
        0u32..60,
        arb_fragment(),
        0u8..4,
    )
        .prop_map(|(speaker, minute, text, kind)| match kind {
            0 | 1 => format!("[1/2/24, 3:{minute:02}:00 PM] {speaker}: {text}"),
            2 => text,
            _ => format!("[99/99/24, 3:{minute:02}:00 PM] {speaker}: {text}"),
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // ============================================
    // SANITIZER PROPERTIES
    // ============================================

    /// Sanitizing twice is the same as sanitizing once
    #[test]
    fn sanitize_is_idempotent(text in arb_message_text()) {
        for config in [SanitizerConfig::whatsapp(), SanitizerConfig::imessage()] {
            let sanitizer = Sanitizer::new(&config).unwrap();
            let once = sanitizer.sanitize(&text);
            prop_assert_eq!(sanitizer.sanitize(&once), once);
        }
    }

    /// Sanitized text never carries surrounding whitespace
    #[test]
    fn sanitize_output_is_trimmed(text in arb_message_text()) {
        let sanitizer = Sanitizer::new(&SanitizerConfig::whatsapp()).unwrap();
        let out = sanitizer.sanitize(&text);
        prop_assert_eq!(out.trim(), out.as_str());
    }

    // ============================================
    // RECONSTRUCTION PROPERTIES
    // ============================================

    /// Every row is either fully attributed or carries an exception
    #[test]
    fn rows_attributed_or_excluded(lines in prop::collection::vec(arb_whatsapp_line(), 0..30)) {
        let messages = WhatsAppParser::new().parse_str(&lines.join("\n")).unwrap();
        for m in &messages {
            prop_assert!(m.exception.is_some() || (m.speaker().is_some() && m.timestamp().is_some()));
            prop_assert!(m.exception.is_some() || !m.text().is_empty());
        }
    }

    /// Rows come out in source line order
    #[test]
    fn rows_follow_line_order(lines in prop::collection::vec(arb_whatsapp_line(), 0..30)) {
        let messages = WhatsAppParser::new().parse_str(&lines.join("\n")).unwrap();
        for pair in messages.windows(2) {
            prop_assert!(pair[0].line_number < pair[1].line_number);
        }
    }

    // ============================================
    // GROUPING PROPERTIES
    // ============================================

    /// No two adjacent turns share a speaker
    #[test]
    fn turns_alternate(messages in arb_messages(vec!["Alice", "Bob", "Carol"], 40)) {
        let turns = group_turns(&messages);
        for pair in turns.windows(2) {
            prop_assert_ne!(&pair[0].speaker, &pair[1].speaker);
        }
    }

    /// Turn message counts add up to the usable rows
    #[test]
    fn turn_counts_sum_to_usable(messages in arb_messages(vec!["Alice", "Bob", "Carol"], 40)) {
        let usable = messages.iter().filter(|m| m.is_usable()).count();
        let turns = group_turns(&messages);
        prop_assert_eq!(turns.iter().map(|t| t.message_count).sum::<usize>(), usable);
        for turn in &turns {
            prop_assert_eq!(turn.timestamps.len(), turn.message_count);
        }
    }

    /// Turns are chronological
    #[test]
    fn turns_are_chronological(messages in arb_messages(vec!["Alice", "Bob"], 40)) {
        let turns = group_turns(&messages);
        let times: Vec<_> = turns.iter().flat_map(|t| t.timestamps.iter().copied()).collect();
        for pair in times.windows(2) {
            prop_assert!(pair[0] <= pair[1]);
        }
    }

    // ============================================
    // ALIGNMENT PROPERTIES
    // ============================================

    /// Two-party conversations always align, and outputs belong to the target
    #[test]
    fn two_party_always_aligns(messages in arb_messages(vec!["Alice", "Bob"], 40)) {
        let turns = group_turns(&messages);
        let pairs = align_pairs(&turns, "Bob").unwrap();
        prop_assert!(pairs.len() <= turns.len() / 2);

        let bob_texts: Vec<_> = turns.iter().filter(|t| t.speaker == "Bob").map(|t| t.text.as_str()).collect();
        for pair in &pairs {
            prop_assert!(bob_texts.contains(&pair.output.as_str()));
        }
    }

    /// A third speaker between the boundary turns never aligns
    #[test]
    fn third_speaker_never_aligns(messages in arb_messages(vec!["Alice", "Bob", "Carol"], 40)) {
        let turns = group_turns(&messages);
        let mut inner: &[Turn] = &turns;
        if inner.first().is_some_and(|t| t.speaker == "Bob") {
            inner = &inner[1..];
        }
        if inner.last().is_some_and(|t| t.speaker != "Bob") {
            inner = &inner[..inner.len() - 1];
        }
        let partners: std::collections::BTreeSet<_> = inner
            .iter()
            .filter(|t| t.speaker != "Bob")
            .map(|t| t.speaker.as_str())
            .collect();

        match align_pairs(&turns, "Bob") {
            Ok(pairs) => {
                prop_assert!(partners.len() <= 1);
                prop_assert_eq!(pairs.len() * 2, inner.len());
            }
            Err(_) => prop_assert!(!inner.is_empty()),
        }
    }
}
