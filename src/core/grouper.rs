//! Turn grouping.
//!
//! Collapses consecutive messages from the same speaker into [`Turn`]s.
//! This is what makes a noisy per-line stream usable for pair alignment:
//! after grouping, no two adjacent turns share a speaker.
//!
//! # Example
//!
//! ```rust
//! use echolalia::Message;
//! use echolalia::core::group_turns;
//! use chrono::{TimeZone, Utc};
//!
//! let t0 = Utc.with_ymd_and_hms(2024, 1, 2, 15, 4, 5).unwrap();
//! let t1 = Utc.with_ymd_and_hms(2024, 1, 2, 15, 4, 10).unwrap();
//! let messages = vec![Message::new("Alice", t0, "Hi"), Message::new("Alice", t1, "there")];
//!
//! let turns = group_turns(&messages);
//! assert_eq!(turns.len(), 1);
//! assert_eq!(turns[0].text, "Hi there");
//! assert_eq!(turns[0].message_count, 2);
//! ```

use crate::core::models::Turn;
use crate::message::Message;

/// Groups the usable messages of a document into chronological turns.
///
/// 1. Messages with an exception (or without attribution) are skipped.
/// 2. The rest are stably sorted by timestamp, so messages sharing a
///    timestamp keep their source order.
/// 3. Maximal same-speaker runs become one turn each.
pub fn group_turns(messages: &[Message]) -> Vec<Turn> {
    let mut usable: Vec<(&str, chrono::DateTime<chrono::Utc>, &str)> = messages
        .iter()
        .filter(|m| m.exception.is_none())
        .filter_map(|m| Some((m.speaker.as_deref()?, m.timestamp?, m.text.as_str())))
        .collect();

    usable.sort_by_key(|&(_, timestamp, _)| timestamp);

    let mut turns: Vec<Turn> = Vec::new();
    let mut previous = None;

    for (speaker, timestamp, text) in usable {
        match turns.last_mut() {
            Some(last) if last.speaker == speaker => last.push(timestamp, text),
            _ => {
                let mut turn = Turn::new(speaker, timestamp, text);
                turn.gap_before = previous.map(|p| timestamp - p);
                turns.push(turn);
            }
        }
        previous = Some(timestamp);
    }

    tracing::debug!(
        messages = messages.len(),
        turns = turns.len(),
        "grouped messages into turns"
    );

    turns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExceptionKind;
    use chrono::{DateTime, TimeDelta, TimeZone, Utc};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 15, 0, 0).unwrap() + TimeDelta::seconds(secs)
    }

    #[test]
    fn test_group_same_speaker() {
        let messages = vec![
            Message::new("Alice", at(0), "Hi"),
            Message::new("Alice", at(5), "there"),
        ];
        let turns = group_turns(&messages);
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].speaker, "Alice");
        assert_eq!(turns[0].text, "Hi there");
        assert_eq!(turns[0].message_count, 2);
        assert_eq!(turns[0].timestamps, vec![at(0), at(5)]);
        assert_eq!(turns[0].gap_before, None);
    }

    #[test]
    fn test_group_alternating() {
        let messages = vec![
            Message::new("Alice", at(0), "Hi"),
            Message::new("Bob", at(30), "Hey"),
            Message::new("Alice", at(40), "How are you?"),
        ];
        let turns = group_turns(&messages);
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[1].gap_before, Some(TimeDelta::seconds(30)));
        assert_eq!(turns[2].gap_before, Some(TimeDelta::seconds(10)));
    }

    #[test]
    fn test_excluded_rows_skipped() {
        let messages = vec![
            Message::new("Alice", at(0), "Hi"),
            Message::new("Bob", at(1), "").with_exception(ExceptionKind::EmptyContent),
            Message::excluded("orphan", 3, ExceptionKind::ContextlessMessage),
            Message::new("Alice", at(2), "again"),
        ];
        let turns = group_turns(&messages);
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].message_count, 2);
    }

    #[test]
    fn test_sorted_by_timestamp() {
        let messages = vec![
            Message::new("Bob", at(60), "later"),
            Message::new("Alice", at(0), "first"),
            Message::new("Bob", at(30), "middle"),
        ];
        let turns = group_turns(&messages);
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].speaker, "Alice");
        assert_eq!(turns[1].text, "middle later");
    }

    #[test]
    fn test_equal_timestamps_keep_source_order() {
        let messages = vec![
            Message::new("Alice", at(0), "one"),
            Message::new("Alice", at(0), "two"),
            Message::new("Alice", at(0), "three"),
        ];
        assert_eq!(group_turns(&messages)[0].text, "one two three");
    }

    #[test]
    fn test_empty_input() {
        assert!(group_turns(&[]).is_empty());
    }

    #[test]
    fn test_count_invariant() {
        let messages = vec![
            Message::new("Alice", at(0), "a"),
            Message::new("Bob", at(1), "b"),
            Message::new("Bob", at(2), "c"),
            Message::excluded("x", 4, ExceptionKind::ContextlessMessage),
            Message::new("Alice", at(3), "d"),
        ];
        let turns = group_turns(&messages);
        let total: usize = turns.iter().map(|t| t.message_count).sum();
        assert_eq!(total, messages.iter().filter(|m| m.exception.is_none()).count());
        assert!(turns.windows(2).all(|w| w[0].speaker != w[1].speaker));
    }
}
