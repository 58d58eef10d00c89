//! Pair alignment.
//!
//! Turns the turn sequence of a two-party conversation into
//! input/output examples for one target speaker.

use crate::core::models::{TrainingPair, Turn};
use crate::error::AlignmentError;

/// Aligns turns into `(input, output)` pairs where `output` is always a
/// turn of `target`.
///
/// A leading target turn has no input and is dropped; a trailing
/// non-target turn has no output and is dropped. The remaining turns must
/// alternate between one other speaker and the target, otherwise a pair
/// would be attributed to the wrong speaker and
/// [`AlignmentError::NotAlternating`] is returned. A third speaker is
/// rejected even where it sits in an input slot.
///
/// # Example
///
/// ```rust
/// use echolalia::core::{Turn, align_pairs};
/// use chrono::{TimeZone, Utc};
///
/// let ts = Utc.with_ymd_and_hms(2024, 1, 2, 15, 0, 0).unwrap();
/// let turns = vec![
///     Turn::new("B", ts, "hello?"),
///     Turn::new("A", ts, "hi"),
///     Turn::new("B", ts, "hey A"),
/// ];
///
/// let pairs = align_pairs(&turns, "B")?;
/// assert_eq!(pairs.len(), 1);
/// assert_eq!(pairs[0].input, "hi");
/// assert_eq!(pairs[0].output, "hey A");
/// # Ok::<(), echolalia::error::AlignmentError>(())
/// ```
pub fn align_pairs(turns: &[Turn], target: &str) -> Result<Vec<TrainingPair>, AlignmentError> {
    let mut trimmed = turns;

    if let Some((first, rest)) = trimmed.split_first() {
        if first.speaker == target {
            trimmed = rest;
        }
    }
    if let Some((last, rest)) = trimmed.split_last() {
        if last.speaker != target {
            trimmed = rest;
        }
    }

    // Every input must come from the speaker of the first one
    let partner = trimmed.first().map(|t| t.speaker.as_str());

    trimmed
        .chunks(2)
        .enumerate()
        .map(|(i, chunk)| match chunk {
            [input, output]
                if input.speaker != target
                    && partner == Some(input.speaker.as_str())
                    && output.speaker == target =>
            {
                Ok(TrainingPair::new(input.text.clone(), output.text.clone()))
            }
            _ => Err(AlignmentError::NotAlternating {
                index: i * 2,
                input: chunk[0].speaker.clone(),
                target: target.to_string(),
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn turns(speakers: &[&str]) -> Vec<Turn> {
        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 15, 0, 0).unwrap();
        speakers
            .iter()
            .enumerate()
            .map(|(i, s)| Turn::new(*s, ts, format!("{s}{i}")))
            .collect()
    }

    #[test]
    fn test_no_trimming_needed() {
        let pairs = align_pairs(&turns(&["A", "B", "A", "B"]), "B").unwrap();
        assert_eq!(
            pairs,
            vec![TrainingPair::new("A0", "B1"), TrainingPair::new("A2", "B3")]
        );
    }

    #[test]
    fn test_leading_target_dropped() {
        let pairs = align_pairs(&turns(&["B", "A", "B"]), "B").unwrap();
        assert_eq!(pairs, vec![TrainingPair::new("A1", "B2")]);
    }

    #[test]
    fn test_trailing_input_dropped() {
        let pairs = align_pairs(&turns(&["A", "B", "A"]), "B").unwrap();
        assert_eq!(pairs, vec![TrainingPair::new("A0", "B1")]);
    }

    #[test]
    fn test_both_ends_trimmed() {
        let pairs = align_pairs(&turns(&["B", "A", "B", "A"]), "B").unwrap();
        assert_eq!(pairs, vec![TrainingPair::new("A1", "B2")]);
    }

    #[test]
    fn test_empty_and_degenerate() {
        assert!(align_pairs(&[], "B").unwrap().is_empty());
        assert!(align_pairs(&turns(&["B"]), "B").unwrap().is_empty());
        assert!(align_pairs(&turns(&["A"]), "B").unwrap().is_empty());
    }

    #[test]
    fn test_target_never_speaks() {
        assert!(align_pairs(&turns(&["A", "C"]), "B").is_err());
    }

    #[test]
    fn test_group_chat_rejected() {
        let err = align_pairs(&turns(&["A", "B", "C", "A", "B"]), "B").unwrap_err();
        assert_eq!(
            err,
            AlignmentError::NotAlternating {
                index: 2,
                input: "C".into(),
                target: "B".into(),
            }
        );
    }

    #[test]
    fn test_third_speaker_in_input_slot_rejected() {
        let err = align_pairs(&turns(&["A", "B", "C", "B"]), "B").unwrap_err();
        assert_eq!(
            err,
            AlignmentError::NotAlternating {
                index: 2,
                input: "C".into(),
                target: "B".into(),
            }
        );
    }

    #[test]
    fn test_third_speaker_after_trimming_rejected() {
        assert!(align_pairs(&turns(&["B", "C", "B", "A", "B"]), "B").is_err());
    }
}
