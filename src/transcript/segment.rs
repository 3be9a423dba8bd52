//! Word-to-speaker-segment grouping.

use super::{SpeakerSegment, Word};

/// Group an ordered word sequence into contiguous per-speaker segments.
///
/// A fold over the sequence: words are appended to the current segment
/// while the speaker id stays the same, and a speaker change closes the
/// segment and opens a new one. The in-progress segment is always
/// flushed at the end. Words are taken in the order given; the input is
/// never re-sorted and timestamps are not validated.
pub fn build_segments(words: &[Word]) -> Vec<SpeakerSegment> {
    let Some((first, rest)) = words.split_first() else {
        return Vec::new();
    };

    let mut segments = Vec::new();
    let mut speaker = first.speaker;
    let mut text = first.text.clone();
    let mut start = first.start;
    let mut end = first.end;

    for word in rest {
        if word.speaker != speaker {
            segments.push(SpeakerSegment {
                speaker,
                text: text.trim().to_string(),
                start,
                end,
            });
            speaker = word.speaker;
            text = word.text.clone();
            start = word.start;
            end = word.end;
        } else {
            text.push(' ');
            text.push_str(&word.text);
            end = word.end;
        }
    }

    segments.push(SpeakerSegment {
        speaker,
        text: text.trim().to_string(),
        start,
        end,
    });

    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn word(text: &str, start: f64, end: f64, speaker: u32) -> Word {
        Word {
            text: text.to_string(),
            start,
            end,
            speaker,
        }
    }

    #[test]
    fn test_empty_input_yields_no_segments() {
        assert!(build_segments(&[]).is_empty());
    }

    #[test]
    fn test_single_word_yields_single_segment() {
        let segments = build_segments(&[word("hello", 0.25, 0.75, 3)]);

        assert_eq!(
            segments,
            vec![SpeakerSegment {
                speaker: 3,
                text: "hello".to_string(),
                start: 0.25,
                end: 0.75,
            }]
        );
    }

    #[test]
    fn test_constant_speaker_yields_single_segment() {
        let words = vec![
            word("the", 0.0, 0.2, 0),
            word("quick", 0.2, 0.5, 0),
            word("fox", 0.5, 0.9, 0),
        ];
        let segments = build_segments(&words);

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "the quick fox");
        assert_eq!(segments[0].start, 0.0);
        assert_eq!(segments[0].end, 0.9);
    }

    #[test]
    fn test_speaker_change_closes_segment() {
        // End-to-end scenario from the product requirements
        let words = vec![
            word("Hi", 0.0, 0.5, 0),
            word("there", 0.5, 1.0, 0),
            word("Bob", 1.0, 1.5, 1),
        ];
        let segments = build_segments(&words);

        assert_eq!(
            segments,
            vec![
                SpeakerSegment {
                    speaker: 0,
                    text: "Hi there".to_string(),
                    start: 0.0,
                    end: 1.0,
                },
                SpeakerSegment {
                    speaker: 1,
                    text: "Bob".to_string(),
                    start: 1.0,
                    end: 1.5,
                },
            ]
        );
    }

    #[test]
    fn test_speaker_returning_opens_new_segment() {
        // Grouping is change-detection over the sequence, not bucketing:
        // a speaker coming back gets a fresh segment.
        let words = vec![
            word("a", 0.0, 0.1, 0),
            word("b", 0.1, 0.2, 1),
            word("c", 0.2, 0.3, 0),
        ];
        let segments = build_segments(&words);

        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].speaker, 0);
        assert_eq!(segments[1].speaker, 1);
        assert_eq!(segments[2].speaker, 0);
    }

    #[test]
    fn test_trailing_speaker_change_yields_final_segment() {
        let words = vec![word("a", 0.0, 0.5, 0), word("b", 0.5, 1.0, 1)];
        let segments = build_segments(&words);

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].text, "b");
        assert_eq!(segments[1].start, 0.5);
        assert_eq!(segments[1].end, 1.0);
    }

    #[test]
    fn test_malformed_timestamps_pass_through() {
        // Structure only: end-before-start is not this function's problem
        let words = vec![word("x", 5.0, 2.0, 0)];
        let segments = build_segments(&words);

        assert_eq!(segments[0].start, 5.0);
        assert_eq!(segments[0].end, 2.0);
    }

    #[test]
    fn test_segment_texts_reassemble_flat_transcript() {
        let words = vec![
            word("One", 0.0, 0.3, 0),
            word("two.", 0.3, 0.6, 0),
            word("Three", 0.6, 0.9, 2),
            word("four.", 0.9, 1.2, 2),
        ];
        let segments = build_segments(&words);

        let from_segments = segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let from_words = words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        assert_eq!(from_segments, from_words);
    }

    // Strategy: short word texts with sequential timestamps and a small
    // speaker pool so adjacent-pair changes actually occur.
    fn arb_words() -> impl Strategy<Value = Vec<Word>> {
        proptest::collection::vec(("[a-z]{1,8}", 0u32..4), 0..64).prop_map(|pairs| {
            pairs
                .into_iter()
                .enumerate()
                .map(|(i, (text, speaker))| Word {
                    text,
                    start: i as f64 * 0.5,
                    end: i as f64 * 0.5 + 0.5,
                    speaker,
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_segment_count_is_one_plus_speaker_changes(words in arb_words()) {
            let segments = build_segments(&words);

            if words.is_empty() {
                prop_assert!(segments.is_empty());
            } else {
                let changes = words
                    .windows(2)
                    .filter(|pair| pair[0].speaker != pair[1].speaker)
                    .count();
                prop_assert_eq!(segments.len(), changes + 1);
            }
        }

        #[test]
        fn prop_constant_speaker_single_segment(
            texts in proptest::collection::vec("[a-z]{1,8}", 1..32),
            speaker in 0u32..8,
        ) {
            let words: Vec<Word> = texts
                .iter()
                .enumerate()
                .map(|(i, text)| Word {
                    text: text.clone(),
                    start: i as f64,
                    end: i as f64 + 1.0,
                    speaker,
                })
                .collect();
            let segments = build_segments(&words);

            prop_assert_eq!(segments.len(), 1);
            prop_assert_eq!(segments[0].speaker, speaker);
            prop_assert_eq!(segments[0].start, words[0].start);
            prop_assert_eq!(segments[0].end, words[words.len() - 1].end);
            prop_assert_eq!(segments[0].text.clone(), texts.join(" "));
        }

        #[test]
        fn prop_grouping_is_idempotent(words in arb_words()) {
            // No mutation of the input: two runs agree structurally
            let once = build_segments(&words);
            let twice = build_segments(&words);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_segments_preserve_word_order(words in arb_words()) {
            let segments = build_segments(&words);

            let reassembled: Vec<&str> = segments
                .iter()
                .flat_map(|s| s.text.split_whitespace())
                .collect();
            let original: Vec<&str> = words.iter().map(|w| w.text.as_str()).collect();
            prop_assert_eq!(reassembled, original);
        }
    }
}
