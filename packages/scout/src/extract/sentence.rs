//! Qualifying-sentence heuristics for the health-tip pipeline.
//!
//! Structural filters first (length, word count, punctuation), then a
//! topical keyword gate. Bounds are character counts, matching how the
//! sentences are displayed.

/// Blocks shorter than this are noise (nav items, captions).
const MIN_BLOCK_LEN: usize = 40;

const MIN_SENTENCE_LEN: usize = 60;
const MAX_SENTENCE_LEN: usize = 240;
const MIN_WORDS: usize = 12;
const MAX_WORDS: usize = 40;

/// Characters that mark a sentence as structural rather than prose.
const REJECT_CHARS: [char; 3] = [':', '•', '|'];

/// Collect every qualifying sentence from paragraph/list-item blocks.
///
/// Blocks keep their original case; only the keyword match is
/// case-insensitive.
pub fn candidate_sentences(blocks: &[String], keywords: &[String]) -> Vec<String> {
    let mut sentences = Vec::new();

    for block in blocks {
        let collapsed = block.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.chars().count() < MIN_BLOCK_LEN {
            continue;
        }
        for sentence in split_sentences(&collapsed) {
            if qualifies(sentence, keywords) {
                sentences.push(sentence.to_string());
            }
        }
    }

    sentences
}

/// Split on boundaries following `.`, `!` or `?` plus whitespace.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            if let Some(&(next_i, next_c)) = chars.peek() {
                if next_c.is_whitespace() {
                    let piece = text[start..=i].trim();
                    if !piece.is_empty() {
                        parts.push(piece);
                    }
                    start = next_i;
                }
            }
        }
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        parts.push(tail);
    }

    parts
}

/// The acceptance predicate for a single sentence.
pub fn qualifies(sentence: &str, keywords: &[String]) -> bool {
    let len = sentence.chars().count();
    if !(MIN_SENTENCE_LEN..=MAX_SENTENCE_LEN).contains(&len) {
        return false;
    }

    let words = sentence.split_whitespace().count();
    if !(MIN_WORDS..=MAX_WORDS).contains(&words) {
        return false;
    }

    if sentence.contains(&REJECT_CHARS[..]) {
        return false;
    }

    if !sentence.ends_with(&['.', '!', '?'][..]) {
        return false;
    }

    let lowered = sentence.to_lowercase();
    keywords.iter().any(|k| lowered.contains(k.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TipConfig;

    fn keywords() -> Vec<String> {
        TipConfig::default().keywords
    }

    #[test]
    fn accepts_a_plain_healthy_sentence() {
        let s = "Eating plenty of vegetables and fruit every day helps keep \
                 your diet balanced and your heart healthy.";
        assert!(qualifies(s, &keywords()));
    }

    #[test]
    fn rejects_out_of_bounds_lengths() {
        let short = "Eat more fruit and vegetables every single day.";
        assert!(!qualifies(short, &keywords()));

        let long = "vegetable ".repeat(30) + "and that is the whole story of it.";
        assert!(!qualifies(&long, &keywords()));
    }

    #[test]
    fn rejects_structural_characters_and_missing_terminator() {
        let colon = "Healthy eating tips: choose whole grains and vegetables \
                     whenever you plan your daily meals today.";
        assert!(!qualifies(colon, &keywords()));

        let unterminated = "Choose whole grains and plenty of vegetables whenever \
                            you plan your daily meals and snacks";
        assert!(!qualifies(unterminated, &keywords()));
    }

    #[test]
    fn rejects_sentences_without_topical_keywords() {
        let s = "The committee will meet on the second floor of the building \
                 to discuss the annual planning schedule.";
        assert!(!qualifies(s, &keywords()));
    }

    #[test]
    fn splits_on_terminator_plus_whitespace_only() {
        let parts = split_sentences("First one. Second one! Version 2.5 stays. Third?");
        assert_eq!(
            parts,
            vec!["First one.", "Second one!", "Version 2.5 stays.", "Third?"]
        );
    }

    #[test]
    fn skips_blocks_under_forty_characters() {
        let blocks = vec![
            "Too short to matter.".to_string(),
            "Eating plenty of vegetables and fruit every day helps keep your \
             diet balanced and your heart healthy."
                .to_string(),
        ];
        let found = candidate_sentences(&blocks, &keywords());
        assert_eq!(found.len(), 1);
        assert!(found[0].starts_with("Eating plenty"));
    }
}
