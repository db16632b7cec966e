//! Flesch readability metrics for the finished text.
//!
//! Grade: `0.39 * (words/sentences) + 11.8 * (syllables/words) - 15.59`
//! Ease:  `206.835 - 1.015 * (words/sentences) - 84.6 * (syllables/words)`
//!
//! Syllables are estimated from vowel groups, which is close enough for a
//! score that is only shown to the reader.

use crate::collaborators::ReadabilityScorer;
use crate::error::CollaboratorError;
use crate::parsing::split_sentences_heuristic;
use crate::types::text_data::ReadabilityReport;

/// Built-in scorer backed by [`readability_report`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FleschScorer;

impl ReadabilityScorer for FleschScorer {
    fn readability_score(&self, text: &str) -> Result<ReadabilityReport, CollaboratorError> {
        readability_report(text)
    }
}

pub fn readability_report(text: &str) -> Result<ReadabilityReport, CollaboratorError> {
    let words: Vec<&str> = text
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| !w.is_empty())
        .collect();
    let sentences = split_sentences_heuristic(text)
        .iter()
        .filter(|s| s.chars().any(char::is_alphanumeric))
        .count();
    if words.is_empty() || sentences == 0 {
        return Err(CollaboratorError::malformed("readability", "no words to score"));
    }

    let syllables: usize = words.iter().map(|w| count_syllables(w)).sum();
    let words_per_sentence = words.len() as f64 / sentences as f64;
    let syllables_per_word = syllables as f64 / words.len() as f64;

    Ok(ReadabilityReport {
        grade_level: 0.39f64.mul_add(words_per_sentence, 11.8 * syllables_per_word) - 15.59,
        ease_score: 206.835 - 1.015 * words_per_sentence - 84.6 * syllables_per_word,
        sentences,
        words: words.len(),
        syllables,
    })
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y')
}

/// Vowel groups, minus a silent final "e". Never less than one.
pub fn count_syllables(word: &str) -> usize {
    let lower: Vec<char> = word
        .chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect();
    if lower.is_empty() {
        // Numerals and symbols read as one beat.
        return 1;
    }

    let mut groups = 0;
    let mut in_group = false;
    for &c in &lower {
        let vowel = is_vowel(c);
        if vowel && !in_group {
            groups += 1;
        }
        in_group = vowel;
    }

    let n = lower.len();
    let silent_e = n > 2 && lower[n - 1] == 'e' && !is_vowel(lower[n - 2]) && lower[n - 2] != 'l';
    if silent_e {
        groups -= 1;
    }
    groups.max(1)
}
