use once_cell::sync::Lazy;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::collaborators::SentenceSegmenter;
use crate::error::CollaboratorError;

use super::tokenizer::HeuristicAnalyzer;

static RULE_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]\s").unwrap());

const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "vs", "etc", "e.g", "i.e", "no", "approx",
];

fn push_trimmed(out: &mut Vec<String>, piece: &str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        out.push(piece.to_string());
    }
}

/// Splits after `.`, `!` or `?` when whitespace follows. Nothing else.
pub fn split_sentences_by_rule(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for m in RULE_BOUNDARY.find_iter(text) {
        // The terminal marks are one byte wide.
        let end = m.start() + 1;
        push_trimmed(&mut sentences, &text[start..end]);
        start = end;
    }
    push_trimmed(&mut sentences, &text[start..]);
    sentences
}

/// The last whitespace-separated word of `text`.
fn last_word(text: &str) -> &str {
    let begin = text
        .rfind(|c: char| c.is_whitespace() || c == '(' || c == '"')
        .map(|i| i + 1)
        .unwrap_or(0);
    &text[begin..]
}

fn is_abbreviation(word: &str) -> bool {
    let bare = word.trim_end_matches('.').to_lowercase();
    if ABBREVIATIONS.contains(&bare.as_str()) {
        return true;
    }
    // Initials such as the "J." in "J. K. Rowling"
    let mut letters = bare.chars();
    matches!((letters.next(), letters.next()), (Some(c), None) if c.is_alphabetic())
        && word.starts_with(|c: char| c.is_uppercase())
}

/// A single period closing a known abbreviation or an initial.
fn ends_with_abbreviation(sentence: &str) -> bool {
    let sentence = sentence.trim_end();
    sentence.ends_with('.') && !sentence.ends_with("..") && is_abbreviation(last_word(sentence))
}

fn starts_lowercase(piece: &str) -> bool {
    piece
        .trim_start()
        .chars()
        .next()
        .is_some_and(char::is_lowercase)
}

/// Unicode sentence bounds, re-joined where a bound falls after an
/// abbreviation or initial, or where the next piece starts lowercase.
pub fn split_sentences_heuristic(text: &str) -> Vec<String> {
    let bounds: Vec<&str> = text.split_sentence_bounds().collect();
    let mut sentences = Vec::new();
    let mut pending = String::new();
    for (i, piece) in bounds.iter().enumerate() {
        pending.push_str(piece);
        let continues = ends_with_abbreviation(&pending)
            || bounds.get(i + 1).is_some_and(|next| starts_lowercase(next));
        if !continues {
            push_trimmed(&mut sentences, &pending);
            pending.clear();
        }
    }
    push_trimmed(&mut sentences, &pending);
    sentences
}

/// Strict rule-based segmenter.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleSegmenter;

impl SentenceSegmenter for RuleSegmenter {
    fn segment_sentences(&self, text: &str) -> Result<Vec<String>, CollaboratorError> {
        Ok(split_sentences_by_rule(text))
    }
}

impl SentenceSegmenter for HeuristicAnalyzer {
    fn segment_sentences(&self, text: &str) -> Result<Vec<String>, CollaboratorError> {
        Ok(split_sentences_heuristic(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("One. Two! Three?", &["One.", "Two!", "Three?"])]
    #[case("No terminator here", &["No terminator here"])]
    #[case("Pi is 3.14 today. Yes.", &["Pi is 3.14 today.", "Yes."])]
    #[case("Wait?! Okay.", &["Wait?!", "Okay."])]
    #[case("   ", &[])]
    fn rule_splits(#[case] text: &str, #[case] expected: &[&str]) {
        assert_eq!(split_sentences_by_rule(text), expected);
    }

    #[test]
    fn rule_split_does_not_know_abbreviations() {
        assert_eq!(
            split_sentences_by_rule("Dr. Smith came."),
            vec!["Dr.", "Smith came."]
        );
    }

    #[rstest]
    #[case("Dr. Smith came. He sat.", &["Dr. Smith came.", "He sat."])]
    #[case("I met J. K. Rowling. Wow.", &["I met J. K. Rowling.", "Wow."])]
    #[case("He said \"hi.\" Then left.", &["He said \"hi.\"", "Then left."])]
    #[case("Use e.g. apples. Fine.", &["Use e.g. apples.", "Fine."])]
    #[case("Wait... what? Yes!", &["Wait... what?", "Yes!"])]
    #[case("Really? no way. Okay.", &["Really? no way.", "Okay."])]
    #[case("Pi is 3.14 today. Yes.", &["Pi is 3.14 today.", "Yes."])]
    #[case("We met Dr. Watson. He was kind. We ate. We left.", &["We met Dr. Watson.", "He was kind.", "We ate.", "We left."])]
    fn heuristic_splits(#[case] text: &str, #[case] expected: &[&str]) {
        assert_eq!(split_sentences_heuristic(text), expected);
    }

    #[test]
    fn segmenters_implement_the_trait() {
        let text = "A cat. A dog.";
        assert_eq!(RuleSegmenter.segment_sentences(text).unwrap().len(), 2);
        assert_eq!(
            HeuristicAnalyzer::new().segment_sentences(text).unwrap().len(),
            2
        );
    }
}
