//! Regex tokenizer with capitalization-based name detection.
//!
//! Structural signals only: capitalization, position in the sentence,
//! honorifics and a handful of location prepositions. No lexicon of names.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::collaborators::Tokenizer;
use crate::error::CollaboratorError;
use crate::types::text_data::{PartOfSpeech, Token};

static TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d+(?:[.,]\d+)*|[\p{L}\p{N}]+(?:['’\-][\p{L}\p{N}]+)*|[.!?]+|\S").unwrap()
});

const PERSON_PREFIX: &[&str] = &["mr", "ms", "mrs", "dr", "prof", "sir", "madam", "miss"];
const LOC_PREPOSITION: &[&str] = &["in", "from", "at", "to", "near", "visit", "visited"];

// Words that commonly start sentences but are not names
const COMMON_SENTENCE_STARTERS: &[&str] = &[
    "the", "a", "an", "this", "that", "these", "those", "it", "he", "she", "we", "they", "you",
    "in", "on", "at", "to", "for", "if", "when", "but", "and", "so", "my", "our", "your",
    "there", "here", "what", "why", "how", "after", "before", "then",
];

#[derive(Debug, Clone, Default)]
pub struct HeuristicAnalyzer;

impl HeuristicAnalyzer {
    pub fn new() -> Self {
        HeuristicAnalyzer
    }

    /// Tokenizes one sentence. Never fails; empty input gives no tokens.
    pub fn tokenize_sentence(&self, sentence: &str) -> Vec<Token> {
        let raw: Vec<(&str, bool)> = TOKEN
            .find_iter(sentence)
            .map(|m| {
                let space_after = sentence[m.end()..]
                    .chars()
                    .next()
                    .is_some_and(char::is_whitespace);
                (m.as_str(), space_after)
            })
            .collect();

        let first_word = raw.iter().position(|(s, _)| !is_punct(s));
        let mut tokens: Vec<Token> = raw
            .iter()
            .enumerate()
            .map(|(i, &(surface, space_after))| {
                let punct = is_punct(surface);
                let numeral = !punct && is_numeral(surface);
                let pos = if punct {
                    PartOfSpeech::Punctuation
                } else if numeral {
                    PartOfSpeech::Numeral
                } else if Some(i) != first_word && is_capitalized(surface) && !is_pronoun_i(surface) {
                    PartOfSpeech::ProperNoun
                } else {
                    PartOfSpeech::Other
                };
                Token {
                    surface: surface.to_string(),
                    space_after,
                    is_entity: false,
                    is_punct: punct,
                    is_numeral: numeral,
                    pos,
                }
            })
            .collect();

        let entity_flags: Vec<bool> = (0..tokens.len())
            .map(|i| is_entity_at(&tokens, i, first_word))
            .collect();
        for (token, is_entity) in tokens.iter_mut().zip(entity_flags) {
            token.is_entity = is_entity;
        }
        tokens
    }
}

impl Tokenizer for HeuristicAnalyzer {
    fn tokenize(&self, sentence: &str) -> Result<Vec<Token>, CollaboratorError> {
        Ok(self.tokenize_sentence(sentence))
    }
}

/// Ordinary words that only carry a capital because they open a sentence.
pub fn is_common_sentence_starter(word: &str) -> bool {
    COMMON_SENTENCE_STARTERS.contains(&word.to_lowercase().as_str())
}

fn is_punct(surface: &str) -> bool {
    !surface.chars().any(char::is_alphanumeric)
}

fn is_numeral(surface: &str) -> bool {
    surface.starts_with(|c: char| c.is_ascii_digit())
        && surface.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',')
}

fn is_capitalized(surface: &str) -> bool {
    surface.chars().next().is_some_and(char::is_uppercase)
}

fn is_pronoun_i(surface: &str) -> bool {
    surface == "I" || surface.starts_with("I'") || surface.starts_with("I’")
}

fn is_acronym(surface: &str) -> bool {
    let letters: Vec<char> = surface.chars().filter(|c| c.is_alphabetic()).collect();
    letters.len() >= 2 && letters.iter().all(|c| c.is_uppercase())
}

fn previous_word(tokens: &[Token], i: usize) -> Option<&Token> {
    tokens[..i].iter().rev().find(|t| !t.is_punct)
}

fn next_word(tokens: &[Token], i: usize) -> Option<&Token> {
    tokens.get(i + 1).filter(|t| !t.is_punct)
}

fn is_entity_at(tokens: &[Token], i: usize, first_word: Option<usize>) -> bool {
    let token = &tokens[i];
    if token.is_punct || token.is_numeral {
        return false;
    }
    if is_acronym(&token.surface) {
        return true;
    }
    if !is_capitalized(&token.surface) || is_pronoun_i(&token.surface) {
        return false;
    }

    let prev = previous_word(tokens, i);
    let after_honorific = prev.is_some_and(|p| {
        PERSON_PREFIX.contains(&p.surface.to_lowercase().as_str())
    });
    let next_capitalized = next_word(tokens, i)
        .is_some_and(|n| is_capitalized(&n.surface) && !is_pronoun_i(&n.surface));

    if Some(i) == first_word {
        // "New York is big." versus "Utilize the tools."
        return next_capitalized && !is_common_sentence_starter(&token.surface);
    }

    let prev_capitalized =
        prev.is_some_and(|p| is_capitalized(&p.surface) && !is_pronoun_i(&p.surface));
    let after_location = prev.is_some_and(|p| {
        LOC_PREPOSITION.contains(&p.surface.to_lowercase().as_str())
    });
    after_honorific || after_location || prev_capitalized || next_capitalized
}
