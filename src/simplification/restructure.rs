//! Sentence segmentation, long-sentence splitting and reassembly.

use crate::collaborators::{SentenceSegmenter, Tokenizer};
use crate::types::text_data::{Sentence, Token};

pub const DEFAULT_SENTENCE_LENGTH_THRESHOLD: usize = 15;

/// Splits `text` into tokenized sentences.
///
/// A failing or empty segmenter answer makes the whole text one sentence; a
/// failing or empty tokenizer answer turns the sentence into whitespace-split
/// words that are all marked as entities, so later stages leave them alone.
pub fn segment(text: &str, segmenter: &dyn SentenceSegmenter, tokenizer: &dyn Tokenizer) -> Vec<Sentence> {
    let pieces = match segmenter.segment_sentences(text) {
        Ok(pieces) if pieces.iter().any(|p| !p.trim().is_empty()) => pieces,
        Ok(_) => {
            log::warn!("[Segmenter] No sentences returned, using the whole text");
            vec![text.to_string()]
        }
        Err(e) => {
            log::warn!("[Segmenter] {}; using the whole text", e);
            vec![text.to_string()]
        }
    };

    let mut cursor = 0;
    pieces
        .iter()
        .map(|piece| piece.trim())
        .filter(|piece| !piece.is_empty())
        .map(|piece| {
            let span = match text[cursor..].find(piece) {
                Some(offset) => {
                    let start = cursor + offset;
                    cursor = start + piece.len();
                    (start, cursor)
                }
                None => (cursor, cursor),
            };
            let tokens = match tokenizer.tokenize(piece) {
                Ok(tokens) if !tokens.is_empty() => tokens,
                Ok(_) => {
                    log::warn!("[Tokenizer] Empty token list for '{}', keeping text", piece);
                    opaque_tokens(piece)
                }
                Err(e) => {
                    log::warn!("[Tokenizer] {}; keeping text", e);
                    opaque_tokens(piece)
                }
            };
            Sentence::new(tokens, span)
        })
        .collect()
}

fn opaque_tokens(text: &str) -> Vec<Token> {
    text.split_whitespace()
        .map(|word| Token {
            is_entity: true,
            ..Token::word(word)
        })
        .collect()
}

/// Splits an over-long sentence at its commas and semicolons, then makes
/// sure every resulting sentence starts uppercase and ends with exactly one
/// terminal mark. Sentences within the threshold are only tidied.
pub fn restructure(sentence: &Sentence, threshold: usize) -> Vec<Sentence> {
    if sentence.word_count() <= threshold {
        return finish(&sentence.tokens)
            .map(|tokens| vec![Sentence::new(tokens, sentence.span)])
            .unwrap_or_default();
    }

    log::debug!(
        "[Restructure] Splitting a {}-word sentence (threshold {})",
        sentence.word_count(),
        threshold
    );
    sentence
        .tokens
        .split(Token::is_clause_break)
        .filter_map(finish)
        .map(|tokens| Sentence::new(tokens, sentence.span))
        .collect()
}

fn is_opener(token: &Token) -> bool {
    token.is_punct && matches!(token.surface.as_str(), "\"" | "'" | "(" | "[" | "“" | "‘")
}

fn is_closer(token: &Token) -> bool {
    token.is_punct && matches!(token.surface.as_str(), "\"" | "'" | ")" | "]" | "”" | "’")
}

/// Tidies one fragment. `None` when it holds no words.
fn finish(fragment: &[Token]) -> Option<Vec<Token>> {
    // Leading marks other than opening quotes, trailing marks other than
    // terminal ones and closing quotes.
    let start = fragment
        .iter()
        .position(|t| !t.is_punct || is_opener(t))?;
    let end = fragment
        .iter()
        .rposition(|t| !t.is_punct || t.is_terminal_punct() || is_closer(t))?
        + 1;
    if start >= end {
        return None;
    }
    let body = &fragment[start..end];
    let first_word = body.iter().position(|t| !t.is_punct)?;

    let mut tokens: Vec<Token> = body
        .iter()
        .enumerate()
        .map(|(i, t)| if i == first_word { capitalize_token(t) } else { t.clone() })
        .collect();

    // A mark run inside the sentence: "..." reads as a pause, "?!" keeps its first mark.
    let last_word = tokens.iter().rposition(|t| !t.is_punct).unwrap_or(0);
    for token in tokens[..last_word].iter_mut() {
        if token.is_terminal_punct() && token.surface.chars().count() > 1 {
            let mark: String = if token.surface.chars().all(|c| c == '.') {
                ",".to_string()
            } else {
                token.surface.chars().take(1).collect()
            };
            *token = token.with_surface(mark);
        }
    }

    let last = tokens.len() - 1;
    let terminal_at = if is_closer(&tokens[last]) && last > 0 {
        last - 1
    } else {
        last
    };
    let terminal = tokens[terminal_at].clone();
    if terminal.is_terminal_punct() {
        let first_mark = terminal.surface.chars().next().unwrap_or('.');
        if terminal.surface.chars().count() > 1 {
            tokens[terminal_at] = terminal.with_surface(first_mark.to_string());
        }
    } else if !ends_with_terminal(&terminal.surface) {
        tokens[last] = tokens[last].with_space_after(false);
        tokens.push(Token::punct(".").with_space_after(false));
    }
    Some(tokens)
}

fn ends_with_terminal(surface: &str) -> bool {
    surface.ends_with(['.', '!', '?'])
}

fn capitalize_token(token: &Token) -> Token {
    let mut chars = token.surface.chars();
    match chars.next() {
        Some(first) if first.is_lowercase() => {
            token.with_surface(first.to_uppercase().chain(chars).collect::<String>())
        }
        _ => token.clone(),
    }
}

/// Joins finished sentences with single spaces. Each one already carries
/// its own terminal mark, so no period is added here.
pub fn reassemble(sentences: &[Sentence]) -> String {
    sentences
        .iter()
        .map(Sentence::text)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
