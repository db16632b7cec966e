use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PartOfSpeech {
    ProperNoun,
    Numeral,
    Punctuation,
    #[default]
    Other,
}

/// One word or punctuation mark with the flags the analyzer attached to it.
///
/// Tokens are never edited in place: a stage that wants a different surface
/// builds a new token with [`Token::with_surface`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Token {
    pub surface: String,
    /// Whether whitespace followed this token in the source text.
    pub space_after: bool,
    pub is_entity: bool,
    pub is_punct: bool,
    pub is_numeral: bool,
    pub pos: PartOfSpeech,
}

impl Token {
    pub fn word(surface: &str) -> Self {
        Token {
            surface: surface.to_string(),
            space_after: true,
            ..Default::default()
        }
    }

    pub fn punct(surface: &str) -> Self {
        Token {
            surface: surface.to_string(),
            space_after: true,
            is_punct: true,
            pos: PartOfSpeech::Punctuation,
            ..Default::default()
        }
    }

    pub fn with_surface(&self, surface: impl Into<String>) -> Self {
        Token {
            surface: surface.into(),
            ..self.clone()
        }
    }

    pub fn with_space_after(&self, space_after: bool) -> Self {
        Token {
            space_after,
            ..self.clone()
        }
    }

    pub fn is_proper_noun(&self) -> bool {
        self.pos == PartOfSpeech::ProperNoun
    }

    /// Names, entities and punctuation are never substituted.
    pub fn is_protected(&self) -> bool {
        self.is_entity || self.is_punct || self.is_proper_noun()
    }

    pub fn is_terminal_punct(&self) -> bool {
        self.is_punct
            && !self.surface.is_empty()
            && self.surface.chars().all(|c| matches!(c, '.' | '!' | '?'))
    }

    pub fn is_clause_break(&self) -> bool {
        self.is_punct && matches!(self.surface.as_str(), "," | ";")
    }
}

/// An ordered run of tokens plus the byte span it came from.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Sentence {
    pub tokens: Vec<Token>,
    pub span: (usize, usize),
}

impl Sentence {
    pub fn new(tokens: Vec<Token>, span: (usize, usize)) -> Self {
        Sentence { tokens, span }
    }

    pub fn word_count(&self) -> usize {
        self.tokens.iter().filter(|t| !t.is_punct).count()
    }

    /// Surface text rebuilt from the tokens, honouring their spacing.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for (i, token) in self.tokens.iter().enumerate() {
            out.push_str(&token.surface);
            let last = i + 1 == self.tokens.len();
            if !last && token.space_after {
                out.push(' ');
            }
        }
        out
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ReadabilityReport {
    /// Flesch-Kincaid grade level.
    pub grade_level: f64,
    /// Flesch reading ease, higher is easier.
    pub ease_score: f64,
    pub sentences: usize,
    pub words: usize,
    pub syllables: usize,
}

/// What the pipeline hands back to the presentation layer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PipelineResult {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readability: Option<ReadabilityReport>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_respects_spacing_flags() {
        let sentence = Sentence::new(
            vec![
                Token::word("Hi"),
                Token::punct(",").with_space_after(true),
                Token::word("there").with_space_after(false),
                Token::punct("."),
            ],
            (0, 10),
        );
        // "Hi" has space_after, so a space lands before the comma; tokenizer
        // output sets it false when the source had none.
        assert_eq!(sentence.text(), "Hi , there.");
        assert_eq!(sentence.word_count(), 2);
    }

    #[test]
    fn protection_flags() {
        let mut name = Token::word("Alice");
        name.pos = PartOfSpeech::ProperNoun;
        assert!(name.is_protected());
        assert!(Token::punct(";").is_protected());
        assert!(Token::punct(";").is_clause_break());
        assert!(Token::punct("?").is_terminal_punct());
        assert!(!Token::word("dog").is_protected());
    }

    #[test]
    fn with_surface_keeps_flags() {
        let mut token = Token::word("Paris");
        token.is_entity = true;
        let renamed = token.with_surface("Lyon");
        assert!(renamed.is_entity);
        assert_eq!(token.surface, "Paris");
    }
}
