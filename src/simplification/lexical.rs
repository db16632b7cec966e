//! Word-level substitution.
//!
//! Per token, first match wins:
//! 1. names, entities and punctuation stay as they are;
//! 2. an easy-word rule (longest phrase first), if the strength activates the dictionary;
//! 3. for long non-numeric words, the thesaurus' first answer if it is short
//!    and purely alphabetic;
//! 4. otherwise the token is kept.

use rand::rngs::StdRng;

use super::dictionary::EasyWordDictionary;
use crate::collaborators::SynonymLookup;
use crate::config::PipelineConfig;
use crate::types::text_data::Token;

/// A thesaurus answer may be at most this many characters longer than the word.
pub const MAX_SYNONYM_GROWTH: usize = 2;

pub struct LexicalSimplifier<'a> {
    dictionary: &'a EasyWordDictionary,
    synonyms: &'a dyn SynonymLookup,
}

impl<'a> LexicalSimplifier<'a> {
    pub fn new(dictionary: &'a EasyWordDictionary, synonyms: &'a dyn SynonymLookup) -> Self {
        LexicalSimplifier {
            dictionary,
            synonyms,
        }
    }

    /// Returns a new token sequence; the input is left untouched.
    pub fn simplify(&self, tokens: &[Token], config: &PipelineConfig, rng: &mut StdRng) -> Vec<Token> {
        let use_rules = self.dictionary.is_active(config.strength);
        let mut out = Vec::with_capacity(tokens.len());
        let mut i = 0;
        while i < tokens.len() {
            let token = &tokens[i];
            if token.is_protected() {
                out.push(token.clone());
                i += 1;
                continue;
            }

            if use_rules {
                if let Some(consumed) = self.apply_rule(&tokens[i..], config.strength, rng, &mut out) {
                    i += consumed;
                    continue;
                }
            }

            out.push(self.thesaurus_substitute(token, config.synonym_min_length));
            i += 1;
        }
        out
    }

    /// Tries the longest phrase starting at `window[0]` first. Returns how many
    /// source tokens were replaced.
    fn apply_rule(
        &self,
        window: &[Token],
        strength: u8,
        rng: &mut StdRng,
        out: &mut Vec<Token>,
    ) -> Option<usize> {
        let max_len = self.dictionary.longest_phrase().min(window.len());
        for len in (1..=max_len).rev() {
            let span = &window[..len];
            if span.iter().any(Token::is_protected) {
                continue;
            }
            let phrase = span
                .iter()
                .map(|t| t.surface.to_lowercase())
                .collect::<Vec<_>>()
                .join(" ");
            let Some(rule) = self.dictionary.get(&phrase) else {
                continue;
            };
            let replacement = match_case(&span[0].surface, rule.choose(strength, rng));
            log::debug!("[Lexical] '{}' -> '{}'", phrase, replacement);

            let words: Vec<&str> = replacement.split_whitespace().collect();
            let last = words.len().saturating_sub(1);
            for (k, word) in words.iter().enumerate() {
                let template = if k == last { &span[len - 1] } else { &span[0] };
                let space_after = if k == last { template.space_after } else { true };
                out.push(template.with_surface(*word).with_space_after(space_after));
            }
            return Some(len);
        }
        None
    }

    fn thesaurus_substitute(&self, token: &Token, min_length: usize) -> Token {
        let length = token.surface.chars().count();
        if length <= min_length || token.is_numeral {
            return token.clone();
        }
        let candidates = match self.synonyms.lookup_synonyms(&token.surface) {
            Ok(candidates) => candidates,
            Err(e) => {
                log::warn!("[Lexical] Synonym lookup failed for '{}': {}", token.surface, e);
                return token.clone();
            }
        };
        match candidates.first() {
            Some(candidate) if is_acceptable_synonym(&token.surface, candidate) => {
                log::debug!("[Lexical] '{}' -> '{}' (thesaurus)", token.surface, candidate);
                token.with_surface(match_case(&token.surface, candidate))
            }
            _ => token.clone(),
        }
    }
}

/// Non-empty, alphabetic only, and no more than two characters longer.
pub fn is_acceptable_synonym(original: &str, candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate.chars().all(char::is_alphabetic)
        && candidate.chars().count() <= original.chars().count() + MAX_SYNONYM_GROWTH
}

/// Carries a leading capital over from the original word.
pub fn match_case(original: &str, replacement: &str) -> String {
    let starts_upper = original.chars().next().is_some_and(char::is_uppercase);
    if !starts_upper {
        return replacement.to_string();
    }
    let mut chars = replacement.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{NoSynonyms, StaticThesaurus};
    use crate::error::CollaboratorError;
    use crate::parsing::HeuristicAnalyzer;
    use crate::types::text_data::Sentence;
    use rand::SeedableRng;
    use std::collections::HashMap;

    struct FixedSynonyms(Vec<String>);

    impl SynonymLookup for FixedSynonyms {
        fn lookup_synonyms(&self, _word: &str) -> Result<Vec<String>, CollaboratorError> {
            Ok(self.0.clone())
        }
    }

    struct BrokenSynonyms;

    impl SynonymLookup for BrokenSynonyms {
        fn lookup_synonyms(&self, _word: &str) -> Result<Vec<String>, CollaboratorError> {
            Err(CollaboratorError::unavailable("synonyms", "offline"))
        }
    }

    fn run(text: &str, strength: u8, synonyms: &dyn SynonymLookup) -> String {
        let dictionary = EasyWordDictionary::builtin();
        let simplifier = LexicalSimplifier::new(&dictionary, synonyms);
        let config = PipelineConfig {
            strength,
            ..Default::default()
        };
        let tokens = HeuristicAnalyzer::new().tokenize_sentence(text);
        let mut rng = StdRng::seed_from_u64(3);
        Sentence::new(simplifier.simplify(&tokens, &config, &mut rng), (0, text.len())).text()
    }

    #[test]
    fn replaces_rule_words() {
        assert_eq!(
            run(
                "Utilize the approximately correct technology to facilitate communication.",
                3,
                &NoSynonyms
            ),
            "Use the about correct tech to help talking."
        );
    }

    #[test]
    fn multiword_phrases_win_over_single_words() {
        assert_eq!(
            run("We left in order to eat.", 3, &NoSynonyms),
            "We left to eat."
        );
        assert_eq!(
            run("Due to the fact that it rained, we stayed.", 3, &NoSynonyms),
            "Because it rained, we stayed."
        );
    }

    #[test]
    fn multiword_replacement_becomes_separate_tokens() {
        let dictionary = EasyWordDictionary::builtin();
        let simplifier = LexicalSimplifier::new(&dictionary, &NoSynonyms);
        let config = PipelineConfig::default();
        let tokens = HeuristicAnalyzer::new().tokenize_sentence("Please investigate it.");
        let mut rng = StdRng::seed_from_u64(0);
        let out = simplifier.simplify(&tokens, &config, &mut rng);
        let surfaces: Vec<&str> = out.iter().map(|t| t.surface.as_str()).collect();
        assert_eq!(surfaces, vec!["Please", "look", "into", "it", "."]);
    }

    #[test]
    fn low_strength_disables_rules() {
        let text = "Utilize the technology.";
        assert_eq!(run(text, 2, &NoSynonyms), text);
        assert_eq!(run(text, 1, &NoSynonyms), text);
    }

    #[test]
    fn names_are_never_replaced() {
        // "Technology" mid-sentence and capitalized reads as a name.
        assert_eq!(
            run("We love Technology Park.", 5, &NoSynonyms),
            "We love Technology Park."
        );
    }

    #[test]
    fn thesaurus_answer_is_checked() {
        let thesaurus = StaticThesaurus::builtin();
        assert_eq!(
            run("They demonstrate patience.", 1, &thesaurus),
            "They show patience."
        );
        // "set up" contains a space, so it is rejected.
        assert_eq!(
            run("It was established quickly.", 1, &thesaurus),
            "It was established quickly."
        );
    }

    #[test]
    fn short_words_skip_the_thesaurus() {
        let synonyms = FixedSynonyms(vec!["x".to_string()]);
        assert_eq!(run("The big dog.", 1, &synonyms), "The big dog.");
    }

    #[test]
    fn overlong_synonym_is_rejected() {
        let synonyms = FixedSynonyms(vec!["extraordinarily".to_string()]);
        assert_eq!(run("A wonderful day.", 1, &synonyms), "A wonderful day.");
    }

    #[test]
    fn numerals_skip_the_thesaurus() {
        let synonyms = FixedSynonyms(vec!["many".to_string()]);
        assert_eq!(run("We counted 1,000,000,000 stars.", 1, &synonyms), "We counted 1,000,000,000 stars.");
    }

    #[test]
    fn empty_or_failed_lookup_keeps_word() {
        assert_eq!(
            run("A wonderful day.", 1, &FixedSynonyms(Vec::new())),
            "A wonderful day."
        );
        assert_eq!(run("A wonderful day.", 1, &BrokenSynonyms), "A wonderful day.");
    }

    #[test]
    fn capitalization_follows_original() {
        assert_eq!(match_case("Utilize", "use"), "Use");
        assert_eq!(match_case("utilize", "use"), "use");
        assert_eq!(match_case("", "use"), "use");
    }

    #[test]
    fn acceptable_synonym_rules() {
        assert!(is_acceptable_synonym("wonderful", "great"));
        assert!(is_acceptable_synonym("abc", "abcde"));
        assert!(!is_acceptable_synonym("abc", "abcdef"));
        assert!(!is_acceptable_synonym("wonderful", "so-so"));
        assert!(!is_acceptable_synonym("wonderful", ""));
    }

    #[test]
    fn simplifying_plain_text_twice_is_stable() {
        let thesaurus = StaticThesaurus::from_entries(HashMap::new());
        let text = "The cat sat on a mat.";
        let once = run(text, 5, &thesaurus);
        assert_eq!(once, text);
        assert_eq!(run(&once, 5, &thesaurus), text);
    }
}
