//*** START FILE: src/simplification/dictionary.rs ***//
use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_ACTIVATION_THRESHOLD: u8 = 3;
pub const DEFAULT_VARIETY_STRENGTH: u8 = 4;

fn default_variety_strength() -> u8 {
    DEFAULT_VARIETY_STRENGTH
}

/// One entry of the easy-word table: a lowercase source phrase and the
/// plainer phrases that may stand in for it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SimplificationRule {
    pub source: String,
    pub candidates: Vec<String>,
    /// At or above this strength a candidate is picked at random; below it
    /// the first candidate always wins.
    #[serde(default = "default_variety_strength")]
    pub min_strength_for_variety: u8,
}

impl SimplificationRule {
    pub fn new(source: &str, candidates: &[&str]) -> Self {
        SimplificationRule {
            source: source.trim().to_lowercase(),
            candidates: candidates.iter().map(|c| c.to_string()).collect(),
            min_strength_for_variety: DEFAULT_VARIETY_STRENGTH,
        }
    }

    /// Number of words in the source phrase.
    pub fn source_len(&self) -> usize {
        self.source.split_whitespace().count()
    }

    pub fn choose(&self, strength: u8, rng: &mut StdRng) -> &str {
        if self.candidates.len() > 1 && strength >= self.min_strength_for_variety {
            &self.candidates[rng.gen_range(0..self.candidates.len())]
        } else {
            &self.candidates[0]
        }
    }
}

/// Case-insensitive phrase table used by the lexical simplifier.
#[derive(Debug, Clone)]
pub struct EasyWordDictionary {
    rules: HashMap<String, SimplificationRule>,
    activation_threshold: u8,
    longest_phrase: usize,
}

impl Default for EasyWordDictionary {
    fn default() -> Self {
        Self::new(DEFAULT_ACTIVATION_THRESHOLD)
    }
}

impl EasyWordDictionary {
    pub fn new(activation_threshold: u8) -> Self {
        EasyWordDictionary {
            rules: HashMap::new(),
            activation_threshold,
            longest_phrase: 0,
        }
    }

    /// Adds or replaces a rule. Keys are trimmed and lowercased; rules
    /// without a key or without candidates are refused.
    pub fn insert(&mut self, mut rule: SimplificationRule) -> Result<()> {
        rule.source = rule.source.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
        if rule.source.is_empty() {
            return Err(Error::dictionary("rule with an empty source phrase"));
        }
        rule.candidates.retain(|c| !c.trim().is_empty());
        if rule.candidates.is_empty() {
            return Err(Error::dictionary(format!(
                "rule '{}' has no replacement candidates",
                rule.source
            )));
        }
        self.longest_phrase = self.longest_phrase.max(rule.source_len());
        self.rules.insert(rule.source.clone(), rule);
        Ok(())
    }

    /// Looks up a phrase, ignoring case and surrounding whitespace.
    pub fn get(&self, phrase: &str) -> Option<&SimplificationRule> {
        let cleaned = phrase.trim().to_lowercase();
        if cleaned.is_empty() {
            return None;
        }
        self.rules.get(&cleaned)
    }

    /// Below the activation threshold no rule applies at all.
    pub fn is_active(&self, strength: u8) -> bool {
        strength >= self.activation_threshold
    }

    pub fn activation_threshold(&self) -> u8 {
        self.activation_threshold
    }

    pub fn with_activation_threshold(mut self, threshold: u8) -> Self {
        self.activation_threshold = threshold;
        self
    }

    /// Word count of the longest source phrase.
    pub fn longest_phrase(&self) -> usize {
        self.longest_phrase
    }

    pub fn size(&self) -> usize {
        self.rules.len()
    }

    /// Rules ordered by source phrase.
    pub fn rules(&self) -> Vec<&SimplificationRule> {
        let mut rules: Vec<&SimplificationRule> = self.rules.values().collect();
        rules.sort_by(|a, b| a.source.cmp(&b.source));
        rules
    }

    /// The kid-friendly table shipped with the tool.
    pub fn builtin() -> Self {
        let mut dictionary = Self::default();
        for (source, candidates) in BUILTIN_RULES {
            let rule = SimplificationRule::new(source, candidates);
            // The table is static; a bad row is a programming error caught by tests.
            if let Err(e) = dictionary.insert(rule) {
                log::error!("[Dictionary] Skipping built-in rule: {}", e);
            }
        }
        dictionary
    }
}

const BUILTIN_RULES: &[(&str, &[&str])] = &[
    ("utilize", &["use"]),
    ("utilise", &["use"]),
    ("approximately", &["about", "around"]),
    ("technology", &["tech", "tech stuff"]),
    ("facilitate", &["help"]),
    ("communication", &["talking", "chatting"]),
    ("communicate", &["talk", "chat"]),
    ("additionally", &["also", "plus"]),
    ("assist", &["help"]),
    ("assistance", &["help"]),
    ("attempt", &["try"]),
    ("commence", &["start", "begin"]),
    ("consequently", &["so"]),
    ("demonstrate", &["show"]),
    ("endeavor", &["try"]),
    ("enormous", &["huge", "really big"]),
    ("however", &["but"]),
    ("individuals", &["people"]),
    ("numerous", &["many", "lots of"]),
    ("obtain", &["get"]),
    ("purchase", &["buy"]),
    ("require", &["need"]),
    ("sufficient", &["enough"]),
    ("terminate", &["end", "stop"]),
    ("therefore", &["so"]),
    ("subsequently", &["later", "then"]),
    ("frequently", &["often"]),
    ("inquire", &["ask"]),
    ("residence", &["home"]),
    ("component", &["part", "piece"]),
    ("modify", &["change"]),
    ("beverage", &["drink"]),
    ("observe", &["see", "watch"]),
    ("difficult", &["hard", "tricky"]),
    ("extremely", &["really", "super"]),
    ("comprehend", &["understand", "get"]),
    ("information", &["info", "facts"]),
    ("investigate", &["look into", "check out"]),
    ("magnificent", &["great", "awesome"]),
    ("participate", &["join in", "take part"]),
    ("sufficiently", &["enough"]),
    ("nevertheless", &["still", "even so"]),
    ("in order to", &["to"]),
    ("a number of", &["some"]),
    ("due to the fact that", &["because"]),
    ("at this point in time", &["now", "right now"]),
    ("prior to", &["before"]),
    ("in the event that", &["if"]),
    ("with regard to", &["about"]),
];

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn builtin_table_loads_every_row() {
        let dictionary = EasyWordDictionary::builtin();
        assert_eq!(dictionary.size(), BUILTIN_RULES.len());
        assert_eq!(dictionary.longest_phrase(), 5);
        assert_eq!(dictionary.activation_threshold(), DEFAULT_ACTIVATION_THRESHOLD);
    }

    #[test]
    fn lookup_ignores_case_and_whitespace() {
        let dictionary = EasyWordDictionary::builtin();
        let rule = dictionary.get("  Utilize ").unwrap();
        assert_eq!(rule.candidates, vec!["use"]);
        assert!(dictionary.get("").is_none());
        assert!(dictionary.get("zebra").is_none());
    }

    #[test]
    fn insert_normalizes_and_validates() {
        let mut dictionary = EasyWordDictionary::default();
        dictionary
            .insert(SimplificationRule::new("  In   Spite Of ", &["despite"]))
            .unwrap();
        assert!(dictionary.get("in spite of").is_some());
        assert_eq!(dictionary.longest_phrase(), 3);

        assert!(dictionary.insert(SimplificationRule::new("   ", &["x"])).is_err());
        assert!(dictionary.insert(SimplificationRule::new("word", &["  "])).is_err());
    }

    #[test]
    fn low_strength_picks_first_candidate() {
        let rule = SimplificationRule::new("technology", &["tech", "tech stuff"]);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            assert_eq!(rule.choose(3, &mut rng), "tech");
        }
    }

    #[test]
    fn high_strength_varies_candidates() {
        let rule = SimplificationRule::new("technology", &["tech", "tech stuff"]);
        let mut rng = StdRng::seed_from_u64(7);
        let picks: std::collections::HashSet<&str> =
            (0..50).map(|_| rule.choose(5, &mut rng)).collect();
        assert_eq!(picks.len(), 2);
    }

    #[test]
    fn activation_threshold_gates_rules() {
        let dictionary = EasyWordDictionary::builtin();
        assert!(!dictionary.is_active(2));
        assert!(dictionary.is_active(3));
        let strict = dictionary.with_activation_threshold(5);
        assert!(!strict.is_active(4));
    }
}
//*** END FILE: src/simplification/dictionary.rs ***//
