use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::SynonymLookup;
use crate::error::{CollaboratorError, Error, Result};

/// Long words mapped to plainer alternatives, most common first.
fn build_synonym_table() -> HashMap<&'static str, Vec<&'static str>> {
    HashMap::from([
        ("accomplish", vec!["do", "finish", "achieve"]),
        ("accurately", vec!["exactly", "right"]),
        ("additional", vec!["more", "extra"]),
        ("adequately", vec!["enough", "well"]),
        ("administer", vec!["run", "manage"]),
        ("advantageous", vec!["helpful", "useful"]),
        ("anticipate", vec!["expect", "guess"]),
        ("appreciate", vec!["like", "value"]),
        ("appropriate", vec!["right", "fitting"]),
        ("assistance", vec!["help", "support"]),
        ("beneficial", vec!["good", "helpful"]),
        ("capability", vec!["skill", "power"]),
        ("circumstances", vec!["situation", "facts"]),
        ("collaborate", vec!["team up", "cooperate"]),
        ("commencement", vec!["start", "beginning"]),
        ("comprehend", vec!["understand", "get"]),
        ("comprehensive", vec!["complete", "full"]),
        ("concerning", vec!["about", "regarding"]),
        ("consequently", vec!["so", "therefore"]),
        ("considerable", vec!["large", "big"]),
        ("construct", vec!["build", "make"]),
        ("demonstrate", vec!["show", "prove"]),
        ("determine", vec!["decide", "find"]),
        ("difficulties", vec!["problems", "troubles"]),
        ("discontinue", vec!["stop", "end"]),
        ("disseminate", vec!["spread", "share"]),
        ("effectively", vec!["well", "really"]),
        ("eliminate", vec!["remove", "cut"]),
        ("encountered", vec!["met", "found"]),
        ("endeavour", vec!["try", "effort"]),
        ("equivalent", vec!["equal", "same"]),
        ("established", vec!["set up", "founded"]),
        ("examination", vec!["test", "check"]),
        ("experienced", vec!["skilled", "felt"]),
        ("extraordinary", vec!["amazing", "unusual"]),
        ("fundamental", vec!["basic", "main"]),
        ("furthermore", vec!["also", "besides"]),
        ("illuminate", vec!["light", "explain"]),
        ("immediately", vec!["now", "right away"]),
        ("implement", vec!["carry out", "do"]),
        ("incomprehensible", vec!["confusing", "unclear"]),
        ("indication", vec!["sign", "hint"]),
        ("information", vec!["info", "facts"]),
        ("insufficient", vec!["not enough", "too few"]),
        ("magnificent", vec!["great", "grand"]),
        ("mathematics", vec!["math", "maths"]),
        ("nevertheless", vec!["still", "yet"]),
        ("notwithstanding", vec!["despite", "still"]),
        ("objectives", vec!["goals", "aims"]),
        ("observation", vec!["look", "notice"]),
        ("opportunity", vec!["chance", "opening"]),
        ("particularly", vec!["especially", "mostly"]),
        ("participate", vec!["join", "take part"]),
        ("perspective", vec!["view", "angle"]),
        ("possession", vec!["ownership", "thing"]),
        ("preliminary", vec!["early", "first"]),
        ("prioritize", vec!["rank", "focus"]),
        ("procedure", vec!["steps", "process"]),
        ("proficiency", vec!["skill", "ability"]),
        ("purchased", vec!["bought", "paid for"]),
        ("recognize", vec!["know", "spot"]),
        ("regulations", vec!["rules", "laws"]),
        ("remainder", vec!["rest", "leftover"]),
        ("requirement", vec!["need", "rule"]),
        ("significant", vec!["big", "important"]),
        ("specifically", vec!["exactly", "namely"]),
        ("substantial", vec!["large", "big"]),
        ("sufficient", vec!["enough", "plenty"]),
        ("temperature", vec!["heat", "warmth"]),
        ("terminate", vec!["end", "stop"]),
        ("tremendous", vec!["huge", "great"]),
        ("ultimately", vec!["finally", "in the end"]),
        ("understanding", vec!["knowing", "grasp"]),
        ("unfortunately", vec!["sadly", "too bad"]),
        ("vocabulary", vec!["words", "wording"]),
    ])
}

/// In-memory thesaurus. Lookups are case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct StaticThesaurus {
    entries: HashMap<String, Vec<String>>,
}

impl StaticThesaurus {
    pub fn builtin() -> Self {
        let entries = build_synonym_table()
            .into_iter()
            .map(|(word, alternatives)| {
                (
                    word.to_string(),
                    alternatives.into_iter().map(String::from).collect(),
                )
            })
            .collect();
        StaticThesaurus { entries }
    }

    pub fn from_entries(entries: HashMap<String, Vec<String>>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(word, alternatives)| (word.trim().to_lowercase(), alternatives))
            .collect();
        StaticThesaurus { entries }
    }

    /// Reads a JSON object of `"word": ["alternative", ...]`.
    pub fn load_json(file_path: &Path) -> Result<Self> {
        let file = File::open(file_path).map_err(|e| {
            Error::dictionary(format!(
                "Failed to open thesaurus at {:?}: {}",
                file_path, e
            ))
        })?;
        let entries: HashMap<String, Vec<String>> =
            serde_json::from_reader(BufReader::new(file))?;
        Ok(Self::from_entries(entries))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SynonymLookup for StaticThesaurus {
    fn lookup_synonyms(&self, word: &str) -> std::result::Result<Vec<String>, CollaboratorError> {
        Ok(self
            .entries
            .get(&word.to_lowercase())
            .cloned()
            .unwrap_or_default())
    }
}

/// Thesaurus that never knows a synonym.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSynonyms;

impl SynonymLookup for NoSynonyms {
    fn lookup_synonyms(&self, _word: &str) -> std::result::Result<Vec<String>, CollaboratorError> {
        Ok(Vec::new())
    }
}
