use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::GrammarCorrector;
use crate::error::CollaboratorError;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z]+(?:'[A-Za-z]+)?").unwrap());
static LONE_I: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bi\b").unwrap());

const MISSPELLINGS: &[(&str, &str)] = &[
    ("teh", "the"),
    ("adn", "and"),
    ("recieve", "receive"),
    ("recieved", "received"),
    ("beleive", "believe"),
    ("becuase", "because"),
    ("beacuse", "because"),
    ("alot", "a lot"),
    ("wich", "which"),
    ("freind", "friend"),
    ("freinds", "friends"),
    ("definately", "definitely"),
    ("seperate", "separate"),
    ("untill", "until"),
    ("occured", "occurred"),
    ("tommorow", "tomorrow"),
    ("tomorow", "tomorrow"),
    ("wierd", "weird"),
    ("thier", "their"),
    ("goverment", "government"),
    ("enviroment", "environment"),
    ("accomodate", "accommodate"),
    ("begining", "beginning"),
    ("beautifull", "beautiful"),
    ("dont", "don't"),
    ("doesnt", "doesn't"),
    ("cant", "can't"),
    ("wont", "won't"),
    ("isnt", "isn't"),
    ("im", "I'm"),
    ("ive", "I've"),
];

/// Fixes a table of frequent misspellings, doubled words and a lowercase
/// stand-alone "i". Everything else passes through untouched.
#[derive(Debug, Clone)]
pub struct CommonMistakeCorrector {
    fixes: HashMap<&'static str, &'static str>,
}

impl Default for CommonMistakeCorrector {
    fn default() -> Self {
        Self::new()
    }
}

impl CommonMistakeCorrector {
    pub fn new() -> Self {
        CommonMistakeCorrector {
            fixes: MISSPELLINGS.iter().copied().collect(),
        }
    }

    fn fix_word(&self, word: &str) -> String {
        let lower = word.to_lowercase();
        match self.fixes.get(lower.as_str()) {
            Some(fixed) if word.starts_with(|c: char| c.is_uppercase()) => capitalize(fixed),
            Some(fixed) => fixed.to_string(),
            None => word.to_string(),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// "the the" -> "the". The regex crate has no backreferences, so this walks
/// words by hand.
fn collapse_doubled_words(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_end = 0;
    let mut previous: Option<String> = None;
    for m in WORD.find_iter(text) {
        let gap = &text[last_end..m.start()];
        let word_lower = m.as_str().to_lowercase();
        let is_repeat = matches!(&previous, Some(prev) if *prev == word_lower)
            && !gap.is_empty()
            && gap.chars().all(char::is_whitespace);
        if is_repeat {
            last_end = m.end();
            continue;
        }
        out.push_str(gap);
        out.push_str(m.as_str());
        previous = Some(word_lower);
        last_end = m.end();
    }
    out.push_str(&text[last_end..]);
    out
}

/// "i" on its own becomes "I", but not the "i" of "i.e.".
fn capitalize_lone_i(text: &str) -> String {
    LONE_I
        .replace_all(text, |caps: &Captures| {
            let in_abbreviation = caps.get(0).is_some_and(|m| {
                let mut after = text[m.end()..].chars();
                after.next() == Some('.') && after.next().is_some_and(char::is_alphabetic)
            });
            if in_abbreviation { "i" } else { "I" }
        })
        .into_owned()
}

impl GrammarCorrector for CommonMistakeCorrector {
    fn correct(&self, text: &str) -> Result<String, CollaboratorError> {
        let fixed = WORD.replace_all(text, |caps: &Captures| self.fix_word(&caps[0]));
        let fixed = capitalize_lone_i(&fixed);
        Ok(collapse_doubled_words(&fixed))
    }
}

/// Grammar pass that changes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCorrector;

impl GrammarCorrector for NoopCorrector {
    fn correct(&self, text: &str) -> Result<String, CollaboratorError> {
        Ok(text.to_string())
    }
}
