//! Conversational post-processing.
//!
//! Transforms run in a fixed order: thinning, contractions, playful
//! spelling, opener, emoji. Every probabilistic gate takes one draw from the
//! caller's generator whether or not it fires, so a seed fixes the output.

use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::Rng;
use regex::{Captures, Regex};

use crate::config::PipelineConfig;
use crate::parsing::split_sentences_heuristic;
use crate::parsing::tokenizer::is_common_sentence_starter;

pub const OPENERS: &[&str] = &["Hey there!", "Did you know?", "Check this out!", "Fun fact:"];
pub const EMOJIS: &[&str] = &["😊", "🌟", "✨", "🎈", "🤓"];

/// Texts with more sentences than this are thinned when shortening is on.
pub const THINNING_MIN_SENTENCES: usize = 3;

static CONTRACTIONS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"(?i)\bdo not\b", "don't"),
        (r"(?i)\bdoes not\b", "doesn't"),
        (r"(?i)\bdid not\b", "didn't"),
        (r"(?i)\bis not\b", "isn't"),
        (r"(?i)\bare not\b", "aren't"),
        (r"(?i)\bwas not\b", "wasn't"),
        (r"(?i)\bwill not\b", "won't"),
        (r"(?i)\bcannot\b", "can't"),
    ]
    .into_iter()
    .map(|(pattern, short)| (Regex::new(pattern).unwrap(), short))
    .collect()
});

static PLAYFUL: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (Regex::new(r" and ").unwrap(), " & "),
        (Regex::new(r" the ").unwrap(), " da "),
    ]
});

/// Applies the conversational transforms to `text`. Empty input comes back
/// as it was.
pub fn humanize(text: &str, config: &PipelineConfig, rng: &mut StdRng) -> String {
    if text.trim().is_empty() {
        return text.to_string();
    }
    let settings = &config.humanizer;
    let mut out = text.to_string();

    if config.aggressive_shortening {
        out = thin_sentences(&out);
    }
    if settings.contractions {
        out = contract(&out);
    }

    let playful = rng.gen::<f64>() < settings.playful_spelling_probability;
    if playful {
        out = playful_spelling(&out);
    }

    if rng.gen::<f64>() < settings.opener_probability {
        let opener = OPENERS[rng.gen_range(0..OPENERS.len())];
        log::debug!("[Humanizer] Adding opener '{}'", opener);
        out = format!("{} {}", opener, lowercase_first_word(&out));
    }

    if rng.gen::<f64>() < settings.emoji_probability {
        let emoji = EMOJIS[rng.gen_range(0..EMOJIS.len())];
        out = splice_emoji(&out, emoji, rng);
    }
    out
}

/// Keeps sentences 0, 2, 4, ... of texts longer than three sentences.
pub fn thin_sentences(text: &str) -> String {
    let sentences = split_sentences_heuristic(text);
    if sentences.len() <= THINNING_MIN_SENTENCES {
        return text.to_string();
    }
    log::debug!("[Humanizer] Thinning {} sentences", sentences.len());
    sentences
        .iter()
        .step_by(2)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Replaces the negations in the table with contractions, keeping a leading
/// capital.
pub fn contract(text: &str) -> String {
    CONTRACTIONS.iter().fold(text.to_string(), |acc, (pattern, short)| {
        pattern
            .replace_all(&acc, |caps: &Captures| {
                let starts_upper = caps[0].starts_with(|c: char| c.is_uppercase());
                if starts_upper {
                    capitalize(short)
                } else {
                    short.to_string()
                }
            })
            .into_owned()
    })
}

fn playful_spelling(text: &str) -> String {
    PLAYFUL
        .iter()
        .fold(text.to_string(), |acc, (pattern, swap)| {
            pattern.replace_all(&acc, *swap).into_owned()
        })
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lowercases the first letter only when the first word is known to be an
/// ordinary word: a common sentence starter, or a word the text also uses in
/// lowercase. Names, "I" and acronyms keep their capital.
fn lowercase_first_word(text: &str) -> String {
    let text = text.trim_start();
    let first_word = text.split_whitespace().next().unwrap_or("");
    let letters: String = first_word.chars().take_while(|c| c.is_alphabetic()).collect();
    if letters.is_empty() || letters == "I" {
        return text.to_string();
    }
    let lower = letters.to_lowercase();
    let used_lowercase_later = text[first_word.len()..]
        .split(|c: char| !c.is_alphabetic())
        .any(|word| word == lower);
    if !(is_common_sentence_starter(&letters) || used_lowercase_later) {
        return text.to_string();
    }
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Puts the emoji after a randomly chosen sentence. Picking the last one
/// appends it.
fn splice_emoji(text: &str, emoji: &str, rng: &mut StdRng) -> String {
    let mut sentences = split_sentences_heuristic(text);
    if sentences.is_empty() {
        return format!("{} {}", text, emoji);
    }
    let at = rng.gen_range(0..sentences.len());
    log::debug!("[Humanizer] Adding emoji after sentence {}", at);
    sentences[at] = format!("{} {}", sentences[at], emoji);
    sentences.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HumanizerConfig;
    use rand::SeedableRng;
    use rstest::rstest;

    fn config(opener: f64, emoji: f64, playful: f64) -> PipelineConfig {
        PipelineConfig {
            humanizer: HumanizerConfig {
                contractions: true,
                opener_probability: opener,
                emoji_probability: emoji,
                playful_spelling_probability: playful,
            },
            ..Default::default()
        }
    }

    fn emoji_count(text: &str) -> usize {
        EMOJIS.iter().map(|e| text.matches(e).count()).sum()
    }

    #[rstest]
    #[case("Do not run.", "Don't run.")]
    #[case("It is not hard and you cannot stop.", "It isn't hard and you can't stop.")]
    #[case("She does not know.", "She doesn't know.")]
    #[case("Nothing to change.", "Nothing to change.")]
    fn contractions_are_applied(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(contract(input), expected);
    }

    #[test]
    fn quiet_config_only_contracts() {
        let mut rng = StdRng::seed_from_u64(1);
        let out = humanize("We do not stop.", &config(0.0, 0.0, 0.0), &mut rng);
        assert_eq!(out, "We don't stop.");
    }

    #[test]
    fn contractions_can_be_turned_off() {
        let mut cfg = config(0.0, 0.0, 0.0);
        cfg.humanizer.contractions = false;
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(humanize("We do not stop.", &cfg, &mut rng), "We do not stop.");
    }

    #[test]
    fn certain_opener_lowercases_next_word() {
        let mut rng = StdRng::seed_from_u64(5);
        let out = humanize("The dog ran.", &config(1.0, 0.0, 0.0), &mut rng);
        assert!(
            OPENERS.iter().any(|o| out == format!("{} the dog ran.", o)),
            "{}",
            out
        );
    }

    #[test]
    fn opener_keeps_pronoun_and_acronyms() {
        let mut rng = StdRng::seed_from_u64(5);
        let out = humanize("I like NASA.", &config(1.0, 0.0, 0.0), &mut rng);
        assert!(out.ends_with(" I like NASA."), "{}", out);
        let out = humanize("NASA is cool.", &config(1.0, 0.0, 0.0), &mut rng);
        assert!(out.ends_with(" NASA is cool."), "{}", out);
    }

    #[test]
    fn opener_keeps_leading_names() {
        let mut rng = StdRng::seed_from_u64(5);
        let out = humanize("London is big.", &config(1.0, 0.0, 0.0), &mut rng);
        assert!(out.ends_with(" London is big."), "{}", out);
        let out = humanize("Dogs bark. I like dogs.", &config(1.0, 0.0, 0.0), &mut rng);
        assert!(out.ends_with(" dogs bark. I like dogs."), "{}", out);
    }

    #[test]
    fn emoji_never_lands_after_an_abbreviation() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let out = humanize("We met Dr. Watson today.", &config(0.0, 1.0, 0.0), &mut rng);
            assert!(out.starts_with("We met Dr. Watson today. "), "{}", out);
            assert_eq!(emoji_count(&out), 1, "{}", out);
        }
    }

    #[test]
    fn certain_emoji_adds_exactly_one() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let out = humanize("One. Two. Three.", &config(0.0, 1.0, 0.0), &mut rng);
            assert_eq!(emoji_count(&out), 1, "{}", out);
            assert!(out.starts_with("One."), "{}", out);
        }
    }

    #[test]
    fn playful_spelling_swaps_small_words() {
        let mut rng = StdRng::seed_from_u64(2);
        let out = humanize("The cat and the dog.", &config(0.0, 0.0, 1.0), &mut rng);
        assert_eq!(out, "The cat & da dog.");
    }

    #[test]
    fn same_seed_same_output() {
        let cfg = config(0.5, 0.5, 0.5);
        let text = "The cat and the dog do not play. They nap. It is not late.";
        let a = humanize(text, &cfg, &mut StdRng::seed_from_u64(42));
        let b = humanize(text, &cfg, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn thinning_keeps_even_sentences() {
        assert_eq!(thin_sentences("One. Two. Three. Four. Five."), "One. Three. Five.");
        assert_eq!(thin_sentences("One. Two. Three."), "One. Two. Three.");
    }

    #[test]
    fn thinning_keeps_abbreviations_inside_their_sentence() {
        assert_eq!(
            thin_sentences("We met Dr. Watson. He was kind. We ate. We left."),
            "We met Dr. Watson. We ate."
        );
    }

    #[test]
    fn thinning_only_when_enabled() {
        let text = "One. Two. Three. Four.";
        let mut cfg = config(0.0, 0.0, 0.0);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(humanize(text, &cfg, &mut rng), text);
        cfg.aggressive_shortening = true;
        assert_eq!(humanize(text, &cfg, &mut rng), "One. Three.");
    }

    #[test]
    fn output_is_never_empty_and_keeps_a_terminal_mark() {
        let cfg = config(1.0, 1.0, 1.0);
        for seed in 0..30 {
            let mut rng = StdRng::seed_from_u64(seed);
            let out = humanize("Go.", &cfg, &mut rng);
            assert!(!out.is_empty());
            assert!(out.contains('.'), "{}", out);
            // Running it again must not blow up.
            let again = humanize(&out, &cfg, &mut rng);
            assert!(!again.is_empty());
        }
    }

    #[test]
    fn empty_text_is_untouched() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(humanize("", &config(1.0, 1.0, 1.0), &mut rng), "");
    }
}
