use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "kidtext.toml";

/// Everything a `kidtext.toml` can hold. Every section is optional.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub pipeline: PipelineConfig,
    pub dictionary: DictionarySettings,
    pub thesaurus: ThesaurusSettings,
    pub generator: GeneratorSettings,
    pub speech: SpeechSettings,
}

/// Options resolved once per pipeline invocation. Never mutated by a stage.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    /// Substitution aggressiveness, 1..=5.
    pub strength: u8,
    pub humanize: bool,
    pub use_generative_model: bool,
    pub random_seed: Option<u64>,
    /// Sentences with more words than this get split at commas/semicolons.
    pub sentence_length_threshold: usize,
    /// Keep only every other sentence once a text has more than three.
    pub aggressive_shortening: bool,
    pub correct_grammar: bool,
    pub report_readability: bool,
    /// Tokens longer than this many characters are looked up in the thesaurus.
    pub synonym_min_length: usize,
    pub humanizer: HumanizerConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            strength: 3,
            humanize: true,
            use_generative_model: false,
            random_seed: None,
            sentence_length_threshold: 15,
            aggressive_shortening: false,
            correct_grammar: true,
            report_readability: true,
            synonym_min_length: 8,
            humanizer: HumanizerConfig::default(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct HumanizerConfig {
    pub contractions: bool,
    pub opener_probability: f64,
    pub emoji_probability: f64,
    pub playful_spelling_probability: f64,
}

impl Default for HumanizerConfig {
    fn default() -> Self {
        HumanizerConfig {
            contractions: true,
            opener_probability: 0.3,
            emoji_probability: 0.2,
            playful_spelling_probability: 0.0,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DictionarySettings {
    /// JSON snapshot replacing the built-in easy-word table.
    pub path: Option<PathBuf>,
    pub activation_threshold: u8,
}

impl Default for DictionarySettings {
    fn default() -> Self {
        DictionarySettings {
            path: None,
            activation_threshold: 3,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ThesaurusSettings {
    /// JSON object of `"word": ["alternative", ...]` replacing the built-in
    /// thesaurus.
    pub path: Option<PathBuf>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GeneratorSettings {
    /// Program and arguments; empty means no generative backend.
    pub command: Vec<String>,
    pub instruction: String,
    pub timeout_ms: u64,
    pub max_length: usize,
    pub num_beams: usize,
    pub repetition_penalty: f32,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        GeneratorSettings {
            command: Vec::new(),
            instruction: "simplify".to_string(),
            timeout_ms: 10_000,
            max_length: 256,
            num_beams: 4,
            repetition_penalty: 2.5,
        }
    }
}

impl GeneratorSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SpeechSettings {
    pub command: Vec<String>,
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        if !(1..=5).contains(&self.strength) {
            return Err(Error::config(format!(
                "strength must be between 1 and 5, got {}",
                self.strength
            )));
        }
        if self.sentence_length_threshold == 0 {
            return Err(Error::config("sentence_length_threshold must be at least 1"));
        }
        let h = &self.humanizer;
        for (name, p) in [
            ("opener_probability", h.opener_probability),
            ("emoji_probability", h.emoji_probability),
            ("playful_spelling_probability", h.playful_spelling_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(Error::config(format!(
                    "{} must be within 0.0..=1.0, got {}",
                    name, p
                )));
            }
        }
        Ok(())
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        self.pipeline.validate()?;
        if !(1..=5).contains(&self.dictionary.activation_threshold) {
            return Err(Error::config(format!(
                "dictionary.activation_threshold must be between 1 and 5, got {}",
                self.dictionary.activation_threshold
            )));
        }
        Ok(())
    }
}

pub fn parse_config(contents: &str) -> Result<Settings> {
    let settings = toml::from_str::<Settings>(contents)
        .map_err(|e| Error::config(format!("Failed to parse settings: {}", e)))?;
    settings.validate()?;
    Ok(settings)
}

pub fn load_config_from_file(file_path: &Path) -> Result<Settings> {
    match fs::read_to_string(file_path) {
        Ok(contents) => parse_config(&contents).map_err(|e| match e {
            Error::Config(msg) => Error::config(format!("{}: {}", file_path.display(), msg)),
            other => other,
        }),
        Err(e) => Err(Error::config(format!(
            "Failed to read {}: {}. Please ensure it exists.",
            file_path.display(),
            e
        ))),
    }
}

/// Like [`load_config_from_file`], but a missing file yields the defaults.
pub fn load_config_or_default(file_path: &Path) -> Result<Settings> {
    if !file_path.exists() {
        log::debug!(
            "[Config] {} not found, using built-in defaults",
            file_path.display()
        );
        return Ok(Settings::default());
    }
    load_config_from_file(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_gives_defaults() {
        let settings = parse_config("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.pipeline.strength, 3);
        assert_eq!(settings.pipeline.sentence_length_threshold, 15);
        assert!(!settings.pipeline.aggressive_shortening);
        assert_eq!(settings.dictionary.activation_threshold, 3);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let settings = parse_config(
            r#"
            [pipeline]
            strength = 5
            random_seed = 7

            [pipeline.humanizer]
            emoji_probability = 1.0

            [thesaurus]
            path = "words/thesaurus.json"

            [generator]
            command = ["ollama", "run", "t5-small"]
            "#,
        )
        .unwrap();
        assert_eq!(settings.pipeline.strength, 5);
        assert_eq!(settings.pipeline.random_seed, Some(7));
        assert_eq!(settings.pipeline.humanizer.emoji_probability, 1.0);
        assert_eq!(settings.pipeline.humanizer.opener_probability, 0.3);
        assert_eq!(
            settings.thesaurus.path,
            Some(PathBuf::from("words/thesaurus.json"))
        );
        assert_eq!(settings.generator.command.len(), 3);
        assert_eq!(settings.generator.instruction, "simplify");
        assert_eq!(settings.generator.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn out_of_range_strength_is_rejected() {
        let err = parse_config("[pipeline]\nstrength = 9\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn out_of_range_probability_is_rejected() {
        let err = parse_config("[pipeline.humanizer]\nopener_probability = 1.5\n").unwrap_err();
        assert!(err.to_string().contains("opener_probability"));
    }

    #[test]
    fn zero_threshold_is_rejected() {
        assert!(parse_config("[pipeline]\nsentence_length_threshold = 0\n").is_err());
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        assert!(matches!(
            parse_config("[pipeline\nstrength = "),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_config_or_default(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(load_config_from_file(&dir.path().join("nope.toml")).is_err());
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[pipeline]\nhumanize = false\nstrength = 2").unwrap();
        let settings = load_config_from_file(file.path()).unwrap();
        assert!(!settings.pipeline.humanize);
        assert_eq!(settings.pipeline.strength, 2);
    }
}
