//! The simplification pipeline: one call takes raw text to kid-friendly text.
//!
//! `Simplifier` holds only immutable, shared handles, so one instance can
//! serve any number of threads. Randomness is created per call.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{bounded, Receiver};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::collaborators::{self, Collaborators};
use crate::config::{GeneratorSettings, PipelineConfig, Settings};
use crate::dictionary_io::load_dictionary_snapshot;
use crate::error::{Error, Result};
use crate::simplification::dictionary::EasyWordDictionary;
use crate::simplification::humanizer::humanize;
use crate::simplification::lexical::LexicalSimplifier;
use crate::simplification::normalizer::normalize;
use crate::simplification::restructure::{reassemble, restructure, segment};
use crate::simplification::rewriter::rewrite;
use crate::types::text_data::{PipelineResult, Sentence};

#[derive(Debug, Clone)]
pub struct Simplifier {
    collaborators: Arc<Collaborators>,
    dictionary: Arc<EasyWordDictionary>,
    generator_settings: GeneratorSettings,
}

impl Default for Simplifier {
    fn default() -> Self {
        Self::new(collaborators::shared_defaults())
    }
}

impl Simplifier {
    /// Uses the built-in easy-word table and default generator settings.
    pub fn new(collaborators: Arc<Collaborators>) -> Self {
        Simplifier {
            collaborators,
            dictionary: Arc::new(EasyWordDictionary::builtin()),
            generator_settings: GeneratorSettings::default(),
        }
    }

    /// Builds a simplifier on the process-wide collaborator handles. The
    /// configured activation threshold applies to whichever table is used.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        settings.validate()?;
        let dictionary = match &settings.dictionary.path {
            Some(path) => load_dictionary_snapshot(path)?,
            None => EasyWordDictionary::builtin(),
        }
        .with_activation_threshold(settings.dictionary.activation_threshold);

        Ok(Simplifier::new(collaborators::init_shared(settings)?)
            .with_dictionary(dictionary)
            .with_generator_settings(settings.generator.clone()))
    }

    pub fn with_dictionary(mut self, dictionary: EasyWordDictionary) -> Self {
        self.dictionary = Arc::new(dictionary);
        self
    }

    pub fn with_generator_settings(mut self, settings: GeneratorSettings) -> Self {
        self.generator_settings = settings;
        self
    }

    pub fn dictionary(&self) -> &EasyWordDictionary {
        &self.dictionary
    }

    /// Runs every enabled stage on `raw`.
    ///
    /// Fails with [`Error::EmptyInput`] for blank input before any
    /// collaborator is touched, with [`Error::Config`] for an invalid
    /// `config`, and with [`Error::Internal`] if a stage panics. Collaborator
    /// failures never fail the call.
    pub fn simplify(&self, raw: &str, config: &PipelineConfig) -> Result<PipelineResult> {
        let text = normalize(raw)?;
        config.validate()?;

        let mut rng = match config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        log::info!(
            "[Pipeline] Simplifying {} chars at strength {}",
            text.len(),
            config.strength
        );
        panic::catch_unwind(AssertUnwindSafe(|| self.run_stages(&text, config, &mut rng)))
            .unwrap_or_else(|payload| {
                let reason = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                log::error!("[Pipeline] Stage panicked: {}", reason);
                Err(Error::internal(format!("a pipeline stage failed: {}", reason)))
            })
    }

    /// Runs [`simplify`](Self::simplify) on a worker thread so a caller such
    /// as a UI loop can keep going. The outcome arrives on the returned
    /// channel, after which `on_done` is called.
    pub fn simplify_in_background(
        &self,
        raw: String,
        config: PipelineConfig,
        on_done: impl FnOnce() + Send + 'static,
    ) -> Result<Receiver<Result<PipelineResult>>> {
        let (tx, rx) = bounded(1);
        let simplifier = self.clone();
        thread::Builder::new()
            .name("kidtext-simplify".to_string())
            .spawn(move || {
                let _ = tx.send(simplifier.simplify(&raw, &config));
                on_done();
            })?;
        Ok(rx)
    }

    /// [`simplify`](Self::simplify) without the readability figures.
    pub fn simplify_text(&self, raw: &str, config: &PipelineConfig) -> Result<String> {
        self.simplify(raw, config).map(|result| result.text)
    }

    /// Audio for already simplified text. `None` when no synthesizer is
    /// configured or it fails.
    pub fn synthesize_speech(&self, text: &str) -> Option<Vec<u8>> {
        let speech = self.collaborators.speech.as_ref()?;
        match speech.synthesize_speech(text) {
            Ok(audio) => Some(audio),
            Err(e) => {
                log::warn!("[Speech] {}", e);
                None
            }
        }
    }

    fn run_stages(&self, text: &str, config: &PipelineConfig, rng: &mut StdRng) -> Result<PipelineResult> {
        let c = &self.collaborators;

        let corrected = if config.correct_grammar {
            match c.grammar.correct(text) {
                Ok(fixed) if !fixed.trim().is_empty() => fixed,
                Ok(_) => {
                    log::warn!("[Grammar] Empty correction, keeping input");
                    text.to_string()
                }
                Err(e) => {
                    log::warn!("[Grammar] {}; keeping input", e);
                    text.to_string()
                }
            }
        } else {
            text.to_string()
        };

        let lexical = LexicalSimplifier::new(&self.dictionary, c.synonyms.as_ref());
        let sentences: Vec<Sentence> = segment(&corrected, c.segmenter.as_ref(), c.tokenizer.as_ref())
            .iter()
            .map(|s| Sentence::new(lexical.simplify(&s.tokens, config, rng), s.span))
            .flat_map(|s| restructure(&s, config.sentence_length_threshold))
            .collect();
        log::debug!("[Pipeline] {} sentences after restructuring", sentences.len());

        let mut out = reassemble(&sentences);
        if out.is_empty() {
            // Nothing but punctuation: no word stage had anything to work on.
            log::debug!("[Pipeline] No words found, keeping the text as it was");
            out = corrected;
        }

        if config.use_generative_model {
            out = rewrite(&out, c.generator.as_ref(), &self.generator_settings);
        }
        if config.humanize {
            out = humanize(&out, config, rng);
        }
        if out.trim().is_empty() {
            return Err(Error::internal("pipeline produced empty text"));
        }

        let readability = if config.report_readability {
            match c.readability.readability_score(&out) {
                Ok(report) => Some(report),
                Err(e) => {
                    log::warn!("[Readability] {}", e);
                    None
                }
            }
        } else {
            None
        };

        Ok(PipelineResult {
            text: out,
            readability,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> PipelineConfig {
        PipelineConfig {
            humanize: false,
            random_seed: Some(1),
            ..Default::default()
        }
    }

    #[test]
    fn runs_the_word_stages() {
        let simplifier = Simplifier::new(Arc::new(Collaborators::dictionary_only()));
        let out = simplifier
            .simplify_text(
                "Utilize   the approximately correct technology to facilitate communication.",
                &plain(),
            )
            .unwrap();
        assert_eq!(out, "Use the about correct tech to help talking.");
    }

    #[test]
    fn grammar_pass_runs_first() {
        let simplifier = Simplifier::new(Arc::new(Collaborators::heuristic()));
        let out = simplifier.simplify_text("i saw teh cat.", &plain()).unwrap();
        assert_eq!(out, "I saw the cat.");
    }

    #[test]
    fn blank_input_is_rejected() {
        let simplifier = Simplifier::new(Arc::new(Collaborators::dictionary_only()));
        assert!(matches!(
            simplifier.simplify("  \n ", &plain()),
            Err(Error::EmptyInput)
        ));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let simplifier = Simplifier::new(Arc::new(Collaborators::dictionary_only()));
        let config = PipelineConfig {
            strength: 9,
            ..plain()
        };
        assert!(matches!(
            simplifier.simplify("Hi.", &config),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn punctuation_only_text_passes_through() {
        let simplifier = Simplifier::new(Arc::new(Collaborators::dictionary_only()));
        assert_eq!(simplifier.simplify_text("?!", &plain()).unwrap(), "?!");
    }

    #[test]
    fn readability_is_optional() {
        let simplifier = Simplifier::new(Arc::new(Collaborators::dictionary_only()));
        let with = simplifier.simplify("The dog ran.", &plain()).unwrap();
        assert_eq!(with.readability.map(|r| r.words), Some(3));
        let config = PipelineConfig {
            report_readability: false,
            ..plain()
        };
        assert!(simplifier.simplify("The dog ran.", &config).unwrap().readability.is_none());
    }

    #[test]
    fn background_run_reports_through_the_channel() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::time::Duration;

        let simplifier = Simplifier::new(Arc::new(Collaborators::dictionary_only()));
        let done = Arc::new(AtomicBool::new(false));
        let flag = done.clone();
        let rx = simplifier
            .simplify_in_background("Utilize it.".to_string(), plain(), move || {
                flag.store(true, Ordering::SeqCst)
            })
            .unwrap();
        let result = rx.recv_timeout(Duration::from_secs(5)).unwrap().unwrap();
        assert_eq!(result.text, "Use it.");

        let rx = simplifier
            .simplify_in_background("  ".to_string(), plain(), || {})
            .unwrap();
        assert!(matches!(
            rx.recv_timeout(Duration::from_secs(5)).unwrap(),
            Err(Error::EmptyInput)
        ));
        // The first callback has run by the time its sender is gone.
        while !done.load(Ordering::SeqCst) {
            std::thread::yield_now();
        }
    }

    #[test]
    fn no_speech_backend_means_no_audio() {
        let simplifier = Simplifier::new(Arc::new(Collaborators::dictionary_only()));
        assert!(simplifier.synthesize_speech("Hi.").is_none());
    }
}
