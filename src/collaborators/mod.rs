//! Boundaries to the linguistic services the pipeline leans on.
//!
//! Each service is a `Send + Sync` trait so one set of handles can serve
//! concurrent requests. The pipeline receives them bundled in
//! [`Collaborators`]; nothing in `simplification` reaches for a global.
//!
//! Every method that can fail returns [`CollaboratorError`]. Callers in the
//! pipeline recover from all of them locally.

pub mod command;
pub mod grammar;
pub mod thesaurus;

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use crate::config::Settings;
use crate::error::{self, CollaboratorError};
use crate::parsing::{HeuristicAnalyzer, RuleSegmenter};
use crate::readability::FleschScorer;
use crate::types::text_data::{ReadabilityReport, Token};

pub use command::{CommandGenerator, CommandSpeechSynthesizer};
pub use grammar::{CommonMistakeCorrector, NoopCorrector};
pub use thesaurus::{NoSynonyms, StaticThesaurus};

/// Splits one sentence into flagged tokens.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, sentence: &str) -> Result<Vec<Token>, CollaboratorError>;
}

/// Sentence boundary detection.
pub trait SentenceSegmenter: Send + Sync {
    fn segment_sentences(&self, text: &str) -> Result<Vec<String>, CollaboratorError>;
}

/// Best-effort spelling and grammar repair.
pub trait GrammarCorrector: Send + Sync {
    fn correct(&self, text: &str) -> Result<String, CollaboratorError>;
}

/// Thesaurus lookup. An empty list is a valid answer.
pub trait SynonymLookup: Send + Sync {
    fn lookup_synonyms(&self, word: &str) -> Result<Vec<String>, CollaboratorError>;
}

/// Knobs forwarded to a generative backend.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    pub max_length: usize,
    pub num_beams: usize,
    pub repetition_penalty: f32,
    pub timeout: Duration,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        GenerationOptions {
            max_length: 256,
            num_beams: 4,
            repetition_penalty: 2.5,
            timeout: Duration::from_secs(10),
        }
    }
}

/// Text-to-text model. Slow, possibly absent, never deterministic.
pub trait Generator: Send + Sync {
    fn generate(&self, prompt: &str, options: &GenerationOptions)
        -> Result<String, CollaboratorError>;
}

pub trait ReadabilityScorer: Send + Sync {
    fn readability_score(&self, text: &str) -> Result<ReadabilityReport, CollaboratorError>;
}

pub trait SpeechSynthesizer: Send + Sync {
    fn synthesize_speech(&self, text: &str) -> Result<Vec<u8>, CollaboratorError>;
}

/// The full set of handles one pipeline run may call.
#[derive(Clone)]
pub struct Collaborators {
    pub tokenizer: Arc<dyn Tokenizer>,
    pub segmenter: Arc<dyn SentenceSegmenter>,
    pub grammar: Arc<dyn GrammarCorrector>,
    pub synonyms: Arc<dyn SynonymLookup>,
    pub generator: Option<Arc<dyn Generator>>,
    pub readability: Arc<dyn ReadabilityScorer>,
    pub speech: Option<Arc<dyn SpeechSynthesizer>>,
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators")
            .field("generator", &self.generator.is_some())
            .field("speech", &self.speech.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for Collaborators {
    fn default() -> Self {
        Self::heuristic()
    }
}

impl Collaborators {
    /// Built-in analyzers, misspelling table and thesaurus. No generator.
    pub fn heuristic() -> Self {
        let analyzer = Arc::new(HeuristicAnalyzer::new());
        Collaborators {
            tokenizer: analyzer.clone(),
            segmenter: analyzer,
            grammar: Arc::new(CommonMistakeCorrector::new()),
            synonyms: Arc::new(StaticThesaurus::builtin()),
            generator: None,
            readability: Arc::new(FleschScorer),
            speech: None,
        }
    }

    /// Dictionary substitution only: strict rule-based sentence splits, no
    /// thesaurus, no grammar pass, no generator.
    pub fn dictionary_only() -> Self {
        Collaborators {
            tokenizer: Arc::new(HeuristicAnalyzer::new()),
            segmenter: Arc::new(RuleSegmenter),
            grammar: Arc::new(NoopCorrector),
            synonyms: Arc::new(NoSynonyms),
            generator: None,
            readability: Arc::new(FleschScorer),
            speech: None,
        }
    }

    /// Heuristic bundle plus the thesaurus file and external commands the
    /// settings name. Fails only when the thesaurus file cannot be read.
    pub fn from_settings(settings: &Settings) -> error::Result<Self> {
        let mut collaborators = Self::heuristic();
        if let Some(path) = &settings.thesaurus.path {
            let thesaurus = StaticThesaurus::load_json(path)?;
            if thesaurus.is_empty() {
                log::warn!("[Collaborators] Thesaurus {} has no entries", path.display());
            } else {
                log::info!(
                    "[Collaborators] Loaded {} thesaurus entries from {}",
                    thesaurus.len(),
                    path.display()
                );
            }
            collaborators.synonyms = Arc::new(thesaurus);
        }
        if !settings.generator.command.is_empty() {
            collaborators.generator = Some(Arc::new(CommandGenerator::new(
                settings.generator.command.clone(),
            )));
        }
        if !settings.speech.command.is_empty() {
            collaborators.speech = Some(Arc::new(CommandSpeechSynthesizer::new(
                settings.speech.command.clone(),
            )));
        }
        Ok(collaborators)
    }

    pub fn with_tokenizer(mut self, tokenizer: Arc<dyn Tokenizer>) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    pub fn with_segmenter(mut self, segmenter: Arc<dyn SentenceSegmenter>) -> Self {
        self.segmenter = segmenter;
        self
    }

    pub fn with_grammar(mut self, grammar: Arc<dyn GrammarCorrector>) -> Self {
        self.grammar = grammar;
        self
    }

    pub fn with_synonyms(mut self, synonyms: Arc<dyn SynonymLookup>) -> Self {
        self.synonyms = synonyms;
        self
    }

    pub fn with_generator(mut self, generator: Arc<dyn Generator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn with_readability(mut self, readability: Arc<dyn ReadabilityScorer>) -> Self {
        self.readability = readability;
        self
    }

    pub fn with_speech(mut self, speech: Arc<dyn SpeechSynthesizer>) -> Self {
        self.speech = Some(speech);
        self
    }
}

static SHARED: OnceLock<Arc<Collaborators>> = OnceLock::new();

/// Process-wide handles, built on first use from `settings` and reused for
/// the life of the process. Later calls return the existing handles.
pub fn init_shared(settings: &Settings) -> error::Result<Arc<Collaborators>> {
    if let Some(shared) = SHARED.get() {
        return Ok(shared.clone());
    }
    let built = Arc::new(Collaborators::from_settings(settings)?);
    Ok(SHARED
        .get_or_init(|| {
            log::info!("[Collaborators] Initializing shared handles");
            built
        })
        .clone())
}

/// Process-wide handles; the built-in bundle when nothing was initialized.
pub fn shared_defaults() -> Arc<Collaborators> {
    SHARED
        .get_or_init(|| Arc::new(Collaborators::heuristic()))
        .clone()
}
