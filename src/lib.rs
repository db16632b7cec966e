//*** START FILE: src/lib.rs ***//

// Declare all modules that are part of this library
pub mod config;
pub mod error;
pub mod types {
    pub mod text_data;
}
pub mod parsing;
pub mod collaborators;
pub mod simplification;
pub mod readability;
pub mod pipeline;
pub mod dictionary_io;
pub mod batch;

pub use config::{PipelineConfig, Settings};
pub use error::{CollaboratorError, Error, Result};
pub use pipeline::Simplifier;
pub use types::text_data::{PipelineResult, ReadabilityReport, Sentence, Token};

//*** END FILE: src/lib.rs ***//
