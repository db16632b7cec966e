use std::sync::Arc;
use std::thread;

use crossbeam_channel::{bounded, RecvTimeoutError};

use crate::collaborators::{GenerationOptions, Generator};
use crate::config::GeneratorSettings;
use crate::error::CollaboratorError;

/// Builds the options handed to the backend from the settings file.
pub fn generation_options(settings: &GeneratorSettings) -> GenerationOptions {
    GenerationOptions {
        max_length: settings.max_length,
        num_beams: settings.num_beams,
        repetition_penalty: settings.repetition_penalty,
        timeout: settings.timeout(),
    }
}

pub fn build_prompt(instruction: &str, text: &str) -> String {
    format!("{}: {}", instruction.trim(), text)
}

/// Calls the generator on a worker thread and waits at most `options.timeout`.
///
/// A backend that does not answer in time is abandoned; its thread finishes
/// on its own and the answer is dropped.
pub fn generate_with_timeout(
    generator: Arc<dyn Generator>,
    prompt: String,
    options: GenerationOptions,
) -> Result<String, CollaboratorError> {
    let timeout = options.timeout;
    let (tx, rx) = bounded(1);
    thread::Builder::new()
        .name("kidtext-generator".to_string())
        .spawn(move || {
            let _ = tx.send(generator.generate(&prompt, &options));
        })
        .map_err(|e| CollaboratorError::unavailable("generator", e.to_string()))?;

    match rx.recv_timeout(timeout) {
        Ok(answer) => answer,
        Err(RecvTimeoutError::Timeout) => Err(CollaboratorError::Timeout {
            name: "generator",
            after: timeout,
        }),
        Err(RecvTimeoutError::Disconnected) => Err(CollaboratorError::unavailable(
            "generator",
            "worker stopped without answering",
        )),
    }
}

/// Sends the text through the generative backend. Any failure, including an
/// empty answer, leaves `text` as it was. A usable answer is returned
/// unchanged, whatever its length or content.
pub fn rewrite(text: &str, generator: Option<&Arc<dyn Generator>>, settings: &GeneratorSettings) -> String {
    let Some(generator) = generator else {
        log::debug!("[Rewriter] No generative backend configured, skipping");
        return text.to_string();
    };
    let prompt = build_prompt(&settings.instruction, text);
    match generate_with_timeout(generator.clone(), prompt, generation_options(settings)) {
        Ok(answer) if !answer.trim().is_empty() => answer,
        Ok(_) => {
            log::warn!("[Rewriter] {}", CollaboratorError::malformed("generator", "empty answer"));
            text.to_string()
        }
        Err(e) => {
            log::warn!("[Rewriter] {}; keeping lexical output", e);
            text.to_string()
        }
    }
}
