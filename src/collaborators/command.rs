//! Collaborators backed by an external program.
//!
//! The input goes to the child's stdin, the answer is whatever it writes to
//! stdout. A child that outlives its deadline is killed.

use std::io::{Read, Write};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use super::{GenerationOptions, Generator, SpeechSynthesizer};
use crate::error::CollaboratorError;

const POLL_INTERVAL: Duration = Duration::from_millis(20);
const SPEECH_TIMEOUT: Duration = Duration::from_secs(60);

fn spawn(
    name: &'static str,
    argv: &[String],
    envs: &[(&str, String)],
) -> Result<Child, CollaboratorError> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| CollaboratorError::unavailable(name, "no command configured"))?;
    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null());
    for (key, value) in envs {
        command.env(key, value);
    }
    command
        .spawn()
        .map_err(|e| CollaboratorError::unavailable(name, format!("{}: {}", program, e)))
}

fn run_with_timeout(
    name: &'static str,
    mut child: Child,
    input: &[u8],
    timeout: Duration,
) -> Result<Vec<u8>, CollaboratorError> {
    let mut stdout = child
        .stdout
        .take()
        .ok_or_else(|| CollaboratorError::unavailable(name, "stdout not captured"))?;
    let reader = thread::spawn(move || {
        let mut buf = Vec::new();
        stdout.read_to_end(&mut buf).map(|_| buf)
    });

    if let Some(mut stdin) = child.stdin.take() {
        // Written off-thread so a child that never reads cannot stall the deadline.
        // One that exits without reading is judged by its status below.
        let input = input.to_vec();
        thread::spawn(move || {
            if let Err(e) = stdin.write_all(&input) {
                log::debug!("[{}] stdin write failed: {}", name, e);
            }
        });
    }

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(CollaboratorError::Timeout {
                    name,
                    after: timeout,
                });
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => return Err(CollaboratorError::unavailable(name, e.to_string())),
        }
    };

    let output = reader
        .join()
        .map_err(|_| CollaboratorError::unavailable(name, "output reader panicked"))?
        .map_err(|e| CollaboratorError::unavailable(name, e.to_string()))?;

    if !status.success() {
        return Err(CollaboratorError::unavailable(
            name,
            format!("exited with {}", status),
        ));
    }
    Ok(output)
}

/// Runs a text-to-text model through a command line tool.
///
/// The options travel as `KIDTEXT_MAX_LENGTH`, `KIDTEXT_NUM_BEAMS` and
/// `KIDTEXT_REPETITION_PENALTY` environment variables.
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    argv: Vec<String>,
}

impl CommandGenerator {
    pub fn new(argv: Vec<String>) -> Self {
        CommandGenerator { argv }
    }
}

impl Generator for CommandGenerator {
    fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, CollaboratorError> {
        const NAME: &str = "generator";
        let envs = [
            ("KIDTEXT_MAX_LENGTH", options.max_length.to_string()),
            ("KIDTEXT_NUM_BEAMS", options.num_beams.to_string()),
            (
                "KIDTEXT_REPETITION_PENALTY",
                options.repetition_penalty.to_string(),
            ),
        ];
        let child = spawn(NAME, &self.argv, &envs)?;
        let bytes = run_with_timeout(NAME, child, prompt.as_bytes(), options.timeout)?;
        let text = String::from_utf8(bytes)
            .map_err(|e| CollaboratorError::malformed(NAME, e.to_string()))?;
        Ok(text.trim().to_string())
    }
}

/// Text-to-speech through a command such as `espeak --stdout`.
#[derive(Debug, Clone)]
pub struct CommandSpeechSynthesizer {
    argv: Vec<String>,
    timeout: Duration,
}

impl CommandSpeechSynthesizer {
    pub fn new(argv: Vec<String>) -> Self {
        CommandSpeechSynthesizer {
            argv,
            timeout: SPEECH_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl SpeechSynthesizer for CommandSpeechSynthesizer {
    fn synthesize_speech(&self, text: &str) -> Result<Vec<u8>, CollaboratorError> {
        const NAME: &str = "speech";
        let child = spawn(NAME, &self.argv, &[])?;
        let audio = run_with_timeout(NAME, child, text.as_bytes(), self.timeout)?;
        if audio.is_empty() {
            return Err(CollaboratorError::malformed(NAME, "no audio produced"));
        }
        Ok(audio)
    }
}
