//! Note generation through an external text generator.
//!
//! The generator itself is a collaborator behind [`TextGenerator`]: anything
//! that turns a prompt into text. [`CommandGenerator`] pipes the prompt into a
//! shell command, which is how the binary talks to whatever model CLI the user
//! has configured.

use std::io::Write;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::notes::{GenerationMode, ParsedNotes, parse_response};
use crate::prompt::build_prompt;

/// Transcripts shorter than this, after trimming, are refused.
pub const MIN_TRANSCRIPT_CHARS: usize = 50;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Transcript is too short ({len} characters, at least {MIN_TRANSCRIPT_CHARS} needed)")]
    TranscriptTooShort { len: usize },

    #[error("Failed to run generator command `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Generator command exited with {status}: {stderr}")]
    CommandFailed { status: ExitStatus, stderr: String },

    #[error("Generator output is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("Generator returned an empty response")]
    EmptyResponse,

    #[error("Generation failed: {reason}")]
    Failed { reason: String },
}

/// Turns a prompt into generated text.
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

impl<F> TextGenerator for F
where
    F: Fn(&str) -> Result<String, GenerationError>,
{
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self(prompt)
    }
}

/// Runs a shell command with the prompt on stdin and reads the reply from stdout.
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    command: String,
}

impl CommandGenerator {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    fn shell(&self) -> Command {
        let mut cmd = if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C");
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.arg("-c");
            cmd
        };
        cmd.arg(&self.command);
        cmd
    }
}

impl TextGenerator for CommandGenerator {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let spawn_error = |source| GenerationError::Spawn {
            command: self.command.clone(),
            source,
        };

        let mut child = self
            .shell()
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_error)?;

        // Feed stdin from another thread so a chatty command cannot deadlock us.
        let writer = child.stdin.take().map(|mut stdin| {
            let prompt = prompt.to_owned();
            thread::spawn(move || stdin.write_all(prompt.as_bytes()))
        });

        let output = child.wait_with_output().map_err(spawn_error)?;

        if let Some(writer) = writer {
            // A command that never reads its input closes the pipe early.
            if let Ok(Err(e)) = writer.join() {
                debug!(error = %e, "generator did not consume the whole prompt");
            }
        }

        if !output.status.success() {
            return Err(GenerationError::CommandFailed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = String::from_utf8(output.stdout)?;
        if text.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(text)
    }
}

/// How often to try the generator and how long to wait between tries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self { attempts, delay }
    }
}

/// Call the generator until it succeeds or the attempts run out.
///
/// Waits a fixed delay between attempts and returns the last error when every
/// attempt fails. Zero attempts is treated as one.
pub fn generate_with_retry<G>(
    generator: &G,
    prompt: &str,
    policy: RetryPolicy,
) -> Result<String, GenerationError>
where
    G: TextGenerator + ?Sized,
{
    let attempts = policy.attempts.max(1);
    let mut attempt = 1;
    loop {
        match generator.generate(prompt) {
            Ok(text) => {
                info!(attempt, chars = text.len(), "generator responded");
                return Ok(text);
            }
            Err(e) if attempt < attempts => {
                warn!(attempt, attempts, error = %e, "generation attempt failed, retrying");
                thread::sleep(policy.delay);
                attempt += 1;
            }
            Err(e) => {
                warn!(attempt, error = %e, "generation failed, no attempts left");
                return Err(e);
            }
        }
    }
}

/// Generate structured notes for a transcript.
///
/// Refuses transcripts under [`MIN_TRANSCRIPT_CHARS`] before contacting the
/// generator, then builds the prompt for `mode`, retries per `policy` and
/// parses the reply.
pub fn generate_notes<G>(
    generator: &G,
    transcript: &str,
    title: &str,
    mode: GenerationMode,
    policy: RetryPolicy,
) -> Result<ParsedNotes, GenerationError>
where
    G: TextGenerator + ?Sized,
{
    let len = transcript.trim().chars().count();
    if len < MIN_TRANSCRIPT_CHARS {
        return Err(GenerationError::TranscriptTooShort { len });
    }

    let prompt = build_prompt(transcript, title, mode);
    debug!(%mode, prompt_chars = prompt.len(), "built prompt");

    let response = generate_with_retry(generator, &prompt, policy)?;
    Ok(parse_response(&response, title, mode))
}
