//! External collaborators: speech-to-text and text generation.

mod groq;

pub use groq::GroqClient;

use crate::error::Result;

/// Turns recorded audio into text.
pub trait Transcriber {
    fn transcribe(&self, audio: &[u8]) -> Result<String>;
}

/// Produces a reply for a fully rendered prompt.
pub trait Generator {
    fn generate(&self, prompt: &str, model: &str) -> Result<String>;
}
