use std::time::Duration;

use reqwest::blocking::{multipart, Client};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use super::{Generator, Transcriber};
use crate::config::Config;
use crate::error::{DiscuteError, Result};

/// Blocking client for an OpenAI-compatible API (Groq by default)
pub struct GroqClient {
    http: Client,
    base_url: String,
    api_key: String,
    transcription_model: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

impl GroqClient {
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.api_key()?.to_string();
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base.trim_end_matches('/').to_string(),
            api_key,
            transcription_model: config.transcription_model.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

/// Turn a non-2xx response into a service error carrying the body
fn check_status(response: reqwest::blocking::Response, what: &str) -> Result<reqwest::blocking::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    warn!(%status, what, "service request failed");
    Err(DiscuteError::Service(format!("{} failed ({}): {}", what, status, body)))
}

impl Generator for GroqClient {
    fn generate(&self, prompt: &str, model: &str) -> Result<String> {
        debug!(model, prompt_len = prompt.len(), "requesting chat completion");

        let body = json!({
            "model": model,
            "messages": [{ "role": "user", "content": prompt }],
        });

        let response = self
            .http
            .post(self.endpoint("chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()?;

        let parsed: ChatCompletionResponse = check_status(response, "chat completion")?.json()?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| DiscuteError::Service("chat completion returned no content".to_string()))
    }
}

impl Transcriber for GroqClient {
    fn transcribe(&self, audio: &[u8]) -> Result<String> {
        if audio.is_empty() {
            return Err(DiscuteError::InvalidInput("audio recording is empty".to_string()));
        }
        debug!(bytes = audio.len(), model = %self.transcription_model, "requesting transcription");

        let part = multipart::Part::bytes(audio.to_vec())
            .file_name("audio.wav")
            .mime_str("audio/wav")?;
        let form = multipart::Form::new()
            .part("file", part)
            .text("model", self.transcription_model.clone());

        let response = self
            .http
            .post(self.endpoint("audio/transcriptions"))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()?;

        let parsed: TranscriptionResponse = check_status(response, "transcription")?.json()?;
        Ok(parsed.text.trim().to_string())
    }
}

impl From<reqwest::Error> for DiscuteError {
    fn from(e: reqwest::Error) -> Self {
        DiscuteError::Service(format!("HTTP error: {}", e))
    }
}
