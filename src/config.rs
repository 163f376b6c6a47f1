use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{DiscuteError, Result};

pub const DEFAULT_DB_PATH: &str = "prompts.db";
pub const DEFAULT_API_BASE: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_CHAT_MODEL: &str = "openai/gpt-oss-20b";
pub const DEFAULT_TRANSCRIPTION_MODEL: &str = "whisper-large-v3";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Runtime configuration, resolved from CLI flags and environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// SQLite file holding the prompt catalog
    pub db_path: PathBuf,
    /// Base URL of the OpenAI-compatible API
    pub api_base: String,
    pub chat_model: String,
    pub transcription_model: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            api_base: DEFAULT_API_BASE.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            transcription_model: DEFAULT_TRANSCRIPTION_MODEL.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// The API credential; blank keys count as missing.
    pub fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(DiscuteError::MissingApiKey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.db_path, PathBuf::from("prompts.db"));
        assert_eq!(config.chat_model, "openai/gpt-oss-20b");
        assert!(config.api_base.starts_with("https://"));
    }

    #[test]
    fn test_api_key_required() {
        let mut config = Config::default();
        assert!(matches!(config.api_key(), Err(DiscuteError::MissingApiKey)));

        config.api_key = Some("   ".to_string());
        assert!(config.api_key().is_err());

        config.api_key = Some("gsk_test".to_string());
        assert_eq!(config.api_key().unwrap(), "gsk_test");
    }

    #[test]
    fn test_api_key_not_serialized() {
        let config = Config {
            api_key: Some("secret".to_string()),
            ..Config::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }
}
