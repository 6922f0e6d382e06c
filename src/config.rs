use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Game and chat-model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Base URL of an OpenAI-compatible API
    pub api_base: String,
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
    /// Directory holding `case/` and `suspects/`
    pub data_path: PathBuf,
    /// Prepended to every question before it reaches the model
    pub question_prefix: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-4o".to_string(),
            temperature: 0.5,
            max_tokens: 512,
            top_p: 1.0,
            frequency_penalty: 1.0,
            presence_penalty: 1.0,
            data_path: PathBuf::from("./data"),
            question_prefix: "심문 : ".to_string(),
        }
    }
}

impl GameConfig {
    /// Load settings from a TOML file, then apply environment overrides
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        let config: GameConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        log::info!("Loaded config from {:?}", path);
        Ok(config.with_env_overrides())
    }

    /// Defaults plus environment overrides
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    fn with_env_overrides(self) -> Self {
        self.apply_overrides(|name| env::var(name).ok())
    }

    /// Apply overrides from a variable lookup; invalid numbers are ignored
    pub fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(key) = lookup("OPENAI_API_KEY") {
            if !key.is_empty() {
                self.api_key = Some(key);
            }
        }

        if let Some(url) = lookup("LLM_API_URL") {
            self.api_base = url;
        }

        if let Some(model) = lookup("LLM_MODEL") {
            self.model = model;
        }

        if let Some(value) = lookup("LLM_TEMPERATURE") {
            match value.parse() {
                Ok(temperature) => self.temperature = temperature,
                Err(_) => log::warn!("Ignoring invalid LLM_TEMPERATURE: {}", value),
            }
        }

        if let Some(value) = lookup("LLM_MAX_TOKENS") {
            match value.parse() {
                Ok(max_tokens) => self.max_tokens = max_tokens,
                Err(_) => log::warn!("Ignoring invalid LLM_MAX_TOKENS: {}", value),
            }
        }

        if let Some(path) = lookup("GAME_DATA_PATH") {
            self.data_path = PathBuf::from(path);
        }

        self
    }

    /// Builder-style override of the data directory
    pub fn with_data_path(mut self, data_path: impl Into<PathBuf>) -> Self {
        self.data_path = data_path.into();
        self
    }
}
