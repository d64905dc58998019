//! Game and oracle configuration.

use crate::games::dots::{GridModel, Player};
use crate::llm_client::{LlmClient, LlmConfig, LlmProvider};
use crate::oracle::LlmOracle;
use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Configuration for one game against the computer.
///
/// ```toml
/// rows = 3
/// cols = 5
/// human_player = "two"
///
/// [oracle]
/// provider = "anthropic"
/// model = "claude-3-5-haiku-20241022"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct GameConfig {
    /// Square-rows of the grid.
    #[serde(default = "default_size")]
    rows: usize,

    /// Square-columns of the grid.
    #[serde(default = "default_size")]
    cols: usize,

    /// Which seat the human plays. [`Player::One`] moves first.
    #[serde(default = "default_human_player")]
    human_player: Player,

    /// Optional move oracle. Without one the heuristic plays alone.
    #[serde(default)]
    #[setters(strip_option)]
    oracle: Option<OracleConfig>,
}

/// Configuration for the LLM-backed move oracle.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct OracleConfig {
    /// LLM provider (openai or anthropic).
    #[serde(default = "default_provider")]
    provider: LlmProvider,

    /// LLM model name.
    #[serde(default = "default_model")]
    model: String,

    /// Maximum tokens for LLM responses.
    #[serde(default = "default_max_tokens")]
    max_tokens: u32,

    /// Retries after a transport failure.
    #[serde(default = "default_max_retries")]
    max_retries: u32,
}

fn default_size() -> usize {
    4
}

fn default_human_player() -> Player {
    Player::One
}

fn default_provider() -> LlmProvider {
    LlmProvider::OpenAI
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_tokens() -> u32 {
    150
}

fn default_max_retries() -> u32 {
    1
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: default_size(),
            cols: default_size(),
            human_player: default_human_player(),
            oracle: None,
        }
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            max_retries: default_max_retries(),
        }
    }
}

impl GameConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        info!(rows = config.rows, cols = config.cols, human = %config.human_player, "Config loaded successfully");
        Ok(config)
    }

    /// Checks the grid size against the limits the engine accepts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        GridModel::check_dimensions(self.rows, self.cols)
            .map_err(|e| ConfigError::new(format!("Invalid grid size: {}", e)))
    }

    /// The seat the computer plays.
    pub fn computer_player(&self) -> Player {
        self.human_player.opponent()
    }
}

impl OracleConfig {
    /// Creates LLM configuration from this oracle config.
    ///
    /// Reads `OPENAI_API_KEY` or `ANTHROPIC_API_KEY`, loading a `.env` file
    /// first if one exists.
    #[instrument(skip(self), fields(provider = ?self.provider, model = %self.model))]
    pub fn create_llm_config(&self) -> Result<LlmConfig, ConfigError> {
        debug!("Creating LLM config");
        dotenvy::dotenv().ok();

        let var = match self.provider {
            LlmProvider::OpenAI => "OPENAI_API_KEY",
            LlmProvider::Anthropic => "ANTHROPIC_API_KEY",
        };
        let api_key = std::env::var(var)
            .map_err(|_| ConfigError::new(format!("{} environment variable not set", var)))?;

        Ok(LlmConfig::new(
            self.provider,
            api_key,
            self.model.clone(),
            self.max_tokens,
        ))
    }

    /// Builds the LLM-backed oracle described by this config.
    #[instrument(skip(self))]
    pub fn build_oracle(&self) -> Result<LlmOracle, ConfigError> {
        let client = LlmClient::new(self.create_llm_config()?);
        Ok(LlmOracle::new(client))
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
