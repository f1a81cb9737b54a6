use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

use crate::subtitle_builder::ChunkPolicy;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Transcription provider config
    #[serde(default)]
    pub transcription: TranscriptionConfig,

    /// Subtitle output config
    #[serde(default)]
    pub subtitle: SubtitleConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Transcription service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranscriptionConfig {
    /// Model name (e.g., "whisper-1")
    #[serde(default = "default_model")]
    pub model: String,

    /// API key for the service. When empty, the OPENAI_API_KEY environment
    /// variable is consulted at load time.
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Service endpoint URL (optional, for Azure OpenAI or self-hosted)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Spoken language of the audio as an ISO 639-1 code, if known.
    /// Passed as a hint to the API; None lets the API auto-detect.
    #[serde(default)]
    pub language: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Sampling temperature for the transcription (0.0 to 1.0)
    #[serde(default)]
    pub temperature: Option<f32>,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: String::new(),
            endpoint: default_endpoint(),
            language: None,
            timeout_secs: default_timeout_secs(),
            temperature: None,
        }
    }
}

/// Chunking policy selection for the config file and CLI
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChunkPolicyChoice {
    /// Close a cue on sentence-ending punctuation
    #[default]
    Sentence,
    /// Close a cue after a fixed word count
    Words,
}

impl std::fmt::Display for ChunkPolicyChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sentence => write!(f, "sentence"),
            Self::Words => write!(f, "words"),
        }
    }
}

impl std::str::FromStr for ChunkPolicyChoice {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "sentence" => Ok(Self::Sentence),
            "words" => Ok(Self::Words),
            _ => Err(anyhow!("Invalid chunk policy: {}", s)),
        }
    }
}

/// Configuration for subtitle output
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SubtitleConfig {
    /// Whether to emit sequence-number lines in the SRT output
    #[serde(default = "default_true")]
    pub include_index: bool,

    /// How word tokens are grouped into cues
    #[serde(default)]
    pub policy: ChunkPolicyChoice,

    /// Words per cue when the policy is `words`
    #[serde(default = "default_words_per_cue")]
    pub words_per_cue: usize,
}

impl Default for SubtitleConfig {
    fn default() -> Self {
        Self {
            include_index: true,
            policy: ChunkPolicyChoice::default(),
            words_per_cue: default_words_per_cue(),
        }
    }
}

impl SubtitleConfig {
    /// Resolve the configured policy choice into a concrete chunk policy
    pub fn chunk_policy(&self) -> ChunkPolicy {
        match self.policy {
            ChunkPolicyChoice::Sentence => ChunkPolicy::Sentence,
            ChunkPolicyChoice::Words => ChunkPolicy::Words {
                per_cue: self.words_per_cue.max(1),
            },
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_model() -> String {
    "whisper-1".to_string()
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_words_per_cue() -> usize {
    7
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.transcription.api_key.is_empty() {
            return Err(anyhow!(
                "Transcription API key is required (set it in the config file or via OPENAI_API_KEY)"
            ));
        }

        if let Some(language) = &self.transcription.language {
            isolang::Language::from_639_1(language).ok_or_else(|| {
                anyhow!("Invalid language code '{}': expected an ISO 639-1 code like 'en'", language)
            })?;
        }

        if self.subtitle.policy == ChunkPolicyChoice::Words && self.subtitle.words_per_cue == 0 {
            return Err(anyhow!("words_per_cue must be at least 1"));
        }

        if let Some(temperature) = self.transcription.temperature {
            if !(0.0..=1.0).contains(&temperature) {
                return Err(anyhow!("temperature must be between 0.0 and 1.0"));
            }
        }

        Ok(())
    }

    /// Fill an empty API key from the process environment. The key is read
    /// once here and carried in the config from that point on; nothing else
    /// in the application touches the environment.
    pub fn resolve_api_key_from_env(&mut self) {
        if self.transcription.api_key.is_empty() {
            if let Ok(key) = std::env::var("OPENAI_API_KEY") {
                self.transcription.api_key = key;
            }
        }
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            transcription: TranscriptionConfig::default(),
            subtitle: SubtitleConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
