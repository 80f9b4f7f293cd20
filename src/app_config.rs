use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::default::Default;
use std::fs;
use std::path::Path;

use crate::voice::catalog::{default_voice_ids, VoiceProfile};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Speech synthesis service settings
    #[serde(default)]
    pub synthesis: SynthesisConfig,

    /// Voice catalog, overrides and cache scope
    #[serde(default)]
    pub voices: VoiceConfig,

    /// Output locations and formats
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// ElevenLabs synthesis settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SynthesisConfig {
    // @field: API key, may also come from ELEVENLABS_API_KEY
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    // @field: Model id
    #[serde(default = "default_model")]
    pub model: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Delay in milliseconds between consecutive synthesis requests
    #[serde(default = "default_rate_limit_delay_ms")]
    pub rate_limit_delay_ms: u64,

    /// Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Base backoff for retries in milliseconds, doubled on each retry
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Voice settings sent with every request
    #[serde(default)]
    pub voice_settings: VoiceSettings,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: default_endpoint(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            rate_limit_delay_ms: default_rate_limit_delay_ms(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            voice_settings: VoiceSettings::default(),
        }
    }
}

/// Voice settings tuned for slow, precise speech for language learners
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct VoiceSettings {
    /// Higher is slower and more consistent (0.0 to 1.0)
    #[serde(default = "default_stability")]
    pub stability: f32,

    /// Lower is less creative (0.0 to 1.0)
    #[serde(default = "default_similarity_boost")]
    pub similarity_boost: f32,

    /// Style exaggeration, 0.0 reads the text literally
    #[serde(default)]
    pub style: f32,

    #[serde(default = "default_true")]
    pub use_speaker_boost: bool,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: default_stability(),
            similarity_boost: default_similarity_boost(),
            style: 0.0,
            use_speaker_boost: true,
        }
    }
}

/// Whether character voices are shared across the documents of a batch
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum VoiceScope {
    /// Every document starts with an empty character to voice map
    #[default]
    PerDocument,
    /// One map for the whole batch
    Global,
}

impl std::fmt::Display for VoiceScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PerDocument => write!(f, "per_document"),
            Self::Global => write!(f, "global"),
        }
    }
}

impl std::str::FromStr for VoiceScope {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "per_document" => Ok(Self::PerDocument),
            "global" => Ok(Self::Global),
            _ => Err(anyhow!("Invalid voice scope: {}", s)),
        }
    }
}

/// Voice assignment configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct VoiceConfig {
    /// External voice id for each profile
    #[serde(default = "default_voice_ids")]
    pub profiles: BTreeMap<VoiceProfile, String>,

    /// Character name to profile name, e.g. {"Lisa": "young_female_friendly"}
    #[serde(default)]
    pub overrides: BTreeMap<String, String>,

    #[serde(default)]
    pub scope: VoiceScope,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            profiles: default_voice_ids(),
            overrides: BTreeMap::new(),
            scope: VoiceScope::default(),
        }
    }
}

/// Output configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OutputConfig {
    /// Output directory for a single document
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Base directory for batch runs, one sub-directory per document
    #[serde(default = "default_batch_output_dir")]
    pub batch_output_dir: String,

    /// Extension of generated audio files
    #[serde(default = "default_audio_extension")]
    pub audio_extension: String,

    #[serde(default = "default_true")]
    pub write_json: bool,

    #[serde(default = "default_true")]
    pub write_csv: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            batch_output_dir: default_batch_output_dir(),
            audio_extension: default_audio_extension(),
            write_json: true,
            write_csv: true,
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

fn default_endpoint() -> String {
    "https://api.elevenlabs.io".to_string()
}

fn default_model() -> String {
    "eleven_turbo_v2".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_rate_limit_delay_ms() -> u64 {
    500 // 500ms default delay between requests
}

fn default_retry_count() -> u32 {
    2
}

fn default_retry_backoff_ms() -> u64 {
    1000 // 1 second base backoff time, doubled on each retry
}

fn default_stability() -> f32 {
    0.95
}

fn default_similarity_boost() -> f32 {
    0.40
}

fn default_true() -> bool {
    true
}

fn default_output_dir() -> String {
    "output".to_string()
}

fn default_batch_output_dir() -> String {
    "batch_output".to_string()
}

fn default_audio_extension() -> String {
    "mp3".to_string()
}

impl Config {
    /// Read a configuration file, writing the defaults there first when it is missing
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!("No configuration at {:?}, writing defaults", path);
            let config = Self::default();
            let json = serde_json::to_string_pretty(&config)?;
            fs::write(path, json).with_context(|| format!("Failed to write {:?}", path))?;
            return Ok(config);
        }

        let content = fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        serde_json::from_str(&content).with_context(|| format!("Invalid configuration in {:?}", path))
    }

    /// Validate settings needed for extraction and export
    pub fn validate(&self) -> Result<()> {
        let extension = self.output.audio_extension.trim();
        if extension.is_empty() || !extension.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(anyhow!("Invalid audio extension: '{}'", self.output.audio_extension));
        }

        for (profile, voice_id) in &self.voices.profiles {
            if voice_id.trim().is_empty() {
                return Err(anyhow!("Voice id for profile '{}' is empty", profile));
            }
        }

        let settings = &self.synthesis.voice_settings;
        for (name, value) in [
            ("stability", settings.stability),
            ("similarity_boost", settings.similarity_boost),
            ("style", settings.style),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(anyhow!("Voice setting '{}' must be between 0.0 and 1.0, got {}", name, value));
            }
        }

        Ok(())
    }

    /// Validate settings needed to call the synthesis service
    pub fn validate_for_synthesis(&self) -> Result<()> {
        self.validate()?;

        if self.synthesis.api_key.trim().is_empty() {
            return Err(anyhow!(
                "ElevenLabs API key is required (set synthesis.api_key or ELEVENLABS_API_KEY)"
            ));
        }

        let endpoint = url::Url::parse(&self.synthesis.endpoint)
            .map_err(|e| anyhow!("Invalid synthesis endpoint '{}': {}", self.synthesis.endpoint, e))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(anyhow!("Synthesis endpoint must use http or https: {}", endpoint));
        }

        if self.synthesis.timeout_secs == 0 {
            return Err(anyhow!("Synthesis timeout must be greater than zero"));
        }

        Ok(())
    }
}
