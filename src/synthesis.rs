/*!
 * Per-line speech synthesis.
 *
 * Every flattened dialogue line becomes exactly one synthesis request and one
 * audio file. Lines are processed sequentially in document order; a failed
 * line is recorded and never aborts the rest of the batch.
 */

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::SynthesisConfig;
use crate::document_loader::FileManager;
use crate::errors::ProviderError;
use crate::providers::{SpeechRequest, SpeechSynthesizer};
use crate::script::DialogueRecord;
use crate::voice::VoiceAssigner;

/// Outcome of synthesizing one dialogue line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisRecord {
    pub scene: String,
    pub slide_number: u32,
    pub character: String,
    pub text: String,
    pub line_number: usize,
    pub voice_id: String,
    pub file_name: String,
    /// Written file, absent when synthesis failed
    pub file_path: Option<String>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Deterministic audio file name for a dialogue line, e.g. `03_Lisa_012.mp3`
pub fn audio_file_name(dialogue: &DialogueRecord, extension: &str) -> String {
    format!(
        "{:02}_{}_{:03}.{}",
        dialogue.slide_number, dialogue.character, dialogue.line_number, extension
    )
}

/// Drives a `SpeechSynthesizer` over a list of dialogue lines
#[derive(Debug, Clone)]
pub struct SynthesisService {
    // @field: Speech provider
    synthesizer: Arc<dyn SpeechSynthesizer>,

    // @field: Model, settings, delays and retries
    config: SynthesisConfig,

    // @field: Audio file extension without dot
    extension: String,

    // @field: Draw a progress bar on stderr
    show_progress: bool,
}

impl SynthesisService {
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>, config: SynthesisConfig) -> Self {
        Self {
            synthesizer,
            config,
            extension: "mp3".to_string(),
            show_progress: false,
        }
    }

    /// Set the audio file extension
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Enable or disable the progress bar
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn synthesizer(&self) -> &Arc<dyn SpeechSynthesizer> {
        &self.synthesizer
    }

    /// Synthesize every dialogue line into `output_dir`.
    ///
    /// Voice ids come from the assigner, so all speaking characters must be
    /// assigned beforehand; unassigned ones fall back to the default voice.
    pub async fn generate_batch(
        &self,
        dialogues: &[DialogueRecord],
        assigner: &VoiceAssigner,
        output_dir: &Path,
    ) -> Vec<SynthesisRecord> {
        let progress_bar = self.progress_bar(dialogues.len() as u64);
        let mut records = Vec::with_capacity(dialogues.len());

        info!("Generating {} dialogue lines", dialogues.len());

        for (i, dialogue) in dialogues.iter().enumerate() {
            let file_name = audio_file_name(dialogue, &self.extension);
            let voice_id = assigner.voice_id(&dialogue.character).to_string();
            progress_bar.set_message(file_name.clone());

            let request = SpeechRequest::new(&dialogue.text, &voice_id, &self.config.model)
                .voice_settings(self.config.voice_settings.clone());
            let file_path = output_dir.join(&file_name);

            let outcome = match self.synthesize_with_retry(&request).await {
                Ok(audio) => FileManager::write_bytes(&file_path, &audio)
                    .map(|_| audio.len())
                    .map_err(|e| format!("{:#}", e)),
                Err(e) => Err(e.to_string()),
            };

            let (file_path, error) = match outcome {
                Ok(size) => {
                    debug!("Wrote {} ({} bytes)", file_name, size);
                    (Some(file_path.to_string_lossy().to_string()), None)
                }
                Err(message) => {
                    warn!("Failed to generate {}: {}", file_name, message);
                    (None, Some(message))
                }
            };

            records.push(SynthesisRecord {
                scene: dialogue.scene.clone(),
                slide_number: dialogue.slide_number,
                character: dialogue.character.clone(),
                text: dialogue.text.clone(),
                line_number: dialogue.line_number,
                voice_id,
                file_name,
                success: file_path.is_some(),
                file_path,
                error,
            });
            progress_bar.inc(1);

            if i + 1 < dialogues.len() && self.config.rate_limit_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.rate_limit_delay_ms)).await;
            }
        }

        progress_bar.finish_and_clear();

        let succeeded = records.iter().filter(|r| r.success).count();
        info!("Generated {}/{} audio files", succeeded, records.len());

        records
    }

    /// Retry retryable errors with doubling backoff
    async fn synthesize_with_retry(&self, request: &SpeechRequest) -> Result<bytes::Bytes, ProviderError> {
        let mut attempt = 0;

        loop {
            match self.synthesizer.synthesize(request).await {
                Ok(audio) => return Ok(audio),
                Err(e) if e.is_retryable() && attempt < self.config.retry_count => {
                    let backoff_ms = backoff_delay_ms(self.config.retry_backoff_ms, attempt);
                    warn!(
                        "{} - attempt {}/{}, retrying in {}ms",
                        e,
                        attempt + 1,
                        self.config.retry_count + 1,
                        backoff_ms
                    );
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let progress_bar = ProgressBar::new(len);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("[{bar:40}] {pos}/{len} {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("#>-"));
        progress_bar
    }
}

/// Delay before retry number `attempt + 1`, doubling from `base_ms`
fn backoff_delay_ms(base_ms: u64, attempt: u32) -> u64 {
    base_ms.saturating_mul(1u64 << attempt.min(16))
}
