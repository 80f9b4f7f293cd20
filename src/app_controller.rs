use anyhow::{anyhow, Context, Result};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_config::{Config, VoiceScope};
use crate::document_loader::FileManager;
use crate::export;
use crate::providers::elevenlabs::ElevenLabs;
use crate::providers::SpeechSynthesizer;
use crate::script::{self, ExtractionResult};
use crate::synthesis::SynthesisService;
use crate::voice::VoiceAssigner;

// @module: Application controller for script processing

/// How processing one document ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "error")]
pub enum DocumentOutcome {
    /// Audio generated and result files written
    Completed,
    /// The script has no dialogue lines
    NothingToSynthesize,
    /// Output already present and overwrite not forced
    Skipped,
    Failed(String),
}

/// Result of processing one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentReport {
    pub file: String,
    pub name: String,
    #[serde(flatten)]
    pub outcome: DocumentOutcome,
    pub dialogues_count: usize,
    pub generated_count: usize,
    pub output_dir: Option<String>,
}

impl DocumentReport {
    fn new(path: &Path) -> Self {
        Self {
            file: path.to_string_lossy().to_string(),
            name: document_name(path),
            outcome: DocumentOutcome::Skipped,
            dialogues_count: 0,
            generated_count: 0,
            output_dir: None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, DocumentOutcome::Failed(_))
    }
}

/// Written to `batch_summary.json` after a folder run
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub timestamp: String,
    pub input_directory: String,
    pub output_directory: String,
    pub voice_scope: VoiceScope,
    pub total_files: usize,
    pub processed_files: usize,
    pub skipped_files: usize,
    pub failed_files: Vec<String>,
    pub results: Vec<DocumentReport>,
}

/// File stem used for reports and output directory names
fn document_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| "script".to_string())
}

/// Main application controller for script to speech processing
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Synthesis driver over the configured provider
    synthesis: SynthesisService,

    // @field: Regenerate documents that already have output
    force_overwrite: bool,
}

impl Controller {
    // @method: Create a controller talking to ElevenLabs
    pub fn with_config(config: Config) -> Result<Self> {
        let synthesizer: Arc<dyn SpeechSynthesizer> = Arc::new(ElevenLabs::from_config(&config.synthesis));
        Self::with_synthesizer(config, synthesizer)
    }

    // @method: Create a controller with any synthesizer
    pub fn with_synthesizer(config: Config, synthesizer: Arc<dyn SpeechSynthesizer>) -> Result<Self> {
        config.validate().map_err(|e| anyhow!("Invalid configuration: {}", e))?;

        let synthesis = SynthesisService::new(synthesizer, config.synthesis.clone())
            .with_extension(config.output.audio_extension.trim());

        Ok(Self {
            config,
            synthesis,
            force_overwrite: false,
        })
    }

    pub fn force_overwrite(mut self, force_overwrite: bool) -> Self {
        self.force_overwrite = force_overwrite;
        self
    }

    /// Show a progress bar while synthesizing
    pub fn show_progress(mut self, show_progress: bool) -> Self {
        self.synthesis = self.synthesis.with_progress(show_progress);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Check that the speech service is reachable and accepts the credentials
    pub async fn test_connection(&self) -> Result<()> {
        self.synthesis
            .synthesizer()
            .test_connection()
            .await
            .map_err(|e| anyhow!("Speech service check failed: {}", e))
    }

    /// Fresh assigner built from the `voices` configuration
    pub fn new_assigner(&self) -> VoiceAssigner {
        VoiceAssigner::from_config(&self.config.voices)
    }

    /// Load and extract one document
    pub fn load_and_extract(path: &Path) -> Result<ExtractionResult> {
        let text = FileManager::load_script(path)?;
        let result = script::extract(&text).with_context(|| format!("Failed to extract {:?}", path))?;

        info!(
            "{}: {} characters, {} scenes, {} dialogue lines",
            result.metadata.title.as_deref().unwrap_or(&document_name(path)),
            result.characters.len(),
            result.scenes.len(),
            result.dialogue_count()
        );

        Ok(result)
    }

    /// Run the workflow for a single document
    pub async fn run(&self, input_file: PathBuf, output_dir: PathBuf) -> Result<DocumentReport> {
        if !input_file.is_file() {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        let mut assigner = self.new_assigner();
        let report = self.process_document(&input_file, &output_dir, &mut assigner).await;

        if let DocumentOutcome::Failed(message) = &report.outcome {
            return Err(anyhow!("Failed to process {:?}: {}", input_file, message));
        }

        Ok(report)
    }

    /// Process one document into `output_dir`.
    ///
    /// Never fails: errors are captured in the report so batches keep going.
    pub async fn process_document(
        &self,
        path: &Path,
        output_dir: &Path,
        assigner: &mut VoiceAssigner,
    ) -> DocumentReport {
        let mut report = DocumentReport::new(path);
        report.output_dir = Some(output_dir.to_string_lossy().to_string());

        match self.try_process_document(path, output_dir, assigner, &mut report).await {
            Ok(outcome) => report.outcome = outcome,
            Err(e) => {
                error!("Error processing {:?}: {:#}", path, e);
                report.outcome = DocumentOutcome::Failed(format!("{:#}", e));
            }
        }

        report
    }

    async fn try_process_document(
        &self,
        path: &Path,
        output_dir: &Path,
        assigner: &mut VoiceAssigner,
        report: &mut DocumentReport,
    ) -> Result<DocumentOutcome> {
        if output_dir.join(export::DIALOGUES_JSON).exists() && !self.force_overwrite {
            warn!("Skipping {:?}, output already exists (use -f to force overwrite)", path);
            return Ok(DocumentOutcome::Skipped);
        }

        let result = Self::load_and_extract(path)?;
        assigner.assign_all(&result);

        let dialogues = result.flatten();
        report.dialogues_count = dialogues.len();

        if dialogues.is_empty() {
            warn!("No dialogue lines found in {:?}", path);
            return Ok(DocumentOutcome::NothingToSynthesize);
        }

        FileManager::ensure_dir(output_dir)?;

        let records = self.synthesis.generate_batch(&dialogues, assigner, output_dir).await;
        report.generated_count = records.iter().filter(|record| record.success).count();

        if self.config.output.write_json {
            export::write_dialogues_json(output_dir.join(export::DIALOGUES_JSON), &records)?;
        }
        if self.config.output.write_csv {
            export::write_dialogues_csv(output_dir.join(export::DIALOGUES_CSV), &records)?;
        }
        export::write_voice_mappings(output_dir.join(export::VOICE_MAPPINGS_JSON), &assigner.voice_mappings())?;

        info!(
            "Generated {}/{} audio files into {:?}",
            report.generated_count, report.dialogues_count, output_dir
        );

        Ok(DocumentOutcome::Completed)
    }

    /// Run the workflow over every script file directly inside `input_dir`.
    ///
    /// Each document gets its own sub-directory of `output_base`. A failing
    /// document is recorded in the summary and the batch continues.
    pub async fn run_folder(&self, input_dir: PathBuf, output_base: PathBuf) -> Result<BatchSummary> {
        let start_time = std::time::Instant::now();

        if !input_dir.is_dir() {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let files = FileManager::find_script_files(&input_dir)?;
        if files.is_empty() {
            return Err(anyhow!("No script files found in directory: {:?}", input_dir));
        }

        FileManager::ensure_dir(&output_base)?;
        info!("Processing {} script files from {:?}", files.len(), input_dir);

        let scope = self.config.voices.scope;
        let mut assigner = self.new_assigner();
        let mut results = Vec::with_capacity(files.len());

        for (i, file) in files.iter().enumerate() {
            if scope == VoiceScope::PerDocument {
                assigner.reset();
            }

            let output_dir = output_base.join(FileManager::safe_dir_name(&document_name(file)));
            info!("[{}/{}] {:?}", i + 1, files.len(), file);

            let report = self.process_document(file, &output_dir, &mut assigner).await;
            debug!("{:?}: {:?}", file, report.outcome);
            results.push(report);
        }

        let processed_files = results
            .iter()
            .filter(|r| matches!(r.outcome, DocumentOutcome::Completed | DocumentOutcome::NothingToSynthesize))
            .count();
        let skipped_files = results.iter().filter(|r| r.outcome == DocumentOutcome::Skipped).count();
        let failed_files: Vec<String> = results.iter().filter(|r| r.is_failed()).map(|r| r.file.clone()).collect();

        let summary = BatchSummary {
            timestamp: chrono::Local::now().to_rfc3339(),
            input_directory: input_dir.to_string_lossy().to_string(),
            output_directory: output_base.to_string_lossy().to_string(),
            voice_scope: scope,
            total_files: files.len(),
            processed_files,
            skipped_files,
            failed_files,
            results,
        };

        export::write_json(output_base.join(export::BATCH_SUMMARY_JSON), &summary)?;

        info!(
            "Folder processing completed in {}: {} processed, {} skipped, {} errors",
            Self::format_duration(start_time.elapsed()),
            summary.processed_files,
            summary.skipped_files,
            summary.failed_files.len()
        );

        Ok(summary)
    }

    /// Parse and assign voices without calling the synthesis service.
    ///
    /// Writes `script.json` and `voice_mappings.json` into `output_dir`.
    pub fn extract_only(&self, path: &Path, output_dir: &Path) -> Result<(ExtractionResult, VoiceAssigner)> {
        let result = Self::load_and_extract(path)?;

        let mut assigner = self.new_assigner();
        assigner.assign_all(&result);

        export::write_script_json(output_dir.join(export::SCRIPT_JSON), &result)?;
        export::write_voice_mappings(output_dir.join(export::VOICE_MAPPINGS_JSON), &assigner.voice_mappings())?;

        Ok((result, assigner))
    }

    /// Format a duration in a human-readable format
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;

        if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
