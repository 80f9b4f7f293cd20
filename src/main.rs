// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use autosound::app_config::{self, Config, VoiceScope};
use autosound::app_controller::{Controller, DocumentOutcome};
use autosound::providers::elevenlabs::ElevenLabs;
use autosound::voice::VoiceCatalog;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for VoiceScope to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliVoiceScope {
    PerDocument,
    Global,
}

impl From<CliVoiceScope> for VoiceScope {
    fn from(scope: CliVoiceScope) -> Self {
        match scope {
            CliVoiceScope::PerDocument => VoiceScope::PerDocument,
            CliVoiceScope::Global => VoiceScope::Global,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate audio for every dialogue line (default command)
    Generate(GenerateArgs),

    /// Extract dialogue and assign voices without calling the TTS service
    Parse(ParseArgs),

    /// List the configured voice catalog and the voices on the account
    Voices(CommonArgs),

    /// Generate shell completions for autosound
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Options shared by every command that reads the configuration
#[derive(Args, Debug, Clone)]
struct CommonArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// ElevenLabs API key
    #[arg(long, env = "ELEVENLABS_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Script file (.txt, .md, .docx) or directory of scripts
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Output directory (defaults from conf.json)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Synthesis model id
    #[arg(short, long)]
    model: Option<String>,

    /// Share character voices across a batch or reset them per document
    #[arg(long, value_enum)]
    scope: Option<CliVoiceScope>,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args, Debug)]
struct ParseArgs {
    /// Script file (.txt, .md, .docx)
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Output directory (defaults from conf.json)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    #[command(flatten)]
    common: CommonArgs,
}

/// autosound - dialogue audio for educational scripts
///
/// Extracts characters and dialogue lines from lesson scripts, picks a voice
/// for every character and renders each line with ElevenLabs.
#[derive(Parser, Debug)]
#[command(name = "autosound")]
#[command(version)]
#[command(about = "Turn educational scripts into per-line dialogue audio")]
#[command(long_about = "autosound reads a lesson script, finds its characters and slide dialogue,
assigns a voice to every character and generates one audio file per line.

EXAMPLES:
    autosound lesson.docx                        # Generate audio using conf.json
    autosound -f lesson.txt                      # Regenerate existing output
    autosound scripts/ --scope global            # Batch, same voice per character everywhere
    autosound parse lesson.docx                  # Only extract and assign voices
    autosound voices                             # Show voice catalog
    autosound completions bash > autosound.bash  # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically. The API key may also be given through
    ELEVENLABS_API_KEY.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Script file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Output directory (defaults from conf.json)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Synthesis model id
    #[arg(short, long)]
    model: Option<String>,

    /// Share character voices across a batch or reset them per document
    #[arg(long, value_enum)]
    scope: Option<CliVoiceScope>,

    #[command(flatten)]
    common: CommonArgs,
}

/// Colored stderr logger; filtering is left to `log::max_level`
struct CustomLogger;

impl CustomLogger {
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_logger(&CustomLogger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and marker for a level
    fn style(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("31", "❌"),
            Level::Warn => ("33", "🚧"),
            Level::Info => ("32", "🔊"),
            Level::Debug => ("36", "🔍"),
            Level::Trace => ("35", "·"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let (color, marker) = Self::style(record.level());
        let time = chrono::Local::now().format("%H:%M:%S%.3f");
        let _ = writeln!(std::io::stderr(), "\x1B[1;{}m{} {} {}\x1B[0m", color, time, marker, record.args());
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info until the configuration says otherwise
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "autosound", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Generate(args)) => run_generate(args).await,
        Some(Commands::Parse(args)) => run_parse(args),
        Some(Commands::Voices(args)) => run_voices(args).await,
        None => {
            // Default behavior - top-level args mean `generate`
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;

            run_generate(GenerateArgs {
                input_path,
                output_dir: cli.output_dir,
                force_overwrite: cli.force_overwrite,
                model: cli.model,
                scope: cli.scope,
                common: cli.common,
            })
            .await
        }
    }
}

/// Load `conf.json` (creating it when missing) and apply common CLI overrides
fn load_config(options: &CommonArgs) -> Result<Config> {
    if let Some(cmd_log_level) = &options.log_level {
        log::set_max_level(level_filter(&cmd_log_level.clone().into()));
    }

    let mut config = Config::load_or_create(Path::new(&options.config_path))
        .with_context(|| format!("Cannot load configuration from {}", options.config_path))?;

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    } else {
        log::set_max_level(level_filter(&config.log_level));
    }

    if let Some(api_key) = options.api_key.as_deref().filter(|key| !key.trim().is_empty()) {
        config.synthesis.api_key = api_key.trim().to_string();
    }

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

async fn run_generate(options: GenerateArgs) -> Result<()> {
    let mut config = load_config(&options.common)?;

    if let Some(model) = &options.model {
        config.synthesis.model = model.clone();
    }
    if let Some(scope) = &options.scope {
        config.voices.scope = scope.clone().into();
    }

    config
        .validate_for_synthesis()
        .context("Configuration validation failed")?;

    let controller = Controller::with_config(config.clone())?
        .force_overwrite(options.force_overwrite)
        .show_progress(true);
    controller.test_connection().await?;

    if options.input_path.is_file() {
        let output_dir = options
            .output_dir
            .unwrap_or_else(|| PathBuf::from(&config.output.output_dir));
        let report = controller.run(options.input_path.clone(), output_dir).await?;

        match report.outcome {
            DocumentOutcome::Completed => info!(
                "Done: {}/{} lines generated",
                report.generated_count, report.dialogues_count
            ),
            DocumentOutcome::NothingToSynthesize => warn!("No dialogue found in {:?}", options.input_path),
            DocumentOutcome::Skipped => {}
            DocumentOutcome::Failed(message) => return Err(anyhow!(message)),
        }
    } else if options.input_path.is_dir() {
        let output_base = options
            .output_dir
            .unwrap_or_else(|| PathBuf::from(&config.output.batch_output_dir));
        let summary = controller.run_folder(options.input_path.clone(), output_base).await?;

        for failed in &summary.failed_files {
            warn!("Failed: {}", failed);
        }
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", options.input_path));
    }

    Ok(())
}

fn run_parse(options: ParseArgs) -> Result<()> {
    let config = load_config(&options.common)?;

    if !options.input_path.is_file() {
        return Err(anyhow!("Input file does not exist: {:?}", options.input_path));
    }

    let output_dir = options
        .output_dir
        .unwrap_or_else(|| PathBuf::from(&config.output.output_dir));
    let controller = Controller::with_config(config)?;
    let (result, assigner) = controller.extract_only(&options.input_path, &output_dir)?;

    if let Some(title) = &result.metadata.title {
        info!("Title: {}", title);
    }
    if let Some(level) = &result.metadata.level {
        info!("Level: {}", level);
    }
    for (character, profile) in assigner.mappings() {
        let description = result.characters.get(character).unwrap_or("");
        info!("{:<16} {:<24} {}", character, profile.as_str(), description);
    }
    info!(
        "{} scenes, {} dialogue lines, written to {:?}",
        result.scenes.len(),
        result.dialogue_count(),
        output_dir
    );

    Ok(())
}

async fn run_voices(options: CommonArgs) -> Result<()> {
    let config = load_config(&options)?;

    let catalog = VoiceCatalog::new(&config.voices.profiles);
    for (profile, voice_id) in catalog.iter() {
        info!("{:<24} {}", profile.as_str(), voice_id);
    }

    if config.synthesis.api_key.trim().is_empty() {
        info!("Set ELEVENLABS_API_KEY to list the voices available on your account");
        return Ok(());
    }

    let client = ElevenLabs::from_config(&config.synthesis);
    let voices = client
        .list_voices()
        .await
        .map_err(|e| anyhow!("Failed to list voices: {}", e))?;

    info!("{} voices available:", voices.len());
    for voice in voices {
        info!(
            "{:<24} {} {}",
            voice.voice_id,
            voice.name,
            voice.category.as_deref().unwrap_or("")
        );
    }

    Ok(())
}
