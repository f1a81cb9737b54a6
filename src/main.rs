// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use crate::app_config::{ChunkPolicyChoice, Config};
use app_controller::Controller;

mod app_config;
mod app_controller;
mod errors;
mod file_utils;
mod providers;
mod subtitle_builder;
mod timing;
mod transcription_service;

/// CLI Wrapper for ChunkPolicyChoice to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliChunkPolicy {
    Sentence,
    Words,
}

impl From<CliChunkPolicy> for ChunkPolicyChoice {
    fn from(cli_policy: CliChunkPolicy) -> Self {
        match cli_policy {
            CliChunkPolicy::Sentence => ChunkPolicyChoice::Sentence,
            CliChunkPolicy::Words => ChunkPolicyChoice::Words,
        }
    }
}

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

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Transcribe an audio file into an SRT subtitle file (default command)
    #[command(alias = "transcribe")]
    Transcribe(TranscribeArgs),

    /// Adjust cue timings in an existing SRT file
    Adjust {
        /// SRT file to adjust
        #[arg(value_name = "SRT_PATH")]
        input_path: PathBuf,

        /// Configuration file path
        #[arg(short, long, default_value = "conf.json")]
        config_path: String,

        /// Set logging level
        #[arg(short, long, value_enum)]
        log_level: Option<CliLogLevel>,
    },

    /// Generate shell completions for sound2srt
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranscribeArgs {
    /// Input audio file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Output SRT file path (single-file mode only; defaults to <stem>.srt)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Omit sequence-number lines from the SRT output
    #[arg(long)]
    no_index: bool,

    /// Chunking policy for grouping words into cues
    #[arg(short, long, value_enum)]
    policy: Option<CliChunkPolicy>,

    /// Words per cue when using the words policy
    #[arg(short, long)]
    words_per_cue: Option<usize>,

    /// Transcription model name
    #[arg(short, long)]
    model: Option<String>,

    /// Spoken language of the audio (ISO 639-1, e.g. 'en')
    #[arg(long)]
    language: Option<String>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// sound2srt - Whisper transcription to SRT subtitles
///
/// Sends an audio file to the OpenAI Whisper API and converts the returned
/// word-level timestamps into an SRT subtitle file.
#[derive(Parser, Debug)]
#[command(name = "sound2srt")]
#[command(version = "1.0.0")]
#[command(about = "Audio transcription to SRT subtitles")]
#[command(long_about = "sound2srt transcribes audio files with the OpenAI Whisper API and writes
word-timed SRT subtitle files.

EXAMPLES:
    sound2srt input.mp3                        # Transcribe using default config
    sound2srt -o talk.srt input.mp3            # Choose the output path
    sound2srt --no-index input.mp3             # SRT without sequence numbers
    sound2srt -p words -w 4 input.mp3          # Four words per cue
    sound2srt --language en input.mp3          # Hint the spoken language
    sound2srt /podcasts/                       # Process a whole directory
    sound2srt adjust talk.srt                  # Fix too-short cue durations
    sound2srt completions bash > sound2srt.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a
    different config file with --config-path. If the config file doesn't
    exist, a default one will be created automatically. The API key is taken
    from the config file or the OPENAI_API_KEY environment variable.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input audio file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Output SRT file path (single-file mode only; defaults to <stem>.srt)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Omit sequence-number lines from the SRT output
    #[arg(long)]
    no_index: bool,

    /// Chunking policy for grouping words into cues
    #[arg(short, long, value_enum)]
    policy: Option<CliChunkPolicy>,

    /// Words per cue when using the words policy
    #[arg(short, long)]
    words_per_cue: Option<usize>,

    /// Transcription model name
    #[arg(short, long)]
    model: Option<String>,

    /// Spoken language of the audio (ISO 639-1, e.g. 'en')
    #[arg(long)]
    language: Option<String>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {}\x1B[0m", color, now, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "sound2srt", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Adjust {
            input_path,
            config_path,
            log_level,
        }) => run_adjust(&input_path, &config_path, log_level),
        Some(Commands::Transcribe(args)) => run_transcribe(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let input_path = cli
                .input_path
                .ok_or_else(|| anyhow!("INPUT_PATH is required when no subcommand is specified"))?;

            let transcribe_args = TranscribeArgs {
                input_path,
                output: cli.output,
                no_index: cli.no_index,
                policy: cli.policy,
                words_per_cue: cli.words_per_cue,
                model: cli.model,
                language: cli.language,
                force_overwrite: cli.force_overwrite,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_transcribe(transcribe_args).await
        }
    }
}

/// Load the config file, creating a default one when missing
fn load_config(config_path: &str, log_level: &Option<CliLogLevel>) -> Result<Config> {
    let config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;

        config
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();

        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    let mut config = config;
    if let Some(cmd_log_level) = log_level {
        config.log_level = cmd_log_level.clone().into();
    }
    log::set_max_level(level_filter(&config.log_level));

    Ok(config)
}

async fn run_transcribe(options: TranscribeArgs) -> Result<()> {
    let mut config = load_config(&options.config_path, &options.log_level)?;

    // Override config with CLI options if provided
    if let Some(model) = &options.model {
        config.transcription.model = model.clone();
    }
    if let Some(language) = &options.language {
        config.transcription.language = Some(language.clone());
    }
    if let Some(policy) = &options.policy {
        config.subtitle.policy = policy.clone().into();
    }
    if let Some(words_per_cue) = options.words_per_cue {
        config.subtitle.words_per_cue = words_per_cue;
    }
    if options.no_index {
        config.subtitle.include_index = false;
    }

    config.resolve_api_key_from_env();

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    let controller = Controller::with_config(config)?;

    if options.input_path.is_file() {
        controller
            .run(&options.input_path, options.output, options.force_overwrite)
            .await
    } else if options.input_path.is_dir() {
        if options.output.is_some() {
            return Err(anyhow!("--output cannot be used when processing a directory"));
        }
        controller
            .run_folder(&options.input_path, options.force_overwrite)
            .await
    } else {
        Err(anyhow!("Input path does not exist: {:?}", options.input_path))
    }
}

fn run_adjust(input_path: &Path, config_path: &str, log_level: Option<CliLogLevel>) -> Result<()> {
    // Adjustment works offline; the API key is deliberately not required here
    let config = load_config(config_path, &log_level)?;

    let controller = Controller::with_config(config)?;
    controller.adjust(input_path)
}
