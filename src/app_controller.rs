use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::file_utils::{FileManager, FileType};
use crate::subtitle_builder;
use crate::timing;
use crate::transcription_service::TranscriptionService;

// @module: Application controller for the transcription pipeline

/// Main application controller: transcribe audio, build cues, write SRT
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Transcription service
    service: TranscriptionService,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let service = TranscriptionService::new(&config.transcription);
        Ok(Self { config, service })
    }

    /// Create a controller with an explicit service, bypassing the real
    /// provider client (used by tests)
    pub fn with_service(config: Config, service: TranscriptionService) -> Self {
        Self { config, service }
    }

    /// Run the main workflow for a single audio file.
    ///
    /// The output path defaults to `<stem>.srt` next to the input. An
    /// existing output is only replaced when `force_overwrite` is set. No
    /// file is written when the pipeline fails or the audio contains no
    /// recognizable speech.
    pub async fn run(
        &self,
        input_file: &Path,
        output_file: Option<PathBuf>,
        force_overwrite: bool,
    ) -> Result<()> {
        let start_time = std::time::Instant::now();

        if !input_file.exists() {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        match FileManager::detect_file_type(input_file)? {
            FileType::Audio => {}
            FileType::Subtitle => {
                return Err(anyhow!(
                    "{:?} is a subtitle file; use the adjust subcommand for existing SRT files",
                    input_file
                ));
            }
            FileType::Unknown => {
                warn!(
                    "Unrecognized file extension for {:?}, sending it to the API anyway",
                    input_file
                );
            }
        }

        let output_path = output_file.unwrap_or_else(|| {
            FileManager::generate_output_path(
                input_file,
                input_file.parent().unwrap_or(Path::new(".")),
            )
        });

        if output_path.exists() && !force_overwrite {
            warn!(
                "Skipping file, subtitle already exists (use -f to force overwrite): {:?}",
                output_path
            );
            return Ok(());
        }

        info!("Transcribing: {:?}", input_file);
        let tokens = self.service.transcribe_file(input_file).await?;

        if tokens.is_empty() {
            warn!("No speech recognized in {:?}; no output written", input_file);
            return Ok(());
        }

        let cues = subtitle_builder::chunk(
            &tokens,
            self.config.subtitle.chunk_policy(),
            self.config.subtitle.include_index,
        )?;
        let srt = subtitle_builder::render(&cues)?;

        FileManager::write_to_file(&output_path, &srt)?;

        info!(
            "Wrote {} cues to {:?} in {}",
            cues.len(),
            output_path,
            Self::format_duration(start_time.elapsed())
        );

        Ok(())
    }

    /// Run the workflow for every audio file under a directory
    pub async fn run_folder(&self, input_dir: &Path, force_overwrite: bool) -> Result<()> {
        if !input_dir.is_dir() {
            return Err(anyhow!("Input path is not a directory: {:?}", input_dir));
        }

        let audio_files = FileManager::find_audio_files(input_dir)?;
        if audio_files.is_empty() {
            warn!("No audio files found in directory: {:?}", input_dir);
            return Ok(());
        }

        info!("Found {} audio file(s) in {:?}", audio_files.len(), input_dir);

        let progress_bar = ProgressBar::new(audio_files.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style);

        let mut processed_count = 0;
        for audio_file in &audio_files {
            progress_bar.set_message(
                audio_file
                    .file_name()
                    .map(|name| name.to_string_lossy().to_string())
                    .unwrap_or_default(),
            );

            if let Err(e) = self.run(audio_file, None, force_overwrite).await {
                error!("Error processing {:?}: {}", audio_file, e);
            } else {
                processed_count += 1;
            }

            progress_bar.inc(1);
        }

        progress_bar.finish_and_clear();
        info!("Finished processing {} of {} files", processed_count, audio_files.len());

        Ok(())
    }

    /// Adjust an existing SRT file, extending cues that are too short to
    /// read, and write the result as `<stem>_adjusted.srt`.
    pub fn adjust(&self, input_file: &Path) -> Result<()> {
        if FileManager::detect_file_type(input_file)? != FileType::Subtitle {
            warn!("{:?} does not look like an SRT file, proceeding anyway", input_file);
        }

        let content = FileManager::read_to_string(input_file)?;
        let mut cues = subtitle_builder::parse_srt_string(&content)
            .context("Failed to parse subtitle file")?;

        // Flag overlapping neighbors before touching anything
        for window in cues.windows(2) {
            if window[0].end > window[1].start {
                warn!(
                    "Overlapping timestamps between cues at {} and {}",
                    subtitle_builder::SubtitleCue::timestamp_from_secs(window[0].start)?,
                    subtitle_builder::SubtitleCue::timestamp_from_secs(window[1].start)?,
                );
            }
        }

        let adjustments = timing::adjust_short_durations(&mut cues);

        let output_path = FileManager::generate_adjusted_path(input_file);
        let srt = subtitle_builder::render(&cues)?;
        FileManager::write_to_file(&output_path, &srt)?;

        if adjustments.is_empty() {
            info!("No modifications were needed.");
        } else {
            info!("Total modifications made: {}", adjustments.len());
            for adjustment in &adjustments {
                info!("  - {}", adjustment);
            }
        }
        info!("Adjustment complete. New file saved as {:?}", output_path);

        Ok(())
    }

    /// Format a duration for user-facing log lines
    fn format_duration(duration: std::time::Duration) -> String {
        let total_secs = duration.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;

        if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
