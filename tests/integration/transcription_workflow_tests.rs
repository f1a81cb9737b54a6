/*!
 * Integration tests for the full transcription workflow
 *
 * These tests run the controller end to end against the mock transcriber,
 * so no network access or API key is needed.
 */

use anyhow::Result;
use std::fs;

use sound2srt::app_config::Config;
use sound2srt::app_controller::Controller;
use sound2srt::providers::mock::MockTranscriber;
use sound2srt::transcription_service::TranscriptionService;

use crate::common;

fn mock_controller(config: Config, mock: MockTranscriber) -> Controller {
    let service = TranscriptionService::with_transcriber(Box::new(mock));
    Controller::with_service(config, service)
}

/// Test the complete pipeline writes the expected SRT file
#[tokio::test]
async fn test_run_withWorkingTranscriber_shouldWriteSrtFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir_path = temp_dir.path().to_path_buf();
    let audio_path = common::create_test_file(&dir_path, "test.mp3", "fake audio bytes")?;

    let controller = mock_controller(Config::default(), MockTranscriber::working());
    controller.run(&audio_path, None, false).await?;

    let output_path = dir_path.join("test.srt");
    assert!(output_path.exists());

    let content = fs::read_to_string(&output_path)?;
    assert_eq!(
        content,
        "1\n00:00:00,000 --> 00:00:01,000\nHello, world.\n\n\
         2\n00:00:01,100 --> 00:00:02,400\nThis is a test.\n\n"
    );

    Ok(())
}

/// Test the index toggle removes the numeric lines from the output
#[tokio::test]
async fn test_run_withIndexDisabled_shouldOmitCueNumbers() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir_path = temp_dir.path().to_path_buf();
    let audio_path = common::create_test_file(&dir_path, "test.mp3", "fake audio bytes")?;

    let mut config = Config::default();
    config.subtitle.include_index = false;

    let controller = mock_controller(config, MockTranscriber::working());
    controller.run(&audio_path, None, false).await?;

    let content = fs::read_to_string(dir_path.join("test.srt"))?;
    assert_eq!(
        content,
        "00:00:00,000 --> 00:00:01,000\nHello, world.\n\n\
         00:00:01,100 --> 00:00:02,400\nThis is a test.\n\n"
    );

    Ok(())
}

/// Test silent audio produces no output file
#[tokio::test]
async fn test_run_withEmptyTranscription_shouldNotWriteFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir_path = temp_dir.path().to_path_buf();
    let audio_path = common::create_test_file(&dir_path, "silence.mp3", "fake audio bytes")?;

    let controller = mock_controller(Config::default(), MockTranscriber::empty());
    controller.run(&audio_path, None, false).await?;

    assert!(!dir_path.join("silence.srt").exists());

    Ok(())
}

/// Test a failing provider surfaces the error and writes nothing
#[tokio::test]
async fn test_run_withFailingTranscriber_shouldReturnError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir_path = temp_dir.path().to_path_buf();
    let audio_path = common::create_test_file(&dir_path, "test.mp3", "fake audio bytes")?;

    let controller = mock_controller(Config::default(), MockTranscriber::failing());
    let result = controller.run(&audio_path, None, false).await;

    assert!(result.is_err());
    assert!(!dir_path.join("test.srt").exists());

    Ok(())
}

/// Test malformed word timings stop the pipeline before any file is written
#[tokio::test]
async fn test_run_withMalformedTimings_shouldReturnErrorAndWriteNothing() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir_path = temp_dir.path().to_path_buf();
    let audio_path = common::create_test_file(&dir_path, "broken.mp3", "fake audio bytes")?;

    // One word whose end precedes its start
    let bad = common::transcription(&[(" Broken.", 0.0, 3.0)], &[("Broken", 2.0, 1.0)]);
    let controller = mock_controller(
        Config::default(),
        MockTranscriber::working().with_response(bad),
    );

    let result = controller.run(&audio_path, None, false).await;

    assert!(result.is_err());
    assert!(!dir_path.join("broken.srt").exists());

    Ok(())
}

/// Test an existing output is left untouched without force overwrite
#[tokio::test]
async fn test_run_withExistingOutput_shouldSkipWithoutForce() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir_path = temp_dir.path().to_path_buf();
    let audio_path = common::create_test_file(&dir_path, "test.mp3", "fake audio bytes")?;
    let existing = common::create_test_file(&dir_path, "test.srt", "pre-existing content")?;

    let controller = mock_controller(Config::default(), MockTranscriber::working());
    controller.run(&audio_path, None, false).await?;

    assert_eq!(fs::read_to_string(&existing)?, "pre-existing content");

    // With force overwrite the file is replaced
    controller.run(&audio_path, None, true).await?;
    assert!(fs::read_to_string(&existing)?.starts_with("1\n00:00:00,000"));

    Ok(())
}

/// Test an explicit output path overrides the default
#[tokio::test]
async fn test_run_withExplicitOutput_shouldWriteToGivenPath() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir_path = temp_dir.path().to_path_buf();
    let audio_path = common::create_test_file(&dir_path, "test.mp3", "fake audio bytes")?;
    let output_path = dir_path.join("custom").join("renamed.srt");

    let controller = mock_controller(Config::default(), MockTranscriber::working());
    controller.run(&audio_path, Some(output_path.clone()), false).await?;

    assert!(output_path.exists());
    assert!(!dir_path.join("test.srt").exists());

    Ok(())
}

/// Test an SRT input is rejected by the transcription workflow
#[tokio::test]
async fn test_run_withSubtitleInput_shouldReturnError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir_path = temp_dir.path().to_path_buf();
    let subtitle_path = common::create_test_subtitle(&dir_path, "existing.srt")?;

    let controller = mock_controller(Config::default(), MockTranscriber::working());
    let result = controller.run(&subtitle_path, None, false).await;

    assert!(result.is_err());

    Ok(())
}

/// Test folder processing transcribes every audio file it finds
#[tokio::test]
async fn test_run_folder_withMixedFiles_shouldProcessAllAudio() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir_path = temp_dir.path().to_path_buf();
    common::create_test_file(&dir_path, "one.mp3", "fake audio bytes")?;
    common::create_test_file(&dir_path, "two.wav", "fake audio bytes")?;
    common::create_test_file(&dir_path, "notes.txt", "not audio")?;

    let controller = mock_controller(Config::default(), MockTranscriber::working());
    controller.run_folder(&dir_path, false).await?;

    assert!(dir_path.join("one.srt").exists());
    assert!(dir_path.join("two.srt").exists());
    assert!(!dir_path.join("notes.srt").exists());

    Ok(())
}

/// Test the adjust workflow extends short cues and writes an adjusted copy
#[tokio::test]
async fn test_adjust_withShortCues_shouldWriteAdjustedFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir_path = temp_dir.path().to_path_buf();

    // First cue is only 50ms long with a wide gap after it
    let content = "1\n00:00:00,000 --> 00:00:00,050\nBlink\n\n\
                   2\n00:00:01,000 --> 00:00:03,000\nAnd you missed it.\n\n";
    let input_path = common::create_test_file(&dir_path, "short.srt", content)?;

    let controller = mock_controller(Config::default(), MockTranscriber::working());
    controller.adjust(&input_path)?;

    let adjusted_path = dir_path.join("short_adjusted.srt");
    assert!(adjusted_path.exists());

    let adjusted = fs::read_to_string(&adjusted_path)?;
    assert_eq!(
        adjusted,
        "1\n00:00:00,000 --> 00:00:00,100\nBlink\n\n\
         2\n00:00:01,000 --> 00:00:03,000\nAnd you missed it.\n\n"
    );

    Ok(())
}

/// Test adjusting a well-formed file is a no-op copy
#[tokio::test]
async fn test_adjust_withHealthyDurations_shouldLeaveTimingsAlone() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir_path = temp_dir.path().to_path_buf();
    let input_path = common::create_test_subtitle(&dir_path, "healthy.srt")?;

    let controller = mock_controller(Config::default(), MockTranscriber::working());
    controller.adjust(&input_path)?;

    let adjusted = fs::read_to_string(dir_path.join("healthy_adjusted.srt"))?;
    assert!(adjusted.contains("00:00:01,000 --> 00:00:04,000"));
    assert!(adjusted.contains("00:00:05,000 --> 00:00:09,000"));
    assert!(adjusted.contains("00:00:10,000 --> 00:00:14,000"));

    Ok(())
}
