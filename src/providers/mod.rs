/*!
 * Provider implementations for speech-to-text services.
 *
 * This module contains the client used to reach the remote transcription
 * API:
 * - OpenAI: Whisper audio transcription API
 * plus a mock transcriber for tests.
 */

use async_trait::async_trait;
use serde::Deserialize;
use std::fmt::Debug;
use std::path::Path;

use crate::errors::ProviderError;

/// One word from the transcription's master word list.
///
/// The `word` field carries the bare recognized word without the punctuation
/// that appears in the segment text.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TimedWord {
    /// The recognized word
    pub word: String,
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
}

/// One punctuated segment of the transcription.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TranscriptSegment {
    /// Punctuated segment text
    pub text: String,
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
}

/// Verbose transcription response with both word-level and segment-level
/// timestamps, as returned by `response_format=verbose_json`.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct VerboseTranscription {
    /// Full transcript text
    #[serde(default)]
    pub text: String,

    /// Detected or requested language
    #[serde(default)]
    pub language: Option<String>,

    /// Audio duration in seconds
    #[serde(default)]
    pub duration: Option<f64>,

    /// Punctuated segments
    #[serde(default)]
    pub segments: Vec<TranscriptSegment>,

    /// Master word list with timestamps, punctuation-free
    #[serde(default)]
    pub words: Vec<TimedWord>,
}

/// Common trait for speech-to-text providers
///
/// This trait defines the interface that transcription clients must follow,
/// allowing them to be used interchangeably (and mocked) in the
/// transcription service.
#[async_trait]
pub trait Transcriber: Send + Sync + Debug {
    /// Transcribe an audio file
    ///
    /// # Arguments
    /// * `audio_path` - Path to the audio file to upload
    ///
    /// # Returns
    /// * `Result<VerboseTranscription, ProviderError>` - The transcription with timestamps, or an error
    async fn transcribe(&self, audio_path: &Path) -> Result<VerboseTranscription, ProviderError>;

    /// Test the connection to the provider
    ///
    /// # Returns
    /// * `Result<(), ProviderError>` - Ok if the connection is usable, or an error
    async fn test_connection(&self) -> Result<(), ProviderError>;
}

pub mod openai;
pub mod mock;
