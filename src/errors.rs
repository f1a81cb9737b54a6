/*!
 * Error types for the sound2srt application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when talking to a transcription provider API
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// Error reading the audio file to upload
    #[error("Audio file error: {0}")]
    AudioFile(String),
}

/// Errors that can occur while building or rendering subtitles
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// A word token violates the upstream timing contract. This indicates a
    /// broken API response and is never silently repaired.
    #[error("Malformed token {index} ({text:?}): {reason}")]
    MalformedToken {
        /// Position of the offending token in the input sequence
        index: usize,
        /// Token text, for diagnostics
        text: String,
        /// What the token violated
        reason: String,
    },

    /// A cue time cannot be represented in the SRT timestamp format
    /// (negative, or beyond the 99:59:59,999 ceiling).
    #[error("Cue time {seconds}s is outside the SRT timestamp range: {reason}")]
    TimeRange {
        /// The offending time in seconds
        seconds: f64,
        /// Why the time is unrepresentable
        reason: String,
    },

    /// SRT content could not be parsed into any cue
    #[error("Failed to parse SRT content: {0}")]
    ParseError(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a transcription provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from subtitle building or rendering
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
