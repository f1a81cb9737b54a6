/*!
 * Mock transcriber implementations for testing.
 *
 * This module provides mock transcribers that simulate different behaviors:
 * - `MockTranscriber::working()` - Always succeeds with a canned transcription
 * - `MockTranscriber::empty()` - Succeeds with a silent-audio response
 * - `MockTranscriber::failing()` - Always fails with an error
 */

use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::{TimedWord, Transcriber, TranscriptSegment, VerboseTranscription};

/// Behavior mode for the mock transcriber
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with the configured transcription
    Working,
    /// Succeeds with an empty transcription (silent audio)
    Empty,
    /// Always fails with an error
    Failing,
    /// Simulates a slow response (for timeout testing)
    Slow {
        /// Delay before responding, in milliseconds
        delay_ms: u64,
    },
}

/// Mock transcriber for testing the transcription pipeline
#[derive(Debug)]
pub struct MockTranscriber {
    /// Behavior mode
    behavior: MockBehavior,
    /// Canned response returned in working mode
    response: VerboseTranscription,
    /// Request counter
    request_count: Arc<AtomicUsize>,
}

impl MockTranscriber {
    /// Create a new mock transcriber with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            response: Self::default_response(),
            request_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a working mock transcriber that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock transcriber that returns an empty transcription
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Create a mock transcriber that always fails
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Use a custom canned response in working mode
    pub fn with_response(mut self, response: VerboseTranscription) -> Self {
        self.response = response;
        self
    }

    /// Number of transcribe calls made so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// A small two-segment transcription with matching word timestamps
    fn default_response() -> VerboseTranscription {
        VerboseTranscription {
            text: "Hello, world. This is a test.".to_string(),
            language: Some("english".to_string()),
            duration: Some(2.4),
            segments: vec![
                TranscriptSegment {
                    text: " Hello, world.".to_string(),
                    start: 0.0,
                    end: 1.0,
                },
                TranscriptSegment {
                    text: " This is a test.".to_string(),
                    start: 1.0,
                    end: 2.4,
                },
            ],
            words: vec![
                TimedWord { word: "Hello".to_string(), start: 0.0, end: 0.5 },
                TimedWord { word: "world".to_string(), start: 0.5, end: 1.0 },
                TimedWord { word: "This".to_string(), start: 1.1, end: 1.3 },
                TimedWord { word: "is".to_string(), start: 1.3, end: 1.5 },
                TimedWord { word: "a".to_string(), start: 1.5, end: 1.7 },
                TimedWord { word: "test".to_string(), start: 1.7, end: 2.4 },
            ],
        }
    }
}

#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(&self, _audio_path: &Path) -> Result<VerboseTranscription, ProviderError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            MockBehavior::Working => Ok(self.response.clone()),
            MockBehavior::Empty => Ok(VerboseTranscription::default()),
            MockBehavior::Failing => Err(ProviderError::RequestFailed(
                "Mock transcriber configured to fail".to_string(),
            )),
            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
                Ok(self.response.clone())
            }
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::ConnectionError(
                "Mock transcriber configured to fail".to_string(),
            )),
            _ => Ok(()),
        }
    }
}
