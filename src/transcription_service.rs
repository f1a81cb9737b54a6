/*!
 * Transcription service.
 *
 * Wraps a transcription provider and turns its verbose response into the
 * punctuated word tokens the subtitle builder consumes.
 *
 * The Whisper verbose response carries two parallel views of the same audio:
 * a master word list with precise timestamps but no punctuation, and a
 * segment list with punctuated text but coarse timing. The service realigns
 * them so every token keeps its word-level timing and gains the punctuation
 * the segment text attached to it.
 */

use anyhow::Result;
use log::{debug, info, warn};
use std::path::Path;

use crate::app_config::TranscriptionConfig;
use crate::errors::ProviderError;
use crate::providers::openai::OpenAIWhisper;
use crate::providers::{TimedWord, Transcriber, VerboseTranscription};
use crate::subtitle_builder::WordToken;

/// Service for transcribing audio into timestamped word tokens
pub struct TranscriptionService {
    /// The provider client used for transcription
    transcriber: Box<dyn Transcriber>,
}

impl TranscriptionService {
    /// Create a service backed by the OpenAI Whisper API
    pub fn new(config: &TranscriptionConfig) -> Self {
        Self {
            transcriber: Box::new(OpenAIWhisper::from_config(config)),
        }
    }

    /// Create a service backed by an arbitrary transcriber (used by tests)
    pub fn with_transcriber(transcriber: Box<dyn Transcriber>) -> Self {
        Self { transcriber }
    }

    /// Test the connection to the provider
    pub async fn test_connection(&self) -> Result<(), ProviderError> {
        self.transcriber.test_connection().await
    }

    /// Transcribe an audio file into punctuated word tokens
    pub async fn transcribe_file(&self, audio_path: &Path) -> Result<Vec<WordToken>, ProviderError> {
        info!("Sending audio to the transcription API...");
        let response = self.transcriber.transcribe(audio_path).await?;

        debug!(
            "Transcription returned {} segments and {} words",
            response.segments.len(),
            response.words.len()
        );

        info!("Transcription complete. Aligning punctuation...");
        Ok(Self::align_words(&response))
    }

    /// Realign the punctuated segment text with the master word list.
    ///
    /// For each segment, its words are collected by time window, then the
    /// segment text is walked with a cursor, slicing off one punctuated piece
    /// per word. Produces one token per recognized word, with the
    /// punctuation the segment text carries for it.
    pub fn align_words(response: &VerboseTranscription) -> Vec<WordToken> {
        if response.segments.is_empty() || response.words.is_empty() {
            warn!("Transcription has no segments or words; the audio may be silent or empty");
            return Vec::new();
        }

        let all_words = &response.words;
        let mut word_index = 0;
        let mut tokens = Vec::new();

        for segment in &response.segments {
            let segment_text = segment.text.trim();

            // Collect the words from the master list that fall inside this
            // segment's time range
            let mut segment_words: Vec<&TimedWord> = Vec::new();
            while word_index < all_words.len() && all_words[word_index].start <= segment.end {
                if all_words[word_index].start >= segment.start {
                    segment_words.push(&all_words[word_index]);
                }
                word_index += 1;
            }

            if segment_words.is_empty() {
                continue;
            }

            let mut cursor = 0;
            for (i, word) in segment_words.iter().enumerate() {
                let mut slice_end = segment_text.len();

                // The current word's punctuated text runs up to where the
                // next word's bare text begins
                if let Some(next_word) = segment_words.get(i + 1) {
                    let needle = next_word.word.trim();
                    if !needle.is_empty() {
                        if let Some(pos) = find_word_start(segment_text, needle, cursor) {
                            slice_end = pos;
                        }
                    }
                }

                let piece = segment_text[cursor..slice_end].trim();
                cursor = slice_end;

                if !piece.is_empty() {
                    tokens.push(WordToken::new(piece, word.start, word.end));
                }
            }
        }

        tokens
    }
}

/// Find the next occurrence of `needle` in `haystack` at or after `from`
/// that starts at a word boundary, so a search for "is" never lands inside
/// "This".
fn find_word_start(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let mut search_from = from;

    while let Some(rel) = haystack.get(search_from..)?.find(needle) {
        let idx = search_from + rel;
        let at_boundary = haystack[..idx]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric());
        if at_boundary {
            return Some(idx);
        }
        search_from = idx + needle.len();
    }

    None
}
