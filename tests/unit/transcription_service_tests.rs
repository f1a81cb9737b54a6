/*!
 * Tests for punctuation alignment and the transcription service
 */

use std::path::Path;

use sound2srt::providers::mock::MockTranscriber;
use sound2srt::providers::VerboseTranscription;
use sound2srt::transcription_service::TranscriptionService;
use crate::common;

/// Test alignment re-attaches segment punctuation to the bare word list
#[test]
fn test_align_words_withPunctuatedSegments_shouldAttachPunctuation() {
    let response = common::transcription(
        &[(" Hello, world.", 0.0, 1.0), (" This is a test.", 1.0, 2.4)],
        &[
            ("Hello", 0.0, 0.5),
            ("world", 0.5, 1.0),
            ("This", 1.1, 1.3),
            ("is", 1.3, 1.5),
            ("a", 1.5, 1.7),
            ("test", 1.7, 2.4),
        ],
    );

    let tokens = TranscriptionService::align_words(&response);

    let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["Hello,", "world.", "This", "is", "a", "test."]);

    // Word-level timing is preserved
    common::assert_close(tokens[0].start, 0.0);
    common::assert_close(tokens[0].end, 0.5);
    common::assert_close(tokens[5].start, 1.7);
    common::assert_close(tokens[5].end, 2.4);
}

/// Test alignment of a substring-heavy sentence: searching for "is" must not
/// land inside "This"
#[test]
fn test_align_words_withSubstringWords_shouldMatchWordBoundaries() {
    let response = common::transcription(
        &[(" This is his thesis.", 0.0, 2.0)],
        &[
            ("This", 0.0, 0.4),
            ("is", 0.4, 0.8),
            ("his", 0.8, 1.2),
            ("thesis", 1.2, 2.0),
        ],
    );

    let tokens = TranscriptionService::align_words(&response);

    let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["This", "is", "his", "thesis."]);
}

/// Test an empty transcription aligns to no tokens
#[test]
fn test_align_words_withEmptyResponse_shouldProduceNoTokens() {
    let tokens = TranscriptionService::align_words(&VerboseTranscription::default());
    assert!(tokens.is_empty());
}

/// Test words outside every segment window are not invented into the output
#[test]
fn test_align_words_withWordsOutsideSegments_shouldSkipThem() {
    let response = common::transcription(
        &[(" Inside.", 1.0, 2.0)],
        &[("Stray", 0.0, 0.5), ("Inside", 1.0, 2.0)],
    );

    let tokens = TranscriptionService::align_words(&response);

    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].text, "Inside.");
}

/// Test the full service path over a mock transcriber
#[tokio::test]
async fn test_transcribe_file_withWorkingMock_shouldProduceTokens() {
    let service = TranscriptionService::with_transcriber(Box::new(MockTranscriber::working()));

    let tokens = service
        .transcribe_file(Path::new("ignored.mp3"))
        .await
        .unwrap();

    assert_eq!(tokens.len(), 6);
    assert_eq!(tokens[0].text, "Hello,");
    assert_eq!(tokens[5].text, "test.");
}

/// Test provider failures surface as errors
#[tokio::test]
async fn test_transcribe_file_withFailingMock_shouldFail() {
    let service = TranscriptionService::with_transcriber(Box::new(MockTranscriber::failing()));

    let result = service.transcribe_file(Path::new("ignored.mp3")).await;
    assert!(result.is_err());
}
