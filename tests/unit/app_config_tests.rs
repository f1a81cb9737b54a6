/*!
 * Tests for application configuration
 */

use sound2srt::app_config::{ChunkPolicyChoice, Config, LogLevel};
use sound2srt::subtitle_builder::ChunkPolicy;

/// Test default configuration values
#[test]
fn test_default_config_shouldHaveExpectedValues() {
    let config = Config::default();

    assert_eq!(config.transcription.model, "whisper-1");
    assert_eq!(config.transcription.endpoint, "https://api.openai.com/v1");
    assert!(config.transcription.api_key.is_empty());
    assert_eq!(config.transcription.language, None);
    assert_eq!(config.transcription.timeout_secs, 300);

    assert!(config.subtitle.include_index);
    assert_eq!(config.subtitle.policy, ChunkPolicyChoice::Sentence);
    assert_eq!(config.subtitle.words_per_cue, 7);

    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test a sparse config file fills in defaults
#[test]
fn test_config_deserialization_withPartialJson_shouldFillDefaults() {
    let json = r#"{
        "transcription": { "api_key": "sk-test", "language": "en" },
        "subtitle": { "include_index": false }
    }"#;

    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.transcription.api_key, "sk-test");
    assert_eq!(config.transcription.language.as_deref(), Some("en"));
    assert_eq!(config.transcription.model, "whisper-1");
    assert!(!config.subtitle.include_index);
    assert_eq!(config.subtitle.policy, ChunkPolicyChoice::Sentence);
}

/// Test serialization round trip
#[test]
fn test_config_serialization_roundTrip_shouldPreserveValues() {
    let mut config = Config::default();
    config.transcription.api_key = "sk-test".to_string();
    config.subtitle.policy = ChunkPolicyChoice::Words;
    config.subtitle.words_per_cue = 4;
    config.log_level = LogLevel::Debug;

    let json = serde_json::to_string_pretty(&config).unwrap();
    let parsed: Config = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.transcription.api_key, "sk-test");
    assert_eq!(parsed.subtitle.policy, ChunkPolicyChoice::Words);
    assert_eq!(parsed.subtitle.words_per_cue, 4);
    assert_eq!(parsed.log_level, LogLevel::Debug);
}

/// Test validation requires an API key
#[test]
fn test_validate_withMissingApiKey_shouldFail() {
    let config = Config::default();
    assert!(config.validate().is_err());
}

/// Test validation accepts a complete configuration
#[test]
fn test_validate_withApiKeyAndLanguage_shouldSucceed() {
    let mut config = Config::default();
    config.transcription.api_key = "sk-test".to_string();
    config.transcription.language = Some("en".to_string());

    assert!(config.validate().is_ok());
}

/// Test validation rejects a made-up language code
#[test]
fn test_validate_withInvalidLanguage_shouldFail() {
    let mut config = Config::default();
    config.transcription.api_key = "sk-test".to_string();
    config.transcription.language = Some("xx".to_string());

    assert!(config.validate().is_err());
}

/// Test validation rejects a zero word count for the words policy
#[test]
fn test_validate_withZeroWordsPerCue_shouldFail() {
    let mut config = Config::default();
    config.transcription.api_key = "sk-test".to_string();
    config.subtitle.policy = ChunkPolicyChoice::Words;
    config.subtitle.words_per_cue = 0;

    assert!(config.validate().is_err());
}

/// Test validation rejects an out-of-range temperature
#[test]
fn test_validate_withOutOfRangeTemperature_shouldFail() {
    let mut config = Config::default();
    config.transcription.api_key = "sk-test".to_string();
    config.transcription.temperature = Some(1.5);

    assert!(config.validate().is_err());
}

/// Test policy choice resolution into a concrete chunk policy
#[test]
fn test_chunk_policy_resolution_shouldMapChoiceAndWordCount() {
    let mut config = Config::default();
    assert_eq!(config.subtitle.chunk_policy(), ChunkPolicy::Sentence);

    config.subtitle.policy = ChunkPolicyChoice::Words;
    config.subtitle.words_per_cue = 4;
    assert_eq!(config.subtitle.chunk_policy(), ChunkPolicy::Words { per_cue: 4 });
}

/// Test policy parsing from strings
#[test]
fn test_chunk_policy_choice_fromStr_shouldParseKnownNames() {
    assert_eq!("sentence".parse::<ChunkPolicyChoice>().unwrap(), ChunkPolicyChoice::Sentence);
    assert_eq!("WORDS".parse::<ChunkPolicyChoice>().unwrap(), ChunkPolicyChoice::Words);
    assert!("paragraph".parse::<ChunkPolicyChoice>().is_err());
}

/// Test an explicit API key survives environment resolution
#[test]
fn test_resolve_api_key_withExplicitKey_shouldKeepIt() {
    let mut config = Config::default();
    config.transcription.api_key = "sk-explicit".to_string();

    config.resolve_api_key_from_env();

    assert_eq!(config.transcription.api_key, "sk-explicit");
}
