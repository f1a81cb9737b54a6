/*!
 * # sound2srt - Whisper transcription to SRT subtitles
 *
 * A Rust library for turning audio into SRT subtitle files using the OpenAI
 * Whisper API.
 *
 * ## Features
 *
 * - Upload audio to the Whisper transcription API with word-level timestamps
 * - Realign the punctuated segment text with the timestamped word list
 * - Group words into subtitle cues with a deterministic chunking policy
 *   (sentence boundaries or fixed word counts)
 * - Render and parse SRT, with or without sequence-number lines
 * - Adjust existing SRT files whose cues are too short to read
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle_builder`: Word-token chunking, SRT rendering and parsing
 * - `transcription_service`: Provider wrapper and punctuation alignment
 * - `timing`: Cue duration adjustment
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `providers`: Client implementations for transcription providers:
 *   - `providers::openai`: OpenAI Whisper API client
 *   - `providers::mock`: Mock transcriber for tests
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod providers;
pub mod subtitle_builder;
pub mod timing;
pub mod transcription_service;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, ProviderError, SubtitleError};
pub use subtitle_builder::{chunk, render, ChunkPolicy, SubtitleCue, WordToken};
pub use transcription_service::TranscriptionService;
