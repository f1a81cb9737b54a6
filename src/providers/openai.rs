use std::path::Path;
use std::time::Duration;
use async_trait::async_trait;
use log::{debug, error};
use reqwest::{multipart, Client};

use crate::app_config::TranscriptionConfig;
use crate::errors::ProviderError;
use crate::providers::{Transcriber, VerboseTranscription};

/// OpenAI client for the Whisper audio transcription API
#[derive(Debug)]
pub struct OpenAIWhisper {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API endpoint URL (optional, defaults to public API)
    endpoint: String,
    /// Transcription model name
    model: String,
    /// Optional spoken-language hint (ISO 639-1)
    language: Option<String>,
    /// Optional sampling temperature
    temperature: Option<f32>,
}

impl OpenAIWhisper {
    /// Create a new OpenAI Whisper client
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            model: "whisper-1".to_string(),
            language: None,
            temperature: None,
        }
    }

    /// Create a client from a transcription configuration
    pub fn from_config(config: &TranscriptionConfig) -> Self {
        let mut client = Self::new(
            config.api_key.clone(),
            config.endpoint.clone(),
            config.timeout_secs,
        );
        client.model = config.model.clone();
        client.language = config.language.clone();
        client.temperature = config.temperature;
        client
    }

    /// Set the model name
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn api_url(&self, path: &str) -> String {
        let base = if self.endpoint.is_empty() {
            "https://api.openai.com/v1"
        } else {
            self.endpoint.trim_end_matches('/')
        };
        format!("{}/{}", base, path)
    }

    /// Build the multipart form for a transcription request
    fn build_form(&self, file_name: String, bytes: Vec<u8>) -> Result<multipart::Form, ProviderError> {
        let mime = mime_for_file(&file_name);
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime)
            .map_err(|e| ProviderError::RequestFailed(format!("Invalid mime type: {}", e)))?;

        let mut form = multipart::Form::new()
            .part("file", part)
            .text("model", self.model.clone())
            .text("response_format", "verbose_json")
            .text("timestamp_granularities[]", "word")
            .text("timestamp_granularities[]", "segment");

        if let Some(language) = &self.language {
            form = form.text("language", language.clone());
        }
        if let Some(temperature) = self.temperature {
            form = form.text("temperature", temperature.to_string());
        }

        Ok(form)
    }

    /// Map a non-success HTTP status to a provider error
    async fn error_from_response(response: reqwest::Response) -> ProviderError {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to get error response text".to_string());
        error!("OpenAI API error ({}): {}", status, error_text);

        match status.as_u16() {
            401 | 403 => ProviderError::AuthenticationError(error_text),
            429 => ProviderError::RateLimitExceeded(error_text),
            code => ProviderError::ApiError {
                status_code: code,
                message: error_text,
            },
        }
    }
}

#[async_trait]
impl Transcriber for OpenAIWhisper {
    async fn transcribe(&self, audio_path: &Path) -> Result<VerboseTranscription, ProviderError> {
        let bytes = tokio::fs::read(audio_path)
            .await
            .map_err(|e| ProviderError::AudioFile(format!("{:?}: {}", audio_path, e)))?;

        let file_name = audio_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "audio".to_string());

        debug!(
            "Uploading {} ({} bytes) to the transcription API",
            file_name,
            bytes.len()
        );

        let form = self.build_form(file_name, bytes)?;

        let response = self
            .client
            .post(self.api_url("audio/transcriptions"))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to send request to OpenAI API: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        response
            .json::<VerboseTranscription>()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse OpenAI API response: {}", e)))
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let response = self
            .client
            .get(self.api_url("models"))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        Ok(())
    }
}

/// Mime type for an audio file, keyed on its extension
fn mime_for_file(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "mp3" | "mpga" => "audio/mpeg",
        "mp4" | "m4a" => "audio/mp4",
        "mpeg" => "video/mpeg",
        "wav" => "audio/wav",
        "webm" => "audio/webm",
        "flac" => "audio/flac",
        "ogg" | "oga" => "audio/ogg",
        "aac" => "audio/aac",
        _ => "application/octet-stream",
    }
}
