use async_trait::async_trait;
use bytes::Bytes;
use log::{debug, error};
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::app_config::{SynthesisConfig, VoiceSettings};
use crate::errors::ProviderError;
use crate::providers::{SpeechRequest, SpeechSynthesizer};

/// ElevenLabs client for the text-to-speech REST API
#[derive(Debug, Clone)]
pub struct ElevenLabs {
    /// HTTP client for API requests
    client: Client,
    /// API key sent as `xi-api-key`
    api_key: String,
    /// Base URL without the `/v1` suffix
    endpoint: String,
    /// Request timeout, reported in timeout errors
    timeout_secs: u64,
}

/// Body of a text-to-speech request
#[derive(Debug, Serialize)]
struct TextToSpeechBody<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: &'a VoiceSettings,
}

/// One voice available on the account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Voice {
    pub voice_id: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
}

/// Response of `GET /v1/voices`
#[derive(Debug, Deserialize)]
pub struct VoicesResponse {
    pub voices: Vec<Voice>,
}

impl ElevenLabs {
    /// Create a new ElevenLabs client
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        let endpoint = endpoint.into();
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: if endpoint.is_empty() {
                "https://api.elevenlabs.io".to_string()
            } else {
                endpoint.trim_end_matches('/').to_string()
            },
            timeout_secs,
        }
    }

    /// Create a client from the `synthesis` configuration section
    pub fn from_config(config: &SynthesisConfig) -> Self {
        Self::new(&config.api_key, &config.endpoint, config.timeout_secs)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.endpoint, path)
    }

    /// List the voices available to this API key
    pub async fn list_voices(&self) -> Result<Vec<Voice>, ProviderError> {
        let response = self
            .client
            .get(self.url("voices"))
            .header("xi-api-key", &self.api_key)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let response = Self::check_status(response).await?;
        let voices = response
            .json::<VoicesResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse voices response: {}", e)))?;

        Ok(voices.voices)
    }

    fn transport_error(&self, e: reqwest::Error) -> ProviderError {
        if e.is_timeout() {
            ProviderError::Timeout(self.timeout_secs)
        } else if e.is_connect() {
            ProviderError::ConnectionError(e.to_string())
        } else {
            ProviderError::RequestFailed(e.to_string())
        }
    }

    /// Map non-success responses onto the error taxonomy
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to get error response text".to_string());
        error!("ElevenLabs API error ({}): {}", status, error_text);

        Err(status_error(status, error_text))
    }
}

/// Error for an unsuccessful HTTP status
pub fn status_error(status: StatusCode, message: String) -> ProviderError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::AuthenticationError(message),
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimitExceeded(message),
        _ => ProviderError::ApiError {
            status_code: status.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabs {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<Bytes, ProviderError> {
        let body = TextToSpeechBody {
            text: &request.text,
            model_id: &request.model,
            voice_settings: &request.voice_settings,
        };

        let response = self
            .client
            .post(self.url(&format!("text-to-speech/{}", request.voice_id)))
            .header("xi-api-key", &self.api_key)
            .header(header::ACCEPT, "audio/mpeg")
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let response = Self::check_status(response).await?;
        let audio = response
            .bytes()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Failed to read audio body: {}", e)))?;

        if audio.is_empty() {
            return Err(ProviderError::ParseError("Empty audio response".to_string()));
        }

        debug!("Received {} bytes for voice {}", audio.len(), request.voice_id);
        Ok(audio)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.list_voices().await.map(|_| ())
    }
}
