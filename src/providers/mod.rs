/*!
 * Speech synthesis providers.
 *
 * This module contains client implementations behind one trait:
 * - ElevenLabs: hosted text-to-speech REST API
 * - Mock: in-process synthesizer used by tests
 */

use async_trait::async_trait;
use bytes::Bytes;
use std::fmt::Debug;

use crate::app_config::VoiceSettings;
use crate::errors::ProviderError;

/// One line of text to be spoken by one voice
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechRequest {
    /// Text to speak
    pub text: String,
    /// Opaque voice identifier of the service
    pub voice_id: String,
    /// Synthesis model identifier
    pub model: String,
    /// Voice tuning sent with the request
    pub voice_settings: VoiceSettings,
}

impl SpeechRequest {
    pub fn new(text: impl Into<String>, voice_id: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice_id: voice_id.into(),
            model: model.into(),
            voice_settings: VoiceSettings::default(),
        }
    }

    /// Set the voice settings
    pub fn voice_settings(mut self, settings: VoiceSettings) -> Self {
        self.voice_settings = settings;
        self
    }
}

/// Common trait for all speech synthesizers
///
/// This trait defines the interface that every provider implementation must
/// follow, allowing them to be used interchangeably by the synthesis service.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync + Debug {
    /// Synthesize one request into encoded audio
    ///
    /// # Arguments
    /// * `request` - The text and voice to synthesize
    ///
    /// # Returns
    /// * `Result<Bytes, ProviderError>` - Audio bytes or an error
    async fn synthesize(&self, request: &SpeechRequest) -> Result<Bytes, ProviderError>;

    /// Test the connection to the provider
    ///
    /// # Returns
    /// * `Result<(), ProviderError>` - Ok if the connection is successful, or an error
    async fn test_connection(&self) -> Result<(), ProviderError>;
}

pub mod elevenlabs;
pub mod mock;
