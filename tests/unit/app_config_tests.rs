/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use std::fs;

use autosound::app_config::{Config, LogLevel, VoiceScope};
use autosound::voice::VoiceProfile;

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.synthesis.endpoint, "https://api.elevenlabs.io");
    assert_eq!(config.synthesis.model, "eleven_turbo_v2");
    assert_eq!(config.synthesis.rate_limit_delay_ms, 500);
    assert_eq!(config.synthesis.voice_settings.stability, 0.95);
    assert_eq!(config.synthesis.voice_settings.similarity_boost, 0.40);
    assert!(config.synthesis.voice_settings.use_speaker_boost);

    assert_eq!(config.voices.scope, VoiceScope::PerDocument);
    assert_eq!(config.voices.profiles.len(), VoiceProfile::ALL.len());
    assert!(config.voices.overrides.is_empty());

    assert_eq!(config.output.output_dir, "output");
    assert_eq!(config.output.batch_output_dir, "batch_output");
    assert_eq!(config.output.audio_extension, "mp3");
    assert_eq!(config.log_level, LogLevel::Info);
}

#[test]
fn test_deserialize_withPartialJson_shouldFillDefaults() {
    let json = r#"{
        "synthesis": { "api_key": "abc", "rate_limit_delay_ms": 0 },
        "voices": { "scope": "global", "overrides": { "Lisa": "female_professional" } },
        "log_level": "debug"
    }"#;
    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.synthesis.api_key, "abc");
    assert_eq!(config.synthesis.rate_limit_delay_ms, 0);
    assert_eq!(config.synthesis.model, "eleven_turbo_v2");
    assert_eq!(config.voices.scope, VoiceScope::Global);
    assert_eq!(config.voices.overrides["Lisa"], "female_professional");
    assert_eq!(config.voices.profiles[&VoiceProfile::Default], "EXAVITQu4vr4xnSDxMaL");
    assert_eq!(config.log_level, LogLevel::Debug);
}

#[test]
fn test_serialize_withDefaults_shouldRoundTrip() {
    let config = Config::default();
    let json = serde_json::to_string_pretty(&config).unwrap();
    let parsed: Config = serde_json::from_str(&json).unwrap();

    assert!(json.contains("\"per_document\""));
    assert!(json.contains("\"male_elderly\""));
    assert_eq!(parsed.voices.profiles, config.voices.profiles);
    assert_eq!(parsed.synthesis.voice_settings, config.synthesis.voice_settings);
}

#[test]
fn test_validate_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.output.audio_extension = ".mp3".to_string();
    assert!(config.validate().is_err());
    config.output.audio_extension = "wav".to_string();
    assert!(config.validate().is_ok());

    config.synthesis.voice_settings.stability = 1.5;
    assert!(config.validate().is_err());
    config.synthesis.voice_settings.stability = 0.5;

    config.voices.profiles.insert(VoiceProfile::MaleYoung, " ".to_string());
    assert!(config.validate().is_err());
}

#[test]
fn test_validateForSynthesis_withMissingKeyOrBadEndpoint_shouldFail() {
    let mut config = Config::default();
    assert!(config.validate_for_synthesis().is_err());

    config.synthesis.api_key = "key".to_string();
    assert!(config.validate_for_synthesis().is_ok());

    config.synthesis.endpoint = "not a url".to_string();
    assert!(config.validate_for_synthesis().is_err());

    config.synthesis.endpoint = "ftp://example.com".to_string();
    assert!(config.validate_for_synthesis().is_err());
}

#[test]
fn test_voiceScope_fromStr_shouldAcceptBothSpellings() {
    assert_eq!("per-document".parse::<VoiceScope>().unwrap(), VoiceScope::PerDocument);
    assert_eq!("GLOBAL".parse::<VoiceScope>().unwrap(), VoiceScope::Global);
    assert!("batch".parse::<VoiceScope>().is_err());
}

#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let config = Config::load_or_create(&path)?;

    assert!(path.is_file());
    assert_eq!(config.synthesis.model, "eleven_turbo_v2");
    let written: Config = serde_json::from_str(&fs::read_to_string(&path)?)?;
    assert_eq!(written.voices.profiles, config.voices.profiles);
    Ok(())
}

#[test]
fn test_loadOrCreate_withExistingFile_shouldReadIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", r#"{ "voices": { "scope": "global" } }"#)?;

    let config = Config::load_or_create(&path)?;

    assert_eq!(config.voices.scope, VoiceScope::Global);
    assert_eq!(fs::read_to_string(&path)?, r#"{ "voices": { "scope": "global" } }"#);
    Ok(())
}

#[test]
fn test_loadOrCreate_withMalformedFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;

    assert!(Config::load_or_create(&path).is_err());
    Ok(())
}
