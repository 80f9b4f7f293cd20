/*!
 * Integration tests for folder processing
 */

use anyhow::Result;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use autosound::app_config::VoiceScope;
use autosound::app_controller::{Controller, DocumentOutcome};
use autosound::export;
use autosound::providers::mock::MockSynthesizer;

use crate::common;

/// "Alex" is unisex, so the voice follows the description of each document
const ALEX_FEMALE: &str = "Characters:\nAlex: a young friendly woman\n\nSlide 1\nAlex: Hi from the first lesson.\n";
const ALEX_MALE: &str = "Characters:\nAlex: an elderly man\n\nSlide 1\nAlex: Hi from the second lesson.\n";

fn voice_mappings(dir: &Path) -> Result<BTreeMap<String, String>> {
    Ok(serde_json::from_str(&fs::read_to_string(dir.join(export::VOICE_MAPPINGS_JSON))?)?)
}

#[tokio::test]
async fn test_runFolder_withEmptyDocument_shouldRecordFailureAndContinue() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let input_dir = temp_dir.path().join("scripts");
    let output_base = temp_dir.path().join("batch");
    fs::create_dir_all(&input_dir)?;

    common::create_test_script(&input_dir, "a lesson.txt")?;
    common::create_test_file(&input_dir, "b_empty.txt", "   \n")?;
    common::create_test_docx(&input_dir, "c_lesson.docx")?;

    let controller = Controller::with_synthesizer(common::test_config(), Arc::new(MockSynthesizer::working()))?;
    let summary = controller.run_folder(input_dir.clone(), output_base.clone()).await?;

    assert_eq!(summary.total_files, 3);
    assert_eq!(summary.processed_files, 2);
    assert_eq!(summary.failed_files.len(), 1);
    assert!(summary.failed_files[0].ends_with("b_empty.txt"));
    assert!(matches!(summary.results[1].outcome, DocumentOutcome::Failed(_)));

    assert!(output_base.join("a_lesson").join("01_Lisa_001.mp3").is_file());
    assert!(output_base.join("c_lesson").join(export::DIALOGUES_CSV).is_file());

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(output_base.join(export::BATCH_SUMMARY_JSON))?)?;
    assert_eq!(written["total_files"], 3);
    assert_eq!(written["results"][0]["status"], "completed");
    assert_eq!(written["results"][1]["status"], "failed");
    assert_eq!(written["voice_scope"], "per_document");
    Ok(())
}

#[tokio::test]
async fn test_runFolder_withPerDocumentScope_shouldResetVoices() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input_dir = temp_dir.path().join("scripts");
    let output_base = temp_dir.path().join("batch");
    fs::create_dir_all(&input_dir)?;
    common::create_test_file(&input_dir, "one.txt", ALEX_FEMALE)?;
    common::create_test_file(&input_dir, "two.txt", ALEX_MALE)?;

    let controller = Controller::with_synthesizer(common::test_config(), Arc::new(MockSynthesizer::working()))?;
    controller.run_folder(input_dir, output_base.clone()).await?;

    let one = voice_mappings(&output_base.join("one"))?;
    let two = voice_mappings(&output_base.join("two"))?;
    assert_eq!(one["Alex"], "EXAVITQu4vr4xnSDxMaL");
    assert_eq!(two["Alex"], "yoZ06aMxZJJ28mfd3POQ");
    Ok(())
}

#[tokio::test]
async fn test_runFolder_withGlobalScope_shouldKeepFirstVoice() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input_dir = temp_dir.path().join("scripts");
    let output_base = temp_dir.path().join("batch");
    fs::create_dir_all(&input_dir)?;
    common::create_test_file(&input_dir, "one.txt", ALEX_FEMALE)?;
    common::create_test_file(&input_dir, "two.txt", ALEX_MALE)?;

    let mut config = common::test_config();
    config.voices.scope = VoiceScope::Global;
    let synthesizer = MockSynthesizer::working();
    let controller = Controller::with_synthesizer(config, Arc::new(synthesizer.clone()))?;
    controller.run_folder(input_dir, output_base.clone()).await?;

    let two = voice_mappings(&output_base.join("two"))?;
    assert_eq!(two["Alex"], "EXAVITQu4vr4xnSDxMaL");
    assert!(synthesizer.requests().iter().all(|r| r.voice_id == "EXAVITQu4vr4xnSDxMaL"));
    Ok(())
}

#[tokio::test]
async fn test_runFolder_withNoScripts_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "readme.pdf", "nothing")?;

    let controller = Controller::with_synthesizer(common::test_config(), Arc::new(MockSynthesizer::working()))?;
    let result = controller
        .run_folder(temp_dir.path().to_path_buf(), temp_dir.path().join("out"))
        .await;

    assert!(result.is_err());
    Ok(())
}
