/*!
 * End-to-end tests for processing one script with a mock synthesizer
 */

use anyhow::Result;
use std::fs;
use std::sync::Arc;

use autosound::app_controller::{Controller, DocumentOutcome};
use autosound::export;
use autosound::providers::mock::MockSynthesizer;
use autosound::synthesis::SynthesisRecord;

use crate::common;

#[tokio::test]
async fn test_run_withSampleScript_shouldWriteAudioAndResultFiles() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_script(temp_dir.path(), "lesson.txt")?;
    let output_dir = temp_dir.path().join("out");

    let synthesizer = MockSynthesizer::working();
    let controller = Controller::with_synthesizer(common::test_config(), Arc::new(synthesizer.clone()))?;

    let report = controller.run(input, output_dir.clone()).await?;

    assert_eq!(report.outcome, DocumentOutcome::Completed);
    assert_eq!(report.dialogues_count, 5);
    assert_eq!(report.generated_count, 5);

    for name in ["01_Lisa_001.mp3", "01_Martha_002.mp3", "02_Lisa_003.mp3", "02_Martha_004.mp3", "03_Tom_005.mp3"] {
        assert!(output_dir.join(name).is_file(), "{} missing", name);
    }
    assert_eq!(fs::read(output_dir.join("03_Tom_005.mp3"))?, b"ID3|pNInz6obpgDQGcFmaJgB|Can we buy some pears too?");

    let records: Vec<SynthesisRecord> =
        serde_json::from_str(&fs::read_to_string(output_dir.join(export::DIALOGUES_JSON))?)?;
    assert_eq!(records.len(), 5);
    assert!(records.iter().all(|r| r.success));
    assert_eq!(records[1].voice_id, "XB0fDUnXU5powFXDhCwa");

    assert!(output_dir.join(export::DIALOGUES_CSV).is_file());
    assert!(output_dir.join(export::VOICE_MAPPINGS_JSON).is_file());

    let requests = synthesizer.requests();
    let texts: Vec<&str> = requests.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(texts[0], "Good morning!");
    assert!(requests.iter().all(|r| r.model == "eleven_turbo_v2"));
    Ok(())
}

#[tokio::test]
async fn test_run_withFailingSynthesizer_shouldRecordFailuresAndFinish() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_script(temp_dir.path(), "lesson.txt")?;
    let output_dir = temp_dir.path().join("out");

    let synthesizer = MockSynthesizer::failing();
    let controller = Controller::with_synthesizer(common::test_config(), Arc::new(synthesizer.clone()))?;

    let report = controller.run(input, output_dir.clone()).await?;

    assert_eq!(report.outcome, DocumentOutcome::Completed);
    assert_eq!(report.generated_count, 0);
    // Client errors are not retried
    assert_eq!(synthesizer.request_count(), 5);

    let records: Vec<SynthesisRecord> =
        serde_json::from_str(&fs::read_to_string(output_dir.join(export::DIALOGUES_JSON))?)?;
    assert!(records.iter().all(|r| !r.success && r.file_path.is_none() && r.error.is_some()));
    Ok(())
}

#[tokio::test]
async fn test_run_withRateLimitedSynthesizer_shouldRetryAndSucceed() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_script(temp_dir.path(), "lesson.txt")?;
    let output_dir = temp_dir.path().join("out");

    let synthesizer = MockSynthesizer::rate_limited(2);
    let controller = Controller::with_synthesizer(common::test_config(), Arc::new(synthesizer.clone()))?;

    let report = controller.run(input, output_dir).await?;

    assert_eq!(report.generated_count, 5);
    assert_eq!(synthesizer.request_count(), 7);
    Ok(())
}

#[tokio::test]
async fn test_run_withExistingOutput_shouldSkipUnlessForced() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_script(temp_dir.path(), "lesson.txt")?;
    let output_dir = temp_dir.path().join("out");
    fs::create_dir_all(&output_dir)?;
    fs::write(output_dir.join(export::DIALOGUES_JSON), "[]")?;

    let synthesizer = MockSynthesizer::working();
    let controller = Controller::with_synthesizer(common::test_config(), Arc::new(synthesizer.clone()))?;
    let report = controller.run(input.clone(), output_dir.clone()).await?;
    assert_eq!(report.outcome, DocumentOutcome::Skipped);
    assert_eq!(synthesizer.request_count(), 0);

    let controller = controller.force_overwrite(true);
    let report = controller.run(input, output_dir).await?;
    assert_eq!(report.outcome, DocumentOutcome::Completed);
    assert_eq!(synthesizer.request_count(), 5);
    Ok(())
}

#[tokio::test]
async fn test_run_withoutDialogue_shouldReportNothingToSynthesize() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "intro.txt", "1 Introduction\nCharacters:\nLisa: a student\n")?;

    let synthesizer = MockSynthesizer::working();
    let controller = Controller::with_synthesizer(common::test_config(), Arc::new(synthesizer.clone()))?;
    let report = controller.run(input, temp_dir.path().join("out")).await?;

    assert_eq!(report.outcome, DocumentOutcome::NothingToSynthesize);
    assert_eq!(synthesizer.request_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_run_withEmptyDocument_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "empty.txt", "\n \n")?;

    let controller = Controller::with_synthesizer(common::test_config(), Arc::new(MockSynthesizer::working()))?;
    let result = controller.run(input, temp_dir.path().join("out")).await;

    assert!(result.is_err());
    Ok(())
}

#[tokio::test]
async fn test_run_withDocxInput_shouldProcessLikeText() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_docx(temp_dir.path(), "lesson.docx")?;

    let controller = Controller::with_synthesizer(common::test_config(), Arc::new(MockSynthesizer::working()))?;
    let report = controller.run(input, temp_dir.path().join("out")).await?;

    assert_eq!(report.name, "lesson");
    assert_eq!(report.generated_count, 5);
    Ok(())
}

#[test]
fn test_controller_withMockSynthesizer_shouldPassConnectionCheck() -> Result<()> {
    let controller = Controller::with_synthesizer(common::test_config(), Arc::new(MockSynthesizer::working()))?;
    tokio_test::block_on(controller.test_connection())?;

    let controller = Controller::with_synthesizer(common::test_config(), Arc::new(MockSynthesizer::failing()))?;
    let result = tokio_test::block_on(controller.test_connection());
    assert!(result.is_err());
    Ok(())
}

#[test]
fn test_extractOnly_withSampleScript_shouldWriteScriptAndMappings() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_script(temp_dir.path(), "lesson.txt")?;
    let output_dir = temp_dir.path().join("parsed");

    let synthesizer = MockSynthesizer::working();
    let controller = Controller::with_synthesizer(common::test_config(), Arc::new(synthesizer.clone()))?;
    let (result, assigner) = controller.extract_only(&input, &output_dir)?;

    assert_eq!(result.dialogue_count(), 5);
    assert_eq!(assigner.mappings().len(), 3);
    assert!(output_dir.join(export::SCRIPT_JSON).is_file());
    assert!(output_dir.join(export::VOICE_MAPPINGS_JSON).is_file());
    assert_eq!(synthesizer.request_count(), 0);
    Ok(())
}
