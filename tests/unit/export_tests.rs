/*!
 * Tests for result file export
 */

use anyhow::Result;
use std::collections::BTreeMap;
use std::fs;

use autosound::export;
use autosound::script::extract;

use crate::common;

#[test]
fn test_writeScriptJson_withSampleScript_shouldContainAllSections() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join(export::SCRIPT_JSON);
    let result = extract(common::SAMPLE_SCRIPT)?;

    export::write_script_json(&path, &result)?;

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
    assert_eq!(value["metadata"]["title"], "12 Shopping at the market");
    assert!(value["metadata"].get("subtitle").is_none());
    assert_eq!(value["characters"]["Martha"], "an elderly, cheerful seller");
    assert_eq!(value["dialogues"].as_array().map(Vec::len), Some(5));
    assert_eq!(value["dialogues"][4]["line_number"], 5);
    assert_eq!(value["dialogues"][4]["scene"], "Slide 3");
    Ok(())
}

#[test]
fn test_writeScriptJson_shouldKeepCharacterDeclarationOrder() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join(export::SCRIPT_JSON);
    let result = extract("Characters:\nZoe: first\nAdam: second\n\nSlide 1\nZoe: Hi\n")?;

    export::write_script_json(&path, &result)?;

    let content = fs::read_to_string(&path)?;
    let zoe = content.find("\"Zoe\"").unwrap();
    let adam = content.find("\"Adam\"").unwrap();
    assert!(zoe < adam);
    Ok(())
}

#[test]
fn test_writeVoiceMappings_shouldWriteNameToVoiceId() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("out").join(export::VOICE_MAPPINGS_JSON);
    let mut mappings = BTreeMap::new();
    mappings.insert("Lisa".to_string(), "voice-a".to_string());

    export::write_voice_mappings(&path, &mappings)?;

    let parsed: BTreeMap<String, String> = serde_json::from_str(&fs::read_to_string(&path)?)?;
    assert_eq!(parsed, mappings);
    Ok(())
}
