use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::document_loader::FileManager;
use crate::script::{CharacterRegistry, DialogueRecord, ExtractionResult, Metadata};
use crate::synthesis::SynthesisRecord;

// @module: Result files written next to the generated audio

// @const: File names inside a document's output directory
pub const DIALOGUES_JSON: &str = "dialogues.json";
pub const DIALOGUES_CSV: &str = "dialogues.csv";
pub const VOICE_MAPPINGS_JSON: &str = "voice_mappings.json";
pub const SCRIPT_JSON: &str = "script.json";
pub const BATCH_SUMMARY_JSON: &str = "batch_summary.json";

/// Pretty-printed JSON, non-ASCII kept as is
pub fn write_json<T: Serialize + ?Sized, P: AsRef<Path>>(path: P, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("Failed to serialize {:?}", path.as_ref()))?;
    FileManager::write_to_file(path, &json)
}

/// Column layout of `dialogues.csv`
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    scene: &'a str,
    slide_number: u32,
    character: &'a str,
    text: &'a str,
    voice_id: &'a str,
    file_name: &'a str,
    success: bool,
}

impl<'a> From<&'a SynthesisRecord> for CsvRow<'a> {
    fn from(record: &'a SynthesisRecord) -> Self {
        Self {
            scene: &record.scene,
            slide_number: record.slide_number,
            character: &record.character,
            text: &record.text,
            voice_id: &record.voice_id,
            file_name: &record.file_name,
            success: record.success,
        }
    }
}

pub fn write_dialogues_json<P: AsRef<Path>>(path: P, records: &[SynthesisRecord]) -> Result<()> {
    write_json(path, records)
}

/// Write synthesis records as CSV with a header row
pub fn write_dialogues_csv<P: AsRef<Path>>(path: P, records: &[SynthesisRecord]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        FileManager::ensure_dir(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {:?}", path))?;
    for record in records {
        writer
            .serialize(CsvRow::from(record))
            .with_context(|| format!("Failed to write CSV row for line {}", record.line_number))?;
    }
    writer.flush().with_context(|| format!("Failed to flush CSV file: {:?}", path))?;

    Ok(())
}

/// Character name to external voice id
pub fn write_voice_mappings<P: AsRef<Path>>(path: P, mappings: &BTreeMap<String, String>) -> Result<()> {
    write_json(path, mappings)
}

/// Parse-only dump of one script
#[derive(Debug, Serialize)]
pub struct ScriptExport<'a> {
    pub metadata: &'a Metadata,
    pub characters: &'a CharacterRegistry,
    pub dialogues: Vec<DialogueRecord>,
}

impl<'a> From<&'a ExtractionResult> for ScriptExport<'a> {
    fn from(result: &'a ExtractionResult) -> Self {
        Self {
            metadata: &result.metadata,
            characters: &result.characters,
            dialogues: result.flatten(),
        }
    }
}

pub fn write_script_json<P: AsRef<Path>>(path: P, result: &ExtractionResult) -> Result<()> {
    write_json(path, &ScriptExport::from(result))
}
