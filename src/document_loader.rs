use anyhow::{Context, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::errors::ScriptError;

// @module: Script document loading and file utilities

// @const: Extensions accepted as script input
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["txt", "md", "docx"];

/// Kind of script document, by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// Plain UTF-8 text (`.txt`, `.md`)
    Text,
    /// Office Open XML word-processor document
    Docx,
    Unknown,
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    /// Write a string to a file, creating the parent directory
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))
    }

    /// Write raw bytes to a file, creating the parent directory
    pub fn write_bytes<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))
    }

    /// Detect the document type from the file extension
    pub fn detect_file_type<P: AsRef<Path>>(path: P) -> FileType {
        let ext = path
            .as_ref()
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "txt" | "md" => FileType::Text,
            "docx" => FileType::Docx,
            _ => FileType::Unknown,
        }
    }

    /// Load a script document as one normalized text blob.
    ///
    /// Fails with `ScriptError::EmptyDocument` when nothing readable is left.
    pub fn load_script<P: AsRef<Path>>(path: P) -> Result<String> {
        let path = path.as_ref();

        let text = match Self::detect_file_type(path) {
            FileType::Text => fs::read_to_string(path)
                .with_context(|| format!("Failed to read file: {:?}", path))?,
            FileType::Docx => {
                let bytes = fs::read(path)
                    .with_context(|| format!("Failed to read file: {:?}", path))?;
                docx_text(&bytes).with_context(|| format!("Failed to load {:?}", path))?
            }
            FileType::Unknown => {
                return Err(ScriptError::UnsupportedFormat(path.display().to_string()).into());
            }
        };

        if text.trim().is_empty() {
            return Err(ScriptError::EmptyDocument)
                .with_context(|| format!("No text in {:?}", path));
        }

        Ok(text)
    }

    /// Find supported script files directly inside a directory, sorted by path
    pub fn find_script_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).min_depth(1).max_depth(1).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            // Word keeps "~$name.docx" lock files next to open documents
            let is_lock_file = entry.file_name().to_string_lossy().starts_with("~$");

            if path.is_file() && !is_lock_file && Self::detect_file_type(path) != FileType::Unknown {
                result.push(path.to_path_buf());
            }
        }

        result.sort();
        Ok(result)
    }

    /// Directory-safe version of a document name.
    ///
    /// Keeps alphanumerics, spaces, `-` and `_`, trims, then turns spaces into
    /// underscores. Falls back to "script" when nothing is left.
    pub fn safe_dir_name(name: &str) -> String {
        let kept: String = name
            .chars()
            .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
            .collect();
        let safe = kept.trim().replace(' ', "_");

        if safe.is_empty() { "script".to_string() } else { safe }
    }
}

/// Extract the paragraph text of a `.docx` file held in memory.
///
/// Body paragraphs come first in document order; table cells are appended
/// afterwards unless the same text already appeared.
pub fn docx_text(bytes: &[u8]) -> Result<String, ScriptError> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| ScriptError::Docx(e.to_string()))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| ScriptError::Docx(format!("word/document.xml: {}", e)))?
        .read_to_string(&mut xml)
        .map_err(|e| ScriptError::Docx(e.to_string()))?;

    let (mut paragraphs, cells) = document_paragraphs(&xml)?;
    for cell in cells {
        if !paragraphs.contains(&cell) {
            paragraphs.push(cell);
        }
    }

    Ok(paragraphs.join("\n"))
}

/// Walk `word/document.xml`, returning (body paragraphs, table cell texts)
fn document_paragraphs(xml: &str) -> Result<(Vec<String>, Vec<String>), ScriptError> {
    let mut reader = Reader::from_str(xml);

    let mut body = Vec::new();
    let mut cells = Vec::new();

    // Paragraphs of each open table cell, innermost last
    let mut open_cells: Vec<Vec<String>> = Vec::new();
    // Open paragraphs, innermost last; text boxes nest `w:p` inside `w:p`
    let mut open_paragraphs: Vec<String> = Vec::new();
    let mut in_text = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ScriptError::Docx(format!("XML error at {}: {}", reader.buffer_position(), e)))?;

        match event {
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => open_paragraphs.push(String::new()),
                b"w:t" => in_text = true,
                b"w:tc" => open_cells.push(Vec::new()),
                b"w:tab" => push_text(&mut open_paragraphs, "\t"),
                b"w:br" | b"w:cr" => push_text(&mut open_paragraphs, "\n"),
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" => push_text(&mut open_paragraphs, "\t"),
                b"w:br" | b"w:cr" => push_text(&mut open_paragraphs, "\n"),
                _ => {}
            },
            Event::Text(text) if in_text => {
                let text = text.unescape().map_err(|e| ScriptError::Docx(e.to_string()))?;
                push_text(&mut open_paragraphs, &text);
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => {
                    let text = open_paragraphs.pop().unwrap_or_default();
                    match open_cells.last_mut() {
                        Some(cell) => cell.push(text),
                        None => {
                            let trimmed = text.trim();
                            if !trimmed.is_empty() {
                                body.push(trimmed.to_string());
                            }
                        }
                    }
                }
                b"w:tc" => {
                    if let Some(cell) = open_cells.pop() {
                        let text = cell.join("\n").trim().to_string();
                        if !text.is_empty() {
                            cells.push(text);
                        }
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok((body, cells))
}

fn push_text(open_paragraphs: &mut [String], text: &str) {
    if let Some(paragraph) = open_paragraphs.last_mut() {
        paragraph.push_str(text);
    }
}
