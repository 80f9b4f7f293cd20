use log::debug;

use crate::errors::ScriptError;

use super::model::{CharacterRegistry, DialogueLine, ExtractionResult, Metadata, Scene};
use super::recognizers::{
    self, CHARACTER_HEADING, CHARACTER_RECOGNIZERS, MetadataLine, SLIDE_HEADING,
};

// @const: Number of leading non-empty lines searched for metadata
const METADATA_LINE_LIMIT: usize = 10;

/// Extract metadata, characters and scenes from raw script text.
///
/// Only an empty document is an error; missing sections degrade to empty
/// results. The function is pure, so identical input always yields an
/// identical result.
pub fn extract(text: &str) -> Result<ExtractionResult, ScriptError> {
    let text = normalize(text);
    if text.trim().is_empty() {
        return Err(ScriptError::EmptyDocument);
    }

    let result = ExtractionResult {
        metadata: extract_metadata(&text),
        characters: extract_characters(&text),
        scenes: extract_scenes(&text),
    };

    debug!(
        "Extracted {} character(s), {} scene(s), {} dialogue line(s)",
        result.characters.len(),
        result.scenes.len(),
        result.dialogue_count()
    );

    Ok(result)
}

fn normalize(text: &str) -> String {
    text.trim_start_matches('\u{feff}').replace("\r\n", "\n")
}

fn extract_metadata(text: &str) -> Metadata {
    let mut metadata = Metadata::default();

    let leading = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(METADATA_LINE_LIMIT);

    for line in leading {
        match recognizers::metadata_line(line, metadata.title.is_some()) {
            Some(MetadataLine::Level(level)) => metadata.level = Some(level),
            Some(MetadataLine::Title) => metadata.title = Some(line.to_string()),
            Some(MetadataLine::Subtitle) => metadata.subtitle = Some(line.to_string()),
            None => {}
        }
    }

    metadata
}

/// Lines of the first character section, without the heading itself.
///
/// The block ends at the first blank line after content has started, or at
/// the next slide/scene heading.
fn character_block(text: &str) -> Option<Vec<&str>> {
    let caps = CHARACTER_HEADING.captures(text)?;
    let heading = caps.get(0)?;

    let mut block = Vec::new();
    if let Some(rest) = caps.get(1).map(|m| m.as_str().trim()).filter(|rest| !rest.is_empty()) {
        block.push(rest);
    }

    let following = &text[heading.end()..];
    let following = following.strip_prefix('\n').unwrap_or(following);

    for line in following.lines() {
        let line = line.trim();
        if line.is_empty() {
            if block.is_empty() {
                continue;
            }
            break;
        }
        if recognizers::is_section_break(line) {
            break;
        }
        block.push(line);
    }

    Some(block)
}

fn extract_characters(text: &str) -> CharacterRegistry {
    let mut registry = CharacterRegistry::new();

    let Some(block) = character_block(text) else {
        debug!("No character section found");
        return registry;
    };

    for recognize in CHARACTER_RECOGNIZERS {
        let entries: Vec<_> = block.iter().filter_map(|line| recognize(line)).collect();
        if entries.is_empty() {
            continue;
        }
        for entry in entries {
            registry.insert(entry.name, entry.description);
        }
        break;
    }

    registry
}

fn extract_scenes(text: &str) -> Vec<Scene> {
    // (slide number, heading start, content start)
    let headings: Vec<(u32, usize, usize)> = SLIDE_HEADING
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let index = caps[1].parse::<u32>().ok().filter(|n| *n > 0)?;
            Some((index, whole.start(), whole.end()))
        })
        .collect();

    let mut scenes = Vec::with_capacity(headings.len());

    for (i, &(index, _, content_start)) in headings.iter().enumerate() {
        let content_end = headings.get(i + 1).map_or(text.len(), |next| next.1);

        let lines: Vec<DialogueLine> = text[content_start..content_end]
            .lines()
            .filter_map(recognizers::dialogue_line)
            .collect();

        if lines.is_empty() {
            debug!("Slide {} has no dialogue, dropping it", index);
            continue;
        }

        scenes.push(Scene { index, lines });
    }

    scenes
}
