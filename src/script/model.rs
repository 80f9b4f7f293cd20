/*!
 * Data model produced by script extraction.
 */

use serde::{Deserialize, Serialize, Serializer};

/// Metadata recognized in the leading lines of a script
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Line starting with a digit, e.g. "12 At the market"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Line containing an en-dash or em-dash
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,

    /// Value of a `Level:` line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

impl Metadata {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.subtitle.is_none() && self.level.is_none()
    }
}

/// Character name to free-text description, in declaration order.
///
/// Names are case-preserving unique keys. Inserting a name that is already
/// present replaces its description but keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterRegistry {
    entries: Vec<(String, String)>,
}

impl CharacterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a character description
    pub fn insert(&mut self, name: impl Into<String>, description: impl Into<String>) {
        let name = name.into();
        let description = description.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = description,
            None => self.entries.push((name, description)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, description)| description.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over (name, description) pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, description)| (name.as_str(), description.as_str()))
    }
}

impl Serialize for CharacterRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// One spoken line inside a scene
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueLine {
    pub character: String,
    pub text: String,
}

/// One `Slide N` section with at least one dialogue line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    /// Number taken verbatim from the heading
    pub index: u32,
    pub lines: Vec<DialogueLine>,
}

impl Scene {
    pub fn label(&self) -> String {
        format!("Slide {}", self.index)
    }
}

/// Flattened dialogue entry handed to synthesis and export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueRecord {
    /// Scene label, e.g. "Slide 3"
    pub scene: String,
    pub slide_number: u32,
    pub character: String,
    pub text: String,
    /// Global 1-based position in scene-then-line order
    pub line_number: usize,
}

/// Everything extracted from one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    pub metadata: Metadata,
    pub characters: CharacterRegistry,
    pub scenes: Vec<Scene>,
}

impl ExtractionResult {
    /// Total number of dialogue lines across all scenes
    pub fn dialogue_count(&self) -> usize {
        self.scenes.iter().map(|scene| scene.lines.len()).sum()
    }

    /// Flatten scenes into one ordered dialogue list.
    ///
    /// Scene order is document order, never sorted by slide number, so the
    /// resulting `line_number`s are reproducible for identical input.
    pub fn flatten(&self) -> Vec<DialogueRecord> {
        self.scenes
            .iter()
            .flat_map(|scene| {
                scene.lines.iter().map(move |line| (scene, line))
            })
            .enumerate()
            .map(|(i, (scene, line))| DialogueRecord {
                scene: scene.label(),
                slide_number: scene.index,
                character: line.character.clone(),
                text: line.text.clone(),
                line_number: i + 1,
            })
            .collect()
    }

    /// Every speaking character, registry entries first, then speakers
    /// missing from the registry in order of first appearance.
    pub fn speaking_characters(&self) -> Vec<(String, String)> {
        let mut result: Vec<(String, String)> = self
            .characters
            .iter()
            .map(|(name, description)| (name.to_string(), description.to_string()))
            .collect();

        for line in self.scenes.iter().flat_map(|scene| scene.lines.iter()) {
            if !result.iter().any(|(name, _)| *name == line.character) {
                result.push((line.character.clone(), String::new()));
            }
        }

        result
    }
}
