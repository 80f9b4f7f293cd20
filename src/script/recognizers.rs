/*!
 * Line-oriented recognizers for the script grammar.
 *
 * Each recognizer looks at a single line and either returns the fields it
 * matched or `None`. The extractor composes them with first-match-wins rules.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use super::model::DialogueLine;

// One or more capitalized words, e.g. "Lisa", "Mr. Brown", "Ágnes"
const NAME: &str = r"\p{Lu}[\p{L}'.]*(?:[ \t]+\p{Lu}[\p{L}'.]*)*";

// @const: Character section heading, remainder of the line in group 1
pub(crate) static CHARACTER_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^[ \t]*[#*_]*[ \t]*characters?[ \t]*[*_]*[ \t]*:[*_]*[ \t]*(.*)$").unwrap()
});

// @const: Any slide or scene heading; ends a free-running character section
static SECTION_BREAK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[ \t]*[#*_]*[ \t]*(?:slide|scene)[ \t]+\d+").unwrap()
});

// @const: Scene heading, case-sensitive, must be followed by a newline.
// Markdown heading and emphasis markers around it are tolerated.
pub(crate) static SLIDE_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*[#*_]*[ \t]*Slide[ \t]+(\d+)[*_]*[ \t]*\n").unwrap()
});

static BULLET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[ \t]*(?:[•\-–—*]|\d+[.)])[ \t]+").unwrap()
});

static COLON_ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^[*_]*({NAME})[*_]*[ \t]*:[*_]*[ \t]*(.+)$")).unwrap()
});

static DASH_ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^[*_]*({NAME})[*_]*(?:[ \t]*[–—][ \t]*|[ \t]+-[ \t]+)(.+)$")).unwrap()
});

static DIALOGUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\p{L}+):(.*)$").unwrap()
});

/// Tokens that introduce stage directions rather than speech
pub const STRUCTURAL_KEYWORDS: [&str; 15] = [
    "scene", "setting", "location", "context", "dialogue", "note", "description", "action",
    "stage", "background", "sound", "music", "time", "place", "situation",
];

/// A metadata field recognized on one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataLine {
    Level(String),
    Title,
    Subtitle,
}

/// A `name → description` pair recognized inside a character section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterEntry {
    pub name: String,
    pub description: String,
}

/// Signature shared by the character-list recognizers
pub type CharacterRecognizer = fn(&str) -> Option<CharacterEntry>;

/// Character-list grammars in priority order
pub const CHARACTER_RECOGNIZERS: [CharacterRecognizer; 2] = [colon_entry, dash_entry];

/// Classify a trimmed, non-empty leading line.
///
/// Precedence is level prefix, then digit-prefixed title (only while no title
/// is known), then dash subtitle.
pub fn metadata_line(line: &str, title_taken: bool) -> Option<MetadataLine> {
    if line.get(..6).is_some_and(|prefix| prefix.eq_ignore_ascii_case("level:")) {
        return Some(MetadataLine::Level(line[6..].trim().to_string()));
    }
    if !title_taken && line.starts_with(|c: char| c.is_ascii_digit()) {
        return Some(MetadataLine::Title);
    }
    if line.contains('–') || line.contains('—') {
        return Some(MetadataLine::Subtitle);
    }
    None
}

/// `Name: description`, with optional emphasis markers around the name
pub fn colon_entry(line: &str) -> Option<CharacterEntry> {
    character_entry(&COLON_ENTRY, line)
}

/// `Name – description`, `Name — description` or `Name - description`
pub fn dash_entry(line: &str) -> Option<CharacterEntry> {
    character_entry(&DASH_ENTRY, line)
}

fn character_entry(pattern: &Regex, line: &str) -> Option<CharacterEntry> {
    let caps = pattern.captures(strip_bullet(line.trim()))?;
    let name = strip_emphasis(&caps[1]);
    if name.is_empty() {
        return None;
    }
    Some(CharacterEntry {
        name,
        description: strip_emphasis(&caps[2]),
    })
}

/// `Character: spoken text`, rejecting structural keywords and empty text
pub fn dialogue_line(line: &str) -> Option<DialogueLine> {
    let caps = DIALOGUE.captures(line.trim())?;
    let character = &caps[1];
    if is_structural_keyword(character) {
        return None;
    }
    let text = caps[2].trim();
    if text.is_empty() {
        return None;
    }
    Some(DialogueLine {
        character: character.to_string(),
        text: text.to_string(),
    })
}

pub fn is_structural_keyword(token: &str) -> bool {
    let lower = token.to_lowercase();
    STRUCTURAL_KEYWORDS.contains(&lower.as_str())
}

/// Whether a line opens a new slide or scene
pub fn is_section_break(line: &str) -> bool {
    SECTION_BREAK.is_match(line)
}

/// Remove a leading list marker (`•`, `-`, `*`, `1.`, `2)` ...)
pub fn strip_bullet(line: &str) -> &str {
    match BULLET.find(line) {
        Some(found) => &line[found.end()..],
        None => line,
    }
}

/// Remove markdown emphasis markers and surrounding whitespace
pub fn strip_emphasis(text: &str) -> String {
    text.replace('*', "")
        .trim()
        .trim_matches('_')
        .trim()
        .to_string()
}
