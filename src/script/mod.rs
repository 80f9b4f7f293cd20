/*!
 * Script extraction.
 *
 * Turns a loosely structured educational script into:
 * - `Metadata`: title, subtitle and level from the leading lines
 * - `CharacterRegistry`: names and descriptions from a `Characters:` section
 * - `Scene`s: dialogue lines grouped under `Slide N` headings
 *
 * Extraction is a pure function over the document text; see [`extract`].
 */

pub mod extractor;
pub mod model;
pub mod recognizers;

pub use extractor::extract;
pub use model::{
    CharacterRegistry, DialogueLine, DialogueRecord, ExtractionResult, Metadata, Scene,
};
