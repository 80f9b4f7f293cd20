/*!
 * # autosound
 *
 * A Rust library that turns educational dialogue scripts into per-line
 * speech audio.
 *
 * ## Features
 *
 * - Heuristic extraction of metadata, characters and `Slide N` dialogue
 *   from loosely formatted scripts (plain text, Markdown or `.docx`)
 * - Rule-based voice profile assignment from character names and
 *   descriptions, with explicit overrides
 * - ElevenLabs text-to-speech with retries and request pacing
 * - JSON and CSV export of every generated line
 * - Batch processing of a folder of scripts
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `script`: pure text to `ExtractionResult` extraction
 * - `voice`: voice profile catalog, rule tables and the `VoiceAssigner`
 * - `document_loader`: reading `.txt`/`.md`/`.docx` documents and folder scans
 * - `providers`: speech synthesizer implementations:
 *   - `providers::elevenlabs`: ElevenLabs API client
 *   - `providers::mock`: in-process synthesizer for tests
 * - `synthesis`: one synthesis call per dialogue line
 * - `export`: result files next to the audio
 * - `app_controller`: document and folder workflows
 * - `app_config`: configuration management
 * - `errors`: custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod document_loader;
pub mod errors;
pub mod export;
pub mod providers;
pub mod script;
pub mod synthesis;
pub mod voice;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, DocumentOutcome, DocumentReport};
pub use errors::{AppError, ProviderError, ScriptError};
pub use script::{extract, ExtractionResult};
pub use voice::{VoiceAssigner, VoiceProfile};
