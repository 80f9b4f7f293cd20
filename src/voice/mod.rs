/*!
 * Character to voice assignment.
 *
 * - `catalog`: the fixed profile catalog and its voice id table
 * - `rules`: name tables, description keywords and the decision table
 * - `assigner`: overrides plus a run-scoped cache on top of the rules
 */

pub mod assigner;
pub mod catalog;
pub mod rules;

pub use assigner::{CharacterVoiceMap, VoiceAssigner};
pub use catalog::{VoiceCatalog, VoiceProfile};
pub use rules::{Resolution, Signal, Tier};
