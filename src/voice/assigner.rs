use std::collections::{BTreeMap, HashMap};

use log::{debug, warn};

use crate::app_config::VoiceConfig;
use crate::script::ExtractionResult;

use super::catalog::{VoiceCatalog, VoiceProfile};
use super::rules::{self, Resolution, Tier};

/// Character name to assigned profile for one processing run
pub type CharacterVoiceMap = BTreeMap<String, VoiceProfile>;

/// Picks one voice profile per character and remembers it for the run.
///
/// A fresh assigner (or a `reset`) is needed for every processing unit that
/// must not share voices with the previous one.
#[derive(Debug, Clone)]
pub struct VoiceAssigner {
    // @field: Profile to voice id table
    catalog: VoiceCatalog,

    // @field: Character name to requested profile name
    overrides: HashMap<String, String>,

    // @field: Run-scoped cache
    assignments: CharacterVoiceMap,
}

impl VoiceAssigner {
    pub fn new(catalog: VoiceCatalog) -> Self {
        Self {
            catalog,
            overrides: HashMap::new(),
            assignments: CharacterVoiceMap::new(),
        }
    }

    /// Build an assigner from the `voices` section of the configuration
    pub fn from_config(config: &VoiceConfig) -> Self {
        Self::new(VoiceCatalog::new(&config.profiles))
            .with_overrides(config.overrides.clone())
    }

    /// Add explicit character to profile-name overrides
    pub fn with_overrides<I, K, V>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.overrides
            .extend(overrides.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Assign a profile to a character, or return the one already assigned
    pub fn assign(&mut self, character: &str, description: &str) -> VoiceProfile {
        if let Some(profile) = self.assignments.get(character) {
            return *profile;
        }

        let resolution = self.resolve(character, description);
        debug!(
            "Voice for '{}': {} ({:?})",
            character, resolution.profile, resolution.tier
        );

        self.assignments.insert(character.to_string(), resolution.profile);
        resolution.profile
    }

    /// Assign every speaking character of an extracted script
    pub fn assign_all(&mut self, result: &ExtractionResult) {
        for (name, description) in result.speaking_characters() {
            self.assign(&name, &description);
        }
    }

    fn resolve(&self, character: &str, description: &str) -> Resolution {
        if let Some(requested) = self.overrides.get(character) {
            match requested.parse::<VoiceProfile>() {
                Ok(profile) => {
                    return Resolution { profile, tier: Tier::Override };
                }
                Err(_) => warn!(
                    "Ignoring override '{}' for '{}': not a known voice profile",
                    requested, character
                ),
            }
        }

        rules::classify(character, description)
    }

    /// Assigned profile, or `VoiceProfile::Default` for unknown characters
    pub fn lookup(&self, character: &str) -> VoiceProfile {
        self.assignments
            .get(character)
            .copied()
            .unwrap_or(VoiceProfile::Default)
    }

    /// External voice id for a character
    pub fn voice_id(&self, character: &str) -> &str {
        self.catalog.voice_id(self.lookup(character))
    }

    pub fn mappings(&self) -> &CharacterVoiceMap {
        &self.assignments
    }

    /// Character name to external voice id, for export
    pub fn voice_mappings(&self) -> BTreeMap<String, String> {
        self.assignments
            .iter()
            .map(|(name, profile)| (name.clone(), self.catalog.voice_id(*profile).to_string()))
            .collect()
    }

    pub fn catalog(&self) -> &VoiceCatalog {
        &self.catalog
    }

    /// Forget all assignments, keeping catalog and overrides
    pub fn reset(&mut self) {
        self.assignments.clear();
    }
}

impl Default for VoiceAssigner {
    fn default() -> Self {
        Self::new(VoiceCatalog::default())
    }
}
