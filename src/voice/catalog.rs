use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Closed catalog of voice profiles.
///
/// Gender, age band and tone are implied by the profile name only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceProfile {
    YoungFemaleFriendly,
    YoungFemaleNeutral,
    ElderlyFemaleCheerful,
    FemaleProfessional,
    MaleYoung,
    MaleElderly,
    MaleProfessional,
    /// Fallback for characters that were never assigned
    Default,
}

impl VoiceProfile {
    pub const ALL: [VoiceProfile; 8] = [
        Self::YoungFemaleFriendly,
        Self::YoungFemaleNeutral,
        Self::ElderlyFemaleCheerful,
        Self::FemaleProfessional,
        Self::MaleYoung,
        Self::MaleElderly,
        Self::MaleProfessional,
        Self::Default,
    ];

    // @returns: Catalog identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::YoungFemaleFriendly => "young_female_friendly",
            Self::YoungFemaleNeutral => "young_female_neutral",
            Self::ElderlyFemaleCheerful => "elderly_female_cheerful",
            Self::FemaleProfessional => "female_professional",
            Self::MaleYoung => "male_young",
            Self::MaleElderly => "male_elderly",
            Self::MaleProfessional => "male_professional",
            Self::Default => "default",
        }
    }
}

impl fmt::Display for VoiceProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VoiceProfile {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|profile| profile.as_str() == wanted)
            .ok_or_else(|| anyhow!("Unknown voice profile: {}", s))
    }
}

/// Maps each profile to the opaque voice identifier of the synthesis service.
///
/// The table is configuration data; the assignment rules never see the ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceCatalog {
    voice_ids: BTreeMap<VoiceProfile, String>,
}

impl VoiceCatalog {
    /// Build a catalog from configured ids, filling gaps with the defaults
    pub fn new(configured: &BTreeMap<VoiceProfile, String>) -> Self {
        let mut voice_ids = default_voice_ids();
        for (profile, voice_id) in configured {
            if !voice_id.trim().is_empty() {
                voice_ids.insert(*profile, voice_id.trim().to_string());
            }
        }
        Self { voice_ids }
    }

    pub fn voice_id(&self, profile: VoiceProfile) -> &str {
        self.voice_ids
            .get(&profile)
            .or_else(|| self.voice_ids.get(&VoiceProfile::Default))
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Iterate over (profile, voice id) in catalog order
    pub fn iter(&self) -> impl Iterator<Item = (VoiceProfile, &str)> {
        self.voice_ids.iter().map(|(profile, id)| (*profile, id.as_str()))
    }
}

impl Default for VoiceCatalog {
    fn default() -> Self {
        Self { voice_ids: default_voice_ids() }
    }
}

/// Stock ElevenLabs voices for every profile
pub fn default_voice_ids() -> BTreeMap<VoiceProfile, String> {
    [
        (VoiceProfile::YoungFemaleFriendly, "EXAVITQu4vr4xnSDxMaL"),
        (VoiceProfile::YoungFemaleNeutral, "pNInz6obpgDQGcFmaJgB"),
        (VoiceProfile::ElderlyFemaleCheerful, "XB0fDUnXU5powFXDhCwa"),
        (VoiceProfile::FemaleProfessional, "ThT5KcBeYPX3keUQqHPh"),
        (VoiceProfile::MaleYoung, "pNInz6obpgDQGcFmaJgB"),
        (VoiceProfile::MaleElderly, "yoZ06aMxZJJ28mfd3POQ"),
        (VoiceProfile::MaleProfessional, "VR6AewLTigWG4xSOukaG"),
        (VoiceProfile::Default, "EXAVITQu4vr4xnSDxMaL"),
    ]
    .into_iter()
    .map(|(profile, id)| (profile, id.to_string()))
    .collect()
}
