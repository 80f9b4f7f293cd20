/*!
 * Tests for voice profile assignment
 */

use std::collections::BTreeMap;

use autosound::app_config::VoiceConfig;
use autosound::script::extract;
use autosound::voice::rules::classify;
use autosound::voice::{Tier, VoiceAssigner, VoiceCatalog, VoiceProfile};

use crate::common::SAMPLE_SCRIPT;

#[test]
fn test_assign_withMaleNameAndNoDescription_shouldUseNameTable() {
    let resolution = classify("Tom", "");
    assert_eq!(resolution.profile, VoiceProfile::MaleYoung);
    assert_eq!(resolution.tier, Tier::NameTable);

    let mut assigner = VoiceAssigner::default();
    assert_eq!(assigner.assign("Tom", ""), VoiceProfile::MaleYoung);
}

#[test]
fn test_assign_withElderlyCheerfulGrandmother_shouldPickElderlyFemaleCheerful() {
    let mut assigner = VoiceAssigner::default();
    let profile = assigner.assign("Martha", "an elderly, cheerful grandmother");
    assert_eq!(profile, VoiceProfile::ElderlyFemaleCheerful);
}

#[test]
fn test_assign_withUnknownName_shouldUseOrthographicFallback() {
    let resolution = classify("Zzyx", "");
    assert_eq!(resolution.profile, VoiceProfile::MaleYoung);
    assert_eq!(resolution.tier, Tier::Orthographic);

    assert_eq!(classify("Zorella", "").profile, VoiceProfile::YoungFemaleNeutral);
}

#[test]
fn test_assign_withUnisexNameAndPronoun_shouldUseDescriptionGender() {
    let resolution = classify("Alex", "a young student, she loves maths and is friendly");
    assert_eq!(resolution.profile, VoiceProfile::YoungFemaleFriendly);
    assert_eq!(resolution.tier, Tier::Description);

    assert_eq!(classify("Teacher", "a formal man").profile, VoiceProfile::MaleProfessional);
}

#[test]
fn test_assign_withUnisexNameAndPossessive_shouldFollowRelationNoun() {
    let resolution = classify("Jamie", "her brother");
    assert_eq!(resolution.profile, VoiceProfile::MaleYoung);
    assert_eq!(resolution.tier, Tier::Description);

    assert_eq!(classify("Robin", "his elderly, cheerful sister").profile, VoiceProfile::ElderlyFemaleCheerful);
}

#[test]
fn test_assign_withProfessionalWoman_shouldPickFemaleProfessional() {
    assert_eq!(
        classify("Receptionist", "a professional woman at the front desk").profile,
        VoiceProfile::FemaleProfessional
    );
}

#[test]
fn test_lookup_withUnassignedCharacter_shouldReturnDefaultProfile() {
    let assigner = VoiceAssigner::default();
    assert_eq!(assigner.lookup("Nobody"), VoiceProfile::Default);
    assert_eq!(assigner.voice_id("Nobody"), "EXAVITQu4vr4xnSDxMaL");
}

#[test]
fn test_fromConfig_withOverridesAndCustomIds_shouldApplyBoth() {
    let mut profiles = BTreeMap::new();
    profiles.insert(VoiceProfile::MaleElderly, "custom-elderly".to_string());
    let mut overrides = BTreeMap::new();
    overrides.insert("Tom".to_string(), "male_elderly".to_string());

    let config = VoiceConfig {
        profiles,
        overrides,
        ..VoiceConfig::default()
    };
    let mut assigner = VoiceAssigner::from_config(&config);

    assert_eq!(assigner.assign("Tom", "a young boy"), VoiceProfile::MaleElderly);
    assert_eq!(assigner.voice_id("Tom"), "custom-elderly");
}

#[test]
fn test_assignAll_withSampleScript_shouldMapEverySpeaker() {
    let result = extract(SAMPLE_SCRIPT).unwrap();
    let mut assigner = VoiceAssigner::default();
    assigner.assign_all(&result);

    let mappings = assigner.mappings();
    assert_eq!(mappings.len(), 3);
    assert_eq!(mappings["Lisa"], VoiceProfile::YoungFemaleFriendly);
    assert_eq!(mappings["Martha"], VoiceProfile::ElderlyFemaleCheerful);
    assert_eq!(mappings["Tom"], VoiceProfile::MaleYoung);

    let voice_ids = assigner.voice_mappings();
    assert_eq!(voice_ids["Martha"], "XB0fDUnXU5powFXDhCwa");
}

#[test]
fn test_catalog_withDefaults_shouldCoverEveryProfile() {
    let catalog = VoiceCatalog::default();
    for profile in VoiceProfile::ALL {
        assert!(!catalog.voice_id(profile).is_empty(), "{} has no voice id", profile);
    }
}
