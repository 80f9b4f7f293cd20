/*!
 * Rule tables for choosing a voice profile.
 *
 * Resolution is a pure pipeline over a `Signal`:
 * 1. name table lookup (male / female / unisex tokens)
 * 2. description scoring through the declarative `RULES` table
 * 3. orthographic suffix fallback when no gender signal exists
 *
 * Explicit overrides are handled by the assigner before this module is
 * consulted.
 */

use super::catalog::VoiceProfile;

/// Gender evidence gathered for a character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Male,
    Female,
    /// Name is known but used for any gender ("Alex", "Teacher")
    Unisex,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

/// Which tier produced a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Override,
    NameTable,
    Description,
    Orthographic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub profile: VoiceProfile,
    pub tier: Tier,
}

// Name tables are illustrative and will misclassify some names
const MALE_NAMES: &[&str] = &[
    "tom", "john", "peter", "david", "james", "michael", "robert", "william", "richard",
    "joseph", "charles", "thomas", "daniel", "paul", "mark", "george", "jack", "harry", "ben",
    "adam", "steve", "mike", "bob", "frank", "henry", "oliver", "max", "leo", "luke", "jim",
    "father", "dad", "grandfather", "grandpa", "husband", "brother", "son", "uncle", "boy",
    "man", "gentleman", "king", "prince", "mr", "sir", "waiter", "policeman", "postman",
    "businessman", "salesman",
];

const FEMALE_NAMES: &[&str] = &[
    "lisa", "anna", "mary", "sarah", "emma", "kate", "linda", "susan", "jane", "emily",
    "sophie", "julia", "martha", "maria", "laura", "helen", "lucy", "alice", "olivia", "amy",
    "rachel", "eva", "grace", "nora", "mother", "mom", "mum", "grandmother", "grandma", "wife",
    "sister", "daughter", "aunt", "girl", "woman", "lady", "queen", "princess", "mrs", "ms",
    "miss", "waitress", "saleswoman", "businesswoman",
];

const UNISEX_NAMES: &[&str] = &[
    "alex", "sam", "chris", "jordan", "taylor", "pat", "robin", "jamie", "casey", "morgan",
    "kim", "teacher", "student", "doctor", "nurse", "seller", "shopkeeper", "customer",
    "receptionist", "guide", "narrator", "friend", "neighbour", "neighbor", "manager",
    "officer", "child", "kid", "parent", "host", "guest", "passenger", "driver", "clerk",
    "cashier", "assistant", "tourist", "visitor",
];

const YOUNG_WORDS: &[&str] = &["young", "teenager", "teen", "student", "child", "kid", "youthful"];
const ELDERLY_WORDS: &[&str] = &[
    "elderly", "old", "senior", "grandmother", "grandfather", "grandma", "grandpa", "aged", "retired",
];
const CHEERFUL_WORDS: &[&str] = &["cheerful", "happy", "jovial", "upbeat", "joyful", "merry"];
const FRIENDLY_WORDS: &[&str] = &["friendly", "polite", "kind", "helpful", "warm"];
const PROFESSIONAL_WORDS: &[&str] = &["professional", "formal", "business", "businesslike", "official"];

const FEMALE_WORDS: &[&str] = &[
    "lady", "woman", "girl", "female", "mother", "sister", "daughter", "wife", "aunt",
    "grandmother", "grandma", "mrs", "ms", "miss",
];
const MALE_WORDS: &[&str] = &[
    "man", "boy", "male", "father", "brother", "son", "husband", "uncle", "grandfather",
    "grandpa", "gentleman", "mr",
];

// Pronouns often refer to someone else ("her brother"), so nouns take precedence
const FEMALE_PRONOUNS: &[&str] = &["she", "her", "hers"];
const MALE_PRONOUNS: &[&str] = &["he", "him", "his"];

pub const FEMININE_SUFFIXES: [&str; 6] = ["a", "ia", "ella", "ette", "ine", "ie"];

/// Boolean flags scored over the words of a description
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DescriptionTraits {
    pub young: bool,
    pub elderly: bool,
    pub cheerful: bool,
    pub friendly: bool,
    pub professional: bool,
    /// Gender nouns, then pronouns; female checked first within each
    pub gender: Option<Gender>,
}

impl DescriptionTraits {
    pub fn from_description(description: &str) -> Self {
        let lower = description.to_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .collect();
        let has_any = |set: &[&str]| words.iter().any(|word| set.contains(word));

        let gender = [(FEMALE_WORDS, MALE_WORDS), (FEMALE_PRONOUNS, MALE_PRONOUNS)]
            .into_iter()
            .find_map(|(female, male)| {
                if has_any(female) {
                    Some(Gender::Female)
                } else if has_any(male) {
                    Some(Gender::Male)
                } else {
                    None
                }
            });

        Self {
            young: has_any(YOUNG_WORDS),
            elderly: has_any(ELDERLY_WORDS),
            cheerful: has_any(CHEERFUL_WORDS),
            friendly: has_any(FRIENDLY_WORDS),
            professional: has_any(PROFESSIONAL_WORDS),
            gender,
        }
    }
}

/// One row of the description decision table
pub struct Rule {
    pub gender: Gender,
    pub applies: fn(&DescriptionTraits) -> bool,
    pub profile: VoiceProfile,
}

fn elderly_and_cheerful(t: &DescriptionTraits) -> bool {
    t.elderly && t.cheerful
}

fn young_and_friendly(t: &DescriptionTraits) -> bool {
    t.young && t.friendly
}

fn elderly(t: &DescriptionTraits) -> bool {
    t.elderly
}

fn young(t: &DescriptionTraits) -> bool {
    t.young
}

fn professional(t: &DescriptionTraits) -> bool {
    t.professional
}

fn always(_: &DescriptionTraits) -> bool {
    true
}

/// Ordered decision table; the first row matching gender and predicate wins.
/// Each gender ends with an unconditional row.
pub const RULES: [Rule; 8] = [
    Rule { gender: Gender::Female, applies: elderly_and_cheerful, profile: VoiceProfile::ElderlyFemaleCheerful },
    Rule { gender: Gender::Female, applies: young_and_friendly, profile: VoiceProfile::YoungFemaleFriendly },
    Rule { gender: Gender::Female, applies: professional, profile: VoiceProfile::FemaleProfessional },
    Rule { gender: Gender::Female, applies: always, profile: VoiceProfile::YoungFemaleNeutral },
    Rule { gender: Gender::Male, applies: elderly, profile: VoiceProfile::MaleElderly },
    Rule { gender: Gender::Male, applies: young, profile: VoiceProfile::MaleYoung },
    Rule { gender: Gender::Male, applies: professional, profile: VoiceProfile::MaleProfessional },
    Rule { gender: Gender::Male, applies: always, profile: VoiceProfile::MaleYoung },
];

/// Look the character name up in the name tables.
///
/// The whole lower-cased name is tried first, then its first word, so
/// "Mrs Smith" resolves through "mrs".
pub fn name_signal(name: &str) -> Signal {
    let lower = name.trim().to_lowercase();
    let first_word = lower
        .split(|c: char| !c.is_alphanumeric())
        .find(|word| !word.is_empty())
        .unwrap_or_default();

    for candidate in [lower.as_str(), first_word] {
        if MALE_NAMES.contains(&candidate) {
            return Signal::Male;
        }
        if FEMALE_NAMES.contains(&candidate) {
            return Signal::Female;
        }
        if UNISEX_NAMES.contains(&candidate) {
            return Signal::Unisex;
        }
    }

    Signal::Unknown
}

/// Select a profile from the decision table
pub fn decide(gender: Gender, traits: &DescriptionTraits) -> VoiceProfile {
    RULES
        .iter()
        .find(|rule| rule.gender == gender && (rule.applies)(traits))
        .map_or(VoiceProfile::Default, |rule| rule.profile)
}

/// Last-resort guess from the spelling of the name
pub fn orthographic_fallback(name: &str) -> VoiceProfile {
    let lower = name.trim().to_lowercase();
    if FEMININE_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix)) {
        VoiceProfile::YoungFemaleNeutral
    } else {
        VoiceProfile::MaleYoung
    }
}

/// Resolve a profile from name and description, without overrides.
///
/// Always returns a profile; ambiguous names degrade to the orthographic guess.
pub fn classify(name: &str, description: &str) -> Resolution {
    let traits = DescriptionTraits::from_description(description);

    let (gender, tier) = match name_signal(name) {
        Signal::Male => (Some(Gender::Male), Tier::NameTable),
        Signal::Female => (Some(Gender::Female), Tier::NameTable),
        Signal::Unisex | Signal::Unknown => (traits.gender, Tier::Description),
    };

    match gender {
        Some(gender) => Resolution { profile: decide(gender, &traits), tier },
        None => Resolution {
            profile: orthographic_fallback(name),
            tier: Tier::Orthographic,
        },
    }
}
