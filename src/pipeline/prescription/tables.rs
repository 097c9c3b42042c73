//! Fixed lookup tables for the prescription pipeline.
//!
//! Kept as plain constants so the normalizer and deduplicator can be built
//! from alternative tables in tests.

/// Connective and dosing words that are never drug names.
pub const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "with", "day", "days", "tablet", "tablets",
    "once", "twice", "three", "times", "sig", "bedtime", "water",
    "glass", "first", "dissolve", "take", "morning", "evening",
];

/// OCR digit/letter confusions, applied to every character after lowercasing.
pub const OCR_SUBSTITUTIONS: &[(char, char)] = &[('0', 'o'), ('1', 'l'), ('5', 's')];

/// Substrings that mark a line as a possible multi-drug combination.
pub const COMBINATION_MARKERS: &[&str] = &["plus", "with", "+", "and", "&"];

/// Marker word that must never appear as a combination component name.
pub const COMBINATION_JOIN_WORD: &str = "plus";

/// Separator used to build a combination name from its components.
pub const COMBINATION_SEPARATOR: &str = " + ";

/// Dosage form ranking. Lower sorts first.
pub const FORM_PRIORITY: &[(&str, u32)] = &[
    ("tablet", 1),
    ("tablets", 1),
    ("tab", 1),
    ("capsule", 2),
    ("capsules", 2),
    ("cap", 2),
    ("syrup", 3),
    ("liquid", 4),
    ("injection", 5),
    ("cream", 6),
    ("ointment", 7),
    ("drops", 8),
];

/// Rank given to forms missing from [`FORM_PRIORITY`].
pub const UNKNOWN_FORM_PRIORITY: u32 = 999;

/// Number of forms kept per medicine.
pub const MAX_FORMS: usize = 2;

/// Keywords that mark an explicit dispense quantity.
pub const DISPENSE_KEYWORDS: &[&str] = &["disp", "qty", "quantity"];

/// Candidate header names for the drug-name column, tried in order.
pub const DRUG_NAME_COLUMNS: &[&str] = &[
    "Drug Name",
    "drug_name",
    "name",
    "Name",
    "DRUG_NAME",
    "medicine_name",
];

/// Confidence attached to every medicine match.
pub const MATCH_CONFIDENCE: u32 = 100;

/// Confidence attached to locally extracted quantity entities.
pub const QUANTITY_CONFIDENCE: f32 = 1.0;
