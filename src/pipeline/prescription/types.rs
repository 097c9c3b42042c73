use std::collections::HashMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use super::entities::EntityBuckets;

/// How a medicine was detected.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    CombinationMatch,
    ExactMatch,
}

impl MatchMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CombinationMatch => "combination_match",
            Self::ExactMatch => "exact_match",
        }
    }
}

/// A line naming two or more known drugs joined by a connective.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinationCandidate {
    /// Components joined with `" + "`.
    pub name: String,
    pub components: Vec<String>,
    /// Source line, trimmed.
    pub source_line: String,
}

/// A detected medicine and the line it was found on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MedicineMatch {
    pub name: String,
    #[serde(rename = "line")]
    pub context_line: String,
    pub confidence: u32,
    pub method: MatchMethod,
}

/// A dispensed-quantity phrase found in the raw text.
///
/// Offsets are character positions in the raw text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuantityCandidate {
    pub text: String,
    pub number: u64,
    pub start: usize,
    pub end: usize,
}

/// Final per-medicine prescription record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrescriptionItem {
    pub medicine: String,
    pub line: String,
    pub confidence: u32,
    pub method: MatchMethod,
    pub dosage: Vec<String>,
    pub strength: Vec<String>,
    pub instructions: Vec<String>,
    pub form: Vec<String>,
    pub route: Vec<String>,
    pub quantity: Vec<String>,
}

impl PrescriptionItem {
    /// Empty record for a match, attributes filled in by the aligner.
    pub fn for_match(m: &MedicineMatch) -> Self {
        Self {
            medicine: m.name.clone(),
            line: m.context_line.clone(),
            confidence: m.confidence,
            method: m.method,
            dosage: Vec::new(),
            strength: Vec::new(),
            instructions: Vec::new(),
            form: Vec::new(),
            route: Vec::new(),
            quantity: Vec::new(),
        }
    }
}

/// Output of one document parse.
#[derive(Debug, Clone, Serialize)]
pub struct ParseResult {
    pub ocr_text: String,
    pub medicines: MedicineIndex,
    pub entities: EntityBuckets,
    pub items: Vec<PrescriptionItem>,
}

// ═══════════════════════════════════════════
// MedicineIndex
// ═══════════════════════════════════════════

/// Insertion-ordered map of medicine name to match.
///
/// Combinations are inserted before individual matches and downstream
/// alignment relies on iterating in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MedicineIndex {
    entries: Vec<MedicineMatch>,
    positions: HashMap<String, usize>,
}

impl MedicineIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert keyed by `m.name`. An existing entry is overwritten in place
    /// and keeps its position.
    pub fn insert(&mut self, m: MedicineMatch) {
        match self.positions.get(&m.name) {
            Some(&idx) => self.entries[idx] = m,
            None => {
                self.positions.insert(m.name.clone(), self.entries.len());
                self.entries.push(m);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&MedicineMatch> {
        self.positions.get(name).map(|&idx| &self.entries[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MedicineMatch> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|m| m.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for MedicineIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for m in &self.entries {
            map.serialize_entry(&m.name, m)?;
        }
        map.end()
    }
}
