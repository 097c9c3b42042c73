//! Medicine detection: combinations first, then individual drug names.

use std::collections::HashSet;

use super::combination::detect_combinations;
use super::normalize::Normalizer;
use super::reference::DrugReferenceSet;
use super::tables::MATCH_CONFIDENCE;
use super::types::{MatchMethod, MedicineIndex, MedicineMatch};

/// Detect every medicine in the document.
///
/// Tokens consumed as combination components are never reported again as
/// standalone matches.
pub fn match_medicines(
    normalizer: &Normalizer,
    text: &str,
    drugs: &DrugReferenceSet,
) -> MedicineIndex {
    let mut index = MedicineIndex::new();

    let combinations = detect_combinations(normalizer, text, drugs);
    for combo in &combinations {
        index.insert(MedicineMatch {
            name: combo.name.clone(),
            context_line: combo.source_line.clone(),
            confidence: MATCH_CONFIDENCE,
            method: MatchMethod::CombinationMatch,
        });
    }

    let already_matched: HashSet<&str> = combinations
        .iter()
        .flat_map(|c| c.components.iter().map(String::as_str))
        .collect();

    let lines: Vec<&str> = text.split('\n').collect();

    for token in normalizer.tokenize(text) {
        if !drugs.contains(&token) || already_matched.contains(token.as_str()) {
            continue;
        }
        if index.contains(&token) {
            continue;
        }
        let context_line = lines
            .iter()
            .find(|l| l.to_lowercase().contains(&token))
            .map(|l| l.trim().to_string())
            .unwrap_or_default();
        index.insert(MedicineMatch {
            name: token,
            context_line,
            confidence: MATCH_CONFIDENCE,
            method: MatchMethod::ExactMatch,
        });
    }

    tracing::debug!(
        combinations = combinations.len(),
        total = index.len(),
        "Medicine matching complete"
    );
    index
}
