//! Multi-drug combination detection ("Amoxicillin plus Clavulanate").

use super::normalize::Normalizer;
use super::reference::DrugReferenceSet;
use super::tables::{COMBINATION_JOIN_WORD, COMBINATION_MARKERS, COMBINATION_SEPARATOR};
use super::types::CombinationCandidate;

/// True if the line contains any combination marker (case-insensitive substring).
pub fn is_combination_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    COMBINATION_MARKERS.iter().any(|m| lower.contains(m))
}

/// Find lines naming two or more known drugs joined by a marker.
///
/// One candidate per qualifying line, in line order. A drug repeated on
/// the same line counts once.
pub fn detect_combinations(
    normalizer: &Normalizer,
    text: &str,
    drugs: &DrugReferenceSet,
) -> Vec<CombinationCandidate> {
    text.split('\n')
        .filter(|line| is_combination_line(line))
        .filter_map(|line| {
            let mut components: Vec<String> = Vec::new();
            for token in normalizer.tokenize(line) {
                if drugs.contains(&token) && !components.contains(&token) {
                    components.push(token);
                }
            }

            let named: Vec<&str> = components
                .iter()
                .map(String::as_str)
                .filter(|c| *c != COMBINATION_JOIN_WORD)
                .collect();
            if named.len() < 2 {
                return None;
            }

            Some(CombinationCandidate {
                name: named.join(COMBINATION_SEPARATOR),
                components,
                source_line: line.trim().to_string(),
            })
        })
        .collect()
}
