//! Dispensed-quantity extraction ("#24", "Disp: 30", "60 tabs total").
//!
//! The NER model has no quantity label, so these phrases are found with
//! regexes on the raw text. Every pattern runs independently and all
//! matches are kept; overlapping matches are reduced downstream.

use std::sync::LazyLock;

use regex::Regex;

use super::types::QuantityCandidate;

/// Quantity patterns, each with the count in capture group 1.
/// Counts are ASCII digits only.
static QUANTITY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"#\s*((?-u:\d)+)",
        r"(?i)(?:disp|dispense|qty|quantity)[\s:]*((?-u:\d)+)",
        r"(?i)((?-u:\d)+)\s*(?:tabs?|caps?|tablets?|capsules?|pieces?|pcs?)\s*(?:total|to\s+dispense|dispense)",
        r"(?i)(?:total|give|supply)[\s:]*((?-u:\d)+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

/// Find every quantity phrase in `text`.
///
/// Offsets are character positions so they line up with what a client
/// sees, not UTF-8 byte positions.
pub fn extract_quantities(text: &str) -> Vec<QuantityCandidate> {
    let mut found = Vec::new();
    for re in QUANTITY_PATTERNS.iter() {
        for caps in re.captures_iter(text) {
            let (Some(whole), Some(digits)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let Ok(number) = digits.as_str().parse::<u64>() else {
                tracing::debug!(digits = digits.as_str(), "Quantity out of range, skipped");
                continue;
            };
            let start = char_offset(text, whole.start());
            found.push(QuantityCandidate {
                text: whole.as_str().to_string(),
                number,
                start,
                end: start + whole.as_str().chars().count(),
            });
        }
    }
    found
}

fn char_offset(text: &str, byte_idx: usize) -> usize {
    text[..byte_idx].chars().count()
}
