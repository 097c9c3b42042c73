//! Per-attribute deduplication and prioritization of candidate values.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::entities::NerLabel;
use super::tables::{DISPENSE_KEYWORDS, FORM_PRIORITY, MAX_FORMS, UNKNOWN_FORM_PRIORITY};

/// Attribute a candidate list is being reduced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    Dosage,
    Strength,
    Form,
    Route,
    Quantity,
    Instructions,
}

impl AttributeKind {
    /// Attribute fed by an NER label. DRUG, FREQUENCY and DURATION have
    /// none: drugs are matched separately and the other two merge into
    /// instructions.
    pub fn for_label(label: NerLabel) -> Option<Self> {
        match label {
            NerLabel::Dosage => Some(Self::Dosage),
            NerLabel::Strength => Some(Self::Strength),
            NerLabel::Form => Some(Self::Form),
            NerLabel::Route => Some(Self::Route),
            NerLabel::Quantity => Some(Self::Quantity),
            NerLabel::Drug | NerLabel::Frequency | NerLabel::Duration => None,
        }
    }
}

/// Applies the dedup step and the attribute-specific ranking.
#[derive(Debug, Clone)]
pub struct Deduplicator {
    form_priority: HashMap<String, u32>,
    dispense_keywords: Vec<String>,
}

impl Default for Deduplicator {
    fn default() -> Self {
        Self::new(FORM_PRIORITY, DISPENSE_KEYWORDS)
    }
}

impl Deduplicator {
    pub fn new(form_priority: &[(&str, u32)], dispense_keywords: &[&str]) -> Self {
        Self {
            form_priority: form_priority
                .iter()
                .map(|(form, rank)| (form.to_lowercase(), *rank))
                .collect(),
            dispense_keywords: dispense_keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    pub fn reduce(&self, items: Vec<String>, kind: AttributeKind) -> Vec<String> {
        let mut unique = dedup_case_insensitive(items);
        if unique.is_empty() {
            return unique;
        }

        match kind {
            AttributeKind::Dosage => {
                unique.sort_by_key(|x| (!has_digit(x), x.chars().count()));
                unique.truncate(1);
                unique
            }
            AttributeKind::Form => {
                let mut roots = HashSet::new();
                let mut forms: Vec<String> = unique
                    .into_iter()
                    .filter(|f| roots.insert(f.to_lowercase().trim_end_matches('s').to_string()))
                    .collect();
                forms.sort_by_key(|f| self.form_rank(f));
                forms.truncate(MAX_FORMS);
                forms
            }
            AttributeKind::Quantity => {
                unique.sort_by_key(|q| self.quantity_rank(q));
                unique.truncate(1);
                unique
            }
            AttributeKind::Instructions => {
                unique.sort_by_key(|i| std::cmp::Reverse(i.chars().count()));
                unique
            }
            AttributeKind::Strength | AttributeKind::Route => unique,
        }
    }

    fn form_rank(&self, form: &str) -> u32 {
        self.form_priority
            .get(form.trim().to_lowercase().as_str())
            .copied()
            .unwrap_or(UNKNOWN_FORM_PRIORITY)
    }

    /// `#`-prefixed first, explicit dispense keywords next, anything else last.
    fn quantity_rank(&self, quantity: &str) -> u8 {
        if quantity.starts_with('#') {
            return 0;
        }
        let lower = quantity.to_lowercase();
        if self.dispense_keywords.iter().any(|k| lower.contains(k.as_str())) {
            1
        } else {
            2
        }
    }
}

/// Drop blanks and case-insensitive duplicates, keeping the first spelling.
fn dedup_case_insensitive(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| {
            let key = item.trim().to_lowercase();
            !key.is_empty() && seen.insert(key)
        })
        .collect()
}

fn has_digit(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KINDS: [AttributeKind; 6] = [
        AttributeKind::Dosage,
        AttributeKind::Strength,
        AttributeKind::Form,
        AttributeKind::Route,
        AttributeKind::Quantity,
        AttributeKind::Instructions,
    ];

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn reduce(items: &[&str], kind: AttributeKind) -> Vec<String> {
        Deduplicator::default().reduce(strings(items), kind)
    }

    #[test]
    fn base_dedup_keeps_first_casing_and_order() {
        assert_eq!(
            reduce(&["Oral", "PO", "oral", "po "], AttributeKind::Route),
            vec!["Oral", "PO"]
        );
    }

    #[test]
    fn blank_entries_are_dropped() {
        assert_eq!(reduce(&["", "  ", "500mg"], AttributeKind::Strength), vec!["500mg"]);
        assert!(reduce(&[""], AttributeKind::Instructions).is_empty());
    }

    #[test]
    fn dosage_prefers_digits_then_shorter() {
        assert_eq!(reduce(&["twice daily", "500mg"], AttributeKind::Dosage), vec!["500mg"]);
        assert_eq!(
            reduce(&["1 tablet", "2 tabs", "one"], AttributeKind::Dosage),
            vec!["2 tabs"]
        );
        assert_eq!(reduce(&["half", "one"], AttributeKind::Dosage), vec!["one"]);
    }

    #[test]
    fn dosage_digit_check_is_ascii_only() {
        assert_eq!(
            reduce(&["١ tab", "one tablet", "2 tabs"], AttributeKind::Dosage),
            vec!["2 tabs"]
        );
        assert_eq!(reduce(&["١ tab", "one"], AttributeKind::Dosage), vec!["one"]);
    }

    #[test]
    fn form_collapses_plurals_and_ranks() {
        assert_eq!(
            reduce(&["capsules", "tablet", "drops"], AttributeKind::Form),
            vec!["tablet", "capsules"]
        );
        assert_eq!(
            reduce(&["tablets", "tablet", "cream"], AttributeKind::Form),
            vec!["tablets", "cream"]
        );
    }

    #[test]
    fn form_unknown_ranks_last_and_keeps_order() {
        assert_eq!(
            reduce(&["patch", "spray", "syrup"], AttributeKind::Form),
            vec!["syrup", "patch"]
        );
    }

    #[test]
    fn quantity_prefers_hash_then_dispense_keyword() {
        assert_eq!(
            reduce(&["Supply 30", "Disp: 30", "#30"], AttributeKind::Quantity),
            vec!["#30"]
        );
        assert_eq!(
            reduce(&["Total 28", "Qty 28"], AttributeKind::Quantity),
            vec!["Qty 28"]
        );
    }

    #[test]
    fn instructions_sorted_longest_first() {
        assert_eq!(
            reduce(&["5 days", "twice daily", "Twice Daily"], AttributeKind::Instructions),
            vec!["twice daily", "5 days"]
        );
    }

    #[test]
    fn reduce_is_idempotent() {
        let inputs: [&[&str]; 4] = [
            &["twice daily", "500mg", "250mg", "TWICE DAILY"],
            &["capsules", "tablet", "tablets", "drops", "cream"],
            &["Give 5", "#5", "Disp 5", "qty 5"],
            &["", "oral", "Oral", "iv"],
        ];
        let dedup = Deduplicator::default();
        for items in inputs {
            for kind in ALL_KINDS {
                let once = dedup.reduce(strings(items), kind);
                let twice = dedup.reduce(once.clone(), kind);
                assert_eq!(once, twice, "not idempotent for {kind:?} on {items:?}");
            }
        }
    }

    #[test]
    fn output_has_no_case_insensitive_duplicates() {
        let items = ["Oral", "ORAL", "oral ", "IV", "iv", "#2", "#2"];
        let dedup = Deduplicator::default();
        for kind in ALL_KINDS {
            let out = dedup.reduce(strings(&items), kind);
            let keys: HashSet<String> = out.iter().map(|s| s.trim().to_lowercase()).collect();
            assert_eq!(keys.len(), out.len(), "duplicates for {kind:?}: {out:?}");
        }
    }

    #[test]
    fn empty_input_stays_empty() {
        for kind in ALL_KINDS {
            assert!(reduce(&[], kind).is_empty());
        }
    }

    #[test]
    fn labels_map_to_attributes() {
        assert_eq!(AttributeKind::for_label(NerLabel::Strength), Some(AttributeKind::Strength));
        assert_eq!(AttributeKind::for_label(NerLabel::Drug), None);
        assert_eq!(AttributeKind::for_label(NerLabel::Frequency), None);
        assert_eq!(AttributeKind::for_label(NerLabel::Duration), None);
    }
}
