//! Entity-to-medicine alignment.
//!
//! Each medicine gets a context window: the first line containing its
//! context line plus the line after it. An entity belongs to the medicine
//! when its text occurs (case-insensitively) anywhere in that window.
//! NER offsets are not used; they do not reliably line up with the
//! reconstructed window text.

use super::entities::{EntityBuckets, NerLabel};
use super::reduce::{AttributeKind, Deduplicator};
use super::types::{MedicineIndex, MedicineMatch, PrescriptionItem};

/// Lines following the anchor line that are included in the window.
const WINDOW_TRAILING_LINES: usize = 1;

/// Build one record per medicine, in index order.
pub fn align_entities(
    dedup: &Deduplicator,
    text: &str,
    medicines: &MedicineIndex,
    entities: &EntityBuckets,
) -> Vec<PrescriptionItem> {
    let lines: Vec<&str> = text.split('\n').collect();

    medicines
        .iter()
        .map(|m| {
            let window = context_window(&lines, m);
            let mut item = PrescriptionItem::for_match(m);

            let mut instructions = texts_in_window(entities, NerLabel::Frequency, &window);
            instructions.extend(texts_in_window(entities, NerLabel::Duration, &window));
            item.instructions = dedup.reduce(instructions, AttributeKind::Instructions);

            for (label, _) in entities.iter() {
                let Some(kind) = AttributeKind::for_label(label) else {
                    continue;
                };
                let reduced = dedup.reduce(texts_in_window(entities, label, &window), kind);
                match kind {
                    AttributeKind::Dosage => item.dosage = reduced,
                    AttributeKind::Strength => item.strength = reduced,
                    AttributeKind::Form => item.form = reduced,
                    AttributeKind::Route => item.route = reduced,
                    AttributeKind::Quantity => item.quantity = reduced,
                    AttributeKind::Instructions => {}
                }
            }

            item
        })
        .collect()
}

/// Lowercased window text for a match.
///
/// Falls back to the stored context line when no line of the document
/// contains it.
pub fn context_window(lines: &[&str], m: &MedicineMatch) -> String {
    let needle = m.context_line.to_lowercase();
    match lines.iter().position(|l| l.to_lowercase().contains(&needle)) {
        Some(idx) => {
            let end = (idx + 1 + WINDOW_TRAILING_LINES).min(lines.len());
            lines[idx..end].join(" ").to_lowercase()
        }
        None => needle,
    }
}

fn texts_in_window(entities: &EntityBuckets, label: NerLabel, window: &str) -> Vec<String> {
    entities
        .get(label)
        .iter()
        .filter(|e| window.contains(&e.text.to_lowercase()))
        .map(|e| e.text.clone())
        .collect()
}
