//! Plain-text rendering of a parse result for terminals and logs.

use std::fmt::Write;

use super::types::ParseResult;

const RULE_WIDTH: usize = 70;

/// Render the per-medicine breakdown followed by a detected-medicines summary.
///
/// Attributes with no values are omitted.
pub fn render_report(result: &ParseResult) -> String {
    let mut out = String::new();
    let rule = "=".repeat(RULE_WIDTH);

    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "PRESCRIPTION ANALYSIS");
    let _ = writeln!(out, "{rule}");

    for (i, item) in result.items.iter().enumerate() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}. MEDICINE: {}", i + 1, item.medicine.to_uppercase());
        let _ = writeln!(out, "   Match: {}", item.method.as_str());
        for (label, values) in [
            ("Strength", &item.strength),
            ("Dosage", &item.dosage),
            ("Instructions", &item.instructions),
            ("Form", &item.form),
            ("Route", &item.route),
            ("Quantity", &item.quantity),
        ] {
            if !values.is_empty() {
                let _ = writeln!(out, "   {label}: {}", values.join(", "));
            }
        }
    }

    let detected: Vec<String> = result
        .items
        .iter()
        .map(|item| item.medicine.to_uppercase())
        .collect();
    let _ = writeln!(out);
    let _ = write!(out, "DETECTED MEDICINES: {}", detected.join(", "));
    out
}
