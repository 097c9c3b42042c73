//! Single-document pipeline: medicines → entities → aligned records.
//!
//! Pure composition over inputs that have already been computed or are
//! computed by the collaborators passed in. No retries, no timeouts;
//! callers wrap the whole invocation when they need either.

use super::align::align_entities;
use super::entities::{EntityBuckets, NerModel, OcrEngine};
use super::matcher::match_medicines;
use super::normalize::Normalizer;
use super::quantity::extract_quantities;
use super::reduce::Deduplicator;
use super::reference::DrugReferenceSet;
use super::types::ParseResult;
use super::PipelineError;

/// Owns the configuration tables used by every stage.
#[derive(Debug, Clone, Default)]
pub struct PrescriptionParser {
    normalizer: Normalizer,
    dedup: Deduplicator,
}

impl PrescriptionParser {
    pub fn new(normalizer: Normalizer, dedup: Deduplicator) -> Self {
        Self { normalizer, dedup }
    }

    /// Parse OCR text. Returns `None` when the text is empty or whitespace.
    ///
    /// An unavailable or failing NER model is not fatal: the parse proceeds
    /// with no entities at all, locally extracted quantities included, so
    /// every attribute list stays empty.
    pub fn run(
        &self,
        raw_text: &str,
        drugs: &DrugReferenceSet,
        ner: &dyn NerModel,
    ) -> Option<ParseResult> {
        if raw_text.trim().is_empty() {
            tracing::warn!("No text extracted, nothing to parse");
            return None;
        }

        let medicines = match_medicines(&self.normalizer, raw_text, drugs);
        tracing::info!(
            medicines = medicines.len(),
            drug_set = drugs.len(),
            generation = drugs.generation(),
            "Detected medicines"
        );

        let entities = match ner.infer(raw_text) {
            Ok(spans) => {
                let mut buckets = EntityBuckets::from_spans(spans);
                buckets.add_quantities(&extract_quantities(raw_text));
                buckets
            }
            Err(e) => {
                tracing::warn!(error = %e, "NER unavailable, continuing without entities");
                EntityBuckets::default()
            }
        };
        tracing::info!(entities = entities.total(), "Collected entities");

        let items = align_entities(&self.dedup, raw_text, &medicines, &entities);
        tracing::info!(items = items.len(), "Matched entities to medicines");

        Some(ParseResult {
            ocr_text: raw_text.to_string(),
            medicines,
            entities,
            items,
        })
    }

    /// Run the OCR collaborator, then [`run`](Self::run) on its output.
    pub fn parse_image(
        &self,
        image_bytes: &[u8],
        ocr: &dyn OcrEngine,
        drugs: &DrugReferenceSet,
        ner: &dyn NerModel,
    ) -> Result<Option<ParseResult>, PipelineError> {
        tracing::info!(bytes = image_bytes.len(), "Performing OCR");
        let text = ocr.image_to_text(image_bytes)?;
        Ok(self.run(&text, drugs, ner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::prescription::entities::{
        NerEntitySpan, NerLabel, StaticNer, UnavailableNer,
    };
    use crate::pipeline::prescription::types::MatchMethod;

    const SCENARIO: &str = "Paracetamol 500mg\nTake 1 tablet twice daily for 5 days\nDisp: 30";

    fn span(label: &str, text: &str) -> NerEntitySpan {
        NerEntitySpan {
            label: label.into(),
            text: text.into(),
            start: 0,
            end: 0,
            confidence: 0.95,
        }
    }

    fn scenario_ner() -> StaticNer {
        StaticNer(vec![
            span("FREQUENCY", "twice daily"),
            span("DURATION", "5 days"),
            span("STRENGTH", "500mg"),
            span("FORM", "tablet"),
        ])
    }

    struct FixedOcr(&'static str);

    impl OcrEngine for FixedOcr {
        fn image_to_text(&self, _image_bytes: &[u8]) -> Result<String, PipelineError> {
            Ok(self.0.to_string())
        }
    }

    struct BrokenOcr;

    impl OcrEngine for BrokenOcr {
        fn image_to_text(&self, _image_bytes: &[u8]) -> Result<String, PipelineError> {
            Err(PipelineError::Ocr("engine crashed".into()))
        }
    }

    #[test]
    fn end_to_end_single_medicine() {
        let drugs = DrugReferenceSet::from_names(["paracetamol"]);
        let result = PrescriptionParser::default()
            .run(SCENARIO, &drugs, &scenario_ner())
            .unwrap();

        assert_eq!(result.ocr_text, SCENARIO);
        assert_eq!(result.medicines.len(), 1);
        let m = result.medicines.get("paracetamol").unwrap();
        assert_eq!(m.method, MatchMethod::ExactMatch);
        assert_eq!(m.confidence, 100);

        assert_eq!(result.items.len(), 1);
        let item = &result.items[0];
        assert_eq!(item.medicine, "paracetamol");
        assert_eq!(item.line, "Paracetamol 500mg");
        assert_eq!(item.strength, vec!["500mg"]);
        assert_eq!(item.form, vec!["tablet"]);
        assert_eq!(item.instructions, vec!["twice daily", "5 days"]);
        assert!(item.dosage.is_empty());
        // "Disp: 30" is on the third line, outside the two-line window
        assert!(item.quantity.is_empty());

        let qty = result.entities.get(NerLabel::Quantity);
        assert_eq!(qty.len(), 1);
        assert_eq!(qty[0].text, "Disp: 30");
        assert_eq!(qty[0].number, Some(30));
    }

    #[test]
    fn quantity_within_window_is_aligned() {
        let text = "Amoxicillin 500mg caps\nDisp: 21 #21";
        let drugs = DrugReferenceSet::from_names(["amoxicillin"]);
        let result = PrescriptionParser::default()
            .run(text, &drugs, &StaticNer(Vec::new()))
            .unwrap();
        assert_eq!(result.items[0].quantity, vec!["#21"]);
    }

    #[test]
    fn empty_input_returns_sentinel() {
        let drugs = DrugReferenceSet::from_names(["paracetamol"]);
        let parser = PrescriptionParser::default();
        assert!(parser.run("", &drugs, &scenario_ner()).is_none());
        assert!(parser.run(" \n\t ", &drugs, &scenario_ner()).is_none());
    }

    #[test]
    fn unavailable_ner_degrades_to_empty_attributes() {
        let drugs = DrugReferenceSet::from_names(["paracetamol"]);
        let result = PrescriptionParser::default()
            .run(SCENARIO, &drugs, &UnavailableNer)
            .unwrap();
        let item = &result.items[0];
        assert!(item.strength.is_empty());
        assert!(item.instructions.is_empty());
        assert!(item.form.is_empty());
        assert_eq!(result.entities.get(NerLabel::Strength).len(), 0);
    }

    #[test]
    fn unavailable_ner_skips_local_quantities() {
        let text = "Paracetamol 500mg\nDisp: 30 #30";
        let drugs = DrugReferenceSet::from_names(["paracetamol"]);
        let result = PrescriptionParser::default()
            .run(text, &drugs, &UnavailableNer)
            .unwrap();
        assert!(result.items[0].quantity.is_empty());
        assert_eq!(result.entities.total(), 0);
    }

    #[test]
    fn empty_reference_set_yields_no_items() {
        let result = PrescriptionParser::default()
            .run(SCENARIO, &DrugReferenceSet::default(), &scenario_ner())
            .unwrap();
        assert!(result.medicines.is_empty());
        assert!(result.items.is_empty());
    }

    #[test]
    fn combination_item_collects_shared_attributes() {
        let text = "Amoxicillin plus Clavulanate 625mg\nTake twice daily";
        let drugs = DrugReferenceSet::from_names(["amoxicillin", "clavulanate"]);
        let ner = StaticNer(vec![span("STRENGTH", "625mg"), span("FREQUENCY", "twice daily")]);
        let result = PrescriptionParser::default().run(text, &drugs, &ner).unwrap();

        assert_eq!(result.items.len(), 1);
        let item = &result.items[0];
        assert_eq!(item.medicine, "amoxicillin + clavulanate");
        assert_eq!(item.method, MatchMethod::CombinationMatch);
        assert_eq!(item.strength, vec!["625mg"]);
        assert_eq!(item.instructions, vec!["twice daily"]);
    }

    #[test]
    fn parse_image_runs_ocr_first() {
        let drugs = DrugReferenceSet::from_names(["paracetamol"]);
        let parser = PrescriptionParser::default();
        let result = parser
            .parse_image(b"fake", &FixedOcr(SCENARIO), &drugs, &scenario_ner())
            .unwrap();
        assert_eq!(result.unwrap().items.len(), 1);

        let blank = parser
            .parse_image(b"fake", &FixedOcr("   "), &drugs, &scenario_ner())
            .unwrap();
        assert!(blank.is_none());
    }

    #[test]
    fn parse_image_surfaces_ocr_failure() {
        let drugs = DrugReferenceSet::default();
        let err = PrescriptionParser::default()
            .parse_image(b"fake", &BrokenOcr, &drugs, &UnavailableNer)
            .unwrap_err();
        assert!(matches!(err, PipelineError::Ocr(_)));
    }

    #[test]
    fn result_serializes_with_wire_field_names() {
        let drugs = DrugReferenceSet::from_names(["paracetamol"]);
        let result = PrescriptionParser::default()
            .run(SCENARIO, &drugs, &scenario_ner())
            .unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["medicines"]["paracetamol"]["method"], "exact_match");
        assert_eq!(json["items"][0]["strength"][0], "500mg");
        assert_eq!(json["entities"]["QUANTITY"][0]["number"], 30);
    }
}
