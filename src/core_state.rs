//! Shared application state.
//!
//! `CoreState` is wrapped in `Arc` at startup and handed to the HTTP
//! layer. The drug registry is the only mutable piece, and it is only
//! ever swapped whole (see `DrugRegistry`).

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::pipeline::prescription::{
    DrugReferenceSet, DrugRegistry, NerModel, ParseResult, PrescriptionParser, ReferenceError,
    UnavailableNer,
};

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Drug reference error: {0}")]
    Reference(#[from] ReferenceError),
}

pub struct CoreState {
    drugs: DrugRegistry,
    parser: PrescriptionParser,
    /// Model used when a request carries no pre-computed entities.
    ner: Arc<dyn NerModel>,
}

impl CoreState {
    /// State backed by a drug CSV and no NER model.
    pub fn from_csv(path: impl Into<PathBuf>) -> Self {
        Self {
            drugs: DrugRegistry::from_csv(path),
            parser: PrescriptionParser::default(),
            ner: Arc::new(UnavailableNer),
        }
    }

    /// State with a fixed drug set and no reload source.
    pub fn with_drugs(set: DrugReferenceSet) -> Self {
        Self {
            drugs: DrugRegistry::from_set(set),
            parser: PrescriptionParser::default(),
            ner: Arc::new(UnavailableNer),
        }
    }

    pub fn with_ner(mut self, ner: Arc<dyn NerModel>) -> Self {
        self.ner = ner;
        self
    }

    pub fn drugs(&self) -> &DrugRegistry {
        &self.drugs
    }

    /// Parse with the default model against the current drug snapshot.
    pub fn parse(&self, text: &str) -> Result<Option<ParseResult>, CoreError> {
        self.parse_with(text, self.ner.as_ref())
    }

    /// Parse with an explicit model against the current drug snapshot.
    pub fn parse_with(
        &self,
        text: &str,
        ner: &dyn NerModel,
    ) -> Result<Option<ParseResult>, CoreError> {
        let drugs = self.drugs.snapshot()?;
        Ok(self.parser.run(text, &drugs, ner))
    }

    /// Re-read the drug CSV. Returns the new name count.
    pub fn reload_drugs(&self) -> Result<usize, CoreError> {
        Ok(self.drugs.reload()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::prescription::{NerEntitySpan, StaticNer};

    #[test]
    fn parse_uses_current_snapshot() {
        let core = CoreState::with_drugs(DrugReferenceSet::from_names(["aspirin"]));
        let result = core.parse("Aspirin 75mg").unwrap().unwrap();
        assert!(result.medicines.contains("aspirin"));

        core.drugs()
            .replace(DrugReferenceSet::from_names(["codeine"]))
            .unwrap();
        let result = core.parse("Aspirin 75mg").unwrap().unwrap();
        assert!(result.medicines.is_empty());
    }

    #[test]
    fn default_model_is_unavailable_but_not_fatal() {
        let core = CoreState::with_drugs(DrugReferenceSet::from_names(["aspirin"]));
        let result = core.parse("Aspirin 75mg\nonce daily").unwrap().unwrap();
        assert!(result.items[0].instructions.is_empty());
    }

    #[test]
    fn configured_model_is_used() {
        let ner = StaticNer(vec![NerEntitySpan {
            label: "STRENGTH".into(),
            text: "75mg".into(),
            start: 8,
            end: 12,
            confidence: 1.0,
        }]);
        let core = CoreState::with_drugs(DrugReferenceSet::from_names(["aspirin"]))
            .with_ner(Arc::new(ner));
        let result = core.parse("Aspirin 75mg").unwrap().unwrap();
        assert_eq!(result.items[0].strength, vec!["75mg"]);
    }

    #[test]
    fn reload_without_csv_is_an_error() {
        let core = CoreState::with_drugs(DrugReferenceSet::default());
        assert!(matches!(
            core.reload_drugs(),
            Err(CoreError::Reference(ReferenceError::NoSource))
        ));
    }
}
