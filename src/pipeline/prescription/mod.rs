//! Prescription reconciliation pipeline.
//!
//! Turns OCR text plus NER spans into one record per medicine:
//! ```text
//! text → normalize → combination + matcher → quantity fold → align → reduce
//! ```
//! OCR and NER run outside this module behind [`OcrEngine`] and [`NerModel`].

pub mod tables;
pub mod types;
pub mod normalize;
pub mod reference;
pub mod entities;
pub mod combination;
pub mod matcher;
pub mod quantity;
pub mod reduce;
pub mod align;
pub mod orchestrator;
pub mod report;

pub use types::*;
pub use entities::*;
pub use normalize::{normalize, Normalizer};
pub use reference::{load_drug_csv, load_or_empty, DrugReferenceSet, DrugRegistry, ReferenceError};
pub use combination::detect_combinations;
pub use matcher::match_medicines;
pub use quantity::extract_quantities;
pub use reduce::{AttributeKind, Deduplicator};
pub use align::align_entities;
pub use orchestrator::PrescriptionParser;
pub use report::render_report;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("OCR processing failed: {0}")]
    Ocr(String),

    #[error("NER model unavailable")]
    NerUnavailable,

    #[error("NER inference failed: {0}")]
    NerInference(String),

    #[error("Unknown entity label: {0}")]
    UnknownLabel(String),
}
