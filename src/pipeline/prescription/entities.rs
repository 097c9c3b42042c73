//! NER entity model and the external collaborator seams.
//!
//! The NER model and OCR engine live outside this crate; they are reached
//! through [`NerModel`] and [`OcrEngine`] so the pipeline can be driven by
//! any backend (or by pre-computed spans supplied over the API).

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::tables::QUANTITY_CONFIDENCE;
use super::types::QuantityCandidate;
use super::PipelineError;

/// Clinical entity labels. Declaration order is the bucket order in output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NerLabel {
    Dosage,
    Drug,
    Duration,
    Form,
    Frequency,
    Route,
    Strength,
    Quantity,
}

impl NerLabel {
    pub const ALL: [NerLabel; 8] = [
        Self::Dosage,
        Self::Drug,
        Self::Duration,
        Self::Form,
        Self::Frequency,
        Self::Route,
        Self::Strength,
        Self::Quantity,
    ];
}

impl FromStr for NerLabel {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DOSAGE" => Ok(Self::Dosage),
            "DRUG" => Ok(Self::Drug),
            "DURATION" => Ok(Self::Duration),
            "FORM" => Ok(Self::Form),
            "FREQUENCY" => Ok(Self::Frequency),
            "ROUTE" => Ok(Self::Route),
            "STRENGTH" => Ok(Self::Strength),
            "QUANTITY" => Ok(Self::Quantity),
            _ => Err(PipelineError::UnknownLabel(s.to_string())),
        }
    }
}

/// Raw span as produced by the NER model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NerEntitySpan {
    pub label: String,
    pub text: String,
    #[serde(default)]
    pub start: usize,
    #[serde(default)]
    pub end: usize,
    #[serde(default = "default_confidence")]
    pub confidence: f32,
}

fn default_confidence() -> f32 {
    1.0
}

/// Entity placed in a label bucket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntityRecord {
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub confidence: f32,
    /// Parsed count, set only for locally extracted quantities.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u64>,
}

/// Entities grouped by label. Every label is present, possibly empty.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(transparent)]
pub struct EntityBuckets(BTreeMap<NerLabel, Vec<EntityRecord>>);

impl Default for EntityBuckets {
    fn default() -> Self {
        Self(NerLabel::ALL.iter().map(|l| (*l, Vec::new())).collect())
    }
}

impl EntityBuckets {
    /// Bucket raw spans by label. Spans with unknown labels are dropped.
    pub fn from_spans(spans: impl IntoIterator<Item = NerEntitySpan>) -> Self {
        let mut buckets = Self::default();
        for span in spans {
            match span.label.parse::<NerLabel>() {
                Ok(label) => buckets.push(
                    label,
                    EntityRecord {
                        text: span.text,
                        start: span.start,
                        end: span.end,
                        confidence: span.confidence,
                        number: None,
                    },
                ),
                Err(e) => tracing::debug!(error = %e, "Ignoring NER span"),
            }
        }
        buckets
    }

    pub fn push(&mut self, label: NerLabel, record: EntityRecord) {
        self.0.entry(label).or_default().push(record);
    }

    /// Fold locally extracted quantities into the QUANTITY bucket.
    pub fn add_quantities(&mut self, quantities: &[QuantityCandidate]) {
        for q in quantities {
            self.push(
                NerLabel::Quantity,
                EntityRecord {
                    text: q.text.clone(),
                    start: q.start,
                    end: q.end,
                    confidence: QUANTITY_CONFIDENCE,
                    number: Some(q.number),
                },
            );
        }
    }

    pub fn get(&self, label: NerLabel) -> &[EntityRecord] {
        self.0.get(&label).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (NerLabel, &[EntityRecord])> {
        self.0.iter().map(|(l, v)| (*l, v.as_slice()))
    }

    pub fn total(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}

// ═══════════════════════════════════════════
// Collaborator traits
// ═══════════════════════════════════════════

/// Medical named-entity recognizer.
pub trait NerModel: Send + Sync {
    fn infer(&self, text: &str) -> Result<Vec<NerEntitySpan>, PipelineError>;
}

/// Image-to-text engine. Preprocessing is the implementor's concern.
pub trait OcrEngine: Send + Sync {
    fn image_to_text(&self, image_bytes: &[u8]) -> Result<String, PipelineError>;
}

/// Stand-in used when no NER model is loaded.
pub struct UnavailableNer;

impl NerModel for UnavailableNer {
    fn infer(&self, _text: &str) -> Result<Vec<NerEntitySpan>, PipelineError> {
        Err(PipelineError::NerUnavailable)
    }
}

/// Returns spans computed elsewhere (e.g. posted alongside the text).
pub struct StaticNer(pub Vec<NerEntitySpan>);

impl NerModel for StaticNer {
    fn infer(&self, _text: &str) -> Result<Vec<NerEntitySpan>, PipelineError> {
        Ok(self.0.clone())
    }
}
