//! Drug-name reference set, its CSV loader, and the swappable registry.
//!
//! Parses read an `Arc` snapshot of the current set. A reload builds a
//! fresh set from the source file and replaces the `Arc` under a single
//! write lock, so a parse in flight keeps the snapshot it started with.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use thiserror::Error;

use super::tables::DRUG_NAME_COLUMNS;

#[derive(Error, Debug)]
pub enum ReferenceError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("No drug name column found. Available columns: {available:?}")]
    MissingColumn { available: Vec<String> },

    #[error("Drug registry has no source file configured")]
    NoSource,

    #[error("Drug registry lock poisoned")]
    LockPoisoned,
}

// ═══════════════════════════════════════════
// Reference set
// ═══════════════════════════════════════════

/// Immutable set of known drug names, lowercase and trimmed.
#[derive(Debug, Clone, Default)]
pub struct DrugReferenceSet {
    names: HashSet<String>,
    generation: u64,
}

impl DrugReferenceSet {
    /// Build from arbitrary names. Names are lowercased and trimmed;
    /// blank names are dropped.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = names
            .into_iter()
            .map(|n| n.as_ref().trim().to_lowercase())
            .filter(|n| !n.is_empty())
            .collect();
        Self {
            names,
            generation: 0,
        }
    }

    /// Exact membership of an already-normalized token.
    pub fn contains(&self, token: &str) -> bool {
        self.names.contains(token)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Registry generation this set was installed under (0 if never installed).
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

// ═══════════════════════════════════════════
// CSV loader
// ═══════════════════════════════════════════

/// Load drug names from a CSV file.
///
/// The first header matching one of [`DRUG_NAME_COLUMNS`] is used.
pub fn load_drug_csv(path: &Path) -> Result<DrugReferenceSet, ReferenceError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;

    let headers = reader.headers()?.clone();
    let column = DRUG_NAME_COLUMNS
        .iter()
        .find_map(|candidate| headers.iter().position(|h| h == *candidate))
        .ok_or_else(|| ReferenceError::MissingColumn {
            available: headers.iter().map(str::to_string).collect(),
        })?;

    let mut names = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(value) = record.get(column) {
            names.push(value.to_string());
        }
    }

    let set = DrugReferenceSet::from_names(names);
    tracing::debug!(path = %path.display(), count = set.len(), "Loaded drug reference CSV");
    Ok(set)
}

/// Load drug names, degrading any failure to an empty set.
pub fn load_or_empty(path: &Path) -> DrugReferenceSet {
    match load_drug_csv(path) {
        Ok(set) => set,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Drug reference unavailable, using empty set");
            DrugReferenceSet::default()
        }
    }
}

// ═══════════════════════════════════════════
// Registry
// ═══════════════════════════════════════════

/// Holds the current drug reference snapshot.
pub struct DrugRegistry {
    current: RwLock<Arc<DrugReferenceSet>>,
    source: Option<PathBuf>,
}

impl DrugRegistry {
    /// Registry backed by a CSV file, loaded immediately.
    pub fn from_csv(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut initial = load_or_empty(&path);
        initial.generation = 1;
        tracing::info!(count = initial.len(), "Drug reference set loaded");
        Self {
            current: RwLock::new(Arc::new(initial)),
            source: Some(path),
        }
    }

    /// Registry with a fixed in-memory set and no reload source.
    pub fn from_set(mut set: DrugReferenceSet) -> Self {
        set.generation = 1;
        Self {
            current: RwLock::new(Arc::new(set)),
            source: None,
        }
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Consistent snapshot for one parse.
    pub fn snapshot(&self) -> Result<Arc<DrugReferenceSet>, ReferenceError> {
        let guard = self.current.read().map_err(|_| ReferenceError::LockPoisoned)?;
        Ok(Arc::clone(&guard))
    }

    /// Install a new set, returning its generation.
    pub fn replace(&self, mut set: DrugReferenceSet) -> Result<u64, ReferenceError> {
        let mut guard = self.current.write().map_err(|_| ReferenceError::LockPoisoned)?;
        set.generation = guard.generation + 1;
        let generation = set.generation;
        *guard = Arc::new(set);
        Ok(generation)
    }

    /// Re-read the source file and swap it in. Returns the new name count.
    ///
    /// The file is read before the write lock is taken.
    pub fn reload(&self) -> Result<usize, ReferenceError> {
        let path = self.source.as_deref().ok_or(ReferenceError::NoSource)?;
        let set = load_or_empty(path);
        let count = set.len();
        let generation = self.replace(set)?;
        tracing::info!(count, generation, "Drug reference set reloaded");
        Ok(count)
    }
}
