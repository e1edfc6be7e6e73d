//! Per-phase aggregation and multi-phase dataset assembly.

use std::collections::HashSet;

use rayon::prelude::*;

use crate::Options;
use crate::classify::classify_record;
use crate::error::FillphaseError;
use crate::extract::extract;
use crate::model::{Category, Dataset, Phase, PhaseData, PhaseDataset};
use crate::table::ClassificationTable;
use crate::tokenize::Tokenizer;
use crate::viewport::{ViewportMismatch, find_viewport, resolve_viewport};

/// The full text of one phase's source document.
#[derive(Debug, Clone)]
pub struct PhaseDocument {
    pub phase: Phase,
    pub text: String,
}

impl PhaseDocument {
    pub fn new(phase: Phase, text: impl Into<String>) -> Self {
        Self {
            phase,
            text: text.into(),
        }
    }
}

/// Outcome of a multi-phase run.
///
/// Phases that could be processed are always present in `dataset`; phases
/// that failed are listed in `errors` instead.
#[derive(Debug)]
pub struct Extraction {
    pub dataset: Dataset,
    pub errors: Vec<FillphaseError>,
    pub warnings: Vec<ViewportMismatch>,
}

impl Extraction {
    /// True when every requested phase was processed.
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }

    /// Path elements skipped across all phases.
    pub fn skipped(&self) -> usize {
        self.dataset.phases.iter().map(|p| p.skipped).sum()
    }
}

/// Tokenize, extract and classify one document.
///
/// Malformed path elements are dropped and counted in
/// [`PhaseData::skipped`]; they never abort the phase.
#[tracing::instrument(skip_all, fields(phase = %phase))]
pub fn aggregate_phase(
    phase: Phase,
    text: &str,
    table: &ClassificationTable,
    options: &Options,
) -> PhaseData {
    let mut paths = PhaseDataset::default();
    let mut skipped = 0;

    for fragment in Tokenizer::new(text).with_markers(options.comment_markers) {
        match extract(&fragment, options) {
            Ok(record) => {
                let category = classify_record(&record, table);
                paths.push(category, record);
            }
            Err(err) => {
                tracing::warn!("{err}");
                skipped += 1;
            }
        }
    }

    let viewport = find_viewport(text);

    tracing::debug!(
        glass = paths.get(Category::Glass).len(),
        liquid = paths.get(Category::Liquid).len(),
        foam = paths.get(Category::Foam).len(),
        notch = paths.get(Category::Notch).len(),
        skipped,
        viewport = viewport.as_deref(),
        "classified phase"
    );

    PhaseData {
        phase,
        paths,
        skipped,
        viewport,
    }
}

/// Process every document independently and combine the results.
///
/// Documents that failed to load are passed in as errors and reported back
/// in [`Extraction::errors`] without affecting the other phases. A phase
/// identifier seen twice keeps its first document.
pub fn build_dataset<I>(documents: I, table: &ClassificationTable, options: &Options) -> Extraction
where
    I: IntoIterator<Item = Result<PhaseDocument, FillphaseError>>,
{
    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    let mut accepted = Vec::new();

    for document in documents {
        match document {
            Ok(document) if seen.contains(&document.phase) => {
                tracing::error!(phase = %document.phase, "duplicate phase ignored");
                errors.push(FillphaseError::DuplicatePhase(document.phase));
            }
            Ok(document) => {
                seen.insert(document.phase.clone());
                accepted.push(document);
            }
            Err(err) => {
                tracing::error!("{err}");
                errors.push(err);
            }
        }
    }

    let process =
        |doc: &PhaseDocument| aggregate_phase(doc.phase.clone(), &doc.text, table, options);
    let phases: Vec<PhaseData> = if options.parallel {
        accepted.par_iter().map(process).collect()
    } else {
        accepted.iter().map(process).collect()
    };

    let (viewport, warnings) = resolve_viewport(
        &phases,
        &options.viewport_policy,
        &options.fallback_viewport,
    );
    for warning in &warnings {
        tracing::warn!("viewport mismatch: {warning}");
    }

    Extraction {
        dataset: Dataset { viewport, phases },
        errors,
        warnings,
    }
}
