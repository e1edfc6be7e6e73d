//! fillphase - SVG path extraction for multi-phase fill animations
//!
//! fillphase scans the path elements out of one markup document per
//! animation phase, classifies each path as glass, liquid, foam or notch,
//! and assembles an ordered per-phase dataset with one canonical viewport.

mod aggregate;
mod classify;
mod error;
mod extract;
mod model;
mod report;
mod source;
mod table;
mod tokenize;
mod viewport;

use std::path::PathBuf;

pub use aggregate::*;
pub use classify::*;
pub use error::*;
pub use extract::*;
pub use model::*;
pub use report::*;
pub use source::*;
pub use table::*;
pub use tokenize::*;
pub use viewport::*;

/// Classify the paths of a single document with default settings.
pub fn classify_document(phase: Phase, text: &str, table: &ClassificationTable) -> PhaseData {
    aggregate_phase(phase, text, table, &Options::default())
}

/// Read and process one file per phase.
///
/// Unreadable files are reported in [`Extraction::errors`]; every other
/// phase is still processed.
pub fn extract_files(
    inputs: &[(Phase, PathBuf)],
    table: &ClassificationTable,
    options: &Options,
) -> Extraction {
    let documents = inputs
        .iter()
        .map(|(phase, path)| load_document(phase.clone(), path));
    build_dataset(documents, table, options)
}

/// Extraction options.
#[derive(Debug, Clone)]
pub struct Options {
    /// Attribute holding the explicit semantic hint (default: `data-section`)
    pub hint_attribute: String,
    /// Use `<!-- [TAG] -->` comment markers as hints for paths without one
    pub comment_markers: bool,
    /// Which phase supplies the canonical viewport
    pub viewport_policy: ViewportPolicy,
    /// Viewport used when no document declares one
    pub fallback_viewport: String,
    /// Process documents on the rayon thread pool
    pub parallel: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            hint_attribute: "data-section".to_string(),
            comment_markers: false,
            viewport_policy: ViewportPolicy::default(),
            fallback_viewport: DEFAULT_VIEWPORT.to_string(),
            parallel: false,
        }
    }
}
