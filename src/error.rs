use std::path::PathBuf;

use thiserror::Error;

use crate::model::{Category, Phase};

#[derive(Debug, Error)]
pub enum FillphaseError {
    #[error("Malformed path element at byte {offset}: no geometry attribute")]
    MalformedPathElement { offset: usize },

    #[error("Cannot read document for phase '{phase}' ({}): {source}", .path.display())]
    MissingDocument {
        phase: Phase,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Duplicate phase identifier: {0}")]
    DuplicatePhase(Phase),

    #[error("Color {color} is listed under both {first} and {second}")]
    ConflictingColorConfiguration {
        color: String,
        first: Category,
        second: Category,
    },

    #[error("Invalid color '{value}' in the {category} set")]
    InvalidColor { category: Category, value: String },

    #[error("Empty hint substring in the {0} set")]
    EmptyHint(Category),

    #[error("Unsupported classification table version: {0}")]
    UnsupportedTableVersion(u32),

    #[error("Invalid phase identifier: {0:?}")]
    InvalidPhase(String),

    #[error("Invalid viewport policy '{0}' (expected first, last or phase:<id>)")]
    InvalidViewportPolicy(String),

    #[error("Classification table error: {0}")]
    TableFormat(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
