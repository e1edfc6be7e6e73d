//! Classified path data model.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::FillphaseError;

/// Semantic role of a path in the composite illustration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Structural vessel (outline, highlights, background)
    Glass,
    /// Fluid body
    Liquid,
    /// Surface foam
    Foam,
    /// Graduation markers
    Notch,
}

impl Category {
    /// All categories in draw order.
    pub const ALL: [Category; 4] = [
        Category::Glass,
        Category::Liquid,
        Category::Foam,
        Category::Notch,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Glass => "glass",
            Category::Liquid => "liquid",
            Category::Foam => "foam",
            Category::Notch => "notch",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of one stage of the fill animation (e.g. "empty", "full").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Phase(String);

impl Phase {
    pub fn new(id: impl Into<String>) -> Result<Self, FillphaseError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(FillphaseError::InvalidPhase(id));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One classified drawable unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathRecord {
    /// Draw-command data, whitespace-normalized but otherwise untouched
    #[serde(rename = "d")]
    pub geometry: String,
    /// Uppercase hex color, `#000000` when the source had none
    #[serde(rename = "fill")]
    pub fill_color: String,
    /// Always within `[0, 1]`
    pub opacity: f64,
    /// Explicit semantic tag from the source, verbatim
    #[serde(rename = "section", skip_serializing_if = "Option::is_none")]
    pub section_hint: Option<String>,
}

/// Classified paths of a single phase, grouped by category in source order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PhaseDataset {
    pub glass: Vec<PathRecord>,
    pub liquid: Vec<PathRecord>,
    pub foam: Vec<PathRecord>,
    pub notch: Vec<PathRecord>,
}

impl PhaseDataset {
    pub fn get(&self, category: Category) -> &[PathRecord] {
        match category {
            Category::Glass => &self.glass,
            Category::Liquid => &self.liquid,
            Category::Foam => &self.foam,
            Category::Notch => &self.notch,
        }
    }

    /// Append a record to the end of its category.
    pub fn push(&mut self, category: Category, record: PathRecord) {
        let group = match category {
            Category::Glass => &mut self.glass,
            Category::Liquid => &mut self.liquid,
            Category::Foam => &mut self.foam,
            Category::Notch => &mut self.notch,
        };
        group.push(record);
    }

    /// Total number of records across all categories.
    pub fn len(&self) -> usize {
        Category::ALL.iter().map(|&c| self.get(c).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over `(category, records)` in draw order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[PathRecord])> {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}

/// Result of processing one phase document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseData {
    #[serde(skip)]
    pub phase: Phase,
    #[serde(flatten)]
    pub paths: PhaseDataset,
    /// Path elements dropped for lacking geometry
    pub skipped: usize,
    /// Viewport declared by this document, if any
    #[serde(skip)]
    pub viewport: Option<String>,
}

/// The multi-phase dataset handed to downstream consumers.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Canonical viewport shared by every phase
    pub viewport: String,
    /// Phases in input order
    pub phases: Vec<PhaseData>,
}

impl Dataset {
    pub fn phase(&self, phase: &str) -> Option<&PhaseData> {
        self.phases.iter().find(|p| p.phase.as_str() == phase)
    }
}

impl Serialize for Dataset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Phases<'a>(&'a [PhaseData]);

        impl Serialize for Phases<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(self.0.len()))?;
                for data in self.0 {
                    map.serialize_entry(data.phase.as_str(), data)?;
                }
                map.end()
            }
        }

        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("viewport", &self.viewport)?;
        map.serialize_entry("phases", &Phases(&self.phases))?;
        map.end()
    }
}
