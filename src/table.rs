//! Classification table: the authored color sets and hint substrings.
//!
//! The table is plain data loaded from JSON:
//!
//! ```json
//! {
//!   "version": 1,
//!   "hints":  { "foam": ["schiuma"], "liquid": ["liquido"], "notch": ["tacchett"], "glass": ["vetro"] },
//!   "colors": { "foam": ["#F7EFC1"], "liquid": ["#E58B06"], "notch": ["#951D08"], "glass": ["#FDFDFD"] }
//! }
//! ```
//!
//! Loading validates it eagerly. A color listed under two categories is
//! rejected, since it would make color classification depend on rule order.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::FillphaseError;
use crate::extract::normalize_color;
use crate::model::Category;

/// Table format version understood by this crate.
pub const TABLE_VERSION: u32 = 1;

const BUILTIN_TABLE: &str = include_str!("../tables/default.json");

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TableFile {
    version: u32,
    #[serde(default)]
    hints: CategorySets,
    #[serde(default)]
    colors: CategorySets,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct CategorySets {
    glass: Vec<String>,
    liquid: Vec<String>,
    foam: Vec<String>,
    notch: Vec<String>,
}

impl CategorySets {
    fn get(&self, category: Category) -> &[String] {
        match category {
            Category::Glass => &self.glass,
            Category::Liquid => &self.liquid,
            Category::Foam => &self.foam,
            Category::Notch => &self.notch,
        }
    }
}

/// Validated classification configuration.
#[derive(Debug, Clone)]
pub struct ClassificationTable {
    version: u32,
    /// Lowercase hint substrings per category
    hints: HashMap<Category, Vec<String>>,
    /// Uppercase color to the single category that owns it
    colors: HashMap<String, Category>,
}

impl ClassificationTable {
    /// The versioned default table shipped with the crate.
    pub fn builtin() -> Result<Self, FillphaseError> {
        Self::from_json(BUILTIN_TABLE)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FillphaseError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, FillphaseError> {
        let file: TableFile = serde_json::from_str(json)?;
        Self::validate(file)
    }

    fn validate(file: TableFile) -> Result<Self, FillphaseError> {
        if file.version != TABLE_VERSION {
            return Err(FillphaseError::UnsupportedTableVersion(file.version));
        }

        let mut hints = HashMap::new();
        for category in Category::ALL {
            let mut substrings = Vec::new();
            for hint in file.hints.get(category) {
                let hint = hint.trim().to_lowercase();
                if hint.is_empty() {
                    return Err(FillphaseError::EmptyHint(category));
                }
                if !substrings.contains(&hint) {
                    substrings.push(hint);
                }
            }
            hints.insert(category, substrings);
        }

        let mut colors: HashMap<String, Category> = HashMap::new();
        for category in Category::ALL {
            for raw in file.colors.get(category) {
                let color = normalize_color(raw);
                if !is_hex_color(&color) {
                    return Err(FillphaseError::InvalidColor {
                        category,
                        value: raw.clone(),
                    });
                }
                match colors.get(&color) {
                    Some(&first) if first != category => {
                        return Err(FillphaseError::ConflictingColorConfiguration {
                            color,
                            first,
                            second: category,
                        });
                    }
                    Some(_) => {}
                    None => {
                        colors.insert(color, category);
                    }
                }
            }
        }

        tracing::debug!(
            version = file.version,
            colors = colors.len(),
            "loaded classification table"
        );

        Ok(Self {
            version: file.version,
            hints,
            colors,
        })
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Hint substrings for a category, lowercase.
    pub fn hints(&self, category: Category) -> &[String] {
        self.hints
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The category whose color set contains `color`. Case and surrounding
    /// whitespace are ignored.
    pub fn color_category(&self, color: &str) -> Option<Category> {
        self.colors.get(&normalize_color(color)).copied()
    }
}

fn is_hex_color(color: &str) -> bool {
    color.strip_prefix('#').is_some_and(|hex| {
        matches!(hex.len(), 3 | 4 | 6 | 8) && hex.bytes().all(|b| b.is_ascii_hexdigit())
    })
}
