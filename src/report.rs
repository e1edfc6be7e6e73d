//! Palette report: which fill colors a phase uses and how the table
//! classifies them. Meant for authoring classification tables.

use std::collections::BTreeMap;
use std::fmt;

use crate::model::{Category, PhaseData};
use crate::table::ClassificationTable;

/// Paths sharing one fill color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorCount {
    /// Normalized (uppercase) fill color
    pub color: String,
    pub count: usize,
    /// The color set containing this color, `None` if no set does
    pub category: Option<Category>,
}

impl fmt::Display for ColorCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let category = self.category.map_or("unmatched", Category::as_str);
        write!(f, "{:<9} {:>5}  {category}", self.color, self.count)
    }
}

/// Count the fill colors of every extracted path in a phase.
///
/// The category is the color set lookup alone, so a path whose hint
/// overrode its color is still reported under its color's set. Entries are
/// ordered by descending count, then by color.
pub fn color_report(data: &PhaseData, table: &ClassificationTable) -> Vec<ColorCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for (_, records) in data.paths.iter() {
        for record in records {
            *counts.entry(record.fill_color.as_str()).or_default() += 1;
        }
    }

    let mut report: Vec<ColorCount> = counts
        .into_iter()
        .map(|(color, count)| ColorCount {
            color: color.to_string(),
            count,
            category: table.color_category(color),
        })
        .collect();
    report.sort_by(|a, b| b.count.cmp(&a.count));
    report
}
