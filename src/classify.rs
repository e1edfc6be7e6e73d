//! Semantic classification of extracted paths.

use crate::model::{Category, PathRecord};
use crate::table::ClassificationTable;

/// Order in which hint substrings are tested. The first category with a
/// matching substring wins.
pub const HINT_PRIORITY: [Category; 4] = [
    Category::Foam,
    Category::Liquid,
    Category::Notch,
    Category::Glass,
];

/// Assign a category from an optional hint and a fill color. The color is
/// compared case-insensitively.
///
/// A recognized hint always decides, whatever the color. Otherwise the
/// color's set membership decides, and anything unrecognized is treated
/// as glass so that no visual content is dropped.
pub fn classify(hint: Option<&str>, fill_color: &str, table: &ClassificationTable) -> Category {
    if let Some(category) = hint.and_then(|hint| classify_hint(hint, table)) {
        return category;
    }

    table
        .color_category(fill_color)
        .unwrap_or(Category::Glass)
}

/// Classify an extracted record.
pub fn classify_record(record: &PathRecord, table: &ClassificationTable) -> Category {
    classify(record.section_hint.as_deref(), &record.fill_color, table)
}

fn classify_hint(hint: &str, table: &ClassificationTable) -> Option<Category> {
    let hint = hint.to_lowercase();
    HINT_PRIORITY.into_iter().find(|&category| {
        table
            .hints(category)
            .iter()
            .any(|substring| hint.contains(substring.as_str()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ClassificationTable {
        ClassificationTable::builtin().unwrap()
    }

    #[test]
    fn test_foam_color_without_hint() {
        assert_eq!(classify(None, "#F7EFC1", &table()), Category::Foam);
    }

    #[test]
    fn test_color_match_ignores_case() {
        let table = table();
        assert_eq!(classify(None, "#f7efc1", &table), Category::Foam);
        assert_eq!(classify(None, "#e58b06", &table), Category::Liquid);
    }

    #[test]
    fn test_hint_overrides_unknown_color() {
        assert_eq!(
            classify(Some("liquido_arancione"), "#123456", &table()),
            Category::Liquid
        );
    }

    #[test]
    fn test_unknown_color_defaults_to_glass() {
        assert_eq!(classify(None, "#AAAAAA", &table()), Category::Glass);
    }

    #[test]
    fn test_hint_overrides_conflicting_color() {
        let table = table();
        // A foam-colored path explicitly tagged as notch stays a notch.
        assert_eq!(classify(Some("tacchette_rosse"), "#F7EFC1", &table), Category::Notch);
        assert_eq!(classify(Some("VETRO_BOCCALE"), "#E58B06", &table), Category::Glass);
    }

    #[test]
    fn test_hint_priority_order() {
        let table = table();
        assert_eq!(classify(Some("glass_liquid_foam"), "#000000", &table), Category::Foam);
        assert_eq!(classify(Some("notch-liquid"), "#000000", &table), Category::Liquid);
        assert_eq!(classify(Some("glass notch"), "#000000", &table), Category::Notch);
    }

    #[test]
    fn test_unrecognized_hint_falls_through_to_color() {
        let table = table();
        assert_eq!(classify(Some("maniglia"), "#951D08", &table), Category::Notch);
        assert_eq!(classify(Some(""), "#E58B06", &table), Category::Liquid);
        assert_eq!(classify(Some("maniglia"), "#ABCDEF", &table), Category::Glass);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let table = table();
        let inputs = [
            (None, "#F7EFC1"),
            (Some("schiuma_beige"), "#000000"),
            (Some("unknown"), "#FDFDFD"),
            (None, "#123456"),
        ];
        for (hint, color) in inputs {
            let first = classify(hint, color, &table);
            for _ in 0..10 {
                assert_eq!(classify(hint, color, &table), first);
            }
        }
    }

    #[test]
    fn test_classify_record() {
        let record = PathRecord {
            geometry: "M0 0".into(),
            fill_color: "#E58B06".into(),
            opacity: 1.0,
            section_hint: Some("Schiuma_Bordo".into()),
        };
        assert_eq!(classify_record(&record, &table()), Category::Foam);
    }
}
