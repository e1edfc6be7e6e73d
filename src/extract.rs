//! Attribute extraction for a single path fragment.

use crate::Options;
use crate::error::FillphaseError;
use crate::model::PathRecord;
use crate::tokenize::{Fragment, normalize_geometry};

/// Fill color used when a path declares none.
pub const DEFAULT_FILL: &str = "#000000";

/// Opacity used when a path declares none or declares an unusable value.
pub const DEFAULT_OPACITY: f64 = 1.0;

/// Build a [`PathRecord`] from one fragment.
///
/// Each attribute is looked up independently. Only the geometry (`d`) is
/// required: a fragment without one, or with a blank one, is reported as
/// [`FillphaseError::MalformedPathElement`] so the caller can skip it.
pub fn extract(fragment: &Fragment<'_>, options: &Options) -> Result<PathRecord, FillphaseError> {
    let geometry = fragment
        .get("d")
        .map(normalize_geometry)
        .filter(|d| !d.is_empty())
        .ok_or(FillphaseError::MalformedPathElement {
            offset: fragment.offset,
        })?;

    let fill_color = fragment
        .get("fill")
        .map(normalize_color)
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_FILL.to_string());

    let opacity = match fragment.get("opacity") {
        Some(raw) => parse_opacity(raw).unwrap_or_else(|| {
            tracing::trace!(offset = fragment.offset, raw, "unusable opacity, using default");
            DEFAULT_OPACITY
        }),
        None => DEFAULT_OPACITY,
    };

    let section_hint = fragment
        .get(&options.hint_attribute)
        .or(if options.comment_markers {
            fragment.marker
        } else {
            None
        })
        .map(str::to_string);

    Ok(PathRecord {
        geometry,
        fill_color,
        opacity,
        section_hint,
    })
}

/// Uppercase a color so that hex comparison is case-insensitive.
pub fn normalize_color(color: &str) -> String {
    color.trim().to_ascii_uppercase()
}

/// Parse an opacity, accepting only finite values within `[0, 1]`.
pub fn parse_opacity(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| (0.0..=1.0).contains(v))
}
