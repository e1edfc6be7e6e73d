//! Viewport (`viewBox`) discovery and canonical selection across phases.

use std::fmt;
use std::str::FromStr;

use crate::error::FillphaseError;
use crate::model::{Phase, PhaseData};
use crate::tokenize::{Tokenizer, normalize_geometry};

/// Viewport used when no document declares one.
pub const DEFAULT_VIEWPORT: &str = "0 0 1696 2528";

/// The `viewBox` of the first `<svg>` element that declares one,
/// whitespace-normalized.
pub fn find_viewport(text: &str) -> Option<String> {
    Tokenizer::for_element(text, "svg").find_map(|fragment| {
        fragment
            .get("viewBox")
            .map(normalize_geometry)
            .filter(|v| !v.is_empty())
    })
}

/// The declared viewport, or `fallback` if there is none.
pub fn read_viewport(text: &str, fallback: &str) -> String {
    find_viewport(text).unwrap_or_else(|| fallback.to_string())
}

/// Which phase supplies the canonical viewport when documents disagree.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewportPolicy {
    /// First phase (in input order) that declares a viewport
    First,
    /// Last phase that declares a viewport
    #[default]
    Last,
    /// A named phase; falls back to `Last` if it declares none
    Phase(Phase),
}

impl FromStr for ViewportPolicy {
    type Err = FillphaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first" => Ok(Self::First),
            "last" => Ok(Self::Last),
            _ => match s.strip_prefix("phase:") {
                Some(id) => Ok(Self::Phase(Phase::new(id)?)),
                None => Err(FillphaseError::InvalidViewportPolicy(s.to_string())),
            },
        }
    }
}

impl fmt::Display for ViewportPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => f.write_str("first"),
            Self::Last => f.write_str("last"),
            Self::Phase(phase) => write!(f, "phase:{phase}"),
        }
    }
}

/// A declared viewport that differs from the canonical one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewportMismatch {
    pub phase: Phase,
    pub declared: String,
    pub canonical: String,
}

impl fmt::Display for ViewportMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "phase '{}' declares viewport \"{}\" but \"{}\" was chosen",
            self.phase, self.declared, self.canonical
        )
    }
}

/// Pick the canonical viewport for a set of processed phases and report
/// every phase that declared something else.
pub fn resolve_viewport(
    phases: &[PhaseData],
    policy: &ViewportPolicy,
    fallback: &str,
) -> (String, Vec<ViewportMismatch>) {
    let declared = || {
        phases
            .iter()
            .filter_map(|p| p.viewport.as_deref().map(|v| (&p.phase, v)))
    };

    let last = || declared().last().map(|(_, v)| v);
    let chosen = match policy {
        ViewportPolicy::First => declared().next().map(|(_, v)| v),
        ViewportPolicy::Last => last(),
        ViewportPolicy::Phase(wanted) => declared()
            .find(|(phase, _)| *phase == wanted)
            .map(|(_, v)| v)
            .or_else(|| {
                tracing::warn!(phase = %wanted, "canonical viewport phase declares no viewport, using last");
                last()
            }),
    };

    let Some(canonical) = chosen else {
        return (fallback.to_string(), Vec::new());
    };

    let mismatches = declared()
        .filter(|(_, v)| *v != canonical)
        .map(|(phase, v)| ViewportMismatch {
            phase: phase.clone(),
            declared: v.to_string(),
            canonical: canonical.to_string(),
        })
        .collect();

    (canonical.to_string(), mismatches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PhaseDataset;

    fn phase(id: &str, viewport: Option<&str>) -> PhaseData {
        PhaseData {
            phase: Phase::new(id).unwrap(),
            paths: PhaseDataset::default(),
            skipped: 0,
            viewport: viewport.map(str::to_string),
        }
    }

    #[test]
    fn test_find_viewport() {
        let svg = r#"<?xml version="1.0"?>
<svg xmlns="http://www.w3.org/2000/svg" viewBox="0  0
    1696 2528" width="100"><path d="M0"/></svg>"#;
        assert_eq!(find_viewport(svg).as_deref(), Some("0 0 1696 2528"));
    }

    #[test]
    fn test_read_viewport_fallback() {
        assert_eq!(read_viewport("<svg><path d=\"M0\"/></svg>", "0 0 1 1"), "0 0 1 1");
        assert_eq!(read_viewport("", DEFAULT_VIEWPORT), DEFAULT_VIEWPORT);
    }

    #[test]
    fn test_viewport_on_path_is_ignored() {
        let svg = r#"<svg><path viewBox="9 9 9 9" d="M0"/><svg viewBox="0 0 5 5"/></svg>"#;
        assert_eq!(find_viewport(svg).as_deref(), Some("0 0 5 5"));
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!("first".parse::<ViewportPolicy>().unwrap(), ViewportPolicy::First);
        assert_eq!("last".parse::<ViewportPolicy>().unwrap(), ViewportPolicy::Last);
        assert_eq!(
            "phase:full".parse::<ViewportPolicy>().unwrap(),
            ViewportPolicy::Phase(Phase::new("full").unwrap())
        );
        assert!("middle".parse::<ViewportPolicy>().is_err());
        assert!("phase:".parse::<ViewportPolicy>().is_err());
    }

    #[test]
    fn test_agreeing_viewports_produce_no_warning() {
        let phases = [phase("a", Some("0 0 10 10")), phase("b", None), phase("c", Some("0 0 10 10"))];
        let (viewport, warnings) = resolve_viewport(&phases, &ViewportPolicy::Last, DEFAULT_VIEWPORT);
        assert_eq!(viewport, "0 0 10 10");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_mismatch_is_reported_and_choice_follows_policy() {
        let phases = [phase("empty", Some("0 0 10 10")), phase("full", Some("0 0 20 20"))];

        let (viewport, warnings) = resolve_viewport(&phases, &ViewportPolicy::Last, DEFAULT_VIEWPORT);
        assert_eq!(viewport, "0 0 20 20");
        assert_eq!(
            warnings,
            [ViewportMismatch {
                phase: Phase::new("empty").unwrap(),
                declared: "0 0 10 10".into(),
                canonical: "0 0 20 20".into(),
            }]
        );

        let (viewport, warnings) = resolve_viewport(&phases, &ViewportPolicy::First, DEFAULT_VIEWPORT);
        assert_eq!(viewport, "0 0 10 10");
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].phase.as_str(), "full");

        let policy = ViewportPolicy::Phase(Phase::new("empty").unwrap());
        let (viewport, _) = resolve_viewport(&phases, &policy, DEFAULT_VIEWPORT);
        assert_eq!(viewport, "0 0 10 10");
    }

    #[test]
    fn test_named_phase_without_viewport_falls_back_to_last() {
        let phases = [phase("empty", Some("1 1 1 1")), phase("full", None)];
        let policy = ViewportPolicy::Phase(Phase::new("full").unwrap());
        let (viewport, warnings) = resolve_viewport(&phases, &policy, DEFAULT_VIEWPORT);
        assert_eq!(viewport, "1 1 1 1");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_no_declarations_use_fallback() {
        let phases = [phase("a", None)];
        let (viewport, warnings) = resolve_viewport(&phases, &ViewportPolicy::First, "0 0 2 2");
        assert_eq!(viewport, "0 0 2 2");
        assert!(warnings.is_empty());
    }
}
