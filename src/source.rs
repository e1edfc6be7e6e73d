//! Reading phase documents from disk.

use std::fs;
use std::path::{Path, PathBuf};

use crate::aggregate::PhaseDocument;
use crate::error::FillphaseError;
use crate::model::Phase;

/// Read one phase document.
///
/// Invalid UTF-8 is replaced rather than rejected, since the scanner only
/// needs the ASCII structure of the markup.
pub fn load_document(phase: Phase, path: &Path) -> Result<PhaseDocument, FillphaseError> {
    match fs::read(path) {
        Ok(bytes) => {
            let text = String::from_utf8_lossy(&bytes).into_owned();
            tracing::debug!(phase = %phase, path = %path.display(), bytes = bytes.len(), "read document");
            Ok(PhaseDocument { phase, text })
        }
        Err(source) => Err(FillphaseError::MissingDocument {
            phase,
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Parse a `PHASE=PATH` pair as given on the command line.
pub fn parse_phase_arg(arg: &str) -> Result<(Phase, PathBuf), FillphaseError> {
    let (phase, path) = arg
        .split_once('=')
        .filter(|(_, path)| !path.is_empty())
        .ok_or_else(|| FillphaseError::InvalidPhase(arg.to_string()))?;
    Ok((Phase::new(phase)?, PathBuf::from(path)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_phase_arg() {
        let (phase, path) = parse_phase_arg("full=mug/MUG FULL.txt").unwrap();
        assert_eq!(phase.as_str(), "full");
        assert_eq!(path, PathBuf::from("mug/MUG FULL.txt"));

        assert!(parse_phase_arg("full").is_err());
        assert!(parse_phase_arg("=a.svg").is_err());
        assert!(parse_phase_arg("full=").is_err());
    }

    #[test]
    fn test_missing_file_reports_phase() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.svg");
        let err = load_document(Phase::new("empty").unwrap(), &path).unwrap_err();
        match err {
            FillphaseError::MissingDocument { phase, path: p, source } => {
                assert_eq!(phase.as_str(), "empty");
                assert_eq!(p, path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.svg");
        fs::write(&path, b"<path d=\"M0 0\" data-section=\"\xff\"/>").unwrap();
        let doc = load_document(Phase::new("x").unwrap(), &path).unwrap();
        assert!(doc.text.starts_with("<path d=\"M0 0\""));
    }
}
