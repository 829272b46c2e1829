//! Extraction of derived identifiers from the composite `dc.identifier`
//! column.
//!
//! The legacy column mixes recording numbers, program numbers, namespaced
//! system identifiers and free-form local identifiers in one multivalued
//! cell. Recording and program numbers get their own columns, namespaced
//! identifiers are dropped (they duplicate the PID space), and everything
//! else is merged into the local-identifier column.

use indexmap::IndexSet;
use lazy_static::lazy_static;
use regex::Regex;

use crate::cell::{join_multi, split_multi};

const RECORDING_NUMBER_MARKER: &str = "Recording Number";
const RECORDING_NUMBER_PREFIX: &str = "Recording Number: ";
const PROGRAM_NUMBER_MARKER: &str = "Program Number";
const PROGRAM_NUMBER_PREFIX: &str = "Program Number: ";
const LOCAL_PREFIX: &str = "local: ";

lazy_static! {
    static ref SYSTEM_IDENTIFIER: Regex = Regex::new(
        r"^(graphics|audio|text|video|compound|revcity|apsrevcity|hsprevcity|lcprevcity|pdf|flatPaperReports|flatPaperImages|conservation|bookTreatmentReports|islandora):.+"
    )
    .unwrap();
}

/// Identifiers split out of one record's `dc.identifier` cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacyIdentifiers {
    /// Pipe-joined recording numbers, prefix stripped
    pub recording_number: String,
    /// Pipe-joined program numbers, prefix stripped
    pub program_number: String,
    /// Deduplicated pipe-joined local identifiers
    pub local: String,
}

/// Whether an identifier belongs to one of the repository's own namespaces.
#[must_use]
pub fn is_system_identifier(atom: &str) -> bool {
    SYSTEM_IDENTIFIER.is_match(atom)
}

/// Split a `dc.identifier` cell and merge its local identifiers into the
/// record's existing local-identifier cell.
///
/// # Examples
///
/// ```
/// use diglib_migrate::identifiers::extract;
///
/// let ids = extract("Recording Number: 12|text:abc|local: xyz", "");
/// assert_eq!(ids.recording_number, "12");
/// assert_eq!(ids.local, "xyz");
/// ```
#[must_use]
pub fn extract(dc_identifier: &str, existing_local: &str) -> LegacyIdentifiers {
    let mut recording = Vec::new();
    let mut program = Vec::new();
    let mut local: IndexSet<&str> = split_multi(existing_local)
        .into_iter()
        .filter(|atom| !atom.is_empty())
        .collect();

    for atom in split_multi(dc_identifier) {
        if atom.contains(RECORDING_NUMBER_MARKER) {
            recording.push(atom.replace(RECORDING_NUMBER_PREFIX, ""));
        } else if atom.contains(PROGRAM_NUMBER_MARKER) {
            program.push(atom.replace(PROGRAM_NUMBER_PREFIX, ""));
        } else if !is_system_identifier(atom) {
            let stripped = atom.strip_prefix(LOCAL_PREFIX).unwrap_or(atom);
            if !stripped.is_empty() {
                local.insert(stripped);
            }
        }
    }

    LegacyIdentifiers {
        recording_number: join_multi(recording),
        program_number: join_multi(program),
        local: join_multi(local),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_number_and_namespace_exclusion() {
        let ids = extract("Recording Number: 12|text:abc|local: xyz", "");
        assert_eq!(ids.recording_number, "12");
        assert_eq!(ids.program_number, "");
        assert_eq!(ids.local, "xyz");
    }

    #[test]
    fn test_program_number() {
        let ids = extract("Program Number: 7|Program Number: 8", "");
        assert_eq!(ids.program_number, "7|8");
        assert_eq!(ids.local, "");
    }

    #[test]
    fn test_merge_with_existing_local_dedupes() {
        let ids = extract("local: xyz|MS 104|audio:5", "MS 104|abc");
        assert_eq!(ids.local, "MS 104|abc|xyz");
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(extract("", ""), LegacyIdentifiers::default());
    }

    #[test]
    fn test_system_identifier_requires_suffix() {
        assert!(is_system_identifier("islandora:root"));
        assert!(is_system_identifier("flatPaperImages:12"));
        assert!(!is_system_identifier("text:"));
        assert!(!is_system_identifier("local text:abc"));
    }
}
