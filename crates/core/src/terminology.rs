//! Pipe-delimited SNOMED reference term files.
//!
//! Term files hold one concept per line, `code|display[|...]`. Displays carry SNOMED
//! semantic tags such as `Asthma (disorder)`; every parenthesised annotation is removed.
//! A missing file is not an error: the table is empty and a warning is logged.

use crate::constants::{
    ALLERGY_NAMES_FILE, ALLERGY_REACTIONS_FILE, ALLERGY_SUBSTANCES_FILE, DISORDERS_FILE,
};
use crate::{GeneratorError, GeneratorResult};
use fhir::datatypes::Coding;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// A reaction term together with the severity recorded against it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReactionTerm {
    pub code: String,
    pub display: String,
    pub severity: String,
}

/// Every reference table the generators draw from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReferenceTables {
    pub disorders: Vec<Coding>,
    pub allergy_names: Vec<Coding>,
    pub allergy_reactions: Vec<ReactionTerm>,
    pub allergy_substances: Vec<Coding>,
}

impl ReferenceTables {
    /// Load all tables relative to `dir`.
    pub fn load(dir: &Path) -> GeneratorResult<Self> {
        let tables = Self {
            disorders: load_coded_terms(&dir.join(DISORDERS_FILE))?,
            allergy_names: load_coded_terms(&dir.join(ALLERGY_NAMES_FILE))?,
            allergy_reactions: load_allergy_reactions(&dir.join(ALLERGY_REACTIONS_FILE))?,
            allergy_substances: load_coded_terms(&dir.join(ALLERGY_SUBSTANCES_FILE))?,
        };
        tracing::debug!(
            disorders = tables.disorders.len(),
            allergy_names = tables.allergy_names.len(),
            allergy_reactions = tables.allergy_reactions.len(),
            allergy_substances = tables.allergy_substances.len(),
            "loaded reference tables from {}",
            dir.display()
        );
        Ok(tables)
    }
}

/// Read `code|display` lines into SNOMED codings. Lines with fewer than two fields are skipped.
pub fn load_coded_terms(path: &Path) -> GeneratorResult<Vec<Coding>> {
    let Some(contents) = read_optional(path)? else {
        return Ok(Vec::new());
    };

    Ok(contents
        .lines()
        .filter_map(|line| {
            let parts: Vec<&str> = line.trim().split('|').collect();
            if parts.len() < 2 {
                return None;
            }
            Some(Coding::snomed(parts[0].trim(), &clean_display(parts[1])))
        })
        .collect())
}

/// Read `code|display|severity` lines. Lines with fewer than three fields are skipped.
pub fn load_allergy_reactions(path: &Path) -> GeneratorResult<Vec<ReactionTerm>> {
    let Some(contents) = read_optional(path)? else {
        return Ok(Vec::new());
    };

    Ok(contents
        .lines()
        .filter_map(|line| {
            let parts: Vec<&str> = line.trim().split('|').collect();
            if parts.len() < 3 {
                return None;
            }
            Some(ReactionTerm {
                code: parts[0].trim().to_string(),
                display: clean_display(parts[1]),
                severity: parts[2].trim().to_string(),
            })
        })
        .collect())
}

/// Strip `(...)` annotations and surrounding whitespace.
pub fn clean_display(raw: &str) -> String {
    static ANNOTATION: OnceLock<Regex> = OnceLock::new();
    let annotation =
        ANNOTATION.get_or_init(|| Regex::new(r"\([^)]*\)").expect("static regex is valid"));
    annotation.replace_all(raw, "").trim().to_string()
}

fn read_optional(path: &Path) -> GeneratorResult<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!("reference file {} not found; using an empty table", path.display());
            Ok(None)
        }
        Err(source) => Err(GeneratorError::FileRead {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fhir::datatypes::SNOMED_SYSTEM;
    use tempfile::TempDir;

    #[test]
    fn clean_display_removes_annotations() {
        assert_eq!(clean_display(" Asthma (disorder) "), "Asthma");
        assert_eq!(
            clean_display("Allergy to peanut (finding) (qualifier)"),
            "Allergy to peanut"
        );
        assert_eq!(clean_display("Rash"), "Rash");
    }

    #[test]
    fn loads_coded_terms_and_skips_short_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("disorders.txt");
        std::fs::write(
            &path,
            "38341003|Hypertensive disorder (disorder)\nnot-a-term\n\n195967001|Asthma|extra\n",
        )
        .unwrap();

        let terms = load_coded_terms(&path).unwrap();
        assert_eq!(terms.len(), 2);
        assert_eq!(terms[0].system, SNOMED_SYSTEM);
        assert_eq!(terms[0].code.as_deref(), Some("38341003"));
        assert_eq!(terms[0].display, "Hypertensive disorder");
        assert_eq!(terms[1].display, "Asthma");
    }

    #[test]
    fn reactions_need_a_severity() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reaction.txt");
        std::fs::write(&path, "271807003|Eruption of skin (disorder)|mild\n39579001|Anaphylaxis\n")
            .unwrap();

        let reactions = load_allergy_reactions(&path).unwrap();
        assert_eq!(
            reactions,
            vec![ReactionTerm {
                code: "271807003".into(),
                display: "Eruption of skin".into(),
                severity: "mild".into(),
            }]
        );
    }

    #[test]
    fn missing_files_yield_empty_tables() {
        let dir = TempDir::new().unwrap();
        let tables = ReferenceTables::load(dir.path()).unwrap();
        assert_eq!(tables, ReferenceTables::default());
    }

    #[test]
    fn unreadable_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("binary.txt");
        std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();
        assert!(matches!(
            load_coded_terms(&path),
            Err(GeneratorError::FileRead { .. })
        ));
    }
}
