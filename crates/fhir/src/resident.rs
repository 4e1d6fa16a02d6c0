//! Resident input records.
//!
//! Residents are read from the demo `data-plain.json` export. Only a handful of fields are
//! consumed by the generators (`resident_name`, `resident_code`, `avatar_url`); every other
//! field is carried through untouched so that tools which rewrite the file (avatar hashing)
//! do not lose data.

use crate::{FhirError, FhirResult};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Resident {
    pub id: String,
    #[serde(default)]
    pub data: ResidentData,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResidentData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resident_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resident_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Resident {
    /// Trimmed display name, if the resident has a non-blank one.
    pub fn display_name(&self) -> Option<&str> {
        non_blank(self.data.resident_name.as_deref())
    }

    /// Trimmed resident code (MRN value), if present and non-blank.
    pub fn code(&self) -> Option<&str> {
        non_blank(self.data.resident_code.as_deref())
    }

    /// Parse a JSON array of residents.
    ///
    /// Schema mismatches are reported with the path of the failing field, e.g.
    /// `[3].data.resident_name`.
    ///
    /// # Errors
    ///
    /// Returns [`FhirError::Translation`] on a schema mismatch and [`FhirError::InvalidInput`]
    /// if any resident has a blank id.
    pub fn parse_list(json_text: &str) -> FhirResult<Vec<Resident>> {
        let mut deserializer = serde_json::Deserializer::from_str(json_text);

        let residents: Vec<Resident> =
            match serde_path_to_error::deserialize(&mut deserializer) {
                Ok(parsed) => parsed,
                Err(err) => {
                    let path = err.path().to_string();
                    let source = err.into_inner();
                    let path = if path.is_empty() || path == "." {
                        "<root>"
                    } else {
                        path.as_str()
                    };
                    return Err(FhirError::Translation(format!(
                        "Resident schema mismatch at {path}: {source}"
                    )));
                }
            };

        if let Some(index) = residents.iter().position(|r| r.id.trim().is_empty()) {
            return Err(FhirError::InvalidInput(format!(
                "resident at index {index} has an empty id"
            )));
        }

        Ok(residents)
    }

    /// Render residents as a 2-space indented JSON array.
    pub fn render_list(residents: &[Resident]) -> FhirResult<String> {
        serde_json::to_string_pretty(residents).map_err(FhirError::from)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
