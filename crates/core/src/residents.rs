//! Resident input loading.

use crate::{GeneratorError, GeneratorResult};
use fhir::Resident;
use std::path::Path;

/// Read the residents JSON array at `path`.
///
/// # Errors
///
/// - [`GeneratorError::ResidentsFileNotFound`] if the file does not exist.
/// - [`GeneratorError::FileRead`] for other I/O failures.
/// - [`GeneratorError::Deserialization`] if the JSON does not match the resident schema.
pub fn load_residents(path: &Path) -> GeneratorResult<Vec<Resident>> {
    let text = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            GeneratorError::ResidentsFileNotFound(path.to_path_buf())
        } else {
            GeneratorError::FileRead {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let residents = Resident::parse_list(&text)?;
    tracing::info!("loaded {} residents from {}", residents.len(), path.display());
    Ok(residents)
}
