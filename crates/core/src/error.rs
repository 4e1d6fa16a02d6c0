use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("residents file not found: {}", .0.display())]
    ResidentsFileNotFound(PathBuf),
    #[error("failed to read {path}: {source}", path = path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}", path = path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to create directory {path}: {source}", path = path.display())]
    DirCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to deserialize residents: {0}")]
    Deserialization(#[from] fhir::FhirError),
    #[error("failed to serialize records: {0}")]
    Serialization(serde_json::Error),
    #[error("invalid date window: {0}")]
    InvalidWindow(String),
    #[error("unknown vital code: {0}")]
    UnknownVitalCode(String),
    #[error("staff pool cannot be empty")]
    EmptyStaffPool,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid catalog: {0}")]
    Catalog(String),
}

impl From<lean_uuid::UuidError> for GeneratorError {
    fn from(err: lean_uuid::UuidError) -> Self {
        GeneratorError::InvalidInput(err.to_string())
    }
}

impl From<lean_types::TextError> for GeneratorError {
    fn from(err: lean_types::TextError) -> Self {
        GeneratorError::InvalidInput(err.to_string())
    }
}

pub type GeneratorResult<T> = std::result::Result<T, GeneratorError>;
