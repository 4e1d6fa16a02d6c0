//! FHIR-aligned data model for the assisted-living demo data.
//!
//! This crate provides the **stored document shapes** the generators emit:
//! - general datatypes (`Coding`, `CodeableConcept`, `Period`, `Money`, timing)
//! - closed value sets as enums ([`vocab`])
//! - clinical, financial and administrative payloads
//! - the resident input model
//!
//! Shapes follow the app's snake_case documents rather than FHIR JSON. Every stored
//! document is a [`Record`] of `{ id, data }`.

pub mod administrative;
pub mod clinical;
pub mod datatypes;
pub mod financial;
pub mod instant;
pub mod record;
pub mod resident;
pub mod vocab;

pub use record::Record;
pub use resident::{Resident, ResidentData};
pub use vocab::Vocabulary;

pub use administrative::{Address, Identifier};
pub use clinical::{
    Allergy, CarePlan, CarePlanActivity, DiagnosticHistory, Encounter, EpisodeOfCare, Goal,
    Observation, Prescription, PrescriptionAdministration, Procedure, Task,
};
pub use datatypes::{CodeableConcept, Coding, Money, Period};
pub use financial::{Account, Adjustment, Charge, Claim, Coverage, Payment};

pub use lean_uuid::RecordId;

/// Errors returned by the `fhir` crate.
#[derive(Debug, thiserror::Error)]
pub enum FhirError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("translation error: {0}")]
    Translation(String),
}

/// Type alias for Results that can fail with a [`FhirError`].
pub type FhirResult<T> = Result<T, FhirError>;
