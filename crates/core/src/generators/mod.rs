//! Per-resident record generators.
//!
//! Every generator is a function of the resident, a shared [`GenerationContext`] and an
//! injected RNG. Generators that link to parent records take the parents as arguments, so
//! callers must run them in dependency order.

pub mod administrative;
pub mod allergies;
pub mod care_plans;
pub mod diagnostics;
pub mod encounters;
pub mod episodes;
pub mod financials;
pub mod observations;
pub mod prescriptions;
pub mod procedures;

use crate::catalog::Catalog;
use crate::staff::StaffPool;
use crate::terminology::ReferenceTables;
use crate::window::GenerationWindow;
use fhir::datatypes::Subject;
use fhir::Resident;

/// Inputs shared by every generator for one run.
#[derive(Clone, Copy, Debug)]
pub struct GenerationContext<'a> {
    pub staff: &'a StaffPool,
    pub window: &'a GenerationWindow,
    pub catalog: &'a Catalog,
    pub tables: &'a ReferenceTables,
    pub organisation: &'a str,
    pub currency: &'a str,
}

/// The resident fields generators read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResidentRef<'a> {
    pub id: &'a str,
    /// Display name; the id when the resident has no name.
    pub name: &'a str,
    pub code: Option<&'a str>,
}

impl<'a> ResidentRef<'a> {
    pub fn from_resident(resident: &'a Resident) -> Self {
        let name = match resident.display_name() {
            Some(name) => name,
            None => {
                tracing::warn!(resident_id = %resident.id, "resident has no name; using id");
                resident.id.as_str()
            }
        };

        Self {
            id: resident.id.as_str(),
            name,
            code: resident.code(),
        }
    }

    pub fn subject(&self) -> Subject {
        Subject {
            id: self.id.to_string(),
            name: self.name.to_string(),
        }
    }
}
