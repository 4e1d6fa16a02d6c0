//! Procedures performed on a resident.

use super::{GenerationContext, ResidentRef};
use crate::sampling::{fresh_id, pick_code};
use chrono::Duration;
use fhir::clinical::{Encounter, Procedure};
use fhir::datatypes::CodeableConcept;
use fhir::Record;
use rand::seq::SliceRandom;
use rand::Rng;

/// 0–3 procedures. Each ends 15–60 min after it starts and is recorded 5–30 min after the
/// start. When the resident has encounters, each procedure is attached to one of them.
pub fn generate_procedures<R: Rng + ?Sized>(
    resident: &ResidentRef<'_>,
    encounters: &[Record<Encounter>],
    ctx: &GenerationContext<'_>,
    rng: &mut R,
) -> Vec<Record<Procedure>> {
    let count = rng.gen_range(0..=3usize);
    let mut procedures = Vec::with_capacity(count);

    for _ in 0..count {
        let Some(template) = ctx.catalog.procedures.choose(rng) else {
            break;
        };
        let start = ctx.window.full().random_instant(rng);
        let performer = ctx.staff.pick(rng).clone();

        let data = Procedure {
            resident_id: resident.id.to_string(),
            encounter_id: encounters.choose(rng).map(Record::id_string),
            code: CodeableConcept::from_coding(template.coding.clone()),
            status: pick_code(rng),
            category: template.category.clone(),
            performed_start: start,
            performed_end: start + Duration::minutes(rng.gen_range(15..=60)),
            performer_id: performer.id,
            performer_name: performer.name,
            outcome: "successful".to_string(),
            recorded_at: start + Duration::minutes(rng.gen_range(5..=30)),
            created_at: start,
            updated_at: start,
            viewed_at: start,
        };
        procedures.push(Record::new(fresh_id(rng), data));
    }
    procedures
}
