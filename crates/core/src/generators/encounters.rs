//! Encounters linked to the resident's active episode of care.

use super::{GenerationContext, ResidentRef};
use crate::sampling::{fresh_id, pick_code};
use chrono::Duration;
use fhir::clinical::{Encounter, EpisodeOfCare};
use fhir::datatypes::{CodeableConcept, Period};
use fhir::Record;
use rand::seq::SliceRandom;
use rand::Rng;

/// 1–5 encounters of 1–4 hours each, all pointing at `episode`.
pub fn generate_encounters<R: Rng + ?Sized>(
    resident: &ResidentRef<'_>,
    episode: &Record<EpisodeOfCare>,
    ctx: &GenerationContext<'_>,
    rng: &mut R,
) -> Vec<Record<Encounter>> {
    let count = rng.gen_range(1..=5usize);
    let mut encounters = Vec::with_capacity(count);

    for _ in 0..count {
        let Some(encounter_type) = ctx.catalog.encounter_types.choose(rng) else {
            break;
        };
        let start = ctx.window.full().random_instant(rng);
        let end = start + Duration::hours(rng.gen_range(1..=4));

        let data = Encounter {
            subject: resident.subject(),
            status: pick_code(rng),
            encounter_type: CodeableConcept::from_coding(encounter_type.clone()),
            period: Period::closed(start, end),
            episodes_of_care_id: episode.id_string(),
            participant_id: ctx.staff.pick_id(rng),
            recorded_at: start,
        };
        encounters.push(Record::new(fresh_id(rng), data));
    }
    encounters
}
