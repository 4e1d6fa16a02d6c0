//! Allergy and intolerance records.

use super::{GenerationContext, ResidentRef};
use crate::sampling::{fresh_id, pick_code};
use fhir::clinical::{Allergy, AllergyReaction};
use fhir::datatypes::{CodeableConcept, Coding};
use fhir::Record;
use rand::Rng;

/// 0–2 allergies. The i-th allergy takes name, reaction and substance `i mod len` from the
/// reference tables; if any table is empty the resident gets no allergies.
pub fn generate_allergies<R: Rng + ?Sized>(
    resident: &ResidentRef<'_>,
    ctx: &GenerationContext<'_>,
    rng: &mut R,
) -> Vec<Record<Allergy>> {
    let tables = ctx.tables;
    if tables.allergy_names.is_empty()
        || tables.allergy_reactions.is_empty()
        || tables.allergy_substances.is_empty()
    {
        return Vec::new();
    }

    let count = rng.gen_range(0..=2usize);
    (0..count)
        .map(|i| {
            let name = &tables.allergy_names[i % tables.allergy_names.len()];
            let reaction = &tables.allergy_reactions[i % tables.allergy_reactions.len()];
            let substance = &tables.allergy_substances[i % tables.allergy_substances.len()];

            let data = Allergy {
                resident_id: resident.id.to_string(),
                recorder_id: ctx.staff.pick_id(rng),
                clinical_status: pick_code(rng),
                verification_status: pick_code(rng),
                name: CodeableConcept::from_coding(name.clone()),
                allergy_type: pick_code(rng),
                recorded_date: ctx.window.full().random_instant(rng),
                substance: CodeableConcept::from_coding(substance.clone()),
                reaction: AllergyReaction {
                    code: CodeableConcept::from_coding(Coding::snomed(
                        &reaction.code,
                        &reaction.display,
                    )),
                    severity: reaction.severity.clone(),
                },
            };
            Record::new(fresh_id(rng), data)
        })
        .collect()
}
