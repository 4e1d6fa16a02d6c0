//! Vital-sign observations.

use super::{GenerationContext, ResidentRef};
use crate::catalog::VitalKind;
use crate::sampling::{fresh_id, pick_code, uniform_one_decimal};
use crate::{GeneratorError, GeneratorResult};
use fhir::clinical::Observation;
use fhir::datatypes::{CodeableConcept, Coding, ValueQuantity, VitalValue};
use fhir::Record;
use rand::Rng;

const OBSERVATION_CATEGORY_SYSTEM: &str =
    "http://terminology.hl7.org/CodeSystem/observation-category";

/// One observation for the vital identified by LOINC `code`.
///
/// # Errors
///
/// Returns [`GeneratorError::UnknownVitalCode`] if the catalog has no such vital.
pub fn make_observation<R: Rng + ?Sized>(
    code: &str,
    resident: &ResidentRef<'_>,
    ctx: &GenerationContext<'_>,
    rng: &mut R,
) -> GeneratorResult<Record<Observation>> {
    let vital = ctx
        .catalog
        .vitals
        .get(code)
        .ok_or_else(|| GeneratorError::UnknownVitalCode(code.to_string()))?;

    let value = match vital.kind {
        VitalKind::Int => {
            VitalValue::Integer(rng.gen_range(vital.min as i64..=vital.max as i64))
        }
        VitalKind::Float => VitalValue::Decimal(uniform_one_decimal(rng, vital.min, vital.max)),
    };

    let data = Observation {
        resident_id: resident.id.to_string(),
        recorder_id: ctx.staff.pick_id(rng),
        status: pick_code(rng),
        category: vec![CodeableConcept {
            coding: vec![Coding::new(OBSERVATION_CATEGORY_SYSTEM, "vital-signs", "Vital Signs")],
            text: None,
        }],
        code: CodeableConcept::from_codings(vital.coding.clone()),
        effective_datetime: ctx.window.full().random_instant(rng),
        value_quantity: ValueQuantity {
            value,
            unit: vital.unit.display.clone(),
            system: vital.unit.system.clone(),
            code: vital.unit.code.clone(),
        },
        body_site: vital.body_site.clone(),
        method: vital.method.clone(),
        device: vital.device.clone(),
    };
    Ok(Record::new(fresh_id(rng), data))
}

/// 3–8 observations, each for a vital drawn uniformly from the catalog.
pub fn generate_observations<R: Rng + ?Sized>(
    resident: &ResidentRef<'_>,
    ctx: &GenerationContext<'_>,
    rng: &mut R,
) -> GeneratorResult<Vec<Record<Observation>>> {
    let codes = ctx.catalog.vital_codes();
    if codes.is_empty() {
        return Ok(Vec::new());
    }

    let count = rng.gen_range(3..=8usize);
    (0..count)
        .map(|_| {
            let code = codes[rng.gen_range(0..codes.len())];
            make_observation(code, resident, ctx, rng)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::test_support::{resident, Fixture};
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn unknown_code_is_an_error() {
        let fixture = Fixture::new();
        let mut rng = StdRng::seed_from_u64(0);
        let err = make_observation("0000-0", &resident(), &fixture.ctx(), &mut rng).unwrap_err();
        assert!(matches!(err, GeneratorError::UnknownVitalCode(code) if code == "0000-0"));
    }

    #[test]
    fn observation_count_and_subject() {
        let fixture = Fixture::new();
        let ctx = fixture.ctx();
        let mut rng = StdRng::seed_from_u64(13);

        for _ in 0..40 {
            let observations = generate_observations(&resident(), &ctx, &mut rng).unwrap();
            assert!((3..=8).contains(&observations.len()));
            assert!(observations.iter().all(|o| o.data.resident_id == "r1"));
        }
    }

    #[test]
    fn renders_integer_vitals_without_decimals() {
        let fixture = Fixture::new();
        let mut rng = StdRng::seed_from_u64(17);
        let record = make_observation("8867-4", &resident(), &fixture.ctx(), &mut rng).unwrap();
        let value = serde_json::to_value(&record).unwrap();
        assert!(value["data"]["value_quantity"]["value"].is_i64());
        assert_eq!(value["data"]["value_quantity"]["unit"], "beats/minute");
        assert_eq!(value["data"]["code"]["text"], "Heart Rate");
    }

    proptest! {
        #[test]
        fn vital_values_respect_catalog_ranges(seed in any::<u64>(), pick in 0usize..6) {
            let fixture = Fixture::new();
            let codes = fixture.catalog.vital_codes();
            let code = codes[pick % codes.len()];
            let vital = &fixture.catalog.vitals[code];
            let mut rng = StdRng::seed_from_u64(seed);

            let record = make_observation(code, &resident(), &fixture.ctx(), &mut rng).unwrap();
            let value = record.data.value_quantity.value;
            prop_assert!(value.as_f64() >= vital.min && value.as_f64() <= vital.max);
            match (vital.kind, value) {
                (VitalKind::Int, VitalValue::Integer(_)) => {}
                (VitalKind::Float, VitalValue::Decimal(v)) => {
                    prop_assert!(((v * 10.0).round() - v * 10.0).abs() < 1e-9);
                }
                other => prop_assert!(false, "kind/value mismatch: {:?}", other),
            }
        }
    }
}
