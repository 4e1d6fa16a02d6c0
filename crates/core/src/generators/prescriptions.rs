//! Prescriptions and the medication administrations (eMAR) derived from them.

use super::{GenerationContext, ResidentRef};
use crate::constants::DEFAULT_ADMINISTRATION_HOUR;
use crate::sampling::{fresh_id, pick_code};
use chrono::{Datelike, Duration, NaiveTime};
use fhir::clinical::{AdministeredDosage, Prescription, PrescriptionAdministration};
use fhir::datatypes::{DosageInstruction, DoseAndRate, Period};
use fhir::Record;
use rand::seq::SliceRandom;
use rand::Rng;

/// 1–3 prescriptions. Each period starts before the intermediary date and ends after it.
pub fn generate_prescriptions<R: Rng + ?Sized>(
    resident: &ResidentRef<'_>,
    ctx: &GenerationContext<'_>,
    rng: &mut R,
) -> Vec<Record<Prescription>> {
    let catalog = ctx.catalog;
    if catalog.medications.is_empty() {
        return Vec::new();
    }

    let count = rng.gen_range(1..=3usize);
    let mut prescriptions = Vec::with_capacity(count);
    for _ in 0..count {
        let (Some(medication), Some(timing), Some(site), Some(route), Some(method)) = (
            catalog.medications.choose(rng),
            catalog.dosage.timing.choose(rng),
            catalog.dosage.site.choose(rng),
            catalog.dosage.route.choose(rng),
            catalog.dosage.method.choose(rng),
        ) else {
            break;
        };

        let dosage = DosageInstruction {
            timing: timing.clone(),
            site: site.clone(),
            route: route.clone(),
            method: method.clone(),
            dose_and_rate: vec![DoseAndRate {
                dose_quantity: medication.strength.clone(),
            }],
        };

        let data = Prescription {
            resident_id: resident.id.to_string(),
            recorder_id: ctx.staff.pick_id(rng),
            period: Period::closed(
                ctx.window.early().random_instant(rng),
                ctx.window.late().random_instant(rng),
            ),
            status: pick_code(rng),
            adherence: pick_code(rng),
            medication: medication.clone(),
            dosage_instruction: vec![dosage],
        };
        prescriptions.push(Record::new(fresh_id(rng), data));
    }
    prescriptions
}

/// Administrations for each prescription with a non-zero daily frequency.
///
/// Days run from the prescription start date to the earlier of its end and the run end,
/// stepping by the repeat interval (daily when the unit is not day based). When the repeat
/// lists days of the week, only those days are used, starting from the first listed day on or
/// after the start; a weekly period of `n` keeps every `n`th such week. Each of the first
/// `frequency` times of day (09:00 when none are given) is shifted by up to ±2 h and ±30 min;
/// instants outside the prescription period or after the run end are skipped.
pub fn generate_administrations<R: Rng + ?Sized>(
    resident: &ResidentRef<'_>,
    prescriptions: &[Record<Prescription>],
    ctx: &GenerationContext<'_>,
    rng: &mut R,
) -> Vec<Record<PrescriptionAdministration>> {
    let mut administrations = Vec::new();

    for prescription in prescriptions {
        let Some(dosage) = prescription.data.primary_dosage() else {
            continue;
        };
        let repeat = &dosage.timing.repeat;
        if repeat.frequency == 0 {
            continue;
        }

        let bound = match prescription.data.period.end {
            Some(end) => end.min(ctx.window.end()),
            None => ctx.window.end(),
        };
        let weekdays = repeat.weekdays();
        let interval = Duration::days(i64::from(repeat.interval_days().unwrap_or(1)));
        let times = dose_times(&repeat.time_of_day, repeat.frequency);
        let Some(dose) = dosage.dose_and_rate.first().map(|d| d.dose_quantity.clone()) else {
            continue;
        };

        let start = prescription.data.period.start;
        let mut day = start.date_naive();
        let last_day = bound.date_naive();
        let step = if weekdays.is_empty() {
            interval
        } else {
            while !weekdays.contains(&day.weekday()) {
                day += Duration::days(1);
            }
            Duration::days(1)
        };
        let first_day = day;
        let week_period = match repeat.period_unit.as_str() {
            "wk" => i64::from(repeat.period.max(1)),
            _ => 1,
        };

        while day <= last_day {
            if !weekdays.is_empty() {
                let week = (day - first_day).num_days() / 7;
                if !weekdays.contains(&day.weekday()) || week % week_period != 0 {
                    day += step;
                    continue;
                }
            }
            for (index, time) in times.iter().enumerate() {
                let offset = Duration::hours(rng.gen_range(-2..=2))
                    + Duration::minutes(rng.gen_range(-30..=30));
                let scheduled = day.and_time(*time).and_utc() + offset;
                if scheduled < start || scheduled > bound {
                    continue;
                }

                let data = PrescriptionAdministration {
                    resident_id: resident.id.to_string(),
                    prescription_id: prescription.id_string(),
                    medication: prescription.data.medication.clone(),
                    recorder_id: ctx.staff.pick_id(rng),
                    status: pick_code(rng),
                    effective_datetime: scheduled,
                    dosage: AdministeredDosage {
                        route: dosage.route.clone(),
                        administered_dose: dose.clone(),
                    },
                    dose_number: index as u32 + 1,
                };
                administrations.push(Record::new(fresh_id(rng), data));
            }
            day += step;
        }
    }

    administrations
}

fn dose_times(time_of_day: &[NaiveTime], frequency: u32) -> Vec<NaiveTime> {
    let default =
        NaiveTime::from_hms_opt(DEFAULT_ADMINISTRATION_HOUR, 0, 0).unwrap_or(NaiveTime::MIN);
    (0..frequency as usize)
        .map(|i| time_of_day.get(i).copied().unwrap_or(default))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::test_support::{resident, Fixture};
    use chrono::{TimeZone, Utc};
    use fhir::datatypes::{CodeableConcept, Repeat, Timing};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn with_timing(record: &mut Record<Prescription>, repeat: Repeat) {
        record.data.dosage_instruction[0].timing = Timing {
            code: CodeableConcept::text_only("test"),
            repeat,
        };
    }

    fn daily(frequency: u32, times: &[(u32, u32)]) -> Repeat {
        Repeat {
            frequency,
            period: 1,
            period_unit: "d".into(),
            day_of_week: vec![],
            time_of_day: times
                .iter()
                .map(|&(h, m)| NaiveTime::from_hms_opt(h, m, 0).unwrap())
                .collect(),
        }
    }

    #[test]
    fn prescriptions_span_the_intermediary_date() {
        let fixture = Fixture::new();
        let ctx = fixture.ctx();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..30 {
            let prescriptions = generate_prescriptions(&resident(), &ctx, &mut rng);
            assert!((1..=3).contains(&prescriptions.len()));
            for p in &prescriptions {
                let period = &p.data.period;
                assert!(period.start >= fixture.window.start());
                assert!(period.start < fixture.window.intermediary());
                let end = period.end.unwrap();
                assert!(end >= fixture.window.intermediary());
                assert!(end < fixture.window.end());
                assert_eq!(
                    p.data.dosage_instruction[0].dose_and_rate[0].dose_quantity,
                    p.data.medication.strength
                );
            }
        }
    }

    #[test]
    fn no_medication_templates_means_no_prescriptions() {
        let mut fixture = Fixture::new();
        fixture.catalog.medications.clear();
        let ctx = fixture.ctx();
        let mut rng = StdRng::seed_from_u64(7);
        assert!(generate_prescriptions(&resident(), &ctx, &mut rng).is_empty());
    }

    #[test]
    fn administrations_reference_their_prescription() {
        let fixture = Fixture::new();
        let ctx = fixture.ctx();
        let mut rng = StdRng::seed_from_u64(21);

        let prescriptions = generate_prescriptions(&resident(), &ctx, &mut rng);
        let administrations =
            generate_administrations(&resident(), &prescriptions, &ctx, &mut rng);

        let ids: HashSet<String> = prescriptions.iter().map(|p| p.id_string()).collect();
        for admin in &administrations {
            assert!(ids.contains(&admin.data.prescription_id));
            assert_eq!(admin.data.resident_id, "r1");
            assert!(admin.data.dose_number >= 1);
            assert!(admin.data.effective_datetime <= fixture.window.end());
        }
    }

    #[test]
    fn zero_frequency_is_skipped() {
        let fixture = Fixture::new();
        let ctx = fixture.ctx();
        let mut rng = StdRng::seed_from_u64(3);

        let mut prescriptions = generate_prescriptions(&resident(), &ctx, &mut rng);
        for p in &mut prescriptions {
            with_timing(p, daily(0, &[]));
        }
        assert!(generate_administrations(&resident(), &prescriptions, &ctx, &mut rng).is_empty());
    }

    #[test]
    fn daily_schedule_emits_each_dose_within_bounds() {
        let fixture = Fixture::new();
        let ctx = fixture.ctx();
        let mut rng = StdRng::seed_from_u64(5);

        let mut prescriptions = generate_prescriptions(&resident(), &ctx, &mut rng);
        prescriptions.truncate(1);
        let start = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 14, 12, 0, 0).unwrap();
        prescriptions[0].data.period = Period::closed(start, end);
        with_timing(&mut prescriptions[0], daily(2, &[(8, 0), (20, 0)]));

        let administrations =
            generate_administrations(&resident(), &prescriptions, &ctx, &mut rng);

        // the morning dose on the 10th lands before noon, the evening one on the 14th after
        assert_eq!(administrations.len(), 8);
        for admin in &administrations {
            assert!(admin.data.effective_datetime >= start);
            assert!(admin.data.effective_datetime <= end);
            assert!((1..=2).contains(&admin.data.dose_number));
        }
        let first_doses = administrations
            .iter()
            .filter(|a| a.data.dose_number == 1)
            .count();
        assert_eq!(first_doses, 4);
    }

    #[test]
    fn no_dose_precedes_an_evening_start() {
        let fixture = Fixture::new();
        let ctx = fixture.ctx();
        let mut rng = StdRng::seed_from_u64(13);

        let mut prescriptions = generate_prescriptions(&resident(), &ctx, &mut rng);
        prescriptions.truncate(1);
        let start = Utc.with_ymd_and_hms(2024, 1, 10, 18, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 12, 23, 0, 0).unwrap();
        prescriptions[0].data.period = Period::closed(start, end);
        with_timing(&mut prescriptions[0], daily(1, &[(9, 0)]));

        let administrations =
            generate_administrations(&resident(), &prescriptions, &ctx, &mut rng);

        // the 9 o'clock dose on the start day is always before 18:00
        assert_eq!(administrations.len(), 2);
        assert!(administrations
            .iter()
            .all(|a| a.data.effective_datetime >= start));
    }

    #[test]
    fn listed_weekday_moves_first_dose_and_filters_days() {
        let fixture = Fixture::new();
        let ctx = fixture.ctx();
        let mut rng = StdRng::seed_from_u64(17);

        let mut prescriptions = generate_prescriptions(&resident(), &ctx, &mut rng);
        prescriptions.truncate(1);
        // a Wednesday
        let start = Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap();
        prescriptions[0].data.period = Period::closed(start, end);
        let mut repeat = daily(1, &[(10, 0)]);
        repeat.period_unit = "wk".into();
        repeat.day_of_week = vec!["mon".into()];
        with_timing(&mut prescriptions[0], repeat);

        let administrations =
            generate_administrations(&resident(), &prescriptions, &ctx, &mut rng);

        // Jan 8, 15, 22, 29
        assert_eq!(administrations.len(), 4);
        assert!(administrations
            .iter()
            .all(|a| a.data.effective_datetime.weekday() == chrono::Weekday::Mon));
        assert_eq!(
            administrations[0].data.effective_datetime.date_naive(),
            chrono::NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()
        );
    }

    #[test]
    fn fortnightly_weekday_schedule_skips_alternate_weeks() {
        let fixture = Fixture::new();
        let ctx = fixture.ctx();
        let mut rng = StdRng::seed_from_u64(19);

        let mut prescriptions = generate_prescriptions(&resident(), &ctx, &mut rng);
        prescriptions.truncate(1);
        let start = Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap();
        prescriptions[0].data.period = Period::closed(start, end);
        let mut repeat = daily(1, &[(10, 0)]);
        repeat.period = 2;
        repeat.period_unit = "wk".into();
        repeat.day_of_week = vec!["mon".into()];
        with_timing(&mut prescriptions[0], repeat);

        let administrations =
            generate_administrations(&resident(), &prescriptions, &ctx, &mut rng);

        let days: Vec<u32> = administrations
            .iter()
            .map(|a| a.data.effective_datetime.day())
            .collect();
        assert_eq!(days, vec![8, 22]);
    }

    #[test]
    fn missing_times_default_to_nine() {
        let times = dose_times(&[], 2);
        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        assert_eq!(times, vec![nine, nine]);

        let eight = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
        assert_eq!(dose_times(&[eight, nine], 1), vec![eight]);
    }

    #[test]
    fn weekly_schedule_steps_by_seven_days() {
        let fixture = Fixture::new();
        let ctx = fixture.ctx();
        let mut rng = StdRng::seed_from_u64(8);

        let mut prescriptions = generate_prescriptions(&resident(), &ctx, &mut rng);
        prescriptions.truncate(1);
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 29, 23, 0, 0).unwrap();
        prescriptions[0].data.period = Period::closed(start, end);
        let mut repeat = daily(1, &[(12, 0)]);
        repeat.period_unit = "wk".into();
        with_timing(&mut prescriptions[0], repeat);

        let administrations =
            generate_administrations(&resident(), &prescriptions, &ctx, &mut rng);
        // Jan 1, 8, 15, 22, 29
        assert_eq!(administrations.len(), 5);
    }
}
