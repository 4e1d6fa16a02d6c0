//! Diagnostic history (conditions).

use super::{GenerationContext, ResidentRef};
use crate::sampling::{fresh_id, pick_code};
use crate::window::DateWindow;
use crate::GeneratorResult;
use chrono::{DateTime, Duration, Months, Utc};
use fhir::clinical::DiagnosticHistory;
use fhir::datatypes::CodeableConcept;
use fhir::vocab::ConditionStatus;
use fhir::Record;
use rand::seq::SliceRandom;
use rand::Rng;

/// How far before the window start a condition may have begun.
const ONSET_LOOKBACK: Months = Months::new(23 * 12);
/// How far before the window start a condition may have been recorded.
const RECORDED_LOOKBACK: Months = Months::new(3 * 12);

/// 1–3 conditions drawn from the disorder table; none when the table is empty.
///
/// Only resolved conditions get an abatement date.
pub fn generate_diagnostic_history<R: Rng + ?Sized>(
    resident: &ResidentRef<'_>,
    ctx: &GenerationContext<'_>,
    rng: &mut R,
) -> GeneratorResult<Vec<Record<DiagnosticHistory>>> {
    let disorders = &ctx.tables.disorders;
    if disorders.is_empty() {
        return Ok(Vec::new());
    }

    let start = ctx.window.start();
    let onset_window = DateWindow::new(lookback(start, ONSET_LOOKBACK), start)?;
    let recorded_window = DateWindow::new(lookback(start, RECORDED_LOOKBACK), ctx.window.end())?;

    let count = rng.gen_range(1..=3usize);
    let mut history = Vec::with_capacity(count);
    for _ in 0..count {
        let Some(disorder) = disorders.choose(rng) else {
            break;
        };
        let clinical_status: ConditionStatus = pick_code(rng);
        let abatement_datetime = (clinical_status == ConditionStatus::Resolved)
            .then(|| ctx.window.full().random_instant(rng));

        let data = DiagnosticHistory {
            resident_id: resident.id.to_string(),
            recorder_id: ctx.staff.pick_id(rng),
            clinical_status,
            recorded_date: recorded_window.random_instant(rng),
            onset_datetime: onset_window.random_instant(rng),
            abatement_datetime,
            code: CodeableConcept::from_coding(disorder.clone()),
        };
        history.push(Record::new(fresh_id(rng), data));
    }
    Ok(history)
}

fn lookback(from: DateTime<Utc>, months: Months) -> DateTime<Utc> {
    from.checked_sub_months(months)
        .unwrap_or(from - Duration::days(365))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::test_support::{resident, Fixture};
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn abatement_only_when_resolved() {
        let fixture = Fixture::new();
        let ctx = fixture.ctx();
        let mut rng = StdRng::seed_from_u64(31);

        let mut seen_resolved = false;
        for _ in 0..60 {
            let history = generate_diagnostic_history(&resident(), &ctx, &mut rng).unwrap();
            assert!((1..=3).contains(&history.len()));
            for record in history {
                let condition = record.data;
                let resolved = condition.clinical_status == ConditionStatus::Resolved;
                seen_resolved |= resolved;
                assert_eq!(condition.abatement_datetime.is_some(), resolved);
                assert!(condition.onset_datetime < fixture.window.start());
                let earliest_onset = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
                let earliest_record = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
                assert!(condition.onset_datetime >= earliest_onset);
                assert!(condition.recorded_date >= earliest_record);
                assert!(fixture.tables.disorders.contains(&condition.code.coding[0]));
            }
        }
        assert!(seen_resolved);
    }

    #[test]
    fn empty_disorder_table_is_not_an_error() {
        let mut fixture = Fixture::new();
        fixture.tables.disorders.clear();
        let mut rng = StdRng::seed_from_u64(1);
        let history = generate_diagnostic_history(&resident(), &fixture.ctx(), &mut rng).unwrap();
        assert!(history.is_empty());
    }
}
