//! Episodes of care: optional historical episodes plus the current long-term stay.

use super::{GenerationContext, ResidentRef};
use crate::constants::ACTIVE_EPISODE_TYPE;
use crate::sampling::fresh_id;
use crate::window::DateWindow;
use crate::{GeneratorError, GeneratorResult};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use fhir::clinical::EpisodeOfCare;
use fhir::datatypes::{CodeableConcept, Period};
use fhir::vocab::EpisodeStatus;
use fhir::Record;
use rand::seq::SliceRandom;
use rand::Rng;

/// Episodes for one resident, historical first. The last element is always the active
/// episode, which has no end date.
pub fn generate_episodes_of_care<R: Rng + ?Sized>(
    resident: &ResidentRef<'_>,
    ctx: &GenerationContext<'_>,
    rng: &mut R,
) -> GeneratorResult<Vec<Record<EpisodeOfCare>>> {
    let base_year = ctx.window.start().year();
    let mut episodes = Vec::with_capacity(2);

    if rng.gen_bool(0.5) {
        let start_year = rng.gen_range(base_year - 5..=base_year - 1);
        let end_year = rng.gen_range(start_year + 1..=base_year);
        let episode_start = random_day_in(start_year, 1..=12, rng)?;
        let mut episode_end = random_day_in(end_year, 1..=12, rng)?;
        if episode_end <= episode_start + Duration::days(7) {
            episode_end = episode_start + Duration::days(rng.gen_range(30..=365));
        }

        let episode_type = ctx
            .catalog
            .episode_types
            .choose(rng)
            .cloned()
            .map(CodeableConcept::from_coding)
            .unwrap_or_else(|| CodeableConcept::text_only(ACTIVE_EPISODE_TYPE));
        let status = if rng.gen_bool(0.5) {
            EpisodeStatus::Finished
        } else {
            EpisodeStatus::Cancelled
        };

        let data = EpisodeOfCare {
            resident_id: resident.id.to_string(),
            status,
            episode_type,
            period: Period::closed(
                DateWindow::starting_at(episode_start, Duration::days(7))?.random_instant(rng),
                DateWindow::starting_at(episode_end, Duration::days(7))?.random_instant(rng),
            ),
            managing_organization: ctx.organisation.to_string(),
        };
        episodes.push(Record::new(fresh_id(rng), data));
    }

    let current_start = random_day_in(base_year, 1..=6, rng)?;
    let data = EpisodeOfCare {
        resident_id: resident.id.to_string(),
        status: EpisodeStatus::Active,
        episode_type: CodeableConcept::text_only(ACTIVE_EPISODE_TYPE),
        period: Period::open(
            DateWindow::starting_at(current_start, Duration::days(30))?.random_instant(rng),
        ),
        managing_organization: ctx.organisation.to_string(),
    };
    episodes.push(Record::new(fresh_id(rng), data));

    Ok(episodes)
}

/// The active episode from a resident's episodes.
pub fn active_episode(episodes: &[Record<EpisodeOfCare>]) -> Option<&Record<EpisodeOfCare>> {
    episodes
        .iter()
        .rev()
        .find(|e| e.data.status == EpisodeStatus::Active)
}

fn random_day_in<R: Rng + ?Sized>(
    year: i32,
    months: std::ops::RangeInclusive<u32>,
    rng: &mut R,
) -> GeneratorResult<DateTime<Utc>> {
    let month = rng.gen_range(months);
    let day = rng.gen_range(1..=28);
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
        .ok_or_else(|| GeneratorError::InvalidWindow(format!("invalid date {year}-{month}-{day}")))
}
