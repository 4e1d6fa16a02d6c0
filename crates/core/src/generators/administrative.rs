//! Per-resident singleton records with derived ids.

use super::{GenerationContext, ResidentRef};
use crate::constants::{ADDRESS_ID_PREFIX, MRN_ID_PREFIX};
use crate::GeneratorResult;
use fhir::administrative::{Address, Identifier};
use fhir::{Record, RecordId};
use rand::seq::SliceRandom;
use rand::Rng;

/// The resident's home address, id `addr_<resident>`.
pub fn generate_address<R: Rng + ?Sized>(
    resident: &ResidentRef<'_>,
    ctx: &GenerationContext<'_>,
    rng: &mut R,
) -> GeneratorResult<Record<Address>> {
    let pool = &ctx.catalog.addresses;
    let number = rng.gen_range(1..=200);
    let street = pool.streets.choose(rng).map_or("", String::as_str);
    let city = pool.cities.choose(rng).map_or("", String::as_str);
    let state = pool.states.choose(rng).map_or("", String::as_str);

    let data = Address {
        resident_id: resident.id.to_string(),
        address_use: "home".to_string(),
        address_type: "physical".to_string(),
        line: vec![format!("{number} {street}")],
        city: city.to_string(),
        state: state.to_string(),
        postal_code: rng.gen_range(100_000..=999_999).to_string(),
        country: pool.country.clone(),
    };
    Ok(Record::new(RecordId::derived(ADDRESS_ID_PREFIX, resident.id)?, data))
}

/// The resident's MRN, id `mrn_<resident>`, when the resident has a code.
pub fn generate_identifiers(
    resident: &ResidentRef<'_>,
) -> GeneratorResult<Vec<Record<Identifier>>> {
    let Some(code) = resident.code else {
        return Ok(Vec::new());
    };
    Ok(vec![Record::new(
        RecordId::derived(MRN_ID_PREFIX, resident.id)?,
        Identifier::mrn(code),
    )])
}
