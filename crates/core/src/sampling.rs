//! Small random-draw helpers shared by the generators.

use fhir::vocab::Vocabulary;
use lean_uuid::RecordId;
use rand::Rng;

/// Uniform member of a value set.
pub fn pick_code<V: Vocabulary, R: Rng + ?Sized>(rng: &mut R) -> V {
    V::ALL[rng.gen_range(0..V::ALL.len())]
}

/// Fresh canonical record id drawn from `rng`, so seeded runs are reproducible.
pub fn fresh_id<R: Rng + ?Sized>(rng: &mut R) -> RecordId {
    RecordId::from_random_bytes(rng.gen())
}

/// Uniform real in `[min, max]` rounded to one decimal place.
pub fn uniform_one_decimal<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    let raw = if min < max { rng.gen_range(min..=max) } else { min };
    ((raw * 10.0).round() / 10.0).clamp(min, max)
}

/// Uniform real in `[min, max]` rounded to cents.
pub fn uniform_cents<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    let raw = if min < max { rng.gen_range(min..=max) } else { min };
    fhir::datatypes::round_cents(raw).clamp(min, max)
}
