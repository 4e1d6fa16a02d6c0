//! # Lean Core
//!
//! Demo fixture generation for the lean-ehr assisted-living environment.
//!
//! This crate contains the generators and the file handling around them:
//! - Resident loading and SNOMED reference table loading
//! - The embedded catalog of vital ranges, templates and vocabularies
//! - Per-resident generators for every clinical, financial and administrative category
//! - Aggregation and the one-JSON-array-per-category writer
//!
//! **No process concerns**: environment variables, CLI parsing and logging setup belong in
//! the `lean-seed` runner and `lean-cli`. Everything here takes a resolved [`GeneratorConfig`].

pub mod catalog;
pub mod category;
pub mod config;
pub mod constants;
pub mod dataset;
pub mod error;
pub mod generators;
pub mod residents;
pub mod sampling;
pub mod staff;
pub mod terminology;
pub mod window;

pub use catalog::Catalog;
pub use category::{Category, CategorySet};
pub use config::GeneratorConfig;
pub use dataset::{DemoDataset, WriteSummary};
pub use error::{GeneratorError, GeneratorResult};
pub use generators::{GenerationContext, ResidentRef};
pub use residents::load_residents;
pub use staff::StaffPool;
pub use terminology::ReferenceTables;
pub use window::{DateWindow, GenerationWindow};

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Run one generation pass described by `config`.
///
/// Residents are loaded before anything else, so a missing residents file fails the run
/// without touching the output directory.
pub fn run(config: &GeneratorConfig) -> GeneratorResult<WriteSummary> {
    let residents = load_residents(config.residents_file())?;

    let tables = ReferenceTables::load(config.reference_dir())?;
    let catalog = match config.catalog_dir() {
        Some(dir) => Catalog::from_dir(dir)?,
        None => Catalog::embedded()?,
    };
    catalog.validate()?;

    let mut rng = match config.seed() {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let staff = StaffPool::generate(config.staff_count(), &mut rng)?;

    let ctx = GenerationContext {
        staff: &staff,
        window: config.window(),
        catalog: &catalog,
        tables: &tables,
        organisation: config.organisation(),
        currency: config.currency(),
    };

    tracing::info!(
        residents = residents.len(),
        staff = staff.len(),
        categories = config.categories().len(),
        "generating demo data"
    );
    let dataset = DemoDataset::generate(&residents, &ctx, config.categories(), &mut rng)?;
    let summary = dataset.write_all(config.output_dir())?;
    tracing::info!(
        "wrote {} records across {} categories to {}",
        summary.total(),
        summary.counts.len(),
        config.output_dir().display()
    );

    Ok(summary)
}
