use lean_core::config::{
    seed_from_value, staff_count_from_value, window_from_values,
};
use lean_core::constants::{
    DEFAULT_CURRENCY, DEFAULT_ORGANISATION, DEFAULT_OUTPUT_DIR, DEFAULT_REFERENCE_DIR,
    DEFAULT_RESIDENTS_FILE, DEFAULT_STAFF_COUNT,
};
use lean_core::{CategorySet, GeneratorConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the demo data generator
///
/// Reads the generation settings from the environment (a `.env` file is loaded first),
/// generates every selected category for every resident, and writes one JSON array per
/// category under the output directory.
///
/// # Environment Variables
/// - `LEAN_RESIDENTS_FILE`: residents JSON (default: "demo-data/residents/data-plain.json")
/// - `LEAN_OUTPUT_DIR`: output root (default: "demo-data")
/// - `LEAN_REFERENCE_DIR`: SNOMED term files (default: "demo-data/snomed-examples")
/// - `LEAN_CATALOG_DIR`: optional directory overriding the embedded catalog files
/// - `LEAN_START_DATE`, `LEAN_INTERMEDIARY_DATE`, `LEAN_END_DATE`: generation window
///   (defaults: 2023-01-01, 2024-01-01, now)
/// - `LEAN_STAFF_COUNT`: size of the synthetic staff pool (default: 6)
/// - `LEAN_ORGANISATION`: managing organisation name (default: "Golden Years Retreat Homes")
/// - `LEAN_CURRENCY`: ISO 4217 currency for money values (default: "NGN")
/// - `LEAN_CATEGORIES`: comma separated category selection (default: all)
/// - `LEAN_SEED`: RNG seed for a reproducible run
///
/// # Returns
/// * `Ok(())` - If every selected category was written
/// * `Err(anyhow::Error)` - If configuration is invalid or generation fails
fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("lean=info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config_from_env()?;
    tracing::info!(
        "++ Generating demo data from {} into {}",
        config.residents_file().display(),
        config.output_dir().display()
    );

    let summary = lean_core::run(&config)?;
    for (category, count) in &summary.counts {
        tracing::info!("{:>28}: {}", category, count);
    }

    Ok(())
}

fn config_from_env() -> anyhow::Result<GeneratorConfig> {
    let window = window_from_values(
        env("LEAN_START_DATE"),
        env("LEAN_INTERMEDIARY_DATE"),
        env("LEAN_END_DATE"),
        chrono::Utc::now(),
    )?;
    let staff_count = staff_count_from_value(env("LEAN_STAFF_COUNT"), DEFAULT_STAFF_COUNT)?;
    let categories = match env("LEAN_CATEGORIES") {
        Some(list) => CategorySet::parse_list(&list)?,
        None => CategorySet::all(),
    };

    let config = GeneratorConfig::new(
        path_or(env("LEAN_RESIDENTS_FILE"), DEFAULT_RESIDENTS_FILE),
        path_or(env("LEAN_OUTPUT_DIR"), DEFAULT_OUTPUT_DIR),
        path_or(env("LEAN_REFERENCE_DIR"), DEFAULT_REFERENCE_DIR),
        window,
        staff_count,
        &env("LEAN_ORGANISATION").unwrap_or_else(|| DEFAULT_ORGANISATION.into()),
        &env("LEAN_CURRENCY").unwrap_or_else(|| DEFAULT_CURRENCY.into()),
    )?
    .with_catalog_dir(env("LEAN_CATALOG_DIR").map(PathBuf::from))
    .with_categories(categories)
    .with_seed(seed_from_value(env("LEAN_SEED"))?);

    Ok(config)
}

/// Value of `name`, treating unset and blank alike.
fn env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
}

fn path_or(value: Option<String>, default: &str) -> PathBuf {
    PathBuf::from(value.unwrap_or_else(|| default.into()))
}
