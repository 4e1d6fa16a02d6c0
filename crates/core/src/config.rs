//! Generator runtime configuration.
//!
//! Configuration is resolved once at process startup (from environment variables or CLI
//! flags) and then passed into the generator. Core code never reads the environment itself.

use crate::category::CategorySet;
use crate::constants::{DEFAULT_INTERMEDIARY_DATE, DEFAULT_START_DATE};
use crate::window::GenerationWindow;
use crate::{GeneratorError, GeneratorResult};
use chrono::{DateTime, NaiveDate, Utc};
use lean_types::{CurrencyCode, NonEmptyText};
use std::path::{Path, PathBuf};

/// Generator configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    residents_file: PathBuf,
    output_dir: PathBuf,
    reference_dir: PathBuf,
    catalog_dir: Option<PathBuf>,
    window: GenerationWindow,
    staff_count: usize,
    organisation: NonEmptyText,
    currency: CurrencyCode,
    categories: CategorySet,
    seed: Option<u64>,
}

impl GeneratorConfig {
    /// Create a new `GeneratorConfig` writing every category with the thread RNG.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::InvalidInput`] for a zero staff count, a blank organisation
    /// or a malformed currency code.
    pub fn new(
        residents_file: PathBuf,
        output_dir: PathBuf,
        reference_dir: PathBuf,
        window: GenerationWindow,
        staff_count: usize,
        organisation: &str,
        currency: &str,
    ) -> GeneratorResult<Self> {
        if staff_count == 0 {
            return Err(GeneratorError::InvalidInput(
                "staff_count must be at least 1".into(),
            ));
        }

        let organisation = NonEmptyText::new(organisation)
            .map_err(|_| GeneratorError::InvalidInput("organisation cannot be empty".into()))?;
        let currency: CurrencyCode = currency.parse()?;

        Ok(Self {
            residents_file,
            output_dir,
            reference_dir,
            catalog_dir: None,
            window,
            staff_count,
            organisation,
            currency,
            categories: CategorySet::all(),
            seed: None,
        })
    }

    /// Load catalog files from `dir`, falling back to the embedded catalog per file.
    pub fn with_catalog_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.catalog_dir = dir;
        self
    }

    pub fn with_categories(mut self, categories: CategorySet) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn residents_file(&self) -> &Path {
        &self.residents_file
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn reference_dir(&self) -> &Path {
        &self.reference_dir
    }

    pub fn catalog_dir(&self) -> Option<&Path> {
        self.catalog_dir.as_deref()
    }

    pub fn window(&self) -> &GenerationWindow {
        &self.window
    }

    pub fn staff_count(&self) -> usize {
        self.staff_count
    }

    pub fn organisation(&self) -> &str {
        self.organisation.as_str()
    }

    pub fn currency(&self) -> &str {
        self.currency.as_str()
    }

    pub fn categories(&self) -> &CategorySet {
        &self.categories
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

/// Build the generation window from optional date values.
///
/// Missing or blank values fall back to `2023-01-01`, `2024-01-01` and `now`.
pub fn window_from_values(
    start: Option<String>,
    intermediary: Option<String>,
    end: Option<String>,
    now: DateTime<Utc>,
) -> GeneratorResult<GenerationWindow> {
    let start = date_from_value(start)?.map_or_else(|| parse_date(DEFAULT_START_DATE), Ok)?;
    let intermediary =
        date_from_value(intermediary)?.map_or_else(|| parse_date(DEFAULT_INTERMEDIARY_DATE), Ok)?;
    let end = date_from_value(end)?.unwrap_or(now);

    GenerationWindow::new(start, intermediary, end)
}

/// Parse an optional date value; `None` or whitespace yields `None`.
pub fn date_from_value(value: Option<String>) -> GeneratorResult<Option<DateTime<Utc>>> {
    non_blank(value).map(|v| parse_date(&v)).transpose()
}

/// Parse `YYYY-MM-DD` (midnight UTC) or an RFC 3339 timestamp.
pub fn parse_date(value: &str) -> GeneratorResult<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }
    fhir::instant::parse_instant(value).map_err(|e| {
        GeneratorError::InvalidInput(format!(
            "'{value}' is neither YYYY-MM-DD nor an RFC 3339 timestamp: {e}"
        ))
    })
}

/// Parse an optional staff count, defaulting when missing or blank.
pub fn staff_count_from_value(value: Option<String>, default: usize) -> GeneratorResult<usize> {
    match non_blank(value) {
        Some(v) => v
            .parse::<usize>()
            .map_err(|e| GeneratorError::InvalidInput(format!("invalid staff count '{v}': {e}"))),
        None => Ok(default),
    }
}

/// Parse an optional RNG seed.
pub fn seed_from_value(value: Option<String>) -> GeneratorResult<Option<u64>> {
    non_blank(value)
        .map(|v| {
            v.parse::<u64>()
                .map_err(|e| GeneratorError::InvalidInput(format!("invalid seed '{v}': {e}")))
        })
        .transpose()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
