//! Constants used throughout the lean-core crate.
//!
//! Default paths, output layout and fixed generation parameters live here so that the
//! binaries and the generators agree on them.

/// Default residents input file.
pub const DEFAULT_RESIDENTS_FILE: &str = "demo-data/residents/data-plain.json";

/// Default root directory for generated category files.
pub const DEFAULT_OUTPUT_DIR: &str = "demo-data";

/// Default directory holding the SNOMED reference term files.
pub const DEFAULT_REFERENCE_DIR: &str = "demo-data/snomed-examples";

/// Filename written inside every category directory.
pub const CATEGORY_FILENAME: &str = "data-plain.json";

/// Default number of staff members in the generated pool.
pub const DEFAULT_STAFF_COUNT: usize = 6;

/// Default managing organisation for episodes of care.
pub const DEFAULT_ORGANISATION: &str = "Golden Years Retreat Homes";

/// Default ISO 4217 currency for every money amount.
pub const DEFAULT_CURRENCY: &str = "NGN";

/// Default window start (`YYYY-MM-DD`).
pub const DEFAULT_START_DATE: &str = "2023-01-01";

/// Default intermediary date splitting prescription start and end ranges.
pub const DEFAULT_INTERMEDIARY_DATE: &str = "2024-01-01";

/// Prefix of derived address identifiers.
pub const ADDRESS_ID_PREFIX: &str = "addr";

/// Prefix of derived MRN identifiers.
pub const MRN_ID_PREFIX: &str = "mrn";

/// Reference file of disorder terms, relative to the reference directory.
pub const DISORDERS_FILE: &str = "disorders.txt";

/// Reference file of allergy names.
pub const ALLERGY_NAMES_FILE: &str = "allergies/name.txt";

/// Reference file of allergy reactions with severities.
pub const ALLERGY_REACTIONS_FILE: &str = "allergies/reaction.txt";

/// Reference file of allergy substances.
pub const ALLERGY_SUBSTANCES_FILE: &str = "allergies/substance.txt";

/// Administration time used when a dosage has no times of day.
pub const DEFAULT_ADMINISTRATION_HOUR: u32 = 9;

/// Type of the active long-term episode of care.
pub const ACTIVE_EPISODE_TYPE: &str = "Long Term Care";
