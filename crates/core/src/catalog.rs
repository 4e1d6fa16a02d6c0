//! Static templates the generators draw from.
//!
//! The catalog is shipped as YAML under `crates/core/data/` and embedded at compile time.
//! A catalog directory may override any file by name; files it does not contain fall back to
//! the embedded copy. Every file is parsed strictly and then validated as a whole.

use crate::{GeneratorError, GeneratorResult};
use fhir::datatypes::{CodeableConcept, Coding, Medication, Timing};
use fhir::vocab::GoalStatus;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

const VITALS_FILE: &str = "vitals.yaml";
const CARE_PLANS_FILE: &str = "care_plans.yaml";
const MEDICATIONS_FILE: &str = "medications.yaml";
const ENCOUNTERS_FILE: &str = "encounters.yaml";
const FINANCIALS_FILE: &str = "financials.yaml";
const ADDRESSES_FILE: &str = "addresses.yaml";

const EMBEDDED: [(&str, &str); 6] = [
    (VITALS_FILE, include_str!("../data/vitals.yaml")),
    (CARE_PLANS_FILE, include_str!("../data/care_plans.yaml")),
    (MEDICATIONS_FILE, include_str!("../data/medications.yaml")),
    (ENCOUNTERS_FILE, include_str!("../data/encounters.yaml")),
    (FINANCIALS_FILE, include_str!("../data/financials.yaml")),
    (ADDRESSES_FILE, include_str!("../data/addresses.yaml")),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VitalKind {
    Int,
    Float,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VitalUnit {
    pub system: String,
    pub code: String,
    pub display: String,
}

/// Range and presentation of one vital sign.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VitalSpec {
    pub coding: Vec<Coding>,
    pub unit: VitalUnit,
    pub min: f64,
    pub max: f64,
    #[serde(rename = "type")]
    pub kind: VitalKind,
    pub body_site: CodeableConcept,
    pub method: CodeableConcept,
    pub device: CodeableConcept,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GoalTemplate {
    pub lifecycle_status: GoalStatus,
    pub category: String,
    pub priority: String,
    pub description: CodeableConcept,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActivityTemplate {
    pub coding: Coding,
    pub timing: Timing,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskNotes {
    #[serde(default)]
    pub by_code: BTreeMap<String, String>,
    pub default: String,
}

impl TaskNotes {
    pub fn for_code(&self, code: Option<&str>) -> &str {
        code.and_then(|c| self.by_code.get(c))
            .map_or(self.default.as_str(), String::as_str)
    }
}

/// Choices a prescription's dosage instruction is assembled from.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DosageOptions {
    pub timing: Vec<Timing>,
    pub site: Vec<CodeableConcept>,
    pub route: Vec<CodeableConcept>,
    pub method: Vec<CodeableConcept>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProcedureTemplate {
    pub coding: Coding,
    pub category: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceTemplate {
    pub name: String,
    pub code: Option<String>,
    pub min_price: f64,
    pub max_price: f64,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PayorTemplate {
    pub id: String,
    pub organization: Option<String>,
    pub coverage_type: String,
    pub plan_name: Option<String>,
    pub method: String,
}

impl PayorTemplate {
    /// Display used on payments: the organisation, or `Self-pay`.
    pub fn display(&self) -> &str {
        self.organization.as_deref().unwrap_or("Self-pay")
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddressPool {
    pub streets: Vec<String>,
    pub cities: Vec<String>,
    pub states: Vec<String>,
    pub country: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct VitalsFile {
    vitals: BTreeMap<String, VitalSpec>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CarePlansFile {
    goals: Vec<GoalTemplate>,
    activities: Vec<ActivityTemplate>,
    task_notes: TaskNotes,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct MedicationsFile {
    medications: Vec<Medication>,
    dosage: DosageOptions,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct EncountersFile {
    encounter_types: Vec<Coding>,
    episode_types: Vec<Coding>,
    procedures: Vec<ProcedureTemplate>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct FinancialsFile {
    services: Vec<ServiceTemplate>,
    payors: Vec<PayorTemplate>,
    adjustment_reasons: Vec<String>,
}

/// All generator templates.
#[derive(Clone, Debug, PartialEq)]
pub struct Catalog {
    /// Vital specs keyed by LOINC code.
    pub vitals: BTreeMap<String, VitalSpec>,
    pub goals: Vec<GoalTemplate>,
    pub activities: Vec<ActivityTemplate>,
    pub task_notes: TaskNotes,
    pub medications: Vec<Medication>,
    pub dosage: DosageOptions,
    pub encounter_types: Vec<Coding>,
    pub episode_types: Vec<Coding>,
    pub procedures: Vec<ProcedureTemplate>,
    pub services: Vec<ServiceTemplate>,
    pub payors: Vec<PayorTemplate>,
    pub adjustment_reasons: Vec<String>,
    pub addresses: AddressPool,
}

impl Catalog {
    /// The catalog compiled into the binary.
    pub fn embedded() -> GeneratorResult<Self> {
        Self::assemble(|name| Ok(embedded_source(name).to_owned()))
    }

    /// Load catalog files from `dir`, using the embedded copy for any file it lacks.
    pub fn from_dir(dir: &Path) -> GeneratorResult<Self> {
        if !dir.is_dir() {
            return Err(GeneratorError::Catalog(format!(
                "catalog directory {} does not exist",
                dir.display()
            )));
        }

        Self::assemble(|name| {
            let path = dir.join(name);
            match std::fs::read_to_string(&path) {
                Ok(text) => {
                    tracing::info!("catalog override: {}", path.display());
                    Ok(text)
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    Ok(embedded_source(name).to_owned())
                }
                Err(source) => Err(GeneratorError::FileRead { path, source }),
            }
        })
    }

    /// Vital codes in a stable order.
    pub fn vital_codes(&self) -> Vec<&str> {
        self.vitals.keys().map(String::as_str).collect()
    }

    fn assemble(
        mut source: impl FnMut(&'static str) -> GeneratorResult<String>,
    ) -> GeneratorResult<Self> {
        let vitals: VitalsFile = parse_yaml(VITALS_FILE, &source(VITALS_FILE)?)?;
        let care_plans: CarePlansFile = parse_yaml(CARE_PLANS_FILE, &source(CARE_PLANS_FILE)?)?;
        let medications: MedicationsFile =
            parse_yaml(MEDICATIONS_FILE, &source(MEDICATIONS_FILE)?)?;
        let encounters: EncountersFile = parse_yaml(ENCOUNTERS_FILE, &source(ENCOUNTERS_FILE)?)?;
        let financials: FinancialsFile = parse_yaml(FINANCIALS_FILE, &source(FINANCIALS_FILE)?)?;
        let addresses: AddressPool = parse_yaml(ADDRESSES_FILE, &source(ADDRESSES_FILE)?)?;

        let catalog = Self {
            vitals: vitals.vitals,
            goals: care_plans.goals,
            activities: care_plans.activities,
            task_notes: care_plans.task_notes,
            medications: medications.medications,
            dosage: medications.dosage,
            encounter_types: encounters.encounter_types,
            episode_types: encounters.episode_types,
            procedures: encounters.procedures,
            services: financials.services,
            payors: financials.payors,
            adjustment_reasons: financials.adjustment_reasons,
            addresses,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check cross-field constraints serde cannot express.
    pub fn validate(&self) -> GeneratorResult<()> {
        for (code, vital) in &self.vitals {
            if vital.coding.is_empty() {
                return Err(catalog_error(format!("vital {code} has no coding")));
            }
            if vital.min.partial_cmp(&vital.max).map_or(true, |o| o.is_gt()) {
                return Err(catalog_error(format!(
                    "vital {code} has min {} greater than max {}",
                    vital.min, vital.max
                )));
            }
            if vital.kind == VitalKind::Int
                && (vital.min.fract() != 0.0 || vital.max.fract() != 0.0)
            {
                return Err(catalog_error(format!(
                    "int vital {code} must have whole-number bounds"
                )));
            }
        }

        if !self.medications.is_empty() {
            let dosage = &self.dosage;
            if dosage.timing.is_empty()
                || dosage.site.is_empty()
                || dosage.route.is_empty()
                || dosage.method.is_empty()
            {
                return Err(catalog_error(
                    "dosage timing, site, route and method need at least one entry each".into(),
                ));
            }
        }

        for service in &self.services {
            if !(service.min_price >= 0.0 && service.min_price <= service.max_price) {
                return Err(catalog_error(format!(
                    "service '{}' needs 0 <= min_price <= max_price",
                    service.name
                )));
            }
        }

        require_non_empty("encounter_types", self.encounter_types.len())?;
        require_non_empty("episode_types", self.episode_types.len())?;
        require_non_empty("payors", self.payors.len())?;
        require_non_empty("adjustment_reasons", self.adjustment_reasons.len())?;
        require_non_empty("addresses.streets", self.addresses.streets.len())?;
        require_non_empty("addresses.cities", self.addresses.cities.len())?;
        require_non_empty("addresses.states", self.addresses.states.len())?;

        Ok(())
    }
}

fn embedded_source(name: &str) -> &'static str {
    EMBEDDED
        .iter()
        .find(|(file, _)| *file == name)
        .map_or("", |(_, text)| text)
}

fn parse_yaml<T: DeserializeOwned>(name: &str, text: &str) -> GeneratorResult<T> {
    let deserializer = serde_yaml::Deserializer::from_str(text);
    serde_path_to_error::deserialize(deserializer).map_err(|err| {
        let path = err.path().to_string();
        let path = if path.is_empty() || path == "." {
            "<root>".to_string()
        } else {
            path
        };
        catalog_error(format!("{name} schema mismatch at {path}: {}", err.into_inner()))
    })
}

fn require_non_empty(field: &str, len: usize) -> GeneratorResult<()> {
    if len == 0 {
        return Err(catalog_error(format!("{field} cannot be empty")));
    }
    Ok(())
}

fn catalog_error(message: String) -> GeneratorError {
    GeneratorError::Catalog(message)
}
