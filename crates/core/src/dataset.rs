//! Aggregation of generated records across residents, and the category writer.
//!
//! Each category is written as a pretty-printed JSON array to
//! `<output_dir>/<category>/data-plain.json`.

use crate::category::{Category, CategorySet};
use crate::constants::CATEGORY_FILENAME;
use crate::generators::administrative::{generate_address, generate_identifiers};
use crate::generators::allergies::generate_allergies;
use crate::generators::care_plans::{generate_care_plan, generate_goals, generate_tasks};
use crate::generators::diagnostics::generate_diagnostic_history;
use crate::generators::encounters::generate_encounters;
use crate::generators::episodes::{active_episode, generate_episodes_of_care};
use crate::generators::financials::generate_ledger;
use crate::generators::observations::generate_observations;
use crate::generators::prescriptions::{generate_administrations, generate_prescriptions};
use crate::generators::procedures::generate_procedures;
use crate::generators::{GenerationContext, ResidentRef};
use crate::{GeneratorError, GeneratorResult};
use fhir::{
    Account, Address, Adjustment, Allergy, CarePlan, CarePlanActivity, Charge, Claim, Coverage,
    DiagnosticHistory, Encounter, EpisodeOfCare, Goal, Identifier, Observation, Payment,
    Prescription, PrescriptionAdministration, Procedure, Record, Resident, Task,
};
use rand::Rng;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Every record generated in one run, grouped by category.
#[derive(Clone, Debug, Default)]
pub struct DemoDataset {
    selection: CategorySet,
    pub allergies: Vec<Record<Allergy>>,
    pub prescriptions: Vec<Record<Prescription>>,
    pub prescription_administration: Vec<Record<PrescriptionAdministration>>,
    pub observations: Vec<Record<Observation>>,
    pub diagnostic_history: Vec<Record<DiagnosticHistory>>,
    pub episodes_of_care: Vec<Record<EpisodeOfCare>>,
    pub encounters: Vec<Record<Encounter>>,
    pub goals: Vec<Record<Goal>>,
    pub care_plans: Vec<Record<CarePlan>>,
    pub care_plan_activities: Vec<Record<CarePlanActivity>>,
    pub tasks: Vec<Record<Task>>,
    pub procedures: Vec<Record<Procedure>>,
    pub coverages: Vec<Record<Coverage>>,
    pub charges: Vec<Record<Charge>>,
    pub claims: Vec<Record<Claim>>,
    pub payments: Vec<Record<Payment>>,
    pub adjustments: Vec<Record<Adjustment>>,
    pub accounts: Vec<Record<Account>>,
    pub addresses: Vec<Record<Address>>,
    pub identifiers: Vec<Record<Identifier>>,
}

/// Number of records written per category.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub counts: BTreeMap<Category, usize>,
    pub files: Vec<PathBuf>,
}

impl WriteSummary {
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

impl DemoDataset {
    /// Generate the selected categories (and the categories they reference) for every
    /// resident, in input order.
    pub fn generate<R: Rng + ?Sized>(
        residents: &[Resident],
        ctx: &GenerationContext<'_>,
        selection: &CategorySet,
        rng: &mut R,
    ) -> GeneratorResult<Self> {
        let mut dataset = Self {
            selection: selection.clone(),
            ..Self::default()
        };

        for resident in residents {
            let resident = ResidentRef::from_resident(resident);
            dataset.generate_for(&resident, ctx, rng)?;
        }

        Ok(dataset)
    }

    fn generate_for<R: Rng + ?Sized>(
        &mut self,
        resident: &ResidentRef<'_>,
        ctx: &GenerationContext<'_>,
        rng: &mut R,
    ) -> GeneratorResult<()> {
        let requires = |category| self.selection.requires(category);

        let allergies = if requires(Category::Allergies) {
            generate_allergies(resident, ctx, rng)
        } else {
            Vec::new()
        };

        let mut prescriptions = Vec::new();
        let mut administrations = Vec::new();
        if requires(Category::Prescriptions) {
            prescriptions = generate_prescriptions(resident, ctx, rng);
            if requires(Category::PrescriptionAdministration) {
                administrations = generate_administrations(resident, &prescriptions, ctx, rng);
            }
        }

        let observations = if requires(Category::Observations) {
            generate_observations(resident, ctx, rng)?
        } else {
            Vec::new()
        };

        let diagnostics = if requires(Category::DiagnosticHistory) {
            generate_diagnostic_history(resident, ctx, rng)?
        } else {
            Vec::new()
        };

        let mut episodes = Vec::new();
        let mut encounters = Vec::new();
        let mut procedures = Vec::new();
        if requires(Category::EpisodesOfCare) {
            episodes = generate_episodes_of_care(resident, ctx, rng)?;
            if requires(Category::Encounters) {
                if let Some(active) = active_episode(&episodes) {
                    encounters = generate_encounters(resident, active, ctx, rng);
                }
            }
            if requires(Category::Procedures) {
                procedures = generate_procedures(resident, &encounters, ctx, rng);
            }
        }

        let mut goals = Vec::new();
        let mut care_plans = Vec::new();
        let mut activities = Vec::new();
        let mut tasks = Vec::new();
        if requires(Category::Goals) {
            goals = generate_goals(resident, ctx, rng);
            if requires(Category::CarePlans) {
                let bundle = generate_care_plan(resident, &goals, ctx, rng);
                if requires(Category::Tasks) {
                    tasks = generate_tasks(resident, &bundle, ctx, rng);
                }
                activities = bundle.activities;
                care_plans.push(bundle.care_plan);
            }
        }

        let ledger = if requires(Category::Coverages) {
            Some(generate_ledger(resident, ctx, rng)?)
        } else {
            None
        };

        let address = if requires(Category::Addresses) {
            Some(generate_address(resident, ctx, rng)?)
        } else {
            None
        };

        let identifiers = if requires(Category::Identifiers) {
            generate_identifiers(resident)?
        } else {
            Vec::new()
        };

        tracing::debug!(
            resident_id = resident.id,
            allergies = allergies.len(),
            prescriptions = prescriptions.len(),
            administrations = administrations.len(),
            observations = observations.len(),
            encounters = encounters.len(),
            tasks = tasks.len(),
            "generated resident records"
        );

        self.allergies.extend(allergies);
        self.prescriptions.extend(prescriptions);
        self.prescription_administration.extend(administrations);
        self.observations.extend(observations);
        self.diagnostic_history.extend(diagnostics);
        self.episodes_of_care.extend(episodes);
        self.encounters.extend(encounters);
        self.procedures.extend(procedures);
        self.goals.extend(goals);
        self.care_plans.extend(care_plans);
        self.care_plan_activities.extend(activities);
        self.tasks.extend(tasks);
        if let Some(ledger) = ledger {
            self.coverages.push(ledger.coverage);
            self.charges.extend(ledger.charges);
            self.claims.extend(ledger.claims);
            self.payments.extend(ledger.payments);
            self.adjustments.extend(ledger.adjustments);
            self.accounts.push(ledger.account);
        }
        self.addresses.extend(address);
        self.identifiers.extend(identifiers);

        Ok(())
    }

    /// The categories this dataset writes.
    pub fn selection(&self) -> &CategorySet {
        &self.selection
    }

    /// Records held for `category`, whether or not it is selected for output.
    pub fn count(&self, category: Category) -> usize {
        match category {
            Category::Allergies => self.allergies.len(),
            Category::Prescriptions => self.prescriptions.len(),
            Category::PrescriptionAdministration => self.prescription_administration.len(),
            Category::Observations => self.observations.len(),
            Category::DiagnosticHistory => self.diagnostic_history.len(),
            Category::EpisodesOfCare => self.episodes_of_care.len(),
            Category::Encounters => self.encounters.len(),
            Category::Goals => self.goals.len(),
            Category::CarePlans => self.care_plans.len(),
            Category::CarePlanActivities => self.care_plan_activities.len(),
            Category::Tasks => self.tasks.len(),
            Category::Procedures => self.procedures.len(),
            Category::Coverages => self.coverages.len(),
            Category::Charges => self.charges.len(),
            Category::Claims => self.claims.len(),
            Category::Payments => self.payments.len(),
            Category::Adjustments => self.adjustments.len(),
            Category::Accounts => self.accounts.len(),
            Category::Addresses => self.addresses.len(),
            Category::Identifiers => self.identifiers.len(),
        }
    }

    /// Write every selected category under `output_dir`, empty categories included.
    ///
    /// # Errors
    ///
    /// - [`GeneratorError::DirCreation`] if a category directory cannot be created.
    /// - [`GeneratorError::FileWrite`] if a file cannot be created or flushed.
    /// - [`GeneratorError::Serialization`] if a record cannot be serialised.
    pub fn write_all(&self, output_dir: &Path) -> GeneratorResult<WriteSummary> {
        let mut summary = WriteSummary::default();

        for category in self.selection.iter() {
            let path = match category {
                Category::Allergies => write_category(output_dir, category, &self.allergies)?,
                Category::Prescriptions => {
                    write_category(output_dir, category, &self.prescriptions)?
                }
                Category::PrescriptionAdministration => {
                    write_category(output_dir, category, &self.prescription_administration)?
                }
                Category::Observations => {
                    write_category(output_dir, category, &self.observations)?
                }
                Category::DiagnosticHistory => {
                    write_category(output_dir, category, &self.diagnostic_history)?
                }
                Category::EpisodesOfCare => {
                    write_category(output_dir, category, &self.episodes_of_care)?
                }
                Category::Encounters => write_category(output_dir, category, &self.encounters)?,
                Category::Goals => write_category(output_dir, category, &self.goals)?,
                Category::CarePlans => write_category(output_dir, category, &self.care_plans)?,
                Category::CarePlanActivities => {
                    write_category(output_dir, category, &self.care_plan_activities)?
                }
                Category::Tasks => write_category(output_dir, category, &self.tasks)?,
                Category::Procedures => write_category(output_dir, category, &self.procedures)?,
                Category::Coverages => write_category(output_dir, category, &self.coverages)?,
                Category::Charges => write_category(output_dir, category, &self.charges)?,
                Category::Claims => write_category(output_dir, category, &self.claims)?,
                Category::Payments => write_category(output_dir, category, &self.payments)?,
                Category::Adjustments => {
                    write_category(output_dir, category, &self.adjustments)?
                }
                Category::Accounts => write_category(output_dir, category, &self.accounts)?,
                Category::Addresses => write_category(output_dir, category, &self.addresses)?,
                Category::Identifiers => {
                    write_category(output_dir, category, &self.identifiers)?
                }
            };

            let count = self.count(category);
            tracing::info!("wrote {} {} records to {}", count, category, path.display());
            summary.counts.insert(category, count);
            summary.files.push(path);
        }

        Ok(summary)
    }
}

fn write_category<T: Serialize>(
    output_dir: &Path,
    category: Category,
    records: &[T],
) -> GeneratorResult<PathBuf> {
    let dir = output_dir.join(category.dir_name());
    fs::create_dir_all(&dir).map_err(|source| GeneratorError::DirCreation {
        path: dir.clone(),
        source,
    })?;

    let path = dir.join(CATEGORY_FILENAME);
    let file = File::create(&path).map_err(|source| GeneratorError::FileWrite {
        path: path.clone(),
        source,
    })?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, records).map_err(GeneratorError::Serialization)?;
    writer.flush().map_err(|source| GeneratorError::FileWrite {
        path: path.clone(),
        source,
    })?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::test_support::Fixture;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn residents() -> Vec<Resident> {
        Resident::parse_list(
            r#"[
                {"id": "r1",
                 "data": {"resident_name": "Adaeze Okafor", "resident_code": "GYR-0001"}},
                {"id": "r2", "data": {"resident_name": "Tunde Bakare"}}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn observations_only_for_one_resident() {
        let fixture = Fixture::new();
        let residents = Resident::parse_list(r#"[{"id": "r1", "data": {}}]"#).unwrap();
        let selection = CategorySet::parse_list("observations").unwrap();
        let mut rng = StdRng::seed_from_u64(11);

        let dataset =
            DemoDataset::generate(&residents, &fixture.ctx(), &selection, &mut rng).unwrap();

        assert!((3..=8).contains(&dataset.observations.len()));
        assert!(dataset
            .observations
            .iter()
            .all(|o| o.data.resident_id == "r1"));
        assert!(dataset.allergies.is_empty());
        assert!(dataset.charges.is_empty());
    }

    #[test]
    fn unselected_parents_are_generated_but_not_written() {
        let fixture = Fixture::new();
        let selection = CategorySet::parse_list("tasks").unwrap();
        let mut rng = StdRng::seed_from_u64(5);

        let dataset =
            DemoDataset::generate(&residents(), &fixture.ctx(), &selection, &mut rng).unwrap();
        assert_eq!(dataset.care_plans.len(), 2);
        assert!(!dataset.tasks.is_empty());

        let plan_ids: HashSet<String> = dataset.care_plans.iter().map(|p| p.id_string()).collect();
        assert!(dataset
            .tasks
            .iter()
            .all(|t| plan_ids.contains(&t.data.careplan_id)));

        let dir = TempDir::new().unwrap();
        let summary = dataset.write_all(dir.path()).unwrap();
        assert_eq!(summary.counts.len(), 1);
        assert!(dir.path().join("tasks").join(CATEGORY_FILENAME).exists());
        assert!(!dir.path().join("care_plans").exists());
    }

    #[test]
    fn full_run_links_records_and_writes_every_category() {
        let fixture = Fixture::new();
        let mut rng = StdRng::seed_from_u64(42);
        let dataset =
            DemoDataset::generate(&residents(), &fixture.ctx(), &CategorySet::all(), &mut rng)
                .unwrap();

        let prescription_ids: HashSet<String> =
            dataset.prescriptions.iter().map(|p| p.id_string()).collect();
        assert!(dataset
            .prescription_administration
            .iter()
            .all(|a| prescription_ids.contains(&a.data.prescription_id)));

        assert_eq!(dataset.accounts.len(), 2);
        assert_eq!(dataset.coverages.len(), 2);
        assert_eq!(dataset.addresses.len(), 2);
        // Only r1 has a resident code.
        assert_eq!(dataset.identifiers.len(), 1);

        let dir = TempDir::new().unwrap();
        let summary = dataset.write_all(dir.path()).unwrap();
        assert_eq!(summary.counts.len(), Category::ALL.len());
        assert_eq!(summary.files.len(), Category::ALL.len());

        for category in Category::ALL {
            let path = dir.path().join(category.dir_name()).join(CATEGORY_FILENAME);
            let text = fs::read_to_string(&path).unwrap();
            let value: serde_json::Value = serde_json::from_str(&text).unwrap();
            let array = value.as_array().unwrap();
            assert_eq!(array.len(), dataset.count(category), "{category}");
        }

        let text =
            fs::read_to_string(dir.path().join("accounts").join(CATEGORY_FILENAME)).unwrap();
        assert!(text.starts_with("[\n  {"));
    }

    #[test]
    fn empty_selected_category_is_still_written() {
        let mut fixture = Fixture::new();
        fixture.tables.allergy_substances.clear();
        let selection = CategorySet::parse_list("allergies").unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        let dataset =
            DemoDataset::generate(&residents(), &fixture.ctx(), &selection, &mut rng).unwrap();
        assert!(dataset.allergies.is_empty());

        let dir = TempDir::new().unwrap();
        let summary = dataset.write_all(dir.path()).unwrap();
        assert_eq!(summary.total(), 0);
        let text =
            fs::read_to_string(dir.path().join("allergies").join(CATEGORY_FILENAME)).unwrap();
        assert_eq!(text, "[]");
    }

    #[test]
    fn write_fails_when_output_is_a_file() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("out");
        fs::write(&blocker, "not a directory").unwrap();

        let dataset = DemoDataset {
            selection: CategorySet::parse_list("goals").unwrap(),
            ..DemoDataset::default()
        };
        assert!(matches!(
            dataset.write_all(&blocker),
            Err(GeneratorError::DirCreation { .. })
        ));
    }
}
