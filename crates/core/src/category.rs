//! Generated record categories and category selection.

use crate::{GeneratorError, GeneratorResult};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// One generated collection; each is written to its own directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Allergies,
    Prescriptions,
    PrescriptionAdministration,
    Observations,
    DiagnosticHistory,
    EpisodesOfCare,
    Encounters,
    Goals,
    CarePlans,
    CarePlanActivities,
    Tasks,
    Procedures,
    Coverages,
    Charges,
    Claims,
    Payments,
    Adjustments,
    Accounts,
    Addresses,
    Identifiers,
}

impl Category {
    pub const ALL: [Category; 20] = [
        Category::Allergies,
        Category::Prescriptions,
        Category::PrescriptionAdministration,
        Category::Observations,
        Category::DiagnosticHistory,
        Category::EpisodesOfCare,
        Category::Encounters,
        Category::Goals,
        Category::CarePlans,
        Category::CarePlanActivities,
        Category::Tasks,
        Category::Procedures,
        Category::Coverages,
        Category::Charges,
        Category::Claims,
        Category::Payments,
        Category::Adjustments,
        Category::Accounts,
        Category::Addresses,
        Category::Identifiers,
    ];

    /// Output directory name, e.g. `prescription_administration`.
    pub fn dir_name(self) -> &'static str {
        match self {
            Category::Allergies => "allergies",
            Category::Prescriptions => "prescriptions",
            Category::PrescriptionAdministration => "prescription_administration",
            Category::Observations => "observations",
            Category::DiagnosticHistory => "diagnostic_history",
            Category::EpisodesOfCare => "episodes_of_care",
            Category::Encounters => "encounters",
            Category::Goals => "goals",
            Category::CarePlans => "care_plans",
            Category::CarePlanActivities => "care_plan_activities",
            Category::Tasks => "tasks",
            Category::Procedures => "procedures",
            Category::Coverages => "coverages",
            Category::Charges => "charges",
            Category::Claims => "claims",
            Category::Payments => "payments",
            Category::Adjustments => "adjustments",
            Category::Accounts => "accounts",
            Category::Addresses => "addresses",
            Category::Identifiers => "identifiers",
        }
    }

    /// Whether this category is part of the billing ledger.
    pub fn is_financial(self) -> bool {
        matches!(
            self,
            Category::Coverages
                | Category::Charges
                | Category::Claims
                | Category::Payments
                | Category::Adjustments
                | Category::Accounts
        )
    }

    /// Categories whose records this one references.
    fn parents(self) -> &'static [Category] {
        match self {
            Category::PrescriptionAdministration => &[Category::Prescriptions],
            Category::Encounters => &[Category::EpisodesOfCare],
            Category::CarePlans => &[Category::Goals],
            Category::CarePlanActivities | Category::Tasks => &[Category::CarePlans],
            Category::Procedures => &[Category::Encounters],
            _ => &[],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl FromStr for Category {
    type Err = GeneratorError;

    /// Accepts directory names; `-` is read as `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_ascii_lowercase().replace('-', "_");
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.dir_name() == normalised)
            .ok_or_else(|| GeneratorError::InvalidInput(format!("unknown category: '{s}'")))
    }
}

/// The categories a run writes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategorySet(BTreeSet<Category>);

impl Default for CategorySet {
    fn default() -> Self {
        Self::all()
    }
}

impl CategorySet {
    pub fn all() -> Self {
        Self(Category::ALL.into_iter().collect())
    }

    /// # Errors
    ///
    /// Returns [`GeneratorError::InvalidInput`] for an empty selection.
    pub fn from_categories(
        categories: impl IntoIterator<Item = Category>,
    ) -> GeneratorResult<Self> {
        let set: BTreeSet<Category> = categories.into_iter().collect();
        if set.is_empty() {
            return Err(GeneratorError::InvalidInput(
                "category selection cannot be empty".into(),
            ));
        }
        Ok(Self(set))
    }

    /// Parse a comma separated list such as `observations,allergies`.
    pub fn parse_list(value: &str) -> GeneratorResult<Self> {
        let categories = value
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect::<GeneratorResult<Vec<Category>>>()?;
        Self::from_categories(categories)
    }

    pub fn contains(&self, category: Category) -> bool {
        self.0.contains(&category)
    }

    pub fn iter(&self) -> impl Iterator<Item = Category> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `category` has to be generated: selected, or referenced by a selected one.
    pub fn requires(&self, category: Category) -> bool {
        if category.is_financial() {
            return self.0.iter().any(|c| c.is_financial());
        }
        self.0.iter().any(|&selected| depends_on(selected, category))
    }
}

fn depends_on(category: Category, target: Category) -> bool {
    category == target || category.parents().iter().any(|&p| depends_on(p, target))
}
