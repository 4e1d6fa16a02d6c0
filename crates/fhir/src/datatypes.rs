//! FHIR-aligned general purpose datatypes.
//!
//! These mirror the snake_case shapes the assisted-living app stores in Firestore, not the
//! camelCase FHIR JSON wire format.

use chrono::{DateTime, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// SNOMED CT code system URI.
pub const SNOMED_SYSTEM: &str = "http://snomed.info/sct";
/// LOINC code system URI.
pub const LOINC_SYSTEM: &str = "http://loinc.org";
/// UCUM unit system URI.
pub const UCUM_SYSTEM: &str = "http://unitsofmeasure.org";

/// A terminology binding: `(system, code, display)`.
///
/// `code` is nullable because some local care activities have no SNOMED concept yet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coding {
    pub system: String,
    pub code: Option<String>,
    pub display: String,
}

impl Coding {
    pub fn new(system: &str, code: &str, display: &str) -> Self {
        Self {
            system: system.to_owned(),
            code: Some(code.to_owned()),
            display: display.to_owned(),
        }
    }

    pub fn snomed(code: &str, display: &str) -> Self {
        Self::new(SNOMED_SYSTEM, code, display)
    }
}

/// A concept expressed by zero or more codings plus free text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeableConcept {
    #[serde(default)]
    pub coding: Vec<Coding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl CodeableConcept {
    /// Wrap a single coding, using its display as the text.
    pub fn from_coding(coding: Coding) -> Self {
        let text = Some(coding.display.clone());
        Self {
            coding: vec![coding],
            text,
        }
    }

    /// Wrap a list of codings, using the first display as the text.
    pub fn from_codings(coding: Vec<Coding>) -> Self {
        let text = coding.first().map(|c| c.display.clone());
        Self { coding, text }
    }

    /// Text-only concept with no codings.
    pub fn text_only(text: &str) -> Self {
        Self {
            coding: Vec::new(),
            text: Some(text.to_owned()),
        }
    }

    /// Display of the first coding, falling back to the text.
    pub fn display(&self) -> Option<&str> {
        self.coding
            .first()
            .map(|c| c.display.as_str())
            .or(self.text.as_deref())
    }
}

/// A time range; `end` is `null` for open periods.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    #[serde(with = "crate::instant")]
    pub start: DateTime<Utc>,
    #[serde(default, with = "crate::instant::option")]
    pub end: Option<DateTime<Utc>>,
}

impl Period {
    pub fn closed(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    pub fn open(start: DateTime<Utc>) -> Self {
        Self { start, end: None }
    }
}

/// An amount of money.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Money {
    pub value: f64,
    pub currency: String,
}

impl Money {
    /// Build an amount, rounding the value to two decimal places.
    pub fn new(value: f64, currency: &str) -> Self {
        Self {
            value: round_cents(value),
            currency: currency.to_owned(),
        }
    }
}

/// Round to two decimal places.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Medication strength or an administered dose.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Strength {
    pub value: f64,
    pub unit: String,
}

/// A vital-sign reading: integral for counted/pressure vitals, one decimal otherwise.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VitalValue {
    Integer(i64),
    Decimal(f64),
}

impl VitalValue {
    pub fn as_f64(self) -> f64 {
        match self {
            VitalValue::Integer(v) => v as f64,
            VitalValue::Decimal(v) => v,
        }
    }
}

/// Observation value with its UCUM unit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValueQuantity {
    pub value: VitalValue,
    pub unit: String,
    pub system: String,
    pub code: String,
}

/// When an event repeats.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repeat {
    pub frequency: u32,
    pub period: u32,
    pub period_unit: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub day_of_week: Vec<String>,
    #[serde(default)]
    pub time_of_day: Vec<NaiveTime>,
}

impl Repeat {
    /// Days between occurrences, or `None` for units that are not day based.
    pub fn interval_days(&self) -> Option<u32> {
        let period = self.period.max(1);
        match self.period_unit.as_str() {
            "d" => Some(period),
            "wk" => Some(period * 7),
            "mo" => Some(period * 30),
            _ => None,
        }
    }

    /// Listed `day_of_week` codes (`mon` … `sun`); unknown codes are dropped.
    pub fn weekdays(&self) -> Vec<Weekday> {
        self.day_of_week
            .iter()
            .filter_map(|code| code.parse::<Weekday>().ok())
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timing {
    pub code: CodeableConcept,
    pub repeat: Repeat,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DoseAndRate {
    pub dose_quantity: Strength,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DosageInstruction {
    pub timing: Timing,
    pub site: CodeableConcept,
    pub route: CodeableConcept,
    pub method: CodeableConcept,
    pub dose_and_rate: Vec<DoseAndRate>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    pub code: CodeableConcept,
    pub strength: Strength,
}

/// Denormalised reference: an id plus the display name at generation time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub name: String,
}

/// A staff member reference.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: String,
    pub name: String,
}

/// Staff member who carries out an activity or task.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Performer {
    pub id: String,
    pub name: String,
    pub period: Period,
}
