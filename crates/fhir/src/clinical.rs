//! Clinical record payloads.
//!
//! Each struct is the `data` half of a [`crate::Record`]. Field names follow the stored
//! snake_case document shape; references to other records are plain id strings.

use crate::datatypes::{
    CodeableConcept, DosageInstruction, Medication, Performer, Period, StaffMember, Strength,
    Subject, Timing, ValueQuantity,
};
use crate::vocab::{
    ActivityStatus, AdherenceStatus, AdministrationStatus, AllergyClinicalStatus,
    AllergyType, AllergyVerificationStatus, CarePlanStatus, ConditionStatus, EncounterStatus,
    EpisodeStatus, GoalStatus, ObservationStatus, PrescriptionStatus, ProcedureStatus,
    TaskIntent, TaskPriority, TaskStatus,
};
use crate::Record;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllergyReaction {
    pub code: CodeableConcept,
    pub severity: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allergy {
    pub resident_id: String,
    pub recorder_id: String,
    pub clinical_status: AllergyClinicalStatus,
    pub verification_status: AllergyVerificationStatus,
    pub name: CodeableConcept,
    #[serde(rename = "type")]
    pub allergy_type: AllergyType,
    #[serde(with = "crate::instant")]
    pub recorded_date: DateTime<Utc>,
    pub substance: CodeableConcept,
    pub reaction: AllergyReaction,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    pub resident_id: String,
    pub recorder_id: String,
    pub period: Period,
    pub status: PrescriptionStatus,
    pub adherence: AdherenceStatus,
    pub medication: Medication,
    pub dosage_instruction: Vec<DosageInstruction>,
}

impl Prescription {
    /// The instruction that drives administration scheduling.
    pub fn primary_dosage(&self) -> Option<&DosageInstruction> {
        self.dosage_instruction.first()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdministeredDosage {
    pub route: CodeableConcept,
    pub administered_dose: Strength,
}

/// One eMAR entry: a single dose given (or not) against a prescription.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrescriptionAdministration {
    pub resident_id: String,
    pub prescription_id: String,
    pub medication: Medication,
    pub recorder_id: String,
    pub status: AdministrationStatus,
    #[serde(with = "crate::instant")]
    pub effective_datetime: DateTime<Utc>,
    pub dosage: AdministeredDosage,
    /// 1-based index of the dose within its day.
    pub dose_number: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub resident_id: String,
    pub recorder_id: String,
    pub status: ObservationStatus,
    pub category: Vec<CodeableConcept>,
    pub code: CodeableConcept,
    #[serde(with = "crate::instant")]
    pub effective_datetime: DateTime<Utc>,
    pub value_quantity: ValueQuantity,
    pub body_site: CodeableConcept,
    pub method: CodeableConcept,
    pub device: CodeableConcept,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticHistory {
    pub resident_id: String,
    pub recorder_id: String,
    pub clinical_status: ConditionStatus,
    #[serde(with = "crate::instant")]
    pub recorded_date: DateTime<Utc>,
    #[serde(with = "crate::instant")]
    pub onset_datetime: DateTime<Utc>,
    /// Only set when the condition is resolved.
    #[serde(default, with = "crate::instant::option")]
    pub abatement_datetime: Option<DateTime<Utc>>,
    pub code: CodeableConcept,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeOfCare {
    pub resident_id: String,
    pub status: EpisodeStatus,
    #[serde(rename = "type")]
    pub episode_type: CodeableConcept,
    pub period: Period,
    pub managing_organization: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encounter {
    pub subject: Subject,
    pub status: EncounterStatus,
    #[serde(rename = "type")]
    pub encounter_type: CodeableConcept,
    pub period: Period,
    pub episodes_of_care_id: String,
    pub participant_id: String,
    #[serde(with = "crate::instant")]
    pub recorded_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub resident_id: String,
    pub lifecycle_status: GoalStatus,
    pub category: String,
    pub priority: String,
    pub description: CodeableConcept,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarePlanActivity {
    pub careplan_id: String,
    pub code: CodeableConcept,
    pub status: ActivityStatus,
    pub timing: Timing,
    pub performer: StaffMember,
    pub staff_instructions: String,
}

impl CarePlanActivity {
    /// SNOMED code of the activity, when it has one.
    pub fn activity_code(&self) -> Option<&str> {
        self.code.coding.first().and_then(|c| c.code.as_deref())
    }
}

/// A care plan with its activities embedded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarePlan {
    pub resident_id: String,
    pub status: CarePlanStatus,
    pub title: String,
    pub author_id: String,
    #[serde(with = "crate::instant")]
    pub created_date: DateTime<Utc>,
    pub goal_ids: Vec<String>,
    #[serde(default)]
    pub activities: Vec<Record<CarePlanActivity>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub resident_id: String,
    pub careplan_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_code: Option<String>,
    pub status: TaskStatus,
    pub intent: TaskIntent,
    pub priority: TaskPriority,
    pub requested_period: Period,
    pub execution_period: Period,
    pub performer: Performer,
    pub notes: String,
    #[serde(with = "crate::instant")]
    pub authored_on: DateTime<Utc>,
    #[serde(with = "crate::instant")]
    pub last_modified: DateTime<Utc>,
    pub do_not_perform: bool,
    #[serde(with = "crate::instant")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::instant")]
    pub updated_at: DateTime<Utc>,
    #[serde(with = "crate::instant")]
    pub viewed_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Procedure {
    pub resident_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encounter_id: Option<String>,
    pub code: CodeableConcept,
    pub status: ProcedureStatus,
    pub category: String,
    #[serde(with = "crate::instant")]
    pub performed_start: DateTime<Utc>,
    #[serde(with = "crate::instant")]
    pub performed_end: DateTime<Utc>,
    pub performer_id: String,
    pub performer_name: String,
    pub outcome: String,
    #[serde(with = "crate::instant")]
    pub recorded_at: DateTime<Utc>,
    #[serde(with = "crate::instant")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::instant")]
    pub updated_at: DateTime<Utc>,
    #[serde(with = "crate::instant")]
    pub viewed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::{Coding, SNOMED_SYSTEM};
    use chrono::TimeZone;
    use serde_json::json;

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 5, 2, h, 0, 0).unwrap()
    }

    #[test]
    fn allergy_type_serialises_as_type() {
        let allergy = Allergy {
            resident_id: "r1".into(),
            recorder_id: "s1".into(),
            clinical_status: AllergyClinicalStatus::Active,
            verification_status: AllergyVerificationStatus::Confirmed,
            name: CodeableConcept::from_coding(Coding::snomed("91936005", "Penicillin allergy")),
            allergy_type: AllergyType::Intolerance,
            recorded_date: at(9),
            substance: CodeableConcept::from_coding(Coding::snomed("764146007", "Penicillin")),
            reaction: AllergyReaction {
                code: CodeableConcept::from_coding(Coding::snomed("271807003", "Rash")),
                severity: "mild".into(),
            },
        };

        let value = serde_json::to_value(&allergy).unwrap();
        assert_eq!(value["type"], json!("intolerance"));
        assert_eq!(value["recorded_date"], json!("2023-05-02T09:00:00Z"));
        assert_eq!(value["reaction"]["severity"], json!("mild"));
        assert!(value.get("allergy_type").is_none());
    }

    #[test]
    fn unresolved_condition_has_null_abatement() {
        let condition = DiagnosticHistory {
            resident_id: "r1".into(),
            recorder_id: "s1".into(),
            clinical_status: ConditionStatus::Active,
            recorded_date: at(10),
            onset_datetime: at(8),
            abatement_datetime: None,
            code: CodeableConcept::from_coding(Coding::snomed("38341003", "Hypertension")),
        };

        let value = serde_json::to_value(&condition).unwrap();
        assert_eq!(value["abatement_datetime"], serde_json::Value::Null);

        let back: DiagnosticHistory = serde_json::from_value(value).unwrap();
        assert_eq!(back, condition);
    }

    #[test]
    fn activity_code_reads_first_coding() {
        let repeat = crate::datatypes::Repeat {
            frequency: 1,
            period: 1,
            period_unit: "d".into(),
            day_of_week: vec![],
            time_of_day: vec![],
        };
        let mut activity = CarePlanActivity {
            careplan_id: "cp".into(),
            code: CodeableConcept::from_coding(Coding {
                system: SNOMED_SYSTEM.into(),
                code: None,
                display: "Check skin integrity (daily)".into(),
            }),
            status: ActivityStatus::Scheduled,
            timing: Timing {
                code: CodeableConcept::text_only("once daily"),
                repeat,
            },
            performer: StaffMember {
                id: "s1".into(),
                name: "Staff Member 1".into(),
            },
            staff_instructions: "Ensure resident comfort during check skin integrity.".into(),
        };
        assert_eq!(activity.activity_code(), None);

        activity.code = CodeableConcept::from_coding(Coding::snomed("386420003", "Bathing"));
        assert_eq!(activity.activity_code(), Some("386420003"));
    }
}
