//! Enumerated FHIR value sets used by the generated resources.
//!
//! Each value set is a Rust enum serialised as its FHIR code. [`Vocabulary::ALL`] lists every
//! member so callers can draw uniformly from the set.

use serde::{Deserialize, Serialize};

/// A closed FHIR value set.
pub trait Vocabulary: Copy + Sized + 'static {
    /// Every member, in declaration order. Never empty.
    const ALL: &'static [Self];

    /// The FHIR code for this member.
    fn code(self) -> &'static str;

    /// Look a member up by its FHIR code.
    fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.code() == code)
    }
}

macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => $code:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $code)]
                $variant,
            )+
        }

        impl Vocabulary for $name {
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn code(self) -> &'static str {
                match self {
                    $($name::$variant => $code),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.code())
            }
        }
    };
}

vocabulary! {
    /// Observation.status
    pub enum ObservationStatus {
        Registered => "registered",
        Preliminary => "preliminary",
        Final => "final",
        Amended => "amended",
        Corrected => "corrected",
        Cancelled => "cancelled",
        EnteredInError => "entered-in-error",
        Unknown => "unknown",
    }
}

vocabulary! {
    /// AllergyIntolerance.clinicalStatus
    pub enum AllergyClinicalStatus {
        Active => "active",
        Inactive => "inactive",
        Resolved => "resolved",
    }
}

vocabulary! {
    /// AllergyIntolerance.verificationStatus
    pub enum AllergyVerificationStatus {
        Unconfirmed => "unconfirmed",
        Presumed => "presumed",
        Confirmed => "confirmed",
        Refuted => "refuted",
        EnteredInError => "entered-in-error",
    }
}

vocabulary! {
    pub enum AllergyType {
        Allergy => "allergy",
        Intolerance => "intolerance",
    }
}

vocabulary! {
    /// Condition.clinicalStatus
    pub enum ConditionStatus {
        Active => "active",
        Recurrence => "recurrence",
        Remission => "remission",
        Resolved => "resolved",
    }
}

vocabulary! {
    /// MedicationStatement.status as used for prescriptions.
    pub enum PrescriptionStatus {
        Active => "active",
        OnHold => "on-hold",
        Ended => "ended",
        Stopped => "stopped",
        Completed => "completed",
        Cancelled => "cancelled",
        EnteredInError => "entered-in-error",
        Draft => "draft",
        Unknown => "unknown",
    }
}

vocabulary! {
    /// MedicationStatement adherence codes.
    pub enum AdherenceStatus {
        Taking => "taking",
        TakingAsDirected => "taking-as-directed",
        TakingNotAsDirected => "taking-not-as-directed",
        NotTaking => "not-taking",
        OnHold => "on-hold",
        OnHoldAsDirected => "on-hold-as-directed",
        OnHoldNotAsDirected => "on-hold-not-as-directed",
        Stopped => "stopped",
        StoppedAsDirected => "stopped-as-directed",
        StoppedNotAsDirected => "stopped-not-as-directed",
        Unknown => "unknown",
    }
}

vocabulary! {
    /// MedicationAdministration.status
    pub enum AdministrationStatus {
        InProgress => "in-progress",
        NotDone => "not-done",
        OnHold => "on-hold",
        Completed => "completed",
        EnteredInError => "entered-in-error",
        Stopped => "stopped",
        Unknown => "unknown",
    }
}

vocabulary! {
    /// EpisodeOfCare.status
    pub enum EpisodeStatus {
        Active => "active",
        Finished => "finished",
        Cancelled => "cancelled",
        Waitlist => "waitlist",
    }
}

vocabulary! {
    /// CarePlan.status
    pub enum CarePlanStatus {
        Draft => "draft",
        Active => "active",
        OnHold => "on-hold",
        Completed => "completed",
        Revoked => "revoked",
        EnteredInError => "entered-in-error",
        Ended => "ended",
        Unknown => "unknown",
    }
}

vocabulary! {
    /// Goal.lifecycleStatus
    pub enum GoalStatus {
        Proposed => "proposed",
        Planned => "planned",
        Accepted => "accepted",
        Active => "active",
        OnHold => "on-hold",
        Completed => "completed",
        Cancelled => "cancelled",
        EnteredInError => "entered-in-error",
        Rejected => "rejected",
    }
}

vocabulary! {
    /// CarePlan.activity.detail.status
    pub enum ActivityStatus {
        NotStarted => "not-started",
        Scheduled => "scheduled",
        InProgress => "in-progress",
        OnHold => "on-hold",
        Completed => "completed",
        Cancelled => "cancelled",
        Stopped => "stopped",
        Unknown => "unknown",
        EnteredInError => "entered-in-error",
    }
}

vocabulary! {
    /// Encounter.status
    pub enum EncounterStatus {
        Planned => "planned",
        Arrived => "arrived",
        InProgress => "in-progress",
        OnLeave => "onleave",
        Finished => "finished",
        Cancelled => "cancelled",
    }
}

vocabulary! {
    /// Task.status
    pub enum TaskStatus {
        Draft => "draft",
        Requested => "requested",
        Accepted => "accepted",
        InProgress => "in-progress",
        Completed => "completed",
        Cancelled => "cancelled",
        Failed => "failed",
    }
}

vocabulary! {
    /// Task.intent
    pub enum TaskIntent {
        Unknown => "unknown",
        Proposal => "proposal",
        Plan => "plan",
        Order => "order",
        OriginalOrder => "original-order",
        ReflexOrder => "reflex-order",
        FillerOrder => "filler-order",
        InstanceOrder => "instance-order",
        Optional => "option",
    }
}

vocabulary! {
    /// Task.priority
    pub enum TaskPriority {
        Routine => "routine",
        Urgent => "urgent",
        Asap => "asap",
        Stat => "stat",
    }
}

vocabulary! {
    /// Procedure.status
    pub enum ProcedureStatus {
        Preparation => "preparation",
        InProgress => "in-progress",
        Completed => "completed",
        Stopped => "stopped",
        EnteredInError => "entered-in-error",
    }
}

vocabulary! {
    /// Claim lifecycle as tracked by the billing ledger.
    pub enum ClaimStatus {
        Draft => "draft",
        Submitted => "submitted",
        Adjudicated => "adjudicated",
        Paid => "paid",
    }
}

vocabulary! {
    /// Coverage.status
    pub enum CoverageStatus {
        Active => "active",
        Cancelled => "cancelled",
        Draft => "draft",
        EnteredInError => "entered-in-error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_serde() {
        for status in AdherenceStatus::ALL {
            let json = serde_json::to_string(status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.code()));
            let back: AdherenceStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(back, *status);
        }
    }

    #[test]
    fn value_set_sizes_match_fhir() {
        assert_eq!(ObservationStatus::ALL.len(), 8);
        assert_eq!(AllergyVerificationStatus::ALL.len(), 5);
        assert_eq!(PrescriptionStatus::ALL.len(), 9);
        assert_eq!(AdherenceStatus::ALL.len(), 11);
        assert_eq!(AdministrationStatus::ALL.len(), 7);
        assert_eq!(GoalStatus::ALL.len(), 9);
        assert_eq!(TaskIntent::ALL.len(), 9);
    }

    #[test]
    fn from_code_finds_members() {
        assert_eq!(
            EncounterStatus::from_code("onleave"),
            Some(EncounterStatus::OnLeave)
        );
        assert_eq!(ConditionStatus::from_code("cured"), None);
        assert_eq!(ActivityStatus::Scheduled.to_string(), "scheduled");
    }
}
