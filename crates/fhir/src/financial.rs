//! Billing ledger payloads.
//!
//! A resident's ledger is built in dependency order: coverage, charges, claims over those
//! charges, then payments and adjustments against claims. The account carries the running
//! balance. All amounts are [`Money`].

use crate::datatypes::{CodeableConcept, Money, Period, Subject};
use crate::vocab::{ClaimStatus, CoverageStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payor {
    pub id: String,
    /// `None` when the resident pays for themselves.
    pub organization: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coverage {
    pub beneficiary_id: String,
    pub status: CoverageStatus,
    #[serde(rename = "type")]
    pub coverage_type: String,
    pub payor: Payor,
    pub period: Period,
    pub policy_number: Option<String>,
    pub plan_name: Option<String>,
    pub relationship: String,
    #[serde(with = "crate::instant")]
    pub authored_on: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Charge {
    pub resident_id: String,
    pub service: String,
    pub code: Option<String>,
    pub quantity: u32,
    pub unit_price: Money,
    #[serde(with = "crate::instant")]
    pub occurrence_datetime: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Charge {
    /// `quantity × unit_price`, unrounded.
    pub fn line_total(&self) -> f64 {
        f64::from(self.quantity) * self.unit_price.value
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub resident_id: String,
    #[serde(with = "crate::instant")]
    pub authored_on: DateTime<Utc>,
    pub status: ClaimStatus,
    pub coverage_id: Option<String>,
    pub charge_ids: Vec<String>,
    pub total: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Claim {
    /// Whether the payor has processed this claim, making it eligible for payment.
    pub fn is_settleable(&self) -> bool {
        matches!(self.status, ClaimStatus::Adjudicated | ClaimStatus::Paid)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub resident_id: String,
    pub claim_id: String,
    pub coverage_id: Option<String>,
    pub amount: Money,
    pub payor: String,
    #[serde(with = "crate::instant")]
    pub occurrence_datetime: DateTime<Utc>,
    pub method: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    pub resident_id: String,
    pub claim_id: String,
    pub reason: String,
    pub approved_amount: Money,
    pub coverage_id: Option<String>,
    #[serde(with = "crate::instant")]
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub subject: Subject,
    pub billing_status: CodeableConcept,
    pub service_period: Period,
    pub balance: Money,
    #[serde(with = "crate::instant")]
    pub authored_on: DateTime<Utc>,
}
