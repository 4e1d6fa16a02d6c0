//! The resident billing ledger.
//!
//! Built in one pass so that every amount is consistent: claims total their charges,
//! payments and adjustments never exceed a claim's total, and the account balance is what
//! remains of the charges.

use super::{GenerationContext, ResidentRef};
use crate::catalog::PayorTemplate;
use crate::sampling::{fresh_id, pick_code, uniform_cents};
use crate::window::DateWindow;
use crate::GeneratorResult;
use fhir::datatypes::{round_cents, CodeableConcept, Coding, Money, Period};
use fhir::financial::{Account, Adjustment, Charge, Claim, Coverage, Payment, Payor};
use fhir::vocab::CoverageStatus;
use fhir::Record;
use rand::seq::SliceRandom;
use rand::Rng;

const ACCOUNT_BILLING_STATUS_SYSTEM: &str =
    "http://terminology.hl7.org/CodeSystem/account-billing-status";

/// Every financial record generated for one resident.
#[derive(Clone, Debug, PartialEq)]
pub struct Ledger {
    pub coverage: Record<Coverage>,
    pub charges: Vec<Record<Charge>>,
    pub claims: Vec<Record<Claim>>,
    pub payments: Vec<Record<Payment>>,
    pub adjustments: Vec<Record<Adjustment>>,
    pub account: Record<Account>,
}

/// Generate the full ledger for one resident.
pub fn generate_ledger<R: Rng + ?Sized>(
    resident: &ResidentRef<'_>,
    ctx: &GenerationContext<'_>,
    rng: &mut R,
) -> GeneratorResult<Ledger> {
    let (coverage, payor) = generate_coverage(resident, ctx, rng);
    let charges = generate_charges(resident, ctx, rng);
    let claims = generate_claims(resident, &coverage, &charges, rng);

    let payor_name = payor.map_or("Self-pay", PayorTemplate::display);
    let payment_method = payor.map_or("cash", |p| p.method.as_str());

    let mut payments = Vec::new();
    let mut adjustments = Vec::new();
    for claim in claims.iter().filter(|c| c.data.is_settleable()) {
        let total = claim.data.total.value;
        let paid = round_cents(total * rng.gen_range(0.3..=1.0)).min(total);
        let settle_window = settlement_window(claim, ctx)?;

        payments.push(Record::new(
            fresh_id(rng),
            Payment {
                resident_id: resident.id.to_string(),
                claim_id: claim.id_string(),
                coverage_id: Some(coverage.id_string()),
                amount: Money::new(paid, ctx.currency),
                payor: payor_name.to_string(),
                occurrence_datetime: settle_window.random_instant(rng),
                method: payment_method.to_string(),
            },
        ));

        let remaining = round_cents(total - paid);
        if remaining > 0.0 && rng.gen_bool(0.5) {
            let approved = floor_cents(rng.gen_range(0.0..=remaining));
            let Some(reason) = ctx.catalog.adjustment_reasons.choose(rng) else {
                continue;
            };
            adjustments.push(Record::new(
                fresh_id(rng),
                Adjustment {
                    resident_id: resident.id.to_string(),
                    claim_id: claim.id_string(),
                    reason: reason.clone(),
                    approved_amount: Money::new(approved, ctx.currency),
                    coverage_id: Some(coverage.id_string()),
                    created_at: settle_window.random_instant(rng),
                },
            ));
        }
    }

    let balance = account_balance(&charges, &payments, &adjustments);
    let account = Record::new(
        fresh_id(rng),
        Account {
            subject: resident.subject(),
            billing_status: CodeableConcept::from_coding(Coding::new(
                ACCOUNT_BILLING_STATUS_SYSTEM,
                "open",
                "Open",
            )),
            service_period: Period::closed(ctx.window.start(), ctx.window.end()),
            balance: Money::new(balance, ctx.currency),
            authored_on: ctx.window.start(),
        },
    );

    tracing::debug!(
        resident_id = resident.id,
        charges = charges.len(),
        claims = claims.len(),
        payments = payments.len(),
        adjustments = adjustments.len(),
        balance,
        "generated ledger"
    );

    Ok(Ledger {
        coverage,
        charges,
        claims,
        payments,
        adjustments,
        account,
    })
}

/// Σ charges − Σ payments − Σ adjustments, rounded to cents.
pub fn account_balance(
    charges: &[Record<Charge>],
    payments: &[Record<Payment>],
    adjustments: &[Record<Adjustment>],
) -> f64 {
    let charged: f64 = charges.iter().map(|c| c.data.line_total()).sum();
    let paid: f64 = payments.iter().map(|p| p.data.amount.value).sum();
    let adjusted: f64 = adjustments.iter().map(|a| a.data.approved_amount.value).sum();
    round_cents(charged - paid - adjusted)
}

fn generate_coverage<'c, R: Rng + ?Sized>(
    resident: &ResidentRef<'_>,
    ctx: &GenerationContext<'c>,
    rng: &mut R,
) -> (Record<Coverage>, Option<&'c PayorTemplate>) {
    let payor = ctx.catalog.payors.choose(rng);
    let self_pay = payor.map_or(true, |p| p.organization.is_none());

    let data = Coverage {
        beneficiary_id: resident.id.to_string(),
        status: CoverageStatus::Active,
        coverage_type: payor.map_or("Self-pay", |p| p.coverage_type.as_str()).to_string(),
        payor: Payor {
            id: match payor {
                Some(p) if !self_pay => p.id.clone(),
                _ => resident.id.to_string(),
            },
            organization: payor.and_then(|p| p.organization.clone()),
        },
        period: Period::open(ctx.window.start()),
        policy_number: (!self_pay).then(|| format!("POL-{:08}", rng.gen_range(0..100_000_000u32))),
        plan_name: payor.and_then(|p| p.plan_name.clone()),
        relationship: "self".to_string(),
        authored_on: ctx.window.start(),
    };
    (Record::new(fresh_id(rng), data), payor)
}

fn generate_charges<R: Rng + ?Sized>(
    resident: &ResidentRef<'_>,
    ctx: &GenerationContext<'_>,
    rng: &mut R,
) -> Vec<Record<Charge>> {
    let count = rng.gen_range(0..=5usize);
    let mut charges = Vec::with_capacity(count);
    for _ in 0..count {
        let Some(service) = ctx.catalog.services.choose(rng) else {
            break;
        };
        let data = Charge {
            resident_id: resident.id.to_string(),
            service: service.name.clone(),
            code: service.code.clone(),
            quantity: rng.gen_range(1..=3),
            unit_price: Money::new(
                uniform_cents(rng, service.min_price, service.max_price),
                ctx.currency,
            ),
            occurrence_datetime: ctx.window.full().random_instant(rng),
            description: None,
        };
        charges.push(Record::new(fresh_id(rng), data));
    }
    charges
}

/// Shuffle the charges and bill them in claims of 1–3 charges each.
fn generate_claims<R: Rng + ?Sized>(
    resident: &ResidentRef<'_>,
    coverage: &Record<Coverage>,
    charges: &[Record<Charge>],
    rng: &mut R,
) -> Vec<Record<Claim>> {
    let mut order: Vec<&Record<Charge>> = charges.iter().collect();
    order.shuffle(rng);

    let mut claims = Vec::new();
    let mut rest = order.as_slice();
    while !rest.is_empty() {
        let take = rng.gen_range(1..=3usize).min(rest.len());
        let (batch, tail) = rest.split_at(take);
        rest = tail;

        let total: f64 = batch.iter().map(|c| c.data.line_total()).sum();
        let currency = batch[0].data.unit_price.currency.as_str();
        let authored_on = batch
            .iter()
            .map(|c| c.data.occurrence_datetime)
            .max()
            .unwrap_or(coverage.data.authored_on);

        let data = Claim {
            resident_id: resident.id.to_string(),
            authored_on,
            status: pick_code(rng),
            coverage_id: Some(coverage.id_string()),
            charge_ids: batch.iter().map(|c| c.id_string()).collect(),
            total: Money::new(total, currency),
            description: None,
        };
        claims.push(Record::new(fresh_id(rng), data));
    }
    claims
}

/// Settlement happens between the claim and the end of the run.
fn settlement_window(
    claim: &Record<Claim>,
    ctx: &GenerationContext<'_>,
) -> GeneratorResult<DateWindow> {
    let end = ctx.window.end();
    let start = claim.data.authored_on;
    if start < end {
        DateWindow::new(start, end)
    } else {
        DateWindow::starting_at(start, chrono::Duration::days(1))
    }
}

fn floor_cents(value: f64) -> f64 {
    (value * 100.0).floor() / 100.0
}
