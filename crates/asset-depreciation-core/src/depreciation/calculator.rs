//! Point-in-time depreciation position of a single asset.

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::charges::{accumulated_through, annual_charges};
use super::disposal::{outcome_for_terms, DisposalOutcome};
use super::schedule::{schedule_for_terms, ScheduleEntry};
use super::{DepreciationPolicy, MONTHS_PER_YEAR, ROUNDING_TOLERANCE};
use crate::asset::{Asset, DepreciationMethod, DepreciationTerms};
use crate::day_count::elapsed_between;
use crate::types::{with_metadata, ComputationOutput, Money, Rate, Years};
use crate::EngineResult;

// ---------------------------------------------------------------------------
// Input / output types
// ---------------------------------------------------------------------------

/// Input for a depreciation calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepreciationInput {
    pub asset: Asset,
    /// Evaluation date; defaults to today's local date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_of: Option<NaiveDate>,
    /// Override for the 20% reducing-balance rate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reducing_balance_rate: Option<Rate>,
    /// Attach the full year-by-year schedule to the report
    #[serde(default)]
    pub include_schedule: bool,
}

/// Depreciation position of an asset at an evaluation date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepreciationResult {
    /// Depreciation recognised from acquisition to the evaluation date
    pub accumulated_depreciation: Money,
    /// `purchase_cost - accumulated_depreciation`
    pub net_book_value: Money,
    /// Charge for the current asset year (constant under straight line)
    pub annual_depreciation: Money,
    pub monthly_depreciation: Money,
    /// Share of the depreciable base consumed, 0 to 100
    pub percent_depreciated: Decimal,
    pub is_fully_depreciated: bool,
    /// Years until the book value reaches salvage
    pub years_remaining: Years,
    pub depreciable_base: Money,
    pub elapsed_years: Years,
    /// 1-based asset year containing the evaluation date
    pub current_year: u32,
    /// The requested date, or the disposal date when that is earlier
    pub evaluation_date: NaiveDate,
}

/// Full report returned by [`calculate_depreciation`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepreciationReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<String>,
    pub method: DepreciationMethod,
    pub as_of: NaiveDate,
    #[serde(flatten)]
    pub position: DepreciationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disposal: Option<DisposalOutcome>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schedule: Vec<ScheduleEntry>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Depreciation position of `asset` on `as_of`.
///
/// Pure: the same inputs always give the same figures. Dates before the
/// purchase date give a zero position; dates past the end of the charge
/// horizon give a fully depreciated position. A disposed asset is frozen at
/// its disposal date.
pub fn calculate(
    asset: &Asset,
    as_of: NaiveDate,
    policy: &DepreciationPolicy,
) -> EngineResult<DepreciationResult> {
    let mut warnings = Vec::new();
    let terms = asset.terms(policy, &mut warnings)?;
    position_at(&terms, as_of)
}

/// Calculate the depreciation position of an asset, with disposal outcome
/// and optional schedule, wrapped in the standard computation envelope.
pub fn calculate_depreciation(
    input: &DepreciationInput,
) -> EngineResult<ComputationOutput<DepreciationReport>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let policy = DepreciationPolicy::with_rate(input.reducing_balance_rate);
    let as_of = input.as_of.unwrap_or_else(|| Local::now().date_naive());
    let terms = input.asset.terms(&policy, &mut warnings)?;

    if terms.purchase_date > as_of {
        warnings.push(format!(
            "Purchase date {} is after the evaluation date {as_of}; no depreciation recognised",
            terms.purchase_date
        ));
    }

    let position = position_at(&terms, as_of)?;
    let disposal = outcome_for_terms(&terms, as_of)?;
    let schedule = if input.include_schedule {
        schedule_for_terms(&terms)?
    } else {
        Vec::new()
    };

    tracing::debug!(
        asset = input.asset.label().unwrap_or("-"),
        method = %terms.method,
        %as_of,
        accumulated = %position.accumulated_depreciation,
        net_book_value = %position.net_book_value,
        "depreciation calculated"
    );

    let report = DepreciationReport {
        asset_id: input.asset.id.clone(),
        method: terms.method,
        as_of,
        position,
        disposal,
        schedule,
    };

    let assumptions = serde_json::json!({
        "as_of": as_of,
        "day_count": "actual days over actual anniversary-year length",
        "reducing_balance_rate": match terms.method {
            DepreciationMethod::ReducingBalance => Some(terms.rate),
            DepreciationMethod::StraightLine => None,
        },
        "asset": &input.asset,
    });

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        methodology(terms.method),
        &assumptions,
        warnings,
        elapsed,
        report,
    ))
}

pub(crate) fn methodology(method: DepreciationMethod) -> &'static str {
    match method {
        DepreciationMethod::StraightLine => "Straight-line depreciation to salvage over useful life",
        DepreciationMethod::ReducingBalance => {
            "Reducing-balance depreciation on opening book value, floored at salvage"
        }
    }
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

pub(crate) fn position_at(
    terms: &DepreciationTerms,
    as_of: NaiveDate,
) -> EngineResult<DepreciationResult> {
    let (evaluation_date, disposed) = match terms.disposal_date {
        Some(disposed_on) if disposed_on <= as_of => (disposed_on, true),
        _ => (as_of, false),
    };

    let elapsed = elapsed_between(terms.purchase_date, evaluation_date)?;
    let charges = annual_charges(terms);
    let base = terms.depreciable_base;

    let accumulated = accumulated_through(&charges, base, &elapsed);
    let net_book_value = (terms.purchase_cost - accumulated).max(terms.salvage_floor);

    let annual = current_annual_charge(terms, &charges, elapsed.completed_years);

    let percent_depreciated = if base.is_zero() {
        Decimal::ZERO
    } else {
        (accumulated / base * dec!(100))
            .max(Decimal::ZERO)
            .min(dec!(100))
    };

    let is_fully_depreciated = net_book_value - terms.salvage_floor <= ROUNDING_TOLERANCE;

    // Nothing is left to charge once book value has reached salvage.
    let monthly = if is_fully_depreciated {
        Decimal::ZERO
    } else {
        annual / MONTHS_PER_YEAR
    };

    let years_remaining = if disposed || is_fully_depreciated {
        Decimal::ZERO
    } else {
        (Decimal::from(charges.len() as u32) - elapsed.years()).max(Decimal::ZERO)
    };

    Ok(DepreciationResult {
        accumulated_depreciation: accumulated,
        net_book_value,
        annual_depreciation: annual,
        monthly_depreciation: monthly,
        percent_depreciated,
        is_fully_depreciated,
        years_remaining,
        depreciable_base: base,
        elapsed_years: elapsed.years(),
        current_year: elapsed.completed_years.saturating_add(1),
        evaluation_date,
    })
}

/// Straight line reports the constant `base / life`. Reducing balance
/// reports the charge for the asset year in progress, or the last charge
/// once the sequence has run out.
fn current_annual_charge(terms: &DepreciationTerms, charges: &[Money], completed: u32) -> Money {
    if charges.is_empty() {
        return Decimal::ZERO;
    }
    match terms.method {
        DepreciationMethod::StraightLine => {
            terms.depreciable_base / Decimal::from(terms.useful_life_years)
        }
        DepreciationMethod::ReducingBalance => charges
            .get(completed as usize)
            .or_else(|| charges.last())
            .copied()
            .unwrap_or(Decimal::ZERO),
    }
}
