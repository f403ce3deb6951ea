//! Year-by-year depreciation schedule from acquisition to salvage (or
//! disposal).

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::calculator::methodology;
use super::charges::annual_charges;
use super::DepreciationPolicy;
use crate::asset::{Asset, DepreciationMethod, DepreciationTerms};
use crate::day_count::{anniversary, elapsed_between};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::EngineResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input for schedule generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleInput {
    pub asset: Asset,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reducing_balance_rate: Option<Rate>,
}

/// A single asset year in the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Asset year number (1-indexed)
    pub year: u32,
    /// Calendar year the asset year starts in
    pub year_label: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub opening_value: Money,
    pub depreciation: Money,
    pub accumulated_depreciation: Money,
    pub closing_value: Money,
    /// Year cut short by disposal
    pub partial_year: bool,
}

/// Schedule plus totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleOutput {
    pub method: DepreciationMethod,
    pub useful_life_years: u32,
    pub depreciable_base: Money,
    pub total_depreciation: Money,
    pub final_book_value: Money,
    pub entries: Vec<ScheduleEntry>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Ordered schedule for `asset`, one entry per asset year.
///
/// Straight line yields exactly `useful_life_years` entries; reducing
/// balance stops early once the book value reaches salvage. The closing
/// value of each entry is the opening value of the next, and the last
/// closing value equals salvage unless the asset was disposed first.
pub fn generate_schedule(
    asset: &Asset,
    policy: &DepreciationPolicy,
) -> EngineResult<Vec<ScheduleEntry>> {
    let mut warnings = Vec::new();
    let terms = asset.terms(policy, &mut warnings)?;
    schedule_for_terms(&terms)
}

/// Generate the schedule wrapped in the standard computation envelope.
pub fn build_schedule(input: &ScheduleInput) -> EngineResult<ComputationOutput<ScheduleOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let policy = DepreciationPolicy::with_rate(input.reducing_balance_rate);
    let terms = input.asset.terms(&policy, &mut warnings)?;
    let entries = schedule_for_terms(&terms)?;

    if entries.is_empty() {
        warnings.push("Schedule is empty: depreciable base is zero".to_string());
    } else if terms.method == DepreciationMethod::ReducingBalance
        && entries.len() < terms.useful_life_years as usize
        && terms.disposal_date.is_none()
    {
        warnings.push(format!(
            "Salvage value reached in year {} of a {}-year useful life",
            entries.len(),
            terms.useful_life_years
        ));
    }

    let total_depreciation: Money = entries.iter().map(|e| e.depreciation).sum();
    let final_book_value = entries
        .last()
        .map(|e| e.closing_value)
        .unwrap_or(terms.purchase_cost);

    tracing::debug!(
        asset = input.asset.label().unwrap_or("-"),
        method = %terms.method,
        rows = entries.len(),
        "schedule generated"
    );

    let output = ScheduleOutput {
        method: terms.method,
        useful_life_years: terms.useful_life_years,
        depreciable_base: terms.depreciable_base,
        total_depreciation,
        final_book_value,
        entries,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        methodology(terms.method),
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Schedule construction
// ---------------------------------------------------------------------------

pub(crate) fn schedule_for_terms(terms: &DepreciationTerms) -> EngineResult<Vec<ScheduleEntry>> {
    let charges = annual_charges(terms);
    let cutoff = match terms.disposal_date {
        Some(date) => Some((date, elapsed_between(terms.purchase_date, date)?)),
        None => None,
    };

    let mut entries = Vec::with_capacity(charges.len());
    let mut opening = terms.purchase_cost;
    let mut accumulated = Decimal::ZERO;
    let last = charges.len().saturating_sub(1);

    for (i, &charge) in charges.iter().enumerate() {
        let year = i as u32 + 1;
        let period_start = anniversary(terms.purchase_date, year - 1)?;
        let mut period_end = anniversary(terms.purchase_date, year)?;
        let mut depreciation = charge;
        let mut partial_year = false;

        if let Some((disposed_on, elapsed)) = cutoff {
            if year - 1 > elapsed.completed_years
                || (year - 1 == elapsed.completed_years && elapsed.fraction.is_zero())
            {
                break;
            }
            if year - 1 == elapsed.completed_years {
                depreciation = charge * elapsed.fraction;
                period_end = disposed_on;
                partial_year = true;
            }
        }

        // Land the final full year exactly on salvage
        let closing = if i == last && !partial_year {
            terms.salvage_floor
        } else {
            opening - depreciation
        };
        depreciation = opening - closing;
        accumulated += depreciation;

        tracing::trace!(year, %opening, %depreciation, %closing, "schedule row");

        entries.push(ScheduleEntry {
            year,
            year_label: period_start.year().to_string(),
            period_start,
            period_end,
            opening_value: opening,
            depreciation,
            accumulated_depreciation: accumulated,
            closing_value: closing,
            partial_year,
        });

        if partial_year {
            break;
        }
        opening = closing;
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::AssetStatus;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn server_rack(method: DepreciationMethod, salvage: Money, life: u32) -> Asset {
        Asset::new(date(2022, 7, 1), dec!(10000), salvage, life, method)
    }

    #[test]
    fn test_straight_line_schedule_rows() {
        let asset = server_rack(DepreciationMethod::StraightLine, dec!(1000), 5);
        let entries = generate_schedule(&asset, &DepreciationPolicy::default()).unwrap();

        assert_eq!(entries.len(), 5);
        assert_eq!(entries[0].year_label, "2022");
        assert_eq!(entries[0].period_start, date(2022, 7, 1));
        assert_eq!(entries[0].period_end, date(2023, 7, 1));
        assert_eq!(entries[0].opening_value, dec!(10000));
        assert_eq!(entries[0].depreciation, dec!(1800));
        assert_eq!(entries[1].accumulated_depreciation, dec!(3600));
        assert_eq!(entries[4].closing_value, dec!(1000));
        assert_eq!(entries[4].year_label, "2026");
    }

    #[test]
    fn test_schedule_chains_opening_to_closing() {
        let asset = server_rack(DepreciationMethod::StraightLine, dec!(333), 7);
        let entries = generate_schedule(&asset, &DepreciationPolicy::default()).unwrap();
        for pair in entries.windows(2) {
            assert_eq!(pair[0].closing_value, pair[1].opening_value);
        }
        assert_eq!(entries.last().unwrap().closing_value, dec!(333));
    }

    #[test]
    fn test_reducing_balance_truncates_at_salvage() {
        let asset = server_rack(DepreciationMethod::ReducingBalance, dec!(5000), 10);
        let entries = generate_schedule(&asset, &DepreciationPolicy::default()).unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[3].opening_value, dec!(5120));
        assert_eq!(entries[3].depreciation, dec!(120));
        assert_eq!(entries[3].closing_value, dec!(5000));
    }

    #[test]
    fn test_reducing_balance_final_year_writes_down_to_salvage() {
        let asset = server_rack(DepreciationMethod::ReducingBalance, dec!(1000), 5);
        let entries = generate_schedule(&asset, &DepreciationPolicy::default()).unwrap();
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[4].opening_value, dec!(4096));
        assert_eq!(entries[4].closing_value, dec!(1000));
    }

    #[test]
    fn test_disposal_cuts_schedule_with_partial_year() {
        let mut asset = server_rack(DepreciationMethod::StraightLine, dec!(1000), 5);
        asset.status = AssetStatus::Disposed;
        // Half-way through asset year 3 (2024-07-01 .. 2025-07-01, 365 days)
        asset.disposal_date = Some(date(2024, 12, 30));
        let entries = generate_schedule(&asset, &DepreciationPolicy::default()).unwrap();

        assert_eq!(entries.len(), 3);
        let last = &entries[2];
        assert!(last.partial_year);
        assert_eq!(last.period_end, date(2024, 12, 30));
        assert_eq!(last.opening_value, dec!(6400));
        assert!(last.depreciation > Decimal::ZERO && last.depreciation < dec!(1800));
        assert_eq!(last.closing_value, last.opening_value - last.depreciation);
    }

    #[test]
    fn test_disposal_on_anniversary_has_no_partial_row() {
        let mut asset = server_rack(DepreciationMethod::StraightLine, dec!(1000), 5);
        asset.status = AssetStatus::Disposed;
        asset.disposal_date = Some(date(2024, 7, 1));
        let entries = generate_schedule(&asset, &DepreciationPolicy::default()).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| !e.partial_year));
    }

    #[test]
    fn test_build_schedule_totals_and_early_stop_warning() {
        let input = ScheduleInput {
            asset: server_rack(DepreciationMethod::ReducingBalance, dec!(5000), 10),
            reducing_balance_rate: None,
        };
        let out = build_schedule(&input).unwrap();
        assert_eq!(out.result.total_depreciation, dec!(5000));
        assert_eq!(out.result.final_book_value, dec!(5000));
        assert!(out.warnings.iter().any(|w| w.contains("year 4")));
    }

    #[test]
    fn test_build_schedule_empty_when_nothing_to_depreciate() {
        let input = ScheduleInput {
            asset: server_rack(DepreciationMethod::StraightLine, dec!(10000), 5),
            reducing_balance_rate: None,
        };
        let out = build_schedule(&input).unwrap();
        assert!(out.result.entries.is_empty());
        assert_eq!(out.result.final_book_value, dec!(10000));
        assert_eq!(out.warnings.len(), 2);
    }
}
