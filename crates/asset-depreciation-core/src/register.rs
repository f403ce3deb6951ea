//! Asset register roll-up: runs the engine over a list of assets and totals
//! the book figures, overall and per category.

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::asset::{Asset, AssetStatus, DepreciationMethod};
use crate::depreciation::calculator::position_at;
use crate::depreciation::disposal::outcome_for_terms;
use crate::depreciation::DepreciationPolicy;
use crate::error::DepreciationError;
use crate::types::{with_metadata, ComputationOutput, Currency, Money, Rate};
use crate::EngineResult;

const UNCATEGORIZED: &str = "Uncategorized";

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterInput {
    pub assets: Vec<Asset>,
    /// Evaluation date for every asset; defaults to today's local date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_of: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reducing_balance_rate: Option<Rate>,
    /// Reporting currency (all assets are assumed to share it)
    #[serde(default)]
    pub currency: Currency,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One asset's line in the register.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRow {
    /// Position of the asset in the input list
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub category: String,
    pub method: DepreciationMethod,
    pub status: AssetStatus,
    pub purchase_cost: Money,
    pub accumulated_depreciation: Money,
    pub net_book_value: Money,
    pub annual_depreciation: Money,
    pub percent_depreciated: Decimal,
    pub is_fully_depreciated: bool,
    /// True when disposed on or before the evaluation date
    pub disposed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gain_or_loss: Option<Money>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterTotals {
    pub purchase_cost: Money,
    pub accumulated_depreciation: Money,
    pub net_book_value: Money,
    /// Current-year charge of assets still depreciating
    pub annual_depreciation: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySubtotal {
    pub category: String,
    pub asset_count: u32,
    #[serde(flatten)]
    pub totals: RegisterTotals,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterOutput {
    pub as_of: NaiveDate,
    pub currency: Currency,
    pub asset_count: u32,
    pub fully_depreciated_count: u32,
    pub disposed_count: u32,
    /// Assets left out because their records failed validation
    pub skipped_count: u32,
    /// Book totals over assets still held (disposed assets excluded)
    pub totals: RegisterTotals,
    pub realized_gain_or_loss: Money,
    pub by_category: Vec<CategorySubtotal>,
    pub assets: Vec<RegisterRow>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Value every asset in the register at one date and roll the figures up.
///
/// Each asset is validated on its own: an invalid record is skipped and
/// reported as a warning rather than failing the whole register. Disposed
/// assets keep their row but drop out of the book totals.
pub fn summarize_register(
    input: &RegisterInput,
) -> EngineResult<ComputationOutput<RegisterOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.assets.is_empty() {
        return Err(DepreciationError::InsufficientData(
            "Asset register contains no assets".into(),
        ));
    }

    let policy = DepreciationPolicy::with_rate(input.reducing_balance_rate);
    let as_of = input.as_of.unwrap_or_else(|| Local::now().date_naive());

    let mut rows = Vec::with_capacity(input.assets.len());
    let mut skipped = 0u32;

    for (index, asset) in input.assets.iter().enumerate() {
        let label = asset
            .label()
            .map(|l| format!("asset {index} ({l})"))
            .unwrap_or_else(|| format!("asset {index}"));

        let mut asset_warnings = Vec::new();
        let row = asset
            .terms(&policy, &mut asset_warnings)
            .and_then(|terms| {
                let position = position_at(&terms, as_of)?;
                let disposal = outcome_for_terms(&terms, as_of)?;
                Ok((terms, position, disposal))
            });

        let (terms, position, disposal) = match row {
            Ok(parts) => parts,
            Err(e) => {
                tracing::warn!(%label, error = %e, "asset skipped");
                warnings.push(format!("Skipped {label}: {e}"));
                skipped += 1;
                continue;
            }
        };
        warnings.extend(asset_warnings.into_iter().map(|w| format!("{label}: {w}")));

        rows.push(RegisterRow {
            index,
            id: asset.id.clone(),
            name: asset.name.clone(),
            category: asset
                .category
                .clone()
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| UNCATEGORIZED.to_string()),
            method: terms.method,
            status: asset.status,
            purchase_cost: terms.purchase_cost,
            accumulated_depreciation: position.accumulated_depreciation,
            net_book_value: position.net_book_value,
            annual_depreciation: position.annual_depreciation,
            percent_depreciated: position.percent_depreciated,
            is_fully_depreciated: position.is_fully_depreciated,
            disposed: disposal.is_some(),
            gain_or_loss: disposal.map(|d| d.gain_or_loss),
        });
    }

    if rows.is_empty() {
        return Err(DepreciationError::InsufficientData(format!(
            "All {} assets in the register failed validation",
            input.assets.len()
        )));
    }

    let mut totals = RegisterTotals::default();
    let mut by_category: BTreeMap<String, (u32, RegisterTotals)> = BTreeMap::new();
    let mut realized_gain_or_loss = Decimal::ZERO;

    for row in &rows {
        if let Some(gain) = row.gain_or_loss {
            realized_gain_or_loss = checked_sum(realized_gain_or_loss, gain)?;
        }
        if row.disposed {
            continue;
        }
        let entry = by_category.entry(row.category.clone()).or_default();
        entry.0 += 1;
        for t in [&mut totals, &mut entry.1] {
            add_row(t, row)?;
        }
    }

    let output = RegisterOutput {
        as_of,
        currency: input.currency.clone(),
        asset_count: rows.len() as u32,
        fully_depreciated_count: rows
            .iter()
            .filter(|r| r.is_fully_depreciated && !r.disposed)
            .count() as u32,
        disposed_count: rows.iter().filter(|r| r.disposed).count() as u32,
        skipped_count: skipped,
        totals,
        realized_gain_or_loss,
        by_category: by_category
            .into_iter()
            .map(|(category, (asset_count, totals))| CategorySubtotal {
                category,
                asset_count,
                totals,
            })
            .collect(),
        assets: rows,
    };

    tracing::debug!(
        assets = output.asset_count,
        skipped = output.skipped_count,
        net_book_value = %output.totals.net_book_value,
        "register summarized"
    );

    let elapsed = start.elapsed().as_micros() as u64;

    let assumptions = serde_json::json!({
        "as_of": as_of,
        "reducing_balance_rate": policy.reducing_balance_rate,
        "currency": &input.currency,
        "disposed_assets": "excluded from book totals",
    });

    Ok(with_metadata(
        "Asset register roll-up of per-asset depreciation positions",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

fn add_row(totals: &mut RegisterTotals, row: &RegisterRow) -> EngineResult<()> {
    totals.purchase_cost = checked_sum(totals.purchase_cost, row.purchase_cost)?;
    totals.accumulated_depreciation =
        checked_sum(totals.accumulated_depreciation, row.accumulated_depreciation)?;
    totals.net_book_value = checked_sum(totals.net_book_value, row.net_book_value)?;
    if !row.is_fully_depreciated {
        totals.annual_depreciation =
            checked_sum(totals.annual_depreciation, row.annual_depreciation)?;
    }
    Ok(())
}

fn checked_sum(total: Money, amount: Money) -> EngineResult<Money> {
    total.checked_add(amount).ok_or_else(|| {
        DepreciationError::validation("assets", "register totals exceed the decimal range")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn asset(id: &str, category: Option<&str>, method: DepreciationMethod) -> Asset {
        let mut a = Asset::new(date(2020, 1, 1), dec!(10000), dec!(1000), 5, method);
        a.id = Some(id.into());
        a.category = category.map(String::from);
        a
    }

    fn register(assets: Vec<Asset>) -> RegisterInput {
        RegisterInput {
            assets,
            as_of: Some(date(2022, 1, 1)),
            reducing_balance_rate: None,
            currency: Currency::USD,
        }
    }

    #[test]
    fn test_register_totals_and_categories() {
        let input = register(vec![
            asset("LAP-1", Some("IT"), DepreciationMethod::StraightLine),
            asset("LAP-2", Some("IT"), DepreciationMethod::ReducingBalance),
            asset("DESK-1", None, DepreciationMethod::StraightLine),
        ]);
        let out = summarize_register(&input).unwrap().result;

        assert_eq!(out.asset_count, 3);
        assert_eq!(out.skipped_count, 0);
        // 6400 + 6400 + 6400
        assert_eq!(out.totals.net_book_value, dec!(19200));
        assert_eq!(out.totals.purchase_cost, dec!(30000));
        // 1800 + 1280 + 1800
        assert_eq!(out.totals.annual_depreciation, dec!(4880));

        let categories: Vec<&str> = out.by_category.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(categories, vec!["IT", "Uncategorized"]);
        assert_eq!(out.by_category[0].asset_count, 2);
        assert_eq!(out.by_category[0].totals.net_book_value, dec!(12800));
    }

    #[test]
    fn test_invalid_asset_skipped_with_warning() {
        let mut bad = asset("BAD-1", Some("IT"), DepreciationMethod::StraightLine);
        bad.useful_life_years = 0;
        let input = register(vec![
            asset("OK-1", Some("IT"), DepreciationMethod::StraightLine),
            bad,
        ]);
        let out = summarize_register(&input).unwrap();
        assert_eq!(out.result.asset_count, 1);
        assert_eq!(out.result.skipped_count, 1);
        assert!(out.warnings.iter().any(|w| w.contains("BAD-1")));
    }

    #[test]
    fn test_disposed_asset_excluded_from_book_totals() {
        let mut sold = asset("VAN-9", Some("Vehicles"), DepreciationMethod::StraightLine);
        sold.status = AssetStatus::Disposed;
        sold.disposal_date = Some(date(2021, 1, 1));
        sold.disposal_value = Some(dec!(9000));
        let input = register(vec![
            asset("VAN-1", Some("Vehicles"), DepreciationMethod::StraightLine),
            sold,
        ]);
        let out = summarize_register(&input).unwrap().result;

        assert_eq!(out.disposed_count, 1);
        assert_eq!(out.totals.net_book_value, dec!(6400));
        // Sold for 9000 at book value 8200
        assert_eq!(out.realized_gain_or_loss, dec!(800));
        assert_eq!(out.assets[1].gain_or_loss, Some(dec!(800)));
    }

    #[test]
    fn test_empty_register_is_an_error() {
        let err = summarize_register(&register(Vec::new())).unwrap_err();
        assert!(matches!(err, DepreciationError::InsufficientData(_)));
    }

    #[test]
    fn test_totals_beyond_decimal_range_are_rejected() {
        let huge = Decimal::from_i128_with_scale(5 * 10i128.pow(28), 0);
        let mut first = asset("PLANT-1", Some("Plant"), DepreciationMethod::StraightLine);
        first.purchase_cost = huge;
        first.salvage_value = Decimal::ZERO;
        let mut second = first.clone();
        second.id = Some("PLANT-2".into());

        let err = summarize_register(&register(vec![first, second])).unwrap_err();
        match err {
            DepreciationError::Validation { field, .. } => assert_eq!(field, "assets"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_all_invalid_is_an_error() {
        let mut bad = asset("BAD-1", None, DepreciationMethod::StraightLine);
        bad.purchase_cost = dec!(-5);
        assert!(summarize_register(&register(vec![bad])).is_err());
    }
}
