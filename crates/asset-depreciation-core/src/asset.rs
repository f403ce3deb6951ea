//! Asset records as supplied by the surrounding application, and the
//! validated, clamped terms the engine actually computes with.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::depreciation::DepreciationPolicy;
use crate::error::DepreciationError;
use crate::types::{Money, Rate};
use crate::EngineResult;

/// Upper bound on useful life. Keeps schedules bounded for bulk reporting.
pub const MAX_USEFUL_LIFE_YEARS: u32 = 200;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Depreciation policy chosen when the asset is created.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DepreciationMethod {
    StraightLine,
    ReducingBalance,
}

impl DepreciationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            DepreciationMethod::StraightLine => "straight_line",
            DepreciationMethod::ReducingBalance => "reducing_balance",
        }
    }
}

impl std::fmt::Display for DepreciationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DepreciationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "straight_line" | "sl" => Ok(DepreciationMethod::StraightLine),
            "reducing_balance" | "rb" | "declining_balance" => {
                Ok(DepreciationMethod::ReducingBalance)
            }
            other => Err(format!("Unknown depreciation method: {other}")),
        }
    }
}

/// Lifecycle status owned by the asset register. Only `Disposed` changes
/// what the engine computes.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AssetStatus {
    #[default]
    Active,
    Maintenance,
    Retired,
    Disposed,
}

// ---------------------------------------------------------------------------
// Input record
// ---------------------------------------------------------------------------

/// A fixed asset as stored by the persistence layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Acquisition date
    pub purchase_date: NaiveDate,
    /// Original acquisition cost
    pub purchase_cost: Money,
    /// Expected residual value at the end of the useful life
    pub salvage_value: Money,
    /// Depreciation horizon in whole years
    pub useful_life_years: u32,
    pub depreciation_method: DepreciationMethod,
    #[serde(default)]
    pub status: AssetStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disposal_date: Option<NaiveDate>,
    /// Proceeds received on disposal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disposal_value: Option<Money>,
}

impl Asset {
    /// Minimal active asset; identity and lifecycle fields left empty.
    pub fn new(
        purchase_date: NaiveDate,
        purchase_cost: Money,
        salvage_value: Money,
        useful_life_years: u32,
        depreciation_method: DepreciationMethod,
    ) -> Self {
        Asset {
            id: None,
            name: None,
            category: None,
            description: None,
            purchase_date,
            purchase_cost,
            salvage_value,
            useful_life_years,
            depreciation_method,
            status: AssetStatus::Active,
            disposal_date: None,
            disposal_value: None,
        }
    }

    /// Human label for warnings: id, then name, then nothing.
    pub fn label(&self) -> Option<&str> {
        self.id.as_deref().or(self.name.as_deref())
    }

    /// Validate the record and clamp recoverable inconsistencies.
    ///
    /// Clamps are reported through `warnings`; only inputs that make the
    /// computation meaningless are rejected.
    pub fn terms(
        &self,
        policy: &DepreciationPolicy,
        warnings: &mut Vec<String>,
    ) -> EngineResult<DepreciationTerms> {
        validate_asset(self, policy)?;

        let mut salvage = self.salvage_value;
        if salvage < Decimal::ZERO {
            warnings.push(format!(
                "Salvage value {} is negative; treated as zero",
                self.salvage_value
            ));
            tracing::warn!(salvage = %self.salvage_value, "negative salvage value clamped to zero");
            salvage = Decimal::ZERO;
        }

        let salvage_floor = if salvage >= self.purchase_cost {
            warnings.push(format!(
                "Salvage value {} is not below purchase cost {}; nothing to depreciate",
                salvage, self.purchase_cost
            ));
            tracing::warn!(
                salvage = %salvage,
                cost = %self.purchase_cost,
                "depreciable base clamped to zero"
            );
            self.purchase_cost
        } else {
            salvage
        };

        let disposal_date = match (self.status, self.disposal_date) {
            (AssetStatus::Disposed, Some(date)) => Some(date),
            (AssetStatus::Disposed, None) => {
                warnings.push(
                    "Asset is marked disposed but has no disposal date; treated as in service"
                        .to_string(),
                );
                None
            }
            (_, Some(date)) => {
                warnings.push(format!(
                    "Disposal date {date} ignored because the asset is not marked disposed"
                ));
                None
            }
            (_, None) => None,
        };

        Ok(DepreciationTerms {
            method: self.depreciation_method,
            purchase_date: self.purchase_date,
            purchase_cost: self.purchase_cost,
            salvage_floor,
            depreciable_base: self.purchase_cost - salvage_floor,
            useful_life_years: self.useful_life_years,
            rate: policy.reducing_balance_rate,
            disposal_date,
            disposal_value: self.disposal_value.unwrap_or(Decimal::ZERO),
        })
    }
}

/// Validated, clamped figures the engine computes with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepreciationTerms {
    pub method: DepreciationMethod,
    pub purchase_date: NaiveDate,
    pub purchase_cost: Money,
    /// Lowest value the book value may reach: salvage, or cost when
    /// salvage is at or above cost.
    pub salvage_floor: Money,
    /// `purchase_cost - salvage_floor`, never negative
    pub depreciable_base: Money,
    pub useful_life_years: u32,
    /// Reducing-balance rate (unused for straight line)
    pub rate: Rate,
    /// Set only when the asset is disposed and the date is known
    pub disposal_date: Option<NaiveDate>,
    pub disposal_value: Money,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_asset(asset: &Asset, policy: &DepreciationPolicy) -> EngineResult<()> {
    if asset.purchase_cost < Decimal::ZERO {
        return Err(DepreciationError::validation(
            "purchase_cost",
            "Purchase cost cannot be negative",
        ));
    }
    if asset.useful_life_years == 0 {
        return Err(DepreciationError::validation(
            "useful_life_years",
            "Useful life must be at least one year",
        ));
    }
    if asset.useful_life_years > MAX_USEFUL_LIFE_YEARS {
        return Err(DepreciationError::validation(
            "useful_life_years",
            format!("Useful life cannot exceed {MAX_USEFUL_LIFE_YEARS} years"),
        ));
    }
    if asset.depreciation_method == DepreciationMethod::ReducingBalance {
        policy.validate()?;
    }
    if let Some(value) = asset.disposal_value {
        if value < Decimal::ZERO {
            return Err(DepreciationError::validation(
                "disposal_value",
                "Disposal value cannot be negative",
            ));
        }
    }
    if asset.status == AssetStatus::Disposed {
        if let Some(date) = asset.disposal_date {
            if date < asset.purchase_date {
                return Err(DepreciationError::validation(
                    "disposal_date",
                    format!(
                        "Disposal date {date} precedes purchase date {}",
                        asset.purchase_date
                    ),
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn office_fitout() -> Asset {
        Asset::new(
            date(2020, 1, 1),
            dec!(10000),
            dec!(1000),
            5,
            DepreciationMethod::StraightLine,
        )
    }

    #[test]
    fn test_terms_for_valid_asset() {
        let mut warnings = Vec::new();
        let terms = office_fitout()
            .terms(&DepreciationPolicy::default(), &mut warnings)
            .unwrap();
        assert_eq!(terms.depreciable_base, dec!(9000));
        assert_eq!(terms.salvage_floor, dec!(1000));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_zero_useful_life_rejected() {
        let mut asset = office_fitout();
        asset.useful_life_years = 0;
        let err = asset
            .terms(&DepreciationPolicy::default(), &mut Vec::new())
            .unwrap_err();
        match err {
            DepreciationError::Validation { field, .. } => {
                assert_eq!(field, "useful_life_years")
            }
            other => panic!("Expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_excessive_useful_life_rejected() {
        let mut asset = office_fitout();
        asset.useful_life_years = MAX_USEFUL_LIFE_YEARS + 1;
        assert!(asset
            .terms(&DepreciationPolicy::default(), &mut Vec::new())
            .is_err());
    }

    #[test]
    fn test_negative_cost_rejected() {
        let mut asset = office_fitout();
        asset.purchase_cost = dec!(-1);
        assert!(asset
            .terms(&DepreciationPolicy::default(), &mut Vec::new())
            .is_err());
    }

    #[test]
    fn test_salvage_above_cost_clamps_base_to_zero() {
        let mut asset = office_fitout();
        asset.salvage_value = dec!(12000);
        let mut warnings = Vec::new();
        let terms = asset
            .terms(&DepreciationPolicy::default(), &mut warnings)
            .unwrap();
        assert_eq!(terms.depreciable_base, Decimal::ZERO);
        assert_eq!(terms.salvage_floor, dec!(10000));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_negative_salvage_clamped() {
        let mut asset = office_fitout();
        asset.salvage_value = dec!(-50);
        let mut warnings = Vec::new();
        let terms = asset
            .terms(&DepreciationPolicy::default(), &mut warnings)
            .unwrap();
        assert_eq!(terms.salvage_floor, Decimal::ZERO);
        assert_eq!(terms.depreciable_base, dec!(10000));
        assert!(warnings[0].contains("negative"));
    }

    #[test]
    fn test_disposal_date_only_used_when_disposed() {
        let mut asset = office_fitout();
        asset.disposal_date = Some(date(2022, 6, 30));
        let mut warnings = Vec::new();
        let terms = asset
            .terms(&DepreciationPolicy::default(), &mut warnings)
            .unwrap();
        assert_eq!(terms.disposal_date, None);
        assert_eq!(warnings.len(), 1);

        asset.status = AssetStatus::Disposed;
        let terms = asset
            .terms(&DepreciationPolicy::default(), &mut Vec::new())
            .unwrap();
        assert_eq!(terms.disposal_date, Some(date(2022, 6, 30)));
    }

    #[test]
    fn test_disposal_before_purchase_rejected() {
        let mut asset = office_fitout();
        asset.status = AssetStatus::Disposed;
        asset.disposal_date = Some(date(2019, 12, 31));
        assert!(asset
            .terms(&DepreciationPolicy::default(), &mut Vec::new())
            .is_err());
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!(
            "straight-line".parse::<DepreciationMethod>().unwrap(),
            DepreciationMethod::StraightLine
        );
        assert_eq!(
            "Reducing_Balance".parse::<DepreciationMethod>().unwrap(),
            DepreciationMethod::ReducingBalance
        );
        assert!("sum_of_years".parse::<DepreciationMethod>().is_err());
    }

    #[test]
    fn test_asset_deserializes_with_optional_fields_missing() {
        let json = r#"{
            "purchase_date": "2023-03-15",
            "purchase_cost": "2500",
            "salvage_value": "100",
            "useful_life_years": 3,
            "depreciation_method": "reducing_balance",
            "description": null
        }"#;
        let asset: Asset = serde_json::from_str(json).unwrap();
        assert_eq!(asset.status, AssetStatus::Active);
        assert_eq!(asset.description, None);
        assert_eq!(asset.depreciation_method, DepreciationMethod::ReducingBalance);
    }
}
