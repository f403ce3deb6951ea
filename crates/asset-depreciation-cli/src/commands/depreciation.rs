use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use asset_depreciation_core::depreciation::{
    build_schedule, calculate_depreciation, DepreciationInput, ScheduleInput,
};
use asset_depreciation_core::{Asset, AssetStatus, DepreciationMethod};

use crate::input;

/// Asset attributes given as flags
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct AssetArgs {
    /// Acquisition date (YYYY-MM-DD)
    #[arg(long)]
    pub purchase_date: Option<NaiveDate>,

    /// Original acquisition cost
    #[arg(long, alias = "cost")]
    pub purchase_cost: Option<Decimal>,

    /// Expected residual value at end of useful life
    #[arg(long, alias = "salvage", default_value = "0")]
    pub salvage_value: Decimal,

    /// Useful life in whole years
    #[arg(long, alias = "life")]
    pub useful_life_years: Option<u32>,

    /// straight_line or reducing_balance
    #[arg(long, default_value = "straight_line")]
    pub method: DepreciationMethod,

    /// Asset identifier echoed in the output
    #[arg(long)]
    pub id: Option<String>,

    /// Disposal date; marks the asset as disposed
    #[arg(long)]
    pub disposal_date: Option<NaiveDate>,

    /// Proceeds received on disposal
    #[arg(long, requires = "disposal_date")]
    pub disposal_value: Option<Decimal>,
}

impl AssetArgs {
    fn to_asset(&self) -> Result<Asset, Box<dyn std::error::Error>> {
        let mut asset = Asset::new(
            self.purchase_date
                .ok_or("--purchase-date is required (or provide --input)")?,
            self.purchase_cost
                .ok_or("--purchase-cost is required (or provide --input)")?,
            self.salvage_value,
            self.useful_life_years
                .ok_or("--useful-life-years is required (or provide --input)")?,
            self.method,
        );
        asset.id = self.id.clone();
        if self.disposal_date.is_some() {
            asset.status = AssetStatus::Disposed;
            asset.disposal_date = self.disposal_date;
            asset.disposal_value = self.disposal_value;
        }
        Ok(asset)
    }
}

/// Arguments for a point-in-time depreciation calculation
#[derive(Args)]
pub struct DepreciationArgs {
    #[command(flatten)]
    pub asset: AssetArgs,

    /// Evaluation date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub as_of: Option<NaiveDate>,

    /// Reducing-balance rate (e.g. 0.25 for 25%); defaults to 0.20
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Attach the full schedule to the output
    #[arg(long)]
    pub with_schedule: bool,

    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for schedule generation
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub asset: AssetArgs,

    /// Reducing-balance rate (e.g. 0.25 for 25%); defaults to 0.20
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_depreciation(args: DepreciationArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let dep_input: DepreciationInput = match input::read_structured(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => DepreciationInput {
            asset: args.asset.to_asset()?,
            as_of: args.as_of,
            reducing_balance_rate: args.rate,
            include_schedule: args.with_schedule,
        },
    };
    let result = calculate_depreciation(&dep_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let schedule_input: ScheduleInput = match input::read_structured(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => ScheduleInput {
            asset: args.asset.to_asset()?,
            reducing_balance_rate: args.rate,
        },
    };
    let result = build_schedule(&schedule_input)?;
    Ok(serde_json::to_value(result)?)
}
