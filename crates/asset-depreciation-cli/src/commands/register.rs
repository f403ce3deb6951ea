use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use asset_depreciation_core::register::{summarize_register, RegisterInput};
use asset_depreciation_core::Currency;

use crate::input;

/// Arguments for an asset register roll-up
#[derive(Args)]
pub struct RegisterArgs {
    /// Path to JSON/YAML register file
    #[arg(long)]
    pub input: Option<String>,

    /// Evaluation date (YYYY-MM-DD); overrides the file's as_of
    #[arg(long)]
    pub as_of: Option<NaiveDate>,

    /// Reducing-balance rate; overrides the file's rate
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Reporting currency code; overrides the file's currency
    #[arg(long)]
    pub currency: Option<Currency>,
}

pub fn run_register(args: RegisterArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut register_input: RegisterInput = input::read_structured(args.input.as_deref())?
        .ok_or("--input <register.json|register.yaml> or stdin required for register")?;

    if args.as_of.is_some() {
        register_input.as_of = args.as_of;
    }
    if args.rate.is_some() {
        register_input.reducing_balance_rate = args.rate;
    }
    if let Some(currency) = args.currency {
        register_input.currency = currency;
    }

    let result = summarize_register(&register_input)?;
    Ok(serde_json::to_value(result)?)
}
