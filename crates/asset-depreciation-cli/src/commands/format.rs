use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use asset_depreciation_core::format::{format_money, round_money};
use asset_depreciation_core::Currency;

/// Arguments for money formatting
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct FormatMoneyArgs {
    /// Amount to format
    #[arg(long)]
    pub amount: Decimal,

    /// Currency code (USD, EUR, GBP, JPY, ...)
    #[arg(long, default_value = "USD")]
    pub currency: Currency,
}

pub fn run_format_money(args: FormatMoneyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    Ok(json!({
        "result": {
            "formatted": format_money(args.amount, &args.currency),
            "rounded": round_money(args.amount),
            "currency": args.currency.to_string(),
        }
    }))
}
