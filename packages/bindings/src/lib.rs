use napi::Result as NapiResult;
use napi_derive::napi;

use asset_depreciation_core::Currency;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Depreciation
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_depreciation(input_json: String) -> NapiResult<String> {
    let input: asset_depreciation_core::depreciation::DepreciationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = asset_depreciation_core::depreciation::calculate_depreciation(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn depreciation_schedule(input_json: String) -> NapiResult<String> {
    let input: asset_depreciation_core::depreciation::ScheduleInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        asset_depreciation_core::depreciation::build_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Register
// ---------------------------------------------------------------------------

#[napi]
pub fn asset_register_summary(input_json: String) -> NapiResult<String> {
    let input: asset_depreciation_core::register::RegisterInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        asset_depreciation_core::register::summarize_register(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Amount is passed as a decimal string to avoid float conversion.
#[napi]
pub fn format_money(amount: String, currency: String) -> NapiResult<String> {
    let amount: rust_decimal::Decimal = amount.trim().parse().map_err(to_napi_error)?;
    let currency: Currency = currency.parse().map_err(to_napi_error)?;
    Ok(asset_depreciation_core::format::format_money(amount, &currency))
}
