//! Presentation-boundary formatting. Engine figures keep full precision;
//! rounding happens only here.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::types::{Currency, Money};

/// Round to cents, half away from zero.
pub fn round_money(amount: Money) -> Money {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Group the integer part in thousands and fix the number of decimals.
///
/// `format_amount(dec!(1234567.891), 2)` gives `"1,234,567.89"`.
pub fn format_amount(amount: Decimal, decimal_places: u32) -> String {
    let rounded =
        amount.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = format!("{:.*}", decimal_places as usize, rounded.abs());

    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 4);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Money with currency symbol, e.g. `$1,234.50`, `-€12.00`, `¥1,235`.
pub fn format_money(amount: Money, currency: &Currency) -> String {
    let body = format_amount(amount, currency.minor_units());
    match body.strip_prefix('-') {
        Some(unsigned) => format!("-{}{}", currency.symbol(), unsigned),
        None => format!("{}{}", currency.symbol(), body),
    }
}

/// Percentage already expressed on a 0-100 scale, e.g. `40.0%`.
pub fn format_percent(value: Decimal, decimal_places: u32) -> String {
    format!("{}%", format_amount(value, decimal_places))
}
