use rust_decimal::Decimal;

use crate::asset::{DepreciationMethod, DepreciationTerms};
use crate::day_count::ElapsedTime;
use crate::types::Money;

/// Depreciation charged in each asset year, year 1 first.
///
/// Straight line charges `base / life` every year, the final year taking
/// whatever remains so the book value lands exactly on salvage.
///
/// Reducing balance charges `opening book value * rate`. A charge that would
/// take the book value to or below salvage is cut to the remaining balance
/// and the sequence stops there. The last year of the useful life writes the
/// remaining balance down to salvage.
///
/// Empty when there is nothing to depreciate.
pub fn annual_charges(terms: &DepreciationTerms) -> Vec<Money> {
    let base = terms.depreciable_base;
    if base <= Decimal::ZERO {
        return Vec::new();
    }

    let life = terms.useful_life_years;
    let mut charges = Vec::with_capacity(life as usize);

    match terms.method {
        DepreciationMethod::StraightLine => {
            let annual = base / Decimal::from(life);
            let mut remaining = base;
            for year in 1..=life {
                let charge = if year == life {
                    remaining
                } else {
                    annual.min(remaining)
                };
                remaining -= charge;
                charges.push(charge);
            }
        }
        DepreciationMethod::ReducingBalance => {
            let mut book_value = terms.purchase_cost;
            for year in 1..=life {
                let remaining = book_value - terms.salvage_floor;
                if remaining <= Decimal::ZERO {
                    break;
                }
                let expected = book_value * terms.rate;
                let charge = if year == life || expected >= remaining {
                    remaining
                } else {
                    expected
                };
                book_value -= charge;
                charges.push(charge);
            }
        }
    }

    charges
}

/// Accumulated depreciation after `elapsed`: every completed year's charge
/// plus the current year's charge prorated by the elapsed fraction.
pub(crate) fn accumulated_through(
    charges: &[Money],
    base: Money,
    elapsed: &ElapsedTime,
) -> Money {
    let completed = elapsed.completed_years as usize;
    if completed >= charges.len() {
        return base.max(Decimal::ZERO);
    }

    let full_years: Money = charges.iter().take(completed).copied().sum();
    let partial = charges[completed] * elapsed.fraction;
    (full_years + partial).max(Decimal::ZERO).min(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn terms(method: DepreciationMethod, cost: Money, salvage: Money, life: u32) -> DepreciationTerms {
        DepreciationTerms {
            method,
            purchase_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            purchase_cost: cost,
            salvage_floor: salvage,
            depreciable_base: cost - salvage,
            useful_life_years: life,
            rate: dec!(0.20),
            disposal_date: None,
            disposal_value: Decimal::ZERO,
        }
    }

    #[test]
    fn test_straight_line_equal_charges() {
        let charges = annual_charges(&terms(
            DepreciationMethod::StraightLine,
            dec!(10000),
            dec!(1000),
            5,
        ));
        assert_eq!(charges, vec![dec!(1800); 5]);
    }

    #[test]
    fn test_straight_line_uneven_division_sums_to_base() {
        let charges = annual_charges(&terms(
            DepreciationMethod::StraightLine,
            dec!(10000),
            dec!(1000),
            7,
        ));
        assert_eq!(charges.len(), 7);
        let total: Money = charges.iter().copied().sum();
        assert_eq!(total, dec!(9000));
    }

    #[test]
    fn test_reducing_balance_first_years() {
        let charges = annual_charges(&terms(
            DepreciationMethod::ReducingBalance,
            dec!(10000),
            dec!(1000),
            5,
        ));
        assert_eq!(charges[0], dec!(2000));
        assert_eq!(charges[1], dec!(1600));
        assert_eq!(charges[2], dec!(1280));
        assert_eq!(charges[3], dec!(1024));
        // Final year writes 4096 down to 1000
        assert_eq!(charges[4], dec!(3096));
    }

    #[test]
    fn test_reducing_balance_stops_at_salvage() {
        // 10000 -> 8000 -> 6400 -> 5120; year 4 would take it to 4096 < 5000
        let charges = annual_charges(&terms(
            DepreciationMethod::ReducingBalance,
            dec!(10000),
            dec!(5000),
            10,
        ));
        assert_eq!(charges, vec![dec!(2000), dec!(1600), dec!(1280), dec!(120)]);
    }

    #[test]
    fn test_zero_base_has_no_charges() {
        let charges = annual_charges(&terms(
            DepreciationMethod::StraightLine,
            dec!(500),
            dec!(500),
            4,
        ));
        assert!(charges.is_empty());
    }

    #[test]
    fn test_accumulated_through_partial_year() {
        let charges = vec![dec!(2000), dec!(1600), dec!(1280)];
        let elapsed = ElapsedTime {
            completed_years: 1,
            fraction: dec!(0.5),
        };
        assert_eq!(accumulated_through(&charges, dec!(4880), &elapsed), dec!(2800));
    }

    #[test]
    fn test_accumulated_through_beyond_horizon_is_base() {
        let charges = vec![dec!(100), dec!(100)];
        let elapsed = ElapsedTime {
            completed_years: 7,
            fraction: dec!(0.3),
        };
        assert_eq!(accumulated_through(&charges, dec!(200), &elapsed), dec!(200));
    }
}
