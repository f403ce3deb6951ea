//! Depreciation engine: per-year charges, point-in-time position, schedule
//! generation and disposal outcome.
//!
//! The calculator and the schedule generator both read the same per-year
//! charge sequence from [`charges::annual_charges`], so summing the schedule
//! up to any date reproduces the point-in-time accumulated depreciation.

pub mod calculator;
pub mod charges;
pub mod disposal;
pub mod schedule;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::DepreciationError;
use crate::types::{Money, Rate};
use crate::EngineResult;

pub use calculator::{
    calculate, calculate_depreciation, DepreciationInput, DepreciationReport, DepreciationResult,
};
pub use charges::annual_charges;
pub use disposal::{disposal_outcome, DisposalOutcome};
pub use schedule::{build_schedule, generate_schedule, ScheduleEntry, ScheduleInput, ScheduleOutput};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default reducing-balance rate applied to opening book value each year.
pub const REDUCING_BALANCE_RATE: Rate = dec!(0.20);

/// Book value within this distance of salvage counts as fully depreciated.
pub const ROUNDING_TOLERANCE: Money = dec!(0.005);

const MONTHS_PER_YEAR: Decimal = dec!(12);

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// Engine-wide knobs that are not part of the asset record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepreciationPolicy {
    /// Fraction of opening book value charged each year under reducing balance
    pub reducing_balance_rate: Rate,
}

impl Default for DepreciationPolicy {
    fn default() -> Self {
        DepreciationPolicy {
            reducing_balance_rate: REDUCING_BALANCE_RATE,
        }
    }
}

impl DepreciationPolicy {
    /// Policy with an optional rate override; `None` keeps the 20% default.
    pub fn with_rate(rate: Option<Rate>) -> Self {
        DepreciationPolicy {
            reducing_balance_rate: rate.unwrap_or(REDUCING_BALANCE_RATE),
        }
    }

    pub fn validate(&self) -> EngineResult<()> {
        let rate = self.reducing_balance_rate;
        if rate <= Decimal::ZERO || rate > Decimal::ONE {
            return Err(DepreciationError::validation(
                "reducing_balance_rate",
                format!("Rate must be in (0, 1], got {rate}"),
            ));
        }
        Ok(())
    }
}
