//! Calendar-accurate elapsed time between an acquisition date and an
//! evaluation date.
//!
//! Asset years run from one purchase anniversary to the next. Elapsed time
//! is the number of completed asset years plus the fraction of the current
//! asset year that has passed, measured in actual days over the actual
//! length (365 or 366 days) of that asset year. A 29 February purchase has
//! its anniversaries on 28 February in common years.

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::DepreciationError;
use crate::types::Years;
use crate::EngineResult;

/// Elapsed time split into whole asset years and the current fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElapsedTime {
    pub completed_years: u32,
    /// Fraction of the current asset year, in `[0, 1)`
    pub fraction: Decimal,
}

impl ElapsedTime {
    pub const ZERO: ElapsedTime = ElapsedTime {
        completed_years: 0,
        fraction: Decimal::ZERO,
    };

    pub fn years(&self) -> Years {
        Decimal::from(self.completed_years) + self.fraction
    }
}

/// Date of the `n`th anniversary of `start` (the 0th is `start` itself).
pub fn anniversary(start: NaiveDate, n: u32) -> EngineResult<NaiveDate> {
    let months = n.checked_mul(12).ok_or_else(|| {
        DepreciationError::DateError(format!("Anniversary {n} of {start} is out of range"))
    })?;
    start.checked_add_months(Months::new(months)).ok_or_else(|| {
        DepreciationError::DateError(format!("Anniversary {n} of {start} is out of range"))
    })
}

/// Elapsed asset years from `start` to `end`. Zero when `end <= start`.
pub fn elapsed_between(start: NaiveDate, end: NaiveDate) -> EngineResult<ElapsedTime> {
    if end <= start {
        return Ok(ElapsedTime::ZERO);
    }

    let mut completed = (end.year() - start.year()).max(0) as u32;
    while completed > 0 && anniversary(start, completed)? > end {
        completed -= 1;
    }

    let from = anniversary(start, completed)?;
    let to = anniversary(start, completed + 1)?;
    let days_in = (end - from).num_days();
    let year_length = (to - from).num_days();

    let fraction = if year_length <= 0 {
        Decimal::ZERO
    } else {
        Decimal::from(days_in) / Decimal::from(year_length)
    };

    Ok(ElapsedTime {
        completed_years: completed,
        fraction,
    })
}
