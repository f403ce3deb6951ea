use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::calculator::position_at;
use super::DepreciationPolicy;
use crate::asset::{Asset, DepreciationTerms};
use crate::types::Money;
use crate::EngineResult;

/// Result of taking a disposed asset off the books.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisposalOutcome {
    pub disposal_date: NaiveDate,
    /// Proceeds received (zero when not recorded)
    pub disposal_value: Money,
    pub accumulated_depreciation_at_disposal: Money,
    pub net_book_value_at_disposal: Money,
    /// `disposal_value - net_book_value_at_disposal`; negative is a loss
    pub gain_or_loss: Money,
}

/// Gain or loss on disposal, if the asset was disposed on or before `as_of`.
pub fn disposal_outcome(
    asset: &Asset,
    as_of: NaiveDate,
    policy: &DepreciationPolicy,
) -> EngineResult<Option<DisposalOutcome>> {
    let mut warnings = Vec::new();
    let terms = asset.terms(policy, &mut warnings)?;
    outcome_for_terms(&terms, as_of)
}

pub(crate) fn outcome_for_terms(
    terms: &DepreciationTerms,
    as_of: NaiveDate,
) -> EngineResult<Option<DisposalOutcome>> {
    let disposal_date = match terms.disposal_date {
        Some(date) if date <= as_of => date,
        _ => return Ok(None),
    };

    let at_disposal = position_at(terms, disposal_date)?;
    Ok(Some(DisposalOutcome {
        disposal_date,
        disposal_value: terms.disposal_value,
        accumulated_depreciation_at_disposal: at_disposal.accumulated_depreciation,
        net_book_value_at_disposal: at_disposal.net_book_value,
        gain_or_loss: terms.disposal_value - at_disposal.net_book_value,
    }))
}
