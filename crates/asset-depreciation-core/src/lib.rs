pub mod asset;
pub mod day_count;
pub mod depreciation;
pub mod error;
pub mod format;
pub mod types;

#[cfg(feature = "register")]
pub mod register;

pub use asset::{Asset, AssetStatus, DepreciationMethod};
pub use depreciation::{
    DepreciationPolicy, DepreciationResult, ScheduleEntry, REDUCING_BALANCE_RATE,
};
pub use error::DepreciationError;
pub use types::*;

/// Standard result type for all depreciation operations
pub type EngineResult<T> = Result<T, DepreciationError>;
