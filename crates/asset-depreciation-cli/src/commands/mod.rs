pub mod depreciation;
pub mod format;
pub mod register;
