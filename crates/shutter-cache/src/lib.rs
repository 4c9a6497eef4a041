//! # Shutter Cache
//!
//! 匯率快取與表單變更追蹤

pub mod dirty_tracking;
pub mod rate;

// Re-export 主要類型
pub use dirty_tracking::{changed_fields, DirtyTracker};
pub use rate::{ExchangeRateCache, RateQuote, RateSource};
