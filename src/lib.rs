//! # Shutter Quote
//!
//! 捲簾窗、捲門、摺疊紗窗與玻璃陽台的報價引擎。
//!
//! - [`model`]：資料模型（目錄、選項、明細、欄位結構）
//! - [`calc`]：BOM 與報價計算
//! - [`rules`]：表單規則（顏色同步、欄位依賴、選項篩選）
//! - [`cache`]：髒標記與匯率快取

pub use shutter_cache as cache;
pub use shutter_calc as calc;
pub use shutter_core as model;
pub use shutter_rules as rules;

pub use shutter_calc::QuoteCalculator;
pub use shutter_core::{CalculationResult, Catalog, EngineConfig, Result, Selections, ShutterError};
