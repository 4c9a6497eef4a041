//! # Shutter Core
//!
//! 報價引擎核心資料模型與類型定義

pub mod catalog;
pub mod config;
pub mod line;
pub mod product;
pub mod schema;
pub mod selections;

// Re-export 主要類型
pub use catalog::{Catalog, CatalogItem, CatalogQuery, Unit};
pub use config::EngineConfig;
pub use line::{
    CalculationResult, SelectedLine, SelectedProducts, QuoteWarning, WarningKind,
    WarningSeverity,
};
pub use product::{
    BoxSize, ExitSide, GlassProfileColor, GlassThickness, HeightConvention, LamelType, ManualDrive,
    MeshType, MotorBrand, MountingStyle, MovementType, OpeningDirection, PostAdapter, PostType,
    SectionConnection, Side, SubPart, ThresholdType, TubeType, WidthConvention,
};
pub use schema::{Dependency, FieldSchema, FieldSpec, FieldValue, FieldValues, Predicate};
pub use selections::{
    CamBalkonSelections, ColorFields, GlassArm, KepenkSelections, PanjurSelections, SectionLayout,
    Selections, SineklikSelections, VisionBand,
};

/// 報價引擎錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum ShutterError {
    #[error("無效的分隔位置: {0}")]
    InvalidDividers(String),

    #[error("無效的單價: {stock_code} = {price:?}")]
    InvalidPrice { stock_code: String, price: String },

    #[error("欄位依賴形成循環: {0}")]
    DependencyCycle(String),

    #[error("找不到欄位: {0}")]
    UnknownField(String),

    #[error("目錄解析錯誤: {0}")]
    CatalogParse(#[from] serde_json::Error),

    #[error("匯率已過期: {0}")]
    StaleExchangeRate(String),

    #[error("計算錯誤: {0}")]
    CalculationError(String),
}

pub type Result<T> = std::result::Result<T, ShutterError>;
