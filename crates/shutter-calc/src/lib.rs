//! # Shutter Calculation Engine
//!
//! 物料清單（BOM）與報價計算引擎

pub mod accessories;
pub mod assembler;
pub mod calculator;
pub mod capacity;
pub mod dimensions;
pub mod glass_layout;
pub mod products;
pub mod profiles;

// Re-export 主要類型
pub use assembler::BomAssembler;
pub use calculator::QuoteCalculator;
pub use dimensions::{DimensionResolver, SectionGroup};
pub use glass_layout::{GlassLayout, GlassPane, Panel, PanelKind};
pub use profiles::ProfileCalculator;

use rust_decimal::Decimal;
use shutter_core::{CatalogItem, QuoteWarning};

/// 尚未計價的明細行
#[derive(Debug, Clone, PartialEq)]
pub struct LineDraft {
    pub item: CatalogItem,
    pub quantity: Decimal,
    pub size: Option<Decimal>,
    pub qualifier: Option<String>,
}

impl LineDraft {
    pub fn new(item: CatalogItem, quantity: Decimal) -> Self {
        Self {
            item,
            quantity,
            size: None,
            qualifier: None,
        }
    }

    pub fn with_size(mut self, size: Decimal) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = Some(qualifier.into());
        self
    }
}

/// 單一產品族的計算輸出（尚未計價）
#[derive(Debug, Clone, Default)]
pub struct ProductDrafts {
    pub products: Vec<LineDraft>,
    pub accessories: Vec<LineDraft>,
    pub warnings: Vec<QuoteWarning>,
}

impl ProductDrafts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_warning(&mut self, warning: QuoteWarning) {
        self.warnings.push(warning);
    }
}
