//! 報價明細與計算結果

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogItem, Unit};
use crate::Result;

/// 金額四捨五入到小數兩位（中點遠離零）
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// 已計價的明細行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedLine {
    #[serde(flatten)]
    pub item: CatalogItem,

    pub quantity: Decimal,

    pub total_price: Decimal,

    /// 長度（mm），僅按長度計價的品項有效
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Decimal>,

    /// 位置說明，例如 "(Bölme 2)"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifier: Option<String>,
}

impl SelectedLine {
    /// 依品項單價計算總價
    ///
    /// 按公尺計價且有長度時：單價 × 數量 × 長度/1000；否則：單價 × 數量。
    pub fn priced(
        item: CatalogItem,
        quantity: Decimal,
        size: Option<Decimal>,
        qualifier: Option<String>,
    ) -> Result<Self> {
        let unit_price = item.price()?;
        let raw = match (item.unit, size) {
            (Unit::Meter, Some(size)) => unit_price * quantity * size / Decimal::from(1000),
            _ => unit_price * quantity,
        };

        Ok(Self {
            item,
            quantity,
            total_price: round_money(raw),
            size,
            qualifier,
        })
    }

    /// 顯示用名稱（說明加位置）
    pub fn display_name(&self) -> String {
        match &self.qualifier {
            Some(q) => format!("{} {}", self.item.description, q),
            None => self.item.description.clone(),
        }
    }
}

/// 明細分組
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedProducts {
    pub products: Vec<SelectedLine>,
    pub accessories: Vec<SelectedLine>,
}

impl SelectedProducts {
    /// 全部明細（產品在前）
    pub fn lines(&self) -> impl Iterator<Item = &SelectedLine> {
        self.products.iter().chain(self.accessories.iter())
    }

    pub fn len(&self) -> usize {
        self.products.len() + self.accessories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty() && self.accessories.is_empty()
    }
}

/// 警告類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// 找不到容量足夠的馬達
    NoCompatibleMotor,
    /// 單價無法解析
    InvalidPrice,
    /// 總價為負
    InvalidTotal,
    /// 超出葉片尺寸限制
    DimensionLimit,
    /// 必要品項在目錄中找不到
    MissingItem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningSeverity {
    Info,
    Warning,
    Error,
}

/// 報價警告
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteWarning {
    pub kind: WarningKind,
    pub message: String,
    pub severity: WarningSeverity,
}

impl QuoteWarning {
    pub fn new(kind: WarningKind, message: String, severity: WarningSeverity) -> Self {
        Self {
            kind,
            message,
            severity,
        }
    }

    pub fn info(kind: WarningKind, message: String) -> Self {
        Self::new(kind, message, WarningSeverity::Info)
    }

    pub fn warning(kind: WarningKind, message: String) -> Self {
        Self::new(kind, message, WarningSeverity::Warning)
    }

    pub fn error(kind: WarningKind, message: String) -> Self {
        Self::new(kind, message, WarningSeverity::Error)
    }
}

/// 報價計算結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub total_price: Decimal,
    pub selected_products: SelectedProducts,

    /// 面向使用者的錯誤訊息
    pub errors: Vec<String>,

    pub warnings: Vec<QuoteWarning>,
}

impl CalculationResult {
    /// 創建空的計算結果
    pub fn empty() -> Self {
        Self {
            total_price: Decimal::ZERO,
            selected_products: SelectedProducts::default(),
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// 添加警告；嚴重度達 Warning 以上時同時寫入 `errors`
    pub fn add_warning(&mut self, warning: QuoteWarning) {
        if warning.severity >= WarningSeverity::Warning {
            self.errors.push(warning.message.clone());
        }
        self.warnings.push(warning);
    }

    pub fn has_warning(&self, kind: WarningKind) -> bool {
        self.warnings.iter().any(|w| w.kind == kind)
    }

    /// 明細金額合計
    pub fn line_sum(&self) -> Decimal {
        self.selected_products.lines().map(|l| l.total_price).sum()
    }
}
