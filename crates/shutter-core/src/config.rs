//! 引擎配置

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 報價引擎參數
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// 主顏色欄位（其值會同步到其他顏色欄位）
    pub primary_color_field: String,

    /// 顏色不在欄位選項內時使用的通用顏色
    pub universal_default_color: String,

    /// 包裝費率
    pub packaging_rate: Decimal,

    /// 包裝費品項庫存代碼
    pub packaging_stock_code: String,

    /// 電動捲門捲軸長度扣除量（mm）
    pub motorized_tube_deduction: Decimal,

    /// 捲門安裝螺絲數量
    pub mounting_screw_count: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            primary_color_field: "lamel_color".to_string(),
            universal_default_color: "ral_boyali".to_string(),
            packaging_rate: Decimal::new(5, 2),
            packaging_stock_code: "PAKET-001".to_string(),
            motorized_tube_deduction: Decimal::from(60),
            mounting_screw_count: 16,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：設置主顏色欄位
    pub fn with_primary_color_field(mut self, field: impl Into<String>) -> Self {
        self.primary_color_field = field.into();
        self
    }

    /// 建構器模式：設置通用顏色
    pub fn with_universal_default_color(mut self, color: impl Into<String>) -> Self {
        self.universal_default_color = color.into();
        self
    }

    /// 建構器模式：設置包裝費率
    pub fn with_packaging_rate(mut self, rate: Decimal) -> Self {
        self.packaging_rate = rate;
        self
    }

    /// 建構器模式：設置包裝費品項
    pub fn with_packaging_stock_code(mut self, code: impl Into<String>) -> Self {
        self.packaging_stock_code = code.into();
        self
    }

    /// 建構器模式：設置電動捲軸扣除量
    pub fn with_motorized_tube_deduction(mut self, deduction: Decimal) -> Self {
        self.motorized_tube_deduction = deduction;
        self
    }

    pub fn with_mounting_screw_count(mut self, count: u32) -> Self {
        self.mounting_screw_count = count;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.universal_default_color, "ral_boyali");
        assert_eq!(config.packaging_rate, Decimal::new(5, 2));
        assert_eq!(config.motorized_tube_deduction, Decimal::from(60));
    }

    #[test]
    fn test_builder_and_partial_json() {
        let config = EngineConfig::new()
            .with_packaging_rate(Decimal::new(8, 2))
            .with_universal_default_color("beyaz");
        assert_eq!(config.packaging_rate, Decimal::new(8, 2));

        let json = serde_json::to_string(&config).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
