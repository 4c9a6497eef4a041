//! 報價主計算器

use rayon::prelude::*;
use shutter_core::{CalculationResult, Catalog, EngineConfig, Selections};

use crate::assembler::BomAssembler;
use crate::products::cam_balkon::CamBalkonBuilder;
use crate::products::kepenk::KepenkBuilder;
use crate::products::panjur::PanjurBuilder;
use crate::products::sineklik::SineklikBuilder;

/// 報價計算器
pub struct QuoteCalculator {
    /// 價目目錄
    catalog: Catalog,

    /// 引擎配置
    config: EngineConfig,
}

impl QuoteCalculator {
    /// 創建新的報價計算器
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            config: EngineConfig::default(),
        }
    }

    /// 設置引擎配置
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// 主報價計算入口
    ///
    /// 只有輸入本身不合法（例如分隔位置）時回傳錯誤；
    /// 找不到品項、馬達容量不足等情況以警告形式留在結果中。
    pub fn calculate(&self, selections: &Selections) -> shutter_core::Result<CalculationResult> {
        tracing::info!(
            "開始報價計算：{}，目錄 {} 筆",
            selections.family(),
            self.catalog.len()
        );

        let start_time = std::time::Instant::now();

        // Step 1: 產品族明細草稿
        tracing::debug!("Step 1: 產生明細草稿");
        let drafts = match selections {
            Selections::Panjur(s) => PanjurBuilder::build(&self.catalog, s, &self.config)?,
            Selections::Kepenk(s) => KepenkBuilder::build(&self.catalog, s, &self.config)?,
            Selections::Sineklik(s) => SineklikBuilder::build(&self.catalog, s, &self.config)?,
            Selections::CamBalkon(s) => CamBalkonBuilder::build(&self.catalog, s, &self.config)?,
        };
        tracing::debug!(
            "產品 {} 行，配件 {} 行，警告 {} 筆",
            drafts.products.len(),
            drafts.accessories.len(),
            drafts.warnings.len()
        );

        // Step 2: 計價與組裝
        tracing::debug!("Step 2: 計價與組裝");
        let result = BomAssembler::assemble(&self.catalog, drafts, selections.packaging(), &self.config);

        let elapsed = start_time.elapsed();
        tracing::info!(
            "報價計算完成：總價 {}，明細 {} 行，耗時 {:?}",
            result.total_price,
            result.selected_products.len(),
            elapsed
        );

        Ok(result)
    }

    /// 批次計算（並行）
    ///
    /// 各報價行互相獨立；輸出順序與輸入相同。
    pub fn calculate_batch(&self, batch: &[Selections]) -> Vec<shutter_core::Result<CalculationResult>> {
        tracing::info!("開始批次報價計算：{} 筆", batch.len());
        batch.par_iter().map(|s| self.calculate(s)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shutter_core::{
        BoxSize, CatalogItem, LamelType, OpeningDirection, PanjurSelections, SectionLayout,
        ShutterError, SineklikSelections, Unit,
    };

    fn d(v: i64) -> Decimal {
        Decimal::from(v)
    }

    fn catalog() -> Catalog {
        Catalog::new(vec![
            CatalogItem::new("39 SL Lamel", "L39", "panjur_lamel", Unit::Meter, "4.00")
                .with_lamel_type("39_sl")
                .with_color("ral_boyali"),
            CatalogItem::new("Plise Kasa Profili", "PK", "sineklik_profil", Unit::Meter, "3.00")
                .with_color("ral_boyali"),
        ])
    }

    #[test]
    fn test_calculate_dispatches_by_family() {
        let calculator = QuoteCalculator::new(catalog());
        let s = Selections::Sineklik(SineklikSelections::new(d(1050), d(2050), OpeningDirection::Vertical));
        let result = calculator.calculate(&s).unwrap();

        // 1000 × 2 + 2000 × 2 = 6 m × 3.00
        assert_eq!(result.total_price, d(18));
        assert_eq!(result.selected_products.products.len(), 2);
    }

    #[test]
    fn test_invalid_dividers_is_an_error() {
        let calculator = QuoteCalculator::new(catalog());
        let s = Selections::Panjur(
            PanjurSelections::new(d(2000), d(1500), LamelType::Sl39, BoxSize(165))
                .with_layout(SectionLayout::single().with_dividers(vec![d(1500), d(1000)])),
        );
        assert!(matches!(calculator.calculate(&s), Err(ShutterError::InvalidDividers(_))));
    }

    #[test]
    fn test_batch_keeps_order_and_matches_single() {
        let calculator = QuoteCalculator::new(catalog());
        let batch = vec![
            Selections::Sineklik(SineklikSelections::new(d(1050), d(2050), OpeningDirection::Vertical)),
            Selections::Panjur(PanjurSelections::new(d(1500), d(1200), LamelType::Sl39, BoxSize(137))),
            Selections::Sineklik(
                SineklikSelections::new(d(1050), d(2050), OpeningDirection::Vertical).with_quantity(3),
            ),
        ];
        let results = calculator.calculate_batch(&batch);
        assert_eq!(results.len(), 3);
        for (s, r) in batch.iter().zip(&results) {
            assert_eq!(r.as_ref().unwrap(), &calculator.calculate(s).unwrap());
        }
        assert_eq!(results[2].as_ref().unwrap().total_price, d(54));
    }
}
