//! BOM 組裝：計價、包裝費與總價

use rust_decimal::Decimal;
use shutter_core::line::round_money;
use shutter_core::{
    CalculationResult, Catalog, CatalogItem, CatalogQuery, EngineConfig, QuoteWarning,
    SelectedLine, ShutterError, Unit, WarningKind,
};

use crate::{LineDraft, ProductDrafts};

/// BOM 組裝器
pub struct BomAssembler;

impl BomAssembler {
    /// 將草稿組裝為計算結果
    ///
    /// 明細保持產生順序；單價無法解析的行略過並記錄。
    /// `packaging` 為真時，在配件尾端追加小計乘以包裝費率的包裝行。
    pub fn assemble(
        catalog: &Catalog,
        drafts: ProductDrafts,
        packaging: bool,
        config: &EngineConfig,
    ) -> CalculationResult {
        let mut result = CalculationResult::empty();
        for warning in drafts.warnings {
            result.add_warning(warning);
        }

        result.selected_products.products = Self::price_lines(drafts.products, &mut result);
        let accessories = Self::price_lines(drafts.accessories, &mut result);
        result.selected_products.accessories = accessories;

        if packaging {
            let subtotal = result.line_sum();
            match Self::packaging_line(catalog, subtotal, config) {
                Ok(line) => result.selected_products.accessories.push(line),
                Err(e) => result.add_warning(QuoteWarning::warning(
                    WarningKind::InvalidPrice,
                    format!("包裝費計算失敗: {e}"),
                )),
            }
        }

        let total = result.line_sum();
        if total < Decimal::ZERO {
            result.add_warning(QuoteWarning::error(
                WarningKind::InvalidTotal,
                format!("總價為負數 ({total})，已設為 0"),
            ));
            result.total_price = Decimal::ZERO;
        } else {
            result.total_price = total;
        }

        tracing::debug!(
            "組裝完成：{} 行，總價 {}",
            result.selected_products.len(),
            result.total_price
        );
        result
    }

    fn price_lines(drafts: Vec<LineDraft>, result: &mut CalculationResult) -> Vec<SelectedLine> {
        let mut lines = Vec::with_capacity(drafts.len());
        for draft in drafts {
            match SelectedLine::priced(draft.item, draft.quantity, draft.size, draft.qualifier) {
                Ok(line) => lines.push(line),
                Err(e) => result.add_warning(QuoteWarning::warning(WarningKind::InvalidPrice, e.to_string())),
            }
        }
        lines
    }

    /// 包裝行：目錄有包裝品項時沿用其說明，單價改為本次包裝費
    ///
    /// 小計為負時包裝費為 0。
    fn packaging_line(
        catalog: &Catalog,
        subtotal: Decimal,
        config: &EngineConfig,
    ) -> shutter_core::Result<SelectedLine> {
        if config.packaging_rate < Decimal::ZERO {
            return Err(ShutterError::CalculationError(format!(
                "包裝費率不可為負: {}",
                config.packaging_rate
            )));
        }

        let amount = round_money(subtotal * config.packaging_rate).max(Decimal::ZERO);
        let mut item = catalog
            .find_first(&CatalogQuery::by_stock_code(config.packaging_stock_code.as_str()))
            .cloned()
            .unwrap_or_else(|| {
                CatalogItem::new("Ambalaj", config.packaging_stock_code.as_str(), "ambalaj", Unit::Piece, "0")
            });
        item.unit = Unit::Piece;
        item.unit_price = amount.to_string();

        let label = format!("(%{})", (config.packaging_rate * Decimal::from(100)).normalize());
        SelectedLine::priced(item, Decimal::ONE, None, Some(label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shutter_core::WarningSeverity;

    fn d(v: i64) -> Decimal {
        Decimal::from(v)
    }

    fn drafts() -> ProductDrafts {
        let mut drafts = ProductDrafts::new();
        drafts.products.push(
            LineDraft::new(
                CatalogItem::new("Lamel", "L", "panjur_lamel", Unit::Meter, "10.00"),
                d(20),
            )
            .with_size(d(1500)),
        );
        drafts.accessories.push(LineDraft::new(
            CatalogItem::new("Yan Kapak", "YK", "panjur_aksesuar", Unit::Piece, "12.50"),
            d(2),
        ));
        drafts
    }

    #[test]
    fn test_total_is_sum_of_lines() {
        let result = BomAssembler::assemble(&Catalog::default(), drafts(), false, &EngineConfig::default());
        // 10 × 20 × 1.5 + 12.5 × 2
        assert_eq!(result.total_price, d(325));
        assert_eq!(result.total_price, result.line_sum());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_invalid_price_line_is_omitted() {
        let mut drafts = drafts();
        drafts.accessories.push(LineDraft::new(
            CatalogItem::new("Bozuk", "X", "panjur_aksesuar", Unit::Piece, "abc"),
            d(1),
        ));
        let result = BomAssembler::assemble(&Catalog::default(), drafts, false, &EngineConfig::default());
        assert_eq!(result.selected_products.accessories.len(), 1);
        assert_eq!(result.total_price, d(325));
        assert!(result.has_warning(WarningKind::InvalidPrice));
        assert_eq!(result.errors.len(), 1);
    }

    #[test]
    fn test_packaging_line_appended() {
        let catalog = Catalog::new(vec![CatalogItem::new(
            "Paketleme",
            "PAKET-001",
            "ambalaj",
            Unit::Piece,
            "1",
        )]);
        let result = BomAssembler::assemble(&catalog, drafts(), true, &EngineConfig::default());
        let last = result.selected_products.accessories.last().unwrap();
        assert_eq!(last.item.description, "Paketleme");
        // 325 × 5% = 16.25
        assert_eq!(last.total_price, Decimal::new(1625, 2));
        assert_eq!(last.qualifier.as_deref(), Some("(%5)"));
        assert_eq!(result.total_price, Decimal::new(34125, 2));
    }

    #[test]
    fn test_negative_total_clamped() {
        let mut drafts = ProductDrafts::new();
        drafts.products.push(LineDraft::new(
            CatalogItem::new("İndirim", "IND", "indirim", Unit::Piece, "-50"),
            d(1),
        ));
        let result = BomAssembler::assemble(&Catalog::default(), drafts, false, &EngineConfig::default());
        assert_eq!(result.total_price, Decimal::ZERO);
        let warning = result.warnings.iter().find(|w| w.kind == WarningKind::InvalidTotal).unwrap();
        assert_eq!(warning.severity, WarningSeverity::Error);
    }

    #[test]
    fn test_packaging_zero_on_negative_subtotal() {
        let mut drafts = drafts();
        drafts.products.push(LineDraft::new(
            CatalogItem::new("İndirim", "IND", "indirim", Unit::Piece, "-500"),
            d(1),
        ));
        let result = BomAssembler::assemble(&Catalog::default(), drafts, true, &EngineConfig::default());
        let packaging = result.selected_products.accessories.last().unwrap();
        assert_eq!(packaging.item.stock_code, "PAKET-001");
        assert_eq!(packaging.total_price, Decimal::ZERO);
        // 325 − 500 < 0，總價同樣歸零
        assert_eq!(result.total_price, Decimal::ZERO);
        assert!(result.has_warning(WarningKind::InvalidTotal));
    }

    #[test]
    fn test_assemble_is_idempotent() {
        let config = EngineConfig::default();
        let a = BomAssembler::assemble(&Catalog::default(), drafts(), true, &config);
        let b = BomAssembler::assemble(&Catalog::default(), drafts(), true, &config);
        assert_eq!(a, b);
    }
}
