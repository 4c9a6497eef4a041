//! 摺疊紗窗（plise sineklik）

use rust_decimal::Decimal;
use shutter_core::{
    Catalog, CatalogQuery, EngineConfig, OpeningDirection, SineklikSelections, ThresholdType,
};

use crate::accessories::{self, AccessoryResolver, RuleContext};
use crate::products::color_chain;
use crate::{LineDraft, ProductDrafts};

const PROFILE_TAG: &str = "sineklik_profil";

/// 框料扣減（mm）
const FRAME_DEDUCTION: i64 = 50;
/// 扇料扣減（mm）
const SASH_DEDUCTION: i64 = 94;
/// 橫向開啟時低門檻扣減（mm）
const THRESHOLD_HORIZONTAL_DEDUCTION: i64 = 4;

/// 紗窗各型材尺寸
#[derive(Debug, Clone, PartialEq)]
pub struct SineklikGeometry {
    /// 橫框（數量, 長度）
    pub horizontal_frame: (u32, Decimal),
    /// 直框（數量, 長度）
    pub vertical_frame: (u32, Decimal),
    /// 低門檻長度（僅無門檻框）
    pub threshold: Option<Decimal>,
    /// 扇料長度（僅標準框）
    pub sash: Option<Decimal>,
}

impl SineklikGeometry {
    pub fn resolve(s: &SineklikSelections) -> Self {
        let w = s.width;
        let h = s.height;
        let frame = Decimal::from(FRAME_DEDUCTION);
        let thresholdless = s.threshold == ThresholdType::None;

        let horizontal_qty = if thresholdless && s.opening == OpeningDirection::Horizontal {
            1
        } else {
            2
        };
        let vertical_qty = if thresholdless && s.opening == OpeningDirection::Double {
            1
        } else {
            2
        };

        let threshold = thresholdless.then(|| match s.opening {
            OpeningDirection::Horizontal => w - Decimal::from(THRESHOLD_HORIZONTAL_DEDUCTION),
            OpeningDirection::Double => w - frame,
            OpeningDirection::Vertical => w,
        });

        let sash = (!thresholdless).then(|| match s.opening {
            OpeningDirection::Vertical => w - Decimal::from(SASH_DEDUCTION),
            _ => h - Decimal::from(SASH_DEDUCTION),
        });

        Self {
            horizontal_frame: (horizontal_qty, w - frame),
            vertical_frame: (vertical_qty, h - frame),
            threshold,
            sash,
        }
    }
}

/// 紗窗規則評估環境
pub struct SineklikContext<'a> {
    pub selections: &'a SineklikSelections,
    pub config: &'a EngineConfig,
}

impl SineklikContext<'_> {
    pub fn colors(&self) -> Vec<String> {
        color_chain(self.selections, "profile_color", self.config)
    }

    pub fn is_double(&self) -> bool {
        self.selections.opening == OpeningDirection::Double
    }

    pub fn is_thresholdless(&self) -> bool {
        self.selections.threshold == ThresholdType::None
    }
}

impl RuleContext for SineklikContext<'_> {
    fn section_count(&self) -> u32 {
        1
    }

    fn post_count(&self) -> u32 {
        0
    }

    fn driven_sections(&self) -> u32 {
        0
    }

    fn units(&self) -> u32 {
        self.selections.quantity
    }
}

/// 紗窗明細產生器
pub struct SineklikBuilder;

impl SineklikBuilder {
    pub fn build(
        catalog: &Catalog,
        selections: &SineklikSelections,
        config: &EngineConfig,
    ) -> shutter_core::Result<ProductDrafts> {
        let ctx = SineklikContext { selections, config };
        let geometry = SineklikGeometry::resolve(selections);
        let mut drafts = ProductDrafts::new();

        let profile = |fragment: &str| {
            catalog.find_first(
                &CatalogQuery::of_type(PROFILE_TAG)
                    .containing(fragment)
                    .with_colors(ctx.colors()),
            )
        };

        // 找不到框料時整組型材略過
        if let Some(item) = profile("kasa") {
            let (qty, size) = geometry.horizontal_frame;
            drafts.products.push(
                LineDraft::new(item.clone(), Decimal::from(qty))
                    .with_size(size)
                    .with_qualifier("(Yatay)"),
            );
            let (qty, size) = geometry.vertical_frame;
            drafts.products.push(
                LineDraft::new(item.clone(), Decimal::from(qty))
                    .with_size(size)
                    .with_qualifier("(Dikey)"),
            );

            if let Some(size) = geometry.threshold {
                if let Some(item) = profile("düşük eşik") {
                    drafts
                        .products
                        .push(LineDraft::new(item.clone(), Decimal::ONE).with_size(size));
                }
            }
        }

        if let Some(size) = geometry.sash {
            if let Some(item) = profile("kanat") {
                drafts
                    .products
                    .push(LineDraft::new(item.clone(), Decimal::ONE).with_size(size));
            }
        }

        let units = Decimal::from(selections.quantity);
        for draft in drafts.products.iter_mut() {
            draft.quantity *= units;
        }

        drafts
            .accessories
            .extend(AccessoryResolver::resolve(catalog, &accessories::sineklik::rules(), &ctx));

        tracing::debug!(
            "紗窗 {}×{}: {} 型材, {} 配件",
            selections.width,
            selections.height,
            drafts.products.len(),
            drafts.accessories.len()
        );
        Ok(drafts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use shutter_core::{CatalogItem, Unit};

    fn d(v: i64) -> Decimal {
        Decimal::from(v)
    }

    #[rstest]
    #[case(OpeningDirection::Horizontal, ThresholdType::Standard, 2, 2, None, Some(2006))]
    #[case(OpeningDirection::Vertical, ThresholdType::Standard, 2, 2, None, Some(1106))]
    #[case(OpeningDirection::Horizontal, ThresholdType::None, 1, 2, Some(1196), None)]
    #[case(OpeningDirection::Double, ThresholdType::None, 2, 1, Some(1150), None)]
    #[case(OpeningDirection::Vertical, ThresholdType::None, 2, 2, Some(1200), None)]
    fn test_profile_geometry(
        #[case] opening: OpeningDirection,
        #[case] threshold: ThresholdType,
        #[case] horizontal: u32,
        #[case] vertical: u32,
        #[case] threshold_size: Option<i64>,
        #[case] sash_size: Option<i64>,
    ) {
        let s = SineklikSelections::new(d(1200), d(2100), opening).with_threshold(threshold);
        let g = SineklikGeometry::resolve(&s);
        assert_eq!(g.horizontal_frame, (horizontal, d(1150)));
        assert_eq!(g.vertical_frame, (vertical, d(2050)));
        assert_eq!(g.threshold, threshold_size.map(d));
        assert_eq!(g.sash, sash_size.map(d));
    }

    #[test]
    fn test_build_profiles_with_color_fallback() {
        let catalog = Catalog::new(vec![
            CatalogItem::new("Plise Kasa Profili", "PK-B", PROFILE_TAG, Unit::Meter, "3.00")
                .with_color("beyaz"),
            CatalogItem::new("Plise Kasa Profili", "PK-R", PROFILE_TAG, Unit::Meter, "3.50")
                .with_color("ral_boyali"),
            CatalogItem::new("Plise Kanat Profili", "PKN-R", PROFILE_TAG, Unit::Meter, "2.00")
                .with_color("ral_boyali"),
        ]);
        let s = SineklikSelections::new(d(1200), d(2100), OpeningDirection::Horizontal)
            .with_color("profile_color", "antrasit")
            .with_quantity(2);
        let drafts = SineklikBuilder::build(&catalog, &s, &EngineConfig::default()).unwrap();

        let codes: Vec<_> = drafts.products.iter().map(|d| d.item.stock_code.as_str()).collect();
        assert_eq!(codes, vec!["PK-R", "PK-R", "PKN-R"]);
        assert_eq!(drafts.products[0].quantity, d(4));
        assert_eq!(drafts.products[2].size, Some(d(2006)));
    }
}
