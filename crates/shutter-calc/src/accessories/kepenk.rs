//! 捲門配件規則表

use rust_decimal::Decimal;
use shutter_core::CatalogQuery;

use super::{AccessoryRule, QuantityRule, RuleContext};
use crate::products::kepenk::KepenkContext;
use crate::profiles::ProfileCalculator;

const TYPE_TAG: &str = "kepenk_aksesuar";

fn accessory(fragment: &str) -> CatalogQuery {
    CatalogQuery::of_type(TYPE_TAG).containing(fragment)
}

fn longest_post(c: &KepenkContext<'_>) -> Decimal {
    c.geometry
        .post_lengths
        .iter()
        .copied()
        .max()
        .unwrap_or(Decimal::ZERO)
}

/// 捲門配件規則（依輸出順序）
pub fn rules<'a>() -> Vec<AccessoryRule<KepenkContext<'a>>> {
    vec![
        AccessoryRule {
            name: "alt_parca_lastigi",
            applies: |_| true,
            query: |c| accessory("alt parça lastiği").with_lamel_type(c.selections.lamel_type.tag()),
            quantity: QuantityRule::Length(|c| (Decimal::ONE, c.geometry.lamel_widths.iter().sum())),
        },
        // 100 系列葉片不用平衡滾輪
        AccessoryRule {
            name: "lamel_denge_makarasi",
            applies: |c| !c.selections.lamel_type.is_door_100(),
            query: |_| accessory("denge makarası"),
            quantity: QuantityRule::Derived(|c| Decimal::from(2 * c.section_count())),
        },
        AccessoryRule {
            name: "dikme_pleksi",
            applies: |_| true,
            query: |_| accessory("dikme pleksi"),
            quantity: QuantityRule::Length(|c| (Decimal::from(c.section_count()), longest_post(c))),
        },
        AccessoryRule {
            name: "kil_fitil",
            applies: |_| true,
            query: |c| {
                let grade = if c.selections.lamel_type.is_door_100() { "1800" } else { "1200" };
                accessory("067x").containing(grade)
            },
            quantity: QuantityRule::Length(|c| (Decimal::ONE, c.geometry.post_lengths.iter().sum())),
        },
        AccessoryRule {
            name: "zimba_civisi",
            applies: |_| true,
            query: |_| accessory("zımba çivisi"),
            quantity: QuantityRule::Derived(|c| {
                let total: u32 = c
                    .geometry
                    .total_lamel_counts()
                    .into_iter()
                    .map(ProfileCalculator::staple_nail_count)
                    .sum();
                Decimal::from(total)
            }),
        },
        AccessoryRule {
            name: "tapa",
            applies: |_| true,
            query: |c| accessory("tapa").with_lamel_type(c.selections.lamel_type.tag()),
            quantity: QuantityRule::Derived(|c| {
                Decimal::from(ProfileCalculator::plug_count(&c.geometry.total_lamel_counts()))
            }),
        },
        AccessoryRule {
            name: "boru_basi",
            applies: |_| true,
            query: |c| accessory("boru başı").with_tube_type(c.tube_type.tag()),
            quantity: QuantityRule::PerDrivenSection { factor: 1 },
        },
        AccessoryRule {
            name: "montaj_vidasi",
            applies: |_| true,
            query: |_| accessory("montaj vidası"),
            quantity: QuantityRule::Derived(|c| Decimal::from(c.config.mounting_screw_count)),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessories::AccessoryResolver;
    use crate::products::kepenk::KepenkGeometry;
    use shutter_core::{
        Catalog, CatalogItem, EngineConfig, KepenkSelections, LamelType, SectionLayout, Unit,
    };

    fn d(v: i64) -> Decimal {
        Decimal::from(v)
    }

    fn item(description: &str, code: &str) -> CatalogItem {
        CatalogItem::new(description, code, TYPE_TAG, Unit::Piece, "1.00")
    }

    fn catalog() -> Catalog {
        Catalog::new(vec![
            CatalogItem::new("77 Alt Parça Lastiği", "APL77", TYPE_TAG, Unit::Meter, "2.00")
                .with_lamel_type("st_77"),
            item("Lamel Denge Makarası", "LDM"),
            CatalogItem::new("Dikme Pleksi", "DP", TYPE_TAG, Unit::Meter, "1.50"),
            CatalogItem::new("067x1200 Kıl Fitil", "KF12", TYPE_TAG, Unit::Meter, "0.80"),
            CatalogItem::new("067x1800 Kıl Fitil", "KF18", TYPE_TAG, Unit::Meter, "0.90"),
            item("Zımba Çivisi", "ZC"),
            item("Kepenk Tapa", "TP77").with_lamel_type("st_77"),
            item("Boru Başı 70", "BB70").with_tube_type("70mm"),
            item("Boru Başı 102", "BB102").with_tube_type("102mm"),
            item("Montaj Vidası", "MV"),
        ])
    }

    fn resolve(s: &KepenkSelections) -> Vec<(String, Decimal, Option<Decimal>)> {
        let config = EngineConfig::default();
        let ctx = KepenkContext {
            selections: s,
            geometry: KepenkGeometry::resolve(s).unwrap(),
            config: &config,
            tube_type: s.tube_type,
        };
        AccessoryResolver::resolve(&catalog(), &rules(), &ctx)
            .into_iter()
            .map(|d| (d.item.stock_code, d.quantity, d.size))
            .collect()
    }

    #[test]
    fn test_single_section_77() {
        let s = KepenkSelections::new(d(2000), d(2500), LamelType::St77);
        let lines = resolve(&s);
        let codes: Vec<_> = lines.iter().map(|(c, _, _)| c.as_str()).collect();
        assert_eq!(
            codes,
            vec!["APL77", "LDM", "DP", "KF12", "ZC", "TP77", "BB70", "MV"]
        );

        let line = |code: &str| lines.iter().find(|(c, _, _)| c == code).cloned().unwrap();
        assert_eq!(line("APL77").2, Some(d(1866)));
        assert_eq!(line("LDM").1, d(2));
        assert_eq!(line("DP").2, Some(d(2200)));
        // 兩支立柱各 2200
        assert_eq!(line("KF12").2, Some(d(4400)));
        // 31 片 → 16
        assert_eq!(line("ZC").1, d(16));
        assert_eq!(line("TP77").1, d(32));
        assert_eq!(line("MV").1, d(16));
    }

    #[test]
    fn test_100_series_skips_balance_roller() {
        let s = KepenkSelections::new(d(4000), d(3000), LamelType::St100);
        let lines = resolve(&s);
        let codes: Vec<_> = lines.iter().map(|(c, _, _)| c.as_str()).collect();
        assert!(!codes.contains(&"LDM"));
        assert!(codes.contains(&"KF18"));
        assert!(codes.contains(&"BB102"));
    }

    #[test]
    fn test_units_multiply_quantities() {
        let s = KepenkSelections::new(d(3000), d(2500), LamelType::St77)
            .with_quantity(2)
            .with_layout(SectionLayout::single().with_dividers(vec![d(1500)]));
        let lines = resolve(&s);
        let qty = |code: &str| lines.iter().find(|(c, _, _)| c == code).map(|(_, q, _)| *q).unwrap();
        // 兩區段 × 2 滾輪 × 2 件
        assert_eq!(qty("LDM"), d(8));
    }
}
