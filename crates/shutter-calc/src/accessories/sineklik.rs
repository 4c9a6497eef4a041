//! 摺疊紗窗配件規則表

use rust_decimal::Decimal;
use shutter_core::{CatalogQuery, OpeningDirection};

use super::{AccessoryRule, QuantityRule};
use crate::products::sineklik::SineklikContext;

const TYPE_TAG: &str = "sineklik_aksesuar";

/// 紗網與拉帶的開口扣減（mm）
const OPENING_DEDUCTION: i64 = 55;
/// 無門檻框的高度扣減（mm）
const THRESHOLDLESS_DEDUCTION: i64 = 31;

fn accessory(fragment: &str) -> CatalogQuery {
    CatalogQuery::of_type(TYPE_TAG).containing(fragment)
}

/// 紗網淨寬高（mm）
fn mesh_dimensions(c: &SineklikContext<'_>) -> (Decimal, Decimal) {
    let s = c.selections;
    if c.is_thresholdless() {
        return (s.width, s.height - Decimal::from(THRESHOLDLESS_DEDUCTION));
    }
    match s.opening {
        OpeningDirection::Vertical => (s.width - Decimal::from(OPENING_DEDUCTION), s.height),
        _ => (s.width, s.height - Decimal::from(OPENING_DEDUCTION)),
    }
}

/// 紗網面積（m²）
pub fn mesh_area(c: &SineklikContext<'_>) -> Decimal {
    let (w, h) = mesh_dimensions(c);
    w * h / Decimal::from(1_000_000)
}

/// 導帶長度（mm）
fn strip_length(c: &SineklikContext<'_>) -> Decimal {
    let (w, h) = mesh_dimensions(c);
    match c.selections.opening {
        OpeningDirection::Vertical if !c.is_thresholdless() => w,
        _ => h,
    }
}

/// 拉繩（條數, 每條長度 mm）
///
/// 條數依開啟方向的跨距分級，長度以 0.1 m 向上取整；雙開時條數加倍、長度減半。
pub fn rope(c: &SineklikContext<'_>) -> (Decimal, Decimal) {
    let s = c.selections;
    let span = match s.opening {
        OpeningDirection::Vertical => s.width,
        _ => s.height,
    };
    let mut count: u32 = if span < Decimal::from(1500) {
        4
    } else if span < Decimal::from(2100) {
        6
    } else {
        8
    };

    let tenths = ((s.width + s.height + Decimal::from(150)) / Decimal::from(100)).ceil();
    let mut length = tenths * Decimal::from(100);

    if c.is_double() {
        count *= 2;
        length /= Decimal::from(2);
    }
    (Decimal::from(count), length)
}

/// 摺疊紗窗配件規則（依輸出順序）
pub fn rules<'a>() -> Vec<AccessoryRule<SineklikContext<'a>>> {
    vec![
        // 紗網以 m² 計價，數量即面積
        AccessoryRule {
            name: "tul",
            applies: |_| true,
            query: |c| accessory("tül").with_model_tag(c.selections.mesh.tag()),
            quantity: QuantityRule::Derived(mesh_area),
        },
        AccessoryRule {
            name: "serit",
            applies: |_| true,
            query: |_| accessory("şerit"),
            quantity: QuantityRule::Length(|c| {
                let count = if c.is_double() { 4 } else { 2 };
                (Decimal::from(count), strip_length(c))
            }),
        },
        AccessoryRule {
            name: "halat",
            applies: |_| true,
            query: |_| accessory("halat"),
            quantity: QuantityRule::Length(rope),
        },
        AccessoryRule {
            name: "boncuk",
            applies: |_| true,
            query: |_| accessory("boncuk"),
            quantity: QuantityRule::Derived(|c| rope(c).0),
        },
        AccessoryRule {
            name: "aksesuar_kiti",
            applies: |_| true,
            query: |c| {
                accessory("aksesuar kiti")
                    .with_model_tag(c.selections.threshold.tag())
                    .with_colors(c.colors())
            },
            quantity: QuantityRule::Fixed(1),
        },
        AccessoryRule {
            name: "miknatis",
            applies: |c| c.is_double(),
            query: |_| accessory("mıknatıs"),
            quantity: QuantityRule::Length(|c| (Decimal::from(2), c.selections.height - Decimal::from(50))),
        },
        AccessoryRule {
            name: "kose_takozu",
            applies: |_| true,
            query: |c| accessory("köşe takozu").with_colors(c.colors()),
            quantity: QuantityRule::Fixed(4),
        },
        AccessoryRule {
            name: "fitil",
            applies: |_| true,
            query: |c| accessory("fitil").with_colors(c.colors()),
            quantity: QuantityRule::Length(|c| {
                let s = c.selections;
                (Decimal::ONE, (s.width + s.height) * Decimal::from(2))
            }),
        },
    ]
}
