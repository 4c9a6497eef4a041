//! 捲簾窗配件規則表

use rust_decimal::Decimal;
use shutter_core::{CatalogQuery, LamelType, ManualDrive, MovementType, PostType, SubPart};

use super::{AccessoryRule, QuantityRule, RuleContext};
use crate::products::panjur::PanjurContext;
use crate::profiles::ProfileCalculator;

const TYPE_TAG: &str = "panjur_aksesuar";

fn accessory(fragment: &str) -> CatalogQuery {
    CatalogQuery::of_type(TYPE_TAG).containing(fragment)
}

fn manual_drive(ctx: &PanjurContext<'_>) -> Option<ManualDrive> {
    match ctx.selections.movement {
        MovementType::Manual => Some(ctx.selections.manual_drive.unwrap_or(ManualDrive::Pulley)),
        MovementType::Motorized => None,
    }
}

fn is_pulley(ctx: &PanjurContext<'_>) -> bool {
    manual_drive(ctx) == Some(ManualDrive::Pulley)
}

fn is_gear(ctx: &PanjurContext<'_>) -> bool {
    manual_drive(ctx) == Some(ManualDrive::Gear)
}

/// 捲簾窗配件規則（依輸出順序）
pub fn rules<'a>() -> Vec<AccessoryRule<PanjurContext<'a>>> {
    vec![
        AccessoryRule {
            name: "yan_kapak",
            applies: |_| true,
            query: |c| {
                accessory("yan kapak")
                    .with_box_type(c.selections.box_size.tag())
                    .with_colors(c.colors("box_color"))
            },
            quantity: QuantityRule::PerSection,
        },
        // 驅動組共用：軸頭與軸承
        AccessoryRule {
            name: "boru_basi",
            applies: |_| true,
            query: |c| accessory("boru başı rulmanlı").with_tube_type(c.selections.tube_type.tag()),
            quantity: QuantityRule::PerDrivenSection { factor: 1 },
        },
        AccessoryRule {
            name: "rulman",
            applies: |_| true,
            query: |_| accessory("rulman 12x28"),
            quantity: QuantityRule::Derived(|c| {
                let factor = if is_pulley(c) { 2 } else { 1 };
                Decimal::from(c.driven_sections() * factor)
            }),
        },
        AccessoryRule {
            name: "plaket",
            applies: |c| c.is_motorized() && c.selections.box_size.0 == 250,
            query: |_| accessory("plaket"),
            quantity: QuantityRule::PerDrivenSection { factor: 1 },
        },
        // 拉帶滑輪組
        AccessoryRule {
            name: "kasnak",
            applies: is_pulley,
            query: |c| {
                if c.selections.box_size.0 == 137 {
                    accessory("40x125 kasnak")
                } else {
                    accessory("40x140 kasnak")
                }
            },
            quantity: QuantityRule::PerDrivenSection { factor: 1 },
        },
        AccessoryRule {
            name: "winde_makara",
            applies: is_pulley,
            query: |_| accessory("winde otomatik makara"),
            quantity: QuantityRule::PerDrivenSection { factor: 1 },
        },
        AccessoryRule {
            name: "kordon_makara",
            applies: is_pulley,
            query: |_| accessory("kordon geçme makara"),
            quantity: QuantityRule::PerDrivenSection { factor: 1 },
        },
        // 減速齒輪組：中間臂與搖桿固定各 1
        AccessoryRule {
            name: "reduktor",
            applies: is_gear,
            query: |_| accessory("panjur redüktörü"),
            quantity: QuantityRule::PerDrivenSection { factor: 1 },
        },
        AccessoryRule {
            name: "reduktor_boru_basi",
            applies: is_gear,
            query: |_| accessory("redüktör boru başı"),
            quantity: QuantityRule::PerDrivenSection { factor: 1 },
        },
        AccessoryRule {
            name: "ara_kol",
            applies: is_gear,
            query: |_| accessory("ara kol"),
            quantity: QuantityRule::Fixed(1),
        },
        AccessoryRule {
            name: "cevirme_kolu",
            applies: is_gear,
            query: |_| accessory("çevirme kolu"),
            quantity: QuantityRule::Fixed(1),
        },
        // 葉片耗材
        AccessoryRule {
            name: "tapa",
            applies: |_| true,
            query: |c| accessory("tapa").with_lamel_type(c.selections.lamel_type.tag()),
            quantity: QuantityRule::Derived(|c| {
                Decimal::from(ProfileCalculator::plug_count(&c.geometry.lamel_counts))
            }),
        },
        AccessoryRule {
            name: "zimba_teli",
            applies: |_| true,
            query: |_| accessory("zımba teli"),
            quantity: QuantityRule::Derived(|c| {
                Decimal::from(ProfileCalculator::staple_count(&c.geometry.lamel_counts))
            }),
        },
        // 吊片依各區段葉片寬分級加總
        AccessoryRule {
            name: "celik_aski",
            applies: |_| true,
            query: |c| accessory("çelik askı").with_post_type(c.selections.post_type.tag()),
            quantity: QuantityRule::Derived(|c| {
                Decimal::from(ProfileCalculator::total_hangers(&c.geometry.lamel_widths))
            }),
        },
        AccessoryRule {
            name: "alt_parca_lastigi",
            applies: |_| true,
            query: |c| accessory("alt parça lastiği").with_post_type(c.selections.post_type.tag()),
            quantity: QuantityRule::Length(|c| {
                (Decimal::ONE, c.geometry.lamel_widths.iter().sum())
            }),
        },
        AccessoryRule {
            name: "stoper",
            applies: |c| {
                matches!(c.selections.lamel_type, LamelType::Sl39 | LamelType::Se45) && is_pulley(c)
            },
            query: |_| accessory("stoper"),
            quantity: QuantityRule::Derived(|c| Decimal::from(2 * c.section_count())),
        },
        // 鎖式底部配件
        AccessoryRule {
            name: "kilit_yuvarlak",
            applies: |c| c.selections.sub_part == SubPart::Locking,
            query: |_| accessory("yuvarlak kilit"),
            quantity: QuantityRule::PerSection,
        },
        AccessoryRule {
            name: "kilit_yassi",
            applies: |c| c.selections.sub_part == SubPart::Locking,
            query: |_| accessory("yassı kilit"),
            quantity: QuantityRule::PerSection,
        },
        AccessoryRule {
            name: "denge_makarasi",
            applies: |c| c.selections.post_type == PostType::Midi && c.selections.box_size.0 == 250,
            query: |_| accessory("denge"),
            quantity: QuantityRule::PerSection,
        },
        // 迷你立柱剪刀鉸鏈
        AccessoryRule {
            name: "makas",
            applies: |c| {
                c.selections.scissor_hinge && c.selections.post_type.is_mini() && !c.is_motorized()
            },
            query: |_| accessory("makas"),
            quantity: QuantityRule::PerPost,
        },
        AccessoryRule {
            name: "mentese",
            applies: |c| {
                c.selections.scissor_hinge && c.selections.post_type.is_mini() && !c.is_motorized()
            },
            query: |_| accessory("menteşe"),
            quantity: QuantityRule::PerPost,
        },
        AccessoryRule {
            name: "kil_fitil",
            applies: |_| true,
            query: |_| accessory("kıl fitil"),
            quantity: QuantityRule::Derived(|c| ProfileCalculator::seal_length(&c.geometry.post_lengths)),
        },
    ]
}
