//! 捲門（kepenk）

use rust_decimal::Decimal;
use shutter_core::selections::ColorFields;
use shutter_core::{
    Catalog, CatalogQuery, EngineConfig, KepenkSelections, LamelType, MovementType, PostType,
    QuoteWarning, TubeType, WarningKind,
};

use crate::accessories::{self, AccessoryResolver, RuleContext};
use crate::capacity::{self, MotorChoice, MotorFamily, DOOR_MOTORS};
use crate::dimensions::{DimensionResolver, SectionGroup};
use crate::profiles::ProfileCalculator;
use crate::products::section_label;
use crate::{LineDraft, ProductDrafts};

/// 捲門金屬件的固定顏色
pub const DOOR_METAL_COLOR: &str = "alüminyum";

/// 透視葉片使用的葉片
const VISION_LAMEL: LamelType = LamelType::Se78;

/// 單一區段的葉片分配
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LamelSplit {
    /// 一般葉片數
    pub normal: u32,
    /// 透視葉片數
    pub vision: u32,
}

/// 捲門幾何
#[derive(Debug, Clone, PartialEq)]
pub struct KepenkGeometry {
    pub system_width: Decimal,
    pub system_height: Decimal,
    pub post_type: PostType,
    pub section_widths: Vec<Decimal>,
    pub section_heights: Vec<Decimal>,
    pub lamel_widths: Vec<Decimal>,
    pub lamel_splits: Vec<LamelSplit>,
    /// 各立柱位置的立柱長度
    pub post_lengths: Vec<Decimal>,
    pub groups: Vec<SectionGroup>,
    /// 透視帶是否有效
    pub has_vision_band: bool,
}

impl KepenkGeometry {
    pub fn resolve(s: &KepenkSelections) -> shutter_core::Result<Self> {
        let post_type = s.lamel_type.door_post();
        let system_width = s.width;
        let system_height = s.height;

        let section_widths = DimensionResolver::section_widths(system_width, &s.layout.dividers)?;
        let count = section_widths.len();
        let section_heights =
            DimensionResolver::section_heights(system_height, &s.layout.section_heights, count);

        // 透視帶須滿足 0 < 起點 < 終點 ≤ 系統高度
        let band = s
            .vision_band
            .filter(|b| b.start > Decimal::ZERO && b.end > b.start && b.end <= system_height);

        let lamel_splits = section_heights
            .iter()
            .map(|h| match band {
                Some(b) => {
                    let normal_height = b.start + (*h - b.end);
                    LamelSplit {
                        normal: ProfileCalculator::lamel_count(normal_height, s.box_size, s.lamel_type),
                        vision: ProfileCalculator::lamel_count(b.end - b.start, s.box_size, VISION_LAMEL),
                    }
                }
                None => LamelSplit {
                    normal: ProfileCalculator::lamel_count(*h, s.box_size, s.lamel_type),
                    vision: 0,
                },
            })
            .collect();

        let lamel_widths = section_widths
            .iter()
            .map(|w| ProfileCalculator::lamel_width(*w, post_type))
            .collect();

        let post_lengths = DimensionResolver::post_heights(&section_heights)
            .into_iter()
            .map(|h| ProfileCalculator::post_height(h, s.box_size))
            .collect();

        let groups = DimensionResolver::effective_groups(
            &section_widths,
            &section_heights,
            &s.layout.section_connections,
        );

        Ok(Self {
            system_width,
            system_height,
            post_type,
            section_widths,
            section_heights,
            lamel_widths,
            lamel_splits,
            post_lengths,
            groups,
            has_vision_band: band.is_some(),
        })
    }

    /// 各區段的總葉片數（含透視葉片）
    pub fn total_lamel_counts(&self) -> Vec<u32> {
        self.lamel_splits.iter().map(|s| s.normal + s.vision).collect()
    }
}

/// 捲門規則評估環境
pub struct KepenkContext<'a> {
    pub selections: &'a KepenkSelections,
    pub geometry: KepenkGeometry,
    pub config: &'a EngineConfig,
    /// 選型後實際使用的捲軸
    pub tube_type: TubeType,
}

impl KepenkContext<'_> {
    pub fn is_motorized(&self) -> bool {
        self.selections.movement == MovementType::Motorized
    }

    /// 金屬件顏色候選：欄位顏色，其次固定鋁色
    fn metal_colors(&self, field: &str) -> Vec<String> {
        self.selections
            .color(field)
            .into_iter()
            .chain([DOOR_METAL_COLOR])
            .map(str::to_string)
            .collect()
    }
}

impl RuleContext for KepenkContext<'_> {
    fn section_count(&self) -> u32 {
        self.geometry.section_widths.len() as u32
    }

    fn post_count(&self) -> u32 {
        self.geometry.post_lengths.len() as u32
    }

    fn driven_sections(&self) -> u32 {
        self.geometry.groups.len() as u32
    }

    fn units(&self) -> u32 {
        self.selections.quantity
    }
}

/// 捲門明細產生器
pub struct KepenkBuilder;

impl KepenkBuilder {
    pub fn build(
        catalog: &Catalog,
        selections: &KepenkSelections,
        config: &EngineConfig,
    ) -> shutter_core::Result<ProductDrafts> {
        let geometry = KepenkGeometry::resolve(selections)?;
        let mut drafts = ProductDrafts::new();

        let limits = capacity::lamel_limits(selections.lamel_type);
        for violation in limits.violations(geometry.system_width, geometry.system_height) {
            drafts.add_warning(QuoteWarning::warning(
                WarningKind::DimensionLimit,
                format!("{} 葉片{}", selections.lamel_type, violation),
            ));
        }

        // 馬達選型可能改變捲軸管徑，需先於捲軸計算
        let mut tube_type = selections.tube_type;
        let mut motor = None;
        if selections.movement == MovementType::Motorized {
            let area = Self::required_area(&geometry);
            match Self::select_motor(selections, area) {
                Some(choice) => {
                    if let Some(tube) = choice.family.door_tube() {
                        if tube != tube_type {
                            tracing::debug!("馬達 {} 需要 {} 捲軸", choice.model, tube.tag());
                        }
                        tube_type = tube;
                    }
                    motor = Some(choice);
                }
                None => drafts.add_warning(QuoteWarning::warning(
                    WarningKind::NoCompatibleMotor,
                    format!(
                        "找不到適用的馬達：系統面積 {} m² 超過 {} 葉片可用馬達容量",
                        area.round_dp(2),
                        selections.lamel_type
                    ),
                )),
            }
        }

        let ctx = KepenkContext {
            selections,
            geometry,
            config,
            tube_type,
        };
        let units = Decimal::from(selections.quantity);

        drafts.products.extend(Self::lamels(catalog, &ctx));
        if ctx.geometry.has_vision_band {
            let vision = Self::vision_lamels(catalog, &ctx);
            if vision.is_empty() {
                drafts.add_warning(QuoteWarning::warning(
                    WarningKind::MissingItem,
                    format!("找不到透視葉片品項（{}，{}）", VISION_LAMEL, DOOR_METAL_COLOR),
                ));
            }
            drafts.products.extend(vision);
        }
        drafts.products.extend(Self::sub_parts(catalog, &ctx));
        drafts.products.extend(Self::posts(catalog, &ctx));
        drafts.products.extend(Self::boxes(catalog, &ctx));
        drafts.products.extend(Self::tubes(catalog, &ctx));
        if let Some(choice) = motor {
            drafts.products.extend(Self::motors(catalog, &ctx, &choice));
        }
        if let Some(remote) = selections.remote.as_deref() {
            let query = CatalogQuery::of_type("kepenk_kumanda").with_model_tag(remote);
            if let Some(item) = catalog.find_first(&query) {
                drafts.products.push(LineDraft::new(item.clone(), Decimal::ONE));
            }
        }

        for draft in drafts.products.iter_mut() {
            draft.quantity *= units;
        }

        drafts
            .accessories
            .extend(AccessoryResolver::resolve(catalog, &accessories::kepenk::rules(), &ctx));

        Ok(drafts)
    }

    /// 連動組中面積最大者（m²）
    fn required_area(geometry: &KepenkGeometry) -> Decimal {
        geometry
            .groups
            .iter()
            .map(|g| capacity::area_m2(g.width, g.height))
            .max()
            .unwrap_or(Decimal::ZERO)
    }

    /// 捲門馬達選型
    ///
    /// 使用者指定型號容量足夠時沿用；否則先在目前管徑內選，
    /// 77 系列葉片再改試 102mm 管徑。
    pub fn select_motor(s: &KepenkSelections, area: Decimal) -> Option<MotorChoice> {
        if let Some(choice) = s
            .motor_model
            .as_deref()
            .and_then(|m| DOOR_MOTORS.lookup(s.lamel_type, m))
            .filter(|c| c.capacity >= area)
        {
            return Some(choice);
        }

        let families: &[MotorFamily] = if s.lamel_type.is_door_100() || s.tube_type == TubeType::Tube102 {
            &[MotorFamily::Tube102]
        } else {
            &[MotorFamily::Tube70, MotorFamily::Tube102]
        };
        DOOR_MOTORS.select_with_fallback(s.lamel_type, families, area)
    }

    fn lamels(catalog: &Catalog, ctx: &KepenkContext<'_>) -> Vec<LineDraft> {
        let s = ctx.selections;
        let query = CatalogQuery::of_type("kepenk_lamel")
            .with_lamel_type(s.lamel_type.tag())
            .with_colors(crate::products::color_chain(s, "lamel_color", ctx.config));
        let Some(item) = catalog.find_first(&query) else {
            return Vec::new();
        };

        ctx.geometry
            .lamel_widths
            .iter()
            .zip(&ctx.geometry.lamel_splits)
            .enumerate()
            .map(|(i, (width, split))| {
                LineDraft::new(item.clone(), Decimal::from(split.normal))
                    .with_size(*width)
                    .with_qualifier(section_label(i))
            })
            .collect()
    }

    fn vision_lamels(catalog: &Catalog, ctx: &KepenkContext<'_>) -> Vec<LineDraft> {
        let query = CatalogQuery::of_type("kepenk_lamel")
            .with_lamel_type(VISION_LAMEL.tag())
            .with_color(DOOR_METAL_COLOR);
        let Some(item) = catalog.find_first(&query) else {
            return Vec::new();
        };
        let Some(band) = ctx.selections.vision_band else {
            return Vec::new();
        };

        ctx.geometry
            .lamel_widths
            .iter()
            .zip(&ctx.geometry.lamel_splits)
            .map(|(width, split)| {
                LineDraft::new(item.clone(), Decimal::from(split.vision))
                    .with_size(*width)
                    .with_qualifier(format!("(Gözlü: {}-{}mm)", band.start, band.end))
            })
            .collect()
    }

    fn metal_query(type_tag: &str, color_field: &str, ctx: &KepenkContext<'_>) -> CatalogQuery {
        CatalogQuery::of_type(type_tag).with_colors(ctx.metal_colors(color_field))
    }

    fn sub_parts(catalog: &Catalog, ctx: &KepenkContext<'_>) -> Vec<LineDraft> {
        let query = Self::metal_query("kepenk_alt_parca", "subpart_color", ctx)
            .with_lamel_type(ctx.selections.lamel_type.tag());
        let Some(item) = catalog.find_first(&query) else {
            return Vec::new();
        };

        ctx.geometry
            .lamel_widths
            .iter()
            .enumerate()
            .map(|(i, width)| {
                LineDraft::new(item.clone(), Decimal::ONE)
                    .with_size(*width)
                    .with_qualifier(section_label(i))
            })
            .collect()
    }

    fn posts(catalog: &Catalog, ctx: &KepenkContext<'_>) -> Vec<LineDraft> {
        let query = Self::metal_query("kepenk_dikme", "dikme_color", ctx).with_post_type(ctx.geometry.post_type.tag());
        let Some(item) = catalog.find_first(&query) else {
            return Vec::new();
        };

        let lengths = &ctx.geometry.post_lengths;
        // 相同長度的立柱合併為一行
        if lengths.windows(2).all(|w| w[0] == w[1]) {
            return lengths
                .first()
                .map(|length| {
                    LineDraft::new(item.clone(), Decimal::from(lengths.len() as u64)).with_size(*length)
                })
                .into_iter()
                .collect();
        }

        lengths
            .iter()
            .enumerate()
            .map(|(i, length)| {
                LineDraft::new(item.clone(), Decimal::ONE)
                    .with_size(*length)
                    .with_qualifier(format!("(Dikme {})", i + 1))
            })
            .collect()
    }

    fn boxes(catalog: &Catalog, ctx: &KepenkContext<'_>) -> Vec<LineDraft> {
        let box_tag = ctx.selections.box_size.tag();
        ["on", "arka"]
            .iter()
            .filter_map(|side| {
                let query = Self::metal_query("kepenk_kutu", "box_color", ctx)
                    .with_box_type(box_tag.clone())
                    .with_model_tag(*side);
                catalog.find_first(&query)
            })
            .map(|item| LineDraft::new(item.clone(), Decimal::ONE).with_size(ctx.geometry.system_width))
            .collect()
    }

    /// 捲軸長度：電動時扣除馬達頭長度
    fn tubes(catalog: &Catalog, ctx: &KepenkContext<'_>) -> Vec<LineDraft> {
        let query = CatalogQuery::of_type("kepenk_tambur")
            .with_tube_type(ctx.tube_type.tag())
            .with_lamel_type(ctx.selections.lamel_type.tag());
        let Some(item) = catalog.find_first(&query) else {
            return Vec::new();
        };

        let deduction = if ctx.is_motorized() {
            ctx.config.motorized_tube_deduction
        } else {
            Decimal::ZERO
        };
        ctx.geometry
            .groups
            .iter()
            .map(|group| LineDraft::new(item.clone(), Decimal::ONE).with_size(group.width - deduction))
            .collect()
    }

    fn motors(catalog: &Catalog, ctx: &KepenkContext<'_>, choice: &MotorChoice) -> Vec<LineDraft> {
        let Some(catalog_model) = capacity::door_catalog_motor(choice.model) else {
            return Vec::new();
        };
        let query = CatalogQuery::of_type("kepenk_motor").with_model_tag(catalog_model);
        catalog
            .find_first(&query)
            .map(|item| {
                LineDraft::new(item.clone(), Decimal::from(ctx.driven_sections()))
                    .with_qualifier(format!("({})", choice.model))
            })
            .into_iter()
            .collect()
    }
}
