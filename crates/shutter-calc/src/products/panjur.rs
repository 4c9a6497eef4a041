//! 捲簾窗（panjur）

use rust_decimal::Decimal;
use shutter_core::{
    Catalog, CatalogQuery, EngineConfig, MotorBrand, MountingStyle, MovementType,
    PanjurSelections, PostAdapter, QuoteWarning, WarningKind,
};

use crate::accessories::{self, AccessoryResolver, RuleContext};
use crate::capacity::{self, MotorChoice, MotorFamily, PANJUR_MOTORS};
use crate::dimensions::{DimensionResolver, SectionGroup};
use crate::profiles::ProfileCalculator;
use crate::products::{color_chain, section_label};
use crate::{LineDraft, ProductDrafts};

/// 捲簾窗幾何
#[derive(Debug, Clone, PartialEq)]
pub struct PanjurGeometry {
    pub system_width: Decimal,
    /// 原始區段寬度
    pub section_widths: Vec<Decimal>,
    /// 各區段系統寬度
    pub section_system_widths: Vec<Decimal>,
    /// 各區段系統高度
    pub section_heights: Vec<Decimal>,
    /// 各立柱位置的系統高度（左、中間…、右）
    pub post_heights: Vec<Decimal>,
    /// 各立柱位置的立柱長度
    pub post_lengths: Vec<Decimal>,
    /// 各立柱位置的立柱支數
    pub post_quantities: Vec<u32>,
    pub lamel_widths: Vec<Decimal>,
    pub lamel_counts: Vec<u32>,
    pub groups: Vec<SectionGroup>,
    /// 有驅動的組
    pub driven_groups: Vec<SectionGroup>,
}

impl PanjurGeometry {
    pub fn resolve(s: &PanjurSelections) -> shutter_core::Result<Self> {
        let system_width = DimensionResolver::system_width(s.width, s.width_convention, s.post_type);
        let section_widths = DimensionResolver::section_widths(s.width, &s.layout.dividers)?;
        let count = section_widths.len();

        let section_system_widths: Vec<Decimal> = section_widths
            .iter()
            .map(|w| DimensionResolver::system_width(*w, s.width_convention, s.post_type))
            .collect();

        let section_heights: Vec<Decimal> =
            DimensionResolver::section_heights(s.height, &s.layout.section_heights, count)
                .into_iter()
                .map(|h| DimensionResolver::system_height(h, s.height_convention, s.box_size))
                .collect();

        let post_heights = DimensionResolver::post_heights(&section_heights);
        let post_lengths = post_heights
            .iter()
            .map(|h| ProfileCalculator::post_height(*h, s.box_size))
            .collect();

        // 端柱各 1 支；中間立柱外掛為 2 支，其餘 1 支
        let last = post_heights.len().saturating_sub(1);
        let post_quantities = (0..post_heights.len())
            .map(|i| {
                if i == 0 || i == last || s.mounting != MountingStyle::Distan {
                    1
                } else {
                    2
                }
            })
            .collect();

        let lamel_widths = section_system_widths
            .iter()
            .map(|w| ProfileCalculator::lamel_width(*w, s.post_type))
            .collect();
        let lamel_counts = section_heights
            .iter()
            .map(|h| ProfileCalculator::lamel_count(*h, s.box_size, s.lamel_type))
            .collect();

        let groups = DimensionResolver::effective_groups(
            &section_system_widths,
            &section_heights,
            &s.layout.section_connections,
        );

        // 未標記驅動時每組皆視為有驅動
        let motors = &s.layout.section_motors;
        let driven_groups = if motors.is_empty() {
            groups.clone()
        } else {
            groups
                .iter()
                .filter(|g| g.sections.iter().any(|i| motors.get(*i).copied().unwrap_or(false)))
                .cloned()
                .collect()
        };

        Ok(Self {
            system_width,
            section_widths,
            section_system_widths,
            section_heights,
            post_heights,
            post_lengths,
            post_quantities,
            lamel_widths,
            lamel_counts,
            groups,
            driven_groups,
        })
    }
}

/// 捲簾窗規則評估環境
pub struct PanjurContext<'a> {
    pub selections: &'a PanjurSelections,
    pub geometry: PanjurGeometry,
    pub config: &'a EngineConfig,
}

impl PanjurContext<'_> {
    pub fn is_motorized(&self) -> bool {
        self.selections.movement == MovementType::Motorized
    }

    pub fn colors(&self, field: &str) -> Vec<String> {
        color_chain(self.selections, field, self.config)
    }
}

impl RuleContext for PanjurContext<'_> {
    fn section_count(&self) -> u32 {
        self.geometry.section_widths.len() as u32
    }

    fn post_count(&self) -> u32 {
        self.geometry.post_quantities.iter().sum()
    }

    /// 標記驅動的區段數；未標記時每組一具
    fn driven_sections(&self) -> u32 {
        let motors = &self.selections.layout.section_motors;
        if motors.is_empty() {
            return self.geometry.driven_groups.len() as u32;
        }
        motors
            .iter()
            .take(self.section_count() as usize)
            .filter(|m| **m)
            .count() as u32
    }

    fn units(&self) -> u32 {
        self.selections.quantity
    }
}

/// 捲簾窗明細產生器
pub struct PanjurBuilder;

impl PanjurBuilder {
    pub fn build(
        catalog: &Catalog,
        selections: &PanjurSelections,
        config: &EngineConfig,
    ) -> shutter_core::Result<ProductDrafts> {
        let geometry = PanjurGeometry::resolve(selections)?;
        tracing::debug!(
            "捲簾窗幾何: 系統寬 {}，區段 {}，驅動組 {}",
            geometry.system_width,
            geometry.section_widths.len(),
            geometry.driven_groups.len()
        );

        let ctx = PanjurContext {
            selections,
            geometry,
            config,
        };
        let units = Decimal::from(selections.quantity);
        let mut drafts = ProductDrafts::new();

        Self::check_limits(&ctx, &mut drafts);

        drafts.products.extend(Self::lamels(catalog, &ctx));
        drafts.products.extend(Self::sub_parts(catalog, &ctx));
        drafts.products.extend(Self::posts(catalog, &ctx));
        drafts.products.extend(Self::adapter_profiles(catalog, &ctx));
        drafts.products.extend(Self::boxes(catalog, &ctx));
        drafts.products.extend(Self::tubes(catalog, &ctx));
        drafts.products.extend(Self::controls(catalog, &ctx));

        for draft in drafts.products.iter_mut() {
            draft.quantity *= units;
        }

        if ctx.is_motorized() {
            match Self::select_motor(&ctx) {
                Some(choice) => {
                    let query = CatalogQuery::of_type("panjur_motor").with_model_tag(choice.model);
                    if let Some(item) = catalog.find_first(&query) {
                        let quantity = Decimal::from(ctx.driven_sections()) * units;
                        drafts.accessories.push(LineDraft::new(item.clone(), quantity));
                    }
                }
                None => drafts.add_warning(QuoteWarning::warning(
                    WarningKind::NoCompatibleMotor,
                    format!(
                        "找不到適用的馬達：{} 葉片，面積 {} m²",
                        selections.lamel_type,
                        Self::required_area(&ctx.geometry).round_dp(2)
                    ),
                )),
            }
        }

        drafts
            .accessories
            .extend(AccessoryResolver::resolve(catalog, &accessories::panjur::rules(), &ctx));

        Ok(drafts)
    }

    /// 驅動組中面積最大者（m²）
    fn required_area(geometry: &PanjurGeometry) -> Decimal {
        geometry
            .driven_groups
            .iter()
            .map(|g| capacity::area_m2(g.width, g.height))
            .max()
            .unwrap_or(Decimal::ZERO)
    }

    /// 使用者指定型號容量足夠時沿用，否則在同品牌內自動選型
    pub fn select_motor(ctx: &PanjurContext<'_>) -> Option<MotorChoice> {
        let s = ctx.selections;
        let area = Self::required_area(&ctx.geometry);

        if let Some(choice) = s
            .motor_model
            .as_deref()
            .and_then(|m| PANJUR_MOTORS.lookup(s.lamel_type, m))
            .filter(|c| c.capacity >= area)
        {
            return Some(choice);
        }

        let family = s
            .motor_brand
            .map(MotorFamily::of_brand)
            .or_else(|| s.motor_model.as_deref().and_then(MotorFamily::of_model))
            .unwrap_or(MotorFamily::of_brand(MotorBrand::Mosel));
        PANJUR_MOTORS.select(s.lamel_type, family, area)
    }

    fn check_limits(ctx: &PanjurContext<'_>, drafts: &mut ProductDrafts) {
        let s = ctx.selections;
        let limits = capacity::lamel_limits(s.lamel_type);
        for violation in limits.violations(ctx.geometry.system_width, s.height) {
            drafts.add_warning(QuoteWarning::warning(
                WarningKind::DimensionLimit,
                format!("{} 葉片{}", s.lamel_type, violation),
            ));
        }
    }

    fn lamels(catalog: &Catalog, ctx: &PanjurContext<'_>) -> Vec<LineDraft> {
        let query = CatalogQuery::of_type("panjur_lamel")
            .with_lamel_type(ctx.selections.lamel_type.tag())
            .with_colors(ctx.colors("lamel_color"));
        let Some(item) = catalog.find_first(&query) else {
            return Vec::new();
        };

        ctx.geometry
            .lamel_widths
            .iter()
            .zip(&ctx.geometry.lamel_counts)
            .enumerate()
            .map(|(i, (width, count))| {
                LineDraft::new(item.clone(), Decimal::from(*count))
                    .with_size(*width)
                    .with_qualifier(section_label(i))
            })
            .collect()
    }

    fn sub_parts(catalog: &Catalog, ctx: &PanjurContext<'_>) -> Vec<LineDraft> {
        let query = CatalogQuery::of_type("panjur_alt_parca")
            .with_model_tag(ctx.selections.sub_part.tag())
            .with_colors(ctx.colors("subpart_color"));
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

    fn post_label(index: usize, count: usize) -> String {
        if index == 0 {
            "(Sol Dikme)".to_string()
        } else if index + 1 == count {
            "(Sağ Dikme)".to_string()
        } else {
            format!("(Orta Dikme {index})")
        }
    }

    fn posts(catalog: &Catalog, ctx: &PanjurContext<'_>) -> Vec<LineDraft> {
        let query = CatalogQuery::of_type("panjur_dikme")
            .with_post_type(ctx.selections.post_type.tag())
            .with_colors(ctx.colors("dikme_color"));
        let Some(item) = catalog.find_first(&query) else {
            return Vec::new();
        };

        let count = ctx.geometry.post_lengths.len();
        ctx.geometry
            .post_lengths
            .iter()
            .zip(&ctx.geometry.post_quantities)
            .enumerate()
            .map(|(i, (length, quantity))| {
                LineDraft::new(item.clone(), Decimal::from(*quantity))
                    .with_size(*length)
                    .with_qualifier(Self::post_label(i, count))
            })
            .collect()
    }

    /// 立柱加高型材：雙側沿每支立柱，三側再加一支上橫料
    fn adapter_profiles(catalog: &Catalog, ctx: &PanjurContext<'_>) -> Vec<LineDraft> {
        let s = ctx.selections;
        if s.post_adapter == PostAdapter::None {
            return Vec::new();
        }
        let query = CatalogQuery::of_type("panjur_yukseltme_profili").with_colors(ctx.colors("dikme_color"));
        let Some(item) = catalog.find_first(&query) else {
            return Vec::new();
        };

        let count = ctx.geometry.post_heights.len();
        let mut lines: Vec<LineDraft> = ctx
            .geometry
            .post_heights
            .iter()
            .zip(&ctx.geometry.post_quantities)
            .enumerate()
            .map(|(i, (height, quantity))| {
                LineDraft::new(item.clone(), Decimal::from(*quantity))
                    .with_size(*height)
                    .with_qualifier(Self::post_label(i, count))
            })
            .collect();

        if s.post_adapter == PostAdapter::TripleSided {
            lines.push(
                LineDraft::new(item.clone(), Decimal::ONE)
                    .with_size(s.width)
                    .with_qualifier("(Üst Yatay Profil)"),
            );
        }
        lines
    }

    /// 箱體：外掛分前後兩片，一體式與隔熱箱各一組
    fn boxes(catalog: &Catalog, ctx: &PanjurContext<'_>) -> Vec<LineDraft> {
        let s = ctx.selections;
        let width = ctx.geometry.system_width;
        let colors = ctx.colors("box_color");
        let base = |type_tag: &str| {
            CatalogQuery::of_type(type_tag)
                .with_box_type(s.box_size.tag())
                .with_colors(colors.clone())
        };

        let queries: Vec<CatalogQuery> = match s.mounting {
            MountingStyle::Distan => vec![
                base("panjur_kutu").with_model_tag("on"),
                base("panjur_kutu").with_model_tag("arka"),
            ],
            MountingStyle::Monoblok => vec![base("panjur_monoblok_kutu")],
            MountingStyle::Yalitimli => vec![base("panjur_yalitimli_kutu")],
        };

        queries
            .iter()
            .filter_map(|q| catalog.find_first(q))
            .map(|item| LineDraft::new(item.clone(), Decimal::ONE).with_size(width))
            .collect()
    }

    /// 每個驅動組一支捲軸，長度為組內系統寬度總和
    fn tubes(catalog: &Catalog, ctx: &PanjurContext<'_>) -> Vec<LineDraft> {
        let s = ctx.selections;
        let query = CatalogQuery::of_type("panjur_tambur")
            .with_tube_type(s.tube_type.tag())
            .with_movement_tag(s.movement.tag());
        let Some(item) = catalog.find_first(&query) else {
            return Vec::new();
        };

        let drive = match s.movement {
            MovementType::Manual => "Makara",
            MovementType::Motorized => "Motor",
        };
        ctx.geometry
            .driven_groups
            .iter()
            .enumerate()
            .map(|(n, group)| {
                let sections = group
                    .sections
                    .iter()
                    .map(|i| format!("Bölme {}", i + 1))
                    .collect::<Vec<_>>()
                    .join(", ");
                LineDraft::new(item.clone(), Decimal::ONE)
                    .with_size(group.width)
                    .with_qualifier(format!("({drive} {} - {sections})", n + 1))
            })
            .collect()
    }

    /// 遙控器、接收器、智慧家庭模組
    fn controls(catalog: &Catalog, ctx: &PanjurContext<'_>) -> Vec<LineDraft> {
        let s = ctx.selections;
        [
            ("panjur_kumanda", s.remote.as_deref()),
            ("panjur_alici", s.receiver.as_deref()),
            ("panjur_akilli_ev", s.smart_home.as_deref()),
        ]
        .into_iter()
        .filter_map(|(type_tag, model)| {
            let query = CatalogQuery::of_type(type_tag).with_model_tag(model?);
            catalog.find_first(&query)
        })
        .map(|item| LineDraft::new(item.clone(), Decimal::ONE))
        .collect()
    }
}
