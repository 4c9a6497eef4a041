//! 玻璃陽台（cam balkon）
//!
//! 型材以庫存代號查詢，代號中的顏色段（4447、4440、4441、7072）替換為所選顏色；
//! 找不到時再以去掉尾端 `_0` 的代號查詢一次。

use rust_decimal::{Decimal, RoundingStrategy};
use shutter_core::{
    CamBalkonSelections, Catalog, CatalogItem, CatalogQuery, EngineConfig, GlassProfileColor,
    QuoteWarning, ShutterError, WarningKind,
};

use crate::glass_layout::{round_length, GlassLayout, GlassPane, Panel, PanelKind};
use crate::{LineDraft, ProductDrafts};

/// 目錄品項：庫存代號與說明
#[derive(Debug, Clone, Copy)]
struct Material {
    code: &'static str,
    description: &'static str,
}

const fn material(code: &'static str, description: &'static str) -> Material {
    Material { code, description }
}

const RAIL: Material = material("357014_4447_0", "RAY PROFILI-CONTALI");
const SIDE: Material = material("357012_4447_0", "YAN PROFIL");
const LOCK: Material = material("356628_4447_0", "KILIT PROFILI PR-24");
const NESTED_OUTER: Material = material("356646_4447_0_DIS", "ICICE PROFIL DIS");
const NESTED_INNER: Material = material("356646_4447_0_IC", "ICICE PROFIL IC");
const WING_COVER: Material = material("356645_7072_0", "ARA KANAT KAPAK PROFILI");
const CORNER_PASSIVE: Material = material("356650_4447_0", "KOSE DONUS PROFILI PASIF");
const CORNER_ACTIVE: Material = material("356649_4447_0", "KOSE DONUS PROFILI AKTIF");
const CORNER_TUBE: Material = material("356739_4447_0", "KOSE DONUS BORUSU");
const WING: Material = material("357001_4447_0", "KANAT PROFILI");

const BRUSH_RAIL: Material = material("19737_256_0", "FIRÇA CONTA-4.8*10");
const BRUSH_VERTICAL: Material = material("12963_256_0", "FIRÇA CONTA-4.8*550");

/// 五金：（品項, 數量）
const FITTINGS: &[(Material, fn(&CamBalkonGeometry) -> u32)] = &[
    (material("356860_429", "KÖŞE TAKOZU"), |_| 1),
    (material("356855_0", "TEKERLEK SETİ"), |g| g.sliding_panels * 4),
    (material("356865_0_0", "BAKLA-5"), |g| g.exits),
    (material("356819_429_0", "MENTEŞELİ KANAT TAKIMI"), |g| g.exits),
    (material("356985_256", "MENTEŞE-KANAT TUTUCU"), |g| g.exits),
    (material("356902_0", "ECO BELLA ISP.KIT"), |g| g.exits),
    (material("356987_0", "İSPANYOLET PİM SETİ"), |g| g.exits),
    (material("356979_0", "TAPA"), |g| g.exits * 3),
    (material("356922_0_0", "ZAMAK KOSE DONUS"), |g| g.corners),
];

/// 直向型材扣減（mm）
const SIDE_DEDUCTION: i64 = 127;
const VERTICAL_DEDUCTION: i64 = 138;
/// 扇料比玻璃短
const WING_DEDUCTION: i64 = 18;

/// 玻璃陽台幾何
#[derive(Debug, Clone, PartialEq)]
pub struct CamBalkonGeometry {
    /// 各臂的玻璃片（由左至右）
    pub arms: Vec<Vec<Panel>>,
    pub rail_lengths: Vec<Decimal>,
    pub exits: u32,
    /// 活動片總數（不含開啟扇）
    pub sliding_panels: u32,
    pub sliding_gaps: u32,
    pub fixed_sliding_gaps: u32,
    /// 有轉角的接縫數
    pub corners: u32,
    pub height: Decimal,
}

impl CamBalkonGeometry {
    pub fn resolve(s: &CamBalkonSelections) -> shutter_core::Result<Self> {
        if s.arms.is_empty() {
            return Err(ShutterError::CalculationError("玻璃陽台至少需要一支臂".to_string()));
        }
        if GlassLayout::glass_height(s.height) <= Decimal::ZERO {
            return Err(ShutterError::CalculationError(format!(
                "玻璃陽台高度不足: {}",
                s.height
            )));
        }

        let arms: Vec<Vec<Panel>> = (0..s.arms.len())
            .map(|i| GlassLayout::arm_panels(&s.arms, i, s.height, s.glass_thickness))
            .collect();
        let rail_lengths = (0..s.arms.len())
            .map(|i| GlassLayout::rail_length(&s.arms, i))
            .collect();

        let sliding_panels = arms
            .iter()
            .flatten()
            .filter(|p| p.kind == PanelKind::Sliding)
            .count() as u32;

        // 外部預覽已算好的間隔數優先
        let sliding_gaps = s
            .sliding_gaps
            .unwrap_or_else(|| arms.iter().map(|a| GlassLayout::sliding_gaps(a)).sum());
        let fixed_sliding_gaps = s
            .fixed_sliding_gaps
            .unwrap_or_else(|| arms.iter().map(|a| GlassLayout::fixed_sliding_gaps(a)).sum());

        Ok(Self {
            rail_lengths,
            exits: s.arms.iter().map(|a| a.exits).sum(),
            sliding_panels,
            sliding_gaps,
            fixed_sliding_gaps,
            corners: GlassLayout::corner_count(&s.arms),
            height: s.height,
            arms,
        })
    }

    /// 中間扇蓋板支數：兩端各 1，加上開啟扇與固定／活動交界
    pub fn wing_covers(&self) -> u32 {
        2 + self.exits + self.fixed_sliding_gaps
    }

    /// 玻璃清單
    pub fn glass_panes(&self, s: &CamBalkonSelections) -> Vec<GlassPane> {
        GlassLayout::panes(&self.arms, s.glass_thickness)
    }
}

/// 庫存代號換成所選顏色
fn colored_code(code: &str, color: GlassProfileColor) -> String {
    GlassProfileColor::ALL
        .iter()
        .map(|c| c.code())
        .find(|c| code.contains(c))
        .map(|c| code.replacen(c, color.code(), 1))
        .unwrap_or_else(|| code.to_string())
}

/// 公尺，取到小數兩位
fn meters(millimeters: Decimal) -> Decimal {
    (millimeters / Decimal::from(1000)).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// 玻璃陽台明細產生器
pub struct CamBalkonBuilder;

impl CamBalkonBuilder {
    pub fn build(
        catalog: &Catalog,
        selections: &CamBalkonSelections,
        _config: &EngineConfig,
    ) -> shutter_core::Result<ProductDrafts> {
        let geometry = CamBalkonGeometry::resolve(selections)?;
        tracing::debug!(
            "玻璃陽台幾何: {} 支臂，開啟扇 {}，活動片 {}，轉角 {}",
            geometry.arms.len(),
            geometry.exits,
            geometry.sliding_panels,
            geometry.corners
        );

        let mut drafts = ProductDrafts::new();
        Self::check_panels(&geometry, &mut drafts);

        let color = selections.color;
        drafts.products.extend(Self::rails(catalog, &geometry, color));
        drafts.products.extend(Self::verticals(catalog, &geometry, color));
        drafts.products.extend(Self::wings(catalog, &geometry, color));
        drafts.accessories.extend(Self::fittings(catalog, &geometry, color));
        drafts.accessories.extend(Self::brush_seals(catalog, &geometry, color));

        let units = Decimal::from(selections.quantity);
        for draft in drafts.products.iter_mut().chain(drafts.accessories.iter_mut()) {
            draft.quantity *= units;
        }

        Ok(drafts)
    }

    /// 依庫存代號查詢，查無時改用去掉尾端 `_0` 的代號
    fn find<'c>(catalog: &'c Catalog, m: Material, color: GlassProfileColor) -> Option<&'c CatalogItem> {
        let code = colored_code(m.code, color);
        let found = catalog
            .find_first(&CatalogQuery::by_stock_code(code.as_str()))
            .or_else(|| {
                code.strip_suffix("_0")
                    .and_then(|base| catalog.find_first(&CatalogQuery::by_stock_code(base)))
            });
        if found.is_none() {
            tracing::debug!("玻璃陽台品項 {} ({}) 在目錄中找不到，略過", m.description, code);
        }
        found
    }

    fn check_panels(geometry: &CamBalkonGeometry, drafts: &mut ProductDrafts) {
        for (i, panels) in geometry.arms.iter().enumerate() {
            if panels.iter().any(|p| p.width <= Decimal::ZERO) {
                drafts.add_warning(QuoteWarning::warning(
                    WarningKind::DimensionLimit,
                    format!("第 {} 臂寬度不足以容納玻璃片", i + 1),
                ));
            }
        }
    }

    /// 各臂軌道上下各一支
    fn rails(catalog: &Catalog, g: &CamBalkonGeometry, color: GlassProfileColor) -> Vec<LineDraft> {
        let Some(item) = Self::find(catalog, RAIL, color) else {
            return Vec::new();
        };
        g.rail_lengths
            .iter()
            .enumerate()
            .map(|(i, length)| {
                LineDraft::new(item.clone(), Decimal::from(2))
                    .with_size(round_length(*length))
                    .with_qualifier(format!("(Kol {})", i + 1))
            })
            .collect()
    }

    /// 直向型材，依長度排序
    fn verticals(catalog: &Catalog, g: &CamBalkonGeometry, color: GlassProfileColor) -> Vec<LineDraft> {
        let side = g.height - Decimal::from(SIDE_DEDUCTION);
        let vertical = g.height - Decimal::from(VERTICAL_DEDUCTION);
        let parts = [
            (SIDE, 2, side),
            (LOCK, g.exits, vertical),
            (NESTED_OUTER, g.sliding_gaps, vertical),
            (NESTED_INNER, g.sliding_gaps, vertical),
            (WING_COVER, g.wing_covers(), vertical),
            (CORNER_PASSIVE, g.corners, vertical),
            (CORNER_ACTIVE, g.corners, vertical),
            (CORNER_TUBE, g.corners, vertical),
        ];

        let mut lines: Vec<LineDraft> = parts
            .into_iter()
            .filter(|(_, count, _)| *count > 0)
            .filter_map(|(m, count, length)| {
                Self::find(catalog, m, color)
                    .map(|item| LineDraft::new(item.clone(), Decimal::from(count)).with_size(length))
            })
            .collect();
        lines.sort_by(|a, b| a.size.cmp(&b.size));
        lines
    }

    /// 每片玻璃上下各一支扇料
    fn wings(catalog: &Catalog, g: &CamBalkonGeometry, color: GlassProfileColor) -> Vec<LineDraft> {
        let Some(item) = Self::find(catalog, WING, color) else {
            return Vec::new();
        };
        let mut lines = Vec::new();
        for (arm, panels) in g.arms.iter().enumerate() {
            for (index, panel) in panels.iter().enumerate() {
                lines.push(
                    LineDraft::new(item.clone(), Decimal::from(2))
                        .with_size(round_length(panel.width - Decimal::from(WING_DEDUCTION)))
                        .with_qualifier(format!("(Kol {} - Cam {})", arm + 1, index + 1)),
                );
            }
        }
        lines
    }

    fn fittings(catalog: &Catalog, g: &CamBalkonGeometry, color: GlassProfileColor) -> Vec<LineDraft> {
        FITTINGS
            .iter()
            .filter_map(|(m, quantity)| {
                let count = quantity(g);
                if count == 0 {
                    return None;
                }
                Self::find(catalog, *m, color).map(|item| LineDraft::new(item.clone(), Decimal::from(count)))
            })
            .collect()
    }

    /// 毛刷條（公尺）：軌道每公尺 8 條；直向依各型材支數
    fn brush_seals(catalog: &Catalog, g: &CamBalkonGeometry, color: GlassProfileColor) -> Vec<LineDraft> {
        let rail_total: Decimal = g.rail_lengths.iter().sum();
        let rail_brush = meters(rail_total * Decimal::from(8));

        let vertical_pieces = g.wing_covers() + g.exits + 4 * g.sliding_gaps + 2 * g.corners;
        let vertical_brush =
            meters((g.height - Decimal::from(VERTICAL_DEDUCTION)) * Decimal::from(vertical_pieces));

        [(BRUSH_RAIL, rail_brush), (BRUSH_VERTICAL, vertical_brush)]
            .into_iter()
            .filter(|(_, quantity)| *quantity > Decimal::ZERO)
            .filter_map(|(m, quantity)| {
                Self::find(catalog, m, color).map(|item| LineDraft::new(item.clone(), quantity))
            })
            .collect()
    }
}
