//! 容量表查詢
//!
//! 馬達選型、捲繞直徑與箱體對照、葉片尺寸限制。
//! 表內數值以十分位整數存放（例如 235 = 23.5）。

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use shutter_core::{BoxSize, LamelType, MotorBrand, MountingStyle, MovementType, TubeType};

/// 馬達族（同族內型號依容量遞增排列）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotorFamily {
    /// 捲門 70mm 捲軸
    Tube70,
    /// 捲門 102mm 捲軸
    Tube102,
    /// 捲簾 Mosel SEL-60
    MoselSel60,
    /// 捲簾 Somfy boost
    SomfyBoost,
}

impl MotorFamily {
    /// 捲門馬達族對應的捲軸
    pub fn door_tube(&self) -> Option<TubeType> {
        match self {
            Self::Tube70 => Some(TubeType::Tube70),
            Self::Tube102 => Some(TubeType::Tube102),
            _ => None,
        }
    }

    /// 依型號前綴判斷族別
    pub fn of_model(model: &str) -> Option<Self> {
        if model.starts_with("70-") {
            Some(Self::Tube70)
        } else if model.starts_with("102-") || model.starts_with("SEL-") {
            Some(Self::Tube102)
        } else if model.starts_with("sel_") {
            Some(Self::MoselSel60)
        } else if model.starts_with("boost_") {
            Some(Self::SomfyBoost)
        } else {
            None
        }
    }

    pub fn of_brand(brand: MotorBrand) -> Self {
        match brand {
            MotorBrand::Mosel => Self::MoselSel60,
            MotorBrand::Somfy => Self::SomfyBoost,
        }
    }
}

/// 選型結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotorChoice {
    pub model: &'static str,
    pub family: MotorFamily,
    /// 最大承載面積（m²）
    pub capacity: Decimal,
}

type CapacityRow = (LamelType, &'static [(&'static str, MotorFamily, u32)]);

/// 馬達容量表
pub struct MotorCapacityTable {
    rows: &'static [CapacityRow],
}

use LamelType::*;
use MotorFamily::*;

const DOOR_77_SL: &[(&str, MotorFamily, u32)] = &[
    ("70-80", Tube70, 190),
    ("70-100", Tube70, 220),
    ("70-120", Tube70, 235),
    ("70-140", Tube70, 260),
    ("102-230", Tube102, 440),
    ("102-330", Tube102, 580),
];

const DOOR_77_ST: &[(&str, MotorFamily, u32)] = &[
    ("70-80", Tube70, 90),
    ("70-100", Tube70, 110),
    ("70-120", Tube70, 120),
    ("70-140", Tube70, 130),
    ("102-230", Tube102, 200),
    ("102-330", Tube102, 260),
];

const DOOR_77_SE: &[(&str, MotorFamily, u32)] = &[
    ("70-80", Tube70, 120),
    ("70-100", Tube70, 140),
    ("70-120", Tube70, 160),
    ("70-140", Tube70, 170),
    ("102-230", Tube102, 280),
    ("102-330", Tube102, 370),
];

const DOOR_100_SL: &[(&str, MotorFamily, u32)] = &[
    ("102-230", Tube102, 360),
    ("102-330", Tube102, 480),
    ("SEL-600", Tube102, 620),
    ("SEL-800", Tube102, 950),
    ("SEL-1000", Tube102, 1050),
];

const DOOR_100_ST: &[(&str, MotorFamily, u32)] = &[
    ("102-230", Tube102, 150),
    ("102-330", Tube102, 210),
    ("SEL-600", Tube102, 260),
    ("SEL-800", Tube102, 400),
    ("SEL-1000", Tube102, 450),
];

const PANJUR_39_SL: &[(&str, MotorFamily, u32)] = &[
    ("sel_60-10", MoselSel60, 86),
    ("sel_60-20", MoselSel60, 132),
    ("sel_60-30", MoselSel60, 196),
    ("sel_60-50", MoselSel60, 264),
    ("boost_15", SomfyBoost, 65),
    ("boost_35", SomfyBoost, 152),
    ("boost_55", SomfyBoost, 239),
];

const PANJUR_55_SL: &[(&str, MotorFamily, u32)] = &[
    ("sel_60-10", MoselSel60, 76),
    ("sel_60-20", MoselSel60, 117),
    ("sel_60-30", MoselSel60, 173),
    ("sel_60-50", MoselSel60, 234),
    ("boost_15", SomfyBoost, 57),
    ("boost_35", SomfyBoost, 134),
    ("boost_55", SomfyBoost, 211),
];

const PANJUR_45_SE: &[(&str, MotorFamily, u32)] = &[
    ("sel_60-10", MoselSel60, 0),
    ("sel_60-20", MoselSel60, 41),
    ("sel_60-30", MoselSel60, 61),
    ("sel_60-50", MoselSel60, 83),
    ("boost_15", SomfyBoost, 20),
    ("boost_35", SomfyBoost, 47),
    ("boost_55", SomfyBoost, 75),
];

const PANJUR_55_SE: &[(&str, MotorFamily, u32)] = &[
    ("sel_60-10", MoselSel60, 0),
    ("sel_60-20", MoselSel60, 50),
    ("sel_60-30", MoselSel60, 75),
    ("sel_60-50", MoselSel60, 101),
    ("boost_15", SomfyBoost, 25),
    ("boost_35", SomfyBoost, 58),
    ("boost_55", SomfyBoost, 91),
];

/// 捲門馬達容量表
pub const DOOR_MOTORS: MotorCapacityTable = MotorCapacityTable {
    rows: &[
        (Sl77, DOOR_77_SL),
        (St77, DOOR_77_ST),
        (Se77, DOOR_77_SE),
        (Se78, DOOR_77_SE),
        (Sl100, DOOR_100_SL),
        (St100, DOOR_100_ST),
    ],
};

/// 捲簾馬達容量表
pub const PANJUR_MOTORS: MotorCapacityTable = MotorCapacityTable {
    rows: &[
        (Sl39, PANJUR_39_SL),
        (Se45, PANJUR_45_SE),
        (Sl55, PANJUR_55_SL),
        (Se55, PANJUR_55_SE),
    ],
};

impl MotorCapacityTable {
    fn row(&self, lamel: LamelType) -> &'static [(&'static str, MotorFamily, u32)] {
        self.rows
            .iter()
            .find(|(l, _)| *l == lamel)
            .map(|(_, models)| *models)
            .unwrap_or(&[])
    }

    /// 該族內可用的型號（依容量遞增，排除容量為 0 者）
    pub fn models(&self, lamel: LamelType, family: MotorFamily) -> Vec<MotorChoice> {
        self.row(lamel)
            .iter()
            .filter(|(_, f, capacity)| *f == family && *capacity > 0)
            .map(|(model, family, capacity)| MotorChoice {
                model: *model,
                family: *family,
                capacity: Decimal::new(i64::from(*capacity), 1),
            })
            .collect()
    }

    /// 查詢指定型號
    pub fn lookup(&self, lamel: LamelType, model: &str) -> Option<MotorChoice> {
        let family = MotorFamily::of_model(model)?;
        self.models(lamel, family).into_iter().find(|c| c.model == model)
    }

    /// 族內第一個容量 ≥ 面積的型號
    pub fn select(&self, lamel: LamelType, family: MotorFamily, area: Decimal) -> Option<MotorChoice> {
        self.models(lamel, family)
            .into_iter()
            .find(|choice| choice.capacity >= area)
    }

    /// 依序嘗試多個族
    pub fn select_with_fallback(
        &self,
        lamel: LamelType,
        families: &[MotorFamily],
        area: Decimal,
    ) -> Option<MotorChoice> {
        families.iter().find_map(|family| self.select(lamel, *family, area))
    }
}

/// 捲門馬達型號 → 目錄馬達代碼
pub fn door_catalog_motor(model: &str) -> Option<&'static str> {
    match model {
        "70-80" => Some("sel_70"),
        "70-100" | "70-120" | "70-140" => Some("sel_70_120"),
        "102-230" | "102-330" => Some("sel_102_120"),
        "SEL-600" | "SEL-800" => Some("sel_900"),
        "SEL-1000" => Some("sel_1000"),
        _ => None,
    }
}

/// 面積（m²），輸入為 mm
pub fn area_m2(width: Decimal, height: Decimal) -> Decimal {
    width * height / Decimal::from(1_000_000)
}

/// 捲繞直徑表的高度級距數（1.00 m 至 3.50 m，每 0.25 m 一級）
const WINDING_BUCKETS: usize = 11;

const WINDING_39_MANUAL: [u32; WINDING_BUCKETS] = [110, 120, 130, 140, 150, 160, 170, 180, 190, 200, 210];
const WINDING_39_MOTOR: [u32; WINDING_BUCKETS] = [130, 140, 155, 160, 170, 180, 190, 195, 200, 210, 210];
const WINDING_45_MANUAL: [u32; WINDING_BUCKETS] = [140, 150, 155, 165, 175, 185, 195, 200, 205, 210, 215];
const WINDING_45_MOTOR: [u32; WINDING_BUCKETS] = [140, 150, 155, 165, 175, 185, 195, 205, 215, 220, 225];
const WINDING_55: [u32; WINDING_BUCKETS] = [185, 210, 235, 240, 255, 270, 275, 285, 310, 315, 325];

/// 捲繞直徑表
pub struct WindingTable;

impl WindingTable {
    /// 高度（mm）對應的級距索引：向上取整，低於 1 m 用第一級，超過 3.5 m 用最後一級
    pub fn bucket_index(height: Decimal) -> usize {
        let meters = height / Decimal::from(1000);
        if meters <= Decimal::ONE {
            return 0;
        }
        let steps = ((meters - Decimal::ONE) / Decimal::new(25, 2)).ceil();
        steps.to_usize().unwrap_or(WINDING_BUCKETS - 1).min(WINDING_BUCKETS - 1)
    }

    /// 級距對應的高度（m）
    pub fn bucket_height(index: usize) -> Decimal {
        Decimal::ONE + Decimal::new(25, 2) * Decimal::from(index.min(WINDING_BUCKETS - 1) as u64)
    }

    /// 捲繞直徑（cm）；捲門葉片回傳 `None`
    pub fn diameter(lamel: LamelType, movement: MovementType, height: Decimal) -> Option<Decimal> {
        let row = match (lamel, movement) {
            (Sl39, MovementType::Manual) => &WINDING_39_MANUAL,
            (Sl39, MovementType::Motorized) => &WINDING_39_MOTOR,
            (Se45, MovementType::Manual) => &WINDING_45_MANUAL,
            (Se45, MovementType::Motorized) => &WINDING_45_MOTOR,
            (Sl55 | Se55, _) => &WINDING_55,
            _ => return None,
        };
        Some(Decimal::new(i64::from(row[Self::bucket_index(height)]), 1))
    }
}

/// 捲繞直徑（cm）對應的外掛箱體
///
/// 只有外掛安裝使用此對照。
pub fn box_for_winding(diameter: Decimal, mounting: MountingStyle) -> Option<BoxSize> {
    if mounting != MountingStyle::Distan {
        return None;
    }
    let size = if diameter <= Decimal::from(13) {
        137
    } else if diameter <= Decimal::from(16) {
        165
    } else if diameter <= Decimal::from(20) {
        205
    } else {
        250
    };
    Some(BoxSize(size))
}

/// 葉片尺寸限制
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LamelLimits {
    pub max_width: Decimal,
    pub max_height: Decimal,
    /// 最大面積（m²）
    pub max_area: Decimal,
}

impl LamelLimits {
    const fn new(max_width: i64, max_height: i64, max_area_tenths: i64) -> Self {
        Self {
            max_width: Decimal::from_parts(max_width as u32, 0, 0, false, 0),
            max_height: Decimal::from_parts(max_height as u32, 0, 0, false, 0),
            max_area: Decimal::from_parts(max_area_tenths as u32, 0, 0, false, 1),
        }
    }

    /// 寬高是否在限制內（面積僅作提示）
    pub fn admits(&self, width: Decimal, height: Decimal) -> bool {
        width <= self.max_width && height <= self.max_height
    }

    /// 超出限制的描述
    pub fn violations(&self, width: Decimal, height: Decimal) -> Vec<String> {
        let mut out = Vec::new();
        if width > self.max_width {
            out.push(format!("寬度 {width} 超過上限 {}", self.max_width));
        }
        if height > self.max_height {
            out.push(format!("高度 {height} 超過上限 {}", self.max_height));
        }
        let area = area_m2(width, height);
        if area > self.max_area {
            out.push(format!("面積 {area} m² 超過上限 {} m²", self.max_area));
        }
        out
    }
}

/// 葉片尺寸限制
pub fn lamel_limits(lamel: LamelType) -> LamelLimits {
    match lamel {
        Sl39 => LamelLimits::new(2000, 2400, 55),
        Sl55 => LamelLimits::new(3200, 3100, 100),
        Se45 => LamelLimits::new(4250, 3500, 140),
        Se55 => LamelLimits::new(5500, 4000, 220),
        St77 => LamelLimits::new(5000, 4000, 200),
        Sl77 => LamelLimits::new(5400, 3850, 180),
        Se77 => LamelLimits::new(7000, 5000, 250),
        Se78 => LamelLimits::new(5000, 5000, 200),
        St100 => LamelLimits::new(8000, 6000, 400),
        Sl100 => LamelLimits::new(7000, 5000, 300),
    }
}

/// 外掛箱體最大簾高 (箱體, [39_sl, 45_se, 55]) ，每格為 (手動, 電動)
const DISTAN_MAX_HEIGHTS: [(u32, [(u32, u32); 3]); 4] = [
    (137, [(1600, 1350), (1400, 1200), (1100, 900)]),
    (165, [(2100, 1850), (1800, 1550), (1500, 1300)]),
    (205, [(2900, 2650), (2600, 2350), (2200, 1950)]),
    (250, [(3700, 3450), (3400, 3150), (3000, 2750)]),
];

/// 隔熱箱僅電動 (箱體, [39_sl, 45_se, 55])
const YALITIMLI_MAX_HEIGHTS: [(u32, [u32; 3]); 2] = [
    (250, [2350, 2050, 1750]),
    (300, [3150, 2850, 2500]),
];

fn lamel_column(lamel: LamelType) -> Option<usize> {
    match lamel {
        Sl39 => Some(0),
        Se45 => Some(1),
        Sl55 | Se55 => Some(2),
        _ => None,
    }
}

/// 最大簾高（mm）
///
/// 一體式 185 對應外掛 165，220 對應外掛 205；隔熱箱只有電動值。
pub fn max_curtain_height(
    mounting: MountingStyle,
    box_size: BoxSize,
    lamel: LamelType,
    movement: MovementType,
) -> Option<Decimal> {
    let column = lamel_column(lamel)?;

    let distan_lookup = |size: u32| {
        DISTAN_MAX_HEIGHTS
            .iter()
            .find(|(b, _)| *b == size)
            .map(|(_, cols)| {
                let (manual, motor) = cols[column];
                match movement {
                    MovementType::Manual => manual,
                    MovementType::Motorized => motor,
                }
            })
    };

    let value = match mounting {
        MountingStyle::Distan => distan_lookup(box_size.0),
        MountingStyle::Monoblok => match box_size.0 {
            185 => distan_lookup(165),
            220 => distan_lookup(205),
            _ => None,
        },
        MountingStyle::Yalitimli => match movement {
            MovementType::Manual => None,
            MovementType::Motorized => YALITIMLI_MAX_HEIGHTS
                .iter()
                .find(|(b, _)| *b == box_size.0)
                .map(|(_, cols)| cols[column]),
        },
    };

    value.map(Decimal::from)
}
