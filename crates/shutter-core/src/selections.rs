//! 使用者選項模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::product::{
    BoxSize, ExitSide, GlassProfileColor, GlassThickness, HeightConvention, LamelType, ManualDrive,
    MeshType, MotorBrand, MountingStyle, MovementType, OpeningDirection, PostAdapter, PostType,
    SectionConnection, Side, SubPart, ThresholdType, TubeType, WidthConvention,
};

fn default_quantity() -> u32 {
    1
}

/// 區段配置
///
/// `dividers` 為中間立柱的位置（mm，自左起算）。
/// 其餘向量依區段索引對應；缺漏的索引視為未設定。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionLayout {
    #[serde(default)]
    pub dividers: Vec<Decimal>,

    /// 各區段高度覆寫
    #[serde(default)]
    pub section_heights: Vec<Option<Decimal>>,

    /// 各區段是否裝有驅動（馬達或滑輪）
    #[serde(default)]
    pub section_motors: Vec<bool>,

    #[serde(default)]
    pub section_connections: Vec<SectionConnection>,
}

impl SectionLayout {
    /// 單一區段
    pub fn single() -> Self {
        Self::default()
    }

    pub fn with_dividers(mut self, dividers: Vec<Decimal>) -> Self {
        self.dividers = dividers;
        self
    }

    pub fn with_section_heights(mut self, heights: Vec<Option<Decimal>>) -> Self {
        self.section_heights = heights;
        self
    }

    pub fn with_section_motors(mut self, motors: Vec<bool>) -> Self {
        self.section_motors = motors;
        self
    }

    pub fn with_section_connections(mut self, connections: Vec<SectionConnection>) -> Self {
        self.section_connections = connections;
        self
    }

    pub fn section_count(&self) -> usize {
        self.dividers.len() + 1
    }
}

/// 顏色欄位存取
pub trait ColorFields {
    fn colors(&self) -> &BTreeMap<String, String>;

    /// 取得欄位顏色（空字串視為未設定）
    fn color(&self, field: &str) -> Option<&str> {
        self.colors()
            .get(field)
            .map(String::as_str)
            .filter(|c| !c.is_empty())
    }
}

/// 捲簾窗選項
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanjurSelections {
    pub width: Decimal,
    pub height: Decimal,

    #[serde(default = "default_quantity")]
    pub quantity: u32,

    pub width_convention: WidthConvention,
    pub height_convention: HeightConvention,
    pub lamel_type: LamelType,
    pub post_type: PostType,
    pub box_size: BoxSize,
    pub mounting: MountingStyle,
    pub movement: MovementType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_drive: Option<ManualDrive>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motor_brand: Option<MotorBrand>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motor_model: Option<String>,

    pub tube_type: TubeType,

    #[serde(default)]
    pub sub_part: SubPart,

    #[serde(default)]
    pub post_adapter: PostAdapter,

    /// 迷你立柱剪刀鉸鏈
    #[serde(default)]
    pub scissor_hinge: bool,

    /// 遙控器型號
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,

    /// 接收器型號
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,

    /// 智慧家庭模組型號
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smart_home: Option<String>,

    #[serde(default)]
    pub packaging: bool,

    #[serde(default)]
    pub layout: SectionLayout,

    #[serde(default)]
    pub colors: BTreeMap<String, String>,
}

impl PanjurSelections {
    /// 以必要欄位建立選項，其餘取預設
    pub fn new(width: Decimal, height: Decimal, lamel_type: LamelType, box_size: BoxSize) -> Self {
        Self {
            width,
            height,
            quantity: 1,
            width_convention: WidthConvention::IncludesPosts,
            height_convention: HeightConvention::IncludesBox,
            lamel_type,
            post_type: PostType::Mini,
            box_size,
            mounting: MountingStyle::Distan,
            movement: MovementType::Manual,
            manual_drive: Some(ManualDrive::Pulley),
            motor_brand: None,
            motor_model: None,
            tube_type: TubeType::Octagonal40,
            sub_part: SubPart::Standard,
            post_adapter: PostAdapter::None,
            scissor_hinge: false,
            remote: None,
            receiver: None,
            smart_home: None,
            packaging: false,
            layout: SectionLayout::single(),
            colors: BTreeMap::new(),
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_conventions(mut self, width: WidthConvention, height: HeightConvention) -> Self {
        self.width_convention = width;
        self.height_convention = height;
        self
    }

    pub fn with_post_type(mut self, post: PostType) -> Self {
        self.post_type = post;
        self
    }

    pub fn with_mounting(mut self, mounting: MountingStyle) -> Self {
        self.mounting = mounting;
        self
    }

    /// 設為手動
    pub fn with_manual(mut self, drive: ManualDrive) -> Self {
        self.movement = MovementType::Manual;
        self.manual_drive = Some(drive);
        self
    }

    /// 設為電動
    pub fn with_motor(mut self, brand: MotorBrand, model: impl Into<String>) -> Self {
        self.movement = MovementType::Motorized;
        self.manual_drive = None;
        self.motor_brand = Some(brand);
        self.motor_model = Some(model.into());
        self
    }

    pub fn with_tube_type(mut self, tube: TubeType) -> Self {
        self.tube_type = tube;
        self
    }

    pub fn with_sub_part(mut self, sub_part: SubPart) -> Self {
        self.sub_part = sub_part;
        self
    }

    pub fn with_post_adapter(mut self, adapter: PostAdapter) -> Self {
        self.post_adapter = adapter;
        self
    }

    pub fn with_scissor_hinge(mut self, enabled: bool) -> Self {
        self.scissor_hinge = enabled;
        self
    }

    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = Some(remote.into());
        self
    }

    pub fn with_receiver(mut self, receiver: impl Into<String>) -> Self {
        self.receiver = Some(receiver.into());
        self
    }

    pub fn with_smart_home(mut self, smart_home: impl Into<String>) -> Self {
        self.smart_home = Some(smart_home.into());
        self
    }

    pub fn with_packaging(mut self, packaging: bool) -> Self {
        self.packaging = packaging;
        self
    }

    pub fn with_layout(mut self, layout: SectionLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_color(mut self, field: impl Into<String>, color: impl Into<String>) -> Self {
        self.colors.insert(field.into(), color.into());
        self
    }
}

impl ColorFields for PanjurSelections {
    fn colors(&self) -> &BTreeMap<String, String> {
        &self.colors
    }
}

/// 捲門透視葉片帶
///
/// `start` 與 `end` 為自地面起算的高度（mm），兩者之間的葉片改用透視葉片。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisionBand {
    pub start: Decimal,
    pub end: Decimal,
}

/// 捲門選項
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KepenkSelections {
    pub width: Decimal,
    pub height: Decimal,

    #[serde(default = "default_quantity")]
    pub quantity: u32,

    pub lamel_type: LamelType,

    /// 箱體；77 系列預設 300mm，100 系列預設 350mm
    pub box_size: BoxSize,

    pub movement: MovementType,

    /// 使用者指定的馬達型號；未指定或容量不足時自動選型
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motor_model: Option<String>,

    pub tube_type: TubeType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vision_band: Option<VisionBand>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,

    #[serde(default)]
    pub packaging: bool,

    #[serde(default)]
    pub layout: SectionLayout,

    #[serde(default)]
    pub colors: BTreeMap<String, String>,
}

impl KepenkSelections {
    pub fn new(width: Decimal, height: Decimal, lamel_type: LamelType) -> Self {
        let (tube_type, box_size) = if lamel_type.is_door_100() {
            (TubeType::Tube102, BoxSize(350))
        } else {
            (TubeType::Tube70, BoxSize(300))
        };
        Self {
            width,
            height,
            quantity: 1,
            lamel_type,
            box_size,
            movement: MovementType::Manual,
            motor_model: None,
            tube_type,
            vision_band: None,
            remote: None,
            packaging: false,
            layout: SectionLayout::single(),
            colors: BTreeMap::new(),
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_box_size(mut self, box_size: BoxSize) -> Self {
        self.box_size = box_size;
        self
    }

    pub fn with_movement(mut self, movement: MovementType) -> Self {
        self.movement = movement;
        self
    }

    pub fn with_motor_model(mut self, model: impl Into<String>) -> Self {
        self.movement = MovementType::Motorized;
        self.motor_model = Some(model.into());
        self
    }

    pub fn with_vision_band(mut self, start: Decimal, end: Decimal) -> Self {
        self.vision_band = Some(VisionBand { start, end });
        self
    }

    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = Some(remote.into());
        self
    }

    pub fn with_packaging(mut self, packaging: bool) -> Self {
        self.packaging = packaging;
        self
    }

    pub fn with_layout(mut self, layout: SectionLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_color(mut self, field: impl Into<String>, color: impl Into<String>) -> Self {
        self.colors.insert(field.into(), color.into());
        self
    }
}

impl ColorFields for KepenkSelections {
    fn colors(&self) -> &BTreeMap<String, String> {
        &self.colors
    }
}

/// 摺疊紗窗選項
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SineklikSelections {
    pub width: Decimal,
    pub height: Decimal,

    #[serde(default = "default_quantity")]
    pub quantity: u32,

    pub opening: OpeningDirection,
    pub threshold: ThresholdType,

    #[serde(default)]
    pub mesh: MeshType,

    #[serde(default)]
    pub packaging: bool,

    #[serde(default)]
    pub colors: BTreeMap<String, String>,
}

impl SineklikSelections {
    pub fn new(width: Decimal, height: Decimal, opening: OpeningDirection) -> Self {
        Self {
            width,
            height,
            quantity: 1,
            opening,
            threshold: ThresholdType::Standard,
            mesh: MeshType::Normal,
            packaging: false,
            colors: BTreeMap::new(),
        }
    }

    pub fn with_threshold(mut self, threshold: ThresholdType) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_mesh(mut self, mesh: MeshType) -> Self {
        self.mesh = mesh;
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_packaging(mut self, packaging: bool) -> Self {
        self.packaging = packaging;
        self
    }

    pub fn with_color(mut self, field: impl Into<String>, color: impl Into<String>) -> Self {
        self.colors.insert(field.into(), color.into());
        self
    }
}

impl ColorFields for SineklikSelections {
    fn colors(&self) -> &BTreeMap<String, String> {
        &self.colors
    }
}

/// 玻璃陽台的一支臂（一段直線軌道）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlassArm {
    /// 臂寬（mm）
    pub width: Decimal,

    /// 玻璃片數（含固定片與開啟扇）
    pub panels: u32,

    /// 開啟扇數
    #[serde(default)]
    pub exits: u32,

    #[serde(default)]
    pub exit_side: ExitSide,

    /// 固定片數
    #[serde(default)]
    pub fixed_count: u32,

    /// 固定片寬（mm）
    #[serde(default)]
    pub fixed_width: Decimal,

    #[serde(default)]
    pub fixed_side: Side,

    /// 與前一支臂的轉角（度）；第一支臂沒有前一支，忽略此值
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<Decimal>,
}

impl GlassArm {
    pub fn new(width: Decimal, panels: u32) -> Self {
        Self {
            width,
            panels,
            exits: 0,
            exit_side: ExitSide::Right,
            fixed_count: 0,
            fixed_width: Decimal::ZERO,
            fixed_side: Side::Right,
            angle: None,
        }
    }

    pub fn with_exits(mut self, exits: u32, side: ExitSide) -> Self {
        self.exits = exits;
        self.exit_side = side;
        self
    }

    pub fn with_fixed(mut self, count: u32, width: Decimal, side: Side) -> Self {
        self.fixed_count = count;
        self.fixed_width = width;
        self.fixed_side = side;
        self
    }

    pub fn with_angle(mut self, angle: Decimal) -> Self {
        self.angle = Some(angle);
        self
    }
}

/// 玻璃陽台選項
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CamBalkonSelections {
    /// 系統總高（mm）
    pub height: Decimal,

    #[serde(default = "default_quantity")]
    pub quantity: u32,

    #[serde(default)]
    pub color: GlassProfileColor,

    #[serde(default)]
    pub glass_thickness: GlassThickness,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub glass_color: String,

    /// 由左至右的各臂
    pub arms: Vec<GlassArm>,

    /// 外部預覽算出的活動片間隔數，覆寫本地計算
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sliding_gaps: Option<u32>,

    /// 外部預覽算出的固定片與活動片間隔數，覆寫本地計算
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_sliding_gaps: Option<u32>,

    #[serde(default)]
    pub packaging: bool,
}

impl CamBalkonSelections {
    pub fn new(height: Decimal, arms: Vec<GlassArm>) -> Self {
        Self {
            height,
            quantity: 1,
            color: GlassProfileColor::Eloksal,
            glass_thickness: GlassThickness::Mm24,
            glass_color: String::new(),
            arms,
            sliding_gaps: None,
            fixed_sliding_gaps: None,
            packaging: false,
        }
    }

    /// 各臂寬度總和
    pub fn total_width(&self) -> Decimal {
        self.arms.iter().map(|a| a.width).sum()
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_color(mut self, color: GlassProfileColor) -> Self {
        self.color = color;
        self
    }

    pub fn with_glass(mut self, thickness: GlassThickness, color: impl Into<String>) -> Self {
        self.glass_thickness = thickness;
        self.glass_color = color.into();
        self
    }

    pub fn with_gap_overrides(mut self, sliding: Option<u32>, fixed_sliding: Option<u32>) -> Self {
        self.sliding_gaps = sliding;
        self.fixed_sliding_gaps = fixed_sliding;
        self
    }

    pub fn with_packaging(mut self, packaging: bool) -> Self {
        self.packaging = packaging;
        self
    }
}

/// 報價選項（依產品族區分）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "product", rename_all = "snake_case")]
pub enum Selections {
    Panjur(PanjurSelections),
    Kepenk(KepenkSelections),
    Sineklik(SineklikSelections),
    CamBalkon(CamBalkonSelections),
}

impl Selections {
    /// 產品族名稱
    pub fn family(&self) -> &'static str {
        match self {
            Self::Panjur(_) => "panjur",
            Self::Kepenk(_) => "kepenk",
            Self::Sineklik(_) => "sineklik",
            Self::CamBalkon(_) => "cam_balkon",
        }
    }

    /// 是否要求包裝
    pub fn packaging(&self) -> bool {
        match self {
            Self::Panjur(s) => s.packaging,
            Self::Kepenk(s) => s.packaging,
            Self::Sineklik(s) => s.packaging,
            Self::CamBalkon(s) => s.packaging,
        }
    }
}
