//! 產品屬性列舉

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 葉片（lamel）類型
///
/// 前四種用於捲簾窗（panjur），其餘用於捲門（kepenk）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LamelType {
    #[serde(rename = "39_sl")]
    Sl39,
    #[serde(rename = "45_se")]
    Se45,
    #[serde(rename = "55_sl")]
    Sl55,
    #[serde(rename = "55_se")]
    Se55,
    #[serde(rename = "st_77")]
    St77,
    #[serde(rename = "sl_77")]
    Sl77,
    #[serde(rename = "se_77")]
    Se77,
    #[serde(rename = "se_78")]
    Se78,
    #[serde(rename = "st_100")]
    St100,
    #[serde(rename = "sl_100")]
    Sl100,
}

impl LamelType {
    pub const PANJUR: [LamelType; 4] = [Self::Sl39, Self::Se45, Self::Sl55, Self::Se55];

    pub const KEPENK: [LamelType; 6] = [
        Self::St77,
        Self::Sl77,
        Self::Se77,
        Self::Se78,
        Self::St100,
        Self::Sl100,
    ];

    /// 目錄標籤
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Sl39 => "39_sl",
            Self::Se45 => "45_se",
            Self::Sl55 => "55_sl",
            Self::Se55 => "55_se",
            Self::St77 => "st_77",
            Self::Sl77 => "sl_77",
            Self::Se77 => "se_77",
            Self::Se78 => "se_78",
            Self::St100 => "st_100",
            Self::Sl100 => "sl_100",
        }
    }

    /// 覆蓋面（mm），即每片葉片實際遮蔽的高度
    pub fn cover_surface(&self) -> Decimal {
        match self {
            Self::Sl39 => Decimal::from(39),
            Self::Se45 => Decimal::from(45),
            Self::Sl55 | Self::Se55 => Decimal::from(55),
            Self::St77 | Self::Sl77 | Self::Se77 => Decimal::from(77),
            Self::Se78 => Decimal::from(78),
            Self::St100 | Self::Sl100 => Decimal::from(96),
        }
    }

    /// 是否為捲門葉片
    pub fn is_door(&self) -> bool {
        !Self::PANJUR.contains(self)
    }

    /// 是否為 100 系列捲門葉片
    pub fn is_door_100(&self) -> bool {
        matches!(self, Self::St100 | Self::Sl100)
    }

    /// 對應的捲門立柱
    pub fn door_post(&self) -> PostType {
        if self.is_door_100() {
            PostType::Kepenk100
        } else {
            PostType::Kepenk77
        }
    }
}

impl fmt::Display for LamelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// 立柱（dikme）類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostType {
    #[serde(rename = "mini_dikme")]
    Mini,
    #[serde(rename = "midi_dikme")]
    Midi,
    #[serde(rename = "kepenk_77")]
    Kepenk77,
    #[serde(rename = "kepenk_100")]
    Kepenk100,
}

impl PostType {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Mini => "mini_dikme",
            Self::Midi => "midi_dikme",
            Self::Kepenk77 => "kepenk_77",
            Self::Kepenk100 => "kepenk_100",
        }
    }

    /// 立柱寬度（mm）
    pub fn width(&self) -> Decimal {
        match self {
            Self::Mini => Decimal::from(53),
            Self::Midi => Decimal::from(62),
            Self::Kepenk77 => Decimal::from(100),
            Self::Kepenk100 => Decimal::from(140),
        }
    }

    /// 葉片每側扣除量（mm）
    pub fn edge_allowance(&self) -> Decimal {
        match self {
            Self::Mini => Decimal::from(37),
            Self::Midi => Decimal::from(45),
            Self::Kepenk77 => Decimal::from(67),
            Self::Kepenk100 => Decimal::from(70),
        }
    }

    pub fn is_mini(&self) -> bool {
        matches!(self, Self::Mini)
    }
}

/// 箱體尺寸（mm），序列化為 `"137mm"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BoxSize(pub u32);

impl BoxSize {
    pub fn height(&self) -> Decimal {
        Decimal::from(self.0)
    }

    pub fn tag(&self) -> String {
        format!("{}mm", self.0)
    }
}

impl TryFrom<String> for BoxSize {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value
            .trim()
            .trim_end_matches("mm")
            .parse::<u32>()
            .map(BoxSize)
            .map_err(|_| format!("無效的箱體尺寸: {value}"))
    }
}

impl From<BoxSize> for String {
    fn from(value: BoxSize) -> Self {
        value.tag()
    }
}

impl fmt::Display for BoxSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}mm", self.0)
    }
}

/// 捲軸（tambur）管徑
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TubeType {
    #[serde(rename = "40mm")]
    Octagonal40,
    #[serde(rename = "60mm")]
    Octagonal60,
    #[serde(rename = "70mm")]
    Tube70,
    #[serde(rename = "102mm")]
    Tube102,
}

impl TubeType {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Octagonal40 => "40mm",
            Self::Octagonal60 => "60mm",
            Self::Tube70 => "70mm",
            Self::Tube102 => "102mm",
        }
    }
}

/// 操作方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementType {
    #[serde(rename = "manuel")]
    Manual,
    #[serde(rename = "motorlu")]
    Motorized,
}

impl MovementType {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Manual => "manuel",
            Self::Motorized => "motorlu",
        }
    }
}

/// 手動驅動方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ManualDrive {
    /// 拉帶滑輪
    #[serde(rename = "makarali")]
    Pulley,
    /// 減速齒輪（搖桿）
    #[serde(rename = "reduktorlu")]
    Gear,
}

/// 馬達品牌
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotorBrand {
    Mosel,
    Somfy,
}

/// 安裝方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MountingStyle {
    /// 外掛
    Distan,
    /// 一體式
    Monoblok,
    /// 隔熱箱
    Yalitimli,
}

/// 寬度量測方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WidthConvention {
    #[serde(rename = "dikme_dahil")]
    IncludesPosts,
    #[serde(rename = "dikme_haric")]
    ExcludesPosts,
    #[serde(rename = "tek_dikme")]
    SinglePost,
}

/// 高度量測方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeightConvention {
    #[serde(rename = "kutu_dahil")]
    IncludesBox,
    #[serde(rename = "kutu_haric")]
    ExcludesBox,
}

/// 區段與相鄰區段的連動
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionConnection {
    #[default]
    None,
    Left,
    Right,
}

/// 底部配件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SubPart {
    #[default]
    #[serde(rename = "alt_parca")]
    Standard,
    #[serde(rename = "kilitli_alt_parca")]
    Locking,
}

impl SubPart {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Standard => "alt_parca",
            Self::Locking => "kilitli_alt_parca",
        }
    }
}

/// 立柱加高轉接
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostAdapter {
    #[default]
    None,
    DoubleSided,
    TripleSided,
}

/// 紗窗開啟方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpeningDirection {
    #[serde(rename = "yatay")]
    Horizontal,
    #[serde(rename = "dikey")]
    Vertical,
    #[serde(rename = "cift")]
    Double,
}

/// 紗窗框型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThresholdType {
    /// 四邊框加扇料
    #[serde(rename = "standart")]
    Standard,
    /// 無門檻框：底邊改用低門檻型材，不含扇料
    #[serde(rename = "esiksiz")]
    None,
}

impl ThresholdType {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Standard => "standart",
            Self::None => "esiksiz",
        }
    }
}

/// 紗網
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeshType {
    #[default]
    #[serde(rename = "normal")]
    Normal,
    /// 防寵物抓破
    #[serde(rename = "kedi")]
    PetProof,
}

impl MeshType {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::PetProof => "kedi",
        }
    }
}

/// 玻璃陽台玻璃厚度
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GlassThickness {
    #[serde(rename = "8mm", alias = "8")]
    Mm8,
    #[default]
    #[serde(rename = "24mm", alias = "24")]
    Mm24,
    #[serde(rename = "28mm", alias = "28")]
    Mm28,
    #[serde(rename = "32mm", alias = "32")]
    Mm32,
    #[serde(rename = "40mm", alias = "40")]
    Mm40,
}

impl GlassThickness {
    /// 玻璃厚度（mm）
    pub fn millimeters(&self) -> Decimal {
        Decimal::from(match self {
            Self::Mm8 => 8,
            Self::Mm24 => 24,
            Self::Mm28 => 28,
            Self::Mm32 => 32,
            Self::Mm40 => 40,
        })
    }

    /// 相鄰玻璃間的型材寬度（mm）
    pub fn glass_spacing(&self) -> Decimal {
        Decimal::from(match self {
            Self::Mm8 => 9,
            Self::Mm24 => 19,
            Self::Mm28 => 22,
            Self::Mm32 => 25,
            Self::Mm40 => 30,
        })
    }
}

/// 玻璃陽台型材顏色
///
/// 型材庫存代碼以顏色代碼區分，例如 `357014_4447_0`。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlassProfileColor {
    #[default]
    Eloksal,
    Bronz,
    Antrasit,
    Ral,
}

impl GlassProfileColor {
    pub const ALL: [GlassProfileColor; 4] = [Self::Eloksal, Self::Bronz, Self::Antrasit, Self::Ral];

    /// 庫存代碼中的顏色代碼
    pub fn code(&self) -> &'static str {
        match self {
            Self::Eloksal => "4447",
            Self::Bronz => "4440",
            Self::Antrasit => "4441",
            Self::Ral => "7072",
        }
    }
}

/// 左右
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    #[serde(rename = "sol")]
    Left,
    #[default]
    #[serde(rename = "sag")]
    Right,
}

/// 開啟扇的位置
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExitSide {
    #[serde(rename = "sol")]
    Left,
    #[default]
    #[serde(rename = "sag")]
    Right,
    /// 兩側各一扇
    #[serde(rename = "sagsol")]
    Both,
}

impl ExitSide {
    pub fn has_left(&self) -> bool {
        matches!(self, Self::Left | Self::Both)
    }

    pub fn has_right(&self) -> bool {
        matches!(self, Self::Right | Self::Both)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glass_attributes_serde() {
        let t: GlassThickness = serde_json::from_str("\"32mm\"").unwrap();
        assert_eq!(t.glass_spacing(), Decimal::from(25));
        let t: GlassThickness = serde_json::from_str("\"8\"").unwrap();
        assert_eq!(t, GlassThickness::Mm8);

        let side: ExitSide = serde_json::from_str("\"sagsol\"").unwrap();
        assert!(side.has_left() && side.has_right());
        assert_eq!(GlassProfileColor::Antrasit.code(), "4441");
    }

    #[test]
    fn test_box_size_serde() {
        let size: BoxSize = serde_json::from_str("\"165mm\"").unwrap();
        assert_eq!(size, BoxSize(165));
        assert_eq!(serde_json::to_string(&size).unwrap(), "\"165mm\"");
        assert!(serde_json::from_str::<BoxSize>("\"kutu\"").is_err());
    }

    #[test]
    fn test_post_dimensions() {
        assert_eq!(PostType::Mini.width(), Decimal::from(53));
        assert_eq!(PostType::Kepenk77.edge_allowance(), Decimal::from(67));
        assert_eq!(LamelType::Sl100.door_post(), PostType::Kepenk100);
        assert_eq!(LamelType::Se78.door_post(), PostType::Kepenk77);
    }

    #[test]
    fn test_lamel_families() {
        assert!(LamelType::PANJUR.iter().all(|l| !l.is_door()));
        assert!(LamelType::KEPENK.iter().all(|l| l.is_door()));
        assert_eq!(LamelType::St100.cover_surface(), Decimal::from(96));
    }
}
