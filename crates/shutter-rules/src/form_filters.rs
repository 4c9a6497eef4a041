//! 表單選項篩選
//!
//! 依目前尺寸篩選可用的箱體、葉片與馬達型號。篩選結果若使目前值失效，
//! 以 [`FieldAdjustment`] 回傳建議的新值，由呼叫端決定是否套用與提示。

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shutter_calc::capacity::{
    box_for_winding, lamel_limits, max_curtain_height, MotorFamily, WindingTable, DOOR_MOTORS,
    PANJUR_MOTORS,
};
use shutter_core::{
    BoxSize, FieldValue, HeightConvention, LamelType, MotorBrand, MountingStyle, MovementType,
};

/// 建議的欄位調整
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldAdjustment {
    pub field: String,
    pub value: FieldValue,
    pub reason: String,
}

impl FieldAdjustment {
    fn new(field: &str, value: impl Into<FieldValue>, reason: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// 可用箱體與其容許的操作方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxOption {
    pub size: BoxSize,
    /// 手動可用時為手動，否則僅電動可用
    pub movement: MovementType,
}

fn box_candidates(mounting: MountingStyle) -> &'static [u32] {
    match mounting {
        MountingStyle::Distan => &[137, 165, 205, 250],
        MountingStyle::Monoblok => &[185, 220],
        MountingStyle::Yalitimli => &[250, 300],
    }
}

/// 依簾高篩選箱體
///
/// 高度含箱體時，簾高以總高減去半個箱高估算。目前箱體不在結果中時，
/// 建議改為第一個可用箱體。
pub fn box_size_options(
    height: Decimal,
    convention: HeightConvention,
    mounting: MountingStyle,
    lamel: LamelType,
    current: Option<BoxSize>,
) -> (Vec<BoxOption>, Option<FieldAdjustment>) {
    let options: Vec<BoxOption> = box_candidates(mounting)
        .iter()
        .filter_map(|&size| {
            let size = BoxSize(size);
            let curtain = match convention {
                HeightConvention::IncludesBox => height - size.height() / Decimal::TWO,
                HeightConvention::ExcludesBox => height,
            };
            let fits = |movement| {
                max_curtain_height(mounting, size, lamel, movement).is_some_and(|max| curtain <= max)
            };
            if fits(MovementType::Manual) {
                Some(BoxOption { size, movement: MovementType::Manual })
            } else if fits(MovementType::Motorized) {
                Some(BoxOption { size, movement: MovementType::Motorized })
            } else {
                None
            }
        })
        .collect();

    let adjustment = match options.first() {
        Some(first) if !options.iter().any(|o| Some(o.size) == current) => Some(FieldAdjustment::new(
            "box_size",
            first.size.tag().as_str(),
            format!("箱體改為 {}", first.size),
        )),
        _ => None,
    };

    tracing::debug!("可用箱體 {} 種（高度 {height}）", options.len());
    (options, adjustment)
}

/// 葉片篩選結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LamelFilter {
    pub options: Vec<LamelType>,
    pub adjustments: Vec<FieldAdjustment>,
}

const LAMEL_ORDER: [LamelType; 4] = [LamelType::Sl39, LamelType::Sl55, LamelType::Se45, LamelType::Se55];

/// 依寬高篩選捲簾葉片
///
/// 目前葉片失效時改用第一個可用葉片，並連帶調整操作方式：
/// 39 SL 為手動，其他為電動。
pub fn lamel_options(
    width: Decimal,
    height: Decimal,
    current: LamelType,
    movement: MovementType,
) -> LamelFilter {
    let options: Vec<LamelType> = LAMEL_ORDER
        .into_iter()
        .filter(|lamel| lamel_limits(*lamel).admits(width, height))
        .collect();

    let mut adjustments = Vec::new();
    if let Some(&first) = options.first() {
        if !options.contains(&current) {
            let suggested = if first == LamelType::Sl39 {
                MovementType::Manual
            } else {
                MovementType::Motorized
            };
            if movement != suggested {
                adjustments.push(FieldAdjustment::new(
                    "movement",
                    suggested.tag(),
                    format!("操作方式改為 {}", suggested.tag()),
                ));
            }
            adjustments.push(FieldAdjustment::new(
                "lamel",
                first.tag(),
                format!("葉片改為 {}", first.tag()),
            ));
        }
    }

    LamelFilter { options, adjustments }
}

/// 馬達型號建議
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotorAdvice {
    /// 可用型號（依容量遞增）
    Options {
        models: Vec<String>,
        adjustment: Option<FieldAdjustment>,
    },
    /// 沒有型號能承載此面積，應改為手動
    FallbackToManual,
}

/// 依面積與品牌篩選捲簾馬達
pub fn motor_options(
    lamel: LamelType,
    brand: MotorBrand,
    area: Decimal,
    current_model: Option<&str>,
) -> MotorAdvice {
    let models: Vec<String> = PANJUR_MOTORS
        .models(lamel, MotorFamily::of_brand(brand))
        .into_iter()
        .filter(|choice| choice.capacity >= area)
        .map(|choice| choice.model.to_string())
        .collect();

    let Some(first) = models.first() else {
        tracing::debug!("{} 無馬達可承載 {area} m²", lamel.tag());
        return MotorAdvice::FallbackToManual;
    };

    let adjustment = (!models.iter().any(|m| Some(m.as_str()) == current_model))
        .then(|| FieldAdjustment::new("motor_model", first.as_str(), format!("馬達改為 {first}")));

    MotorAdvice::Options { models, adjustment }
}

/// 捲門自動選型：先試葉片對應的捲軸族，70mm 不足時改試 102mm
///
/// 建議值為目錄馬達代碼；無型號可承載時回傳 `None`。
pub fn door_motor_suggestion(lamel: LamelType, width: Decimal, height: Decimal) -> Option<FieldAdjustment> {
    let area = shutter_calc::capacity::area_m2(width, height);
    let families: &[MotorFamily] = if lamel.is_door_100() {
        &[MotorFamily::Tube102]
    } else {
        &[MotorFamily::Tube70, MotorFamily::Tube102]
    };
    let choice = DOOR_MOTORS.select_with_fallback(lamel, families, area)?;
    let code = shutter_calc::capacity::door_catalog_motor(choice.model)?;
    Some(FieldAdjustment::new(
        "motor_model",
        code,
        format!("{area} m² 選用 {}", choice.model),
    ))
}

/// 依捲繞直徑建議外掛箱體
pub fn suggest_box(
    lamel: LamelType,
    movement: MovementType,
    height: Decimal,
    mounting: MountingStyle,
) -> Option<BoxSize> {
    let diameter = WindingTable::diameter(lamel, movement, height)?;
    box_for_winding(diameter, mounting)
}
