//! 各產品族的幾何與主要型材

pub mod cam_balkon;
pub mod kepenk;
pub mod panjur;
pub mod sineklik;

use shutter_core::selections::ColorFields;
use shutter_core::EngineConfig;

/// 顏色候選：欄位本身的顏色、主顏色、通用顏色
pub(crate) fn color_chain<S: ColorFields>(selections: &S, field: &str, config: &EngineConfig) -> Vec<String> {
    [
        selections.color(field),
        selections.color(&config.primary_color_field),
        Some(config.universal_default_color.as_str()),
    ]
    .into_iter()
    .flatten()
    .map(str::to_string)
    .collect()
}

/// 區段說明
pub(crate) fn section_label(index: usize) -> String {
    format!("(Bölme {})", index + 1)
}
