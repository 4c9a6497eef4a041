//! # Shutter Rules
//!
//! 表單規則：顏色同步、欄位依賴重設、選項篩選

pub mod color_sync;
pub mod dependency;
pub mod form;
pub mod form_filters;

// Re-export 主要類型
pub use color_sync::{apply_color_sync, sync_colors};
pub use dependency::{DependencyEngine, FieldReset};
pub use form::{FormState, FormUpdate};
pub use form_filters::{
    box_size_options, door_motor_suggestion, lamel_options, motor_options, suggest_box, BoxOption,
    FieldAdjustment, LamelFilter, MotorAdvice,
};
