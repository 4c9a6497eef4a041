//! 表單狀態
//!
//! 單一報價行的欄位值。每次設定欄位時依序執行顏色同步與依賴重設，
//! 並以 [`DirtyTracker`] 記錄變更的欄位，供呼叫端決定何時重新計價。

use serde::{Deserialize, Serialize};
use shutter_cache::{changed_fields, DirtyTracker};
use shutter_core::{EngineConfig, FieldSchema, FieldValue, FieldValues, Result, ShutterError};

use crate::color_sync::sync_colors;
use crate::dependency::{DependencyEngine, FieldReset};

/// 一次設定的連帶變更
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormUpdate {
    /// 顏色同步寫入的欄位
    pub color_updates: Vec<(String, FieldValue)>,

    /// 依賴重設的欄位
    pub resets: Vec<FieldReset>,
}

impl FormUpdate {
    pub fn is_empty(&self) -> bool {
        self.color_updates.is_empty() && self.resets.is_empty()
    }
}

/// 表單狀態
#[derive(Debug, Clone)]
pub struct FormState {
    engine: DependencyEngine,
    config: EngineConfig,
    values: FieldValues,
    tracker: DirtyTracker,
}

impl FormState {
    /// 以欄位預設值初始化
    pub fn new(schema: FieldSchema, config: EngineConfig) -> Result<Self> {
        let engine = DependencyEngine::new(schema)?;
        let mut values: FieldValues = engine
            .schema()
            .fields()
            .iter()
            .map(|spec| (spec.id.clone(), spec.reset_value()))
            .collect();
        engine.apply(&mut values, &[]);

        Ok(Self {
            engine,
            config,
            values,
            tracker: DirtyTracker::new(),
        })
    }

    /// 載入既有值（例如重新開啟的報價）
    ///
    /// 載入後執行一次全表掃描，失效且有預設值的欄位回到預設值；不標記為已變更。
    pub fn with_values(mut self, values: FieldValues) -> Self {
        self.values.extend(values);
        self.engine.apply(&mut self.values, &[]);
        self
    }

    pub fn values(&self) -> &FieldValues {
        &self.values
    }

    pub fn get(&self, id: &str) -> Option<&FieldValue> {
        self.values.get(id)
    }

    pub fn is_dirty(&self) -> bool {
        !self.tracker.is_clean()
    }

    /// 設定欄位值
    pub fn set(&mut self, id: &str, value: impl Into<FieldValue>) -> Result<FormUpdate> {
        if self.engine.schema().get(id).is_none() {
            return Err(ShutterError::UnknownField(id.to_string()));
        }

        let previous = self.values.clone();
        self.values.insert(id.to_string(), value.into());

        let mut update = FormUpdate::default();
        if id == self.config.primary_color_field {
            update.color_updates = sync_colors(self.engine.schema(), &self.values, &self.config);
            for (field, value) in &update.color_updates {
                self.values.insert(field.clone(), value.clone());
            }
        }

        let changed = changed_fields(&previous, &self.values);
        update.resets = self.engine.apply(&mut self.values, &changed);

        let marked = self.tracker.mark_changes(&previous, &self.values);
        tracing::debug!(
            "設定欄位 {id}：顏色同步 {}，重設 {}，新標記 {marked}",
            update.color_updates.len(),
            update.resets.len()
        );
        Ok(update)
    }

    /// 取出並清空已變更欄位
    pub fn take_dirty(&mut self) -> Vec<String> {
        self.tracker.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shutter_core::{FieldSpec, Predicate};

    fn schema() -> FieldSchema {
        FieldSchema::new(vec![
            FieldSpec::new("lamel_color")
                .with_default("beyaz")
                .with_options(["beyaz", "antrasit", "altin_mese"]),
            FieldSpec::new("box_color")
                .with_default("beyaz")
                .with_options(["beyaz", "antrasit", "ral_boyali"]),
            FieldSpec::new("dikme_color")
                .with_default("beyaz")
                .with_options(["beyaz", "ral_boyali"]),
            FieldSpec::new("movement").with_default("manuel"),
            FieldSpec::new("motor_model")
                .depends_on("movement", Predicate::Equals("motorlu".into())),
            FieldSpec::new("remote").depends_on("motor_model", Predicate::Present),
            FieldSpec::new("manual_drive")
                .with_default("makarali")
                .depends_on("movement", Predicate::Equals("manuel".into())),
        ])
    }

    fn form() -> FormState {
        FormState::new(schema(), EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_defaults_applied() {
        let form = form();
        assert_eq!(form.get("lamel_color"), Some(&FieldValue::text("beyaz")));
        assert_eq!(form.get("motor_model"), Some(&FieldValue::empty()));
        assert!(!form.is_dirty());
    }

    #[test]
    fn test_primary_color_syncs_dependents() {
        let mut form = form();
        let update = form.set("lamel_color", "antrasit").unwrap();

        assert_eq!(update.color_updates.len(), 2);
        assert_eq!(form.get("box_color"), Some(&FieldValue::text("antrasit")));
        // 選項中沒有 antrasit，退回通用預設
        assert_eq!(form.get("dikme_color"), Some(&FieldValue::text("ral_boyali")));
        assert_eq!(
            form.take_dirty(),
            vec!["box_color", "dikme_color", "lamel_color"]
        );
        assert!(!form.is_dirty());
    }

    #[test]
    fn test_dependency_reset_after_set() {
        let mut form = form();
        form.set("movement", "motorlu").unwrap();
        form.set("motor_model", "boost_35").unwrap();
        form.set("remote", "situo_1").unwrap();
        form.take_dirty();

        let update = form.set("movement", "manuel").unwrap();
        let reset: Vec<_> = update.resets.iter().map(|r| r.field.as_str()).collect();
        assert_eq!(reset, vec!["motor_model", "remote"]);
        assert_eq!(form.take_dirty(), vec!["motor_model", "movement", "remote"]);
    }

    #[test]
    fn test_loaded_values_are_swept() {
        let mut values = FieldValues::new();
        values.insert("movement".into(), "motorlu".into());
        values.insert("manual_drive".into(), "reduktorlu".into());
        let form = form().with_values(values);
        assert_eq!(form.get("manual_drive"), Some(&FieldValue::text("makarali")));
        assert!(!form.is_dirty());

        // 無預設值的欄位保留載入值
        let mut values = FieldValues::new();
        values.insert("movement".into(), "manuel".into());
        values.insert("motor_model".into(), "boost_35".into());
        let form = self::form().with_values(values);
        assert_eq!(form.get("motor_model"), Some(&FieldValue::text("boost_35")));
    }

    #[test]
    fn test_unknown_field() {
        let mut form = form();
        assert!(matches!(form.set("nope", "x"), Err(ShutterError::UnknownField(_))));
    }
}
