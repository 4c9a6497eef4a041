//! 欄位依賴引擎
//!
//! 每個欄位最多依賴一個上游欄位。欄位「啟用」的條件是整條上游鏈的條件都成立。
//! 沿變更欄位下游失效的欄位會被重設為預設值（無預設時為空字串）；
//! 全表掃描只處理有宣告預設值的欄位。

use serde::{Deserialize, Serialize};
use shutter_cache::changed_fields;
use shutter_core::{FieldSchema, FieldSpec, FieldValue, FieldValues, Result, ShutterError};
use std::collections::BTreeSet;

/// 一次重設紀錄
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldReset {
    pub field: String,
    pub previous: FieldValue,
    pub value: FieldValue,
}

/// 欄位依賴引擎
#[derive(Debug, Clone)]
pub struct DependencyEngine {
    schema: FieldSchema,
}

impl DependencyEngine {
    /// 載入欄位結構
    ///
    /// 上游欄位不存在時回傳 [`ShutterError::UnknownField`]，
    /// 依賴形成循環時回傳 [`ShutterError::DependencyCycle`]。
    pub fn new(schema: FieldSchema) -> Result<Self> {
        for field in schema.fields() {
            if let Some(dep) = &field.depends_on {
                if schema.get(&dep.field).is_none() {
                    return Err(ShutterError::UnknownField(format!(
                        "{} 依賴未定義的欄位 {}",
                        field.id, dep.field
                    )));
                }
            }
        }

        for field in schema.fields() {
            let mut path = vec![field.id.as_str()];
            let mut seen = BTreeSet::from([field.id.as_str()]);
            let mut current = field;
            while let Some(dep) = &current.depends_on {
                path.push(dep.field.as_str());
                if !seen.insert(dep.field.as_str()) {
                    return Err(ShutterError::DependencyCycle(path.join(" → ")));
                }
                match schema.get(&dep.field) {
                    Some(parent) => current = parent,
                    None => break,
                }
            }
        }

        tracing::debug!("載入欄位結構：{} 個欄位", schema.fields().len());
        Ok(Self { schema })
    }

    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    /// 欄位的整條上游鏈是否成立
    pub fn is_active(&self, id: &str, values: &FieldValues) -> bool {
        let mut current = self.schema.get(id);
        while let Some(spec) = current {
            let Some(dep) = &spec.depends_on else {
                return true;
            };
            if !dep.predicate.evaluate(values.get(&dep.field)) {
                return false;
            }
            current = self.schema.get(&dep.field);
        }
        true
    }

    /// 處理一批已變更的欄位
    ///
    /// 先沿變更欄位的下游遞迴重設失效欄位，再全表掃描一次，
    /// 把失效且有預設值的欄位拉回預設值。回傳依發生順序的重設紀錄。
    pub fn apply(&self, values: &mut FieldValues, changed: &[String]) -> Vec<FieldReset> {
        let mut resets = Vec::new();

        for id in changed {
            self.cascade(id, values, &mut resets);
        }

        for spec in self.schema.fields() {
            if spec.default.is_some() && !self.is_active(&spec.id, values) {
                Self::reset(spec, values, &mut resets);
            }
        }

        if !resets.is_empty() {
            tracing::debug!("依賴重設 {} 個欄位", resets.len());
        }
        resets
    }

    /// 設定單一欄位並處理依賴
    pub fn set_value(
        &self,
        values: &mut FieldValues,
        id: &str,
        value: FieldValue,
    ) -> Result<Vec<FieldReset>> {
        if self.schema.get(id).is_none() {
            return Err(ShutterError::UnknownField(id.to_string()));
        }
        values.insert(id.to_string(), value);
        Ok(self.apply(values, &[id.to_string()]))
    }

    /// 比較前一版本後處理所有變更欄位
    pub fn apply_diff(&self, previous: &FieldValues, values: &mut FieldValues) -> Vec<FieldReset> {
        let changed = changed_fields(previous, values);
        self.apply(values, &changed)
    }

    fn cascade(&self, id: &str, values: &mut FieldValues, resets: &mut Vec<FieldReset>) {
        let dependents: Vec<&FieldSpec> = self.schema.dependents_of(id).collect();
        for spec in dependents {
            if self.is_active(&spec.id, values) {
                continue;
            }
            Self::reset(spec, values, resets);
            self.cascade(&spec.id, values, resets);
        }
    }

    fn reset(spec: &FieldSpec, values: &mut FieldValues, resets: &mut Vec<FieldReset>) {
        let target = spec.reset_value();
        let previous = values.get(&spec.id).cloned().unwrap_or_else(FieldValue::empty);
        if previous == target {
            return;
        }
        tracing::debug!("重設欄位 {}: {} → {}", spec.id, previous, target);
        values.insert(spec.id.clone(), target.clone());
        resets.push(FieldReset {
            field: spec.id.clone(),
            previous,
            value: target,
        });
    }
}
