//! 表單欄位結構
//!
//! 欄位可宣告對另一欄位的依賴；依賴不成立時欄位會被重設為預設值。

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 欄位值
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
    Number(Decimal),
}

impl FieldValue {
    /// 空字串值
    pub fn empty() -> Self {
        Self::Text(String::new())
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        Self::Number(value)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(b) => write!(f, "{b}"),
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// 欄位 id → 值
pub type FieldValues = BTreeMap<String, FieldValue>;

/// 依賴條件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    Equals(FieldValue),
    OneOf(Vec<FieldValue>),
    NotEquals(FieldValue),
    /// 上游欄位有非空值
    Present,
}

impl Predicate {
    /// 以上游欄位的值評估條件（缺值視為空字串）
    pub fn evaluate(&self, value: Option<&FieldValue>) -> bool {
        let empty = FieldValue::empty();
        let value = value.unwrap_or(&empty);
        match self {
            Self::Equals(v) => value == v,
            Self::OneOf(vs) => vs.contains(value),
            Self::NotEquals(v) => value != v,
            Self::Present => !value.is_empty(),
        }
    }
}

/// 對上游欄位的依賴
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub field: String,
    pub predicate: Predicate,
}

/// 欄位定義
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<FieldValue>,

    /// 可選值（顏色欄位用於判斷主顏色是否可用）
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<Dependency>,
}

impl FieldSpec {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            default: None,
            options: Vec::new(),
            depends_on: None,
        }
    }

    pub fn with_default(mut self, default: impl Into<FieldValue>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn depends_on(mut self, field: impl Into<String>, predicate: Predicate) -> Self {
        self.depends_on = Some(Dependency {
            field: field.into(),
            predicate,
        });
        self
    }

    /// 重設值：預設值，無預設時為空字串
    pub fn reset_value(&self) -> FieldValue {
        self.default.clone().unwrap_or_else(FieldValue::empty)
    }
}

/// 欄位集合（保持宣告順序）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSchema {
    fields: Vec<FieldSpec>,
}

impl FieldSchema {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn get(&self, id: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// 直接依賴於 `id` 的欄位
    pub fn dependents_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a FieldSpec> + 'a {
        self.fields
            .iter()
            .filter(move |f| f.depends_on.as_ref().is_some_and(|d| d.field == id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicates() {
        let motor = FieldValue::text("motorlu");
        assert!(Predicate::Equals(motor.clone()).evaluate(Some(&motor)));
        assert!(!Predicate::Equals(motor.clone()).evaluate(None));
        assert!(Predicate::NotEquals(motor.clone()).evaluate(None));
        assert!(!Predicate::Present.evaluate(Some(&FieldValue::empty())));
        assert!(Predicate::OneOf(vec!["a".into(), "b".into()]).evaluate(Some(&"b".into())));
    }

    #[test]
    fn test_schema_json() {
        let json = r#"[
            {"id": "movement", "default": "manuel"},
            {"id": "motor_model", "depends_on": {"field": "movement", "predicate": {"equals": "motorlu"}}}
        ]"#;
        let schema: FieldSchema = serde_json::from_str(json).unwrap();
        assert_eq!(schema.fields().len(), 2);
        let dependents: Vec<_> = schema.dependents_of("movement").map(|f| f.id.as_str()).collect();
        assert_eq!(dependents, vec!["motor_model"]);
        assert_eq!(schema.get("motor_model").unwrap().reset_value(), FieldValue::empty());
    }
}
