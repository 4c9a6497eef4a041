//! 髒標記追蹤
//!
//! 記錄自上次重算後被修改的表單欄位。

use shutter_core::{FieldValue, FieldValues};
use std::collections::BTreeSet;

/// 兩組欄位值之間有變動的欄位（依欄位 id 排序）
///
/// 缺少的欄位視為空值。
pub fn changed_fields(previous: &FieldValues, next: &FieldValues) -> Vec<String> {
    let empty = FieldValue::empty();
    let ids: BTreeSet<&String> = previous.keys().chain(next.keys()).collect();
    ids.into_iter()
        .filter(|id| {
            let before = previous.get(*id).unwrap_or(&empty);
            let after = next.get(*id).unwrap_or(&empty);
            before != after
        })
        .cloned()
        .collect()
}

/// 髒標記追蹤器
#[derive(Debug, Clone, Default)]
pub struct DirtyTracker {
    dirty_fields: BTreeSet<String>,
}

impl DirtyTracker {
    /// 創建新的追蹤器
    pub fn new() -> Self {
        Self::default()
    }

    /// 標記欄位為髒
    pub fn mark_dirty(&mut self, field_id: impl Into<String>) {
        self.dirty_fields.insert(field_id.into());
    }

    /// 比較前後兩組值並標記變動的欄位，回傳本次新增的數量
    pub fn mark_changes(&mut self, previous: &FieldValues, next: &FieldValues) -> usize {
        changed_fields(previous, next)
            .into_iter()
            .filter(|id| self.dirty_fields.insert(id.clone()))
            .count()
    }

    /// 檢查欄位是否為髒
    pub fn is_dirty(&self, field_id: &str) -> bool {
        self.dirty_fields.contains(field_id)
    }

    pub fn is_clean(&self) -> bool {
        self.dirty_fields.is_empty()
    }

    /// 清除所有髒標記
    pub fn clear(&mut self) {
        self.dirty_fields.clear();
    }

    /// 獲取所有髒欄位
    pub fn dirty_fields(&self) -> Vec<String> {
        self.dirty_fields.iter().cloned().collect()
    }

    /// 取出並清除所有髒欄位
    pub fn take(&mut self) -> Vec<String> {
        std::mem::take(&mut self.dirty_fields).into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> FieldValues {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), FieldValue::text(*v)))
            .collect()
    }

    #[test]
    fn test_changed_fields() {
        let before = values(&[("lamel_color", "beyaz"), ("movement", "manuel"), ("remote", "")]);
        let after = values(&[("lamel_color", "antrasit"), ("movement", "manuel"), ("box_color", "beyaz")]);
        // remote: "" → 缺少，視為未變
        assert_eq!(changed_fields(&before, &after), vec!["box_color", "lamel_color"]);
        assert!(changed_fields(&after, &after).is_empty());
    }

    #[test]
    fn test_tracker_accumulates_until_taken() {
        let mut tracker = DirtyTracker::new();
        assert!(tracker.is_clean());

        let a = values(&[("movement", "manuel")]);
        let b = values(&[("movement", "motorlu")]);
        assert_eq!(tracker.mark_changes(&a, &b), 1);
        assert_eq!(tracker.mark_changes(&a, &b), 0);
        tracker.mark_dirty("lamel_color");

        assert!(tracker.is_dirty("movement"));
        assert_eq!(tracker.dirty_fields(), vec!["lamel_color", "movement"]);
        assert_eq!(tracker.take(), vec!["lamel_color", "movement"]);
        assert!(tracker.is_clean());
    }
}
