//! 顏色同步
//!
//! 主顏色欄位變更後，其他顏色欄位跟隨：主顏色在該欄位選項內時採用主顏色，
//! 否則改為通用顏色。

use shutter_core::{EngineConfig, FieldSchema, FieldValue, FieldValues};

fn is_color_field(id: &str) -> bool {
    id.to_lowercase().contains("_color")
}

/// 計算需要寫入的顏色欄位（不修改輸入）
///
/// 主顏色為空時不做任何事；已是目標值的欄位不列入。
pub fn sync_colors(
    schema: &FieldSchema,
    values: &FieldValues,
    config: &EngineConfig,
) -> Vec<(String, FieldValue)> {
    let primary = match values
        .get(&config.primary_color_field)
        .and_then(FieldValue::as_text)
    {
        Some(color) if !color.is_empty() => color,
        _ => return Vec::new(),
    };

    schema
        .fields()
        .iter()
        .filter(|f| f.id != config.primary_color_field && is_color_field(&f.id))
        .filter_map(|f| {
            let target = if f.options.iter().any(|o| o == primary) {
                primary
            } else {
                config.universal_default_color.as_str()
            };
            let current = values.get(&f.id).and_then(FieldValue::as_text);
            (current != Some(target)).then(|| (f.id.clone(), FieldValue::text(target)))
        })
        .collect()
}

/// 套用顏色同步，回傳被修改的欄位
pub fn apply_color_sync(
    schema: &FieldSchema,
    values: &mut FieldValues,
    config: &EngineConfig,
) -> Vec<String> {
    let updates = sync_colors(schema, values, config);
    let mut changed = Vec::with_capacity(updates.len());
    for (id, value) in updates {
        tracing::debug!("顏色同步: {} = {}", id, value);
        values.insert(id.clone(), value);
        changed.push(id);
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use shutter_core::FieldSpec;

    fn schema() -> FieldSchema {
        FieldSchema::new(vec![
            FieldSpec::new("lamel_color").with_options(["beyaz", "antrasit", "altin_mese"]),
            FieldSpec::new("box_color").with_options(["beyaz", "antrasit", "ral_boyali"]),
            FieldSpec::new("dikme_color").with_options(["beyaz", "ral_boyali"]),
            FieldSpec::new("subpart_Color").with_options(["antrasit"]),
            FieldSpec::new("movement").with_options(["manuel", "motorlu"]),
        ])
    }

    fn values(pairs: &[(&str, &str)]) -> FieldValues {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), FieldValue::text(*v)))
            .collect()
    }

    #[test]
    fn test_primary_color_or_universal_default() {
        let v = values(&[("lamel_color", "antrasit"), ("box_color", "beyaz")]);
        let updates = sync_colors(&schema(), &v, &EngineConfig::default());
        assert_eq!(
            updates,
            vec![
                ("box_color".to_string(), FieldValue::text("antrasit")),
                ("dikme_color".to_string(), FieldValue::text("ral_boyali")),
                ("subpart_Color".to_string(), FieldValue::text("antrasit")),
            ]
        );
    }

    #[test]
    fn test_unchanged_fields_not_written() {
        let v = values(&[
            ("lamel_color", "beyaz"),
            ("box_color", "beyaz"),
            ("dikme_color", "beyaz"),
        ]);
        let updates = sync_colors(&schema(), &v, &EngineConfig::default());
        // subpart_Color 沒有 beyaz
        assert_eq!(updates, vec![("subpart_Color".to_string(), FieldValue::text("ral_boyali"))]);
    }

    #[test]
    fn test_empty_primary_does_nothing() {
        let mut v = values(&[("lamel_color", ""), ("box_color", "beyaz")]);
        assert!(apply_color_sync(&schema(), &mut v, &EngineConfig::default()).is_empty());
        assert_eq!(v.get("box_color"), Some(&FieldValue::text("beyaz")));
    }

    #[test]
    fn test_apply_writes_values() {
        let mut v = values(&[("lamel_color", "altin_mese")]);
        let config = EngineConfig::default().with_universal_default_color("ral_9016");
        let changed = apply_color_sync(&schema(), &mut v, &config);
        assert_eq!(changed, vec!["box_color", "dikme_color", "subpart_Color"]);
        assert_eq!(v.get("dikme_color"), Some(&FieldValue::text("ral_9016")));
        assert!(!v.contains_key("movement"));
    }
}
