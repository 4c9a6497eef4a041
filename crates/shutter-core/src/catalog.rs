//! 價目目錄模型
//!
//! 目錄是一份有序的平面清單，查詢一律線性掃描並取第一筆符合者。

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::{Result, ShutterError};

/// 計價單位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    /// 按件計價
    #[serde(alias = "adet", alias = "Adet")]
    Piece,
    /// 按長度計價（單價為每公尺）
    #[serde(alias = "metre", alias = "Metre")]
    Meter,
}

/// 目錄品項
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub description: String,

    pub stock_code: String,

    #[serde(default)]
    pub manufacturer_code: String,

    /// 類別標籤，例如 `panjur_lamel`
    pub type_tag: String,

    #[serde(default)]
    pub color: String,

    pub unit: Unit,

    /// 單價（十進位字串，計算前一律解析）
    pub unit_price: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lamel_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tube_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movement_tag: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub box_type: Option<String>,

    /// 馬達型號或零件角色
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_tag: Option<String>,
}

impl CatalogItem {
    /// 創建新的目錄品項
    pub fn new(
        description: impl Into<String>,
        stock_code: impl Into<String>,
        type_tag: impl Into<String>,
        unit: Unit,
        unit_price: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            stock_code: stock_code.into(),
            manufacturer_code: String::new(),
            type_tag: type_tag.into(),
            color: String::new(),
            unit,
            unit_price: unit_price.into(),
            lamel_type: None,
            post_type: None,
            tube_type: None,
            movement_tag: None,
            box_type: None,
            model_tag: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_manufacturer_code(mut self, code: impl Into<String>) -> Self {
        self.manufacturer_code = code.into();
        self
    }

    pub fn with_lamel_type(mut self, lamel: impl Into<String>) -> Self {
        self.lamel_type = Some(lamel.into());
        self
    }

    pub fn with_post_type(mut self, post: impl Into<String>) -> Self {
        self.post_type = Some(post.into());
        self
    }

    pub fn with_tube_type(mut self, tube: impl Into<String>) -> Self {
        self.tube_type = Some(tube.into());
        self
    }

    pub fn with_movement_tag(mut self, movement: impl Into<String>) -> Self {
        self.movement_tag = Some(movement.into());
        self
    }

    pub fn with_box_type(mut self, box_type: impl Into<String>) -> Self {
        self.box_type = Some(box_type.into());
        self
    }

    pub fn with_model_tag(mut self, model: impl Into<String>) -> Self {
        self.model_tag = Some(model.into());
        self
    }

    /// 解析單價
    ///
    /// 無法解析時回傳 [`ShutterError::InvalidPrice`]，呼叫端決定是否略過該行。
    pub fn price(&self) -> Result<Decimal> {
        Decimal::from_str(self.unit_price.trim()).map_err(|_| ShutterError::InvalidPrice {
            stock_code: self.stock_code.clone(),
            price: self.unit_price.clone(),
        })
    }
}

/// 目錄查詢條件
///
/// 每個欄位為 `None`（或空清單）表示不限制。
/// `colors` 為有序候選：依序嘗試，第一個能找到品項的顏色勝出。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    pub type_tag: Option<String>,
    pub colors: Vec<String>,
    pub description_contains: Vec<String>,
    pub stock_code: Option<String>,
    pub lamel_type: Option<String>,
    pub post_type: Option<String>,
    pub tube_type: Option<String>,
    pub movement_tag: Option<String>,
    pub box_type: Option<String>,
    pub model_tag: Option<String>,
}

impl CatalogQuery {
    /// 依類別標籤建立查詢
    pub fn of_type(type_tag: impl Into<String>) -> Self {
        Self {
            type_tag: Some(type_tag.into()),
            ..Self::default()
        }
    }

    /// 依庫存代碼建立查詢
    pub fn by_stock_code(stock_code: impl Into<String>) -> Self {
        Self {
            stock_code: Some(stock_code.into()),
            ..Self::default()
        }
    }

    /// 追加一個顏色候選（空字串忽略）
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        let color = color.into();
        if !color.is_empty() && !self.colors.iter().any(|c| c.eq_ignore_ascii_case(&color)) {
            self.colors.push(color);
        }
        self
    }

    /// 依序追加多個顏色候選
    pub fn with_colors<I, S>(self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        colors.into_iter().fold(self, |query, c| query.with_color(c))
    }

    /// 說明欄位必須包含的片段（不分大小寫）
    pub fn containing(mut self, fragment: impl Into<String>) -> Self {
        self.description_contains.push(fragment.into());
        self
    }

    pub fn with_lamel_type(mut self, lamel: impl Into<String>) -> Self {
        self.lamel_type = Some(lamel.into());
        self
    }

    pub fn with_post_type(mut self, post: impl Into<String>) -> Self {
        self.post_type = Some(post.into());
        self
    }

    pub fn with_tube_type(mut self, tube: impl Into<String>) -> Self {
        self.tube_type = Some(tube.into());
        self
    }

    pub fn with_movement_tag(mut self, movement: impl Into<String>) -> Self {
        self.movement_tag = Some(movement.into());
        self
    }

    pub fn with_box_type(mut self, box_type: impl Into<String>) -> Self {
        self.box_type = Some(box_type.into());
        self
    }

    pub fn with_model_tag(mut self, model: impl Into<String>) -> Self {
        self.model_tag = Some(model.into());
        self
    }

    /// 除顏色以外的條件是否符合
    fn matches_attributes(&self, item: &CatalogItem) -> bool {
        fn eq_opt(want: &Option<String>, have: &Option<String>) -> bool {
            match want {
                None => true,
                Some(w) => have.as_deref().is_some_and(|h| h.eq_ignore_ascii_case(w)),
            }
        }

        if let Some(tag) = &self.type_tag {
            if item.type_tag != *tag {
                return false;
            }
        }
        if let Some(code) = &self.stock_code {
            if item.stock_code != *code {
                return false;
            }
        }

        let description = item.description.to_lowercase();
        self.description_contains
            .iter()
            .all(|f| description.contains(&f.to_lowercase()))
            && eq_opt(&self.lamel_type, &item.lamel_type)
            && eq_opt(&self.post_type, &item.post_type)
            && eq_opt(&self.tube_type, &item.tube_type)
            && eq_opt(&self.movement_tag, &item.movement_tag)
            && eq_opt(&self.box_type, &item.box_type)
            && eq_opt(&self.model_tag, &item.model_tag)
    }
}

/// 價目目錄
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }

    /// 從 JSON 陣列載入目錄
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 依查詢找出第一筆符合的品項
    ///
    /// 有顏色候選時，依候選順序逐一掃描；全部落空才回傳 `None`。
    pub fn find_first(&self, query: &CatalogQuery) -> Option<&CatalogItem> {
        if query.colors.is_empty() {
            return self.items.iter().find(|item| query.matches_attributes(item));
        }

        query.colors.iter().find_map(|color| {
            self.items
                .iter()
                .find(|item| item.color.eq_ignore_ascii_case(color) && query.matches_attributes(item))
        })
    }

    /// 依序嘗試多個查詢，回傳第一個命中的品項
    pub fn find_any(&self, queries: &[CatalogQuery]) -> Option<&CatalogItem> {
        queries.iter().find_map(|q| self.find_first(q))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_catalog() -> Catalog {
        Catalog::new(vec![
            CatalogItem::new("39 SL Lamel", "L39-BEYAZ", "panjur_lamel", Unit::Meter, "4.20")
                .with_color("beyaz")
                .with_lamel_type("39_sl"),
            CatalogItem::new("39 SL Lamel", "L39-RAL", "panjur_lamel", Unit::Meter, "5.10")
                .with_color("ral_boyali")
                .with_lamel_type("39_sl"),
            CatalogItem::new("Yan Kapak", "YK-01", "panjur_aksesuar", Unit::Piece, "1,20"),
        ])
    }

    #[test]
    fn test_price_parsing() {
        let catalog = sample_catalog();
        assert_eq!(catalog.items()[0].price().unwrap(), Decimal::new(420, 2));

        // 逗號小數無法解析
        let err = catalog.items()[2].price().unwrap_err();
        assert!(matches!(err, ShutterError::InvalidPrice { .. }));
    }

    #[test]
    fn test_color_candidates_in_order() {
        let catalog = sample_catalog();

        // 指定顏色不存在時退回第二候選
        let query = CatalogQuery::of_type("panjur_lamel")
            .with_lamel_type("39_sl")
            .with_colors(["antrasit", "ral_boyali"]);
        let item = catalog.find_first(&query).unwrap();
        assert_eq!(item.stock_code, "L39-RAL");

        // 不分大小寫
        let query = CatalogQuery::of_type("panjur_lamel").with_color("BEYAZ");
        assert_eq!(catalog.find_first(&query).unwrap().stock_code, "L39-BEYAZ");
    }

    #[test]
    fn test_description_fragment_and_miss() {
        let catalog = sample_catalog();
        let hit = CatalogQuery::of_type("panjur_aksesuar").containing("kapak");
        assert!(catalog.find_first(&hit).is_some());

        let miss = CatalogQuery::of_type("panjur_aksesuar").containing("motor");
        assert!(catalog.find_first(&miss).is_none());

        let fallback = catalog.find_any(&[miss, hit]).unwrap();
        assert_eq!(fallback.stock_code, "YK-01");
    }

    #[test]
    fn test_from_json_accepts_local_unit_names() {
        let json = r#"[
            {"description": "Kıl Fitil", "stock_code": "KF-1", "type_tag": "panjur_aksesuar",
             "unit": "metre", "unit_price": "0.35"}
        ]"#;
        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.items()[0].unit, Unit::Meter);
    }
}
