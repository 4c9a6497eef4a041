//! 配件解析
//!
//! 每個產品族以一張規則表描述配件：適用條件、目錄查詢、數量規則。
//! 解析器依表序逐條評估；目錄找不到品項時該行直接略過。

pub mod kepenk;
pub mod panjur;
pub mod sineklik;

use rust_decimal::Decimal;
use shutter_core::{Catalog, CatalogQuery};

use crate::LineDraft;

/// 規則評估所需的結構資訊
pub trait RuleContext {
    /// 區段數
    fn section_count(&self) -> u32;

    /// 立柱數
    fn post_count(&self) -> u32;

    /// 有驅動的區段（組）數
    fn driven_sections(&self) -> u32;

    /// 相同產品的件數（數量乘數）
    fn units(&self) -> u32 {
        1
    }
}

/// 數量規則
pub enum QuantityRule<C> {
    Fixed(u32),
    PerSection,
    PerPost,
    PerDrivenSection { factor: u32 },
    /// 由結構推導的數量（可為小數，例如公尺）
    Derived(fn(&C) -> Decimal),
    /// 帶長度的行：回傳（數量, 長度 mm）
    Length(fn(&C) -> (Decimal, Decimal)),
}

/// 配件規則
pub struct AccessoryRule<C> {
    pub name: &'static str,
    pub applies: fn(&C) -> bool,
    pub query: fn(&C) -> CatalogQuery,
    pub quantity: QuantityRule<C>,
}

impl<C: RuleContext> AccessoryRule<C> {
    /// 計算（數量, 長度）
    fn measure(&self, ctx: &C) -> (Decimal, Option<Decimal>) {
        match &self.quantity {
            QuantityRule::Fixed(n) => (Decimal::from(*n), None),
            QuantityRule::PerSection => (Decimal::from(ctx.section_count()), None),
            QuantityRule::PerPost => (Decimal::from(ctx.post_count()), None),
            QuantityRule::PerDrivenSection { factor } => {
                (Decimal::from(ctx.driven_sections() * factor), None)
            }
            QuantityRule::Derived(f) => (f(ctx), None),
            QuantityRule::Length(f) => {
                let (quantity, size) = f(ctx);
                (quantity, Some(size))
            }
        }
    }
}

/// 配件解析器
pub struct AccessoryResolver;

impl AccessoryResolver {
    /// 依規則表產生配件明細草稿（依表序）
    pub fn resolve<C: RuleContext>(
        catalog: &Catalog,
        rules: &[AccessoryRule<C>],
        ctx: &C,
    ) -> Vec<LineDraft> {
        let units = Decimal::from(ctx.units());
        let mut drafts = Vec::new();

        for rule in rules {
            if !(rule.applies)(ctx) {
                continue;
            }

            let (quantity, size) = rule.measure(ctx);
            if quantity <= Decimal::ZERO {
                continue;
            }

            let query = (rule.query)(ctx);
            match catalog.find_first(&query) {
                Some(item) => {
                    tracing::debug!("配件 {}: {} × {}", rule.name, item.stock_code, quantity);
                    let mut draft = LineDraft::new(item.clone(), quantity * units);
                    draft.size = size;
                    drafts.push(draft);
                }
                None => tracing::debug!("配件 {} 在目錄中找不到，略過", rule.name),
            }
        }

        drafts
    }
}
