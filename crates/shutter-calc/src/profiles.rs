//! 型材與數量計算
//!
//! 全部為純函式，不依賴目錄。

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use shutter_core::{BoxSize, LamelType, PostType};

/// 吊片數量級距：(寬度上限 mm, 數量)
const HANGER_BRACKETS: [(i64, u32); 4] = [(1000, 2), (1500, 4), (2250, 6), (3500, 8)];

/// 超過最後級距時的吊片數
const HANGER_MAX: u32 = 10;

/// 型材計算器
pub struct ProfileCalculator;

impl ProfileCalculator {
    /// 葉片數量：`floor((區段高 − 箱高/2) / 覆蓋面) + 1`
    pub fn lamel_count(section_height: Decimal, box_size: BoxSize, lamel: LamelType) -> u32 {
        let curtain = (section_height - box_size.height() / Decimal::from(2)).max(Decimal::ZERO);
        let slats = (curtain / lamel.cover_surface()).floor();
        slats.to_u32().unwrap_or(0) + 1
    }

    /// 葉片寬度：區段寬扣除兩側餘量
    pub fn lamel_width(section_width: Decimal, post: PostType) -> Decimal {
        section_width - Decimal::from(2) * post.edge_allowance()
    }

    /// 立柱長度：系統高度扣除箱高
    pub fn post_height(system_height: Decimal, box_size: BoxSize) -> Decimal {
        system_height - box_size.height()
    }

    /// 單一區段的吊片數
    pub fn hanger_count(section_width: Decimal) -> u32 {
        HANGER_BRACKETS
            .iter()
            .find(|(limit, _)| section_width <= Decimal::from(*limit))
            .map(|(_, count)| *count)
            .unwrap_or(HANGER_MAX)
    }

    /// 全部區段吊片數合計
    pub fn total_hangers(section_widths: &[Decimal]) -> u32 {
        section_widths.iter().map(|w| Self::hanger_count(*w)).sum()
    }

    /// 毛刷條總長（公尺）
    ///
    /// 每支立柱兩面各一條。
    pub fn seal_length(post_lengths: &[Decimal]) -> Decimal {
        let total: Decimal = post_lengths.iter().sum();
        total * Decimal::from(2) / Decimal::from(1000)
    }

    /// 端塞數量：各區段葉片數進位到偶數後加總
    pub fn plug_count(lamel_counts: &[u32]) -> u32 {
        lamel_counts.iter().map(|n| n + n % 2).sum()
    }

    /// 釘線數量與端塞相同
    pub fn staple_count(lamel_counts: &[u32]) -> u32 {
        Self::plug_count(lamel_counts)
    }

    /// 捲門釘數：`ceil(葉片數 / 2)`
    pub fn staple_nail_count(lamel_count: u32) -> u32 {
        lamel_count.div_ceil(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn d(v: i64) -> Decimal {
        Decimal::from(v)
    }

    #[test]
    fn test_lamel_count() {
        // (2500 − 150) / 77 = 30.5 → 30 + 1
        assert_eq!(ProfileCalculator::lamel_count(d(2500), BoxSize(300), LamelType::St77), 31);
        // (1500 − 68.5) / 39 = 36.7 → 36 + 1
        assert_eq!(ProfileCalculator::lamel_count(d(1500), BoxSize(137), LamelType::Sl39), 37);
        // 高度不足箱體一半時至少一片
        assert_eq!(ProfileCalculator::lamel_count(d(50), BoxSize(137), LamelType::Sl39), 1);
    }

    #[test]
    fn test_lamel_width() {
        assert_eq!(ProfileCalculator::lamel_width(d(2000), PostType::Kepenk77), d(1866));
        assert_eq!(ProfileCalculator::lamel_width(d(1000), PostType::Mini), d(926));
    }

    #[test]
    fn test_post_height() {
        assert_eq!(ProfileCalculator::post_height(d(1600), BoxSize(165)), d(1435));
    }

    #[rstest]
    #[case(900, 2)]
    #[case(1000, 2)]
    #[case(1001, 4)]
    #[case(1500, 4)]
    #[case(2250, 6)]
    #[case(2251, 8)]
    #[case(3500, 8)]
    #[case(3501, 10)]
    fn test_hanger_brackets(#[case] width: i64, #[case] expected: u32) {
        assert_eq!(ProfileCalculator::hanger_count(d(width)), expected);
    }

    #[test]
    fn test_total_hangers() {
        assert_eq!(ProfileCalculator::total_hangers(&[d(1200), d(2600)]), 12);
    }

    #[test]
    fn test_seal_length_in_meters() {
        // (1500 + 1800 + 1200) × 2 / 1000
        let length = ProfileCalculator::seal_length(&[d(1500), d(1800), d(1200)]);
        assert_eq!(length, Decimal::new(9, 0));
    }

    #[test]
    fn test_plug_and_staple_counts() {
        assert_eq!(ProfileCalculator::plug_count(&[31, 20]), 52);
        assert_eq!(ProfileCalculator::staple_count(&[7]), 8);
        assert_eq!(ProfileCalculator::staple_nail_count(31), 16);
        assert_eq!(ProfileCalculator::staple_nail_count(30), 15);
    }
}
