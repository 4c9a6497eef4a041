//! 尺寸與結構解析
//!
//! 將原始量測值換算為系統尺寸，並依中間立柱切分區段。

use rust_decimal::Decimal;
use shutter_core::{BoxSize, HeightConvention, PostType, SectionConnection, ShutterError};

/// 連動區段組（共用一支捲軸與驅動）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionGroup {
    /// 區段索引（由左至右）
    pub sections: Vec<usize>,
    /// 組寬（區段寬度總和）
    pub width: Decimal,
    /// 組高（區段高度最大值）
    pub height: Decimal,
}

/// 尺寸解析器
pub struct DimensionResolver;

impl DimensionResolver {
    /// 系統寬度
    ///
    /// * 含立柱量測：`raw − 10`
    /// * 不含立柱量測：`raw + 2 × 立柱寬 − 10`
    /// * 單側立柱：`raw + 立柱寬 − 10`
    pub fn system_width(
        raw: Decimal,
        convention: shutter_core::WidthConvention,
        post: PostType,
    ) -> Decimal {
        use shutter_core::WidthConvention::*;

        let clearance = Decimal::from(10);
        match convention {
            IncludesPosts => raw - clearance,
            ExcludesPosts => raw + Decimal::from(2) * post.width() - clearance,
            SinglePost => raw + post.width() - clearance,
        }
    }

    /// 系統高度（不做上下限裁切）
    pub fn system_height(raw: Decimal, convention: HeightConvention, box_size: BoxSize) -> Decimal {
        match convention {
            HeightConvention::IncludesBox => raw,
            HeightConvention::ExcludesBox => raw + box_size.height(),
        }
    }

    /// 檢查分隔位置：嚴格遞增、互不相同且落在 `(0, total)` 之內
    pub fn validate_dividers(total: Decimal, dividers: &[Decimal]) -> shutter_core::Result<()> {
        if let Some(bad) = dividers.iter().find(|d| **d <= Decimal::ZERO || **d >= total) {
            return Err(ShutterError::InvalidDividers(format!(
                "位置 {bad} 不在 0 與 {total} 之間"
            )));
        }

        if let Some(pair) = dividers.windows(2).find(|w| w[0] >= w[1]) {
            return Err(ShutterError::InvalidDividers(format!(
                "位置 {} 與 {} 未嚴格遞增",
                pair[0], pair[1]
            )));
        }

        Ok(())
    }

    /// 依分隔位置切分區段寬度
    ///
    /// 以 `[0, d1, …, dn, total]` 的相鄰差值得到 `n + 1` 個區段寬度。
    pub fn section_widths(total: Decimal, dividers: &[Decimal]) -> shutter_core::Result<Vec<Decimal>> {
        Self::validate_dividers(total, dividers)?;

        let mut bounds = Vec::with_capacity(dividers.len() + 2);
        bounds.push(Decimal::ZERO);
        bounds.extend_from_slice(dividers);
        bounds.push(total);

        Ok(bounds.windows(2).map(|w| w[1] - w[0]).collect())
    }

    /// 各區段高度：有覆寫取覆寫值，否則取整體高度
    pub fn section_heights(global: Decimal, overrides: &[Option<Decimal>], count: usize) -> Vec<Decimal> {
        (0..count)
            .map(|i| overrides.get(i).copied().flatten().unwrap_or(global))
            .collect()
    }

    /// 各立柱位置對應的高度
    ///
    /// 左右端立柱取相鄰區段高度，中間立柱取兩側區段的較大值。
    /// 回傳長度為區段數 + 1。
    pub fn post_heights(section_heights: &[Decimal]) -> Vec<Decimal> {
        let (Some(first), Some(last)) = (section_heights.first(), section_heights.last()) else {
            return Vec::new();
        };

        let mut heights = Vec::with_capacity(section_heights.len() + 1);
        heights.push(*first);
        heights.extend(section_heights.windows(2).map(|w| w[0].max(w[1])));
        heights.push(*last);
        heights
    }

    /// 依連動設定合併區段
    ///
    /// 區段 `i` 標記 `Left` 時併入左側組；區段 `i − 1` 標記 `Right` 時亦同。
    pub fn effective_groups(
        widths: &[Decimal],
        heights: &[Decimal],
        connections: &[SectionConnection],
    ) -> Vec<SectionGroup> {
        let connection = |i: usize| connections.get(i).copied().unwrap_or_default();
        let mut groups: Vec<SectionGroup> = Vec::new();

        for (i, width) in widths.iter().enumerate() {
            let height = heights.get(i).copied().unwrap_or_default();
            let joins_left = i > 0
                && (connection(i) == SectionConnection::Left
                    || connection(i - 1) == SectionConnection::Right);

            match groups.last_mut() {
                Some(group) if joins_left => {
                    group.sections.push(i);
                    group.width += *width;
                    group.height = group.height.max(height);
                }
                _ => groups.push(SectionGroup {
                    sections: vec![i],
                    width: *width,
                    height,
                }),
            }
        }

        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shutter_core::WidthConvention;

    fn d(v: i64) -> Decimal {
        Decimal::from(v)
    }

    #[test]
    fn test_section_widths() {
        assert_eq!(DimensionResolver::section_widths(d(2000), &[]).unwrap(), vec![d(2000)]);
        assert_eq!(
            DimensionResolver::section_widths(d(3000), &[d(1200)]).unwrap(),
            vec![d(1200), d(1800)]
        );
        assert_eq!(
            DimensionResolver::section_widths(d(3000), &[d(1000), d(2000)]).unwrap(),
            vec![d(1000), d(1000), d(1000)]
        );
    }

    #[test]
    fn test_invalid_dividers() {
        // 超出範圍
        assert!(DimensionResolver::section_widths(d(2000), &[d(2500)]).is_err());
        // 重複
        assert!(DimensionResolver::section_widths(d(2000), &[d(800), d(800)]).is_err());
        // 未排序
        assert!(DimensionResolver::section_widths(d(3000), &[d(2000), d(1000)]).is_err());
        // 落在端點
        assert!(matches!(
            DimensionResolver::section_widths(d(2000), &[d(0)]),
            Err(ShutterError::InvalidDividers(_))
        ));
    }

    #[test]
    fn test_system_width_conventions() {
        let post = PostType::Mini;
        assert_eq!(
            DimensionResolver::system_width(d(1500), WidthConvention::IncludesPosts, post),
            d(1490)
        );
        assert_eq!(
            DimensionResolver::system_width(d(1500), WidthConvention::ExcludesPosts, post),
            d(1596)
        );
        assert_eq!(
            DimensionResolver::system_width(d(1500), WidthConvention::SinglePost, post),
            d(1543)
        );
    }

    #[test]
    fn test_system_height_conventions() {
        let box_size = BoxSize(165);
        assert_eq!(
            DimensionResolver::system_height(d(1400), HeightConvention::IncludesBox, box_size),
            d(1400)
        );
        assert_eq!(
            DimensionResolver::system_height(d(1400), HeightConvention::ExcludesBox, box_size),
            d(1565)
        );
    }

    #[test]
    fn test_section_heights_with_sparse_overrides() {
        let heights = DimensionResolver::section_heights(d(1500), &[None, Some(d(1800))], 3);
        assert_eq!(heights, vec![d(1500), d(1800), d(1500)]);
    }

    #[test]
    fn test_post_heights_use_max_neighbour() {
        let posts = DimensionResolver::post_heights(&[d(1500), d(1800), d(1200)]);
        assert_eq!(posts, vec![d(1500), d(1800), d(1800), d(1200)]);

        let single = DimensionResolver::post_heights(&[d(1400)]);
        assert_eq!(single, vec![d(1400), d(1400)]);
    }

    #[test]
    fn test_effective_groups() {
        let widths = [d(1000), d(1200), d(800)];
        let heights = [d(1500), d(1600), d(1400)];
        let connections = [
            SectionConnection::None,
            SectionConnection::Left,
            SectionConnection::None,
        ];
        let groups = DimensionResolver::effective_groups(&widths, &heights, &connections);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].sections, vec![0, 1]);
        assert_eq!(groups[0].width, d(2200));
        assert_eq!(groups[0].height, d(1600));
        assert_eq!(groups[1].sections, vec![2]);

        // 無連動設定時每個區段自成一組
        let groups = DimensionResolver::effective_groups(&widths, &heights, &[]);
        assert_eq!(groups.len(), 3);
    }
}
