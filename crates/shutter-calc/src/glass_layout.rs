//! 玻璃陽台玻璃片配置
//!
//! 每支臂的玻璃片依「左固定 → 左開啟扇 → 活動片 → 右開啟扇 → 右固定」排列，
//! 活動片與開啟扇平分扣除側框、間隔型材與固定片之後的寬度。

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use shutter_core::{GlassArm, GlassThickness, Side};

/// 上下框高度 63.5
const FRAME_RAIL: Decimal = Decimal::from_parts(635, 0, 0, false, 1);

/// 扇料高度 32.5
const WING_RAIL: Decimal = Decimal::from_parts(325, 0, 0, false, 1);

/// 端部側框寬
const SIDE_PROFILE: i64 = 25;

/// 轉角側框寬（不含轉角片）
const CORNER_PROFILE: i64 = 16;

/// 開啟扇旁的型材寬
const EXIT_PROFILE: i64 = 49;

/// 玻璃片類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelKind {
    FixedLeft,
    FixedRight,
    ExitLeft,
    ExitRight,
    Sliding,
}

impl PanelKind {
    pub fn is_fixed(&self) -> bool {
        matches!(self, Self::FixedLeft | Self::FixedRight)
    }

    /// 活動片與開啟扇
    pub fn is_moving(&self) -> bool {
        !self.is_fixed()
    }
}

/// 單片玻璃
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub kind: PanelKind,
    pub width: Decimal,
    pub height: Decimal,
    /// 右側間隔型材寬
    pub spacing: Decimal,
}

/// 玻璃清單的一行（同一支臂內同尺寸合併）
#[derive(Debug, Clone, PartialEq)]
pub struct GlassPane {
    pub arm: usize,
    pub count: u32,
    pub width: Decimal,
    pub height: Decimal,
    pub thickness: Decimal,
    pub area_m2: Decimal,
}

/// 長度取到小數一位（中點遠離零）
pub(crate) fn round_length(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

/// 玻璃片配置計算器
pub struct GlassLayout;

impl GlassLayout {
    /// 轉角片寬：`20 × tan(90° − 角度/2)`
    ///
    /// 大於 180° 的外角先折為內角；0 或超出 0–360 的角度視為 90°。
    pub fn turn_piece(angle: Decimal) -> Decimal {
        let degrees = angle
            .to_f64()
            .filter(|a| *a > 0.0 && *a <= 360.0)
            .unwrap_or(90.0);
        let folded = if degrees > 180.0 { 360.0 - degrees } else { degrees };
        let piece = 20.0 * (std::f64::consts::FRAC_PI_2 - folded.to_radians() / 2.0).tan();
        Decimal::from_f64(piece.abs())
            .unwrap_or(Decimal::ZERO)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// 第 `index` 支臂與前一支臂的轉角；第一支臂與 0° 視為沒有轉角
    pub fn joint_angle(arms: &[GlassArm], index: usize) -> Option<Decimal> {
        if index == 0 {
            return None;
        }
        arms.get(index)
            .and_then(|a| a.angle)
            .filter(|a| !a.is_zero())
    }

    /// 有轉角的接縫數
    pub fn corner_count(arms: &[GlassArm]) -> u32 {
        (1..arms.len())
            .filter(|i| Self::joint_angle(arms, *i).is_some())
            .count() as u32
    }

    /// 玻璃淨高：系統高扣除上下框與上下扇料
    pub fn glass_height(height: Decimal) -> Decimal {
        height - FRAME_RAIL * Decimal::from(2) - WING_RAIL * Decimal::from(2)
    }

    fn side_profile(angle: Option<Decimal>) -> Decimal {
        match angle {
            Some(a) => Decimal::from(CORNER_PROFILE) + Self::turn_piece(a),
            None => Decimal::from(SIDE_PROFILE),
        }
    }

    /// 軌道長度：臂寬，兩端接縫為外角（> 180°）時各加兩倍轉角片
    pub fn rail_length(arms: &[GlassArm], index: usize) -> Decimal {
        let Some(arm) = arms.get(index) else {
            return Decimal::ZERO;
        };
        let reflex = |angle: Option<Decimal>| match angle {
            Some(a) if a > Decimal::from(180) => Decimal::from(2) * Self::turn_piece(a),
            _ => Decimal::ZERO,
        };
        arm.width + reflex(Self::joint_angle(arms, index)) + reflex(Self::joint_angle(arms, index + 1))
    }

    fn sequence(arm: &GlassArm) -> Vec<PanelKind> {
        let sliding = arm
            .panels
            .saturating_sub(arm.fixed_count)
            .saturating_sub(arm.exits) as usize;
        let fixed = arm.fixed_count as usize;

        let mut kinds = Vec::with_capacity(sliding + fixed + 2);
        if arm.fixed_side == Side::Left {
            kinds.extend(std::iter::repeat(PanelKind::FixedLeft).take(fixed));
        }
        if arm.exits > 0 && arm.exit_side.has_left() {
            kinds.push(PanelKind::ExitLeft);
        }
        kinds.extend(std::iter::repeat(PanelKind::Sliding).take(sliding));
        if arm.exits > 0 && arm.exit_side.has_right() {
            kinds.push(PanelKind::ExitRight);
        }
        if arm.fixed_side == Side::Right {
            kinds.extend(std::iter::repeat(PanelKind::FixedRight).take(fixed));
        }
        kinds
    }

    /// 單支臂的玻璃片（由左至右）
    pub fn arm_panels(
        arms: &[GlassArm],
        index: usize,
        height: Decimal,
        thickness: GlassThickness,
    ) -> Vec<Panel> {
        let Some(arm) = arms.get(index) else {
            return Vec::new();
        };
        let kinds = Self::sequence(arm);
        let between = thickness.glass_spacing();
        let exit = Decimal::from(EXIT_PROFILE);

        // 開啟扇右側一律 49，兩扇相鄰為 98；右開啟扇左側同為 49
        let spacings: Vec<Decimal> = kinds
            .iter()
            .enumerate()
            .map(|(i, kind)| match (kind, kinds.get(i + 1)) {
                (_, None) => Decimal::ZERO,
                (PanelKind::ExitLeft, Some(PanelKind::ExitRight)) => exit * Decimal::from(2),
                (PanelKind::ExitLeft, _) => exit,
                (_, Some(PanelKind::ExitRight)) => exit,
                _ => between,
            })
            .collect();

        let leading = match kinds.first() {
            Some(PanelKind::ExitRight) => exit,
            _ => Decimal::ZERO,
        };
        let trailing = match kinds.last() {
            Some(PanelKind::ExitLeft) => exit,
            _ => Decimal::ZERO,
        };
        let total_spacing = leading + trailing + spacings.iter().sum::<Decimal>();

        let left = if index == 0 {
            Decimal::from(SIDE_PROFILE)
        } else {
            Self::side_profile(Self::joint_angle(arms, index))
        };
        let right = if index + 1 == arms.len() {
            Decimal::from(SIDE_PROFILE)
        } else {
            Self::side_profile(Self::joint_angle(arms, index + 1))
        };

        let fixed_total = Decimal::from(arm.fixed_count) * arm.fixed_width;
        let usable = arm.width - left - right - total_spacing - fixed_total;
        let moving = kinds.iter().filter(|k| k.is_moving()).count();
        let moving_width = if moving > 0 {
            usable / Decimal::from(moving)
        } else {
            Decimal::ZERO
        };

        let glass_height = Self::glass_height(height);
        kinds
            .into_iter()
            .zip(spacings)
            .map(|(kind, spacing)| Panel {
                kind,
                width: if kind.is_fixed() { arm.fixed_width } else { moving_width },
                height: glass_height,
                spacing,
            })
            .collect()
    }

    /// 活動片之間的間隔數
    pub fn sliding_gaps(panels: &[Panel]) -> u32 {
        let sliding = panels.iter().filter(|p| p.kind == PanelKind::Sliding).count() as u32;
        sliding.saturating_sub(1)
    }

    /// 固定片與活動片相鄰的間隔數（開啟扇不計）
    pub fn fixed_sliding_gaps(panels: &[Panel]) -> u32 {
        panels
            .windows(2)
            .filter(|pair| {
                let (a, b) = (pair[0].kind, pair[1].kind);
                (a.is_fixed() && b == PanelKind::Sliding) || (a == PanelKind::Sliding && b.is_fixed())
            })
            .count() as u32
    }

    /// 玻璃清單：各臂內同尺寸合併並依寬度排序，臂與臂之間不合併
    pub fn panes(arm_panels: &[Vec<Panel>], thickness: GlassThickness) -> Vec<GlassPane> {
        let mut panes = Vec::new();
        for (arm, panels) in arm_panels.iter().enumerate() {
            let mut rows: Vec<GlassPane> = Vec::new();
            for panel in panels {
                let width = round_length(panel.width);
                let height = round_length(panel.height);
                match rows.iter_mut().find(|r| r.width == width && r.height == height) {
                    Some(row) => row.count += 1,
                    None => rows.push(GlassPane {
                        arm,
                        count: 1,
                        width,
                        height,
                        thickness: thickness.millimeters(),
                        area_m2: Decimal::ZERO,
                    }),
                }
            }
            for row in rows.iter_mut() {
                row.area_m2 = row.width * row.height * Decimal::from(row.count) / Decimal::from(1_000_000);
            }
            rows.sort_by(|a, b| a.width.cmp(&b.width));
            panes.extend(rows);
        }
        panes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shutter_core::ExitSide;

    fn d(v: i64) -> Decimal {
        Decimal::from(v)
    }

    fn widths(panels: &[Panel]) -> Vec<Decimal> {
        panels.iter().map(|p| round_length(p.width)).collect()
    }

    #[test]
    fn test_turn_piece() {
        assert_eq!(GlassLayout::turn_piece(d(90)), d(20));
        assert_eq!(GlassLayout::turn_piece(d(270)), d(20));
        // 20 × tan(22.5°)
        assert_eq!(GlassLayout::turn_piece(d(135)), Decimal::new(828, 2));
        assert_eq!(GlassLayout::turn_piece(d(225)), Decimal::new(828, 2));
        assert_eq!(GlassLayout::turn_piece(d(180)), Decimal::ZERO);
        // 無效角度視為 90°
        assert_eq!(GlassLayout::turn_piece(d(0)), d(20));
        assert_eq!(GlassLayout::turn_piece(d(400)), d(20));
    }

    #[test]
    fn test_all_sliding_arm() {
        let arms = vec![GlassArm::new(d(3000), 5)];
        let panels = GlassLayout::arm_panels(&arms, 0, d(2200), GlassThickness::Mm24);
        // (3000 − 25 − 25 − 4 × 19) / 5
        assert_eq!(widths(&panels), vec![Decimal::new(5748, 1); 5]);
        assert!(panels.iter().all(|p| p.height == d(2008)));
        assert_eq!(panels.last().unwrap().spacing, Decimal::ZERO);
        assert_eq!(GlassLayout::sliding_gaps(&panels), 4);
        assert_eq!(GlassLayout::fixed_sliding_gaps(&panels), 0);
    }

    #[test]
    fn test_exit_and_fixed_panels() {
        let arms = vec![GlassArm::new(d(3000), 5)
            .with_exits(1, ExitSide::Left)
            .with_fixed(1, d(500), Side::Right)];
        let panels = GlassLayout::arm_panels(&arms, 0, d(2200), GlassThickness::Mm24);
        let kinds: Vec<_> = panels.iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![
                PanelKind::ExitLeft,
                PanelKind::Sliding,
                PanelKind::Sliding,
                PanelKind::Sliding,
                PanelKind::FixedRight,
            ]
        );
        // 間隔 49 + 19 × 3；(3000 − 50 − 106 − 500) / 4
        assert_eq!(panels[0].spacing, d(49));
        assert_eq!(panels[0].width, Decimal::new(586, 0));
        assert_eq!(panels[4].width, d(500));
        assert_eq!(GlassLayout::sliding_gaps(&panels), 2);
        assert_eq!(GlassLayout::fixed_sliding_gaps(&panels), 1);
    }

    #[test]
    fn test_adjacent_exits_double_profile() {
        let arms = vec![GlassArm::new(d(1500), 1).with_exits(1, ExitSide::Both)];
        let panels = GlassLayout::arm_panels(&arms, 0, d(2000), GlassThickness::Mm24);
        assert_eq!(panels.len(), 2);
        assert_eq!(panels[0].spacing, d(98));
        // (1500 − 50 − 98) / 2
        assert_eq!(widths(&panels), vec![d(676), d(676)]);

        // 右開啟扇在最左側時左邊加 49
        let arms = vec![GlassArm::new(d(1000), 1).with_exits(1, ExitSide::Right)];
        let panels = GlassLayout::arm_panels(&arms, 0, d(2000), GlassThickness::Mm24);
        assert_eq!(widths(&panels), vec![d(901)]);
    }

    #[test]
    fn test_corner_profiles_and_rails() {
        let arms = vec![
            GlassArm::new(d(2000), 3),
            GlassArm::new(d(2000), 3).with_angle(d(90)),
        ];
        let first = GlassLayout::arm_panels(&arms, 0, d(2200), GlassThickness::Mm24);
        // 右側轉角框 16 + 20：(2000 − 25 − 36 − 38) / 3
        assert_eq!(widths(&first), vec![Decimal::new(6337, 1); 3]);
        let second = GlassLayout::arm_panels(&arms, 1, d(2200), GlassThickness::Mm24);
        assert_eq!(widths(&second), widths(&first));
        assert_eq!(GlassLayout::corner_count(&arms), 1);
        // 90° 為內角，軌道不加長
        assert_eq!(GlassLayout::rail_length(&arms, 0), d(2000));

        let arms = vec![
            GlassArm::new(d(2000), 3).with_angle(d(270)),
            GlassArm::new(d(2000), 3).with_angle(d(270)),
        ];
        // 第一支臂的角度不計
        assert_eq!(GlassLayout::corner_count(&arms), 1);
        assert_eq!(GlassLayout::rail_length(&arms, 0), d(2040));
        assert_eq!(GlassLayout::rail_length(&arms, 1), d(2040));
    }

    #[test]
    fn test_panes_grouped_per_arm() {
        let arms = vec![
            GlassArm::new(d(3000), 5)
                .with_exits(1, ExitSide::Left)
                .with_fixed(1, d(500), Side::Right),
            GlassArm::new(d(1000), 1),
        ];
        let panels: Vec<_> = (0..arms.len())
            .map(|i| GlassLayout::arm_panels(&arms, i, d(1192), GlassThickness::Mm24))
            .collect();
        let panes = GlassLayout::panes(&panels, GlassThickness::Mm24);
        let rows: Vec<_> = panes.iter().map(|p| (p.arm, p.count, p.width)).collect();
        assert_eq!(rows, vec![(0, 1, d(500)), (0, 4, d(586)), (1, 1, d(950))]);
        // 586 × 1000 × 4 / 10⁶
        assert_eq!(panes[1].area_m2, Decimal::new(2344, 3));
        assert_eq!(panes[0].thickness, d(24));
    }
}
