//! 捲簾窗報價範例
//!
//! 兩區段電動捲簾窗：載入目錄、設定表單、計算報價並換算匯率。

use anyhow::Context;
use chrono::Utc;
use rust_decimal::Decimal;
use shutter_cache::ExchangeRateCache;
use shutter_calc::QuoteCalculator;
use shutter_core::*;
use shutter_rules::{box_size_options, motor_options, MotorAdvice};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("===== Panjur Quote Example =====\n");

    // 步驟 1: 載入目錄
    println!("[1] Load catalog");
    let catalog = Catalog::from_json(include_str!("../tests/fixtures/catalog.json"))
        .context("目錄載入失敗")?;
    println!("    Items: {}\n", catalog.len());

    // 步驟 2: 尺寸對應的可用箱體與馬達
    let width = Decimal::from(3200);
    let height = Decimal::from(1800);
    println!("[2] Filter options for {width} x {height}");
    let (boxes, adjustment) = box_size_options(
        height,
        HeightConvention::IncludesBox,
        MountingStyle::Distan,
        LamelType::Sl39,
        Some(BoxSize(137)),
    );
    for option in &boxes {
        println!("    Box {} ({})", option.size, option.movement.tag());
    }
    let box_size = boxes.first().map(|o| o.size).unwrap_or(BoxSize(165));
    if let Some(adjustment) = adjustment {
        println!("    -> {}", adjustment.reason);
    }

    let area = shutter_calc::capacity::area_m2(width, height);
    let motor = match motor_options(LamelType::Sl39, MotorBrand::Mosel, area, None) {
        MotorAdvice::Options { models, .. } => {
            println!("    Motors: {}", models.join(", "));
            models.into_iter().next()
        }
        MotorAdvice::FallbackToManual => {
            println!("    No motor fits, falling back to manual");
            None
        }
    };
    println!();

    // 步驟 3: 報價選項
    println!("[3] Build selections");
    let mut selections = PanjurSelections::new(width, height, LamelType::Sl39, box_size)
        .with_layout(SectionLayout::single().with_dividers(vec![Decimal::from(1600)]))
        .with_color("lamel_color", "beyaz")
        .with_packaging(true);
    if let Some(model) = motor {
        selections = selections
            .with_motor(MotorBrand::Mosel, model)
            .with_tube_type(TubeType::Octagonal60)
            .with_remote("situo_1");
    }
    println!("    Sections: {}\n", selections.layout.section_count());

    // 步驟 4: 計算
    println!("[4] Calculate");
    let calculator = QuoteCalculator::new(catalog);
    let result = calculator.calculate(&Selections::Panjur(selections))?;

    println!("\n    {:<32} {:>8} {:>8} {:>10}", "Item", "Qty", "Size", "Total");
    for line in result.selected_products.lines() {
        let size = line.size.map(|s| s.to_string()).unwrap_or_default();
        println!(
            "    {:<32} {:>8} {:>8} {:>10}",
            line.display_name(),
            line.quantity,
            size,
            line.total_price
        );
    }
    println!("\n    Total: {} EUR", result.total_price);
    for warning in &result.warnings {
        println!("    ! {:?}: {}", warning.kind, warning.message);
    }

    // 步驟 5: 匯率換算
    let now = Utc::now();
    let rate = ExchangeRateCache::new("EUR/TRY", Decimal::new(4887, 2), now)?;
    println!("    Total: {} TRY", rate.convert(result.total_price, now)?);

    Ok(())
}
