//! Reference population inspection

use std::path::Path;

use anyhow::Result;
use pennywise_core::{classify_points, BackendApi, Config, FinancialCategory};

use super::{build_dashboard, category_badge};

pub async fn cmd_dataset(config: &Config, population: Option<&Path>, offline: bool) -> Result<()> {
    let dashboard = build_dashboard(config, population, offline)?;
    let data = dashboard.load_dataset().await;

    println!();
    println!("📈 Reference Population");
    println!("   ─────────────────────────────");
    println!("   Source: {} ({})", dashboard.backend().name(), data.source.as_str());

    let points = data.value.points();
    println!("   Students: {}", points.len());

    let boundaries = data.value.boundary_coordinates.as_ref();
    if let Some(boundaries) = boundaries {
        for (name, line) in [
            ("saver/balanced", &boundaries.saver_balanced),
            ("balanced/overspender", &boundaries.balanced_overspender),
        ] {
            match line.as_slice() {
                [a, b, ..] => println!(
                    "   Boundary {}: ({:.0}, {:.0}) → ({:.0}, {:.0})",
                    name, a.x, a.y, b.x, b.y
                ),
                _ => println!("   Boundary {}: (missing)", name),
            }
        }
    }

    let report = classify_points(&points, boundaries);
    println!();
    for category in FinancialCategory::ALL {
        println!("   {:<16} {:>5}", category_badge(category), report.count(category));
    }

    println!();
    match report.agreement() {
        Some(agreement) => println!(
            "   Agreement with backend labels: {:.1}% ({} of {})",
            agreement * 100.0,
            report.agreeing,
            report.agreeing + report.disagreeing
        ),
        None => println!("   No backend labels to compare against"),
    }
    if report.unlabelled > 0 {
        println!("   ⚠️  {} points carry an unknown label", report.unlabelled);
    }
    println!();

    Ok(())
}
