//! Analysis commands (analyze, classify)

use anyhow::{Context, Result};
use pennywise_core::summary::{format_currency, format_margin, format_rate};
use pennywise_core::{classify, Analysis, Config, DataSource, Point};

use super::{build_dashboard, category_badge, load_inputs};
use crate::cli::InputArgs;

pub async fn cmd_analyze(
    config: &Config,
    input: &InputArgs,
    offline: bool,
    json: bool,
) -> Result<()> {
    let inputs = load_inputs(input)?;
    let dashboard = build_dashboard(config, None, offline)?;

    let data = dashboard.load_dataset().await;
    let analysis = dashboard.analyze(&inputs, &data.value).await;

    if json {
        let output = serde_json::json!({
            "inputs": inputs,
            "analysis": analysis,
            "dataset_source": data.source,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("Failed to serialize analysis")?
        );
        return Ok(());
    }

    print_analysis(&analysis);

    if data.is_fallback() {
        println!("   💡 Backend unavailable: boundaries come from the built-in sample");
    }
    if analysis.metrics_source == DataSource::Fallback {
        println!("   💡 Backend unavailable: metrics were derived locally");
    }

    Ok(())
}

fn print_analysis(analysis: &Analysis) {
    let summary = &analysis.summary;

    println!();
    println!("📊 Financial Analysis");
    println!("   ─────────────────────────────");
    println!("   Category:          {}", category_badge(analysis.category));
    println!("   Monthly income:    {}", format_currency(summary.monthly_income));
    println!("   Monthly spending:  {}", format_currency(summary.monthly_spending));
    println!("   Budget margin:     {}", format_margin(summary.budget_margin));
    println!("   Savings rate:      {}", format_rate(summary.savings_rate));
    println!();
    println!("   {}", analysis.category.description());

    if summary.category_mismatch() {
        println!();
        println!(
            "   ⚠️  Your position is classified as {} but you are {} money each month.",
            analysis.category.label(),
            if summary.is_saving() { "saving" } else { "losing" }
        );
    }
    println!();
}

pub async fn cmd_classify(config: &Config, x: f64, y: f64, offline: bool) -> Result<()> {
    let dashboard = build_dashboard(config, None, offline)?;
    let data = dashboard.load_dataset().await;

    let category = classify(Point::new(x, y), data.value.boundary_coordinates.as_ref());

    println!(
        "({}, {}) → {}",
        format_margin(x),
        format_currency(y),
        category_badge(category)
    );
    if data.is_fallback() {
        println!("   💡 Classified against the built-in boundaries");
    }

    Ok(())
}
