//! Submission and population comparison

use std::path::Path;

use anyhow::{bail, Result};
use pennywise_core::summary::{format_currency, format_signed_currency};
use pennywise_core::{BackendApi, ComparisonRow, Config, Error, Standing, StudentProfile};

use super::{build_dashboard, category_badge, load_inputs};
use crate::cli::{InputArgs, ProfileArgs};

impl From<&ProfileArgs> for StudentProfile {
    fn from(args: &ProfileArgs) -> Self {
        Self {
            age: args.age,
            gender: args.gender.trim().to_string(),
            year_in_school: args.year.trim().to_string(),
            major: args.major.trim().to_string(),
            preferred_payment_method: args.payment.trim().to_string(),
        }
    }
}

pub async fn cmd_compare(
    config: &Config,
    profile: &ProfileArgs,
    input: &InputArgs,
    population: Option<&Path>,
    offline: bool,
) -> Result<()> {
    let inputs = load_inputs(input)?;
    let profile = StudentProfile::from(profile);
    let dashboard = build_dashboard(config, population, offline)?;

    let data = dashboard.load_dataset().await;
    let analysis = dashboard.analyze(&inputs, &data.value).await;
    println!();
    println!("   Your category: {}", category_badge(analysis.category));

    println!("📤 Submitting to {} backend...", dashboard.backend().name());
    let rows = match dashboard.submit(&profile, &inputs).await {
        Ok(rows) => rows,
        Err(Error::Validation(errors)) => {
            println!("❌ Please fix the following:");
            for error in &errors {
                println!("   • {}", error);
            }
            bail!("Submission blocked by {} invalid field(s)", errors.len());
        }
        Err(e) => {
            println!("❌ Submission failed. Please try again.");
            return Err(e.into());
        }
    };

    println!("✅ Submitted");
    print_comparison(&rows);
    Ok(())
}

fn print_comparison(rows: &[ComparisonRow]) {
    println!();
    println!("📊 You vs. Average Student");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   {:<20} {:>12} {:>12} {:>13}", "", "You", "Average", "Difference");

    for row in rows {
        let arrow = match row.standing {
            Standing::Higher => "▲",
            Standing::Lower => "▼",
            Standing::Equal => "=",
        };
        let percent = row
            .percent
            .map(|p| format!("{:.0}%", p))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "   {:<20} {:>12} {:>12} {:>13} {} {}",
            row.label,
            format_currency(row.user),
            format_currency(row.average),
            format_signed_currency(row.difference),
            arrow,
            percent
        );
    }

    let higher = rows.iter().filter(|r| r.standing == Standing::Higher).count();
    println!();
    println!("   Above average on {} of {} figures.", higher, rows.len());
}
