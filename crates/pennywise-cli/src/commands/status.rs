//! Informational commands (fields, config)

use anyhow::Result;
use pennywise_core::config::{default_config_path, BACKEND_URL_ENV};
use pennywise_core::summary::format_currency;
use pennywise_core::{Config, InputGroup, RawFinancialInputs};

pub fn cmd_fields() -> Result<()> {
    let defaults = RawFinancialInputs::default();

    println!();
    println!("🧾 Input Fields");
    for group in InputGroup::ALL {
        println!();
        println!("   {}", group.title());
        println!("   ─────────────────────────────────────────────────────────────");
        for field in group.fields() {
            let range = field.range();
            println!(
                "   {:<18} {:<16} {:<9} {:>10}  (0-{}, step {})",
                field.name(),
                field.label(),
                field.period(),
                format_currency(defaults.get(field)),
                range.max,
                range.step
            );
        }
    }
    println!();
    println!("Set a field with --set <name>=<value>, e.g. --set housing=900");

    Ok(())
}

pub fn cmd_config(config: &Config) -> Result<()> {
    println!();
    println!("⚙️  Pennywise Configuration");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Source: {}", config.source);
    println!();
    println!("   Backend:          {}", config.backend.kind);
    println!("   URL:              {}", config.backend.url);
    println!("   Timeout:          {}s", config.backend.timeout.as_secs());
    println!();
    println!("   Semester divisor: {}", config.metrics.semester_divisor);
    println!("   Technology:       {} figure", config.metrics.technology_period);
    println!();
    if let Some(path) = default_config_path() {
        let marker = if path.exists() { "" } else { " (not present)" };
        println!("   Override file:    {}{}", path.display(), marker);
    }
    if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
        println!("   {}={}", BACKEND_URL_ENV, url);
    }
    println!();

    Ok(())
}
