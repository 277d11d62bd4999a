//! Shared command utilities
//!
//! This module contains:
//! - `load_config` - Resolve configuration plus the `--backend-url` flag
//! - `build_dashboard` - Pick the backend (HTTP, built-in sample, or a survey CSV)
//! - `load_inputs` - Read and validate financial figures from a file and `--set` overrides

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use pennywise_core::validate::validate_inputs;
use pennywise_core::{
    parse_population, BackendClient, Config, Dashboard, FinancialCategory, InputField,
    MockBackend, RawFinancialInputs,
};
use tracing::warn;

use crate::cli::InputArgs;

/// Load configuration and apply the `--backend-url` override
pub fn load_config(path: Option<&Path>, backend_url: Option<&str>) -> Result<Config> {
    let mut config = Config::load(path).context("Failed to load configuration")?;
    if let Some(url) = backend_url {
        config.set_backend_url(url);
    }
    Ok(config)
}

/// Build a dashboard over the configured backend
///
/// `--offline` swaps in the built-in sample; a population file swaps in that
/// population and implies offline.
pub fn build_dashboard(
    config: &Config,
    population: Option<&Path>,
    offline: bool,
) -> Result<Dashboard> {
    let backend = match population {
        Some(path) => {
            let file = fs::File::open(path)
                .with_context(|| format!("Failed to open population file {}", path.display()))?;
            let records = parse_population(file)
                .with_context(|| format!("Failed to parse population file {}", path.display()))?;
            if records.is_empty() {
                bail!("Population file {} has no rows", path.display());
            }
            println!(
                "   📂 Population: {} students from {}",
                records.len(),
                path.display()
            );
            BackendClient::Mock(MockBackend::new(config.metrics).with_population(records))
        }
        None if offline => BackendClient::mock(config.metrics),
        None => BackendClient::from_config(config).context("Failed to create backend client")?,
    };

    Ok(Dashboard::new(backend, config.metrics))
}

/// Slider defaults, then the input file, then `--set` overrides
///
/// Every figure must end up finite and non-negative.
pub fn load_inputs(args: &InputArgs) -> Result<RawFinancialInputs> {
    let mut inputs = RawFinancialInputs::default();

    if let Some(path) = &args.input {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file {}", path.display()))?;
        let values = parse_input_file(path, &content)
            .with_context(|| format!("Invalid input file {}", path.display()))?;
        inputs.merge_from(&values);
    }

    for assignment in &args.set {
        let (field, value) = parse_assignment(assignment)?;
        inputs.set(field, value);
    }

    let errors = validate_inputs(&inputs);
    if !errors.is_empty() {
        let details = errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        bail!("Invalid input: {}", details);
    }

    Ok(inputs)
}

/// Parse an input file into a JSON object, by extension (`.json`, else TOML)
///
/// Field keys must hold numbers; other keys are ignored with a warning.
pub fn parse_input_file(
    path: &Path,
    content: &str,
) -> Result<serde_json::Map<String, serde_json::Value>> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let value: serde_json::Value = if is_json {
        serde_json::from_str(content)?
    } else {
        let table: toml::Table = toml::from_str(content)?;
        serde_json::to_value(table)?
    };

    let serde_json::Value::Object(values) = value else {
        bail!("expected a table of field values");
    };

    for (key, value) in &values {
        match key.parse::<InputField>() {
            Ok(field) if !value.is_number() => {
                bail!("{} must be a number, got {}", field, value)
            }
            Ok(_) => {}
            Err(_) => warn!(key = %key, "Ignoring unknown input key"),
        }
    }

    Ok(values)
}

/// Parse `field=value`
pub fn parse_assignment(assignment: &str) -> Result<(InputField, f64)> {
    let Some((name, value)) = assignment.split_once('=') else {
        bail!("Expected FIELD=VALUE, got '{}'", assignment);
    };
    let field: InputField = name
        .parse()
        .with_context(|| {
            format!(
                "Unknown field '{}'; run 'pennywise fields' to list valid names",
                name.trim()
            )
        })?;
    let value: f64 = value
        .trim()
        .parse()
        .with_context(|| format!("Invalid number for {}: '{}'", field, value.trim()))?;
    Ok((field, value))
}

/// Category name with its dashboard colour as an emoji
pub fn category_badge(category: FinancialCategory) -> String {
    format!("{} {}", colour_dot(category.color()), category.label())
}

/// Nearest coloured circle for a `#RRGGBB` colour
fn colour_dot(hex: &str) -> &'static str {
    let channel = |i: usize| {
        hex.get(i..i + 2)
            .and_then(|c| u8::from_str_radix(c, 16).ok())
            .unwrap_or(0)
    };
    let (r, g, b) = (channel(1), channel(3), channel(5));

    if r >= g && r >= b {
        "🔴"
    } else if g >= b {
        "🟢"
    } else {
        "🔵"
    }
}
