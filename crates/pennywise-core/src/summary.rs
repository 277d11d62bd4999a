//! Financial summary
//!
//! The headline figures shown next to the plot, plus the currency formatting
//! used across the CLI.

use serde::Serialize;

use crate::models::{DerivedMetrics, FinancialCategory};

/// Summary of a user's month
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FinancialSummary {
    pub category: FinancialCategory,
    pub monthly_income: f64,
    pub monthly_spending: f64,
    pub savings_amount: f64,
    pub budget_margin: f64,
    pub savings_rate: f64,
}

impl FinancialSummary {
    pub fn new(metrics: &DerivedMetrics, category: FinancialCategory) -> Self {
        Self {
            category,
            monthly_income: metrics.monthly_income,
            monthly_spending: metrics.monthly_spending,
            savings_amount: metrics.savings_amount,
            budget_margin: metrics.budget_margin,
            savings_rate: metrics.savings_rate,
        }
    }

    /// True when the assigned category contradicts the savings sign
    pub fn category_mismatch(&self) -> bool {
        match self.category {
            FinancialCategory::Saver => self.savings_amount < 0.0,
            FinancialCategory::Overspender => self.savings_amount > 0.0,
            FinancialCategory::Balanced => false,
        }
    }

    /// Whether the month ends with money left over
    pub fn is_saving(&self) -> bool {
        self.savings_amount >= 0.0
    }
}

/// `$1,234.50`; non-finite values render as `N/A`
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }
    format!("${}", group_thousands(value.abs()))
}

/// `$1,234.50` or `-$1,234.50`
pub fn format_signed_currency(value: f64) -> String {
    if value < 0.0 {
        format!("-{}", format_currency(value))
    } else {
        format_currency(value)
    }
}

/// `+$120.00` or `-$7,320.00`, as margins are shown on the plot
pub fn format_margin(value: f64) -> String {
    if value >= 0.0 {
        format!("+{}", format_currency(value))
    } else {
        format_signed_currency(value)
    }
}

/// `-325.3%`, or `N/A` when income was zero
pub fn format_rate(value: f64) -> String {
    if value.is_finite() {
        format!("{:.1}%", value)
    } else {
        "N/A".to_string()
    }
}

fn group_thousands(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("{}.{}", grouped, cents)
}
