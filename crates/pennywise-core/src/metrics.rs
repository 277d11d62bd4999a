//! Metric derivation
//!
//! Turns raw, mixed-period inputs into monthly figures and the user's point
//! on the classification plot. Everything here is pure arithmetic.

use crate::fields::{InputField, ReportingPeriod};
use crate::models::{DerivedMetrics, RawFinancialInputs};

/// Months per semester used to spread semester-billed amounts
pub const DEFAULT_SEMESTER_DIVISOR: f64 = 4.0;

/// Normalization parameters for [`derive_metrics`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsConfig {
    /// Divisor applied to tuition, financial aid, and books & supplies
    pub semester_divisor: f64,
    /// How the technology figure is interpreted
    ///
    /// The form labels it annual while the spending sum has always treated it
    /// as monthly. `Monthly` keeps that arithmetic; `Annual` divides by 12.
    pub technology_period: ReportingPeriod,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            semester_divisor: DEFAULT_SEMESTER_DIVISOR,
            technology_period: ReportingPeriod::Monthly,
        }
    }
}

impl MetricsConfig {
    /// Monthly share of a single field's value
    pub fn monthly_amount(&self, field: InputField, value: f64) -> f64 {
        let period = match field {
            InputField::Technology => self.technology_period,
            other => other.period(),
        };
        match period {
            ReportingPeriod::Monthly => value,
            ReportingPeriod::Semester => value / self.semester_divisor,
            ReportingPeriod::Annual => value / 12.0,
        }
    }
}

/// Derive monthly income, spending, margin, and savings figures
///
/// Budget margin is `income - spending`: positive means money left over.
/// A zero income yields a non-finite savings rate rather than an error.
pub fn derive_metrics(inputs: &RawFinancialInputs, config: &MetricsConfig) -> DerivedMetrics {
    let monthly_income = inputs.monthly_income
        + config.monthly_amount(InputField::FinancialAid, inputs.financial_aid);

    let monthly_spending: f64 = inputs
        .iter()
        .filter(|(field, _)| !field.is_income())
        .map(|(field, value)| config.monthly_amount(field, value))
        .sum();

    let savings_amount = monthly_income - monthly_spending;
    let savings_rate = savings_amount / monthly_income * 100.0;

    DerivedMetrics {
        monthly_income,
        monthly_spending,
        budget_margin: savings_amount,
        savings_amount,
        savings_rate,
        user_point_x: savings_amount,
        user_point_y: monthly_spending,
    }
}
