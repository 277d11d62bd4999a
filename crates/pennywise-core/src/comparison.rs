//! Comparison against population averages

use serde::Serialize;

use crate::fields::InputField;
use crate::models::{PopulationAverages, RawFinancialInputs, StudentProfile};

/// Where the user stands relative to the average
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Standing {
    Higher,
    Lower,
    Equal,
}

impl Standing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Higher => "higher",
            Self::Lower => "lower",
            Self::Equal => "equal",
        }
    }
}

/// One bar pair of the comparison chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub key: String,
    pub label: String,
    pub user: f64,
    pub average: f64,
    pub difference: f64,
    /// `|difference| / average * 100`, absent when the average is zero
    pub percent: Option<f64>,
    pub standing: Standing,
}

/// Compare the user's raw figures with each reported average
///
/// Rows follow the averages' keys in sorted order. `age` compares against
/// the profile; other keys that are not input fields compare against zero.
pub fn compare(
    averages: &PopulationAverages,
    profile: &StudentProfile,
    inputs: &RawFinancialInputs,
) -> Vec<ComparisonRow> {
    averages
        .all_users_average
        .iter()
        .map(|(key, &average)| {
            let field = key.parse::<InputField>().ok();
            let user = match field {
                Some(f) => inputs.get(f),
                None if key == "age" => f64::from(profile.age),
                None => 0.0,
            };
            let label = field
                .map(|f| f.label().to_string())
                .unwrap_or_else(|| title_case(key));
            let difference = user - average;
            let percent = (average != 0.0).then(|| difference.abs() / average * 100.0);
            let standing = if difference > 0.0 {
                Standing::Higher
            } else if difference < 0.0 {
                Standing::Lower
            } else {
                Standing::Equal
            };

            ComparisonRow {
                key: key.clone(),
                label,
                user,
                average,
                difference,
                percent,
                standing,
            }
        })
        .collect()
}

/// `preferred_payment_method` → `Preferred Payment Method`
fn title_case(key: &str) -> String {
    key.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
