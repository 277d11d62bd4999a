//! Domain models for Pennywise

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A student's raw income and expense figures, each on its own reporting period
///
/// Semester-billed fields (`financial_aid`, `tuition`, `books_supplies`) are
/// stored as entered; [`crate::metrics::derive_metrics`] normalizes them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawFinancialInputs {
    pub monthly_income: f64,
    pub financial_aid: f64,
    pub tuition: f64,
    pub housing: f64,
    pub food: f64,
    pub transportation: f64,
    pub books_supplies: f64,
    pub entertainment: f64,
    pub personal_care: f64,
    pub technology: f64,
    pub health_wellness: f64,
    pub miscellaneous: f64,
}

impl Default for RawFinancialInputs {
    /// Dashboard slider defaults
    fn default() -> Self {
        Self {
            monthly_income: 1000.0,
            financial_aid: 5000.0,
            tuition: 5000.0,
            housing: 3600.0,
            food: 1800.0,
            transportation: 600.0,
            books_supplies: 400.0,
            entertainment: 600.0,
            personal_care: 480.0,
            technology: 300.0,
            health_wellness: 480.0,
            miscellaneous: 360.0,
        }
    }
}

/// Non-computational form fields sent along with a submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub age: u32,
    pub gender: String,
    pub year_in_school: String,
    pub major: String,
    pub preferred_payment_method: String,
}

/// Body of `/predict_category`
#[derive(Debug, Clone, Serialize)]
pub struct PredictionRequest {
    #[serde(flatten)]
    pub profile: StudentProfile,
    #[serde(flatten)]
    pub inputs: RawFinancialInputs,
}

/// A point in (budget margin, monthly spending) space
///
/// Encoded as a `[x, y]` array on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<Point> for (f64, f64) {
    fn from(p: Point) -> Self {
        (p.x, p.y)
    }
}

/// The two decision lines separating adjacent categories
///
/// Each is a polyline; only its first two vertices define the (infinite) line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundarySet {
    #[serde(default)]
    pub saver_balanced: Vec<Point>,
    #[serde(default)]
    pub balanced_overspender: Vec<Point>,
}

/// Financial behaviour category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinancialCategory {
    Saver,
    Balanced,
    Overspender,
}

impl FinancialCategory {
    pub const ALL: [FinancialCategory; 3] = [Self::Saver, Self::Balanced, Self::Overspender];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Saver => "saver",
            Self::Balanced => "balanced",
            Self::Overspender => "overspender",
        }
    }

    /// Capitalized name for display
    pub fn label(&self) -> &'static str {
        match self {
            Self::Saver => "Saver",
            Self::Balanced => "Balanced",
            Self::Overspender => "Overspender",
        }
    }

    /// Legend text
    pub fn description(&self) -> &'static str {
        match self {
            Self::Saver => "Saves more than peers",
            Self::Balanced => "Typical for peer group",
            Self::Overspender => "Spends more than peers",
        }
    }

    /// Hex colour from the dashboard palette
    pub fn color(&self) -> &'static str {
        match self {
            Self::Saver => "#4AC29A",
            Self::Balanced => "#5D87FF",
            Self::Overspender => "#FF5D5D",
        }
    }
}

impl fmt::Display for FinancialCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for FinancialCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "saver" => Ok(Self::Saver),
            "balanced" => Ok(Self::Balanced),
            "overspender" => Ok(Self::Overspender),
            _ => Err(format!("Unknown financial category: {}", s)),
        }
    }
}

/// Dataset point as sent by the backend: `[category, x, y]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDatasetPoint(pub String, pub f64, pub f64);

/// A reference-population point with optional per-user details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetPoint {
    /// Backend label, kept verbatim
    pub label: String,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Map<String, Value>>,
}

impl DatasetPoint {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Parsed label, `None` for labels outside the three categories
    pub fn category(&self) -> Option<FinancialCategory> {
        self.label.parse().ok()
    }
}

/// Response body of `/initial_data`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InitialData {
    #[serde(default)]
    pub boundary_coordinates: Option<BoundarySet>,
    #[serde(default)]
    pub dataset_points: Vec<RawDatasetPoint>,
    #[serde(default)]
    pub original_points: Vec<Map<String, Value>>,
}

impl InitialData {
    /// Pair each dataset point with the original record at the same index
    pub fn points(&self) -> Vec<DatasetPoint> {
        self.dataset_points
            .iter()
            .enumerate()
            .map(|(i, RawDatasetPoint(label, x, y))| DatasetPoint {
                label: label.clone(),
                x: *x,
                y: *y,
                details: self.original_points.get(i).cloned(),
            })
            .collect()
    }
}

/// Monthly figures derived from [`RawFinancialInputs`]
///
/// Non-finite values (a savings rate with zero income) travel as JSON `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    #[serde(with = "nullable_f64")]
    pub monthly_income: f64,
    #[serde(with = "nullable_f64")]
    pub monthly_spending: f64,
    #[serde(with = "nullable_f64")]
    pub budget_margin: f64,
    #[serde(with = "nullable_f64")]
    pub savings_amount: f64,
    #[serde(with = "nullable_f64", default = "nan")]
    pub savings_rate: f64,
    #[serde(with = "nullable_f64")]
    pub user_point_x: f64,
    #[serde(with = "nullable_f64")]
    pub user_point_y: f64,
}

impl DerivedMetrics {
    pub fn user_point(&self) -> Point {
        Point::new(self.user_point_x, self.user_point_y)
    }
}

fn nan() -> f64 {
    f64::NAN
}

mod nullable_f64 {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
    }
}

/// Response body of `/predict_category` (consumed fields only)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PopulationAverages {
    #[serde(default, deserialize_with = "lenient_numbers")]
    pub all_users_average: BTreeMap<String, f64>,
}

/// Coerce averages the way the dashboard did: numbers pass, numeric strings
/// parse, anything else becomes 0
fn lenient_numbers<'de, D>(deserializer: D) -> Result<BTreeMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(key, value)| {
            let number = match &value {
                Value::Number(n) => n.as_f64().unwrap_or(0.0),
                Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
                _ => 0.0,
            };
            (key, number)
        })
        .collect())
}
