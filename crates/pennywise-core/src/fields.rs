//! Input field catalog
//!
//! Every figure the dashboard collects, with its reporting period, display
//! group, and slider range. Field access on [`RawFinancialInputs`] goes through
//! [`InputField`] so that the field set stays closed and typed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::models::RawFinancialInputs;

/// How often an input figure is billed or received
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportingPeriod {
    Monthly,
    Semester,
    Annual,
}

impl ReportingPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Semester => "semester",
            Self::Annual => "annual",
        }
    }
}

impl fmt::Display for ReportingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ReportingPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "monthly" => Ok(Self::Monthly),
            "semester" => Ok(Self::Semester),
            "annual" | "yearly" => Ok(Self::Annual),
            _ => Err(format!("Unknown reporting period: {}", s)),
        }
    }
}

/// Slider panel sections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputGroup {
    Income,
    Education,
    Living,
    Personal,
}

impl InputGroup {
    pub const ALL: [InputGroup; 4] = [Self::Income, Self::Education, Self::Living, Self::Personal];

    pub fn title(&self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Education => "Education Expenses",
            Self::Living => "Living Expenses",
            Self::Personal => "Personal Expenses",
        }
    }

    /// Fields in this group, in panel order
    pub fn fields(&self) -> Vec<InputField> {
        InputField::ALL
            .iter()
            .copied()
            .filter(|f| f.group() == *self)
            .collect()
    }
}

/// Bounds of a dashboard slider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl SliderRange {
    const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// One of the twelve financial input fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputField {
    MonthlyIncome,
    FinancialAid,
    Tuition,
    BooksSupplies,
    Housing,
    Food,
    Transportation,
    Entertainment,
    PersonalCare,
    Technology,
    HealthWellness,
    Miscellaneous,
}

impl InputField {
    pub const ALL: [InputField; 12] = [
        Self::MonthlyIncome,
        Self::FinancialAid,
        Self::Tuition,
        Self::BooksSupplies,
        Self::Housing,
        Self::Food,
        Self::Transportation,
        Self::Entertainment,
        Self::PersonalCare,
        Self::Technology,
        Self::HealthWellness,
        Self::Miscellaneous,
    ];

    /// Wire name, as used by the backend and input files
    pub fn name(&self) -> &'static str {
        match self {
            Self::MonthlyIncome => "monthly_income",
            Self::FinancialAid => "financial_aid",
            Self::Tuition => "tuition",
            Self::BooksSupplies => "books_supplies",
            Self::Housing => "housing",
            Self::Food => "food",
            Self::Transportation => "transportation",
            Self::Entertainment => "entertainment",
            Self::PersonalCare => "personal_care",
            Self::Technology => "technology",
            Self::HealthWellness => "health_wellness",
            Self::Miscellaneous => "miscellaneous",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::MonthlyIncome => "Monthly Income",
            Self::FinancialAid => "Financial Aid",
            Self::Tuition => "Tuition",
            Self::BooksSupplies => "Books & Supplies",
            Self::Housing => "Housing",
            Self::Food => "Food",
            Self::Transportation => "Transportation",
            Self::Entertainment => "Entertainment",
            Self::PersonalCare => "Personal Care",
            Self::Technology => "Technology",
            Self::HealthWellness => "Health & Wellness",
            Self::Miscellaneous => "Miscellaneous",
        }
    }

    /// Period the figure is entered in
    ///
    /// Technology is labelled annual on the form but summed as a monthly
    /// figure; see [`crate::metrics::MetricsConfig::technology_period`].
    pub fn period(&self) -> ReportingPeriod {
        match self {
            Self::FinancialAid | Self::Tuition | Self::BooksSupplies => ReportingPeriod::Semester,
            Self::Technology => ReportingPeriod::Annual,
            _ => ReportingPeriod::Monthly,
        }
    }

    pub fn group(&self) -> InputGroup {
        match self {
            Self::MonthlyIncome | Self::FinancialAid => InputGroup::Income,
            Self::Tuition | Self::BooksSupplies => InputGroup::Education,
            Self::Housing | Self::Food | Self::Transportation => InputGroup::Living,
            Self::Entertainment
            | Self::PersonalCare
            | Self::Technology
            | Self::HealthWellness
            | Self::Miscellaneous => InputGroup::Personal,
        }
    }

    pub fn range(&self) -> SliderRange {
        match self {
            Self::MonthlyIncome | Self::FinancialAid | Self::Housing | Self::Technology => {
                SliderRange::new(0.0, 20_000.0, 100.0)
            }
            Self::Tuition => SliderRange::new(0.0, 80_000.0, 1000.0),
            _ => SliderRange::new(0.0, 2000.0, 50.0),
        }
    }

    /// Income fields feed monthly income; everything else is spending
    pub fn is_income(&self) -> bool {
        self.group() == InputGroup::Income
    }
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for InputField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.name() == key)
            .ok_or_else(|| Error::UnknownField(key.to_string()))
    }
}

impl RawFinancialInputs {
    pub fn get(&self, field: InputField) -> f64 {
        match field {
            InputField::MonthlyIncome => self.monthly_income,
            InputField::FinancialAid => self.financial_aid,
            InputField::Tuition => self.tuition,
            InputField::BooksSupplies => self.books_supplies,
            InputField::Housing => self.housing,
            InputField::Food => self.food,
            InputField::Transportation => self.transportation,
            InputField::Entertainment => self.entertainment,
            InputField::PersonalCare => self.personal_care,
            InputField::Technology => self.technology,
            InputField::HealthWellness => self.health_wellness,
            InputField::Miscellaneous => self.miscellaneous,
        }
    }

    pub fn set(&mut self, field: InputField, value: f64) {
        let slot = match field {
            InputField::MonthlyIncome => &mut self.monthly_income,
            InputField::FinancialAid => &mut self.financial_aid,
            InputField::Tuition => &mut self.tuition,
            InputField::BooksSupplies => &mut self.books_supplies,
            InputField::Housing => &mut self.housing,
            InputField::Food => &mut self.food,
            InputField::Transportation => &mut self.transportation,
            InputField::Entertainment => &mut self.entertainment,
            InputField::PersonalCare => &mut self.personal_care,
            InputField::Technology => &mut self.technology,
            InputField::HealthWellness => &mut self.health_wellness,
            InputField::Miscellaneous => &mut self.miscellaneous,
        };
        *slot = value;
    }

    /// Builder-style [`RawFinancialInputs::set`]
    pub fn with(mut self, field: InputField, value: f64) -> Self {
        self.set(field, value);
        self
    }

    /// Overwrite every field present in `overrides`
    ///
    /// Keys that are not input fields are ignored, matching how submitted
    /// form data was spread over the slider state.
    pub fn merge_from(&mut self, overrides: &serde_json::Map<String, serde_json::Value>) {
        for (key, value) in overrides {
            if let (Ok(field), Some(number)) = (key.parse::<InputField>(), value.as_f64()) {
                self.set(field, number);
            }
        }
    }

    /// Iterate `(field, value)` pairs in form order
    pub fn iter(&self) -> impl Iterator<Item = (InputField, f64)> + '_ {
        InputField::ALL.iter().map(move |f| (*f, self.get(*f)))
    }
}
