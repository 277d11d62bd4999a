//! Reference population import
//!
//! Loads the student spending survey CSV the analytics backend is seeded from,
//! so averages and dataset points can be produced without the backend.
//!
//! Expected header (an unnamed leading index column is tolerated):
//! `age,gender,year_in_school,major,monthly_income,financial_aid,tuition,
//! housing,food,transportation,books_supplies,entertainment,personal_care,
//! technology,health_wellness,miscellaneous,preferred_payment_method`

use std::collections::BTreeMap;
use std::io::Read;

use csv::ReaderBuilder;
use serde::Deserialize;
use tracing::debug;

use crate::classify::classify;
use crate::error::{Error, Result};
use crate::fields::InputField;
use crate::metrics::{derive_metrics, MetricsConfig};
use crate::models::{
    BoundarySet, DatasetPoint, PopulationAverages, RawFinancialInputs, StudentProfile,
};

/// One surveyed student
#[derive(Debug, Clone, PartialEq)]
pub struct StudentRecord {
    pub profile: StudentProfile,
    pub inputs: RawFinancialInputs,
}

/// Flat CSV row; columns are matched by header name
#[derive(Debug, Deserialize)]
struct SurveyRow {
    age: u32,
    gender: String,
    year_in_school: String,
    major: String,
    monthly_income: f64,
    financial_aid: f64,
    tuition: f64,
    housing: f64,
    food: f64,
    transportation: f64,
    books_supplies: f64,
    entertainment: f64,
    personal_care: f64,
    technology: f64,
    health_wellness: f64,
    miscellaneous: f64,
    preferred_payment_method: String,
}

impl From<SurveyRow> for StudentRecord {
    fn from(row: SurveyRow) -> Self {
        Self {
            profile: StudentProfile {
                age: row.age,
                gender: row.gender,
                year_in_school: row.year_in_school,
                major: row.major,
                preferred_payment_method: row.preferred_payment_method,
            },
            inputs: RawFinancialInputs {
                monthly_income: row.monthly_income,
                financial_aid: row.financial_aid,
                tuition: row.tuition,
                housing: row.housing,
                food: row.food,
                transportation: row.transportation,
                books_supplies: row.books_supplies,
                entertainment: row.entertainment,
                personal_care: row.personal_care,
                technology: row.technology,
                health_wellness: row.health_wellness,
                miscellaneous: row.miscellaneous,
            },
        }
    }
}

impl StudentRecord {
    /// All fields as a JSON object, for dataset point details
    pub fn details(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut map = serde_json::Map::new();
        map.insert("age".into(), self.profile.age.into());
        map.insert("gender".into(), self.profile.gender.clone().into());
        map.insert(
            "year_in_school".into(),
            self.profile.year_in_school.clone().into(),
        );
        map.insert("major".into(), self.profile.major.clone().into());
        for (field, value) in self.inputs.iter() {
            map.insert(field.name().into(), value.into());
        }
        map.insert(
            "preferred_payment_method".into(),
            self.profile.preferred_payment_method.clone().into(),
        );
        map
    }
}

/// Parse survey CSV data into student records
pub fn parse_population<R: Read>(reader: R) -> Result<Vec<StudentRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    for required in ["age", "monthly_income", "preferred_payment_method"] {
        if !headers.iter().any(|h| h == required) {
            return Err(Error::InvalidData(format!(
                "Population CSV is missing the '{}' column",
                required
            )));
        }
    }

    let mut records = Vec::new();
    for row in rdr.deserialize::<SurveyRow>() {
        records.push(StudentRecord::from(row?));
    }

    debug!(count = records.len(), "Parsed population records");
    Ok(records)
}

/// Mean of every numeric field, plus age
pub fn averages(records: &[StudentRecord]) -> PopulationAverages {
    let mut all_users_average = BTreeMap::new();
    if records.is_empty() {
        return PopulationAverages { all_users_average };
    }

    let count = records.len() as f64;
    let mean_age = records.iter().map(|r| r.profile.age as f64).sum::<f64>() / count;
    all_users_average.insert("age".to_string(), mean_age);

    for field in InputField::ALL {
        let mean = records.iter().map(|r| r.inputs.get(field)).sum::<f64>() / count;
        all_users_average.insert(field.name().to_string(), mean);
    }

    PopulationAverages { all_users_average }
}

/// Derive and classify each student's point on the plot
pub fn dataset_points(
    records: &[StudentRecord],
    boundaries: Option<&BoundarySet>,
    config: &MetricsConfig,
) -> Vec<DatasetPoint> {
    records
        .iter()
        .map(|record| {
            let metrics = derive_metrics(&record.inputs, config);
            let point = metrics.user_point();
            DatasetPoint {
                label: classify(point, boundaries).as_str().to_string(),
                x: point.x,
                y: point.y,
                details: Some(record.details()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FinancialCategory, Point};

    const SURVEY: &str = "\
,age,gender,year_in_school,major,monthly_income,financial_aid,tuition,housing,food,transportation,books_supplies,entertainment,personal_care,technology,health_wellness,miscellaneous,preferred_payment_method
0,19,Non-binary,Freshman,Psychology,958,270,5939,709,296,123,188,41,78,134,127,72,Credit/Debit Card
1,24,Female,Junior,Economics,1006,875,4908,557,365,85,252,42,77,90,204,95,Credit/Debit Card
2,24,Non-binary,Junior,Economics,734,928,3051,666,220,137,99,104,91,155,85,190,Cash
";

    #[test]
    fn test_parse_survey() {
        let records = parse_population(SURVEY.as_bytes()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].profile.age, 19);
        assert_eq!(records[0].profile.major, "Psychology");
        assert_eq!(records[1].inputs.tuition, 4908.0);
        assert_eq!(records[2].profile.preferred_payment_method, "Cash");
    }

    #[test]
    fn test_missing_column_rejected() {
        let csv = "gender,major\nFemale,Art\n";
        assert!(matches!(
            parse_population(csv.as_bytes()),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_bad_number_is_csv_error() {
        let csv = SURVEY.replace("958", "lots");
        assert!(matches!(parse_population(csv.as_bytes()), Err(Error::Csv(_))));
    }

    #[test]
    fn test_averages() {
        let records = parse_population(SURVEY.as_bytes()).unwrap();
        let avg = averages(&records);
        assert!((avg.all_users_average["age"] - 67.0 / 3.0).abs() < 1e-9);
        assert!((avg.all_users_average["monthly_income"] - 2698.0 / 3.0).abs() < 1e-9);
        assert_eq!(avg.all_users_average["food"], 881.0 / 3.0);
        assert_eq!(avg.all_users_average.len(), 13);
        assert!(averages(&[]).all_users_average.is_empty());
    }

    #[test]
    fn test_dataset_points_are_classified() {
        let records = parse_population(SURVEY.as_bytes()).unwrap();
        let boundaries = BoundarySet {
            saver_balanced: vec![Point::new(0.0, 0.0), Point::new(1.0, 10_000.0)],
            balanced_overspender: vec![Point::new(-10_000.0, 0.0), Point::new(0.0, 2500.0)],
        };
        let points = dataset_points(&records, Some(&boundaries), &MetricsConfig::default());
        assert_eq!(points.len(), 3);
        for (point, record) in points.iter().zip(&records) {
            let metrics = derive_metrics(&record.inputs, &MetricsConfig::default());
            assert_eq!(point.x, metrics.budget_margin);
            assert_eq!(point.y, metrics.monthly_spending);
            assert!(point.category().is_some());
            assert_eq!(
                point.details.as_ref().unwrap()["major"],
                record.profile.major.as_str()
            );
        }

        let unbounded = dataset_points(&records, None, &MetricsConfig::default());
        assert!(unbounded
            .iter()
            .all(|p| p.category() == Some(FinancialCategory::Balanced)));
    }
}
