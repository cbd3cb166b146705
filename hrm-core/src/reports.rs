//! Report payloads and the pure parts of the aggregation layer.
//!
//! SQL does the grouping and summing. The helpers here turn nullable
//! aggregate results into zeros, pick the top-rated employees and shape the
//! CSV rows, so they can be tested without a database.

use crate::{Date, EntityId};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Number of employees shown on the ratings chart.
pub const TOP_RATED_LIMIT: usize = 10;

/// Fixed header row of the employee CSV export.
pub const CSV_HEADER: [&str; 9] = [
    "ID",
    "First Name",
    "Last Name",
    "Email",
    "Hire Date",
    "Department",
    "Role",
    "Base Salary",
    "Active",
];

/// Per-employee aggregate returned by `/employees/{id}/summary`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct EmployeeSummary {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub employee_id: EntityId,
    pub employee_name: String,
    pub department: String,
    pub role: String,
    pub average_rating: f64,
    pub total_bonus: f64,
    pub attendance_present_days: i64,
}

/// Employee count for one department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HeadcountRow {
    pub name: String,
    pub c: i64,
}

/// Organization-wide analytics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AnalyticsSummary {
    pub average_rating_overall: f64,
    pub total_bonus_paid: f64,
    /// Sorted by department name.
    pub headcount_by_department: Vec<HeadcountRow>,
}

/// Average review rating of one employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RatingRow {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub employee_id: EntityId,
    pub employee_name: String,
    pub average_rating: f64,
}

/// Series embedded in the charts page.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ChartData {
    pub dept_labels: Vec<String>,
    pub dept_counts: Vec<i64>,
    pub emp_labels: Vec<String>,
    pub emp_ratings: Vec<f64>,
}

impl ChartData {
    /// Build chart series from department headcounts and per-employee
    /// averages. Headcount order is kept; ratings are reduced to the top
    /// [`TOP_RATED_LIMIT`].
    pub fn new(headcount: Vec<HeadcountRow>, ratings: Vec<RatingRow>) -> Self {
        let (dept_labels, dept_counts) = headcount.into_iter().map(|row| (row.name, row.c)).unzip();
        let (emp_labels, emp_ratings) = top_rated(ratings, TOP_RATED_LIMIT)
            .into_iter()
            .map(|row| (row.employee_name, row.average_rating))
            .unzip();
        Self {
            dept_labels,
            dept_counts,
            emp_labels,
            emp_ratings,
        }
    }
}

/// Convert a nullable SQL aggregate to `f64`, treating NULL as zero.
pub fn decimal_or_zero(value: Option<Decimal>) -> f64 {
    value.and_then(|d| d.to_f64()).unwrap_or(0.0)
}

/// Highest average ratings first; equal ratings ordered by employee id.
pub fn top_rated(mut rows: Vec<RatingRow>, limit: usize) -> Vec<RatingRow> {
    rows.sort_by(|a, b| {
        b.average_rating
            .partial_cmp(&a.average_rating)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.employee_id.cmp(&b.employee_id))
    });
    rows.truncate(limit);
    rows
}

/// One employee line of the CSV export.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeExportRow {
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub hire_date: Date,
    pub department: String,
    pub role_title: String,
    pub role_level: String,
    pub base_salary: Decimal,
    pub is_active: bool,
}

impl EmployeeExportRow {
    /// Fields in [`CSV_HEADER`] order.
    pub fn to_record(&self) -> [String; 9] {
        [
            self.id.to_string(),
            self.first_name.clone(),
            self.last_name.clone(),
            self.email.clone(),
            self.hire_date.to_string(),
            self.department.clone(),
            format!("{} {}", self.role_title, self.role_level),
            self.base_salary.to_string(),
            if self.is_active { "True" } else { "False" }.to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use uuid::Uuid;

    fn rating(id: u128, name: &str, value: f64) -> RatingRow {
        RatingRow {
            employee_id: Uuid::from_u128(id),
            employee_name: name.to_string(),
            average_rating: value,
        }
    }

    #[test]
    fn test_decimal_or_zero() {
        assert_eq!(decimal_or_zero(None), 0.0);
        assert_eq!(decimal_or_zero(Some(Decimal::new(425, 2))), 4.25);
    }

    #[test]
    fn test_top_rated_orders_and_breaks_ties_by_id() {
        let rows = vec![
            rating(3, "C", 4.0),
            rating(1, "A", 3.5),
            rating(2, "B", 4.0),
        ];
        let names: Vec<_> = top_rated(rows, 10)
            .into_iter()
            .map(|r| r.employee_name)
            .collect();
        assert_eq!(names, vec!["B", "C", "A"]);
    }

    #[test]
    fn test_chart_data_empty_inputs() {
        let data = ChartData::new(Vec::new(), Vec::new());
        assert_eq!(data, ChartData::default());
    }

    #[test]
    fn test_chart_data_keeps_headcount_order() {
        let headcount = vec![
            HeadcountRow { name: "Engineering".to_string(), c: 3 },
            HeadcountRow { name: "Finance".to_string(), c: 0 },
        ];
        let data = ChartData::new(headcount, vec![rating(1, "Ada Lovelace", 4.5)]);
        assert_eq!(data.dept_labels, vec!["Engineering", "Finance"]);
        assert_eq!(data.dept_counts, vec![3, 0]);
        assert_eq!(data.emp_labels, vec!["Ada Lovelace"]);
        assert_eq!(data.emp_ratings, vec![4.5]);
    }

    #[test]
    fn test_export_row_matches_header_order() {
        let row = EmployeeExportRow {
            id: Uuid::nil(),
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            email: "grace.hopper@example.com".to_string(),
            hire_date: NaiveDate::from_ymd_opt(2021, 6, 1).unwrap_or_default(),
            department: "Engineering".to_string(),
            role_title: "Manager".to_string(),
            role_level: "M1".to_string(),
            base_salary: Decimal::new(9500000, 2),
            is_active: true,
        };
        let record = row.to_record();
        assert_eq!(record.len(), CSV_HEADER.len());
        assert_eq!(record[4], "2021-06-01");
        assert_eq!(record[6], "Manager M1");
        assert_eq!(record[7], "95000.00");
        assert_eq!(record[8], "True");
    }

    proptest! {
        #[test]
        fn prop_top_rated_is_bounded_and_sorted(
            values in prop::collection::vec(0.0f64..=5.0, 0..40)
        ) {
            let rows: Vec<_> = values
                .iter()
                .enumerate()
                .map(|(i, v)| rating(i as u128, "x", *v))
                .collect();
            let top = top_rated(rows, TOP_RATED_LIMIT);
            prop_assert!(top.len() <= TOP_RATED_LIMIT);
            prop_assert_eq!(top.len(), values.len().min(TOP_RATED_LIMIT));
            for pair in top.windows(2) {
                prop_assert!(pair[0].average_rating >= pair[1].average_rating);
            }
        }
    }
}
