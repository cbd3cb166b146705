//! HRM Test Utilities
//!
//! Shared test infrastructure for the HRM workspace:
//! - Proptest generators for record types and field values
//! - Fixtures for common scenarios
//! - Assertions for report invariants

// Re-export core types for convenience
pub use hrm_core::{
    new_entity_id, AnalyticsSummary, Assignment, Attendance, AttendanceStatus, ChartData, Date,
    Department, Employee, EmployeeExportRow, EmployeeSummary, EntityId, EntityKind, HeadcountRow,
    PerformanceReview, Project, RatingRow, Role, Timestamp, ValidationError,
};

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

static UNIQUE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Short token that differs on every call, for unique names and codes in
/// tests that share a database. Combines a UUIDv7 fragment with a process
/// counter so parallel tests do not collide.
pub fn unique_suffix() -> String {
    let n = UNIQUE_COUNTER.fetch_add(1, Ordering::Relaxed);
    let simple = Uuid::now_v7().simple().to_string();
    format!("{}{:x}", &simple[simple.len() - 5..], n)
}

// ============================================================================
// GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for HRM records and field values.
    //!
    //! Text strategies stay inside the column widths from
    //! `hrm_core::rules::limits`, so generated values pass create
    //! validation unless a generator says otherwise.

    use super::*;
    use proptest::prelude::*;

    // === Identity ===

    pub fn arb_uuid() -> impl Strategy<Value = Uuid> {
        any::<[u8; 16]>().prop_map(Uuid::from_bytes)
    }

    /// Generate a valid UUIDv7 (timestamp-sortable).
    pub fn arb_uuid_v7() -> impl Strategy<Value = Uuid> {
        Just(()).prop_map(|_| Uuid::now_v7())
    }

    /// Timestamps between 2020 and 2030.
    pub fn arb_timestamp() -> impl Strategy<Value = Timestamp> {
        (1577836800i64..1893456000i64).prop_map(|secs| {
            chrono::DateTime::from_timestamp(secs, 0).unwrap_or_else(Utc::now)
        })
    }

    /// Calendar dates between 2015 and 2030.
    pub fn arb_date() -> impl Strategy<Value = Date> {
        (0i64..5840).prop_map(|days| {
            NaiveDate::from_ymd_opt(2015, 1, 1)
                .and_then(|d| d.checked_add_signed(chrono::Duration::days(days)))
                .unwrap_or_default()
        })
    }

    /// `(start, end)` with `start <= end`.
    pub fn arb_date_range() -> impl Strategy<Value = (Date, Date)> {
        (arb_date(), 0i64..400).prop_map(|(start, len)| {
            let end = start
                .checked_add_signed(chrono::Duration::days(len))
                .unwrap_or(start);
            (start, end)
        })
    }

    // === Field values ===

    pub fn arb_person_name() -> impl Strategy<Value = String> {
        "[A-Z][a-z]{1,20}"
    }

    pub fn arb_department_name() -> impl Strategy<Value = String> {
        "[A-Z][a-z]{2,15}( [A-Z][a-z]{2,15})?"
    }

    /// Upper-case code within the department code width.
    pub fn arb_department_code() -> impl Strategy<Value = String> {
        "[A-Z]{2,6}"
    }

    pub fn arb_project_code() -> impl Strategy<Value = String> {
        "PRJ[0-9]{3,8}"
    }

    pub fn arb_email() -> impl Strategy<Value = String> {
        ("[a-z]{1,20}", "[a-z]{1,20}", "[a-z]{2,10}")
            .prop_map(|(first, last, domain)| format!("{}.{}@{}.com", first, last, domain))
    }

    /// Text that must fail the non-blank rule.
    pub fn arb_blank() -> impl Strategy<Value = String> {
        "[ \t]{0,5}"
    }

    /// Text one or more characters past `max`.
    pub fn arb_too_long(max: usize) -> impl Strategy<Value = String> {
        (1usize..20).prop_map(move |extra| "x".repeat(max + extra))
    }

    /// Money with two decimal places, `0.00` to `max` whole units.
    pub fn arb_money(max: i64) -> impl Strategy<Value = Decimal> {
        (0i64..=max * 100).prop_map(|cents| Decimal::new(cents, 2))
    }

    /// `(min, max)` salary band with `min <= max`.
    pub fn arb_salary_band() -> impl Strategy<Value = (Decimal, Decimal)> {
        (20_000i64..150_000, 0i64..80_000)
            .prop_map(|(min, width)| (Decimal::from(min), Decimal::from(min + width)))
    }

    /// Rating on the review scale, one decimal place.
    pub fn arb_rating() -> impl Strategy<Value = Decimal> {
        (0i64..=50).prop_map(|tenths| Decimal::new(tenths, 1))
    }

    /// Rating outside `0.0..=5.0`.
    pub fn arb_invalid_rating() -> impl Strategy<Value = Decimal> {
        prop_oneof![
            (51i64..1000).prop_map(|tenths| Decimal::new(tenths, 1)),
            (1i64..1000).prop_map(|tenths| Decimal::new(-tenths, 1)),
        ]
    }

    pub fn arb_allocation() -> impl Strategy<Value = Decimal> {
        (0i64..=10_000).prop_map(|hundredths| Decimal::new(hundredths, 2))
    }

    pub fn arb_hours() -> impl Strategy<Value = Decimal> {
        (0i64..=2400).prop_map(|hundredths| Decimal::new(hundredths, 2))
    }

    pub fn arb_attendance_status() -> impl Strategy<Value = AttendanceStatus> {
        prop_oneof![
            Just(AttendanceStatus::Present),
            Just(AttendanceStatus::Absent),
            Just(AttendanceStatus::Remote),
            Just(AttendanceStatus::Leave),
        ]
    }

    pub fn arb_entity_kind() -> impl Strategy<Value = EntityKind> {
        prop::sample::select(EntityKind::ALL.to_vec())
    }

    // === Records ===

    pub fn arb_department() -> impl Strategy<Value = Department> {
        (
            arb_uuid_v7(),
            arb_department_name(),
            arb_department_code(),
            arb_money(1_000_000),
            0i32..500,
            arb_timestamp(),
        )
            .prop_map(|(id, name, code, budget, headcount, created_at)| Department {
                id,
                name,
                code,
                budget,
                headcount,
                created_at,
                updated_at: created_at,
            })
    }

    pub fn arb_role() -> impl Strategy<Value = Role> {
        (
            arb_uuid_v7(),
            "[A-Z][a-z]{2,20}( [A-Z][a-z]{2,20})?",
            "[LM][1-5]",
            arb_salary_band(),
            arb_timestamp(),
        )
            .prop_map(|(id, title, level, (salary_band_min, salary_band_max), created_at)| Role {
                id,
                title,
                level,
                salary_band_min,
                salary_band_max,
                created_at,
                updated_at: created_at,
            })
    }

    /// Employee embedding a generated department and role. The salary is
    /// drawn independently of the band; bands are informational.
    pub fn arb_employee() -> impl Strategy<Value = Employee> {
        (
            arb_uuid_v7(),
            arb_person_name(),
            arb_person_name(),
            arb_email(),
            arb_date(),
            arb_money(250_000),
            any::<bool>(),
            arb_department(),
            arb_role(),
            arb_timestamp(),
        )
            .prop_map(
                |(
                    id,
                    first_name,
                    last_name,
                    email,
                    hire_date,
                    base_salary,
                    is_active,
                    department,
                    role,
                    created_at,
                )| Employee {
                    id,
                    first_name,
                    last_name,
                    email,
                    hire_date,
                    base_salary,
                    is_active,
                    department_id: department.id,
                    role_id: role.id,
                    department,
                    role,
                    created_at,
                    updated_at: created_at,
                },
            )
    }

    pub fn arb_attendance(employee_id: EntityId) -> impl Strategy<Value = Attendance> {
        (arb_uuid_v7(), arb_date(), arb_attendance_status(), arb_hours(), "[a-z ]{0,40}").prop_map(
            move |(id, date, status, hours_worked, notes)| Attendance {
                id,
                employee_id,
                date,
                status,
                hours_worked,
                notes,
            },
        )
    }

    pub fn arb_review(employee_id: EntityId) -> impl Strategy<Value = PerformanceReview> {
        (
            arb_uuid_v7(),
            arb_date_range(),
            arb_rating(),
            0i32..20,
            "[A-Za-z .]{0,80}",
            arb_money(10_000),
            arb_timestamp(),
        )
            .prop_map(
                move |(id, (period_start, period_end), rating, goals_met, manager_feedback, bonus_amount, created_at)| {
                    PerformanceReview {
                        id,
                        employee_id,
                        period_start,
                        period_end,
                        rating,
                        goals_met,
                        manager_feedback,
                        bonus_amount,
                        created_at,
                    }
                },
            )
    }

    pub fn arb_project(department_id: EntityId) -> impl Strategy<Value = Project> {
        (
            arb_uuid_v7(),
            "Project [A-Z][a-z]{2,12}",
            arb_project_code(),
            arb_date_range(),
            any::<bool>(),
            arb_money(500_000),
            arb_timestamp(),
        )
            .prop_map(move |(id, name, code, (start_date, end), open, budget, created_at)| Project {
                id,
                name,
                code,
                department_id,
                start_date,
                end_date: if open { None } else { Some(end) },
                budget,
                created_at,
            })
    }

    pub fn arb_assignment(employee_id: EntityId, project_id: EntityId) -> impl Strategy<Value = Assignment> {
        (
            arb_uuid_v7(),
            prop::sample::select(vec!["Developer", "QA", "Lead", "Analyst"]),
            arb_date_range(),
            any::<bool>(),
            arb_allocation(),
        )
            .prop_map(move |(id, role, (start_date, end), open, allocation_percent)| Assignment {
                id,
                employee_id,
                project_id,
                role_on_project: role.to_string(),
                start_date,
                end_date: if open { None } else { Some(end) },
                allocation_percent,
            })
    }

    pub fn arb_rating_row() -> impl Strategy<Value = RatingRow> {
        (arb_uuid(), arb_person_name(), 0u32..=50).prop_map(|(employee_id, employee_name, tenths)| {
            RatingRow {
                employee_id,
                employee_name,
                average_rating: f64::from(tenths) / 10.0,
            }
        })
    }

    pub fn arb_headcount_rows() -> impl Strategy<Value = Vec<HeadcountRow>> {
        prop::collection::btree_map(arb_department_name(), 0i64..200, 0..8).prop_map(|map| {
            map.into_iter()
                .map(|(name, c)| HeadcountRow { name, c })
                .collect()
        })
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    //! Ready-made records with stable values.

    use super::*;

    fn day(y: i32, m: u32, d: u32) -> Date {
        NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
    }

    pub fn engineering() -> Department {
        let now = Utc::now();
        Department {
            id: new_entity_id(),
            name: "Engineering".to_string(),
            code: "ENG".to_string(),
            budget: Decimal::new(50_000_000, 2),
            headcount: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn finance() -> Department {
        Department {
            name: "Finance".to_string(),
            code: "FIN".to_string(),
            ..engineering()
        }
    }

    /// Software Engineer L2 with an 80k to 120k band.
    pub fn engineer_l2() -> Role {
        let now = Utc::now();
        Role {
            id: new_entity_id(),
            title: "Software Engineer".to_string(),
            level: "L2".to_string(),
            salary_band_min: Decimal::from(80_000),
            salary_band_max: Decimal::from(120_000),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn employee(department: &Department, role: &Role) -> Employee {
        let now = Utc::now();
        Employee {
            id: new_entity_id(),
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            email: format!("grace.hopper.{}@example.com", unique_suffix()),
            hire_date: day(2021, 6, 1),
            base_salary: Decimal::new(9_500_000, 2),
            is_active: true,
            department_id: department.id,
            role_id: role.id,
            department: department.clone(),
            role: role.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn attendance(employee_id: EntityId, date: Date, status: AttendanceStatus) -> Attendance {
        let hours = if status.is_working_day() {
            Decimal::new(800, 2)
        } else {
            Decimal::ZERO
        };
        Attendance {
            id: new_entity_id(),
            employee_id,
            date,
            status,
            hours_worked: hours,
            notes: String::new(),
        }
    }

    /// First-half-of-2024 review with the given rating and bonus.
    pub fn review(employee_id: EntityId, rating: Decimal, bonus: Decimal) -> PerformanceReview {
        PerformanceReview {
            id: new_entity_id(),
            employee_id,
            period_start: day(2024, 1, 1),
            period_end: day(2024, 6, 30),
            rating,
            goals_met: 5,
            manager_feedback: "Solid half year.".to_string(),
            bonus_amount: bonus,
            created_at: Utc::now(),
        }
    }

    pub fn export_row(employee: &Employee) -> EmployeeExportRow {
        EmployeeExportRow {
            id: employee.id,
            first_name: employee.first_name.clone(),
            last_name: employee.last_name.clone(),
            email: employee.email.clone(),
            hire_date: employee.hire_date,
            department: employee.department.name.clone(),
            role_title: employee.role.title.clone(),
            role_level: employee.role.level.clone(),
            base_salary: employee.base_salary,
            is_active: employee.is_active,
        }
    }
}

// ============================================================================
// ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions for report invariants.

    use super::*;

    /// Headcount rows must be ordered by department name.
    pub fn assert_headcount_sorted(rows: &[HeadcountRow]) {
        for pair in rows.windows(2) {
            assert!(
                pair[0].name <= pair[1].name,
                "headcount not sorted: {:?} before {:?}",
                pair[0].name,
                pair[1].name
            );
        }
    }

    pub fn assert_valid_rating(value: f64) {
        assert!(
            (0.0..=5.0).contains(&value),
            "rating {} outside 0.0..=5.0",
            value
        );
    }

    /// Chart label and value series must pair up.
    pub fn assert_chart_series_aligned(data: &ChartData) {
        assert_eq!(data.dept_labels.len(), data.dept_counts.len(), "department series differ in length");
        assert_eq!(data.emp_labels.len(), data.emp_ratings.len(), "employee series differ in length");
    }

    pub fn assert_summary_zeroed(summary: &EmployeeSummary) {
        assert_eq!(summary.average_rating, 0.0);
        assert_eq!(summary.total_bonus, 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::generators::*;
    use super::*;
    use hrm_core::rules::{self, limits};
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_unique_suffix_differs() {
        let seen: HashSet<String> = (0..100).map(|_| unique_suffix()).collect();
        assert_eq!(seen.len(), 100);
    }

    #[test]
    fn test_fixture_employee_embeds_relations() {
        let dept = fixtures::engineering();
        let role = fixtures::engineer_l2();
        let emp = fixtures::employee(&dept, &role);
        assert_eq!(emp.department_id, dept.id);
        assert_eq!(emp.role.display_name(), "Software Engineer (L2)");
        assert!(role.band_contains(emp.base_salary));
        assert_eq!(fixtures::export_row(&emp).to_record()[6], "Software Engineer L2");
    }

    proptest! {
        #[test]
        fn prop_generated_fields_pass_rules(
            name in arb_person_name(),
            code in arb_department_code(),
            email in arb_email(),
            rating in arb_rating(),
            allocation in arb_allocation(),
        ) {
            prop_assert!(rules::text("first_name", &name, limits::PERSON_NAME).is_ok());
            prop_assert!(rules::text("code", &code, limits::DEPARTMENT_CODE).is_ok());
            prop_assert!(rules::email("email", &email).is_ok());
            prop_assert!(rules::rating("rating", rating).is_ok());
            prop_assert!(rules::percent("allocation_percent", allocation).is_ok());
        }

        #[test]
        fn prop_invalid_generators_fail_rules(
            blank in arb_blank(),
            long in arb_too_long(limits::DEPARTMENT_CODE),
            rating in arb_invalid_rating(),
        ) {
            prop_assert!(rules::text("name", &blank, limits::DEPARTMENT_NAME).is_err());
            prop_assert!(rules::text("code", &long, limits::DEPARTMENT_CODE).is_err());
            prop_assert!(rules::rating("rating", rating).is_err());
        }

        #[test]
        fn prop_generated_ranges_are_ordered((start, end) in arb_date_range(), (min, max) in arb_salary_band()) {
            prop_assert!(rules::date_order("start_date", start, "end_date", Some(end)).is_ok());
            prop_assert!(rules::ordered_bounds("salary_band_min", min, "salary_band_max", max).is_ok());
        }

        #[test]
        fn prop_headcount_rows_are_sorted(rows in arb_headcount_rows()) {
            assertions::assert_headcount_sorted(&rows);
        }

        #[test]
        fn prop_chart_data_series_align(
            rows in arb_headcount_rows(),
            ratings in prop::collection::vec(arb_rating_row(), 0..30),
        ) {
            let data = ChartData::new(rows, ratings);
            assertions::assert_chart_series_aligned(&data);
            for value in &data.emp_ratings {
                assertions::assert_valid_rating(*value);
            }
        }
    }
}
