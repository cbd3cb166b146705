//! Database-backed tests for store invariants.
//!
//! Run with `--features db-tests` against a disposable PostgreSQL database
//! configured through the `HRM_DB_*` variables. Every record uses a unique
//! suffix so the tests can share one database.

#![cfg(feature = "db-tests")]

use chrono::NaiveDate;
use hrm_api::types::*;
use hrm_api::db::DbConfig;
use hrm_api::validation::Validate;
use hrm_api::{ApiResult, DbClient, ErrorCode};
use hrm_core::{
    Assignment, Attendance, AttendanceStatus, Department, Employee, PerformanceReview, Project,
    Role,
};
use hrm_test_utils::{assertions, unique_suffix};
use rust_decimal::Decimal;
use std::time::Duration;

#[path = "support/db.rs"]
mod test_db_support;

async fn test_db() -> ApiResult<DbClient> {
    let db = test_db_support::test_db_client();
    db.migrate().await?;
    Ok(db)
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

async fn department(db: &DbClient) -> ApiResult<Department> {
    let suffix = unique_suffix();
    db.create::<Department>(&CreateDepartmentRequest {
        name: format!("Dept {}", suffix),
        code: suffix.chars().take(10).collect(),
        budget: Decimal::new(10_000_000, 2),
        headcount: 0,
    })
    .await
}

async fn role(db: &DbClient) -> ApiResult<Role> {
    db.create::<Role>(&CreateRoleRequest {
        title: format!("Engineer {}", unique_suffix()),
        level: "L1".to_string(),
        salary_band_min: Decimal::from(50_000),
        salary_band_max: Decimal::from(80_000),
    })
    .await
}

async fn employee(db: &DbClient, dept: &Department, role: &Role, salary: Decimal) -> ApiResult<Employee> {
    db.create::<Employee>(&CreateEmployeeRequest {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: format!("ada.{}@example.com", unique_suffix()),
        hire_date: day(2022, 3, 1),
        department_id: dept.id,
        role_id: role.id,
        base_salary: salary,
        is_active: true,
    })
    .await
}

fn attendance_request(employee_id: hrm_core::EntityId, date: NaiveDate) -> CreateAttendanceRequest {
    CreateAttendanceRequest {
        employee_id,
        date,
        status: AttendanceStatus::Present,
        hours_worked: Decimal::new(800, 2),
        notes: String::new(),
    }
}

#[tokio::test]
async fn test_salary_outside_band_is_accepted() -> ApiResult<()> {
    let db = test_db().await?;
    let dept = department(&db).await?;
    let role = role(&db).await?;

    let emp = employee(&db, &dept, &role, Decimal::from(250_000)).await?;
    assert!(!emp.role.band_contains(emp.base_salary));
    assert_eq!(emp.department.id, dept.id);
    Ok(())
}

#[tokio::test]
async fn test_duplicate_attendance_day_conflicts() -> ApiResult<()> {
    let db = test_db().await?;
    let dept = department(&db).await?;
    let role = role(&db).await?;
    let emp = employee(&db, &dept, &role, Decimal::from(60_000)).await?;

    let request = attendance_request(emp.id, day(2024, 5, 2));
    db.create::<Attendance>(&request).await?;
    let err = db
        .create::<Attendance>(&request)
        .await
        .expect_err("second entry for the same day must fail");
    assert_eq!(err.code, ErrorCode::EntityAlreadyExists);
    Ok(())
}

#[tokio::test]
async fn test_unknown_reference_is_invalid_reference() -> ApiResult<()> {
    let db = test_db().await?;
    let err = db
        .create::<Attendance>(&attendance_request(uuid::Uuid::now_v7(), day(2024, 5, 2)))
        .await
        .expect_err("missing employee");
    assert_eq!(err.code, ErrorCode::InvalidReference);
    Ok(())
}

#[tokio::test]
async fn test_department_delete_is_protected_while_referenced() -> ApiResult<()> {
    let db = test_db().await?;
    let dept = department(&db).await?;
    let role = role(&db).await?;
    let emp = employee(&db, &dept, &role, Decimal::from(60_000)).await?;

    let err = db.delete::<Department>(dept.id).await.expect_err("department has an employee");
    assert_eq!(err.code, ErrorCode::DeleteProtected);

    db.delete::<Employee>(emp.id).await?;
    db.delete::<Department>(dept.id).await?;
    assert!(db.get::<Department>(dept.id).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_employee_delete_cascades_to_activity() -> ApiResult<()> {
    let db = test_db().await?;
    let dept = department(&db).await?;
    let role = role(&db).await?;
    let emp = employee(&db, &dept, &role, Decimal::from(60_000)).await?;

    let attendance = db.create::<Attendance>(&attendance_request(emp.id, day(2024, 5, 3))).await?;
    let review = db
        .create::<PerformanceReview>(&CreateReviewRequest {
            employee_id: emp.id,
            period_start: day(2024, 1, 1),
            period_end: day(2024, 3, 31),
            rating: Decimal::new(45, 1),
            goals_met: 4,
            manager_feedback: "Good quarter".to_string(),
            bonus_amount: Decimal::from(1_000),
        })
        .await?;
    let project = db
        .create::<Project>(&CreateProjectRequest {
            name: "Cascade".to_string(),
            code: format!("C{}", unique_suffix()),
            department_id: dept.id,
            start_date: day(2024, 1, 1),
            end_date: None,
            budget: Decimal::from(20_000),
        })
        .await?;
    let assignment = db
        .create::<Assignment>(&CreateAssignmentRequest {
            employee_id: emp.id,
            project_id: project.id,
            role_on_project: "Developer".to_string(),
            start_date: day(2024, 1, 15),
            end_date: None,
            allocation_percent: Decimal::from(50),
        })
        .await?;

    db.delete::<Employee>(emp.id).await?;

    assert!(db.get::<Attendance>(attendance.id).await?.is_none());
    assert!(db.get::<PerformanceReview>(review.id).await?.is_none());
    assert!(db.get::<Assignment>(assignment.id).await?.is_none());
    assert!(db.get::<Project>(project.id).await?.is_some());
    Ok(())
}

#[tokio::test]
async fn test_summary_without_reviews_is_zero() -> ApiResult<()> {
    let db = test_db().await?;
    let dept = department(&db).await?;
    let role = role(&db).await?;
    let emp = employee(&db, &dept, &role, Decimal::from(60_000)).await?;
    db.create::<Attendance>(&attendance_request(emp.id, day(2024, 6, 3))).await?;

    let summary = db.employee_summary(emp.id).await?;
    assertions::assert_summary_zeroed(&summary);
    assert_eq!(summary.attendance_present_days, 1);
    assert_eq!(summary.employee_name, "Ada Lovelace");
    assert_eq!(summary.role, role.display_name());
    Ok(())
}

#[tokio::test]
async fn test_summary_averages_reviews() -> ApiResult<()> {
    let db = test_db().await?;
    let dept = department(&db).await?;
    let role = role(&db).await?;
    let emp = employee(&db, &dept, &role, Decimal::from(60_000)).await?;
    for (start, end, rating, bonus) in [
        (day(2024, 1, 1), day(2024, 3, 31), 40, 1_000),
        (day(2024, 4, 1), day(2024, 6, 30), 50, 500),
    ] {
        db.create::<PerformanceReview>(&CreateReviewRequest {
            employee_id: emp.id,
            period_start: start,
            period_end: end,
            rating: Decimal::new(rating, 1),
            goals_met: 3,
            manager_feedback: String::new(),
            bonus_amount: Decimal::from(bonus),
        })
        .await?;
    }

    let summary = db.employee_summary(emp.id).await?;
    assert_eq!(summary.average_rating, 4.5);
    assert_eq!(summary.total_bonus, 1_500.0);
    Ok(())
}

#[tokio::test]
async fn test_summary_of_missing_employee_is_not_found() -> ApiResult<()> {
    let db = test_db().await?;
    let err = db
        .employee_summary(uuid::Uuid::now_v7())
        .await
        .expect_err("no such employee");
    assert_eq!(err.code, ErrorCode::EntityNotFound);
    Ok(())
}

#[tokio::test]
async fn test_headcount_is_sorted_by_department_name() -> ApiResult<()> {
    let db = test_db().await?;
    department(&db).await?;
    department(&db).await?;

    let summary = db.analytics_summary().await?;
    assertions::assert_headcount_sorted(&summary.headcount_by_department);
    assertions::assert_valid_rating(summary.average_rating_overall);
    Ok(())
}

#[tokio::test]
async fn test_partial_update_rechecks_date_order() -> ApiResult<()> {
    let db = test_db().await?;
    let dept = department(&db).await?;
    let project = db
        .create::<Project>(&CreateProjectRequest {
            name: "Ordering".to_string(),
            code: format!("O{}", unique_suffix()),
            department_id: dept.id,
            start_date: day(2024, 6, 1),
            end_date: Some(day(2024, 12, 31)),
            budget: Decimal::ZERO,
        })
        .await?;

    let err = db
        .update::<Project>(
            project.id,
            &UpdateProjectRequest {
                end_date: Some(Some(day(2024, 1, 1))),
                ..UpdateProjectRequest::default()
            },
        )
        .await
        .expect_err("end before start");
    assert_eq!(err.code, ErrorCode::InvalidRange);

    let unchanged = db.fetch::<Project>(project.id).await?;
    assert_eq!(unchanged.end_date, Some(day(2024, 12, 31)));

    let cleared = db
        .update::<Project>(
            project.id,
            &UpdateProjectRequest {
                end_date: Some(None),
                ..UpdateProjectRequest::default()
            },
        )
        .await?;
    assert_eq!(cleared.end_date, None);
    Ok(())
}

#[tokio::test]
async fn test_list_search_and_paging() -> ApiResult<()> {
    let db = test_db().await?;
    let dept = department(&db).await?;
    let role = role(&db).await?;
    let emp = employee(&db, &dept, &role, Decimal::from(60_000)).await?;

    let params = ListParams {
        search: Some(format!("lovelace {}", dept.name)),
        ..ListParams::default()
    };
    let filter = EmployeeFilter::default();
    let page = db
        .list::<Employee>(&params, &filter, Pagination::resolve(&params, PageLimits::default()))
        .await?;
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, emp.id);

    let past_end = ListParams {
        search: params.search.clone(),
        page: Some(3),
        ..ListParams::default()
    };
    let err = db
        .list::<Employee>(&past_end, &filter, Pagination::resolve(&past_end, PageLimits::default()))
        .await
        .expect_err("page past the end");
    assert_eq!(err.code, ErrorCode::InvalidPage);
    Ok(())
}

#[tokio::test]
async fn test_two_place_amounts_are_stored_exactly() -> ApiResult<()> {
    let db = test_db().await?;
    let dept = department(&db).await?;
    let role = role(&db).await?;

    let rejected = CreateEmployeeRequest {
        first_name: "Grace".to_string(),
        last_name: "Hopper".to_string(),
        email: format!("grace.{}@example.com", unique_suffix()),
        hire_date: day(2021, 1, 4),
        department_id: dept.id,
        role_id: role.id,
        base_salary: Decimal::new(50_000_005, 3),
        is_active: true,
    };
    assert!(rejected.validate().is_err());

    let emp = employee(&db, &dept, &role, Decimal::new(5_000_001, 2)).await?;
    let stored = db.fetch::<Employee>(emp.id).await?;
    assert_eq!(stored.base_salary, Decimal::new(5_000_001, 2));
    Ok(())
}

#[tokio::test]
async fn test_reports_run_on_a_single_connection_pool() -> ApiResult<()> {
    let config = DbConfig {
        max_size: 1,
        timeout: Duration::from_secs(2),
        ..DbConfig::from_env()
    };
    let db = DbClient::from_config(&config)?;
    db.migrate().await?;

    let summary = db.analytics_summary().await?;
    assertions::assert_valid_rating(summary.average_rating_overall);
    db.chart_data().await?;
    Ok(())
}
