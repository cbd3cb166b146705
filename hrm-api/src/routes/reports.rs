//! Report endpoints: per-employee summary, organization analytics, chart
//! series, CSV export and the headcount refresh.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use hrm_core::{AnalyticsSummary, ChartData, Employee, EmployeeExportRow, EmployeeSummary, CSV_HEADER};

use crate::{
    db::DbClient,
    error::{ApiError, ApiResult},
    extractors::PathId,
    types::RecomputeHeadcountResponse,
};

pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";
pub const CSV_DISPOSITION: &str = "attachment; filename=\"employees.csv\"";

/// GET /api/v1/employees/{id}/summary
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/v1/employees/{id}/summary",
    tag = "Reports",
    params(("id" = String, Path, description = "Employee id (UUID)")),
    responses(
        (status = 200, description = "Employee summary", body = EmployeeSummary),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 404, description = "Employee not found", body = ApiError),
    ),
    security(("api_key" = []), ("bearer_auth" = []))
))]
pub async fn employee_summary(
    State(db): State<DbClient>,
    id: PathId<Employee>,
) -> ApiResult<Json<EmployeeSummary>> {
    Ok(Json(db.employee_summary(id.id()).await?))
}

/// GET /api/v1/analytics/summary
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/v1/analytics/summary",
    tag = "Reports",
    responses(
        (status = 200, description = "Organization analytics", body = AnalyticsSummary),
        (status = 401, description = "Unauthorized", body = ApiError),
    ),
    security(("api_key" = []), ("bearer_auth" = []))
))]
pub async fn analytics_summary(State(db): State<DbClient>) -> ApiResult<Json<AnalyticsSummary>> {
    Ok(Json(db.analytics_summary().await?))
}

/// GET /api/v1/analytics/charts
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/v1/analytics/charts",
    tag = "Reports",
    responses(
        (status = 200, description = "Chart series", body = ChartData),
        (status = 401, description = "Unauthorized", body = ApiError),
    ),
    security(("api_key" = []), ("bearer_auth" = []))
))]
pub async fn chart_series(State(db): State<DbClient>) -> ApiResult<Json<ChartData>> {
    Ok(Json(db.chart_data().await?))
}

/// GET /api/v1/employees/export.csv
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/v1/employees/export.csv",
    tag = "Reports",
    responses(
        (status = 200, description = "Employee CSV attachment", content_type = "text/csv", body = String),
        (status = 401, description = "Unauthorized", body = ApiError),
    ),
    security(("api_key" = []), ("bearer_auth" = []))
))]
pub async fn export_csv(State(db): State<DbClient>) -> ApiResult<Response> {
    let rows = db.export_rows().await?;
    let body = render_csv(&rows)?;
    tracing::info!(rows = rows.len(), "Exported employees as CSV");
    Ok((
        [
            (header::CONTENT_TYPE, CSV_CONTENT_TYPE),
            (header::CONTENT_DISPOSITION, CSV_DISPOSITION),
        ],
        body,
    )
        .into_response())
}

/// POST /api/v1/departments/recompute-headcount
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/api/v1/departments/recompute-headcount",
    tag = "Departments",
    responses(
        (status = 200, description = "Departments refreshed", body = RecomputeHeadcountResponse),
        (status = 401, description = "Unauthorized", body = ApiError),
    ),
    security(("api_key" = []), ("bearer_auth" = []))
))]
pub async fn recompute_headcount(
    State(db): State<DbClient>,
) -> ApiResult<Json<RecomputeHeadcountResponse>> {
    let updated = db.recompute_headcount().await?;
    Ok(Json(RecomputeHeadcountResponse { updated }))
}

/// Header row followed by one record per employee.
pub fn render_csv(rows: &[EmployeeExportRow]) -> ApiResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for row in rows {
        writer.write_record(row.to_record())?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ApiError::internal_error(format!("Failed to flush CSV export: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| ApiError::internal_error(format!("CSV export is not UTF-8: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn row(first: &str, last: &str, active: bool) -> EmployeeExportRow {
        EmployeeExportRow {
            id: Uuid::now_v7(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: format!("{}.{}@example.com", first.to_lowercase(), last.to_lowercase()),
            hire_date: NaiveDate::from_ymd_opt(2022, 2, 14).unwrap_or_default(),
            department: "Engineering".to_string(),
            role_title: "Software Engineer".to_string(),
            role_level: "L2".to_string(),
            base_salary: Decimal::new(10_250_050, 2),
            is_active: active,
        }
    }

    #[test]
    fn test_render_csv_header_only() -> ApiResult<()> {
        let csv = render_csv(&[])?;
        assert_eq!(
            csv.trim_end(),
            "ID,First Name,Last Name,Email,Hire Date,Department,Role,Base Salary,Active"
        );
        Ok(())
    }

    #[test]
    fn test_render_csv_rows() -> ApiResult<()> {
        let rows = vec![row("Ada", "Lovelace", true), row("Alan", "Turing", false)];
        let csv = render_csv(&rows)?;
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].ends_with(",Engineering,Software Engineer L2,102500.50,True"));
        assert!(lines[2].ends_with(",False"));
        Ok(())
    }

    #[test]
    fn test_render_csv_quotes_embedded_commas() -> ApiResult<()> {
        let mut odd = row("Ada", "Lovelace", true);
        odd.department = "Research, Advanced".to_string();
        let csv = render_csv(&[odd])?;
        assert!(csv.contains("\"Research, Advanced\""));
        Ok(())
    }
}
