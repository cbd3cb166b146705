//! OpenAPI document for the HRM API.
//!
//! Generated by utoipa from the handler annotations and schema derives.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error::{ApiError, ErrorCode};
use crate::routes::{charts, entities, health, reports};
use crate::telemetry::metrics;
use crate::types::*;

use hrm_core::{
    AnalyticsSummary, Assignment, Attendance, AttendanceStatus, ChartData, Department, Employee,
    EmployeeSummary, EntityKind, HeadcountRow, PerformanceReview, Project, RatingRow, Role,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRM API",
        version = "0.1.0",
        description = "Employee records, attendance, reviews, projects and reports",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers((url = "http://localhost:3000", description = "Local Development")),
    tags(
        (name = "Departments", description = "Organizational units and their cached headcount"),
        (name = "Roles", description = "Job titles, levels and salary bands"),
        (name = "Employees", description = "Employee records"),
        (name = "Attendance", description = "Daily attendance entries"),
        (name = "Performance Reviews", description = "Periodic reviews with rating and bonus"),
        (name = "Projects", description = "Department projects"),
        (name = "Assignments", description = "Employee staffing on projects"),
        (name = "Reports", description = "Summaries, analytics, charts and CSV export"),
        (name = "Health", description = "Liveness and readiness"),
        (name = "Observability", description = "Prometheus metrics")
    ),
    paths(
        entities::departments::list, entities::departments::create,
        entities::departments::retrieve, entities::departments::update,
        entities::departments::remove,

        entities::roles::list, entities::roles::create, entities::roles::retrieve,
        entities::roles::update, entities::roles::remove,

        entities::employees::list, entities::employees::create, entities::employees::retrieve,
        entities::employees::update, entities::employees::remove,

        entities::attendance::list, entities::attendance::create,
        entities::attendance::retrieve, entities::attendance::update,
        entities::attendance::remove,

        entities::performance_reviews::list, entities::performance_reviews::create,
        entities::performance_reviews::retrieve, entities::performance_reviews::update,
        entities::performance_reviews::remove,

        entities::projects::list, entities::projects::create, entities::projects::retrieve,
        entities::projects::update, entities::projects::remove,

        entities::assignments::list, entities::assignments::create,
        entities::assignments::retrieve, entities::assignments::update,
        entities::assignments::remove,

        reports::employee_summary,
        reports::analytics_summary,
        reports::chart_series,
        reports::export_csv,
        reports::recompute_headcount,
        charts::charts_page,

        health::health,
        health::liveness,
        health::readiness,
        metrics::metrics_handler,
    ),
    components(
        schemas(
            ApiError, ErrorCode, EntityKind, AttendanceStatus,
            Department, Role, Employee, Attendance, PerformanceReview, Project, Assignment,
            CreateDepartmentRequest, UpdateDepartmentRequest,
            CreateRoleRequest, UpdateRoleRequest,
            CreateEmployeeRequest, UpdateEmployeeRequest,
            CreateAttendanceRequest, UpdateAttendanceRequest,
            CreateReviewRequest, UpdateReviewRequest,
            CreateProjectRequest, UpdateProjectRequest,
            CreateAssignmentRequest, UpdateAssignmentRequest,
            EmployeeSummary, AnalyticsSummary, HeadcountRow, RatingRow, ChartData,
            RecomputeHeadcountResponse,
            health::StatusResponse, health::HealthResponse, health::HealthStatus,
            health::HealthDetails, health::ComponentHealth,
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Registers the `api_key` and `bearer_auth` security schemes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-API-Key"))),
            );
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

impl ApiDoc {
    /// OpenAPI document as pretty JSON.
    pub fn to_json() -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::openapi())
    }
}
