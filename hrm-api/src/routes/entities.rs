//! CRUD routes for the seven record collections.

use super::generic::entity_routes;

entity_routes! {
    departments: Department, CreateDepartmentRequest, UpdateDepartmentRequest, DepartmentFilter,
    tag = "Departments", list = "/api/v1/departments", item = "/api/v1/departments/{id}"
}

entity_routes! {
    roles: Role, CreateRoleRequest, UpdateRoleRequest, RoleFilter,
    tag = "Roles", list = "/api/v1/roles", item = "/api/v1/roles/{id}"
}

entity_routes! {
    employees: Employee, CreateEmployeeRequest, UpdateEmployeeRequest, EmployeeFilter,
    tag = "Employees", list = "/api/v1/employees", item = "/api/v1/employees/{id}"
}

entity_routes! {
    attendance: Attendance, CreateAttendanceRequest, UpdateAttendanceRequest, AttendanceFilter,
    tag = "Attendance", list = "/api/v1/attendance", item = "/api/v1/attendance/{id}"
}

entity_routes! {
    performance_reviews: PerformanceReview, CreateReviewRequest, UpdateReviewRequest, ReviewFilter,
    tag = "Performance Reviews",
    list = "/api/v1/performance-reviews",
    item = "/api/v1/performance-reviews/{id}"
}

entity_routes! {
    projects: Project, CreateProjectRequest, UpdateProjectRequest, ProjectFilter,
    tag = "Projects", list = "/api/v1/projects", item = "/api/v1/projects/{id}"
}

entity_routes! {
    assignments: Assignment, CreateAssignmentRequest, UpdateAssignmentRequest, AssignmentFilter,
    tag = "Assignments", list = "/api/v1/assignments", item = "/api/v1/assignments/{id}"
}
