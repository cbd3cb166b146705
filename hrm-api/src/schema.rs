//! Embedded schema migration and the catalog of named constraints.
//!
//! Constraint names in the migration are referenced here so write errors
//! can report which fields a violated constraint covers.

/// Idempotent DDL for all HRM tables.
pub const MIGRATION: &str = include_str!("../migrations/0001_hrm_schema.sql");

/// Named constraint with the table that owns it and the columns it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstraintInfo {
    pub name: &'static str,
    pub table: &'static str,
    pub fields: &'static [&'static str],
}

pub const CONSTRAINTS: &[ConstraintInfo] = &[
    ConstraintInfo { name: "departments_name_key", table: "departments", fields: &["name"] },
    ConstraintInfo { name: "departments_code_key", table: "departments", fields: &["code"] },
    ConstraintInfo { name: "departments_headcount_check", table: "departments", fields: &["headcount"] },
    ConstraintInfo { name: "roles_title_level_key", table: "roles", fields: &["title", "level"] },
    ConstraintInfo { name: "employees_email_key", table: "employees", fields: &["email"] },
    ConstraintInfo { name: "employees_department_id_fkey", table: "employees", fields: &["department_id"] },
    ConstraintInfo { name: "employees_role_id_fkey", table: "employees", fields: &["role_id"] },
    ConstraintInfo { name: "attendance_employee_date_key", table: "attendance", fields: &["employee_id", "date"] },
    ConstraintInfo { name: "attendance_status_check", table: "attendance", fields: &["status"] },
    ConstraintInfo { name: "attendance_employee_id_fkey", table: "attendance", fields: &["employee_id"] },
    ConstraintInfo {
        name: "performance_reviews_employee_period_key",
        table: "performance_reviews",
        fields: &["employee_id", "period_start", "period_end"],
    },
    ConstraintInfo { name: "performance_reviews_goals_met_check", table: "performance_reviews", fields: &["goals_met"] },
    ConstraintInfo { name: "performance_reviews_employee_id_fkey", table: "performance_reviews", fields: &["employee_id"] },
    ConstraintInfo { name: "projects_code_key", table: "projects", fields: &["code"] },
    ConstraintInfo { name: "projects_department_id_fkey", table: "projects", fields: &["department_id"] },
    ConstraintInfo {
        name: "assignments_employee_project_start_key",
        table: "assignments",
        fields: &["employee_id", "project_id", "start_date"],
    },
    ConstraintInfo { name: "assignments_allocation_percent_check", table: "assignments", fields: &["allocation_percent"] },
    ConstraintInfo { name: "assignments_employee_id_fkey", table: "assignments", fields: &["employee_id"] },
    ConstraintInfo { name: "assignments_project_id_fkey", table: "assignments", fields: &["project_id"] },
];

pub fn constraint(name: &str) -> Option<&'static ConstraintInfo> {
    CONSTRAINTS.iter().find(|c| c.name == name)
}

/// Columns covered by a constraint; empty for unknown names.
pub fn constraint_fields(name: &str) -> Vec<&'static str> {
    constraint(name).map(|c| c.fields.to_vec()).unwrap_or_default()
}

/// Table owning a constraint. For foreign keys this is the referencing
/// (child) table.
pub fn constraint_table(name: &str) -> Option<&'static str> {
    constraint(name).map(|c| c.table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_catalog_entry_is_declared_in_migration() {
        for info in CONSTRAINTS {
            assert!(
                MIGRATION.contains(&format!("CONSTRAINT {}", info.name)),
                "{} missing from migration",
                info.name
            );
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(constraint_fields("roles_title_level_key"), vec!["title", "level"]);
        assert_eq!(constraint_table("employees_department_id_fkey"), Some("employees"));
        assert!(constraint_fields("unknown").is_empty());
    }

    #[test]
    fn test_protected_and_cascading_references() {
        assert!(MIGRATION.contains("REFERENCES departments (id) ON DELETE RESTRICT"));
        assert!(MIGRATION.contains("REFERENCES roles (id) ON DELETE RESTRICT"));
        assert_eq!(MIGRATION.matches("REFERENCES employees (id) ON DELETE CASCADE").count(), 3);
        assert!(MIGRATION.contains("REFERENCES projects (id) ON DELETE CASCADE"));
    }
}
