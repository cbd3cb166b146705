//! Component implementations for the seven record types.
//!
//! Each module implements [`Component`](crate::component::Component) for a
//! `hrm_core` record: its SELECT (with the joins search needs), column
//! bindings for writes and row decoding.
//!
//! ```ignore
//! let dept = db.create::<Department>(&req).await?;
//! let page = db.list::<Employee>(&params, &filter, pagination).await?;
//! ```

mod assignment;
mod attendance;
mod department;
mod employee;
mod project;
mod review;
mod role;

#[cfg(test)]
mod tests {
    use crate::component::Component;
    use hrm_core::{Assignment, Attendance, Department, Employee, PerformanceReview, Project, Role};

    /// Every qualified column a component refers to must come from a table
    /// its SELECT actually joins.
    fn assert_columns_resolve<C: Component>() {
        let aliases: Vec<&str> = C::SELECT
            .split_whitespace()
            .collect::<Vec<_>>()
            .windows(2)
            .filter(|w| w[0] == "FROM" || w[0] == "JOIN")
            .map(|w| w[1])
            .collect();
        assert!(
            C::SELECT.contains(&format!("FROM {} t", C::TABLE)),
            "{} SELECT must alias its table as t",
            C::KIND
        );
        let referenced = C::SEARCH_FIELDS
            .iter()
            .copied()
            .chain(C::ORDERING_FIELDS.iter().map(|(_, col)| *col));
        for column in referenced {
            let (alias, _) = column.split_once('.').unwrap_or(("", column));
            let joined = alias == "t"
                || C::SELECT.contains(&format!(" {} ON ", alias));
            assert!(joined, "{}: {} is not joined (tables: {:?})", C::KIND, column, aliases);
        }
        assert!(!C::DEFAULT_ORDERING.is_empty());
    }

    #[test]
    fn test_component_columns_resolve() {
        assert_columns_resolve::<Department>();
        assert_columns_resolve::<Role>();
        assert_columns_resolve::<Employee>();
        assert_columns_resolve::<Attendance>();
        assert_columns_resolve::<PerformanceReview>();
        assert_columns_resolve::<Project>();
        assert_columns_resolve::<Assignment>();
    }

    #[test]
    fn test_default_orderings() {
        assert_eq!(Attendance::DEFAULT_ORDERING, "t.date DESC");
        assert_eq!(PerformanceReview::DEFAULT_ORDERING, "t.period_end DESC");
        assert_eq!(Project::DEFAULT_ORDERING, "t.start_date ASC");
        assert_eq!(Employee::DEFAULT_ORDERING, "t.id ASC");
    }

    #[test]
    fn test_partial_update_only_binds_sent_fields() {
        let req = crate::types::UpdateEmployeeRequest {
            last_name: Some(" Hopper ".to_string()),
            is_active: Some(false),
            ..Default::default()
        };
        let cols = Employee::update_columns(&req);
        let names: Vec<_> = cols.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["last_name", "is_active"]);
        assert_eq!(cols[0].1, crate::component::SqlParam::String("Hopper".to_string()));
    }
}
