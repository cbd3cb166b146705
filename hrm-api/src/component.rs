//! Component trait for generic CRUD operations.
//!
//! All seven record types share five generic database operations instead of
//! per-entity copies. Each record type implements [`Component`], which
//! provides:
//! - Table name and a SELECT clause (with joins needed for search)
//! - Create/Update request types and their column bindings
//! - Search fields, ordering whitelist and default ordering
//! - Row decoding
//!
//! The `DbClient` then uses these trait methods to implement generic
//! create, get, update, delete, and list operations.

use crate::error::{ApiError, ApiResult};
pub use crate::validation::Validate;
use hrm_core::{EntityId, EntityKind, ValidationError};
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Serialize};
use tokio_postgres::Row;

// ============================================================================
// COMPONENT TRAIT
// ============================================================================

/// Trait for record types persisted via generic CRUD operations.
///
/// # Type Parameters
///
/// The associated types define the request shapes:
/// - `Create`: Request body for creating new records
/// - `Update`: Request body for partial updates
/// - `ListFilter`: Exact-match query filters for list queries
pub trait Component: Sized + Send + Sync + Clone + Serialize + 'static {
    /// Request type for creating new records.
    type Create: DeserializeOwned + Validate + Send + Sync;

    /// Request type for updating records. Every field is optional.
    type Update: DeserializeOwned + Validate + Send + Sync;

    /// Filter type for list queries.
    type ListFilter: ListFilter + DeserializeOwned + Default + Send + Sync;

    /// Record type discriminator (error messages, metrics labels).
    const KIND: EntityKind;

    /// Table name; the root table is always aliased `t` in [`Self::SELECT`].
    const TABLE: &'static str;

    /// `SELECT ... FROM <table> t [JOIN ...]` without WHERE or ORDER BY.
    const SELECT: &'static str;

    /// Qualified text columns matched by `?search=`.
    const SEARCH_FIELDS: &'static [&'static str];

    /// Allowed `?ordering=` names mapped to qualified columns.
    const ORDERING_FIELDS: &'static [(&'static str, &'static str)];

    /// ORDER BY clause used when no valid ordering is requested.
    const DEFAULT_ORDERING: &'static str;

    /// Whether the table has an `updated_at` column to bump on update.
    const HAS_UPDATED_AT: bool = false;

    /// Columns and values to insert, excluding `id`.
    fn create_columns(req: &Self::Create) -> Vec<(&'static str, SqlParam)>;

    /// Columns and values to change. Empty means nothing to update.
    fn update_columns(req: &Self::Update) -> Vec<(&'static str, SqlParam)>;

    /// Decode one row produced by [`Self::SELECT`].
    fn from_row(row: &Row) -> ApiResult<Self>;

    /// Cross-field rules re-checked on the stored record after a partial
    /// update, when one side of a pair may come from the old row.
    fn check_stored(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    /// Create a not-found error for this record type.
    fn not_found_error(id: EntityId) -> ApiError {
        ApiError::entity_not_found(Self::KIND, id)
    }
}

// ============================================================================
// SQL PARAMETER TYPE
// ============================================================================

/// Type-erased SQL parameter for generic CRUD operations.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Uuid(uuid::Uuid),
    String(String),
    Int(i32),
    Bool(bool),
    Decimal(Decimal),
    Date(chrono::NaiveDate),
    OptDate(Option<chrono::NaiveDate>),
    Long(i64),
}

impl SqlParam {
    /// Text column value with surrounding whitespace removed.
    pub fn text(value: String) -> Self {
        let trimmed = value.trim();
        if trimmed.len() == value.len() {
            SqlParam::String(value)
        } else {
            SqlParam::String(trimmed.to_string())
        }
    }

    /// Convert this SqlParam to a reference that can be used with tokio_postgres.
    pub fn as_to_sql(&self) -> &(dyn tokio_postgres::types::ToSql + Sync) {
        match self {
            SqlParam::Uuid(v) => v,
            SqlParam::String(v) => v,
            SqlParam::Int(v) => v,
            SqlParam::Bool(v) => v,
            SqlParam::Decimal(v) => v,
            SqlParam::Date(v) => v,
            SqlParam::OptDate(v) => v,
            SqlParam::Long(v) => v,
        }
    }
}

/// Borrow a parameter list in the shape `tokio_postgres` expects.
pub fn to_sql_refs(params: &[SqlParam]) -> Vec<&(dyn tokio_postgres::types::ToSql + Sync)> {
    params.iter().map(SqlParam::as_to_sql).collect()
}

// ============================================================================
// WHERE CLAUSE BUILDER
// ============================================================================

/// Accumulates AND-ed conditions with numbered placeholders.
#[derive(Debug, Default)]
pub struct WhereBuilder {
    conditions: Vec<String>,
    params: Vec<SqlParam>,
}

impl WhereBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn bind(&mut self, param: SqlParam) -> usize {
        self.params.push(param);
        self.params.len()
    }

    /// `column = $n`
    pub fn eq(&mut self, column: &str, param: SqlParam) -> &mut Self {
        let idx = self.bind(param);
        self.conditions.push(format!("{} = ${}", column, idx));
        self
    }

    /// `column = $n` when the value is present.
    pub fn eq_opt<T>(&mut self, column: &str, value: Option<T>, param: impl FnOnce(T) -> SqlParam) -> &mut Self {
        if let Some(value) = value {
            self.eq(column, param(value));
        }
        self
    }

    /// Every whitespace-separated term must match at least one field,
    /// case-insensitively.
    pub fn search(&mut self, fields: &[&str], text: Option<&str>) -> &mut Self {
        let Some(text) = text else {
            return self;
        };
        if fields.is_empty() {
            return self;
        }
        for term in search_terms(text) {
            let idx = self.bind(SqlParam::String(format!("%{}%", escape_like(&term))));
            let alternatives: Vec<String> = fields
                .iter()
                .map(|field| format!("{}::text ILIKE ${}", field, idx))
                .collect();
            self.conditions.push(format!("({})", alternatives.join(" OR ")));
        }
        self
    }

    /// Number of parameters bound so far.
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Finish into a WHERE body (`TRUE` when empty) and its parameters.
    pub fn build(self) -> (String, Vec<SqlParam>) {
        let clause = if self.conditions.is_empty() {
            "TRUE".to_string()
        } else {
            self.conditions.join(" AND ")
        };
        (clause, self.params)
    }
}

/// Split search text into terms the way the list endpoints do: on
/// whitespace and commas, dropping empties.
pub fn search_terms(text: &str) -> Vec<String> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

// ============================================================================
// ORDERING
// ============================================================================

/// Build an ORDER BY body from a comma list such as `-hire_date,base_salary`.
///
/// Names not in `allowed` are ignored. Falls back to `default` when nothing
/// valid remains. `t.id` is always appended so paging is stable.
pub fn order_by(requested: Option<&str>, allowed: &[(&str, &str)], default: &str) -> String {
    let mut terms: Vec<String> = Vec::new();
    if let Some(requested) = requested {
        for raw in requested.split(',') {
            let raw = raw.trim();
            let (name, direction) = match raw.strip_prefix('-') {
                Some(name) => (name, "DESC"),
                None => (raw, "ASC"),
            };
            if let Some((_, column)) = allowed.iter().find(|(field, _)| *field == name) {
                let term = format!("{} {}", column, direction);
                if !terms.iter().any(|t| t.starts_with(&format!("{} ", column))) {
                    terms.push(term);
                }
            }
        }
    }
    if terms.is_empty() {
        terms.push(default.to_string());
    }
    if !terms.iter().any(|t| t.starts_with("t.id ")) {
        terms.push("t.id ASC".to_string());
    }
    terms.join(", ")
}

// ============================================================================
// LIST FILTER TRAIT
// ============================================================================

/// Trait for exact-match list filters.
pub trait ListFilter {
    /// Push this filter's conditions onto the builder.
    fn apply(&self, builder: &mut WhereBuilder);
}

/// Filter for record types without exact-match filters.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct NoFilter {}

impl ListFilter for NoFilter {
    fn apply(&self, _builder: &mut WhereBuilder) {}
}

// ============================================================================
// HELPER MACROS
// ============================================================================

/// Push optional update fields onto a column list.
///
/// # Example
///
/// ```ignore
/// let mut cols = Vec::new();
/// push_updates!(cols, req, {
///     name => SqlParam::String,
///     budget => SqlParam::Decimal,
/// });
/// ```
#[macro_export]
macro_rules! push_updates {
    ($cols:ident, $req:ident, { $($field:ident => $ctor:path),* $(,)? }) => {
        $(
            if let Some(value) = &$req.$field {
                $cols.push((stringify!($field), $ctor(value.clone())));
            }
        )*
    };
}

pub use crate::push_updates;

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const FIELDS: &[(&str, &str)] = &[("hire_date", "t.hire_date"), ("base_salary", "t.base_salary")];

    #[test]
    fn test_order_by_defaults() {
        assert_eq!(order_by(None, FIELDS, "t.id ASC"), "t.id ASC");
        assert_eq!(order_by(Some(""), FIELDS, "t.date DESC"), "t.date DESC, t.id ASC");
    }

    #[test]
    fn test_order_by_parses_direction_and_ignores_unknown() {
        assert_eq!(
            order_by(Some("-base_salary, hire_date,email"), FIELDS, "t.id ASC"),
            "t.base_salary DESC, t.hire_date ASC, t.id ASC"
        );
        assert_eq!(order_by(Some("password;drop"), FIELDS, "t.id ASC"), "t.id ASC");
    }

    #[test]
    fn test_order_by_keeps_first_direction_for_repeated_field() {
        assert_eq!(
            order_by(Some("hire_date,-hire_date"), FIELDS, "t.id ASC"),
            "t.hire_date ASC, t.id ASC"
        );
    }

    #[test]
    fn test_where_builder_numbers_params() {
        let mut builder = WhereBuilder::new();
        builder
            .eq("t.department_id", SqlParam::Uuid(uuid::Uuid::nil()))
            .search(&["t.first_name", "t.last_name"], Some("ada  love"))
            .eq_opt("t.is_active", Some(true), SqlParam::Bool);
        let (clause, params) = builder.build();
        assert_eq!(
            clause,
            "t.department_id = $1 AND (t.first_name::text ILIKE $2 OR t.last_name::text ILIKE $2) \
             AND (t.first_name::text ILIKE $3 OR t.last_name::text ILIKE $3) AND t.is_active = $4"
        );
        assert_eq!(params.len(), 4);
        assert_eq!(params[1], SqlParam::String("%ada%".to_string()));
    }

    #[test]
    fn test_empty_builder_is_true() {
        let (clause, params) = WhereBuilder::new().build();
        assert_eq!(clause, "TRUE");
        assert!(params.is_empty());
    }

    #[test]
    fn test_search_escapes_like_wildcards() {
        let mut builder = WhereBuilder::new();
        builder.search(&["t.name"], Some("50%_off"));
        let (_, params) = builder.build();
        assert_eq!(params[0], SqlParam::String("%50\\%\\_off%".to_string()));
    }

    proptest! {
        #[test]
        fn prop_order_by_only_emits_whitelisted_columns(input in ".{0,64}") {
            let clause = order_by(Some(&input), FIELDS, "t.id ASC");
            for term in clause.split(", ") {
                prop_assert!(
                    term == "t.id ASC"
                        || term.starts_with("t.hire_date ")
                        || term.starts_with("t.base_salary ")
                );
            }
        }

        #[test]
        fn prop_search_binds_one_param_per_term(words in prop::collection::vec("[a-z]{1,8}", 0..6)) {
            let text = words.join(" ");
            let mut builder = WhereBuilder::new();
            builder.search(&["t.name", "t.code"], Some(&text));
            prop_assert_eq!(builder.param_count(), words.len());
        }
    }
}
