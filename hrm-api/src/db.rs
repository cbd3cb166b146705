//! Database Connection Pool Module
//!
//! PostgreSQL connection pooling with deadpool-postgres, the generic CRUD
//! operations driven by [`Component`], and the aggregate queries behind the
//! report endpoints.
//!
//! All SQL is parameterized. Identifiers that are interpolated (tables,
//! columns, ORDER BY terms) come from `Component` constants, never from
//! request input.

use crate::component::{order_by, to_sql_refs, Component, ListFilter, SqlParam, WhereBuilder};
use crate::error::{ApiError, ApiResult, WriteOp};
use crate::schema;
use crate::telemetry::observe_db;
use crate::types::{ListParams, ListResponse, Pagination};
use hrm_core::reports::decimal_or_zero;
use hrm_core::{
    new_entity_id, AnalyticsSummary, AttendanceStatus, ChartData, EmployeeExportRow,
    EmployeeSummary, EntityId, EntityKind, HeadcountRow, RatingRow,
};
use deadpool_postgres::{Config, ManagerConfig, Pool, RecyclingMethod, Runtime};
use std::time::Duration;
use tokio_postgres::{GenericClient, NoTls};

// ============================================================================
// CONNECTION POOL CONFIGURATION
// ============================================================================

/// Database connection pool configuration.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// PostgreSQL host
    pub host: String,
    /// PostgreSQL port
    pub port: u16,
    /// Database name
    pub dbname: String,
    /// Database user
    pub user: String,
    /// Database password
    pub password: String,
    /// Maximum pool size
    pub max_size: usize,
    /// Connection timeout
    pub timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            dbname: "hrm".to_string(),
            user: "postgres".to_string(),
            password: "".to_string(),
            max_size: 16,
            timeout: Duration::from_secs(30),
        }
    }
}

impl DbConfig {
    /// Create a new database configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("HRM_DB_HOST").unwrap_or(defaults.host),
            port: std::env::var("HRM_DB_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            dbname: std::env::var("HRM_DB_NAME").unwrap_or(defaults.dbname),
            user: std::env::var("HRM_DB_USER").unwrap_or(defaults.user),
            password: std::env::var("HRM_DB_PASSWORD").unwrap_or_default(),
            max_size: std::env::var("HRM_DB_POOL_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_size),
            timeout: std::env::var("HRM_DB_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }

    /// Create a connection pool from this configuration.
    ///
    /// Connections are opened lazily, so this succeeds without a reachable
    /// server.
    pub fn create_pool(&self) -> ApiResult<Pool> {
        let mut cfg = Config::new();
        cfg.host = Some(self.host.clone());
        cfg.port = Some(self.port);
        cfg.dbname = Some(self.dbname.clone());
        cfg.user = Some(self.user.clone());
        cfg.password = Some(self.password.clone());
        cfg.connect_timeout = Some(self.timeout);

        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });
        cfg.pool = Some(deadpool_postgres::PoolConfig {
            max_size: self.max_size,
            timeouts: deadpool_postgres::Timeouts {
                wait: Some(self.timeout),
                create: Some(self.timeout),
                recycle: Some(self.timeout),
            },
            ..Default::default()
        });

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| ApiError::database_error(format!("Failed to create pool: {}", e)))?;

        Ok(pool)
    }
}

// ============================================================================
// SQL BUILDERS
// ============================================================================

/// `INSERT INTO table (a, b) VALUES ($1, $2)`
pub(crate) fn insert_sql(table: &str, columns: &[(&str, SqlParam)]) -> String {
    let names: Vec<&str> = columns.iter().map(|(name, _)| *name).collect();
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("${}", i)).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        names.join(", "),
        placeholders.join(", ")
    )
}

/// `UPDATE table SET a = $1, b = $2[, updated_at = now()] WHERE id = $3`
pub(crate) fn update_sql(table: &str, columns: &[(&str, SqlParam)], touch_updated_at: bool) -> String {
    let mut assignments: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(i, (name, _))| format!("{} = ${}", name, i + 1))
        .collect();
    if touch_updated_at {
        assignments.push("updated_at = now()".to_string());
    }
    format!(
        "UPDATE {} SET {} WHERE id = ${}",
        table,
        assignments.join(", "),
        columns.len() + 1
    )
}

async fn select_by_id<C, G>(client: &G, id: EntityId) -> ApiResult<Option<C>>
where
    C: Component,
    G: GenericClient,
{
    let sql = format!("{} WHERE t.id = $1", C::SELECT);
    match client.query_opt(&sql, &[&id]).await? {
        Some(row) => C::from_row(&row).map(Some),
        None => Ok(None),
    }
}

// ============================================================================
// DATABASE CLIENT WRAPPER
// ============================================================================

/// Database client that wraps a connection pool.
#[derive(Clone)]
pub struct DbClient {
    pool: Pool,
}

impl DbClient {
    /// Create a new database client with the given pool.
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Create a new database client from configuration.
    pub fn from_config(config: &DbConfig) -> ApiResult<Self> {
        let pool = config.create_pool()?;
        Ok(Self::new(pool))
    }

    /// Get the current pool size for observability.
    pub fn pool_size(&self) -> usize {
        let status = self.pool.status();
        status.size
    }

    /// Get a connection from the pool.
    pub(crate) async fn get_conn(&self) -> ApiResult<deadpool_postgres::Object> {
        self.pool.get().await.map_err(ApiError::from)
    }

    /// Create the schema if it does not exist yet.
    pub async fn migrate(&self) -> ApiResult<()> {
        let conn = self.get_conn().await?;
        conn.batch_execute(schema::MIGRATION).await?;
        tracing::info!("Database schema is up to date");
        Ok(())
    }

    /// Health check - verifies database connectivity.
    pub async fn health_check(&self) -> ApiResult<()> {
        let conn = self.get_conn().await?;
        conn.query_one("SELECT 1", &[]).await?;
        Ok(())
    }
}

// ============================================================================
// GENERIC CRUD OPERATIONS (Component Trait Based)
// ============================================================================

impl DbClient {
    /// Generic create operation for any Component type.
    ///
    /// Inserts one row with a fresh UUIDv7 id and reads it back through the
    /// component's SELECT so joined fields are populated.
    pub async fn create<C: Component>(&self, req: &C::Create) -> ApiResult<C> {
        observe_db("create", C::TABLE, async {
            let conn = self.get_conn().await?;
            let id = new_entity_id();
            let mut columns = C::create_columns(req);
            columns.insert(0, ("id", SqlParam::Uuid(id)));

            let sql = insert_sql(C::TABLE, &columns);
            let params: Vec<SqlParam> = columns.into_iter().map(|(_, p)| p).collect();
            conn.execute(&sql, &to_sql_refs(&params))
                .await
                .map_err(|e| ApiError::from_write(e, C::KIND, WriteOp::Insert))?;

            tracing::debug!(entity = %C::KIND, %id, "created");
            select_by_id::<C, _>(&**conn, id)
                .await?
                .ok_or_else(|| ApiError::internal_error(format!("Failed to retrieve created {}", C::KIND)))
        })
        .await
    }

    /// Generic get operation. `None` when no row has this id.
    pub async fn get<C: Component>(&self, id: EntityId) -> ApiResult<Option<C>> {
        observe_db("get", C::TABLE, async {
            let conn = self.get_conn().await?;
            select_by_id::<C, _>(&**conn, id).await
        })
        .await
    }

    /// Like [`DbClient::get`] but a missing row is an `ENTITY_NOT_FOUND` error.
    pub async fn fetch<C: Component>(&self, id: EntityId) -> ApiResult<C> {
        self.get::<C>(id).await?.ok_or_else(|| C::not_found_error(id))
    }

    /// Generic partial update.
    ///
    /// Runs in a transaction so that cross-field rules can be re-checked on
    /// the merged row before committing.
    pub async fn update<C: Component>(&self, id: EntityId, req: &C::Update) -> ApiResult<C> {
        observe_db("update", C::TABLE, async {
            let mut columns = C::update_columns(req);
            if columns.is_empty() {
                return self.fetch::<C>(id).await;
            }

            let mut conn = self.get_conn().await?;
            let tx = conn.transaction().await?;

            let sql = update_sql(C::TABLE, &columns, C::HAS_UPDATED_AT);
            columns.push(("id", SqlParam::Uuid(id)));
            let params: Vec<SqlParam> = columns.into_iter().map(|(_, p)| p).collect();
            let changed = tx
                .execute(&sql, &to_sql_refs(&params))
                .await
                .map_err(|e| ApiError::from_write(e, C::KIND, WriteOp::Update))?;
            if changed == 0 {
                return Err(C::not_found_error(id));
            }

            let updated = select_by_id::<C, _>(&*tx, id)
                .await?
                .ok_or_else(|| C::not_found_error(id))?;
            // Dropping the transaction on error rolls the update back.
            updated.check_stored()?;
            tx.commit().await?;

            tracing::debug!(entity = %C::KIND, %id, "updated");
            Ok(updated)
        })
        .await
    }

    /// Generic delete. Cascades follow the schema; a RESTRICT reference
    /// becomes `DELETE_PROTECTED`.
    pub async fn delete<C: Component>(&self, id: EntityId) -> ApiResult<()> {
        observe_db("delete", C::TABLE, async {
            let conn = self.get_conn().await?;
            let sql = format!("DELETE FROM {} WHERE id = $1", C::TABLE);
            let deleted = conn
                .execute(&sql, &[&id])
                .await
                .map_err(|e| ApiError::from_write(e, C::KIND, WriteOp::Delete))?;
            if deleted == 0 {
                return Err(C::not_found_error(id));
            }
            tracing::debug!(entity = %C::KIND, %id, "deleted");
            Ok(())
        })
        .await
    }

    /// Generic list with filters, search, ordering and pagination.
    pub async fn list<C: Component>(
        &self,
        params: &ListParams,
        filter: &C::ListFilter,
        page: Pagination,
    ) -> ApiResult<ListResponse<C>> {
        observe_db("list", C::TABLE, async {
            let conn = self.get_conn().await?;

            let mut builder = WhereBuilder::new();
            filter.apply(&mut builder);
            builder.search(C::SEARCH_FIELDS, params.search.as_deref());
            let (clause, mut sql_params) = builder.build();

            let count_sql = format!("SELECT COUNT(*) FROM ({} WHERE {}) AS matched", C::SELECT, clause);
            let total: i64 = conn
                .query_one(&count_sql, &to_sql_refs(&sql_params))
                .await?
                .try_get(0)?;
            if page.is_past_end(total) {
                return Err(ApiError::invalid_page(page.page));
            }

            let ordering = order_by(params.ordering.as_deref(), C::ORDERING_FIELDS, C::DEFAULT_ORDERING);
            let limit_idx = sql_params.len() + 1;
            sql_params.push(SqlParam::Long(page.limit()));
            sql_params.push(SqlParam::Long(page.offset()));
            let sql = format!(
                "{} WHERE {} ORDER BY {} LIMIT ${} OFFSET ${}",
                C::SELECT,
                clause,
                ordering,
                limit_idx,
                limit_idx + 1
            );

            let rows = conn.query(&sql, &to_sql_refs(&sql_params)).await?;
            let items = rows.iter().map(C::from_row).collect::<ApiResult<Vec<C>>>()?;

            Ok(ListResponse {
                items,
                total,
                page: page.page,
                page_size: page.page_size,
            })
        })
        .await
    }

    /// Number of rows in a record type's table.
    pub async fn count<C: Component>(&self) -> ApiResult<i64> {
        let conn = self.get_conn().await?;
        let sql = format!("SELECT COUNT(*) FROM {}", C::TABLE);
        Ok(conn.query_one(&sql, &[]).await?.try_get(0)?)
    }
}

// ============================================================================
// REPORT QUERIES
// ============================================================================

const HEADCOUNT_SQL: &str = "SELECT d.name, COUNT(e.id) AS c \
     FROM departments d LEFT JOIN employees e ON e.department_id = d.id \
     GROUP BY d.id, d.name ORDER BY d.name, d.id";

impl DbClient {
    /// Per-employee aggregate. Empty review or attendance sets yield zeros.
    pub async fn employee_summary(&self, id: EntityId) -> ApiResult<EmployeeSummary> {
        observe_db("summary", "employees", async {
            let conn = self.get_conn().await?;
            let row = conn
                .query_opt(
                    "SELECT e.id, e.first_name, e.last_name, d.name AS department, \
                            r.title, r.level, \
                            (SELECT AVG(pr.rating) FROM performance_reviews pr \
                              WHERE pr.employee_id = e.id) AS average_rating, \
                            (SELECT SUM(pr.bonus_amount) FROM performance_reviews pr \
                              WHERE pr.employee_id = e.id) AS total_bonus, \
                            (SELECT COUNT(*) FROM attendance a \
                              WHERE a.employee_id = e.id AND a.status = $2) AS present_days \
                     FROM employees e \
                     JOIN departments d ON d.id = e.department_id \
                     JOIN roles r ON r.id = e.role_id \
                     WHERE e.id = $1",
                    &[&id, &AttendanceStatus::Present.as_db_str()],
                )
                .await?
                .ok_or_else(|| ApiError::entity_not_found(EntityKind::Employee, id))?;

            let first: String = row.try_get("first_name")?;
            let last: String = row.try_get("last_name")?;
            let title: String = row.try_get("title")?;
            let level: String = row.try_get("level")?;
            Ok(EmployeeSummary {
                employee_id: row.try_get("id")?,
                employee_name: format!("{} {}", first, last),
                department: row.try_get("department")?,
                role: format!("{} ({})", title, level),
                average_rating: decimal_or_zero(row.try_get("average_rating")?),
                total_bonus: decimal_or_zero(row.try_get("total_bonus")?),
                attendance_present_days: row.try_get("present_days")?,
            })
        })
        .await
    }

    /// Live employee count per department, alphabetical by name.
    pub async fn headcount_by_department(&self) -> ApiResult<Vec<HeadcountRow>> {
        let conn = self.get_conn().await?;
        headcount_with(&**conn).await
    }

    /// Organization-wide analytics. Both queries share one pooled
    /// connection.
    pub async fn analytics_summary(&self) -> ApiResult<AnalyticsSummary> {
        observe_db("analytics", "performance_reviews", async {
            let conn = self.get_conn().await?;
            let row = conn
                .query_one(
                    "SELECT AVG(rating) AS average_rating, SUM(bonus_amount) AS total_bonus \
                     FROM performance_reviews",
                    &[],
                )
                .await?;
            Ok(AnalyticsSummary {
                average_rating_overall: decimal_or_zero(row.try_get("average_rating")?),
                total_bonus_paid: decimal_or_zero(row.try_get("total_bonus")?),
                headcount_by_department: headcount_with(&**conn).await?,
            })
        })
        .await
    }

    /// Average rating of every reviewed employee.
    pub async fn employee_ratings(&self) -> ApiResult<Vec<RatingRow>> {
        let conn = self.get_conn().await?;
        ratings_with(&**conn).await
    }

    /// Series for the charts page, read over one pooled connection.
    pub async fn chart_data(&self) -> ApiResult<ChartData> {
        observe_db("charts", "employees", async {
            let conn = self.get_conn().await?;
            let headcount = headcount_with(&**conn).await?;
            let ratings = ratings_with(&**conn).await?;
            Ok(ChartData::new(headcount, ratings))
        })
        .await
    }

    /// Every employee in export order.
    pub async fn export_rows(&self) -> ApiResult<Vec<EmployeeExportRow>> {
        observe_db("export", "employees", async {
            let conn = self.get_conn().await?;
            let rows = conn
                .query(
                    "SELECT e.id, e.first_name, e.last_name, e.email, e.hire_date, \
                            d.name AS department, r.title, r.level, e.base_salary, e.is_active \
                     FROM employees e \
                     JOIN departments d ON d.id = e.department_id \
                     JOIN roles r ON r.id = e.role_id \
                     ORDER BY e.id",
                    &[],
                )
                .await?;
            rows.iter()
                .map(|row| {
                    Ok(EmployeeExportRow {
                        id: row.try_get("id")?,
                        first_name: row.try_get("first_name")?,
                        last_name: row.try_get("last_name")?,
                        email: row.try_get("email")?,
                        hire_date: row.try_get("hire_date")?,
                        department: row.try_get("department")?,
                        role_title: row.try_get("title")?,
                        role_level: row.try_get("level")?,
                        base_salary: row.try_get("base_salary")?,
                        is_active: row.try_get("is_active")?,
                    })
                })
                .collect()
        })
        .await
    }

    /// Rewrite every department's cached headcount from the employee table.
    /// Returns the number of departments updated.
    pub async fn recompute_headcount(&self) -> ApiResult<u64> {
        observe_db("recompute_headcount", "departments", async {
            let conn = self.get_conn().await?;
            let updated = recompute_headcount_with(&**conn).await?;
            tracing::info!(updated, "Recomputed department headcount");
            Ok(updated)
        })
        .await
    }
}

async fn headcount_with<G: GenericClient>(client: &G) -> ApiResult<Vec<HeadcountRow>> {
    let rows = client.query(HEADCOUNT_SQL, &[]).await?;
    rows.iter()
        .map(|row| {
            Ok(HeadcountRow {
                name: row.try_get("name")?,
                c: row.try_get("c")?,
            })
        })
        .collect()
}

async fn ratings_with<G: GenericClient>(client: &G) -> ApiResult<Vec<RatingRow>> {
    let rows = client
        .query(
            "SELECT e.id, e.first_name, e.last_name, AVG(pr.rating) AS average_rating \
             FROM employees e JOIN performance_reviews pr ON pr.employee_id = e.id \
             GROUP BY e.id, e.first_name, e.last_name",
            &[],
        )
        .await?;
    rows.iter()
        .map(|row| {
            let first: String = row.try_get("first_name")?;
            let last: String = row.try_get("last_name")?;
            Ok(RatingRow {
                employee_id: row.try_get("id")?,
                employee_name: format!("{} {}", first, last),
                average_rating: decimal_or_zero(row.try_get("average_rating")?),
            })
        })
        .collect()
}

/// Headcount refresh usable inside a caller's transaction.
pub(crate) async fn recompute_headcount_with<G: GenericClient>(client: &G) -> ApiResult<u64> {
    Ok(client
        .execute(
            "UPDATE departments d SET headcount = \
             (SELECT COUNT(*) FROM employees e WHERE e.department_id = d.id)",
            &[],
        )
        .await?)
}
