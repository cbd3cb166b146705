//! Generic CRUD handlers for [`Component`] types.
//!
//! The helpers hold the behavior shared by every collection. The
//! `entity_routes!` macro stamps out one documented handler set per record
//! type on top of them, so each entity gets its own OpenAPI operations
//! without repeating the bodies.
//!
//! ```ignore
//! entity_routes! {
//!     employees: Employee, CreateEmployeeRequest, UpdateEmployeeRequest, EmployeeFilter,
//!     tag = "Employees", list = "/api/v1/employees", item = "/api/v1/employees/{id}"
//! }
//!
//! Router::new().nest("/employees", employees::router());
//! ```

use axum::{http::StatusCode, Json};

use crate::{
    component::{Component, Validate},
    db::DbClient,
    error::ApiResult,
    types::{ListParams, ListResponse, PageLimits, Pagination},
};
use hrm_core::EntityId;

// ============================================================================
// GENERIC HANDLER HELPERS
// ============================================================================

/// Validate, insert and return the stored record with 201.
pub async fn create_handler<C: Component>(
    db: DbClient,
    req: C::Create,
) -> ApiResult<(StatusCode, Json<C>)> {
    req.validate()?;
    let entity = db.create::<C>(&req).await?;
    Ok((StatusCode::CREATED, Json(entity)))
}

pub async fn get_handler<C: Component>(db: DbClient, id: EntityId) -> ApiResult<Json<C>> {
    Ok(Json(db.fetch::<C>(id).await?))
}

/// Partial update. Serves both PATCH and PUT.
pub async fn update_handler<C: Component>(
    db: DbClient,
    id: EntityId,
    req: C::Update,
) -> ApiResult<Json<C>> {
    req.validate()?;
    Ok(Json(db.update::<C>(id, &req).await?))
}

pub async fn delete_handler<C: Component>(db: DbClient, id: EntityId) -> ApiResult<StatusCode> {
    db.delete::<C>(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// One page of records. A page past the end (other than the first) is
/// `INVALID_PAGE`.
pub async fn list_handler<C: Component>(
    db: DbClient,
    limits: PageLimits,
    params: ListParams,
    filter: C::ListFilter,
) -> ApiResult<Json<ListResponse<C>>> {
    let page = Pagination::resolve(&params, limits);
    Ok(Json(db.list::<C>(&params, &filter, page).await?))
}

// ============================================================================
// ROUTE FACTORY
// ============================================================================

/// Generate a module of documented CRUD handlers plus its `router()`.
///
/// Routes created, relative to the nesting point:
/// - `GET /` list, `POST /` create
/// - `GET /:id`, `PATCH /:id`, `PUT /:id`, `DELETE /:id`
#[macro_export]
macro_rules! entity_routes {
    (
        $module:ident: $entity:ident, $create:ident, $update:ident, $filter:ident,
        tag = $tag:literal, list = $list_path:literal, item = $item_path:literal $(,)?
    ) => {
        pub mod $module {
            use std::sync::Arc;

            use axum::{
                extract::State,
                http::StatusCode,
                routing::get,
                Json, Router,
            };

            #[allow(unused_imports)]
            use hrm_core::*;
            #[allow(unused_imports)]
            use $crate::types::*;
            #[allow(unused_imports)]
            use $crate::error::ApiError;
            use $crate::{
                config::ApiConfig,
                db::DbClient,
                error::ApiResult,
                extractors::{ApiJson, ApiQuery, PathId},
                routes::generic,
                state::AppState,
            };

            #[cfg_attr(feature = "openapi", utoipa::path(
                get,
                path = $list_path,
                tag = $tag,
                operation_id = concat!("list_", stringify!($module)),
                params(ListParams, $filter),
                responses(
                    (status = 200, description = "One page of records", body = ListResponse<$entity>),
                    (status = 400, description = "Invalid query", body = ApiError),
                    (status = 401, description = "Unauthorized", body = ApiError),
                    (status = 404, description = "Page out of range", body = ApiError),
                ),
                security(("api_key" = []), ("bearer_auth" = []))
            ))]
            pub async fn list(
                State(db): State<DbClient>,
                State(config): State<Arc<ApiConfig>>,
                ApiQuery(params): ApiQuery<ListParams>,
                ApiQuery(filter): ApiQuery<$filter>,
            ) -> ApiResult<Json<ListResponse<$entity>>> {
                generic::list_handler::<$entity>(db, config.page_limits, params, filter).await
            }

            #[cfg_attr(feature = "openapi", utoipa::path(
                post,
                path = $list_path,
                tag = $tag,
                operation_id = concat!("create_", stringify!($module)),
                request_body = $create,
                responses(
                    (status = 201, description = "Record created", body = $entity),
                    (status = 400, description = "Invalid request", body = ApiError),
                    (status = 401, description = "Unauthorized", body = ApiError),
                    (status = 409, description = "Duplicate record", body = ApiError),
                ),
                security(("api_key" = []), ("bearer_auth" = []))
            ))]
            pub async fn create(
                State(db): State<DbClient>,
                ApiJson(req): ApiJson<$create>,
            ) -> ApiResult<(StatusCode, Json<$entity>)> {
                generic::create_handler::<$entity>(db, req).await
            }

            #[cfg_attr(feature = "openapi", utoipa::path(
                get,
                path = $item_path,
                tag = $tag,
                operation_id = concat!("get_", stringify!($module)),
                params(("id" = String, Path, description = "Record id (UUID)")),
                responses(
                    (status = 200, description = "Record", body = $entity),
                    (status = 401, description = "Unauthorized", body = ApiError),
                    (status = 404, description = "Not found", body = ApiError),
                ),
                security(("api_key" = []), ("bearer_auth" = []))
            ))]
            pub async fn retrieve(
                State(db): State<DbClient>,
                id: PathId<$entity>,
            ) -> ApiResult<Json<$entity>> {
                generic::get_handler::<$entity>(db, id.id()).await
            }

            #[cfg_attr(feature = "openapi", utoipa::path(
                patch,
                path = $item_path,
                tag = $tag,
                operation_id = concat!("update_", stringify!($module)),
                params(("id" = String, Path, description = "Record id (UUID)")),
                request_body = $update,
                responses(
                    (status = 200, description = "Updated record", body = $entity),
                    (status = 400, description = "Invalid request", body = ApiError),
                    (status = 401, description = "Unauthorized", body = ApiError),
                    (status = 404, description = "Not found", body = ApiError),
                    (status = 409, description = "Duplicate record", body = ApiError),
                ),
                security(("api_key" = []), ("bearer_auth" = []))
            ))]
            pub async fn update(
                State(db): State<DbClient>,
                id: PathId<$entity>,
                ApiJson(req): ApiJson<$update>,
            ) -> ApiResult<Json<$entity>> {
                generic::update_handler::<$entity>(db, id.id(), req).await
            }

            #[cfg_attr(feature = "openapi", utoipa::path(
                delete,
                path = $item_path,
                tag = $tag,
                operation_id = concat!("delete_", stringify!($module)),
                params(("id" = String, Path, description = "Record id (UUID)")),
                responses(
                    (status = 204, description = "Deleted"),
                    (status = 401, description = "Unauthorized", body = ApiError),
                    (status = 404, description = "Not found", body = ApiError),
                    (status = 409, description = "Still referenced", body = ApiError),
                ),
                security(("api_key" = []), ("bearer_auth" = []))
            ))]
            pub async fn remove(
                State(db): State<DbClient>,
                id: PathId<$entity>,
            ) -> ApiResult<StatusCode> {
                generic::delete_handler::<$entity>(db, id.id()).await
            }

            pub fn router() -> Router<AppState> {
                Router::new()
                    .route("/", get(list).post(create))
                    .route("/:id", get(retrieve).patch(update).put(update).delete(remove))
            }
        }
    };
}

pub use crate::entity_routes;
