//! Path extractor for record ids.
//!
//! `PathId<C>` parses the `{id}` segment as a UUID and, on failure, names
//! the record kind in the 400 response.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use hrm_core::EntityId;
use std::marker::PhantomData;
use uuid::Uuid;

use crate::component::Component;
use crate::error::{ApiError, ErrorCode};

/// Typed record id taken from the path.
///
/// ```rust,ignore
/// async fn get_employee(PathId(id, _): PathId<Employee>) -> ApiResult<Json<Employee>> {
///     db.fetch::<Employee>(id).await.map(Json)
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PathId<C>(pub EntityId, pub PhantomData<fn() -> C>);

impl<C> PathId<C> {
    pub fn id(&self) -> EntityId {
        self.0
    }
}

#[async_trait]
impl<S, C> FromRequestParts<S> for PathId<C>
where
    S: Send + Sync,
    C: Component,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(uuid): Path<Uuid> = Path::from_request_parts(parts, state)
            .await
            .map_err(|e| invalid_id(C::KIND, parts.uri.path(), &e.body_text()))?;
        Ok(PathId(uuid, PhantomData))
    }
}

fn invalid_id(kind: hrm_core::EntityKind, path: &str, reason: &str) -> ApiError {
    ApiError::new(
        ErrorCode::InvalidFormat,
        format!("Invalid {} id in '{}': {}", kind, path, reason),
    )
    .with_details(serde_json::json!({ "entity_type": kind, "path": path }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hrm_core::EntityKind;

    #[test]
    fn test_invalid_id_names_the_kind() {
        let err = invalid_id(EntityKind::Employee, "/api/v1/employees/nope", "bad uuid");
        assert_eq!(err.code, ErrorCode::InvalidFormat);
        assert!(err.message.contains("Employee"));
        assert!(err.message.contains("/api/v1/employees/nope"));
    }
}
