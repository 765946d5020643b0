//! Request extractors that reject with `ApiError` instead of axum's
//! plain-text rejections.

use axum::extract::{FromRequest, FromRequestParts, Path};
use axum::http::request::Parts;
use booker_core::error::DomainError;

use crate::error::ApiError;

/// A non-negative entity identity taken from the `{id}` path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityId(pub i64);

impl<S> FromRequestParts<S> for EntityId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError(DomainError::Validation(rejection.body_text())))?;
        parse_id(&raw).map(Self).map_err(ApiError)
    }
}

fn parse_id(raw: &str) -> Result<i64, DomainError> {
    match raw.parse::<i64>() {
        Ok(id) if id >= 0 => Ok(id),
        _ => Err(DomainError::Validation(format!(
            "id must be a non-negative integer, got {raw:?}"
        ))),
    }
}

/// `axum::Json` whose decoding failures become 400 validation errors.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);
