//! Visitor identification for engagement routes

use crate::error::ApiError;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use demo_core::engagement::normalize_visitor_id;

/// Header carrying the caller's browser-scoped visitor id
pub const VISITOR_HEADER: &str = "x-visitor-id";

/// Visitor id taken from the `X-Visitor-Id` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visitor(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for Visitor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(VISITOR_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(normalize_visitor_id)
            .map(|id| Visitor(id.to_string()))
            .ok_or_else(|| ApiError::BadRequest("Missing or invalid X-Visitor-Id header".to_string()))
    }
}
