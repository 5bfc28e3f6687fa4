//! API error responses

use axum::{
    extract::rejection::JsonRejection,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use demo_core::CoreError;
use serde_json::json;

/// Errors surfaced to HTTP callers as `{"error": "..."}`
#[derive(Debug)]
pub enum ApiError {
    /// Only GET is allowed
    MethodNotAllowed,
    Unprocessable(String),
    Conflict(String),
    BadRequest(String),
    UnsupportedMediaType(String),
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &str {
        match self {
            ApiError::MethodNotAllowed => "Method Not Allowed",
            ApiError::Unprocessable(msg)
            | ApiError::Conflict(msg)
            | ApiError::BadRequest(msg)
            | ApiError::UnsupportedMediaType(msg)
            | ApiError::Internal(msg) => msg,
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidAnswerToken { .. } | CoreError::SessionComplete => {
                ApiError::Unprocessable(err.to_string())
            }
            CoreError::NotComplete => ApiError::Conflict(err.to_string()),
            CoreError::Config(_) | CoreError::Json(_) => ApiError::BadRequest(err.to_string()),
            CoreError::Io(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        match rejection {
            JsonRejection::JsonDataError(_) => ApiError::Unprocessable(message),
            JsonRejection::MissingJsonContentType(_) => ApiError::UnsupportedMediaType(message),
            _ => ApiError::BadRequest(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.message() }));

        match self {
            ApiError::MethodNotAllowed => (status, [(header::ALLOW, "GET")], body).into_response(),
            _ => (status, body).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_mapping() {
        let err: ApiError = CoreError::InvalidAnswerToken {
            step: 1,
            answer: "maybe".to_string(),
        }
        .into();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let err: ApiError = CoreError::NotComplete.into();
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_method_not_allowed_sets_allow() {
        let response = ApiError::MethodNotAllowed.into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "GET");
    }
}
