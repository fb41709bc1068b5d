//! API error types and conversions

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bag_core::ProviderError;
use serde::Serialize;

use crate::classify::ClassifyError;

/// API error type that converts to HTTP responses
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request
    BadRequest(String),
    /// 404 Not Found
    NotFound(String),
    /// 502 Bad Gateway (registry misbehaved or refused us)
    BadGateway(String),
    /// 503 Service Unavailable
    ServiceUnavailable(String),
    /// 504 Gateway Timeout
    GatewayTimeout(String),
    /// 500 Internal Server Error
    Internal(String),
}

/// Standard error response format
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, "bad_gateway", msg),
            ApiError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", msg)
            }
            ApiError::GatewayTimeout(msg) => (StatusCode::GATEWAY_TIMEOUT, "gateway_timeout", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
        };

        // Log errors at appropriate levels
        if status.is_server_error() {
            tracing::error!(error = error_type, %message, "API error");
        } else if status.is_client_error() {
            tracing::debug!(error = error_type, %message, "API client error");
        }

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        let message = err.to_string();
        match err {
            ProviderError::NotFound(_) => ApiError::NotFound(message),
            ProviderError::InvalidRequest(_) => ApiError::BadRequest(message),
            ProviderError::Unauthorized(_)
            | ProviderError::Upstream { .. }
            | ProviderError::Malformed(_) => ApiError::BadGateway(message),
            ProviderError::Transport(_) => ApiError::ServiceUnavailable(message),
            ProviderError::Timeout(_) => ApiError::GatewayTimeout(message),
        }
    }
}

impl From<ClassifyError> for ApiError {
    fn from(err: ClassifyError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: ProviderError) -> StatusCode {
        ApiError::from(err).into_response().status()
    }

    #[test]
    fn provider_errors_keep_their_status() {
        for err in [
            ProviderError::NotFound("bagid 1".into()),
            ProviderError::InvalidRequest("postcode".into()),
            ProviderError::Unauthorized("key".into()),
            ProviderError::Upstream {
                status: 500,
                message: "boom".into(),
            },
            ProviderError::Malformed("json".into()),
            ProviderError::Transport("refused".into()),
            ProviderError::Timeout("bagid 1".into()),
        ] {
            let expected = err.status_code();
            assert_eq!(status_of(err).as_u16(), expected);
        }
    }

    #[test]
    fn classify_error_is_bad_request() {
        let err = ClassifyError::InvalidArgument {
            field: "huisnummer",
            value: "abc".into(),
        };
        assert_eq!(
            ApiError::from(err).into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }
}
