use actix_web::{error, http::StatusCode, HttpRequest, HttpResponse, ResponseError};
use thiserror::Error;

use crate::models::ErrorResponse;
use crate::services::{AuthError, MatchError, RateLimited, StoreError};

/// Errors returned by API handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error(transparent)]
    Unauthorized(#[from] AuthError),

    #[error(transparent)]
    RateLimited(#[from] RateLimited),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Upstream failure: {0}")]
    Upstream(String),
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_failed",
            ApiError::InvalidJson(_) => "invalid_json",
            ApiError::InvalidQuery(_) => "invalid_query",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::RateLimited(_) => "rate_limited",
            ApiError::NotFound(_) => "not_found",
            ApiError::InvalidRecord(_) => "invalid_record",
            ApiError::Upstream(_) => "upstream_error",
        }
    }

    /// Message safe to show to callers
    fn public_message(&self) -> String {
        match self {
            ApiError::Upstream(_) => "The profile store is unavailable, try again later".to_string(),
            ApiError::InvalidRecord(_) => "A stored profile is malformed".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => ApiError::NotFound(what),
            StoreError::InvalidInput(msg) => ApiError::InvalidRecord(msg),
            StoreError::Backend(msg) => ApiError::Upstream(msg),
        }
    }
}

impl From<MatchError> for ApiError {
    fn from(err: MatchError) -> Self {
        match err {
            MatchError::ProfileNotFound(id) => ApiError::NotFound(format!("Mentee {}", id)),
            MatchError::InvalidInput(msg) => ApiError::InvalidRecord(msg),
            MatchError::Store(msg) => ApiError::Upstream(msg),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidJson(_) | ApiError::InvalidQuery(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidRecord(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        match self {
            ApiError::Upstream(detail) => tracing::error!("Upstream failure: {}", detail),
            ApiError::InvalidRecord(detail) => tracing::error!("Rejected stored record: {}", detail),
            _ => {}
        }

        let mut response = HttpResponse::build(status);
        if let ApiError::RateLimited(limited) = self {
            response.insert_header(("Retry-After", limited.retry_after_secs().to_string()));
        }

        response.json(ErrorResponse {
            error: self.code().to_string(),
            message: self.public_message(),
            status_code: status.as_u16(),
        })
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    ApiError::InvalidJson(err.to_string()).into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("Query error on {}: {}", req.path(), err);
    ApiError::InvalidQuery(err.to_string()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InvalidRecord;
    use std::time::Duration;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(MatchError::ProfileNotFound("u1".into())).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(StoreError::InvalidInput("missing id".into())).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::from(StoreError::Backend("timeout".into())).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::from(AuthError::Expired).status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_upstream_detail_hidden() {
        let err = ApiError::Upstream("10.0.0.3:443 connection refused".into());
        assert!(!err.public_message().contains("10.0.0.3"));
    }

    #[test]
    fn test_record_detail_hidden() {
        let err = ApiError::from(StoreError::from(InvalidRecord::new(
            "mentor",
            "invalid type: string \"high\", expected f64",
        )));

        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.public_message(), "A stored profile is malformed");
        assert!(!err.public_message().contains("expected f64"));
    }

    #[test]
    fn test_rate_limited_sets_retry_after() {
        let err = ApiError::from(RateLimited {
            retry_after: Duration::from_millis(2500),
        });
        let response = err.error_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers().get("Retry-After").unwrap(), "3");
    }
}
