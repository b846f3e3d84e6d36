//! Application error type and its HTTP rendering.
//!
//! Every request-scoped failure is an [`AppError`]. Variants map one-to-one onto
//! the caller-visible error categories; none of them terminates the process.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::utils::db_error::unique_violation_field;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error payload, also embedded in per-item batch results.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed or unsafe URL, bad expiration, invalid payload.
    #[error("{message}")]
    Validation { message: String, details: Value },

    #[error("{message}")]
    Unauthorized { message: String, details: Value },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// The link exists but its expiration has passed. Rendered exactly like
    /// [`AppError::NotFound`].
    #[error("{message}")]
    Expired { message: String, details: Value },

    #[error("{message}")]
    QuotaExceeded { message: String, details: Value },

    /// A store uniqueness constraint rejected the write.
    #[error("Unique constraint violated on `{field}`")]
    ConstraintViolation { field: String },

    /// Every random code draw collided with an existing code.
    #[error("{message}")]
    CollisionExhausted { message: String, details: Value },

    /// Store, artifact publisher or renderer failure.
    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn expired(message: impl Into<String>, details: Value) -> Self {
        Self::Expired {
            message: message.into(),
            details,
        }
    }

    pub fn quota_exceeded(message: impl Into<String>, details: Value) -> Self {
        Self::QuotaExceeded {
            message: message.into(),
            details,
        }
    }

    pub fn constraint_violation(field: impl Into<String>) -> Self {
        Self::ConstraintViolation {
            field: field.into(),
        }
    }

    pub fn collision_exhausted(message: impl Into<String>, details: Value) -> Self {
        Self::CollisionExhausted {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::NotFound { .. } | Self::Expired { .. } => StatusCode::NOT_FOUND,
            Self::QuotaExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::ConstraintViolation { .. } => StatusCode::CONFLICT,
            Self::CollisionExhausted { .. } | Self::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Converts the error into its public JSON shape.
    ///
    /// Expired links deliberately look like missing ones to callers.
    pub fn to_error_info(&self) -> ErrorInfo {
        match self {
            Self::Validation { message, details } => ErrorInfo {
                code: "validation_error",
                message: message.clone(),
                details: details.clone(),
            },
            Self::Unauthorized { message, details } => ErrorInfo {
                code: "unauthorized",
                message: message.clone(),
                details: details.clone(),
            },
            Self::NotFound { details, .. } | Self::Expired { details, .. } => ErrorInfo {
                code: "not_found",
                message: "Short link not found".to_string(),
                details: details.clone(),
            },
            Self::QuotaExceeded { message, details } => ErrorInfo {
                code: "quota_exceeded",
                message: message.clone(),
                details: details.clone(),
            },
            Self::ConstraintViolation { field } => ErrorInfo {
                code: "conflict",
                message: "Unique constraint violation".to_string(),
                details: json!({ "field": field }),
            },
            Self::CollisionExhausted { message, details } => ErrorInfo {
                code: "collision_exhausted",
                message: message.clone(),
                details: details.clone(),
            },
            Self::Internal { message, details } => ErrorInfo {
                code: "internal_error",
                message: message.clone(),
                details: details.clone(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        let mut response = (status, Json(body)).into_response();

        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }

        response
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(field) = unique_violation_field(&e) {
            return AppError::constraint_violation(field);
        }

        tracing::error!(error = %e, "Database error");
        AppError::internal("Database error", json!({}))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&errors).unwrap_or_else(|_| json!({}));
        AppError::bad_request("Request validation failed", details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expired_renders_as_not_found() {
        let err = AppError::expired("Short link has expired", json!({ "code": "abc" }));

        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        let info = err.to_error_info();
        assert_eq!(info.code, "not_found");
        assert_eq!(info.details["code"], "abc");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::bad_request("x", json!({})).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::quota_exceeded("x", json!({})).status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            AppError::constraint_violation("code").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::collision_exhausted("x", json!({})).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_constraint_violation_display() {
        let err = AppError::constraint_violation("code");
        assert_eq!(err.to_string(), "Unique constraint violated on `code`");
    }

    #[test]
    fn test_unauthorized_sets_www_authenticate() {
        let response = AppError::unauthorized("Unauthorized", json!({})).into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }
}
