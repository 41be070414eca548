// crates/backend-lib/src/error.rs

//! Central error type + axum integration.
//!
//! Every failure a handler can raise is translated into the wire envelope
//! `{ error: { statusCode, message, errorType, data } }` here, so clients
//! see one shape regardless of which layer rejected the request.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gatehouse_common::{ErrorDetail, ErrorEnvelope};
use std::collections::HashMap;
use thiserror::Error;

/// Application error taxonomy
#[derive(Error, Debug)]
pub enum AppError {
    /// Request body/query did not match the declared shape; `data` maps
    /// each offending field to its messages
    #[error("validation failed")]
    Validation { data: HashMap<String, Vec<String>> },

    /// Credentials do not match any stored record
    #[error("user email or password does not match")]
    AuthForbidden,

    /// Token failed signature, encoding or algorithm checks
    #[error("invalid session token: {0}")]
    TokenInvalid(String),

    /// Token is past its expiry
    #[error("session token expired")]
    TokenExpired,

    /// Backing store could not be reached
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// Signing key/algorithm misconfiguration
    #[error("token signing misconfigured: {0}")]
    Signing(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::AuthForbidden => StatusCode::FORBIDDEN,
            AppError::TokenInvalid(_) | AppError::TokenExpired => StatusCode::UNAUTHORIZED,
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// `errorType` member of the envelope
    pub fn error_type(&self) -> &'static str {
        match self.status_code() {
            StatusCode::BAD_REQUEST => "Bad Request",
            StatusCode::FORBIDDEN => "Forbidden",
            StatusCode::UNAUTHORIZED => "Unauthorized",
            StatusCode::SERVICE_UNAVAILABLE => "Service Unavailable",
            _ => "Internal Server Error",
        }
    }

    /// Message suitable for the wire; internals stay in the server log
    pub fn sanitized_message(&self) -> String {
        match self {
            AppError::Validation { .. } => "Validation failed".to_string(),
            AppError::AuthForbidden => "Bad Login".to_string(),
            AppError::TokenInvalid(_) => "Invalid session token".to_string(),
            AppError::TokenExpired => "Session token expired".to_string(),
            AppError::StoreUnavailable(_) => "Store unavailable".to_string(),
            _ => "An internal server error occurred".to_string(),
        }
    }

    fn data(&self) -> Option<serde_json::Value> {
        match self {
            AppError::Validation { data } => serde_json::to_value(data).ok(),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = ErrorEnvelope {
            error: ErrorDetail {
                status_code: status.as_u16(),
                message: self.sanitized_message(),
                error_type: self.error_type().to_string(),
                data: self.data(),
            },
        };

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::Validation {
                data: HashMap::new()
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::AuthForbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::TokenInvalid("bad signature".to_string()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::TokenExpired.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::StoreUnavailable("disk gone".to_string()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::Internal("oops".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_types_follow_status() {
        assert_eq!(AppError::AuthForbidden.error_type(), "Forbidden");
        assert_eq!(AppError::TokenExpired.error_type(), "Unauthorized");
        assert_eq!(
            AppError::Validation {
                data: HashMap::new()
            }
            .error_type(),
            "Bad Request"
        );
        assert_eq!(
            AppError::Internal("oops".to_string()).error_type(),
            "Internal Server Error"
        );
    }

    #[test]
    fn test_internal_details_stay_off_the_wire() {
        let err = AppError::Internal("connection string leaked".to_string());
        assert!(!err.sanitized_message().contains("connection string"));

        let err = AppError::TokenInvalid("InvalidSignature".to_string());
        assert_eq!(err.sanitized_message(), "Invalid session token");
    }

    #[test]
    fn test_validation_data_reaches_envelope() {
        let mut data = HashMap::new();
        data.insert("email".to_string(), vec!["is required".to_string()]);
        let err = AppError::Validation { data };

        let value = err.data().unwrap();
        assert_eq!(value["email"][0], "is required");
    }

    #[test]
    fn test_into_response_sets_status() {
        let response = AppError::AuthForbidden.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let headers = response.headers();
        assert!(headers
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap()
            .contains("application/json"));
    }
}
