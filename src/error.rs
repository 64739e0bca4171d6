use axum::response::{IntoResponse, Response};
use axum::Json;
use diesel::r2d2;
use http::StatusCode;
use serde::Serialize;
use std::fmt;
use tracing::error;
use utoipa::ToSchema;

/// Wire shape for every rejection: a stable machine-readable code plus a
/// human-readable message.
#[derive(Serialize, ToSchema, Debug)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

#[derive(Debug)]
pub enum ApiError {
    Database(diesel::result::Error),
    DatabaseConnection(String),
    Validation(validator::ValidationErrors),
    Auth(String),
    NotFound { code: &'static str, message: String },
    Conflict { code: &'static str, message: String },
    Rejected { code: &'static str, message: String },
    Provider(String),
    /// An atomic unit partially failed in a way that could leave balance and
    /// transaction log diverging. Always aborts the enclosing transaction and
    /// is logged for operator reconciliation.
    Consistency(String),
    Internal(String),
}

impl ApiError {
    pub fn not_found(code: &'static str, message: impl Into<String>) -> Self {
        ApiError::NotFound {
            code,
            message: message.into(),
        }
    }

    pub fn conflict(code: &'static str, message: impl Into<String>) -> Self {
        ApiError::Conflict {
            code,
            message: message.into(),
        }
    }

    pub fn rejected(code: &'static str, message: impl Into<String>) -> Self {
        ApiError::Rejected {
            code,
            message: message.into(),
        }
    }

    /// Stable reason code surfaced in the response body.
    pub fn reason_code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_error",
            ApiError::Auth(_) => "unauthorized",
            ApiError::NotFound { code, .. }
            | ApiError::Conflict { code, .. }
            | ApiError::Rejected { code, .. } => code,
            ApiError::Provider(_) => "provider_error",
            ApiError::Database(_)
            | ApiError::DatabaseConnection(_)
            | ApiError::Consistency(_)
            | ApiError::Internal(_) => "internal_error",
        }
    }

    /// Status and response body for this error. Internal failures are logged
    /// here and surfaced as a generic message without internal detail.
    pub fn status_and_body(&self) -> (StatusCode, ErrorBody) {
        let (status, message) = match self {
            ApiError::Validation(errors) => (StatusCode::BAD_REQUEST, errors.to_string()),
            ApiError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            ApiError::NotFound { message, .. } => (StatusCode::NOT_FOUND, message.clone()),
            ApiError::Conflict { message, .. } => (StatusCode::CONFLICT, message.clone()),
            ApiError::Rejected { message, .. } => (StatusCode::BAD_REQUEST, message.clone()),
            ApiError::Provider(msg) => {
                error!("Payment provider error: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "Payment provider request failed".to_string(),
                )
            }
            ApiError::Consistency(msg) => {
                error!("Ledger consistency error, operator review required: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            ApiError::Database(e) => {
                error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            ApiError::DatabaseConnection(e) => {
                error!("Database connection error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            ApiError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        (
            status,
            ErrorBody {
                error: self.reason_code().to_string(),
                message,
            },
        )
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Database(e) => write!(f, "Database error: {}", e),
            ApiError::DatabaseConnection(e) => write!(f, "Database connection error: {}", e),
            ApiError::Validation(e) => write!(f, "Validation error: {}", e),
            ApiError::Auth(e) => write!(f, "Authentication error: {}", e),
            ApiError::NotFound { code, message } => write!(f, "Not found ({}): {}", code, message),
            ApiError::Conflict { code, message } => write!(f, "Conflict ({}): {}", code, message),
            ApiError::Rejected { code, message } => write!(f, "Rejected ({}): {}", code, message),
            ApiError::Provider(e) => write!(f, "Provider error: {}", e),
            ApiError::Consistency(e) => write!(f, "Consistency error: {}", e),
            ApiError::Internal(e) => write!(f, "Internal error: {}", e),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Database(e) => Some(e),
            ApiError::Validation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<diesel::result::Error> for ApiError {
    fn from(err: diesel::result::Error) -> Self {
        ApiError::Database(err)
    }
}

impl From<r2d2::Error> for ApiError {
    fn from(err: r2d2::Error) -> Self {
        ApiError::DatabaseConnection(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::Validation(err)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Provider(err.to_string())
    }
}

impl From<bcrypt::BcryptError> for ApiError {
    fn from(err: bcrypt::BcryptError) -> Self {
        ApiError::Internal(format!("Credential check failed: {}", err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}
