//! Error handling for the Garment Workshop backend
//!
//! Provides consistent error responses in English and Uzbek

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::{CalculationError, ValidationError as DomainValidationError};
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_uz: String,
    },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid material type: {0}")]
    InvalidMaterialType(String),

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_uz: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_types: Option<Vec<&'static str>>,
}

impl AppError {
    /// Convenience constructor for single-field validation failures
    pub fn invalid_field(field: &str, message: &str, message_uz: &str) -> Self {
        AppError::Validation {
            field: field.to_string(),
            message: message.to_string(),
            message_uz: message_uz.to_string(),
        }
    }

    fn status_and_detail(&self) -> (StatusCode, ErrorDetail) {
        match self {
            AppError::Validation {
                field,
                message,
                message_uz,
            } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: message.clone(),
                    message_uz: message_uz.clone(),
                    field: Some(field.clone()),
                    valid_types: None,
                },
            ),
            AppError::ValidationError(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: msg.clone(),
                    message_uz: format!("Validatsiya xatosi: {}", msg),
                    field: None,
                    valid_types: None,
                },
            ),
            AppError::InvalidMaterialType(kind) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "INVALID_MATERIAL_TYPE".to_string(),
                    message_en: format!("Invalid material type: {}", kind),
                    message_uz: "Noto'g'ri material turi".to_string(),
                    field: Some("type".to_string()),
                    valid_types: Some(shared::MaterialType::valid_types()),
                },
            ),
            AppError::DuplicateEntry(field) => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "DUPLICATE_ENTRY".to_string(),
                    message_en: format!("A record with this {} already exists", field),
                    message_uz: format!("Bu {} allaqachon mavjud", field),
                    field: Some(field.clone()),
                    valid_types: None,
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message_en: format!("{} not found", resource),
                    message_uz: format!("{} topilmadi", resource),
                    field: None,
                    valid_types: None,
                },
            ),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "DATABASE_ERROR".to_string(),
                    message_en: "A database error occurred".to_string(),
                    message_uz: "Ma'lumotlar bazasida xatolik yuz berdi".to_string(),
                    field: None,
                    valid_types: None,
                },
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message_en: "An internal server error occurred".to_string(),
                    message_uz: "Serverda ichki xatolik yuz berdi".to_string(),
                    field: None,
                    valid_types: None,
                },
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = self.status_and_detail();

        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::ValidationError(errors.to_string())
    }
}

impl From<DomainValidationError> for AppError {
    fn from(err: DomainValidationError) -> Self {
        AppError::Validation {
            field: err.field.to_string(),
            message: err.message.to_string(),
            message_uz: format!("{} maydoni noto'g'ri", err.field),
        }
    }
}

impl From<CalculationError<sqlx::Error>> for AppError {
    fn from(err: CalculationError<sqlx::Error>) -> Self {
        match err {
            CalculationError::InvalidCount(_) => AppError::invalid_field(
                "count",
                "Count must be a positive integer",
                "Soni musbat butun son bo'lishi kerak",
            ),
            CalculationError::ClothingNotFound(_) => AppError::NotFound("Clothes".to_string()),
            CalculationError::AmountOverflow { material_code } => AppError::Validation {
                field: "count".to_string(),
                message: format!("Count is too large for material {}", material_code),
                message_uz: format!("{} materiali uchun soni juda katta", material_code),
            },
            CalculationError::DataAccess(e) => AppError::DatabaseError(e),
        }
    }
}

/// Map a unique violation on `constraint` to a duplicate-entry error
pub fn map_unique_violation(err: sqlx::Error, constraint: &str, field: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() && db_err.constraint() == Some(constraint) {
            return AppError::DuplicateEntry(field.to_string());
        }
    }
    AppError::DatabaseError(err)
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
