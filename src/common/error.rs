use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Erros de campo no formato `{ "campo": ["mensagem", ...] }`.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Chave usada para erros que não pertencem a um campo específico.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error")]
    ValidationError(#[from] validator::ValidationErrors),

    // Regras de negócio que não cabem nas anotações do `validator`
    #[error("Invalid data: {0:?}")]
    FieldValidation(FieldErrors),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Database error")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal server error")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Bcrypt error: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    /// Erro de validação em um único campo.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), vec![message.into()]);
        AppError::FieldValidation(errors)
    }

    pub fn non_field(message: impl Into<String>) -> Self {
        Self::field(NON_FIELD_ERRORS, message)
    }

    /// Converte um mapa acumulado em erro, ou `Ok(())` se estiver vazio.
    pub fn from_field_errors(errors: FieldErrors) -> Result<(), Self> {
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::FieldValidation(errors))
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::FieldValidation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn validator_details(errors: &validator::ValidationErrors) -> FieldErrors {
    let mut details = FieldErrors::new();
    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<String> = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        details.insert(field.to_string(), messages);
    }
    details
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (error_message, details) = match self {
            AppError::ValidationError(ref errors) => {
                ("One or more fields are invalid.", Some(validator_details(errors)))
            }
            AppError::FieldValidation(errors) => ("One or more fields are invalid.", Some(errors)),
            AppError::NotFound(_) => ("Not found.", None),
            AppError::InvalidCredentials => ("Invalid credentials.", None),
            AppError::InvalidToken => ("Authentication token is invalid or missing.", None),

            // O resto vira 500; o detalhe fica só no log.
            ref e => {
                tracing::error!("Internal server error: {}", e);
                ("An unexpected error occurred.", None)
            }
        };

        let body = match details {
            Some(details) => json!({ "error": error_message, "details": details }),
            None => json!({ "error": error_message }),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_error_is_bad_request() {
        let err = AppError::field("items", "Quantity for bolt must be at least 1.");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        match err {
            AppError::FieldValidation(map) => {
                assert_eq!(map["items"], vec!["Quantity for bolt must be at least 1."]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_field_errors_are_ok() {
        assert!(AppError::from_field_errors(FieldErrors::new()).is_ok());
    }

    #[test]
    fn status_mapping() {
        assert_eq!(AppError::NotFound("RFQ").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::InternalServerError(anyhow::anyhow!("smtp down")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
