use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use mongodb::bson::oid::ObjectId;
use thiserror::Error;

use crate::database::StoreError;
use crate::models::MessageResponse;

/// Mensagem devolvida em qualquer erro 5xx
pub const GENERIC_FAILURE: &str = "Something went wrong.";

/// Application-level error type. Every variant renders as `{ "message": ... }`.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or invalid input (400)
    #[error("{0}")]
    BadRequest(String),

    /// Missing or invalid credentials (401)
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but not allowed (403)
    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Não expõe detalhes internos para o cliente
        let message = match self {
            AppError::Database(_) | AppError::Internal(_) => {
                log::error!("❌ {}", self);
                GENERIC_FAILURE.to_string()
            }
            _ => self.to_string(),
        };

        HttpResponse::build(self.status_code()).json(MessageResponse::new(message))
    }
}

/// Parses a hex ObjectId coming from a path segment
pub fn parse_object_id(raw: &str, what: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw).map_err(|_| AppError::BadRequest(format!("Invalid {} id", what)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(AppError::BadRequest("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Unauthorized("x".into()).status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden("x".into()).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Database(StoreError::Backend("down".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn test_internal_details_are_hidden() {
        let response = AppError::Internal("secret stack trace".into()).error_response();
        let body = to_bytes(response.into_body()).await.unwrap();
        let message: MessageResponse = serde_json::from_slice(&body).unwrap();

        assert_eq!(message.message, GENERIC_FAILURE);
    }

    #[test]
    fn test_parse_object_id_rejects_garbage() {
        assert!(parse_object_id("65a1b2c3d4e5f60718293a4b", "product").is_ok());
        match parse_object_id("nope", "product") {
            Err(AppError::BadRequest(msg)) => assert_eq!(msg, "Invalid product id"),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
