//! Error handling - every failure renders the `{ ok: false, error }` envelope.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use quill_core::error::DomainError;
use quill_shared::{ApiResponse, ErrorInfo};

/// Application-level error type returned by handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(detail) => ErrorInfo::not_found(detail),
            AppError::BadRequest(detail) => ErrorInfo::bad_request(detail),
            AppError::Forbidden => ErrorInfo::forbidden()
                .with_detail("Only the author or an admin may change this blog"),
            AppError::Conflict(cause) => {
                tracing::warn!(cause = %cause, "Write conflict");
                ErrorInfo::conflict("Slug already exists")
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorInfo::internal_error()
            }
        };

        HttpResponse::build(self.status_code()).json(ApiResponse::failure(error))
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, key } => {
                AppError::NotFound(format!("{} not found: {}", entity_type, key))
            }
            DomainError::Validation(msg) => AppError::BadRequest(msg),
            DomainError::Conflict(msg) => AppError::Conflict(msg),
            DomainError::Forbidden => AppError::Forbidden,
            DomainError::Upload(e) => {
                tracing::warn!(error = %e, "Image upload failed");
                AppError::BadRequest("Image upload failed".to_string())
            }
            DomainError::Repository(e) => AppError::Internal(e.to_string()),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::error::RepoError;
    use quill_core::ports::UploadError;

    #[test]
    fn test_domain_errors_map_to_status() {
        let cases = [
            (DomainError::not_found("Blog", "x"), StatusCode::NOT_FOUND),
            (
                DomainError::Validation("Title is required".into()),
                StatusCode::BAD_REQUEST,
            ),
            (DomainError::Conflict("slug".into()), StatusCode::CONFLICT),
            (DomainError::Forbidden, StatusCode::FORBIDDEN),
            (
                DomainError::Upload(UploadError::NotConfigured),
                StatusCode::BAD_REQUEST,
            ),
            (
                DomainError::Repository(RepoError::Query("boom".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status_code(), status);
        }
    }

    #[test]
    fn test_upload_failure_message_hides_cause() {
        let err = AppError::from(DomainError::Upload(UploadError::Rejected(
            "Invalid api_key".into(),
        )));
        assert!(matches!(err, AppError::BadRequest(ref m) if m == "Image upload failed"));
    }

    #[actix_web::test]
    async fn test_conflict_hides_store_message() {
        let err = AppError::from(DomainError::Conflict(
            "duplicate key value violates unique constraint \"blogs_slug_key\"".into(),
        ));

        let body = actix_web::body::to_bytes(err.error_response().into_body())
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["error"]["status"], 409);
        assert_eq!(json["error"]["detail"], "Slug already exists");
    }
}
