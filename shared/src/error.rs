use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    ValidationError(#[from] garde::Report),
    #[error("{0}")]
    UnprocessableEntity(String),
    #[error("{0}")]
    EntityNotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Missing or invalid token")]
    UnauthenticatedError,
    #[error("{0}")]
    ForbiddenOperation(String),
    #[error("データベース処理実行中にエラーが発生しました。")]
    SpecificOperationError(#[source] sqlx::Error),
    #[error("No rows affected: {0}")]
    NoRowsAffectedError(String),
    #[error("{0}")]
    KeyValueStoreError(#[from] redis::RedisError),
    #[error("{0}")]
    ConvertToUuidError(#[from] uuid::Error),
    #[error("Unknown value: {0}")]
    UnknownVariant(#[from] strum::ParseError),
    #[error("{0}")]
    ConversionEntityError(String),
    #[error("通知の送信に失敗しました: {0}")]
    NotificationError(String),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_)
            | AppError::ValidationError(_)
            | AppError::UnknownVariant(_)
            | AppError::ConvertToUuidError(_) => StatusCode::BAD_REQUEST,
            AppError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::EntityNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::UnauthenticatedError => StatusCode::UNAUTHORIZED,
            AppError::ForbiddenOperation(_) => StatusCode::FORBIDDEN,
            AppError::SpecificOperationError(_)
            | AppError::NoRowsAffectedError(_)
            | AppError::KeyValueStoreError(_)
            | AppError::ConversionEntityError(_)
            | AppError::NotificationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        // 想定内のエラーは debug 止まり。内部エラーのみ詳細をログに残し、
        // クライアントには中身を返さない
        let message = if status_code.is_server_error() {
            tracing::error!(
                error.cause_chain = ?self,
                error.message = %self,
                "Unexpected error happened"
            );
            "Internal server error".to_string()
        } else {
            tracing::debug!(status = %status_code, error.message = %self, "request rejected");
            self.to_string()
        };

        (status_code, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

// 壊れた JSON なども他のエラーと同じ形式で返す
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_errors_map_to_500() {
        let err = AppError::NotificationError("smtp down".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let err = AppError::Conflict("Reservation already accepted".into());
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        let err = AppError::EntityNotFound("missing".into());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        let err = AppError::from(strum::ParseError::VariantNotFound);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
