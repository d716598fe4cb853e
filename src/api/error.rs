use crate::application::borrowing::BorrowApplicationError;
use crate::domain::DenialReason;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーと貸出拒否を、HTTPレスポンスへマッピングする。
#[derive(Debug)]
pub enum ApiError {
    Application(BorrowApplicationError),
    Denied(DenialReason),
}

impl From<BorrowApplicationError> for ApiError {
    fn from(err: BorrowApplicationError) -> Self {
        ApiError::Application(err)
    }
}

fn denial_message(reason: DenialReason) -> &'static str {
    match reason {
        DenialReason::SuspendedAccount => "Reader's borrowing privileges are suspended",
        DenialReason::NoCreditsRemaining => "Reader has no borrowing credits remaining",
        DenialReason::NoCopiesAvailable => "No copies of this book are available",
        DenialReason::OffsiteNotAllowed => "This book is for reading-room use only",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            // 422 Unprocessable Entity - 貸出拒否（想定内の結果）
            ApiError::Denied(reason) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                reason.as_str(),
                denial_message(reason).to_string(),
            ),

            // 404 Not Found
            ApiError::Application(BorrowApplicationError::ReaderNotFound) => (
                StatusCode::NOT_FOUND,
                "READER_NOT_FOUND",
                "Reader not found".to_string(),
            ),
            ApiError::Application(BorrowApplicationError::BookNotFound) => (
                StatusCode::NOT_FOUND,
                "BOOK_NOT_FOUND",
                "Book not found".to_string(),
            ),

            // 409 Conflict - 判定後に状態が変わった。クライアントは再試行する
            ApiError::Application(BorrowApplicationError::StaleState(e)) => (
                StatusCode::CONFLICT,
                "STALE_STATE",
                e.to_string(),
            ),

            // 422 Unprocessable Entity - 不正な件数
            ApiError::Application(BorrowApplicationError::InvalidSnapshot(e)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INVALID_SNAPSHOT",
                e.to_string(),
            ),

            // 500 Internal Server Error - システム障害
            // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
            ApiError::Application(BorrowApplicationError::RepositoryError(e)) => {
                tracing::error!("Repository error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "REPOSITORY_ERROR",
                    "Failed to access library records".to_string(),
                )
            }
            ApiError::Application(BorrowApplicationError::BorrowStoreError(e)) => {
                tracing::error!("Borrow store error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "BORROW_STORE_ERROR",
                    "Failed to record borrow".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}
