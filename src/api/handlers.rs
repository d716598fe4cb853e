use crate::application::borrowing::{
    BorrowOutcome, ServiceDependencies, borrow_book as execute_borrow_book, borrow_history,
    check_eligibility, get_book as fetch_book, get_reader as fetch_reader,
    register_book as execute_register_book, register_reader as execute_register_reader,
};
use crate::domain::{
    BookId, ReaderId,
    commands::{BorrowBook, RegisterBook, RegisterReader},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;
use uuid::Uuid;

use super::{
    error::ApiError,
    types::{
        BookResponse, BorrowCreatedResponse, BorrowHistoryEntry, BorrowRequest,
        EligibilityQuery, EligibilityResponse, ReaderResponse, RegisterBookRequest,
        RegisterReaderRequest,
    },
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}

// ============================================================================
// Command handlers
// ============================================================================

/// POST /borrows - 書籍を借りる
///
/// 貸出可否を判定し、可であれば在庫と貸出枠を1ずつ減らす。
///
/// - 201: 貸出確定。確定後の利用者・書籍を返す
/// - 422: 貸出拒否（SUSPENDED_ACCOUNT, NO_CREDITS_REMAINING, NO_COPIES_AVAILABLE, OFFSITE_NOT_ALLOWED）
/// - 409: 判定後に状態が変わった（STALE_STATE）。クライアントは再試行する
pub async fn create_borrow(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BorrowRequest>,
) -> Result<(StatusCode, Json<BorrowCreatedResponse>), ApiError> {
    let cmd = BorrowBook {
        reader_id: ReaderId::from_uuid(req.reader_id),
        book_id: BookId::from_uuid(req.book_id),
        requested_at: chrono::Utc::now(),
    };

    match execute_borrow_book(&state.service_deps, cmd).await? {
        BorrowOutcome::Approved(receipt) => Ok((StatusCode::CREATED, Json(receipt.into()))),
        BorrowOutcome::Denied(reason) => Err(ApiError::Denied(reason)),
    }
}

/// PUT /readers/:id - 利用者を登録・更新（管理用）
pub async fn put_reader(
    State(state): State<Arc<AppState>>,
    Path(reader_id): Path<Uuid>,
    Json(req): Json<RegisterReaderRequest>,
) -> Result<Json<ReaderResponse>, ApiError> {
    let cmd = RegisterReader {
        reader_id: ReaderId::from_uuid(reader_id),
        credits_remaining: req.credits_remaining,
        is_suspended: req.is_suspended,
    };

    let reader = execute_register_reader(&state.service_deps, cmd).await?;
    Ok(Json(reader.into()))
}

/// PUT /books/:id - 蔵書を登録・更新（管理用）
pub async fn put_book(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<Uuid>,
    Json(req): Json<RegisterBookRequest>,
) -> Result<Json<BookResponse>, ApiError> {
    let cmd = RegisterBook {
        book_id: BookId::from_uuid(book_id),
        available_copy_count: req.available_copy_count,
        is_offsite_loan_allowed: req.is_offsite_loan_allowed,
    };

    let book = execute_register_book(&state.service_deps, cmd).await?;
    Ok(Json(book.into()))
}

// ============================================================================
// Query handlers (GET)
// ============================================================================

/// GET /readers/:id
pub async fn get_reader(
    State(state): State<Arc<AppState>>,
    Path(reader_id): Path<Uuid>,
) -> Result<Json<ReaderResponse>, ApiError> {
    let reader = fetch_reader(&state.service_deps, ReaderId::from_uuid(reader_id)).await?;
    Ok(Json(reader.into()))
}

/// GET /readers/:id/borrows - 貸出履歴（新しい順）
pub async fn list_reader_borrows(
    State(state): State<Arc<AppState>>,
    Path(reader_id): Path<Uuid>,
) -> Result<Json<Vec<BorrowHistoryEntry>>, ApiError> {
    let history = borrow_history(&state.service_deps, ReaderId::from_uuid(reader_id)).await?;
    Ok(Json(history.into_iter().map(BorrowHistoryEntry::from).collect()))
}

/// GET /books/:id
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<Uuid>,
) -> Result<Json<BookResponse>, ApiError> {
    let book = fetch_book(&state.service_deps, BookId::from_uuid(book_id)).await?;
    Ok(Json(book.into()))
}

/// GET /books/:id/eligibility?reader_id= - 貸出可否の事前確認
///
/// 判定のみで何も書き込まない。拒否の場合も200で理由を返す。
pub async fn get_eligibility(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<Uuid>,
    Query(query): Query<EligibilityQuery>,
) -> Result<Json<EligibilityResponse>, ApiError> {
    let decision = check_eligibility(
        &state.service_deps,
        ReaderId::from_uuid(query.reader_id),
        BookId::from_uuid(book_id),
    )
    .await?;

    Ok(Json(EligibilityResponse {
        reader_id: query.reader_id,
        book_id,
        decision,
    }))
}
