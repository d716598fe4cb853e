use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::borrowing::BorrowReceipt;
use crate::domain::{BookBorrowed, BorrowDecision, CatalogBook, ReaderAccount};

/// 利用者登録リクエスト（PUT /readers/:id）
///
/// 件数は符号付きで受け取り、負の値はアプリケーション層で拒否する。
#[derive(Debug, Deserialize)]
pub struct RegisterReaderRequest {
    pub credits_remaining: i64,
    #[serde(default)]
    pub is_suspended: bool,
}

/// 蔵書登録リクエスト（PUT /books/:id）
#[derive(Debug, Deserialize)]
pub struct RegisterBookRequest {
    pub available_copy_count: i64,
    #[serde(default = "default_offsite_loan_allowed")]
    pub is_offsite_loan_allowed: bool,
}

fn default_offsite_loan_allowed() -> bool {
    true
}

/// 貸出リクエスト（POST /borrows）
#[derive(Debug, Deserialize)]
pub struct BorrowRequest {
    pub reader_id: Uuid,
    pub book_id: Uuid,
}

/// 貸出可否判定のクエリパラメータ
#[derive(Debug, Deserialize)]
pub struct EligibilityQuery {
    pub reader_id: Uuid,
}

/// 利用者レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct ReaderResponse {
    pub reader_id: Uuid,
    pub credits_remaining: u32,
    pub is_suspended: bool,
    pub revision: u64,
}

impl From<ReaderAccount> for ReaderResponse {
    fn from(reader: ReaderAccount) -> Self {
        Self {
            reader_id: reader.reader_id.value(),
            credits_remaining: reader.credits_remaining.value(),
            is_suspended: reader.is_suspended,
            revision: reader.revision.value(),
        }
    }
}

/// 書籍レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct BookResponse {
    pub book_id: Uuid,
    pub available_copy_count: u32,
    pub is_offsite_loan_allowed: bool,
    pub revision: u64,
}

impl From<CatalogBook> for BookResponse {
    fn from(book: CatalogBook) -> Self {
        Self {
            book_id: book.book_id.value(),
            available_copy_count: book.available_copy_count.value(),
            is_offsite_loan_allowed: book.is_offsite_loan_allowed,
            revision: book.revision.value(),
        }
    }
}

/// 貸出可否判定レスポンス
///
/// 判定は`BorrowDecision`の表現をそのまま埋め込む。
/// `{"decision": "approved"}` または `{"decision": "denied", "reason": "..."}`
#[derive(Debug, Serialize)]
pub struct EligibilityResponse {
    pub reader_id: Uuid,
    pub book_id: Uuid,
    #[serde(flatten)]
    pub decision: BorrowDecision,
}

/// 貸出確定レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct BorrowCreatedResponse {
    pub borrow_id: Uuid,
    pub reader: ReaderResponse,
    pub book: BookResponse,
}

impl From<BorrowReceipt> for BorrowCreatedResponse {
    fn from(receipt: BorrowReceipt) -> Self {
        Self {
            borrow_id: receipt.borrow_id.value(),
            reader: receipt.reader_after.into(),
            book: receipt.book_after.into(),
        }
    }
}

/// 貸出履歴の1件
#[derive(Debug, Serialize, Deserialize)]
pub struct BorrowHistoryEntry {
    pub borrow_id: Uuid,
    pub book_id: Uuid,
    pub borrowed_at: DateTime<Utc>,
    pub credits_remaining_after: u32,
    pub copies_remaining_after: u32,
}

impl From<BookBorrowed> for BorrowHistoryEntry {
    fn from(event: BookBorrowed) -> Self {
        Self {
            borrow_id: event.borrow_id.value(),
            book_id: event.book_id.value(),
            borrowed_at: event.borrowed_at,
            credits_remaining_after: event.credits_remaining_after,
            copies_remaining_after: event.copies_remaining_after,
        }
    }
}

/// エラーレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}
