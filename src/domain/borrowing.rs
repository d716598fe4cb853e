use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BookBorrowed, BorrowId, CatalogBook, ReaderAccount, StaleStateError};

/// 貸出を拒否する理由
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DenialReason {
    /// 貸出権限が停止されている
    SuspendedAccount,
    /// 貸出枠が残っていない
    NoCreditsRemaining,
    /// 在庫がない
    NoCopiesAvailable,
    /// 館内閲覧のみの資料
    OffsiteNotAllowed,
}

impl DenialReason {
    /// 文字列表現を取得する
    pub fn as_str(&self) -> &'static str {
        match self {
            DenialReason::SuspendedAccount => "SUSPENDED_ACCOUNT",
            DenialReason::NoCreditsRemaining => "NO_CREDITS_REMAINING",
            DenialReason::NoCopiesAvailable => "NO_COPIES_AVAILABLE",
            DenialReason::OffsiteNotAllowed => "OFFSITE_NOT_ALLOWED",
        }
    }
}

/// 貸出判定の結果
///
/// 永続化されない。貸出の試行ごとに計算され、処理後に捨てられる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", content = "reason", rename_all = "snake_case")]
pub enum BorrowDecision {
    Approved,
    Denied(DenialReason),
}

impl BorrowDecision {
    pub fn is_approved(&self) -> bool {
        matches!(self, BorrowDecision::Approved)
    }
}

/// 貸出確定後の状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorrowTransition {
    pub reader_after: ReaderAccount,
    pub book_after: CatalogBook,
    pub event: BookBorrowed,
}

/// 純粋関数：貸出可否を判定する
///
/// ビジネスルール（上から順に評価し、最初に該当したものを理由とする）：
/// 1. 貸出停止中の利用者には貸し出さない
/// 2. 貸出枠が残っていない利用者には貸し出さない
/// 3. 在庫がない書籍は貸し出さない
/// 4. 館内閲覧のみの書籍は貸し出さない
///
/// 利用者側の理由を書籍側の理由より先に返す。
/// 利用者側の理由は、別の書籍を選んでも解消しないため。
///
/// 副作用なし。同じスナップショットに対しては常に同じ結果を返す。
pub fn evaluate(reader: &ReaderAccount, book: &CatalogBook) -> BorrowDecision {
    if reader.is_suspended {
        return BorrowDecision::Denied(DenialReason::SuspendedAccount);
    }

    if reader.credits_remaining.is_exhausted() {
        return BorrowDecision::Denied(DenialReason::NoCreditsRemaining);
    }

    if book.available_copy_count.is_empty() {
        return BorrowDecision::Denied(DenialReason::NoCopiesAvailable);
    }

    if !book.is_offsite_loan_allowed {
        return BorrowDecision::Denied(DenialReason::OffsiteNotAllowed);
    }

    BorrowDecision::Approved
}

/// 純粋関数：貸出を確定する
///
/// `evaluate`が`Approved`を返した同じスナップショットに対して呼び出す。
/// 在庫と貸出枠を1ずつ減らし、両方のリビジョンを進める。
///
/// 確定時点で在庫または貸出枠が0の場合（古いスナップショット）は、
/// 件数を負にせず`StaleStateError`を返す。
///
/// 副作用なし。新しい利用者・書籍の状態とイベントを返す。
pub fn commit_borrow(
    reader: &ReaderAccount,
    book: &CatalogBook,
    borrowed_at: DateTime<Utc>,
) -> Result<BorrowTransition, StaleStateError> {
    let credits_remaining = reader
        .credits_remaining
        .checked_decrement()
        .ok_or(StaleStateError::CreditsExhausted)?;

    let available_copy_count = book
        .available_copy_count
        .checked_decrement()
        .ok_or(StaleStateError::CopiesExhausted)?;

    let reader_after = ReaderAccount {
        credits_remaining,
        revision: reader.revision.next(),
        ..reader.clone()
    };

    let book_after = CatalogBook {
        available_copy_count,
        revision: book.revision.next(),
        ..book.clone()
    };

    let event = BookBorrowed {
        borrow_id: BorrowId::new(),
        reader_id: reader.reader_id,
        book_id: book.book_id,
        borrowed_at,
        credits_remaining_after: credits_remaining.value(),
        copies_remaining_after: available_copy_count.value(),
    };

    Ok(BorrowTransition {
        reader_after,
        book_after,
        event,
    })
}
