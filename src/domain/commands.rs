use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BookId, ReaderId};

/// コマンド：書籍を借りる
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowBook {
    pub reader_id: ReaderId,
    pub book_id: BookId,
    pub requested_at: DateTime<Utc>,
}

/// コマンド：利用者アカウントを登録・更新する（管理用）
///
/// 件数は境界から来た生の値のまま受け取り、アプリケーション層で検証する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterReader {
    pub reader_id: ReaderId,
    pub credits_remaining: i64,
    pub is_suspended: bool,
}

/// コマンド：蔵書を登録・更新する（管理用）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterBook {
    pub book_id: BookId,
    pub available_copy_count: i64,
    pub is_offsite_loan_allowed: bool,
}
