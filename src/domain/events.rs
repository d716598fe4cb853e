use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BookId, BorrowId, ReaderId};

/// イベント：書籍が貸し出された
///
/// 確定後の件数を持つため、履歴だけで各時点の残数を追える。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookBorrowed {
    pub borrow_id: BorrowId,
    pub reader_id: ReaderId,
    pub book_id: BookId,
    pub borrowed_at: DateTime<Utc>,
    pub credits_remaining_after: u32,
    pub copies_remaining_after: u32,
}
