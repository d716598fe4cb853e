use serde::{Deserialize, Serialize};

use super::{BookId, CopyCount, Revision};

/// 蔵書目録エントリ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogBook {
    pub book_id: BookId,
    /// 貸出中でない（書架にある）冊数
    pub available_copy_count: CopyCount,
    /// falseの場合は館内閲覧のみ。在庫の有無に関係なく館外へは持ち出せない
    pub is_offsite_loan_allowed: bool,
    pub revision: Revision,
}

impl CatalogBook {
    pub fn new(
        book_id: BookId,
        available_copy_count: CopyCount,
        is_offsite_loan_allowed: bool,
    ) -> Self {
        Self {
            book_id,
            available_copy_count,
            is_offsite_loan_allowed,
            revision: Revision::initial(),
        }
    }
}
