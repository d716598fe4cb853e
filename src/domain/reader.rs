use serde::{Deserialize, Serialize};

use super::{CreditBalance, ReaderId, Revision};

/// 利用者アカウント
///
/// 管理系のフローで作成・更新される長寿命のエンティティ。
/// 貸出判定はこのスナップショットを読むだけで、ライフサイクルは所有しない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderAccount {
    pub reader_id: ReaderId,
    /// 返却せずに同時に借りられる残り冊数
    pub credits_remaining: CreditBalance,
    /// 貸出権限が管理者により停止されているか
    pub is_suspended: bool,
    pub revision: Revision,
}

impl ReaderAccount {
    pub fn new(reader_id: ReaderId, credits_remaining: CreditBalance, is_suspended: bool) -> Self {
        Self {
            reader_id,
            credits_remaining,
            is_suspended,
            revision: Revision::initial(),
        }
    }
}
