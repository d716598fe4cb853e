use crate::domain::{BookBorrowed, BorrowTransition, ReaderId, Revision};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 貸出確定の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitStatus {
    /// 利用者・書籍の更新とイベントの記録がすべて反映された
    Committed,
    /// 判定後に利用者または書籍が更新されていたため、何も書き込まなかった
    Conflict,
}

/// 判定時点のリビジョン
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectedRevisions {
    pub reader: Revision,
    pub book: Revision,
}

/// 貸出ストアポート
///
/// 貸出確定の書き込みを1つの原子的な単位として扱う。
/// 実装は排他区間（ロックまたはトランザクション）の中で
/// 現在のリビジョンと件数を再検証してから書き込むこと。
#[async_trait]
pub trait BorrowStore: Send + Sync {
    /// 貸出を確定する
    ///
    /// 利用者と書籍の現在のリビジョンが`expected`と一致し、かつ両方の件数が
    /// 1以上の場合にのみ、`transition`の状態を書き込みイベントを記録する。
    /// どちらかが満たされない場合は何も書き込まず`CommitStatus::Conflict`を返す。
    async fn commit_borrow(
        &self,
        expected: ExpectedRevisions,
        transition: &BorrowTransition,
    ) -> Result<CommitStatus>;

    /// 利用者の貸出履歴を新しい順に取得する
    async fn history_for_reader(&self, reader_id: ReaderId) -> Result<Vec<BookBorrowed>>;
}
