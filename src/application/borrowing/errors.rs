use crate::domain::{NegativeCountError, StaleStateError};
use thiserror::Error;

/// 貸出アプリケーション層のエラー
///
/// 貸出拒否（貸出停止・枠切れ・在庫切れ・館内閲覧のみ）はエラーではなく
/// `BorrowOutcome::Denied`として返す。
#[derive(Debug, Error)]
pub enum BorrowApplicationError {
    /// 利用者が存在しない
    #[error("Reader not found")]
    ReaderNotFound,

    /// 書籍が存在しない
    #[error("Book not found")]
    BookNotFound,

    /// 判定後に状態が変わった。呼び出し側でスナップショットを取り直して再試行する
    #[error("Stale state: {0}")]
    StaleState(StaleStateError),

    /// 負の件数など、不正なスナップショットが渡された
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(NegativeCountError),

    /// リポジトリのエラー
    #[error("Repository error")]
    RepositoryError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// BorrowStoreのエラー
    #[error("Borrow store error")]
    BorrowStoreError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, BorrowApplicationError>;
