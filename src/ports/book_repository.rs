use crate::domain::{BookId, CatalogBook};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 蔵書リポジトリポート
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// 書籍のスナップショットを取得する
    async fn find_by_id(&self, book_id: BookId) -> Result<Option<CatalogBook>>;

    /// 書籍を登録・更新する（upsert）
    ///
    /// リビジョンの扱いは`ReaderRepository::upsert`と同じ。
    async fn upsert(&self, book: CatalogBook) -> Result<CatalogBook>;
}
