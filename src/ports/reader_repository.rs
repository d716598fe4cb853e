use crate::domain::{ReaderAccount, ReaderId};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 利用者リポジトリポート
///
/// 貸出判定に使う利用者スナップショットの取得と、管理系フローからの登録を抽象化する。
#[async_trait]
pub trait ReaderRepository: Send + Sync {
    /// 利用者のスナップショットを取得する
    async fn find_by_id(&self, reader_id: ReaderId) -> Result<Option<ReaderAccount>>;

    /// 利用者を登録・更新する（upsert）
    ///
    /// 渡されたリビジョンは無視され、ストア側で採番したリビジョンを持つ
    /// 保存後の状態を返す。新規は`Revision::initial()`、既存は現在値の次。
    async fn upsert(&self, reader: ReaderAccount) -> Result<ReaderAccount>;
}
