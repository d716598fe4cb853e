use thiserror::Error;

/// 貸出確定時の状態不整合
///
/// 判定に使ったスナップショットが確定時点の状態と食い違っている。
/// 呼び出し側は最新のスナップショットを取り直して判定からやり直す。
/// このモジュール内での自動リトライは行わない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StaleStateError {
    /// 確定時点で利用者の貸出枠が残っていない
    #[error("reader has no credits left at commit time")]
    CreditsExhausted,
    /// 確定時点で在庫が残っていない
    #[error("book has no copies left at commit time")]
    CopiesExhausted,
    /// 判定後に利用者または書籍が別の書き込みで更新された
    #[error("reader or book changed since evaluation")]
    RevisionMismatch,
}
