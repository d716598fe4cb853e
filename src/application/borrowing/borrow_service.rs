use crate::domain::{
    self, BookBorrowed, BookId, BorrowDecision, BorrowId, CatalogBook, DenialReason,
    ReaderAccount, ReaderId, StaleStateError, commands::BorrowBook,
};
use crate::ports::*;
use std::sync::Arc;

use super::errors::{BorrowApplicationError, Result};

/// サービスの依存関係
///
/// データ構造として定義し、振る舞いは持たない。
/// 各ユースケースは純粋な関数として依存関係を引数で受け取る。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub reader_repository: Arc<dyn ReaderRepository>,
    pub book_repository: Arc<dyn BookRepository>,
    pub borrow_store: Arc<dyn BorrowStore>,
}

/// 確定した貸出の内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorrowReceipt {
    pub borrow_id: BorrowId,
    pub reader_after: ReaderAccount,
    pub book_after: CatalogBook,
}

/// 貸出試行の結果
///
/// 拒否は想定内の結果であり、エラーではなくデータとして返す。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BorrowOutcome {
    Approved(BorrowReceipt),
    Denied(DenialReason),
}

/// 利用者と書籍のスナップショットを取得するヘルパー関数
///
/// # エラー
/// - ReaderNotFound / BookNotFound: スナップショットが存在しない
/// - RepositoryError: 読み込み失敗
async fn load_snapshots(
    deps: &ServiceDependencies,
    reader_id: ReaderId,
    book_id: BookId,
) -> Result<(ReaderAccount, CatalogBook)> {
    let reader = deps
        .reader_repository
        .find_by_id(reader_id)
        .await
        .map_err(BorrowApplicationError::RepositoryError)?
        .ok_or(BorrowApplicationError::ReaderNotFound)?;

    let book = deps
        .book_repository
        .find_by_id(book_id)
        .await
        .map_err(BorrowApplicationError::RepositoryError)?
        .ok_or(BorrowApplicationError::BookNotFound)?;

    Ok((reader, book))
}

/// 貸出可否を判定する（読み取りのみ）
///
/// 現在のスナップショットに対して`domain::evaluate`を呼ぶだけで、何も書き込まない。
pub async fn check_eligibility(
    deps: &ServiceDependencies,
    reader_id: ReaderId,
    book_id: BookId,
) -> Result<BorrowDecision> {
    let (reader, book) = load_snapshots(deps, reader_id, book_id).await?;
    Ok(domain::evaluate(&reader, &book))
}

/// 書籍を貸し出す
///
/// 処理フロー：
/// 1. 利用者と書籍のスナップショットを取得
/// 2. 貸出可否を判定（拒否ならそのまま返す）
/// 3. ドメイン層の純粋関数で確定後の状態を計算
/// 4. BorrowStoreに判定時点のリビジョンとともに書き込む
///
/// 判定から書き込みまでを1つのcheck-then-actとして扱う。
/// ストアは排他区間の中でリビジョンを再検証し、判定後に他の書き込みがあれば
/// `CommitStatus::Conflict`を返す。その場合は`StaleState`エラーになる。
///
/// # リトライ
///
/// この関数はリトライしない。`StaleState`を受けた呼び出し側が
/// 最新のスナップショットで最初からやり直す。
pub async fn borrow_book(deps: &ServiceDependencies, cmd: BorrowBook) -> Result<BorrowOutcome> {
    // 1. スナップショット取得
    let (reader, book) = load_snapshots(deps, cmd.reader_id, cmd.book_id).await?;

    // 2. 貸出可否の判定
    if let BorrowDecision::Denied(reason) = domain::evaluate(&reader, &book) {
        tracing::info!(
            reader_id = %cmd.reader_id.value(),
            book_id = %cmd.book_id.value(),
            reason = reason.as_str(),
            "Borrow denied"
        );
        return Ok(BorrowOutcome::Denied(reason));
    }

    // 3. 確定後の状態を計算
    let transition = domain::commit_borrow(&reader, &book, cmd.requested_at)
        .map_err(BorrowApplicationError::StaleState)?;

    // 4. 判定時点のリビジョンを条件に書き込む
    let expected = ExpectedRevisions {
        reader: reader.revision,
        book: book.revision,
    };

    let status = deps
        .borrow_store
        .commit_borrow(expected, &transition)
        .await
        .map_err(BorrowApplicationError::BorrowStoreError)?;

    match status {
        CommitStatus::Committed => {
            tracing::info!(
                borrow_id = %transition.event.borrow_id.value(),
                reader_id = %cmd.reader_id.value(),
                book_id = %cmd.book_id.value(),
                credits_remaining = transition.event.credits_remaining_after,
                copies_remaining = transition.event.copies_remaining_after,
                "Borrow committed"
            );

            Ok(BorrowOutcome::Approved(BorrowReceipt {
                borrow_id: transition.event.borrow_id,
                reader_after: transition.reader_after,
                book_after: transition.book_after,
            }))
        }
        CommitStatus::Conflict => {
            tracing::warn!(
                reader_id = %cmd.reader_id.value(),
                book_id = %cmd.book_id.value(),
                "Borrow commit lost a race; snapshot is stale"
            );
            Err(BorrowApplicationError::StaleState(
                StaleStateError::RevisionMismatch,
            ))
        }
    }
}

/// 利用者の貸出履歴を取得する（新しい順）
pub async fn borrow_history(
    deps: &ServiceDependencies,
    reader_id: ReaderId,
) -> Result<Vec<BookBorrowed>> {
    let reader_exists = deps
        .reader_repository
        .find_by_id(reader_id)
        .await
        .map_err(BorrowApplicationError::RepositoryError)?
        .is_some();

    if !reader_exists {
        return Err(BorrowApplicationError::ReaderNotFound);
    }

    deps.borrow_store
        .history_for_reader(reader_id)
        .await
        .map_err(BorrowApplicationError::BorrowStoreError)
}
