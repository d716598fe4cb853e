use crate::domain::{
    BookId, CatalogBook, CopyCount, CreditBalance, ReaderAccount, ReaderId,
    commands::{RegisterBook, RegisterReader},
};

use super::borrow_service::ServiceDependencies;
use super::errors::{BorrowApplicationError, Result};

/// 利用者を登録・更新する（管理用）
///
/// 負の貸出枠は統合ミスとして即座に拒否し、0に丸めない。
pub async fn register_reader(
    deps: &ServiceDependencies,
    cmd: RegisterReader,
) -> Result<ReaderAccount> {
    let credits_remaining = CreditBalance::try_from(cmd.credits_remaining)
        .map_err(BorrowApplicationError::InvalidSnapshot)?;

    let reader = ReaderAccount::new(cmd.reader_id, credits_remaining, cmd.is_suspended);

    let saved = deps
        .reader_repository
        .upsert(reader)
        .await
        .map_err(BorrowApplicationError::RepositoryError)?;

    tracing::debug!(
        reader_id = %saved.reader_id.value(),
        revision = saved.revision.value(),
        "Reader registered"
    );

    Ok(saved)
}

/// 蔵書を登録・更新する（管理用）
pub async fn register_book(deps: &ServiceDependencies, cmd: RegisterBook) -> Result<CatalogBook> {
    let available_copy_count = CopyCount::try_from(cmd.available_copy_count)
        .map_err(BorrowApplicationError::InvalidSnapshot)?;

    let book = CatalogBook::new(
        cmd.book_id,
        available_copy_count,
        cmd.is_offsite_loan_allowed,
    );

    let saved = deps
        .book_repository
        .upsert(book)
        .await
        .map_err(BorrowApplicationError::RepositoryError)?;

    tracing::debug!(
        book_id = %saved.book_id.value(),
        revision = saved.revision.value(),
        "Book registered"
    );

    Ok(saved)
}

pub async fn get_reader(deps: &ServiceDependencies, reader_id: ReaderId) -> Result<ReaderAccount> {
    deps.reader_repository
        .find_by_id(reader_id)
        .await
        .map_err(BorrowApplicationError::RepositoryError)?
        .ok_or(BorrowApplicationError::ReaderNotFound)
}

pub async fn get_book(deps: &ServiceDependencies, book_id: BookId) -> Result<CatalogBook> {
    deps.book_repository
        .find_by_id(book_id)
        .await
        .map_err(BorrowApplicationError::RepositoryError)?
        .ok_or(BorrowApplicationError::BookNotFound)
}
