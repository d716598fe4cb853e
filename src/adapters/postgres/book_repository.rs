use crate::domain::{BookId, CatalogBook, CopyCount};
use crate::ports::book_repository::{BookRepository as BookRepositoryTrait, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

use super::{invalid_data, revision_from_row};

fn map_row_to_book(row: &PgRow) -> Result<CatalogBook> {
    let available_copy_count = CopyCount::try_from(row.get::<i64, _>("available_copy_count"))
        .map_err(|e| invalid_data(format!("books.available_copy_count: {}", e)))?;

    Ok(CatalogBook {
        book_id: BookId::from_uuid(row.get("book_id")),
        available_copy_count,
        is_offsite_loan_allowed: row.get("is_offsite_loan_allowed"),
        revision: revision_from_row(row.get("revision"))?,
    })
}

/// BookRepositoryのPostgreSQL実装
pub struct BookRepository {
    pool: PgPool,
}

impl BookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRepositoryTrait for BookRepository {
    async fn find_by_id(&self, book_id: BookId) -> Result<Option<CatalogBook>> {
        let row = sqlx::query(
            r#"
            SELECT book_id, available_copy_count, is_offsite_loan_allowed, revision
            FROM books
            WHERE book_id = $1
            "#,
        )
        .bind(book_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_book).transpose()
    }

    async fn upsert(&self, book: CatalogBook) -> Result<CatalogBook> {
        let row = sqlx::query(
            r#"
            INSERT INTO books (book_id, available_copy_count, is_offsite_loan_allowed, revision, updated_at)
            VALUES ($1, $2, $3, 1, NOW())
            ON CONFLICT (book_id)
            DO UPDATE SET
                available_copy_count = EXCLUDED.available_copy_count,
                is_offsite_loan_allowed = EXCLUDED.is_offsite_loan_allowed,
                revision = books.revision + 1,
                updated_at = NOW()
            RETURNING book_id, available_copy_count, is_offsite_loan_allowed, revision
            "#,
        )
        .bind(book.book_id.value())
        .bind(i64::from(book.available_copy_count.value()))
        .bind(book.is_offsite_loan_allowed)
        .fetch_one(&self.pool)
        .await?;

        map_row_to_book(&row)
    }
}
