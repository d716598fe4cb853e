use crate::domain::{BookBorrowed, BorrowTransition, ReaderId};
use crate::ports::borrow_store::{
    BorrowStore as BorrowStoreTrait, CommitStatus, ExpectedRevisions, Result,
};
use async_trait::async_trait;
use sqlx::{PgPool, Row};

use super::invalid_data;

fn to_i64(value: u64, column: &str) -> Result<i64> {
    i64::try_from(value).map_err(|_| invalid_data(format!("{} exceeds BIGINT: {}", column, value)))
}

/// PostgreSQL implementation of BorrowStore
///
/// The commit runs in a single transaction. Each entity is updated with a
/// conditional `UPDATE ... WHERE revision = $expected AND <count> > 0`; the row
/// lock taken by the first writer makes a concurrent writer re-check the
/// condition against the committed row, so at most one of them matches.
pub struct BorrowStore {
    pool: PgPool,
}

impl BorrowStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BorrowStoreTrait for BorrowStore {
    async fn commit_borrow(
        &self,
        expected: ExpectedRevisions,
        transition: &BorrowTransition,
    ) -> Result<CommitStatus> {
        let reader = &transition.reader_after;
        let book = &transition.book_after;

        let mut tx = self.pool.begin().await?;

        let reader_updated = sqlx::query(
            r#"
            UPDATE readers
            SET credits_remaining = $1,
                revision = $2,
                updated_at = NOW()
            WHERE reader_id = $3
              AND revision = $4
              AND credits_remaining > 0
            "#,
        )
        .bind(i64::from(reader.credits_remaining.value()))
        .bind(to_i64(reader.revision.value(), "revision")?)
        .bind(reader.reader_id.value())
        .bind(to_i64(expected.reader.value(), "revision")?)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if reader_updated != 1 {
            tx.rollback().await?;
            return Ok(CommitStatus::Conflict);
        }

        let book_updated = sqlx::query(
            r#"
            UPDATE books
            SET available_copy_count = $1,
                revision = $2,
                updated_at = NOW()
            WHERE book_id = $3
              AND revision = $4
              AND available_copy_count > 0
            "#,
        )
        .bind(i64::from(book.available_copy_count.value()))
        .bind(to_i64(book.revision.value(), "revision")?)
        .bind(book.book_id.value())
        .bind(to_i64(expected.book.value(), "revision")?)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if book_updated != 1 {
            tx.rollback().await?;
            return Ok(CommitStatus::Conflict);
        }

        let event = &transition.event;
        sqlx::query(
            r#"
            INSERT INTO borrow_events (borrow_id, reader_id, book_id, event_data, occurred_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(event.borrow_id.value())
        .bind(event.reader_id.value())
        .bind(event.book_id.value())
        .bind(serde_json::to_value(event)?)
        .bind(event.borrowed_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(CommitStatus::Committed)
    }

    async fn history_for_reader(&self, reader_id: ReaderId) -> Result<Vec<BookBorrowed>> {
        let rows = sqlx::query(
            r#"
            SELECT event_data
            FROM borrow_events
            WHERE reader_id = $1
            ORDER BY sequence_number DESC
            "#,
        )
        .bind(reader_id.value())
        .fetch_all(&self.pool)
        .await?;

        let mut events = Vec::with_capacity(rows.len());
        for row in rows {
            let event_data: serde_json::Value = row.get("event_data");
            events.push(serde_json::from_value(event_data)?);
        }

        Ok(events)
    }
}
