use crate::domain::{CreditBalance, ReaderAccount, ReaderId};
use crate::ports::reader_repository::{ReaderRepository as ReaderRepositoryTrait, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

use super::{invalid_data, revision_from_row};

/// PostgreSQLの行データをReaderAccountに変換する
///
/// credits_remainingが負の行は不正データとしてエラーにする。
fn map_row_to_reader(row: &PgRow) -> Result<ReaderAccount> {
    let credits_remaining = CreditBalance::try_from(row.get::<i64, _>("credits_remaining"))
        .map_err(|e| invalid_data(format!("readers.credits_remaining: {}", e)))?;

    Ok(ReaderAccount {
        reader_id: ReaderId::from_uuid(row.get("reader_id")),
        credits_remaining,
        is_suspended: row.get("is_suspended"),
        revision: revision_from_row(row.get("revision"))?,
    })
}

/// ReaderRepositoryのPostgreSQL実装
pub struct ReaderRepository {
    pool: PgPool,
}

impl ReaderRepository {
    /// PostgreSQLコネクションプールから新しいReaderRepositoryを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReaderRepositoryTrait for ReaderRepository {
    async fn find_by_id(&self, reader_id: ReaderId) -> Result<Option<ReaderAccount>> {
        let row = sqlx::query(
            r#"
            SELECT reader_id, credits_remaining, is_suspended, revision
            FROM readers
            WHERE reader_id = $1
            "#,
        )
        .bind(reader_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_reader).transpose()
    }

    /// 利用者をupsertする
    ///
    /// 既存行の場合はリビジョンを1つ進める。
    async fn upsert(&self, reader: ReaderAccount) -> Result<ReaderAccount> {
        let row = sqlx::query(
            r#"
            INSERT INTO readers (reader_id, credits_remaining, is_suspended, revision, updated_at)
            VALUES ($1, $2, $3, 1, NOW())
            ON CONFLICT (reader_id)
            DO UPDATE SET
                credits_remaining = EXCLUDED.credits_remaining,
                is_suspended = EXCLUDED.is_suspended,
                revision = readers.revision + 1,
                updated_at = NOW()
            RETURNING reader_id, credits_remaining, is_suspended, revision
            "#,
        )
        .bind(reader.reader_id.value())
        .bind(i64::from(reader.credits_remaining.value()))
        .bind(reader.is_suspended)
        .fetch_one(&self.pool)
        .await?;

        map_row_to_reader(&row)
    }
}
