pub mod book_repository;
pub mod borrow_store;
pub mod reader_repository;

// パブリックに型を再エクスポート
pub use book_repository::BookRepository as PostgresBookRepository;
pub use borrow_store::BorrowStore as PostgresBorrowStore;
pub use reader_repository::ReaderRepository as PostgresReaderRepository;

use sqlx::PgPool;

/// マイグレーションを実行する
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// 範囲外の値を持つ行をエラーとして報告する
///
/// 負の件数をDBから読んだ場合も丸めずに失敗させる。
pub(crate) fn invalid_data(
    message: String,
) -> Box<dyn std::error::Error + Send + Sync> {
    Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, message))
}

pub(crate) fn revision_from_row(
    value: i64,
) -> Result<crate::domain::Revision, Box<dyn std::error::Error + Send + Sync>> {
    u64::try_from(value)
        .map(crate::domain::Revision::from_value)
        .map_err(|_| invalid_data(format!("revision out of range: {}", value)))
}
