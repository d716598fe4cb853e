use crate::domain::{
    BookBorrowed, BookId, BorrowTransition, CatalogBook, ReaderAccount, ReaderId,
};
use crate::ports::book_repository::BookRepository;
use crate::ports::borrow_store::{BorrowStore, CommitStatus, ExpectedRevisions};
use crate::ports::reader_repository::ReaderRepository;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Default)]
struct Tables {
    readers: HashMap<ReaderId, ReaderAccount>,
    books: HashMap<BookId, CatalogBook>,
    borrows: Vec<BookBorrowed>,
}

/// In-memory implementation of all library ports
///
/// Readers, books and the borrow log share a single lock, so a borrow commit
/// re-validates and writes both entities inside one critical section.
/// Used by tests and by the server when no database is configured.
pub struct Library {
    tables: Mutex<Tables>,
}

impl Library {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| "in-memory library lock poisoned".into())
    }
}

impl Default for Library {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReaderRepository for Library {
    async fn find_by_id(&self, reader_id: ReaderId) -> Result<Option<ReaderAccount>> {
        Ok(self.lock()?.readers.get(&reader_id).cloned())
    }

    async fn upsert(&self, reader: ReaderAccount) -> Result<ReaderAccount> {
        let mut tables = self.lock()?;
        let revision = tables
            .readers
            .get(&reader.reader_id)
            .map(|current| current.revision.next())
            .unwrap_or_default();

        let saved = ReaderAccount { revision, ..reader };
        tables.readers.insert(saved.reader_id, saved.clone());
        Ok(saved)
    }
}

#[async_trait]
impl BookRepository for Library {
    async fn find_by_id(&self, book_id: BookId) -> Result<Option<CatalogBook>> {
        Ok(self.lock()?.books.get(&book_id).cloned())
    }

    async fn upsert(&self, book: CatalogBook) -> Result<CatalogBook> {
        let mut tables = self.lock()?;
        let revision = tables
            .books
            .get(&book.book_id)
            .map(|current| current.revision.next())
            .unwrap_or_default();

        let saved = CatalogBook { revision, ..book };
        tables.books.insert(saved.book_id, saved.clone());
        Ok(saved)
    }
}

#[async_trait]
impl BorrowStore for Library {
    /// Re-checks revisions and counters under the lock before writing
    async fn commit_borrow(
        &self,
        expected: ExpectedRevisions,
        transition: &BorrowTransition,
    ) -> Result<CommitStatus> {
        let mut tables = self.lock()?;
        let reader_id = transition.reader_after.reader_id;
        let book_id = transition.book_after.book_id;

        let reader_current = match tables.readers.get(&reader_id) {
            Some(reader) => reader,
            None => return Ok(CommitStatus::Conflict),
        };
        let book_current = match tables.books.get(&book_id) {
            Some(book) => book,
            None => return Ok(CommitStatus::Conflict),
        };

        if reader_current.revision != expected.reader
            || book_current.revision != expected.book
            || reader_current.credits_remaining.is_exhausted()
            || book_current.available_copy_count.is_empty()
        {
            return Ok(CommitStatus::Conflict);
        }

        tables
            .readers
            .insert(reader_id, transition.reader_after.clone());
        tables.books.insert(book_id, transition.book_after.clone());
        tables.borrows.push(transition.event.clone());

        Ok(CommitStatus::Committed)
    }

    async fn history_for_reader(&self, reader_id: ReaderId) -> Result<Vec<BookBorrowed>> {
        let tables = self.lock()?;
        Ok(tables
            .borrows
            .iter()
            .rev()
            .filter(|event| event.reader_id == reader_id)
            .cloned()
            .collect())
    }
}
