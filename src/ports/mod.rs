pub mod book_repository;
pub mod borrow_store;
pub mod reader_repository;

pub use book_repository::BookRepository;
pub use borrow_store::{BorrowStore, CommitStatus, ExpectedRevisions};
pub use reader_repository::ReaderRepository;
