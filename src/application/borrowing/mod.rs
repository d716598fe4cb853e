mod accounts;
mod borrow_service;
mod errors;

pub use accounts::{get_book, get_reader, register_book, register_reader};
pub use borrow_service::{
    BorrowOutcome, BorrowReceipt, ServiceDependencies, borrow_book, borrow_history,
    check_eligibility,
};
pub use errors::{BorrowApplicationError, Result};
