pub mod book;
pub mod borrowing;
pub mod commands;
pub mod errors;
pub mod events;
pub mod reader;
pub mod value_objects;

pub use book::*;
pub use borrowing::*;
pub use errors::*;
pub use events::*;
pub use reader::*;
pub use value_objects::*;
