pub mod library;

pub use library::Library as InMemoryLibrary;
