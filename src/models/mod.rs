//! Data models for books and libraries

pub mod book;
pub mod library;

// Re-export commonly used types
pub use book::{Book, CreateBook, LibraryBook, UpdateBook};
pub use library::{CreateLibrary, Library, LibraryDetails};
