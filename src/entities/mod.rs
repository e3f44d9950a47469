//! Entity creation and management

pub mod books;

pub use books::{Book, place_books, spawn_books, get_book_near, get_book_by_id, mark_book_collected};
