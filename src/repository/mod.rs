//! Repository layer for book storage

pub mod books;
pub mod ids;

use std::sync::Arc;

pub use books::{BookStore, BooksRepository, CatalogError, CatalogResult};
pub use ids::{IdGenerator, RandomIdGenerator};

/// Main repository struct holding the in-memory stores
#[derive(Clone)]
pub struct Repository {
    pub books: BooksRepository,
}

impl Repository {
    /// Create a repository with empty stores
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            books: BooksRepository::new(ids),
        }
    }
}
