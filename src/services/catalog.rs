//! Catalog management service

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookFilter, BookPayload, BookQuery, BookSummary},
    repository::{CatalogError, Repository},
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Add a book and return its id
    pub fn add_book(&self, payload: BookPayload) -> AppResult<String> {
        let id = self
            .repository
            .books
            .create(payload)
            .map_err(|e| reject("add", e))?;

        // The append just happened under the write lock; a miss here means the store is broken.
        if !self.repository.books.contains(&id).map_err(|e| reject("add", e))? {
            tracing::error!("Book {} missing right after insert", id);
            return Err(AppError::NotStored("Failed to add book".to_string()));
        }

        tracing::info!("Book {} added", id);
        Ok(id)
    }

    /// List condensed books matching the query filters
    pub fn list_books(&self, query: &BookQuery) -> AppResult<Vec<BookSummary>> {
        let filter = BookFilter::from(query);
        tracing::debug!("Listing books with filter {:?}", filter);
        self.repository
            .books
            .list(&filter)
            .map_err(|e| reject("list", e))
    }

    /// Get a book by ID
    pub fn get_book(&self, id: &str) -> AppResult<Book> {
        self.repository.books.get(id).map_err(|e| match e {
            CatalogError::NotFound(_) => AppError::NotFound("Book not found".to_string()),
            other => reject("get", other),
        })
    }

    /// Replace the mutable fields of an existing book
    pub fn update_book(&self, id: &str, payload: BookPayload) -> AppResult<()> {
        self.repository
            .books
            .update(id, payload)
            .map_err(|e| reject("update", e))?;

        tracing::info!("Book {} updated", id);
        Ok(())
    }

    /// Delete a book
    pub fn delete_book(&self, id: &str) -> AppResult<()> {
        let removed = self
            .repository
            .books
            .delete(id)
            .map_err(|e| reject("delete", e))?;

        tracing::info!("Book {} ({}) deleted", removed.id, removed.name);
        Ok(())
    }

    /// Number of stored books
    pub fn count_books(&self) -> AppResult<usize> {
        self.repository.books.count().map_err(|e| reject("count", e))
    }
}

/// Client-facing error for a failed `action`
fn reject(action: &str, error: CatalogError) -> AppError {
    tracing::debug!("Rejected {} book: {}", action, error);
    match error {
        CatalogError::MissingName => AppError::Validation(format!(
            "Failed to {} book. Please provide the book name",
            action
        )),
        CatalogError::ReadPageExceedsPageCount { .. } => AppError::Validation(format!(
            "Failed to {} book. readPage must not be greater than pageCount",
            action
        )),
        CatalogError::NotFound(_) => {
            AppError::NotFound(format!("Failed to {} book. Id not found", action))
        }
        CatalogError::IdsExhausted(_) => {
            tracing::error!("Failed to {} book: {}", action, error);
            AppError::NotStored(format!("Failed to {} book", action))
        }
        CatalogError::Unavailable => AppError::Internal(format!("Failed to {} book: {}", action, error)),
    }
}
