//! In-memory book store.
//!
//! [`BookStore`] owns the ordered collection and implements every catalog rule.
//! [`BooksRepository`] is the cloneable handle shared across request handlers; it
//! holds the lock for the whole duration of each operation, so every mutation is
//! atomic from a caller's point of view.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, SubsecRound, Utc};
use thiserror::Error;

use super::ids::IdGenerator;
use crate::models::book::{Book, BookFilter, BookPayload, BookSummary};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("missing name")]
    MissingName,

    #[error("readPage ({read_page}) exceeds pageCount ({page_count})")]
    ReadPageExceedsPageCount { read_page: i64, page_count: i64 },

    #[error("book {0} not found")]
    NotFound(String),

    #[error("no unused book id after {0} attempts")]
    IdsExhausted(usize),

    #[error("book store lock poisoned")]
    Unavailable,
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Collisions tolerated before giving up on a create
const MAX_ID_ATTEMPTS: usize = 32;

/// Ordered collection of books, initially empty
pub struct BookStore {
    books: Vec<Book>,
    ids: Arc<dyn IdGenerator>,
}

impl BookStore {
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            books: Vec::new(),
            ids,
        }
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.books.iter().any(|book| book.id == id)
    }

    /// Validate and append a new book, returning its id
    pub fn create(&mut self, mut payload: BookPayload) -> CatalogResult<String> {
        let name = validate(&mut payload)?;
        let id = self.fresh_id()?;
        let now = now();

        self.books.push(Book {
            id: id.clone(),
            name,
            year: payload.year,
            author: payload.author,
            summary: payload.summary,
            publisher: payload.publisher,
            page_count: payload.page_count,
            read_page: payload.read_page,
            finished: Book::is_finished(payload.page_count, payload.read_page),
            reading: payload.reading,
            inserted_at: now,
            updated_at: now,
        });

        Ok(id)
    }

    /// Condensed view of the books matching `filter`, in insertion order.
    /// Calling again restarts from the first book.
    pub fn list<'a>(&'a self, filter: &'a BookFilter) -> impl Iterator<Item = BookSummary> + 'a {
        self.books
            .iter()
            .filter(move |book| filter.matches(book))
            .map(BookSummary::from)
    }

    pub fn get(&self, id: &str) -> CatalogResult<&Book> {
        self.books
            .iter()
            .find(|book| book.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    /// Replace every mutable field. Validation runs before the lookup.
    pub fn update(&mut self, id: &str, mut payload: BookPayload) -> CatalogResult<()> {
        let name = validate(&mut payload)?;
        let book = self
            .books
            .iter_mut()
            .find(|book| book.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;

        book.name = name;
        book.year = payload.year;
        book.author = payload.author;
        book.summary = payload.summary;
        book.publisher = payload.publisher;
        book.page_count = payload.page_count;
        book.read_page = payload.read_page;
        book.finished = Book::is_finished(payload.page_count, payload.read_page);
        book.reading = payload.reading;
        book.updated_at = now();

        Ok(())
    }

    /// Remove the book with `id`, keeping the order of the others
    pub fn delete(&mut self, id: &str) -> CatalogResult<Book> {
        let index = self
            .books
            .iter()
            .position(|book| book.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;
        Ok(self.books.remove(index))
    }

    fn fresh_id(&self) -> CatalogResult<String> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.ids.generate();
            if !self.contains(&id) {
                return Ok(id);
            }
            tracing::warn!("Generated book id {} already in use, retrying", id);
        }
        Err(CatalogError::IdsExhausted(MAX_ID_ATTEMPTS))
    }
}

/// Name check first, then the page bounds. Returns the validated name.
fn validate(payload: &mut BookPayload) -> CatalogResult<String> {
    let name = payload
        .name
        .take()
        .filter(|name| !name.is_empty())
        .ok_or(CatalogError::MissingName)?;

    if payload.read_page > payload.page_count {
        return Err(CatalogError::ReadPageExceedsPageCount {
            read_page: payload.read_page,
            page_count: payload.page_count,
        });
    }

    Ok(name)
}

/// Millisecond precision, matching the serialized form
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Shared handle over a [`BookStore`]
#[derive(Clone)]
pub struct BooksRepository {
    store: Arc<RwLock<BookStore>>,
}

impl BooksRepository {
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            store: Arc::new(RwLock::new(BookStore::new(ids))),
        }
    }

    fn read(&self) -> CatalogResult<RwLockReadGuard<'_, BookStore>> {
        self.store.read().map_err(|_| CatalogError::Unavailable)
    }

    fn write(&self) -> CatalogResult<RwLockWriteGuard<'_, BookStore>> {
        self.store.write().map_err(|_| CatalogError::Unavailable)
    }

    pub fn create(&self, payload: BookPayload) -> CatalogResult<String> {
        self.write()?.create(payload)
    }

    pub fn list(&self, filter: &BookFilter) -> CatalogResult<Vec<BookSummary>> {
        Ok(self.read()?.list(filter).collect())
    }

    pub fn get(&self, id: &str) -> CatalogResult<Book> {
        self.read()?.get(id).cloned()
    }

    pub fn update(&self, id: &str, payload: BookPayload) -> CatalogResult<()> {
        self.write()?.update(id, payload)
    }

    pub fn delete(&self, id: &str) -> CatalogResult<Book> {
        self.write()?.delete(id)
    }

    pub fn contains(&self, id: &str) -> CatalogResult<bool> {
        Ok(self.read()?.contains(id))
    }

    pub fn count(&self) -> CatalogResult<usize> {
        Ok(self.read()?.len())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    /// Hands out `book-0`, `book-1`, ...
    #[derive(Default)]
    struct SequentialIds(AtomicUsize);

    impl IdGenerator for SequentialIds {
        fn generate(&self) -> String {
            format!("book-{}", self.0.fetch_add(1, Ordering::SeqCst))
        }
    }

    /// Replays a fixed script of ids
    struct ScriptedIds(Mutex<Vec<&'static str>>);

    impl IdGenerator for ScriptedIds {
        fn generate(&self) -> String {
            self.0.lock().unwrap().remove(0).to_string()
        }
    }

    fn store() -> BookStore {
        BookStore::new(Arc::new(SequentialIds::default()))
    }

    fn payload(name: &str, page_count: i64, read_page: i64) -> BookPayload {
        BookPayload {
            name: Some(name.to_string()),
            year: Some(2010),
            author: Some("John Doe".into()),
            summary: Some("Lorem ipsum".into()),
            publisher: Some("Dicoding Indonesia".into()),
            page_count,
            read_page,
            reading: false,
        }
    }

    #[test]
    fn create_assigns_id_timestamps_and_finished() {
        let mut store = store();
        let id = store.create(payload("A", 100, 100)).unwrap();

        let book = store.get(&id).unwrap();
        assert_eq!(book.id, "book-0");
        assert_eq!(book.name, "A");
        assert_eq!(book.year, Some(2010));
        assert_eq!(book.author.as_deref(), Some("John Doe"));
        assert_eq!(book.summary.as_deref(), Some("Lorem ipsum"));
        assert_eq!(book.publisher.as_deref(), Some("Dicoding Indonesia"));
        assert_eq!((book.page_count, book.read_page), (100, 100));
        assert!(book.finished);
        assert!(!book.reading);
        assert_eq!(book.inserted_at, book.updated_at);
    }

    #[test]
    fn create_rejects_missing_or_empty_name() {
        let mut store = store();
        let mut missing = payload("x", 10, 1);
        missing.name = None;

        assert_eq!(store.create(missing), Err(CatalogError::MissingName));
        assert_eq!(store.create(payload("", 10, 1)), Err(CatalogError::MissingName));
        assert!(store.is_empty());
    }

    #[test]
    fn create_rejects_read_page_beyond_page_count() {
        let mut store = store();
        assert_eq!(
            store.create(payload("B", 100, 150)),
            Err(CatalogError::ReadPageExceedsPageCount {
                read_page: 150,
                page_count: 100
            })
        );
        assert!(store.is_empty());
    }

    #[test]
    fn name_check_precedes_page_check() {
        let mut store = store();
        assert_eq!(store.create(payload("", 1, 5)), Err(CatalogError::MissingName));
    }

    #[test]
    fn colliding_ids_are_regenerated() {
        let ids = ScriptedIds(Mutex::new(vec!["dup", "dup", "fresh"]));
        let mut store = BookStore::new(Arc::new(ids));

        assert_eq!(store.create(payload("A", 1, 0)).unwrap(), "dup");
        assert_eq!(store.create(payload("B", 1, 0)).unwrap(), "fresh");
        assert_eq!(store.len(), 2);
    }

    /// Always returns the same id
    struct ConstantIds;

    impl IdGenerator for ConstantIds {
        fn generate(&self) -> String {
            "same-id-every-time".to_string()
        }
    }

    #[test]
    fn create_gives_up_when_every_generated_id_is_taken() {
        let mut store = BookStore::new(Arc::new(ConstantIds));
        store.create(payload("A", 1, 0)).unwrap();

        assert_eq!(
            store.create(payload("B", 1, 0)),
            Err(CatalogError::IdsExhausted(MAX_ID_ATTEMPTS))
        );
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("same-id-every-time").unwrap().name, "A");
    }

    #[test]
    fn negative_page_counts_are_accepted() {
        let mut store = store();
        let id = store.create(payload("A", -1, -5)).unwrap();

        let book = store.get(&id).unwrap();
        assert_eq!((book.page_count, book.read_page), (-1, -5));
        assert!(!book.finished);
    }

    #[test]
    fn list_filters_in_insertion_order() {
        let mut store = store();
        let mut reading = payload("Rust Programming", 10, 3);
        reading.reading = true;
        store.create(reading).unwrap();
        store.create(payload("Dicoding Basics", 10, 10)).unwrap();
        store.create(payload("Advanced rust", 10, 0)).unwrap();

        let names = |filter: BookFilter| -> Vec<String> {
            store.list(&filter).map(|book| book.name).collect()
        };

        assert_eq!(
            names(BookFilter::All),
            ["Rust Programming", "Dicoding Basics", "Advanced rust"]
        );
        assert_eq!(
            names(BookFilter::Name("rust".into())),
            ["Rust Programming", "Advanced rust"]
        );
        assert_eq!(names(BookFilter::Reading(Some(true))), ["Rust Programming"]);
        assert_eq!(
            names(BookFilter::Reading(Some(false))),
            ["Dicoding Basics", "Advanced rust"]
        );
        assert_eq!(names(BookFilter::Finished(Some(true))), ["Dicoding Basics"]);
        assert!(names(BookFilter::Finished(None)).is_empty());
    }

    #[test]
    fn list_is_restartable_and_condensed() {
        let mut store = store();
        store.create(payload("A", 1, 0)).unwrap();

        let filter = BookFilter::All;
        let first: Vec<_> = store.list(&filter).collect();
        let second: Vec<_> = store.list(&filter).collect();
        assert_eq!(first, second);
        assert_eq!(
            first,
            vec![BookSummary {
                id: "book-0".into(),
                name: "A".into(),
                publisher: Some("Dicoding Indonesia".into()),
            }]
        );
    }

    #[test]
    fn get_unknown_id_is_not_found() {
        let store = store();
        assert_eq!(
            store.get("missing").unwrap_err(),
            CatalogError::NotFound("missing".into())
        );
    }

    #[test]
    fn update_replaces_fields_and_recomputes_finished() {
        let mut store = store();
        let id = store.create(payload("A", 100, 10)).unwrap();
        let inserted_at = store.get(&id).unwrap().inserted_at;

        let mut changes = payload("A, 2nd edition", 200, 200);
        changes.publisher = None;
        changes.reading = true;
        store.update(&id, changes).unwrap();

        let book = store.get(&id).unwrap();
        assert_eq!(book.id, id);
        assert_eq!(book.name, "A, 2nd edition");
        assert_eq!(book.publisher, None);
        assert!(book.finished);
        assert!(book.reading);
        assert_eq!(book.inserted_at, inserted_at);
        assert!(book.updated_at >= inserted_at);
    }

    #[test]
    fn update_validates_before_lookup() {
        let mut store = store();
        assert_eq!(
            store.update("missing", payload("", 1, 0)),
            Err(CatalogError::MissingName)
        );
        assert_eq!(
            store.update("missing", payload("A", 1, 0)),
            Err(CatalogError::NotFound("missing".into()))
        );
    }

    #[test]
    fn rejected_update_leaves_book_untouched() {
        let mut store = store();
        let id = store.create(payload("A", 100, 10)).unwrap();
        let before = store.get(&id).unwrap().clone();

        assert!(store.update(&id, payload("B", 100, 150)).is_err());
        assert_eq!(store.get(&id).unwrap(), &before);
    }

    #[test]
    fn delete_removes_exactly_one_and_keeps_order() {
        let mut store = store();
        let a = store.create(payload("A", 1, 0)).unwrap();
        let b = store.create(payload("B", 1, 0)).unwrap();
        let c = store.create(payload("C", 1, 0)).unwrap();

        assert_eq!(store.delete(&b).unwrap().name, "B");
        let ids: Vec<_> = store.list(&BookFilter::All).map(|book| book.id).collect();
        assert_eq!(ids, [a, c]);

        assert_eq!(store.delete(&b), Err(CatalogError::NotFound(b.clone())));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn repository_handles_share_one_store() {
        let repository = BooksRepository::new(Arc::new(SequentialIds::default()));
        let other = repository.clone();

        let id = repository.create(payload("Shared", 5, 5)).unwrap();
        assert!(other.contains(&id).unwrap());
        assert_eq!(other.count().unwrap(), 1);
        assert_eq!(other.get(&id).unwrap().name, "Shared");
        assert_eq!(other.list(&BookFilter::All).unwrap().len(), 1);

        other.delete(&id).unwrap();
        assert_eq!(repository.count().unwrap(), 0);
    }
}
