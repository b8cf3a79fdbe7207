//! Bookshelf
//!
//! A small REST JSON server keeping a catalog of books in process memory:
//! create, list and filter, fetch, update and delete.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

use repository::{IdGenerator, RandomIdGenerator, Repository};
use services::Services;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<Services>,
}

impl AppState {
    /// Fresh state with an empty catalog and random 16-character ids
    pub fn new(config: AppConfig) -> Self {
        Self::with_id_generator(config, Arc::new(RandomIdGenerator))
    }

    pub fn with_id_generator(config: AppConfig, ids: Arc<dyn IdGenerator>) -> Self {
        let repository = Repository::new(ids);
        Self {
            config: Arc::new(config),
            services: Arc::new(Services::new(repository)),
        }
    }
}
