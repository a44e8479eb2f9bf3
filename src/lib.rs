//! Library Server
//!
//! A REST JSON API managing books and the libraries that hold them.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use crate::config::AppConfig;
pub use crate::error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<services::Services>,
}

impl AppState {
    pub fn new(repository: repository::Repository) -> Self {
        Self {
            services: Arc::new(services::Services::new(repository)),
        }
    }
}
