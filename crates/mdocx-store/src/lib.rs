//! mdocx-store - Persistence for uploaded Markdown
//!
//! A small async store over SQLite (`sqlx`). Storage and conversion are
//! separate failure domains: nothing here depends on the converter, and a
//! failed conversion never touches stored content.
//!
//! # Example
//!
//! ```
//! use mdocx_store::{MarkdownStore, StoreError};
//!
//! # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
//! let store = MarkdownStore::in_memory().await?;
//! let id = store.create("notes.md", "# Notes").await?;
//! assert_eq!(store.read(id).await?, "# Notes");
//!
//! store.delete(id).await?;
//! assert!(matches!(store.read(id).await, Err(StoreError::NotFound(_))));
//! # Ok::<(), StoreError>(())
//! # }).unwrap();
//! ```

pub mod config;
pub mod error;
pub mod store;

pub use config::{StoreSettings, DEFAULT_DATABASE};
pub use error::{Result, StoreError};
pub use store::{MarkdownStore, StoredFile};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
