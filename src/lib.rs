//! Bible Study - reading, search and Strong's word study
//!
//! This crate provides the core of a Bible reading application: free-text
//! reference parsing, book-name normalization, a search dispatcher that
//! routes between reference lookup and full-text search, and a Strong's
//! resolver that connects translations to the tagged KJV text and the
//! Hebrew/Greek lexicon.
//!
//! ## Architecture
//! Services sit on two async store traits:
//! Request -> Service (reader / search / strongs / annotations) -> Store -> PostgreSQL or memory
//!
//! ## Quick Start
//!
//! ```rust
//! use bible_study::reference::parse_bible_reference;
//!
//! let reference = parse_bible_reference("1.Joh.1:2-5").unwrap();
//! assert_eq!(reference.book, "I John");
//! assert_eq!(reference.verses, Some(vec![2, 3, 4, 5]));
//! ```

// Core error handling and configuration
pub mod config;
pub mod error;

// Reference parsing and book names
pub mod reference;

// Strong's tags, lexicon cards and verse mapping
pub mod strongs;

// Backend contract and the in-memory implementation
pub mod store;

// Services
pub mod annotations;
pub mod position;
pub mod reader;
pub mod search;

// Database integration (when enabled)
#[cfg(feature = "database")]
pub mod database;

// REST API (when enabled)
#[cfg(feature = "server")]
pub mod api;

// Public re-exports
pub use annotations::{AnnotationService, Toggled};
pub use config::{AppConfig, Backend};
pub use error::{BibleError, BibleResult, StoreError, StoreResult};
pub use position::PositionFile;
pub use reader::ReaderService;
pub use reference::{normalize_book_name, parse_bible_reference, VerseKey};
pub use search::SearchDispatcher;
pub use store::{AnnotationStore, BibleStore, InMemoryBibleStore, VersionFilter};
pub use strongs::{LexiconNavigator, StrongsNumber, StrongsResolver};

#[cfg(feature = "database")]
pub use database::{DatabaseConfig, DatabaseManager, PgAnnotationStore, PgBibleStore};

#[cfg(feature = "server")]
pub use api::{create_router, AppState};

pub use bible_types;
