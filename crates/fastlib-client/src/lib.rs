//! Client-side core of the FastLibrarian library browser.
//!
//! Typed API records, the HTTP client, and the UI-independent state
//! machines the front end drives: per-medium book status selection, the
//! server configuration editor, and generation-stamped fetch/search slots.

pub mod api;
pub mod config_editor;
pub mod error;
pub mod fetch;
pub mod model;
pub mod server_config;
pub mod status;

// Re-export for convenience
pub use api::{ApiFuture, HttpApi, LibraryApi};
pub use config_editor::{ConfigEditor, EditorMode};
pub use error::{ApiError, EditError};
pub use fetch::{Fetch, FetchState, Generation, GenerationCounter, Search};
pub use model::{Author, Book, BookStatus, FoundAuthor, Medium, Series, StatusPatch};
pub use server_config::{ConfigHealth, ConfigSection, DownloadClientConfig, ServerConfig};
pub use status::{Completion, DropdownToken, StatusBoard, StatusChange};
