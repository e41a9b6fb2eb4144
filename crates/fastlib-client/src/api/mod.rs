//! The FastLibrarian REST API as a trait, with an HTTP implementation and a
//! test double.

pub mod http;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

use std::future::Future;
use std::pin::Pin;

use crate::error::ApiError;
use crate::model::{Author, Book, FoundAuthor, NewAuthor, NewBook, NewSeries, Series, StatusPatch};
use crate::server_config::{ConfigHealth, RawValidation, ServerConfig};

pub use http::HttpApi;

/// Boxed future returned by every [`LibraryApi`] method.
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ApiError>> + Send + 'a>>;

/// Every endpoint the client consumes.
///
/// Methods returning `String` for config writes yield the server's
/// `message` acknowledgement.
pub trait LibraryApi: Send + Sync {
    fn list_authors(&self) -> ApiFuture<'_, Vec<Author>>;
    fn get_author<'a>(&'a self, id: &'a str) -> ApiFuture<'a, Author>;
    fn create_author<'a>(&'a self, author: &'a NewAuthor) -> ApiFuture<'a, Author>;
    /// `POST /authors/update_single_author_books/{id}`; returns the refreshed author.
    fn refresh_author_books<'a>(&'a self, id: &'a str) -> ApiFuture<'a, Author>;
    fn find_authors<'a>(&'a self, name: &'a str) -> ApiFuture<'a, Vec<FoundAuthor>>;

    fn list_books(&self) -> ApiFuture<'_, Vec<Book>>;
    fn get_book<'a>(&'a self, id: &'a str) -> ApiFuture<'a, Book>;
    fn create_book<'a>(&'a self, book: &'a NewBook) -> ApiFuture<'a, Book>;
    fn patch_book_status<'a>(&'a self, id: &'a str, patch: &'a StatusPatch) -> ApiFuture<'a, Book>;

    fn list_series(&self) -> ApiFuture<'_, Vec<Series>>;
    fn create_series<'a>(&'a self, series: &'a NewSeries) -> ApiFuture<'a, Series>;

    fn get_config(&self) -> ApiFuture<'_, ServerConfig>;
    fn put_config<'a>(&'a self, config: &'a ServerConfig) -> ApiFuture<'a, String>;
    fn config_health(&self) -> ApiFuture<'_, ConfigHealth>;
    fn get_raw_config(&self) -> ApiFuture<'_, String>;
    fn put_raw_config<'a>(&'a self, toml: &'a str) -> ApiFuture<'a, String>;
    fn validate_raw_config<'a>(&'a self, toml: &'a str) -> ApiFuture<'a, RawValidation>;
    fn reload_config(&self) -> ApiFuture<'_, String>;
    fn download_client_types(&self) -> ApiFuture<'_, Vec<String>>;
}
