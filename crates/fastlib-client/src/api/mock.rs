//! In-memory [`LibraryApi`] for tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use serde_json::Value;

use super::{ApiFuture, LibraryApi};
use crate::error::ApiError;
use crate::model::{Author, Book, FoundAuthor, NewAuthor, NewBook, NewSeries, Series, StatusPatch};
use crate::server_config::{ConfigHealth, RawValidation, ServerConfig};

/// One request the mock received.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
}

/// A failure to inject for a route.
#[derive(Debug, Clone)]
pub enum MockFailure {
    Status { status: u16, detail: Option<String> },
    Transport(String),
}

impl MockFailure {
    fn to_error(&self) -> ApiError {
        match self {
            MockFailure::Status { status, detail } => ApiError::Status {
                status: *status,
                detail: detail.clone(),
            },
            MockFailure::Transport(msg) => ApiError::Other(msg.clone()),
        }
    }
}

#[derive(Default)]
struct MockState {
    authors: Vec<Author>,
    books: Vec<Book>,
    series: Vec<Series>,
    found: Vec<FoundAuthor>,
    config: ServerConfig,
    raw_toml: String,
    health: ConfigHealth,
    client_types: Vec<String>,
    next_id: u64,
    calls: Vec<RecordedCall>,
    /// Keyed by `"METHOD /path"`.
    failures: HashMap<String, MockFailure>,
}

/// A hand-rolled library server held in memory.
///
/// Writes mutate the held data, so a re-fetch after a successful update
/// sees it. Any route can be made to fail with [`MockApi::fail`], and every
/// call can be slowed down with [`MockApi::with_delay`].
#[derive(Default)]
pub struct MockApi {
    state: Mutex<MockState>,
    delay: Option<Duration>,
}

impl MockApi {
    pub fn new() -> Self {
        let api = Self::default();
        {
            let mut state = api.state.lock().unwrap();
            state.health = ConfigHealth {
                status: "healthy".to_string(),
                environment: Some("development".to_string()),
                version: Some("1.0.0".to_string()),
                database_configured: true,
                ..ConfigHealth::default()
            };
            state.next_id = 1000;
        }
        api
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_books(self, books: Vec<Book>) -> Self {
        self.state.lock().unwrap().books = books;
        self
    }

    pub fn with_authors(self, authors: Vec<Author>) -> Self {
        self.state.lock().unwrap().authors = authors;
        self
    }

    pub fn with_series(self, series: Vec<Series>) -> Self {
        self.state.lock().unwrap().series = series;
        self
    }

    pub fn with_found_authors(self, found: Vec<FoundAuthor>) -> Self {
        self.state.lock().unwrap().found = found;
        self
    }

    pub fn with_config(self, config: ServerConfig) -> Self {
        self.state.lock().unwrap().config = config;
        self
    }

    pub fn with_raw_toml(self, toml: impl Into<String>) -> Self {
        self.state.lock().unwrap().raw_toml = toml.into();
        self
    }

    pub fn with_client_types(self, types: Vec<String>) -> Self {
        self.state.lock().unwrap().client_types = types;
        self
    }

    /// Make `route` (e.g. `"PATCH /books/1"`) fail until [`MockApi::heal`].
    pub fn fail(&self, route: &str, failure: MockFailure) {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert(route.to_string(), failure);
    }

    pub fn heal(&self, route: &str) {
        self.state.lock().unwrap().failures.remove(route);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn calls_to(&self, method: &str, path: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == method && c.path == path)
            .collect()
    }

    pub fn config(&self) -> ServerConfig {
        self.state.lock().unwrap().config.clone()
    }

    pub fn book(&self, id: &str) -> Option<Book> {
        self.state
            .lock()
            .unwrap()
            .books
            .iter()
            .find(|b| b.id == id)
            .cloned()
    }

    /// Record the call, apply the delay, then run `respond` on the state
    /// unless a failure is injected for the route.
    fn handle<'a, T, F>(
        &'a self,
        method: &'static str,
        path: String,
        body: Option<Value>,
        respond: F,
    ) -> ApiFuture<'a, T>
    where
        T: Send + 'a,
        F: FnOnce(&mut MockState) -> Result<T, ApiError> + Send + 'a,
    {
        let delay = self.delay;
        Box::pin(async move {
            if let Some(d) = delay {
                tokio::time::sleep(d).await;
            }
            let mut state = self.state.lock().unwrap();
            let route = format!("{method} {path}");
            state.calls.push(RecordedCall { method, path, body });
            if let Some(failure) = state.failures.get(&route) {
                return Err(failure.to_error());
            }
            respond(&mut *state)
        })
    }

    fn fresh_id(state: &mut MockState) -> String {
        state.next_id += 1;
        state.next_id.to_string()
    }
}

fn not_found(what: &str) -> ApiError {
    ApiError::Status {
        status: 404,
        detail: Some(format!("{what} not found")),
    }
}

fn body_of<T: serde::Serialize>(value: &T) -> Option<Value> {
    serde_json::to_value(value).ok()
}

impl LibraryApi for MockApi {
    fn list_authors(&self) -> ApiFuture<'_, Vec<Author>> {
        self.handle("GET", "/authors".into(), None, |s| Ok(s.authors.clone()))
    }

    fn get_author<'a>(&'a self, id: &'a str) -> ApiFuture<'a, Author> {
        self.handle("GET", format!("/authors/{id}"), None, move |s| {
            let mut author = s
                .authors
                .iter()
                .find(|a| a.id == id)
                .cloned()
                .ok_or_else(|| not_found("Author"))?;
            for book in &mut author.books {
                if let Some(current) = s.books.iter().find(|b| b.id == book.id) {
                    *book = current.clone();
                }
            }
            Ok(author)
        })
    }

    fn create_author<'a>(&'a self, author: &'a NewAuthor) -> ApiFuture<'a, Author> {
        self.handle("POST", "/authors".into(), body_of(author), move |s| {
            let created = Author {
                id: Self::fresh_id(s),
                name: author.name.clone(),
                bio: author.bio.clone(),
                external_refs: None,
                books: Vec::new(),
            };
            s.authors.push(created.clone());
            Ok(created)
        })
    }

    fn refresh_author_books<'a>(&'a self, id: &'a str) -> ApiFuture<'a, Author> {
        let path = format!("/authors/update_single_author_books/{id}");
        self.handle("POST", path, None, move |s| {
            s.authors
                .iter()
                .find(|a| a.id == id)
                .cloned()
                .ok_or_else(|| not_found("Author"))
        })
    }

    fn find_authors<'a>(&'a self, name: &'a str) -> ApiFuture<'a, Vec<FoundAuthor>> {
        let path = format!("/authors/find_authors?name={name}");
        self.handle("GET", path, None, move |s| {
            let needle = name.to_lowercase();
            Ok(s
                .found
                .iter()
                .filter(|f| f.name.to_lowercase().contains(&needle))
                .cloned()
                .collect())
        })
    }

    fn list_books(&self) -> ApiFuture<'_, Vec<Book>> {
        self.handle("GET", "/books".into(), None, |s| Ok(s.books.clone()))
    }

    fn get_book<'a>(&'a self, id: &'a str) -> ApiFuture<'a, Book> {
        self.handle("GET", format!("/books/{id}"), None, move |s| {
            s.books
                .iter()
                .find(|b| b.id == id)
                .cloned()
                .ok_or_else(|| not_found("Book"))
        })
    }

    fn create_book<'a>(&'a self, book: &'a NewBook) -> ApiFuture<'a, Book> {
        self.handle("POST", "/books".into(), body_of(book), move |s| {
            let created = Book {
                id: Self::fresh_id(s),
                title: book.title.clone(),
                description: None,
                authors: Vec::new(),
                series: Vec::new(),
                status: None,
                a_status: None,
                p_status: None,
                external_refs: None,
                editions: None,
            };
            s.books.push(created.clone());
            Ok(created)
        })
    }

    fn patch_book_status<'a>(&'a self, id: &'a str, patch: &'a StatusPatch) -> ApiFuture<'a, Book> {
        self.handle("PATCH", format!("/books/{id}"), body_of(patch), move |s| {
            let book = s
                .books
                .iter_mut()
                .find(|b| b.id == id)
                .ok_or_else(|| not_found("Book"))?;
            let slot = match patch.medium {
                crate::model::Medium::Ebook => &mut book.status,
                crate::model::Medium::Audio => &mut book.a_status,
                crate::model::Medium::Physical => &mut book.p_status,
            };
            *slot = Some(patch.status);
            Ok(book.clone())
        })
    }

    fn list_series(&self) -> ApiFuture<'_, Vec<Series>> {
        self.handle("GET", "/series".into(), None, |s| Ok(s.series.clone()))
    }

    fn create_series<'a>(&'a self, series: &'a NewSeries) -> ApiFuture<'a, Series> {
        self.handle("POST", "/series".into(), body_of(series), move |s| {
            let created = Series {
                id: Self::fresh_id(s),
                name: series.name.clone(),
                description: None,
                external_refs: None,
            };
            s.series.push(created.clone());
            Ok(created)
        })
    }

    fn get_config(&self) -> ApiFuture<'_, ServerConfig> {
        self.handle("GET", "/config".into(), None, |s| Ok(s.config.clone()))
    }

    fn put_config<'a>(&'a self, config: &'a ServerConfig) -> ApiFuture<'a, String> {
        self.handle("PUT", "/config".into(), body_of(config), move |s| {
            s.config = config.clone();
            Ok("Configuration updated successfully".to_string())
        })
    }

    fn config_health(&self) -> ApiFuture<'_, ConfigHealth> {
        self.handle("GET", "/config/health".into(), None, |s| Ok(s.health.clone()))
    }

    fn get_raw_config(&self) -> ApiFuture<'_, String> {
        self.handle("GET", "/config/raw".into(), None, |s| Ok(s.raw_toml.clone()))
    }

    fn put_raw_config<'a>(&'a self, toml: &'a str) -> ApiFuture<'a, String> {
        let body = serde_json::json!({ "toml_content": toml });
        self.handle("PUT", "/config/raw".into(), Some(body), move |s| {
            s.raw_toml = toml.to_string();
            Ok("Configuration updated from TOML string successfully".to_string())
        })
    }

    fn validate_raw_config<'a>(&'a self, toml: &'a str) -> ApiFuture<'a, RawValidation> {
        let body = serde_json::json!({ "toml_content": toml });
        self.handle("POST", "/config/validate".into(), Some(body), move |_| {
            let valid = !toml.trim().is_empty();
            Ok(RawValidation {
                valid,
                toml_valid: valid,
                config_valid: valid,
                errors: if valid {
                    Vec::new()
                } else {
                    vec!["TOML syntax error: empty document".to_string()]
                },
            })
        })
    }

    fn reload_config(&self) -> ApiFuture<'_, String> {
        self.handle("POST", "/config/reload".into(), None, |_| {
            Ok("Configuration reloaded successfully".to_string())
        })
    }

    fn download_client_types(&self) -> ApiFuture<'_, Vec<String>> {
        self.handle("GET", "/config/download-client-types".into(), None, |s| {
            Ok(s.client_types.clone())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BookStatus, Medium};

    fn book(id: &str) -> Book {
        serde_json::from_value(serde_json::json!({"id": id, "title": "T"})).unwrap()
    }

    #[tokio::test]
    async fn patch_updates_held_book_and_is_recorded() {
        let api = MockApi::new().with_books(vec![book("1")]);
        let patch = StatusPatch {
            medium: Medium::Audio,
            status: BookStatus::Have,
        };
        let updated = api.patch_book_status("1", &patch).await.unwrap();
        assert_eq!(updated.a_status, Some(BookStatus::Have));
        assert_eq!(updated.status, None);

        let calls = api.calls_to("PATCH", "/books/1");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].body, Some(serde_json::json!({"a_status": "Have"})));
    }

    #[tokio::test]
    async fn injected_failure_is_returned() {
        let api = MockApi::new();
        api.fail(
            "GET /books",
            MockFailure::Status {
                status: 500,
                detail: Some("boom".into()),
            },
        );
        let err = api.list_books().await.unwrap_err();
        assert_eq!(err.user_message(), "boom");
        api.heal("GET /books");
        assert!(api.list_books().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_book_is_not_found() {
        let api = MockApi::new();
        assert!(api.get_book("42").await.unwrap_err().is_not_found());
    }
}
