use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{ApiFuture, LibraryApi};
use crate::error::ApiError;
use crate::model::{
    ApiMessage, Author, Book, FoundAuthor, NewAuthor, NewBook, NewSeries, Series, StatusPatch,
};
use crate::server_config::{ConfigHealth, RawValidation, ServerConfig};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Deserialize)]
struct RawToml {
    toml: String,
}

#[derive(Serialize)]
struct RawTomlBody<'a> {
    toml_content: &'a str,
}

#[derive(Deserialize)]
struct ClientTypes {
    #[serde(default)]
    types: Vec<String>,
}

/// [`LibraryApi`] over HTTP with `reqwest`.
#[derive(Clone, Debug)]
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("fastlib/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, format!("{}{}", self.base_url, path))
    }

    /// Send and decode. Non-2xx responses become [`ApiError::Status`] with
    /// the body's `detail` when it has one.
    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder, label: &str) -> Result<T, ApiError> {
        let resp = req.send().await.map_err(|e| {
            tracing::warn!(request = label, error = %e, "request failed");
            ApiError::Http(e)
        })?;
        let status = resp.status();
        tracing::debug!(request = label, status = status.as_u16(), "response");

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let err = ApiError::from_status_body(status.as_u16(), &body);
            tracing::warn!(request = label, error = %err, "server rejected request");
            return Err(err);
        }

        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            tracing::warn!(request = label, error = %e, "undecodable response body");
            ApiError::Decode(e)
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(self.request(Method::GET, path), &format!("GET {path}"))
            .await
    }

    async fn with_body<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let label = format!("{method} {path}");
        self.send(self.request(method, path).json(body), &label).await
    }
}

fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

impl LibraryApi for HttpApi {
    fn list_authors(&self) -> ApiFuture<'_, Vec<Author>> {
        Box::pin(self.get("/authors"))
    }

    fn get_author<'a>(&'a self, id: &'a str) -> ApiFuture<'a, Author> {
        Box::pin(async move { self.get(&format!("/authors/{}", segment(id))).await })
    }

    fn create_author<'a>(&'a self, author: &'a NewAuthor) -> ApiFuture<'a, Author> {
        Box::pin(self.with_body(Method::POST, "/authors", author))
    }

    fn refresh_author_books<'a>(&'a self, id: &'a str) -> ApiFuture<'a, Author> {
        Box::pin(async move {
            let path = format!("/authors/update_single_author_books/{}", segment(id));
            let label = format!("POST {path}");
            self.send(self.request(Method::POST, &path), &label).await
        })
    }

    fn find_authors<'a>(&'a self, name: &'a str) -> ApiFuture<'a, Vec<FoundAuthor>> {
        Box::pin(async move {
            let req = self
                .request(Method::GET, "/authors/find_authors")
                .query(&[("name", name)]);
            self.send(req, "GET /authors/find_authors").await
        })
    }

    fn list_books(&self) -> ApiFuture<'_, Vec<Book>> {
        Box::pin(self.get("/books"))
    }

    fn get_book<'a>(&'a self, id: &'a str) -> ApiFuture<'a, Book> {
        Box::pin(async move { self.get(&format!("/books/{}", segment(id))).await })
    }

    fn create_book<'a>(&'a self, book: &'a NewBook) -> ApiFuture<'a, Book> {
        Box::pin(self.with_body(Method::POST, "/books", book))
    }

    fn patch_book_status<'a>(&'a self, id: &'a str, patch: &'a StatusPatch) -> ApiFuture<'a, Book> {
        Box::pin(async move {
            self.with_body(Method::PATCH, &format!("/books/{}", segment(id)), patch)
                .await
        })
    }

    fn list_series(&self) -> ApiFuture<'_, Vec<Series>> {
        Box::pin(self.get("/series"))
    }

    fn create_series<'a>(&'a self, series: &'a NewSeries) -> ApiFuture<'a, Series> {
        Box::pin(self.with_body(Method::POST, "/series", series))
    }

    fn get_config(&self) -> ApiFuture<'_, ServerConfig> {
        Box::pin(self.get("/config"))
    }

    fn put_config<'a>(&'a self, config: &'a ServerConfig) -> ApiFuture<'a, String> {
        Box::pin(async move {
            let ack: ApiMessage = self.with_body(Method::PUT, "/config", config).await?;
            Ok(ack.message)
        })
    }

    fn config_health(&self) -> ApiFuture<'_, ConfigHealth> {
        Box::pin(self.get("/config/health"))
    }

    fn get_raw_config(&self) -> ApiFuture<'_, String> {
        Box::pin(async move {
            let raw: RawToml = self.get("/config/raw").await?;
            Ok(raw.toml)
        })
    }

    fn put_raw_config<'a>(&'a self, toml: &'a str) -> ApiFuture<'a, String> {
        Box::pin(async move {
            let body = RawTomlBody { toml_content: toml };
            let ack: ApiMessage = self.with_body(Method::PUT, "/config/raw", &body).await?;
            Ok(ack.message)
        })
    }

    fn validate_raw_config<'a>(&'a self, toml: &'a str) -> ApiFuture<'a, RawValidation> {
        Box::pin(async move {
            let body = RawTomlBody { toml_content: toml };
            self.with_body(Method::POST, "/config/validate", &body).await
        })
    }

    fn reload_config(&self) -> ApiFuture<'_, String> {
        Box::pin(async move {
            let ack: ApiMessage = self
                .send(self.request(Method::POST, "/config/reload"), "POST /config/reload")
                .await?;
            Ok(ack.message)
        })
    }

    fn download_client_types(&self) -> ApiFuture<'_, Vec<String>> {
        Box::pin(async move {
            let types: ClientTypes = self.get("/config/download-client-types").await?;
            Ok(types.types)
        })
    }
}
