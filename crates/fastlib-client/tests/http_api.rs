//! `HttpApi` against an in-process stub of the library server.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use fastlib_client::model::{NewAuthor, StatusPatch};
use fastlib_client::{ApiError, BookStatus, HttpApi, LibraryApi, Medium, ServerConfig};
use serde_json::{Value, json};

/// Requests the stub received: `(method + path, body)`.
type Seen = Arc<Mutex<Vec<(String, Value)>>>;

type Reply = Result<Json<Value>, (StatusCode, Json<Value>)>;

fn detail(status: StatusCode, msg: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "detail": msg })))
}

async fn list_books() -> Json<Value> {
    Json(json!([
        {"id": 1, "title": "The Hobbit", "series": {"id": "1", "name": "Middle-earth"},
         "authors": [{"id": 9, "name": "Tolkien"}], "status": "Wanted"},
        {"id": "2", "title": "Loose", "series": null, "authors": null}
    ]))
}

async fn get_book(Path(id): Path<String>) -> Reply {
    match id.as_str() {
        "42" => Err(detail(StatusCode::NOT_FOUND, "Book not found")),
        "garbage" => Ok(Json(json!({"no_id": true}))),
        _ => Ok(Json(json!({"id": id, "title": "Found"}))),
    }
}

async fn patch_book(State(seen): State<Seen>, Path(id): Path<String>, Json(body): Json<Value>) -> Json<Value> {
    seen.lock().unwrap().push((format!("PATCH /books/{id}"), body.clone()));
    let mut book = json!({"id": id, "title": "Patched"});
    if let (Some(obj), Some(patch)) = (book.as_object_mut(), body.as_object()) {
        obj.extend(patch.clone());
    }
    Json(book)
}

async fn find_authors(State(seen): State<Seen>, Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let name = params.get("name").cloned().unwrap_or_default();
    seen.lock()
        .unwrap()
        .push(("GET /authors/find_authors".to_string(), json!(name)));
    if name == "Tolkien" {
        Json(json!([]))
    } else {
        Json(json!([{"id": null, "name": name, "bio": null,
                     "external_refs": {"hardcover_id": 5}, "in_db": false}]))
    }
}

async fn create_author(State(seen): State<Seen>, Json(body): Json<Value>) -> Reply {
    seen.lock().unwrap().push(("POST /authors".to_string(), body.clone()));
    if body["name"] == "Nobody" {
        return Err(detail(StatusCode::NOT_FOUND, "Author not found on Hardcover"));
    }
    Ok(Json(json!({"id": 77, "name": body["name"], "books": []})))
}

async fn refresh_books(Path(id): Path<String>) -> Json<Value> {
    Json(json!({"id": id, "name": "A", "books": [{"id": 3, "title": "New"}]}))
}

async fn get_config() -> Json<Value> {
    Json(json!({
        "app_name": "FastLibrarian",
        "environment": "development",
        "database": {"host": "localhost", "port": 5432, "url": "post***"},
        "api": {"cors_origins": ["*"]},
        "download_clients": [{"client_type": "aria2", "client_ip": "10.0.0.1"}]
    }))
}

async fn put_config(State(seen): State<Seen>, Json(body): Json<Value>) -> Reply {
    seen.lock().unwrap().push(("PUT /config".to_string(), body.clone()));
    if body["api"]["port"] == json!(0) {
        return Err(detail(StatusCode::BAD_REQUEST, "Invalid configuration: port"));
    }
    Ok(Json(json!({"message": "Configuration updated successfully"})))
}

async fn get_raw() -> Json<Value> {
    Json(json!({"toml": "[api]\nport = 8000\n"}))
}

async fn put_raw(State(seen): State<Seen>, Json(body): Json<Value>) -> Json<Value> {
    seen.lock().unwrap().push(("PUT /config/raw".to_string(), body));
    Json(json!({"message": "Configuration updated from TOML string successfully"}))
}

async fn validate(Json(body): Json<Value>) -> Json<Value> {
    let ok = body["toml_content"].as_str().is_some_and(|t| !t.contains("[[["));
    Json(json!({
        "valid": ok, "toml_valid": ok, "config_valid": ok,
        "errors": if ok { json!([]) } else { json!(["TOML syntax error: bad table"]) }
    }))
}

async fn health() -> Json<Value> {
    Json(json!({"status": "healthy", "environment": "development", "version": "1.0.0",
                "database_configured": true, "external_apis_configured": false,
                "toml_parser": "rtoml", "config_file_exists": true}))
}

async fn reload() -> Json<Value> {
    Json(json!({"message": "Configuration reloaded successfully"}))
}

async fn client_types() -> Json<Value> {
    Json(json!({"types": ["qbittorrent", "aria2"]}))
}

async fn spawn_stub() -> (HttpApi, Seen) {
    let seen: Seen = Arc::default();
    let app = Router::new()
        .route("/books", get(list_books))
        .route("/books/{id}", get(get_book).patch(patch_book))
        .route("/authors", post(create_author))
        .route("/authors/find_authors", get(find_authors))
        .route("/authors/update_single_author_books/{id}", post(refresh_books))
        .route("/config", get(get_config).put(put_config))
        .route("/config/raw", get(get_raw).put(put_raw))
        .route("/config/validate", post(validate))
        .route("/config/health", get(health))
        .route("/config/reload", post(reload))
        .route("/config/download-client-types", get(client_types))
        .with_state(seen.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let api = HttpApi::new(format!("http://{addr}/"), Duration::from_secs(5)).unwrap();
    (api, seen)
}

#[tokio::test]
async fn list_books_normalizes_relations() {
    let (api, _) = spawn_stub().await;
    let books = api.list_books().await.unwrap();
    assert_eq!(books.len(), 2);
    assert_eq!(books[0].id, "1");
    assert_eq!(books[0].series.len(), 1);
    assert_eq!(books[0].series[0].name, "Middle-earth");
    assert_eq!(books[0].author_names().as_deref(), Some("Tolkien"));
    assert!(books[1].series.is_empty());
    assert!(books[1].authors.is_empty());
}

#[tokio::test]
async fn missing_book_maps_to_not_found() {
    let (api, _) = spawn_stub().await;
    let err = api.get_book("42").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.user_message(), "Book not found");
}

#[tokio::test]
async fn malformed_record_is_a_decode_error() {
    let (api, _) = spawn_stub().await;
    let err = api.get_book("garbage").await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn status_patch_sends_only_one_field() {
    let (api, seen) = spawn_stub().await;
    let patch = StatusPatch {
        medium: Medium::Physical,
        status: BookStatus::Have,
    };
    let book = api.patch_book_status("7", &patch).await.unwrap();
    assert_eq!(book.p_status, Some(BookStatus::Have));

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, "PATCH /books/7");
    assert_eq!(seen[0].1, json!({"p_status": "Have"}));
}

#[tokio::test]
async fn find_authors_passes_name_query() {
    let (api, seen) = spawn_stub().await;
    assert!(api.find_authors("Tolkien").await.unwrap().is_empty());

    let hits = api.find_authors("Ursula K. Le Guin").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, None);
    assert!(!hits[0].in_db);
    assert_eq!(seen.lock().unwrap()[1].1, json!("Ursula K. Le Guin"));
}

#[tokio::test]
async fn create_author_surfaces_detail() {
    let (api, seen) = spawn_stub().await;
    let created = api
        .create_author(&NewAuthor {
            name: "Terry Pratchett".into(),
            bio: None,
        })
        .await
        .unwrap();
    assert_eq!(created.id, "77");
    assert_eq!(seen.lock().unwrap()[0].1, json!({"name": "Terry Pratchett"}));

    let err = api
        .create_author(&NewAuthor {
            name: "Nobody".into(),
            bio: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Author not found on Hardcover");
}

#[tokio::test]
async fn refresh_author_books_returns_author() {
    let (api, _) = spawn_stub().await;
    let author = api.refresh_author_books("5").await.unwrap();
    assert_eq!(author.id, "5");
    assert_eq!(author.books[0].title, "New");
}

#[tokio::test]
async fn config_put_echoes_unknown_fields() {
    let (api, seen) = spawn_stub().await;
    let mut config: ServerConfig = api.get_config().await.unwrap();
    assert_eq!(config.download_clients[0].client_port, 8080);
    config.api.debug = true;

    let msg = api.put_config(&config).await.unwrap();
    assert_eq!(msg, "Configuration updated successfully");

    let seen = seen.lock().unwrap();
    let body = &seen[0].1;
    assert_eq!(body["app_name"], json!("FastLibrarian"));
    assert_eq!(body["database"]["url"], json!("post***"));
    assert_eq!(body["api"]["debug"], json!(true));
}

#[tokio::test]
async fn config_put_rejection_carries_detail() {
    let (api, _) = spawn_stub().await;
    let mut config = ServerConfig::default();
    config.api.port = 0;
    let err = api.put_config(&config).await.unwrap_err();
    assert_eq!(err.user_message(), "Invalid configuration: port");
}

#[tokio::test]
async fn raw_config_round_trip_uses_toml_keys() {
    let (api, seen) = spawn_stub().await;
    let text = api.get_raw_config().await.unwrap();
    assert!(text.starts_with("[api]"));

    api.put_raw_config("[api]\nport = 9000\n").await.unwrap();
    assert_eq!(
        seen.lock().unwrap()[0].1,
        json!({"toml_content": "[api]\nport = 9000\n"})
    );

    let report = api.validate_raw_config("[[[").await.unwrap();
    assert!(!report.valid);
    assert_eq!(report.errors, vec!["TOML syntax error: bad table"]);
}

#[tokio::test]
async fn health_reload_and_client_types() {
    let (api, _) = spawn_stub().await;
    let health = api.config_health().await.unwrap();
    assert_eq!(health.badge(), "HEALTHY - development v1.0.0");
    assert_eq!(
        api.reload_config().await.unwrap(),
        "Configuration reloaded successfully"
    );
    assert_eq!(
        api.download_client_types().await.unwrap(),
        vec!["qbittorrent", "aria2"]
    );
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = HttpApi::new(format!("http://{addr}"), Duration::from_secs(2)).unwrap();
    let err = api.list_books().await.unwrap_err();
    assert!(matches!(err, ApiError::Http(_)));
}
