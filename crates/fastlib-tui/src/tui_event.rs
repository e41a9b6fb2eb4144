use fastlib_client::model::{NewAuthor, NewBook, NewSeries};
use fastlib_client::server_config::RawValidation;
use fastlib_client::{
    ApiError, Author, Book, ConfigHealth, FoundAuthor, Generation, Series, ServerConfig,
    StatusChange,
};
use tokio_util::sync::CancellationToken;

/// Which list owns the status board a change was made from; decides what
/// gets re-fetched once the update lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusOrigin {
    Books,
    Author(String),
    Book(String),
}

/// A request for the backend to run against the library API.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiRequest {
    ListAuthors,
    GetAuthor(String),
    CreateAuthor(NewAuthor),
    RefreshAuthorBooks(String),
    FindAuthors(String),
    ListBooks,
    GetBook(String),
    CreateBook(NewBook),
    UpdateStatus {
        origin: StatusOrigin,
        change: StatusChange,
    },
    ListSeries,
    CreateSeries(NewSeries),
    GetConfig,
    PutConfig(Box<ServerConfig>),
    ConfigHealth,
    GetRawConfig,
    PutRawConfig(String),
    ValidateRawConfig(String),
    ReloadConfig,
    DownloadClientTypes,
}

impl ApiRequest {
    /// Short name for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ListAuthors => "list_authors",
            Self::GetAuthor(_) => "get_author",
            Self::CreateAuthor(_) => "create_author",
            Self::RefreshAuthorBooks(_) => "refresh_author_books",
            Self::FindAuthors(_) => "find_authors",
            Self::ListBooks => "list_books",
            Self::GetBook(_) => "get_book",
            Self::CreateBook(_) => "create_book",
            Self::UpdateStatus { .. } => "update_status",
            Self::ListSeries => "list_series",
            Self::CreateSeries(_) => "create_series",
            Self::GetConfig => "get_config",
            Self::PutConfig(_) => "put_config",
            Self::ConfigHealth => "config_health",
            Self::GetRawConfig => "get_raw_config",
            Self::PutRawConfig(_) => "put_raw_config",
            Self::ValidateRawConfig(_) => "validate_raw_config",
            Self::ReloadConfig => "reload_config",
            Self::DownloadClientTypes => "download_client_types",
        }
    }
}

/// Command sent from the TUI to the backend.
///
/// `cancel` is the token of the screen mount that issued the request (or
/// the session token for writes). Once it is cancelled the backend drops
/// the request and never reports back.
#[derive(Debug, Clone)]
pub struct ApiCommand {
    pub generation: Generation,
    pub cancel: CancellationToken,
    pub request: ApiRequest,
}

/// Outcome of one [`ApiRequest`], tagged with the generation it was issued under.
#[derive(Debug)]
pub struct ApiEvent {
    pub generation: Generation,
    pub response: ApiResponse,
}

#[derive(Debug)]
pub enum ApiResponse {
    Authors(Result<Vec<Author>, ApiError>),
    Author(Result<Author, ApiError>),
    AuthorCreated(Result<Author, ApiError>),
    AuthorBooksRefreshed {
        id: String,
        result: Result<Author, ApiError>,
    },
    FoundAuthors(Result<Vec<FoundAuthor>, ApiError>),
    Books(Result<Vec<Book>, ApiError>),
    Book(Result<Book, ApiError>),
    BookCreated(Result<Book, ApiError>),
    StatusUpdated {
        origin: StatusOrigin,
        change: StatusChange,
        result: Result<Book, ApiError>,
    },
    Series(Result<Vec<Series>, ApiError>),
    SeriesCreated(Result<Series, ApiError>),
    Config(Result<ServerConfig, ApiError>),
    ConfigSaved(Result<String, ApiError>),
    Health(Result<ConfigHealth, ApiError>),
    RawConfig(Result<String, ApiError>),
    RawConfigSaved(Result<String, ApiError>),
    RawValidated(Result<RawValidation, ApiError>),
    ConfigReloaded(Result<String, ApiError>),
    ClientTypes(Result<Vec<String>, ApiError>),
}
