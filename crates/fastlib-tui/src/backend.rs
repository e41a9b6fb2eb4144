use std::sync::Arc;

use fastlib_client::LibraryApi;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::tui_event::{ApiCommand, ApiEvent, ApiRequest, ApiResponse};

/// Run one request to completion.
pub async fn execute(api: &dyn LibraryApi, request: ApiRequest) -> ApiResponse {
    match request {
        ApiRequest::ListAuthors => ApiResponse::Authors(api.list_authors().await),
        ApiRequest::GetAuthor(id) => ApiResponse::Author(api.get_author(&id).await),
        ApiRequest::CreateAuthor(author) => {
            ApiResponse::AuthorCreated(api.create_author(&author).await)
        }
        ApiRequest::RefreshAuthorBooks(id) => {
            let result = api.refresh_author_books(&id).await;
            ApiResponse::AuthorBooksRefreshed { id, result }
        }
        ApiRequest::FindAuthors(name) => ApiResponse::FoundAuthors(api.find_authors(&name).await),
        ApiRequest::ListBooks => ApiResponse::Books(api.list_books().await),
        ApiRequest::GetBook(id) => ApiResponse::Book(api.get_book(&id).await),
        ApiRequest::CreateBook(book) => ApiResponse::BookCreated(api.create_book(&book).await),
        ApiRequest::UpdateStatus { origin, change } => {
            let result = api.patch_book_status(&change.book_id, &change.patch).await;
            ApiResponse::StatusUpdated {
                origin,
                change,
                result,
            }
        }
        ApiRequest::ListSeries => ApiResponse::Series(api.list_series().await),
        ApiRequest::CreateSeries(series) => {
            ApiResponse::SeriesCreated(api.create_series(&series).await)
        }
        ApiRequest::GetConfig => ApiResponse::Config(api.get_config().await),
        ApiRequest::PutConfig(config) => ApiResponse::ConfigSaved(api.put_config(&config).await),
        ApiRequest::ConfigHealth => ApiResponse::Health(api.config_health().await),
        ApiRequest::GetRawConfig => ApiResponse::RawConfig(api.get_raw_config().await),
        ApiRequest::PutRawConfig(text) => {
            ApiResponse::RawConfigSaved(api.put_raw_config(&text).await)
        }
        ApiRequest::ValidateRawConfig(text) => {
            ApiResponse::RawValidated(api.validate_raw_config(&text).await)
        }
        ApiRequest::ReloadConfig => ApiResponse::ConfigReloaded(api.reload_config().await),
        ApiRequest::DownloadClientTypes => {
            ApiResponse::ClientTypes(api.download_client_types().await)
        }
    }
}

/// Run one command, reporting the result unless its token was cancelled first.
pub async fn run_command(
    api: Arc<dyn LibraryApi>,
    cmd: ApiCommand,
    event_tx: mpsc::UnboundedSender<ApiEvent>,
) {
    let ApiCommand {
        generation,
        cancel,
        request,
    } = cmd;
    let label = request.label();

    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            tracing::debug!(request = label, generation = generation.value(), "request cancelled");
        }
        response = execute(api.as_ref(), request) => {
            if cancel.is_cancelled() {
                tracing::debug!(request = label, generation = generation.value(), "dropping result of cancelled request");
                return;
            }
            let _ = event_tx.send(ApiEvent { generation, response });
        }
    }
}

/// Backend command listener: every command runs as its own task so a slow
/// request never holds up the others.
pub async fn run(
    api: Arc<dyn LibraryApi>,
    mut cmd_rx: mpsc::UnboundedReceiver<ApiCommand>,
    event_tx: mpsc::UnboundedSender<ApiEvent>,
    shutdown: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            cmd = cmd_rx.recv() => {
                let Some(cmd) = cmd else { break };
                tracing::debug!(request = cmd.request.label(), generation = cmd.generation.value(), "dispatching");
                tokio::spawn(run_command(api.clone(), cmd, event_tx.clone()));
            }
        }
    }
    tracing::debug!("backend listener stopped");
}
