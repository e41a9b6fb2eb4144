use fastlib_client::{
    ApiError, Author, Book, BookStatus, ConfigHealth, ConfigSection, FetchState, FoundAuthor,
    Medium, ServerConfig,
};
use serde_json::json;
use tokio::sync::mpsc;

use super::*;
use crate::action::Action;
use crate::model::config::{ConfigRow, PendingExit};
use crate::model::library::AuthorsFocus;
use crate::tui_event::{ApiEvent, ApiResponse, StatusOrigin};

/// Create an App wired to a channel instead of a backend.
fn test_app() -> (App, mpsc::UnboundedReceiver<ApiCommand>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let mut app = App::new(Theme::hacker(), "http://localhost:8000".into());
    app.api_tx = Some(tx);
    (app, rx)
}

fn drain(rx: &mut mpsc::UnboundedReceiver<ApiCommand>) -> Vec<ApiCommand> {
    let mut cmds = Vec::new();
    while let Ok(cmd) = rx.try_recv() {
        cmds.push(cmd);
    }
    cmds
}

fn requests(rx: &mut mpsc::UnboundedReceiver<ApiCommand>) -> Vec<ApiRequest> {
    drain(rx).into_iter().map(|c| c.request).collect()
}

/// The single command matching `pred`; panics otherwise.
fn take_one(
    rx: &mut mpsc::UnboundedReceiver<ApiCommand>,
    pred: impl Fn(&ApiRequest) -> bool,
) -> ApiCommand {
    let mut matching: Vec<_> = drain(rx).into_iter().filter(|c| pred(&c.request)).collect();
    assert_eq!(matching.len(), 1, "expected exactly one matching command");
    matching.remove(0)
}

fn book(id: &str, title: &str) -> Book {
    serde_json::from_value(json!({"id": id, "title": title})).unwrap()
}

fn not_found(detail: &str) -> ApiError {
    ApiError::Status {
        status: 404,
        detail: Some(detail.into()),
    }
}

fn respond(app: &mut App, cmd: &ApiCommand, response: ApiResponse) {
    app.handle_api_event(ApiEvent {
        generation: cmd.generation,
        response,
    });
}

/// Navigate to Books and load `books`.
fn books_screen(books: Vec<Book>) -> (App, mpsc::UnboundedReceiver<ApiCommand>) {
    let (mut app, mut rx) = test_app();
    app.update(Action::GoBooks);
    let cmd = take_one(&mut rx, |r| *r == ApiRequest::ListBooks);
    respond(&mut app, &cmd, ApiResponse::Books(Ok(books)));
    (app, rx)
}

fn config_screen() -> (App, mpsc::UnboundedReceiver<ApiCommand>) {
    let (mut app, mut rx) = test_app();
    app.update(Action::OpenConfig);
    let cmd = take_one(&mut rx, |r| *r == ApiRequest::GetConfig);
    respond(&mut app, &cmd, ApiResponse::Config(Ok(ServerConfig::default())));
    (app, rx)
}

fn cursor_on(app: &mut App, key: &str) {
    app.config.item_cursor = app
        .config
        .rows()
        .iter()
        .position(|r| matches!(r, ConfigRow::Field { key: k, .. } if k == key))
        .unwrap();
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        app.update(Action::InputChar(c));
    }
}

// ── mounting and generations ───────────────────────────────────

#[test]
fn mounting_list_screens_issues_one_get() {
    let (mut app, mut rx) = test_app();
    app.update(Action::GoAuthors);
    assert_eq!(requests(&mut rx), vec![ApiRequest::ListAuthors]);
    assert!(app.authors.list.is_loading());

    app.update(Action::GoSeries);
    assert_eq!(requests(&mut rx), vec![ApiRequest::ListSeries]);
    assert_eq!(app.screen, Screen::Series);
}

#[test]
fn stale_list_response_is_discarded() {
    let (mut app, mut rx) = test_app();
    app.update(Action::GoBooks);
    let first = take_one(&mut rx, |r| *r == ApiRequest::ListBooks);
    app.update(Action::Retry);
    let second = take_one(&mut rx, |r| *r == ApiRequest::ListBooks);

    respond(&mut app, &second, ApiResponse::Books(Ok(vec![book("2", "New")])));
    respond(&mut app, &first, ApiResponse::Books(Ok(vec![book("1", "Old")])));

    assert_eq!(app.books.books()[0].title, "New");
}

#[test]
fn leaving_a_screen_cancels_its_requests() {
    let (mut app, mut rx) = test_app();
    app.update(Action::GoAuthors);
    let cmd = take_one(&mut rx, |r| *r == ApiRequest::ListAuthors);
    assert!(!cmd.cancel.is_cancelled());

    app.update(Action::GoBooks);
    assert!(cmd.cancel.is_cancelled());

    // A late reply for the old mount changes nothing.
    respond(&mut app, &cmd, ApiResponse::Authors(Ok(vec![])));
    assert_eq!(app.authors.list.state(), &FetchState::Idle);
}

#[test]
fn esc_returns_to_previous_screen() {
    let (mut app, mut rx) = test_app();
    app.update(Action::GoBooks);
    app.update(Action::GoSeries);
    app.update(Action::NavigateBack);
    assert_eq!(app.screen, Screen::Books);
    app.update(Action::NavigateBack);
    assert_eq!(app.screen, Screen::Home);
    drain(&mut rx);
}

// ── detail screens ─────────────────────────────────────────────

#[test]
fn missing_book_shows_not_found_until_retry() {
    let (mut app, mut rx) = books_screen(vec![book("42", "Ghost")]);
    app.update(Action::DrillIn);
    assert_eq!(app.screen, Screen::Book("42".into()));
    let cmd = take_one(&mut rx, |r| *r == ApiRequest::GetBook("42".into()));

    respond(&mut app, &cmd, ApiResponse::Book(Err(not_found("Book not found"))));
    let detail = app.book.as_ref().unwrap();
    assert_eq!(detail.record.state(), &FetchState::NotFound);

    app.update(Action::Tick);
    assert!(requests(&mut rx).is_empty());

    app.update(Action::Retry);
    assert_eq!(requests(&mut rx), vec![ApiRequest::GetBook("42".into())]);
}

#[test]
fn refresh_author_books_is_guarded_and_replaces_record() {
    let (mut app, mut rx) = test_app();
    app.navigate(Screen::Author("5".into()));
    let cmd = take_one(&mut rx, |r| *r == ApiRequest::GetAuthor("5".into()));
    let author: Author = serde_json::from_value(json!({"id": "5", "name": "Le Guin"})).unwrap();
    respond(&mut app, &cmd, ApiResponse::Author(Ok(author.clone())));

    app.update(Action::RefreshAuthorBooks);
    app.update(Action::RefreshAuthorBooks);
    let cmd = take_one(&mut rx, |r| matches!(r, ApiRequest::RefreshAuthorBooks(_)));

    let mut updated = author;
    updated.books = vec![book("9", "Earthsea")];
    respond(
        &mut app,
        &cmd,
        ApiResponse::AuthorBooksRefreshed {
            id: "5".into(),
            result: Ok(updated),
        },
    );
    let detail = app.author.as_ref().unwrap();
    assert!(!detail.updating);
    assert_eq!(detail.books()[0].title, "Earthsea");
}

// ── status dropdown ────────────────────────────────────────────

#[test]
fn selecting_a_status_sends_one_single_field_patch() {
    let (mut app, mut rx) = books_screen(vec![book("1", "Dune"), book("2", "Emma")]);
    app.update(Action::OpenDropdown(Medium::Audio));
    assert!(app.books.board.is_open("1", Medium::Audio));

    app.update(Action::MoveDown); // Wanted -> Have
    app.update(Action::DrillIn);

    let cmds = requests(&mut rx);
    assert_eq!(cmds.len(), 1);
    match &cmds[0] {
        ApiRequest::UpdateStatus { origin, change } => {
            assert_eq!(*origin, StatusOrigin::Books);
            assert_eq!(change.book_id, "1");
            assert_eq!(change.patch.medium, Medium::Audio);
            assert_eq!(change.patch.status, BookStatus::Have);
        }
        other => panic!("unexpected request: {other:?}"),
    }
    assert!(app.books.board.active().is_none());
}

#[test]
fn one_dropdown_open_across_the_list() {
    let (mut app, _rx) = books_screen(vec![book("1", "Dune"), book("2", "Emma")]);
    app.update(Action::OpenDropdown(Medium::Ebook));
    app.update(Action::OpenDropdown(Medium::Physical));
    assert!(!app.books.board.is_open("1", Medium::Ebook));
    assert!(app.books.board.is_open("1", Medium::Physical));

    app.update(Action::NavigateBack);
    app.update(Action::MoveDown);
    app.update(Action::OpenDropdown(Medium::Ebook));
    assert!(app.books.board.is_open("2", Medium::Ebook));
    assert!(!app.books.board.is_open("1", Medium::Physical));
    // Esc closed the dropdown without leaving the screen.
    assert_eq!(app.screen, Screen::Books);
}

#[test]
fn successful_status_update_refetches_the_list() {
    let (mut app, mut rx) = books_screen(vec![book("1", "Dune")]);
    app.update(Action::OpenDropdown(Medium::Ebook));
    app.update(Action::DrillIn);
    let cmd = take_one(&mut rx, |r| matches!(r, ApiRequest::UpdateStatus { .. }));
    let ApiRequest::UpdateStatus { origin, change } = cmd.request.clone() else {
        unreachable!()
    };

    let mut patched = book("1", "Dune");
    patched.status = Some(BookStatus::Wanted);
    respond(
        &mut app,
        &cmd,
        ApiResponse::StatusUpdated {
            origin,
            change,
            result: Ok(patched),
        },
    );

    assert_eq!(requests(&mut rx), vec![ApiRequest::ListBooks]);
    // Rows stay visible while the reconcile fetch runs.
    assert_eq!(app.books.books().len(), 1);
}

#[test]
fn failed_status_update_is_surfaced_without_refetch() {
    let (mut app, mut rx) = books_screen(vec![book("1", "Dune")]);
    app.update(Action::OpenDropdown(Medium::Physical));
    app.update(Action::DrillIn);
    let cmd = take_one(&mut rx, |r| matches!(r, ApiRequest::UpdateStatus { .. }));
    let ApiRequest::UpdateStatus { origin, change } = cmd.request.clone() else {
        unreachable!()
    };

    respond(
        &mut app,
        &cmd,
        ApiResponse::StatusUpdated {
            origin,
            change,
            result: Err(ApiError::Other("connection refused".into())),
        },
    );

    assert!(requests(&mut rx).is_empty());
    assert_eq!(
        app.books.board.failure("1", Medium::Physical),
        Some("connection refused")
    );
    assert_eq!(app.books.books()[0].p_status, None);
    let entry = app.activity.recent().next().unwrap();
    assert!(entry.message.contains("Physical"));
    assert!(entry.message.contains("Dune"));
}

#[test]
fn later_failed_status_survives_earlier_success() {
    let (mut app, mut rx) = books_screen(vec![book("1", "Dune")]);
    app.update(Action::OpenDropdown(Medium::Ebook));
    app.update(Action::DrillIn); // Wanted
    let first = take_one(&mut rx, |r| matches!(r, ApiRequest::UpdateStatus { .. }));
    app.update(Action::OpenDropdown(Medium::Ebook));
    app.update(Action::MoveDown);
    app.update(Action::DrillIn); // Have
    let second = take_one(&mut rx, |r| matches!(r, ApiRequest::UpdateStatus { .. }));

    let ApiRequest::UpdateStatus {
        origin,
        change: wanted,
    } = first.request.clone()
    else {
        unreachable!()
    };
    let ApiRequest::UpdateStatus { change: have, .. } = second.request.clone() else {
        unreachable!()
    };
    assert_eq!(have.patch.status, BookStatus::Have);

    respond(
        &mut app,
        &second,
        ApiResponse::StatusUpdated {
            origin: origin.clone(),
            change: have,
            result: Err(ApiError::Other("db down".into())),
        },
    );
    respond(
        &mut app,
        &first,
        ApiResponse::StatusUpdated {
            origin,
            change: wanted,
            result: Ok(book("1", "Dune")),
        },
    );

    assert_eq!(app.books.board.failure("1", Medium::Ebook), Some("db down"));
    // The superseded success does not trigger a reconcile fetch either.
    assert!(requests(&mut rx).is_empty());
}

#[test]
fn status_writes_outlive_navigation() {
    let (mut app, mut rx) = books_screen(vec![book("1", "Dune")]);
    app.update(Action::OpenDropdown(Medium::Ebook));
    app.update(Action::DrillIn);
    let cmd = take_one(&mut rx, |r| matches!(r, ApiRequest::UpdateStatus { .. }));

    app.update(Action::GoAuthors);
    assert!(!cmd.cancel.is_cancelled());
}

// ── authors search and create ──────────────────────────────────

#[test]
fn empty_search_shows_notice() {
    let (mut app, mut rx) = test_app();
    app.update(Action::GoAuthors);
    drain(&mut rx);

    app.update(Action::StartSearch);
    assert_eq!(app.input_mode, InputMode::TextInput);
    type_text(&mut app, "Tolkien");
    app.update(Action::InputConfirm);

    let cmd = take_one(&mut rx, |r| matches!(r, ApiRequest::FindAuthors(_)));
    assert_eq!(cmd.request, ApiRequest::FindAuthors("Tolkien".into()));
    respond(&mut app, &cmd, ApiResponse::FoundAuthors(Ok(vec![])));

    assert!(app.authors.search.shows_empty_notice());
    assert_eq!(app.authors.focus, AuthorsFocus::List);
}

#[test]
fn search_is_not_resubmitted_while_pending() {
    let (mut app, mut rx) = test_app();
    app.update(Action::GoAuthors);
    for _ in 0..2 {
        app.update(Action::StartSearch);
        type_text(&mut app, "x");
        app.update(Action::InputConfirm);
    }
    let searches = requests(&mut rx)
        .into_iter()
        .filter(|r| matches!(r, ApiRequest::FindAuthors(_)))
        .count();
    assert_eq!(searches, 1);
}

#[test]
fn rejected_search_keeps_the_pending_query() {
    let (mut app, mut rx) = test_app();
    app.update(Action::GoAuthors);
    app.update(Action::StartSearch);
    type_text(&mut app, "Tolkien");
    app.update(Action::InputConfirm);
    let cmd = take_one(&mut rx, |r| matches!(r, ApiRequest::FindAuthors(_)));

    app.update(Action::StartSearch);
    for _ in 0.."Tolkien".len() {
        app.update(Action::InputBackspace);
    }
    type_text(&mut app, "Pratchett");
    app.update(Action::InputConfirm);
    assert!(requests(&mut rx).is_empty());
    assert_eq!(app.authors.search.query(), "Tolkien");

    respond(&mut app, &cmd, ApiResponse::FoundAuthors(Ok(vec![])));
    assert!(app.authors.search.shows_empty_notice());
    assert_eq!(app.authors.search.query(), "Tolkien");
}

#[test]
fn external_search_hit_is_created() {
    let (mut app, mut rx) = test_app();
    app.update(Action::GoAuthors);
    app.update(Action::StartSearch);
    type_text(&mut app, "Pratchett");
    app.update(Action::InputConfirm);
    let cmd = take_one(&mut rx, |r| matches!(r, ApiRequest::FindAuthors(_)));
    let hit: FoundAuthor = serde_json::from_value(
        json!({"id": null, "name": "Terry Pratchett", "in_db": false}),
    )
    .unwrap();
    respond(&mut app, &cmd, ApiResponse::FoundAuthors(Ok(vec![hit])));
    assert_eq!(app.authors.focus, AuthorsFocus::Results);

    app.update(Action::DrillIn);
    let cmd = take_one(&mut rx, |r| matches!(r, ApiRequest::CreateAuthor(_)));
    let ApiRequest::CreateAuthor(new) = &cmd.request else {
        unreachable!()
    };
    assert_eq!(new.name, "Terry Pratchett");
}

#[test]
fn create_is_ignored_while_in_flight() {
    let (mut app, mut rx) = books_screen(vec![]);
    for _ in 0..2 {
        app.update(Action::Create);
        type_text(&mut app, "Dune");
        app.update(Action::InputConfirm);
    }
    let cmd = take_one(&mut rx, |r| matches!(r, ApiRequest::CreateBook(_)));

    respond(
        &mut app,
        &cmd,
        ApiResponse::BookCreated(Err(ApiError::Status {
            status: 400,
            detail: Some("Title required".into()),
        })),
    );
    assert!(!app.books.creating);
    assert_eq!(app.books.create_error.as_deref(), Some("Title required"));
}

// ── config editor ──────────────────────────────────────────────

#[test]
fn config_mount_loads_config_health_and_client_types() {
    let (mut app, mut rx) = test_app();
    app.update(Action::OpenConfig);
    let reqs = requests(&mut rx);
    assert!(reqs.contains(&ApiRequest::GetConfig));
    assert!(reqs.contains(&ApiRequest::ConfigHealth));
    assert!(reqs.contains(&ApiRequest::DownloadClientTypes));
}

#[test]
fn toggle_save_and_double_save() {
    let (mut app, mut rx) = config_screen();
    drain(&mut rx);
    assert!(!app.config.editor.is_dirty());

    cursor_on(&mut app, "echo");
    app.update(Action::Toggle);
    assert!(app.config.editor.is_dirty());

    app.update(Action::SaveConfig);
    app.update(Action::SaveConfig);
    let cmd = take_one(&mut rx, |r| matches!(r, ApiRequest::PutConfig(_)));
    let ApiRequest::PutConfig(sent) = &cmd.request else {
        unreachable!()
    };
    assert!(!sent.database.echo);

    respond(&mut app, &cmd, ApiResponse::ConfigSaved(Ok("ok".into())));
    assert!(!app.config.editor.is_dirty());
    assert_eq!(requests(&mut rx), vec![ApiRequest::ConfigHealth]);
}

#[test]
fn failed_save_keeps_draft() {
    let (mut app, mut rx) = config_screen();
    cursor_on(&mut app, "echo");
    app.update(Action::Toggle);
    app.update(Action::SaveConfig);
    let cmd = take_one(&mut rx, |r| matches!(r, ApiRequest::PutConfig(_)));

    respond(
        &mut app,
        &cmd,
        ApiResponse::ConfigSaved(Err(ApiError::Status {
            status: 400,
            detail: Some("Invalid configuration: port".into()),
        })),
    );
    assert!(app.config.editor.is_dirty());
    assert_eq!(
        app.config.editor.last_error(),
        Some("Invalid configuration: port")
    );
}

#[test]
fn editing_a_number_field() {
    let (mut app, _rx) = config_screen();
    cursor_on(&mut app, "pool_size");
    app.update(Action::DrillIn);
    assert_eq!(app.input_mode, InputMode::TextInput);
    assert_eq!(app.config.edit_buffer, "10");

    app.update(Action::InputBackspace);
    app.update(Action::InputBackspace);
    type_text(&mut app, "abc");
    app.update(Action::InputConfirm);
    assert!(app.config.edit_error.is_some());
    assert!(app.config.editing.is_some());

    app.update(Action::InputBackspace);
    app.update(Action::InputBackspace);
    app.update(Action::InputBackspace);
    type_text(&mut app, "25");
    app.update(Action::InputConfirm);
    assert!(app.config.editing.is_none());
    assert_eq!(app.config.editor.working().unwrap().database.pool_size, 25);
}

#[test]
fn cors_origins_are_added_once() {
    let (mut app, _rx) = config_screen();
    app.update(Action::Tab); // API
    for _ in 0..2 {
        app.update(Action::Create);
        type_text(&mut app, "http://localhost:3000");
        app.update(Action::InputConfirm);
    }
    let origins = &app.config.editor.working().unwrap().api.cors_origins;
    assert_eq!(origins, &vec!["*".to_string(), "http://localhost:3000".to_string()]);
}

#[test]
fn download_clients_add_cycle_and_remove() {
    let (mut app, _rx) = config_screen();
    app.update(Action::Tab);
    app.update(Action::Tab);
    app.update(Action::Tab);
    app.update(Action::Tab);
    app.update(Action::Tab);
    assert_eq!(app.config.section, ConfigSection::DownloadClients);

    app.update(Action::Create);
    let clients = &app.config.editor.working().unwrap().download_clients;
    assert_eq!(clients.len(), 1);
    assert_eq!(clients[0].client_type, "qbittorrent");
    assert_eq!(clients[0].client_port, 8080);

    app.config.item_cursor = app
        .config
        .rows()
        .iter()
        .position(|r| matches!(r, ConfigRow::ClientField { key, .. } if key == "client_type"))
        .unwrap();
    app.update(Action::DrillIn);
    assert_eq!(
        app.config.editor.working().unwrap().download_clients[0].client_type,
        "aria2"
    );

    app.update(Action::Remove);
    assert!(app.config.editor.working().unwrap().download_clients.is_empty());
}

#[test]
fn leaving_dirty_config_asks_first() {
    let (mut app, mut rx) = config_screen();
    cursor_on(&mut app, "echo");
    app.update(Action::Toggle);

    app.update(Action::NavigateBack);
    assert_eq!(app.screen, Screen::Config);
    assert_eq!(app.config.confirm_exit, Some(PendingExit::Back));

    // Esc cancels the prompt.
    app.update(Action::NavigateBack);
    assert!(app.config.confirm_exit.is_none());
    assert_eq!(app.screen, Screen::Config);

    // n discards and leaves.
    app.update(Action::GoBooks);
    app.update(Action::Create);
    assert_eq!(app.screen, Screen::Books);
    assert!(!app.config.editor.is_dirty());
    assert!(
        !requests(&mut rx)
            .iter()
            .any(|r| matches!(r, ApiRequest::PutConfig(_)))
    );
}

#[test]
fn save_and_leave_keeps_save_alive() {
    let (mut app, mut rx) = config_screen();
    cursor_on(&mut app, "echo");
    app.update(Action::Toggle);
    app.update(Action::GoHome);
    app.update(Action::Yes);
    assert_eq!(app.screen, Screen::Home);

    let cmd = take_one(&mut rx, |r| matches!(r, ApiRequest::PutConfig(_)));
    assert!(!cmd.cancel.is_cancelled());
    respond(&mut app, &cmd, ApiResponse::ConfigSaved(Ok(String::new())));
    assert!(!app.config.editor.is_dirty());
}

#[test]
fn failed_save_and_leave_keeps_draft_on_return() {
    let (mut app, mut rx) = config_screen();
    cursor_on(&mut app, "echo");
    app.update(Action::Toggle);
    app.update(Action::GoHome);
    app.update(Action::Yes);
    let cmd = take_one(&mut rx, |r| matches!(r, ApiRequest::PutConfig(_)));
    respond(
        &mut app,
        &cmd,
        ApiResponse::ConfigSaved(Err(ApiError::Status {
            status: 400,
            detail: Some("Invalid configuration".into()),
        })),
    );
    assert!(app.config.editor.is_dirty());

    app.update(Action::OpenConfig);
    let reqs = requests(&mut rx);
    assert!(!reqs.contains(&ApiRequest::GetConfig));
    assert!(reqs.contains(&ApiRequest::ConfigHealth));
    assert!(app.config.editor.is_dirty());
    assert!(!app.config.editor.working().unwrap().database.echo);
}

#[test]
fn older_health_response_is_discarded() {
    let (mut app, mut rx) = test_app();
    app.update(Action::OpenConfig);
    let cmds = drain(&mut rx);
    let config = cmds.iter().find(|c| c.request == ApiRequest::GetConfig).unwrap();
    let first = cmds
        .iter()
        .find(|c| c.request == ApiRequest::ConfigHealth)
        .unwrap();
    respond(&mut app, config, ApiResponse::Config(Ok(ServerConfig::default())));

    cursor_on(&mut app, "echo");
    app.update(Action::Toggle);
    app.update(Action::SaveConfig);
    let save = take_one(&mut rx, |r| matches!(r, ApiRequest::PutConfig(_)));
    respond(&mut app, &save, ApiResponse::ConfigSaved(Ok("ok".into())));
    let second = take_one(&mut rx, |r| *r == ApiRequest::ConfigHealth);

    let healthy = ConfigHealth {
        status: "healthy".to_string(),
        ..ConfigHealth::default()
    };
    respond(&mut app, &second, ApiResponse::Health(Ok(healthy)));
    respond(
        &mut app,
        first,
        ApiResponse::Health(Err(ApiError::Other("timeout".into()))),
    );
    assert!(app.config.editor.health().unwrap().is_healthy());
}

#[test]
fn raw_save_reloads_structured_view() {
    let (mut app, mut rx) = config_screen();
    drain(&mut rx);
    app.update(Action::RawEditor);
    assert_eq!(app.input_mode, InputMode::RawEdit);
    let cmd = take_one(&mut rx, |r| *r == ApiRequest::GetRawConfig);
    respond(
        &mut app,
        &cmd,
        ApiResponse::RawConfig(Ok("[api]\nport = 8000".into())),
    );

    app.update(Action::InputBackspace);
    type_text(&mut app, "1");
    app.update(Action::SaveConfig);
    let cmd = take_one(&mut rx, |r| matches!(r, ApiRequest::PutRawConfig(_)));
    assert_eq!(
        cmd.request,
        ApiRequest::PutRawConfig("[api]\nport = 8001".into())
    );

    respond(&mut app, &cmd, ApiResponse::RawConfigSaved(Ok("ok".into())));
    let reqs = requests(&mut rx);
    assert!(reqs.contains(&ApiRequest::GetConfig));

    app.update(Action::InputCancel);
    assert_eq!(app.input_mode, InputMode::Normal);
}

#[test]
fn reload_discards_edits_by_reloading() {
    let (mut app, mut rx) = config_screen();
    drain(&mut rx);
    app.update(Action::ReloadConfig);
    app.update(Action::ReloadConfig);
    let cmd = take_one(&mut rx, |r| *r == ApiRequest::ReloadConfig);

    respond(&mut app, &cmd, ApiResponse::ConfigReloaded(Ok(String::new())));
    let reqs = requests(&mut rx);
    assert!(reqs.contains(&ApiRequest::GetConfig));
}

// ── modals ─────────────────────────────────────────────────────

#[test]
fn quit_requires_confirmation() {
    let (mut app, _rx) = test_app();
    assert!(!app.update(Action::Quit));
    assert!(app.confirm_quit);
    assert!(!app.update(Action::NavigateBack));
    assert!(!app.confirm_quit);
    app.update(Action::Quit);
    assert!(app.update(Action::Quit));
    assert!(app.should_quit);
}

#[test]
fn force_quit_bypasses_prompts() {
    let (mut app, _rx) = config_screen();
    cursor_on(&mut app, "echo");
    app.update(Action::Toggle);
    app.update(Action::NavigateBack);
    assert!(app.update(Action::ForceQuit));
}
