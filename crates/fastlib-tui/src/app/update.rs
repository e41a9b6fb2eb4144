use fastlib_client::model::{NewAuthor, NewBook, NewSeries};
use fastlib_client::{Medium, StatusBoard};

use super::{App, HOME_ITEMS, InputMode, Screen};
use crate::action::Action;
use crate::model::config::PendingExit;
use crate::model::library::{AuthorsFocus, Prompt, PromptKind, clamp_cursor};
use crate::tui_event::{ApiRequest, StatusOrigin};

impl App {
    /// Process a user action and update state. Returns true if the app should quit.
    pub fn update(&mut self, action: Action) -> bool {
        match action {
            Action::Tick => {
                self.tick = self.tick.wrapping_add(1);
                return false;
            }
            Action::ForceQuit => {
                self.should_quit = true;
                return true;
            }
            Action::Resize(..) | Action::None => return false,
            _ => {}
        }

        // Quit confirmation modal: q or y confirms, Esc cancels
        if self.confirm_quit {
            match action {
                Action::Quit | Action::Yes => {
                    self.should_quit = true;
                    return true;
                }
                Action::NavigateBack => {
                    self.confirm_quit = false;
                }
                _ => {}
            }
            return false;
        }

        // Help overlay
        if self.show_help {
            match action {
                Action::Quit => {
                    self.confirm_quit = true;
                }
                Action::ToggleHelp | Action::NavigateBack => {
                    self.show_help = false;
                }
                _ => {}
            }
            return false;
        }

        // Config "unsaved changes" prompt
        if self.config.confirm_exit.is_some() {
            match action {
                // y = save & leave
                Action::Yes => {
                    self.save_config();
                    if let Some(exit) = self.config.confirm_exit.take() {
                        self.perform_exit(exit);
                    }
                }
                // n = discard & leave
                Action::Create => {
                    self.config.editor.reset_changes();
                    self.activity.info("Discarded unsaved configuration changes");
                    if let Some(exit) = self.config.confirm_exit.take() {
                        self.perform_exit(exit);
                    }
                }
                // Esc = cancel, stay on config
                Action::NavigateBack => {
                    self.config.confirm_exit = None;
                }
                Action::Quit => {
                    self.confirm_quit = true;
                }
                _ => {}
            }
            return false;
        }

        if self.prompt.is_some() {
            self.handle_prompt_action(action);
            return false;
        }

        if self.config.editing.is_some() {
            self.handle_config_edit_action(action);
            return false;
        }

        if self.input_mode == InputMode::RawEdit {
            self.handle_raw_action(action);
            return false;
        }

        if self.dropdown_open() {
            self.handle_dropdown_action(action);
            return false;
        }

        match action {
            Action::Quit => {
                self.confirm_quit = true;
            }
            Action::ToggleHelp => {
                self.show_help = true;
            }
            Action::GoHome => self.request_navigation(PendingExit::To(Screen::Home)),
            Action::GoAuthors => self.request_navigation(PendingExit::To(Screen::Authors)),
            Action::GoBooks => self.request_navigation(PendingExit::To(Screen::Books)),
            Action::GoSeries => self.request_navigation(PendingExit::To(Screen::Series)),
            Action::OpenConfig => self.request_navigation(PendingExit::To(Screen::Config)),
            Action::NavigateBack => {
                if self.screen == Screen::Authors && self.authors.focus == AuthorsFocus::Results {
                    self.authors.focus = AuthorsFocus::List;
                } else {
                    self.request_navigation(PendingExit::Back);
                }
            }
            Action::MoveUp | Action::MoveDown | Action::GoTop | Action::GoBottom => {
                self.move_cursor(action);
            }
            Action::DrillIn => self.drill_in(),
            Action::Tab => match self.screen {
                Screen::Authors => {
                    self.authors.focus = match self.authors.focus {
                        AuthorsFocus::List if !self.authors.search.results().is_empty() => {
                            AuthorsFocus::Results
                        }
                        _ => AuthorsFocus::List,
                    };
                }
                Screen::Config => self.config.next_section(),
                _ => {}
            },
            Action::Retry => self.retry(),
            Action::Create => match self.screen {
                Screen::Authors => self.open_prompt(PromptKind::NewAuthor, String::new()),
                Screen::Books => self.open_prompt(PromptKind::NewBook, String::new()),
                Screen::Series => self.open_prompt(PromptKind::NewSeries, String::new()),
                Screen::Config => self.config_add(),
                _ => {}
            },
            Action::StartSearch => {
                if self.screen == Screen::Authors {
                    let query = self.authors.search.query().to_string();
                    self.open_prompt(PromptKind::SearchAuthors, query);
                }
            }
            Action::RefreshAuthorBooks => self.refresh_author_books(),
            Action::OpenDropdown(medium) => self.open_dropdown(medium),
            Action::Toggle
            | Action::SaveConfig
            | Action::ResetConfig
            | Action::ReloadConfig
            | Action::RawEditor
            | Action::Remove => {
                if self.screen == Screen::Config {
                    self.handle_config_action(action);
                }
            }
            _ => {}
        }
        false
    }

    /// Leave the current screen, asking first when the config draft is dirty.
    pub(super) fn request_navigation(&mut self, exit: PendingExit) {
        if self.screen == Screen::Config {
            if exit == PendingExit::To(Screen::Config) {
                return;
            }
            if self.config.editor.is_dirty() {
                self.config.confirm_exit = Some(exit);
                return;
            }
        }
        self.perform_exit(exit);
    }

    fn perform_exit(&mut self, exit: PendingExit) {
        match exit {
            PendingExit::Back => self.go_back(),
            PendingExit::To(screen) => self.navigate(screen),
        }
    }

    fn move_cursor(&mut self, action: Action) {
        let (cursor, len) = match &self.screen {
            Screen::Home => (&mut self.home_cursor, HOME_ITEMS.len()),
            Screen::Authors => {
                let len = self.authors.row_count();
                (self.authors.cursor_mut(), len)
            }
            Screen::Books => {
                let len = self.books.books().len();
                (&mut self.books.cursor, len)
            }
            Screen::Series => {
                let len = self.series.list.data().map_or(0, Vec::len);
                (&mut self.series.cursor, len)
            }
            Screen::Author(_) => {
                let Some(author) = &mut self.author else {
                    return;
                };
                let len = author.books().len();
                (&mut author.cursor, len)
            }
            Screen::Book(_) => {
                let Some(book) = &mut self.book else {
                    return;
                };
                let len = book.record.data().map_or(0, |b| b.authors.len());
                (&mut book.cursor, len)
            }
            Screen::Config => {
                let len = self.config.rows().len();
                (&mut self.config.item_cursor, len)
            }
        };
        match action {
            Action::MoveDown => {
                if *cursor + 1 < len {
                    *cursor += 1;
                }
            }
            Action::MoveUp => *cursor = cursor.saturating_sub(1),
            Action::GoTop => *cursor = 0,
            Action::GoBottom => *cursor = len.saturating_sub(1),
            _ => {}
        }
    }

    fn drill_in(&mut self) {
        let target = match &self.screen {
            Screen::Home => HOME_ITEMS.get(self.home_cursor).cloned(),
            Screen::Authors => match self.authors.focus {
                AuthorsFocus::List => self.authors.selected().map(|a| Screen::Author(a.id.clone())),
                AuthorsFocus::Results => {
                    self.open_found_author();
                    return;
                }
            },
            Screen::Books => self.books.selected().map(|b| Screen::Book(b.id.clone())),
            Screen::Series => None,
            Screen::Author(_) => self
                .author
                .as_ref()
                .and_then(|a| a.selected())
                .map(|b| Screen::Book(b.id.clone())),
            Screen::Book(_) => self.book.as_ref().and_then(|b| {
                b.record
                    .data()
                    .and_then(|book| book.authors.get(b.cursor))
                    .map(|a| Screen::Author(a.id.clone()))
            }),
            Screen::Config => {
                self.handle_config_enter();
                return;
            }
        };
        if let Some(screen) = target {
            self.navigate(screen);
        }
    }

    /// Enter on a search hit: open it when it is already in the library,
    /// otherwise add it.
    fn open_found_author(&mut self) {
        let Some(found) = self.authors.selected_result().cloned() else {
            return;
        };
        match found.id {
            Some(id) if found.in_db => self.navigate(Screen::Author(id)),
            _ => self.create_author(NewAuthor {
                name: found.name,
                bio: found.bio,
            }),
        }
    }

    fn retry(&mut self) {
        match self.screen {
            Screen::Home => {}
            Screen::Authors => {
                if self.authors.focus == AuthorsFocus::Results && self.authors.search.error().is_some() {
                    let query = self.authors.search.query().to_string();
                    self.submit_search(query);
                } else {
                    self.fetch_authors();
                }
            }
            Screen::Books => self.fetch_books(),
            Screen::Series => self.fetch_series(),
            Screen::Author(_) => self.fetch_author(),
            Screen::Book(_) => self.fetch_book(),
            Screen::Config => self.load_config(),
        }
    }

    // --- prompts ---

    fn open_prompt(&mut self, kind: PromptKind, buffer: String) {
        self.prompt = Some(Prompt { kind, buffer });
        self.input_mode = InputMode::TextInput;
    }

    fn handle_prompt_action(&mut self, action: Action) {
        match action {
            Action::InputChar(c) => {
                if let Some(prompt) = &mut self.prompt {
                    prompt.buffer.push(c);
                }
            }
            Action::InputBackspace => {
                if let Some(prompt) = &mut self.prompt {
                    prompt.buffer.pop();
                }
            }
            Action::InputCancel => {
                self.prompt = None;
                self.input_mode = InputMode::Normal;
            }
            Action::InputConfirm => {
                self.input_mode = InputMode::Normal;
                if let Some(prompt) = self.prompt.take() {
                    self.submit_prompt(prompt);
                }
            }
            _ => {}
        }
    }

    fn submit_prompt(&mut self, prompt: Prompt) {
        let text = prompt.buffer.trim().to_string();
        match prompt.kind {
            PromptKind::NewAuthor => self.create_author(NewAuthor {
                name: text,
                bio: None,
            }),
            PromptKind::NewBook => {
                if self.books.creating || text.is_empty() {
                    tracing::debug!("create book ignored");
                    return;
                }
                self.books.creating = true;
                self.books.create_error = None;
                self.send_write(ApiRequest::CreateBook(NewBook { title: text }));
            }
            PromptKind::NewSeries => {
                if self.series.creating || text.is_empty() {
                    tracing::debug!("create series ignored");
                    return;
                }
                self.series.creating = true;
                self.series.create_error = None;
                self.send_write(ApiRequest::CreateSeries(NewSeries { name: text }));
            }
            PromptKind::SearchAuthors => {
                if text.is_empty() {
                    self.authors.search.clear();
                    self.authors.focus = AuthorsFocus::List;
                } else {
                    self.submit_search(text);
                }
            }
        }
    }

    fn create_author(&mut self, author: NewAuthor) {
        if self.authors.creating || author.name.trim().is_empty() {
            tracing::debug!("create author ignored");
            return;
        }
        self.authors.creating = true;
        self.authors.create_error = None;
        self.send_write(ApiRequest::CreateAuthor(author));
    }

    /// Submit an author query; ignored while a search is pending.
    pub(super) fn submit_search(&mut self, query: String) {
        match self.authors.search.begin(query, &mut self.generations) {
            Some((generation, query)) => {
                self.authors.result_cursor = 0;
                self.send_read(generation, ApiRequest::FindAuthors(query));
            }
            None => tracing::debug!("search already in flight"),
        }
    }

    fn refresh_author_books(&mut self) {
        if !matches!(self.screen, Screen::Author(_)) {
            return;
        }
        let id = match &mut self.author {
            Some(author) if !author.updating => {
                author.updating = true;
                author.update_error = None;
                author.id.clone()
            }
            _ => return,
        };
        self.send_write(ApiRequest::RefreshAuthorBooks(id));
    }

    // --- status dropdown ---

    fn board_mut(&mut self) -> Option<&mut StatusBoard> {
        match &self.screen {
            Screen::Books => Some(&mut self.books.board),
            Screen::Author(_) => self.author.as_mut().map(|a| &mut a.board),
            Screen::Book(_) => self.book.as_mut().map(|b| &mut b.board),
            _ => None,
        }
    }

    /// Open (or switch to) the dropdown for the selected book's `medium`.
    fn open_dropdown(&mut self, medium: Medium) {
        match &self.screen {
            Screen::Books => {
                if let Some(book) = self.books.list.data().and_then(|b| b.get(self.books.cursor)) {
                    self.books.board.toggle(book, medium);
                }
            }
            Screen::Author(_) => {
                if let Some(author) = &mut self.author
                    && let Some(book) = author.record.data().and_then(|a| a.books.get(author.cursor))
                {
                    author.board.toggle(book, medium);
                }
            }
            Screen::Book(_) => {
                if let Some(detail) = &mut self.book
                    && let Some(book) = detail.record.data()
                {
                    detail.board.toggle(book, medium);
                }
            }
            _ => {}
        }
    }

    fn handle_dropdown_action(&mut self, action: Action) {
        match action {
            Action::MoveDown => {
                if let Some(board) = self.board_mut() {
                    board.highlight_next();
                }
            }
            Action::MoveUp => {
                if let Some(board) = self.board_mut() {
                    board.highlight_prev();
                }
            }
            Action::NavigateBack => {
                if let Some(board) = self.board_mut() {
                    board.close();
                }
            }
            Action::OpenDropdown(medium) => self.open_dropdown(medium),
            Action::DrillIn => self.select_status(),
            Action::Quit => {
                self.confirm_quit = true;
            }
            _ => {}
        }
    }

    /// Commit the highlighted option: one PATCH touching one medium.
    fn select_status(&mut self) {
        let selected = match &self.screen {
            Screen::Books => {
                let books = self.books.list.data().map_or(&[][..], Vec::as_slice);
                self.books
                    .board
                    .select_highlighted(books)
                    .map(|change| (StatusOrigin::Books, change))
            }
            Screen::Author(_) => self.author.as_mut().and_then(|author| {
                let books = author.record.data().map_or(&[][..], |a| a.books.as_slice());
                author
                    .board
                    .select_highlighted(books)
                    .map(|change| (StatusOrigin::Author(author.id.clone()), change))
            }),
            Screen::Book(_) => self.book.as_mut().and_then(|detail| {
                let books = detail.record.data().map(std::slice::from_ref).unwrap_or(&[]);
                detail
                    .board
                    .select_highlighted(books)
                    .map(|change| (StatusOrigin::Book(detail.id.clone()), change))
            }),
            _ => None,
        };
        if let Some((origin, change)) = selected {
            tracing::info!(
                book_id = %change.book_id,
                field = change.patch.medium.field(),
                status = change.patch.status.label(),
                "updating status"
            );
            self.send_write(ApiRequest::UpdateStatus { origin, change });
        }
    }

    pub(super) fn clamp_cursors(&mut self) {
        let len = self.authors.list.data().map_or(0, Vec::len);
        clamp_cursor(&mut self.authors.cursor, len);
        let len = self.authors.search.results().len();
        clamp_cursor(&mut self.authors.result_cursor, len);
        let len = self.books.books().len();
        clamp_cursor(&mut self.books.cursor, len);
        let len = self.series.list.data().map_or(0, Vec::len);
        clamp_cursor(&mut self.series.cursor, len);
        if let Some(author) = &mut self.author {
            let len = author.books().len();
            clamp_cursor(&mut author.cursor, len);
        }
        let len = self.config.rows().len();
        clamp_cursor(&mut self.config.item_cursor, len);
    }
}
