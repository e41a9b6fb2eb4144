mod backend;
mod update;
mod update_config;

use fastlib_client::{Generation, GenerationCounter, StatusBoard};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::model::activity::ActivityLog;
use crate::model::config::ConfigState;
use crate::model::library::{
    AuthorDetailState, AuthorsState, BookDetailState, BooksState, Prompt, SeriesState,
};
use crate::theme::Theme;
use crate::tui_event::{ApiCommand, ApiRequest};

/// Which screen is currently displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Home,
    Authors,
    Books,
    Series,
    Author(String),
    Book(String),
    Config,
}

impl Screen {
    pub fn title(&self) -> &'static str {
        match self {
            Screen::Home => "Home",
            Screen::Authors => "Authors",
            Screen::Books => "Books",
            Screen::Series => "Series",
            Screen::Author(_) => "Author",
            Screen::Book(_) => "Book",
            Screen::Config => "Configuration",
        }
    }
}

/// Input mode determines how keyboard input is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    TextInput,
    /// Multi-line raw configuration editor.
    RawEdit,
}

/// Entries on the home screen, in display order.
pub const HOME_ITEMS: &[Screen] = &[Screen::Authors, Screen::Books, Screen::Series, Screen::Config];

/// Main application state.
pub struct App {
    pub screen: Screen,
    /// Screens to return to with Esc.
    pub history: Vec<Screen>,
    pub home_cursor: usize,
    pub tick: usize,
    pub theme: Theme,
    pub should_quit: bool,
    pub confirm_quit: bool,
    pub show_help: bool,
    pub input_mode: InputMode,
    pub prompt: Option<Prompt>,
    pub api_url: String,

    pub authors: AuthorsState,
    pub books: BooksState,
    pub series: SeriesState,
    pub author: Option<AuthorDetailState>,
    pub book: Option<BookDetailState>,
    pub config: ConfigState,
    pub activity: ActivityLog,

    pub(crate) generations: GenerationCounter,
    /// Cancelled when the app shuts down; parent of every mount token.
    pub(crate) session: CancellationToken,
    /// Cancelled when the current screen is left.
    pub(crate) mount: CancellationToken,
    /// Channel to send requests to the backend.
    pub api_tx: Option<mpsc::UnboundedSender<ApiCommand>>,
}

impl App {
    pub fn new(theme: Theme, api_url: String) -> Self {
        let session = CancellationToken::new();
        let mount = session.child_token();
        Self {
            screen: Screen::Home,
            history: Vec::new(),
            home_cursor: 0,
            tick: 0,
            theme,
            should_quit: false,
            confirm_quit: false,
            show_help: false,
            input_mode: InputMode::Normal,
            prompt: None,
            api_url,
            authors: AuthorsState::default(),
            books: BooksState::default(),
            series: SeriesState::default(),
            author: None,
            book: None,
            config: ConfigState::default(),
            activity: ActivityLog::default(),
            generations: GenerationCounter::new(),
            session,
            mount,
            api_tx: None,
        }
    }

    /// Token that outlives every screen; cancelling it stops all requests.
    pub fn session_token(&self) -> CancellationToken {
        self.session.clone()
    }

    fn dispatch(&self, generation: Generation, cancel: CancellationToken, request: ApiRequest) {
        let Some(tx) = &self.api_tx else {
            tracing::debug!(request = request.label(), "no backend attached, request dropped");
            return;
        };
        let cmd = ApiCommand {
            generation,
            cancel,
            request,
        };
        if tx.send(cmd).is_err() {
            tracing::warn!("backend channel closed");
        }
    }

    /// Send a read tied to the current screen mount.
    pub(crate) fn send_read(&self, generation: Generation, request: ApiRequest) {
        self.dispatch(generation, self.mount.clone(), request);
    }

    /// Send a write. Writes are never cancelled by navigation.
    pub(crate) fn send_write(&mut self, request: ApiRequest) {
        let generation = self.generations.next();
        self.dispatch(generation, self.session.clone(), request);
    }

    /// Go to `screen`, remembering the current one for Esc.
    pub fn navigate(&mut self, screen: Screen) {
        if self.screen != screen {
            let prev = std::mem::replace(&mut self.screen, screen.clone());
            self.history.push(prev);
        }
        self.remount(screen);
    }

    /// Return to the previous screen (Home when there is none).
    pub fn go_back(&mut self) {
        let prev = self.history.pop().unwrap_or(Screen::Home);
        self.screen = prev.clone();
        self.remount(prev);
    }

    fn remount(&mut self, screen: Screen) {
        self.unmount();
        self.screen = screen;
        self.mount_screen();
    }

    /// Cancel everything the current mount has in flight.
    fn unmount(&mut self) {
        self.mount.cancel();
        self.mount = self.session.child_token();

        self.authors.list.cancel();
        self.authors.search.cancel();
        self.books.list.cancel();
        self.books.board.close();
        self.series.list.cancel();
        if let Some(author) = &mut self.author {
            author.record.cancel();
            author.board.close();
        }
        if let Some(book) = &mut self.book {
            book.record.cancel();
            book.board.close();
        }
        self.config.editor.cancel();
        self.config.editor.leave_raw();
        self.config.editing = None;
        self.config.confirm_exit = None;
        self.prompt = None;
        self.input_mode = InputMode::Normal;
    }

    /// Issue the fetches a freshly shown screen needs.
    fn mount_screen(&mut self) {
        tracing::debug!(screen = self.screen.title(), "mount");
        match self.screen.clone() {
            Screen::Home => {}
            Screen::Authors => self.fetch_authors(),
            Screen::Books => self.fetch_books(),
            Screen::Series => self.fetch_series(),
            Screen::Author(id) => {
                if self.author.as_ref().is_none_or(|a| a.id != id) {
                    self.author = Some(AuthorDetailState::new(id));
                }
                self.fetch_author();
            }
            Screen::Book(id) => {
                if self.book.as_ref().is_none_or(|b| b.id != id) {
                    self.book = Some(BookDetailState::new(id));
                }
                self.fetch_book();
            }
            Screen::Config => self.mount_config(),
        }
    }

    pub(crate) fn fetch_authors(&mut self) {
        let generation = self.authors.list.begin(&mut self.generations);
        self.send_read(generation, ApiRequest::ListAuthors);
    }

    pub(crate) fn fetch_books(&mut self) {
        let generation = self.books.list.begin(&mut self.generations);
        self.send_read(generation, ApiRequest::ListBooks);
    }

    pub(crate) fn fetch_series(&mut self) {
        let generation = self.series.list.begin(&mut self.generations);
        self.send_read(generation, ApiRequest::ListSeries);
    }

    pub(crate) fn fetch_author(&mut self) {
        let Some(author) = &mut self.author else {
            return;
        };
        let generation = author.record.begin(&mut self.generations);
        let request = ApiRequest::GetAuthor(author.id.clone());
        self.send_read(generation, request);
    }

    pub(crate) fn fetch_book(&mut self) {
        let Some(book) = &mut self.book else {
            return;
        };
        let generation = book.record.begin(&mut self.generations);
        let request = ApiRequest::GetBook(book.id.clone());
        self.send_read(generation, request);
    }

    /// The status board of the current screen, if it has one.
    pub fn active_board(&self) -> Option<&StatusBoard> {
        match &self.screen {
            Screen::Books => Some(&self.books.board),
            Screen::Author(_) => self.author.as_ref().map(|a| &a.board),
            Screen::Book(_) => self.book.as_ref().map(|b| &b.board),
            _ => None,
        }
    }

    pub fn dropdown_open(&self) -> bool {
        self.active_board().is_some_and(|b| b.active().is_some())
    }

    // update() is in update.rs
    // handle_config_*() and the raw editor are in update_config.rs
    // handle_api_event() is in backend.rs

    fn header_line(&self) -> Line<'static> {
        let style = self.theme.header_style();
        let mut spans = vec![
            Span::styled(" FastLibrarian ", style),
            Span::styled(format!("\u{2502} {} ", self.screen.title()), style),
        ];
        if self.config.editor.is_dirty() {
            spans.push(Span::styled("\u{2502} unsaved config ", style.fg(self.theme.dirty)));
        }
        spans.push(Span::styled(format!("\u{2502} {} ", self.api_url), style));
        Line::from(spans)
    }

    /// Render the current screen.
    pub fn view(&mut self, f: &mut ratatui::Frame) {
        let area = f.area();
        let activity_height = if area.height > 24 { 6 } else { 0 };
        let [header_area, body_area, activity_area, footer_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(activity_height),
            Constraint::Length(1),
        ])
        .areas(area);

        f.render_widget(
            Paragraph::new(self.header_line()).style(self.theme.header_style()),
            header_area,
        );

        match self.screen.clone() {
            Screen::Home => crate::view::home::render_in(f, self, body_area, footer_area),
            Screen::Authors => crate::view::authors::render_in(f, self, body_area, footer_area),
            Screen::Books => crate::view::books::render_in(f, self, body_area, footer_area),
            Screen::Series => crate::view::series::render_in(f, self, body_area, footer_area),
            Screen::Author(_) => crate::view::author::render_in(f, self, body_area, footer_area),
            Screen::Book(_) => crate::view::book::render_in(f, self, body_area, footer_area),
            Screen::Config => crate::view::config::render_in(f, self, body_area, footer_area),
        }

        if activity_area.height > 0 {
            crate::view::activity::render(f, activity_area, self);
        }

        if self.dropdown_open() {
            crate::view::status::render(f, self);
        }

        if let Some(prompt) = &self.prompt {
            crate::view::prompt::render(f, prompt, &self.theme);
        }

        if self.config.confirm_exit.is_some() {
            crate::view::config_confirm::render(f, &self.theme);
        }

        if self.show_help {
            crate::view::help::render(f, &self.theme);
        }

        if self.confirm_quit {
            crate::view::quit_confirm::render(f, &self.theme);
        }
    }
}

/// Area of the body used for lists, leaving room for a one-line status row.
pub(crate) fn split_status_row(area: Rect) -> (Rect, Rect) {
    let [main, status] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);
    (main, status)
}

#[cfg(test)]
mod tests;
