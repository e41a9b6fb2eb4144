use fastlib_client::{ApiError, Book, Completion, StatusBoard, StatusChange};

use super::{App, Screen};
use crate::model::library::AuthorsFocus;
use crate::tui_event::{ApiEvent, ApiRequest, ApiResponse, StatusOrigin};

impl App {
    /// Apply a backend response to model state.
    ///
    /// Reads are matched against the generation their slot is waiting
    /// for; anything else is stale and dropped. Writes always apply.
    pub fn handle_api_event(&mut self, event: ApiEvent) {
        let ApiEvent {
            generation,
            response,
        } = event;
        match response {
            ApiResponse::Authors(result) => {
                if self.authors.list.resolve(generation, result) {
                    self.clamp_cursors();
                }
            }
            ApiResponse::Author(result) => {
                if let Some(author) = &mut self.author
                    && author.record.resolve(generation, result)
                {
                    let books = author.record.data().map_or(&[][..], |a| a.books.as_slice());
                    author.board.retain_books(books);
                    self.clamp_cursors();
                }
            }
            ApiResponse::AuthorCreated(result) => {
                self.authors.creating = false;
                match result {
                    Ok(author) => {
                        self.activity.info(format!("Added author {}", author.name));
                        if self.screen == Screen::Authors {
                            let generation = self.authors.list.refresh(&mut self.generations);
                            self.send_read(generation, ApiRequest::ListAuthors);
                        }
                    }
                    Err(e) => {
                        let msg = e.user_message();
                        self.activity.error(format!("Could not add author: {msg}"));
                        self.authors.create_error = Some(msg);
                    }
                }
            }
            ApiResponse::AuthorBooksRefreshed { id, result } => {
                let Some(author) = self.author.as_mut().filter(|a| a.id == id) else {
                    tracing::debug!(author_id = %id, "book refresh for an author no longer shown");
                    return;
                };
                author.updating = false;
                match result {
                    Ok(updated) => {
                        let name = updated.name.clone();
                        author.record.replace(updated);
                        let books = author.record.data().map_or(&[][..], |a| a.books.as_slice());
                        author.board.retain_books(books);
                        self.activity.info(format!("Updated books for {name}"));
                        self.clamp_cursors();
                    }
                    Err(e) => {
                        let msg = e.user_message();
                        author.update_error = Some(msg.clone());
                        self.activity.error(format!("Could not update books: {msg}"));
                    }
                }
            }
            ApiResponse::FoundAuthors(result) => {
                if self.authors.search.resolve(generation, result) {
                    self.authors.result_cursor = 0;
                    if !self.authors.search.results().is_empty() {
                        self.authors.focus = AuthorsFocus::Results;
                    }
                }
            }
            ApiResponse::Books(result) => {
                if self.books.list.resolve(generation, result) {
                    let books = self.books.list.data().map_or(&[][..], Vec::as_slice);
                    self.books.board.retain_books(books);
                    self.clamp_cursors();
                }
            }
            ApiResponse::Book(result) => {
                if let Some(detail) = &mut self.book
                    && detail.record.resolve(generation, result)
                {
                    let books = detail.record.data().map(std::slice::from_ref).unwrap_or(&[]);
                    detail.board.retain_books(books);
                }
            }
            ApiResponse::BookCreated(result) => {
                self.books.creating = false;
                match result {
                    Ok(book) => {
                        self.activity.info(format!("Added book {}", book.title));
                        if self.screen == Screen::Books {
                            let generation = self.books.list.refresh(&mut self.generations);
                            self.send_read(generation, ApiRequest::ListBooks);
                        }
                    }
                    Err(e) => {
                        let msg = e.user_message();
                        self.activity.error(format!("Could not add book: {msg}"));
                        self.books.create_error = Some(msg);
                    }
                }
            }
            ApiResponse::StatusUpdated {
                origin,
                change,
                result,
            } => self.handle_status_updated(origin, change, result),
            ApiResponse::Series(result) => {
                if self.series.list.resolve(generation, result) {
                    self.clamp_cursors();
                }
            }
            ApiResponse::SeriesCreated(result) => {
                self.series.creating = false;
                match result {
                    Ok(series) => {
                        self.activity.info(format!("Added series {}", series.name));
                        if self.screen == Screen::Series {
                            let generation = self.series.list.refresh(&mut self.generations);
                            self.send_read(generation, ApiRequest::ListSeries);
                        }
                    }
                    Err(e) => {
                        let msg = e.user_message();
                        self.activity.error(format!("Could not add series: {msg}"));
                        self.series.create_error = Some(msg);
                    }
                }
            }
            ApiResponse::Config(result) => {
                if self.config.editor.finish_load(generation, result) {
                    self.clamp_cursors();
                }
            }
            ApiResponse::ConfigSaved(result) => {
                let failure = result.as_ref().err().map(ApiError::user_message);
                if self.config.editor.finish_save(result) {
                    let notice = self.config.editor.notice().unwrap_or("Configuration saved");
                    self.activity.info(notice.to_string());
                    self.fetch_health();
                } else if let Some(msg) = failure {
                    self.activity.error(format!("Save failed: {msg}"));
                }
            }
            ApiResponse::Health(result) => {
                self.config.editor.finish_health(generation, result);
            }
            ApiResponse::RawConfig(result) => {
                self.config.editor.finish_raw_load(generation, result);
            }
            ApiResponse::RawConfigSaved(result) => {
                let failure = result.as_ref().err().map(ApiError::user_message);
                if self.config.editor.finish_raw_save(result) {
                    self.activity.info("Raw configuration saved");
                    // The structured draft only resyncs through a fresh load.
                    if self.screen == Screen::Config {
                        self.load_config();
                    }
                } else if let Some(msg) = failure {
                    self.activity.error(format!("Raw save failed: {msg}"));
                }
            }
            ApiResponse::RawValidated(result) => {
                self.config.editor.finish_validate(result);
                match self.config.editor.validation() {
                    Some(v) if v.valid => self.activity.info("Raw configuration is valid"),
                    Some(v) => {
                        let errors = v.errors.join("; ");
                        self.activity.error(format!("Raw configuration invalid: {errors}"));
                    }
                    None => {}
                }
            }
            ApiResponse::ConfigReloaded(result) => {
                let failure = result.as_ref().err().map(ApiError::user_message);
                if self.config.editor.finish_reload(result) {
                    self.activity.info("Configuration reloaded from file");
                    if self.screen == Screen::Config {
                        self.load_config();
                        if self.config.editor.raw().data().is_some() {
                            let generation = self.config.editor.reload_raw(&mut self.generations);
                            self.send_read(generation, ApiRequest::GetRawConfig);
                        }
                    }
                } else if let Some(msg) = failure {
                    self.activity.error(format!("Reload failed: {msg}"));
                }
            }
            ApiResponse::ClientTypes(result) => {
                self.config.editor.finish_client_types(generation, result);
            }
        }
    }

    /// Success re-fetches the enclosing list or record. Failure leaves the
    /// last fetched value in place and shows the error on the medium.
    fn handle_status_updated(
        &mut self,
        origin: StatusOrigin,
        change: StatusChange,
        result: Result<Book, ApiError>,
    ) {
        let failure = result.as_ref().err().map(ApiError::user_message);
        let outcome = result.map(|_| ());

        let board: Option<&mut StatusBoard> = match &origin {
            StatusOrigin::Books => Some(&mut self.books.board),
            StatusOrigin::Author(id) => self
                .author
                .as_mut()
                .filter(|a| &a.id == id)
                .map(|a| &mut a.board),
            StatusOrigin::Book(id) => self
                .book
                .as_mut()
                .filter(|b| &b.id == id)
                .map(|b| &mut b.board),
        };
        let completion = match board {
            Some(board) => board.complete(&change, outcome),
            None if outcome.is_ok() => Completion::Succeeded,
            None => Completion::Failed,
        };

        if completion == Completion::Superseded {
            return;
        }
        if completion == Completion::Failed {
            let title = self.book_title(&change.book_id);
            self.activity.error(format!(
                "Could not set {} status of \"{}\": {}",
                change.patch.medium.label(),
                title,
                failure.unwrap_or_default()
            ));
            return;
        }

        match origin {
            StatusOrigin::Books if self.screen == Screen::Books => {
                let generation = self.books.list.refresh(&mut self.generations);
                self.send_read(generation, ApiRequest::ListBooks);
            }
            StatusOrigin::Author(id) if self.screen == Screen::Author(id.clone()) => {
                if let Some(author) = &mut self.author {
                    let generation = author.record.refresh(&mut self.generations);
                    self.send_read(generation, ApiRequest::GetAuthor(id));
                }
            }
            StatusOrigin::Book(id) if self.screen == Screen::Book(id.clone()) => {
                if let Some(book) = &mut self.book {
                    let generation = book.record.refresh(&mut self.generations);
                    self.send_read(generation, ApiRequest::GetBook(id));
                }
            }
            // Not on screen: the next mount fetches fresh data anyway.
            _ => {}
        }
    }

    fn book_title(&self, id: &str) -> String {
        let from_author = self
            .author
            .as_ref()
            .and_then(|a| a.books().iter().find(|b| b.id == id));
        let from_detail = self
            .book
            .as_ref()
            .and_then(|b| b.record.data())
            .filter(|b| b.id == id);
        self.books
            .books()
            .iter()
            .find(|b| b.id == id)
            .or(from_author)
            .or(from_detail)
            .map_or_else(|| id.to_string(), |b| b.title.clone())
    }
}
