//! Per-book, per-medium status selection for a list of books.
//!
//! The list that renders the books owns one [`StatusBoard`]. The board
//! holds the single active dropdown token, so at most one selector across
//! the whole list is ever expanded, plus the outcome of each status update
//! so failures stay visible next to the medium they belong to.

use std::collections::HashMap;

use crate::error::ApiError;
use crate::model::{Book, BookStatus, Medium, StatusPatch};

/// Identifies the one expanded status selector: `(book_id, medium)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DropdownToken {
    pub book_id: String,
    pub medium: Medium,
}

/// A status change the caller must send as `PATCH /books/{book_id}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub book_id: String,
    pub patch: StatusPatch,
    /// Orders selections made on the same board; never sent.
    pub seq: u64,
}

/// What a finished status update means for the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The latest selection for the medium was stored; re-fetch to reconcile.
    Succeeded,
    /// The latest selection failed; the error is kept for display.
    Failed,
    /// A newer selection for the same medium was made after this one was
    /// sent. Only the newer one decides what is shown.
    Superseded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Outcome {
    Pending { status: BookStatus, seq: u64 },
    Failed { message: String, seq: u64 },
}

impl Outcome {
    fn seq(&self) -> u64 {
        match self {
            Outcome::Pending { seq, .. } | Outcome::Failed { seq, .. } => *seq,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatusBoard {
    active: Option<DropdownToken>,
    /// Highlighted option inside the open dropdown (index into `BookStatus::all()`).
    highlight: usize,
    outcomes: HashMap<(String, Medium), Outcome>,
    next_seq: u64,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&DropdownToken> {
        self.active.as_ref()
    }

    pub fn is_open(&self, book_id: &str, medium: Medium) -> bool {
        self.active
            .as_ref()
            .is_some_and(|t| t.book_id == book_id && t.medium == medium)
    }

    /// Open the selector for `(book, medium)`, closing any other open one.
    /// Toggling the already-open selector closes it.
    pub fn toggle(&mut self, book: &Book, medium: Medium) {
        if self.is_open(&book.id, medium) {
            self.close();
            return;
        }
        self.highlight = book
            .status_for(medium)
            .and_then(|current| BookStatus::all().iter().position(|&s| s == current))
            .unwrap_or(0);
        self.active = Some(DropdownToken {
            book_id: book.id.clone(),
            medium,
        });
    }

    pub fn close(&mut self) {
        self.active = None;
        self.highlight = 0;
    }

    pub fn highlighted(&self) -> BookStatus {
        BookStatus::all()[self.highlight.min(BookStatus::all().len() - 1)]
    }

    pub fn highlight_next(&mut self) {
        if self.active.is_some() {
            self.highlight = (self.highlight + 1) % BookStatus::all().len();
        }
    }

    pub fn highlight_prev(&mut self) {
        if self.active.is_some() {
            let len = BookStatus::all().len();
            self.highlight = (self.highlight + len - 1) % len;
        }
    }

    /// Select `status` for `(book_id, medium)`.
    ///
    /// Closes the dropdown and returns the single-field change to send.
    /// Returns `None` when `book_id` is not among the rendered `books`.
    pub fn select(
        &mut self,
        books: &[Book],
        book_id: &str,
        medium: Medium,
        status: BookStatus,
    ) -> Option<StatusChange> {
        self.close();
        if !books.iter().any(|b| b.id == book_id) {
            tracing::warn!(book_id, "status selected for a book that is not rendered");
            return None;
        }
        self.next_seq += 1;
        let seq = self.next_seq;
        self.outcomes
            .insert((book_id.to_string(), medium), Outcome::Pending { status, seq });
        Some(StatusChange {
            book_id: book_id.to_string(),
            patch: StatusPatch { medium, status },
            seq,
        })
    }

    /// Select the highlighted option of the open dropdown.
    pub fn select_highlighted(&mut self, books: &[Book]) -> Option<StatusChange> {
        let token = self.active.clone()?;
        let status = self.highlighted();
        self.select(books, &token.book_id, token.medium, status)
    }

    /// Record the result of a status update.
    ///
    /// On success the caller re-fetches the enclosing list to reconcile. On
    /// failure the error is kept for display and the shown value stays at
    /// the last fetched one. Results of selections that a newer one for the
    /// same medium replaced leave the board untouched.
    pub fn complete(&mut self, change: &StatusChange, result: Result<(), ApiError>) -> Completion {
        let key = (change.book_id.clone(), change.patch.medium);
        if self
            .outcomes
            .get(&key)
            .is_some_and(|outcome| outcome.seq() != change.seq)
        {
            tracing::debug!(
                book_id = %change.book_id,
                medium = change.patch.medium.field(),
                seq = change.seq,
                "status update superseded by a newer selection"
            );
            return Completion::Superseded;
        }
        match result {
            Ok(()) => {
                self.outcomes.remove(&key);
                Completion::Succeeded
            }
            Err(e) => {
                tracing::warn!(
                    book_id = %change.book_id,
                    medium = change.patch.medium.field(),
                    error = %e,
                    "status update failed"
                );
                self.outcomes.insert(
                    key,
                    Outcome::Failed {
                        message: e.user_message(),
                        seq: change.seq,
                    },
                );
                Completion::Failed
            }
        }
    }

    /// Status being sent for `(book_id, medium)`, if an update is in flight.
    pub fn pending(&self, book_id: &str, medium: Medium) -> Option<BookStatus> {
        match self.outcomes.get(&(book_id.to_string(), medium)) {
            Some(Outcome::Pending { status, .. }) => Some(*status),
            _ => None,
        }
    }

    pub fn failure(&self, book_id: &str, medium: Medium) -> Option<&str> {
        match self.outcomes.get(&(book_id.to_string(), medium)) {
            Some(Outcome::Failed { message, .. }) => Some(message),
            _ => None,
        }
    }

    /// Drop state for books no longer rendered after a re-fetch.
    pub fn retain_books(&mut self, books: &[Book]) {
        let present = |id: &str| books.iter().any(|b| b.id == id);
        self.outcomes.retain(|(id, _), _| present(id));
        if self.active.as_ref().is_some_and(|t| !present(&t.book_id)) {
            self.close();
        }
    }
}
