use fastlib_client::{Author, Book, Fetch, FoundAuthor, Search, Series, StatusBoard};

/// Which pane of the Authors screen has the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthorsFocus {
    #[default]
    List,
    Results,
}

#[derive(Debug, Default)]
pub struct AuthorsState {
    pub list: Fetch<Vec<Author>>,
    pub search: Search<FoundAuthor>,
    pub cursor: usize,
    pub result_cursor: usize,
    pub focus: AuthorsFocus,
    pub creating: bool,
    pub create_error: Option<String>,
}

impl AuthorsState {
    pub fn selected(&self) -> Option<&Author> {
        self.list.data().and_then(|a| a.get(self.cursor))
    }

    pub fn selected_result(&self) -> Option<&FoundAuthor> {
        self.search.results().get(self.result_cursor)
    }

    pub fn row_count(&self) -> usize {
        match self.focus {
            AuthorsFocus::List => self.list.data().map_or(0, Vec::len),
            AuthorsFocus::Results => self.search.results().len(),
        }
    }

    pub fn cursor_mut(&mut self) -> &mut usize {
        match self.focus {
            AuthorsFocus::List => &mut self.cursor,
            AuthorsFocus::Results => &mut self.result_cursor,
        }
    }
}

#[derive(Debug, Default)]
pub struct BooksState {
    pub list: Fetch<Vec<Book>>,
    pub cursor: usize,
    pub board: StatusBoard,
    pub creating: bool,
    pub create_error: Option<String>,
}

impl BooksState {
    pub fn books(&self) -> &[Book] {
        self.list.data().map_or(&[], Vec::as_slice)
    }

    pub fn selected(&self) -> Option<&Book> {
        self.books().get(self.cursor)
    }
}

#[derive(Debug, Default)]
pub struct SeriesState {
    pub list: Fetch<Vec<Series>>,
    pub cursor: usize,
    pub creating: bool,
    pub create_error: Option<String>,
}

#[derive(Debug)]
pub struct AuthorDetailState {
    pub id: String,
    pub record: Fetch<Author>,
    pub cursor: usize,
    pub board: StatusBoard,
    pub updating: bool,
    pub update_error: Option<String>,
}

impl AuthorDetailState {
    pub fn new(id: String) -> Self {
        Self {
            id,
            record: Fetch::new(),
            cursor: 0,
            board: StatusBoard::new(),
            updating: false,
            update_error: None,
        }
    }

    pub fn books(&self) -> &[Book] {
        self.record.data().map_or(&[], |a| a.books.as_slice())
    }

    pub fn selected(&self) -> Option<&Book> {
        self.books().get(self.cursor)
    }
}

#[derive(Debug)]
pub struct BookDetailState {
    pub id: String,
    pub record: Fetch<Book>,
    /// Cursor over the book's authors.
    pub cursor: usize,
    pub board: StatusBoard,
}

impl BookDetailState {
    pub fn new(id: String) -> Self {
        Self {
            id,
            record: Fetch::new(),
            cursor: 0,
            board: StatusBoard::new(),
        }
    }

    pub fn books(&self) -> &[Book] {
        self.record.data().map(std::slice::from_ref).unwrap_or(&[])
    }
}

/// What a one-line text prompt is collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    NewAuthor,
    NewBook,
    NewSeries,
    SearchAuthors,
}

impl PromptKind {
    pub fn title(self) -> &'static str {
        match self {
            Self::NewAuthor => "New author name",
            Self::NewBook => "New book title",
            Self::NewSeries => "New series name",
            Self::SearchAuthors => "Find authors by name",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Prompt {
    pub kind: PromptKind,
    pub buffer: String,
}

/// Clamp a list cursor after the list changed length.
pub fn clamp_cursor(cursor: &mut usize, len: usize) {
    *cursor = (*cursor).min(len.saturating_sub(1));
}
