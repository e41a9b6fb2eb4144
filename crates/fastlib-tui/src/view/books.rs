use fastlib_client::{Book, Medium, StatusBoard};
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};

use crate::app::{App, split_status_row};
use crate::theme::Theme;
use crate::view::{fetch_placeholder, footer_line, spinner_char, truncate};

pub fn render_in(f: &mut Frame, app: &App, area: Rect, footer_area: Rect) {
    let theme = &app.theme;
    let state = &app.books;
    let (list_area, status_area) = split_status_row(area);

    if let Some(lines) = fetch_placeholder(&state.list, "books", app.tick, theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style())
            .title(" Books ");
        f.render_widget(Paragraph::new(lines).block(block), list_area);
    } else {
        let books = state.books();
        let title = format!(" Books ({}) ", books.len());
        book_table(f, list_area, books, &state.board, state.cursor, &title, app.tick, theme);
    }

    let status = if state.creating {
        Span::styled(
            format!(" {} Adding book...", spinner_char(app.tick)),
            Style::default().fg(theme.spinner),
        )
    } else if let Some(err) = &state.create_error {
        Span::styled(format!(" {err}"), theme.error_style())
    } else if let Some(text) = state.selected().and_then(|b| failure_summary(&state.board, b)) {
        Span::styled(text, theme.error_style())
    } else {
        Span::raw("")
    };
    f.render_widget(Paragraph::new(Line::from(status)), status_area);

    f.render_widget(
        Paragraph::new(footer_line(
            None,
            " j/k:navigate  Enter:open  e/u/p:ebook/audio/physical status  n:new book  r:reload  Esc:back",
            theme,
        )),
        footer_area,
    );
}

/// Table of books with one status column per medium. Shared by the book
/// list and the author detail screen.
#[allow(clippy::too_many_arguments)]
pub fn book_table(
    f: &mut Frame,
    area: Rect,
    books: &[Book],
    board: &StatusBoard,
    cursor: usize,
    title: &str,
    tick: usize,
    theme: &Theme,
) {
    let wide = area.width >= 90;
    let title_width = if wide {
        (area.width as usize).saturating_sub(70)
    } else {
        (area.width as usize).saturating_sub(40)
    };

    let mut header_cells = vec!["Title"];
    if wide {
        header_cells.extend(["Authors", "Series"]);
    }
    header_cells.extend(["Ebook", "Audio", "Physical"]);
    let header = Row::new(header_cells.into_iter().map(|h| {
        Cell::from(h).style(Style::default().fg(theme.text).add_modifier(Modifier::BOLD))
    }));

    let rows: Vec<Row> = books
        .iter()
        .map(|book| {
            let mut cells = vec![Cell::from(truncate(&book.title, title_width))];
            if wide {
                cells.push(
                    Cell::from(truncate(&book.author_names().unwrap_or_default(), 18))
                        .style(Style::default().fg(theme.dim)),
                );
                cells.push(
                    Cell::from(truncate(&book.series_names().unwrap_or_default(), 14))
                        .style(Style::default().fg(theme.dim)),
                );
            }
            cells.extend(
                Medium::all()
                    .iter()
                    .map(|&medium| status_cell(book, medium, board, tick, theme)),
            );
            Row::new(cells)
        })
        .collect();

    let mut widths = vec![Constraint::Min(12)];
    if wide {
        widths.extend([Constraint::Length(18), Constraint::Length(14)]);
    }
    widths.extend([Constraint::Length(11); 3]);

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style())
                .title(title.to_string()),
        )
        .row_highlight_style(theme.highlight_style());

    let mut state = TableState::default();
    if !books.is_empty() {
        state.select(Some(cursor));
    }
    f.render_stateful_widget(table, area, &mut state);
}

/// Failed status updates of `book`, e.g. ` Audio: connection refused`.
pub fn failure_summary(board: &StatusBoard, book: &Book) -> Option<String> {
    let parts: Vec<String> = Medium::all()
        .iter()
        .filter_map(|&m| board.failure(&book.id, m).map(|msg| format!("{}: {msg}", m.label())))
        .collect();
    (!parts.is_empty()).then(|| format!(" {}", parts.join("  ")))
}

/// Current value of one medium, or the in-flight / failed update for it.
fn status_cell<'a>(
    book: &Book,
    medium: Medium,
    board: &StatusBoard,
    tick: usize,
    theme: &Theme,
) -> Cell<'a> {
    let current = book.status_for(medium);
    let label = current.map_or("\u{2014}", |s| s.label());

    let (text, mut style) = if let Some(pending) = board.pending(&book.id, medium) {
        (
            format!("{} {}", spinner_char(tick), pending.label()),
            Style::default().fg(theme.status_color(Some(pending))),
        )
    } else if board.failure(&book.id, medium).is_some() {
        (format!("! {label}"), theme.error_style())
    } else {
        (label.to_string(), Style::default().fg(theme.status_color(current)))
    };

    if board.is_open(&book.id, medium) {
        style = style.add_modifier(Modifier::REVERSED);
    }
    Cell::from(text).style(style)
}
