use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::{App, split_status_row};
use crate::view::books::{book_table, failure_summary};
use crate::view::{fetch_placeholder, footer_line, spinner_char};

pub fn render_in(f: &mut Frame, app: &App, area: Rect, footer_area: Rect) {
    let theme = &app.theme;
    let Some(state) = &app.author else {
        return;
    };
    let (main_area, status_area) = split_status_row(area);

    let footer = " j/k:navigate  Enter:open book  e/u/p:status  R:fetch books  r:reload  Esc:back";
    f.render_widget(Paragraph::new(footer_line(None, footer, theme)), footer_area);

    let Some(author) = state.record.data() else {
        let lines = fetch_placeholder(&state.record, "author", app.tick, theme).unwrap_or_default();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style())
            .title(" Author ");
        f.render_widget(Paragraph::new(lines).block(block), main_area);
        return;
    };

    let [info_area, books_area] =
        Layout::vertical([Constraint::Length(7), Constraint::Min(4)]).areas(main_area);

    let label = Style::default().fg(theme.dim);
    let mut lines = vec![Line::from(Span::styled(
        format!(" {}", author.name),
        Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
    ))];
    if let Some(hardcover) = author.hardcover_id() {
        lines.push(Line::from(vec![
            Span::styled(" Hardcover ID: ", label),
            Span::styled(hardcover, Style::default().fg(theme.active)),
        ]));
    }
    lines.push(Line::from(Span::styled(
        format!(" {}", author.bio.as_deref().unwrap_or("No biography.")),
        Style::default().fg(theme.text),
    )));
    let info = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style())
                .title(" Author "),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(info, info_area);

    let books = state.books();
    if books.is_empty() {
        let hint = Line::from(Span::styled(
            " No books yet. Press R to fetch them from Hardcover.",
            label,
        ));
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style())
            .title(" Books ");
        f.render_widget(Paragraph::new(vec![Line::from(""), hint]).block(block), books_area);
    } else {
        let title = format!(" Books ({}) ", books.len());
        book_table(f, books_area, books, &state.board, state.cursor, &title, app.tick, theme);
    }

    let status = if state.updating {
        Span::styled(
            format!(" {} Fetching books...", spinner_char(app.tick)),
            Style::default().fg(theme.spinner),
        )
    } else if let Some(err) = &state.update_error {
        Span::styled(format!(" {err}"), theme.error_style())
    } else if let Some(text) = state.selected().and_then(|b| failure_summary(&state.board, b)) {
        Span::styled(text, theme.error_style())
    } else {
        Span::raw("")
    };
    f.render_widget(Paragraph::new(Line::from(status)), status_area);
}
