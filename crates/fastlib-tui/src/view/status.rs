//! The per-medium status dropdown, drawn over whichever list owns it.

use fastlib_client::BookStatus;
use ratatui::Frame;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::app::App;
use crate::view::centered_rect;

pub fn render(f: &mut Frame, app: &App) {
    let Some(board) = app.active_board() else {
        return;
    };
    let Some(token) = board.active() else {
        return;
    };
    let theme = &app.theme;

    let title = app
        .books
        .books()
        .iter()
        .chain(app.author.iter().flat_map(|a| a.books()))
        .chain(app.book.iter().flat_map(|b| b.books()))
        .find(|b| b.id == token.book_id)
        .map_or_else(|| token.book_id.clone(), |b| b.title.clone());

    let height = BookStatus::all().len() as u16 + 4;
    let popup = centered_rect(36, height, f.area());

    let mut lines = vec![Line::from(Span::styled(
        format!(" {}", crate::view::truncate(&title, 32)),
        Style::default().fg(theme.dim),
    ))];
    lines.push(Line::from(""));
    for &status in BookStatus::all() {
        let selected = status == board.highlighted();
        let marker = if selected { "> " } else { "  " };
        let mut style = Style::default().fg(theme.status_color(Some(status)));
        if selected {
            style = style.bg(theme.highlight_bg).add_modifier(Modifier::BOLD);
        }
        lines.push(Line::from(Span::styled(
            format!(" {marker}{:<12}", status.label()),
            style,
        )));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.active))
            .title(format!(" {} status ", token.medium.label())),
    );

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}
