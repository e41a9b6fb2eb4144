use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{App, HOME_ITEMS, Screen};
use crate::view::footer_line;

pub fn render_in(f: &mut Frame, app: &App, area: Rect, footer_area: Rect) {
    let theme = &app.theme;
    let [intro_area, menu_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(3)]).areas(area);

    let intro = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(
                "  FastLibrarian",
                Style::default()
                    .fg(theme.active)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  connected to {}", app.api_url),
                Style::default().fg(theme.dim),
            ),
        ]),
    ];
    f.render_widget(Paragraph::new(intro), intro_area);

    let lines: Vec<Line> = HOME_ITEMS
        .iter()
        .enumerate()
        .map(|(i, screen)| {
            let selected = i == app.home_cursor;
            let cursor = if selected { "> " } else { "  " };
            let style = if selected {
                theme.highlight_style().fg(theme.text)
            } else {
                Style::default().fg(theme.text)
            };
            Line::from(vec![
                Span::styled(format!("  {cursor}{:<16}", screen.title()), style),
                Span::styled(describe(screen), Style::default().fg(theme.dim)),
            ])
        })
        .collect();

    let menu = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style())
            .title(" Library "),
    );
    f.render_widget(menu, menu_area);

    f.render_widget(
        Paragraph::new(footer_line(
            None,
            " j/k:navigate  Enter:open  1/2/3:authors/books/series  ,:config  ?:help  q:quit",
            theme,
        )),
        footer_area,
    );
}

fn describe(screen: &Screen) -> &'static str {
    match screen {
        Screen::Authors => "Browse and find authors",
        Screen::Books => "All books with per-medium status",
        Screen::Series => "Book series",
        Screen::Config => "Server configuration",
        _ => "",
    }
}
