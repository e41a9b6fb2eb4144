use fastlib_client::Medium;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::App;
use crate::view::{fetch_placeholder, footer_line, spinner_char};

pub fn render_in(f: &mut Frame, app: &App, area: Rect, footer_area: Rect) {
    let theme = &app.theme;
    let Some(state) = &app.book else {
        return;
    };

    f.render_widget(
        Paragraph::new(footer_line(
            None,
            " j/k:select author  Enter:open author  e/u/p:status  r:reload  Esc:back",
            theme,
        )),
        footer_area,
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(" Book ");

    let Some(book) = state.record.data() else {
        let lines = fetch_placeholder(&state.record, "book", app.tick, theme).unwrap_or_default();
        f.render_widget(Paragraph::new(lines).block(block), area);
        return;
    };

    let label = Style::default().fg(theme.dim);
    let mut lines = vec![
        Line::from(Span::styled(
            format!(" {}", book.title),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    lines.push(Line::from(Span::styled(" Authors", label)));
    if book.authors.is_empty() {
        lines.push(Line::from(Span::styled("   (none)", label)));
    }
    for (i, author) in book.authors.iter().enumerate() {
        let selected = i == state.cursor;
        let style = if selected {
            theme.highlight_style().fg(theme.text)
        } else {
            Style::default().fg(theme.text)
        };
        let cursor = if selected { "> " } else { "  " };
        lines.push(Line::from(Span::styled(format!(" {cursor}{}", author.name), style)));
    }

    if let Some(series) = book.series_names() {
        lines.push(Line::from(vec![
            Span::styled(" Series: ", label),
            Span::styled(series, Style::default().fg(theme.text)),
        ]));
    }
    lines.push(Line::from(""));

    for &medium in Medium::all() {
        let current = book.status_for(medium);
        let mut spans = vec![Span::styled(format!(" {:<10}", medium.label()), label)];
        if let Some(pending) = state.board.pending(&book.id, medium) {
            spans.push(Span::styled(
                format!("{} {}", spinner_char(app.tick), pending.label()),
                Style::default().fg(theme.status_color(Some(pending))),
            ));
        } else {
            let mut style = Style::default().fg(theme.status_color(current));
            if state.board.is_open(&book.id, medium) {
                style = style.add_modifier(Modifier::REVERSED);
            }
            spans.push(Span::styled(
                current.map_or("\u{2014}", |s| s.label()).to_string(),
                style,
            ));
        }
        if let Some(err) = state.board.failure(&book.id, medium) {
            spans.push(Span::styled(format!("  ! {err}"), theme.error_style()));
        }
        lines.push(Line::from(spans));
    }

    if let Some(description) = &book.description {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {description}"),
            Style::default().fg(theme.text),
        )));
    }

    f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}
