use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::App;
use crate::model::activity::ActivityLevel;
use crate::view::truncate;

/// Render the activity panel (newest entry on top) in the given area.
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let visible = area.height.saturating_sub(2) as usize;
    let width = area.width.saturating_sub(3) as usize;

    let mut lines: Vec<Line> = app
        .activity
        .recent()
        .take(visible)
        .map(|entry| {
            let style = match entry.level {
                ActivityLevel::Info => Style::default().fg(theme.text),
                ActivityLevel::Error => Style::default().fg(theme.error),
            };
            Line::from(Span::styled(format!(" {}", truncate(&entry.line(), width)), style))
        })
        .collect();

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            " (no activity yet)",
            Style::default().fg(theme.dim),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(Span::styled(
            " Activity ",
            Style::default()
                .fg(theme.active)
                .add_modifier(Modifier::BOLD),
        ));
    f.render_widget(Paragraph::new(lines).block(block), area);
}
