use ratatui::Frame;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::theme::Theme;
use crate::view::centered_rect;

/// Render the unsaved config changes confirmation dialog as a centered popup.
pub fn render(f: &mut Frame, theme: &Theme) {
    let popup = centered_rect(52, 5, f.area());

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Unsaved server config changes. Save before leaving?",
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(
                "  y",
                Style::default()
                    .fg(theme.success)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(": save   ", Style::default().fg(theme.dim)),
            Span::styled(
                "n",
                Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
            ),
            Span::styled(": discard   ", Style::default().fg(theme.dim)),
            Span::styled(
                "Esc",
                Style::default()
                    .fg(theme.active)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(": cancel", Style::default().fg(theme.dim)),
        ]),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.dirty))
            .title(" Unsaved Changes "),
    );

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}
