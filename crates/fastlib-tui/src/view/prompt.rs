use ratatui::Frame;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::model::library::Prompt;
use crate::theme::Theme;
use crate::view::{centered_rect, truncate};

/// One-line text entry popup.
pub fn render(f: &mut Frame, prompt: &Prompt, theme: &Theme) {
    let popup = centered_rect(56, 5, f.area());
    let width = (popup.width as usize).saturating_sub(6);

    // Keep the tail visible while typing past the edge.
    let shown: String = {
        let count = prompt.buffer.chars().count();
        prompt.buffer.chars().skip(count.saturating_sub(width)).collect()
    };

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(
                "  > ",
                Style::default()
                    .fg(theme.active)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(shown, Style::default().fg(theme.text)),
            Span::styled("\u{2588}", Style::default().fg(theme.active)),
        ]),
        Line::from(Span::styled(
            truncate("  Enter: confirm   Esc: cancel", width + 4),
            Style::default().fg(theme.dim),
        )),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.active))
            .title(format!(" {} ", prompt.kind.title())),
    );

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}
