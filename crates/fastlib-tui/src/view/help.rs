use ratatui::Frame;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::theme::Theme;
use crate::view::centered_rect;

/// Render the help overlay as a centered popup.
pub fn render(f: &mut Frame, theme: &Theme) {
    let popup = centered_rect(72, 44, f.area());

    let lines = vec![
        Line::from(Span::styled(
            " Keyboard Shortcuts ",
            Style::default()
                .fg(theme.header_fg)
                .bg(theme.header_bg)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section_header("Navigation", theme),
        key_line("j / \u{2193}", "Move down", theme),
        key_line("k / \u{2191}", "Move up", theme),
        key_line("g / Home", "Go to top", theme),
        key_line("G / End", "Go to bottom", theme),
        key_line("Enter", "Open / select", theme),
        key_line("Esc", "Go back / close dropdown", theme),
        key_line("h", "Home", theme),
        key_line("1 / 2 / 3", "Authors / Books / Series", theme),
        key_line(",", "Server configuration", theme),
        Line::from(""),
        section_header("Library", theme),
        key_line("e / u / p", "Ebook / audio / physical status", theme),
        key_line("n", "Add author, book or series", theme),
        key_line("/", "Find authors (Authors screen)", theme),
        key_line("Tab", "Switch list / search results", theme),
        key_line("R", "Fetch an author's books from Hardcover", theme),
        key_line("r", "Retry a failed load", theme),
        Line::from(""),
        section_header("Configuration", theme),
        key_line("Tab", "Next section", theme),
        key_line("Enter / Space", "Edit or toggle a field", theme),
        key_line("n / d", "Add / remove origin or client", theme),
        key_line("Ctrl+s", "Save", theme),
        key_line("x", "Discard unsaved changes", theme),
        key_line("L", "Reload configuration from file", theme),
        key_line("t", "Raw TOML editor", theme),
        key_line("Ctrl+v", "Validate raw TOML", theme),
        Line::from(""),
        section_header("Global", theme),
        key_line("?", "Toggle this help", theme),
        key_line("q", "Quit", theme),
        key_line("Ctrl+c", "Force quit", theme),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.active))
                .title(" Help "),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}

fn section_header<'a>(title: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(Span::styled(
        format!("  {title}"),
        Style::default()
            .fg(theme.active)
            .add_modifier(Modifier::BOLD),
    ))
}

fn key_line<'a>(key: &'a str, desc: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("    {key:<16}"), Style::default().fg(theme.text)),
        Span::styled(desc, Style::default().fg(theme.dim)),
    ])
}
