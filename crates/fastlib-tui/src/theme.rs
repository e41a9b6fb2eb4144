use ratatui::style::{Color, Modifier, Style};

use fastlib_client::BookStatus;

/// Color theme for the TUI.
pub struct Theme {
    pub wanted: Color,
    pub have: Color,
    pub ignored: Color,
    pub delete: Color,
    pub error: Color,
    pub success: Color,

    pub header_fg: Color,
    pub header_bg: Color,
    pub border: Color,
    pub text: Color,
    pub dim: Color,
    pub highlight_bg: Color,
    pub active: Color,
    pub spinner: Color,
    pub dirty: Color,
    pub footer_fg: Color,
    pub footer_bg: Color,
}

impl Theme {
    /// Hacker-green terminal theme.
    pub fn hacker() -> Self {
        Self {
            wanted: Color::Yellow,
            have: Color::Rgb(0, 210, 0),
            ignored: Color::DarkGray,
            delete: Color::Red,
            error: Color::Red,
            success: Color::Rgb(0, 210, 0),

            header_fg: Color::Black,
            header_bg: Color::Rgb(0, 210, 0),
            border: Color::DarkGray,
            text: Color::White,
            dim: Color::DarkGray,
            highlight_bg: Color::Rgb(30, 50, 30),
            active: Color::Cyan,
            spinner: Color::Cyan,
            dirty: Color::Yellow,
            footer_fg: Color::DarkGray,
            footer_bg: Color::Reset,
        }
    }

    /// Modern theme: white text, electric blue accents, dark blue header.
    pub fn modern() -> Self {
        Self {
            wanted: Color::Rgb(255, 200, 0),
            have: Color::Rgb(0, 200, 80),
            ignored: Color::Rgb(120, 120, 140),
            delete: Color::Rgb(255, 80, 80),
            error: Color::Rgb(255, 80, 80),
            success: Color::Rgb(0, 200, 80),

            header_fg: Color::White,
            header_bg: Color::Rgb(30, 60, 120),
            border: Color::Rgb(60, 60, 80),
            text: Color::White,
            dim: Color::Rgb(120, 120, 140),
            highlight_bg: Color::Rgb(30, 40, 80),
            active: Color::Rgb(60, 140, 255),
            spinner: Color::Rgb(60, 140, 255),
            dirty: Color::Rgb(255, 200, 0),
            footer_fg: Color::Rgb(120, 120, 140),
            footer_bg: Color::Reset,
        }
    }

    /// Look a theme up by name, falling back to hacker.
    pub fn named(name: &str) -> Self {
        match name {
            "modern" => Self::modern(),
            _ => Self::hacker(),
        }
    }

    pub fn status_color(&self, status: Option<BookStatus>) -> Color {
        match status {
            Some(BookStatus::Wanted) => self.wanted,
            Some(BookStatus::Have) => self.have,
            Some(BookStatus::Ignored) => self.ignored,
            Some(BookStatus::Delete) => self.delete,
            None => self.dim,
        }
    }

    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.header_fg)
            .bg(self.header_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn highlight_style(&self) -> Style {
        Style::default()
            .bg(self.highlight_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn footer_style(&self) -> Style {
        Style::default().fg(self.footer_fg).bg(self.footer_bg)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error).add_modifier(Modifier::BOLD)
    }
}
