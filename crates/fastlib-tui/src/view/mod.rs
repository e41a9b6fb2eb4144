pub mod activity;
pub mod author;
pub mod authors;
pub mod book;
pub mod books;
pub mod config;
pub mod config_confirm;
pub mod help;
pub mod home;
pub mod prompt;
pub mod quit_confirm;
pub mod series;
pub mod status;

use fastlib_client::{Fetch, FetchState};
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};

use crate::theme::Theme;

/// Spinner frames for animated progress indication.
const SPINNER_FRAMES: &[char] = &[
    '\u{280B}', '\u{2819}', '\u{2839}', '\u{2838}', '\u{283C}', '\u{2834}', '\u{2826}', '\u{2827}',
    '\u{2807}', '\u{280F}',
];

/// Get the current spinner character based on a tick counter.
pub fn spinner_char(tick: usize) -> char {
    SPINNER_FRAMES[tick % SPINNER_FRAMES.len()]
}

/// Truncate a string to fit in `max_width` columns, appending "\u{2026}" if truncated.
pub fn truncate(s: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if s.chars().count() <= max_width {
        return s.to_string();
    }
    let mut truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
    truncated.push('\u{2026}');
    truncated
}

/// Create a centered rectangle of the given width (columns) and height (rows).
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let [vertical] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(vertical);
    popup
}

/// What to show in place of a record that has not loaded.
///
/// `None` means the data is there and the caller renders it.
pub fn fetch_placeholder<T>(
    fetch: &Fetch<T>,
    what: &str,
    tick: usize,
    theme: &Theme,
) -> Option<Vec<Line<'static>>> {
    let line = match fetch.state() {
        FetchState::Loaded(_) => return None,
        FetchState::Idle => Span::styled("", Style::default()),
        FetchState::Loading => Span::styled(
            format!(" {} Loading {what}...", spinner_char(tick)),
            Style::default().fg(theme.spinner),
        ),
        FetchState::NotFound => {
            let mut name = what.to_string();
            if let Some(first) = name.get_mut(0..1) {
                first.make_ascii_uppercase();
            }
            Span::styled(format!(" {name} not found"), theme.error_style())
        }
        FetchState::Failed(msg) => Span::styled(
            format!(" Error: {msg}  (r to retry)"),
            theme.error_style(),
        ),
    };
    Some(vec![Line::from(""), Line::from(line)])
}

/// A footer line of key hints, optionally led by a highlighted badge.
pub fn footer_line<'a>(badge: Option<&'a str>, hints: &'a str, theme: &Theme) -> Line<'a> {
    let mut spans = Vec::new();
    if let Some(badge) = badge {
        spans.push(Span::styled(badge, theme.header_style()));
    }
    spans.push(Span::styled(hints, theme.footer_style()));
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_chars_not_bytes() {
        assert_eq!(truncate("Les Misérables", 20), "Les Misérables");
        assert_eq!(truncate("abcdef", 4), "abc\u{2026}");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn placeholder_names_the_missing_record() {
        let mut counter = fastlib_client::GenerationCounter::new();
        let mut fetch: Fetch<String> = Fetch::new();
        let generation = fetch.begin(&mut counter);
        fetch.resolve(
            generation,
            Err(fastlib_client::ApiError::Status {
                status: 404,
                detail: None,
            }),
        );
        let lines = fetch_placeholder(&fetch, "book", 0, &Theme::hacker()).unwrap();
        assert_eq!(lines[1].to_string(), " Book not found");
    }

    #[test]
    fn loaded_data_has_no_placeholder() {
        let mut fetch: Fetch<String> = Fetch::new();
        fetch.replace("x".into());
        assert!(fetch_placeholder(&fetch, "book", 0, &Theme::hacker()).is_none());
    }
}
