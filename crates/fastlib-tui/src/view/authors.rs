use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::app::{App, split_status_row};
use crate::model::library::{AuthorsFocus, AuthorsState};
use crate::theme::Theme;
use crate::view::{fetch_placeholder, footer_line, spinner_char, truncate};

pub fn render_in(f: &mut Frame, app: &App, area: Rect, footer_area: Rect) {
    let theme = &app.theme;
    let state = &app.authors;
    let (main_area, status_area) = split_status_row(area);

    let show_search = !state.search.query().is_empty() || state.search.is_searching();
    if show_search {
        let [list_area, search_area] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(main_area);
        render_list(f, list_area, app);
        render_results(f, search_area, state, app.tick, theme);
    } else {
        render_list(f, main_area, app);
    }

    let status = if state.creating {
        Span::styled(
            format!(" {} Adding author...", spinner_char(app.tick)),
            Style::default().fg(theme.spinner),
        )
    } else if let Some(err) = &state.create_error {
        Span::styled(format!(" {err}"), theme.error_style())
    } else {
        Span::raw("")
    };
    f.render_widget(Paragraph::new(Line::from(status)), status_area);

    let hints = match state.focus {
        AuthorsFocus::List => {
            " j/k:navigate  Enter:open  /:find  Tab:results  n:new author  r:reload  Esc:back"
        }
        AuthorsFocus::Results => " j/k:navigate  Enter:open or add  /:find  Tab:library  Esc:library",
    };
    f.render_widget(Paragraph::new(footer_line(None, hints, theme)), footer_area);
}

fn pane_block<'a>(title: String, focused: bool, theme: &Theme) -> Block<'a> {
    let border = if focused {
        Style::default().fg(theme.active)
    } else {
        theme.border_style()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(title)
}

fn render_list(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let state = &app.authors;
    let focused = state.focus == AuthorsFocus::List;

    if let Some(lines) = fetch_placeholder(&state.list, "authors", app.tick, theme) {
        let block = pane_block(" Authors ".to_string(), focused, theme);
        f.render_widget(Paragraph::new(lines).block(block), area);
        return;
    }

    let authors = state.list.data().map_or(&[][..], Vec::as_slice);
    let width = (area.width as usize).saturating_sub(4);
    let items: Vec<ListItem> = authors
        .iter()
        .map(|a| {
            let mut spans = vec![Span::styled(
                truncate(&a.name, width),
                Style::default().fg(theme.text),
            )];
            if !a.books.is_empty() {
                spans.push(Span::styled(
                    format!("  ({} books)", a.books.len()),
                    Style::default().fg(theme.dim),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(pane_block(format!(" Authors ({}) ", authors.len()), focused, theme))
        .highlight_style(theme.highlight_style());
    let mut list_state = ListState::default();
    if focused && !authors.is_empty() {
        list_state.select(Some(state.cursor));
    }
    f.render_stateful_widget(list, area, &mut list_state);
}

fn render_results(f: &mut Frame, area: Rect, state: &AuthorsState, tick: usize, theme: &Theme) {
    let focused = state.focus == AuthorsFocus::Results;
    let title = format!(" Find: {} ", truncate(state.search.query(), 30));
    let block = pane_block(title, focused, theme);

    if state.search.is_searching() {
        let line = Span::styled(
            format!(" {} Searching...", spinner_char(tick)),
            Style::default().fg(theme.spinner),
        );
        f.render_widget(Paragraph::new(vec![Line::from(""), Line::from(line)]).block(block), area);
        return;
    }
    if let Some(err) = state.search.error() {
        let line = Span::styled(format!(" Error: {err}  (r to retry)"), theme.error_style());
        f.render_widget(Paragraph::new(vec![Line::from(""), Line::from(line)]).block(block), area);
        return;
    }
    if state.search.shows_empty_notice() {
        let line = Span::styled(" No authors found.", Style::default().fg(theme.dim));
        f.render_widget(Paragraph::new(vec![Line::from(""), Line::from(line)]).block(block), area);
        return;
    }

    let width = (area.width as usize).saturating_sub(16);
    let items: Vec<ListItem> = state
        .search
        .results()
        .iter()
        .map(|found| {
            let (tag, tag_style) = if found.in_db {
                ("(in DB)", Style::default().fg(theme.success))
            } else {
                (
                    "(external)",
                    Style::default().fg(theme.dim).add_modifier(Modifier::ITALIC),
                )
            };
            ListItem::new(Line::from(vec![
                Span::styled(truncate(&found.name, width), Style::default().fg(theme.text)),
                Span::raw("  "),
                Span::styled(tag, tag_style),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(theme.highlight_style());
    let mut list_state = ListState::default();
    if focused && !state.search.results().is_empty() {
        list_state.select(Some(state.result_cursor));
    }
    f.render_stateful_widget(list, area, &mut list_state);
}
