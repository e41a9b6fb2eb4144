use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};

use crate::app::{App, split_status_row};
use crate::view::{fetch_placeholder, footer_line, spinner_char, truncate};

pub fn render_in(f: &mut Frame, app: &App, area: Rect, footer_area: Rect) {
    let theme = &app.theme;
    let state = &app.series;
    let (list_area, status_area) = split_status_row(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style());

    if let Some(lines) = fetch_placeholder(&state.list, "series", app.tick, theme) {
        f.render_widget(Paragraph::new(lines).block(block.title(" Series ")), list_area);
    } else {
        let series = state.list.data().map_or(&[][..], Vec::as_slice);
        let desc_width = (list_area.width as usize).saturating_sub(40);
        let rows: Vec<Row> = series
            .iter()
            .map(|s| {
                Row::new(vec![
                    Cell::from(s.name.clone()),
                    Cell::from(truncate(s.description.as_deref().unwrap_or(""), desc_width))
                        .style(Style::default().fg(theme.dim)),
                ])
            })
            .collect();
        let header = Row::new(["Name", "Description"].map(|h| {
            Cell::from(h).style(Style::default().fg(theme.text).add_modifier(Modifier::BOLD))
        }));
        let table = Table::new(rows, [Constraint::Length(36), Constraint::Min(10)])
            .header(header)
            .block(block.title(format!(" Series ({}) ", series.len())))
            .row_highlight_style(theme.highlight_style());
        let mut table_state = TableState::default();
        if !series.is_empty() {
            table_state.select(Some(state.cursor));
        }
        f.render_stateful_widget(table, list_area, &mut table_state);
    }

    let status = if state.creating {
        Span::styled(
            format!(" {} Adding series...", spinner_char(app.tick)),
            Style::default().fg(theme.spinner),
        )
    } else if let Some(err) = &state.create_error {
        Span::styled(format!(" {err}"), theme.error_style())
    } else {
        Span::raw("")
    };
    f.render_widget(Paragraph::new(Line::from(status)), status_area);

    f.render_widget(
        Paragraph::new(footer_line(
            None,
            " j/k:navigate  n:new series  r:reload  Esc:back  ?:help",
            theme,
        )),
        footer_area,
    );
}
