use fastlib_client::model::display_json;
use fastlib_client::server_config::is_secret;
use fastlib_client::{ConfigEditor, ConfigSection, EditorMode};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use serde_json::Value;

use crate::app::App;
use crate::model::config::{ConfigRow, ConfigState, EditTarget, edit_text};
use crate::theme::Theme;
use crate::view::{fetch_placeholder, footer_line, spinner_char};

/// Render the config screen into the given area.
pub fn render_in(f: &mut Frame, app: &App, area: Rect, footer_area: Rect) {
    let theme = &app.theme;
    let config = &app.config;
    let editor = &config.editor;

    let [tabs_area, health_area, content_area, message_area] = Layout::vertical([
        Constraint::Length(1), // section tabs
        Constraint::Length(1), // health + dirty
        Constraint::Min(5),    // content
        Constraint::Length(1), // notices and errors
    ])
    .areas(area);

    render_tabs(f, tabs_area, config, theme);
    render_health(f, health_area, app);

    if editor.mode() == EditorMode::Raw {
        render_raw(f, content_area, app);
    } else {
        render_rows(f, content_area, app);
    }

    render_message(f, message_area, config, theme);

    let (badge, hints) = if editor.mode() == EditorMode::Raw {
        (
            Some(" RAW "),
            " type to edit  Enter:newline  Ctrl+s:save  Ctrl+v:validate  Esc:structured view",
        )
    } else if config.editing.is_some() {
        (Some(" EDIT "), " Enter:apply  Esc:cancel")
    } else {
        let hints = match config.section {
            ConfigSection::Api => {
                " j/k:navigate  Tab:section  Enter:edit  n/d:add/remove origin  Ctrl+s:save  x:discard  L:reload  t:raw"
            }
            ConfigSection::DownloadClients => {
                " j/k:navigate  Tab:section  Enter:edit/cycle type  n/d:add/remove client  Ctrl+s:save  x:discard  t:raw"
            }
            _ => {
                " j/k:navigate  Tab:section  Enter:edit  Space:toggle  Ctrl+s:save  x:discard  L:reload  t:raw"
            }
        };
        (None, hints)
    };
    f.render_widget(Paragraph::new(footer_line(badge, hints, theme)), footer_area);
}

fn render_tabs(f: &mut Frame, area: Rect, config: &ConfigState, theme: &Theme) {
    let changed = config.editor.changed_sections();
    let mut spans = Vec::new();
    for &section in ConfigSection::all() {
        let marker = if changed.contains(&section) { "*" } else { "" };
        if section == config.section {
            spans.push(Span::styled(
                format!(" [{}{marker}] ", section.label()),
                Style::default()
                    .fg(theme.header_fg)
                    .bg(theme.active)
                    .add_modifier(Modifier::BOLD),
            ));
        } else {
            let style = if marker.is_empty() {
                Style::default().fg(theme.dim)
            } else {
                Style::default().fg(theme.dirty)
            };
            spans.push(Span::styled(format!("  {}{marker}  ", section.label()), style));
        }
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_health(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let editor = &app.config.editor;
    let mut spans = vec![Span::styled(" Server: ", Style::default().fg(theme.dim))];

    match editor.health() {
        Some(health) => {
            let color = if health.is_healthy() {
                theme.success
            } else {
                theme.error
            };
            spans.push(Span::styled(
                health.badge(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ));
            if !health.config_file_exists {
                spans.push(Span::styled(
                    "  (no config file, using defaults)",
                    Style::default().fg(theme.dim),
                ));
            }
            if let Some(err) = &health.error {
                spans.push(Span::styled(format!("  {err}"), theme.error_style()));
            }
        }
        None => spans.push(Span::styled(
            format!("{} checking...", spinner_char(app.tick)),
            Style::default().fg(theme.spinner),
        )),
    }

    if editor.is_saving() {
        spans.push(Span::styled(
            format!("   {} Saving...", spinner_char(app.tick)),
            Style::default().fg(theme.spinner),
        ));
    } else if editor.is_reloading() {
        spans.push(Span::styled(
            format!("   {} Reloading...", spinner_char(app.tick)),
            Style::default().fg(theme.spinner),
        ));
    } else if editor.is_dirty() {
        spans.push(Span::styled(
            "   \u{25CF} unsaved changes",
            Style::default().fg(theme.dirty).add_modifier(Modifier::BOLD),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_rows(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let config = &app.config;
    let editor = &config.editor;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(format!(" {} ", config.section.label()));

    if editor.working().is_none() {
        let line = if let Some(err) = editor.load_error() {
            Span::styled(format!(" Error: {err}  (r to retry)"), theme.error_style())
        } else {
            Span::styled(
                format!(" {} Loading configuration...", spinner_char(app.tick)),
                Style::default().fg(theme.spinner),
            )
        };
        f.render_widget(Paragraph::new(vec![Line::from(""), Line::from(line)]).block(block), area);
        return;
    }

    let rows = config.rows();
    let lines: Vec<Line> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| row_line(row, i == config.item_cursor, config, editor, theme))
        .collect();

    // Keep the cursor row in view.
    let visible = area.height.saturating_sub(2) as usize;
    let scroll = (config.item_cursor + 1).saturating_sub(visible) as u16;
    f.render_widget(Paragraph::new(lines).block(block).scroll((scroll, 0)), area);
}

fn row_line<'a>(
    row: &ConfigRow,
    selected: bool,
    config: &ConfigState,
    editor: &ConfigEditor,
    theme: &Theme,
) -> Line<'a> {
    let cursor = if selected { "> " } else { "  " };
    let label_style = if selected {
        theme.highlight_style().fg(theme.text)
    } else {
        Style::default().fg(theme.text)
    };
    let value_style = Style::default().fg(theme.dim);
    let editing_style = Style::default().fg(theme.active);
    let buffer = || format!("{}\u{2588}", config.edit_buffer);

    match row {
        ConfigRow::Field { key, value } => {
            let target = EditTarget::Field {
                section: config.section,
                key: key.clone(),
            };
            let (text, style) = if config.editing.as_ref() == Some(&target) {
                (buffer(), editing_style)
            } else {
                (field_text(key, value), value_style)
            };
            Line::from(vec![
                Span::styled(format!("  {cursor}{key:<24}"), label_style),
                Span::styled(text, style),
            ])
        }
        ConfigRow::CorsOrigin(origin) => Line::from(vec![
            Span::styled(format!("  {cursor}{:<24}", "cors origin"), label_style),
            Span::styled(origin.clone(), value_style),
        ]),
        ConfigRow::AddCorsOrigin => {
            if config.editing == Some(EditTarget::NewCorsOrigin) {
                Line::from(vec![
                    Span::styled(format!("  {cursor}{:<24}", "new origin"), label_style),
                    Span::styled(buffer(), editing_style),
                ])
            } else {
                Line::from(Span::styled(
                    format!("  {cursor}+ add origin"),
                    label_style.fg(theme.active),
                ))
            }
        }
        ConfigRow::ClientHeader(index) => {
            let client_type = editor
                .working()
                .and_then(|c| c.download_clients.get(*index))
                .map_or("", |c| c.client_type.as_str());
            Line::from(Span::styled(
                format!("  {cursor}Client #{} ({client_type})", index + 1),
                label_style.add_modifier(Modifier::BOLD),
            ))
        }
        ConfigRow::ClientField { index, key, value } => {
            let target = EditTarget::ClientField {
                index: *index,
                key: key.clone(),
            };
            let (text, style) = if config.editing.as_ref() == Some(&target) {
                (buffer(), editing_style)
            } else {
                (field_text(key, value), value_style)
            };
            Line::from(vec![
                Span::styled(format!("  {cursor}  {key:<22}"), label_style),
                Span::styled(text, style),
            ])
        }
        ConfigRow::AddClient => Line::from(Span::styled(
            format!("  {cursor}+ add download client"),
            label_style.fg(theme.active),
        )),
    }
}

/// Display text for a field value, with secrets masked.
fn field_text(key: &str, value: &Value) -> String {
    match value {
        Value::Bool(true) => "[\u{2713}]".to_string(),
        Value::Bool(false) => "[ ]".to_string(),
        Value::Null => "(not set)".to_string(),
        _ if is_secret(key) => ConfigState::mask_key(&display_json(value)),
        Value::Array(_) => edit_text(value),
        other => display_json(other),
    }
}

fn render_raw(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let editor = &app.config.editor;

    let validation_height = if editor.validation().is_some() { 4 } else { 0 };
    let [text_area, validation_area] = Layout::vertical([
        Constraint::Min(3),
        Constraint::Length(validation_height),
    ])
    .areas(area);

    let mut title = " config.toml ".to_string();
    if editor.is_raw_saving() {
        title = format!(" config.toml {} saving ", spinner_char(app.tick));
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.active))
        .title(title);

    match editor.raw().data() {
        Some(text) => {
            let mut lines: Vec<Line> = text
                .split('\n')
                .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(theme.text))))
                .collect();
            if let Some(last) = lines.last_mut() {
                last.push_span(Span::styled("\u{2588}", Style::default().fg(theme.active)));
            }
            let visible = text_area.height.saturating_sub(2) as usize;
            let scroll = lines.len().saturating_sub(visible) as u16;
            f.render_widget(
                Paragraph::new(lines).block(block).scroll((scroll, 0)),
                text_area,
            );
        }
        None => {
            let lines = fetch_placeholder(editor.raw(), "configuration file", app.tick, theme)
                .unwrap_or_default();
            f.render_widget(Paragraph::new(lines).block(block), text_area);
        }
    }

    if let Some(validation) = editor.validation() {
        let mut lines = Vec::new();
        if validation.valid {
            lines.push(Line::from(Span::styled(
                " \u{2713} TOML and configuration are valid",
                Style::default().fg(theme.success),
            )));
        } else {
            let check = |ok: bool| if ok { "\u{2713}" } else { "\u{2717}" };
            lines.push(Line::from(Span::styled(
                format!(
                    " {} TOML syntax   {} configuration",
                    check(validation.toml_valid),
                    check(validation.config_valid)
                ),
                theme.error_style(),
            )));
            lines.extend(validation.errors.iter().map(|e| {
                Line::from(Span::styled(format!(" {e}"), Style::default().fg(theme.error)))
            }));
        }
        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(theme.border_style())
            .title(" Validation ");
        f.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
            validation_area,
        );
    }
}

fn render_message(f: &mut Frame, area: Rect, config: &ConfigState, theme: &Theme) {
    let editor = &config.editor;
    let span = if let Some(err) = &config.edit_error {
        Span::styled(format!(" {err}"), theme.error_style())
    } else if let Some(err) = editor.last_error() {
        Span::styled(format!(" {err}"), theme.error_style())
    } else if let Some(notice) = editor.notice() {
        Span::styled(format!(" {notice}"), Style::default().fg(theme.success))
    } else if editor.working().is_some()
        && let Some(err) = editor.load_error()
    {
        Span::styled(format!(" Reload failed: {err}"), theme.error_style())
    } else {
        Span::raw("")
    };
    f.render_widget(Paragraph::new(Line::from(span)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn secrets_are_masked() {
        assert_eq!(field_text("secret_key", &json!("abcdefgh")), "abcd****");
        assert_eq!(field_text("host", &json!("0.0.0.0")), "0.0.0.0");
        assert_eq!(field_text("hardcover_api_key", &json!("")), "(not set)");
    }

    #[test]
    fn booleans_render_as_checkboxes() {
        assert_eq!(field_text("echo", &json!(true)), "[\u{2713}]");
        assert_eq!(field_text("echo", &json!(false)), "[ ]");
    }
}
