use fastlib_client::model::display_json;
use fastlib_client::{ConfigEditor, ConfigSection, ServerConfig};
use serde_json::Value;

use crate::app::Screen;

/// One selectable line of the structured config view.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigRow {
    Field { key: String, value: Value },
    CorsOrigin(String),
    AddCorsOrigin,
    /// First line of download client `index`.
    ClientHeader(usize),
    ClientField { index: usize, key: String, value: Value },
    AddClient,
}

/// Where a finished text edit is written back to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTarget {
    Field { section: ConfigSection, key: String },
    ClientField { index: usize, key: String },
    NewCorsOrigin,
}

/// Where to go once the unsaved-changes prompt is answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingExit {
    Back,
    To(Screen),
}

/// State for the config screen.
#[derive(Debug, Default)]
pub struct ConfigState {
    pub editor: ConfigEditor,
    pub section: ConfigSection,
    pub item_cursor: usize,
    pub editing: Option<EditTarget>,
    pub edit_buffer: String,
    pub edit_error: Option<String>,
    /// Set while the "unsaved changes" prompt is showing.
    pub confirm_exit: Option<PendingExit>,
}

impl ConfigState {
    /// Rows of the current section, or nothing before the first load.
    pub fn rows(&self) -> Vec<ConfigRow> {
        self.editor
            .working()
            .map(|c| rows(c, self.section))
            .unwrap_or_default()
    }

    pub fn current_row(&self) -> Option<ConfigRow> {
        self.rows().into_iter().nth(self.item_cursor)
    }

    pub fn next_section(&mut self) {
        self.section = self.section.next();
        self.item_cursor = 0;
    }

    /// Mask a secret for display: show first 4 chars then asterisks.
    pub fn mask_key(key: &str) -> String {
        if key.is_empty() {
            "(not set)".to_string()
        } else if key.chars().count() <= 4 {
            "*".repeat(key.chars().count())
        } else {
            let head: String = key.chars().take(4).collect();
            format!("{}{}", head, "*".repeat(key.chars().count() - 4))
        }
    }
}

/// Build the row list for `section`. The API section lists CORS origins
/// one per row; download clients expand into a header plus their fields.
pub fn rows(config: &ServerConfig, section: ConfigSection) -> Vec<ConfigRow> {
    match section {
        ConfigSection::DownloadClients => {
            let mut rows = Vec::new();
            for (index, client) in config.download_clients.iter().enumerate() {
                rows.push(ConfigRow::ClientHeader(index));
                if let Ok(Value::Object(fields)) = serde_json::to_value(client) {
                    rows.extend(fields.into_iter().map(|(key, value)| ConfigRow::ClientField {
                        index,
                        key,
                        value,
                    }));
                }
            }
            rows.push(ConfigRow::AddClient);
            rows
        }
        ConfigSection::Api => {
            let mut rows: Vec<ConfigRow> = config
                .fields(section)
                .into_iter()
                .filter(|(key, _)| key != "cors_origins")
                .map(|(key, value)| ConfigRow::Field { key, value })
                .collect();
            rows.extend(
                config
                    .api
                    .cors_origins
                    .iter()
                    .cloned()
                    .map(ConfigRow::CorsOrigin),
            );
            rows.push(ConfigRow::AddCorsOrigin);
            rows
        }
        _ => config
            .fields(section)
            .into_iter()
            .map(|(key, value)| ConfigRow::Field { key, value })
            .collect(),
    }
}

/// Text placed in the edit buffer when editing starts.
pub fn edit_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_json)
            .collect::<Vec<_>>()
            .join(", "),
        other => display_json(other),
    }
}
