use fastlib_client::ConfigSection;
use fastlib_client::server_config::coerce_input;
use serde_json::Value;

use super::{App, InputMode};
use crate::action::Action;
use crate::model::config::{ConfigRow, EditTarget, edit_text};
use crate::tui_event::ApiRequest;

impl App {
    /// Fetches issued when the config screen is shown.
    pub(super) fn mount_config(&mut self) {
        // A save in flight owns the baseline; a dirty draft (left behind by a
        // failed "save & leave") is only replaced by an explicit reload.
        if self.config.editor.is_saving() || self.config.editor.is_dirty() {
            tracing::debug!("keeping config draft, skipping load");
            self.fetch_health();
        } else {
            self.load_config();
        }
        let generation = self.config.editor.begin_client_types(&mut self.generations);
        self.send_read(generation, ApiRequest::DownloadClientTypes);
    }

    /// Re-load the structured config and its health badge.
    pub(super) fn load_config(&mut self) {
        let generation = self.config.editor.begin_load(&mut self.generations);
        self.send_read(generation, ApiRequest::GetConfig);
        self.fetch_health();
    }

    pub(super) fn fetch_health(&mut self) {
        let generation = self.config.editor.begin_health(&mut self.generations);
        self.send_read(generation, ApiRequest::ConfigHealth);
    }

    /// Normal-mode keys that only mean something on the config screen.
    pub(super) fn handle_config_action(&mut self, action: Action) {
        self.config.edit_error = None;
        self.config.editor.clear_messages();
        match action {
            Action::Toggle => self.handle_config_space(),
            Action::SaveConfig => self.save_config(),
            Action::ResetConfig => {
                if self.config.editor.is_dirty() {
                    self.config.editor.reset_changes();
                    self.activity.info("Discarded unsaved configuration changes");
                }
                self.clamp_cursors();
            }
            Action::ReloadConfig => {
                if self.config.editor.begin_reload() {
                    self.send_write(ApiRequest::ReloadConfig);
                }
            }
            Action::RawEditor => self.enter_raw_editor(),
            Action::Remove => self.config_remove(),
            _ => {}
        }
    }

    /// Send the whole draft. Ignored while a save is already in flight.
    pub(super) fn save_config(&mut self) {
        match self.config.editor.begin_save() {
            Some(snapshot) => self.send_write(ApiRequest::PutConfig(Box::new(snapshot))),
            None => tracing::debug!("save not started"),
        }
    }

    /// Handle Enter on the config screen: edit, toggle, cycle or add.
    pub(super) fn handle_config_enter(&mut self) {
        let Some(row) = self.config.current_row() else {
            return;
        };
        let section = self.config.section;
        match row {
            ConfigRow::Field {
                value: Value::Bool(_),
                ..
            } => self.handle_config_space(),
            ConfigRow::Field { key, value } => {
                self.start_edit(EditTarget::Field { section, key }, edit_text(&value));
            }
            ConfigRow::AddCorsOrigin => self.start_edit(EditTarget::NewCorsOrigin, String::new()),
            ConfigRow::ClientField { index, key, value } if key == "client_type" => {
                let types = self.config.editor.client_types();
                let current = types.iter().position(|t| Some(t.as_str()) == value.as_str());
                let next = current.map_or(0, |i| (i + 1) % types.len());
                if let Some(next_type) = types.get(next) {
                    let result = self.config.editor.update_download_client(
                        index,
                        "client_type",
                        Value::String(next_type.clone()),
                    );
                    self.report_edit(result);
                }
            }
            ConfigRow::ClientField { index, key, value } => {
                self.start_edit(EditTarget::ClientField { index, key }, edit_text(&value));
            }
            ConfigRow::AddClient => self.add_download_client(),
            ConfigRow::CorsOrigin(_) | ConfigRow::ClientHeader(_) => {}
        }
    }

    /// Handle Space on the config screen (toggle a boolean field).
    pub(super) fn handle_config_space(&mut self) {
        if let Some(ConfigRow::Field {
            key,
            value: Value::Bool(on),
        }) = self.config.current_row()
        {
            let section = self.config.section;
            let result = self.config.editor.update_field(section, &key, Value::Bool(!on));
            self.report_edit(result);
        }
    }

    /// `n`: add a CORS origin (API section) or a download client.
    pub(super) fn config_add(&mut self) {
        match self.config.section {
            ConfigSection::Api => self.start_edit(EditTarget::NewCorsOrigin, String::new()),
            ConfigSection::DownloadClients => self.add_download_client(),
            _ => {}
        }
    }

    fn add_download_client(&mut self) {
        self.config.section = ConfigSection::DownloadClients;
        match self.config.editor.add_download_client() {
            Ok(index) => {
                self.config.item_cursor = self
                    .config
                    .rows()
                    .iter()
                    .position(|r| *r == ConfigRow::ClientHeader(index))
                    .unwrap_or(0);
            }
            Err(e) => self.config.edit_error = Some(e.to_string()),
        }
    }

    /// `d`: remove the origin or download client under the cursor.
    fn config_remove(&mut self) {
        let result = match self.config.current_row() {
            Some(ConfigRow::CorsOrigin(origin)) => {
                self.config.editor.remove_cors_origin(&origin).map(|_| ())
            }
            Some(ConfigRow::ClientHeader(index)) | Some(ConfigRow::ClientField { index, .. }) => {
                self.config.editor.remove_download_client(index)
            }
            _ => return,
        };
        self.report_edit(result);
        self.clamp_cursors();
    }

    fn start_edit(&mut self, target: EditTarget, text: String) {
        self.config.editing = Some(target);
        self.config.edit_buffer = text;
        self.config.edit_error = None;
        self.input_mode = InputMode::TextInput;
    }

    pub(super) fn handle_config_edit_action(&mut self, action: Action) {
        match action {
            Action::InputChar(c) => self.config.edit_buffer.push(c),
            Action::InputBackspace => {
                self.config.edit_buffer.pop();
            }
            Action::InputCancel => {
                self.config.editing = None;
                self.config.edit_buffer.clear();
                self.config.edit_error = None;
                self.input_mode = InputMode::Normal;
            }
            Action::InputConfirm => self.confirm_config_edit(),
            _ => {}
        }
    }

    /// Write the edit buffer back into the draft. An invalid value keeps
    /// the field in edit mode with the error shown.
    fn confirm_config_edit(&mut self) {
        let Some(target) = self.config.editing.take() else {
            return;
        };
        let text = self.config.edit_buffer.clone();
        let editor = &mut self.config.editor;
        let result = match &target {
            EditTarget::Field { section, key } => {
                let existing = editor
                    .working()
                    .and_then(|c| c.fields(*section).into_iter().find(|(k, _)| k == key))
                    .map_or(Value::Null, |(_, v)| v);
                coerce_input(key, &existing, &text)
                    .and_then(|value| editor.update_field(*section, key, value))
            }
            EditTarget::ClientField { index, key } => {
                let existing = editor
                    .working()
                    .and_then(|c| c.download_clients.get(*index))
                    .and_then(|client| serde_json::to_value(client).ok())
                    .and_then(|v| v.get(key).cloned())
                    .unwrap_or(Value::Null);
                coerce_input(key, &existing, &text)
                    .and_then(|value| editor.update_download_client(*index, key, value))
            }
            EditTarget::NewCorsOrigin => editor.add_cors_origin(&text).map(|added| {
                if !added {
                    tracing::debug!(origin = %text, "origin already present");
                }
            }),
        };

        match result {
            Ok(()) => {
                self.config.edit_buffer.clear();
                self.config.edit_error = None;
                self.input_mode = InputMode::Normal;
            }
            Err(e) => {
                self.config.edit_error = Some(e.to_string());
                self.config.editing = Some(target);
            }
        }
    }

    fn report_edit(&mut self, result: Result<(), fastlib_client::EditError>) {
        if let Err(e) = result {
            tracing::warn!(error = %e, "config edit rejected");
            self.config.edit_error = Some(e.to_string());
        }
    }

    // --- raw editor ---

    fn enter_raw_editor(&mut self) {
        if let Some(generation) = self.config.editor.enter_raw(&mut self.generations) {
            self.send_read(generation, ApiRequest::GetRawConfig);
        }
        self.input_mode = InputMode::RawEdit;
    }

    pub(super) fn handle_raw_action(&mut self, action: Action) {
        match action {
            Action::InputChar(c) => {
                if let Some(text) = self.config.editor.raw_text_mut() {
                    text.push(c);
                }
            }
            Action::InputNewline => {
                if let Some(text) = self.config.editor.raw_text_mut() {
                    text.push('\n');
                }
            }
            Action::InputBackspace => {
                if let Some(text) = self.config.editor.raw_text_mut() {
                    text.pop();
                }
            }
            Action::SaveConfig => match self.config.editor.begin_raw_save() {
                Some(text) => self.send_write(ApiRequest::PutRawConfig(text)),
                None => tracing::debug!("raw save not started"),
            },
            Action::Validate => {
                if let Some(text) = self.config.editor.begin_validate() {
                    self.send_write(ApiRequest::ValidateRawConfig(text));
                }
            }
            Action::InputCancel => {
                self.config.editor.leave_raw();
                self.input_mode = InputMode::Normal;
            }
            _ => {}
        }
    }
}
