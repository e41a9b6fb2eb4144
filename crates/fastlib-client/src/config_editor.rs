//! Draft/baseline editor for the server configuration.
//!
//! The editor holds two copies of the last loaded [`ServerConfig`]: a
//! working draft that every edit mutates and a baseline that only changes
//! on load or on a successful save. Dirty is plain structural inequality
//! between the two. All network I/O is done by the caller; the editor only
//! hands out what to send (`begin_*`) and takes the outcome back
//! (`finish_*`).

use serde_json::Value;

use crate::error::{ApiError, EditError};
use crate::fetch::{Fetch, Generation, GenerationCounter};
use crate::server_config::{
    ConfigHealth, ConfigSection, DownloadClientConfig, RawValidation, ServerConfig,
    FALLBACK_CLIENT_TYPES,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    #[default]
    Structured,
    Raw,
}

#[derive(Debug, Default)]
pub struct ConfigEditor {
    working: Option<ServerConfig>,
    baseline: Option<ServerConfig>,
    load_pending: Option<Generation>,
    load_error: Option<String>,
    /// Snapshot sent by the save currently in flight.
    in_flight: Option<ServerConfig>,
    reloading: bool,
    mode: EditorMode,
    raw: Fetch<String>,
    raw_saving: bool,
    validating: bool,
    validation: Option<RawValidation>,
    client_types: Vec<String>,
    types_pending: Option<Generation>,
    health: Option<ConfigHealth>,
    health_pending: Option<Generation>,
    last_error: Option<String>,
    notice: Option<String>,
}

impl ConfigEditor {
    pub fn new() -> Self {
        Self::default()
    }

    // --- loading ---

    pub fn begin_load(&mut self, counter: &mut GenerationCounter) -> Generation {
        let generation = counter.next();
        self.load_pending = Some(generation);
        self.load_error = None;
        generation
    }

    /// Apply a `GET /config` response. Stale generations are ignored.
    pub fn finish_load(
        &mut self,
        generation: Generation,
        result: Result<ServerConfig, ApiError>,
    ) -> bool {
        if self.load_pending != Some(generation) {
            tracing::debug!(generation = generation.value(), "discarding stale config");
            return false;
        }
        self.load_pending = None;
        match result {
            Ok(config) => self.load(config),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load configuration");
                self.load_error = Some(e.user_message());
            }
        }
        true
    }

    /// Replace both the draft and the baseline. Clears dirty and any
    /// unsaved edits.
    pub fn load(&mut self, config: ServerConfig) {
        self.working = Some(config.clone());
        self.baseline = Some(config);
        self.load_error = None;
    }

    pub fn is_loading(&self) -> bool {
        self.load_pending.is_some()
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn cancel(&mut self) {
        self.load_pending = None;
        self.health_pending = None;
        self.types_pending = None;
        self.raw.cancel();
    }

    pub fn working(&self) -> Option<&ServerConfig> {
        self.working.as_ref()
    }

    pub fn baseline(&self) -> Option<&ServerConfig> {
        self.baseline.as_ref()
    }

    pub fn is_dirty(&self) -> bool {
        self.working != self.baseline
    }

    /// Sections of the draft that differ from the baseline.
    pub fn changed_sections(&self) -> Vec<ConfigSection> {
        match (&self.working, &self.baseline) {
            (Some(w), Some(b)) => w.changed_sections(b),
            _ => Vec::new(),
        }
    }

    // --- edits ---

    fn draft(&mut self) -> Result<&mut ServerConfig, EditError> {
        self.working.as_mut().ok_or(EditError::NotLoaded)
    }

    pub fn update_field(
        &mut self,
        section: ConfigSection,
        key: &str,
        value: Value,
    ) -> Result<(), EditError> {
        self.draft()?.set_field(section, key, value)
    }

    /// Add an origin. Blank input and values already present are ignored.
    pub fn add_cors_origin(&mut self, origin: &str) -> Result<bool, EditError> {
        let origin = origin.trim();
        let origins = &mut self.draft()?.api.cors_origins;
        if origin.is_empty() || origins.iter().any(|o| o == origin) {
            return Ok(false);
        }
        origins.push(origin.to_string());
        Ok(true)
    }

    /// Remove every occurrence of `origin`. Absent values are a no-op.
    pub fn remove_cors_origin(&mut self, origin: &str) -> Result<bool, EditError> {
        let origins = &mut self.draft()?.api.cors_origins;
        let before = origins.len();
        origins.retain(|o| o != origin);
        Ok(origins.len() != before)
    }

    /// Append a client of the first known type. Returns its index.
    pub fn add_download_client(&mut self) -> Result<usize, EditError> {
        let client_type = self
            .client_types()
            .first()
            .cloned()
            .unwrap_or_else(|| FALLBACK_CLIENT_TYPES[0].to_string());
        let clients = &mut self.draft()?.download_clients;
        clients.push(DownloadClientConfig::new(client_type));
        Ok(clients.len() - 1)
    }

    pub fn update_download_client(
        &mut self,
        index: usize,
        key: &str,
        value: Value,
    ) -> Result<(), EditError> {
        self.draft()?
            .download_clients
            .get_mut(index)
            .ok_or(EditError::NoSuchClient(index))?
            .set_field(key, value)
    }

    pub fn remove_download_client(&mut self, index: usize) -> Result<(), EditError> {
        let clients = &mut self.draft()?.download_clients;
        if index >= clients.len() {
            return Err(EditError::NoSuchClient(index));
        }
        clients.remove(index);
        Ok(())
    }

    /// Throw away unsaved edits.
    pub fn reset_changes(&mut self) {
        self.working = self.baseline.clone();
    }

    // --- save ---

    pub fn is_saving(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Snapshot to send as `PUT /config`, or `None` while another save is
    /// in flight or nothing is loaded.
    pub fn begin_save(&mut self) -> Option<ServerConfig> {
        if self.is_saving() {
            tracing::debug!("save ignored, another save is in flight");
            return None;
        }
        let snapshot = self.working.clone()?;
        self.in_flight = Some(snapshot.clone());
        self.last_error = None;
        Some(snapshot)
    }

    /// On success the sent snapshot becomes the baseline. On failure the
    /// draft is left untouched and the payload's message is kept.
    pub fn finish_save(&mut self, result: Result<String, ApiError>) -> bool {
        let Some(sent) = self.in_flight.take() else {
            return false;
        };
        match result {
            Ok(message) => {
                tracing::info!(%message, "configuration saved");
                self.baseline = Some(sent);
                self.notice = Some(if message.is_empty() {
                    "Configuration saved".to_string()
                } else {
                    message
                });
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "configuration save failed");
                self.last_error = Some(e.user_message());
                false
            }
        }
    }

    // --- reload ---

    pub fn is_reloading(&self) -> bool {
        self.reloading
    }

    /// Returns `false` while a reload is already in flight.
    pub fn begin_reload(&mut self) -> bool {
        if self.reloading {
            return false;
        }
        self.reloading = true;
        self.last_error = None;
        true
    }

    /// Returns `true` when the caller should now re-load the configuration.
    pub fn finish_reload(&mut self, result: Result<String, ApiError>) -> bool {
        self.reloading = false;
        match result {
            Ok(message) => {
                self.notice = Some(if message.is_empty() {
                    "Configuration reloaded".to_string()
                } else {
                    message
                });
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "configuration reload failed");
                self.last_error = Some(e.user_message());
                false
            }
        }
    }

    // --- raw mode ---

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    /// Switch to the raw editor. Returns the generation to fetch the raw
    /// text with, or `None` when it is already loaded.
    pub fn enter_raw(&mut self, counter: &mut GenerationCounter) -> Option<Generation> {
        self.mode = EditorMode::Raw;
        self.validation = None;
        if self.raw.data().is_some() || self.raw.is_loading() {
            return None;
        }
        Some(self.raw.begin(counter))
    }

    /// Back to the structured view. The structured draft is not resynced.
    pub fn leave_raw(&mut self) {
        self.mode = EditorMode::Structured;
    }

    /// Force the raw text to be fetched again on next entry.
    pub fn reload_raw(&mut self, counter: &mut GenerationCounter) -> Generation {
        self.validation = None;
        self.raw.begin(counter)
    }

    pub fn finish_raw_load(&mut self, generation: Generation, result: Result<String, ApiError>) -> bool {
        self.raw.resolve(generation, result)
    }

    pub fn raw(&self) -> &Fetch<String> {
        &self.raw
    }

    pub fn raw_text_mut(&mut self) -> Option<&mut String> {
        self.validation = None;
        self.raw.data_mut()
    }

    pub fn is_raw_saving(&self) -> bool {
        self.raw_saving
    }

    /// Text to send as `PUT /config/raw`; `None` while a raw save is in
    /// flight or the text has not been loaded.
    pub fn begin_raw_save(&mut self) -> Option<String> {
        if self.raw_saving {
            return None;
        }
        let text = self.raw.data()?.clone();
        self.raw_saving = true;
        self.last_error = None;
        Some(text)
    }

    /// Returns `true` when the structured view must be re-loaded.
    pub fn finish_raw_save(&mut self, result: Result<String, ApiError>) -> bool {
        if !self.raw_saving {
            return false;
        }
        self.raw_saving = false;
        match result {
            Ok(message) => {
                self.notice = Some(if message.is_empty() {
                    "Raw configuration saved".to_string()
                } else {
                    message
                });
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "raw configuration save failed");
                self.last_error = Some(e.user_message());
                false
            }
        }
    }

    pub fn begin_validate(&mut self) -> Option<String> {
        if self.validating {
            return None;
        }
        let text = self.raw.data()?.clone();
        self.validating = true;
        self.validation = None;
        Some(text)
    }

    pub fn finish_validate(&mut self, result: Result<RawValidation, ApiError>) {
        self.validating = false;
        match result {
            Ok(validation) => self.validation = Some(validation),
            Err(e) => self.last_error = Some(e.user_message()),
        }
    }

    pub fn validation(&self) -> Option<&RawValidation> {
        self.validation.as_ref()
    }

    // --- auxiliary data ---

    /// Known download client types; falls back to the built-in list when
    /// the server gave none.
    pub fn client_types(&self) -> Vec<String> {
        if self.client_types.is_empty() {
            FALLBACK_CLIENT_TYPES.iter().map(|s| s.to_string()).collect()
        } else {
            self.client_types.clone()
        }
    }

    pub fn begin_client_types(&mut self, counter: &mut GenerationCounter) -> Generation {
        let generation = counter.next();
        self.types_pending = Some(generation);
        generation
    }

    /// Apply a client types response unless a newer request replaced it.
    pub fn finish_client_types(
        &mut self,
        generation: Generation,
        result: Result<Vec<String>, ApiError>,
    ) -> bool {
        if self.types_pending != Some(generation) {
            tracing::debug!(generation = generation.value(), "discarding stale client types");
            return false;
        }
        self.types_pending = None;
        self.set_client_types(result);
        true
    }

    pub fn set_client_types(&mut self, result: Result<Vec<String>, ApiError>) {
        match result {
            Ok(types) => self.client_types = types,
            Err(e) => {
                tracing::warn!(error = %e, "could not load download client types, using defaults");
                self.client_types.clear();
            }
        }
    }

    pub fn health(&self) -> Option<&ConfigHealth> {
        self.health.as_ref()
    }

    pub fn begin_health(&mut self, counter: &mut GenerationCounter) -> Generation {
        let generation = counter.next();
        self.health_pending = Some(generation);
        generation
    }

    pub fn finish_health(
        &mut self,
        generation: Generation,
        result: Result<ConfigHealth, ApiError>,
    ) -> bool {
        if self.health_pending != Some(generation) {
            tracing::debug!(generation = generation.value(), "discarding stale health");
            return false;
        }
        self.health_pending = None;
        self.set_health(result);
        true
    }

    pub fn set_health(&mut self, result: Result<ConfigHealth, ApiError>) {
        self.health = match result {
            Ok(health) => Some(health),
            Err(e) => Some(ConfigHealth {
                status: "unhealthy".to_string(),
                error: Some(e.user_message()),
                ..ConfigHealth::default()
            }),
        };
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn clear_messages(&mut self) {
        self.last_error = None;
        self.notice = None;
    }
}
