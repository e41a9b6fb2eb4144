//! Mirror of the server's configuration object (`GET/PUT /config`).
//!
//! Every section keeps unknown keys in a flattened `extra` map, so a
//! full-copy PUT never drops fields the client does not model (the masked
//! `database.url`, `app_name`, `environment`, computed flags, ...).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::EditError;

/// Download client types offered when the server cannot list them.
pub const FALLBACK_CLIENT_TYPES: &[&str] = &["qbittorrent", "aria2", "transmission", "deluge"];

/// Port given to a freshly added download client.
pub const DEFAULT_CLIENT_PORT: u16 = 8080;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    pub echo: bool,
    pub pool_size: u32,
    pub max_overflow: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            database: "fastlibrarian".to_string(),
            user: "fastlib".to_string(),
            password: String::new(),
            echo: true,
            pool_size: 10,
            max_overflow: 20,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSection {
    pub title: String,
    pub version: String,
    pub description: String,
    pub debug: bool,
    pub cors_origins: Vec<String>,
    pub host: String,
    pub port: u16,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            title: "FastLibrarian API".to_string(),
            version: "1.0.0".to_string(),
            description: "A fast and efficient librarian API".to_string(),
            debug: false,
            cors_origins: vec!["*".to_string()],
            host: "0.0.0.0".to_string(),
            port: 8000,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalApisSection {
    pub hardcover_api_key: String,
    pub inventaire_enabled: bool,
    pub rate_limit_requests: u32,
    /// Seconds.
    pub rate_limit_window: u32,
    pub timeout: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ExternalApisSection {
    fn default() -> Self {
        Self {
            hardcover_api_key: String::new(),
            inventaire_enabled: false,
            rate_limit_requests: 100,
            rate_limit_window: 3600,
            timeout: 30.0,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
    pub format: String,
    pub rotation: String,
    pub retention: String,
    pub file_path: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            format: "{time} | {level} | {message}".to_string(),
            rotation: "10 MB".to_string(),
            retention: "7 days".to_string(),
            file_path: None,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecuritySection {
    pub secret_key: String,
    pub algorithm: String,
    pub access_token_expire_minutes: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for SecuritySection {
    fn default() -> Self {
        Self {
            secret_key: String::new(),
            algorithm: "HS256".to_string(),
            access_token_expire_minutes: 30,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadClientConfig {
    #[serde(default)]
    pub tags: Vec<String>,
    pub client_type: String,
    #[serde(default)]
    pub client_ip: String,
    #[serde(default)]
    pub client_username: String,
    #[serde(default)]
    pub client_password: String,
    #[serde(default = "default_client_port")]
    pub client_port: u16,
}

fn default_client_port() -> u16 {
    DEFAULT_CLIENT_PORT
}

impl DownloadClientConfig {
    pub fn new(client_type: impl Into<String>) -> Self {
        Self {
            tags: Vec::new(),
            client_type: client_type.into(),
            client_ip: String::new(),
            client_username: String::new(),
            client_password: String::new(),
            client_port: DEFAULT_CLIENT_PORT,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub database: DatabaseSection,
    pub api: ApiSection,
    pub external_apis: ExternalApisSection,
    pub logging: LoggingSection,
    pub security: SecuritySection,
    pub download_clients: Vec<DownloadClientConfig>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The object-valued sections of [`ServerConfig`] that take field edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConfigSection {
    #[default]
    Database,
    Api,
    ExternalApis,
    Logging,
    Security,
    DownloadClients,
}

impl ConfigSection {
    pub fn all() -> &'static [ConfigSection] {
        &[
            ConfigSection::Database,
            ConfigSection::Api,
            ConfigSection::ExternalApis,
            ConfigSection::Logging,
            ConfigSection::Security,
            ConfigSection::DownloadClients,
        ]
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Database => "database",
            Self::Api => "api",
            Self::ExternalApis => "external_apis",
            Self::Logging => "logging",
            Self::Security => "security",
            Self::DownloadClients => "download_clients",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Database => "Database",
            Self::Api => "API",
            Self::ExternalApis => "External APIs",
            Self::Logging => "Logging",
            Self::Security => "Security",
            Self::DownloadClients => "Download Clients",
        }
    }

    pub fn next(self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|&s| s == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }
}

impl ServerConfig {
    /// The section as a JSON object, in server field order.
    pub fn section_value(&self, section: ConfigSection) -> Result<Value, serde_json::Error> {
        match section {
            ConfigSection::Database => serde_json::to_value(&self.database),
            ConfigSection::Api => serde_json::to_value(&self.api),
            ConfigSection::ExternalApis => serde_json::to_value(&self.external_apis),
            ConfigSection::Logging => serde_json::to_value(&self.logging),
            ConfigSection::Security => serde_json::to_value(&self.security),
            ConfigSection::DownloadClients => serde_json::to_value(&self.download_clients),
        }
    }

    /// `(key, value)` pairs of an object section. Empty for `DownloadClients`.
    pub fn fields(&self, section: ConfigSection) -> Vec<(String, Value)> {
        match self.section_value(section) {
            Ok(Value::Object(map)) => map.into_iter().collect(),
            _ => Vec::new(),
        }
    }

    /// Shallow-merge one field into one section. The key must already exist.
    pub fn set_field(
        &mut self,
        section: ConfigSection,
        key: &str,
        value: Value,
    ) -> Result<(), EditError> {
        let unknown = || EditError::UnknownField {
            section: section.key().to_string(),
            key: key.to_string(),
        };
        let mut merged = match self.section_value(section) {
            Ok(Value::Object(map)) => map,
            _ => return Err(unknown()),
        };
        if !merged.contains_key(key) {
            return Err(unknown());
        }
        merged.insert(key.to_string(), value);

        let invalid = |e: serde_json::Error| EditError::InvalidValue {
            key: key.to_string(),
            reason: e.to_string(),
        };
        let merged = Value::Object(merged);
        match section {
            ConfigSection::Database => self.database = serde_json::from_value(merged).map_err(invalid)?,
            ConfigSection::Api => self.api = serde_json::from_value(merged).map_err(invalid)?,
            ConfigSection::ExternalApis => {
                self.external_apis = serde_json::from_value(merged).map_err(invalid)?
            }
            ConfigSection::Logging => self.logging = serde_json::from_value(merged).map_err(invalid)?,
            ConfigSection::Security => self.security = serde_json::from_value(merged).map_err(invalid)?,
            ConfigSection::DownloadClients => return Err(unknown()),
        }
        Ok(())
    }

    /// Sections whose content differs from `other`.
    pub fn changed_sections(&self, other: &ServerConfig) -> Vec<ConfigSection> {
        ConfigSection::all()
            .iter()
            .copied()
            .filter(|&s| self.section_value(s).ok() != other.section_value(s).ok())
            .collect()
    }
}

impl DownloadClientConfig {
    /// Shallow-merge one field of this record. The key must already exist.
    pub fn set_field(&mut self, key: &str, value: Value) -> Result<(), EditError> {
        let mut merged = match serde_json::to_value(&*self) {
            Ok(Value::Object(map)) => map,
            _ => return Err(EditError::NotLoaded),
        };
        if !merged.contains_key(key) {
            return Err(EditError::UnknownField {
                section: ConfigSection::DownloadClients.key().to_string(),
                key: key.to_string(),
            });
        }
        merged.insert(key.to_string(), value);
        *self = serde_json::from_value(Value::Object(merged)).map_err(|e| {
            EditError::InvalidValue {
                key: key.to_string(),
                reason: e.to_string(),
            }
        })?;
        Ok(())
    }
}

/// Parse user text into a JSON value shaped like `existing`.
///
/// Booleans accept true/false/yes/no/on/off/1/0, numbers keep their integer
/// or float kind, string lists are comma separated, and an empty input on a
/// nullable field becomes `null`.
pub fn coerce_input(key: &str, existing: &Value, input: &str) -> Result<Value, EditError> {
    let invalid = |reason: &str| EditError::InvalidValue {
        key: key.to_string(),
        reason: reason.to_string(),
    };
    let trimmed = input.trim();
    match existing {
        Value::Bool(_) => match trimmed.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(Value::Bool(true)),
            "false" | "no" | "off" | "0" => Ok(Value::Bool(false)),
            _ => Err(invalid("expected true or false")),
        },
        Value::Number(n) if n.is_f64() => trimmed
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| invalid("expected a number")),
        Value::Number(_) => trimmed
            .parse::<i64>()
            .map(|v| Value::Number(v.into()))
            .map_err(|_| invalid("expected a whole number")),
        Value::Array(_) => Ok(Value::Array(
            trimmed
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| Value::String(s.to_string()))
                .collect(),
        )),
        Value::Null if trimmed.is_empty() => Ok(Value::Null),
        _ => Ok(Value::String(input.to_string())),
    }
}

/// Fields whose values are masked when displayed.
pub fn is_secret(key: &str) -> bool {
    matches!(
        key,
        "password" | "secret_key" | "hardcover_api_key" | "client_password" | "url"
    )
}

/// `GET /config/health` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ConfigHealth {
    pub status: String,
    #[serde(default)]
    pub environment: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub database_configured: bool,
    #[serde(default)]
    pub external_apis_configured: bool,
    #[serde(default)]
    pub config_file_exists: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl ConfigHealth {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }

    /// Badge text, e.g. `HEALTHY - development v1.0.0`.
    pub fn badge(&self) -> String {
        let mut text = self.status.to_uppercase();
        if let Some(env) = &self.environment {
            text.push_str(&format!(" - {env}"));
        }
        if let Some(version) = &self.version {
            text.push_str(&format!(" v{version}"));
        }
        text
    }
}

/// `POST /config/validate` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawValidation {
    pub valid: bool,
    #[serde(default)]
    pub toml_valid: bool,
    #[serde(default)]
    pub config_valid: bool,
    #[serde(default)]
    pub errors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> ServerConfig {
        serde_json::from_value(json!({
            "app_name": "FastLibrarian",
            "environment": "development",
            "database": {"host": "db", "port": 5432, "database": "lib", "user": "u",
                          "password": "secret-pass", "echo": false, "pool_size": 5,
                          "max_overflow": 0, "url": "post****host"},
            "api": {"title": "T", "version": "1.0.0", "description": "d", "debug": false,
                    "cors_origins": ["http://a"], "host": "0.0.0.0", "port": 8000},
            "external_apis": {"hardcover_api_key": "", "inventaire_enabled": false,
                              "rate_limit_requests": 100, "rate_limit_window": 3600,
                              "timeout": 30.0},
            "logging": {"level": "INFO", "format": "f", "rotation": "10 MB",
                        "retention": "7 days", "file_path": null},
            "security": {"secret_key": "", "algorithm": "HS256",
                         "access_token_expire_minutes": 30}
        }))
        .unwrap()
    }

    #[test]
    fn unknown_keys_survive_a_round_trip() {
        let cfg = sample();
        let back = serde_json::to_value(&cfg).unwrap();
        assert_eq!(back["app_name"], json!("FastLibrarian"));
        assert_eq!(back["database"]["url"], json!("post****host"));
        assert_eq!(back["download_clients"], json!([]));
    }

    #[test]
    fn set_field_merges_one_key() {
        let mut cfg = sample();
        cfg.set_field(ConfigSection::Database, "host", json!("db2")).unwrap();
        assert_eq!(cfg.database.host, "db2");
        assert_eq!(cfg.database.user, "u");
        assert_eq!(cfg.changed_sections(&sample()), vec![ConfigSection::Database]);
    }

    #[test]
    fn set_field_rejects_unknown_key_and_bad_type() {
        let mut cfg = sample();
        assert!(matches!(
            cfg.set_field(ConfigSection::Api, "nope", json!(1)),
            Err(EditError::UnknownField { .. })
        ));
        assert!(matches!(
            cfg.set_field(ConfigSection::Api, "port", json!("eighty")),
            Err(EditError::InvalidValue { .. })
        ));
        assert_eq!(cfg, sample());
    }

    #[test]
    fn coerce_follows_existing_kind() {
        assert_eq!(coerce_input("echo", &json!(true), "no").unwrap(), json!(false));
        assert_eq!(coerce_input("port", &json!(5432), " 6543 ").unwrap(), json!(6543));
        assert_eq!(coerce_input("timeout", &json!(30.0), "12.5").unwrap(), json!(12.5));
        assert_eq!(coerce_input("file_path", &json!(null), "").unwrap(), json!(null));
        assert_eq!(
            coerce_input("file_path", &json!(null), "/var/log/x").unwrap(),
            json!("/var/log/x")
        );
        assert_eq!(
            coerce_input("tags", &json!([]), "books, audio,,").unwrap(),
            json!(["books", "audio"])
        );
        assert!(coerce_input("port", &json!(1), "x").is_err());
    }

    #[test]
    fn download_client_field_update() {
        let mut client = DownloadClientConfig::new("qbittorrent");
        client.set_field("client_port", json!(9091)).unwrap();
        client.set_field("client_ip", json!("10.0.0.2")).unwrap();
        assert_eq!(client.client_port, 9091);
        assert_eq!(client.client_ip, "10.0.0.2");
        assert!(client.set_field("bogus", json!(1)).is_err());
    }

    #[test]
    fn health_badge() {
        let health: ConfigHealth = serde_json::from_value(json!({
            "status": "healthy", "environment": "development", "version": "1.0.0",
            "database_configured": true, "external_apis_configured": false,
            "toml_parser": "rtoml", "config_file_exists": true
        }))
        .unwrap();
        assert!(health.is_healthy());
        assert_eq!(health.badge(), "HEALTHY - development v1.0.0");
    }
}
