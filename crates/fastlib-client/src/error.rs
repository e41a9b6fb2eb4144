use thiserror::Error;

/// Failure of a single request against the library API.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    /// Non-2xx response. `detail` is the FastAPI `{"detail": ...}` message when present.
    #[error("server returned {status}{}", detail_suffix(.detail))]
    Status { status: u16, detail: Option<String> },
    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("{0}")]
    Other(String),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }

    /// Message suitable for showing to the user: the server's `detail` when
    /// it sent one, otherwise the error's display text.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status {
                detail: Some(detail),
                ..
            } => detail.clone(),
            other => other.to_string(),
        }
    }

    /// Build a status error from a response body, pulling out `detail`.
    pub fn from_status_body(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("detail").cloned())
            .and_then(|d| match d {
                serde_json::Value::String(s) => Some(s),
                serde_json::Value::Null => None,
                other => Some(other.to_string()),
            });
        ApiError::Status { status, detail }
    }
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|d| format!(": {d}"))
        .unwrap_or_default()
}

/// Failure of a local edit to a configuration draft.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("configuration not loaded")]
    NotLoaded,
    #[error("unknown field `{key}` in section `{section}`")]
    UnknownField { section: String, key: String },
    #[error("invalid value for `{key}`: {reason}")]
    InvalidValue { key: String, reason: String },
    #[error("no download client at index {0}")]
    NoSuchClient(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_string_is_extracted() {
        let err = ApiError::from_status_body(400, r#"{"detail": "Invalid configuration: port"}"#);
        assert_eq!(err.user_message(), "Invalid configuration: port");
        assert!(!err.is_not_found());
    }

    #[test]
    fn missing_detail_falls_back_to_status_text() {
        let err = ApiError::from_status_body(404, "not json");
        assert!(err.is_not_found());
        assert_eq!(err.user_message(), "server returned 404");
    }

    #[test]
    fn structured_detail_is_stringified() {
        let err = ApiError::from_status_body(422, r#"{"detail": [{"msg": "field required"}]}"#);
        assert!(err.user_message().contains("field required"));
    }
}
