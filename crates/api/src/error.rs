use thiserror::Error;

/// Normalized failure of a backend call.
///
/// Every variant exposes the same `{status, message, raw}` triple so callers can
/// render errors uniformly. `status()` is `None` for transport failures, including
/// timeouts.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request failed: {message}")]
    Transport {
        message: String,
        timed_out: bool,
        #[source]
        source: reqwest::Error,
    },

    #[error("API error ({status}): {message}")]
    Status {
        status: u16,
        message: String,
        raw: String,
    },

    #[error("unexpected response shape: {message}")]
    Decode {
        status: u16,
        message: String,
        raw: String,
    },

    #[error("backend reported an error: {message}")]
    Backend {
        status: u16,
        message: String,
        raw: String,
    },

    #[error("failed to build request: {0}")]
    Request(String),
}

pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Transport { .. } | ApiError::Request(_) => None,
            ApiError::Status { status, .. }
            | ApiError::Decode { status, .. }
            | ApiError::Backend { status, .. } => Some(*status),
        }
    }

    /// Short human-readable message, the backend `detail` when one was sent.
    pub fn message(&self) -> &str {
        match self {
            ApiError::Transport { message, .. }
            | ApiError::Status { message, .. }
            | ApiError::Decode { message, .. }
            | ApiError::Backend { message, .. } => message,
            ApiError::Request(message) => message,
        }
    }

    /// Raw response body, empty when nothing was received.
    pub fn raw(&self) -> &str {
        match self {
            ApiError::Status { raw, .. }
            | ApiError::Decode { raw, .. }
            | ApiError::Backend { raw, .. } => raw,
            ApiError::Transport { .. } | ApiError::Request(_) => "",
        }
    }

    pub fn is_transport(&self) -> bool {
        self.status().is_none()
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Transport { timed_out: true, .. })
    }

    pub(crate) fn transport(source: reqwest::Error) -> Self {
        let timed_out = source.is_timeout();
        let message = if timed_out {
            "request timed out".to_string()
        } else if source.is_connect() {
            "could not connect to backend".to_string()
        } else {
            source.to_string()
        };
        ApiError::Transport {
            message,
            timed_out,
            source,
        }
    }

    /// Build a status error, preferring the FastAPI-style `detail` field.
    pub(crate) fn from_status(status: reqwest::StatusCode, raw: String) -> Self {
        let message = detail_from_body(&raw)
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
        ApiError::Status {
            status: status.as_u16(),
            message,
            raw,
        }
    }
}

fn detail_from_body(raw: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(raw).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_status_error_uses_detail() {
        let err = ApiError::from_status(
            StatusCode::BAD_REQUEST,
            r#"{"detail":"Invalid search type"}"#.to_string(),
        );
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.message(), "Invalid search type");
        assert!(err.raw().contains("detail"));
        assert!(!err.is_transport());
    }

    #[test]
    fn test_status_error_without_detail() {
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "boom".to_string());
        assert_eq!(err.message(), "Internal Server Error");
        assert_eq!(err.raw(), "boom");
    }

    #[test]
    fn test_structured_detail_is_stringified() {
        let err = ApiError::from_status(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"detail":[{"loc":["body","question"],"msg":"field required"}]}"#.to_string(),
        );
        assert!(err.message().contains("field required"));
    }
}
