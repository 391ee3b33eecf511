use serde::Serialize;
use thiserror::Error;

/// Unified API error type.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Rejected before any catalog call was made.
    #[error("bad request: {message}")]
    BadRequest { field: String, message: String },

    #[error("rate limited by catalog provider")]
    RateLimited,

    #[error("not found: {0}")]
    NotFound(String),

    /// The catalog credential is not configured on this server.
    #[error("catalog credential is not configured")]
    CredentialMissing,

    #[error("upstream error: {message}")]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BadRequest {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => "bad_request",
            Self::RateLimited => "rate_limited",
            Self::NotFound(_) => "not_found",
            Self::CredentialMissing => "credential_missing",
            Self::Upstream { .. } => "upstream_error",
            Self::Internal(_) => "internal_error",
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest { .. } => 400,
            Self::RateLimited => 429,
            Self::NotFound(_) => 404,
            // Misconfiguration on our side, not the caller's fault.
            Self::CredentialMissing => 500,
            Self::Upstream { .. } => 500,
            Self::Internal(_) => 500,
        }
    }

    fn details(&self) -> serde_json::Value {
        match self {
            Self::BadRequest { field, .. } => serde_json::json!({ "field": field }),
            Self::Upstream { status, .. } => serde_json::json!({ "upstream_status": status }),
            _ => serde_json::Value::Object(serde_json::Map::new()),
        }
    }
}

/// JSON error envelope: `{ "error": { "code": "…", "message": "…", "details": {} } }`
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    pub details: serde_json::Value,
}

impl From<&ApiError> for ErrorEnvelope {
    fn from(e: &ApiError) -> Self {
        Self {
            error: ErrorBody {
                code: e.code().to_string(),
                message: e.to_string(),
                details: e.details(),
            },
        }
    }
}
