//! Errors returned by the Render client
//!
//! Every variant is local to a single (action, identifier) call. None of them
//! carry the API key.

use super::http::sanitize_for_log;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    /// The request could not be assembled
    #[error("failed to build request for {id}: {reason}")]
    RequestBuild { id: String, reason: String },

    /// The request never produced an HTTP response (timeout, DNS, refused)
    #[error("error sending request for {id}: {source}")]
    Transport {
        id: String,
        #[source]
        source: reqwest::Error,
    },

    /// Render answered with a status outside the success policy
    #[error("{id}: {status} {message}{}", body_suffix(.body))]
    Api {
        id: String,
        status: u16,
        message: String,
        body: String,
    },
}

fn body_suffix(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        String::new()
    } else {
        format!(": {}", body)
    }
}

pub type Result<T> = std::result::Result<T, RenderError>;

impl RenderError {
    /// Identifier of the resource the failed call targeted
    pub fn resource_id(&self) -> &str {
        match self {
            Self::RequestBuild { id, .. } | Self::Transport { id, .. } | Self::Api { id, .. } => {
                id
            }
        }
    }

    /// HTTP status, when Render answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }

    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport { source, .. } if source.is_timeout())
    }

    /// Human readable reason extracted from an error body.
    ///
    /// Render error bodies look like `{"id": "...", "message": "..."}`; the
    /// `message` field is preferred, otherwise the raw body is returned.
    pub fn detail(&self) -> Option<String> {
        let Self::Api { body, .. } = self else {
            return None;
        };

        let body = body.trim();
        if body.is_empty() {
            return None;
        }

        let message = serde_json::from_str::<Value>(body).ok().and_then(|v| {
            v.get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
        });

        Some(message.unwrap_or_else(|| body.to_string()))
    }

    /// Single-line description for logs.
    ///
    /// API failures show status and the extracted [`detail`](Self::detail),
    /// stripped of control characters; the full body stays on the error.
    pub fn summary(&self) -> String {
        match self {
            Self::Api {
                status, message, ..
            } => match self.detail() {
                Some(detail) => format!("{} {}: {}", status, message, sanitize_for_log(&detail)),
                None => format!("{} {}", status, message),
            },
            Self::RequestBuild { reason, .. } => format!("invalid request: {}", reason),
            Self::Transport { source, .. } if source.is_timeout() => "request timed out".to_string(),
            Self::Transport { source, .. } => format!("transport error: {}", source),
        }
    }
}
