//! HTTP utilities for Render REST API calls

use super::error::{RenderError, Result};
use anyhow::Context;
use clap::ValueEnum;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Per-request timeout applied when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
pub(crate) fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let cut = (0..=MAX_LOG_BODY_LENGTH)
            .rev()
            .find(|i| body.is_char_boundary(*i))
            .unwrap_or(0);
        format!("{}... [truncated, {} bytes total]", &body[..cut], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| c.is_control(), "")
}

/// Which HTTP statuses count as a successful suspend/resume.
///
/// Render answers 200 on most deployments but some accept the request
/// asynchronously with 202.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SuccessPolicy {
    /// Only 200 OK
    Strict,
    /// 200 OK and 202 Accepted
    #[default]
    AcceptAsync,
}

impl SuccessPolicy {
    pub fn accepts(&self, status: StatusCode) -> bool {
        match self {
            Self::Strict => status == StatusCode::OK,
            Self::AcceptAsync => status == StatusCode::OK || status == StatusCode::ACCEPTED,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::AcceptAsync => "accept-async",
        }
    }
}

/// HTTP client wrapper for Render API calls
#[derive(Clone)]
pub struct RenderHttpClient {
    client: Client,
    policy: SuccessPolicy,
}

impl RenderHttpClient {
    /// Create a new HTTP client
    pub fn new(timeout: Duration, policy: SuccessPolicy) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("render-services/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, policy })
    }

    pub fn policy(&self) -> SuccessPolicy {
        self.policy
    }

    /// Make an empty-bodied POST request and classify the response.
    ///
    /// `id` only labels errors; it is never sent anywhere.
    pub async fn post_empty(&self, url: Url, token: &str, id: &str) -> Result<StatusCode> {
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|source| classify_send_error(id, source))?;

        let status = response.status();
        if self.policy.accepts(status) {
            tracing::debug!("{} accepted with {}", id, status);
            return Ok(status);
        }

        let body = response
            .text()
            .await
            .map_err(|source| RenderError::Transport {
                id: id.to_string(),
                source,
            })?;

        tracing::debug!("API error: {} - {}", status, sanitize_for_log(&body));

        Err(RenderError::Api {
            id: id.to_string(),
            status: status.as_u16(),
            message: status.canonical_reason().unwrap_or("Unknown Status").to_string(),
            body,
        })
    }
}

fn classify_send_error(id: &str, source: reqwest::Error) -> RenderError {
    if source.is_builder() {
        RenderError::RequestBuild {
            id: id.to_string(),
            reason: source.to_string(),
        }
    } else {
        RenderError::Transport {
            id: id.to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_statuses() {
        assert!(SuccessPolicy::Strict.accepts(StatusCode::OK));
        assert!(!SuccessPolicy::Strict.accepts(StatusCode::ACCEPTED));
        assert!(SuccessPolicy::AcceptAsync.accepts(StatusCode::OK));
        assert!(SuccessPolicy::AcceptAsync.accepts(StatusCode::ACCEPTED));
        for policy in [SuccessPolicy::Strict, SuccessPolicy::AcceptAsync] {
            assert!(!policy.accepts(StatusCode::NO_CONTENT));
            assert!(!policy.accepts(StatusCode::NOT_FOUND));
            assert!(!policy.accepts(StatusCode::INTERNAL_SERVER_ERROR));
        }
    }

    #[test]
    fn test_policy_default_and_names() {
        assert_eq!(SuccessPolicy::default(), SuccessPolicy::AcceptAsync);
        let parsed: SuccessPolicy = serde_json::from_str("\"strict\"").unwrap();
        assert_eq!(parsed, SuccessPolicy::Strict);
        let parsed: SuccessPolicy = serde_json::from_str("\"accept-async\"").unwrap();
        assert_eq!(parsed, SuccessPolicy::AcceptAsync);
        assert_eq!(SuccessPolicy::AcceptAsync.as_str(), "accept-async");
    }

    #[test]
    fn test_sanitize_truncates_and_strips() {
        let long = "x".repeat(500);
        let out = sanitize_for_log(&long);
        assert!(out.starts_with(&"x".repeat(MAX_LOG_BODY_LENGTH)));
        assert!(out.ends_with("[truncated, 500 bytes total]"));

        assert_eq!(sanitize_for_log("not\nfound\r"), "notfound");
    }

    #[test]
    fn test_sanitize_respects_char_boundaries() {
        let body = "é".repeat(150);
        let out = sanitize_for_log(&body);
        assert!(out.contains("[truncated, 300 bytes total]"));
    }
}
