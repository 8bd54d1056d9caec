//! Render Client
//!
//! Main client for suspending and resuming Render resources, combining the
//! API key, endpoint construction and the HTTP layer.

use super::auth::ApiKey;
use super::error::{RenderError, Result};
use super::http::{RenderHttpClient, SuccessPolicy, DEFAULT_TIMEOUT};
use super::resource::{Action, ResourceId};
use anyhow::Context;
use std::time::Duration;
use url::Url;

/// Public Render API root
pub const DEFAULT_BASE_URL: &str = "https://api.render.com/v1";

/// Tunables for [`RenderClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    pub base_url: String,
    pub timeout: Duration,
    pub success_policy: SuccessPolicy,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            success_policy: SuccessPolicy::default(),
        }
    }
}

/// Main Render client
#[derive(Clone)]
pub struct RenderClient {
    api_key: ApiKey,
    http: RenderHttpClient,
    base_url: Url,
}

impl RenderClient {
    /// Create a client against the public API with default options
    pub fn new(api_key: impl Into<ApiKey>) -> anyhow::Result<Self> {
        Self::with_options(api_key, ClientOptions::default())
    }

    pub fn with_options(
        api_key: impl Into<ApiKey>,
        options: ClientOptions,
    ) -> anyhow::Result<Self> {
        let base_url = Url::parse(&options.base_url)
            .with_context(|| format!("Invalid Render API base URL: {}", options.base_url))?;

        let http = RenderHttpClient::new(options.timeout, options.success_policy)?;

        Ok(Self {
            api_key: api_key.into(),
            http,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn success_policy(&self) -> SuccessPolicy {
        self.http.policy()
    }

    /// Build the endpoint for an action on a resource.
    ///
    /// The identifier is appended as a single, percent-encoded path segment.
    pub fn endpoint(&self, action: Action, id: &ResourceId) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| RenderError::RequestBuild {
                id: id.to_string(),
                reason: format!("base URL {} cannot carry a path", self.base_url),
            })?;
            segments.pop_if_empty().extend([
                id.kind().collection(),
                id.as_str(),
                action.endpoint_verb(id.kind()),
            ]);
        }
        Ok(url)
    }

    /// Suspend a single Render service or database
    pub async fn suspend(&self, id: &ResourceId) -> Result<()> {
        self.apply(Action::Suspend, id).await
    }

    /// Resume a single Render service or database
    pub async fn resume(&self, id: &ResourceId) -> Result<()> {
        self.apply(Action::Resume, id).await
    }

    /// Apply an action to a resource with exactly one request
    pub async fn apply(&self, action: Action, id: &ResourceId) -> Result<()> {
        let url = self.endpoint(action, id)?;
        self.http
            .post_empty(url, self.api_key.expose(), id.as_str())
            .await?;
        Ok(())
    }
}

impl std::fmt::Debug for RenderClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderClient")
            .field("api_key", &self.api_key)
            .field("base_url", &self.base_url.as_str())
            .field("success_policy", &self.http.policy())
            .finish()
    }
}
