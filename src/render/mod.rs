//! Render API interaction module
//!
//! This module provides everything needed to suspend and resume resources
//! hosted on Render through its public REST API.
//!
//! # Module Structure
//!
//! - [`auth`] - API key handling with redacted formatting
//! - [`client`] - Main Render client; builds endpoints and applies actions
//! - [`error`] - Error type for a single (action, resource) call
//! - [`http`] - HTTP utilities and the response success policy
//! - [`resource`] - Resource identifiers, kinds and actions
//!
//! # Example
//!
//! ```no_run
//! use render_services::render::{RenderClient, ResourceId};
//!
//! async fn example() -> anyhow::Result<()> {
//!     let client = RenderClient::new("rnd_xxx")?;
//!     client.suspend(&ResourceId::new("srv-abc123")).await?;
//!     client.resume(&ResourceId::new("dpg-xyz789")).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod error;
pub mod http;
pub mod resource;

pub use auth::ApiKey;
pub use client::{ClientOptions, RenderClient, DEFAULT_BASE_URL};
pub use error::RenderError;
pub use http::{SuccessPolicy, DEFAULT_TIMEOUT};
pub use resource::{Action, ResourceId, ResourceKind};
