//! Suspend or resume Render services and databases.
//!
//! - [`render`] - Render API client
//! - [`batch`] - Sequential runner applying one action to many resources
//! - [`config`] - Settings from flags, environment and config file

pub mod batch;
pub mod config;
pub mod render;
