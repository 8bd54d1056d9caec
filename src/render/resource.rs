//! Resource identifiers and actions
//!
//! Render addresses services and databases through different endpoint
//! families. The family is chosen from the identifier's prefix, once, when the
//! identifier is constructed.

use clap::ValueEnum;
use std::fmt;

/// Identifier prefix used by Render for Postgres databases
pub const DATABASE_PREFIX: &str = "dpg-";

/// Kind of Render resource an identifier refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Service,
    Database,
}

impl ResourceKind {
    /// Derive the kind from an identifier string
    pub fn of(id: &str) -> Self {
        if id.starts_with(DATABASE_PREFIX) {
            Self::Database
        } else {
            Self::Service
        }
    }

    /// Collection segment used in the API path
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Service => "services",
            Self::Database => "databases",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Service => "service",
            Self::Database => "database",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A Render service or database identifier, tagged with its kind
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId {
    id: String,
    kind: ResourceKind,
}

impl ResourceId {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let kind = ResourceKind::of(&id);
        Self { id, kind }
    }

    pub fn as_str(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ResourceId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

/// Operation applied to a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Action {
    Suspend,
    #[value(alias = "unsuspend")]
    Resume,
}

impl Action {
    /// Final path segment of the endpoint for this action and resource kind.
    ///
    /// Services have no `resume` endpoint: resuming a service goes through
    /// `restart`. Databases use `resume`.
    pub fn endpoint_verb(&self, kind: ResourceKind) -> &'static str {
        match (self, kind) {
            (Self::Suspend, _) => "suspend",
            (Self::Resume, ResourceKind::Database) => "resume",
            (Self::Resume, ResourceKind::Service) => "restart",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Suspend => "suspend",
            Self::Resume => "resume",
        }
    }

    /// Past-tense form used in log lines
    pub fn past_tense(&self) -> &'static str {
        match self {
            Self::Suspend => "suspended",
            Self::Resume => "resumed",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
