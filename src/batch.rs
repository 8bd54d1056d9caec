//! Batch runner
//!
//! Applies one action to a list of resources, one request at a time, and keeps
//! an independent outcome for each of them.

use crate::render::{Action, RenderClient, RenderError, ResourceId};

/// Result of applying an action to one resource
#[derive(Debug)]
pub enum Outcome {
    Success,
    Failure(RenderError),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn error(&self) -> Option<&RenderError> {
        match self {
            Self::Success => None,
            Self::Failure(err) => Some(err),
        }
    }
}

impl From<Result<(), RenderError>> for Outcome {
    fn from(result: Result<(), RenderError>) -> Self {
        match result {
            Ok(()) => Self::Success,
            Err(err) => Self::Failure(err),
        }
    }
}

#[derive(Debug)]
pub struct ActionReport {
    pub id: ResourceId,
    pub outcome: Outcome,
}

/// Outcomes of a whole run, in input order
#[derive(Debug)]
pub struct BatchReport {
    action: Action,
    reports: Vec<ActionReport>,
}

impl BatchReport {
    pub fn action(&self) -> Action {
        self.action
    }

    pub fn reports(&self) -> &[ActionReport] {
        &self.reports
    }

    pub fn succeeded(&self) -> usize {
        self.reports.iter().filter(|r| r.outcome.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.reports.len() - self.succeeded()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = (&ResourceId, &RenderError)> {
        self.reports
            .iter()
            .filter_map(|r| r.outcome.error().map(|e| (&r.id, e)))
    }
}

/// Apply `action` to every resource in order.
///
/// A failed resource is logged and recorded; it never stops the remaining ones.
pub async fn run_batch(client: &RenderClient, action: Action, ids: &[ResourceId]) -> BatchReport {
    let mut reports = Vec::with_capacity(ids.len());

    for id in ids {
        tracing::info!("Attempting to {} {} {}...", action, id.kind(), id);

        let outcome = Outcome::from(client.apply(action, id).await);

        match &outcome {
            Outcome::Success => match action {
                Action::Suspend => tracing::info!("Successfully suspended {} {}", id.kind(), id),
                Action::Resume => {
                    tracing::info!("Successfully initiated resume for {} {}", id.kind(), id)
                }
            },
            Outcome::Failure(err) => {
                tracing::error!("Failed to {} {} {}: {}", action, id.kind(), id, err.summary());
            }
        }

        reports.push(ActionReport {
            id: id.clone(),
            outcome,
        });
    }

    BatchReport { action, reports }
}
