//! Subtask pipeline
//!
//! The reconciliation stages run as named subtasks against one scope. A run
//! executes the selected subtasks in registration order and stops at the
//! first failure.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use metrics::histogram;
use sea_orm::DatabaseConnection;
use thiserror::Error;
use tracing::{Instrument, error, info, info_span};

use crate::dedup::{self, DedupError};
use crate::extraction::{self, ExtractionError, ExtractionSummary};
use crate::scope::ScopeKey;

/// Errors raised while running subtasks.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Subtask '{name}' not found")]
    UnknownSubtask { name: String },
    #[error("dedup failed: {0}")]
    Dedup(#[from] DedupError),
    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractionError),
}

/// Everything a subtask needs for one scope.
pub struct SubtaskContext<'a> {
    pub db: &'a DatabaseConnection,
    pub scope: ScopeKey,
}

/// What a finished subtask reports back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtaskOutcome {
    Deduplicated { deleted: u64 },
    Extracted(ExtractionSummary),
}

/// One reconciliation stage.
#[async_trait]
pub trait Subtask: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    async fn run(&self, ctx: &SubtaskContext<'_>) -> Result<SubtaskOutcome, PipelineError>;
}

/// Collapses duplicate staged deployments.
pub struct DedupDeployments;

#[async_trait]
impl Subtask for DedupDeployments {
    fn name(&self) -> &'static str {
        "dedup_deployments"
    }

    fn description(&self) -> &'static str {
        "Delete duplicate staged deployments, keeping the most recent per key"
    }

    async fn run(&self, ctx: &SubtaskContext<'_>) -> Result<SubtaskOutcome, PipelineError> {
        let deleted = dedup::dedup_deployments(ctx.db, &ctx.scope).await?;
        Ok(SubtaskOutcome::Deduplicated { deleted })
    }
}

/// Derives issue categories and effective time windows.
pub struct ExtractIssues;

#[async_trait]
impl Subtask for ExtractIssues {
    fn name(&self) -> &'static str {
        "extract_issues"
    }

    fn description(&self) -> &'static str {
        "Classify staged issues and resolve their effective start, stop and duration"
    }

    async fn run(&self, ctx: &SubtaskContext<'_>) -> Result<SubtaskOutcome, PipelineError> {
        let summary = extraction::extract_issues(ctx.db, &ctx.scope).await?;
        Ok(SubtaskOutcome::Extracted(summary))
    }
}

/// Ordered set of subtasks. Dedup runs before extraction.
#[derive(Clone)]
pub struct SubtaskRegistry {
    subtasks: Vec<Arc<dyn Subtask>>,
}

impl SubtaskRegistry {
    pub fn new() -> Self {
        Self {
            subtasks: Vec::new(),
        }
    }

    /// Registry with every built-in subtask.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(DedupDeployments));
        registry.register(Arc::new(ExtractIssues));
        registry
    }

    pub fn register(&mut self, subtask: Arc<dyn Subtask>) {
        self.subtasks.push(subtask);
    }

    pub fn list(&self) -> impl Iterator<Item = &Arc<dyn Subtask>> {
        self.subtasks.iter()
    }

    /// Resolve the subtasks to run. An empty selection means all of them.
    pub fn select(&self, names: &[String]) -> Result<Vec<Arc<dyn Subtask>>, PipelineError> {
        if let Some(unknown) = names
            .iter()
            .find(|n| !self.subtasks.iter().any(|s| s.name() == n.as_str()))
        {
            return Err(PipelineError::UnknownSubtask {
                name: unknown.clone(),
            });
        }

        Ok(self
            .subtasks
            .iter()
            .filter(|s| names.is_empty() || names.iter().any(|n| n == s.name()))
            .cloned()
            .collect())
    }

    /// Run the selected subtasks in registration order.
    pub async fn run(
        &self,
        ctx: &SubtaskContext<'_>,
        names: &[String],
    ) -> Result<Vec<(&'static str, SubtaskOutcome)>, PipelineError> {
        let selected = self.select(names)?;
        let mut outcomes = Vec::with_capacity(selected.len());

        for subtask in selected {
            let name = subtask.name();
            let span = info_span!(
                "subtask",
                subtask = name,
                connection_id = ctx.scope.connection_id,
                scope_id = %ctx.scope.scope_id
            );

            let started = Instant::now();
            let result = subtask.run(ctx).instrument(span).await;
            histogram!("reconciler_subtask_duration_seconds", "subtask" => name)
                .record(started.elapsed().as_secs_f64());

            match result {
                Ok(outcome) => {
                    info!(subtask = name, ?outcome, "Subtask finished");
                    outcomes.push((name, outcome));
                }
                Err(err) => {
                    error!(subtask = name, error = %err, "Subtask failed");
                    return Err(err);
                }
            }
        }

        Ok(outcomes)
    }
}

impl Default for SubtaskRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_order_runs_dedup_first() {
        let names: Vec<_> = SubtaskRegistry::builtin().list().map(|s| s.name()).collect();
        assert_eq!(names, vec!["dedup_deployments", "extract_issues"]);
    }

    #[test]
    fn empty_selection_means_all() {
        let selected = SubtaskRegistry::builtin().select(&[]).unwrap();
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn selection_keeps_registration_order() {
        let names = vec!["extract_issues".to_string(), "dedup_deployments".to_string()];
        let selected = SubtaskRegistry::builtin().select(&names).unwrap();
        assert_eq!(selected[0].name(), "dedup_deployments");
        assert_eq!(selected[1].name(), "extract_issues");
    }

    #[test]
    fn unknown_subtask_is_rejected() {
        let err = SubtaskRegistry::builtin()
            .select(&["collect_everything".to_string()])
            .err()
            .unwrap();
        assert!(
            matches!(err, PipelineError::UnknownSubtask { name } if name == "collect_everything")
        );
    }
}
