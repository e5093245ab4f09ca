//! Validation runner: per-file pipeline and concurrent orchestration.
//!
//! One task per discovered file, bounded by a semaphore, joined at a single
//! barrier. Results are collected in completion order and re-sorted into
//! discovery order so the aggregate report is deterministic for a
//! deterministic file set.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::debug;

use crate::client::CatalogClient;
use crate::config::CatalogConfig;
use crate::descriptor::Descriptor;
use crate::discover::find_descriptor_files;
use crate::error::CatalogResult;

/// Category of a recorded per-file issue.
///
/// These are the local (non-fatal) failures: each is recorded in the file's
/// report and the run continues for other files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    /// The file could not be read or parsed as YAML.
    Parse,
    /// identifier/blueprint missing, empty, or mistyped.
    Structure,
    /// Required fields missing, or the schema fetch failed (fail-closed).
    Schema,
    /// The entity does not exist remotely (update-only policy).
    Existence,
    /// Unexpected network failure during a check.
    Transport,
}

/// One recorded problem with one file.
#[derive(Debug, Clone)]
pub struct Issue {
    pub kind: IssueKind,
    pub message: String,
}

/// Validation outcome for a single file.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub issues: Vec<Issue>,
}

impl FileReport {
    fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            issues: Vec::new(),
        }
    }

    fn push(&mut self, kind: IssueKind, message: impl Into<String>) {
        self.issues.push(Issue {
            kind,
            message: message.into(),
        });
    }

    /// True if this file validated cleanly.
    pub fn passed(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Outcome of a whole run.
#[derive(Debug)]
pub enum RunOutcome {
    /// No descriptor files were discovered; the catalog was never contacted.
    NoFiles { warnings: Vec<String> },

    /// All per-file tasks completed, reports in discovery order.
    Completed {
        warnings: Vec<String>,
        reports: Vec<FileReport>,
    },
}

impl RunOutcome {
    /// True if any file produced at least one issue.
    pub fn failed(&self) -> bool {
        match self {
            RunOutcome::NoFiles { .. } => false,
            RunOutcome::Completed { reports, .. } => reports.iter().any(|r| !r.passed()),
        }
    }
}

/// Drives concurrent per-file validation against one catalog.
pub struct Runner {
    client: Arc<CatalogClient>,
    parallelism: usize,
}

impl Runner {
    /// Create a runner; fails fast on incomplete configuration.
    pub fn new(config: &CatalogConfig) -> CatalogResult<Self> {
        Ok(Self {
            client: Arc::new(CatalogClient::new(config)?),
            parallelism: config.parallelism.max(1),
        })
    }

    /// Validate every descriptor file reachable from `paths`.
    ///
    /// Fatal errors (configuration, token refresh) surface as `Err`; every
    /// per-file failure is recorded in that file's report instead.
    pub async fn run(&self, paths: &[PathBuf]) -> CatalogResult<RunOutcome> {
        let discovery = find_descriptor_files(paths)?;

        if discovery.files.is_empty() {
            return Ok(RunOutcome::NoFiles {
                warnings: discovery.warnings,
            });
        }

        // One refresh up front; an auth failure aborts before any task runs.
        self.client.warm_token().await?;

        let sem = Arc::new(Semaphore::new(self.parallelism));
        let mut join_set = JoinSet::new();
        let mut task_files: HashMap<tokio::task::Id, (usize, PathBuf)> = HashMap::new();

        for (index, path) in discovery.files.iter().enumerate() {
            let sem = sem.clone();
            let client = self.client.clone();
            let task_path = path.clone();
            let handle = join_set.spawn(async move {
                let _permit = sem.acquire_owned().await.ok();
                validate_file(&client, &task_path).await
            });
            task_files.insert(handle.id(), (index, path.clone()));
        }

        let reports = gather_reports(join_set, task_files).await;

        Ok(RunOutcome::Completed {
            warnings: discovery.warnings,
            reports,
        })
    }
}

/// Wait for every task, then restore discovery order regardless of
/// completion order. A panicked task must not take the run down with it;
/// its file gets a Transport issue carrying the join error instead.
async fn gather_reports(
    mut join_set: JoinSet<FileReport>,
    mut task_files: HashMap<tokio::task::Id, (usize, PathBuf)>,
) -> Vec<FileReport> {
    let mut indexed: Vec<(usize, FileReport)> = Vec::with_capacity(task_files.len());

    while let Some(joined) = join_set.join_next_with_id().await {
        match joined {
            Ok((id, report)) => {
                let index = task_files
                    .remove(&id)
                    .map(|(index, _)| index)
                    .unwrap_or(usize::MAX);
                indexed.push((index, report));
            }
            Err(e) => {
                let (index, path) = task_files
                    .remove(&e.id())
                    .unwrap_or_else(|| (usize::MAX, PathBuf::from("unknown")));
                let mut report = FileReport::new(path);
                report.push(IssueKind::Transport, format!("task error: {}", e));
                indexed.push((index, report));
            }
        }
    }

    indexed.sort_by_key(|(index, _)| *index);
    indexed.into_iter().map(|(_, report)| report).collect()
}

/// Run the per-file pipeline: parse, structural check, schema check,
/// existence check. Each stage stops the pipeline on failure; a schema
/// failure in particular skips the existence check so an already-invalid
/// file costs no second remote call.
async fn validate_file(client: &CatalogClient, path: &Path) -> FileReport {
    let mut report = FileReport::new(path);
    debug!(path = %path.display(), "validating descriptor");

    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) => {
            report.push(IssueKind::Parse, format!("failed to read file: {}", e));
            return report;
        }
    };

    let value: serde_yaml::Value = match serde_yaml::from_str(&text) {
        Ok(value) => value,
        Err(e) => {
            report.push(IssueKind::Parse, format!("YAML parse error: {}", e));
            return report;
        }
    };

    let descriptor = match Descriptor::from_value(&value) {
        Ok(descriptor) => descriptor,
        Err(e) => {
            report.push(IssueKind::Structure, e.to_string());
            return report;
        }
    };

    let required = match client.required_fields(&descriptor.blueprint).await {
        Ok(required) => required,
        Err(e) => {
            // Fail closed: an unreadable schema counts against the file.
            report.push(
                IssueKind::Schema,
                format!("failed to fetch blueprint schema: {}", e),
            );
            return report;
        }
    };

    let missing: Vec<&str> = required
        .iter()
        .filter(|field| !descriptor.properties.contains_key(field.as_str()))
        .map(|field| field.as_str())
        .collect();
    if !missing.is_empty() {
        report.push(
            IssueKind::Schema,
            format!("missing required fields: {}", missing.join(", ")),
        );
        return report;
    }

    match client
        .entity_exists(&descriptor.identifier, &descriptor.blueprint)
        .await
    {
        Ok(true) => {}
        Ok(false) => {
            report.push(
                IssueKind::Existence,
                format!(
                    "entity '{}' of blueprint '{}' does not exist — updates only allowed",
                    descriptor.identifier, descriptor.blueprint
                ),
            );
        }
        Err(e) => {
            report.push(IssueKind::Transport, format!("error checking entity: {}", e));
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean_report(path: &str) -> FileReport {
        FileReport::new(path)
    }

    #[tokio::test]
    async fn test_gather_restores_discovery_order() {
        let mut join_set = JoinSet::new();
        let mut task_files = HashMap::new();

        // Spawn in reverse order; the gather must sort it back.
        for (index, name) in [(2usize, "c.yaml"), (0, "a.yaml"), (1, "b.yaml")] {
            let handle = join_set.spawn(async move { clean_report(name) });
            task_files.insert(handle.id(), (index, PathBuf::from(name)));
        }

        let reports = gather_reports(join_set, task_files).await;
        let names: Vec<_> = reports
            .iter()
            .map(|r| r.path.to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.yaml", "b.yaml", "c.yaml"]);
    }

    #[tokio::test]
    async fn test_panicked_task_reported_against_its_file() {
        let mut join_set = JoinSet::new();
        let mut task_files = HashMap::new();

        let handle = join_set.spawn(async { clean_report("ok.yaml") });
        task_files.insert(handle.id(), (0usize, PathBuf::from("ok.yaml")));

        let handle = join_set.spawn(async { panic!("worker blew up") });
        task_files.insert(handle.id(), (1usize, PathBuf::from("doomed.yaml")));

        let reports = gather_reports(join_set, task_files).await;
        assert_eq!(reports.len(), 2);
        assert!(reports[0].passed());

        // The failed task is reported against its real file, in order.
        assert_eq!(reports[1].path, PathBuf::from("doomed.yaml"));
        assert_eq!(reports[1].issues.len(), 1);
        assert_eq!(reports[1].issues[0].kind, IssueKind::Transport);
        assert!(reports[1].issues[0].message.contains("task error"));
    }
}
