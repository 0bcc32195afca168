use std::path::PathBuf;

use thiserror::Error;
use tracing::{info, warn};

use crate::client::{IssueTracker, TrackerError};
use crate::config::Config;
use crate::models::issues::Issue;
use crate::models::record::IssueRecord;
use crate::sheet::{SheetError, SheetWriter};
use crate::utils::normalize::normalize;
use crate::utils::query::{Scope, build_scope_query};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("authentication failed: {0}")]
    Authentication(#[source] TrackerError),

    #[error("query `{jql}` failed: {source}")]
    Query { jql: String, source: TrackerError },

    #[error("writing {} failed: {source}", .path.display())]
    Write { path: PathBuf, source: SheetError },
}

impl ReportError {
    pub fn kind(&self) -> &'static str {
        match self {
            ReportError::Authentication(_) => "authentication",
            ReportError::Query { .. } => "query",
            ReportError::Write { .. } => "write",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportJob {
    pub scope: Scope,
    pub include_subtasks: bool,
}

pub struct Reporter<'a, T, W> {
    config: &'a Config,
    tracker: &'a T,
    writer: &'a W,
}

impl<'a, T: IssueTracker, W: SheetWriter> Reporter<'a, T, W> {
    pub fn new(config: &'a Config, tracker: &'a T, writer: &'a W) -> Self {
        Self {
            config,
            tracker,
            writer,
        }
    }

    pub async fn run(&self, job: &ReportJob) -> Result<PathBuf, ReportError> {
        self.generate_report(&job.scope, job.include_subtasks).await
    }

    /// authenticate → query → fetch → normalize → write. The first failing
    /// step ends the run; nothing is written unless every earlier step passed.
    pub async fn generate_report(
        &self,
        scope: &Scope,
        include_subtasks: bool,
    ) -> Result<PathBuf, ReportError> {
        let jira = &self.config.jira;

        let session = self
            .tracker
            .authenticate(&jira.server, &jira.username, &jira.api_token)
            .await
            .map_err(ReportError::Authentication)?;
        info!(project = %jira.project_key, "authenticated");

        let jql = build_scope_query(&jira.project_key, scope, include_subtasks);
        info!(%jql, "built JQL for {} {}", scope.kind(), scope.label());

        let page = self
            .tracker
            .search(&session, &jql, 0, jira.max_results)
            .await
            .map_err(|source| ReportError::Query {
                jql: jql.clone(),
                source,
            })?;

        let cap = jira.max_results as usize;
        let mut issues = page.issues;
        if issues.len() > cap || page.total as usize > cap {
            warn!(
                total = page.total,
                kept = cap,
                "result set exceeds the fetch cap, remaining issues are omitted"
            );
        }
        issues.truncate(cap);
        info!(count = issues.len(), "fetched issues");

        let records = normalize_all(&issues);

        let (path, sheet) = self.config.output.target(scope);
        self.writer
            .write(&records, &path, sheet)
            .map_err(|source| ReportError::Write {
                path: path.clone(),
                source,
            })?;

        info!(
            path = %path.display(),
            rows = records.len(),
            "created {} issues workbook for {}",
            scope.kind(),
            scope.label(),
        );
        Ok(path)
    }
}

pub fn normalize_all(issues: &[Issue]) -> Vec<IssueRecord> {
    let mut records = Vec::with_capacity(issues.len());
    records.extend(issues.iter().map(normalize));
    records
}
