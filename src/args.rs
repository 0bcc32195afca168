use std::path::PathBuf;

use clap::Parser;

use crate::report::ReportJob;
use crate::utils::constants::{DEFAULT_RELEASE_NAME, DEFAULT_SPRINT_ID, MAX_RESULTS};
use crate::utils::query::Scope;

#[derive(Parser, Debug)]
#[command(name = "JIRA Sprint Report", version, about = "Export JIRA sprint and release issues to Excel")]
pub struct Args {
    /// TOML file with a [jira] table; `jira.toml` is picked up when present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, env = "JIRA_SERVER")]
    pub server: Option<String>,

    #[arg(long, env = "JIRA_USERNAME")]
    pub username: Option<String>,

    #[arg(long, env = "JIRA_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    #[arg(long, env = "JIRA_PROJECT_KEY")]
    pub project_key: Option<String>,

    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Sprint id to report on.
    #[arg(long)]
    pub sprint: Option<String>,

    /// Fix version name to report on.
    #[arg(long)]
    pub release: Option<String>,

    /// Leave sub-tasks out of the sprint report.
    #[arg(long)]
    pub exclude_subtasks: bool,

    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_RESULTS)))]
    pub max_results: Option<u32>,
}

impl Args {
    /// Reports to run. Without `--sprint` or `--release` both defaults run,
    /// sprint first.
    pub fn jobs(&self) -> Vec<ReportJob> {
        let include_subtasks = !self.exclude_subtasks;
        let (sprint, release) = match (&self.sprint, &self.release) {
            (None, None) => (
                Some(DEFAULT_SPRINT_ID.to_string()),
                Some(DEFAULT_RELEASE_NAME.to_string()),
            ),
            (sprint, release) => (sprint.clone(), release.clone()),
        };

        let mut jobs = Vec::new();
        if let Some(id) = sprint {
            jobs.push(ReportJob {
                scope: Scope::Sprint(id),
                include_subtasks,
            });
        }
        if let Some(name) = release {
            jobs.push(ReportJob {
                scope: Scope::Release(name),
                include_subtasks: false,
            });
        }
        jobs
    }
}

/// Parses `argv` with the `JIRA_*` environment fallbacks switched off, so
/// tests see only the flags they pass.
#[cfg(test)]
pub(crate) fn parse_without_env(argv: &[&str]) -> Args {
    use clap::{CommandFactory, FromArgMatches};

    let mut command = Args::command();
    for id in ["server", "username", "api_token", "project_key"] {
        command = command.mut_arg(id, |arg| arg.env(None::<&'static str>));
    }
    let mut full = vec!["jira-sprint-report"];
    full.extend_from_slice(argv);
    let matches = command.try_get_matches_from(full).unwrap();
    Args::from_arg_matches(&matches).unwrap()
}
