mod args;
mod client;
mod config;
mod models;
mod report;
mod sheet;
mod utils;

use anyhow::Context;
use args::Args;
use clap::Parser;
use client::JiraClient;
use config::Config;
use report::Reporter;
use sheet::XlsxSheetWriter;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = Config::load(&args).context("Could not load JIRA configuration")?;
    let tracker = JiraClient::new().context("Could not create the JIRA HTTP client")?;
    let writer = XlsxSheetWriter::default();
    let reporter = Reporter::new(&config, &tracker, &writer);

    let jobs = args.jobs();
    let mut failed = 0;
    for job in &jobs {
        match reporter.run(job).await {
            Ok(path) => info!(
                "{} report for {} written to {}",
                job.scope.kind(),
                job.scope.label(),
                path.display(),
            ),
            Err(e) => {
                failed += 1;
                error!(
                    kind = e.kind(),
                    "{} report for {} failed: {}",
                    job.scope.kind(),
                    job.scope.label(),
                    e,
                );
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} reports failed", failed, jobs.len());
    }
    Ok(())
}
