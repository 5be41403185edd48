use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use std::sync::Arc;

use breach_intel::cli::{Args, Command};
use breach_intel::service::ReportService;
use breach_intel::store::{FileBreachSource, FileJobStore};

const LOG_ENV: &str = "BREACH_INTEL_LOG";

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.to_config()?;
    // 命令行 -v 已合并进 config.verbose
    init_tracing(config.verbose)?;

    let store = Arc::new(FileJobStore::new(config.store.data_dir.clone()));
    let breaches = Arc::new(FileBreachSource::new(config.store.breaches_path.clone()));
    let service = ReportService::from_config(config, breaches, store)?;

    let result = match args.command {
        Command::Generate {
            breach_id,
            requester,
            output,
        } => generate(&service, breach_id, requester.as_deref(), output.as_deref()).await,
        Command::Status { report_id } => status(&service, &report_id).await,
    };

    service.monitor().log_summary();
    result
}

async fn generate(
    service: &ReportService,
    breach_id: i64,
    requester: Option<&str>,
    output: Option<&Path>,
) -> Result<()> {
    let response = service.generate_report(breach_id, requester).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);

    if let Some(output) = output {
        let markdown = service
            .job_status(&response.report_id)
            .await?
            .and_then(|job| job.markdown_content)
            .context("报告内容为空")?;
        tokio::fs::write(output, markdown)
            .await
            .with_context(|| format!("无法写入报告文件 {:?}", output))?;
        tracing::info!("💾 报告已写入 {}", output.display());
    }
    Ok(())
}

async fn status(service: &ReportService, report_id: &str) -> Result<()> {
    match service.job_status(report_id).await? {
        Some(job) => println!("{}", serde_json::to_string_pretty(&job)?),
        None => anyhow::bail!("report {} not found", report_id),
    }
    Ok(())
}

fn init_tracing(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
