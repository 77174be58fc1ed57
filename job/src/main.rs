use daily_snapshot::{DailySnapshotJob, JobConfig, JobError, JobReport};

async fn run() -> Result<JobReport, JobError> {
    let config = JobConfig::from_env()?;
    DailySnapshotJob::from_config(config)?.run().await
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run().await {
        Ok(report) => log::info!(
            "{} stored as Drive file {}",
            report.artifact_name,
            report.remote.id
        ),
        Err(err) => {
            log::error!("{}", err);
            std::process::exit(err.exit_code());
        }
    }
}
