use crate::config::JobConfig;
use crate::error::JobError;
use crate::scratch::ScratchFile;
use crate::service::{DriveStorage, Fetcher, HttpFetcher, StorageService};
use anyhow::Context;
use chrono::NaiveDate;
use daily_snapshot_client::{
    CredentialHandle, CredentialMaterial, CredentialProvider, TempFileCredentialProvider,
};
use daily_snapshot_download::Download;
use daily_snapshot_upload::DriveFile;
use std::fmt;
use tokio::fs::File;

/// How far a run got.  States only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum JobState {
    Init,
    Downloaded,
    Authenticated,
    Uploaded,
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobState::Init => "init",
            JobState::Downloaded => "downloaded",
            JobState::Authenticated => "authenticated",
            JobState::Uploaded => "uploaded",
        };
        f.write_str(s)
    }
}

/// The outcome of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct JobReport {
    pub date: NaiveDate,
    pub artifact_name: String,
    pub download: Download,
    pub remote: DriveFile,
}

/// Fetches the day's document and stores it remotely, leaving nothing behind locally.
pub struct DailySnapshotJob<F: Fetcher, S: StorageService> {
    config: JobConfig,
    fetcher: F,
    storage: S,
}

impl DailySnapshotJob<HttpFetcher, DriveStorage> {
    /// A job fetching over HTTP and storing in Google Drive.
    pub fn from_config(config: JobConfig) -> Result<Self, JobError> {
        let fetcher = HttpFetcher::new(config.timeout).map_err(JobError::Configuration)?;
        let storage = DriveStorage::new(config.drive_root_url.clone(), config.timeout)
            .map_err(JobError::Configuration)?;
        Self::new(config, fetcher, storage)
    }
}

impl<F: Fetcher, S: StorageService> DailySnapshotJob<F, S> {
    pub fn new(config: JobConfig, fetcher: F, storage: S) -> Result<Self, JobError> {
        config.validate()?;
        Ok(Self {
            config,
            fetcher,
            storage,
        })
    }

    /// Run for today, as determined by the configured day boundary.
    pub async fn run(&self) -> Result<JobReport, JobError> {
        self.run_on(self.config.day_boundary.today()).await
    }

    /// Run as if today were `date`.
    pub async fn run_on(&self, date: NaiveDate) -> Result<JobReport, JobError> {
        // nothing touches the network or the filesystem until the credential is known good
        let material = CredentialMaterial::resolve(&self.config.credentials)?;
        let provider = TempFileCredentialProvider::new(material, &self.config.work_dir);
        let credentials = provider.credential_handle()?;

        let artifact_name = self.config.name_template.render(date);
        let artifact = ScratchFile::new(self.config.work_dir.join(&artifact_name));
        log::info!(
            "snapshot of {} for {} as {}",
            self.config.source_url,
            date,
            artifact_name
        );

        let mut state = JobState::Init;
        let res = self
            .stages(&artifact_name, &artifact, &credentials, &mut state)
            .await;
        if let Err(ref err) = res {
            log::error!("{} stage failed in state {}", err.stage(), state);
        }

        // release both files on every path
        match artifact.remove() {
            Ok(true) => log::debug!("removed artifact {}", artifact_name),
            Ok(false) => {}
            Err(err) => log::warn!("could not remove artifact {}: {}", artifact_name, err),
        }
        let credential_path = credentials.path().to_owned();
        match credentials.close() {
            Ok(()) => log::debug!("removed credential file {}", credential_path.display()),
            Err(err) => log::warn!(
                "could not remove credential file {}: {}",
                credential_path.display(),
                err
            ),
        }

        let (download, remote) = res?;
        Ok(JobReport {
            date,
            artifact_name,
            download,
            remote,
        })
    }

    async fn stages(
        &self,
        artifact_name: &str,
        artifact: &ScratchFile,
        credentials: &CredentialHandle,
        state: &mut JobState,
    ) -> Result<(Download, DriveFile), JobError> {
        let file = File::create(artifact.path())
            .await
            .context(format!("while creating {}", artifact.path().display()))
            .map_err(JobError::Transport)?;
        let download = self
            .fetcher
            .fetch(&self.config.source_url, file)
            .await
            .map_err(JobError::Transport)?;
        *state = JobState::Downloaded;
        log::info!(
            "downloaded {} ({} bytes, {}, sha256 {})",
            artifact_name,
            download.size,
            download.content_type,
            download.sha256
        );

        let session = self
            .storage
            .authenticate(credentials)
            .await
            .context("while authenticating to storage")
            .map_err(JobError::Upload)?;
        *state = JobState::Authenticated;
        log::info!("authenticated as {}", session.identity());

        let remote = session
            .upload(
                artifact.path(),
                artifact_name,
                &self.config.content_type,
                self.config.folder_id.as_deref(),
            )
            .await
            .map_err(JobError::Upload)?;
        *state = JobState::Uploaded;
        log::info!("uploaded {} as file {}", remote.name, remote.id);

        Ok((download, remote))
    }
}
