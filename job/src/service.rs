//! The collaborators a run depends on, as traits so that fakes can be injected during tests.
use anyhow::{Context, Result};
use async_trait::async_trait;
use daily_snapshot_client::{CredentialHandle, Drive, DriveBuilder, ServiceAccountKey, DRIVE_FILE_SCOPE};
use daily_snapshot_download::{download_to_file, Download};
use daily_snapshot_upload::{upload_from_file, DriveFile};
use std::path::Path;
use std::time::Duration;
use tokio::fs::File;

/// Fetches the artifact.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// GET `url` and write the body to `dest`, returning once the data is on disk.
    async fn fetch(&self, url: &str, dest: File) -> Result<Download>;
}

/// Cloud storage that accepts the artifact.
#[async_trait]
pub trait StorageService: Send + Sync {
    /// Authenticate with the credential behind `credentials`.
    async fn authenticate(&self, credentials: &CredentialHandle) -> Result<Box<dyn StorageSession>>;
}

/// An authenticated storage session.
#[async_trait]
pub trait StorageSession: Send + Sync {
    /// The identity the session is authenticated as, for logging.
    fn identity(&self) -> &str;

    /// Upload the file at `path` as a new remote file called `name`.
    async fn upload(
        &self,
        path: &Path,
        name: &str,
        content_type: &str,
        folder: Option<&str>,
    ) -> Result<DriveFile>;
}

/// Fetches over HTTP(S) with a single request per fetch.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, dest: File) -> Result<Download> {
        let (_, download) = download_to_file(&self.client, url, dest).await?;
        Ok(download)
    }
}

/// Google Drive, authenticated as a service account.
pub struct DriveStorage {
    root_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl DriveStorage {
    pub fn new<S: Into<String>>(root_url: S, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            root_url: root_url.into(),
            timeout,
            client,
        })
    }
}

#[async_trait]
impl StorageService for DriveStorage {
    async fn authenticate(&self, credentials: &CredentialHandle) -> Result<Box<dyn StorageSession>> {
        let bytes = tokio::fs::read(credentials.path())
            .await
            .context("while reading credential file")?;
        let key = ServiceAccountKey::from_slice(&bytes)?;
        let token = key.access_token(&self.client, &[DRIVE_FILE_SCOPE]).await?;
        let drive = DriveBuilder::new(self.root_url.clone())
            .access_token(token)
            .timeout(self.timeout)
            .build()?;
        Ok(Box::new(DriveSession {
            drive,
            identity: key.client_email,
        }))
    }
}

struct DriveSession {
    drive: Drive,
    identity: String,
}

#[async_trait]
impl StorageSession for DriveSession {
    fn identity(&self) -> &str {
        &self.identity
    }

    async fn upload(
        &self,
        path: &Path,
        name: &str,
        content_type: &str,
        folder: Option<&str>,
    ) -> Result<DriveFile> {
        let file = File::open(path)
            .await
            .context(format!("while opening {}", path.display()))?;
        upload_from_file(name, content_type, folder, file, &self.drive).await
    }
}
