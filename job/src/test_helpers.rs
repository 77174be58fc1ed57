//! Fakes for testing runs
use crate::service::{Fetcher, StorageService, StorageSession};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use daily_snapshot_client::{CredentialHandle, CredentialMaterial};
use daily_snapshot_download::Download;
use daily_snapshot_upload::DriveFile;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

pub(crate) const KEY: &str = r#"{"type": "service_account", "client_email": "job@example.iam.gserviceaccount.com", "private_key": "secret"}"#;

/// Event logger, used to log calls to the fakes and then assert on them.
#[derive(Default, Clone)]
pub(crate) struct Logger {
    logged: Arc<Mutex<Vec<String>>>,
}

impl Logger {
    pub(crate) fn log<S: Into<String>>(&self, message: S) {
        self.logged.lock().unwrap().push(message.into())
    }

    pub(crate) fn assert(&self, expected: Vec<String>) {
        assert_eq!(*self.logged.lock().unwrap(), expected);
    }
}

/// Fake fetcher.  Writes `body` and succeeds, or writes `body` and then fails if `fail` is set.
pub(crate) struct FakeFetcher {
    pub(crate) logger: Logger,
    pub(crate) body: Vec<u8>,
    pub(crate) fail: bool,
}

impl FakeFetcher {
    pub(crate) fn new(logger: &Logger, body: &[u8]) -> Self {
        Self {
            logger: logger.clone(),
            body: body.to_vec(),
            fail: false,
        }
    }
}

#[async_trait]
impl Fetcher for FakeFetcher {
    async fn fetch(&self, url: &str, mut dest: File) -> Result<Download> {
        self.logger.log(format!("fetch {}", url));
        dest.write_all(&self.body).await?;
        dest.flush().await?;
        if self.fail {
            return Err(anyhow!("connection reset"));
        }
        Ok(Download {
            content_type: "application/pdf".into(),
            size: self.body.len() as u64,
            sha256: "fake".into(),
        })
    }
}

/// Fake storage.  Records what it sees, including whether the artifact and the credential are
/// readable at upload time.
#[derive(Default)]
pub(crate) struct FakeStorage {
    pub(crate) logger: Logger,
    pub(crate) fail_authenticate: bool,
    pub(crate) fail_upload: bool,
}

impl FakeStorage {
    pub(crate) fn new(logger: &Logger) -> Self {
        Self {
            logger: logger.clone(),
            ..Self::default()
        }
    }
}

#[async_trait]
impl StorageService for FakeStorage {
    async fn authenticate(&self, credentials: &CredentialHandle) -> Result<Box<dyn StorageSession>> {
        let text = String::from_utf8(credentials.read()?)?;
        let identity = CredentialMaterial::parse(&text)?
            .client_email()
            .unwrap_or("?")
            .to_owned();
        self.logger.log(format!("authenticate {}", identity));
        if self.fail_authenticate {
            return Err(anyhow!("invalid_grant"));
        }
        Ok(Box::new(FakeSession {
            logger: self.logger.clone(),
            credential_path: credentials.path().to_owned(),
            identity,
            fail: self.fail_upload,
        }))
    }
}

struct FakeSession {
    logger: Logger,
    credential_path: std::path::PathBuf,
    identity: String,
    fail: bool,
}

#[async_trait]
impl StorageSession for FakeSession {
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
        let data = tokio::fs::read(path).await?;
        assert!(self.credential_path.exists(), "credential removed too early");
        self.logger.log(format!(
            "upload {} {} {} bytes to {}",
            name,
            content_type,
            data.len(),
            folder.unwrap_or("root")
        ));
        if self.fail {
            return Err(anyhow!("quota exceeded"));
        }
        Ok(DriveFile {
            id: format!("id-{}", name),
            name: name.to_owned(),
        })
    }
}

/// Paths remaining in a directory.
pub(crate) fn files_in(dir: &Path) -> Vec<std::path::PathBuf> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect()
}
