use daily_snapshot_client::CredentialError;
use thiserror::Error;

/// The ways a run can fail.  Every failure is terminal; none is retried.
#[derive(Debug, Error)]
pub enum JobError {
    /// Missing or invalid configuration, including credential material.  Raised before any
    /// network activity.
    #[error("configuration error: {0:#}")]
    Configuration(anyhow::Error),

    /// The artifact could not be fetched or written locally.
    #[error("download failed: {0:#}")]
    Transport(anyhow::Error),

    /// Authentication to storage, or the upload itself, failed.
    #[error("upload failed: {0:#}")]
    Upload(anyhow::Error),
}

impl JobError {
    /// Short name of the stage that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            JobError::Configuration(_) => "configuration",
            JobError::Transport(_) => "download",
            JobError::Upload(_) => "upload",
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

impl From<CredentialError> for JobError {
    fn from(err: CredentialError) -> Self {
        JobError::Configuration(err.into())
    }
}
