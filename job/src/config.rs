use crate::error::JobError;
use crate::naming::{DayBoundary, NameTemplate};
use anyhow::{anyhow, bail, Context};
use daily_snapshot_client::{
    CredentialSource, CREDENTIALS_ENV_VAR, DEFAULT_ROOT_URL, LEGACY_CREDENTIALS_ENV_VAR,
};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// The document fetched when no URL is configured.
pub const DEFAULT_SOURCE_URL: &str = "https://www.hotsukyo.or.jp/pdf/daily.pdf";

/// Content type given to the uploaded file when none is configured.
pub const DEFAULT_CONTENT_TYPE: &str = "application/pdf";

pub const SOURCE_URL_VAR: &str = "DAILY_SNAPSHOT_URL";
pub const NAME_TEMPLATE_VAR: &str = "DAILY_SNAPSHOT_NAME_TEMPLATE";
pub const CONTENT_TYPE_VAR: &str = "DAILY_SNAPSHOT_CONTENT_TYPE";
pub const FOLDER_ID_VAR: &str = "GOOGLE_DRIVE_FOLDER_ID";
pub const WORK_DIR_VAR: &str = "DAILY_SNAPSHOT_WORK_DIR";
pub const DAY_BOUNDARY_VAR: &str = "DAILY_SNAPSHOT_DAY_BOUNDARY";
pub const TIMEOUT_VAR: &str = "DAILY_SNAPSHOT_TIMEOUT_SECS";

/// Everything a run needs to know, gathered up front.  Build one with [`JobConfig::new`] and the
/// chained setters, or from the process environment with [`JobConfig::from_env`].
#[derive(Debug, Clone)]
pub struct JobConfig {
    pub(crate) credentials: CredentialSource,
    pub(crate) source_url: String,
    pub(crate) name_template: NameTemplate,
    pub(crate) folder_id: Option<String>,
    pub(crate) content_type: String,
    pub(crate) work_dir: PathBuf,
    pub(crate) day_boundary: DayBoundary,
    pub(crate) timeout: Duration,
    pub(crate) drive_root_url: String,
}

impl JobConfig {
    /// A configuration with the given credential source and defaults for everything else.
    pub fn new(credentials: CredentialSource) -> Self {
        Self {
            credentials,
            source_url: DEFAULT_SOURCE_URL.to_owned(),
            name_template: NameTemplate::default(),
            folder_id: None,
            content_type: DEFAULT_CONTENT_TYPE.to_owned(),
            work_dir: PathBuf::from("."),
            day_boundary: DayBoundary::default(),
            timeout: Duration::from_secs(30),
            drive_root_url: DEFAULT_ROOT_URL.to_owned(),
        }
    }

    /// Read configuration from the process environment.  Credential material itself is not
    /// read here; that happens when the job runs.
    pub fn from_env() -> Result<Self, JobError> {
        Self::from_settings(CredentialSource::from_env(), |name| env::var(name).ok())
    }

    /// Read configuration using the given variable lookup.  Empty values count as unset.
    ///
    /// The credential variables are looked up too, and a value found there becomes an inline
    /// credential source.  When neither is present the job falls back to reading the process
    /// environment when it runs.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, JobError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let credentials = [CREDENTIALS_ENV_VAR, LEGACY_CREDENTIALS_ENV_VAR]
            .iter()
            .find_map(|name| lookup(name).filter(|v| !v.trim().is_empty()))
            .map(CredentialSource::Inline)
            .unwrap_or_else(CredentialSource::from_env);
        Self::from_settings(credentials, lookup)
    }

    fn from_settings<F>(credentials: CredentialSource, lookup: F) -> Result<Self, JobError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut config = Self::new(credentials);

        if let Some(url) = get(SOURCE_URL_VAR) {
            config = config.source_url(url);
        }
        if let Some(template) = get(NAME_TEMPLATE_VAR) {
            config = config.name_template(
                template
                    .parse()
                    .context(NAME_TEMPLATE_VAR)
                    .map_err(JobError::Configuration)?,
            );
        }
        if let Some(content_type) = get(CONTENT_TYPE_VAR) {
            config = config.content_type(content_type);
        }
        if let Some(folder_id) = get(FOLDER_ID_VAR) {
            config = config.folder_id(folder_id);
        }
        if let Some(work_dir) = get(WORK_DIR_VAR) {
            config = config.work_dir(work_dir);
        }
        if let Some(boundary) = get(DAY_BOUNDARY_VAR) {
            config = config.day_boundary(
                boundary
                    .parse()
                    .context(DAY_BOUNDARY_VAR)
                    .map_err(JobError::Configuration)?,
            );
        }
        if let Some(timeout) = get(TIMEOUT_VAR) {
            let secs: u64 = timeout
                .trim()
                .parse()
                .map_err(|e| {
                    JobError::Configuration(anyhow!(
                        "{}: invalid number of seconds {:?}: {}",
                        TIMEOUT_VAR,
                        timeout,
                        e
                    ))
                })?;
            config = config.timeout(Duration::from_secs(secs));
        }

        config.validate()?;
        Ok(config)
    }

    pub fn credentials(mut self, credentials: CredentialSource) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn source_url<S: Into<String>>(mut self, url: S) -> Self {
        self.source_url = url.into();
        self
    }

    pub fn name_template(mut self, template: NameTemplate) -> Self {
        self.name_template = template;
        self
    }

    /// Place uploads in this Drive folder rather than at the root.
    pub fn folder_id<S: Into<String>>(mut self, folder_id: S) -> Self {
        self.folder_id = Some(folder_id.into());
        self
    }

    pub fn content_type<S: Into<String>>(mut self, content_type: S) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Directory for the temporary credential and artifact files.  Must exist.
    pub fn work_dir<P: Into<PathBuf>>(mut self, work_dir: P) -> Self {
        self.work_dir = work_dir.into();
        self
    }

    pub fn day_boundary(mut self, day_boundary: DayBoundary) -> Self {
        self.day_boundary = day_boundary;
        self
    }

    /// Timeout for each HTTP request.  The default is 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Root URL for the Google APIs; only useful for testing.
    pub fn drive_root_url<S: Into<String>>(mut self, root_url: S) -> Self {
        self.drive_root_url = root_url.into();
        self
    }

    /// Check the parts of the configuration that setters accept unchecked.
    pub fn validate(&self) -> Result<(), JobError> {
        self.validate_inner().map_err(JobError::Configuration)
    }

    fn validate_inner(&self) -> anyhow::Result<()> {
        let url = reqwest::Url::parse(&self.source_url)
            .context(format!("invalid source URL {:?}", self.source_url))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            bail!("source URL {} must be http or https", url);
        }
        reqwest::Url::parse(&self.drive_root_url)
            .context(format!("invalid Drive root URL {:?}", self.drive_root_url))?;
        if self.content_type.trim().is_empty() {
            bail!("content type must not be empty");
        }
        if self.timeout == Duration::from_secs(0) {
            bail!("timeout must be greater than zero");
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashMap;

    fn from_vars(vars: &[(&str, &str)]) -> Result<JobConfig, JobError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        JobConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults() {
        let config = from_vars(&[]).unwrap();
        assert_eq!(config.credentials, CredentialSource::from_env());
        assert_eq!(config.source_url, DEFAULT_SOURCE_URL);
        assert_eq!(config.name_template, NameTemplate::default());
        assert_eq!(config.folder_id, None);
        assert_eq!(config.content_type, "application/pdf");
        assert_eq!(config.work_dir, PathBuf::from("."));
        assert_eq!(config.day_boundary, DayBoundary::Local);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn overrides() {
        let config = from_vars(&[
            (SOURCE_URL_VAR, "http://example.com/doc.pdf"),
            (NAME_TEMPLATE_VAR, "artifact_{date}.pdf"),
            (CONTENT_TYPE_VAR, "application/octet-stream"),
            (FOLDER_ID_VAR, "folder-9"),
            (WORK_DIR_VAR, "/tmp/snap"),
            (DAY_BOUNDARY_VAR, "utc"),
            (TIMEOUT_VAR, "5"),
        ])
        .unwrap();
        assert_eq!(config.source_url, "http://example.com/doc.pdf");
        assert_eq!(config.name_template.to_string(), "artifact_{date}.pdf");
        assert_eq!(config.content_type, "application/octet-stream");
        assert_eq!(config.folder_id.as_deref(), Some("folder-9"));
        assert_eq!(config.work_dir, PathBuf::from("/tmp/snap"));
        assert_eq!(config.day_boundary, DayBoundary::Utc);
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn credentials_from_lookup() {
        let config = from_vars(&[(LEGACY_CREDENTIALS_ENV_VAR, r#"{"client_email": "old@b"}"#)])
            .unwrap();
        assert_eq!(
            config.credentials,
            CredentialSource::Inline(r#"{"client_email": "old@b"}"#.into())
        );

        let config = from_vars(&[
            (CREDENTIALS_ENV_VAR, r#"{"client_email": "new@b"}"#),
            (LEGACY_CREDENTIALS_ENV_VAR, r#"{"client_email": "old@b"}"#),
        ])
        .unwrap();
        assert_eq!(
            config.credentials,
            CredentialSource::Inline(r#"{"client_email": "new@b"}"#.into())
        );

        let config = from_vars(&[(CREDENTIALS_ENV_VAR, " ")]).unwrap();
        assert_eq!(config.credentials, CredentialSource::from_env());
    }

    #[test]
    fn empty_values_are_unset() {
        let config = from_vars(&[(FOLDER_ID_VAR, ""), (SOURCE_URL_VAR, "  ")]).unwrap();
        assert_eq!(config.folder_id, None);
        assert_eq!(config.source_url, DEFAULT_SOURCE_URL);
    }

    #[test]
    fn bad_template() {
        let err = from_vars(&[(NAME_TEMPLATE_VAR, "daily.pdf")]).unwrap_err();
        assert_eq!(err.stage(), "configuration");
        assert!(err.to_string().contains(NAME_TEMPLATE_VAR));
    }

    #[test]
    fn bad_boundary() {
        assert!(from_vars(&[(DAY_BOUNDARY_VAR, "Asia/Tokyo")]).is_err());
    }

    #[test]
    fn bad_timeout() {
        assert!(from_vars(&[(TIMEOUT_VAR, "soon")]).is_err());
        assert!(from_vars(&[(TIMEOUT_VAR, "0")]).is_err());
    }

    #[test]
    fn bad_url() {
        assert!(from_vars(&[(SOURCE_URL_VAR, "not a url")]).is_err());
        assert!(from_vars(&[(SOURCE_URL_VAR, "ftp://example.com/x.pdf")]).is_err());
    }
}
