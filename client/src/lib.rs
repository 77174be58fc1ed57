/*!
# Credentials and Drive client for daily-snapshot

This crate holds everything needed to talk to Google Drive as a service account:

* [`CredentialMaterial`] and [`CredentialSource`] read a service-account key from the
  environment (or inline text) and check that it is JSON;
* a [`CredentialProvider`] turns that material into a [`CredentialHandle`], a short-lived file
  that is deleted when the handle is dropped;
* [`ServiceAccountKey`] signs a JWT bearer assertion and exchanges it for an [`AccessToken`];
* [`Drive`], built with a [`DriveBuilder`], creates files with that token.

```no_run
# use anyhow::Result;
# #[tokio::main]
# async fn main() -> Result<()> {
use daily_snapshot_client::{
    CredentialMaterial, CredentialProvider, CredentialSource, Drive, ServiceAccountKey,
    TempFileCredentialProvider, DRIVE_FILE_SCOPE,
};
let material = CredentialMaterial::resolve(&CredentialSource::from_env())?;
let handle = TempFileCredentialProvider::new(material, ".").credential_handle()?;
let key = ServiceAccountKey::from_file(handle.path())?;
let token = key.access_token(&reqwest::Client::new(), &[DRIVE_FILE_SCOPE]).await?;
let _drive = Drive::new(token)?;
# Ok(())
# }
```
*/
mod auth;
mod credentials;
mod drive;

pub use auth::{exchange_assertion, AccessToken, ServiceAccountKey, DRIVE_FILE_SCOPE};
pub use credentials::{
    CredentialError, CredentialHandle, CredentialMaterial, CredentialProvider, CredentialSource,
    TempFileCredentialProvider, CREDENTIALS_ENV_VAR, LEGACY_CREDENTIALS_ENV_VAR,
};
pub use drive::{Drive, DriveBuilder, DEFAULT_ROOT_URL};
