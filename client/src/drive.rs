use crate::auth::AccessToken;
use anyhow::{anyhow, Context, Error, Result};
use serde_json::Value;
use std::time::Duration;

/// Root URL of the Google APIs front end.
pub const DEFAULT_ROOT_URL: &str = "https://www.googleapis.com";

/// DriveBuilder implements the builder pattern for building a [`Drive`] client.
#[derive(Default, Debug, Clone)]
pub struct DriveBuilder {
    root_url: String,
    access_token: Option<AccessToken>,
    timeout: Duration,
}

impl DriveBuilder {
    /// Create a new DriveBuilder addressing the given root URL.
    pub fn new<S: Into<String>>(root_url: S) -> Self {
        Self {
            root_url: root_url.into(),
            timeout: Duration::from_secs(30),
            ..Self::default()
        }
    }

    /// Set the access token used for all requests.  Required.
    pub fn access_token(mut self, access_token: AccessToken) -> Self {
        self.access_token = Some(access_token);
        self
    }

    /// Set the timeout for each HTTP request made by the client.  The default is 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<Drive> {
        Drive::new(self)
    }
}

impl From<AccessToken> for DriveBuilder {
    fn from(access_token: AccessToken) -> Self {
        Self::new(DEFAULT_ROOT_URL).access_token(access_token)
    }
}

/// A minimal Google Drive v3 client, able to create files.
pub struct Drive {
    base_url: reqwest::Url,
    access_token: AccessToken,
    client: reqwest::Client,
}

impl Drive {
    pub fn new<B: Into<DriveBuilder>>(builder: B) -> Result<Drive> {
        let b = builder.into();
        let base_url = reqwest::Url::parse(&b.root_url)
            .context(format!("while parsing {}", b.root_url))?;
        let access_token = b
            .access_token
            .ok_or_else(|| anyhow!("a Drive client requires an access token"))?;
        let client = reqwest::Client::builder().timeout(b.timeout).build()?;
        Ok(Drive {
            base_url,
            access_token,
            client,
        })
    }

    /// Create a file with a `multipart/related` body (metadata part, then content part)
    /// delimited by `boundary`.  Returns the created file's `id` and `name`.
    pub async fn create_file_multipart(
        &self,
        boundary: &str,
        body: reqwest::Body,
        content_length: u64,
    ) -> Result<Value> {
        let mut url = self.base_url.join("upload/drive/v3/files")?;
        url.query_pairs_mut()
            .append_pair("uploadType", "multipart")
            .append_pair("supportsAllDrives", "true")
            .append_pair("fields", "id,name");

        let resp = self
            .client
            .post(url)
            .bearer_auth(&self.access_token.token)
            .header(
                "Content-Type",
                format!("multipart/related; boundary={}", boundary),
            )
            .header("Content-Length", content_length)
            .body(body)
            .send()
            .await?;

        if let Some(err) = resp.error_for_status_ref().err() {
            // Drive reports failures as {"error": {"message": ..}}
            if let Ok(json) = resp.json::<Value>().await {
                if let Some(message) = json.pointer("/error/message").and_then(|m| m.as_str()) {
                    return Err(Error::from(err).context(message.to_owned()));
                }
            }
            return Err(err.into());
        }

        Ok(resp.json().await.context("while decoding Drive response")?)
    }
}
