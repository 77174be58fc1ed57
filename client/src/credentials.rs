use serde_json::Value;
use std::env;
use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// The canonical environment variable holding the service-account key.
pub const CREDENTIALS_ENV_VAR: &str = "GOOGLE_DRIVE_CREDENTIALS";

/// The variable name used by earlier deployments of the job; still honored as a fallback.
pub const LEGACY_CREDENTIALS_ENV_VAR: &str = "GOOGLE_DRIVE_SERVICE_ACCOUNT";

/// Errors from sourcing or materializing credential material.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("none of the environment variables {} is set", .0.join(", "))]
    Missing(Vec<String>),

    #[error("credential material is not a JSON object: {0}")]
    Malformed(String),

    #[error("while writing credential file in {}", .dir.display())]
    Materialize {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Where credential material comes from.
#[derive(Clone, PartialEq)]
pub enum CredentialSource {
    /// Read from the first of these environment variables that is set and non-empty.
    Env(Vec<String>),
    /// Use the given text directly.
    Inline(String),
}

impl CredentialSource {
    /// The default source: `GOOGLE_DRIVE_CREDENTIALS`, then `GOOGLE_DRIVE_SERVICE_ACCOUNT`.
    pub fn from_env() -> Self {
        CredentialSource::Env(vec![
            CREDENTIALS_ENV_VAR.to_owned(),
            LEGACY_CREDENTIALS_ENV_VAR.to_owned(),
        ])
    }
}

impl fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Env(vars) => f.debug_tuple("Env").field(vars).finish(),
            CredentialSource::Inline(_) => f.write_str("Inline(<redacted>)"),
        }
    }
}

/// A parsed, but otherwise unvalidated, service-account credential document.
#[derive(Clone)]
pub struct CredentialMaterial(Value);

impl CredentialMaterial {
    /// Read and parse credential material from the given source.  No network or filesystem
    /// activity takes place.
    pub fn resolve(source: &CredentialSource) -> Result<Self, CredentialError> {
        let text = match source {
            CredentialSource::Inline(text) => text.clone(),
            CredentialSource::Env(vars) => read_first_var(vars)?,
        };
        Self::parse(&text)
    }

    /// Parse credential material from JSON text.  The text must hold a JSON object.
    pub fn parse(text: &str) -> Result<Self, CredentialError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| CredentialError::Malformed(e.to_string()))?;
        if !value.is_object() {
            return Err(CredentialError::Malformed(format!(
                "expected an object, got {}",
                json_kind(&value)
            )));
        }
        Ok(Self(value))
    }

    /// The `client_email` field, if present; safe to log.
    pub fn client_email(&self) -> Option<&str> {
        self.0.get("client_email").and_then(|v| v.as_str())
    }

    fn to_pretty(&self) -> String {
        // serializing a Value cannot fail
        serde_json::to_string_pretty(&self.0).unwrap_or_default()
    }
}

impl fmt::Debug for CredentialMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialMaterial")
            .field("client_email", &self.client_email())
            .finish()
    }
}

fn read_first_var(vars: &[String]) -> Result<String, CredentialError> {
    for var in vars {
        match env::var(var) {
            Ok(val) if !val.trim().is_empty() => return Ok(val),
            Ok(_) | Err(env::VarError::NotPresent) => continue,
            Err(env::VarError::NotUnicode(_)) => {
                return Err(CredentialError::Malformed(format!(
                    "environment variable {} is not valid unicode",
                    var
                )))
            }
        }
    }
    Err(CredentialError::Missing(vars.to_vec()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// A CredentialProvider produces short-lived, readable handles to credential bytes, for
/// collaborators that insist on loading keys from a path.
pub trait CredentialProvider {
    fn credential_handle(&self) -> Result<CredentialHandle, CredentialError>;
}

/// A handle to credential bytes on disk.  The backing file is deleted when the handle is
/// dropped.
pub struct CredentialHandle {
    file: NamedTempFile,
}

impl CredentialHandle {
    /// Path to the credential file, valid for the lifetime of the handle.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Read the credential bytes.
    pub fn read(&self) -> io::Result<Vec<u8>> {
        std::fs::read(self.file.path())
    }

    /// Delete the credential file now, reporting any error.  Dropping the handle does the same
    /// but swallows errors.
    pub fn close(self) -> io::Result<()> {
        self.file.close()
    }
}

impl fmt::Debug for CredentialHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialHandle")
            .field("path", &self.path())
            .finish()
    }
}

/// Materializes credential material as a pretty-printed JSON file in a directory.  On unix the
/// file is readable only by its owner.
#[derive(Debug)]
pub struct TempFileCredentialProvider {
    material: CredentialMaterial,
    dir: PathBuf,
}

impl TempFileCredentialProvider {
    pub fn new<P: Into<PathBuf>>(material: CredentialMaterial, dir: P) -> Self {
        Self {
            material,
            dir: dir.into(),
        }
    }
}

impl CredentialProvider for TempFileCredentialProvider {
    fn credential_handle(&self) -> Result<CredentialHandle, CredentialError> {
        let materialize = |source| CredentialError::Materialize {
            dir: self.dir.clone(),
            source,
        };
        let mut file = tempfile::Builder::new()
            .prefix("service_account-")
            .suffix(".json")
            .tempfile_in(&self.dir)
            .map_err(materialize)?;
        // if either write fails, `file` is dropped and removed
        file.write_all(self.material.to_pretty().as_bytes())
            .map_err(materialize)?;
        file.flush().map_err(materialize)?;
        Ok(CredentialHandle { file })
    }
}
