use anyhow::{bail, Error, Result};
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

/// The placeholder replaced by the run date in a name template.
pub const DATE_PLACEHOLDER: &str = "{date}";

/// The format of the rendered date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The default artifact name template.
pub const DEFAULT_NAME_TEMPLATE: &str = "daily_{date}.pdf";

/// A template for artifact names, such as `daily_{date}.pdf`.  Rendering the same template for
/// the same date always yields the same name.  The rendered name is used both as a local
/// filename and as the remote file name, so it may not contain path separators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameTemplate(String);

impl NameTemplate {
    pub fn new<S: Into<String>>(template: S) -> Result<Self> {
        let template = template.into();
        if !template.contains(DATE_PLACEHOLDER) {
            bail!(
                "name template {:?} must contain {}",
                template,
                DATE_PLACEHOLDER
            );
        }
        if template.contains('/') || template.contains('\\') {
            bail!("name template {:?} must not contain a path separator", template);
        }
        Ok(Self(template))
    }

    /// Render the artifact name for the given date.
    pub fn render(&self, date: NaiveDate) -> String {
        self.0
            .replace(DATE_PLACEHOLDER, &date.format(DATE_FORMAT).to_string())
    }
}

impl Default for NameTemplate {
    fn default() -> Self {
        Self(DEFAULT_NAME_TEMPLATE.to_owned())
    }
}

impl FromStr for NameTemplate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl fmt::Display for NameTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which calendar day a run belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayBoundary {
    /// The date on the host's local clock
    Local,
    /// The date in UTC
    Utc,
}

impl DayBoundary {
    pub fn today(self) -> NaiveDate {
        match self {
            DayBoundary::Local => chrono::Local::now().date_naive(),
            DayBoundary::Utc => chrono::Utc::now().date_naive(),
        }
    }
}

impl Default for DayBoundary {
    fn default() -> Self {
        DayBoundary::Local
    }
}

impl FromStr for DayBoundary {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(DayBoundary::Local),
            "utc" => Ok(DayBoundary::Utc),
            _ => bail!("unknown day boundary {:?}; expected `local` or `utc`", s),
        }
    }
}
