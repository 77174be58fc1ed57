/*!
# daily-snapshot

Fetch the day's PDF from a fixed URL and store it in Google Drive, once per invocation.

A run is described by a [`JobConfig`] and carried out by a [`DailySnapshotJob`]:

1. the service-account credential is read from the environment and checked to be JSON;
2. it is written to a temporary file for the storage client;
3. the artifact name is derived from the run's calendar date (`daily_2026-10-16.pdf`), so
   re-running on the same day yields the same name;
4. the document is fetched with a single GET, without retries, into the work directory;
5. the storage client authenticates and uploads the file under its derived name;
6. both local files are removed, whatever the outcome.

Failures are reported as a [`JobError`] naming the stage that failed; every failure maps to exit
code 1.  The collaborators are behind the [`Fetcher`] and [`StorageService`] traits, with
[`HttpFetcher`] and [`DriveStorage`] as the production implementations.
*/
mod config;
mod error;
mod job;
mod naming;
mod scratch;
mod service;

#[cfg(test)]
mod test_helpers;

pub use config::{
    JobConfig, CONTENT_TYPE_VAR, DAY_BOUNDARY_VAR, DEFAULT_CONTENT_TYPE, DEFAULT_SOURCE_URL,
    FOLDER_ID_VAR, NAME_TEMPLATE_VAR, SOURCE_URL_VAR, TIMEOUT_VAR, WORK_DIR_VAR,
};
pub use error::JobError;
pub use job::{DailySnapshotJob, JobReport, JobState};
pub use naming::{DayBoundary, NameTemplate, DATE_FORMAT, DATE_PLACEHOLDER, DEFAULT_NAME_TEMPLATE};
pub use service::{DriveStorage, Fetcher, HttpFetcher, StorageService, StorageSession};
