/*! One-shot download of the daily artifact.

Each function issues a single HTTP GET with the given [reqwest::Client], fails on any transport
error or non-2xx status, and streams the response body verbatim into the destination.  There is
no retry: a failed download is reported to the caller, which decides what to do with whatever
was partially written.

* [download_to_vec] -- download data to a dynamically allocated buffer; or
* [download_to_file] -- download data to a [tokio::fs::File].

Both return a [Download] describing the body: its content type, size, and SHA-256 digest.
*/
mod fetch;
mod geturl;
mod hashing;

#[cfg(test)]
mod test_helpers;

pub use fetch::{download_to_file, download_to_vec};

/// Metadata about a completed download.
#[derive(Debug, Clone, PartialEq)]
pub struct Download {
    /// Content-Type reported by the server, or `application/octet-stream`
    pub content_type: String,
    /// Number of bytes written
    pub size: u64,
    /// Lower-case hex SHA-256 of the bytes written
    pub sha256: String,
}
