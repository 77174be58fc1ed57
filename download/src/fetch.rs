use crate::geturl::get_url;
use crate::Download;
use anyhow::Result;
use std::io::Cursor;
use tokio::fs::File;

/// Download a URL to a [Vec<u8>] and return that.  Use this instead of [download_to_file] when the
/// caller wants the bytes in memory and has nowhere to put a file.  If the body is unexpectedly
/// large, this may exhaust system memory and panic.
pub async fn download_to_vec(client: &reqwest::Client, url: &str) -> Result<(Vec<u8>, Download)> {
    let (cursor, download) = get_url(client, url, Cursor::new(Vec::new())).await?;
    Ok((cursor.into_inner(), download))
}

/// Download a URL into the given File, which must be open in write mode.  The File is returned
/// with all write operations complete, positioned at the end of the data.
pub async fn download_to_file(
    client: &reqwest::Client,
    url: &str,
    file: File,
) -> Result<(File, Download)> {
    get_url(client, url, file).await
}
