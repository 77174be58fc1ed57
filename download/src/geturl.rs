use crate::hashing::HashingAsyncWrite;
use crate::Download;
use anyhow::{Context, Result};
use futures_util::stream::StreamExt;
use reqwest::header;
use tokio::io::{copy, AsyncWrite, AsyncWriteExt};
use tokio_util::io::StreamReader;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Get a URL and write its body to `writer`, returning the writer and a description of the body.
pub(crate) async fn get_url<W: AsyncWrite + Unpin>(
    client: &reqwest::Client,
    url: &str,
    writer: W,
) -> Result<(W, Download)> {
    let res = client
        .get(url)
        .send()
        .await
        .and_then(|res| res.error_for_status())
        .context(format!("while fetching {}", url))?;

    // determine the content type before moving `res`
    let content_type = res
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_owned();

    // copy bytes from the response to the writer
    let stream = res
        .bytes_stream()
        // convert the Result::Err type to std::io::Error
        .map(|r| r.map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e)));
    let mut reader = StreamReader::new(stream);
    let mut writer = HashingAsyncWrite::new(writer);

    copy(&mut reader, &mut writer)
        .await
        .context(format!("while reading body of {}", url))?;
    writer.flush().await?;

    let (writer, size, sha256) = writer.finish();
    log::debug!("fetched {} bytes from {}", size, url);
    Ok((
        writer,
        Download {
            content_type,
            size,
            sha256,
        },
    ))
}
