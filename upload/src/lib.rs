/*! Support for uploading the daily artifact to Google Drive.

Uploads use Drive's `multipart/related` upload: a JSON metadata part naming the file (and,
optionally, its parent folder) followed by the file content.  The content part is streamed from
its source rather than buffered.

Most uses of this crate can utilize [upload_from_file] or [upload_from_buf], providing the data in
the form of a [tokio::fs::File] and a buffer, respectively.  Without a folder, the file is created
at the root of the service account's Drive.  Each call creates a new file, even if one with the
same name already exists.
 */
use anyhow::{Context, Result};
use bytes::{Bytes, BytesMut};
use daily_snapshot_client::Drive;
use futures_util::stream::{self, StreamExt};
use reqwest::Body;
use serde::Deserialize;
use serde_json::json;
use std::io::Cursor;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncSeekExt, SeekFrom};
use tokio_util::codec::{BytesCodec, FramedRead};

/// A file created in Drive.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DriveFile {
    pub id: String,
    pub name: String,
}

/// Upload a File.  The file must be open in read mode; it is read from the beginning.
pub async fn upload_from_file(
    name: &str,
    content_type: &str,
    folder: Option<&str>,
    mut file: File,
    drive: &Drive,
) -> Result<DriveFile> {
    let content_length = file.seek(SeekFrom::End(0)).await?;
    file.seek(SeekFrom::Start(0)).await?;
    upload_impl(
        name,
        content_type,
        folder,
        content_length,
        file,
        drive,
        &slugid::v4(),
    )
    .await
}

/// Upload from an in-memory buffer.  Use this instead of [upload_from_file] when the content was
/// produced in memory and never written to disk.
pub async fn upload_from_buf(
    name: &str,
    content_type: &str,
    folder: Option<&str>,
    data: &[u8],
    drive: &Drive,
) -> Result<DriveFile> {
    upload_impl(
        name,
        content_type,
        folder,
        data.len() as u64,
        Cursor::new(data.to_vec()),
        drive,
        &slugid::v4(),
    )
    .await
}

async fn upload_impl<R>(
    name: &str,
    content_type: &str,
    folder: Option<&str>,
    content_length: u64,
    reader: R,
    drive: &Drive,
    boundary: &str,
) -> Result<DriveFile>
where
    R: AsyncRead + Send + Sync + Unpin + 'static,
{
    let mut metadata = json!({ "name": name });
    if let Some(folder) = folder {
        metadata["parents"] = json!([folder]);
    }

    let head = format!(
        "--{b}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{m}\r\n--{b}\r\nContent-Type: {ct}\r\n\r\n",
        b = boundary,
        m = metadata,
        ct = content_type,
    );
    let tail = format!("\r\n--{}--\r\n", boundary);
    let total_length = head.len() as u64 + content_length + tail.len() as u64;

    let content = FramedRead::new(reader, BytesCodec::new()).map(|r| r.map(BytesMut::freeze));
    let body = stream::once(async move { Ok::<_, std::io::Error>(Bytes::from(head)) })
        .chain(content)
        .chain(stream::once(async move { Ok(Bytes::from(tail)) }));

    let created = drive
        .create_file_multipart(boundary, Body::wrap_stream(body), total_length)
        .await
        .context(format!("while uploading {}", name))?;
    log::debug!("Drive created {}", created);

    Ok(serde_json::from_value(created).context("while decoding created file")?)
}
