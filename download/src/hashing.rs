use sha2::{Digest, Sha256};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::AsyncWrite;

/// Wrapper for an AsyncWrite that hashes and counts every byte successfully written.
pub(crate) struct HashingAsyncWrite<AW: AsyncWrite + Unpin> {
    inner: AW,
    sha256: Sha256,
    size: u64,
}

impl<AW: AsyncWrite + Unpin> HashingAsyncWrite<AW> {
    pub(crate) fn new(inner: AW) -> Self {
        Self {
            inner,
            sha256: Sha256::new(),
            size: 0,
        }
    }

    /// Return the inner writer, the number of bytes written, and their hex SHA-256.
    pub(crate) fn finish(self) -> (AW, u64, String) {
        (self.inner, self.size, format!("{:x}", self.sha256.finalize()))
    }
}

impl<AW: AsyncWrite + Unpin> AsyncWrite for HashingAsyncWrite<AW> {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<std::io::Result<usize>> {
        let this = self.get_mut();
        let res = Pin::new(&mut this.inner).poll_write(cx, buf);
        if let Poll::Ready(Ok(size)) = res {
            // only the bytes the inner writer accepted
            this.sha256.update(&buf[..size]);
            this.size += size as u64;
        }
        res
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Pin::new(&mut self.inner).poll_flush(cx)
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Pin::new(&mut self.inner).poll_shutdown(cx)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_helpers::HELLO_SHA256;
    use tokio::io::AsyncWriteExt;

    #[tokio::test]
    async fn hashes_in_pieces() -> std::io::Result<()> {
        let mut writer = HashingAsyncWrite::new(Vec::new());
        writer.write_all(b"hello, ").await?;
        writer.write_all(b"world").await?;
        let (data, size, sha256) = writer.finish();
        assert_eq!(&data, b"hello, world");
        assert_eq!(size, 12);
        assert_eq!(sha256, HELLO_SHA256);
        Ok(())
    }

    #[tokio::test]
    async fn short_writes_count_accepted_bytes() -> std::io::Result<()> {
        let mut buf = [0u8; 5];
        let mut writer = HashingAsyncWrite::new(std::io::Cursor::new(&mut buf[..]));
        let err = writer.write_all(b"hello, world").await.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::WriteZero);
        let (_, size, _) = writer.finish();
        assert_eq!(size, 5);
        Ok(())
    }
}
