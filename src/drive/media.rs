//! Chunked media download
//!
//! Media is pulled in ranged chunks into an in-memory buffer, with a progress
//! event per chunk, and written to disk in a single pass once complete. A
//! chunk failure aborts the download with nothing written to disk.

use reqwest::StatusCode;
use reqwest::header::{CONTENT_RANGE, HeaderMap, RANGE};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::DriveClient;
use crate::error::{DownloadError, Error, Result};
use crate::types::{ChunkProgress, Event};

impl DriveClient {
    /// Download a file's media and write it to `download_dir/<file_name>`.
    ///
    /// Creates or overwrites the target file. The parent directory must
    /// already exist.
    pub async fn download_to_file(
        &self,
        file_id: &str,
        download_dir: &Path,
        file_name: &str,
    ) -> Result<PathBuf> {
        let buffer = self.download_media(file_id).await?;

        let target = download_dir.join(file_name);
        tokio::fs::write(&target, &buffer).await?;

        info!(path = %target.display(), bytes = buffer.len(), "download written to disk");

        let _ = self.event_tx.send(Event::DownloadComplete {
            path: target.clone(),
            bytes: buffer.len() as u64,
        });

        Ok(target)
    }

    /// Fetch a file's media into memory in ranged chunks.
    ///
    /// The total size is learned from the first `Content-Range` header. A
    /// server that ignores the range request and replies 200 with the whole
    /// body completes the download in one chunk.
    pub async fn download_media(&self, file_id: &str) -> Result<Vec<u8>> {
        let url = self.file_url(file_id)?;

        let mut buffer: Vec<u8> = Vec::new();
        let total_bytes: u64;

        loop {
            let start = buffer.len() as u64;
            let end = start + self.chunk_size - 1;

            debug!(file_id, start, end, "requesting media chunk");

            let response = self
                .session
                .http
                .get(url.clone())
                .bearer_auth(&self.session.token.token)
                .query(&[("alt", "media")])
                .header(RANGE, format!("bytes={start}-{end}"))
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(Error::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            if status == StatusCode::PARTIAL_CONTENT {
                let total = content_range_total(response.headers()).ok_or(
                    DownloadError::MissingContentRange {
                        status: status.as_u16(),
                    },
                )?;

                let chunk = response.bytes().await?;
                buffer.extend_from_slice(&chunk);
                self.report_progress(buffer.len() as u64, total);

                if buffer.len() as u64 >= total {
                    total_bytes = total;
                    break;
                }

                // An empty 206 chunk before the end would loop forever.
                if chunk.is_empty() {
                    return Err(DownloadError::SizeMismatch {
                        expected: total,
                        actual: buffer.len() as u64,
                    }
                    .into());
                }
            } else {
                // Server ignored the range header and sent the whole file.
                let body = response.bytes().await?;
                buffer = body.to_vec();
                total_bytes = buffer.len() as u64;
                self.report_progress(total_bytes, total_bytes);
                break;
            }
        }

        if buffer.len() as u64 != total_bytes {
            return Err(DownloadError::SizeMismatch {
                expected: total_bytes,
                actual: buffer.len() as u64,
            }
            .into());
        }

        Ok(buffer)
    }

    fn report_progress(&self, bytes_fetched: u64, total_bytes: u64) {
        let progress = ChunkProgress {
            bytes_fetched,
            total_bytes,
        };

        info!(percent = progress.percent(), "download progress");

        let _ = self.event_tx.send(Event::Downloading {
            percent: progress.percent(),
            bytes_fetched,
            total_bytes,
        });
    }
}

/// Parse the total size out of a `Content-Range` header ("bytes 0-99/1234")
fn content_range_total(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_RANGE)?
        .to_str()
        .ok()?
        .rsplit('/')
        .next()?
        .trim()
        .parse()
        .ok()
}
